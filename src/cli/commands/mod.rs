use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("pordego")
        .about("Authentication gateway for a managed identity provider")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORDEGO_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("provider-url")
                .long("provider-url")
                .help("Identity provider auth API base URL, example: https://id.tld/auth/v1")
                .env("PORDEGO_PROVIDER_URL")
                .required(true),
        )
        .arg(
            Arg::new("provider-key")
                .long("provider-key")
                .help("Identity provider service role key")
                .env("PORDEGO_PROVIDER_KEY")
                .required(true),
        )
        .arg(
            Arg::new("provider-rest-url")
                .long("provider-rest-url")
                .help("Identity provider REST API base URL (derived from --provider-url when omitted)")
                .env("PORDEGO_PROVIDER_REST_URL"),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .help("Frontend base URL used for CORS and redirect targets")
                .default_value("http://localhost:5173")
                .env("PORDEGO_FRONTEND_URL"),
        )
        .arg(
            Arg::new("oauth-redirect-url")
                .long("oauth-redirect-url")
                .help("Where the OAuth consent flow returns (default: <frontend-url>/dashboard)")
                .env("PORDEGO_OAUTH_REDIRECT_URL"),
        )
        .arg(
            Arg::new("reset-redirect-url")
                .long("reset-redirect-url")
                .help("Password-reset landing page (default: <frontend-url>/reset-password)")
                .env("PORDEGO_RESET_REDIRECT_URL"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("PORDEGO_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
