use crate::cli::actions::Action;
use anyhow::Result;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        frontend_url: matches
            .get_one("frontend-url")
            .map(|s: &String| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --frontend-url"))?,
        oauth_redirect_url: matches
            .get_one("oauth-redirect-url")
            .map(|s: &String| s.to_string()),
        reset_redirect_url: matches
            .get_one("reset-redirect-url")
            .map(|s: &String| s.to_string()),
    })
}
