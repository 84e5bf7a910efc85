pub mod server;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        frontend_url: String,
        oauth_redirect_url: Option<String>,
        reset_redirect_url: Option<String>,
    },
}
