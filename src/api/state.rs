//! Gateway configuration shared with the handlers.

const OAUTH_REDIRECT_PATH: &str = "/dashboard";
const RESET_REDIRECT_PATH: &str = "/reset-password";

/// Redirect targets and the allowed frontend origin.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    frontend_base_url: String,
    oauth_redirect_url: String,
    reset_redirect_url: String,
}

impl GatewayConfig {
    /// Defaults derive both redirect URLs from the frontend base URL.
    #[must_use]
    pub fn new(frontend_base_url: String) -> Self {
        let base = frontend_base_url.trim_end_matches('/').to_string();

        Self {
            oauth_redirect_url: format!("{base}{OAUTH_REDIRECT_PATH}"),
            reset_redirect_url: format!("{base}{RESET_REDIRECT_PATH}"),
            frontend_base_url: base,
        }
    }

    #[must_use]
    pub fn with_oauth_redirect_url(mut self, url: String) -> Self {
        self.oauth_redirect_url = url;
        self
    }

    #[must_use]
    pub fn with_reset_redirect_url(mut self, url: String) -> Self {
        self.reset_redirect_url = url;
        self
    }

    #[must_use]
    pub fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    /// Where the OAuth consent flow returns the user.
    #[must_use]
    pub fn oauth_redirect_url(&self) -> &str {
        &self.oauth_redirect_url
    }

    /// Landing page linked from password-reset emails.
    #[must_use]
    pub fn reset_redirect_url(&self) -> &str {
        &self.reset_redirect_url
    }
}
