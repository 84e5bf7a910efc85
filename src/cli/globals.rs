use secrecy::SecretString;

/// Auth-API path suffix replaced to find the sibling REST API.
const AUTH_PATH_SUFFIX: &str = "/auth/v1";
const REST_PATH_SUFFIX: &str = "/rest/v1";

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_rest_url: String,
    pub provider_key: SecretString,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(purl: String) -> Self {
        Self {
            provider_rest_url: default_rest_url(&purl),
            provider_url: purl,
            provider_key: SecretString::default(),
        }
    }

    pub fn set_key(&mut self, key: SecretString) {
        self.provider_key = key;
    }

    pub fn set_rest_url(&mut self, url: String) {
        self.provider_rest_url = url;
    }
}

/// Derive the REST base URL from the auth base URL when none is given.
fn default_rest_url(provider_url: &str) -> String {
    let trimmed = provider_url.trim_end_matches('/');
    if let Some(base) = trimmed.strip_suffix(AUTH_PATH_SUFFIX) {
        format!("{base}{REST_PATH_SUFFIX}")
    } else {
        format!("{trimmed}/rest")
    }
}
