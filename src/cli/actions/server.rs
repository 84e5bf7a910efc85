use crate::api::{self, GatewayConfig};
use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::provider::ProviderClient;
use anyhow::Result;
use std::sync::Arc;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server {
            port,
            frontend_url,
            oauth_redirect_url,
            reset_redirect_url,
        } => {
            let mut config = GatewayConfig::new(frontend_url);

            if let Some(url) = oauth_redirect_url {
                config = config.with_oauth_redirect_url(url);
            }

            if let Some(url) = reset_redirect_url {
                config = config.with_reset_redirect_url(url);
            }

            let provider = Arc::new(ProviderClient::new(globals)?);

            api::new(port, provider, config).await?;
        }
    }

    Ok(())
}
