//! Authentication command.

use tracing::info;
use xbar_gcal_providers::CalendarProvider;
use xbar_gcal_providers::google::{GoogleProvider, TokenStorage};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Runs the Google consent flow and stores the token.
///
/// With a usable token already stored nothing happens unless `force` is set.
pub async fn google(config: &ClientConfig, force: bool) -> ClientResult<()> {
    let provider = provider(config, force)?;
    let token_path = provider.config().token_path.clone();

    if provider.is_authenticated() && !force {
        println!("Already authorized, token at {}.", token_path.display());
        println!("Use --force to authorize again.");
        return Ok(());
    }

    println!("A browser window will open to authorize read-only calendar access.");
    println!("If it does not, open the URL printed below.");
    println!();

    provider.authenticate().await?;

    info!("Google authorization stored at {}", token_path.display());
    println!("Authorization successful, token saved to {}.", token_path.display());
    Ok(())
}

/// Builds the provider. With `force` the stored token is removed first, so
/// a corrupt token file cannot stand in the way of a new one.
fn provider(config: &ClientConfig, force: bool) -> ClientResult<GoogleProvider> {
    let provider_config = config.google.to_provider_config();
    if force {
        TokenStorage::new(&provider_config.token_path).clear()?;
    }
    Ok(GoogleProvider::new(provider_config)?)
}
