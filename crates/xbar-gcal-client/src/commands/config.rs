//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Writes the effective configuration as TOML, resolved paths included.
pub fn dump(config: &ClientConfig, path: &Path, mut out: impl Write) -> ClientResult<()> {
    writeln!(out, "# config.toml ({})", path.display())?;
    writeln!(
        out,
        "# credentials: {}",
        config.google.credentials_file().display()
    )?;
    writeln!(out, "# token: {}", config.google.token_path().display())?;
    write!(out, "{}", config.to_toml()?)?;
    Ok(())
}

/// Validates the configuration and the credentials file it points at.
pub fn validate(config: &ClientConfig, mut out: impl Write) -> ClientResult<()> {
    config.validate()?;
    let provider_config = config.google.to_provider_config();
    provider_config.validate()?;
    provider_config.credentials.load()?;
    writeln!(out, "Configuration is valid.")?;
    Ok(())
}

/// Writes the configuration file path.
pub fn path(path: &Path, mut out: impl Write) -> ClientResult<()> {
    writeln!(out, "{}", path.display())?;
    Ok(())
}
