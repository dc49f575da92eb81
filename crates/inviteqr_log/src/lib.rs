//! `inviteqr_log` v1:
//! Process-wide `tracing` subscriber setup for hosts of the kernel crates.
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const C_ENV_LOG_FILTER: &str = "INVITEQR_LOG";
/// Level used when neither the caller nor the environment sets one.
pub const C_LOG_LEVEL_DEFAULT: &str = "info";

/// Build the filter: `INVITEQR_LOG` if set and valid, else `level`.
pub fn derive_env_filter(level: &str) -> Result<EnvFilter, String> {
    if let Ok(filter) = EnvFilter::try_from_env(C_ENV_LOG_FILTER) {
        return Ok(filter);
    }
    let c_level = if level.trim().is_empty() {
        C_LOG_LEVEL_DEFAULT
    } else {
        level.trim()
    };
    EnvFilter::try_new(c_level).map_err(|e| format!("Invalid log level {c_level:?}: {e}"))
}

/// Install a formatted stderr subscriber.
///
/// Returns `Ok(false)` when a global subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<bool, String> {
    let filter = derive_env_filter(level)?;
    let if_installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok();
    if if_installed {
        tracing::debug!("tracing subscriber installed");
    }
    Ok(if_installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_env_filter_rejects_bad_directive() {
        // Only meaningful when the environment does not override the level.
        if std::env::var_os(C_ENV_LOG_FILTER).is_none() {
            assert!(derive_env_filter("info").is_ok());
            assert!(derive_env_filter("").is_ok());
            assert!(derive_env_filter("inviteqr=loud").is_err());
        }
    }

    #[test]
    fn init_tracing_is_idempotent() {
        init_tracing("warn").expect("init");
        assert_eq!(init_tracing("warn"), Ok(false));
    }
}
