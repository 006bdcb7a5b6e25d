use log::info;

use crate::config::Config;

/// Initialize the process logger.
///
/// Per-attempt probe diagnostics are emitted at info level so a run is
/// traceable by default; `RUST_LOG` overrides the filter.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init()
        .ok();
}

/// Log the tier layout resolved at startup.
pub fn log_config_info(config: &Config) {
    info!(
        "Tiers: direct, proxy={}, api={}",
        if config.proxy_base.is_some() { "on" } else { "off" },
        if config.api_key.is_some() { "on" } else { "off" },
    );
    info!(
        "Limits: timeout={}s, connections={}, api_permits={}",
        config.timeout, config.max_connections, config.api_permits
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent() {
        // The global logger can only be installed once per process;
        // repeated initialization must not panic.
        init_logger();
        init_logger();
    }

    #[test]
    fn test_log_config_info_does_not_panic() {
        log_config_info(&Config::default());
    }
}
