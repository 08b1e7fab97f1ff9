use std::sync::Once;

use log::LevelFilter;

/// Crates whose info output is per-frame noise for a presentation loop.
const NOISY_MODULES: &[&str] = &["wgpu_core", "wgpu_hal", "naga"];

/// Logger configuration.
///
/// `env_filter` uses the `env_logger` filter syntax (e.g. "info",
/// "lumen_engine=debug,wgpu=warn") and replaces both `RUST_LOG` and the
/// built-in default.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            env_filter: Some(filter.into()),
            ..Self::default()
        }
    }

    fn builder(&self, rust_log: Option<String>) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();
        match self.env_filter.clone().or(rust_log) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(LevelFilter::Info);
                for module in NOISY_MODULES {
                    builder.filter_module(module, LevelFilter::Warn);
                }
            }
        }
        builder.write_style(self.write_style);
        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
///
/// Filter precedence: `config.env_filter`, then `RUST_LOG`, then `info` with
/// the wgpu internals held at `warn`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let rust_log = std::env::var("RUST_LOG").ok();
        // A test harness may already own the global logger.
        if config.builder(rust_log).try_init().is_ok() {
            log::debug!("logging initialized");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    use log::Log;

    fn enabled(logger: &env_logger::Logger, target: &str, level: log::Level) -> bool {
        logger.enabled(&log::Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn default_quiets_wgpu_internals() {
        let logger = LoggingConfig::default().builder(None).build();
        assert!(enabled(&logger, "lumen_engine", log::Level::Info));
        assert!(!enabled(&logger, "lumen_engine", log::Level::Debug));
        assert!(!enabled(&logger, "wgpu_core::device", log::Level::Info));
        assert!(enabled(&logger, "wgpu_hal", log::Level::Warn));
    }

    #[test]
    fn explicit_filter_beats_rust_log() {
        let logger = LoggingConfig::with_filter("debug")
            .builder(Some("error".into()))
            .build();
        assert_eq!(logger.filter(), LevelFilter::Debug);
    }

    #[test]
    fn rust_log_used_when_no_filter() {
        let logger = LoggingConfig::default().builder(Some("trace".into())).build();
        assert_eq!(logger.filter(), LevelFilter::Trace);
    }
}
