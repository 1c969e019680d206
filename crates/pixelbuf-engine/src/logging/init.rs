use env_logger::{Builder, Env};

/// Filter used when neither the config nor `RUST_LOG` names one.
///
/// The GPU stack reports every adapter probe and pipeline at info.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// `env_logger` filter directives, e.g. "pixelbuf_engine=debug".
    /// Takes precedence over `RUST_LOG`.
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: Some(filter.into()),
        }
    }

    fn builder(&self) -> Builder {
        let mut builder = match &self.filter {
            Some(filter) => {
                let mut builder = Builder::new();
                builder.parse_filters(filter);
                builder
            }
            None => Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER)),
        };
        builder.format_timestamp_millis();
        builder
    }
}

/// Installs the global logger.
///
/// Returns `false` when a logger was already installed, by an earlier call
/// or by the host application; that logger stays in place.
pub fn init_logging(config: LoggingConfig) -> bool {
    let installed = config.builder().try_init().is_ok();
    if installed {
        log::debug!("logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_keeps_the_first_logger() {
        let _ = init_logging(LoggingConfig::default());
        assert!(!init_logging(LoggingConfig::with_filter("trace")));
    }

    #[test]
    fn explicit_filter_is_kept() {
        let config = LoggingConfig::with_filter("pixelbuf_engine=debug");
        assert_eq!(config.filter.as_deref(), Some("pixelbuf_engine=debug"));
        assert_eq!(LoggingConfig::default().filter, None);
    }
}
