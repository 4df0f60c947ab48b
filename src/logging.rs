use std::sync::Once;

/// Logger settings.
///
/// `env_filter` uses the `env_logger` syntax ("info",
/// "spincube=debug,gl_wrapper=warn"). Without it `RUST_LOG` is used, falling
/// back to `info`.
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
    fn builder(&self) -> env_logger::Builder {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &self.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(self.write_style);

        builder
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        config.builder().init();

        log::debug!("logger ready ({:?})", config);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let config = LoggingConfig {
            env_filter: Some(String::from("spincube=trace,gl_wrapper=off")),
            ..Default::default()
        };

        let logger = config.builder().build();

        assert_eq!(logger.filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn repeated_init_is_ignored() {
        init_logging(LoggingConfig::default());
        init_logging(LoggingConfig {
            env_filter: Some(String::from("off")),
            write_style: env_logger::WriteStyle::Never,
        });

        assert!(INIT.is_completed());
    }
}
