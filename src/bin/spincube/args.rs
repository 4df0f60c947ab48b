use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use spincube::logging::LoggingConfig;
use spincube::{ConfigError, ViewerConfig};

#[derive(Debug, Parser)]
#[command(about = "Drag with the mouse or a finger to rotate a colored cube")]
pub struct Args {
    /// JSON5 file with viewer settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Initial window width in pixels
    #[arg(long)]
    pub width: Option<u32>,
    /// Initial window height in pixels
    #[arg(long)]
    pub height: Option<u32>,
    /// Radians of rotation per dragged pixel
    #[arg(short, long)]
    pub speed: Option<f32>,
    /// Log filter in env_logger syntax, overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,
    /// When to color log output
    #[arg(long, value_enum, default_value_t = ColorArg::Auto)]
    pub color: ColorArg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorArg {
    Auto,
    Always,
    Never,
}

impl From<ColorArg> for env_logger::WriteStyle {
    fn from(c: ColorArg) -> Self {
        match c {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

impl Args {
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.log.clone(),
            write_style: self.color.into(),
        }
    }

    /// Config file (or defaults) with command line overrides applied.
    pub fn viewer_config(&self) -> Result<ViewerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::load_from_path(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(speed) = self.speed {
            config.rotation_speed = speed;
        }

        config.validate()?;

        Ok(config)
    }
}
