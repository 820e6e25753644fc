#![doc = include_str!("../README.md")]

use clap::{value_parser, ArgAction, Args};

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct LoggingArgs {
    /// Log more, may be repeated
    #[clap(short = 'v', long = "verbose", value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="quiet")]
    verbose: u8,
    /// Log less, may be repeated
    #[clap(short = 'q', long = "quiet", value_parser = value_parser!(u8).range(0..=2), action=ArgAction::Count, conflicts_with="verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// How far the level was moved from the default, negative when quieter
    pub fn verbosity(&self) -> i8 {
        self.verbose.min(2) as i8 - self.quiet.min(2) as i8
    }

    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used. Only warnings and
    /// errors are shown by default.
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        match self.verbosity() {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            2..=i8::MAX => LevelFilter::TRACE,
        }
    }
}
