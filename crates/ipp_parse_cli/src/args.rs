//! the args for running ipp-parse

use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use ipp_cli_common::LoggingArgs;
use ipp_parsing::stats::{DuplicateDestination, Metric, StatRequest};
use itertools::Itertools;
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(
    author,
    version,
    about = "Checks IPPcode22 source code and prints it as an XML document"
)]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Read the source from a file instead of standard input
    #[clap(short = 'i', long = "input", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub input: Option<PathBuf>,

    /// Write statistics about the program into a file, one value per line.
    ///
    /// The metric flags following this option select what is written, in the order given. May be
    /// given several times, but every file at most once.
    #[clap(long = "stats", value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    stats: Vec<PathBuf>,

    #[command(flatten)]
    metrics: MetricFlags,

    /// `--stats` files with the metric flags that followed them
    #[clap(skip)]
    targets: Vec<StatsTarget>,
}

/// Metric flags, each applying to the closest `--stats` option before it
#[derive(Debug, Clone, Default, clap::Args)]
#[command(next_help_heading = "Statistics")]
pub struct MetricFlags {
    /// Number of instructions
    #[clap(long, action = ArgAction::Count)]
    loc: u8,
    /// Number of comments
    #[clap(long, action = ArgAction::Count)]
    comments: u8,
    /// Number of distinct labels defined
    #[clap(long, action = ArgAction::Count)]
    labels: u8,
    /// Number of jumps, calls and returns
    #[clap(long, action = ArgAction::Count)]
    jumps: u8,
    /// Number of jumps to a label defined later
    #[clap(long, visible_alias = "fwdjumps", action = ArgAction::Count)]
    fwjumps: u8,
    /// Number of jumps to a label defined earlier
    #[clap(long, action = ArgAction::Count)]
    backjumps: u8,
    /// Number of jumps to labels that are never defined
    #[clap(long, action = ArgAction::Count)]
    badjumps: u8,
}

impl MetricFlags {
    /// How many times the flag of `metric` was given
    pub fn count(&self, metric: Metric) -> u8 {
        match metric {
            Metric::Loc => self.loc,
            Metric::Comments => self.comments,
            Metric::Labels => self.labels,
            Metric::Jumps => self.jumps,
            Metric::FwJumps => self.fwjumps,
            Metric::BackJumps => self.backjumps,
            Metric::BadJumps => self.badjumps,
        }
    }

    /// Whether any metric flag was given
    pub fn any(&self) -> bool {
        Metric::iter().any(|metric| self.count(metric) > 0)
    }
}

impl Args {
    /// Parses a whole command line, program name included.
    ///
    /// Besides what clap checks, `--help` must be given alone and every metric flag must follow a
    /// `--stats` option.
    pub fn try_from_command_line<I, T>(command_line: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let command_line = command_line
            .into_iter()
            .map(Into::into)
            .collect::<Vec<OsString>>();
        let words = words(&command_line);
        if words.contains(&Word::Help) && command_line.len() > 2 {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "--help can not be combined with other options",
            ));
        }
        let mut args = Self::try_parse_from(&command_line)?;
        args.targets = args.group_metrics(&words)?;
        Ok(args)
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.logging.log_level_filter()
    }

    /// Collects every `--stats` option, in the order they were given. A metric repeated for the
    /// same file is written once.
    pub fn stat_request(&self) -> Result<StatRequest, DuplicateDestination> {
        let mut request = StatRequest::new();
        for target in &self.targets {
            request.add(
                target.destination.clone(),
                target.metrics.iter().copied().unique(),
            )?;
        }
        Ok(request)
    }

    fn group_metrics(&self, words: &[Word]) -> Result<Vec<StatsTarget>, clap::Error> {
        if !self.metrics.any() {
            return Ok(self
                .stats
                .iter()
                .map(|destination| StatsTarget {
                    destination: destination.clone(),
                    metrics: vec![],
                })
                .collect());
        }
        // clap keeps the values of an option in command line order
        let mut destinations = self.stats.iter();
        let mut targets: Vec<StatsTarget> = vec![];
        for word in words {
            match word {
                Word::Help => {}
                Word::Stats => {
                    if let Some(destination) = destinations.next() {
                        targets.push(StatsTarget {
                            destination: destination.clone(),
                            metrics: vec![],
                        });
                    }
                }
                Word::Metric(metric) => match targets.last_mut() {
                    Some(target) => target.metrics.push(*metric),
                    None => {
                        return Err(Self::command().error(
                            ErrorKind::ArgumentConflict,
                            format!("--{metric} must follow a --stats FILE option"),
                        ))
                    }
                },
            }
        }
        Ok(targets)
    }
}

/// A single `--stats` option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsTarget {
    pub destination: PathBuf,
    pub metrics: Vec<Metric>,
}

/// The parts of a command line whose placement matters
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Word {
    Help,
    Stats,
    Metric(Metric),
}

/// Finds help, `--stats` and metric flags in a command line, skipping option values
fn words(command_line: &[OsString]) -> Vec<Word> {
    let mut words = vec![];
    let mut iter = command_line.iter().skip(1);
    while let Some(arg) = iter.next() {
        let Some(arg) = arg.to_str() else {
            continue;
        };
        if let Some(long) = arg.strip_prefix("--") {
            match long {
                "" => break,
                "help" => words.push(Word::Help),
                "stats" => {
                    iter.next();
                    words.push(Word::Stats);
                }
                "input" => {
                    iter.next();
                }
                "fwdjumps" => words.push(Word::Metric(Metric::FwJumps)),
                _ if long.starts_with("stats=") => words.push(Word::Stats),
                _ => {
                    if let Ok(metric) = Metric::from_str(long) {
                        words.push(Word::Metric(metric));
                    }
                }
            }
        } else if let Some(shorts) = arg.strip_prefix('-') {
            for (idx, c) in shorts.char_indices() {
                match c {
                    'h' => words.push(Word::Help),
                    'i' => {
                        if idx + 1 == shorts.len() {
                            iter.next();
                        }
                        break;
                    }
                    _ => {}
                }
            }
        }
    }
    words
}
