use crate::args::Args;
use clap::error::ErrorKind as ClapErrorKind;
use ipp_parsing::output::{OutputBuilder, XmlBuilder};
use ipp_parsing::parser::{ExitStatus, ParseError, Parser};
use ipp_parsing::stats::StatReport;
use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;
use std::fs::File;
use std::io;
use std::io::{stderr, stdin, stdout, BufWriter, Read, Write};
use std::process::ExitCode;
use tracing::metadata::LevelFilter;
use tracing::{debug, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};

mod args;

/// Invalid command line arguments
const USAGE_ERROR: u8 = 10;
/// The source file could not be opened
const INPUT_FILE_ERROR: u8 = 11;
/// A statistics file could not be written
const OUTPUT_FILE_ERROR: u8 = 12;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = match Args::try_from_command_line(std::env::args_os()) {
        Ok(args) => args,
        Err(e) if matches!(
            e.kind(),
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
        ) =>
        {
            e.exit()
        }
        Err(e) => {
            e.print()?;
            return Ok(ExitCode::from(USAGE_ERROR));
        }
    };
    init_logging(args.log_level_filter())?;
    trace!("starting ipp-parse with args: {args:?}");
    debug!("ipp-parse version: {}", env!("CARGO_PKG_VERSION"));

    let request = match args.stat_request() {
        Ok(request) => request,
        Err(e) => {
            report_failure("statistics", &e);
            return Ok(ExitCode::from(OUTPUT_FILE_ERROR));
        }
    };

    let input: Box<dyn Read> = match &args.input {
        Some(path) => match File::open(path) {
            Ok(file) => Box::new(file),
            Err(e) => {
                report_failure("input", format_args!("{}: {e}", path.display()));
                return Ok(ExitCode::from(INPUT_FILE_ERROR));
            }
        },
        None => Box::new(stdin().lock()),
    };

    let parsed = match Parser::new(input, XmlBuilder::new(stdout().lock())).parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            report_parse_error(&e);
            return Ok(e.exit_status().into());
        }
    };
    let mut builder = parsed.builder;
    if let Err(e) = builder.flush() {
        report_failure("internal error", format_args!("could not write the document: {e}"));
        return Ok(ExitStatus::InternalSetupError.into());
    }

    let metrics = parsed.stats.finalize();
    if let Err(e) = write_stats(&metrics.report(&request)) {
        report_failure("statistics", &e);
        return Ok(ExitCode::from(OUTPUT_FILE_ERROR));
    }
    Ok(ExitStatus::Success.into())
}

/// Writes every requested metric into its file, one value per line
fn write_stats(report: &StatReport) -> io::Result<()> {
    for (destination, values) in report.iter() {
        debug!("writing {} statistics to {destination:?}", values.len());
        let mut file = BufWriter::new(File::create(destination)?);
        for (_, value) in values {
            writeln!(file, "{value}")?;
        }
        file.flush()?;
    }
    Ok(())
}

fn report_parse_error(error: &ParseError) {
    let category = match error.exit_status() {
        ExitStatus::InvalidProlog => "invalid header",
        ExitStatus::InvalidOpcode => "invalid instruction",
        ExitStatus::InternalSetupError => "internal error",
        _ => "syntax error",
    };
    report_failure(category, error);
}

fn report_failure(category: &str, message: impl Display) {
    let _ = writeln!(
        stderr(),
        "{}: {message}",
        category.if_supports_color(Stream::Stderr, |text| text.red())
    );
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(stderr)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
