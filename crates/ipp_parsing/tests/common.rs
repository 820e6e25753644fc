#![allow(dead_code)]

use ipp_parsing::parser::{ExitStatus, ParseResult};
use ipp_parsing::program::Program;
use ipp_parsing::stats::Metrics;
use std::fs::File;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes `src` into a temporary source file
pub fn source_file(src: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("could not create temporary file");
    file.write_all(src.as_bytes())
        .expect("could not write temporary file");
    file
}

/// Parses `src` after a round trip through the file system
pub fn parse_file(src: &str) -> ParseResult<(Program, Metrics)> {
    let file = source_file(src);
    let reader = File::open(file.path()).expect("could not open temporary file");
    ipp_parsing::parse_source(reader)
}

pub fn exit_status(src: &str) -> ExitStatus {
    match parse_file(src) {
        Ok(_) => ExitStatus::Success,
        Err(e) => e.exit_status(),
    }
}
