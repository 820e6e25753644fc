#![doc = include_str!("../README.md")]

use crate::parser::{ParseResult, Parser};
use crate::program::Program;
use crate::stats::Metrics;
use std::io::Read;

pub mod instruction_set;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod program;
pub mod stats;

/// Parses a program without producing any output, returning it with all of its statistics.
pub fn parse_source<R: Read>(reader: R) -> ParseResult<(Program, Metrics)> {
    let parsed = Parser::new(reader, ()).parse()?;
    Ok((parsed.program, parsed.stats.finalize()))
}

/// Parses a program held in memory
pub fn parse_str(src: &str) -> ParseResult<(Program, Metrics)> {
    parse_source(src.as_bytes())
}
