//! Validates the token stream of a program.
//!
//! The parser pulls tokens from a [Scanner] with one token of lookahead. It checks the header,
//! then each instruction against its [Signature], forwarding validated instructions to an
//! [OutputBuilder] and a [StatCollector]. The first error ends the parse.

use crate::instruction_set::{InstructionSet, Signature};
use crate::lexer::Scanner;
use crate::output::OutputBuilder;
use crate::program::{Argument, Instruction, Program};
use crate::stats::StatCollector;
use ipp_tokens::token::{Token, TokenKind};
use std::io::Read;
use tracing::{debug, instrument, trace};

mod error;

pub use error::*;

/// Everything produced by a successful parse
#[derive(Debug)]
pub struct Parsed<B> {
    pub program: Program,
    pub builder: B,
    /// The collector, ready to be [finalized](StatCollector::finalize)
    pub stats: StatCollector,
}

/// Parses IPPcode22 source.
///
/// # Examples
/// ```
/// # use ipp_parsing::parser::{ExitStatus, Parser};
/// let parsed = Parser::new(".IPPcode22\nWRITE string@hi\n".as_bytes(), ()).parse().unwrap();
/// assert_eq!(parsed.program.instructions()[0].opcode(), "WRITE");
///
/// let error = Parser::new(".IPPcode22\nWRITE\n".as_bytes(), ()).parse().unwrap_err();
/// assert_eq!(error.exit_status(), ExitStatus::OtherSyntaxOrLexicalError);
/// ```
#[derive(Debug)]
pub struct Parser<R, B> {
    scanner: Scanner<R>,
    instruction_set: InstructionSet,
    builder: B,
    stats: StatCollector,
    lookahead: Option<Token>,
    program: Program,
    order: usize,
}

impl<R: Read, B: OutputBuilder> Parser<R, B> {
    /// Creates a new parser reading from `reader`
    pub fn new(reader: R, builder: B) -> Self {
        Self::from_scanner(Scanner::new(reader), builder)
    }

    /// Creates a new parser with a given scanner. Every parser collects statistics into its own,
    /// fresh [StatCollector].
    pub fn from_scanner(scanner: Scanner<R>, builder: B) -> Self {
        Self {
            instruction_set: *scanner.instruction_set(),
            scanner,
            builder,
            stats: StatCollector::new(),
            lookahead: None,
            program: Program::default(),
            order: 0,
        }
    }

    /// Parses the whole input.
    ///
    /// Blank input, with or without a header, is a valid empty program.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(mut self) -> ParseResult<Parsed<B>> {
        self.builder.init_doc();
        self.skip_newlines()?;
        if self.peek()?.kind() != TokenKind::Eof {
            self.prolog()?;
            while self.instruction_separator()? {
                self.instruction()?;
            }
        }
        self.builder.end_doc();
        self.stats
            .record_comment_lines(self.scanner.comment_lines());
        debug!(
            "parsed {} instructions",
            self.program.instructions().len()
        );
        Ok(Parsed {
            program: self.program,
            builder: self.builder,
            stats: self.stats,
        })
    }

    fn prolog(&mut self) -> ParseResult {
        let token = self.next()?;
        match token.kind() {
            TokenKind::Prolog => Ok(()),
            _ => Err(ParseError::new(
                ErrorKind::InvalidProlog(token.to_string()),
                token.position(),
            )),
        }
    }

    /// Consumes the line break after the previous line and any blank lines.
    ///
    /// Returns `false` once the input is exhausted.
    fn instruction_separator(&mut self) -> ParseResult<bool> {
        let token = self.next()?;
        match token.kind() {
            TokenKind::Eof => return Ok(false),
            TokenKind::Newline => {}
            kind => {
                return Err(ParseError::new(
                    ErrorKind::MissingNewline {
                        found: token.to_string(),
                        kind,
                    },
                    token.position(),
                ))
            }
        }
        self.skip_newlines()?;
        Ok(self.peek()?.kind() != TokenKind::Eof)
    }

    fn instruction(&mut self) -> ParseResult {
        let opcode = self.next()?;
        let signature = self.signature(&opcode)?;
        let arguments = signature
            .slots()
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let token = self.next()?;
                if !slot.accepts(token.kind()) {
                    return Err(ParseError::new(
                        ErrorKind::UnexpectedArgument {
                            expected: *slot,
                            found: token.to_string(),
                            kind: token.kind(),
                        },
                        token.position(),
                    ));
                }
                Ok(Argument::from_token(idx + 1, &token))
            })
            .collect::<ParseResult<Vec<_>>>()?;

        self.order += 1;
        let instruction = Instruction::new(self.order, signature, opcode.position(), arguments);
        trace!("validated {instruction:?}");
        self.builder
            .start_instruction(instruction.opcode(), instruction.order());
        for argument in instruction.arguments() {
            self.builder
                .print_argument(argument.index(), argument.type_name(), argument.value());
        }
        self.builder.end_instruction();
        self.stats.record(&instruction);
        self.program.push(instruction);
        Ok(())
    }

    fn signature(&self, token: &Token) -> ParseResult<&'static Signature> {
        let signature = match token.kind() {
            TokenKind::Opcode => self.instruction_set.lookup(token.raw()),
            _ => None,
        };
        signature.ok_or_else(|| {
            ParseError::new(
                ErrorKind::InvalidOpcode(token.to_string()),
                token.position(),
            )
        })
    }

    fn skip_newlines(&mut self) -> ParseResult {
        while self.peek()?.kind() == TokenKind::Newline {
            self.next()?;
        }
        Ok(())
    }

    fn peek(&mut self) -> ParseResult<&Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.scan()?,
        };
        Ok(self.lookahead.insert(token))
    }

    fn next(&mut self) -> ParseResult<Token> {
        match self.lookahead.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    /// Reads a token from the scanner, lexical errors end the parse
    fn scan(&mut self) -> ParseResult<Token> {
        let token = self.scanner.next_token()?;
        if token.kind() == TokenKind::Error {
            return Err(ParseError::new(
                ErrorKind::Lexical(token.raw().to_string()),
                token.position(),
            ));
        }
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::XmlBuilder;
    use test_log::test;

    fn parse(src: &str) -> ParseResult<Parsed<()>> {
        Parser::new(src.as_bytes(), ()).parse()
    }

    fn exit_status(src: &str) -> ExitStatus {
        match parse(src) {
            Ok(_) => ExitStatus::Success,
            Err(e) => e.exit_status(),
        }
    }

    #[test]
    fn test_blank_programs() {
        for src in ["", "\n\n\n", "# only a comment\n", ".IPPcode22", ".IPPcode22\n\n"] {
            let parsed = parse(src).unwrap_or_else(|e| panic!("{src:?} should parse: {e}"));
            assert!(parsed.program.is_empty());
        }
    }

    #[test]
    fn test_prolog_required() {
        assert_eq!(exit_status("foo\n"), ExitStatus::InvalidProlog);
        assert_eq!(exit_status("MOVE GF@x int@1\n"), ExitStatus::InvalidProlog);
        assert_eq!(
            exit_status(".IPPcode22 .IPPcode22\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
    }

    #[test]
    fn test_unknown_opcode() {
        let error = parse(".IPPcode22\nBADOP\n").unwrap_err();
        assert_eq!(error.exit_status(), ExitStatus::InvalidOpcode);
        assert_eq!(error.position().map(|p| (p.row(), p.col())), Some((2, 1)));
        assert_eq!(
            exit_status(".IPPcode22\nGF@x\n"),
            ExitStatus::InvalidOpcode
        );
    }

    #[test]
    fn test_argument_count() {
        assert_eq!(
            exit_status(".IPPcode22\nMOVE GF@x\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
        assert_eq!(
            exit_status(".IPPcode22\nMOVE GF@x int@1 int@2\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
        assert_eq!(
            exit_status(".IPPcode22\nBREAK BREAK\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
    }

    #[test]
    fn test_argument_kinds() {
        let error = parse(".IPPcode22\nDEFVAR int@1\n").unwrap_err();
        assert!(matches!(
            error.kind(),
            ErrorKind::UnexpectedArgument {
                kind: TokenKind::IntLiteral,
                ..
            }
        ));
        assert_eq!(
            exit_status(".IPPcode22\nJUMP GF@x\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
        assert_eq!(
            exit_status(".IPPcode22\nREAD GF@x float\n"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
    }

    #[test]
    fn test_lexical_error_wins() {
        let error = parse(".IPPcode22\nWRITE string@a\\x\n").unwrap_err();
        assert!(matches!(error.kind(), ErrorKind::Lexical(raw) if raw == "string@a\\x"));
        assert_eq!(
            exit_status("\n\n;"),
            ExitStatus::OtherSyntaxOrLexicalError
        );
    }

    #[test]
    fn test_arguments_are_recorded() {
        let parsed = parse(".IPPcode22\nJUMPIFEQ end GF@x bool@true\nREAD LF@y string\n").unwrap();
        let instructions = parsed.program.instructions();
        assert_eq!(instructions.len(), 2);
        let args = instructions[0]
            .arguments()
            .iter()
            .map(|a| (a.index(), a.type_name(), a.value()))
            .collect::<Vec<_>>();
        assert_eq!(
            args,
            [(1, "label", "end"), (2, "var", "GF@x"), (3, "bool", "true")]
        );
        assert_eq!(instructions[1].order(), 2);
        assert_eq!(instructions[1].arguments()[1].type_name(), "type");
    }

    #[test]
    fn test_builder_receives_instructions() {
        let mut builder = XmlBuilder::new(Vec::new());
        Parser::new(".IPPcode22\nmove GF@a nil@nil\n".as_bytes(), &mut builder)
            .parse()
            .unwrap();
        assert!(builder
            .document()
            .contains("<instruction order=\"1\" opcode=\"MOVE\">"));
        assert!(builder.document().contains("<arg2 type=\"nil\">nil</arg2>"));
    }

    #[test]
    fn test_stats_are_collected() {
        let parsed = parse(".IPPcode22 # header\nLABEL a\nJUMP a # back\nJUMP b\n").unwrap();
        let metrics = parsed.stats.finalize();
        assert_eq!(metrics.lines_of_code, 3);
        assert_eq!(metrics.comment_lines, 2);
        assert_eq!(metrics.backward_jumps, 1);
        assert_eq!(metrics.dangling_jumps, 1);
    }

    #[test]
    fn test_repeated_parses_do_not_share_stats() {
        let src = ".IPPcode22\nLABEL a\nJUMP a\n";
        let first = parse(src).unwrap().stats.finalize();
        let second = parse(src).unwrap().stats.finalize();
        assert_eq!(first, second);
        assert_eq!(second.lines_of_code, 2);
        assert_eq!(second.backward_jumps, 1);
    }
}
