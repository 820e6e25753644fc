//! Responsible with converting a [Read] obj into a token stream

use crate::instruction_set::{InstructionSet, HEADER};
use crate::lexer::char_reader::CharReader;
use crate::lexer::classifier::{classify, is_identifier_start};
use crate::lexer::disambiguation::Disambiguator;
use ipp_tokens::position::Position;
use ipp_tokens::token::{Token, TokenKind};
use std::io;
use std::io::Read;
use tracing::trace;

mod char_reader;
pub mod classifier;
pub mod disambiguation;

/// The states of the scanner's finite state machine
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum State {
    Init,
    Comment,
    CarriageReturnPending,
    Newline,
    PrologCandidate,
    RawToken,
    Eof,
}

/// Converts a character stream into classified tokens.
///
/// Call [next_token](Scanner::next_token) until it returns [TokenKind::Eof]; further calls keep
/// returning `Eof`. An [TokenKind::Error] token means the input is lexically invalid, nothing
/// after it should be trusted.
///
/// # Examples
/// ```
/// # use ipp_parsing::lexer::Scanner;
/// # use ipp_tokens::token::TokenKind;
/// let mut scanner = Scanner::new(".IPPcode22\nJUMP label\n".as_bytes());
/// let kinds = std::iter::from_fn(|| Some(scanner.next_token().unwrap().kind()))
///     .take_while(|kind| *kind != TokenKind::Eof)
///     .collect::<Vec<_>>();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::Prolog,
///         TokenKind::Newline,
///         TokenKind::Opcode,
///         TokenKind::Label,
///         TokenKind::Newline,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Scanner<R> {
    reader: CharReader<R>,
    instructions: InstructionSet,
    disambiguator: Disambiguator,
    /// one character of pushback, `Some(None)` holds a pushed back end of input
    pushback: Option<Option<char>>,
    buffer: String,
    cursor: Position,
    last_position: Position,
    comment_lines: usize,
    reached_eof: bool,
}

impl<R: Read> Scanner<R> {
    /// Creates a new scanner for the IPPcode22 instruction set
    pub fn new(reader: R) -> Self {
        Self::with_instruction_set(reader, InstructionSet::ippcode22())
    }

    /// Creates a new scanner recognizing the mnemonics of `instructions`
    pub fn with_instruction_set(reader: R, instructions: InstructionSet) -> Self {
        Self {
            reader: CharReader::new(reader),
            instructions,
            disambiguator: Disambiguator::new(),
            pushback: None,
            buffer: String::new(),
            cursor: Position::default(),
            last_position: Position::default(),
            comment_lines: 0,
            reached_eof: false,
        }
    }

    /// The start of the most recently produced token
    pub fn position(&self) -> Position {
        self.last_position
    }

    /// The instruction set used to recognize mnemonics
    pub fn instruction_set(&self) -> &InstructionSet {
        &self.instructions
    }

    /// How many comments have been seen so far
    pub fn comment_lines(&self) -> usize {
        self.comment_lines
    }

    /// Reads the next token.
    ///
    /// Errors are only returned when the underlying reader fails, lexical problems are reported as
    /// [TokenKind::Error] tokens.
    pub fn next_token(&mut self) -> io::Result<Token> {
        let token = self.scan()?;
        self.last_position = token.position();
        trace!("scanned {token:?}");
        Ok(token)
    }

    fn scan(&mut self) -> io::Result<Token> {
        if self.reached_eof {
            return Ok(Token::bare(TokenKind::Eof, self.cursor));
        }
        let mut state = State::Init;
        let mut start = self.cursor;
        loop {
            state = match state {
                State::Init => {
                    start = self.cursor;
                    match self.read_char()? {
                        None => State::Eof,
                        Some(' ' | '\t') => {
                            self.cursor.advance(1);
                            State::Init
                        }
                        Some('#') => {
                            self.comment_lines += 1;
                            self.cursor.advance(1);
                            State::Comment
                        }
                        Some('\r') => State::CarriageReturnPending,
                        Some('\n') => State::Newline,
                        Some('.') => {
                            self.buffer.push('.');
                            State::PrologCandidate
                        }
                        Some(c) if is_identifier_start(c) => {
                            self.buffer.push(c);
                            State::RawToken
                        }
                        Some(c) => {
                            self.cursor.advance(1);
                            return Ok(Token::new(TokenKind::Error, c, start));
                        }
                    }
                }
                State::Comment => match self.read_char()? {
                    c @ (None | Some('\r' | '\n')) => {
                        self.push_back(c);
                        State::Init
                    }
                    Some(_) => {
                        self.cursor.advance(1);
                        State::Comment
                    }
                },
                State::CarriageReturnPending => {
                    match self.read_char()? {
                        Some('\n') => {}
                        other => self.push_back(other),
                    }
                    State::Newline
                }
                State::Newline => {
                    self.cursor.next_row();
                    self.disambiguator.start_line();
                    return Ok(Token::bare(TokenKind::Newline, start));
                }
                State::PrologCandidate | State::RawToken => {
                    let c = self.read_char()?;
                    match c {
                        Some(c) if !is_boundary(c) => {
                            self.buffer.push(c);
                            state
                        }
                        boundary => {
                            self.push_back(boundary);
                            let text = self.clear_buffer();
                            let kind = if state == State::PrologCandidate {
                                self.prolog_kind(&text)
                            } else {
                                self.raw_token_kind(&text)
                            };
                            return Ok(Token::new(kind, text, start));
                        }
                    }
                }
                State::Eof => {
                    self.reached_eof = true;
                    return Ok(Token::bare(TokenKind::Eof, start));
                }
            };
        }
    }

    fn prolog_kind(&self, text: &str) -> TokenKind {
        if HEADER.contains(text) {
            TokenKind::Prolog
        } else {
            TokenKind::Error
        }
    }

    fn raw_token_kind(&mut self, text: &str) -> TokenKind {
        let candidates = classify(text, &self.instructions);
        let kind = self.disambiguator.resolve(&candidates);
        if kind == TokenKind::Opcode {
            if let Some(signature) = self.instructions.lookup(text) {
                self.disambiguator.expect_arguments(signature);
            }
        }
        kind
    }

    /// Takes the accumulated token text, moving the cursor past it
    fn clear_buffer(&mut self) -> String {
        self.cursor.advance(self.buffer.chars().count());
        std::mem::take(&mut self.buffer)
    }

    fn read_char(&mut self) -> io::Result<Option<char>> {
        match self.pushback.take() {
            Some(c) => Ok(c),
            None => self.reader.read_char(),
        }
    }

    fn push_back(&mut self, c: Option<char>) {
        debug_assert!(self.pushback.is_none(), "only one character can be pushed back");
        self.pushback = Some(c);
    }
}

/// Characters that end a token without being part of it
fn is_boundary(c: char) -> bool {
    matches!(c, ' ' | '\t' | '#' | '\r' | '\n')
}
