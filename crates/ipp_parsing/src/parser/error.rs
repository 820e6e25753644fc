use crate::instruction_set::ArgSlot;
use ipp_tokens::position::Position;
use ipp_tokens::token::TokenKind;
use ipp_tokens::PositionedError;
use std::io;
use std::process::ExitCode;

/// How a run ended, as reported to the caller
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ExitStatus {
    Success = 0,
    InvalidProlog = 21,
    InvalidOpcode = 22,
    OtherSyntaxOrLexicalError = 23,
    InternalSetupError = 99,
}

impl ExitStatus {
    /// The process exit code for this status
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(value: ExitStatus) -> Self {
        ExitCode::from(value.code())
    }
}

/// [ParseError] kind
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("expected header .IPPcode22, got {0:?}")]
    InvalidProlog(String),
    #[error("expected an instruction, got {0:?}")]
    InvalidOpcode(String),
    #[error("expected {expected}, got {kind} {found:?}")]
    UnexpectedArgument {
        expected: ArgSlot,
        found: String,
        kind: TokenKind,
    },
    #[error("expected the end of the line, got {kind} {found:?}")]
    MissingNewline { found: String, kind: TokenKind },
    #[error("invalid token {0:?}")]
    Lexical(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ErrorKind {
    /// How this error is reported to the caller
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ErrorKind::InvalidProlog(_) => ExitStatus::InvalidProlog,
            ErrorKind::InvalidOpcode(_) => ExitStatus::InvalidOpcode,
            ErrorKind::UnexpectedArgument { .. }
            | ErrorKind::MissingNewline { .. }
            | ErrorKind::Lexical(_) => ExitStatus::OtherSyntaxOrLexicalError,
            ErrorKind::Io(_) => ExitStatus::InternalSetupError,
        }
    }
}

/// Represents an error occurring during parsing. Only I/O failures have no position.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ParseError(#[from] PositionedError<ErrorKind>);

impl ParseError {
    /// Creates a new error
    pub fn new(kind: ErrorKind, position: impl Into<Option<Position>>) -> Self {
        Self(PositionedError::new(kind, position))
    }

    pub fn kind(&self) -> &ErrorKind {
        self.0.error()
    }

    /// Where in the source the error was found
    pub fn position(&self) -> Option<Position> {
        self.0.location()
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.kind().exit_status()
    }
}

impl From<io::Error> for ParseError {
    fn from(value: io::Error) -> Self {
        Self::new(ErrorKind::Io(value), None)
    }
}

pub type ParseResult<T = ()> = Result<T, ParseError>;
