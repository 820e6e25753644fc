//! A lexical token from a source file

use crate::position::Position;
use std::fmt::{Debug, Display, Formatter};
use strum::EnumIter;

/// The separator between a prefix (frame code or literal type) and its payload
pub const PREFIX_SEPARATOR: char = '@';

/// A lexical token from a source file
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    raw: String,
    position: Position,
}

impl Token {
    /// Creates a new token
    pub fn new(kind: TokenKind, raw: impl Into<String>, position: Position) -> Self {
        let raw = raw.into();
        debug_assert!(
            !raw.is_empty() || kind.may_be_empty(),
            "{kind:?} tokens must carry their text"
        );
        Self {
            kind,
            raw,
            position,
        }
    }

    /// Creates a token without any text, such as [TokenKind::Eof] or [TokenKind::Newline]
    pub fn bare(kind: TokenKind, position: Position) -> Self {
        Self::new(kind, String::new(), position)
    }

    /// Gets the kind for this token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The text of this token exactly as it appeared in the source
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Where this token starts
    pub fn position(&self) -> Position {
        self.position
    }

    /// The text after the first `@`, or the whole text if there is no `@`.
    pub fn purified_value(&self) -> &str {
        match self.raw.split_once(PREFIX_SEPARATOR) {
            Some((_, payload)) => payload,
            None => &self.raw,
        }
    }

    /// The value of this token when used as an instruction argument.
    ///
    /// Variables keep their frame code, literals lose their type prefix.
    pub fn argument_value(&self) -> &str {
        if self.kind.is_literal() {
            self.purified_value()
        } else {
            &self.raw
        }
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({:?})@{}", self.kind, self.raw, self.position)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "{}", self.raw),
        }
    }
}

/// The kind for a token.
///
/// The display form is a human readable description used in diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumIter, strum::Display)]
pub enum TokenKind {
    #[strum(serialize = "instruction")]
    Opcode,
    #[strum(serialize = "string")]
    StringLiteral,
    #[strum(serialize = "integer")]
    IntLiteral,
    #[strum(serialize = "bool")]
    BoolLiteral,
    #[strum(serialize = "nil")]
    NilLiteral,
    #[strum(serialize = "type specifier")]
    TypeKeyword,
    #[strum(serialize = "label")]
    Label,
    #[strum(serialize = "variable")]
    Variable,
    #[strum(serialize = "header")]
    Prolog,
    /// new line
    #[strum(serialize = "start of a new line")]
    Newline,
    /// EOF, will only appear at the end of a token stream
    #[strum(serialize = "end of file")]
    Eof,
    #[strum(serialize = "invalid token")]
    Error,
}

impl TokenKind {
    /// All literal kinds
    pub const LITERALS: [TokenKind; 4] = [
        TokenKind::StringLiteral,
        TokenKind::IntLiteral,
        TokenKind::BoolLiteral,
        TokenKind::NilLiteral,
    ];

    /// Whether this kind is a typed constant
    pub fn is_literal(&self) -> bool {
        Self::LITERALS.contains(self)
    }

    /// Tokens of these kinds are allowed to have no text
    pub fn may_be_empty(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Eof | TokenKind::Error)
    }

    /// The canonical argument type name, if tokens of this kind can be instruction arguments
    pub fn argument_type(&self) -> Option<&'static str> {
        match self {
            TokenKind::Variable => Some("var"),
            TokenKind::StringLiteral => Some("string"),
            TokenKind::IntLiteral => Some("int"),
            TokenKind::BoolLiteral => Some("bool"),
            TokenKind::NilLiteral => Some("nil"),
            TokenKind::TypeKeyword => Some("type"),
            TokenKind::Label => Some("label"),
            _ => None,
        }
    }
}
