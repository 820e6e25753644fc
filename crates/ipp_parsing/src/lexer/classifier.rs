//! Classifies the text of a raw token into every token kind it could be.
//!
//! Classification is a pure function of the text. Several kinds may fit the same text (`add` is
//! both a mnemonic and a valid label name), choosing between them is left to the
//! [Disambiguator](super::disambiguation::Disambiguator).

use crate::instruction_set::{InstructionSet, FRAME_CODES, TYPE_KEYWORDS};
use ipp_tokens::token::{TokenKind, PREFIX_SEPARATOR};
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1, take_while_m_n};
use nom::character::complete::{alpha1, char, one_of, satisfy};
use nom::combinator::{all_consuming, opt, recognize, value, verify};
use nom::error::{Error, ErrorKind};
use nom::multi::many0_count;
use nom::sequence::{pair, separated_pair, terminated};
use nom::IResult;
use std::fmt::{Debug, Formatter};

type Result<'a, O> = IResult<&'a str, O>;

/// Symbols that may appear in identifiers next to letters
const IDENTIFIER_SYMBOLS: &str = "_-$&%*!?";

/// Checks if `c` can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || IDENTIFIER_SYMBOLS.contains(c)
}

/// Checks if `c` can appear after the first character of an identifier
pub fn is_identifier_continue(c: char) -> bool {
    is_identifier_start(c) || c.is_ascii_digit()
}

/// The kinds a piece of text may be, ordered from most to least preferred:
/// opcode, variable, type keyword, literal, label.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Candidates(Vec<TokenKind>);

impl Candidates {
    /// The most preferred candidate
    pub fn first(&self) -> Option<TokenKind> {
        self.0.first().copied()
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[TokenKind] {
        &self.0
    }
}

impl FromIterator<TokenKind> for Candidates {
    fn from_iter<T: IntoIterator<Item = TokenKind>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Debug for Candidates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(&self.0).finish()
    }
}

/// Classifies `text`, returning every kind it satisfies. An empty result means the text is a
/// lexical error.
pub fn classify(text: &str, instructions: &InstructionSet) -> Candidates {
    let mut candidates = Vec::with_capacity(2);
    if instructions.is_mnemonic(text) {
        candidates.push(TokenKind::Opcode);
    }
    if matches_fully(variable, text) {
        candidates.push(TokenKind::Variable);
    }
    if TYPE_KEYWORDS.contains(text) {
        candidates.push(TokenKind::TypeKeyword);
    }
    if let Ok((_, kind)) = all_consuming(literal)(text) {
        candidates.push(kind);
    }
    if matches_fully(identifier, text) {
        candidates.push(TokenKind::Label);
    }
    Candidates(candidates)
}

fn matches_fully<'a, O>(parser: fn(&'a str) -> Result<'a, O>, text: &'a str) -> bool {
    all_consuming(parser)(text).is_ok()
}

/// `[start][continue]*`
pub(crate) fn identifier(src: &str) -> Result<&str> {
    recognize(pair(
        satisfy(is_identifier_start),
        many0_count(satisfy(is_identifier_continue)),
    ))(src)
}

fn frame_code(src: &str) -> Result<&str> {
    verify(alpha1, |code: &str| FRAME_CODES.contains(code))(src)
}

/// `<frame>@<identifier>`
fn variable(src: &str) -> Result<&str> {
    recognize(separated_pair(frame_code, char(PREFIX_SEPARATOR), identifier))(src)
}

fn type_name(src: &str) -> Result<&str> {
    verify(alpha1, |name: &str| TYPE_KEYWORDS.contains(name))(src)
}

/// `<type>@<payload>`, where the payload grammar depends on the type
fn literal(src: &str) -> Result<TokenKind> {
    let (payload, type_name) = terminated(type_name, char(PREFIX_SEPARATOR))(src)?;
    match type_name {
        "int" => value(TokenKind::IntLiteral, int_payload)(payload),
        "bool" => value(TokenKind::BoolLiteral, alt((tag("true"), tag("false"))))(payload),
        "nil" => value(TokenKind::NilLiteral, tag("nil"))(payload),
        "string" => value(TokenKind::StringLiteral, string_payload)(payload),
        _ => Err(nom::Err::Error(Error::new(src, ErrorKind::Verify))),
    }
}

/// A digit accepted by `first`, then groups of digits accepted by `rest`, each group optionally
/// preceded by a single `_`.
fn digit_groups(src: &str, first: fn(char) -> bool, rest: fn(char) -> bool) -> Result<&str> {
    recognize(pair(
        satisfy(first),
        many0_count(pair(opt(char('_')), take_while1(rest))),
    ))(src)
}

fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

fn is_nonzero_digit(c: char) -> bool {
    matches!(c, '1'..='9')
}

fn hexadecimal(src: &str) -> Result<&str> {
    recognize(pair(tag_no_case("0x"), |i| {
        digit_groups(i, |c| c.is_ascii_hexdigit(), |c| c.is_ascii_hexdigit())
    }))(src)
}

fn octal(src: &str) -> Result<&str> {
    recognize(pair(alt((tag_no_case("0o"), tag("0"))), |i| {
        digit_groups(i, is_octal_digit, is_octal_digit)
    }))(src)
}

fn decimal(src: &str) -> Result<&str> {
    digit_groups(src, is_nonzero_digit, |c| c.is_ascii_digit())
}

fn int_payload(src: &str) -> Result<&str> {
    alt((
        tag("nil"),
        recognize(pair(
            opt(one_of("+-")),
            alt((hexadecimal, octal, decimal, tag("0"))),
        )),
    ))(src)
}

/// `\` followed by exactly three decimal digits
fn escape_sequence(src: &str) -> Result<&str> {
    recognize(pair(
        char('\\'),
        take_while_m_n(3, 3, |c: char| c.is_ascii_digit()),
    ))(src)
}

fn is_plain_string_char(c: char) -> bool {
    u32::from(c) > 0x20 && c != '\\'
}

fn string_payload(src: &str) -> Result<&str> {
    recognize(many0_count(alt((
        escape_sequence,
        recognize(satisfy(is_plain_string_char)),
    ))))(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn classified(text: &str) -> Vec<TokenKind> {
        classify(text, &InstructionSet::ippcode22()).as_slice().to_vec()
    }

    #[test]
    fn test_mnemonic_is_also_a_label() {
        assert_eq!(classified("MOVE"), [Opcode, Label]);
        assert_eq!(classified("jumpIfEq"), [Opcode, Label]);
    }

    #[test]
    fn test_type_keyword_is_also_a_label() {
        assert_eq!(classified("int"), [TypeKeyword, Label]);
        assert_eq!(classified("Int"), [Label]);
    }

    #[test]
    fn test_variables() {
        assert_eq!(classified("GF@x1"), [Variable]);
        assert_eq!(classified("TF@_-$&%*!?"), [Variable]);
        assert!(classified("XF@x1").is_empty());
        assert!(classified("gf@x").is_empty());
        assert!(classified("GF@1x").is_empty());
        assert!(classified("GF@").is_empty());
    }

    #[test]
    fn test_labels() {
        assert_eq!(classified("loop-start"), [Label]);
        assert_eq!(classified("?what!"), [Label]);
        assert!(classified("x.y").is_empty());
    }

    #[test]
    fn test_int_literals() {
        for ok in [
            "int@0", "int@-0", "int@42", "int@+42", "int@1_000", "int@0x1F", "int@0XdEaD_bEeF",
            "int@0o17", "int@017", "int@-0o7_7", "int@nil",
        ] {
            assert_eq!(classified(ok), [IntLiteral], "{ok} should be an int");
        }
        for bad in [
            "int@", "int@08", "int@0x", "int@1__0", "int@1_", "int@_1", "int@0o8", "int@12a",
            "int@--1", "int@true",
        ] {
            assert!(classified(bad).is_empty(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_bool_and_nil_literals() {
        assert_eq!(classified("bool@true"), [BoolLiteral]);
        assert_eq!(classified("bool@false"), [BoolLiteral]);
        assert!(classified("bool@TRUE").is_empty());
        assert!(classified("bool@nil").is_empty());
        assert_eq!(classified("nil@nil"), [NilLiteral]);
        assert!(classified("nil@").is_empty());
        assert!(classified("nil@null").is_empty());
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(classified("string@"), [StringLiteral]);
        assert_eq!(classified("string@hello"), [StringLiteral]);
        assert_eq!(classified("string@a\\065b"), [StringLiteral]);
        assert_eq!(classified("string@\\0351"), [StringLiteral]);
        assert_eq!(classified("string@příliš@žluťoučký"), [StringLiteral]);
        assert!(classified("string@a b").is_empty());
        assert!(classified("string@a\u{7}").is_empty());
        assert!(classified("string@\\06").is_empty());
        assert!(classified("string@\\").is_empty());
        assert!(classified("string@\\x41").is_empty());
    }

    #[test]
    fn test_unknown_prefix() {
        assert!(classified("float@1.0").is_empty());
        assert!(classified("String@x").is_empty());
    }
}
