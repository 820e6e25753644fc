//! The fixed tables of the IPPcode22 language: mnemonics with their argument signatures, and the
//! small vocabularies (frame codes, type keywords, header) the scanner recognizes.

use ipp_tokens::token::TokenKind;
use std::fmt::{Debug, Formatter};

/// Whether a vocabulary is matched with or without regard to letter case
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Case {
    Sensitive,
    Insensitive,
}

/// A closed set of words with an explicit case rule
#[derive(Debug, Copy, Clone)]
pub struct Vocabulary {
    words: &'static [&'static str],
    case: Case,
}

impl Vocabulary {
    pub const fn new(words: &'static [&'static str], case: Case) -> Self {
        Self { words, case }
    }

    /// Finds the canonical spelling of `text` in this vocabulary
    pub fn find(&self, text: &str) -> Option<&'static str> {
        self.words.iter().copied().find(|word| match self.case {
            Case::Sensitive => *word == text,
            Case::Insensitive => word.eq_ignore_ascii_case(text),
        })
    }

    /// Checks whether `text` is in this vocabulary
    pub fn contains(&self, text: &str) -> bool {
        self.find(text).is_some()
    }
}

/// Storage frames a variable can live in
pub const FRAME_CODES: Vocabulary = Vocabulary::new(&["GF", "LF", "TF"], Case::Sensitive);

/// Names usable as a type argument
pub const TYPE_KEYWORDS: Vocabulary =
    Vocabulary::new(&["int", "string", "bool", "nil"], Case::Sensitive);

/// The header every program must start with
pub const HEADER: Vocabulary = Vocabulary::new(&[".IPPcode22"], Case::Insensitive);

/// The expected kind of one argument position
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display)]
pub enum ArgSlot {
    /// A variable
    #[strum(serialize = "variable")]
    Var,
    /// A variable or any constant
    #[strum(serialize = "variable or constant")]
    Symb,
    #[strum(serialize = "label name")]
    Label,
    #[strum(serialize = "type specifier")]
    Type,
}

impl ArgSlot {
    /// The token kinds accepted in this slot, in order of preference
    pub fn kinds(&self) -> &'static [TokenKind] {
        match self {
            ArgSlot::Var => &[TokenKind::Variable],
            ArgSlot::Symb => &[
                TokenKind::Variable,
                TokenKind::StringLiteral,
                TokenKind::IntLiteral,
                TokenKind::BoolLiteral,
                TokenKind::NilLiteral,
            ],
            ArgSlot::Label => &[TokenKind::Label],
            ArgSlot::Type => &[TokenKind::TypeKeyword],
        }
    }

    /// Checks if a token of the given kind may fill this slot
    pub fn accepts(&self, kind: TokenKind) -> bool {
        self.kinds().contains(&kind)
    }
}

/// What an instruction does to control flow, as far as statistics are concerned
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpcodeClass {
    Plain,
    /// Conditional or unconditional jump
    Jump,
    /// Call or return
    Call,
    /// Defines a label
    LabelDefinition,
}

/// The argument signature of a single mnemonic
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    mnemonic: &'static str,
    slots: &'static [ArgSlot],
    class: OpcodeClass,
}

impl Signature {
    const fn new(mnemonic: &'static str, slots: &'static [ArgSlot]) -> Self {
        Self {
            mnemonic,
            slots,
            class: OpcodeClass::Plain,
        }
    }

    const fn with_class(self, class: OpcodeClass) -> Self {
        Self { class, ..self }
    }

    /// The canonical (upper case) mnemonic
    pub fn mnemonic(&self) -> &'static str {
        self.mnemonic
    }

    /// The expected argument slots, in order
    pub fn slots(&self) -> &'static [ArgSlot] {
        self.slots
    }

    pub fn class(&self) -> OpcodeClass {
        self.class
    }

    /// Whether this instruction counts as a jump, call or return
    pub fn is_control_transfer(&self) -> bool {
        matches!(self.class, OpcodeClass::Jump | OpcodeClass::Call)
    }

    /// Whether the first argument of this instruction refers to a label it transfers control to
    pub fn targets_label(&self) -> bool {
        self.is_control_transfer() && self.slots.first() == Some(&ArgSlot::Label)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.mnemonic, self.slots)
    }
}

use ArgSlot::{Label, Symb, Type, Var};

const NONE: &[ArgSlot] = &[];
const VAR: &[ArgSlot] = &[Var];
const SYMB: &[ArgSlot] = &[Symb];
const LABEL: &[ArgSlot] = &[Label];
const VAR_SYMB: &[ArgSlot] = &[Var, Symb];
const VAR_TYPE: &[ArgSlot] = &[Var, Type];
const VAR_SYMB_SYMB: &[ArgSlot] = &[Var, Symb, Symb];
const LABEL_SYMB_SYMB: &[ArgSlot] = &[Label, Symb, Symb];

static IPPCODE22: [Signature; 35] = [
    Signature::new("MOVE", VAR_SYMB),
    Signature::new("CREATEFRAME", NONE),
    Signature::new("PUSHFRAME", NONE),
    Signature::new("POPFRAME", NONE),
    Signature::new("DEFVAR", VAR),
    Signature::new("CALL", LABEL).with_class(OpcodeClass::Call),
    Signature::new("RETURN", NONE).with_class(OpcodeClass::Call),
    Signature::new("PUSHS", SYMB),
    Signature::new("POPS", VAR),
    Signature::new("ADD", VAR_SYMB_SYMB),
    Signature::new("SUB", VAR_SYMB_SYMB),
    Signature::new("MUL", VAR_SYMB_SYMB),
    Signature::new("IDIV", VAR_SYMB_SYMB),
    Signature::new("LT", VAR_SYMB_SYMB),
    Signature::new("GT", VAR_SYMB_SYMB),
    Signature::new("EQ", VAR_SYMB_SYMB),
    Signature::new("AND", VAR_SYMB_SYMB),
    Signature::new("OR", VAR_SYMB_SYMB),
    Signature::new("NOT", VAR_SYMB),
    Signature::new("INT2CHAR", VAR_SYMB),
    Signature::new("STRI2INT", VAR_SYMB_SYMB),
    Signature::new("READ", VAR_TYPE),
    Signature::new("WRITE", SYMB),
    Signature::new("CONCAT", VAR_SYMB_SYMB),
    Signature::new("STRLEN", VAR_SYMB),
    Signature::new("GETCHAR", VAR_SYMB_SYMB),
    Signature::new("SETCHAR", VAR_SYMB_SYMB),
    Signature::new("TYPE", VAR_SYMB),
    Signature::new("LABEL", LABEL).with_class(OpcodeClass::LabelDefinition),
    Signature::new("JUMP", LABEL).with_class(OpcodeClass::Jump),
    Signature::new("JUMPIFEQ", LABEL_SYMB_SYMB).with_class(OpcodeClass::Jump),
    Signature::new("JUMPIFNEQ", LABEL_SYMB_SYMB).with_class(OpcodeClass::Jump),
    Signature::new("EXIT", SYMB),
    Signature::new("DPRINT", SYMB),
    Signature::new("BREAK", NONE),
];

/// An immutable mapping from mnemonic to [Signature]. Lookups ignore letter case.
#[derive(Copy, Clone)]
pub struct InstructionSet {
    signatures: &'static [Signature],
}

impl InstructionSet {
    /// The IPPcode22 instruction set
    pub fn ippcode22() -> Self {
        Self {
            signatures: &IPPCODE22,
        }
    }

    /// Finds the signature of a mnemonic, ignoring case
    pub fn lookup(&self, mnemonic: &str) -> Option<&'static Signature> {
        self.signatures
            .iter()
            .find(|signature| signature.mnemonic.eq_ignore_ascii_case(mnemonic))
    }

    /// Checks whether `text` spells a known mnemonic
    pub fn is_mnemonic(&self, text: &str) -> bool {
        self.lookup(text).is_some()
    }

    pub fn signatures(&self) -> impl Iterator<Item = &'static Signature> {
        self.signatures.iter()
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::ippcode22()
    }
}

impl Debug for InstructionSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.signatures).finish()
    }
}
