//! The validated form of an IPPcode22 program

use crate::instruction_set::{OpcodeClass, Signature};
use ipp_tokens::position::Position;
use ipp_tokens::token::{Token, TokenKind};

/// A single validated instruction argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    index: usize,
    kind: TokenKind,
    value: String,
}

impl Argument {
    pub(crate) fn from_token(index: usize, token: &Token) -> Self {
        Self {
            index,
            kind: token.kind(),
            value: token.argument_value().to_string(),
        }
    }

    /// The 1-based position of this argument within its instruction
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The canonical type name (`var`, `int`, `label`, ...)
    pub fn type_name(&self) -> &'static str {
        self.kind.argument_type().unwrap_or("unknown")
    }

    /// The argument value, literals without their type prefix
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An instruction whose arguments match its signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    order: usize,
    signature: &'static Signature,
    position: Position,
    arguments: Vec<Argument>,
}

impl Instruction {
    pub(crate) fn new(
        order: usize,
        signature: &'static Signature,
        position: Position,
        arguments: Vec<Argument>,
    ) -> Self {
        Self {
            order,
            signature,
            position,
            arguments,
        }
    }

    /// The 1-based order of this instruction in the program
    pub fn order(&self) -> usize {
        self.order
    }

    /// The upper case mnemonic
    pub fn opcode(&self) -> &'static str {
        self.signature.mnemonic()
    }

    pub fn signature(&self) -> &'static Signature {
        self.signature
    }

    pub fn class(&self) -> OpcodeClass {
        self.signature.class()
    }

    /// Where the mnemonic of this instruction appears in the source
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    /// The label this instruction defines or transfers control to
    pub fn label(&self) -> Option<&str> {
        self.arguments
            .first()
            .filter(|arg| arg.kind() == TokenKind::Label)
            .map(Argument::value)
    }
}

/// A sequence of instructions, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub(crate) fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
