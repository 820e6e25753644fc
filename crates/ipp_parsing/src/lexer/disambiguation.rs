//! Chooses one kind for text that classified as several.
//!
//! The disambiguator keeps a queue with one entry per argument slot the current instruction still
//! expects. Each classified token consumes the front entry and takes the first kind of that entry
//! it is a candidate for. Without an entry, or without an overlap, the classifier's own preference
//! order decides.

use crate::instruction_set::Signature;
use crate::lexer::classifier::Candidates;
use ipp_tokens::token::TokenKind;
use std::collections::VecDeque;
use tracing::trace;

/// What is expected at the start of a line
const LINE_START: &[TokenKind] = &[TokenKind::Opcode, TokenKind::Newline];

/// The grammatical context used to resolve ambiguous tokens
#[derive(Debug, Default, Clone)]
pub struct Disambiguator {
    expected: VecDeque<&'static [TokenKind]>,
}

impl Disambiguator {
    /// Creates a disambiguator with no expectations
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks exactly one kind out of `candidates`, consuming one expectation.
    ///
    /// Returns [TokenKind::Error] if there are no candidates.
    pub fn resolve(&mut self, candidates: &Candidates) -> TokenKind {
        let expected = self.expected.pop_front();
        let Some(preferred) = candidates.first() else {
            return TokenKind::Error;
        };
        let chosen = expected
            .and_then(|expected| {
                expected
                    .iter()
                    .copied()
                    .find(|kind| candidates.contains(*kind))
            })
            .unwrap_or(preferred);
        if candidates.len() > 1 {
            trace!("resolved {candidates:?} to {chosen:?} (expected {expected:?})");
        }
        chosen
    }

    /// Queues one expectation per argument slot of `signature`
    pub fn expect_arguments(&mut self, signature: &Signature) {
        self.expected
            .extend(signature.slots().iter().map(|slot| slot.kinds()));
    }

    /// Forgets pending expectations, a new line starts with an opcode or is blank
    pub fn start_line(&mut self) {
        self.expected.clear();
        self.expected.push_back(LINE_START);
    }

    /// The number of expectations still queued
    pub fn pending(&self) -> usize {
        self.expected.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction_set::InstructionSet;
    use TokenKind::*;

    fn candidates(kinds: &[TokenKind]) -> Candidates {
        kinds.iter().copied().collect()
    }

    #[test]
    fn test_no_context_uses_preference_order() {
        let mut disambiguator = Disambiguator::new();
        assert_eq!(disambiguator.resolve(&candidates(&[Opcode, Label])), Opcode);
        assert_eq!(
            disambiguator.resolve(&candidates(&[TypeKeyword, Label])),
            TypeKeyword
        );
    }

    #[test]
    fn test_empty_candidates_are_errors() {
        let mut disambiguator = Disambiguator::new();
        disambiguator.start_line();
        assert_eq!(disambiguator.resolve(&candidates(&[])), Error);
        assert_eq!(disambiguator.pending(), 0);
    }

    #[test]
    fn test_label_slot_prefers_label() {
        let set = InstructionSet::ippcode22();
        let mut disambiguator = Disambiguator::new();
        disambiguator.start_line();
        assert_eq!(disambiguator.resolve(&candidates(&[Opcode, Label])), Opcode);
        disambiguator.expect_arguments(set.lookup("JUMP").unwrap());
        assert_eq!(disambiguator.resolve(&candidates(&[Opcode, Label])), Label);
        assert_eq!(disambiguator.pending(), 0);
    }

    #[test]
    fn test_type_slot_after_variable() {
        let set = InstructionSet::ippcode22();
        let mut disambiguator = Disambiguator::new();
        disambiguator.start_line();
        disambiguator.resolve(&candidates(&[Opcode, Label]));
        disambiguator.expect_arguments(set.lookup("READ").unwrap());
        assert_eq!(disambiguator.resolve(&candidates(&[Variable])), Variable);
        assert_eq!(
            disambiguator.resolve(&candidates(&[TypeKeyword, Label])),
            TypeKeyword
        );
    }

    #[test]
    fn test_mismatched_expectation_falls_back() {
        let set = InstructionSet::ippcode22();
        let mut disambiguator = Disambiguator::new();
        disambiguator.expect_arguments(set.lookup("DEFVAR").unwrap());
        assert_eq!(disambiguator.resolve(&candidates(&[Opcode, Label])), Opcode);
    }

    #[test]
    fn test_start_line_discards_leftovers() {
        let set = InstructionSet::ippcode22();
        let mut disambiguator = Disambiguator::new();
        disambiguator.expect_arguments(set.lookup("ADD").unwrap());
        assert_eq!(disambiguator.pending(), 3);
        disambiguator.start_line();
        assert_eq!(disambiguator.pending(), 1);
    }
}
