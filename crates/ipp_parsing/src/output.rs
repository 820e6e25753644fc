//! Consumers of validated instructions

use std::io;

mod xml;

pub use xml::XmlBuilder;

/// Receives the structure of a program as the parser validates it.
///
/// Calls arrive in document order: [init_doc](OutputBuilder::init_doc) once, then for every
/// instruction a [start_instruction](OutputBuilder::start_instruction), one
/// [print_argument](OutputBuilder::print_argument) per argument and an
/// [end_instruction](OutputBuilder::end_instruction), then [end_doc](OutputBuilder::end_doc).
/// [flush](OutputBuilder::flush) is only called by the owner once the whole program is known to be
/// valid, so a failed parse never produces partial output.
pub trait OutputBuilder {
    fn init_doc(&mut self);

    /// Starts an instruction. `opcode` is upper case, `order` starts at 1.
    fn start_instruction(&mut self, opcode: &str, order: usize);

    /// Adds an argument to the current instruction. `kind` is one of `var`, `string`, `int`,
    /// `bool`, `nil`, `type` or `label`.
    fn print_argument(&mut self, index: usize, kind: &str, value: &str);

    fn end_instruction(&mut self);

    fn end_doc(&mut self);

    /// Writes out everything built so far
    fn flush(&mut self) -> io::Result<()>;
}

/// Discards everything
impl OutputBuilder for () {
    fn init_doc(&mut self) {}

    fn start_instruction(&mut self, _opcode: &str, _order: usize) {}

    fn print_argument(&mut self, _index: usize, _kind: &str, _value: &str) {}

    fn end_instruction(&mut self) {}

    fn end_doc(&mut self) {}

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<B: OutputBuilder + ?Sized> OutputBuilder for &mut B {
    fn init_doc(&mut self) {
        (**self).init_doc()
    }

    fn start_instruction(&mut self, opcode: &str, order: usize) {
        (**self).start_instruction(opcode, order)
    }

    fn print_argument(&mut self, index: usize, kind: &str, value: &str) {
        (**self).print_argument(index, kind, value)
    }

    fn end_instruction(&mut self) {
        (**self).end_instruction()
    }

    fn end_doc(&mut self) {
        (**self).end_doc()
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}
