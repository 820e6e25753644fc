use crate::output::OutputBuilder;
use std::io;
use std::io::Write;

const INDENT: &str = "\t";

/// Builds the XML representation of a program in memory, writing it out on
/// [flush](OutputBuilder::flush).
///
/// # Examples
/// ```
/// # use ipp_parsing::output::{OutputBuilder, XmlBuilder};
/// let mut builder = XmlBuilder::new(Vec::new());
/// builder.init_doc();
/// builder.start_instruction("WRITE", 1);
/// builder.print_argument(1, "string", "a<b");
/// builder.end_instruction();
/// builder.end_doc();
/// builder.flush().unwrap();
/// let xml = String::from_utf8(builder.into_inner()).unwrap();
/// assert!(xml.contains("<arg1 type=\"string\">a&lt;b</arg1>"));
/// ```
#[derive(Debug)]
pub struct XmlBuilder<W: Write> {
    output: W,
    document: String,
    /// set while an instruction has been opened but has no children yet
    open_instruction: Option<String>,
}

impl<W: Write> XmlBuilder<W> {
    /// Creates a builder that writes to `output`
    pub fn new(output: W) -> Self {
        Self {
            output,
            document: String::new(),
            open_instruction: None,
        }
    }

    /// Gets the output back
    pub fn into_inner(self) -> W {
        self.output
    }

    /// The document as built so far
    pub fn document(&self) -> &str {
        &self.document
    }

    fn line(&mut self, depth: usize, content: &str) {
        for _ in 0..depth {
            self.document.push_str(INDENT);
        }
        self.document.push_str(content);
        self.document.push('\n');
    }
}

impl<W: Write> OutputBuilder for XmlBuilder<W> {
    fn init_doc(&mut self) {
        self.document.clear();
        self.line(0, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        self.line(0, r#"<program language="IPPcode22">"#);
    }

    fn start_instruction(&mut self, opcode: &str, order: usize) {
        self.open_instruction = Some(format!(
            r#"<instruction order="{order}" opcode="{}""#,
            escape(&opcode.to_uppercase())
        ));
    }

    fn print_argument(&mut self, index: usize, kind: &str, value: &str) {
        if let Some(open) = self.open_instruction.take() {
            self.line(1, &format!("{open}>"));
        }
        let element = format!(
            r#"<arg{index} type="{}">{}</arg{index}>"#,
            escape(kind),
            escape(value)
        );
        self.line(2, &element);
    }

    fn end_instruction(&mut self) {
        match self.open_instruction.take() {
            Some(open) => self.line(1, &format!("{open}/>")),
            None => self.line(1, "</instruction>"),
        }
    }

    fn end_doc(&mut self) {
        self.line(0, "</program>");
    }

    fn flush(&mut self) -> io::Result<()> {
        self.output.write_all(self.document.as_bytes())?;
        self.output.flush()
    }
}

/// Replaces the characters XML reserves with entity references
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
