use std::io;
use std::io::{BufRead, BufReader, Read};

/// Decodes a forward-only byte stream as UTF-8, one character at a time
#[derive(Debug)]
pub struct CharReader<R> {
    reader: BufReader<R>,
}

impl<R: Read> CharReader<R> {
    /// Creates a new char reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Reads the next character, `None` at the end of the stream.
    ///
    /// Malformed UTF-8 is reported as [io::ErrorKind::InvalidData].
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        let Some(lead) = self.read_byte()? else {
            return Ok(None);
        };
        let width = match lead {
            0x00..=0x7F => return Ok(Some(char::from(lead))),
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return Err(invalid_utf8()),
        };
        let mut bytes = [lead, 0, 0, 0];
        for byte in bytes.iter_mut().take(width).skip(1) {
            *byte = self.read_byte()?.ok_or_else(invalid_utf8)?;
        }
        std::str::from_utf8(&bytes[..width])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            .chars()
            .next()
            .map(Some)
            .ok_or_else(invalid_utf8)
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        loop {
            let byte = match self.reader.fill_buf() {
                Ok([]) => None,
                Ok([first, ..]) => Some(*first),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if byte.is_some() {
                self.reader.consume(1);
            }
            return Ok(byte);
        }
    }
}

fn invalid_utf8() -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8")
}
