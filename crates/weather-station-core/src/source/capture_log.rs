use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{LineEvent, LineSource, SourceError};

/// Line source over a recorded relay log (or any buffered reader).
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected: radio
/// noise regularly corrupts capture lines, and those are discarded later by
/// the decoder.
pub struct CaptureLogSource<R = BufReader<File>> {
    reader: R,
    line_number: u64,
    buf: Vec<u8>,
}

impl CaptureLogSource<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> CaptureLogSource<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            line_number: 0,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for CaptureLogSource<R> {
    fn next_line(&mut self) -> Result<Option<LineEvent>, SourceError> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let text = String::from_utf8_lossy(&self.buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        Ok(Some(LineEvent {
            line_number: self.line_number,
            text,
        }))
    }
}
