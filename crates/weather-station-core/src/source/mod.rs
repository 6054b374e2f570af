mod capture_log;

pub use capture_log::CaptureLogSource;

use thiserror::Error;

/// One line received from the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEvent {
    /// 1-based line number within the source.
    pub line_number: u64,
    /// Line text without the trailing line terminator.
    pub text: String,
}

pub trait LineSource {
    fn next_line(&mut self) -> Result<Option<LineEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
