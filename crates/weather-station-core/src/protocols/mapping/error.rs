use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("no code matches tokens at offset {offset}: '{remaining}'")]
    Unmapped { offset: usize, remaining: String },
}
