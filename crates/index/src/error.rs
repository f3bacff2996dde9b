use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("attention record {record} references missing input token {index}")]
    DanglingInputIndex { record: usize, index: usize },

    #[error("attention record {record} references missing output token {index}")]
    DanglingOutputIndex { record: usize, index: usize },

    #[error("invalid input range: start={start}, end={end}")]
    InvalidRange { start: usize, end: usize },
}
