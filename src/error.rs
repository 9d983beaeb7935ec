use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    /// The value does not fit in the requested number of bytes.
    #[error("value {value:#x} needs {needed} bytes but the key width is {width}")]
    IntegerOverflow {
        value: u64,
        width: usize,
        needed: usize,
    },
}
