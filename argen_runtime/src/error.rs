use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("No connection has been set; call `use_connection` during program setup")]
    NotConnected,
    #[error("A connection has already been set for this handle")]
    AlreadyConnected,
    #[error("Query returned no rows")]
    NoRows,
    #[error("Row has no column at index {0}")]
    ColumnIndex(usize),
    #[error("Cannot convert {found} value into {expected}")]
    Conversion {
        expected: &'static str,
        found: &'static str,
    },
    #[error("Scope `{0}` was never registered")]
    UnknownScope(String),
    #[error(transparent)]
    Driver(#[from] Box<dyn std::error::Error + Send + Sync>),
}
