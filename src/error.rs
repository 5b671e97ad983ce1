use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid date detected in row {row}: {value}")]
    InvalidDate { row: usize, value: String },

    #[error("Empty payee detected in row {row}")]
    EmptyPayee { row: usize },

    #[error("Invalid amount detected in row {row}: {value}")]
    InvalidAmount { row: usize, value: String },

    #[error("Row {row} has no column {column}")]
    MissingColumn { row: usize, column: usize },

    #[error("Ledger file not specified and LEDGER_FILE environment variable not set")]
    MissingLedger,

    #[error("Column indices are 1-based, got {0}")]
    InvalidColumn(usize),

    #[error("Delimiter must be a single byte, got {0:?}")]
    InvalidDelimiter(String),

    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("Input is not valid {encoding}")]
    Decode { encoding: String },

    #[error("Input closed while waiting for a payee")]
    PromptClosed,
}

impl ImportError {
    /// Attach the source row number to a row-level validation error.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            Self::InvalidDate { value, .. } => Self::InvalidDate { row, value },
            Self::InvalidAmount { value, .. } => Self::InvalidAmount { row, value },
            Self::EmptyPayee { .. } => Self::EmptyPayee { row },
            Self::MissingColumn { column, .. } => Self::MissingColumn { row, column },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
