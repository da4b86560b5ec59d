use thiserror::Error;

#[derive(Error, Debug)]
pub enum PadError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Keyboard calibration failed: {0}")]
    Calibration(String),

    #[error("Expected {required} touch points, found {found}")]
    TouchCount { required: usize, found: usize },

    #[error("Invalid calibration point '{0}'")]
    InvalidPoint(String),
}

pub type PadResult<T> = Result<T, PadError>;
