// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Timeouts, DNS, undecodable bodies

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // Any non-2xx answer

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("Server returned an empty body")]
    EmptyResponse,
}

/// Reasons a DOM lookup inside one row can fail.
///
/// Mandatory fields abort the row on these, optional fields just go absent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Row has no cell at index {0}")]
    MissingCell(usize),

    #[error("First cell has no image element")]
    MissingImage,

    #[error("Second cell has no emphasized name")]
    MissingName,

    #[error("Image source path is empty")]
    EmptyImageUrl,

    #[error("Image path '{0}' cannot be joined onto the page URL")]
    BadImagePath(String),

    #[error("Contact cell has no email trigger anchor")]
    MissingEmailTrigger,

    #[error("Email trigger anchor has no data-id")]
    MissingEmailId,

    #[error("No role text after a line break")]
    MissingRole,

    #[error("No phone label in contact text")]
    PhoneNotFound,

    #[error("Phone digits '{0}' are not a number")]
    InvalidPhone(String),
}

/// Tagged failure of the email round trip.
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email lookup skipped: {0}")]
    Extract(#[from] ExtractError),

    #[error("Email request failed: {0}")]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Directory site interaction failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
