use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("No page has been started")]
    NoPage,
    #[error("Font '{0}' has not been registered")]
    UnknownFont(String),
    #[error("Invalid font data for '{name}': {message}")]
    InvalidFont { name: String, message: String },
    #[error("Unsupported image data for '{src}': {message}")]
    InvalidImage { src: String, message: String },
    #[error("The document has already been ended")]
    Ended,
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
