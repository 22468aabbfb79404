// src/error.rs
use inkpage_render_core::{EmissionError, WriterError};
use inkpage_style::{FontStyle, StyleError};
use inkpage_traits::ResourceError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A required attribute that an annotated node did not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingAttribute {
    FontFamily,
    FontList,
    ImageSource,
}

impl fmt::Display for MissingAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MissingAttribute::FontFamily => "No family attribute found on font",
            MissingAttribute::FontList => "No fonts found on Font node",
            MissingAttribute::ImageSource => "No src attribute found on image",
        })
    }
}

fn document_count_message(found: &usize) -> String {
    match found {
        0 => "No document found".to_string(),
        n => format!("Multiple documents found ({})", n),
    }
}

/// The single error type of a render. The first failure aborts the render
/// and is returned as-is.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{}", document_count_message(.found))]
    DocumentCount { found: usize },

    #[error("Failed to parse JSON: {raw} ({reason})")]
    OptionParse { raw: String, reason: String },

    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    #[error("{0}")]
    MissingAttribute(MissingAttribute),

    #[error("Font family not found: {family}")]
    FamilyNotFound { family: String },

    #[error("Font not found: {family} {style} {weight}")]
    VariantNotFound {
        family: String,
        style: FontStyle,
        weight: u16,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("Document writer did not signal completion within {0:?}")]
    EmissionTimeout(Duration),

    #[error("Document writer was dropped before signalling completion")]
    EmissionAbandoned,

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Writer error: {0}")]
    Writer(#[from] WriterError),

    #[error("Style error: {0}")]
    Style(#[from] StyleError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<EmissionError> for RenderError {
    fn from(e: EmissionError) -> Self {
        match e {
            EmissionError::Timeout(grace) => RenderError::EmissionTimeout(grace),
            EmissionError::Abandoned => RenderError::EmissionAbandoned,
        }
    }
}

impl From<quick_xml::Error> for RenderError {
    fn from(e: quick_xml::Error) -> Self {
        RenderError::Markup(e.to_string())
    }
}

impl From<handlebars::RenderError> for RenderError {
    fn from(e: handlebars::RenderError) -> Self {
        RenderError::Template(e.to_string())
    }
}

impl From<handlebars::TemplateError> for RenderError {
    fn from(e: handlebars::TemplateError) -> Self {
        RenderError::Template(e.to_string())
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::Config(e.to_string())
    }
}
