//! Core writer abstractions for inkpage.
//!
//! This crate provides the contract between the rendering pipeline and a
//! document backend:
//! - `DocumentWriter` trait for the cursor-stateful drawing primitives
//! - `EmissionSink`/`Emission` for delivering the finished bytes
//! - Error types for writer operations
//! - Shared utility functions for text encoding and coordinate conversion

mod emission;
mod error;
mod traits;
mod types;
pub mod utils;

pub use emission::{Emission, EmissionError, EmissionSink, emission_channel};
pub use error::WriterError;
pub use traits::DocumentWriter;
pub use types::{ImagePlacement, TextFlow, TextStyle};
