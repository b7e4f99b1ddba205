//! Core domain layer. No external I/O dependencies.
//!
//! Entities, the critique parser, and business errors live here.
//! Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod parser;

pub use entities::{
    CaptureOrigin, CapturedImage, Line, LineKind, PickOutcome, Section, SessionState,
};
pub use errors::DomainError;
pub use parser::parse_sections;
