//! Infrastructure adapters. Implement outbound ports and the UI.
//!
//! Vision API, filesystem image sources, terminal UI. Map infrastructure
//! errors to DomainError.

pub mod ai;
pub mod image_source;
pub mod ui;
