//! Image source adapters. Implement ImageSourcePort.

pub mod encode;
pub mod fs_source;

pub use fs_source::FsImageSource;
