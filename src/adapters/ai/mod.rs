//! AI adapter module. Implements VisionPort for vision-LLM integration.
//!
//! Provides an OpenAI-compatible adapter and a mock adapter for offline use.

pub mod mock_adapter;
pub mod openai_adapter;

pub use mock_adapter::MockVisionAdapter;
pub use openai_adapter::OpenAiVisionAdapter;
