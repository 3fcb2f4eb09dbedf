//! Summarization: the length gate, the backend client, and the error
//! collapse that keeps backend internals out of caller-visible failures.
//!
//! - [`backend`] - JSON client for the external text-generation service
//! - [`orchestrator`] - extract → gate → dispatch for a single article

mod backend;
mod orchestrator;

pub use backend::{BackendError, SummaryBackend, SummaryLength, SummaryRequest, SummaryResult};
pub use orchestrator::{SummarizationError, SummarizeError, Summarizer};
