//! Article content retrieval and extraction.
//!
//! [`extractor`] owns the network side and the extraction pipeline;
//! [`html`] holds the pure tag-pair scanning primitives it composes, kept
//! separate so they are testable without a server.

mod extractor;
mod html;

pub use extractor::{ContentExtractor, ContentFetchError, ExtractedContent};
