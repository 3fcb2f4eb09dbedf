//! brief - turns RSS feeds into length-controlled article summaries.
//!
//! The pipeline has four stages with data flowing strictly one way:
//!
//! 1. [`feed::FeedFetcher`] retrieves raw feed bytes (scheme normalization,
//!    bounded staleness caching)
//! 2. [`feed::parse_feed`] scans them into ordered [`feed::FeedItem`]s,
//!    tolerant of missing and malformed fields
//! 3. [`content::ContentExtractor`] reduces an article page to bounded plain
//!    text with graceful fallback for pages that don't use paragraph markup
//! 4. [`summarizer::Summarizer`] gates on minimum content and dispatches to
//!    an external text-generation backend
//!
//! Inputs are adversarial by default: malformed markup degrades output
//! quality but never crashes the caller. Only transport faults and backend
//! faults become errors, and those carry short stable messages with the
//! diagnostics kept in the logs.
//!
//! [`Pipeline`] wires the stages together from a [`Config`].

pub mod config;
pub mod content;
pub mod feed;
mod http;
pub mod pipeline;
pub mod summarizer;

pub use config::Config;
pub use pipeline::Pipeline;
