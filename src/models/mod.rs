//! Data models for the keyword catalog.
//!
//! This module contains the canonical record shape and the types derived from it.

mod filter;
mod keyword;
mod statistics;
mod taxonomy;

pub use filter::KeywordFilter;
pub use keyword::{Keyword, KeywordUpdate};
pub use statistics::KeywordStatistics;
pub use taxonomy::{Category, Depth};
