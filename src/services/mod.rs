//! Business logic services.
//!
//! Services orchestrate storage backends and provide high-level operations.

mod keyword;

pub use keyword::KeywordService;
