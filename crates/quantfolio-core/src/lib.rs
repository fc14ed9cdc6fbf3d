//! Core types and traits for price-series ingestion.
//!
//! This crate provides the foundational building blocks including:
//! - Price data types (PricePoint, SymbolSeries, CombinedTable)
//! - The fixed symbol universe shared by every component
//! - Error taxonomy for parsing, sources and session handling
//! - Capability traits for fetching static content and reading uploads

pub mod types;
pub mod traits;
pub mod error;

pub use error::{ParseError, SessionError, SourceError};
pub use types::*;
pub use traits::*;
