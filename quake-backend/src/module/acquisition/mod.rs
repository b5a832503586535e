//! Acquisition chain
//!
//! Fetches the raw report through an ordered list of sources (direct,
//! local relay, public relay) and falls back to bundled sample records
//! when none of them yields at least one parsed earthquake.

pub mod chain;
pub mod fallback;
pub mod source;

pub use chain::AcquisitionChain;
pub use fallback::sample_records;
pub use source::{build_client, HttpSource, RawReport, ReportSource, SourceError, FALLBACK_CHARSET};
