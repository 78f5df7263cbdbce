//! modelgrade Domain Layer
//!
//! Value types and pure scoring logic shared by every other crate. It depends
//! only on `thiserror` for its error enums and `uuid` for run identifiers, and
//! performs no I/O.
//!
//! ## Key Concepts
//!
//! - **Element**: a class name or an association proposed by a model or listed in a gold standard
//! - **Normalization**: canonical comparison form; pure and idempotent
//! - **Gold Set**: the read-only reference elements per user story
//! - **Aggregate Counts**: true/false positive and false negative totals
//! - **Metrics**: precision, recall and F-measure derived from counts

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod counts;
pub mod element;
pub mod gold;
pub mod metrics;
pub mod normalize;
pub mod run;
pub mod traits;

// Re-exports for convenience
pub use counts::AggregateCounts;
pub use element::{Element, ExtractionMode, Prediction};
pub use gold::{GoldSet, GoldSetError, StoryId};
pub use metrics::{round3, Metrics};
pub use normalize::{EndpointOrder, NormalizedElement, Normalizer, NormalizerError};
pub use run::RunId;
pub use traits::TranscriptSource;
