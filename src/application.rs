//! Application layer
//!
//! The two pipelines (spoiler sync and review annotation) and the pieces
//! they are assembled from. Collaborators are injected as trait objects.

pub mod bounded;
pub mod detail_fetcher;
pub mod errors;
pub mod review_annotator;
pub mod spoiler_crawler;
pub mod sync_pipeline;

pub use bounded::bounded_try_map;
pub use detail_fetcher::DetailFetcher;
pub use errors::{SyncError, SyncResult};
pub use review_annotator::{AnnotationOutcome, AnnotationReport, ReviewAnnotator, ReviewSettings};
pub use spoiler_crawler::SpoilerCrawler;
pub use sync_pipeline::{ApplyOutcome, CardOutcome, SyncPipeline, SyncReport, SyncSettings};
