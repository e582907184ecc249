pub mod actor;
pub mod catalog;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod seed;

pub use actor::{ActorStatus, ActorType, ThreatActor};
pub use catalog::{apply_intel, Catalog, ImportLog, ImportReport};
pub use error::{Error, Result};
pub use extract::{
    extract_freeform, extract_structured, Confidence, ExtractedIntel, UNKNOWN_ACTOR,
};
pub use fetch::{FetchError, FetchResult, IntelFetcher};
