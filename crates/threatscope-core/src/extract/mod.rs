mod dedup;
mod freeform;
mod normalize;
mod structured;

pub use dedup::dedup_by_name;
pub use freeform::{extract_freeform, Confidence, ExtractedIntel, UNKNOWN_ACTOR};
pub use normalize::{map_status, map_type, slug, split_list};
pub use structured::extract_structured;
