//! Tag collection, cleanup and merging.

mod collector;
mod merge;
mod normalizer;

pub use collector::{
    MAX_PROMPT_TAGS, collect_tags, collect_tags_excluding, exclude_existing, render_tag_list,
};
pub use merge::{apply_case, apply_to_front_matter, merge_tags};
pub use normalizer::TagNormalizer;
