//! Configuration fragments and the deep-merge rules used to layer them.
//!
//! Maps merge key by key, sequences and scalars are replaced by the
//! higher-precedence operand. Layering many fragments is a left fold of
//! [`merge`].

mod error;
mod fragment;
mod merge;

pub use error::{MergeConflict, NotAMap};
pub use fragment::Fragment;
pub use merge::{deep_merge, merge, merge_all, merge_owned, try_merge};
