//! In-process cache of archive outcomes.
//!
//! Scoped to a single run: entries are never evicted or expired, and a miss
//! only means the work is done again.

pub mod dedup;

pub use dedup::DedupCache;
