//! Search orchestrator: bounded fan-out, dedup, ranking.
//!
//! This module dispatches one task per registered provider under a shared
//! concurrency ceiling, waits for every task to finish or time out,
//! deduplicates by URL key (first seen wins), and applies the title-match
//! partition.

pub(crate) mod dispatch;

pub mod dedup;
pub mod ranking;
pub mod search;
