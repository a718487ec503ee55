//! Well-known session state keys.
//!
//! Stages communicate through named state keys, never through the input
//! message. Each key's read/write ownership is fixed here so the coupling
//! between stages stays auditable.

/// Seeded by the runner before the first stage executes.
///
/// Read by: any stage that needs to recover the original query, and the
/// result aggregator. Never overwritten after seeding.
pub const INITIAL_QUERY: &str = "initial_query";

/// Written by the search stage on success, holding the raw retrieved text.
///
/// Read by: the summarize stage and the result aggregator. Left unwritten
/// when the search stage soft-fails.
pub const SEARCH_RESULT: &str = "search_result";

/// Written by the summarize stage on success, holding the condensed text.
///
/// Read by: the result aggregator. Left unwritten when the summarize stage
/// soft-fails or finds no upstream search result.
pub const SUMMARIZED_RESULT: &str = "summarized_result";
