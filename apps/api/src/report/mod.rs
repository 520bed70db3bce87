// Weekly report assembly.
// Implements: cluster selection and cover statistics, PDF export orchestration,
// and the report HTTP handlers. Layout decisions live in `crate::layout`.

pub mod export;
pub mod handlers;
pub mod stats;
