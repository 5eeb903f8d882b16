pub mod runtime;
pub mod schedule;
pub mod search;
pub mod types;
