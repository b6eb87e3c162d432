pub mod candidate;
pub mod date_span;
pub mod frequency;
pub mod station;
