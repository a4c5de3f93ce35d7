//! Application layer: the release workflows built on the domain types and
//! infrastructure seams.
pub mod use_cases;
