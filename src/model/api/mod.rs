//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Field names are camelCase.
//! - Localised text is a map from language code to text.

pub mod analysis;
pub mod insights;
pub mod results;
pub mod submission;
pub mod survey;
