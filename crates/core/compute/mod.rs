//! Grid indexing, neighbourhood expansion, point generation, freshness and
//! input validation.

pub mod bucket;
pub mod freshness;
pub mod generator;
pub mod validation;
