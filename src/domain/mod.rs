//! Domain layer types and invariants.

pub mod categories;
pub mod complaints;
pub mod entities;
pub mod error;
pub mod photos;
pub mod types;
