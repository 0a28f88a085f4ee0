//! Core business logic layer
//!
//! Data structures, the storage and backend seams, and the Prompt Registry.

pub mod data;
pub mod registry;
pub mod traits;
