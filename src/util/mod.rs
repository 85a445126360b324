//! Utility modules for Searchlight.

pub mod levenshtein;

pub use levenshtein::{edit_distance, edit_distance_within};
