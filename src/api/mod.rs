//! API route definitions
//!
//! One router per resource; [`crate::app::build_app`] merges them and wraps
//! the result in the error-normalisation boundary.

pub mod authors;
pub mod books;
pub mod health;
pub mod languages;
pub mod params;
pub mod root;
pub mod subjects;
