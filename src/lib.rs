//! Comparable-sales search over a hosted property database.
//!
//! A [`criteria::CriteriaSelector`] turns the user's picks into a navigation
//! target; a [`results::ResultsScreen`] decodes it, queries the store once,
//! normalizes the documents and keeps the row selection.

pub mod clock;
pub mod config;
pub mod criteria;
pub mod models;
pub mod normalize;
pub mod notify;
pub mod results;
pub mod store;
