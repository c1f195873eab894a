//! Strategic sales recommendations from a trailing window of vehicle sales.
//!
//! Facts flow one way: a [`source::SaleSource`] supplies the window,
//! [`analysis::window`] aggregates it, [`analysis::trend`] and
//! [`analysis::segment`] rank cities, and [`advisor`] turns the result into
//! priority-ordered recommendations.

pub mod advisor;
pub mod analysis;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
pub mod store;
pub mod types;

pub use advisor::{advise, compute_recommendations, RecommendationResult, SalesTarget};
pub use error::AdvisorError;
pub use types::{SaleFact, SaleWindow};
