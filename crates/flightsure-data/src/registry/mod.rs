//! Participant registries
//!
//! - [`AirlineRegistry`]: pending/registered airlines and consortium votes
//! - [`FlightRegistry`]: scheduled flight instances

pub mod airlines;
pub mod flights;

pub use airlines::AirlineRegistry;
pub use flights::FlightRegistry;
