//! Data models for the course hub backend.
//!
//! These models match the course hub frontend TypeScript interfaces exactly for
//! seamless interoperability.

mod availability;
mod discussion;
mod group;
mod revision;
mod switching;

pub use availability::*;
pub use discussion::*;
pub use group::*;
pub use revision::*;
pub use switching::*;
