//! Pawsome domain logic with zero internal dependencies.
//!
//! This crate holds the pure pieces of the notification subsystem so they
//! can be used by the repository layer, the fan-out/delivery services, and
//! any future CLI tooling alike:
//!
//! - [`types`]: shared id/timestamp aliases and the canonical [`Coord`]
//!   location type (with legacy field-name normalization).
//! - [`geo`]: planar-degree distance approximation and radius membership.
//! - [`eligibility`]: the per-(recipient, event) notification decision.
//! - [`compose`]: kind-specific notification title/body templates.
//! - [`locator`]: the client geolocation-acquisition boundary contract.

pub mod compose;
pub mod eligibility;
pub mod geo;
pub mod locator;
pub mod types;

pub use types::{Coord, DbId, Timestamp};
