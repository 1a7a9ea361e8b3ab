//! Entity models.
//!
//! Plain `FromRow` structs mirroring table rows, plus the create DTOs the
//! repositories accept.

pub mod notification;
pub mod push_request;
pub mod user;
