//! Pawsome notification fan-out and delivery.
//!
//! This crate implements the geo-eligibility notification subsystem on top
//! of [`pawsome_core`]'s pure domain logic and [`pawsome_db`]'s
//! repositories:
//!
//! - [`NotifyBus`]: process-wide change signal shared by the write path
//!   and the client read path.
//! - [`store`]: async-trait seams over the document store and the push
//!   provider, with Postgres-backed adapters.
//! - [`FanOutOrchestrator`]: turns one created post/event into per-user
//!   notification records and staged push requests, best effort.
//! - [`DeliveryJob`] / [`DeliveryWorker`]: at-most-once processing of
//!   staged push requests.
//! - [`RetentionSweeper`]: periodic pruning of old processed requests.
//! - [`ClientNotificationState`]: the signed-in user's notification list
//!   with optimistic read-state handling.

pub mod bus;
pub mod client;
pub mod delivery;
pub mod fanout;
pub mod optimistic;
pub mod push;
pub mod retention;
pub mod store;

pub use bus::{NotifyBus, NotifyEvent};
pub use client::ClientNotificationState;
pub use delivery::{DeliveryJob, DeliveryWorker};
pub use fanout::FanOutOrchestrator;
pub use push::HttpPushClient;
pub use retention::RetentionSweeper;
