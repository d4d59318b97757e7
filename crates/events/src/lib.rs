//! Event-sourcing mechanics shared by the domain crates.
//!
//! Everything here is synchronous and storage-agnostic: commands are decided
//! by aggregates, facts are wrapped in envelopes, and projections fold them
//! into read models.

pub mod envelope;
pub mod event;
pub mod handler;
pub mod projection;
pub mod runner;

pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use projection::Projection;
pub use runner::{ProjectionCursor, ProjectionError, ProjectionRunner};
