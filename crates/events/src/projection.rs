use crate::{Event, EventEnvelope};

/// A projection builds a read model from an append-only event stream.
///
/// Read models are disposable: they can be thrown away and rebuilt by
/// replaying the events, which remain the source of truth.
///
/// `apply` does not return errors. Events that are irrelevant to the read
/// model are ignored; sequencing is checked by
/// [`ProjectionRunner`](crate::ProjectionRunner) before `apply` is called.
pub trait Projection {
    type Ev: Event;

    /// Apply a single event to the projection, updating the read model.
    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>);
}
