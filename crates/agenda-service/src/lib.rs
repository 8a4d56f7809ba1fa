//! Scheduling workflows on top of the pure rules: saving and editing events
//! against a store, and the periodic "starting soon" notifier.

pub mod error;
pub mod events;
pub mod notifier;

pub use events::{EventService, SaveOutcome};
pub use notifier::{Clock, Notifier, NotifierHandle, SystemClock};
