//! Pure scheduling rules: recurrence expansion, overlap detection and
//! notification timing. Nothing in this crate performs I/O.

pub mod date;
pub mod error;
pub mod notification;
pub mod overlap;
pub mod recurrence;
pub mod validation;

pub use notification::{Notification, ScanOutcome, scan};
pub use overlap::{describe_conflict, find_conflicts, find_series_conflicts};
pub use recurrence::{generate, generate_until};
pub use validation::validate_template;
