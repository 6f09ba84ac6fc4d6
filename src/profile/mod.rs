//! Profile wizard domain: validators, draft, availability, step state and submission.

pub mod availability;
pub mod draft;
pub mod submission;
pub mod validators;
pub mod wizard;

pub use availability::{AvailabilityMap, RangeField, TimeRange, Weekday};
pub use draft::{Field, Location, ProfileDraft, Role};
pub use submission::ProfileSubmission;
pub use wizard::{Advance, ProfileWizard, Step, StepProgress};
