mod job;
mod status;
mod transitions;
mod validator;

pub use job::{DeduplicationId, Job};
pub use status::JobStatus;
pub use transitions::{DEFAULT_TRANSITIONS, TableError, TableIssue, TransitionTable};
pub use validator::{StatusTransitionValidator, TransitionRequest, TransitionVerdict, Violation};
