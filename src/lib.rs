//! Client for a remote job-orchestration service.
//!
//! Job status transitions are validated locally by
//! [`StatusTransitionValidator`] before anything is sent, and error responses
//! from the server are turned into a typed [`ClientError`] by
//! [`ClientErrorClassifier`]. [`JobClient`] ties both to a [`Transport`].

pub mod classifier;
pub mod client;
pub mod config;
pub mod error;
pub mod remote;
pub mod state_machine;
pub mod variables;

#[cfg(test)]
mod testing;

pub use classifier::ClientErrorClassifier;
pub use client::{Enqueued, JobClient, TransitionOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, Error, ErrorKind, RemoteFailure, ResponsePayload};
pub use remote::{EnqueueRequest, HttpTransport, Transport, TransportError};
pub use state_machine::{
    DeduplicationId, Job, JobStatus, StatusTransitionValidator, TransitionRequest,
    TransitionTable, TransitionVerdict, Violation,
};
pub use variables::{Variable, VariableCollection};
