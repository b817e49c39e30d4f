//! The allowed-transition relation over [`JobStatus`].
//!
//! The relation is data: [`DEFAULT_TRANSITIONS`] lists the edges the client
//! accepts, and a [`TransitionTable`] can also be read from the `[transitions]`
//! table of `jobflow.toml`. Terminal statuses never have outgoing edges.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;
use thiserror::Error;

use super::status::JobStatus;
use crate::error::ClientError;

/// Default adjacency: `from → [to, ...]`. Statuses absent here have no edges.
pub const DEFAULT_TRANSITIONS: &[(JobStatus, &[JobStatus])] = &[
    (JobStatus::Created, &[JobStatus::Waiting, JobStatus::Cancelled]),
    (JobStatus::Waiting, &[JobStatus::Processing, JobStatus::Cancelled]),
    (
        JobStatus::Processing,
        &[JobStatus::Success, JobStatus::Error, JobStatus::Terminated],
    ),
];

static STANDARD: LazyLock<TransitionTable> =
    LazyLock::new(|| TransitionTable::from_edges(DEFAULT_TRANSITIONS.iter().copied()));

/// A consistency problem found by [`TransitionTable::audit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableIssue {
    /// A terminal status was given an outgoing edge.
    TerminalHasOutgoing { from: JobStatus, to: JobStatus },
    /// A status lists itself as a target.
    SelfEdge(JobStatus),
}

impl fmt::Display for TableIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableIssue::TerminalHasOutgoing { from, to } => {
                write!(f, "terminal status {from} has an edge to {to}")
            }
            TableIssue::SelfEdge(status) => write!(f, "status {status} has an edge to itself"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("transition table: {0}")]
    InvalidStatus(#[from] ClientError),

    #[error("inconsistent transition table: {}", join_issues(.0))]
    Inconsistent(Vec<TableIssue>),
}

fn join_issues(issues: &[TableIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Adjacency relation deciding which `current → target` pairs are legal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<String>>")]
pub struct TransitionTable {
    edges: BTreeMap<JobStatus, BTreeSet<JobStatus>>,
}

impl TransitionTable {
    /// The built-in table from [`DEFAULT_TRANSITIONS`].
    pub fn standard() -> &'static TransitionTable {
        &STANDARD
    }

    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (JobStatus, &'a [JobStatus])>,
    {
        let mut map: BTreeMap<JobStatus, BTreeSet<JobStatus>> = BTreeMap::new();
        for (from, targets) in edges {
            map.entry(from).or_default().extend(targets.iter().copied());
        }
        Self { edges: map }
    }

    pub fn allows(&self, from: JobStatus, to: JobStatus) -> bool {
        self.edges.get(&from).is_some_and(|targets| targets.contains(&to))
    }

    /// Targets reachable in one step from `from`, in lifecycle order.
    pub fn targets(&self, from: JobStatus) -> impl Iterator<Item = JobStatus> + '_ {
        self.edges.get(&from).into_iter().flatten().copied()
    }

    /// Every `(from, to)` edge, ordered by `from` then `to`.
    pub fn edges(&self) -> impl Iterator<Item = (JobStatus, JobStatus)> + '_ {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
    }

    /// Checks the table against the lifecycle rules the validator relies on.
    pub fn audit(&self) -> Result<(), Vec<TableIssue>> {
        let issues: Vec<TableIssue> = self
            .edges()
            .filter_map(|(from, to)| {
                if from == to {
                    Some(TableIssue::SelfEdge(from))
                } else if from.is_terminal() {
                    Some(TableIssue::TerminalHasOutgoing { from, to })
                } else {
                    None
                }
            })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl TryFrom<BTreeMap<String, Vec<String>>> for TransitionTable {
    type Error = TableError;

    fn try_from(raw: BTreeMap<String, Vec<String>>) -> Result<Self, Self::Error> {
        let mut edges: BTreeMap<JobStatus, BTreeSet<JobStatus>> = BTreeMap::new();
        for (from, targets) in &raw {
            let entry = edges.entry(from.parse::<JobStatus>()?).or_default();
            for to in targets {
                entry.insert(to.parse::<JobStatus>()?);
            }
        }

        let table = Self { edges };
        table.audit().map_err(TableError::Inconsistent)?;
        Ok(table)
    }
}
