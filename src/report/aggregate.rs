//! Agents × channel types projection
//!
//! Columns are the sorted union of every channel seen in a run minus the
//! excluded set. Rows keep the member-listing order. A cell holds the
//! configured `maximumCapacity`, or [`Cell::Unavailable`] when the agent has
//! no value for that channel, including when its whole fetch failed.

use crate::api::constants::DEFAULT_EXCLUDED_CHANNELS;
use crate::api::{FetchOutcome, Member, UtilizationRecord};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Rendered form of [`Cell::Unavailable`]
pub const UNAVAILABLE: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Capacity(u32),
    Unavailable,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Capacity(value) => write!(f, "{}", value),
            Cell::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Capacities serialize as numbers, the sentinel as `"-"`
impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Capacity(value) => serializer.serialize_u32(*value),
            Cell::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// One member with whatever utilization was obtained for it
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRow {
    pub member: Member,
    pub record: UtilizationRecord,
    /// Why the fetch failed; `None` when the record came back from the API
    pub failure: Option<String>,
}

impl AgentRow {
    pub fn fetched(member: Member, record: UtilizationRecord) -> Self {
        Self {
            member,
            record,
            failure: None,
        }
    }

    pub fn failed(member: Member, reason: impl Into<String>) -> Self {
        Self {
            member,
            record: UtilizationRecord::new(),
            failure: Some(reason.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn cell(&self, channel: &str) -> Cell {
        self.record
            .maximum_capacity(channel)
            .map(Cell::Capacity)
            .unwrap_or(Cell::Unavailable)
    }
}

impl From<(Member, UtilizationRecord)> for AgentRow {
    fn from((member, record): (Member, UtilizationRecord)) -> Self {
        AgentRow::fetched(member, record)
    }
}

impl From<(Member, FetchOutcome)> for AgentRow {
    fn from((member, outcome): (Member, FetchOutcome)) -> Self {
        match outcome {
            FetchOutcome::Fetched(record) => AgentRow::fetched(member, record),
            FetchOutcome::Failed(err) => AgentRow::failed(member, err.to_string()),
        }
    }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedReport {
    columns: Vec<String>,
    rows: Vec<AgentRow>,
}

impl AggregatedReport {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[AgentRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.is_failed()).count()
    }

    /// Cells of one row, in column order
    pub fn cells(&self, row: &AgentRow) -> Vec<Cell> {
        self.columns.iter().map(|column| row.cell(column)).collect()
    }

    /// Every row paired with its cells, in listing order
    pub fn projection(&self) -> impl Iterator<Item = (&AgentRow, Vec<Cell>)> + '_ {
        self.rows.iter().map(move |row| (row, self.cells(row)))
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    excluded: BTreeSet<String>,
}

impl Aggregator {
    pub fn new<I, S>(excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            excluded: excluded.into_iter().map(Into::into).collect(),
        }
    }

    pub fn aggregate<I, R>(&self, rows: I) -> AggregatedReport
    where
        I: IntoIterator<Item = R>,
        R: Into<AgentRow>,
    {
        let rows: Vec<AgentRow> = rows.into_iter().map(Into::into).collect();

        let columns: BTreeSet<&str> = rows
            .iter()
            .flat_map(|row| row.record.channels())
            .filter(|channel| !self.excluded.contains(*channel))
            .collect();
        let columns = columns.into_iter().map(str::to_string).collect();

        AggregatedReport { columns, rows }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_CHANNELS.iter().copied())
    }
}
