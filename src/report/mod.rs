//! Report shaping: aggregation, serializable snapshots and terminal tables

pub mod aggregate;
pub mod snapshot;
pub mod table;

pub use aggregate::{AgentRow, AggregatedReport, Aggregator, Cell, UNAVAILABLE};
pub use snapshot::{ErrorData, ReportData, RowData};
pub use table::{render_data_table, render_table};
