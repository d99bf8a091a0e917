//! Funnel report over generated banner links.
//!
//! The pipeline: query the funnel rows and totals, enrich rows from legacy
//! captions, lay the table out for export and push the CSV to result
//! storage.

pub mod aggregate;
pub mod parsing;
pub mod repo;
pub mod task;

pub use aggregate::{FunnelRow, ReportTable, build_report};
pub use repo::{SeaOrmQueryEngine, TimeRange};
pub use task::{FsObjectStorage, ObjectStorage, QueryEngine, ReportTask};
