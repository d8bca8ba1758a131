//! Core library for the sales-summary command line application.
//!
//! The pipeline reads one worksheet of the published retail sales annex,
//! isolates its data table, ranks the best-selling products and writes two
//! reports. IO adapters live under [`io`], the data representations inside
//! [`model`], the ranking and summary logic in [`summary`], and the end-to-end
//! orchestration under [`pipeline`].

pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod schema;
pub mod summary;

pub use error::{ErrorKind, ReportError, Result};
pub use pipeline::{ReportPaths, emit_reports, extract_and_aggregate};
pub use schema::SheetSchema;
