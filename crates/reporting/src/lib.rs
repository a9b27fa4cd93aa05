//! Deliverable export: CSV/JSON tables and the plain-text summary report.

pub mod export;
pub mod summary;
pub mod table;

pub use export::{Deliverables, ExportFormat, ExportManager};
pub use summary::render_summary;
pub use table::Table;
