pub mod export_ops;

pub use export_ops::{run_export, ExportStats};
