//! Dataset ingestion: delimited-text parsing, CSV export, and the
//! built-in sample rows.

pub mod export;
pub mod loader;
pub mod sample;

pub use export::to_csv;
pub use loader::{load_bytes, load_path, load_str, REQUIRED_COLUMNS};
pub use sample::load_sample;
