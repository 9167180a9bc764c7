pub mod config;
pub mod costing;
pub mod dataset;
pub mod error;
pub mod ingestion;

pub use config::{BillingConfig, FlatFees};
pub use costing::{compute_costs, cost_frame, material_columns, round_cents, CostResult};
pub use dataset::CanonicalDataset;
pub use error::{BillingError, Result};
pub use ingestion::{ingest_files, FileInput, FileReport, FileStatus, IngestionBatch};
