use printcost_parser::PrinterFamily;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("{family} dataset is missing required column '{column}'")]
    MissingColumn {
        family: PrinterFamily,
        column: &'static str,
    },

    #[error("cannot append {found} records to a {expected} dataset")]
    FamilyMismatch {
        expected: PrinterFamily,
        found: PrinterFamily,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Invalid billing configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BillingError>;
