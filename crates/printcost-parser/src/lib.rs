pub mod errors;
pub mod formats;
pub mod model;
pub mod prices;
mod registry;

pub use errors::NormalizeError;
pub use formats::{F370Normalizer, J826Normalizer};
pub use model::{
    CanonicalRecord, F370Record, J826Record, NormalizedLog, PrinterFamily, RawRecord, RawTable,
};
pub use prices::{parse_price_table, MaterialCostEntry, PriceKey, PriceTable};
pub use registry::{normalize_content, PrintLogNormalizer};

#[cfg(test)]
mod tests;
