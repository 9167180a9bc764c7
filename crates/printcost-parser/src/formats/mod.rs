mod common;
mod f370;
mod j826;
pub mod schema;

pub use f370::F370Normalizer;
pub use j826::J826Normalizer;

pub use common::{find_matching_field, format_print_time, lenient_f64};
