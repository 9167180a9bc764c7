use polars::prelude::DataType;

pub const COMPANY_NAME: &str = "Company Name";

pub const F370_PRINT_TIME: &str = "Print Time";
pub const F370_ABS: &str = "PC-ABS BLK";
pub const F370_TPU: &str = "TPU 92A - Black";
pub const F370_SUPPORT: &str = "QSR support";

pub const J826_PRINT_TIME: &str = "Print Time (h:mm)";
pub const J826_DRAFT_GREY: &str = "DraftGrey (g)";
pub const J826_VERO_ULTRA_WHITE: &str = "VeroUltraWhite (g)";
pub const J826_VERO_BLACK_PLUS: &str = "VeroBlackPlus (g)";
pub const J826_SUP706: &str = "SUP706 (g)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
}

impl ColumnKind {
    pub fn dtype(&self) -> DataType {
        match self {
            ColumnKind::Text => DataType::String,
            ColumnKind::Number => DataType::Float64,
        }
    }
}

pub const F370_SCHEMA: &[(&str, ColumnKind)] = &[
    (F370_PRINT_TIME, ColumnKind::Text),
    (F370_ABS, ColumnKind::Number),
    (F370_TPU, ColumnKind::Number),
    (F370_SUPPORT, ColumnKind::Number),
    (COMPANY_NAME, ColumnKind::Text),
];

pub const J826_SCHEMA: &[(&str, ColumnKind)] = &[
    (J826_PRINT_TIME, ColumnKind::Text),
    (J826_DRAFT_GREY, ColumnKind::Number),
    (J826_VERO_ULTRA_WHITE, ColumnKind::Number),
    (J826_VERO_BLACK_PLUS, ColumnKind::Number),
    (J826_SUP706, ColumnKind::Number),
    (COMPANY_NAME, ColumnKind::Text),
];
