use std::fmt;

use csv::StringRecord;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::formats::schema::{self, ColumnKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrinterFamily {
    /// Flat tabular job export with a header row.
    F370,
    /// Single-column export of alternating label/value lines.
    J826,
}

impl PrinterFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrinterFamily::F370 => "F370",
            PrinterFamily::J826 => "J826",
        }
    }

    pub fn all() -> [PrinterFamily; 2] {
        [PrinterFamily::F370, PrinterFamily::J826]
    }

    /// Canonical column names and kinds, in persisted order.
    pub fn columns(&self) -> &'static [(&'static str, ColumnKind)] {
        match self {
            PrinterFamily::F370 => schema::F370_SCHEMA,
            PrinterFamily::J826 => schema::J826_SCHEMA,
        }
    }
}

impl fmt::Display for PrinterFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PrinterFamily {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "F370" => Ok(PrinterFamily::F370),
            "J826" => Ok(PrinterFamily::J826),
            other => Err(format!("unknown printer family '{other}'")),
        }
    }
}

/// One input file read as CSV. `fields` is empty for headerless sources.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub source_name: String,
    pub fields: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    pub fn new(source_name: impl Into<String>, fields: Vec<String>, rows: Vec<StringRecord>) -> Self {
        Self {
            source_name: source_name.into(),
            fields,
            rows,
        }
    }

    pub fn from_csv(
        source_name: impl Into<String>,
        content: &str,
        has_headers: bool,
    ) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(has_headers)
            .flexible(true)
            .from_reader(content.as_bytes());

        let fields = if has_headers {
            reader.headers()?.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(source_name, fields, rows))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        self.rows.iter().map(|values| RawRecord { values })
    }

    /// Cell `column` of every row, `None` where a row is too short.
    pub fn column_cells(&self, column: usize) -> Vec<Option<&str>> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }
}

/// One data row; cells are addressed by resolved column position.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    values: &'a StringRecord,
}

impl<'a> RawRecord<'a> {
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.values.get(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct F370Record {
    pub print_time: String,
    pub abs_grams: f64,
    pub tpu_grams: f64,
    pub support_volume: Option<f64>,
    pub company_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct J826Record {
    pub print_time_hm: String,
    pub draft_grey_g: f64,
    pub vero_ultra_white_g: f64,
    pub vero_black_plus_g: f64,
    pub sup706_g: f64,
    pub company_name: String,
}

/// Fixed-shape record of one print job that converts into the family's canonical frame.
pub trait CanonicalRecord: Clone {
    const FAMILY: PrinterFamily;

    fn to_frame(records: &[Self]) -> PolarsResult<DataFrame>;
}

impl CanonicalRecord for F370Record {
    const FAMILY: PrinterFamily = PrinterFamily::F370;

    fn to_frame(records: &[Self]) -> PolarsResult<DataFrame> {
        let print_time: Vec<&str> = records.iter().map(|r| r.print_time.as_str()).collect();
        let abs: Vec<f64> = records.iter().map(|r| r.abs_grams).collect();
        let tpu: Vec<f64> = records.iter().map(|r| r.tpu_grams).collect();
        let support: Vec<Option<f64>> = records.iter().map(|r| r.support_volume).collect();
        let company: Vec<&str> = records.iter().map(|r| r.company_name.as_str()).collect();

        DataFrame::new(vec![
            Series::new(schema::F370_PRINT_TIME.into(), print_time).into(),
            Series::new(schema::F370_ABS.into(), abs).into(),
            Series::new(schema::F370_TPU.into(), tpu).into(),
            Series::new(schema::F370_SUPPORT.into(), support).into(),
            Series::new(schema::COMPANY_NAME.into(), company).into(),
        ])
    }
}

impl CanonicalRecord for J826Record {
    const FAMILY: PrinterFamily = PrinterFamily::J826;

    fn to_frame(records: &[Self]) -> PolarsResult<DataFrame> {
        let print_time: Vec<&str> = records.iter().map(|r| r.print_time_hm.as_str()).collect();
        let draft_grey: Vec<f64> = records.iter().map(|r| r.draft_grey_g).collect();
        let ultra_white: Vec<f64> = records.iter().map(|r| r.vero_ultra_white_g).collect();
        let black_plus: Vec<f64> = records.iter().map(|r| r.vero_black_plus_g).collect();
        let sup706: Vec<f64> = records.iter().map(|r| r.sup706_g).collect();
        let company: Vec<&str> = records.iter().map(|r| r.company_name.as_str()).collect();

        DataFrame::new(vec![
            Series::new(schema::J826_PRINT_TIME.into(), print_time).into(),
            Series::new(schema::J826_DRAFT_GREY.into(), draft_grey).into(),
            Series::new(schema::J826_VERO_ULTRA_WHITE.into(), ultra_white).into(),
            Series::new(schema::J826_VERO_BLACK_PLUS.into(), black_plus).into(),
            Series::new(schema::J826_SUP706.into(), sup706).into(),
            Series::new(schema::COMPANY_NAME.into(), company).into(),
        ])
    }
}

/// Records produced from one input plus any non-fatal diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLog<R> {
    pub records: Vec<R>,
    pub warnings: Vec<String>,
}

impl<R> NormalizedLog<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records,
            warnings: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}
