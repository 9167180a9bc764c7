use polars::prelude::*;
use printcost_parser::formats::schema;
use printcost_parser::{PriceTable, PrinterFamily};
use tracing::{debug, info};

use crate::config::FlatFees;
use crate::error::{BillingError, Result};

pub const PRINT_JOB: &str = "Print Job";
pub const PRINTER_TYPE: &str = "Printer Type";
pub const FILAMENT_FEE: &str = "Filament Fee";
pub const FLAT_FEE: &str = "Flat Fee";
pub const TOTAL_FEE: &str = "Total Fee";
pub const COMPANY_NAME: &str = schema::COMPANY_NAME;

pub const COST_COLUMNS: [&str; 6] = [
    PRINT_JOB,
    PRINTER_TYPE,
    FILAMENT_FEE,
    FLAT_FEE,
    TOTAL_FEE,
    COMPANY_NAME,
];

const F370_MATERIALS: &[(&str, &str)] = &[
    ("PC-ABS BLK", schema::F370_ABS),
    ("TPU 92A - Black", schema::F370_TPU),
    ("QSR support", schema::F370_SUPPORT),
];

const J826_MATERIALS: &[(&str, &str)] = &[
    ("DraftGrey", schema::J826_DRAFT_GREY),
    ("VeroUltraWhite", schema::J826_VERO_ULTRA_WHITE),
    ("VeroBlackPlus", schema::J826_VERO_BLACK_PLUS),
    ("SUP706", schema::J826_SUP706),
];

/// Price-table material name and the dataset column holding its consumption, per family.
pub fn material_columns(family: PrinterFamily) -> &'static [(&'static str, &'static str)] {
    match family {
        PrinterFamily::F370 => F370_MATERIALS,
        PrinterFamily::J826 => J826_MATERIALS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostResult {
    pub job_id: u32,
    pub printer_family: PrinterFamily,
    pub filament_fee: f64,
    pub flat_fee: f64,
    pub total_fee: f64,
    pub company_name: String,
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prices every F370 job, then every J826 job, numbering jobs from 1 across both passes.
///
/// Missing price entries, cost-only entries, absent material columns and null or
/// non-positive consumption all contribute nothing. A dataset without a `Company Name`
/// column is rejected before any row is priced.
pub fn compute_costs(
    f370: &DataFrame,
    j826: &DataFrame,
    prices: &PriceTable,
    fees: &FlatFees,
) -> Result<Vec<CostResult>> {
    let passes = [(PrinterFamily::F370, f370), (PrinterFamily::J826, j826)];
    for (family, df) in passes {
        if df.column(COMPANY_NAME).is_err() {
            return Err(BillingError::MissingColumn {
                family,
                column: COMPANY_NAME,
            });
        }
    }

    let mut results = Vec::with_capacity(f370.height() + j826.height());
    let mut next_job_id = 1u32;
    for (family, df) in passes {
        let priced = price_family(family, df, prices, fees.for_family(family), next_job_id)?;
        next_job_id += priced.len() as u32;
        info!(%family, jobs = priced.len(), "Priced print jobs");
        results.extend(priced);
    }
    Ok(results)
}

fn price_family(
    family: PrinterFamily,
    df: &DataFrame,
    prices: &PriceTable,
    flat_fee: f64,
    first_job_id: u32,
) -> Result<Vec<CostResult>> {
    // (consumption column, unit cost) for every material that can be priced at all.
    let mut priced_columns = Vec::new();
    for (material, column_name) in material_columns(family) {
        let Ok(column) = df.column(column_name) else {
            debug!(%family, column = *column_name, "Material column absent");
            continue;
        };
        let unit_cost = prices
            .get(family.as_str(), material)
            .and_then(|entry| entry.unit_cost());
        let Some(unit_cost) = unit_cost else {
            debug!(%family, material = *material, "No usable unit price");
            continue;
        };
        priced_columns.push((column.cast(&DataType::Float64)?, unit_cost));
    }

    let consumption = priced_columns
        .iter()
        .map(|(column, unit_cost)| -> PolarsResult<_> { Ok((column.f64()?, *unit_cost)) })
        .collect::<PolarsResult<Vec<_>>>()?;

    let company = df.column(COMPANY_NAME)?.cast(&DataType::String)?;
    let company = company.str()?;

    let mut results = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let mut filament_fee = 0.0;
        for (values, unit_cost) in &consumption {
            match values.get(idx) {
                Some(volume) if volume > 0.0 => filament_fee += volume * unit_cost,
                _ => {}
            }
        }

        results.push(CostResult {
            job_id: first_job_id + idx as u32,
            printer_family: family,
            filament_fee: round_cents(filament_fee),
            flat_fee,
            total_fee: round_cents(filament_fee + flat_fee),
            company_name: company.get(idx).unwrap_or_default().to_string(),
        });
    }
    Ok(results)
}

/// Cost rows as a frame in persisted column order.
pub fn cost_frame(results: &[CostResult]) -> PolarsResult<DataFrame> {
    let job_ids: Vec<u32> = results.iter().map(|r| r.job_id).collect();
    let families: Vec<&str> = results.iter().map(|r| r.printer_family.as_str()).collect();
    let filament: Vec<f64> = results.iter().map(|r| r.filament_fee).collect();
    let flat: Vec<f64> = results.iter().map(|r| r.flat_fee).collect();
    let total: Vec<f64> = results.iter().map(|r| r.total_fee).collect();
    let company: Vec<&str> = results.iter().map(|r| r.company_name.as_str()).collect();

    DataFrame::new(vec![
        Series::new(PRINT_JOB.into(), job_ids).into(),
        Series::new(PRINTER_TYPE.into(), families).into(),
        Series::new(FILAMENT_FEE.into(), filament).into(),
        Series::new(FLAT_FEE.into(), flat).into(),
        Series::new(TOTAL_FEE.into(), total).into(),
        Series::new(COMPANY_NAME.into(), company).into(),
    ])
}
