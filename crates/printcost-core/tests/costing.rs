use polars::prelude::*;
use printcost_core::costing::{COST_COLUMNS, FILAMENT_FEE, PRINT_JOB, TOTAL_FEE};
use printcost_core::{compute_costs, cost_frame, round_cents, BillingError, FlatFees};
use printcost_parser::{parse_price_table, F370Record, J826Record, CanonicalRecord, PrinterFamily};

fn empty_f370() -> DataFrame {
    F370Record::to_frame(&[]).unwrap()
}

fn empty_j826() -> DataFrame {
    J826Record::to_frame(&[]).unwrap()
}

fn f370_row(abs: f64, tpu: f64, support: Option<f64>, company: &str) -> F370Record {
    F370Record {
        print_time: "1:00".to_string(),
        abs_grams: abs,
        tpu_grams: tpu,
        support_volume: support,
        company_name: company.to_string(),
    }
}

#[test]
fn unit_cost_scales_consumption() {
    let prices = parse_price_table(["F370; PC-ABS BLK; 100 cm3; $50"]);
    let f370 = F370Record::to_frame(&[f370_row(10.0, 0.0, None, "Acme")]).unwrap();

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].filament_fee, 5.0);
    assert_eq!(results[0].flat_fee, 16.25);
    assert_eq!(results[0].total_fee, 21.25);
    assert_eq!(results[0].company_name, "Acme");
}

#[test]
fn totals_round_to_cents() {
    let prices = parse_price_table(["F370; PC-ABS BLK; 1000 cm3; $3333"]);
    let f370 = F370Record::to_frame(&[f370_row(1.0, 0.0, None, "Acme")]).unwrap();

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    assert_eq!(results[0].filament_fee, 3.33);
    assert_eq!(results[0].total_fee, 19.58);
    assert_eq!(round_cents(3.333 + 16.25), 19.58);
}

#[test]
fn exact_ties_round_half_away_from_zero() {
    assert_eq!(round_cents(0.125), 0.13);
    assert_eq!(round_cents(0.375), 0.38);
    assert_eq!(round_cents(16.25 + 0.125), 16.38);
}

#[test]
fn support_is_priced_from_lowercase_material_name() {
    let prices = parse_price_table(["F370; QSR support; 100 cm3; $10"]);
    let f370 = F370Record::to_frame(&[f370_row(0.0, 0.0, Some(10.0), "Acme")]).unwrap();

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();
    assert_eq!(results[0].filament_fee, 1.0);
    assert_eq!(results[0].total_fee, 17.25);

    // material names are matched exactly
    let prices = parse_price_table(["F370; QSR Support; 100 cm3; $10"]);
    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();
    assert_eq!(results[0].filament_fee, 0.0);
}

#[test]
fn job_numbering_continues_across_families() {
    let prices = parse_price_table(Vec::<&str>::new());
    let f370 = F370Record::to_frame(&[
        f370_row(0.0, 0.0, None, "Acme"),
        f370_row(0.0, 0.0, None, "Northwind"),
    ])
    .unwrap();
    let j826 = J826Record::to_frame(&[J826Record {
        print_time_hm: "0:00".to_string(),
        draft_grey_g: 0.0,
        vero_ultra_white_g: 0.0,
        vero_black_plus_g: 0.0,
        sup706_g: 0.0,
        company_name: "Contoso".to_string(),
    }])
    .unwrap();

    let results = compute_costs(&f370, &j826, &prices, &FlatFees::default()).unwrap();

    let ids: Vec<u32> = results.iter().map(|r| r.job_id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    for result in &results[..2] {
        assert_eq!(result.printer_family, PrinterFamily::F370);
        assert_eq!(result.filament_fee, 0.0);
        assert_eq!(result.total_fee, 16.25);
    }
    assert_eq!(results[2].printer_family, PrinterFamily::J826);
    assert_eq!(results[2].flat_fee, 7.22);
    assert_eq!(results[2].total_fee, 7.22);
}

#[test]
fn unusable_prices_contribute_nothing() {
    let prices = parse_price_table([
        "F370; PC-ABS BLK; ; $50",
        "F370; TPU 92A - Black; 0 cm3; $80",
        "J826; DraftGrey; 1000 g; $350.00",
    ]);
    let f370 = F370Record::to_frame(&[f370_row(10.0, 10.0, Some(4.0), "Acme")]).unwrap();

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    assert_eq!(results[0].filament_fee, 0.0);
    assert_eq!(results[0].total_fee, 16.25);
}

#[test]
fn null_and_non_positive_consumption_is_ignored() {
    let prices = parse_price_table([
        "F370; PC-ABS BLK; 100 cm3; $50",
        "F370; TPU 92A - Black; 100 cm3; $100",
        "F370; QSR support; 100 cm3; $10",
    ]);
    let f370 = F370Record::to_frame(&[
        f370_row(-2.0, 0.0, None, "Acme"),
        f370_row(2.0, 1.0, Some(10.0), "Acme"),
    ])
    .unwrap();

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    assert_eq!(results[0].filament_fee, 0.0);
    assert_eq!(results[1].filament_fee, 3.0);
    assert_eq!(results[1].total_fee, 19.25);
}

#[test]
fn absent_material_columns_are_skipped() -> PolarsResult<()> {
    let prices = parse_price_table(["J826; SUP706; 3,600 g; $1,080.00"]);
    let j826 = df!(
        "SUP706 (g)" => &[100.0f64],
        "Company Name" => &["Contoso"],
    )?;

    let results = compute_costs(&empty_f370(), &j826, &prices, &FlatFees::default()).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].job_id, 1);
    assert_eq!(results[0].filament_fee, 30.0);
    assert_eq!(results[0].total_fee, 37.22);
    Ok(())
}

#[test]
fn numeric_text_columns_are_cast() -> PolarsResult<()> {
    let prices = parse_price_table(["F370; PC-ABS BLK; 100 cm3; $50"]);
    let f370 = df!(
        "PC-ABS BLK" => &["4", "abc"],
        "Company Name" => &["Acme", "Acme"],
    )?;

    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    assert_eq!(results[0].filament_fee, 2.0);
    assert_eq!(results[1].filament_fee, 0.0);
    Ok(())
}

#[test]
fn missing_company_column_fails_before_pricing() -> PolarsResult<()> {
    let prices = parse_price_table(Vec::<&str>::new());
    let j826 = df!("SUP706 (g)" => &[1.0f64])?;

    let err = compute_costs(&empty_f370(), &j826, &prices, &FlatFees::default())
        .expect_err("expected missing column");

    match err {
        BillingError::MissingColumn { family, column } => {
            assert_eq!(family, PrinterFamily::J826);
            assert_eq!(column, "Company Name");
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn flat_fees_follow_configuration() {
    let prices = parse_price_table(Vec::<&str>::new());
    let f370 = F370Record::to_frame(&[f370_row(0.0, 0.0, None, "Acme")]).unwrap();
    let fees = FlatFees {
        f370: 20.0,
        j826: 5.0,
    };

    let results = compute_costs(&f370, &empty_j826(), &prices, &fees).unwrap();

    assert_eq!(results[0].total_fee, 20.0);
}

#[test]
fn cost_frame_uses_output_column_order() {
    let prices = parse_price_table(["F370; PC-ABS BLK; 100 cm3; $50"]);
    let f370 = F370Record::to_frame(&[
        f370_row(10.0, 0.0, None, "Acme"),
        f370_row(0.0, 0.0, None, "Northwind"),
    ])
    .unwrap();
    let results = compute_costs(&f370, &empty_j826(), &prices, &FlatFees::default()).unwrap();

    let df = cost_frame(&results).unwrap();

    assert_eq!(df.get_column_names(), COST_COLUMNS);
    let jobs = df.column(PRINT_JOB).unwrap().u32().unwrap();
    assert_eq!(jobs.get(1), Some(2));
    let filament = df.column(FILAMENT_FEE).unwrap().f64().unwrap();
    assert_eq!(filament.get(0), Some(5.0));
    let total = df.column(TOTAL_FEE).unwrap().f64().unwrap();
    assert_eq!(total.get(1), Some(16.25));
}
