use std::fs;
use std::path::PathBuf;

use crate::errors::NormalizeError;
use crate::formats::schema::{F370_SCHEMA, J826_SCHEMA};
use crate::formats::{F370Normalizer, J826Normalizer};
use crate::model::{CanonicalRecord, F370Record, J826Record, PrinterFamily, RawTable};
use crate::registry::{normalize_content, PrintLogNormalizer};
use crate::parse_price_table;

fn fixture(path: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let full_path = base.join("tests/data").join(path);
    fs::read_to_string(&full_path)
        .unwrap_or_else(|err| panic!("failed to read fixture {}: {}", full_path.display(), err))
}

#[test]
fn normalizes_f370_abs_export() {
    let content = fixture("2024-05-02_Print_F370.csv");
    let log = normalize_content(&F370Normalizer, "2024-05-02_Print_F370.csv", &content)
        .expect("F370 normalize failed");

    assert!(log.warnings.is_empty());
    assert_eq!(
        log.records,
        vec![
            F370Record {
                print_time: "3:55".to_string(),
                abs_grams: 42.5,
                tpu_grams: 0.0,
                support_volume: Some(6.0),
                company_name: "Acme Robotics".to_string(),
            },
            F370Record {
                print_time: "1:10".to_string(),
                abs_grams: 0.0,
                tpu_grams: 0.0,
                support_volume: Some(2.0),
                company_name: "Northwind Labs".to_string(),
            },
        ]
    );
}

#[test]
fn normalizes_f370_tpu_export_with_synonym_headers() {
    let content = fixture("2024-05-09_Print_F370.csv");
    let log = normalize_content(&F370Normalizer, "2024-05-09_Print_F370.csv", &content)
        .expect("F370 normalize failed");

    assert_eq!(log.records.len(), 2);
    let gasket = &log.records[0];
    assert_eq!(gasket.abs_grams, 0.0);
    assert_eq!(gasket.tpu_grams, 12.75);
    assert_eq!(gasket.company_name, "Acme Robotics");

    let seal = &log.records[1];
    assert_eq!(seal.tpu_grams, 0.0, "unparsable material cell reads as zero");
    assert_eq!(seal.support_volume, None);
    assert_eq!(seal.company_name, "Contoso");
}

#[test]
fn f370_without_company_column_is_rejected() {
    let content = fixture("no_company_Print_F370.csv");
    let err = normalize_content(&F370Normalizer, "no_company_Print_F370.csv", &content)
        .expect_err("expected missing identifier");

    match err {
        NormalizeError::MissingIdentifier { source_name, .. } => {
            assert_eq!(source_name, "no_company_Print_F370.csv");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn f370_without_support_column_lists_detected_columns() {
    let content = fixture("no_support_Print_F370.csv");
    let err = normalize_content(&F370Normalizer, "no_support_Print_F370.csv", &content)
        .expect_err("expected missing critical columns");

    match err {
        NormalizeError::MissingCriticalFields {
            missing, detected, ..
        } => {
            assert_eq!(missing, vec!["support"]);
            assert_eq!(
                detected,
                vec!["Job Name", "Print Time", "Model Material ABS (cm3)", "Company"]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn f370_rejects_any_header_without_identifier() {
    let headers = [
        "",
        "Print Time,Support",
        "Job,Print Time,ABS,QSR",
        "Customer,Owner",
    ];
    for header in headers {
        let content = format!("{header}\n1,2,3,4\n");
        let result = normalize_content(&F370Normalizer, "generated.csv", &content);
        assert!(
            matches!(result, Err(NormalizeError::MissingIdentifier { .. })),
            "header {header:?} should be rejected"
        );
    }
}

#[test]
fn normalizes_j826_key_value_report() {
    let content = fixture("job_0412_Print_J826.csv");
    let log = normalize_content(&J826Normalizer, "job_0412_Print_J826.csv", &content)
        .expect("J826 normalize failed");

    assert!(log.warnings.is_empty());
    assert_eq!(
        log.records,
        vec![J826Record {
            print_time_hm: "3:05".to_string(),
            draft_grey_g: 120.0,
            vero_ultra_white_g: 14.2,
            vero_black_plus_g: 0.0,
            sup706_g: 88.1,
            company_name: "Acme Robotics".to_string(),
        }]
    );
}

#[test]
fn short_j826_report_defaults_everything() {
    let content = fixture("job_0413_Print_J826.csv");
    let log = normalize_content(&J826Normalizer, "job_0413_Print_J826.csv", &content)
        .expect("J826 normalize failed");

    assert_eq!(log.warnings.len(), 1);
    assert!(log.warnings[0].contains("Unknown Company"));

    let record = &log.records[0];
    assert_eq!(record.print_time_hm, "0:00");
    assert_eq!(record.draft_grey_g, 0.0);
    assert_eq!(record.vero_ultra_white_g, 0.0);
    assert_eq!(record.vero_black_plus_g, 0.0);
    assert_eq!(record.sup706_g, 0.0);
    assert_eq!(record.company_name, "Unknown Company");
}

#[test]
fn empty_j826_report_is_rejected() {
    let result = normalize_content(&J826Normalizer, "empty_Print_J826.csv", "");
    assert!(matches!(result, Err(NormalizeError::EmptyInput { .. })));
}

#[test]
fn normalizing_twice_is_identical() {
    let f370 = fixture("2024-05-02_Print_F370.csv");
    let table = RawTable::from_csv("a.csv", &f370, true).unwrap();
    let first = F370Normalizer.normalize(&table).unwrap();
    let second = F370Normalizer.normalize(&table).unwrap();
    assert_eq!(first, second);

    let j826 = fixture("job_0412_Print_J826.csv");
    let table = RawTable::from_csv("b.csv", &j826, false).unwrap();
    assert_eq!(
        J826Normalizer.normalize(&table).unwrap(),
        J826Normalizer.normalize(&table).unwrap()
    );
}

#[test]
fn canonical_frames_use_fixed_column_order() {
    let content = fixture("2024-05-02_Print_F370.csv");
    let log = normalize_content(&F370Normalizer, "f370.csv", &content).unwrap();
    let df = F370Record::to_frame(&log.records).unwrap();
    let expected: Vec<&str> = F370_SCHEMA.iter().map(|(name, _)| *name).collect();
    assert_eq!(df.get_column_names(), expected);
    assert_eq!(df.height(), 2);

    let df = J826Record::to_frame(&[]).unwrap();
    let expected: Vec<&str> = J826_SCHEMA.iter().map(|(name, _)| *name).collect();
    assert_eq!(df.get_column_names(), expected);
    assert_eq!(df.height(), 0);
}

#[test]
fn normalizers_report_their_family() {
    assert_eq!(F370Normalizer.family(), PrinterFamily::F370);
    assert_eq!(J826Normalizer.family(), PrinterFamily::J826);
    assert_eq!(PrinterFamily::try_from(" j826 "), Ok(PrinterFamily::J826));
    assert!(PrinterFamily::try_from("F123").is_err());
}

#[test]
fn parses_price_fixture() {
    let content = fixture("material_prices.txt");
    let table = parse_price_table(content.lines());

    assert_eq!(table.len(), 7);
    let abs = table.get("F370", "PC-ABS BLK").expect("missing ABS price");
    assert_eq!(abs.reference_volume, Some(1000.0));
    assert_eq!(abs.reference_cost, 100.50);

    let support = table.get("F370", "QSR support").unwrap();
    assert_eq!(support.reference_volume, Some(1000.0));

    let black = table.get("J826", "VeroBlackPlus").unwrap();
    assert_eq!(black.unit_cost(), None);

    let sup = table.get("J826", "SUP706").unwrap();
    assert_eq!(sup.reference_cost, 1080.0);
    assert_eq!(sup.unit_cost(), Some(0.3));
}

#[test]
fn later_price_lines_overwrite_earlier_ones() {
    let table = parse_price_table([
        "F370; PC-ABS BLK; 1000 cm3; $100.50",
        "F370; PC-ABS BLK; 500 cm3; $60",
    ]);
    assert_eq!(table.len(), 1);
    let entry = table.get("F370", "PC-ABS BLK").unwrap();
    assert_eq!(entry.reference_volume, Some(500.0));
    assert_eq!(entry.reference_cost, 60.0);
}
