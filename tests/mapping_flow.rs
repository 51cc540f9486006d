mod common;

use common::TestWorkspace;

use fincsv::fields::{StandardField, suggest_field};
use fincsv::ingest::{IngestOptions, parse_path};
use fincsv::mapping::{Mapping, suggest_mapping, validate};

#[test]
fn parsed_headers_suggest_a_usable_mapping() {
    let ws = TestWorkspace::new();
    let input = ws.write(
        "q1.csv",
        "Sales (USD),COGS,Period,Approval Status\n1000,400,2024-01-31,ok\n900,380,2024-02-29,ok\n",
    );

    let dataset = parse_path(&input, &IngestOptions::default()).expect("parse");
    let mapping = suggest_mapping(&dataset.columns);

    assert_eq!(
        mapping.column_for(StandardField::Revenue),
        Some("Sales (USD)")
    );
    assert_eq!(mapping.column_for(StandardField::Cogs), Some("COGS"));
    assert_eq!(mapping.column_for(StandardField::Date), Some("Period"));
    assert_eq!(mapping.column_for(StandardField::Segment), None);

    let report = validate(
        &mapping,
        &[StandardField::Revenue, StandardField::Cogs, StandardField::Date],
    );
    assert!(report.valid);
    assert!(report.errors.is_empty());
}

#[test]
fn sales_usd_header_matches_revenue_by_exact_alias() {
    assert_eq!(suggest_field("Sales (USD)"), Some(StandardField::Revenue));
    assert_eq!(suggest_field("sales_usd"), Some(StandardField::Revenue));
}

#[test]
fn mapping_round_trips_through_json_file() {
    let ws = TestWorkspace::new();
    let path = ws.path().join("mapping.json");

    let mut mapping = Mapping::new();
    mapping.set(StandardField::Revenue, "Sales (USD)");
    mapping.set(StandardField::NetIncome, "Net Profit/Loss");
    mapping.save(&path).expect("save mapping");

    let loaded = Mapping::load(&path).expect("load mapping");
    assert_eq!(loaded, mapping);
    assert_eq!(
        loaded.column_for(StandardField::NetIncome),
        Some("Net Profit/Loss")
    );
}

#[test]
fn missing_required_fields_name_their_labels() {
    let report = validate(
        &Mapping::new(),
        &[
            StandardField::Revenue,
            StandardField::NetIncome,
            StandardField::Cogs,
        ],
    );
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 3);
    assert!(report.errors.iter().any(|e| e.contains("'Revenue'")));
    assert!(report.errors.iter().any(|e| e.contains("'Net Income'")));
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("'Cost of Goods Sold'"))
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn shared_column_across_fields_warns_without_blocking() {
    let mut mapping = Mapping::new();
    mapping.set(StandardField::Revenue, "Amount");
    mapping.set(StandardField::NetIncome, "Amount");
    mapping.set(StandardField::Date, "Period");

    let report = validate(&mapping, &[StandardField::Revenue]);
    assert!(report.valid);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("'Amount'"));
    assert!(report.warnings[0].contains("2 standard fields"));
}
