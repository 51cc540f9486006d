mod common;

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

use common::{TestWorkspace, uniform_ledger};
use encoding_rs::WINDOWS_1252;

use fincsv::error::IngestError;
use fincsv::fields::StandardField;
use fincsv::infer::CellType;
use fincsv::ingest::{IngestOptions, ParseMode, parse_path};
use fincsv::stream::{self, DEFAULT_ROW_CAP, StreamOptions};

#[test]
fn small_ledger_parses_bounded_with_suggestions() {
    let ws = TestWorkspace::new();
    let input = ws.write("ledger.csv", "Revenue,COGS\n100,40\n200,90\n");

    let dataset = parse_path(&input, &IngestOptions::default()).expect("parse ledger");
    assert_eq!(dataset.filename, "ledger.csv");
    assert_eq!(dataset.columns.len(), 2);
    assert_eq!(dataset.row_count, 2);
    assert_eq!(dataset.parsed_row_count, 2);
    assert!(!dataset.is_partial);

    assert_eq!(dataset.columns[0].name, "revenue");
    assert_eq!(dataset.columns[0].inferred_type, CellType::Numeric);
    assert_eq!(
        dataset.columns[0].suggested_field,
        Some(StandardField::Revenue)
    );
    assert_eq!(dataset.columns[1].name, "cogs");
    assert_eq!(dataset.columns[1].suggested_field, Some(StandardField::Cogs));
    assert_eq!(dataset.rows[1]["COGS"], "90");
}

#[test]
fn tsv_extension_switches_delimiter_automatically() {
    let ws = TestWorkspace::new();
    let input = ws.write("books.tsv", "entity\tamount\nAcme\t120\n");

    let dataset = parse_path(&input, &IngestOptions::default()).expect("parse tsv");
    assert_eq!(dataset.columns.len(), 2);
    assert_eq!(dataset.rows[0]["entity"], "Acme");
    assert_eq!(dataset.rows[0]["amount"], "120");
}

#[test]
fn windows_1252_input_decodes_with_label() {
    let ws = TestWorkspace::new();
    let (encoded, _, _) = WINDOWS_1252.encode("Entity,Revenue\nCafé Royale,1200\n");
    let input = ws.write_bytes("latin.csv", &encoded);

    let options = IngestOptions {
        encoding: WINDOWS_1252,
        ..IngestOptions::default()
    };
    let dataset = parse_path(&input, &options).expect("parse encoded");
    assert_eq!(dataset.rows[0]["Entity"], "Café Royale");
}

#[test]
fn windows_1252_input_decodes_on_the_streaming_path() {
    let ws = TestWorkspace::new();
    let (encoded, _, _) = WINDOWS_1252.encode("Entity,Revenue\nCafé Royale,1200\n");
    let input = ws.write_bytes("latin_stream.csv", &encoded);

    let options = IngestOptions {
        encoding: WINDOWS_1252,
        forced_mode: Some(ParseMode::Streaming),
        ..IngestOptions::default()
    };
    let dataset = parse_path(&input, &options).expect("parse encoded stream");
    assert_eq!(dataset.rows[0]["Entity"], "Café Royale");
    assert!(!dataset.is_partial);
}

#[test]
fn utf8_bom_overrides_encoding_label_on_both_paths() {
    let ws = TestWorkspace::new();
    let mut bytes = b"\xEF\xBB\xBF".to_vec();
    bytes.extend_from_slice("Entity,Revenue\nCaf\u{e9} Royale,1200\n".as_bytes());
    let input = ws.write_bytes("bom.csv", &bytes);

    for mode in [ParseMode::Bounded, ParseMode::Streaming] {
        let options = IngestOptions {
            encoding: WINDOWS_1252,
            forced_mode: Some(mode),
            ..IngestOptions::default()
        };
        let dataset = parse_path(&input, &options).expect("parse BOM input");
        // The BOM is consumed by the decoder, never leaked into the header.
        assert_eq!(dataset.columns[0].original_name, "Entity");
        assert_eq!(dataset.rows[0]["Entity"], "Café Royale");
    }
}

#[test]
fn forced_streaming_matches_bounded_for_small_files() {
    let ws = TestWorkspace::new();
    let text = "Date,Net Profit\n2024-01-31,50\n2024-02-29,-20\n";
    let input = ws.write("months.csv", text);

    let bounded = parse_path(
        &input,
        &IngestOptions {
            forced_mode: Some(ParseMode::Bounded),
            ..IngestOptions::default()
        },
    )
    .expect("bounded parse");
    let streamed = parse_path(
        &input,
        &IngestOptions {
            forced_mode: Some(ParseMode::Streaming),
            ..IngestOptions::default()
        },
    )
    .expect("streaming parse");

    assert_eq!(bounded, streamed);
    assert_eq!(bounded.columns[0].inferred_type, CellType::Date);
    assert_eq!(bounded.columns[1].inferred_type, CellType::Numeric);
}

#[test]
fn stream_cap_override_projects_total_rows() {
    let ws = TestWorkspace::new();
    let input = ws.write("caps.csv", &uniform_ledger(120));

    let options = IngestOptions {
        forced_mode: Some(ParseMode::Streaming),
        row_cap: 50,
        chunk_rows: 10,
        ..IngestOptions::default()
    };
    let dataset = parse_path(&input, &options).expect("capped parse");
    assert_eq!(dataset.parsed_row_count, 50);
    assert!(dataset.is_partial);
    assert_eq!(dataset.row_count, 120);
}

#[test]
fn default_cap_truncates_six_hundred_thousand_rows() {
    let text = uniform_ledger(600_000);
    let options = StreamOptions {
        total_bytes: Some(text.len() as u64),
        ..StreamOptions::default()
    };
    let mut progress_calls = 0usize;
    let dataset = stream::parse_reader(Cursor::new(&text), "big.csv", b',', &options, |_| {
        progress_calls += 1;
    })
    .expect("capped stream parse");

    assert_eq!(dataset.parsed_row_count, DEFAULT_ROW_CAP);
    assert!(dataset.is_partial);
    assert_eq!(dataset.row_count, 600_000);
    assert_eq!(progress_calls, 100);
}

#[test]
fn cancellation_flag_stops_after_first_chunk() {
    let ws = TestWorkspace::new();
    let input = ws.write("cancel.csv", &uniform_ledger(100));

    let flag = AtomicBool::new(true);
    let options = IngestOptions {
        forced_mode: Some(ParseMode::Streaming),
        chunk_rows: 20,
        cancel: Some(&flag),
        ..IngestOptions::default()
    };
    let dataset = parse_path(&input, &options).expect("cancelled parse");
    assert!(flag.load(Ordering::Relaxed));
    assert_eq!(dataset.parsed_row_count, 20);
    assert!(dataset.is_partial);
    assert!(dataset.row_count > dataset.parsed_row_count);
}

#[test]
fn empty_file_surfaces_typed_error() {
    let ws = TestWorkspace::new();
    let input = ws.write("void.csv", "");

    let err = parse_path(&input, &IngestOptions::default()).unwrap_err();
    assert!(err.to_string().contains("no usable rows"));
    assert!(matches!(
        err.downcast_ref::<IngestError>(),
        Some(IngestError::EmptyFile { .. })
    ));
}

#[test]
fn missing_trailing_cells_keep_header_keys() {
    let ws = TestWorkspace::new();
    let input = ws.write("ragged.csv", "a,b,c\n1,2\n");

    let dataset = parse_path(&input, &IngestOptions::default()).expect("parse ragged");
    let row = &dataset.rows[0];
    assert_eq!(row.len(), 3);
    assert_eq!(row["c"], "");
}
