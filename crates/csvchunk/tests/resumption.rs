//! Pagination equivalence and escaper round-trip properties.

use std::io::Cursor;

use csvchunk::{ChunkOptions, read_chunk};
use quickcheck_macros::quickcheck;
use rstest::rstest;
use serde_json::Value;

fn chunk(input: &str, options: &ChunkOptions) -> Value {
    let doc = read_chunk(Cursor::new(input.as_bytes().to_vec()), options).unwrap();
    serde_json::from_slice(&doc).unwrap()
}

fn rows(doc: &Value) -> Vec<Vec<String>> {
    doc["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| {
            row.as_array()
                .unwrap()
                .iter()
                .map(|f| f.as_str().unwrap().to_string())
                .collect()
        })
        .collect()
}

/// Quotes one field the way a conservative CSV writer would: always quoted,
/// with doubled quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn encode_csv(headers: &[String], table: &[Vec<String>]) -> String {
    let mut out = String::new();
    let mut push_row = |row: &[String]| {
        let mut first = true;
        for field in row {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(&quote(field));
        }
        out.push('\n');
    };
    push_row(headers);
    for row in table {
        push_row(row);
    }
    out
}

/// Reads the whole input by chasing `next_offset` with a fixed row limit
/// until `has_more` goes false, concatenating the emitted rows.
fn chase(input: &str, limit: u64) -> Vec<Vec<String>> {
    let mut collected = Vec::new();
    let mut offset = 0;
    loop {
        let doc = chunk(
            input,
            &ChunkOptions {
                start_offset: offset,
                row_limit: limit,
                allow_partial_final_row: true,
            },
        );
        collected.extend(rows(&doc));
        let next = doc["next_offset"].as_u64().unwrap();
        if !doc["has_more"].as_bool().unwrap() {
            break;
        }
        assert!(next > offset, "pagination must make progress");
        offset = next;
    }
    collected
}

#[rstest]
#[case::single_row_pages(1)]
#[case::two_row_pages(2)]
#[case::odd_pages(3)]
#[case::oversized_pages(100)]
fn chasing_offsets_matches_a_single_unbounded_read(#[case] limit: u64) {
    let input = "\
h1,h2,h3
a,b,c
\"multi
line\",\"with,comma\",plain
,,x
d,e,f
last,\"q\"\"q\",row
";
    let single = rows(&chunk(input, &ChunkOptions::default()));
    assert_eq!(chase(input, limit), single);
}

/// Normalizes arbitrary quickcheck tables into uniform-width, non-blank
/// rows, the shape for which buffered pagination is exactly equivalent to a
/// single read.
fn normalize(table: Vec<Vec<String>>) -> (Vec<String>, Vec<Vec<String>>) {
    let width = table
        .first()
        .map_or(1, |row| row.len().clamp(1, 6));
    let headers = (1..=width).map(|i| format!("h{i}")).collect();
    let rows = table
        .into_iter()
        .take(24)
        .map(|mut row| {
            row.resize(width, String::new());
            if row.iter().all(String::is_empty) {
                row[0] = "x".to_string();
            }
            row
        })
        .collect();
    (headers, rows)
}

#[quickcheck]
fn paged_reads_reassemble_the_table(table: Vec<Vec<String>>, limit_seed: u8) -> bool {
    let (headers, table) = normalize(table);
    let input = encode_csv(&headers, &table);
    let limit = u64::from(limit_seed % 5) + 1;

    let single = rows(&chunk(&input, &ChunkOptions::default()));
    single == table && chase(&input, limit) == single
}

#[quickcheck]
fn every_field_round_trips_through_the_escaper(table: Vec<Vec<String>>) -> bool {
    let (headers, table) = normalize(table);
    let input = encode_csv(&headers, &table);
    let doc = chunk(&input, &ChunkOptions::default());
    rows(&doc) == table
}

#[test]
fn fields_with_every_escape_class_survive() {
    let table = vec![vec![
        "plain".to_string(),
        "quote\"inside".to_string(),
        "back\\slash".to_string(),
        "tab\tand\nnewline\rcr".to_string(),
        "ctrl\u{1}\u{1f}".to_string(),
    ]];
    let headers: Vec<String> = (1..=5).map(|i| format!("h{i}")).collect();
    let input = encode_csv(&headers, &table);
    let doc = chunk(&input, &ChunkOptions::default());
    assert_eq!(rows(&doc), table);
}
