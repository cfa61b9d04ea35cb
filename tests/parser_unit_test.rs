//! Unit tests for the row splitter and the seed extraction patterns.

use reurb_seed::config::LabelPattern;
use reurb_seed::parser::{
    extract_fk_triples, extract_ids, fk_triple_regex, project_id_regex, values_block, FkTriple,
    RowSplitter,
};

const P1: &str = "52b2eaac-a079-4e3a-90c7-cc6be700d8d1";
const Q1: &str = "11111111-1111-4111-8111-111111111111";
const R1: &str = "33333333-3333-4333-8333-333333333333";

#[test]
fn test_split_keeps_separator_inside_literal() {
    let rows = RowSplitter::new("(1, 'a), (b'), (2, 'c')").split();
    assert_eq!(rows.rows, vec!["1, 'a), (b'", "2, 'c'"]);
    assert!(rows.trailing.is_none());
}

#[test]
fn test_split_handles_multiline_dump_layout() {
    let text = "\n  (1, 'x'),\n  (2, 'it''s'),\n  (3, NULL)\n";
    let rows = RowSplitter::new(text).split();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.rows[1], "2, 'it''s'");
}

#[test]
fn test_split_reports_trailing_clause() {
    let rows = RowSplitter::new("(1), (2) ON CONFLICT (id) DO NOTHING").split();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.trailing, Some("ON CONFLICT (id) DO NOTHING"));
}

#[test]
fn test_count_values_ignores_commas_in_strings_and_json() {
    assert_eq!(RowSplitter::count_values("1, 'a, b', '[\"x\",\"y\"]', NULL"), 4);
    assert_eq!(RowSplitter::count_values("f(1, 2), 3"), 2);
}

#[test]
fn test_values_block_spans_lines() {
    let sql = "INSERT INTO t (a) VALUES\n(1),\n(2);\n";
    assert_eq!(values_block(sql), Some("(1),\n(2)"));
    assert_eq!(values_block("SELECT 1;"), None);
}

#[test]
fn test_project_ids_from_plain_and_upsert_inserts() {
    let re = project_id_regex("reurb_projects").unwrap();
    let seed = format!(
        "INSERT INTO reurb_projects (id) VALUES ('{P1}');\nINSERT OR REPLACE INTO reurb_projects VALUES ('{P1}');\n"
    );
    let ids = extract_ids(&seed, &re);
    assert_eq!(ids.len(), 1);
    assert!(ids.contains(P1));
}

#[test]
fn test_fk_triples_respect_label_shape() {
    let text = format!("('{Q1}', '{P1}', '7'), ('{R1}', '{Q1}', 'Lote 7')");

    let numeric = extract_fk_triples(&text, &fk_triple_regex(LabelPattern::Numeric));
    assert_eq!(numeric, vec![FkTriple::new(Q1, P1, "7")]);

    let text_labels = extract_fk_triples(&text, &fk_triple_regex(LabelPattern::Text));
    assert_eq!(text_labels.len(), 2);
    assert_eq!(text_labels[1], FkTriple::new(R1, Q1, "Lote 7"));
}
