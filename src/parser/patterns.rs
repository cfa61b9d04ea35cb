//! Identifier and foreign-key extraction by regex over whole documents.

use crate::config::LabelPattern;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

/// Canonical textual UUID: 36 lowercase hex digits and hyphens
pub const UUID_FRAGMENT: &str = "[a-f0-9-]{36}";

/// A `(child, parent, label)` tuple prefix found in an insert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FkTriple {
    pub child: String,
    pub parent: String,
    pub label: String,
}

impl FkTriple {
    pub fn new(child: impl Into<String>, parent: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
            label: label.into(),
        }
    }
}

/// Pattern for the first identifier after `VALUES (` of an insert into `table`.
///
/// Accepts plain and upsert verbs (`INSERT OR REPLACE INTO`) and an optional
/// schema qualifier. `.` does not cross newlines, so one statement line
/// yields at most one identifier.
pub fn project_id_regex(table: &str) -> anyhow::Result<Regex> {
    let pattern = format!(
        r#"INSERT\s+(?:OR\s+\w+\s+)?INTO\s+(?:"?\w+"?\.)?"?{}"?.*?VALUES\s*\(\s*'({})'"#,
        regex::escape(table),
        UUID_FRAGMENT
    );
    Regex::new(&pattern).map_err(|e| anyhow::anyhow!("invalid table pattern '{}': {}", table, e))
}

/// Pattern for `('<uuid>', '<uuid>', '<label>'` anywhere in a document.
pub fn fk_triple_regex(label: LabelPattern) -> Regex {
    let pattern = format!(
        r"\('({uuid})',\s*'({uuid})',\s*'{label}'",
        uuid = UUID_FRAGMENT,
        label = label.fragment()
    );
    // Built only from fixed fragments
    Regex::new(&pattern).unwrap()
}

/// Distinct identifiers captured by `re`, sorted.
pub fn extract_ids(content: &str, re: &Regex) -> BTreeSet<String> {
    re.captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Every triple captured by `re`, in document order.
pub fn extract_fk_triples(content: &str, re: &Regex) -> Vec<FkTriple> {
    re.captures_iter(content)
        .filter_map(|caps| match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(child), Some(parent), Some(label)) => {
                Some(FkTriple::new(child.as_str(), parent.as_str(), label.as_str()))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: &str = "52b2eaac-a079-4e3a-90c7-cc6be700d8d1";
    const P2: &str = "b9230dee-5a70-4710-a54b-0ac5154f554c";
    const Q1: &str = "0c3e4d1a-1111-4a4a-8b8b-000000000001";

    #[test]
    fn test_project_ids_one_per_statement_line() {
        let sql = format!(
            "INSERT INTO reurb_projects (id, name) VALUES ('{P1}', 'Marabaixo 1');\n\
             INSERT INTO reurb_projects (id, name) VALUES ('{P2}', 'Oiapoque');\n\
             INSERT INTO reurb_projects (id, name) VALUES ('{P1}', 'again');\n"
        );
        let re = project_id_regex("reurb_projects").unwrap();
        let ids = extract_ids(&sql, &re);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(P1) && ids.contains(P2));
    }

    #[test]
    fn test_project_ids_accept_upsert_and_schema() {
        let sql = format!(
            "INSERT OR REPLACE INTO \"public\".\"reurb_projects\" (id) VALUES ('{P1}');"
        );
        let re = project_id_regex("reurb_projects").unwrap();
        assert_eq!(extract_ids(&sql, &re).len(), 1);
    }

    #[test]
    fn test_project_ids_ignore_other_tables() {
        let sql = format!("INSERT INTO reurb_quadras (id) VALUES ('{P1}');");
        let re = project_id_regex("reurb_projects").unwrap();
        assert!(extract_ids(&sql, &re).is_empty());
    }

    #[test]
    fn test_numeric_label_triples() {
        let sql = format!(
            "INSERT INTO reurb_quadras VALUES ('{Q1}', '{P1}', '12', now()), ('{P2}', '{P1}', 'abc');"
        );
        let triples = extract_fk_triples(&sql, &fk_triple_regex(LabelPattern::Numeric));
        assert_eq!(triples, vec![FkTriple::new(Q1, P1, "12")]);
    }

    #[test]
    fn test_text_label_triples_in_order() {
        let sql = format!("('{Q1}', '{P1}', 'Lote 1'),\n('{P2}',  '{P1}', 'Lote 2')");
        let triples = extract_fk_triples(&sql, &fk_triple_regex(LabelPattern::Text));
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[0].label, "Lote 1");
        assert_eq!(triples[1].child, P2);
    }

    #[test]
    fn test_uppercase_uuid_not_matched() {
        let upper = P1.to_uppercase();
        let sql = format!("('{upper}', '{P1}', '1')");
        assert!(extract_fk_triples(&sql, &fk_triple_regex(LabelPattern::Numeric)).is_empty());
    }
}
