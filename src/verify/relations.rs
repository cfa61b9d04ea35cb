//! Child → parent relationship tables built from extracted triples.

use crate::parser::FkTriple;
use ahash::AHashMap;
use serde::Serialize;

/// A child whose parent identifier is not in the parent set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Orphan {
    pub id: String,
    pub label: String,
    pub missing_parent: String,
}

#[derive(Debug, Clone)]
struct Entry {
    parent: String,
    label: String,
}

/// One level of the project → quadra → property tree.
///
/// Children keep the order of their first appearance; a child seen again
/// takes the parent and label of its last appearance.
#[derive(Debug, Default, Clone)]
pub struct RelationTable {
    order: Vec<String>,
    entries: AHashMap<String, Entry>,
    references: usize,
    reassigned: usize,
}

impl RelationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples(triples: &[FkTriple]) -> Self {
        let mut table = Self::new();
        for triple in triples {
            table.insert(&triple.child, &triple.parent, &triple.label);
        }
        table
    }

    pub fn insert(&mut self, child: &str, parent: &str, label: &str) {
        self.references += 1;
        let entry = Entry {
            parent: parent.to_string(),
            label: label.to_string(),
        };
        if self.entries.insert(child.to_string(), entry).is_some() {
            self.reassigned += 1;
        } else {
            self.order.push(child.to_string());
        }
    }

    /// Distinct child identifiers
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Triples consumed, repeats included
    pub fn references(&self) -> usize {
        self.references
    }

    /// Triples that overwrote an earlier association for the same child
    pub fn reassigned(&self) -> usize {
        self.reassigned
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|e| e.parent.as_str())
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.entries.get(id).map(|e| e.label.as_str())
    }

    /// `(child, parent, label)` in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.order.iter().filter_map(move |id| {
            self.entries
                .get(id)
                .map(|e| (id.as_str(), e.parent.as_str(), e.label.as_str()))
        })
    }

    /// Children whose parent fails `parent_exists`, in table order.
    pub fn orphans<F>(&self, parent_exists: F) -> Vec<Orphan>
    where
        F: Fn(&str) -> bool,
    {
        self.iter()
            .filter(|(_, parent, _)| !parent_exists(*parent))
            .map(|(id, parent, label)| Orphan {
                id: id.to_string(),
                label: label.to_string(),
                missing_parent: parent.to_string(),
            })
            .collect()
    }

    /// Number of children per parent identifier
    pub fn children_per_parent(&self) -> AHashMap<&str, usize> {
        let mut counts: AHashMap<&str, usize> = AHashMap::new();
        for (_, parent, _) in self.iter() {
            *counts.entry(parent).or_insert(0) += 1;
        }
        counts
    }
}
