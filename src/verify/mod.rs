//! Verify command: referential integrity of REURB seed files.
//!
//! Checks two levels of the project → quadra → property tree by pattern
//! extraction over the raw SQL text:
//! - every quadra's project id appears among the project inserts
//! - every property's quadra id appears among the quadra tuples
//!
//! Orphans are data findings. They are all collected and reported, and
//! only the final outcome turns them into a failing exit status.

mod relations;
mod render;

pub use relations::{Orphan, RelationTable};
pub use render::{render_markdown, render_text};

use crate::config::IntegrityProfile;
use crate::parser::{extract_fk_triples, extract_ids, fk_triple_regex, project_id_regex};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Outcome of one relationship level
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Failed(usize),
}

impl CheckStatus {
    fn from_orphans(orphans: &[Orphan]) -> Self {
        if orphans.is_empty() {
            CheckStatus::Ok
        } else {
            CheckStatus::Failed(orphans.len())
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "OK"),
            CheckStatus::Failed(n) => write!(f, "{} orphan(s)", n),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub table: String,
    pub count: usize,
    pub ids: Vec<String>,
}

/// Counts and orphans for one child table
#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub table: String,
    pub parent_table: String,
    /// Distinct child identifiers
    pub count: usize,
    /// Extracted tuples, repeats included
    pub references: usize,
    /// Tuples that re-assigned an already seen child
    pub reassigned: usize,
    pub orphans: Vec<Orphan>,
    pub status: CheckStatus,
}

/// Quadra and property counts under one configured project
#[derive(Debug, Clone, Serialize)]
pub struct ProjectBreakdown {
    pub id: String,
    pub name: String,
    pub present: bool,
    pub quadras: usize,
    pub properties: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuadraBreakdown {
    pub quadra_id: String,
    pub label: String,
    pub properties: usize,
}

/// Full result of a verification run
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub projects: ProjectSummary,
    pub quadras: LevelSummary,
    pub properties: LevelSummary,
    pub known_projects: Vec<ProjectBreakdown>,
    /// Every quadra with its property count, largest first
    pub properties_per_quadra: Vec<QuadraBreakdown>,
    pub total_issues: usize,
    pub passed: bool,
}

impl IntegrityReport {
    /// 0 on full integrity, 1 on any orphan
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Verify options
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub seed_path: PathBuf,
    pub properties_path: PathBuf,
    pub profile: IntegrityProfile,
}

/// Pattern-based integrity verifier
pub struct Verifier {
    profile: IntegrityProfile,
    project_re: Regex,
    quadra_re: Regex,
    property_re: Regex,
}

impl Verifier {
    pub fn new(profile: IntegrityProfile) -> anyhow::Result<Self> {
        Ok(Self {
            project_re: project_id_regex(&profile.projects_table)?,
            quadra_re: fk_triple_regex(profile.quadra_label),
            property_re: fk_triple_regex(profile.property_label),
            profile,
        })
    }

    /// Run the three extraction steps and both checks, in fixed order.
    pub fn verify_texts(&self, seed: &str, properties: &str) -> IntegrityReport {
        let project_ids: BTreeSet<String> = extract_ids(seed, &self.project_re);

        let quadras = RelationTable::from_triples(&extract_fk_triples(seed, &self.quadra_re));
        let orphaned_quadras = quadras.orphans(|project| project_ids.contains(project));

        let props = RelationTable::from_triples(&extract_fk_triples(properties, &self.property_re));
        let orphaned_props = props.orphans(|quadra| quadras.contains(quadra));

        let total_issues = orphaned_quadras.len() + orphaned_props.len();

        let known_projects = self.known_project_breakdown(&project_ids, &quadras, &props);
        let properties_per_quadra = properties_per_quadra(&quadras, &props);

        IntegrityReport {
            projects: ProjectSummary {
                table: self.profile.projects_table.clone(),
                count: project_ids.len(),
                ids: project_ids.into_iter().collect(),
            },
            quadras: LevelSummary {
                table: self.profile.quadras_table.clone(),
                parent_table: self.profile.projects_table.clone(),
                count: quadras.len(),
                references: quadras.references(),
                reassigned: quadras.reassigned(),
                status: CheckStatus::from_orphans(&orphaned_quadras),
                orphans: orphaned_quadras,
            },
            properties: LevelSummary {
                table: self.profile.properties_table.clone(),
                parent_table: self.profile.quadras_table.clone(),
                count: props.len(),
                references: props.references(),
                reassigned: props.reassigned(),
                status: CheckStatus::from_orphans(&orphaned_props),
                orphans: orphaned_props,
            },
            known_projects,
            properties_per_quadra,
            total_issues,
            passed: total_issues == 0,
        }
    }

    fn known_project_breakdown(
        &self,
        project_ids: &BTreeSet<String>,
        quadras: &RelationTable,
        props: &RelationTable,
    ) -> Vec<ProjectBreakdown> {
        let quadras_per_project = quadras.children_per_parent();

        self.profile
            .known_projects
            .iter()
            .map(|known| {
                let properties = props
                    .iter()
                    .filter(|(_, quadra, _)| quadras.parent_of(quadra) == Some(known.id.as_str()))
                    .count();
                ProjectBreakdown {
                    id: known.id.clone(),
                    name: known.name.clone(),
                    present: project_ids.contains(&known.id),
                    quadras: quadras_per_project
                        .get(known.id.as_str())
                        .copied()
                        .unwrap_or(0),
                    properties,
                }
            })
            .collect()
    }
}

fn properties_per_quadra(quadras: &RelationTable, props: &RelationTable) -> Vec<QuadraBreakdown> {
    let counts = props.children_per_parent();

    let mut rows: Vec<QuadraBreakdown> = quadras
        .iter()
        .map(|(id, _, label)| QuadraBreakdown {
            quadra_id: id.to_string(),
            label: label.to_string(),
            properties: counts.get(id).copied().unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.properties
            .cmp(&a.properties)
            .then_with(|| a.label.cmp(&b.label))
    });
    rows
}

/// Run the verify command: read both files up front, then check.
pub fn run(options: &VerifyOptions) -> anyhow::Result<IntegrityReport> {
    let verifier = Verifier::new(options.profile.clone())?;

    let seed = crate::input::read_sql_file(&options.seed_path)?;
    let properties = crate::input::read_sql_file(&options.properties_path)?;

    Ok(verifier.verify_texts(&seed, &properties))
}
