//! YAML configuration for the convert and verify commands.
//!
//! Every setting has a built-in default matching the REURB deployment
//! (the `reurb_properties` target table, the `lotes_parte_` batch files,
//! the `seed.sql` / `seed-properties.sql` pair and the two diagnostic
//! projects). A config file only needs to list what it overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Column order of the physical `reurb_properties` table.
pub const REURB_PROPERTY_COLUMNS: &[&str] = &[
    "id",
    "quadra_id",
    "name",
    "area",
    "description",
    "latitude",
    "longitude",
    "status",
    "images",
    "created_at",
    "updated_at",
    "address",
    "tipo_posse",
    "situacao_fundiaria",
    "documentos_comprobatorios",
    "historico_ocupacao",
    "restricoes_ambientais",
    "situacao_cadastral",
    "area_terreno",
    "area_construida",
    "matricula_imovel",
    "data_ocupacao",
    "possui_conflito",
    "descricao_conflito",
];

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_DUMP_FILE: &str = "reurb_properties_rows.sql";
pub const DEFAULT_FILE_PREFIX: &str = "lotes_parte_";
pub const DEFAULT_SEED_FILE: &str = "seed.sql";
pub const DEFAULT_PROPERTIES_FILE: &str = "seed-properties.sql";

/// Target table and column order for emitted batches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSchema {
    pub table: String,
    pub columns: Vec<String>,
}

impl TargetSchema {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn reurb_properties() -> Self {
        Self::new("reurb_properties", REURB_PROPERTY_COLUMNS)
    }

    /// Upsert header that opens every batch file.
    pub fn upsert_header(&self) -> String {
        format!(
            "INSERT OR REPLACE INTO {} ({}) VALUES \n",
            self.table,
            self.columns.join(", ")
        )
    }
}

impl Default for TargetSchema {
    fn default() -> Self {
        Self::reurb_properties()
    }
}

/// Settings for the dialect rewriter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteProfile {
    /// Schema names stripped from qualified identifiers (`"public".table`)
    pub schema_prefixes: Vec<String>,
    pub target: TargetSchema,
    pub batch_size: usize,
    /// Batch files are named `{file_prefix}{k}.sql`
    pub file_prefix: String,
}

impl Default for RewriteProfile {
    fn default() -> Self {
        Self {
            schema_prefixes: vec!["public".to_string()],
            target: TargetSchema::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

/// Shape of the third quoted field in a `(child, parent, label)` tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPattern {
    /// Digits only, e.g. quadra numbers
    Numeric,
    /// Any non-empty text without a single quote
    Text,
}

impl LabelPattern {
    /// Regex fragment capturing the label
    pub fn fragment(&self) -> &'static str {
        match self {
            LabelPattern::Numeric => r"(\d+)",
            LabelPattern::Text => r"([^']+)",
        }
    }
}

/// A project called out by name in the verification report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownProject {
    pub id: String,
    pub name: String,
}

impl KnownProject {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Settings for the integrity verifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrityProfile {
    pub projects_table: String,
    /// Report label only; quadra rows are found by tuple shape
    pub quadras_table: String,
    /// Report label only; property rows are found by tuple shape
    pub properties_table: String,
    pub seed_file: PathBuf,
    pub properties_file: PathBuf,
    pub quadra_label: LabelPattern,
    pub property_label: LabelPattern,
    pub known_projects: Vec<KnownProject>,
}

impl Default for IntegrityProfile {
    fn default() -> Self {
        Self {
            projects_table: "reurb_projects".to_string(),
            quadras_table: "reurb_quadras".to_string(),
            properties_table: "reurb_properties".to_string(),
            seed_file: PathBuf::from(DEFAULT_SEED_FILE),
            properties_file: PathBuf::from(DEFAULT_PROPERTIES_FILE),
            quadra_label: LabelPattern::Numeric,
            property_label: LabelPattern::Text,
            known_projects: vec![
                KnownProject::new("52b2eaac-a079-4e3a-90c7-cc6be700d8d1", "Marabaixo 1"),
                KnownProject::new("b9230dee-5a70-4710-a54b-0ac5154f554c", "Oiapoque"),
            ],
        }
    }
}

/// Complete YAML configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub convert: RewriteProfile,
    pub verify: IntegrityProfile,
}

impl ToolConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read config {}: {}", path.display(), e))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: ToolConfig = serde_yaml_ng::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.convert.batch_size == 0 {
            anyhow::bail!("convert.batch_size must be at least 1");
        }
        if self.convert.target.table.trim().is_empty() {
            anyhow::bail!("convert.target.table must not be empty");
        }
        if self.convert.target.columns.is_empty() {
            anyhow::bail!("convert.target.columns must list at least one column");
        }
        if self.verify.projects_table.trim().is_empty() {
            anyhow::bail!("verify.projects_table must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_lists_all_columns() {
        let header = TargetSchema::default().upsert_header();
        assert!(header.starts_with("INSERT OR REPLACE INTO reurb_properties (id, quadra_id, name,"));
        assert!(header.ends_with("possui_conflito, descricao_conflito) VALUES \n"));
        assert_eq!(REURB_PROPERTY_COLUMNS.len(), 24);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
convert:
  batch_size: 250
  file_prefix: "seed-properties-parte-"
verify:
  known_projects:
    - id: "00000000-0000-0000-0000-000000000001"
      name: "Laranjal"
"#;
        let config = ToolConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.convert.batch_size, 250);
        assert_eq!(config.convert.file_prefix, "seed-properties-parte-");
        assert_eq!(config.convert.target, TargetSchema::reurb_properties());
        assert_eq!(config.convert.schema_prefixes, vec!["public".to_string()]);
        assert_eq!(config.verify.projects_table, "reurb_projects");
        assert_eq!(config.verify.known_projects.len(), 1);
        assert_eq!(config.verify.known_projects[0].name, "Laranjal");
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = ToolConfig::from_yaml("convert:\n  batch_size: 0\n").unwrap_err();
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_label_pattern_from_yaml() {
        let config = ToolConfig::from_yaml("verify:\n  quadra_label: text\n").unwrap();
        assert_eq!(config.verify.quadra_label, LabelPattern::Text);
        assert_eq!(config.verify.property_label, LabelPattern::Text);
        assert!(ToolConfig::from_yaml("verify:\n  quadra_label: uuid\n").is_err());
    }

    #[test]
    fn test_defaults_round_trip_through_yaml() {
        let config = ToolConfig::default();
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let back = ToolConfig::from_yaml(&yaml).unwrap();
        assert_eq!(config, back);
    }
}
