//! Integration tests for the verify command.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use test_data_gen::{Generator, OrphanConfig, RenderConfig, Renderer, Scale};

fn reurb_seed() -> Command {
    Command::new(env!("CARGO_BIN_EXE_reurb-seed"))
}

const P1: &str = "52b2eaac-a079-4e3a-90c7-cc6be700d8d1";
const P2: &str = "b9230dee-5a70-4710-a54b-0ac5154f554c";
const MISSING: &str = "99999999-9999-4999-8999-999999999999";
const Q1: &str = "11111111-1111-4111-8111-111111111111";
const Q2: &str = "22222222-2222-4222-8222-222222222222";
const R1: &str = "33333333-3333-4333-8333-333333333333";
const R2: &str = "44444444-4444-4444-8444-444444444444";

fn write_seeds(dir: &Path, seed: &str, properties: &str) {
    fs::write(dir.join("seed.sql"), seed).unwrap();
    fs::write(dir.join("seed-properties.sql"), properties).unwrap();
}

fn seed_sql(quadra_two_project: &str) -> String {
    format!(
        "INSERT INTO reurb_projects (id, name) VALUES ('{P1}', 'Marabaixo 1');\n\
         INSERT INTO reurb_projects (id, name) VALUES ('{P2}', 'Oiapoque');\n\
         INSERT INTO reurb_quadras (id, project_id, name) VALUES\n\
         ('{Q1}', '{P1}', '1'),\n\
         ('{Q2}', '{quadra_two_project}', '2');\n"
    )
}

fn properties_sql(second_quadra: &str) -> String {
    format!(
        "INSERT OR REPLACE INTO reurb_properties (id, quadra_id, name) VALUES\n\
         ('{R1}', '{Q1}', 'Lote 01'),\n\
         ('{R2}', '{second_quadra}', 'Lote 02');\n"
    )
}

fn verify(dir: &Path, extra: &[&str]) -> std::process::Output {
    let mut args = vec!["verify", "--dir", dir.to_str().unwrap()];
    args.extend_from_slice(extra);
    reurb_seed().args(args).output().unwrap()
}

#[test]
fn test_verify_clean_seeds_pass() {
    let temp_dir = TempDir::new().unwrap();
    write_seeds(temp_dir.path(), &seed_sql(P2), &properties_sql(Q2));

    let output = verify(temp_dir.path(), &[]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total: 2 project(s)"));
    assert!(stdout.contains("Total: 2 quadra(s)"));
    assert!(stdout.contains("Total: 2 property(ies)"));
    assert!(stdout.contains("reurb_projects → reurb_quadras: OK (2 reference(s))"));
    assert!(stdout.contains("reurb_quadras → reurb_properties: OK (2 reference(s))"));
    assert!(stdout.contains("INTEGRITY VERIFIED"));
}

#[test]
fn test_verify_orphaned_quadra_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    write_seeds(temp_dir.path(), &seed_sql(MISSING), &properties_sql(Q2));

    let output = verify(temp_dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ORPHANED ROWS: 1"));
    assert!(stdout.contains(MISSING));
    assert!(stdout.contains("PROBLEMS FOUND: 1"));
    assert!(stdout.contains("- reurb_quadras: 1 orphan(s)"));
    assert!(stdout.contains("- reurb_properties: 0 orphan(s)"));
}

#[test]
fn test_verify_orphaned_property_exits_1() {
    let temp_dir = TempDir::new().unwrap();
    write_seeds(temp_dir.path(), &seed_sql(P2), &properties_sql(MISSING));

    let output = verify(temp_dir.path(), &["--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["passed"], false);
    assert_eq!(report["total_issues"], 1);
    assert_eq!(report["properties"]["orphans"][0]["id"], R2);
    assert_eq!(report["properties"]["orphans"][0]["missing_parent"], MISSING);
    assert_eq!(report["quadras"]["status"], "ok");
}

#[test]
fn test_verify_missing_file_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("seed.sql"), seed_sql(P2)).unwrap();

    let output = verify(temp_dir.path(), &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seed-properties.sql"), "stderr: {}", stderr);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("SUMMARY"));
}

#[test]
fn test_verify_custom_file_names() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.sql"), seed_sql(P2)).unwrap();
    fs::write(temp_dir.path().join("b.sql"), properties_sql(Q1)).unwrap();

    let output = verify(
        temp_dir.path(),
        &["--seed", "a.sql", "--properties", "b.sql"],
    );
    assert!(output.status.success(), "Command failed: {:?}", output);
}

#[test]
fn test_verify_writes_markdown_report() {
    let temp_dir = TempDir::new().unwrap();
    write_seeds(temp_dir.path(), &seed_sql(P2), &properties_sql(Q1));
    let report_path = temp_dir.path().join("INTEGRITY_REPORT.md");

    let output = verify(
        temp_dir.path(),
        &["--report", report_path.to_str().unwrap()],
    );
    assert!(output.status.success(), "Command failed: {:?}", output);

    let md = fs::read_to_string(&report_path).unwrap();
    assert!(md.contains("# Database Integrity Report"));
    assert!(md.contains("**Result: PASSED**"));
    assert!(md.contains("| Marabaixo 1 |"));
    assert!(md.contains("| reurb_quadras → reurb_properties | 2 | OK |"));
    assert!(md.contains("## Properties per quadra"));
}

#[test]
fn test_verify_known_projects_from_config() {
    let temp_dir = TempDir::new().unwrap();
    write_seeds(temp_dir.path(), &seed_sql(P2), &properties_sql(Q1));
    let config = temp_dir.path().join("reurb.yaml");
    fs::write(
        &config,
        format!("verify:\n  known_projects:\n    - id: \"{P2}\"\n      name: \"Oiapoque Norte\"\n"),
    )
    .unwrap();

    let output = verify(temp_dir.path(), &["-c", config.to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let known = report["known_projects"].as_array().unwrap();
    assert_eq!(known.len(), 1);
    assert_eq!(known[0]["name"], "Oiapoque Norte");
    assert_eq!(known[0]["quadras"], 1);
}

// Tests with test_data_gen fixtures

fn generated_seeds(dir: &Path, orphans: OrphanConfig) {
    let data = Generator::new(42, Scale::Small).generate_with_orphans(orphans);
    let renderer = Renderer::new(RenderConfig::default());
    let seed = renderer.render_to_string(&data, Renderer::render_seed).unwrap();
    let props = renderer
        .render_to_string(&data, Renderer::render_seed_properties)
        .unwrap();
    write_seeds(dir, &seed, &props);
}

#[test]
fn test_verify_generated_fixtures_pass() {
    let temp_dir = TempDir::new().unwrap();
    generated_seeds(temp_dir.path(), OrphanConfig::default());

    let output = verify(temp_dir.path(), &["--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["projects"]["count"], 2);
    assert_eq!(report["quadras"]["count"], 6);
    assert_eq!(report["properties"]["count"], 60);
    assert_eq!(report["known_projects"][0]["properties"], 30);
}

#[test]
fn test_verify_generated_fixtures_with_orphans() {
    let temp_dir = TempDir::new().unwrap();
    generated_seeds(
        temp_dir.path(),
        OrphanConfig {
            quadras: 2,
            properties: 3,
        },
    );

    let output = verify(temp_dir.path(), &["--json"]);
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["quadras"]["orphans"].as_array().unwrap().len(), 2);
    assert_eq!(report["properties"]["orphans"].as_array().unwrap().len(), 3);
    assert_eq!(report["total_issues"], 5);
}
