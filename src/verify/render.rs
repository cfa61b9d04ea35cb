//! Text and Markdown renderings of an [`IntegrityReport`].

use super::{IntegrityReport, LevelSummary};
use std::io::{self, Write};

const RULE: &str = "======================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------------";

/// Console report, one section per table followed by a summary.
pub fn render_text(report: &IntegrityReport, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", RULE)?;
    writeln!(out, "INTEGRITY CHECK")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out)?;

    writeln!(out, "TABLE: {}", report.projects.table)?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "  Total: {} project(s)", report.projects.count)?;
    for known in &report.known_projects {
        let mark = if known.present { "✓" } else { "✗" };
        writeln!(out, "    {} {} = {}", mark, known.id, known.name)?;
    }
    writeln!(out)?;

    render_level_text(out, &report.quadras, "quadra(s)", "projects")?;
    for known in report.known_projects.iter().filter(|k| k.present) {
        writeln!(out, "    - {}: {} quadra(s)", known.name, known.quadras)?;
    }
    writeln!(out)?;

    render_level_text(out, &report.properties, "property(ies)", "quadras")?;
    for known in report.known_projects.iter().filter(|k| k.present) {
        writeln!(out, "    - {}: {} property(ies)", known.name, known.properties)?;
    }
    writeln!(out)?;

    writeln!(out, "RELATIONSHIPS")?;
    writeln!(out, "{}", THIN_RULE)?;
    for level in [&report.quadras, &report.properties] {
        writeln!(
            out,
            "  {} → {}: {} ({} reference(s))",
            level.parent_table, level.table, level.status, level.references
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "SUMMARY")?;
    writeln!(out, "{}", RULE)?;
    if report.passed {
        writeln!(out, "✓ INTEGRITY VERIFIED: all relationships are valid")?;
    } else {
        writeln!(out, "✗ PROBLEMS FOUND: {} orphaned record(s)", report.total_issues)?;
        for level in [&report.quadras, &report.properties] {
            writeln!(out, "    - {}: {} orphan(s)", level.table, level.orphans.len())?;
        }
    }
    writeln!(out, "{}", RULE)?;
    Ok(())
}

fn render_level_text(
    out: &mut dyn Write,
    level: &LevelSummary,
    unit: &str,
    parent_noun: &str,
) -> io::Result<()> {
    writeln!(out, "TABLE: {}", level.table)?;
    writeln!(out, "{}", THIN_RULE)?;
    writeln!(out, "  Total: {} {}", level.count, unit)?;

    if level.orphans.is_empty() {
        writeln!(out, "  ✓ All rows point to valid {}", parent_noun)?;
    } else {
        writeln!(out, "  ⚠ ORPHANED ROWS: {}", level.orphans.len())?;
        for orphan in &level.orphans {
            writeln!(
                out,
                "      - {} ({}) -> missing {}",
                orphan.id, orphan.label, orphan.missing_parent
            )?;
        }
    }

    if level.reassigned > 0 {
        writeln!(
            out,
            "  Note: {} repeated id(s); the last occurrence was kept",
            level.reassigned
        )?;
    }
    Ok(())
}

/// Markdown document suitable for `INTEGRITY_REPORT.md`.
pub fn render_markdown(
    report: &IntegrityReport,
    generated_at: &str,
    out: &mut dyn Write,
) -> io::Result<()> {
    writeln!(out, "# Database Integrity Report")?;
    writeln!(out)?;
    writeln!(out, "Generated: {}", generated_at)?;
    writeln!(out)?;

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| Table | Rows | Orphans | Status |")?;
    writeln!(out, "|-------|------|---------|--------|")?;
    writeln!(
        out,
        "| {} | {} | - | OK |",
        report.projects.table, report.projects.count
    )?;
    for level in [&report.quadras, &report.properties] {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            level.table,
            level.count,
            level.orphans.len(),
            level.status
        )?;
    }
    writeln!(out)?;
    if report.passed {
        writeln!(out, "**Result: PASSED**, all relationships are valid.")?;
    } else {
        let per_level: Vec<String> = [&report.quadras, &report.properties]
            .iter()
            .map(|level| format!("{} in {}", level.orphans.len(), level.table))
            .collect();
        writeln!(
            out,
            "**Result: FAILED**, {} orphaned record(s) ({}).",
            report.total_issues,
            per_level.join(", ")
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Relationships")?;
    writeln!(out)?;
    writeln!(out, "| Relationship | References | Status |")?;
    writeln!(out, "|--------------|------------|--------|")?;
    for level in [&report.quadras, &report.properties] {
        writeln!(
            out,
            "| {} → {} | {} | {} |",
            level.parent_table, level.table, level.references, level.status
        )?;
    }
    writeln!(out)?;

    if !report.known_projects.is_empty() {
        writeln!(out, "## Projects")?;
        writeln!(out)?;
        writeln!(out, "| Project | ID | Present | Quadras | Properties |")?;
        writeln!(out, "|---------|----|---------|---------|------------|")?;
        for known in &report.known_projects {
            writeln!(
                out,
                "| {} | `{}` | {} | {} | {} |",
                known.name,
                known.id,
                if known.present { "yes" } else { "no" },
                known.quadras,
                known.properties
            )?;
        }
        writeln!(out)?;
    }

    for level in [&report.quadras, &report.properties] {
        if level.orphans.is_empty() {
            continue;
        }
        writeln!(out, "## Orphans in {}", level.table)?;
        writeln!(out)?;
        writeln!(out, "| ID | Label | Missing {} |", level.parent_table)?;
        writeln!(out, "|----|-------|---------|")?;
        for orphan in &level.orphans {
            writeln!(
                out,
                "| `{}` | {} | `{}` |",
                orphan.id, orphan.label, orphan.missing_parent
            )?;
        }
        writeln!(out)?;
    }

    if !report.properties_per_quadra.is_empty() {
        writeln!(out, "## Properties per quadra")?;
        writeln!(out)?;
        writeln!(out, "| Quadra | ID | Properties |")?;
        writeln!(out, "|--------|----|------------|")?;
        for row in &report.properties_per_quadra {
            writeln!(
                out,
                "| {} | `{}` | {} |",
                row.label, row.quadra_id, row.properties
            )?;
        }
        writeln!(out)?;
    }

    Ok(())
}
