//! SQL rendering for generated fixtures.
//!
//! Three outputs:
//! - a Supabase-style Postgres dump of `reurb_properties` (quoted `"public".`
//!   prefix, `ARRAY[...]` literals, `'true'`/`'false'` booleans)
//! - `seed.sql` with project and quadra inserts
//! - `seed-properties.sql` with property inserts

use crate::generator::{Property, ReurbData};
use std::fmt::Write as _;
use std::io::{self, Write};

pub const PROPERTY_COLUMNS: &[&str] = &[
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

/// Rendering options
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Rows per INSERT statement in the seed files
    pub rows_per_insert: usize,
    /// Header comment at the top of each file
    pub header: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rows_per_insert: 50,
            header: true,
        }
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Supabase export: one INSERT carrying every property row.
    pub fn render_supabase_dump<W: Write>(&self, data: &ReurbData, w: &mut W) -> io::Result<()> {
        if self.config.header {
            writeln!(w, "-- Supabase export of public.reurb_properties")?;
            writeln!(w)?;
        }

        let columns: Vec<String> = PROPERTY_COLUMNS.iter().map(|c| format!("\"{}\"", c)).collect();
        writeln!(
            w,
            "INSERT INTO \"public\".\"reurb_properties\" ({}) VALUES",
            columns.join(", ")
        )?;

        let rows: Vec<String> = data.properties.iter().map(supabase_row).collect();
        writeln!(w, "{};", rows.join(", "))?;
        Ok(())
    }

    /// `seed.sql`: projects, then quadras.
    pub fn render_seed<W: Write>(&self, data: &ReurbData, w: &mut W) -> io::Result<()> {
        if self.config.header {
            writeln!(w, "-- REURB seed: projects and quadras")?;
            writeln!(w)?;
        }

        for project in &data.projects {
            writeln!(
                w,
                "INSERT INTO reurb_projects (id, name, description, status, created_at) VALUES ('{}', {}, {}, 'active', '{}');",
                project.id,
                quote(&project.name),
                quote(&project.description),
                project.created_at
            )?;
        }
        writeln!(w)?;

        let rows: Vec<String> = data
            .quadras
            .iter()
            .map(|q| {
                format!(
                    "('{}', '{}', '{}', {}, '{}')",
                    q.id, q.project_id, q.number, q.area, q.created_at
                )
            })
            .collect();
        self.write_batched(
            w,
            "INSERT INTO reurb_quadras (id, project_id, name, area, created_at) VALUES",
            &rows,
        )
    }

    /// `seed-properties.sql`: property rows in SQLite form.
    pub fn render_seed_properties<W: Write>(&self, data: &ReurbData, w: &mut W) -> io::Result<()> {
        if self.config.header {
            writeln!(w, "-- REURB seed: properties")?;
            writeln!(w)?;
        }

        let rows: Vec<String> = data.properties.iter().map(sqlite_row).collect();
        let header = format!(
            "INSERT OR REPLACE INTO reurb_properties ({}) VALUES",
            PROPERTY_COLUMNS.join(", ")
        );
        self.write_batched(w, &header, &rows)
    }

    pub fn render_to_string(
        &self,
        data: &ReurbData,
        f: fn(&Self, &ReurbData, &mut Vec<u8>) -> io::Result<()>,
    ) -> io::Result<String> {
        let mut buf = Vec::new();
        f(self, data, &mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_batched<W: Write>(&self, w: &mut W, header: &str, rows: &[String]) -> io::Result<()> {
        for chunk in rows.chunks(self.config.rows_per_insert.max(1)) {
            writeln!(w, "{}", header)?;
            writeln!(w, "{};", chunk.join(",\n"))?;
            writeln!(w)?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn quote_opt(s: &Option<String>) -> String {
    s.as_deref().map(quote).unwrap_or_else(|| "NULL".to_string())
}

fn pg_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| quote(s)).collect();
    format!("ARRAY[{}]", quoted.join(","))
}

fn json_array(items: &[String]) -> String {
    let mut out = String::from("'[");
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "\"{}\"", item.replace('\'', "''"));
    }
    out.push_str("]'");
    out
}

/// Postgres literal forms for one property
fn supabase_row(p: &Property) -> String {
    row(p, pg_array, |b| quote(if b { "true" } else { "false" }))
}

/// SQLite literal forms for one property
fn sqlite_row(p: &Property) -> String {
    row(p, json_array, |b| if b { "1" } else { "0" }.to_string())
}

fn row(
    p: &Property,
    array: fn(&[String]) -> String,
    boolean: impl Fn(bool) -> String,
) -> String {
    let documents: Vec<String> = p
        .documentos_comprobatorios
        .iter()
        .map(|d| d.to_string())
        .collect();

    let values = [
        quote(&p.id),
        quote(&p.quadra_id),
        quote(&p.name),
        p.area.to_string(),
        quote(&p.description),
        p.latitude.to_string(),
        p.longitude.to_string(),
        quote(p.status),
        array(&p.images),
        quote(&p.created_at),
        quote(&p.updated_at),
        quote(&p.address),
        quote(p.tipo_posse),
        quote(p.situacao_fundiaria),
        array(&documents),
        quote(&p.historico_ocupacao),
        quote_opt(&p.restricoes_ambientais),
        quote(p.situacao_cadastral),
        p.area_terreno.to_string(),
        p.area_construida.to_string(),
        quote_opt(&p.matricula_imovel),
        quote(&p.data_ocupacao),
        boolean(p.possui_conflito),
        quote_opt(&p.descricao_conflito),
    ];
    format!("({})", values.join(", "))
}
