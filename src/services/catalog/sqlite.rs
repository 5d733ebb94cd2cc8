//! SQLite catalog source
//!
//! Reads the database produced by the ingestion pipeline: one table per part
//! type (`cpu`, `motherboard`, `video_card`, ...), each holding at least
//! `name`, `price` and `score` columns, plus `socket` for CPUs and
//! motherboards. Values are read as text because the tables are written
//! straight from scraped CSV files and SQLite keeps whatever type it was given.

use sqlx::{Row, SqlitePool};

use super::{socket::infer_cpu_socket, CatalogSource};
use crate::{
    error::AppResult,
    models::{Part, PartType},
};

#[derive(Clone)]
pub struct SqliteCatalogSource {
    pool: SqlitePool,
}

/// Raw, unparsed catalog row
struct RawRow {
    name: Option<String>,
    price: Option<String>,
    score: Option<String>,
    socket: Option<String>,
}

impl SqliteCatalogSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Column names of a table, empty when the table does not exist
    async fn table_columns(&self, table: &str) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT name FROM pragma_table_info(?)")
            .bind(table)
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(Into::into))
            .collect()
    }

    async fn fetch_table(&self, part_type: PartType) -> AppResult<Vec<Part>> {
        let table = part_type.as_str();
        let columns = self.table_columns(table).await?;

        if columns.is_empty() {
            tracing::warn!(table = %table, "Catalog table not found, skipping");
            return Ok(Vec::new());
        }

        for required in ["name", "price"] {
            if !columns.iter().any(|c| c == required) {
                tracing::warn!(
                    table = %table,
                    column = %required,
                    "Catalog table is missing a required column, skipping"
                );
                return Ok(Vec::new());
            }
        }

        let has = |column: &str| columns.iter().any(|c| c == column);
        let score_expr = if has("score") { "CAST(score AS TEXT)" } else { "NULL" };
        let socket_expr = if part_type.has_socket() && has("socket") {
            "CAST(socket AS TEXT)"
        } else {
            "NULL"
        };

        // Table names come from the closed PartType enumeration
        let sql = format!(
            r#"
            SELECT CAST(name AS TEXT) AS name,
                   CAST(price AS TEXT) AS price,
                   {score_expr} AS score,
                   {socket_expr} AS socket
            FROM "{table}"
            ORDER BY rowid
            "#
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut parts = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;

        for row in &rows {
            let raw = RawRow {
                name: row.try_get("name")?,
                price: row.try_get("price")?,
                score: row.try_get("score")?,
                socket: row.try_get("socket")?,
            };

            match parse_row(part_type, raw) {
                Some(part) => parts.push(part),
                None => skipped += 1,
            }
        }

        tracing::info!(
            table = %table,
            loaded = parts.len(),
            skipped,
            "Loaded catalog table"
        );

        Ok(parts)
    }
}

#[async_trait::async_trait]
impl CatalogSource for SqliteCatalogSource {
    async fn fetch_parts(&self) -> AppResult<Vec<Part>> {
        let mut parts = Vec::new();
        for part_type in PartType::ESSENTIAL {
            parts.extend(self.fetch_table(part_type).await?);
        }
        Ok(parts)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}

/// Parses a currency string such as `"$1,299.99"`
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();

    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

fn parse_row(part_type: PartType, raw: RawRow) -> Option<Part> {
    let name = raw.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    let Some(name) = name else {
        tracing::debug!(part_type = %part_type, "Skipping row without a name");
        return None;
    };

    let Some(price) = raw.price.as_deref().and_then(parse_price) else {
        tracing::debug!(part_type = %part_type, name = %name, "Skipping row without a valid price");
        return None;
    };

    // Parts without a benchmark are ranked by price
    let score = match raw.score.as_deref() {
        None => price,
        Some(s) => match parse_price(s) {
            Some(score) => score,
            None => {
                tracing::debug!(part_type = %part_type, name = %name, "Skipping row with an invalid score");
                return None;
            }
        },
    };

    let socket = raw
        .socket
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| match part_type {
            PartType::Cpu => infer_cpu_socket(&name).map(str::to_string),
            _ => None,
        });

    Some(Part {
        part_type,
        name,
        price,
        score,
        socket,
    })
}
