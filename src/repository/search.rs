//! Substring search across equipment, schedules, repairs and suppliers

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::search::{SearchHit, SearchKind},
};

#[derive(Clone)]
pub struct SearchRepository {
    pool: Pool<Postgres>,
}

/// Escape `%`, `_` and `\` so user input matches literally inside a LIKE pattern
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl SearchRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Case-insensitive substring match on the display text of each entity
    pub async fn search(&self, term: &str) -> AppResult<Vec<SearchHit>> {
        let pattern = format!("%{}%", escape_like(term));

        let rows: Vec<(i32, String, String)> = sqlx::query_as(
            r#"
            SELECT id, name, 'equipment' AS kind FROM equipments WHERE name ILIKE $1
            UNION ALL
            SELECT id, description, 'maintenance' FROM maintenance_schedules WHERE description ILIKE $1
            UNION ALL
            SELECT id, issue_description, 'repair' FROM repair_history WHERE issue_description ILIKE $1
            UNION ALL
            SELECT id, name, 'supplier' FROM suppliers WHERE name ILIKE $1
            "#,
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        let hits = rows
            .into_iter()
            .filter_map(|(id, name, kind)| {
                let kind = match kind.as_str() {
                    "equipment" => SearchKind::Equipment,
                    "maintenance" => SearchKind::Maintenance,
                    "repair" => SearchKind::Repair,
                    "supplier" => SearchKind::Supplier,
                    _ => return None,
                };
                Some(SearchHit { id, name, kind })
            })
            .collect();

        Ok(hits)
    }
}
