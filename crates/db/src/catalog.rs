//! SQL-backed [`Catalog`] over the `contents` and `episodes` tables.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use watchparty_core::catalog::{Catalog, CatalogEntry};
use watchparty_core::error::CoreError;
use watchparty_core::watch_party::{ContentRef, ContentType};

#[derive(Debug, FromRow)]
struct EpisodeTitleRow {
    series_title: String,
    season_number: i32,
    episode_number: i32,
    episode_title: String,
}

/// Format an episode title as `"Show - S01E03 - Pilot"`.
fn episode_title(row: &EpisodeTitleRow) -> String {
    format!(
        "{} - S{:02}E{:02} - {}",
        row.series_title, row.season_number, row.episode_number, row.episode_title
    )
}

/// Resolves content references against the catalog tables in the same
/// database as the watch party tables.
#[derive(Debug, Clone)]
pub struct SqlCatalog {
    pool: PgPool,
}

impl SqlCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for SqlCatalog {
    async fn resolve(&self, content: &ContentRef) -> Result<Option<CatalogEntry>, CoreError> {
        let title = match (content.content_type, content.episode_id) {
            (ContentType::Movie, _) => sqlx::query_scalar::<_, String>(
                "SELECT title FROM contents WHERE id = $1 AND content_type = 'movie'",
            )
            .bind(content.content_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(catalog_error)?,
            (ContentType::Series, Some(episode_id)) => sqlx::query_as::<_, EpisodeTitleRow>(
                "SELECT c.title AS series_title, e.season_number, e.episode_number, \
                        e.title AS episode_title \
                 FROM episodes e \
                 JOIN contents c ON c.id = e.content_id \
                 WHERE e.id = $1 AND c.id = $2 AND c.content_type = 'series'",
            )
            .bind(episode_id)
            .bind(content.content_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(catalog_error)?
            .map(|row| episode_title(&row)),
            (ContentType::Series, None) => None,
        };

        Ok(title.map(|title| CatalogEntry { title }))
    }
}

fn catalog_error(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Catalog lookup failed");
    CoreError::Internal(format!("Catalog lookup failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_title_format() {
        let row = EpisodeTitleRow {
            series_title: "Night Shift".to_string(),
            season_number: 1,
            episode_number: 3,
            episode_title: "Pilot".to_string(),
        };
        assert_eq!(episode_title(&row), "Night Shift - S01E03 - Pilot");
    }
}
