use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::{Enrichment, NewPaper, Paper, Recommendation, UserSettings};

use super::schema::SCHEMA;

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path).await?;
        Ok(Self { conn })
    }

    /// Create tables, apply forward-only migrations, seed the settings
    /// singleton, and repair the viewed flag. Safe to call on every start;
    /// the whole step runs in one transaction.
    pub async fn init(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                let tx = conn.transaction()?;

                tx.execute_batch(SCHEMA)?;

                // Migration for databases that predate the viewed column.
                match tx.execute(
                    "ALTER TABLE papers ADD COLUMN viewed INTEGER NOT NULL DEFAULT 0",
                    [],
                ) {
                    Ok(_) => tracing::info!("Added viewed column to papers table"),
                    Err(err) if err.to_string().contains("duplicate column name") => {}
                    Err(err) => return Err(err.into()),
                }

                tx.execute(
                    "INSERT OR IGNORE INTO user_settings (id, niche_interests, additional_params)
                     VALUES (1, '', '')",
                    [],
                )?;

                // Papers enriched before the viewed column existed count as read.
                tx.execute(
                    "UPDATE papers SET viewed = 1 WHERE ai_summary IS NOT NULL OR processed = 1",
                    [],
                )?;

                tx.commit()?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    // Paper operations

    /// Insert a paper keyed by arxiv_id. Re-ingesting an existing id is a
    /// silent no-op; the stored row is left untouched.
    pub async fn add_paper(&self, paper: NewPaper) -> Result<()> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"INSERT INTO papers (arxiv_id, title, summary, authors, published, category, link)
                       VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                       ON CONFLICT(arxiv_id) DO NOTHING"#,
                    params![
                        paper.arxiv_id,
                        paper.title,
                        paper.summary,
                        paper.authors,
                        paper.published,
                        paper.category,
                        paper.link,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Overwrite the enrichment fields and mark the row processed. A missing
    /// arxiv_id updates zero rows without error.
    pub async fn update_paper_enrichment(
        &self,
        arxiv_id: &str,
        enrichment: &Enrichment,
    ) -> Result<()> {
        let arxiv_id = arxiv_id.to_string();
        let enrichment = enrichment.clone();
        self.conn
            .call(move |conn| {
                conn.execute(
                    r#"UPDATE papers
                       SET ai_summary = ?1,
                           novelty_score = ?2,
                           relevance_score = ?3,
                           read_recommendation = ?4,
                           processed = 1
                       WHERE arxiv_id = ?5"#,
                    params![
                        enrichment.ai_summary,
                        enrichment.novelty_score,
                        enrichment.relevance_score,
                        enrichment.read_recommendation.map(|r| r.as_str()),
                        arxiv_id,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_latest_papers(&self, limit: i64) -> Result<Vec<Paper>> {
        let papers = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {PAPER_COLUMNS} FROM papers
                     ORDER BY created_at DESC, id DESC
                     LIMIT ?1",
                ))?;
                let papers = stmt
                    .query_map(params![limit], |row| Ok(paper_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(papers)
            })
            .await?;
        Ok(papers)
    }

    pub async fn get_paper_by_id(&self, id: i64) -> Result<Option<Paper>> {
        let paper = self
            .conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(&format!("SELECT {PAPER_COLUMNS} FROM papers WHERE id = ?1"))?;
                let paper = stmt
                    .query_row(params![id], |row| Ok(paper_from_row(row)))
                    .optional()?;
                Ok(paper)
            })
            .await?;
        Ok(paper)
    }

    pub async fn get_all_papers(&self) -> Result<Vec<Paper>> {
        let papers = self
            .conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {PAPER_COLUMNS} FROM papers"))?;
                let papers = stmt
                    .query_map([], |row| Ok(paper_from_row(row)))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(papers)
            })
            .await?;
        Ok(papers)
    }

    // Settings operations

    pub async fn get_user_settings(&self) -> Result<UserSettings> {
        let settings = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT niche_interests, additional_params FROM user_settings WHERE id = 1",
                )?;
                let settings = stmt
                    .query_row([], |row| {
                        Ok(UserSettings {
                            niche_interests: row.get(0)?,
                            additional_params: row.get(1)?,
                        })
                    })
                    .optional()?;
                Ok(settings.unwrap_or_default())
            })
            .await?;
        Ok(settings)
    }

    pub async fn update_user_settings(&self, niche: &str, params_text: &str) -> Result<()> {
        let niche = niche.to_string();
        let params_text = params_text.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE user_settings SET niche_interests = ?1, additional_params = ?2 WHERE id = 1",
                    params![niche, params_text],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}

const PAPER_COLUMNS: &str = "id, arxiv_id, title, summary, authors, published, category, link, \
                             processed, ai_summary, novelty_score, relevance_score, \
                             read_recommendation, viewed, created_at";

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    // Try RFC3339 first (e.g., "2026-01-11T12:34:56+00:00")
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Try SQLite datetime format (e.g., "2026-01-11 12:34:56")
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}

fn paper_from_row(row: &Row) -> Paper {
    Paper {
        id: row.get(0).unwrap(),
        arxiv_id: row.get(1).unwrap(),
        title: row.get(2).unwrap(),
        summary: row.get(3).unwrap(),
        authors: row.get(4).unwrap(),
        published: row.get(5).unwrap(),
        category: row.get(6).unwrap(),
        link: row.get(7).unwrap(),
        processed: row.get::<_, i64>(8).unwrap() != 0,
        ai_summary: row.get(9).unwrap(),
        novelty_score: row.get(10).unwrap(),
        relevance_score: row.get(11).unwrap(),
        read_recommendation: row
            .get::<_, Option<String>>(12)
            .unwrap()
            .as_deref()
            .and_then(Recommendation::parse),
        viewed: row.get::<_, i64>(13).unwrap() != 0,
        created_at: row
            .get::<_, String>(14)
            .ok()
            .and_then(|s| parse_datetime(&s))
            .unwrap_or_else(Utc::now),
    }
}
