pub const SCHEMA: &str = r#"
-- papers table
CREATE TABLE IF NOT EXISTS papers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    arxiv_id TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    summary TEXT NOT NULL,
    authors TEXT NOT NULL,
    published TEXT NOT NULL,
    category TEXT NOT NULL,
    link TEXT NOT NULL,
    processed INTEGER NOT NULL DEFAULT 0,
    ai_summary TEXT,
    novelty_score INTEGER,
    relevance_score INTEGER,
    read_recommendation TEXT,
    viewed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_papers_arxiv_id ON papers(arxiv_id);
CREATE INDEX IF NOT EXISTS idx_papers_created_at ON papers(created_at DESC);

-- user_settings table (singleton row, id fixed at 1)
CREATE TABLE IF NOT EXISTS user_settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    niche_interests TEXT NOT NULL DEFAULT '',
    additional_params TEXT NOT NULL DEFAULT ''
);
"#;
