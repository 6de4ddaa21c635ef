use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One ingested arXiv article. Enrichment fields stay null until an
/// enrichment run has been attempted for the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: i64,
    /// Natural key: the final path segment of the arXiv abstract URL.
    pub arxiv_id: String,
    pub title: String,
    /// Raw abstract with the arXiv announce prefix stripped.
    pub summary: String,
    /// First listed author only.
    pub authors: String,
    /// Source-provided timestamp string, empty if the feed had none.
    pub published: String,
    /// Derived from the feed source URL, not per-entry metadata.
    pub category: String,
    pub link: String,
    /// True once enrichment has been attempted, success or not.
    pub processed: bool,
    pub ai_summary: Option<String>,
    pub novelty_score: Option<i64>,
    pub relevance_score: Option<i64>,
    pub read_recommendation: Option<Recommendation>,
    pub viewed: bool,
    pub created_at: DateTime<Utc>,
}

impl Paper {
    /// Merge a freshly produced enrichment into the in-memory copy, mirroring
    /// what `Repository::update_paper_enrichment` wrote to the row.
    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.ai_summary = enrichment.ai_summary;
        self.novelty_score = enrichment.novelty_score;
        self.relevance_score = enrichment.relevance_score;
        self.read_recommendation = enrichment.read_recommendation;
        self.processed = true;
        self
    }
}

/// A normalized feed entry, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewPaper {
    pub arxiv_id: String,
    pub title: String,
    pub summary: String,
    pub authors: String,
    pub published: String,
    pub category: String,
    pub link: String,
}

/// Read recommendation as returned by the model. Anything outside these
/// three values is treated as absent rather than stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Yes,
    Maybe,
    No,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Yes => "Yes",
            Recommendation::Maybe => "Maybe",
            Recommendation::No => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Some(Recommendation::Yes),
            "maybe" => Some(Recommendation::Maybe),
            "no" => Some(Recommendation::No),
            _ => None,
        }
    }
}

/// Outcome of one enrichment attempt. All-absent is the degraded result
/// persisted when the external call fails outright.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub ai_summary: Option<String>,
    pub novelty_score: Option<i64>,
    pub relevance_score: Option<i64>,
    pub read_recommendation: Option<Recommendation>,
}

impl Enrichment {
    /// Marker result for a failed attempt: the paper still gets flagged as
    /// processed, with every enrichment field null.
    pub fn absent() -> Self {
        Self::default()
    }
}
