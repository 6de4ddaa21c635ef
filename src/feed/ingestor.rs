use feed_rs::parser;
use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::db::Repository;
use crate::error::Result;
use crate::models::{NewPaper, Paper};

/// An author entry as syndication sources expose it: either a structured
/// record carrying a name, or a bare name string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AuthorEntry {
    Named { name: String },
    Bare(String),
}

pub struct FeedIngestor {
    client: Client,
}

impl FeedIngestor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch every configured source, normalize entries, and insert the new
    /// ones. A source that fails to fetch or parse is logged and skipped;
    /// so is an entry that fails to insert. Returns the store's latest view
    /// as confirmation.
    pub async fn ingest(
        &self,
        repo: &Repository,
        feed_urls: &[String],
        limit: usize,
    ) -> Result<Vec<Paper>> {
        let fetched: Vec<(String, Result<Vec<NewPaper>>)> = stream::iter(feed_urls.iter().cloned())
            .map(|url| async move {
                let result = self.fetch_source(&url, limit).await;
                (url, result)
            })
            .buffer_unordered(3) // Max 3 concurrent fetches
            .collect()
            .await;

        for (url, result) in fetched {
            match result {
                Ok(papers) => {
                    tracing::debug!("Fetched {} entries from {}", papers.len(), url);
                    for paper in papers {
                        let arxiv_id = paper.arxiv_id.clone();
                        if let Err(e) = repo.add_paper(paper).await {
                            tracing::error!("Failed to store paper {}: {}", arxiv_id, e);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch feed {}: {}", url, e);
                }
            }
        }

        repo.get_latest_papers(limit as i64).await
    }

    async fn fetch_source(&self, url: &str, limit: usize) -> Result<Vec<NewPaper>> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!("Failed to fetch feed: HTTP {}", response.status()).into());
        }

        let bytes = response.bytes().await?;
        let feed = parser::parse(&bytes[..])?;

        // Category comes from the source URL, not per-entry metadata.
        let category = last_path_segment(url);

        let papers = feed
            .entries
            .into_iter()
            .take(limit)
            .map(|entry| {
                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.clone())
                    .unwrap_or_default();
                let authors: Vec<AuthorEntry> = entry
                    .authors
                    .into_iter()
                    .map(|person| AuthorEntry::Named { name: person.name })
                    .collect();

                NewPaper {
                    arxiv_id: last_path_segment(&link),
                    title: entry.title.map(|t| t.content).unwrap_or_default(),
                    summary: clean_summary(
                        entry
                            .summary
                            .as_ref()
                            .map(|s| s.content.as_str())
                            .unwrap_or_default(),
                    ),
                    authors: first_author(&authors),
                    published: entry
                        .published
                        .map(|dt| dt.to_rfc2822())
                        .unwrap_or_default(),
                    category: category.clone(),
                    link,
                }
            })
            .collect();

        Ok(papers)
    }
}

/// Final path segment of a URL: the arxiv_id for an abstract link, the
/// category tag for a feed source URL.
pub fn last_path_segment(url: &str) -> String {
    url.rsplit('/').next().unwrap_or_default().to_string()
}

/// Strip the arXiv announce boilerplate from an abstract:
/// `arXiv:<id> Announce Type: <word>` and an optional `Abstract:` line.
/// Text without the prefix passes through trimmed.
pub fn clean_summary(summary: &str) -> String {
    let re = match Regex::new(r"(?i)^arXiv:\S+\s+Announce Type:\s+\w+\s*(?:Abstract:\s*)?") {
        Ok(re) => re,
        Err(_) => return summary.trim().to_string(),
    };
    re.replace(summary, "").trim().to_string()
}

/// Reduce an author list to a single display string: the first author's
/// trimmed name, or empty when the list is empty.
pub fn first_author(authors: &[AuthorEntry]) -> String {
    match authors.first() {
        Some(AuthorEntry::Named { name }) => name.trim().to_string(),
        Some(AuthorEntry::Bare(name)) => name.trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_summary_strips_announce_prefix() {
        let input = "arXiv:1234.5678 Announce Type: new\nAbstract: Foo bar.";
        assert_eq!(clean_summary(input), "Foo bar.");
    }

    #[test]
    fn clean_summary_strips_prefix_without_abstract_line() {
        let input = "arXiv:2501.00001 Announce Type: cross\nWe study things.";
        assert_eq!(clean_summary(input), "We study things.");
    }

    #[test]
    fn clean_summary_is_case_insensitive() {
        let input = "ARXIV:1234.5678 ANNOUNCE TYPE: replace\nABSTRACT: Result text.";
        assert_eq!(clean_summary(input), "Result text.");
    }

    #[test]
    fn clean_summary_passes_through_unprefixed_text() {
        assert_eq!(clean_summary("  Plain abstract text.  "), "Plain abstract text.");
        assert_eq!(clean_summary(""), "");
    }

    #[test]
    fn first_author_handles_named_entry() {
        let authors: Vec<AuthorEntry> =
            serde_json::from_value(serde_json::json!([{"name": "Jane Doe"}])).unwrap();
        assert_eq!(first_author(&authors), "Jane Doe");
    }

    #[test]
    fn first_author_handles_bare_string() {
        let authors: Vec<AuthorEntry> =
            serde_json::from_value(serde_json::json!(["Jane Doe"])).unwrap();
        assert_eq!(first_author(&authors), "Jane Doe");
    }

    #[test]
    fn first_author_empty_list_yields_empty_string() {
        assert_eq!(first_author(&[]), "");
    }

    #[test]
    fn first_author_takes_first_of_many() {
        let authors: Vec<AuthorEntry> = serde_json::from_value(serde_json::json!([
            {"name": "  First Author "},
            {"name": "Second Author"}
        ]))
        .unwrap();
        assert_eq!(first_author(&authors), "First Author");
    }

    #[test]
    fn last_path_segment_extracts_id_and_category() {
        assert_eq!(last_path_segment("https://arxiv.org/abs/2501.12345"), "2501.12345");
        assert_eq!(last_path_segment("https://arxiv.org/rss/cs.AI"), "cs.AI");
    }
}
