use arxiv_digest::db::Repository;
use arxiv_digest::models::{Enrichment, NewPaper, Recommendation};
use tempfile::TempDir;

async fn scratch_repo() -> (TempDir, Repository) {
    let dir = TempDir::new().expect("temp dir");
    let db_path = dir.path().join("papers.db");
    let repo = Repository::open(db_path.to_str().unwrap())
        .await
        .expect("open db");
    repo.init().await.expect("init db");
    (dir, repo)
}

fn sample_paper(arxiv_id: &str) -> NewPaper {
    NewPaper {
        arxiv_id: arxiv_id.to_string(),
        title: format!("Paper {arxiv_id}"),
        summary: "An abstract.".to_string(),
        authors: "Jane Doe".to_string(),
        published: "Mon, 21 Oct 2024 07:28:00 +0000".to_string(),
        category: "cs.AI".to_string(),
        link: format!("https://arxiv.org/abs/{arxiv_id}"),
    }
}

#[tokio::test]
async fn init_is_idempotent() {
    let (_dir, repo) = scratch_repo().await;
    repo.init().await.expect("second init");
    repo.init().await.expect("third init");

    let settings = repo.get_user_settings().await.unwrap();
    assert_eq!(settings.niche_interests, "");
    assert_eq!(settings.additional_params, "");
}

#[tokio::test]
async fn duplicate_insert_is_a_silent_noop() {
    let (_dir, repo) = scratch_repo().await;

    repo.add_paper(sample_paper("2501.00001")).await.unwrap();

    let mut duplicate = sample_paper("2501.00001");
    duplicate.title = "Different title".to_string();
    repo.add_paper(duplicate).await.unwrap();

    let papers = repo.get_all_papers().await.unwrap();
    assert_eq!(papers.len(), 1);
    // First insert wins; the row is untouched by the second attempt.
    assert_eq!(papers[0].title, "Paper 2501.00001");
}

#[tokio::test]
async fn latest_papers_returns_most_recent_first() {
    let (_dir, repo) = scratch_repo().await;

    for i in 1..=5 {
        repo.add_paper(sample_paper(&format!("2501.0000{i}")))
            .await
            .unwrap();
    }

    let latest = repo.get_latest_papers(3).await.unwrap();
    assert_eq!(latest.len(), 3);
    assert_eq!(latest[0].arxiv_id, "2501.00005");
    assert_eq!(latest[1].arxiv_id, "2501.00004");
    assert_eq!(latest[2].arxiv_id, "2501.00003");
}

#[tokio::test]
async fn get_paper_by_id_signals_missing_rows() {
    let (_dir, repo) = scratch_repo().await;

    repo.add_paper(sample_paper("2501.00001")).await.unwrap();
    let papers = repo.get_all_papers().await.unwrap();
    let id = papers[0].id;

    let found = repo.get_paper_by_id(id).await.unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().arxiv_id, "2501.00001");

    let missing = repo.get_paper_by_id(id + 100).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn enrichment_update_sets_fields_and_processed_flag() {
    let (_dir, repo) = scratch_repo().await;

    repo.add_paper(sample_paper("2501.00001")).await.unwrap();

    let enrichment = Enrichment {
        ai_summary: Some("A concise verdict.".to_string()),
        novelty_score: Some(8),
        relevance_score: Some(9),
        read_recommendation: Some(Recommendation::Yes),
    };
    repo.update_paper_enrichment("2501.00001", &enrichment)
        .await
        .unwrap();

    let paper = repo.get_all_papers().await.unwrap().remove(0);
    assert!(paper.processed);
    assert_eq!(paper.ai_summary.as_deref(), Some("A concise verdict."));
    assert_eq!(paper.novelty_score, Some(8));
    assert_eq!(paper.relevance_score, Some(9));
    assert_eq!(paper.read_recommendation, Some(Recommendation::Yes));
}

#[tokio::test]
async fn enrichment_update_for_unknown_id_is_a_noop() {
    let (_dir, repo) = scratch_repo().await;

    repo.update_paper_enrichment("no-such-id", &Enrichment::absent())
        .await
        .expect("no error for missing row");

    assert!(repo.get_all_papers().await.unwrap().is_empty());
}

#[tokio::test]
async fn settings_default_then_update_keeps_a_single_row() {
    let (_dir, repo) = scratch_repo().await;

    let before = repo.get_user_settings().await.unwrap();
    assert_eq!(before.niche_interests, "");
    assert_eq!(before.additional_params, "");

    repo.update_user_settings("NLP", "Focus on efficiency")
        .await
        .unwrap();

    let after = repo.get_user_settings().await.unwrap();
    assert_eq!(after.niche_interests, "NLP");
    assert_eq!(after.additional_params, "Focus on efficiency");

    // The singleton must survive a re-init unchanged.
    repo.init().await.unwrap();
    let reread = repo.get_user_settings().await.unwrap();
    assert_eq!(reread.niche_interests, "NLP");
}

#[tokio::test]
async fn init_repair_marks_enriched_papers_as_viewed() {
    let (_dir, repo) = scratch_repo().await;

    repo.add_paper(sample_paper("2501.00001")).await.unwrap();
    repo.add_paper(sample_paper("2501.00002")).await.unwrap();
    repo.update_paper_enrichment("2501.00001", &Enrichment::absent())
        .await
        .unwrap();

    repo.init().await.unwrap();

    let mut papers = repo.get_all_papers().await.unwrap();
    papers.sort_by(|a, b| a.arxiv_id.cmp(&b.arxiv_id));
    assert!(papers[0].viewed, "processed paper should be marked viewed");
    assert!(!papers[1].viewed, "untouched paper stays unviewed");
}
