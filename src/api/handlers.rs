//! HTTP request handlers.
//!
//! Thin pass-through layer: each handler invokes one core operation and
//! translates its result into a status code and JSON body.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::AppError;
use crate::models::UserSettings;

use super::server::AppContext;

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    status: u16,
    message: String,
}

impl StatusMessage {
    fn new(status: u16, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    pub id: Option<i64>,
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusMessage::new(500, "Internal server error")),
    )
        .into_response()
}

pub async fn get_latest_papers(
    State(ctx): State<AppContext>,
    Query(query): Query<LatestQuery>,
) -> Response {
    let limit = query.limit.unwrap_or(10);
    match ctx.repo.get_latest_papers(limit).await {
        Ok(papers) => Json(papers).into_response(),
        Err(e) => {
            error!("Failed to list latest papers: {}", e);
            internal_error()
        }
    }
}

pub async fn get_paper(State(ctx): State<AppContext>, Path(id): Path<i64>) -> Response {
    match ctx.repo.get_paper_by_id(id).await {
        Ok(Some(paper)) => Json(paper).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(StatusMessage::new(404, "Paper not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to fetch paper {}: {}", id, e);
            internal_error()
        }
    }
}

pub async fn get_all_papers(State(ctx): State<AppContext>) -> Response {
    match ctx.repo.get_all_papers().await {
        Ok(papers) => Json(papers).into_response(),
        Err(e) => {
            error!("Failed to list papers: {}", e);
            internal_error()
        }
    }
}

pub async fn summarize_paper(
    State(ctx): State<AppContext>,
    Json(request): Json<SummarizeRequest>,
) -> Response {
    let Some(id) = request.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(StatusMessage::new(400, "No paper in request body")),
        )
            .into_response();
    };

    match ctx.enricher.enrich(&ctx.repo, id).await {
        Ok(paper) => Json(paper).into_response(),
        Err(AppError::PaperNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(StatusMessage::new(404, "Paper not found")),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to summarize paper {}: {}", id, e);
            internal_error()
        }
    }
}

pub async fn update_papers(State(ctx): State<AppContext>) -> Response {
    match ctx
        .ingestor
        .ingest(&ctx.repo, &ctx.feed_urls, ctx.fetch_limit)
        .await
    {
        Ok(papers) => Json(papers).into_response(),
        Err(e) => {
            error!("Something went wrong with updating papers: {}", e);
            internal_error()
        }
    }
}

pub async fn get_user_settings(State(ctx): State<AppContext>) -> Response {
    match ctx.repo.get_user_settings().await {
        Ok(settings) => Json(settings).into_response(),
        Err(e) => {
            error!("Failed to read user settings: {}", e);
            internal_error()
        }
    }
}

pub async fn update_user_settings(
    State(ctx): State<AppContext>,
    Json(settings): Json<UserSettings>,
) -> Response {
    match ctx
        .repo
        .update_user_settings(&settings.niche_interests, &settings.additional_params)
        .await
    {
        Ok(()) => Json(StatusMessage::new(
            200,
            "User settings updated successfully",
        ))
        .into_response(),
        Err(e) => {
            error!("Failed to update user settings: {}", e);
            internal_error()
        }
    }
}
