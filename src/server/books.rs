//! Book HTTP handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use serde::{Deserialize, Serialize};

use crate::catalog::{Book, BookDraft, BookPatch, RecordId};
use crate::core::error::ShelfError;
use crate::core::query::{PageView, page_view};
use crate::service::{Confirmation, DeleteOutcome, Notice};

use super::AppState;

/// Confirmation flag for destructive requests
#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Outcome of a delete request, with a notice when nothing happened
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub outcome: DeleteOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// One page of the books view, per the session's filters/sort/page
pub async fn list_books(
    State(state): State<AppState>,
) -> Result<Json<PageView<Book>>, ShelfError> {
    let view = state.session.state().books;
    let snapshot = state.books.snapshot().await?;
    Ok(Json(page_view(
        &snapshot,
        &view.filters,
        &view.sort,
        &view.page,
    )))
}

/// The same page rendered as table-body rows
pub async fn book_table(State(state): State<AppState>) -> Result<Html<String>, ShelfError> {
    let view = state.session.state().books;
    let snapshot = state.books.snapshot().await?;
    let page = page_view(&snapshot, &view.filters, &view.sort, &view.page);
    Ok(Html(state.renderer.book_rows(&page)?))
}

pub async fn create_book(
    State(state): State<AppState>,
    Json(draft): Json<BookDraft>,
) -> Result<(StatusCode, Json<Book>), ShelfError> {
    let book = state.books.create(draft).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<BookPatch>,
) -> Result<Json<Book>, ShelfError> {
    let book = state.books.update(&RecordId::from(id), patch).await?;
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ShelfError> {
    let outcome = state
        .books
        .delete(&RecordId::from(id), Confirmation::from(query.confirm))
        .await?;

    let notice = (outcome == DeleteOutcome::Declined)
        .then(|| Notice::info("deletion was not confirmed; nothing was removed"));

    Ok(Json(DeleteResponse { outcome, notice }))
}
