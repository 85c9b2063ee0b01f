//! Member HTTP handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;

use crate::catalog::{Member, MemberDraft, MemberPatch, RecordId};
use crate::core::error::ShelfError;
use crate::core::query::{PageView, page_view};
use crate::service::{Confirmation, DeleteOutcome, Notice};

use super::AppState;
use super::books::{DeleteQuery, DeleteResponse};

/// One page of the members view, per the session's filters/sort/page
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<PageView<Member>>, ShelfError> {
    let view = state.session.state().members;
    let snapshot = state.members.snapshot().await?;
    Ok(Json(page_view(
        &snapshot,
        &view.filters,
        &view.sort,
        &view.page,
    )))
}

/// The same page rendered as table-body rows
pub async fn member_table(State(state): State<AppState>) -> Result<Html<String>, ShelfError> {
    let view = state.session.state().members;
    let snapshot = state.members.snapshot().await?;
    let page = page_view(&snapshot, &view.filters, &view.sort, &view.page);
    Ok(Html(state.renderer.member_rows(&page)?))
}

pub async fn create_member(
    State(state): State<AppState>,
    Json(draft): Json<MemberDraft>,
) -> Result<(StatusCode, Json<Member>), ShelfError> {
    let member = state.members.create(draft).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn update_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MemberPatch>,
) -> Result<Json<Member>, ShelfError> {
    let member = state.members.update(&RecordId::from(id), patch).await?;
    Ok(Json(member))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<DeleteResponse>, ShelfError> {
    let outcome = state
        .members
        .delete(&RecordId::from(id), Confirmation::from(query.confirm))
        .await?;

    let notice = (outcome == DeleteOutcome::Declined)
        .then(|| Notice::info("deletion was not confirmed; nothing was removed"));

    Ok(Json(DeleteResponse { outcome, notice }))
}
