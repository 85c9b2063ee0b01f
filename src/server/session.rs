//! Session HTTP handlers
//!
//! Each handler mirrors one UI control. Every mutation persists the blob and
//! returns the full updated session state, so the client can redraw from it.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::catalog::{BookFilters, BookSort, MemberFilters, MemberSort};
use crate::session::{SessionState, Tab};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct TabUpdate {
    pub tab: Tab,
}

#[derive(Debug, Deserialize)]
pub struct PageUpdate {
    pub page: usize,
}

#[derive(Debug, Deserialize)]
pub struct PerPageUpdate {
    pub per_page: usize,
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionState> {
    Json(state.session.state())
}

pub async fn set_tab(
    State(state): State<AppState>,
    Json(update): Json<TabUpdate>,
) -> Json<SessionState> {
    Json(state.session.set_active_tab(update.tab))
}

pub async fn set_book_filters(
    State(state): State<AppState>,
    Json(filters): Json<BookFilters>,
) -> Json<SessionState> {
    Json(state.session.set_book_filters(filters))
}

pub async fn set_book_sort(
    State(state): State<AppState>,
    Json(sort): Json<BookSort>,
) -> Json<SessionState> {
    Json(state.session.set_book_sort(sort))
}

pub async fn set_book_page(
    State(state): State<AppState>,
    Json(update): Json<PageUpdate>,
) -> Json<SessionState> {
    Json(state.session.set_book_page(update.page))
}

pub async fn set_book_per_page(
    State(state): State<AppState>,
    Json(update): Json<PerPageUpdate>,
) -> Json<SessionState> {
    Json(state.session.set_book_per_page(update.per_page))
}

pub async fn set_member_filters(
    State(state): State<AppState>,
    Json(filters): Json<MemberFilters>,
) -> Json<SessionState> {
    Json(state.session.set_member_filters(filters))
}

pub async fn set_member_sort(
    State(state): State<AppState>,
    Json(sort): Json<MemberSort>,
) -> Json<SessionState> {
    Json(state.session.set_member_sort(sort))
}

pub async fn set_member_page(
    State(state): State<AppState>,
    Json(update): Json<PageUpdate>,
) -> Json<SessionState> {
    Json(state.session.set_member_page(update.page))
}

pub async fn set_member_per_page(
    State(state): State<AppState>,
    Json(update): Json<PerPageUpdate>,
) -> Json<SessionState> {
    Json(state.session.set_member_per_page(update.per_page))
}
