//! HTTP surface: application state, router and serve loop

pub mod books;
pub mod members;
pub mod session;
pub mod ws;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::routing::{get, put};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::catalog::{Book, Member};
use crate::config::{AppConfig, SeedData};
use crate::core::events::EventBus;
use crate::render::TableRenderer;
use crate::service::{CatalogService, Notice};
use crate::session::SessionStore;
use crate::store::InMemoryGateway;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub books: CatalogService<Book>,
    pub members: CatalogService<Member>,
    pub session: Arc<SessionStore>,
    pub events: EventBus,
    pub renderer: Arc<TableRenderer>,
}

/// Build the application state from configuration
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let events = EventBus::new(config.event_capacity);
    let books = CatalogService::new(Arc::new(InMemoryGateway::<Book>::new(events.clone())));
    let members = CatalogService::new(Arc::new(InMemoryGateway::<Member>::new(events.clone())));
    let session = Arc::new(SessionStore::load(config.state_path.clone()));
    let renderer = Arc::new(TableRenderer::new()?);

    Ok(AppState {
        books,
        members,
        session,
        events,
        renderer,
    })
}

/// Load seed records through the validated service layer
///
/// Invalid or refused records are skipped with a notice, never fatal.
pub async fn load_seed(state: &AppState, seed: SeedData) {
    for draft in seed.books {
        if let Err(e) = state.books.create(draft).await {
            let notice = Notice::from_error(&e);
            tracing::warn!(level = ?notice.level, message = %notice.message, "skipped seed book");
        }
    }
    for draft in seed.members {
        if let Err(e) = state.members.create(draft).await {
            let notice = Notice::from_error(&e);
            tracing::warn!(level = ?notice.level, message = %notice.message, "skipped seed member");
        }
    }
}

/// Build the full router
///
/// - `GET/POST /books`, `PATCH/DELETE /books/{id}` - book CRUD
/// - `GET /books/table` - rendered table-body fragment
/// - same routes for `/members`
/// - `GET /session` and `PUT /session/...` - view-state mutations
/// - `GET /ws` - change feed
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/table", get(books::book_table))
        .route(
            "/books/{id}",
            axum::routing::patch(books::update_book).delete(books::delete_book),
        )
        .route(
            "/members",
            get(members::list_members).post(members::create_member),
        )
        .route("/members/table", get(members::member_table))
        .route(
            "/members/{id}",
            axum::routing::patch(members::update_member).delete(members::delete_member),
        )
        .route("/session", get(session::get_session))
        .route("/session/tab", put(session::set_tab))
        .route("/session/books/filters", put(session::set_book_filters))
        .route("/session/books/sort", put(session::set_book_sort))
        .route("/session/books/page", put(session::set_book_page))
        .route("/session/books/per-page", put(session::set_book_per_page))
        .route("/session/members/filters", put(session::set_member_filters))
        .route("/session/members/sort", put(session::set_member_sort))
        .route("/session/members/page", put(session::set_member_page))
        .route(
            "/session/members/per-page",
            put(session::set_member_per_page),
        )
        .route("/ws", get(ws::ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Build everything from configuration and serve until shutdown
pub async fn serve(config: AppConfig) -> Result<()> {
    let state = build_state(&config)?;

    if let Some(path) = &config.seed_path {
        let seed = SeedData::from_yaml_file(path)?;
        load_seed(&state, seed).await;
    }

    let router = build_router(state);
    let listener = TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %config.bind, "catalog server listening");
    axum::serve(listener, router).await?;

    Ok(())
}
