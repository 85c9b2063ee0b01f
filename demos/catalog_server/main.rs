//! Catalog server demo
//!
//! Run with an optional config path:
//!
//! ```sh
//! cargo run --example catalog_server
//! cargo run --example catalog_server -- shelf.yaml
//! ```

use shelf::prelude::*;
use shelf::server::load_seed;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default(),
    };

    let state = build_state(&config)?;

    // Seed from the configured file, or fall back to a small browsable catalog
    let seed = match &config.seed_path {
        Some(path) => SeedData::from_yaml_file(path)?,
        None => demo_seed(),
    };
    load_seed(&state, seed).await;

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(addr = %config.bind, "catalog server listening");
    axum::serve(listener, router).await?;

    Ok(())
}

fn demo_seed() -> SeedData {
    SeedData {
        books: vec![
            book("The Tokyo Story", "Natsuko Ito", "Fiction", 1953, true),
            book("Kokoro", "Natsume Soseki", "Fiction", 1914, true),
            book("Snow Country", "Yasunari Kawabata", "Fiction", 1947, false),
            book("The Makioka Sisters", "Junichiro Tanizaki", "Fiction", 1948, true),
            book("Botchan", "Natsume Soseki", "Fiction", 1906, true),
            book("A Wild Sheep Chase", "Haruki Murakami", "Mystery", 1982, false),
            book("The Pillow Book", "Sei Shonagon", "Classics", 1002, true),
        ],
        members: vec![
            member("Aiko Tanaka", "aiko@example.com", 2019, true),
            member("Yuki Sato", "yuki@example.com", 2021, true),
            member("Haruto Suzuki", "haruto@example.com", 2017, false),
        ],
    }
}

fn book(title: &str, author: &str, genre: &str, year: i32, available: bool) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: author.to_string(),
        genre: genre.to_string(),
        published_year: year,
        available,
    }
}

fn member(name: &str, email: &str, joined: i32, active: bool) -> MemberDraft {
    MemberDraft {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        joined_year: joined,
        active,
    }
}
