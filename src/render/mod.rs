//! HTML table rendering for catalog pages
//!
//! Templates are registered once at startup and autoescaped. Each row
//! carries the record id in `data-id`, so a host page binds one delegated
//! click listener on the table body and dispatches edit/delete by that
//! attribute instead of re-attaching handlers after every redraw.

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

use crate::catalog::{Book, Member};
use crate::core::query::{PageMeta, PageView};

const BOOK_ROWS: &str = r#"{% for book in items %}<tr data-id="{{ book.id }}">
  <td>{{ book.title }}</td>
  <td>{{ book.author }}</td>
  <td>{{ book.genre }}</td>
  <td>{{ book.published_year }}</td>
  <td>{% if book.available %}Yes{% else %}No{% endif %}</td>
  <td>
    <button class="edit-btn" data-id="{{ book.id }}">Edit</button>
    <button class="delete-btn" data-id="{{ book.id }}">Delete</button>
  </td>
</tr>
{% endfor %}"#;

const MEMBER_ROWS: &str = r#"{% for member in items %}<tr data-id="{{ member.id }}">
  <td>{{ member.name }}</td>
  <td>{{ member.email }}</td>
  <td>{% if member.phone %}{{ member.phone }}{% else %}-{% endif %}</td>
  <td>{{ member.joined_year }}</td>
  <td>{% if member.active %}Yes{% else %}No{% endif %}</td>
  <td>
    <button class="edit-btn" data-id="{{ member.id }}">Edit</button>
    <button class="delete-btn" data-id="{{ member.id }}">Delete</button>
  </td>
</tr>
{% endfor %}"#;

const PAGE_INFO: &str =
    "Page {{ meta.page }} of {{ meta.total_pages }} ({{ meta.total }} items)";

/// Errors from template registration or rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// Renders catalog pages into table-body fragments
#[derive(Debug)]
pub struct TableRenderer {
    tera: Tera,
}

impl TableRenderer {
    /// Register all templates
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template("book_rows.html", BOOK_ROWS)?;
        tera.add_raw_template("member_rows.html", MEMBER_ROWS)?;
        tera.add_raw_template("page_info.txt", PAGE_INFO)?;
        Ok(Self { tera })
    }

    /// Render one page of books as `<tr>` rows
    pub fn book_rows(&self, page: &PageView<Book>) -> Result<String, RenderError> {
        self.render_rows("book_rows.html", page)
    }

    /// Render one page of members as `<tr>` rows
    pub fn member_rows(&self, page: &PageView<Member>) -> Result<String, RenderError> {
        self.render_rows("member_rows.html", page)
    }

    /// Render the pagination summary line
    pub fn page_info(&self, meta: &PageMeta) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("meta", meta);
        Ok(self.tera.render("page_info.txt", &context)?)
    }

    fn render_rows<T: Serialize>(
        &self,
        template: &str,
        page: &PageView<T>,
    ) -> Result<String, RenderError> {
        let context = Context::from_serialize(page).map_err(RenderError::from)?;
        Ok(self.tera.render(template, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BookDraft, Record, RecordId};
    use crate::core::query::PageMeta;

    fn page_of(books: Vec<Book>) -> PageView<Book> {
        let total = books.len();
        PageView {
            items: books,
            meta: PageMeta::new(1, 5, total),
        }
    }

    fn book(id: &str, title: &str) -> Book {
        Book::from_draft(
            RecordId::from(id),
            BookDraft {
                title: title.to_string(),
                author: "Author".to_string(),
                genre: "Fiction".to_string(),
                published_year: 1951,
                available: true,
            },
        )
    }

    #[test]
    fn test_rows_carry_stable_record_id() {
        let renderer = TableRenderer::new().unwrap();
        let html = renderer
            .book_rows(&page_of(vec![book("b1", "Kokoro")]))
            .unwrap();

        assert!(html.contains(r#"<tr data-id="b1">"#));
        assert!(html.contains(r#"<button class="delete-btn" data-id="b1">"#));
        assert!(html.contains("<td>Kokoro</td>"));
        assert!(html.contains("<td>Yes</td>"));
    }

    #[test]
    fn test_html_in_fields_is_escaped() {
        let renderer = TableRenderer::new().unwrap();
        let html = renderer
            .book_rows(&page_of(vec![book("b1", "<script>alert(1)</script>")]))
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_page_renders_no_rows() {
        let renderer = TableRenderer::new().unwrap();
        let html = renderer.book_rows(&page_of(Vec::new())).unwrap();
        assert!(!html.contains("<tr"));
    }

    #[test]
    fn test_page_info_line() {
        let renderer = TableRenderer::new().unwrap();
        let info = renderer.page_info(&PageMeta::new(2, 5, 12)).unwrap();
        assert_eq!(info, "Page 2 of 3 (12 items)");
    }
}
