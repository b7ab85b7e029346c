//! Book model as returned by the catalog's search and detail endpoints.

use serde::{Deserialize, Serialize};

/// Cover image links for a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    /// Thumbnail cover image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// Display metadata carried by every book record
///
/// Fields are passed through exactly as the catalog sent them. Nothing is
/// validated or normalized; `title` and `info_link` fall back to empty strings
/// so one sparse record cannot fail a whole page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// Book title
    #[serde(default)]
    pub title: String,

    /// Subtitle (detail records mostly)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Author names in catalog order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,

    /// Publication date as sent ("2005", "2005-07" or "2005-07-16")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    /// Publisher name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Cover image links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_links: Option<ImageLinks>,

    /// Description, may contain HTML markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// External info page for the book
    #[serde(default)]
    pub info_link: String,
}

/// A single book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalog identifier, unique per book
    pub id: String,

    /// Display metadata
    #[serde(default)]
    pub volume_info: VolumeInfo,
}

impl Book {
    /// Create a new book with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            volume_info: VolumeInfo {
                title: title.into(),
                ..Default::default()
            },
        }
    }

    /// Book title
    pub fn title(&self) -> &str {
        &self.volume_info.title
    }

    /// Authors joined for display, or `fallback` when the catalog has none
    pub fn authors_or<'a>(&'a self, fallback: &'a str) -> std::borrow::Cow<'a, str> {
        match &self.volume_info.authors {
            Some(authors) if !authors.is_empty() => authors.join(", ").into(),
            _ => fallback.into(),
        }
    }

    /// Cover thumbnail URL, if any
    pub fn thumbnail(&self) -> Option<&str> {
        self.volume_info
            .image_links
            .as_ref()
            .and_then(|links| links.thumbnail.as_deref())
    }

    /// Leading year of the publication date
    pub fn published_year(&self) -> Option<&str> {
        let date = self.volume_info.published_date.as_deref()?;
        let year = date.split('-').next()?;
        (!year.is_empty()).then_some(year)
    }
}

/// Builder for constructing Book objects
#[derive(Debug, Clone)]
pub struct BookBuilder {
    book: Book,
}

impl BookBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            book: Book::new(id, title),
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.book.volume_info.subtitle = Some(subtitle.into());
        self
    }

    /// Add an author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.book
            .volume_info
            .authors
            .get_or_insert_with(Vec::new)
            .push(author.into());
        self
    }

    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.book.volume_info.published_date = Some(date.into());
        self
    }

    pub fn publisher(mut self, publisher: impl Into<String>) -> Self {
        self.book.volume_info.publisher = Some(publisher.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.book.volume_info.image_links = Some(ImageLinks {
            thumbnail: Some(url.into()),
        });
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.book.volume_info.description = Some(description.into());
        self
    }

    pub fn info_link(mut self, link: impl Into<String>) -> Self {
        self.book.volume_info.info_link = link.into();
        self
    }

    /// Build the Book
    pub fn build(self) -> Book {
        self.book
    }
}
