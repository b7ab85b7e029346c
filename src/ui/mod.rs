//! Terminal views: the result list and the book detail page.
//!
//! `render_*` functions build plain strings so they can be tested; `print_*`
//! functions add color when stdout is a terminal.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::Book;
use crate::session::{DetailView, SearchOutcome};
use crate::utils::{book_table_columns, html_to_text, is_terminal, truncate_at_word, truncate_with_ellipsis};

/// Shown in the list view when a book has no authors
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// Format a number with commas.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// One-line summary of where a search stands.
pub fn render_summary(query: Option<&str>, outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Untouched => "Type a query to search for books.".to_string(),
        SearchOutcome::Loading => "Loading...".to_string(),
        SearchOutcome::Failed(message) => message.clone(),
        SearchOutcome::NoResults => "No books found. Please try again.".to_string(),
        SearchOutcome::Results { shown, total } => format!(
            "Showing {} of about {} results for \"{}\"",
            format_number(*shown),
            format_number(*total),
            query.unwrap_or_default()
        ),
    }
}

/// Result list as a table, numbered from `first_number`.
pub fn render_table(books: &[Book], first_number: usize, terminal_width: usize) -> String {
    let (_, title_width, authors_width, _) = book_table_columns(terminal_width);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(vec!["#", "Title", "Authors", "Year"]);

    for (n, book) in books.iter().enumerate() {
        table.add_row(vec![
            Cell::new(first_number + n),
            Cell::new(truncate_at_word(book.title(), title_width)).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(
                &book.authors_or(UNKNOWN_AUTHOR),
                authors_width,
            )),
            Cell::new(book.published_year().unwrap_or_default()),
        ]);
    }

    table.to_string()
}

/// Result list as plain text, one block per book.
pub fn render_plain(books: &[Book], first_number: usize) -> String {
    let mut out = String::new();
    for (n, book) in books.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {}\n",
            first_number + n,
            book.title(),
            book.authors_or(UNKNOWN_AUTHOR)
        ));
        if let Some(date) = &book.volume_info.published_date {
            out.push_str(&format!("   Published: {}\n", date));
        }
        out.push_str(&format!("   ID: {}\n", book.id));
        if let Some(thumbnail) = book.thumbnail() {
            out.push_str(&format!("   Cover: {}\n", thumbnail));
        }
    }
    out
}

/// Full detail page for one book.
pub fn render_detail(book: &Book) -> String {
    let info = &book.volume_info;
    let mut out = String::new();

    out.push_str(book.title());
    out.push('\n');
    if let Some(subtitle) = info.subtitle.as_deref().filter(|s| !s.is_empty()) {
        out.push_str(subtitle);
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&format!("Authors:   {}\n", book.authors_or("Unknown")));
    out.push_str(&format!(
        "Publisher: {}\n",
        info.publisher.as_deref().unwrap_or_default()
    ));
    out.push_str(&format!(
        "Published: {}\n",
        info.published_date.as_deref().unwrap_or_default()
    ));
    if let Some(thumbnail) = book.thumbnail() {
        out.push_str(&format!("Cover:     {}\n", thumbnail));
    }

    let description = info
        .description
        .as_deref()
        .map(html_to_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| "No description available.".to_string());
    out.push_str("\nDescription:\n");
    out.push_str(&description);
    out.push_str("\n\n");

    out.push_str(&format!("View on Google Books: {}\n", info.info_link));
    out
}

/// Detail view in any of its states.
pub fn render_detail_view(view: &DetailView) -> String {
    match view {
        DetailView::Loading => "Loading...".to_string(),
        DetailView::Failed(message) => message.clone(),
        DetailView::Missing => "No book found.".to_string(),
        DetailView::Loaded(book) => render_detail(book),
    }
}

/// Loading spinner shown while a catalog request is in flight.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(spinner_style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner when stdout is a terminal, nothing otherwise.
    pub fn for_terminal(msg: &str) -> Option<Self> {
        is_terminal().then(|| Self::new(msg))
    }

    /// Set the message.
    pub fn set_message(&self, msg: &str) {
        self.pb.set_message(msg.to_string());
    }

    /// Finish with success message.
    pub fn finish_with_success(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.green} {msg}", "✓✓"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(spinner_style("{spinner:.red} {msg}", "✗✗"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Remove the spinner line.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

fn spinner_style(template: &str, tick_chars: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(tick_chars)
}

/// Print a section header.
pub fn print_section(title: &str) {
    if is_terminal() {
        println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
    } else {
        println!("━━━ {} ━━━", title);
    }
}

/// Print the search summary line, in red when it reports a failure.
pub fn print_summary(query: Option<&str>, outcome: &SearchOutcome) {
    let line = render_summary(query, outcome);
    match outcome {
        SearchOutcome::Failed(_) => print_error(&line),
        _ if is_terminal() => println!("{}", line.dimmed()),
        _ => println!("{}", line),
    }
}

/// Print the hint offered while more pages are available.
pub fn print_load_more_hint(can_load_more: bool) {
    if !can_load_more {
        return;
    }
    if is_terminal() {
        println!("{}", "Type `more` to load more results.".green());
    } else {
        println!("Type `more` to load more results.");
    }
}

/// Print a user-facing error line.
pub fn print_error(message: &str) {
    if is_terminal() {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    } else {
        eprintln!("✗ {}", message);
    }
}
