//! Terminal display helpers: width detection and unicode-aware truncation.

use std::io::{self, IsTerminal};
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

const ELLIPSIS: &str = "...";

/// Current terminal width in columns, or [`DEFAULT_WIDTH`] when not a TTY.
pub fn terminal_width() -> usize {
    terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
}

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Display width of `text` in terminal columns.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Truncate text to at most `max_width` columns, appending `...` when cut.
///
/// ```
/// use book_search::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }
    if max_width <= ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }

    let budget = max_width - ELLIPSIS.len();
    let mut used = 0;
    let kept: String = text
        .chars()
        .take_while(|&c| {
            used += char_width(c);
            used <= budget
        })
        .collect();
    format!("{}{}", kept.trim_end(), ELLIPSIS)
}

/// Like [`truncate_with_ellipsis`], but cuts at the last whole word that fits.
pub fn truncate_at_word(text: &str, max_width: usize) -> String {
    let cut = truncate_with_ellipsis(text, max_width);
    let Some(kept) = cut.strip_suffix(ELLIPSIS) else {
        return cut;
    };
    if kept.is_empty() || cut == text {
        return cut;
    }

    // Keep the character-level cut when the next char in `text` starts a new word.
    let next = text[kept.len()..].chars().next();
    if next.map_or(true, char::is_whitespace) {
        return cut;
    }
    match kept.rfind(char::is_whitespace) {
        Some(idx) if idx > 0 => format!("{}{}", kept[..idx].trim_end(), ELLIPSIS),
        _ => cut,
    }
}

/// Column widths for the result table: (index, title, authors, year).
pub fn book_table_columns(terminal_width: usize) -> (usize, usize, usize, usize) {
    const INDEX: usize = 4;
    const YEAR: usize = 4;
    // Borders and padding of a four-column UTF8 table.
    const CHROME: usize = 13;

    let flexible = terminal_width.saturating_sub(INDEX + YEAR + CHROME).max(30);
    let title = (flexible * 3 / 5).clamp(20, 80);
    let authors = flexible.saturating_sub(title).clamp(10, 50);
    (INDEX, title, authors, YEAR)
}
