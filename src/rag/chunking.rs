//! Chunk derivation for the three document shapes in the corpus.
//!
//! - PDF form documents: one chunk per non-empty page
//! - HTML pages and statute text: tag-stripped words packed into
//!   fixed-size windows
//! - Plain text: character windows with configurable overlap

use scraper::Html;
use std::path::Path;

use super::types::RagError;

/// Default window size in characters for HTML and text chunks.
pub const DEFAULT_CHUNK_CHARS: usize = 512;

/// Default overlap in characters between consecutive text windows.
pub const DEFAULT_CHUNK_OVERLAP: usize = 64;

/// Extract one chunk per page of a PDF, dropping blank pages.
pub fn pdf_pages(path: &Path) -> Result<Vec<String>, RagError> {
    let pages = pdf_extract::extract_text_by_pages(path).map_err(|err| RagError::Extraction {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    Ok(pages
        .into_iter()
        .map(|page| page.trim().to_string())
        .filter(|page| !page.is_empty())
        .collect())
}

/// Strip tags from an HTML document and pack the words into windows of at
/// most `window` characters. Words longer than the window become their own
/// chunk rather than being split.
pub fn html_windows(html: &str, window: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    let text: Vec<&str> = document
        .root_element()
        .text()
        .flat_map(|fragment| fragment.split_whitespace())
        .collect();

    let mut chunks = Vec::new();
    let mut current = String::new();
    for word in text {
        if !current.is_empty() && current.len() + 1 + word.len() > window {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Fixed-size character windows over plain text with `overlap` characters
/// shared between consecutive windows. Splits on character boundaries.
pub fn text_windows(text: &str, window: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || window == 0 {
        return Vec::new();
    }
    let step = window.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + window).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let trimmed = chunk.trim();
        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}
