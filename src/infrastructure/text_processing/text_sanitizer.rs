use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static BROKEN_HYPHENATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)").unwrap());

const SOFT_HYPHEN: char = '\u{00AD}';
const FORM_FEED: char = '\u{000C}';

/// Cleans text pulled from a PDF or DOCX text layer before it is handed to
/// the LLM. Page breaks become paragraph breaks and paragraphs are separated
/// by at most one blank line.
pub fn sanitize_extracted_text(raw: &str) -> String {
    let cleaned = normalize_chars(raw);
    let joined = BROKEN_HYPHENATION.replace_all(&cleaned, "$head$tail");
    collapse_layout(&joined)
}

fn normalize_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.nfkc() {
        match c {
            SOFT_HYPHEN | '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => {}
            FORM_FEED => out.push_str("\n\n"),
            '\n' | '\t' | '\r' => out.push(c),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn collapse_layout(text: &str) -> String {
    let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];

    for line in text.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                paragraphs.push(Vec::new());
            }
        } else if let Some(current) = paragraphs.last_mut() {
            current.push(words.join(" "));
        }
    }

    paragraphs
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
