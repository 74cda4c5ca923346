//! Markup to plain text conversion
//!
//! Prompt content keeps whatever markup the user typed or pasted. The list
//! view, validation and the copy action all need the text a reader would see
//! instead, so this module reduces markup to plain text without a rendering
//! engine:
//!
//! - every tag and comment is removed, `<script>`/`<style>` bodies included
//! - common character references are decoded
//! - text keeps its original order and whitespace is left alone

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// Elements whose body is never visible text
static HIDDEN_ELEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>").unwrap()
});

static COMMENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

// A '<' only opens a tag when followed by a name, '/', '!' or '?'
static TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(?:/?[A-Za-z][^>]*|![^>]*|\?[^>]*)>").unwrap());

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

// Opening or closing tag of an element laid out on its own line
static BLOCK_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:div|p|li|h[1-6]|tr|blockquote|pre)\b[^>]*>").unwrap()
});

// Private-use stand-ins for breaks until tags are gone
const BLOCK_BREAK: char = '\u{E000}';
const LINE_BREAK: char = '\u{E001}';

static CHAR_REFS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]+);").unwrap());

/// Reduce markup to its text content.
///
/// ```
/// use promptpad::markup::plain_text;
///
/// assert_eq!(plain_text("<b>World</b>"), "World");
/// assert_eq!(plain_text("a &lt;b&gt; c"), "a <b> c");
/// ```
pub fn plain_text(markup: &str) -> String {
    let without_hidden = strip_hidden(markup);
    let without_tags = TAGS.replace_all(&without_hidden, "");
    decode_char_refs(&without_tags)
}

/// Reduce markup to the text a reader sees, with line breaks.
///
/// Every `<br>` is a newline. Block elements start and end on their own line:
/// one newline separates two runs of text that a block boundary splits, and
/// none is emitted before the first run or after the last. Whitespace-only
/// runs between blocks are dropped.
///
/// ```
/// use promptpad::markup::rendered_text;
///
/// assert_eq!(rendered_text("<div><div>x</div></div>"), "x");
/// assert_eq!(rendered_text("<p>a</p>\n<p>b</p>"), "a\nb");
/// ```
pub fn rendered_text(markup: &str) -> String {
    let without_hidden = strip_hidden(markup);
    let with_breaks = LINE_BREAKS.replace_all(&without_hidden, LINE_BREAK.to_string());
    let with_blocks = BLOCK_TAGS.replace_all(&with_breaks, BLOCK_BREAK.to_string());
    let without_tags = TAGS.replace_all(&with_blocks, "");

    let mut text = String::with_capacity(without_tags.len());
    let mut pending_break = false;
    for run in without_tags.split(BLOCK_BREAK) {
        if run.trim().is_empty() {
            pending_break = !text.is_empty();
            continue;
        }
        if pending_break {
            text.push('\n');
        }
        text.push_str(run);
        pending_break = true;
    }

    decode_char_refs(&text.replace(LINE_BREAK, "\n"))
}

/// True when the markup holds no visible text.
pub fn is_blank(markup: &str) -> bool {
    plain_text(markup).trim().is_empty()
}

fn strip_hidden(markup: &str) -> String {
    let without_hidden = HIDDEN_ELEMENTS.replace_all(markup, "");
    COMMENTS.replace_all(&without_hidden, "").into_owned()
}

fn decode_char_refs(text: &str) -> String {
    CHAR_REFS
        .replace_all(text, |caps: &Captures| {
            let name = &caps[1];
            decode_reference(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_reference(name: &str) -> Option<String> {
    if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(decimal) = name.strip_prefix('#') {
        return decimal
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }

    let decoded = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        _ => return None,
    };
    Some(decoded.to_string())
}
