use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Built once; the pattern set is fixed so construction cannot fail
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters for use in text content and attribute
/// values.
///
/// # Examples
///
/// ```
/// use deckscribe::common::xml::escape_xml;
/// assert_eq!(escape_xml("Q&A"), "Q&amp;A");
/// assert_eq!(escape_xml("\"x\" < 'y'"), "&quot;x&quot; &lt; &apos;y&apos;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Strip characters that are not allowed in XML 1.0 documents.
///
/// Notes pasted from other tools occasionally carry control characters
/// (form feeds, vertical tabs) that would make the slide part unreadable.
pub fn strip_invalid_xml_chars(s: &str) -> std::borrow::Cow<'_, str> {
    let is_valid = |c: char| matches!(c, '\t' | '\n' | '\r') || c >= ' ';
    if s.chars().all(is_valid) {
        std::borrow::Cow::Borrowed(s)
    } else {
        std::borrow::Cow::Owned(s.chars().filter(|&c| is_valid(c)).collect())
    }
}
