//! Sentence segmentation.
//!
//! Splits free-form text into sentence units ahead of the pipeline. A split
//! happens after a terminator (`.`, `!`, `?`, `。`, `！`, `？`) that is
//! followed by whitespace; the whitespace itself is consumed. Japanese text
//! without spacing after `。` therefore stays together, matching how such
//! text is actually written.

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '。' | '！' | '？')
}

/// Split `text` into sentence units.
///
/// Fragments are trimmed; fragments of one character or less are dropped as
/// segmentation noise.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if is_terminator(c) && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            flush(&mut current, &mut sentences);
        }
    }
    flush(&mut current, &mut sentences);

    sentences
}

fn flush(current: &mut String, sentences: &mut Vec<String>) {
    let trimmed = current.trim();
    if trimmed.chars().count() > 1 {
        sentences.push(trimmed.to_string());
    }
    current.clear();
}
