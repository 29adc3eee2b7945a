//! Per-language text normalization.
//!
//! Translator output arrives with tokenizer artifacts: fused scripts, stray
//! spacing around punctuation, control characters. Each source language gets
//! a cleanup pass, and every translation additionally gets the universal
//! Japanese output pass, in that order. All passes are pure and idempotent.

use regex::Regex;
use std::sync::OnceLock;

use crate::lang::script;

/// Literal prefix tag marking output that contains no Japanese-script
/// characters. Attached by the orchestrator on emission; stripped back out by
/// the Japanese pass when such text is ever reprocessed.
pub const NOT_JAPANESE_TAG: &str = "[NOT JAPANESE OUTPUT]";

static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();
static CONTROL_CHARS: OnceLock<Regex> = OnceLock::new();
static FRENCH_PUNCT_SPACE: OnceLock<Regex> = OnceLock::new();
static SENTINEL_PREFIX: OnceLock<Regex> = OnceLock::new();

/// Normalize `text` for the given language code.
///
/// Dispatch is keyed by code with an identity default for unrecognized
/// codes. `"ja"` selects the Japanese output pass.
pub fn normalize(text: &str, lang_code: &str) -> String {
    match lang_code {
        "en" | "es" | "it" | "pt" => clean_generic(text),
        "ko" => clean_with_script_separation(text, script::hangul),
        "ru" => clean_with_script_separation(text, script::cyrillic),
        "hi" => clean_with_script_separation(text, script::devanagari),
        "fr" => clean_french(text),
        "ja" => japanese_output(text),
        _ => text.to_string(),
    }
}

/// Input cleanup applied by the orchestrator before detection: embedded
/// newlines become spaces, surrounding whitespace is trimmed.
pub fn clean_input(sentence: &str) -> String {
    sentence.replace(['\r', '\n'], " ").trim().to_string()
}

/// Collapse whitespace runs to a single space and trim.
fn collapse_whitespace(text: &str) -> String {
    let re = WHITESPACE_RUN.get_or_init(|| Regex::new(r"\s+").unwrap());
    re.replace_all(text, " ").trim().to_string()
}

fn clean_generic(text: &str) -> String {
    collapse_whitespace(text)
}

/// Generic cleanup plus a separating space wherever a Latin character and a
/// script-specific character are fused together.
fn clean_with_script_separation(text: &str, is_script: fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev {
            let fused = (p.is_ascii_alphabetic() && is_script(c))
                || (is_script(p) && c.is_ascii_alphabetic());
            if fused {
                out.push(' ');
            }
        }
        out.push(c);
        prev = Some(c);
    }
    collapse_whitespace(&out)
}

/// Generic cleanup plus removal of the whitespace French sources insert
/// before `?`, `!`, `:`, `;`.
fn clean_french(text: &str) -> String {
    let re = FRENCH_PUNCT_SPACE.get_or_init(|| Regex::new(r"\s+([?!:;])").unwrap());
    collapse_whitespace(&re.replace_all(text, "$1"))
}

/// The universal pass applied to the final Japanese output of every
/// translation:
///
/// 1. strip C0/DEL control characters
/// 2. collapse whitespace runs and trim
/// 3. rewrite ASCII ` ?`, ` !`, ` :` into full-width `？`, `！`, `：`
/// 4. drop the spacing the translator leaves between Japanese characters
/// 5. strip a leading [`NOT_JAPANESE_TAG`] left over from an earlier pass
pub fn japanese_output(text: &str) -> String {
    let controls = CONTROL_CHARS.get_or_init(|| Regex::new(r"[\x00-\x1f\x7f]").unwrap());
    let text = controls.replace_all(text, "");
    let text = collapse_whitespace(&text)
        .replace(" ?", "？")
        .replace(" !", "！")
        .replace(" :", "：");
    let text = remove_japanese_spacing(&text);

    let sentinel = SENTINEL_PREFIX
        .get_or_init(|| Regex::new(r"^\[NOT JAPANESE OUTPUT\]\s*").unwrap());
    sentinel.replace(&text, "").trim().to_string()
}

/// True for characters that read as Japanese in running text: the script
/// blocks plus CJK symbols and full-width forms (punctuation like ？ or 。).
fn japanese_context(c: char) -> bool {
    script::japanese(c)
        || ('\u{3000}'..='\u{303F}').contains(&c)
        || ('\u{FF00}'..='\u{FFEF}').contains(&c)
}

/// Remove a space when both of its neighbors read as Japanese. Spacing next
/// to Latin text (e.g. a preserved proper noun) is left alone.
fn remove_japanese_spacing(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' '
            && i > 0
            && i + 1 < chars.len()
            && japanese_context(chars[i - 1])
            && japanese_context(chars[i + 1])
        {
            continue;
        }
        out.push(c);
    }
    out
}
