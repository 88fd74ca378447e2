//! Text ingestion: cleanup, Arabic normalization, chunking and language tagging.
//!
//! Everything here is character-based; chunk boundaries never split a
//! multi-byte character.

use docslide_core::defaults::CHUNK_SIZE;

/// Prepared text fields for prompt rendering and the provider payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub cleaned: String,
    pub normalized: String,
    pub chunks: Vec<String>,
    pub language: String,
    /// Chunks joined by a blank line.
    pub context: String,
    pub question: Option<String>,
    pub insights: Option<String>,
}

/// Normalize line endings, collapse whitespace runs to one space, and trim.
pub fn remove_formatting(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold Arabic letter variants onto their base forms.
pub fn normalize_arabic(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'أ' | 'إ' | 'آ' => 'ا',
            'ة' => 'ه',
            'ى' => 'ي',
            'ؤ' => 'و',
            'ئ' => 'ي',
            other => other,
        })
        .collect()
}

/// Split formatted `text` into chunks of at most `max_len` characters.
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    let sanitized = remove_formatting(text);
    if sanitized.is_empty() || max_len == 0 {
        return Vec::new();
    }
    let chars: Vec<char> = sanitized.chars().collect();
    chars
        .chunks(max_len)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn is_arabic_marker(c: char) -> bool {
    matches!(c,
        'ا' | 'أ' | 'إ' | 'آ' | 'ء' | 'ؤ' | 'ئ' | 'ب' | 'ت' | 'ث' | 'ج' | 'ح' | 'خ'
        | 'د' | 'ذ' | 'ر' | 'ز' | 'س' | 'ش' | 'ص' | 'ض' | 'ط' | 'ظ' | 'ع' | 'غ'
        | 'ف' | 'ق' | 'ك' | 'ل' | 'م' | 'ن' | 'ه' | 'و' | 'ي' | 'ة'
        | '\u{0660}'..='\u{0669}')
}

/// `"ar"` when the text contains an Arabic letter or Arabic-Indic digit,
/// otherwise `"other"`.
pub fn detect_language(text: &str) -> &'static str {
    if text.chars().any(is_arabic_marker) {
        "ar"
    } else {
        "other"
    }
}

/// Run the full ingestion pipeline over `raw_text`.
pub fn build_prompt_context(
    raw_text: &str,
    question: Option<String>,
    insights: Option<String>,
) -> PromptContext {
    let cleaned = remove_formatting(raw_text);
    let normalized = normalize_arabic(&cleaned);
    let chunks = split_into_chunks(&normalized, CHUNK_SIZE);
    let language = detect_language(&normalized).to_string();
    let context = chunks.join("\n\n");

    PromptContext {
        cleaned,
        normalized,
        chunks,
        language,
        context,
        question,
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_formatting() {
        assert_eq!(remove_formatting("  a\r\n\r\nb \t c  "), "a b c");
        assert_eq!(remove_formatting(""), "");
    }

    #[test]
    fn test_normalize_arabic() {
        assert_eq!(normalize_arabic("أإآ ة ى ؤ ئ"), "ااا ه ي و ي");
        assert_eq!(normalize_arabic("plain"), "plain");
    }

    #[test]
    fn test_split_into_chunks() {
        let chunks = split_into_chunks("abcdefg", 3);
        assert_eq!(chunks, vec!["abc", "def", "g"]);
        assert!(split_into_chunks("   ", 3).is_empty());
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let chunks = split_into_chunks("مرحبا", 2);
        assert_eq!(chunks, vec!["مر", "حب", "ا"]);
    }

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("hello"), "other");
        assert_eq!(detect_language("hello سلام"), "ar");
        assert_eq!(detect_language("٣"), "ar");
        assert_eq!(detect_language(""), "other");
    }

    #[test]
    fn test_build_prompt_context() {
        let ctx = build_prompt_context(" المدرسة \r\n  كبيرة ", Some("q".into()), None);
        assert_eq!(ctx.cleaned, "المدرسة كبيرة");
        assert_eq!(ctx.normalized, "المدرسه كبيره");
        assert_eq!(ctx.language, "ar");
        assert_eq!(ctx.chunks, vec!["المدرسه كبيره"]);
        assert_eq!(ctx.context, "المدرسه كبيره");
        assert_eq!(ctx.question.as_deref(), Some("q"));
    }

    #[test]
    fn test_context_joins_chunks_with_blank_line() {
        let text = "x".repeat(CHUNK_SIZE + 1);
        let ctx = build_prompt_context(&text, None, None);
        assert_eq!(ctx.chunks.len(), 2);
        assert_eq!(ctx.context, format!("{}\n\nx", "x".repeat(CHUNK_SIZE)));
    }

    #[test]
    fn test_empty_text() {
        let ctx = build_prompt_context("", None, None);
        assert!(ctx.chunks.is_empty());
        assert_eq!(ctx.context, "");
        assert_eq!(ctx.language, "other");
    }
}
