use std::collections::HashSet;

/// Default maximum chunk length, in characters.
pub const DEFAULT_MAX_CHUNK_LEN: usize = 550;

/// Split raw text into bounded-length fragments on paragraph boundaries.
///
/// Paragraphs (non-empty trimmed lines) are greedily packed into a buffer
/// joined by single spaces; the buffer is flushed once the next paragraph
/// would push it past `max_len`. A single paragraph longer than `max_len`
/// becomes its own oversized chunk; content is never truncated. The result
/// is deduplicated case-insensitively in first-seen order.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut cur = 0usize;

    for para in text.split('\n') {
        let para = para.trim();
        if para.is_empty() {
            continue;
        }
        let len = para.chars().count();
        if cur + len + 1 > max_len && !buf.is_empty() {
            parts.push(buf.join(" "));
            buf = vec![para];
            cur = len;
        } else {
            buf.push(para);
            cur += len + 1;
        }
    }
    if !buf.is_empty() {
        parts.push(buf.join(" "));
    }

    dedup_case_insensitive(parts)
}

fn dedup_case_insensitive(parts: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(parts.len());
    for p in parts {
        if seen.insert(p.to_lowercase()) {
            result.push(p);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert!(chunk_text("", 100).is_empty());
        assert!(chunk_text("\n\n  \n", 100).is_empty());
    }

    #[test]
    fn short_paragraphs_pack_into_one_chunk() {
        let chunks = chunk_text("Первый абзац.\nВторой абзац.", 100);
        assert_eq!(chunks, vec!["Первый абзац. Второй абзац."]);
    }

    #[test]
    fn flushes_at_max_len() {
        let chunks = chunk_text("aaaa\nbbbb\ncccc", 10);
        assert_eq!(chunks, vec!["aaaa bbbb", "cccc"]);
        for c in &chunks {
            assert!(c.chars().count() <= 10);
        }
    }

    #[test]
    fn oversized_paragraph_is_kept_whole() {
        let long = "x".repeat(40);
        let chunks = chunk_text(&format!("short\n{long}\ntail"), 10);
        assert_eq!(chunks, vec!["short".to_string(), long, "tail".to_string()]);
    }

    #[test]
    fn no_character_loss() {
        let text = "Раз два\nтри\nчетыре пять\nшесть";
        let chunks = chunk_text(text, 12);
        let rebuilt = chunks.join(" ");
        let expected = text.split('\n').collect::<Vec<_>>().join(" ");
        assert_eq!(rebuilt, expected);
    }

    #[test]
    fn dedup_is_case_insensitive_first_seen() {
        let chunks = chunk_text("Питон\nПИТОН\nкод", 5);
        assert_eq!(chunks, vec!["Питон", "код"]);
    }

    #[test]
    fn lengths_counted_in_chars_not_bytes() {
        // two 6-char Cyrillic paragraphs (12 bytes each) pack into max_len 14
        let chunks = chunk_text("абвгде\nжзиклм", 14);
        assert_eq!(chunks.len(), 1);
    }
}
