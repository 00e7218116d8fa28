use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Hard cap on extracted course titles per program.
pub const MAX_COURSES: usize = 80;

const MIN_TITLE_CHARS: usize = 6;
const MAX_TITLE_CHARS: usize = 90;

lazy_static! {
    // Administrative vocabulary: schedule/credit/exam metadata lines, not titles.
    static ref ADMIN: Regex =
        Regex::new(r"(?i)семестр|кред|зачет|экзамен|hours|ects|таблица|приложение")
            .expect("valid regex");
    static ref WS_RUN: Regex = Regex::new(r"\s{2,}").expect("valid regex");
}

const EDGE_TRIM: &[char] = &['·', '•', '—', '-', '–', ';', ':', ',', ' '];

/// Best-effort extraction of course-title lines from raw document text.
///
/// Course catalogs in the source pages and curriculum PDFs list one
/// multi-word title per line; metadata lines are filtered by vocabulary and
/// casing heuristics rather than structural parsing.
pub fn extract_courses(text: &str) -> Vec<String> {
    let mut cleaned = Vec::new();
    let mut seen = HashSet::new();

    for line in text.lines() {
        let s = line.trim();
        if !title_len_ok(s) || is_all_caps(s) || ADMIN.is_match(s) || !s.contains(' ') {
            continue;
        }
        let collapsed = WS_RUN.replace_all(s, " ");
        let title = collapsed.trim_matches(EDGE_TRIM);
        if !title_len_ok(title) {
            continue;
        }
        if seen.insert(title.to_lowercase()) {
            cleaned.push(title.to_string());
            if cleaned.len() == MAX_COURSES {
                break;
            }
        }
    }
    cleaned
}

fn title_len_ok(s: &str) -> bool {
    (MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&s.chars().count())
}

/// True when every cased character is upper-case and at least one exists.
fn is_all_caps(s: &str) -> bool {
    let mut cased = false;
    for ch in s.chars() {
        if ch.is_lowercase() {
            return false;
        }
        if ch.is_uppercase() {
            cased = true;
        }
    }
    cased
}
