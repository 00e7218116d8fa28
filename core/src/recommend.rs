use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::models::ProgramRecord;

pub const DEFAULT_TOP_N: usize = 7;

/// How many (title, score) pairs are kept for diagnostic display.
const SCORED_PREVIEW: usize = 20;

/// Bounds for treating a text chunk as a pseudo-course title when the
/// extracted course list is empty.
const PSEUDO_MIN_CHARS: usize = 15;
const PSEUDO_MAX_CHARS: usize = 100;
const PSEUDO_CAP: usize = 20;

const SKILL_MATCH_POINTS: i32 = 2;
const PATTERN_POINTS: i32 = 1;

lazy_static! {
    /// Skill token → substring synonyms checked against lower-cased titles.
    static ref SKILL_KEYWORDS: HashMap<&'static str, &'static [&'static str]> = {
        let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
        m.insert("python", &["python", "питон"]);
        m.insert("ml", &["machine learning", "ml", "машинн", "обучен"]);
        m.insert("ds", &["data", "данн", "аналитик", "statistics", "статист"]);
        m.insert("math", &["матем", "матстат", "вероят", "алгебр", "анал"]);
        m.insert("cv", &["computer vision", "cv", "компьютерн", "зрение"]);
        m.insert("nlp", &["nlp", "обработк", "текст", "язык"]);
        m.insert("pm", &["product", "продакт", "менедж", "бизнес", "маркет"]);
        m.insert("se", &["backend", "software", "разработ", "инженер", "системн", "архитект"]);
        m
    };
    static ref PRACTICE: Regex =
        Regex::new(r"(?i)практик|workshop|project|проект|практикум").expect("valid regex");
    static ref ADVANCED: Regex =
        Regex::new(r"(?i)углубл|advanced|продвинут").expect("valid regex");
}

#[derive(Debug, Clone, Default)]
pub struct Recommendation {
    /// Chosen course titles, at most `top_n`; empty only when the program
    /// has no courses and no usable pseudo-courses.
    pub picks: Vec<String>,
    /// Top of the full sorted (title, score) list for diagnostics.
    pub scored: Vec<(String, i32)>,
}

/// Score a program's course list against comma-separated user skills and
/// pick the best `top_n` electives.
pub fn recommend(program: &ProgramRecord, skills_csv: &str, top_n: usize) -> Recommendation {
    let skills: Vec<String> = skills_csv
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let courses: Vec<String> = if program.courses.is_empty() {
        pseudo_courses(program)
    } else {
        program.courses.clone()
    };

    let mut scored: Vec<(String, i32)> = courses
        .iter()
        .map(|c| (c.clone(), score_course(c, &skills)))
        .collect();
    // Stable sort: equal scores keep catalog order.
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    let mut picks: Vec<String> = scored
        .iter()
        .take(top_n)
        .filter(|&&(_, score)| score > 0)
        .map(|(title, _)| title.clone())
        .collect();
    if picks.is_empty() {
        // Nothing matched the skill vocabulary: fall back to catalog order.
        picks = courses.iter().take(top_n).cloned().collect();
    }

    scored.truncate(SCORED_PREVIEW);
    Recommendation { picks, scored }
}

/// Mid-length text chunks stand in for course titles when extraction
/// produced nothing.
fn pseudo_courses(program: &ProgramRecord) -> Vec<String> {
    program
        .text_chunks
        .iter()
        .filter(|t| {
            let n = t.chars().count();
            n > PSEUDO_MIN_CHARS && n < PSEUDO_MAX_CHARS
        })
        .take(PSEUDO_CAP)
        .cloned()
        .collect()
}

fn score_course(course: &str, skills: &[String]) -> i32 {
    let lower = course.to_lowercase();
    let mut score = 0;
    for skill in skills {
        let matched = match SKILL_KEYWORDS.get(skill.as_str()) {
            Some(kws) => kws.iter().any(|kw| lower.contains(kw)),
            None => lower.contains(skill.as_str()),
        };
        if matched {
            score += SKILL_MATCH_POINTS;
        }
    }
    if PRACTICE.is_match(&lower) {
        score += PATTERN_POINTS;
    }
    if ADVANCED.is_match(&lower) {
        score += PATTERN_POINTS;
    }
    score
}
