use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref DISALLOWED: Regex =
        Regex::new(r"[^а-яa-z0-9\-\s.,:;()/%+]").expect("valid regex");
    static ref WS_RUN: Regex = Regex::new(r"\s{2,}").expect("valid regex");
    static ref WORD: Regex = Regex::new(r"(?u)\b\w\w+\b").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "и","в","во","не","что","он","на","я","с","со","как","а","то","все","она","так","его","но",
            "да","ты","к","у","же","вы","за","бы","по","только","ее","мне","было","вот","от","меня",
            "еще","нет","о","из","ему","теперь","когда","даже","ну","вдруг","ли","если","уже","или",
            "ни","быть","был","него","до","вас","нибудь","опять","уж","вам","ведь","там","потом","себя",
        ];
        words.iter().copied().collect()
    };
}

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Normalize free text for the lexical vector space: NFKC fold, lowercase,
/// replace anything outside the Cyrillic/Latin/digit/punctuation allow-list
/// with spaces, collapse whitespace runs.
pub fn normalize(text: &str) -> String {
    let lowered = text.nfkc().collect::<String>().to_lowercase();
    let replaced = DISALLOWED.replace_all(&lowered, " ");
    WS_RUN.replace_all(&replaced, " ").trim().to_string()
}

/// Tokenize normalized text into word tokens of two or more characters,
/// with stopwords removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD.find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .filter(|t| !is_stopword(t))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_disallowed_chars() {
        assert_eq!(normalize("Срок — 2 года!"), "срок 2 года");
    }

    #[test]
    fn keeps_listed_punctuation() {
        assert_eq!(normalize("50% (очно), онлайн/офлайн"), "50% (очно), онлайн/офлайн");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize("a   b\t\tc"), "a b c");
    }

    #[test]
    fn drops_single_char_tokens_and_stopwords() {
        let toks = tokenize("Я учусь в магистратуре и пишу код");
        assert!(toks.contains(&"магистратуре".to_string()));
        assert!(toks.contains(&"код".to_string()));
        // "я", "в", "и" are stopwords or too short
        assert!(!toks.contains(&"в".to_string()));
        assert!(!toks.contains(&"и".to_string()));
    }

    #[test]
    fn mixed_scripts_tokenize() {
        let toks = tokenize("Введение в Python и ML");
        assert_eq!(toks, vec!["введение", "python", "ml"]);
    }
}
