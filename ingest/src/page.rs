use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

pub const DEFAULT_TITLE: &str = "Программа магистратуры";

/// Anchor-text vocabulary marking curriculum/plan documents.
const PLAN_WORDS: &[&str] = &["учеб", "план", "curriculum"];

/// Upper bound on linked documents fetched per program page.
pub const MAX_PLAN_DOCS: usize = 5;

lazy_static! {
    static ref SPACES: Regex = Regex::new(r"[ \t]+").expect("valid regex");
    static ref NEWLINES: Regex = Regex::new(r"\n{2,}").expect("valid regex");
    static ref WS_RUN: Regex = Regex::new(r"\s+").expect("valid regex");
}

/// Everything the pipeline needs from one fetched program page.
#[derive(Debug)]
pub struct PageContent {
    pub title: String,
    pub text: String,
    pub plan_links: Vec<Url>,
}

/// Parse a fetched HTML body into title, visible text, and candidate
/// curriculum-document links resolved against the page URL.
pub fn parse_page(base: &Url, body: &str) -> PageContent {
    let doc = Html::parse_document(body);
    PageContent {
        title: extract_title(&doc),
        text: extract_visible_text(&doc),
        plan_links: find_plan_links(base, &doc),
    }
}

/// First non-empty `<h1>`, else the page `<title>`, else a fixed default.
fn extract_title(doc: &Html) -> String {
    let h1 = Selector::parse("h1").expect("valid selector");
    let title = Selector::parse("title").expect("valid selector");
    for sel in [&h1, &title] {
        for el in doc.select(sel) {
            let text = WS_RUN
                .replace_all(&el.text().collect::<String>(), " ")
                .trim()
                .to_string();
            if !text.is_empty() {
                return text;
            }
        }
    }
    DEFAULT_TITLE.to_string()
}

/// Visible page text: script/style/noscript subtrees dropped, one line per
/// element, whitespace collapsed, near-empty lines removed.
fn extract_visible_text(doc: &Html) -> String {
    let mut raw = String::new();
    collect_text(doc.root_element(), &mut raw);

    let spaced = SPACES.replace_all(&raw, " ");
    let collapsed = NEWLINES.replace_all(&spaced, "\n");
    collapsed
        .lines()
        .map(str::trim)
        .filter(|ln| ln.chars().count() > 2)
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: ElementRef, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(t) => out.push_str(t),
            Node::Element(el) => {
                if matches!(el.name(), "script" | "style" | "noscript") {
                    continue;
                }
                if let Some(child_ref) = ElementRef::wrap(child) {
                    out.push('\n');
                    collect_text(child_ref, out);
                }
            }
            _ => {}
        }
    }
}

/// Candidate curriculum documents: anchors whose text mentions a plan word
/// or whose href ends in `.pdf`, resolved to absolute URLs, deduplicated in
/// document order, restricted to PDFs, capped.
fn find_plan_links(base: &Url, doc: &Html) -> Vec<Url> {
    let anchor = Selector::parse("a[href]").expect("valid selector");
    let mut links: Vec<Url> = Vec::new();
    for a in doc.select(&anchor) {
        let href = match a.value().attr("href") {
            Some(h) => h,
            None => continue,
        };
        let text = a.text().collect::<String>().to_lowercase();
        let looks_like_plan = PLAN_WORDS.iter().any(|w| text.contains(w))
            || href.to_lowercase().ends_with(".pdf");
        if !looks_like_plan {
            continue;
        }
        if let Ok(full) = base.join(href) {
            if !links.contains(&full) {
                links.push(full);
            }
        }
    }
    links.retain(|u| u.as_str().to_lowercase().ends_with(".pdf"));
    links.truncate(MAX_PLAN_DOCS);
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://uni.example/program/master/ai").unwrap()
    }

    #[test]
    fn title_prefers_h1_over_page_title() {
        let page = parse_page(
            &base(),
            "<html><head><title>Сайт</title></head><body><h1>Искусственный интеллект</h1></body></html>",
        );
        assert_eq!(page.title, "Искусственный интеллект");
    }

    #[test]
    fn title_falls_back_to_page_title_then_default() {
        let page = parse_page(&base(), "<html><head><title> Сайт </title></head><body></body></html>");
        assert_eq!(page.title, "Сайт");

        let page = parse_page(&base(), "<html><body><p>нет заголовка</p></body></html>");
        assert_eq!(page.title, DEFAULT_TITLE);
    }

    #[test]
    fn visible_text_skips_scripts_and_short_lines() {
        let page = parse_page(
            &base(),
            "<html><body><script>var x = 1;</script><style>.a{}</style>\
<p>Срок обучения 2 года</p><p>ок</p><p>Форма обучения очная</p></body></html>",
        );
        assert!(page.text.contains("Срок обучения 2 года"));
        assert!(page.text.contains("Форма обучения очная"));
        assert!(!page.text.contains("var x"));
        assert!(!page.text.contains("ок\n"));
    }

    #[test]
    fn plan_links_resolve_and_keep_only_pdfs() {
        let page = parse_page(
            &base(),
            r#"<html><body>
<a href="/files/plan.pdf">Учебный план</a>
<a href="https://uni.example/files/curriculum.PDF">curriculum</a>
<a href="/files/plan.docx">учебный план в docx</a>
<a href="/about">о программе</a>
</body></html>"#,
        );
        let urls: Vec<String> = page.plan_links.iter().map(|u| u.to_string()).collect();
        assert_eq!(
            urls,
            vec![
                "https://uni.example/files/plan.pdf",
                "https://uni.example/files/curriculum.PDF",
            ]
        );
    }

    #[test]
    fn plan_links_dedup_and_cap() {
        let anchors: String = (0..10)
            .map(|i| format!(r#"<a href="/files/p{i}.pdf">план</a><a href="/files/p{i}.pdf">план</a>"#))
            .collect();
        let page = parse_page(&base(), &format!("<html><body>{anchors}</body></html>"));
        assert_eq!(page.plan_links.len(), MAX_PLAN_DOCS);
    }

    #[test]
    fn anchor_with_plan_word_but_non_pdf_href_is_dropped() {
        let page = parse_page(
            &base(),
            r#"<html><body><a href="/curriculum">учебный план</a></body></html>"#,
        );
        assert!(page.plan_links.is_empty());
    }
}
