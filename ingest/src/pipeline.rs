use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

use advisor_core::chunk::{chunk_text, DEFAULT_MAX_CHUNK_LEN};
use advisor_core::courses::extract_courses;
use advisor_core::models::{ProgramMap, ProgramRecord};
use advisor_core::snapshot;

use crate::fetch::{fetch_bytes, fetch_text};
use crate::page::{parse_page, PageContent};
use crate::pdf::pdf_bytes_to_text;

/// Fixed pause between curriculum-document downloads.
const DOC_FETCH_DELAY: Duration = Duration::from_millis(500);

/// Program key → source page URL.
pub type SourceMap = BTreeMap<String, String>;

pub fn default_sources() -> SourceMap {
    let mut sources = SourceMap::new();
    sources.insert("ai".into(), "https://abit.itmo.ru/program/master/ai".into());
    sources.insert(
        "ai_product".into(),
        "https://abit.itmo.ru/program/master/ai_product".into(),
    );
    sources
}

/// Fetch one program page, follow its curriculum PDFs, and assemble the
/// record. A failed page fetch is fatal for the program; a failed document
/// fetch is logged and skipped.
pub async fn build_program(client: &Client, key: &str, url: &str) -> Result<ProgramRecord> {
    let base = Url::parse(url).with_context(|| format!("invalid source url {url}"))?;
    let body = fetch_text(client, url)
        .await
        .with_context(|| format!("failed to fetch program page {url}"))?;
    let page = parse_page(&base, &body);

    let mut doc_texts = Vec::new();
    for link in &page.plan_links {
        match fetch_bytes(client, link.as_str()).await {
            Ok(bytes) => {
                let text = pdf_bytes_to_text(&bytes);
                if !text.is_empty() {
                    doc_texts.push(text);
                }
                tokio::time::sleep(DOC_FETCH_DELAY).await;
            }
            Err(err) => {
                tracing::warn!(url = %link, %err, "curriculum document fetch failed, skipping");
            }
        }
    }

    Ok(assemble_record(key, url, page, doc_texts))
}

/// Pure assembly step: chunk the combined text, extract courses from the
/// richest available source.
fn assemble_record(
    key: &str,
    url: &str,
    page: PageContent,
    doc_texts: Vec<String>,
) -> ProgramRecord {
    let PageContent { title, text, .. } = page;

    let mut all_text = text.clone();
    if !doc_texts.is_empty() {
        all_text.push_str("\n\n");
        all_text.push_str(&doc_texts.join("\n\n"));
    }
    let text_chunks = chunk_text(&all_text, DEFAULT_MAX_CHUNK_LEN);
    if text_chunks.is_empty() {
        tracing::warn!(key, "ingestion degraded: no text recovered from page or documents");
    }

    // Curriculum PDFs are the better course source whenever any were recovered.
    let courses = if doc_texts.is_empty() {
        extract_courses(&text)
    } else {
        extract_courses(&doc_texts.join("\n"))
    };

    ProgramRecord {
        key: key.to_string(),
        name: title,
        url: url.to_string(),
        text_chunks,
        courses,
    }
}

/// Full ingestion over every configured source, then a wholesale snapshot
/// write. A hard failure on any program page aborts the run.
pub async fn ingest(client: &Client, sources: &SourceMap, snapshot_path: &Path) -> Result<ProgramMap> {
    let mut programs = ProgramMap::new();
    for (key, url) in sources {
        tracing::info!(key, url, "ingesting program");
        let record = build_program(client, key, url).await?;
        tracing::info!(
            key,
            chunks = record.text_chunks.len(),
            courses = record.courses.len(),
            "program ingested"
        );
        programs.insert(key.clone(), record);
    }
    snapshot::save(snapshot_path, &programs)?;
    Ok(programs)
}

/// Reuse the snapshot when present, otherwise run a full ingest.
pub async fn load_or_ingest(
    client: &Client,
    sources: &SourceMap,
    snapshot_path: &Path,
) -> Result<ProgramMap> {
    if snapshot::exists(snapshot_path) {
        return snapshot::load(snapshot_path);
    }
    ingest(client, sources, snapshot_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(title: &str, text: &str) -> PageContent {
        PageContent {
            title: title.to_string(),
            text: text.to_string(),
            plan_links: vec![],
        }
    }

    #[test]
    fn courses_come_from_page_text_without_documents() {
        let record = assemble_record(
            "ai",
            "https://example.com/ai",
            page("AI", "Введение в машинное обучение\nМатематическая статистика"),
            vec![],
        );
        assert_eq!(record.courses.len(), 2);
        assert!(!record.text_chunks.is_empty());
    }

    #[test]
    fn documents_take_precedence_as_course_source() {
        let record = assemble_record(
            "ai",
            "https://example.com/ai",
            page("AI", "Страница с описанием программы"),
            vec!["Практикум по Python\nГлубокое обучение".to_string()],
        );
        assert_eq!(
            record.courses,
            vec!["Практикум по Python", "Глубокое обучение"]
        );
        // Chunks still cover both the page and the documents.
        let joined = record.text_chunks.join(" ");
        assert!(joined.contains("Страница с описанием"));
        assert!(joined.contains("Практикум по Python"));
    }

    #[test]
    fn empty_page_degrades_to_empty_chunks() {
        let record = assemble_record("ai", "https://example.com/ai", page("AI", ""), vec![]);
        assert!(record.text_chunks.is_empty());
        assert!(record.courses.is_empty());
    }

    #[test]
    fn default_sources_cover_both_programs() {
        let sources = default_sources();
        assert_eq!(
            sources.keys().collect::<Vec<_>>(),
            vec!["ai", "ai_product"]
        );
    }
}
