use std::collections::HashMap;

use crate::models::ProgramMap;
use crate::normalize::tokenize;

pub type TermId = u32;

/// A feature must occur in at least this many chunks to enter the vocabulary.
const MIN_DOC_FREQ: u32 = 2;

pub const NO_DATA_REPLY: &str = "Нет данных по выбранной программе.";
pub const OFF_TOPIC_REPLY: &str = "Этот вопрос не относится к выбранным программам. \
Задайте вопрос об обучении, программах, курсе, сроках, дисциплинах и т.п.";

#[derive(Debug, Clone, Copy)]
pub struct QaConfig {
    /// Best-match score below which a question is declared off-topic.
    pub relevance_threshold: f32,
    /// Number of chunks concatenated into an answer.
    pub top_k: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.1,
            top_k: 3,
        }
    }
}

/// Outcome of a question against the corpus. Fallback paths are explicit
/// variants so callers cannot mistake them for retrieved text.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// Concatenated top-K chunks and the best similarity score.
    Hit { text: String, score: f32 },
    /// Best match fell below the relevance threshold; the near-miss score
    /// is still reported.
    OffTopic { score: f32 },
    /// The restriction matched zero corpus rows.
    NoData,
}

impl Answer {
    pub fn score(&self) -> f32 {
        match self {
            Answer::Hit { score, .. } | Answer::OffTopic { score } => *score,
            Answer::NoData => 0.0,
        }
    }

    /// Render the user-visible reply for every variant.
    pub fn into_reply(self) -> (String, f32) {
        match self {
            Answer::Hit { text, score } => (text, score),
            Answer::OffTopic { score } => (OFF_TOPIC_REPLY.to_string(), score),
            Answer::NoData => (NO_DATA_REPLY.to_string(), 0.0),
        }
    }
}

#[derive(Debug, Clone)]
struct ChunkRef {
    program: String,
    #[allow(dead_code)]
    chunk_index: usize,
    text: String,
}

/// Sparse tf-idf vector space over every chunk of every program.
///
/// Immutable once built; any corpus change requires a full rebuild.
pub struct QaIndex {
    vocabulary: HashMap<String, TermId>,
    idf: Vec<f32>,
    /// One l2-normalized sparse row per chunk, sorted by term id.
    rows: Vec<Vec<(TermId, f32)>>,
    entries: Vec<ChunkRef>,
}

impl QaIndex {
    pub fn build(programs: &ProgramMap) -> Self {
        let mut entries = Vec::new();
        let mut docs: Vec<HashMap<String, u32>> = Vec::new();
        let mut df: HashMap<String, u32> = HashMap::new();

        for (key, program) in programs {
            for (i, chunk) in program.text_chunks.iter().enumerate() {
                let counts = feature_counts(chunk);
                for feat in counts.keys() {
                    *df.entry(feat.clone()).or_insert(0) += 1;
                }
                docs.push(counts);
                entries.push(ChunkRef {
                    program: key.clone(),
                    chunk_index: i,
                    text: chunk.clone(),
                });
            }
        }

        let n = docs.len() as f32;
        let mut kept: Vec<(&String, u32)> = df
            .iter()
            .filter(|&(_, &count)| count >= MIN_DOC_FREQ)
            .map(|(feat, &count)| (feat, count))
            .collect();
        kept.sort_by(|a, b| a.0.cmp(b.0));

        let mut vocabulary = HashMap::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (term_id, (feat, df_t)) in kept.into_iter().enumerate() {
            vocabulary.insert(feat.clone(), term_id as TermId);
            idf.push(((1.0 + n) / (1.0 + df_t as f32)).ln() + 1.0);
        }

        let rows = docs
            .iter()
            .map(|counts| weigh(counts, &vocabulary, &idf))
            .collect();

        tracing::debug!(
            chunks = entries.len(),
            terms = vocabulary.len(),
            "similarity index built"
        );

        Self {
            vocabulary,
            idf,
            rows,
            entries,
        }
    }

    /// Answer a question by cosine similarity over the corpus, optionally
    /// restricted to a subset of program keys. Never fails: empty
    /// restrictions and off-topic questions resolve to explicit variants.
    pub fn ask(&self, question: &str, only: Option<&[String]>, cfg: &QaConfig) -> Answer {
        let candidates: Vec<usize> = (0..self.entries.len())
            .filter(|&i| match only {
                Some(keys) => keys.iter().any(|k| *k == self.entries[i].program),
                None => true,
            })
            .collect();
        if candidates.is_empty() {
            return Answer::NoData;
        }

        let query = weigh(&feature_counts(question), &self.vocabulary, &self.idf);

        let mut scored: Vec<(usize, f32)> = candidates
            .into_iter()
            .map(|i| (i, dot(&query, &self.rows[i])))
            .collect();
        // Stable sort: ties keep original row order.
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(cfg.top_k.max(1));

        let best = scored[0].1;
        if best < cfg.relevance_threshold {
            return Answer::OffTopic { score: best };
        }

        let text = scored
            .iter()
            .map(|&(i, _)| self.entries[i].text.trim())
            .collect::<Vec<_>>()
            .join("\n\n");
        Answer::Hit { text, score: best }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Unigram + adjacent-bigram occurrence counts of the normalized text.
fn feature_counts(text: &str) -> HashMap<String, u32> {
    let tokens = tokenize(text);
    let mut counts = HashMap::with_capacity(tokens.len() * 2);
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
    }
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Project raw counts into an l2-normalized tf-idf row over the vocabulary.
fn weigh(
    counts: &HashMap<String, u32>,
    vocabulary: &HashMap<String, TermId>,
    idf: &[f32],
) -> Vec<(TermId, f32)> {
    let mut row: Vec<(TermId, f32)> = counts
        .iter()
        .filter_map(|(feat, &tf)| {
            vocabulary
                .get(feat)
                .map(|&tid| (tid, tf as f32 * idf[tid as usize]))
        })
        .collect();
    row.sort_by_key(|&(tid, _)| tid);

    let norm: f32 = row.iter().map(|&(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
    row
}

/// Dot product of two sparse rows sorted by term id. Both sides are
/// l2-normalized, so this is cosine similarity.
fn dot(a: &[(TermId, f32)], b: &[(TermId, f32)]) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut sum = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
