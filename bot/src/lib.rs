use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use advisor_core::{recommend, ProgramMap, QaConfig, QaIndex};

pub const HELP: &str = "Привет! Я помогу сравнить две магистерские программы и ответить на вопросы по их содержимому.\n\n\
Команды:\n\
/start — начало\n\
/ask <вопрос> — задать вопрос по программам\n\
/recommend — рекомендации элективов\n\
/compare — краткое сравнение\n";

const DEFAULT_SKILLS: &str = "python,ml,ds";
const RECOMMEND_TOP_N: usize = 7;

/// Everything the chat front end serves from: built once at startup,
/// immutable afterwards.
pub struct BotContext {
    pub programs: ProgramMap,
    pub index: QaIndex,
    pub qa: QaConfig,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub fn build_app(ctx: BotContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/chat", post(chat_handler))
        .with_state(Arc::new(ctx))
        .layer(cors)
}

async fn chat_handler(
    State(ctx): State<Arc<BotContext>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    Json(ChatResponse {
        reply: handle_message(&ctx, &req.message),
    })
}

/// Route one chat message to a reply. Every branch resolves to displayable
/// text; nothing here returns an error to the transport layer.
pub fn handle_message(ctx: &BotContext, text: &str) -> String {
    let text = text.trim();

    if text == "/start" {
        return format!("Выберите программу: AI или AI Product.\n\n{HELP}");
    }
    if text == "AI" || text == "AI Product" {
        return format!(
            "Ок, работаем с «{text}». Задайте вопрос через /ask или получите рекомендации /recommend.\n\n{HELP}"
        );
    }
    if text == "/help" {
        return HELP.to_string();
    }
    if text == "/compare" {
        return compare_reply(ctx);
    }
    if let Some(rest) = text.strip_prefix("/ask") {
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            let question = rest.trim();
            if question.is_empty() {
                return "Напишите: /ask ваш вопрос".to_string();
            }
            let (reply, score) = ctx.index.ask(question, None, &ctx.qa).into_reply();
            return format!("{reply}\n\n(relevance={score:.2})");
        }
    }
    if text == "/recommend" {
        return "Укажи программу (ai/ai_product) и список навыков через запятую.\n\
Пример: ai, python, ml, math"
            .to_string();
    }

    free_text_reply(ctx, text)
}

fn compare_reply(ctx: &BotContext) -> String {
    let mut lines = vec!["Сравнение программ:".to_string()];
    for record in ctx.programs.values() {
        lines.push(format!(
            "• {}: {} фрагментов, ~{} дисциплин",
            record.name,
            record.text_chunks.len(),
            record.courses.len()
        ));
    }
    lines.join("\n")
}

/// Free-text fallback: a line beginning with a known program key, followed
/// by comma-separated skills, is a recommendation request. Anything else
/// gets the fixed scope-limitation reply.
fn free_text_reply(ctx: &BotContext, text: &str) -> String {
    let lower = text.to_lowercase();
    let parts: Vec<&str> = lower.split(',').map(str::trim).collect();
    let key = parts[0];

    if let Some(record) = ctx.programs.get(key) {
        let joined = parts[1..].join(",");
        let skills_csv = if joined.split(',').all(|s| s.trim().is_empty()) {
            DEFAULT_SKILLS.to_string()
        } else {
            joined
        };
        let rec = recommend(record, &skills_csv, RECOMMEND_TOP_N);
        if rec.picks.is_empty() {
            return "Не удалось подобрать элективы. Попробуйте указать навыки: \
python, ml, ds, math, nlp, cv, pm, se"
                .to_string();
        }
        let list = rec
            .picks
            .iter()
            .enumerate()
            .map(|(i, title)| format!("{}. {title}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        return format!("Рекомендую (программа: {key}):\n{list}");
    }

    "Я отвечаю только на вопросы об обучении в магистерских программах. \
Используйте /ask, /recommend или /compare."
        .to_string()
}
