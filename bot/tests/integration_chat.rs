use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use advisor_bot::{build_app, BotContext, ChatResponse};
use advisor_core::{ProgramMap, ProgramRecord, QaConfig, QaIndex};

fn context() -> BotContext {
    let mut programs = ProgramMap::new();
    programs.insert(
        "ai".into(),
        ProgramRecord {
            key: "ai".into(),
            name: "Искусственный интеллект".into(),
            url: "https://example.com/ai".into(),
            text_chunks: vec![
                "Срок обучения программы два года".into(),
                "Язык обучения программы английский".into(),
            ],
            courses: vec![
                "Введение в Python и ML".into(),
                "Корпоративные финансы".into(),
                "Компьютерное зрение".into(),
            ],
        },
    );
    let index = QaIndex::build(&programs);
    BotContext {
        programs,
        index,
        qa: QaConfig::default(),
    }
}

async fn chat(message: &str) -> String {
    let app = build_app(context());
    let body = serde_json::json!({ "message": message }).to_string();
    let request = Request::post("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let parsed: ChatResponse = serde_json::from_slice(&bytes).unwrap();
    parsed.reply
}

#[tokio::test]
async fn health_endpoint_responds() {
    let app = build_app(context());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn ask_command_returns_an_answer_with_relevance() {
    let reply = chat("/ask Какой срок обучения программы?").await;
    assert!(reply.contains("(relevance="), "reply was: {reply}");
}

#[tokio::test]
async fn skill_line_returns_numbered_recommendations() {
    let reply = chat("ai, python, cv").await;
    assert!(reply.starts_with("Рекомендую (программа: ai):"), "reply was: {reply}");
    assert!(reply.contains("1. "));
    assert!(reply.contains("Введение в Python и ML"));
    assert!(reply.contains("Компьютерное зрение"));
}

#[tokio::test]
async fn unrelated_message_gets_scope_reply() {
    let reply = chat("посоветуй ресторан").await;
    assert!(reply.starts_with("Я отвечаю только"), "reply was: {reply}");
}

#[tokio::test]
async fn compare_counts_chunks_and_courses() {
    let reply = chat("/compare").await;
    assert!(reply.contains("Сравнение программ:"));
    assert!(reply.contains("2 фрагментов"));
    assert!(reply.contains("3 дисциплин"));
}
