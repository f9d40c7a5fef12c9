//! Integration test: serve the C Agent endpoints from an in-process axum
//! router on a free port and drive `HttpBackend` and the controller against it.

use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use cagent_core::api::{ChatRequest, HelpRequest, Upload};
use cagent_core::state::{HelpView, HistoryView, SimilarityView};
use cagent_core::{ApiError, Backend, ChatMessage, Config, HttpBackend, Language, SlotId, ViewController};
use serde_json::{json, Value};
use std::io::Write;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

async fn chat(Json(body): Json<Value>) -> Json<Value> {
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let prior = body["history"].as_array().map(|h| h.len()).unwrap_or(0);
    Json(json!({"success": true, "response": format!("echo {} ({} prior)", message, prior)}))
}

async fn help(Json(body): Json<Value>) -> Json<Value> {
    let language = body["language"].as_str().unwrap_or_default().to_string();
    Json(json!({
        "success": true,
        "type": "statement",
        "results": {"while": format!("loop [{}]", language), "int": "integer", "for": "loop"}
    }))
}

async fn similarity(mut multipart: Multipart) -> Json<Value> {
    let mut names = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();
        names.push((field_name, file_name, bytes.len()));
    }
    if names.len() != 2 || names[0].0 != "file1" || names[1].0 != "file2" {
        return Json(json!({"success": false, "error": "Please upload both files"}));
    }
    Json(json!({
        "success": true,
        "similarity": 0.5,
        "file1": names[0].1,
        "file2": names[1].1,
    }))
}

fn healthy_app() -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/help", post(help))
        .route("/api/similarity", post(similarity))
        .route(
            "/api/history",
            get(|| async { Json(json!({"success": true, "history": ["one", "two"]})) }),
        )
        .route(
            "/api/language",
            post(|Json(body): Json<Value>| async move {
                Json(json!({"success": true, "language": body["language"]}))
            }),
        )
        .route("/api/config", get(|| async { Json(json!({"language": "en"})) }))
}

fn failing_app() -> Router {
    let fail = || async {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "error": "disk full"})),
        )
    };
    Router::new()
        .route("/api/history", get(fail))
        .route("/api/language", post(fail))
        .route("/api/config", get(|| async { (StatusCode::NOT_FOUND, "not here") }))
}

#[tokio::test]
async fn http_backend_speaks_the_json_contracts() {
    let base = serve(healthy_app()).await;
    let backend = HttpBackend::new(&format!("{}/", base));
    assert_eq!(backend.base_url(), base);

    let reply = backend
        .chat(&ChatRequest {
            message: "hi".to_string(),
            history: vec![ChatMessage::user("a"), ChatMessage::assistant("b")],
        })
        .await
        .expect("chat");
    assert!(reply.success);
    assert_eq!(reply.response.as_deref(), Some("echo hi (2 prior)"));

    let found = backend
        .help(&HelpRequest {
            query: "while (1) int x;".to_string(),
            language: Language::En,
        })
        .await
        .expect("help");
    let keywords: Vec<String> = found.entries().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keywords, vec!["while", "int", "for"]);
    assert_eq!(found.entries()[0].1, "loop [en]");

    let scored = backend
        .similarity(
            Upload { file_name: "a.c".to_string(), bytes: b"int a;".to_vec() },
            Upload { file_name: "b.c".to_string(), bytes: b"int b;".to_vec() },
        )
        .await
        .expect("similarity");
    assert!(scored.success);
    assert_eq!(scored.file1.as_deref(), Some("a.c"));
    assert_eq!(scored.file2.as_deref(), Some("b.c"));

    let history = backend.history().await.expect("history");
    assert_eq!(history.history, vec!["one", "two"]);

    assert!(backend.set_language(Language::En).await.expect("language").success);
    assert_eq!(backend.config().await.expect("config").language(), Language::En);
}

#[tokio::test]
async fn error_statuses_still_decode_json_bodies() {
    let base = serve(failing_app()).await;
    let backend = HttpBackend::new(&base);

    let history = backend.history().await.expect("json body despite 500");
    assert!(!history.success);

    let language = backend.set_language(Language::En).await.expect("json body despite 500");
    assert!(!language.success);

    match backend.config().await {
        Err(ApiError::Transport(message)) => assert!(message.contains("404")),
        other => panic!("expected transport error, got {:?}", other.map(|c| c.language)),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
        listener.local_addr().expect("local_addr").port()
    };
    let backend = HttpBackend::new(&format!("http://127.0.0.1:{}", port));
    assert!(matches!(backend.history().await, Err(ApiError::Transport(_))));
}

#[tokio::test]
async fn controller_round_trips_through_http() {
    let base = serve(healthy_app()).await;
    let mut controller = ViewController::new(HttpBackend::new(&base), Config::new(), None);
    controller.initialize().await;
    assert_eq!(controller.state().language, Language::En);

    controller.set_chat_input("first");
    controller.send_message().await;
    controller.set_chat_input("second");
    controller.send_message().await;
    assert_eq!(controller.state().conversation.len(), 4);
    assert_eq!(
        controller.state().conversation.entries()[3],
        ChatMessage::assistant("echo second (2 prior)")
    );

    controller.set_help_input("while");
    controller.search_help().await;
    assert!(matches!(controller.state().help_view, HelpView::Results { .. }));

    let dir = tempfile::tempdir().expect("tempdir");
    let mut paths = Vec::new();
    for name in ["x.c", "y.c"] {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).expect("create");
        f.write_all(b"int main(void) { return 0; }").expect("write");
        paths.push(path);
    }
    controller.handle_file_select(SlotId::First, Some(paths[0].clone())).await;
    controller.handle_file_select(SlotId::Second, Some(paths[1].clone())).await;
    controller.analyze_similarity().await;
    assert_eq!(
        controller.state().similarity_view,
        SimilarityView::Result {
            percentage: "50.00".to_string(),
            file1: "x.c".to_string(),
            file2: "y.c".to_string(),
        }
    );

    controller.load_history().await;
    assert_eq!(
        controller.state().history_view,
        HistoryView::Entries(vec!["two".to_string(), "one".to_string()])
    );
}
