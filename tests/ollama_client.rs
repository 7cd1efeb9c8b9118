// OllamaClient tests against a fake inference server.
//
// Each test spins up an axum app on 127.0.0.1:0 that mimics the parts of
// Ollama's API we use, then points a real client at it.

use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use whatis::config::Config;
use whatis::inference::ollama::OllamaClient;
use whatis::inference::traits::{GenerateError, TextGenerator};
use whatis::output::error_chain;
use whatis::pipeline::batch;

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client(base_url: &str) -> OllamaClient {
    OllamaClient::new(base_url, Duration::from_secs(5)).unwrap()
}

// ============================================================
// Single requests
// ============================================================

#[tokio::test]
async fn returns_response_field_and_sends_expected_body() {
    let seen: Arc<Mutex<Vec<Value>>> = Arc::default();

    async fn handler(State(seen): State<Arc<Mutex<Vec<Value>>>>, Json(body): Json<Value>) -> Json<Value> {
        seen.lock().unwrap().push(body);
        Json(json!({"model": "llama3.1:8b", "response": "hello there", "done": true}))
    }

    let app = Router::new()
        .route("/api/generate", post(handler))
        .with_state(seen.clone());
    let base = serve(app).await;

    let text = client(&base).generate("Say hi", "llama3.1:8b").await.unwrap();
    assert_eq!(text, "hello there");

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({"model": "llama3.1:8b", "prompt": "Say hi", "stream": false})
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({"response": "ok"})) }),
    );
    let base = serve(app).await;

    let text = client(&format!("{base}/")).generate("p", "m").await.unwrap();
    assert_eq!(text, "ok");
}

#[tokio::test]
async fn missing_response_field_is_empty_success() {
    let app = Router::new().route("/api/generate", post(|| async { Json(json!({"done": true})) }));
    let base = serve(app).await;

    let text = client(&base).generate("p", "m").await.unwrap();
    assert_eq!(text, "");
}

#[tokio::test]
async fn non_200_is_request_failed_with_body() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::NOT_FOUND, "model 'nope' not found") }),
    );
    let base = serve(app).await;

    let err = client(&base).generate("p", "nope").await.unwrap_err();
    match err {
        GenerateError::RequestFailed { status, body } => {
            assert_eq!(status, 404);
            assert_eq!(body, "model 'nope' not found");
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn non_200_success_codes_are_still_failures() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::ACCEPTED, Json(json!({"response": "queued"}))) }),
    );
    let base = serve(app).await;

    let err = client(&base).generate("p", "m").await.unwrap_err();
    assert_eq!(err.kind(), "request_failed");
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let app = Router::new().route("/api/generate", post(|| async { "this is not json" }));
    let base = serve(app).await;

    let err = client(&base).generate("p", "m").await.unwrap_err();
    assert!(matches!(err, GenerateError::Parse(_)), "got {err:?}");
    assert_eq!(err.to_string(), "malformed response body");
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    let port = StdTcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let err = client(&format!("http://127.0.0.1:{port}"))
        .generate("p", "m")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "transport");

    // The reqwest error is exposed as the source, not repeated in the message.
    assert_eq!(err.to_string(), "transport error");
    let source = std::error::Error::source(&err).expect("transport error has a source");
    let chain = error_chain(&err);
    assert_eq!(chain, format!("transport error: {source}"));
    assert_eq!(chain.matches(&source.to_string()).count(), 1);
}

#[tokio::test]
async fn slow_server_hits_timeout_as_transport_error() {
    let app = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let base = serve(app).await;

    let slow_client = OllamaClient::new(&base, Duration::from_millis(200)).unwrap();
    let err = slow_client.generate("p", "m").await.unwrap_err();
    assert!(matches!(err, GenerateError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn list_models_reads_tags() {
    let app = Router::new().route(
        "/api/tags",
        get(|| async {
            Json(json!({"models": [{"name": "llama3.1:8b", "size": 1}, {"name": "mistral:7b"}]}))
        }),
    );
    let base = serve(app).await;

    let models = client(&base).list_models().await.unwrap();
    assert_eq!(models, vec!["llama3.1:8b", "mistral:7b"]);
}

// ============================================================
// End-to-end batch against the fake server
// ============================================================

async fn fail_x(Json(body): Json<Value>) -> Response {
    let prompt = body["prompt"].as_str().unwrap_or_default();
    if prompt.contains("\"What is X?\"") {
        (StatusCode::INTERNAL_SERVER_ERROR, "out of memory").into_response()
    } else {
        Json(json!({
            "response": "Here you go!\n<!DOCTYPE html><html><body>Y</body></html>\nDone."
        }))
        .into_response()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_error_for_one_topic_leaves_the_other_saved() {
    let base = serve(Router::new().route("/api/generate", post(fail_x))).await;
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        ollama_url: base.clone(),
        output_dir: tmp.path().to_path_buf(),
        ..Config::default()
    };

    let generator = Arc::new(client(&base));
    let report = batch::run(
        generator,
        vec!["X".to_string(), "Y".to_string()],
        &config,
        false,
    )
    .await;

    assert_eq!(report.total(), 2);
    assert_eq!(report.success_count(), 1);

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed[0].job.topic, "X");
    assert_eq!(failed[0].result.as_ref().unwrap_err().kind(), "request_failed");

    assert!(!tmp.path().join("What is X.txt").exists());
    assert_eq!(
        std::fs::read_to_string(tmp.path().join("What is Y.txt")).unwrap(),
        "<!DOCTYPE html><html><body>Y</body></html>"
    );
}
