//! AI commentary against stand-in HTTP servers.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use axum_test::TestServer;
use iching_cast::api::{create_router, AppState};
use iching_cast::casting::resolve;
use iching_cast::config::Config;
use iching_cast::db::Database;
use iching_cast::interpretation::IchingLibrary;
use iching_cast::models::*;
use iching_cast::oracle::{
    AnalysisClient, OracleError, UpstreamClient, EMPTY_CONTENT, FALLBACK_MESSAGE, SYSTEM_PROMPT,
};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
struct Captured {
    content: Option<&'static str>,
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn chat_completions(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    captured.requests.lock().unwrap().push((auth, body));
    Json(json!({ "choices": [{ "message": { "content": captured.content } }] }))
}

/// Fake chat-completions endpoint answering with `captured.content`.
async fn fake_upstream(captured: Captured) -> String {
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(captured);
    format!("{}/v1/chat/completions", spawn(router).await)
}

fn qian_request(question: &str) -> AnalysisRequest {
    let lines = vec![Line::new(true, false); 6];
    AnalysisRequest::new(question, None, &resolve(&lines), None)
}

fn api_server(config: Config) -> TestServer {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    let app = create_router(AppState::new(db, IchingLibrary::empty(), &config));
    TestServer::new(app).expect("Failed to create test server")
}

mod upstream {
    use super::*;

    #[tokio::test]
    async fn sends_prompts_with_bearer_key() {
        let captured = Captured {
            content: Some("**结论**：稳中求进。"),
            ..Default::default()
        };
        let url = fake_upstream(captured.clone()).await;
        let client = UpstreamClient::from_config(&Config::with_upstream(url, "sk-test"));

        let content = client.analyse(&qian_request("事业")).await.unwrap();
        assert_eq!(content, "**结论**：稳中求进。");

        let requests = captured.requests.lock().unwrap();
        let (auth, body) = &requests[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        let user = body["messages"][1]["content"].as_str().unwrap();
        assert!(user.starts_with("问题：事业\n卦象：乾（序号 1，乾为天）"));
    }

    #[tokio::test]
    async fn empty_answer_becomes_placeholder() {
        let url = fake_upstream(Captured::default()).await;
        let client = UpstreamClient::from_config(&Config::with_upstream(url, "sk-test"));

        let content = client.analyse(&qian_request("事业")).await.unwrap();
        assert_eq!(content, EMPTY_CONTENT);
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let client = UpstreamClient::from_config(&Config::offline());
        assert!(!client.is_configured());
        assert!(matches!(
            client.analyse(&qian_request("事业")).await,
            Err(OracleError::NotConfigured)
        ));
    }
}

mod ai_endpoint {
    use super::*;

    #[tokio::test]
    async fn proxies_to_the_upstream_model() {
        let url = fake_upstream(Captured {
            content: Some("顺势而为。"),
            ..Default::default()
        })
        .await;
        let server = api_server(Config::with_upstream(url, "sk-test"));

        let response = server.post("/api/ai").json(&qian_request("")).await;

        response.assert_status_ok();
        let body: AnalysisResponse = response.json();
        assert_eq!(body.content, "顺势而为。");
    }

    #[tokio::test]
    async fn slow_upstream_is_gateway_timeout() {
        let router = Router::new().route(
            "/slow",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::OK
            }),
        );
        let base = spawn(router).await;
        let mut config = Config::with_upstream(format!("{}/slow", base), "sk-test");
        config.ai_timeout = Duration::from_millis(100);
        let server = api_server(config);

        let response = server.post("/api/ai").json(&qian_request("事业")).await;

        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
        let body: ErrorBody = response.json();
        assert_eq!(body.detail, "AI 服务响应超时，请稍后重试");
    }
}

mod analysis_client {
    use super::*;

    /// Analysis endpoint that answers slowly for the question "slow".
    async fn fake_analysis() -> String {
        let router = Router::new().route(
            "/api/ai",
            post(|Json(req): Json<AnalysisRequest>| async move {
                if req.question == "slow" {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                }
                if req.question == "reject" {
                    return (StatusCode::BAD_REQUEST, Json(json!({ "detail": "" })));
                }
                if req.question == "fail" {
                    return (
                        StatusCode::BAD_GATEWAY,
                        Json(json!({ "detail": "AI 服务请求失败: boom" })),
                    );
                }
                (
                    StatusCode::OK,
                    Json(json!({ "content": format!("answer to {}", req.question) })),
                )
            }),
        );
        spawn(router).await
    }

    #[tokio::test]
    async fn returns_content() {
        let client = AnalysisClient::new(fake_analysis().await);
        let content = client.analyse(&qian_request("fast")).await.unwrap();
        assert_eq!(content, "answer to fast");
    }

    #[tokio::test]
    async fn surfaces_failure_detail() {
        let client = AnalysisClient::new(fake_analysis().await);
        let err = client.analyse(&qian_request("fail")).await.unwrap_err();
        assert_eq!(err.user_message(), "AI 服务请求失败: boom");
    }

    #[tokio::test]
    async fn bad_request_without_detail_falls_back_to_generic_message() {
        let client = AnalysisClient::new(fake_analysis().await);
        let err = client.analyse(&qian_request("reject")).await.unwrap_err();

        assert!(matches!(&err, OracleError::Rejected(detail) if detail.is_empty()));
        assert_eq!(err.user_message(), FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn newer_request_wins_over_slow_older_one() {
        let client = AnalysisClient::new(fake_analysis().await);
        let slow_request = qian_request("slow");
        let fast_request = qian_request("fast");

        let slow = client.analyse(&slow_request);
        let fast = async {
            // Issued after the slow one is in flight.
            tokio::time::sleep(Duration::from_millis(50)).await;
            client.analyse(&fast_request).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(matches!(slow, Err(OracleError::Superseded)));
        assert_eq!(fast.unwrap(), "answer to fast");
        assert_eq!(client.current_generation(), 2);
    }
}
