//! In-process stand-ins for the template repository and the email provider.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use order_email_notifier::codec::encode_base64;
use order_email_notifier::config::{
    ApiConfig, HttpConfig, LogConfig, MailBackend, MailConfig, OtelConfig, RedisConfig,
    RenderConfig, ServerConfig, Settings, TemplateRepoConfig,
};

pub const REPO_TOKEN: &str = "repo-t0ken";
pub const MAIL_API_KEY: &str = "api:key-123";

pub const WELCOME_EVENT: &str =
    "https://hydra.example.net/v5-test:created-order-with-transactional-customer";
pub const EXISTING_EVENT: &str =
    "https://hydra.example.net/v5-test:created-order-for-existing-customer";

async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Wrap base64 at 60 columns the way repository file APIs do
fn wrapped_base64(raw: &str) -> String {
    let encoded = encode_base64(raw);
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct RepoInner {
    directory: Vec<String>,
    files: HashMap<String, Value>,
    requests: Vec<String>,
    fail_directory: Option<u16>,
}

#[derive(Clone)]
pub struct FakeTemplateRepo {
    pub addr: SocketAddr,
    inner: Arc<Mutex<RepoInner>>,
}

impl FakeTemplateRepo {
    pub async fn start() -> Self {
        let inner = Arc::new(Mutex::new(RepoInner::default()));
        let router = Router::new()
            .route("/templates", get(repo_directory))
            .route("/templates/{name}", get(repo_file))
            .with_state(inner.clone());
        let addr = serve(router).await;
        Self { addr, inner }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/templates", self.addr)
    }

    /// Publish a template under `name`; it is listed and fetchable.
    pub fn add_template(&self, name: &str, from: &str, subject: &str, body: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.directory.push(name.to_string());
        inner.files.insert(
            name.to_string(),
            json!({ "From": from, "Subject": subject, "Body": body }),
        );
    }

    /// List `name` in the directory without a fetchable file behind it.
    pub fn add_listing_only(&self, name: &str) {
        self.inner.lock().unwrap().directory.push(name.to_string());
    }

    pub fn fail_directory_with(&self, status: u16) {
        self.inner.lock().unwrap().fail_directory = Some(status);
    }

    /// Request paths seen so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.inner.lock().unwrap().requests.clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    let token_ok = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("token {}", REPO_TOKEN))
        .unwrap_or(false);
    token_ok && headers.contains_key("user-agent")
}

async fn repo_directory(
    State(inner): State<Arc<Mutex<RepoInner>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut inner = inner.lock().unwrap();
    inner.requests.push("/templates".to_string());

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }
    if let Some(status) = inner.fail_directory {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, Json(json!({"message": "directory unavailable"})));
    }

    let listing: Vec<Value> = inner
        .directory
        .iter()
        .map(|name| json!({ "name": name, "path": format!("templates/{}", name), "type": "file" }))
        .collect();
    (StatusCode::OK, Json(Value::Array(listing)))
}

async fn repo_file(
    State(inner): State<Arc<Mutex<RepoInner>>>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut inner = inner.lock().unwrap();
    inner.requests.push(format!("/templates/{}", name));

    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
    }

    match inner.files.get(&name) {
        Some(file) => (
            StatusCode::OK,
            Json(json!({
                "name": name,
                "encoding": "base64",
                "content": wrapped_base64(&file.to_string()),
            })),
        ),
        None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"}))),
    }
}

/// One POST received by the fake provider
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
}

struct MailInner {
    status: u16,
    body: String,
    received: Vec<ReceivedMessage>,
}

#[derive(Clone)]
pub struct FakeMailProvider {
    pub addr: SocketAddr,
    inner: Arc<Mutex<MailInner>>,
}

impl FakeMailProvider {
    pub async fn start() -> Self {
        Self::respond_with(200, r#"{"id":"<1@example.org>","message":"Queued. Thank you."}"#)
            .await
    }

    pub async fn respond_with(status: u16, body: &str) -> Self {
        let inner = Arc::new(Mutex::new(MailInner {
            status,
            body: body.to_string(),
            received: Vec::new(),
        }));
        let router = Router::new()
            .route("/v3/example.org/messages", post(mail_messages))
            .with_state(inner.clone());
        let addr = serve(router).await;
        Self { addr, inner }
    }

    pub fn api_base_url(&self) -> String {
        format!("http://{}/v3/example.org", self.addr)
    }

    pub fn received(&self) -> Vec<ReceivedMessage> {
        self.inner.lock().unwrap().received.clone()
    }
}

async fn mail_messages(
    State(inner): State<Arc<Mutex<MailInner>>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let mut inner = inner.lock().unwrap();
    inner.received.push(ReceivedMessage {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        form,
    });

    let status = StatusCode::from_u16(inner.status).unwrap();
    (status, inner.body.clone())
}

/// Settings wired to the two fakes
pub fn settings(repo: &FakeTemplateRepo, mail: &FakeMailProvider) -> Settings {
    Settings {
        server: ServerConfig::default(),
        api: ApiConfig::default(),
        template_repo: TemplateRepoConfig {
            base_url: repo.base_url(),
            token: REPO_TOKEN.to_string(),
            user_agent: "order-email-notifier-tests".to_string(),
        },
        mail: MailConfig {
            backend: MailBackend::Http,
            api_base_url: Some(mail.api_base_url()),
            api_key: Some(MAIL_API_KEY.to_string()),
        },
        http: HttpConfig::default(),
        render: RenderConfig::default(),
        redis: RedisConfig::default(),
        log: LogConfig::default(),
        otel: OtelConfig::default(),
    }
}

/// Kinesis-style envelope around `event`
pub fn envelope(event: &Value) -> Value {
    json!({
        "Records": [{
            "eventID": "shardId-000000000000:4954",
            "eventSource": "aws:kinesis",
            "kinesis": {
                "partitionKey": "order-1",
                "data": encode_base64(event.to_string()),
            }
        }]
    })
}

pub fn order_event(event_type: &str, market: &str, email: &str) -> Value {
    json!({
        "eventType": event_type,
        "eventDetails": {
            "market": market,
            "shipToEmail": email,
            "orderNumber": "IT-0042",
            "customer": { "firstName": "Giulia" },
            "notes": "Citofono 3 & <B>",
            "total": 31.0,
            "lines": [
                { "sku": "CAP-1", "quantity": 2 },
                { "sku": "CUP-9", "quantity": 1 }
            ]
        }
    })
}
