//! In-process stand-in for the Bot API, served by axum on a random port.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use {
    axum::{Json, Router, body::Bytes, extract::State, http::Uri, routing::post},
    serde::Deserialize,
    serde_json::{Value, json},
    teloxide::Bot,
    tokio::{sync::oneshot, task::JoinHandle},
};

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: i64,
    pub text: String,
    #[serde(default)]
    pub parse_mode: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct Behavior {
    reject_markdown: bool,
    fail_messages: bool,
    fail_photos: bool,
}

#[derive(Clone)]
struct ApiState {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    pending_updates: Arc<Mutex<Vec<Value>>>,
}

#[derive(Default)]
pub struct MockTelegramApiBuilder {
    behavior: Behavior,
    updates: Vec<Value>,
}

impl MockTelegramApiBuilder {
    /// Answer `sendMessage` calls that carry a parse mode with an entity error.
    pub fn reject_markdown(mut self) -> Self {
        self.behavior.reject_markdown = true;
        self
    }

    /// Answer every `sendMessage` with a non-markup error.
    pub fn fail_messages(mut self) -> Self {
        self.behavior.fail_messages = true;
        self
    }

    pub fn fail_photos(mut self) -> Self {
        self.behavior.fail_photos = true;
        self
    }

    /// Updates returned by the first `getUpdates` call.
    pub fn with_updates(mut self, updates: Vec<Value>) -> Self {
        self.updates = updates;
        self
    }

    pub async fn start(self) -> MockTelegramApi {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ApiState {
            behavior: self.behavior,
            requests: Arc::clone(&requests),
            pending_updates: Arc::new(Mutex::new(self.updates)),
        };
        let app = Router::new()
            .route("/{*path}", post(telegram_api_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock telegram api");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve mock telegram api");
        });

        MockTelegramApi {
            addr,
            requests,
            shutdown: shutdown_tx,
            server,
        }
    }
}

pub struct MockTelegramApi {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<()>,
}

impl MockTelegramApi {
    pub fn builder() -> MockTelegramApiBuilder {
        MockTelegramApiBuilder::default()
    }

    pub async fn start() -> Self {
        Self::builder().start().await
    }

    pub fn bot(&self) -> Bot {
        let api_url =
            reqwest::Url::parse(&format!("http://{}/", self.addr)).expect("parse api url");
        Bot::new("test-token").set_api_url(api_url)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().expect("lock requests").clone()
    }

    /// Raw bodies of every call to `method`.
    pub fn requests_for(&self, method: &str) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .map(|r| r.body)
            .collect()
    }

    pub fn sent_messages(&self) -> Vec<SendMessageRequest> {
        self.requests_for("SendMessage")
            .iter()
            .map(|body| serde_json::from_str(body).expect("decode sendMessage body"))
            .collect()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown.send(());
        let _ = self.server.await;
    }
}

fn ok(result: Value) -> Value {
    json!({ "ok": true, "result": result })
}

fn api_error(description: &str) -> Value {
    json!({ "ok": false, "error_code": 400, "description": description })
}

fn sent_message() -> Value {
    json!({
        "message_id": 1,
        "date": 0,
        "chat": { "id": 42, "type": "private" },
        "text": "ok"
    })
}

async fn telegram_api_handler(
    State(state): State<ApiState>,
    uri: Uri,
    body: Bytes,
) -> Json<Value> {
    let method = uri.path().rsplit('/').next().unwrap_or_default().to_string();
    let raw_body = String::from_utf8_lossy(&body).to_string();
    state
        .requests
        .lock()
        .expect("lock requests")
        .push(CapturedRequest {
            method: method.clone(),
            body: raw_body,
        });

    let response = match method.as_str() {
        "SendMessage" => {
            let with_markup = serde_json::from_slice::<SendMessageRequest>(&body)
                .ok()
                .and_then(|req| req.parse_mode)
                .is_some();
            if state.behavior.fail_messages {
                api_error("Bad Request: chat not found")
            } else if state.behavior.reject_markdown && with_markup {
                api_error(
                    "Bad Request: can't parse entities: Can't find end of the entity starting at byte offset 0",
                )
            } else {
                ok(sent_message())
            }
        },
        "SendPhoto" if state.behavior.fail_photos => {
            api_error("Bad Request: wrong file identifier/HTTP URL specified")
        },
        "SendPhoto" => ok(sent_message()),
        "GetUpdates" => {
            let updates = std::mem::take(&mut *state.pending_updates.lock().expect("lock updates"));
            ok(Value::Array(updates))
        },
        _ => ok(Value::Bool(true)),
    };
    Json(response)
}
