use std::sync::{Arc, Mutex, MutexGuard};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::client::EveClient;
use crate::api::Character;

pub type CapturedRequestLines = Arc<tokio::sync::Mutex<Vec<String>>>;

/// A canned HTTP response served by [`spawn_mock_backend`].
pub struct MockResponse {
    pub status: u16,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub requests: CapturedRequestLines,
    pub task: JoinHandle<Result<(), String>>,
}

impl MockBackend {
    /// Client that talks to this backend directly, ignoring proxy variables.
    pub fn client(&self) -> EveClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("reqwest client should build");
        EveClient::with_http(http, &self.base_url)
    }

    pub async fn request_lines(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

/// Serve each response to one connection, in order, capturing the request
/// line of every request received.
pub async fn spawn_mock_backend(responses: Vec<MockResponse>) -> MockBackend {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr should resolve");
    let requests: CapturedRequestLines = Arc::new(tokio::sync::Mutex::new(Vec::new()));
    let captured = Arc::clone(&requests);

    let task = tokio::spawn(async move {
        for response in responses {
            let (mut stream, _) = listener.accept().await.map_err(|err| err.to_string())?;
            let request_line = read_request_line(&mut stream).await?;
            captured.lock().await.push(request_line);

            let reason = reqwest::StatusCode::from_u16(response.status)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown");
            let payload = format!(
                "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                response.status,
                reason,
                response.body.len(),
                response.body
            );
            stream
                .write_all(payload.as_bytes())
                .await
                .map_err(|err| err.to_string())?;
            stream.shutdown().await.map_err(|err| err.to_string())?;
        }
        Ok(())
    });

    MockBackend {
        base_url: format!("http://{addr}/api/v1"),
        requests,
        task,
    }
}

async fn read_request_line(stream: &mut tokio::net::TcpStream) -> Result<String, String> {
    let mut buffer = Vec::new();
    loop {
        let mut chunk = [0_u8; 1024];
        let read = stream
            .read(&mut chunk)
            .await
            .map_err(|err| err.to_string())?;
        if read == 0 {
            return Err("Unexpected EOF while reading HTTP headers".to_string());
        }
        buffer.extend_from_slice(&chunk[..read]);
        if buffer.windows(4).any(|window| window == b"\r\n\r\n") {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buffer);
    text.split("\r\n")
        .next()
        .map(str::to_string)
        .ok_or_else(|| "Missing HTTP request line".to_string())
}

/// Extract the request target from a line like `GET /path?x=1 HTTP/1.1`.
pub fn request_target(request_line: &str) -> &str {
    request_line.split_whitespace().nth(1).unwrap_or_default()
}

pub fn sample_character(id: i64, name: &str) -> Character {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "avatar": format!("/avatars/{id}.png"),
        "vrm_path": "",
        "default_emotion": "neutral",
        "emoticons_frequency": "rarely",
        "is_active": true,
        "is_default": id == 1
    }))
    .expect("sample character should deserialize")
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Sets environment variables for the lifetime of the guard and restores
/// the previous values on drop. Holds a process-wide lock so tests touching
/// the environment never interleave.
pub struct TestEnvVarGuard {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl TestEnvVarGuard {
    pub fn new() -> Self {
        let lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Self {
            saved: Vec::new(),
            _lock: lock,
        }
    }

    pub fn set_var(&mut self, key: &str, value: &str) {
        self.saved.push((key.to_string(), std::env::var(key).ok()));
        std::env::set_var(key, value);
    }

    pub fn remove_var(&mut self, key: &str) {
        self.saved.push((key.to_string(), std::env::var(key).ok()));
        std::env::remove_var(key);
    }
}

impl Drop for TestEnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..).rev() {
            match value {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Point `Config::load`/`save`/`mutate` at a throwaway file for the duration
/// of `f`. Also holds the environment lock so config tests run one at a time.
pub fn with_test_config_env<R>(f: impl FnOnce(&std::path::Path, &mut TestEnvVarGuard) -> R) -> R {
    use crate::core::config::Config;

    let mut guard = TestEnvVarGuard::new();
    guard.remove_var(crate::core::config::BASE_URL_ENV_VAR);
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    Config::set_test_config_path(config_path.clone());
    let result = f(&config_path, &mut guard);
    Config::clear_test_config_override();
    result
}
