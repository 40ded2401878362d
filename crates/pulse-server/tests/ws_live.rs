//! End-to-end tests over real sockets: axum served on an ephemeral port,
//! clients speaking actual WebSocket via tokio-tungstenite.

#![allow(missing_docs)]

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use pulse_core::ids::UserId;
use pulse_server::auth::{AuthError, IdentityVerifier};
use pulse_server::{AppState, build_router};
use pulse_settings::PulseSettings;
use pulse_store::EventStore;

struct StubVerifier;

#[async_trait::async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        token
            .strip_prefix("tok-")
            .map(UserId::new)
            .ok_or(AuthError::InvalidToken)
    }
}

struct LiveServer {
    addr: std::net::SocketAddr,
    state: Arc<AppState>,
    shutdown: CancellationToken,
    server: tokio::task::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

impl LiveServer {
    async fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::open(&dir.path().join("test.db")).unwrap();
        let shutdown = CancellationToken::new();
        let state = Arc::new(AppState::new(
            PulseSettings::default(),
            store,
            Arc::new(StubVerifier),
            shutdown.clone(),
            None,
        ));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = build_router(Arc::clone(&state));
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            shutdown,
            server,
            _dir: dir,
        }
    }

    async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..200 {
            if self.state.registry.connection_count() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "registry never reached {expected} connections (at {})",
            self.state.registry.connection_count()
        );
    }
}

impl Drop for LiveServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect_ws(addr: std::net::SocketAddr) -> WsStream {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    ws
}

async fn create_event(addr: std::net::SocketAddr, token: &str, title: &str) -> serde_json::Value {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/events/"))
        .header("Authorization", format!("Bearer {token}"))
        .json(&serde_json::json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

async fn next_text(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for a broadcast")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn connected_clients_receive_created_events() {
    let server = LiveServer::start().await;
    let mut ws1 = connect_ws(server.addr).await;
    let mut ws2 = connect_ws(server.addr).await;
    server.wait_for_connections(2).await;

    let created = create_event(server.addr, "tok-U1", "Launch").await;

    for ws in [&mut ws1, &mut ws2] {
        let payload = next_text(ws).await;
        assert_eq!(payload["type"], "event_created");
        assert_eq!(payload["id"], created["id"]);
        assert_eq!(payload["title"], "Launch");
        assert_eq!(payload["user_id"], "U1");
    }
}

#[tokio::test]
async fn client_messages_are_ignored_but_do_not_kill_the_connection() {
    let server = LiveServer::start().await;
    let mut ws = connect_ws(server.addr).await;
    server.wait_for_connections(1).await;

    // inbound frames have no protocol meaning on this channel
    ws.send(Message::Text("hello?".into())).await.unwrap();
    ws.send(Message::Text("{\"type\":\"subscribe\"}".into()))
        .await
        .unwrap();

    let created = create_event(server.addr, "tok-U1", "still here").await;
    let payload = next_text(&mut ws).await;
    assert_eq!(payload["id"], created["id"]);
}

#[tokio::test]
async fn closing_the_socket_deregisters_the_connection() {
    let server = LiveServer::start().await;
    let ws = connect_ws(server.addr).await;
    server.wait_for_connections(1).await;

    drop(ws);
    server.wait_for_connections(0).await;
}

#[tokio::test]
async fn abrupt_disconnect_during_broadcasts_leaves_registry_consistent() {
    let server = LiveServer::start().await;
    let mut keeper = connect_ws(server.addr).await;
    let goner = connect_ws(server.addr).await;
    server.wait_for_connections(2).await;

    drop(goner); // races with the broadcasts below
    for i in 0..5 {
        let _ = create_event(server.addr, "tok-U1", &format!("event {i}")).await;
    }

    server.wait_for_connections(1).await;
    // the surviving client saw every message, in order
    for i in 0..5 {
        let payload = next_text(&mut keeper).await;
        assert_eq!(payload["title"], format!("event {i}"));
    }
}

#[tokio::test]
async fn shutdown_closes_and_deregisters_every_connection() {
    let server = LiveServer::start().await;
    let mut ws1 = connect_ws(server.addr).await;
    let mut ws2 = connect_ws(server.addr).await;
    server.wait_for_connections(2).await;

    server.shutdown.cancel();
    server.wait_for_connections(0).await;

    // both clients observe the close
    for ws in [&mut ws1, &mut ws2] {
        loop {
            match tokio::time::timeout(Duration::from_secs(5), ws.next())
                .await
                .expect("timed out waiting for close")
            {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(_)) => break,
            }
        }
    }
}
