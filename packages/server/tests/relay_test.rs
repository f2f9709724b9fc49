//! Integration tests driving an in-process relay over real TCP connections.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use serambi_server::{
    ServerConfig,
    ui::{AppState, Server},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::oneshot,
    time::timeout,
};

const RECV_TIMEOUT: Duration = Duration::from_secs(2);
const QUIET_PERIOD: Duration = Duration::from_millis(200);

/// Helper struct to manage an in-process server
struct TestServer {
    addr: SocketAddr,
    http_addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    _uploads: tempfile::TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            uploads_dir: uploads.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let http_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let http_addr = http_listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = Server::new(Arc::new(AppState::new(&config)));
        tokio::spawn(server.serve(listener, Some(http_listener), async move {
            let _ = shutdown_rx.await;
        }));

        TestServer {
            addr,
            http_addr,
            shutdown: Some(shutdown_tx),
            _uploads: uploads,
        }
    }

    fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.http_addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
    }
}

/// Helper struct speaking the line protocol as a peer
struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    /// Connect, send the handshake and wait until the server confirms `general`
    async fn connect(server: &TestServer, username: &str) -> Self {
        let stream = TcpStream::connect(server.addr).await.unwrap();
        let (read_half, writer) = stream.into_split();
        let mut client = TestClient {
            lines: BufReader::new(read_half).lines(),
            writer,
        };
        client.send(username).await;
        client
            .expect(|frame| frame == "[ROOM_JOINED]general")
            .await;
        client
    }

    async fn send(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
    }

    /// Skip frames until one matches; panics on timeout or EOF
    async fn expect(&mut self, predicate: impl Fn(&str) -> bool) -> String {
        loop {
            let line = timeout(RECV_TIMEOUT, self.lines.next_line())
                .await
                .expect("timed out waiting for frame")
                .unwrap()
                .expect("connection closed");
            if predicate(&line) {
                return line;
            }
        }
    }

    /// Assert no matching frame arrives within the quiet period
    async fn expect_none(&mut self, predicate: impl Fn(&str) -> bool) {
        while let Ok(Ok(Some(line))) = timeout(QUIET_PERIOD, self.lines.next_line()).await {
            assert!(!predicate(&line), "unexpected frame: {}", line);
        }
    }
}

#[tokio::test]
async fn test_handshake_announces_new_user() {
    // テスト項目: 新しいユーザーの参加通知とユーザー一覧が既存の接続に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;

    // when (操作):
    let _bob = TestClient::connect(&server, "bob").await;

    // then (期待する結果):
    alice
        .expect(|frame| frame.starts_with("[INFO] bob joined from 127.0.0.1:"))
        .await;
    alice
        .expect(|frame| frame == r#"[USERS]{"alice":"general","bob":"general"}"#)
        .await;
}

#[tokio::test]
async fn test_chat_is_broadcast_with_receipt_for_sender() {
    // テスト項目: チャットは同じルームの全員に届き、送信者にだけ DELIVERED が届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let mut bob = TestClient::connect(&server, "bob").await;

    // when (操作):
    alice.send("hello everyone").await;

    // then (期待する結果):
    let chat = bob
        .expect(|frame| frame.starts_with("[MSG_ID:"))
        .await;
    assert!(chat.ends_with("] alice: hello everyone"));
    let id = chat
        .trim_start_matches("[MSG_ID:")
        .split(']')
        .next()
        .unwrap()
        .to_string();
    alice.expect(|frame| frame == chat).await;
    alice
        .expect(|frame| frame == format!("[DELIVERED]{}", id))
        .await;
    bob.expect_none(|frame| frame.starts_with("[DELIVERED]")).await;
}

#[tokio::test]
async fn test_room_scoped_chat_and_history_replay() {
    // テスト項目: games での発言は general の bob に届かず、後から参加した carol は履歴で読める
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let mut bob = TestClient::connect(&server, "bob").await;
    alice.send("[CREATE_ROOM]games").await;
    alice.expect(|frame| frame == "[ROOM_CREATED]games").await;
    bob.expect(|frame| frame == r#"[ROOM_LIST]["general","games"]"#)
        .await;

    // when (操作):
    alice.send("hi").await;
    let hi = alice
        .expect(|frame| frame.starts_with("[MSG_ID:") && frame.ends_with("alice: hi"))
        .await;
    let mut carol = TestClient::connect(&server, "carol").await;
    carol.send("[JOIN_ROOM]games").await;
    carol.expect(|frame| frame == "[ROOM_JOINED]games").await;
    carol.send("[GET_HISTORY]games").await;

    // then (期待する結果):
    carol.expect(|frame| frame == hi).await;
    bob.expect_none(|frame| frame.starts_with("[MSG_ID:")).await;
}

#[tokio::test]
async fn test_room_errors_are_private() {
    // テスト項目: ルーム操作の失敗は要求者にだけ ROOM_ERROR で返る
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let mut bob = TestClient::connect(&server, "bob").await;

    // when (操作):
    alice.send("[DELETE_ROOM]general").await;
    alice
        .send("[CREATE_ROOM]this-name-is-way-too-long-for-a-room")
        .await;

    // then (期待する結果):
    alice
        .expect(|frame| frame == "[ROOM_ERROR]Room 'general' cannot be deleted")
        .await;
    alice
        .expect(|frame| frame.starts_with("[ROOM_ERROR]Invalid room name"))
        .await;
    bob.expect_none(|frame| frame.starts_with("[ROOM_ERROR]")).await;
}

#[tokio::test]
async fn test_delete_room_returns_viewers_to_general() {
    // テスト項目: ルーム削除でそのルームを見ていたユーザーが general に戻り、全員に通知される
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let mut bob = TestClient::connect(&server, "bob").await;
    alice.send("[CREATE_ROOM]x").await;
    alice.expect(|frame| frame == "[ROOM_CREATED]x").await;

    // when (操作):
    bob.send("[DELETE_ROOM]x").await;

    // then (期待する結果):
    bob.expect(|frame| frame == r#"[ROOM_LIST]["general"]"#).await;
    alice
        .expect(|frame| frame == r#"[USERS]{"alice":"general","bob":"general"}"#)
        .await;
    alice
        .expect(|frame| frame == "[INFO] Room 'x' has been deleted")
        .await;
}

#[tokio::test]
async fn test_disconnect_refreshes_user_list() {
    // テスト項目: 切断すると退出通知・入力中解除・ユーザー一覧の更新が残りの接続に届く
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let bob = TestClient::connect(&server, "bob").await;
    alice
        .expect(|frame| frame == r#"[USERS]{"alice":"general","bob":"general"}"#)
        .await;

    // when (操作):
    drop(bob);

    // then (期待する結果):
    alice.expect(|frame| frame == "[INFO] bob left").await;
    alice.expect(|frame| frame == "[STOP_TYPING]bob").await;
    alice
        .expect(|frame| frame == r#"[USERS]{"alice":"general"}"#)
        .await;
}

#[tokio::test]
async fn test_disconnect_before_handshake_is_silent() {
    // テスト項目: ハンドシェイク前に切断した接続は何も配信せず、サーバーは動き続ける
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;

    // when (操作):
    let stream = TcpStream::connect(server.addr).await.unwrap();
    drop(stream);

    // then (期待する結果):
    alice.expect_none(|frame| frame.starts_with("[INFO]")).await;
    let _bob = TestClient::connect(&server, "bob").await;
    alice
        .expect(|frame| frame.starts_with("[INFO] bob joined"))
        .await;
}

#[tokio::test]
async fn test_unknown_tag_is_not_relayed_as_chat() {
    // テスト項目: 未知のタグはチャットとして転送されず、接続も切れない
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    let mut bob = TestClient::connect(&server, "bob").await;

    // when (操作):
    alice.send("[SHOUT]hello").await;
    alice.send("still here").await;

    // then (期待する結果):
    let chat = bob.expect(|frame| frame.starts_with("[MSG_ID:")).await;
    assert!(chat.ends_with("] alice: still here"));
}

#[tokio::test]
async fn test_http_status_api() {
    // テスト項目: HTTP API がルーム・ユーザーの状態を返し、未知のルームは 404
    // given (前提条件):
    let server = TestServer::start().await;
    let mut alice = TestClient::connect(&server, "alice").await;
    alice.send("[CREATE_ROOM]games").await;
    alice.expect(|frame| frame == "[ROOM_CREATED]games").await;
    alice.send("hi").await;
    alice.expect(|frame| frame.starts_with("[DELIVERED]")).await;
    let http = reqwest::Client::new();

    // when (操作):
    let health: serde_json::Value = http
        .get(server.http_url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: serde_json::Value = http
        .get(server.http_url("/api/rooms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let detail: serde_json::Value = http
        .get(server.http_url("/api/rooms/games"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let users: serde_json::Value = http
        .get(server.http_url("/api/users"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let missing = http
        .get(server.http_url("/api/rooms/nowhere"))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health, serde_json::json!({"status": "ok"}));
    assert_eq!(rooms[0]["name"], "general");
    assert_eq!(rooms[1]["name"], "games");
    assert_eq!(rooms[1]["creator"], "alice");
    assert_eq!(rooms[1]["history_len"], 1);
    assert_eq!(detail["members"], serde_json::json!(["alice"]));
    assert!(
        detail["history"][0]
            .as_str()
            .unwrap()
            .ends_with("alice: hi")
    );
    assert_eq!(users, serde_json::json!({"alice": "games"}));
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
