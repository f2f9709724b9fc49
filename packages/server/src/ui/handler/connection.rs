//! Per-connection handling: handshake, reader and writer tasks, cleanup.

use std::{net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{TcpStream, tcp::OwnedWriteHalf},
    sync::{mpsc, oneshot},
};

use crate::{
    domain::{ConnectionId, MessagePusher, Username},
    ui::state::AppState,
};

use super::router::ProtocolRouter;

/// Drive one connection from handshake to cleanup.
///
/// The first line is the username. After that every line is fed to the
/// router while a writer task drains the connection's channel into the
/// socket. A frame that is being dispatched always runs to completion: the
/// reader only looks at the writer's state between frames. Cleanup runs once.
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    connection: ConnectionId,
    state: Arc<AppState>,
) {
    let (read_half, write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    // Handshake
    let username = match lines.next_line().await {
        Ok(Some(line)) => Username::new(line.trim()),
        Ok(None) => {
            tracing::info!("'{}' closed before handshake", connection);
            state.message_pusher.unregister_client(connection).await;
            return;
        }
        Err(e) => {
            tracing::warn!("'{}' failed during handshake: {}", connection, e);
            state.message_pusher.unregister_client(connection).await;
            return;
        }
    };

    let (tx, rx) = mpsc::unbounded_channel();
    state
        .connect_participant_usecase
        .execute(connection, username.clone(), &peer_addr.to_string(), tx)
        .await;

    let router = ProtocolRouter::new(state.clone(), connection, username.clone());
    let (closed_tx, closed_rx) = oneshot::channel();
    let send_task = pusher_loop(rx, write_half, closed_tx);

    receive_loop(lines, router, closed_rx).await;
    send_task.abort();

    state
        .disconnect_participant_usecase
        .execute(connection, username)
        .await;
}

/// Dispatch lines until the peer closes, a read fails or the writer is gone.
async fn receive_loop<R>(
    mut lines: Lines<R>,
    router: ProtocolRouter,
    mut writer_closed: oneshot::Receiver<()>,
) where
    R: AsyncBufRead + Unpin,
{
    loop {
        // next_line is cancel safe, dispatch is kept out of the select
        let line = tokio::select! {
            biased;
            _ = &mut writer_closed => {
                tracing::debug!("Writer for '{}' is gone, stop reading", router.username());
                break;
            }
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => router.dispatch(&line).await,
            Ok(None) => {
                tracing::debug!("Peer '{}' closed the connection", router.username());
                break;
            }
            Err(e) => {
                tracing::warn!("Read from '{}' failed: {}", router.username(), e);
                break;
            }
        }
    }
}

/// Spawns a task that writes every queued frame, newline-terminated, to the socket.
///
/// The task ends when the socket write fails or every sender is dropped.
/// `closed` is dropped with the task, which tells the reader to stop.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut writer: OwnedWriteHalf,
    closed: oneshot::Sender<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let _closed = closed;
        while let Some(frame) = rx.recv().await {
            let mut bytes = frame.into_bytes();
            bytes.push(b'\n');
            if let Err(e) = writer.write_all(&bytes).await {
                tracing::debug!("Write failed, closing writer: {}", e);
                break;
            }
        }
    })
}
