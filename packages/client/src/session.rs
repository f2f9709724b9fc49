//! TCP client session management.

use std::sync::Arc;

use serambi_server::{domain::Username, infrastructure::dto::line::ServerFrame};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{TcpStream, tcp::{OwnedReadHalf, OwnedWriteHalf}},
    sync::{Mutex, mpsc},
};

use crate::{
    command::{Command, HELP, file_frame},
    domain::ClientState,
    error::ClientError,
};

use super::{formatter::MessageFormatter, ui::print_above_prompt};

/// How a session ended without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// `/quit`, Ctrl+C or Ctrl+D
    UserExit,
}

/// Run one connection: handshake, then relay input lines and server frames
/// until the user quits or the connection is lost.
pub async fn run_client_session(
    addr: &str,
    username: &Username,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<SessionEnd, ClientError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let (read_half, mut writer) = stream.into_split();

    // Handshake: the first line is the username
    send_line(&mut writer, username.as_str()).await?;

    tracing::info!("Connected to chat server!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send, /help for commands.\n",
        username
    );

    let state = Arc::new(Mutex::new(ClientState::new(username.clone())));
    let mut read_task = tokio::spawn(read_loop(read_half, state.clone()));

    loop {
        tokio::select! {
            _ = &mut read_task => {
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    return Ok(SessionEnd::UserExit);
                };
                match handle_input(&line, &state, &mut writer).await {
                    Ok(true) => {}
                    Ok(false) => {
                        read_task.abort();
                        return Ok(SessionEnd::UserExit);
                    }
                    Err(ClientError::FileRead { path, source }) => {
                        print_above_prompt(
                            &format!("! cannot read '{}': {}", path.display(), source),
                            username.as_str(),
                        );
                    }
                    Err(e) => {
                        read_task.abort();
                        return Err(e);
                    }
                }
            }
        }
    }
}

/// Handle one input line; `Ok(false)` means the user asked to quit
async fn handle_input(
    line: &str,
    state: &Mutex<ClientState>,
    writer: &mut OwnedWriteHalf,
) -> Result<bool, ClientError> {
    let (username, active_room) = {
        let state = state.lock().await;
        (state.username.clone(), state.active_room.clone())
    };

    let command = match Command::parse(line) {
        Ok(command) => command,
        Err(e) => {
            print_above_prompt(&format!("! {}", e), username.as_str());
            return Ok(true);
        }
    };

    match &command {
        Command::Quit => return Ok(false),
        Command::Help => {
            print_above_prompt(HELP, username.as_str());
            return Ok(true);
        }
        Command::File(path) => {
            let frame = file_frame(path, &active_room).await?;
            send_line(writer, &frame.to_string()).await?;
            return Ok(true);
        }
        Command::Switch(room) => {
            // The server does not confirm a switch
            state.lock().await.active_room = room.clone();
        }
        _ => {}
    }

    for frame in command.frames(&active_room) {
        send_line(writer, &frame.to_string()).await?;
    }
    Ok(true)
}

async fn send_line(writer: &mut OwnedWriteHalf, line: &str) -> Result<(), ClientError> {
    writer.write_all(format!("{}\n", line).as_bytes()).await?;
    Ok(())
}

/// Print every frame from the server until the connection ends
async fn read_loop(read_half: OwnedReadHalf, state: Arc<Mutex<ClientState>>) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                tracing::info!("Server closed the connection");
                break;
            }
            Err(e) => {
                tracing::warn!("Read error: {}", e);
                break;
            }
        };

        let mut state = state.lock().await;
        let formatted = match ServerFrame::parse(&line) {
            Ok(frame) => {
                state.apply(&frame);
                MessageFormatter::format_frame(&frame, &state.username)
            }
            Err(e) => {
                tracing::debug!("Unparsed frame ({}): {}", e, line);
                Some(MessageFormatter::format_raw_message(&line))
            }
        };
        if let Some(text) = formatted {
            print_above_prompt(&text, state.username.as_str());
        }
    }
}
