//! WebSocket Game Server
//!
//! Accepts WebSocket connections, runs each through the lobby handshake, and
//! relays lobby output to the sockets. One task per connection reads; a
//! second writes from that connection's outbound queue.

use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::{accept_hdr_async, tungstenite::Message, WebSocketStream};
use tracing::{debug, error, info, instrument, warn};

use crate::config::ServerConfig;
use crate::game::{Game, RosterError};
use crate::network::protocol::{
    Handshake, ProtocolError, ServerMessage, PROTOCOL_ERROR_CLOSE_CODE, SUBPROTOCOL,
};
use crate::network::session::{
    generate_join_code, Admission, Binding, ConnectionId, Lobby, Outbound,
};
use crate::persist::{PersistenceError, SaveFile};

type WsSink = SplitSink<WebSocketStream<TcpStream>, Message>;
type WsSource = SplitStream<WebSocketStream<TcpStream>>;

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    Bind(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Save file could not be written or loaded.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// A new game could not be set up.
    #[error("Setup error: {0}")]
    Setup(#[from] RosterError),
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// Join code, fixed for the life of the process.
    join_code: String,
    /// Game, join code, and connection registry.
    lobby: Arc<Mutex<Lobby>>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Generate a fresh game for `num_players` and save it.
    pub fn new_game(config: ServerConfig, num_players: usize) -> Result<Self, GameServerError> {
        let game = Game::setup(num_players, &mut rand::thread_rng())?;
        let save_file = SaveFile::new(&config.save_path);
        save_file.save(&game)?;
        info!("Created {}-player game at {}", num_players, save_file.path().display());
        Ok(Self::with_game(config, game, save_file))
    }

    /// Load and validate the game in the configured save file.
    pub fn load_game(config: ServerConfig) -> Result<Self, GameServerError> {
        let save_file = SaveFile::new(&config.save_path);
        let game = save_file.load()?;
        info!(
            "Loaded {}-player game from {} ({} joined)",
            game.num_players(),
            save_file.path().display(),
            game.player_names().len()
        );
        Ok(Self::with_game(config, game, save_file))
    }

    fn with_game(config: ServerConfig, game: Game, save_file: SaveFile) -> Self {
        let join_code = generate_join_code(&mut rand::thread_rng());
        let (shutdown_tx, _) = broadcast::channel(1);

        Self {
            config,
            lobby: Arc::new(Mutex::new(Lobby::new(game, join_code.clone(), save_file))),
            join_code,
            shutdown_tx,
        }
    }

    /// Code players must send to join.
    pub fn join_code(&self) -> &str {
        &self.join_code
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from `listener` until shutdown, then save.
    #[instrument(skip_all)]
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GameServerError> {
        info!(
            "Game server listening on {} - join code is {}",
            listener.local_addr()?,
            self.join_code
        );
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            info!("New connection from {}", addr);
                            self.handle_connection(stream, addr);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        self.lobby.lock().await.save()?;
        info!("Final save complete");
        Ok(())
    }

    /// Handle a new WebSocket connection.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr) {
        let lobby = self.lobby.clone();
        let config = self.config.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let ws_stream = match accept_hdr_async(stream, negotiate_subprotocol).await {
                Ok(ws) => ws,
                Err(e) => {
                    error!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
            };

            let (ws_sender, ws_receiver) = ws_stream.split();
            let (msg_tx, msg_rx) = mpsc::channel::<ServerMessage>(config.outbound_buffer);
            let sender_task = tokio::spawn(send_loop(ws_sender, msg_rx));

            let close =
                run_connection(addr, ws_receiver, msg_tx, &lobby, &config, shutdown_rx).await;

            // The sender task ends once every queue handle is gone, returning the sink.
            match sender_task.await {
                Ok(mut ws_sender) => {
                    if let Some(frame) = close {
                        let _ = ws_sender.send(Message::Close(Some(frame))).await;
                    }
                    let _ = ws_sender.close().await;
                }
                Err(e) => error!("Sender task for {} failed: {}", addr, e),
            }

            info!("Client {} cleaned up", addr);
        });
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Echo the game's subprotocol back when the client offers it.
fn negotiate_subprotocol(
    request: &Request,
    mut response: Response,
) -> Result<Response, ErrorResponse> {
    let offered = request
        .headers()
        .get_all(SEC_WEBSOCKET_PROTOCOL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|protocol| protocol.trim() == SUBPROTOCOL);

    if offered {
        response
            .headers_mut()
            .insert(SEC_WEBSOCKET_PROTOCOL, HeaderValue::from_static(SUBPROTOCOL));
    }
    Ok(response)
}

/// Write queued messages until the queue closes or the socket fails.
async fn send_loop(mut ws_sender: WsSink, mut msg_rx: mpsc::Receiver<ServerMessage>) -> WsSink {
    while let Some(msg) = msg_rx.recv().await {
        if ws_sender.send(Message::Text(msg.to_text())).await.is_err() {
            break;
        }
    }
    ws_sender
}

fn close_frame(code: CloseCode, reason: impl Into<String>) -> CloseFrame<'static> {
    let reason: String = reason.into();
    CloseFrame {
        code,
        reason: reason.into(),
    }
}

fn protocol_close(err: ProtocolError) -> CloseFrame<'static> {
    close_frame(CloseCode::from(PROTOCOL_ERROR_CLOSE_CODE), err.to_string())
}

/// Next data frame. Control frames are skipped; `None` means the peer is gone.
async fn next_data(ws_receiver: &mut WsSource, addr: SocketAddr) -> Option<Message> {
    loop {
        match ws_receiver.next().await {
            Some(Ok(msg @ (Message::Text(_) | Message::Binary(_)))) => return Some(msg),
            Some(Ok(Message::Close(_))) | None => {
                debug!("Client {} disconnected", addr);
                return None;
            }
            Some(Err(e)) => {
                warn!("WebSocket error for {}: {}", addr, e);
                return None;
            }
            Some(Ok(_)) => {}
        }
    }
}

/// Drive one connection through the handshake and until it closes.
///
/// Returns the close frame to send, if any. `msg_tx` is consumed so the
/// sender task can finish once the lobby lets go of its clone.
async fn run_connection(
    addr: SocketAddr,
    mut ws_receiver: WsSource,
    msg_tx: mpsc::Sender<ServerMessage>,
    lobby: &Mutex<Lobby>,
    config: &ServerConfig,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Option<CloseFrame<'static>> {
    let first_frame = tokio::time::timeout(config.auth_timeout, next_data(&mut ws_receiver, addr));
    let first = match first_frame.await {
        Ok(Some(msg)) => msg,
        Ok(None) => return None,
        Err(_) => {
            info!("Client {} sent no handshake within {:?}", addr, config.auth_timeout);
            return Some(close_frame(CloseCode::Policy, "handshake timeout"));
        }
    };

    let handshake = match first {
        Message::Text(text) => Handshake::parse(&text),
        _ => Err(ProtocolError::BinaryFrame),
    };
    let handshake = match handshake {
        Ok(handshake) => handshake,
        Err(e) => {
            info!("Protocol error from {}: {}", addr, e);
            return Some(protocol_close(e));
        }
    };

    let admission = lobby.lock().await.authenticate(&handshake, msg_tx.clone());
    let connection: ConnectionId = match admission {
        Admission::Rejected(tag) => {
            debug!("Rejecting {} with {:?}", addr, tag.to_text());
            let _ = msg_tx.send(tag).await;
            return Some(close_frame(CloseCode::Normal, ""));
        }
        Admission::Bound {
            connection,
            player,
            binding,
            outbound,
        } => {
            match binding {
                Binding::NewPlayer => debug!("Client {} seated as player {}", addr, player),
                Binding::Reconnected => debug!("Client {} resumed player {}", addr, player),
            }
            Outbound::deliver_all(outbound).await;
            connection
        }
    };
    drop(msg_tx);

    // Nothing further is expected from a bound client.
    let close = tokio::select! {
        msg = next_data(&mut ws_receiver, addr) => match msg {
            Some(Message::Binary(_)) => Some(protocol_close(ProtocolError::BinaryFrame)),
            Some(_) => Some(protocol_close(ProtocolError::UnexpectedMessage)),
            None => None,
        },
        _ = shutdown_rx.recv() => Some(close_frame(CloseCode::Away, "server shutting down")),
    };
    if let Some(frame) = &close {
        info!("Closing {}: {}", addr, frame.reason);
    }

    let remaining = {
        let mut lobby = lobby.lock().await;
        lobby.disconnect(connection);
        lobby.connection_count()
    };
    debug!("{} connection(s) still bound", remaining);
    close
}
