//! Lobby Session Management
//!
//! Admits connections to the single game this process hosts. The [`Lobby`]
//! owns the game, the join code, and the registry of bound connections;
//! the server keeps it behind one mutex so every admission, seat claim, and
//! disconnect is serialized.
//!
//! The lobby never touches a socket. Each transition returns the messages
//! it produced as [`Outbound`] values, and the caller delivers them after
//! releasing the lock.

use std::collections::BTreeMap;

use rand::Rng;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::core::PlayerId;
use crate::game::Game;
use crate::network::protocol::{Handshake, ServerMessage};
use crate::persist::{PersistenceError, SaveFile};
use crate::redact::{self, Viewer};

/// Length of a generated join code.
pub const JOIN_CODE_LEN: usize = 20;

const JOIN_CODE_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a join code of lowercase base-36 digits.
pub fn generate_join_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..JOIN_CODE_LEN)
        .map(|_| char::from(JOIN_CODE_ALPHABET[rng.gen_range(0..JOIN_CODE_ALPHABET.len())]))
        .collect()
}

/// Handle for a bound connection.
pub type ConnectionId = u64;

/// A message addressed to one connection.
#[derive(Debug)]
pub struct Outbound {
    /// Recipient's outbound queue.
    pub to: mpsc::Sender<ServerMessage>,
    /// Message to send.
    pub message: ServerMessage,
}

impl Outbound {
    /// Queue every message in order. Recipients that have gone away are skipped.
    pub async fn deliver_all(outbound: Vec<Outbound>) {
        for Outbound { to, message } in outbound {
            let _ = to.send(message).await;
        }
    }
}

/// How an accepted connection was bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Claimed a fresh seat.
    NewPlayer,
    /// Returned to a seat claimed earlier.
    Reconnected,
}

/// Result of a handshake.
#[derive(Debug)]
pub enum Admission {
    /// Refused. The tag is sent and the connection closed.
    Rejected(ServerMessage),
    /// Bound to a player.
    Bound {
        /// Registry handle; pass to [`Lobby::disconnect`].
        connection: ConnectionId,
        /// Seat identity
        player: PlayerId,
        /// New seat or reconnect
        binding: Binding,
        /// Messages produced by the admission, for this and other connections
        outbound: Vec<Outbound>,
    },
}

struct Connection {
    player: PlayerId,
    sender: mpsc::Sender<ServerMessage>,
}

/// The game, its join code, and who is connected.
pub struct Lobby {
    game: Game,
    join_code: String,
    save_file: SaveFile,
    connections: BTreeMap<ConnectionId, Connection>,
    next_connection: ConnectionId,
}

impl Lobby {
    /// Lobby hosting `game`, persisted to `save_file`.
    pub fn new(game: Game, join_code: impl Into<String>, save_file: SaveFile) -> Self {
        Self {
            game,
            join_code: join_code.into(),
            save_file,
            connections: BTreeMap::new(),
            next_connection: 0,
        }
    }

    /// The shared secret new and returning players must present.
    pub fn join_code(&self) -> &str {
        &self.join_code
    }

    /// Authoritative game state.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Number of bound connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether `player` has a bound connection.
    pub fn is_connected(&self, player: &PlayerId) -> bool {
        self.connections.values().any(|c| c.player == *player)
    }

    /// Write the canonical state to the save file.
    ///
    /// On a multi-threaded runtime the write runs under `block_in_place`,
    /// so tasks queued on this worker move elsewhere while the disk syncs.
    pub fn save(&self) -> Result<(), PersistenceError> {
        blocking(|| self.save_file.save(&self.game))
    }

    /// Admit or reject a connection that sent `handshake`.
    ///
    /// `sender` is the connection's outbound queue; on success the lobby
    /// keeps a clone for broadcasts until [`Lobby::disconnect`].
    pub fn authenticate(
        &mut self,
        handshake: &Handshake,
        sender: mpsc::Sender<ServerMessage>,
    ) -> Admission {
        if handshake.join_code != self.join_code {
            info!("Rejected {:?}: bad join code", handshake.username);
            return Admission::Rejected(ServerMessage::BadCode);
        }

        if let Some(player) = self.game.player_by_name(&handshake.username).cloned() {
            if self.is_connected(&player) {
                warn!("Rejected {:?}: already connected", handshake.username);
                return Admission::Rejected(ServerMessage::Full);
            }

            let connection = self.bind(player.clone(), sender.clone());
            let mut outbound = vec![Outbound {
                to: sender.clone(),
                message: ServerMessage::Accepted(player.clone()),
            }];
            if self.game.is_full() {
                outbound.push(Outbound {
                    to: sender,
                    message: self.state_for(&player),
                });
            }

            info!("{:?} reconnected as {}", handshake.username, player);
            return Admission::Bound {
                connection,
                player,
                binding: Binding::Reconnected,
                outbound,
            };
        }

        let Some(player) = self.game.seat_player(handshake.username.as_str()) else {
            info!("Rejected {:?}: game is full", handshake.username);
            return Admission::Rejected(ServerMessage::Full);
        };
        let connection = self.bind(player.clone(), sender.clone());
        self.persist();

        let mut outbound = vec![Outbound {
            to: sender,
            message: ServerMessage::Accepted(player.clone()),
        }];
        info!(
            "{:?} joined as {} ({}/{})",
            handshake.username,
            player,
            self.game.player_names().len(),
            self.game.num_players()
        );

        if self.game.is_full() {
            info!("All {} players joined, broadcasting state", self.game.num_players());
            outbound.extend(self.broadcast_state());
        }

        Admission::Bound {
            connection,
            player,
            binding: Binding::NewPlayer,
            outbound,
        }
    }

    /// Forget a connection. The player's seat and name are kept for a later
    /// reconnect. Returns the player it was bound to, or `None` if it was
    /// already gone.
    pub fn disconnect(&mut self, connection: ConnectionId) -> Option<PlayerId> {
        let removed = self.connections.remove(&connection)?;
        info!("{} disconnected", removed.player);
        Some(removed.player)
    }

    /// The current state, redacted separately for every bound connection.
    pub fn broadcast_state(&self) -> Vec<Outbound> {
        self.connections
            .values()
            .map(|c| Outbound {
                to: c.sender.clone(),
                message: self.state_for(&c.player),
            })
            .collect()
    }

    fn state_for(&self, player: &PlayerId) -> ServerMessage {
        ServerMessage::State(redact::view(&self.game, &Viewer::Player(player.clone())))
    }

    fn bind(&mut self, player: PlayerId, sender: mpsc::Sender<ServerMessage>) -> ConnectionId {
        let id = self.next_connection;
        self.next_connection += 1;
        self.connections.insert(id, Connection { player, sender });
        id
    }

    // Save failures leave the in-memory state authoritative; the next save
    // catches up.
    fn persist(&self) {
        if let Err(e) = self.save() {
            error!("Failed to save game to {}: {}", self.save_file.path().display(), e);
        }
    }
}

fn blocking<T>(f: impl FnOnce() -> T) -> T {
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(f)
        }
        _ => f(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Wire;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::path::PathBuf;

    const CODE: &str = "0123456789abcdefghij";

    struct Scratch(PathBuf);

    impl Drop for Scratch {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn create_test_lobby(seats: usize) -> (Lobby, Scratch) {
        let dir = std::env::temp_dir().join(format!("nplanetary-lobby-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let game = Game::setup(seats, &mut StdRng::seed_from_u64(5)).unwrap();
        let lobby = Lobby::new(game, CODE, SaveFile::new(dir.join("game.json")));
        (lobby, Scratch(dir))
    }

    fn hello(username: &str) -> Handshake {
        Handshake {
            username: username.to_owned(),
            join_code: CODE.to_owned(),
        }
    }

    struct Client {
        tx: mpsc::Sender<ServerMessage>,
        rx: mpsc::Receiver<ServerMessage>,
    }

    impl Client {
        fn new() -> Self {
            let (tx, rx) = mpsc::channel(10);
            Client { tx, rx }
        }

        fn drain(&mut self) -> Vec<ServerMessage> {
            let mut messages = Vec::new();
            while let Ok(message) = self.rx.try_recv() {
                messages.push(message);
            }
            messages
        }
    }

    async fn join(
        lobby: &mut Lobby,
        client: &Client,
        username: &str,
    ) -> Option<(ConnectionId, PlayerId, Binding)> {
        match lobby.authenticate(&hello(username), client.tx.clone()) {
            Admission::Bound { connection, player, binding, outbound } => {
                Outbound::deliver_all(outbound).await;
                Some((connection, player, binding))
            }
            Admission::Rejected(tag) => {
                let _ = client.tx.send(tag).await;
                None
            }
        }
    }

    fn is_state(message: &ServerMessage) -> bool {
        matches!(message, ServerMessage::State(_))
    }

    #[test]
    fn test_join_code_alphabet() {
        let code = generate_join_code(&mut StdRng::seed_from_u64(1));
        assert_eq!(code.len(), JOIN_CODE_LEN);
        assert!(code.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert_ne!(code, generate_join_code(&mut StdRng::seed_from_u64(2)));
    }

    #[tokio::test]
    async fn test_bad_code_rejected() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let (tx, _rx) = mpsc::channel(10);
        let handshake = Handshake {
            username: "alice".into(),
            join_code: "wrong".into(),
        };

        let admission = lobby.authenticate(&handshake, tx);
        assert!(matches!(admission, Admission::Rejected(ServerMessage::BadCode)));
        assert!(lobby.game().player_names().is_empty());
        assert_eq!(lobby.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_new_player_acknowledged_and_saved() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let mut alice = Client::new();

        let (_, player, binding) = join(&mut lobby, &alice, "alice").await.unwrap();
        assert_eq!(binding, Binding::NewPlayer);
        assert_eq!(player, lobby.game().player_ids()[0]);
        assert_eq!(alice.drain(), vec![ServerMessage::Accepted(player)]);

        let saved = lobby.save_file.load().unwrap();
        assert_eq!(saved.player_names(), ["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_quorum_gates_broadcast() {
        let (mut lobby, _scratch) = create_test_lobby(3);
        let mut clients: Vec<Client> = (0..3).map(|_| Client::new()).collect();

        for (i, name) in ["alice", "bob"].iter().enumerate() {
            join(&mut lobby, &clients[i], name).await.unwrap();
        }
        for client in &mut clients[..2] {
            assert!(client.drain().iter().all(|m| !is_state(m)));
        }

        let (_, carol_id, _) = join(&mut lobby, &clients[2], "carol").await.unwrap();
        for (i, client) in clients.iter_mut().enumerate() {
            let messages = client.drain();
            let states: Vec<_> = messages.iter().filter(|m| is_state(m)).collect();
            assert_eq!(states.len(), 1, "client {} got {:?}", i, messages);
            if i == 2 {
                assert_eq!(messages[0], ServerMessage::Accepted(carol_id.clone()));
                assert!(is_state(&messages[1]));
            }
        }

        let mut dave = Client::new();
        assert!(join(&mut lobby, &dave, "dave").await.is_none());
        assert_eq!(dave.drain(), vec![ServerMessage::Full]);
        assert_eq!(lobby.game().player_names().len(), 3);
    }

    #[tokio::test]
    async fn test_broadcast_is_redacted_per_viewer() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let mut alice = Client::new();
        let mut bob = Client::new();
        let (_, alice_id, _) = join(&mut lobby, &alice, "alice").await.unwrap();
        join(&mut lobby, &bob, "bob").await.unwrap();

        let expected = redact::view(lobby.game(), &Viewer::Player(alice_id));
        let state = alice.drain().into_iter().find(is_state).unwrap();
        assert_eq!(state, ServerMessage::State(expected));

        let bob_view = bob.drain().into_iter().find(is_state).unwrap();
        let ServerMessage::State(bob_view) = bob_view else { unreachable!() };
        let capital = &bob_view["celestials"][3]["surfaceBases"][0];
        assert_eq!(capital["cargo"]["money"], 0);
        assert_ne!(bob_view, lobby.game().encode());
    }

    #[tokio::test]
    async fn test_reconnect_binds_original_identity() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let alice = Client::new();
        let bob = Client::new();
        let (alice_conn, alice_id, _) = join(&mut lobby, &alice, "alice").await.unwrap();
        join(&mut lobby, &bob, "bob").await.unwrap();

        assert_eq!(lobby.disconnect(alice_conn), Some(alice_id.clone()));
        assert!(!lobby.is_connected(&alice_id));

        let mut again = Client::new();
        let (_, player, binding) = join(&mut lobby, &again, "alice").await.unwrap();
        assert_eq!(player, alice_id);
        assert_eq!(binding, Binding::Reconnected);
        assert_eq!(lobby.game().player_names().len(), 2);

        let messages = again.drain();
        assert_eq!(messages[0], ServerMessage::Accepted(alice_id));
        assert!(is_state(&messages[1]));
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_reconnect_before_quorum_gets_no_state() {
        let (mut lobby, _scratch) = create_test_lobby(3);
        let alice = Client::new();
        let (conn, alice_id, _) = join(&mut lobby, &alice, "alice").await.unwrap();
        lobby.disconnect(conn);

        let mut again = Client::new();
        join(&mut lobby, &again, "alice").await.unwrap();
        assert_eq!(again.drain(), vec![ServerMessage::Accepted(alice_id)]);
    }

    #[tokio::test]
    async fn test_duplicate_live_connection_rejected() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let alice = Client::new();
        join(&mut lobby, &alice, "alice").await.unwrap();

        let mut imposter = Client::new();
        assert!(join(&mut lobby, &imposter, "alice").await.is_none());
        assert_eq!(imposter.drain(), vec![ServerMessage::Full]);
        assert_eq!(lobby.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let alice = Client::new();
        let (conn, _, _) = join(&mut lobby, &alice, "alice").await.unwrap();

        assert!(lobby.disconnect(conn).is_some());
        assert!(lobby.disconnect(conn).is_none());
        assert_eq!(lobby.connection_count(), 0);
        assert_eq!(lobby.game().player_names(), ["alice".to_string()]);
    }

    #[tokio::test]
    async fn test_save_failure_is_not_fatal() {
        let game = Game::setup(2, &mut StdRng::seed_from_u64(5)).unwrap();
        let unwritable = SaveFile::new("/nonexistent-dir/for/nplanetary/game.json");
        let mut lobby = Lobby::new(game, CODE, unwritable);

        let alice = Client::new();
        assert!(join(&mut lobby, &alice, "alice").await.is_some());
        assert_eq!(lobby.game().player_names(), ["alice".to_string()]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_save_on_multi_thread_runtime() {
        let (mut lobby, _scratch) = create_test_lobby(2);
        let alice = Client::new();
        join(&mut lobby, &alice, "alice").await.unwrap();

        lobby.save().unwrap();
        let saved = lobby.save_file.load().unwrap();
        assert_eq!(saved.player_names(), ["alice".to_string()]);
    }
}
