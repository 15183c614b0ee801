//! # NPlanetary Game Server
//!
//! Authoritative server for NPlanetary, a real-time space strategy game on
//! a hex grid. One process hosts one game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    NPLANETARY SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── hex.rs      - Axial hex vectors                         │
//! │  └── id.rs       - Player and entity identifiers             │
//! │                                                              │
//! │  game/           - Entity model                              │
//! │  ├── storage.rs  - Cargo holds and fuel tanks                │
//! │  ├── base.rs     - Bases and outposts                        │
//! │  ├── celestial.rs- Bodies and asteroid clusters              │
//! │  ├── ship.rs     - Ships                                     │
//! │  ├── ordnance.rs - Mines, torpedoes, nukes                   │
//! │  ├── state.rs    - The game aggregate                        │
//! │  └── setup.rs    - New-game generation                       │
//! │                                                              │
//! │  wire/           - JSON codec (validated decode)             │
//! │  redact.rs       - Per-player fog of war                     │
//! │  persist.rs      - Atomic save file                          │
//! │                                                              │
//! │  network/        - Networking                                │
//! │  ├── server.rs   - WebSocket server                          │
//! │  ├── protocol.rs - Handshake and message tags                │
//! │  └── session.rs  - Lobby: join, reconnect, broadcast         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Information hiding
//!
//! The canonical [`Game`] is never sent to a client. Every broadcast goes
//! through [`redact::Redactor`] for the receiving player; only the save file
//! holds the unfiltered encoding.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;
pub mod network;
pub mod persist;
pub mod redact;
pub mod wire;

// Re-export commonly used types
pub use config::ServerConfig;
pub use crate::core::{EntityId, HexVector, PlayerId};
pub use game::{Game, MAX_PLAYERS, MIN_PLAYERS};
pub use network::{GameServer, GameServerError};
pub use persist::{PersistenceError, SaveFile};
pub use redact::{Redactor, Viewer};
pub use wire::{DecodeError, Wire};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
