pub mod action;
pub mod ai;
pub mod deck;
pub mod game;
pub mod history;
pub mod player;
pub mod provider;
pub mod scripted;

pub use action::{Action, ActionResult, ActionType};
pub use ai::RandomAi;
pub use deck::Deck;
pub use game::Game;
pub use history::GameEvent;
pub use player::{Opponent, PlayerInfo, RoleState, View};
pub use provider::{Decision, DecisionProvider, ExchangeResult};
pub use scripted::{Journal, Notifications, ScriptedPlayer};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::Role::{Ambassador, Assassin, Captain, Contessa, Duke};

/// Stable seat number, `0..num_players`, assigned at construction.
pub type PlayerId = usize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
}

pub static ROLE_VARIANTS: [Role; 5] = [
    Duke,
    Assassin,
    Captain,
    Ambassador,
    Contessa,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoupError {
    #[error("a game needs at least 2 players, {requested} requested")]
    InvalidPlayerCount { requested: usize },
    #[error("{players} players but {providers} decision providers")]
    ProviderCountMismatch { players: usize, providers: usize },
    #[error("hand size must be at least 1")]
    InvalidHandSize,
    #[error("dealing needs {needed} cards but the deck only holds {available}")]
    DeckTooSmall { needed: usize, available: usize },
    #[error("player {player} gave {attempts} invalid answers in a row to a {decision:?} request")]
    Stalled { player: PlayerId, decision: Decision, attempts: usize },
}

/// Table settings for one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub num_players: usize,
    pub starting_coins: i32,
    pub hand_size: usize,
    // deterministic shuffles when set
    pub seed: Option<u64>,
    // None means a provider is asked again until it answers validly
    pub max_decision_retries: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 3,
            starting_coins: 2,
            hand_size: 2,
            seed: None,
            max_decision_retries: None,
        }
    }
}

impl GameConfig {
    pub fn new(num_players: usize) -> Self {
        Self {
            num_players,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_retry_cap(mut self, cap: usize) -> Self {
        self.max_decision_retries = Some(cap);
        self
    }

    /// Copies of each role shuffled into the deck: `max(3, num_players / 2)`.
    pub fn copies_per_role(&self) -> usize {
        (self.num_players / 2).max(3)
    }

    pub fn total_cards(&self) -> usize {
        self.copies_per_role() * ROLE_VARIANTS.len()
    }
}
