use std::fmt::{Debug, Formatter};
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{Action, ActionResult, ActionType};
use crate::ai::RandomAi;
use crate::deck::Deck;
use crate::history::GameEvent;
use crate::player::{PlayerInfo, View};
use crate::provider::{Decision, DecisionProvider};
use crate::{CoupError, GameConfig, PlayerId, Role};

/// At this many coins the only legal declaration is a coup.
pub const FORCED_COUP_COINS: i32 = 10;

/// Cards an exchange draws from the deck.
pub const EXCHANGE_DRAW: usize = 2;

pub struct Game {
    config: GameConfig,
    turn: usize,
    current_player_idx: usize,
    deck: Deck,
    players: Vec<PlayerInfo>,
    providers: Vec<Box<dyn DecisionProvider>>,
    rng: Pcg64,
    history: Vec<GameEvent>,
    total_cards: usize,
}

impl Debug for Game {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("T {} | P {} | deck {}\n", self.turn, self.current_player_idx, self.deck.len()).as_str())?;
        for player in &self.players {
            f.write_str(format!("\t{:?}\n", player).as_str())?;
        }
        Ok(())
    }
}

impl Game {
    /// Builds the deck, deals every seat and hands seat `i` to `providers[i]`.
    pub fn new(config: GameConfig, providers: Vec<Box<dyn DecisionProvider>>) -> Result<Self, CoupError> {
        let rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        Self::build(config, providers, rng)
    }

    /// A table where every seat is played by [`RandomAi`].
    pub fn with_random_players(config: GameConfig) -> Result<Self, CoupError> {
        let mut rng = match config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };

        let providers = (0..config.num_players)
            .map(|_| Box::new(RandomAi::new(rng.gen())) as Box<dyn DecisionProvider>)
            .collect();

        Self::build(config, providers, rng)
    }

    fn build(config: GameConfig, providers: Vec<Box<dyn DecisionProvider>>, mut rng: Pcg64) -> Result<Self, CoupError> {
        if config.num_players < 2 {
            return Err(CoupError::InvalidPlayerCount { requested: config.num_players });
        }
        if providers.len() != config.num_players {
            return Err(CoupError::ProviderCountMismatch { players: config.num_players, providers: providers.len() });
        }
        if config.hand_size == 0 {
            return Err(CoupError::InvalidHandSize);
        }

        let total_cards = config.total_cards();
        let needed = config.num_players * config.hand_size;
        if needed > total_cards {
            return Err(CoupError::DeckTooSmall { needed, available: total_cards });
        }

        let mut deck = Deck::new(config.copies_per_role(), &mut rng);

        let players = (0..config.num_players)
            .map(|player_idx| PlayerInfo::new(player_idx, config.starting_coins, deck.draw_up_to(config.hand_size)))
            .collect();

        info!("New game: {} players, {} cards in play", config.num_players, total_cards);

        Ok(Self {
            config,
            turn: 0,
            current_player_idx: 0,
            deck,
            players,
            providers,
            rng,
            history: Vec::new(),
            total_cards,
        })
    }

    pub fn turn(&self) -> usize {
        self.turn
    }

    pub fn current_player(&self) -> PlayerId {
        self.current_player_idx
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    pub fn player(&self, player_idx: PlayerId) -> Option<&PlayerInfo> {
        self.players.get(player_idx)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn history(&self) -> &[GameEvent] {
        &self.history
    }

    /// Cards dealt plus cards in the deck. Never changes during a game.
    pub fn total_cards(&self) -> usize {
        self.total_cards
    }

    pub fn is_over(&self) -> bool {
        self.players.iter().filter(|p| !p.dead).count() == 1
    }

    pub fn winner(&self) -> Option<PlayerId> {
        if self.is_over() {
            self.players.iter().find(|p| !p.dead).map(|p| p.id)
        } else {
            None
        }
    }

    /// Plays one seat's turn and moves on to the next seat. Returns true once a single player is
    /// left standing.
    pub fn advance_turn(&mut self) -> Result<bool, CoupError> {
        if self.is_over() {
            return Ok(true);
        }

        let actor_idx = self.current_player_idx;
        if !self.players[actor_idx].dead {
            trace!("{:?}", self);
            self.play_turn(actor_idx)?;
        }

        self.current_player_idx = (self.current_player_idx + 1) % self.players.len();
        self.turn += 1;

        self.check_invariants();

        match self.winner() {
            Some(winner) => {
                info!("Player {winner} wins after {} turns", self.turn);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Steps until somebody wins or `max_turns` seats have been played.
    pub fn play_to_end(&mut self, max_turns: Option<usize>) -> Result<Option<PlayerId>, CoupError> {
        while !self.advance_turn()? {
            if max_turns.is_some_and(|max| self.turn >= max) {
                info!("Stopping after {} turns without a winner", self.turn);
                return Ok(None);
            }
        }

        Ok(self.winner())
    }

    /// Coin rules for a declaration. Targets and response-only types are checked separately.
    pub fn validate_action(&self, player_idx: PlayerId, action: &Action) -> bool {
        let coins = self.players[player_idx].coins;

        if coins >= FORCED_COUP_COINS && action.kind != ActionType::Coup {
            return false;
        }

        match action.kind {
            ActionType::Assassinate | ActionType::Coup => coins >= action.kind.min_coins(),
            _ => true,
        }
    }

    fn is_well_formed(&self, player_idx: PlayerId, action: &Action) -> bool {
        if action.actor != player_idx || action.kind.is_response() {
            return false;
        }

        match action.target {
            Some(target_idx) => {
                action.kind.requires_target()
                    && target_idx != player_idx
                    && self.players.get(target_idx).is_some_and(|target| !target.dead)
            }
            None => !action.kind.requires_target(),
        }
    }

    fn play_turn(&mut self, actor_idx: PlayerId) -> Result<(), CoupError> {
        let mut action = self.acquire_action(actor_idx)?;

        info!("{:?}, claiming {:?}", action, action.claimed_role());
        self.history.push(GameEvent::Declared { turn: self.turn, action: action.clone() });

        if let Some(role) = action.claimed_role() {
            action.result = self.resolve_challenge(&action, role)?;

            if !action.has_failed() {
                // the target may have lost their last card challenging the claim
                if let Some(target_idx) = action.target.filter(|&t| !self.players[t].dead) {
                    let mut response = self.acquire_response(target_idx, &action)?;

                    if let Some(counter_role) = response.claimed_role() {
                        info!("{:?}", response);
                        response.result = self.resolve_challenge(&response, counter_role)?;

                        if !response.has_failed() {
                            action.result = ActionResult::FailedByCounter;
                        }

                        self.history.push(GameEvent::Countered { response: response.clone() });
                        self.broadcast_action(&response);
                    }
                }
            }
        }

        if action.result == ActionResult::Pending {
            action.result = ActionResult::SucceededWithoutChallenge;
        }

        self.history.push(GameEvent::Resolved { action: action.clone() });
        self.broadcast_action(&action);

        if !action.has_failed() {
            self.apply_effect(&action)?;
        }

        Ok(())
    }

    /// Asks `ask` until it produces an answer. Unbounded unless the config sets a retry cap.
    fn request_until_valid<T>(
        &mut self,
        player_idx: PlayerId,
        decision: Decision,
        mut ask: impl FnMut(&mut Self) -> Option<T>,
    ) -> Result<T, CoupError> {
        let mut attempts = 0;
        loop {
            if let Some(answer) = ask(self) {
                return Ok(answer);
            }

            attempts += 1;
            debug!("Player {player_idx} gave an invalid {decision:?} answer ({attempts} so far)");

            if self.config.max_decision_retries.is_some_and(|cap| attempts >= cap) {
                return Err(CoupError::Stalled { player: player_idx, decision, attempts });
            }
        }
    }

    fn acquire_action(&mut self, actor_idx: PlayerId) -> Result<Action, CoupError> {
        self.request_until_valid(actor_idx, Decision::Action, |game| {
            let view = View::new(&game.players, actor_idx, game.deck.len());
            let mut action = game.providers[actor_idx].choose_action(&view);

            if game.validate_action(actor_idx, &action) && game.is_well_formed(actor_idx, &action) {
                action.result = ActionResult::Pending;
                Some(action)
            } else {
                None
            }
        })
    }

    fn acquire_response(&mut self, target_idx: PlayerId, incoming: &Action) -> Result<Action, CoupError> {
        self.request_until_valid(target_idx, Decision::Response, |game| {
            let view = View::new(&game.players, target_idx, game.deck.len());
            let mut response = game.providers[target_idx].respond_to_target(&view, incoming);

            let legal = response.kind == ActionType::Pass || response.kind.blocks(incoming.kind);
            if response.actor != target_idx || !legal {
                return None;
            }

            response.target = Some(incoming.actor);
            response.result = ActionResult::Pending;
            Some(response)
        })
    }

    /// Offers every other living player, lowest id first, the chance to call `claim` a bluff.
    /// Only the first challenger is heard.
    fn resolve_challenge(&mut self, claim: &Action, role: Role) -> Result<ActionResult, CoupError> {
        let claimant_idx = claim.actor;

        for challenger_idx in 0..self.players.len() {
            if challenger_idx == claimant_idx || self.players[challenger_idx].dead {
                continue;
            }

            let view = View::new(&self.players, challenger_idx, self.deck.len());
            if !self.providers[challenger_idx].challenges(&view, claim) {
                continue;
            }

            info!("Player {challenger_idx} challenges player {claimant_idx} claim of {role:?}");
            let proof_slot = self.players[claimant_idx].unrevealed_slot_with(role);
            self.history.push(GameEvent::Challenged {
                challenger: challenger_idx,
                claimant: claimant_idx,
                role,
                claim_held: proof_slot.is_some(),
            });

            return match proof_slot {
                Some(slot) => {
                    info!("Player {challenger_idx} loses the challenge");
                    self.replace_role(claimant_idx, slot);
                    self.force_reveal(challenger_idx)?;
                    Ok(ActionResult::SucceededWithChallenge)
                }
                None => {
                    info!("Player {claimant_idx} loses the challenge");
                    self.force_reveal(claimant_idx)?;
                    Ok(ActionResult::FailedByChallenge)
                }
            };
        }

        debug!("No challenge");
        Ok(ActionResult::SucceededWithoutChallenge)
    }

    /// Shuffles a proven role back into the deck and deals the claimant a fresh card in its place.
    fn replace_role(&mut self, player_idx: PlayerId, slot: usize) {
        let proven = self.players[player_idx].role_states[slot].role;
        self.deck.insert_and_shuffle(proven, &mut self.rng);

        let replacement = self.deck.draw().expect("deck can't be empty right after a card was shuffled in");
        self.players[player_idx].role_states[slot].role = replacement;

        let view = View::new(&self.players, player_idx, self.deck.len());
        self.providers[player_idx].on_roles_changed(&view);
    }

    fn force_reveal(&mut self, player_idx: PlayerId) -> Result<(), CoupError> {
        if self.players[player_idx].influence() == 0 {
            panic!("player {player_idx} has no face-down role left to reveal");
        }

        let slot = self.request_until_valid(player_idx, Decision::Reveal, |game| {
            let view = View::new(&game.players, player_idx, game.deck.len());
            let role = game.providers[player_idx].choose_reveal_role(&view);
            game.players[player_idx].unrevealed_slot_with(role)
        })?;

        let role = self.players[player_idx].reveal(slot);
        info!("Player {player_idx} reveals role {role:?}");
        self.history.push(GameEvent::Revealed { player: player_idx, role });

        if self.players[player_idx].dead {
            info!("Player {player_idx} is dead");
            self.history.push(GameEvent::Eliminated { player: player_idx });
        }

        for provider in self.providers.iter_mut() {
            provider.on_role_revealed(player_idx, role);
        }

        Ok(())
    }

    fn broadcast_action(&mut self, action: &Action) {
        for provider in self.providers.iter_mut() {
            provider.on_action_broadcast(action);
        }
    }

    fn apply_effect(&mut self, action: &Action) -> Result<(), CoupError> {
        let actor_idx = action.actor;

        match action.kind {
            ActionType::Income => {
                self.players[actor_idx].coins += 1;
            }
            ActionType::ForeignAid => {
                self.players[actor_idx].coins += 2;
            }
            ActionType::Tax => {
                self.players[actor_idx].coins += 3;
            }
            ActionType::Steal => {
                // no floor, a poor target goes negative
                let target_idx = target_of(action);
                self.players[target_idx].coins -= 2;
                self.players[actor_idx].coins += 2;
            }
            ActionType::Assassinate | ActionType::Coup => {
                self.players[actor_idx].coins -= action.kind.coin_cost();

                let target_idx = target_of(action);
                // target could already be dead from losing a challenge
                if !self.players[target_idx].dead {
                    self.force_reveal(target_idx)?;
                }
            }
            ActionType::Exchange => {
                self.exchange(actor_idx)?;
            }
            ActionType::Pass
            | ActionType::BlockWithContessa
            | ActionType::BlockWithCaptain
            | ActionType::BlockWithAmbassador => unreachable!("{:?} is a response, not a turn action", action),
        }

        Ok(())
    }

    fn exchange(&mut self, actor_idx: PlayerId) -> Result<(), CoupError> {
        let mut candidates = self.deck.draw_up_to(EXCHANGE_DRAW);
        let drawn = candidates.len();
        candidates.extend(self.players[actor_idx].unrevealed_roles());
        let keep_count = self.players[actor_idx].influence();

        let partition = self.request_until_valid(actor_idx, Decision::Exchange, |game| {
            let view = View::new(&game.players, actor_idx, game.deck.len());
            let result = game.providers[actor_idx].partition_exchange(&view, &candidates, keep_count);
            result.is_partition_of(&candidates, keep_count).then_some(result)
        });

        let partition = match partition {
            Ok(partition) => partition,
            Err(err) => {
                // put the drawn cards back so the table stays whole
                for &role in &candidates[..drawn] {
                    self.deck.return_to_bottom(role);
                }
                return Err(err);
            }
        };

        self.players[actor_idx].assign_unrevealed(&partition.to_keep);
        let view = View::new(&self.players, actor_idx, self.deck.len());
        self.providers[actor_idx].on_roles_changed(&view);

        for &role in &partition.to_return {
            self.deck.return_to_bottom(role);
        }

        debug!("Player {actor_idx} keeps {:?} and returns {:?}", partition.to_keep, partition.to_return);
        self.history.push(GameEvent::Exchanged { player: actor_idx, drawn, returned: partition.to_return.len() });

        Ok(())
    }

    /// Panics if the table is in a state the rules can't produce.
    fn check_invariants(&self) {
        let in_hands: usize = self.players.iter().map(|p| p.role_states.len()).sum();
        assert_eq!(self.deck.len() + in_hands, self.total_cards, "role cards were created or destroyed");

        for player in &self.players {
            assert_eq!(player.role_states.len(), self.config.hand_size, "player {} hand changed size", player.id);
            assert_eq!(player.dead, player.influence() == 0, "player {} death flag out of sync", player.id);
        }

        assert!(self.players.iter().any(|p| !p.dead), "no player is left alive");
    }
}

fn target_of(action: &Action) -> PlayerId {
    match action.target {
        Some(target_idx) => target_idx,
        None => unreachable!("{:?} was accepted without a target", action),
    }
}
