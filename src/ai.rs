// random play, used for simulations and to fill seats

use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use crate::action::{Action, ActionType, TURN_ACTIONS};
use crate::game::FORCED_COUP_COINS;
use crate::player::View;
use crate::provider::{DecisionProvider, ExchangeResult};
use crate::Role;

pub struct RandomAi<R: Rng = Pcg64> {
    rng: R,
    challenge_rate: f64,
    block_rate: f64,
}

impl RandomAi<Pcg64> {
    pub fn new(seed: u64) -> Self {
        Self::from_rng(Pcg64::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomAi<R> {
    pub fn from_rng(rng: R) -> Self {
        Self {
            rng,
            challenge_rate: 0.2,
            block_rate: 0.3,
        }
    }

    /// Chance of calling any claim a bluff. Clamped to `0.0..=1.0`, NaN counts as never.
    pub fn with_challenge_rate(mut self, rate: f64) -> Self {
        self.challenge_rate = probability(rate);
        self
    }

    /// Chance of blocking an action aimed at this player. Clamped to `0.0..=1.0`, NaN counts as never.
    pub fn with_block_rate(mut self, rate: f64) -> Self {
        self.block_rate = probability(rate);
        self
    }
}

fn probability(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}

impl<R: Rng> DecisionProvider for RandomAi<R> {
    fn choose_action(&mut self, view: &View<'_>) -> Action {
        let me = view.me();
        let target = view.living_opponents().map(|o| o.id).choose(&mut self.rng);

        if me.coins() >= FORCED_COUP_COINS {
            if let Some(target) = target {
                return Action::targeting(view.id(), ActionType::Coup, target);
            }
        }

        let affordable: Vec<ActionType> = TURN_ACTIONS
            .iter()
            .copied()
            .filter(|kind| me.coins() >= kind.min_coins())
            .filter(|kind| !kind.requires_target() || target.is_some())
            .collect();

        match (affordable.choose(&mut self.rng), target) {
            (Some(&kind), Some(target)) if kind.requires_target() => Action::targeting(view.id(), kind, target),
            (Some(&kind), _) => Action::new(view.id(), kind),
            (None, _) => Action::new(view.id(), ActionType::Income),
        }
    }

    fn respond_to_target(&mut self, view: &View<'_>, incoming: &Action) -> Action {
        if self.rng.gen_bool(self.block_rate) {
            if let Some(&counter) = incoming.kind.counters().choose(&mut self.rng) {
                return Action::targeting(view.id(), counter, incoming.actor);
            }
        }

        Action::pass(view.id())
    }

    fn challenges(&mut self, _view: &View<'_>, _claim: &Action) -> bool {
        self.rng.gen_bool(self.challenge_rate)
    }

    fn choose_reveal_role(&mut self, view: &View<'_>) -> Role {
        match view.me().unrevealed_roles().choose(&mut self.rng) {
            Some(role) => role,
            // nothing face down, any answer is as good as another
            None => Role::Duke,
        }
    }

    fn partition_exchange(&mut self, _view: &View<'_>, candidates: &[Role], keep_count: usize) -> ExchangeResult {
        let mut pool = candidates.to_vec();
        pool.shuffle(&mut self.rng);
        let to_return = pool.split_off(keep_count.min(pool.len()));

        ExchangeResult {
            to_keep: pool,
            to_return,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::ActionType;
    use crate::ai::RandomAi;
    use crate::player::{PlayerInfo, View};
    use crate::provider::DecisionProvider;
    use crate::Role::{Ambassador, Assassin, Captain, Contessa, Duke};

    fn table() -> Vec<PlayerInfo> {
        vec![
            PlayerInfo::new(0, 2, [Duke, Captain]),
            PlayerInfo::new(1, 2, [Assassin, Contessa]),
            PlayerInfo::new(2, 2, [Ambassador, Duke]),
        ]
    }

    #[test]
    fn actions_are_affordable_and_aimed_at_the_living() {
        let mut players = table();
        players[2].reveal(0);
        players[2].reveal(1);

        let mut ai = RandomAi::new(3);
        for _ in 0..200 {
            let action = ai.choose_action(&View::new(&players, 0, 9));
            assert_eq!(action.actor, 0);
            assert!(action.kind != ActionType::Assassinate && action.kind != ActionType::Coup);
            if action.kind.requires_target() {
                assert_eq!(action.target, Some(1));
            } else {
                assert_eq!(action.target, None);
            }
        }
    }

    #[test]
    fn coups_when_rich() {
        let mut players = table();
        players[0].coins = 10;

        let mut ai = RandomAi::new(5);
        for _ in 0..50 {
            let action = ai.choose_action(&View::new(&players, 0, 9));
            assert_eq!(action.kind, ActionType::Coup);
        }
    }

    #[test]
    fn nan_rates_never_fire() {
        let players = table();
        let steal = crate::action::Action::targeting(0, ActionType::Steal, 1);

        let mut ai = RandomAi::new(3).with_challenge_rate(f64::NAN).with_block_rate(f64::NAN);
        for _ in 0..50 {
            assert!(!ai.challenges(&View::new(&players, 1, 9), &steal));
            assert_eq!(ai.respond_to_target(&View::new(&players, 1, 9), &steal).kind, ActionType::Pass);
        }
    }

    #[test]
    fn blocks_are_legal() {
        let players = table();
        let steal = crate::action::Action::targeting(0, ActionType::Steal, 1);

        let mut ai = RandomAi::new(11).with_block_rate(1.0);
        for _ in 0..50 {
            let response = ai.respond_to_target(&View::new(&players, 1, 9), &steal);
            assert!(response.kind.blocks(ActionType::Steal));
            assert_eq!(response.target, Some(0));
        }

        let mut ai = RandomAi::new(11).with_block_rate(0.0).with_challenge_rate(0.0);
        let response = ai.respond_to_target(&View::new(&players, 1, 9), &steal);
        assert_eq!(response.kind, ActionType::Pass);
        assert!(!ai.challenges(&View::new(&players, 1, 9), &steal));
    }

    #[test]
    fn reveals_own_face_down_role() {
        let mut players = table();
        players[1].reveal(0);

        let mut ai = RandomAi::new(2);
        for _ in 0..20 {
            assert_eq!(ai.choose_reveal_role(&View::new(&players, 1, 9)), Contessa);
        }
    }

    #[test]
    fn exchange_partitions_the_pool() {
        let players = table();
        let candidates = [Duke, Captain, Contessa, Assassin];

        let mut ai = RandomAi::new(8);
        let result = ai.partition_exchange(&View::new(&players, 0, 9), &candidates, 2);
        assert!(result.is_partition_of(&candidates, 2));
    }
}
