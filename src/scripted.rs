use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use crate::action::{Action, ActionType};
use crate::game::FORCED_COUP_COINS;
use crate::player::View;
use crate::provider::{DecisionProvider, ExchangeResult};
use crate::{PlayerId, Role};

/// Everything a seat was told by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Notifications {
    pub actions: Vec<Action>,
    pub reveals: Vec<(PlayerId, Role)>,
    pub roles_changed: usize,
}

/// Shared handle on a [`ScriptedPlayer`]'s notifications, readable after the game has taken
/// ownership of the player.
pub type Journal = Rc<RefCell<Notifications>>;

/// Plays back queued answers in order. Once a queue runs dry it falls back to income (or a coup
/// when forced), passing, never challenging, revealing its first face-down role and keeping the
/// first cards offered in an exchange.
#[derive(Default)]
pub struct ScriptedPlayer {
    actions: VecDeque<Action>,
    responses: VecDeque<Action>,
    challenges: VecDeque<bool>,
    reveals: VecDeque<Role>,
    exchanges: VecDeque<ExchangeResult>,
    journal: Journal,
}

impl ScriptedPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn act(mut self, action: Action) -> Self {
        self.actions.push_back(action);
        self
    }

    pub fn respond(mut self, response: Action) -> Self {
        self.responses.push_back(response);
        self
    }

    pub fn challenge(mut self, challenge: bool) -> Self {
        self.challenges.push_back(challenge);
        self
    }

    pub fn reveal(mut self, role: Role) -> Self {
        self.reveals.push_back(role);
        self
    }

    pub fn exchange(mut self, result: ExchangeResult) -> Self {
        self.exchanges.push_back(result);
        self
    }

    pub fn journal(&self) -> Journal {
        Rc::clone(&self.journal)
    }
}

impl DecisionProvider for ScriptedPlayer {
    fn choose_action(&mut self, view: &View<'_>) -> Action {
        if let Some(action) = self.actions.pop_front() {
            return action;
        }

        if view.me().coins() >= FORCED_COUP_COINS {
            if let Some(target) = view.living_opponents().next() {
                return Action::targeting(view.id(), ActionType::Coup, target.id);
            }
        }

        Action::new(view.id(), ActionType::Income)
    }

    fn respond_to_target(&mut self, view: &View<'_>, _incoming: &Action) -> Action {
        self.responses.pop_front().unwrap_or_else(|| Action::pass(view.id()))
    }

    fn challenges(&mut self, _view: &View<'_>, _claim: &Action) -> bool {
        self.challenges.pop_front().unwrap_or(false)
    }

    fn choose_reveal_role(&mut self, view: &View<'_>) -> Role {
        if let Some(role) = self.reveals.pop_front() {
            return role;
        }

        // nothing face down, any answer is as good as another
        view.me().unrevealed_roles().next().unwrap_or(Role::Duke)
    }

    fn partition_exchange(&mut self, _view: &View<'_>, candidates: &[Role], keep_count: usize) -> ExchangeResult {
        if let Some(result) = self.exchanges.pop_front() {
            return result;
        }

        let (keep, give_back) = candidates.split_at(keep_count.min(candidates.len()));
        ExchangeResult {
            to_keep: keep.to_vec(),
            to_return: give_back.to_vec(),
        }
    }

    fn on_roles_changed(&mut self, _view: &View<'_>) {
        self.journal.borrow_mut().roles_changed += 1;
    }

    fn on_action_broadcast(&mut self, action: &Action) {
        self.journal.borrow_mut().actions.push(action.clone());
    }

    fn on_role_revealed(&mut self, player: PlayerId, role: Role) {
        self.journal.borrow_mut().reveals.push((player, role));
    }
}

#[cfg(test)]
mod tests {
    use crate::action::{Action, ActionType};
    use crate::player::{PlayerInfo, View};
    use crate::provider::DecisionProvider;
    use crate::scripted::ScriptedPlayer;
    use crate::Role::{Assassin, Captain, Contessa, Duke};

    #[test]
    fn plays_back_then_defaults() {
        let players = vec![
            PlayerInfo::new(0, 2, [Duke, Captain]),
            PlayerInfo::new(1, 2, [Assassin, Contessa]),
        ];
        let view = View::new(&players, 0, 11);

        let mut player = ScriptedPlayer::new()
            .act(Action::new(0, ActionType::Tax))
            .challenge(true)
            .reveal(Captain);

        assert_eq!(player.choose_action(&view).kind, ActionType::Tax);
        assert_eq!(player.choose_action(&view).kind, ActionType::Income);
        assert!(player.challenges(&view, &Action::new(1, ActionType::Tax)));
        assert!(!player.challenges(&view, &Action::new(1, ActionType::Tax)));
        assert_eq!(player.choose_reveal_role(&view), Captain);
        assert_eq!(player.choose_reveal_role(&view), Duke);

        let exchange = player.partition_exchange(&view, &[Contessa, Assassin, Duke, Captain], 2);
        assert_eq!(exchange.to_keep, vec![Contessa, Assassin]);
        assert_eq!(exchange.to_return, vec![Duke, Captain]);
    }

    #[test]
    fn reveal_with_nothing_face_down() {
        let mut players = vec![
            PlayerInfo::new(0, 2, [Duke, Captain]),
            PlayerInfo::new(1, 2, [Assassin, Contessa]),
        ];
        players[0].reveal(0);
        players[0].reveal(1);

        let mut player = ScriptedPlayer::new();
        assert_eq!(player.choose_reveal_role(&View::new(&players, 0, 11)), Duke);
    }

    #[test]
    fn journal_outlives_ownership() {
        let player = ScriptedPlayer::new();
        let journal = player.journal();

        let mut boxed: Box<dyn DecisionProvider> = Box::new(player);
        boxed.on_action_broadcast(&Action::new(1, ActionType::Income));
        boxed.on_role_revealed(1, Duke);

        assert_eq!(journal.borrow().actions.len(), 1);
        assert_eq!(journal.borrow().reveals, vec![(1, Duke)]);
    }
}
