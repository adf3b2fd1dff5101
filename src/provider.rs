use serde::{Deserialize, Serialize};
use crate::action::Action;
use crate::player::View;
use crate::{PlayerId, Role};

/// The kind of question the engine is asking a player. Used to report stalls.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    Action,
    Response,
    Reveal,
    Exchange,
}

/// How a player splits the exchange pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    pub to_keep: Vec<Role>,
    pub to_return: Vec<Role>,
}

impl ExchangeResult {
    pub fn keep_role(mut self, role: Role) -> Self {
        self.to_keep.push(role);
        self
    }

    pub fn return_role(mut self, role: Role) -> Self {
        self.to_return.push(role);
        self
    }

    /// True when exactly `keep_count` roles are kept and kept + returned is the same multiset as
    /// `candidates`.
    pub fn is_partition_of(&self, candidates: &[Role], keep_count: usize) -> bool {
        if self.to_keep.len() != keep_count {
            return false;
        }

        let mut offered = candidates.to_vec();
        let mut split: Vec<Role> = self.to_keep.iter().chain(&self.to_return).copied().collect();
        offered.sort();
        split.sort();
        offered == split
    }
}

/// A seat's strategy. The engine calls these one at a time and waits for each answer; invalid
/// answers are simply asked for again.
pub trait DecisionProvider {
    /// Declare an action for this turn.
    fn choose_action(&mut self, view: &View<'_>) -> Action;

    /// `incoming` targets this player: answer with a pass or a block.
    fn respond_to_target(&mut self, view: &View<'_>, incoming: &Action) -> Action;

    /// Whether to challenge `claim`, made by `claim.actor`.
    fn challenges(&mut self, view: &View<'_>, claim: &Action) -> bool;

    /// Must name one of this player's face-down roles.
    fn choose_reveal_role(&mut self, view: &View<'_>) -> Role;

    fn partition_exchange(&mut self, view: &View<'_>, candidates: &[Role], keep_count: usize) -> ExchangeResult;

    fn on_roles_changed(&mut self, _view: &View<'_>) {}

    fn on_action_broadcast(&mut self, _action: &Action) {}

    fn on_role_revealed(&mut self, _player: PlayerId, _role: Role) {}
}
