use std::fmt::{Debug, Formatter};
use serde::{Deserialize, Serialize};
use crate::{PlayerId, Role};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Income,
    ForeignAid,
    Tax,
    Steal,
    Assassinate,
    Coup,
    Exchange,

    // responses to a targeted claim
    Pass,
    BlockWithContessa,
    BlockWithCaptain,
    BlockWithAmbassador,
}

/// Types a player may declare on their own turn.
pub static TURN_ACTIONS: [ActionType; 7] = [
    ActionType::Income,
    ActionType::ForeignAid,
    ActionType::Tax,
    ActionType::Steal,
    ActionType::Assassinate,
    ActionType::Coup,
    ActionType::Exchange,
];

impl ActionType {
    /// The role claimed by declaring this type. `None` means nothing is claimed and it can't be
    /// challenged.
    pub fn required_role(self) -> Option<Role> {
        match self {
            ActionType::Tax => Some(Role::Duke),
            ActionType::Steal => Some(Role::Captain),
            ActionType::Assassinate => Some(Role::Assassin),
            ActionType::Exchange => Some(Role::Ambassador),
            ActionType::BlockWithContessa => Some(Role::Contessa),
            ActionType::BlockWithCaptain => Some(Role::Captain),
            ActionType::BlockWithAmbassador => Some(Role::Ambassador),
            ActionType::Income | ActionType::ForeignAid | ActionType::Coup | ActionType::Pass => None,
        }
    }

    pub fn requires_target(self) -> bool {
        matches!(self, ActionType::Steal | ActionType::Assassinate | ActionType::Coup)
    }

    /// Coins paid by the actor when the effect is applied.
    pub fn coin_cost(self) -> i32 {
        match self {
            ActionType::Assassinate => 3,
            ActionType::Coup => 7,
            _ => 0,
        }
    }

    /// Coins the actor needs before the type may be declared.
    pub fn min_coins(self) -> i32 {
        self.coin_cost()
    }

    pub fn is_response(self) -> bool {
        !TURN_ACTIONS.contains(&self)
    }

    pub fn counters(self) -> &'static [ActionType] {
        match self {
            ActionType::Assassinate => &[ActionType::BlockWithContessa],
            ActionType::Steal => &[ActionType::BlockWithCaptain, ActionType::BlockWithAmbassador],
            _ => &[],
        }
    }

    pub fn blocks(self, incoming: ActionType) -> bool {
        incoming.counters().contains(&self)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionResult {
    Pending,
    SucceededWithoutChallenge,
    SucceededWithChallenge,
    FailedByChallenge,
    FailedByCounter,
}

impl ActionResult {
    pub fn has_failed(self) -> bool {
        matches!(self, ActionResult::FailedByChallenge | ActionResult::FailedByCounter)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub actor: PlayerId,
    pub kind: ActionType,
    pub target: Option<PlayerId>,
    pub result: ActionResult,
}

impl Action {
    pub fn new(actor: PlayerId, kind: ActionType) -> Self {
        Self {
            actor,
            kind,
            target: None,
            result: ActionResult::Pending,
        }
    }

    pub fn targeting(actor: PlayerId, kind: ActionType, target: PlayerId) -> Self {
        Self {
            target: Some(target),
            ..Self::new(actor, kind)
        }
    }

    pub fn pass(actor: PlayerId) -> Self {
        Self::new(actor, ActionType::Pass)
    }

    pub fn has_failed(&self) -> bool {
        self.result.has_failed()
    }

    pub fn claimed_role(&self) -> Option<Role> {
        self.kind.required_role()
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let player_idx = self.actor;
        let target_player_idx = self.target.map_or_else(|| "nobody".to_string(), |t| t.to_string());

        match self.kind {
            ActionType::Income => {
                f.write_fmt(format_args!("Player {player_idx} takes Income"))?
            }
            ActionType::ForeignAid => {
                f.write_fmt(format_args!("Player {player_idx} gets foreign aid"))?
            }
            ActionType::Tax => {
                f.write_fmt(format_args!("Player {player_idx} gets Taxes"))?
            }
            ActionType::Steal => {
                f.write_fmt(format_args!("Player {player_idx} steals from {target_player_idx}"))?
            }
            ActionType::Assassinate => {
                f.write_fmt(format_args!("Player {player_idx} assassinates {target_player_idx}"))?
            }
            ActionType::Coup => {
                f.write_fmt(format_args!("Player {player_idx} coups {target_player_idx}"))?
            }
            ActionType::Exchange => {
                f.write_fmt(format_args!("Player {player_idx} exchanges"))?
            }
            ActionType::Pass => {
                f.write_fmt(format_args!("Player {player_idx} lets it happen"))?
            }
            ActionType::BlockWithContessa => {
                f.write_fmt(format_args!("Player {player_idx} blocks {target_player_idx} with Contessa"))?
            }
            ActionType::BlockWithCaptain => {
                f.write_fmt(format_args!("Player {player_idx} blocks {target_player_idx} with Captain"))?
            }
            ActionType::BlockWithAmbassador => {
                f.write_fmt(format_args!("Player {player_idx} blocks {target_player_idx} with Ambassador"))?
            }
        }

        if self.result != ActionResult::Pending {
            f.write_fmt(format_args!(" ({:?})", self.result))?;
        }
        Ok(())
    }
}
