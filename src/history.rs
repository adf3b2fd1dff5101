use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use crate::action::{Action, ActionType};
use crate::{PlayerId, Role};

/// Public record of what happened at the table, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Declared { turn: usize, action: Action },
    Challenged { challenger: PlayerId, claimant: PlayerId, role: Role, claim_held: bool },
    Countered { response: Action },
    Resolved { action: Action },
    Revealed { player: PlayerId, role: Role },
    Eliminated { player: PlayerId },
    Exchanged { player: PlayerId, drawn: usize, returned: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interaction {
    Targeted(ActionType),
    Challenged,
    Blocked,
}

/// Order in which players were knocked out.
pub fn eliminations(events: &[GameEvent]) -> Vec<PlayerId> {
    events.iter()
        .filter_map(|event| match event {
            GameEvent::Eliminated { player } => Some(*player),
            _ => None,
        })
        .collect()
}

/// Who went after whom. One node per seat (node index == player id), one edge per targeted
/// declaration, challenge or block.
pub fn interaction_graph(events: &[GameEvent], num_players: usize) -> DiGraph<PlayerId, Interaction> {
    let mut graph = DiGraph::with_capacity(num_players, events.len());
    for player_idx in 0..num_players {
        graph.add_node(player_idx);
    }

    for event in events {
        match event {
            GameEvent::Declared { action, .. } => {
                if let Some(target) = action.target {
                    graph.add_edge(NodeIndex::new(action.actor), NodeIndex::new(target), Interaction::Targeted(action.kind));
                }
            }
            GameEvent::Challenged { challenger, claimant, .. } => {
                graph.add_edge(NodeIndex::new(*challenger), NodeIndex::new(*claimant), Interaction::Challenged);
            }
            GameEvent::Countered { response } => {
                if let Some(blocked) = response.target {
                    graph.add_edge(NodeIndex::new(response.actor), NodeIndex::new(blocked), Interaction::Blocked);
                }
            }
            _ => {}
        }
    }

    graph
}
