use std::fmt::{Debug, Formatter};
use serde::{Deserialize, Serialize};
use crate::{PlayerId, Role};

/// One face-down influence card. Once revealed it stays revealed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleState {
    pub(crate) role: Role,
    pub(crate) revealed: bool,
}

impl RoleState {
    pub fn new(role: Role) -> Self {
        Self { role, revealed: false }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub(crate) id: PlayerId,
    pub(crate) coins: i32,
    pub(crate) role_states: Vec<RoleState>,
    pub(crate) dead: bool,
}

impl Debug for PlayerInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("P {}: ${} | ", self.id, self.coins))?;
        for role_state in &self.role_states {
            let mark = if role_state.revealed { "^" } else { "" };
            f.write_fmt(format_args!("{:?}{mark} ", role_state.role))?;
        }
        if self.dead {
            f.write_str("(dead)")?;
        }
        Ok(())
    }
}

impl PlayerInfo {
    pub fn new(id: PlayerId, coins: i32, roles: impl IntoIterator<Item=Role>) -> Self {
        Self {
            id,
            coins,
            role_states: roles.into_iter().map(RoleState::new).collect(),
            dead: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn coins(&self) -> i32 {
        self.coins
    }

    pub fn role_states(&self) -> &[RoleState] {
        &self.role_states
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Number of face-down cards left.
    pub fn influence(&self) -> usize {
        self.role_states.iter().filter(|rs| !rs.revealed).count()
    }

    pub fn unrevealed_roles(&self) -> impl Iterator<Item=Role> + '_ {
        self.role_states.iter().filter(|rs| !rs.revealed).map(|rs| rs.role)
    }

    pub fn revealed_roles(&self) -> impl Iterator<Item=Role> + '_ {
        self.role_states.iter().filter(|rs| rs.revealed).map(|rs| rs.role)
    }

    /// First face-down slot holding `role`.
    pub(crate) fn unrevealed_slot_with(&self, role: Role) -> Option<usize> {
        self.role_states.iter().position(|rs| !rs.revealed && rs.role == role)
    }

    /// Flips a slot face up and returns its role. Marks the player dead once nothing is face down.
    pub(crate) fn reveal(&mut self, slot: usize) -> Role {
        let role_state = &mut self.role_states[slot];
        if role_state.revealed {
            panic!("player {} slot {slot} is already revealed", self.id);
        }
        role_state.revealed = true;
        let role = role_state.role;

        if self.influence() == 0 {
            self.dead = true;
        }

        role
    }

    /// Puts `roles` into the face-down slots in order. Extra slots keep their role.
    pub(crate) fn assign_unrevealed(&mut self, roles: &[Role]) {
        let mut roles = roles.iter();
        for role_state in self.role_states.iter_mut().filter(|rs| !rs.revealed) {
            match roles.next() {
                Some(&role) => role_state.role = role,
                None => break,
            }
        }
    }
}

/// What another player's seat looks like from across the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opponent {
    pub id: PlayerId,
    pub coins: i32,
    pub influence: usize,
    pub revealed: Vec<Role>,
    pub dead: bool,
}

/// Read-only snapshot handed to a decision provider: its own hand plus public information about
/// everyone else.
#[derive(Clone, Copy)]
pub struct View<'a> {
    players: &'a [PlayerInfo],
    me: PlayerId,
    deck_size: usize,
}

impl<'a> View<'a> {
    pub(crate) fn new(players: &'a [PlayerInfo], me: PlayerId, deck_size: usize) -> Self {
        Self { players, me, deck_size }
    }

    pub fn id(&self) -> PlayerId {
        self.me
    }

    pub fn me(&self) -> &'a PlayerInfo {
        &self.players[self.me]
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    pub fn opponent(&self, id: PlayerId) -> Option<Opponent> {
        self.players.get(id).filter(|p| p.id != self.me).map(|p| Opponent {
            id: p.id,
            coins: p.coins,
            influence: p.influence(),
            revealed: p.revealed_roles().collect(),
            dead: p.dead,
        })
    }

    pub fn opponents(&self) -> impl Iterator<Item=Opponent> + '_ {
        (0..self.players.len()).filter_map(|id| self.opponent(id))
    }

    pub fn living_opponents(&self) -> impl Iterator<Item=Opponent> + '_ {
        self.opponents().filter(|o| !o.dead)
    }
}

#[cfg(test)]
mod tests {
    use crate::player::{PlayerInfo, View};
    use crate::Role::{Assassin, Captain, Contessa, Duke};

    #[test]
    fn reveal_kills_on_last_card() {
        let mut player = PlayerInfo::new(0, 2, [Duke, Captain]);
        assert_eq!(player.influence(), 2);

        assert_eq!(player.reveal(1), Captain);
        assert!(!player.is_dead());
        assert!(player.role_states()[1].is_revealed());
        assert_eq!(player.unrevealed_slot_with(Captain), None);

        assert_eq!(player.reveal(0), Duke);
        assert!(player.is_dead());
        assert_eq!(player.revealed_roles().collect::<Vec<_>>(), vec![Duke, Captain]);
    }

    #[test]
    #[should_panic]
    fn reveal_twice() {
        let mut player = PlayerInfo::new(0, 2, [Duke, Captain]);
        player.reveal(0);
        player.reveal(0);
    }

    #[test]
    fn assign_skips_revealed_slots() {
        let mut player = PlayerInfo::new(0, 2, [Duke, Captain]);
        player.reveal(0);
        player.assign_unrevealed(&[Contessa]);
        assert_eq!(player.role_states()[0].role(), Duke);
        assert_eq!(player.role_states()[1].role(), Contessa);
    }

    #[test]
    fn view_hides_opponent_hands() {
        let mut players = vec![
            PlayerInfo::new(0, 2, [Duke, Captain]),
            PlayerInfo::new(1, 5, [Assassin, Contessa]),
            PlayerInfo::new(2, 1, [Duke, Duke]),
        ];
        players[1].reveal(0);
        players[2].reveal(0);
        players[2].reveal(1);

        let view = View::new(&players, 0, 11);
        assert_eq!(view.me().coins(), 2);
        assert_eq!(view.deck_size(), 11);
        assert!(view.opponent(0).is_none());

        let opponent = view.opponent(1).unwrap();
        assert_eq!(opponent.coins, 5);
        assert_eq!(opponent.influence, 1);
        assert_eq!(opponent.revealed, vec![Assassin]);

        let living: Vec<usize> = view.living_opponents().map(|o| o.id).collect();
        assert_eq!(living, vec![1]);
    }
}
