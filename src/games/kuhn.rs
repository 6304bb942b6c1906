//! Kuhn Poker implementation for solver validation.
//!
//! Kuhn Poker is a simplified poker game used to validate CFR
//! implementations because it has a known, mathematically proven Nash
//! equilibrium.
//!
//! ## Game Rules
//!
//! - 3 cards: Jack (0), Queen (1), King (2)
//! - 2 players, each antes 1 chip
//! - Each player receives 1 card
//! - Player 1 acts first: Pass or Bet (1 chip)
//! - Player 2 responds based on P1's action
//! - Higher card wins at showdown
//!
//! ## Game Tree
//!
//! ```text
//! P1 (first to act)
//! ├── Pass
//! │   └── P2
//! │       ├── Pass → Showdown (pot = 2)
//! │       └── Bet
//! │           └── P1
//! │               ├── Pass → P2 wins (pot = 3)
//! │               └── Bet → Showdown (pot = 4)
//! └── Bet
//!     └── P2
//!         ├── Pass → P1 wins (pot = 3)
//!         └── Bet → Showdown (pot = 4)
//! ```
//!
//! ## Known Nash Equilibrium
//!
//! - **Player 1 with Jack**: Bet with probability α ∈ [0, 1/3]
//! - **Player 1 with Queen**: Always Pass
//! - **Player 1 with King**: Bet with probability 3α
//! - **Player 2 facing Bet with Jack**: Always Fold
//! - **Player 2 facing Bet with Queen**: Call with probability 1/3
//! - **Player 2 facing Bet with King**: Always Call
//!
//! **Expected Value**: Player 1 EV = -1/18 ≈ -0.0556

use std::fmt;

use crate::cfr::game::{Action, Game, GameState, InfoState};

/// Actions in Kuhn Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KuhnAction {
    /// Pass (check if no bet, fold if facing bet)
    Pass,
    /// Bet (or call if facing bet)
    Bet,
}

impl Action for KuhnAction {
    fn to_string(&self) -> String {
        match self {
            KuhnAction::Pass => "p".to_string(),
            KuhnAction::Bet => "b".to_string(),
        }
    }
}

impl fmt::Display for KuhnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KuhnAction::Pass => write!(f, "Pass"),
            KuhnAction::Bet => write!(f, "Bet"),
        }
    }
}

/// Information state in Kuhn Poker.
///
/// What a player knows: their card and the action history.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KuhnInfoState {
    /// Player's card (0=Jack, 1=Queen, 2=King)
    pub card: u8,
    /// Action history as string (e.g., "pb" = pass then bet)
    pub history: String,
}

impl InfoState for KuhnInfoState {
    fn key(&self) -> String {
        format!("{}:{}", self.card, self.history)
    }
}

impl fmt::Display for KuhnInfoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card_name = match self.card {
            0 => "J",
            1 => "Q",
            2 => "K",
            _ => "?",
        };
        write!(f, "{}|{}", card_name, self.history)
    }
}

/// Complete game state in Kuhn Poker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KuhnState {
    /// Cards dealt to each player (0=Jack, 1=Queen, 2=King)
    /// cards[0] is Player 1's card, cards[1] is Player 2's card
    pub cards: [u8; 2],
    /// Action history as string
    pub history: String,
    /// Amount each player has invested in the pot
    pub pot: [i32; 2],
    /// Whether cards have been dealt (for chance node handling)
    pub dealt: bool,
}

impl GameState for KuhnState {}

impl Default for KuhnState {
    fn default() -> Self {
        Self {
            cards: [0, 0],
            history: String::new(),
            pot: [1, 1], // Both ante 1
            dealt: false,
        }
    }
}

impl fmt::Display for KuhnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<&str> = self
            .cards
            .iter()
            .map(|&c| match c {
                0 => "J",
                1 => "Q",
                2 => "K",
                _ => "?",
            })
            .collect();
        write!(
            f,
            "P1:{} P2:{} History:{} Pot:{:?}",
            cards[0], cards[1], self.history, self.pot
        )
    }
}

/// Kuhn Poker game.
#[derive(Debug, Clone, Default)]
pub struct KuhnPoker;

impl KuhnPoker {
    /// Create a new Kuhn Poker game.
    pub fn new() -> Self {
        Self
    }

    /// Get card name for display.
    pub fn card_name(card: u8) -> &'static str {
        match card {
            0 => "Jack",
            1 => "Queen",
            2 => "King",
            _ => "Unknown",
        }
    }
}

impl Game for KuhnPoker {
    type State = KuhnState;
    type Action = KuhnAction;
    type InfoState = KuhnInfoState;

    fn initial_state(&self) -> Self::State {
        KuhnState::default()
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        let h = &state.history;
        // Terminal states:
        // "pp" - both pass, showdown
        // "pbp" - pass, bet, fold
        // "pbb" - pass, bet, call
        // "bp" - bet, fold
        // "bb" - bet, call
        matches!(h.as_str(), "pp" | "pbp" | "pbb" | "bp" | "bb")
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        debug_assert!(self.is_terminal(state), "returns called on non-terminal state");

        let h = &state.history;
        let p0_card = state.cards[0];
        let p1_card = state.cards[1];

        // Payoff for player 0; player 1's payoff is the negation.
        let p0_payoff: f64 = match h.as_str() {
            "pp" => {
                // Showdown after both pass - pot is 2 (1+1 ante)
                if p0_card > p1_card {
                    1.0 // Win opponent's ante
                } else {
                    -1.0 // Lose own ante
                }
            }
            "bp" => {
                // Player 1 bet, player 2 folded
                1.0 // P0 wins P1's ante
            }
            "pbp" => {
                // Player 1 passed, player 2 bet, player 1 folded
                -1.0 // P0 loses own ante
            }
            "bb" | "pbb" => {
                // Showdown after bet-call - pot is 4 (2+2)
                if p0_card > p1_card {
                    2.0 // Win opponent's 2 chips
                } else {
                    -2.0 // Lose own 2 chips
                }
            }
            _ => 0.0,
        };

        vec![p0_payoff, -p0_payoff]
    }

    fn current_player(&self, state: &Self::State) -> Option<usize> {
        if self.is_terminal(state) || self.is_chance(state) {
            return None;
        }

        // Player alternates: P0 at even history length, P1 at odd
        // But after "pb", P0 acts again
        let h = &state.history;
        match h.as_str() {
            "" => Some(0),   // P0 acts first
            "p" => Some(1),  // P1 responds to pass
            "b" => Some(1),  // P1 responds to bet
            "pb" => Some(0), // P0 responds to P1's bet after pass
            _ => None,       // Terminal
        }
    }

    fn num_players(&self) -> usize {
        2
    }

    fn available_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if self.is_terminal(state) || self.is_chance(state) {
            return vec![];
        }
        // Both actions always available when not terminal
        vec![KuhnAction::Pass, KuhnAction::Bet]
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut new_state = state.clone();

        match action {
            KuhnAction::Pass => {
                new_state.history.push('p');
            }
            KuhnAction::Bet => {
                new_state.history.push('b');
                // Add 1 to current player's pot contribution
                if let Some(player) = self.current_player(state) {
                    new_state.pot[player] += 1;
                }
            }
        }

        new_state
    }

    fn info_state(&self, state: &Self::State) -> Self::InfoState {
        let player = self.current_player(state).unwrap_or(0);
        KuhnInfoState {
            card: state.cards[player],
            history: state.history.clone(),
        }
    }

    fn is_chance(&self, state: &Self::State) -> bool {
        // Chance node is when cards haven't been dealt yet
        !state.dealt
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::State, f64)> {
        debug_assert!(self.is_chance(state), "chance_outcomes on non-chance state");

        // Every ordered deal of 2 distinct cards from 3 is equally likely.
        let mut outcomes = Vec::with_capacity(6);
        for p0 in 0..3u8 {
            for p1 in 0..3u8 {
                if p0 == p1 {
                    continue;
                }
                outcomes.push((
                    KuhnState {
                        cards: [p0, p1],
                        history: String::new(),
                        pot: [1, 1],
                        dealt: true,
                    },
                    1.0 / 6.0,
                ));
            }
        }
        outcomes
    }

    fn action_name(&self, action: &Self::Action) -> String {
        match action {
            KuhnAction::Pass => "Pass".to_string(),
            KuhnAction::Bet => "Bet".to_string(),
        }
    }

    fn state_description(&self, state: &Self::State) -> String {
        format!("{}", state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfr::{CfrBrSolver, SolverConfig};

    #[test]
    fn test_kuhn_game_tree() {
        let game = KuhnPoker::new();

        // Test initial state
        let state = game.initial_state();
        assert!(!state.dealt);
        assert!(game.is_chance(&state));

        // Test after dealing (manually set dealt state)
        let dealt_state = KuhnState {
            cards: [2, 0], // K vs J
            history: String::new(),
            pot: [1, 1],
            dealt: true,
        };
        assert!(!game.is_chance(&dealt_state));
        assert!(!game.is_terminal(&dealt_state));
        assert_eq!(game.current_player(&dealt_state), Some(0));

        // Test actions
        let actions = game.available_actions(&dealt_state);
        assert_eq!(actions.len(), 2);
        assert!(actions.contains(&KuhnAction::Pass));
        assert!(actions.contains(&KuhnAction::Bet));
    }

    #[test]
    fn test_kuhn_chance_outcomes() {
        let game = KuhnPoker::new();
        let root = game.initial_state();

        let outcomes = game.chance_outcomes(&root);
        assert_eq!(outcomes.len(), 6);

        let total: f64 = outcomes.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-12);

        for (state, _) in &outcomes {
            assert!(state.dealt);
            assert_ne!(state.cards[0], state.cards[1]);
        }
    }

    #[test]
    fn test_kuhn_terminal_payoffs() {
        let game = KuhnPoker::new();

        // Test "pp" - both pass, higher card wins
        let pp_state = KuhnState {
            cards: [2, 0], // K vs J
            history: "pp".to_string(),
            pot: [1, 1],
            dealt: true,
        };
        assert!(game.is_terminal(&pp_state));
        assert_eq!(game.returns(&pp_state), vec![1.0, -1.0]); // K wins

        // Test "bp" - bet then fold
        let bp_state = KuhnState {
            cards: [0, 2], // J vs K
            history: "bp".to_string(),
            pot: [2, 1],
            dealt: true,
        };
        assert!(game.is_terminal(&bp_state));
        assert_eq!(game.returns(&bp_state), vec![1.0, -1.0]); // J wins by fold

        // Test "bb" - bet then call, showdown
        let bb_state = KuhnState {
            cards: [0, 2], // J vs K
            history: "bb".to_string(),
            pot: [2, 2],
            dealt: true,
        };
        assert!(game.is_terminal(&bb_state));
        assert_eq!(game.returns(&bb_state), vec![-2.0, 2.0]); // K wins showdown
    }

    #[test]
    fn test_kuhn_terminals_are_zero_sum() {
        let game = KuhnPoker::new();

        fn check(game: &KuhnPoker, state: &KuhnState) {
            if game.is_terminal(state) {
                let returns = game.returns(state);
                assert_eq!(returns.len(), 2);
                assert_eq!(returns[0] + returns[1], 0.0);
                return;
            }
            if game.is_chance(state) {
                for (child, _) in game.chance_outcomes(state) {
                    check(game, &child);
                }
                return;
            }
            for action in game.available_actions(state) {
                check(game, &game.apply_action(state, &action));
            }
        }

        check(&game, &game.initial_state());
    }

    #[test]
    fn test_kuhn_info_states() {
        let game = KuhnPoker::new();

        let state = KuhnState {
            cards: [1, 2], // Q vs K
            history: "p".to_string(),
            pot: [1, 1],
            dealt: true,
        };

        // Current player is P1 (index 1)
        assert_eq!(game.current_player(&state), Some(1));

        // Info state should show P1's card (K=2) and history
        let info = game.info_state(&state);
        assert_eq!(info.card, 2);
        assert_eq!(info.history, "p");
        assert_eq!(info.key(), "2:p");
    }

    #[test]
    fn test_kuhn_equilibrium_strategy_shape() {
        let game = KuhnPoker::new();
        let mut solver = CfrBrSolver::new(game, SolverConfig::default());
        solver.train(300).unwrap();

        let policy = solver.average_policy();

        // Expected Nash equilibrium shape for Kuhn Poker:
        // P1 Queen: never bet first; P2 Jack: fold to a bet; P2 King: call.
        let queen_open = policy.strategy("1:", 2);
        assert!(
            queen_open[0] > 0.8,
            "Queen open pass probability {} should be near 1",
            queen_open[0]
        );

        let jack_vs_bet = policy.strategy("0:b", 2);
        assert!(
            jack_vs_bet[0] > 0.8,
            "Jack should fold to a bet, got fold probability {}",
            jack_vs_bet[0]
        );

        let king_vs_bet = policy.strategy("2:b", 2);
        assert!(
            king_vs_bet[1] > 0.8,
            "King should call a bet, got call probability {}",
            king_vs_bet[1]
        );

        // P1's Jack bluffing frequency stays within the equilibrium family.
        let jack_open = policy.strategy("0:", 2);
        assert!(
            jack_open[1] < 0.5,
            "Jack open bet probability {} should stay below 1/2",
            jack_open[1]
        );
    }
}
