//! Leduc Poker implementation for solver validation.
//!
//! Leduc Poker is the standard mid-sized benchmark for CFR-family solvers:
//! large enough to exercise multi-round betting and a public board card,
//! small enough that an exact tree walk stays cheap.
//!
//! ## Game Rules
//!
//! - 6 cards: two Jacks (0), two Queens (1), two Kings (2)
//! - 2 players, each antes 1 chip
//! - Each player receives 1 private card, then a betting round
//! - One public board card is revealed, then a second betting round
//! - Raise size is 2 in the first round and 4 in the second,
//!   at most 2 raises per round
//! - At showdown a card pairing the board beats everything else,
//!   otherwise the higher rank wins; equal ranks split

use std::fmt;

use crate::cfr::game::{Action, Game, GameState, InfoState};

const NUM_RANKS: u8 = 3;
const CARDS_PER_RANK: i32 = 2;

/// Actions in Leduc Poker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeducAction {
    /// Fold when facing a raise, forfeiting the pot
    Fold,
    /// Call (check if no outstanding raise)
    Call,
    /// Raise by the round's fixed amount
    Raise,
}

impl Action for LeducAction {
    fn to_string(&self) -> String {
        match self {
            LeducAction::Fold => "f".to_string(),
            LeducAction::Call => "c".to_string(),
            LeducAction::Raise => "r".to_string(),
        }
    }
}

impl fmt::Display for LeducAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeducAction::Fold => write!(f, "Fold"),
            LeducAction::Call => write!(f, "Call"),
            LeducAction::Raise => write!(f, "Raise"),
        }
    }
}

/// Information state in Leduc Poker.
///
/// What a player knows: their private card, the board card once revealed,
/// and the betting history of both rounds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeducInfoState {
    /// Player's private card rank (0=Jack, 1=Queen, 2=King)
    pub card: u8,
    /// Public board card rank, once dealt
    pub board: Option<u8>,
    /// First-round betting history ('c'/'r'/'f' characters)
    pub round0: String,
    /// Second-round betting history
    pub round1: String,
}

impl InfoState for LeducInfoState {
    fn key(&self) -> String {
        let board = match self.board {
            Some(b) => b.to_string(),
            None => "-".to_string(),
        };
        format!("{}:{}:{}|{}", self.card, board, self.round0, self.round1)
    }
}

impl fmt::Display for LeducInfoState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}|{}",
            LeducPoker::card_name(self.card),
            self.board.map(LeducPoker::card_name).unwrap_or("?"),
            self.round0,
            self.round1
        )
    }
}

/// Complete game state in Leduc Poker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeducState {
    /// Private card ranks, indexed by player
    pub cards: [u8; 2],
    /// Whether the private cards have been dealt
    pub dealt: bool,
    /// Public board card rank, dealt after the first betting round closes
    pub board: Option<u8>,
    /// Betting history per round ('c'/'r'/'f' characters)
    pub history: [String; 2],
    /// Amount each player has invested in the pot
    pub pot: [i32; 2],
    /// Player who folded, if any
    pub folded: Option<usize>,
}

impl GameState for LeducState {}

impl Default for LeducState {
    fn default() -> Self {
        Self {
            cards: [0, 0],
            dealt: false,
            board: None,
            history: [String::new(), String::new()],
            pot: [1, 1], // Both ante 1
            folded: None,
        }
    }
}

impl LeducState {
    /// Current betting round (0 before the board card, 1 after).
    fn round(&self) -> usize {
        usize::from(self.board.is_some())
    }
}

impl fmt::Display for LeducState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1:{} P2:{} Board:{} History:{}|{} Pot:{:?}",
            LeducPoker::card_name(self.cards[0]),
            LeducPoker::card_name(self.cards[1]),
            self.board.map(LeducPoker::card_name).unwrap_or("-"),
            self.history[0],
            self.history[1],
            self.pot
        )
    }
}

/// Leduc Poker game.
#[derive(Debug, Clone, Default)]
pub struct LeducPoker;

impl LeducPoker {
    /// Create a new Leduc Poker game.
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

    /// A betting round is closed after check-check or once an outstanding
    /// raise has been called.
    fn round_closed(history: &str) -> bool {
        history == "cc" || (history.contains('r') && history.ends_with('c'))
    }

    fn raise_amount(round: usize) -> i32 {
        if round == 0 {
            2
        } else {
            4
        }
    }
}

impl Game for LeducPoker {
    type State = LeducState;
    type Action = LeducAction;
    type InfoState = LeducInfoState;

    fn initial_state(&self) -> Self::State {
        LeducState::default()
    }

    fn is_terminal(&self, state: &Self::State) -> bool {
        state.folded.is_some()
            || (state.board.is_some() && Self::round_closed(&state.history[1]))
    }

    fn returns(&self, state: &Self::State) -> Vec<f64> {
        debug_assert!(self.is_terminal(state), "returns called on non-terminal state");

        if let Some(folder) = state.folded {
            // The folder forfeits their own contribution.
            let amount = f64::from(state.pot[folder]);
            let mut returns = vec![0.0; 2];
            returns[folder] = -amount;
            returns[1 - folder] = amount;
            return returns;
        }

        // Showdown: equal contributions on both sides.
        let amount = f64::from(state.pot[0]);
        let [c0, c1] = state.cards;
        if c0 == c1 {
            return vec![0.0, 0.0];
        }
        let winner = match state.board {
            Some(b) if c0 == b => 0,
            Some(b) if c1 == b => 1,
            _ => usize::from(c1 > c0),
        };
        let mut returns = vec![0.0; 2];
        returns[winner] = amount;
        returns[1 - winner] = -amount;
        returns
    }

    fn current_player(&self, state: &Self::State) -> Option<usize> {
        if self.is_terminal(state) || self.is_chance(state) {
            return None;
        }
        // Player 0 opens every betting round.
        Some(state.history[state.round()].len() % 2)
    }

    fn num_players(&self) -> usize {
        2
    }

    fn available_actions(&self, state: &Self::State) -> Vec<Self::Action> {
        if self.is_terminal(state) || self.is_chance(state) {
            return vec![];
        }

        let facing_raise = state.pot[0] != state.pot[1];
        let raises = state.history[state.round()].matches('r').count();

        let mut actions = Vec::with_capacity(3);
        if facing_raise {
            actions.push(LeducAction::Fold);
        }
        actions.push(LeducAction::Call);
        if raises < 2 {
            actions.push(LeducAction::Raise);
        }
        actions
    }

    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State {
        let mut new_state = state.clone();
        let round = state.round();

        if let Some(player) = self.current_player(state) {
            match action {
                LeducAction::Fold => {
                    new_state.folded = Some(player);
                    new_state.history[round].push('f');
                }
                LeducAction::Call => {
                    new_state.pot[player] = new_state.pot[1 - player];
                    new_state.history[round].push('c');
                }
                LeducAction::Raise => {
                    new_state.pot[player] =
                        new_state.pot[1 - player] + Self::raise_amount(round);
                    new_state.history[round].push('r');
                }
            }
        }

        new_state
    }

    fn info_state(&self, state: &Self::State) -> Self::InfoState {
        let player = self.current_player(state).unwrap_or(0);
        LeducInfoState {
            card: state.cards[player],
            board: state.board,
            round0: state.history[0].clone(),
            round1: state.history[1].clone(),
        }
    }

    fn is_chance(&self, state: &Self::State) -> bool {
        if !state.dealt {
            return true;
        }
        // The board card is dealt once the first round closes without a fold.
        state.folded.is_none() && state.board.is_none() && Self::round_closed(&state.history[0])
    }

    fn chance_outcomes(&self, state: &Self::State) -> Vec<(Self::State, f64)> {
        debug_assert!(self.is_chance(state), "chance_outcomes on non-chance state");

        if !state.dealt {
            // Ordered deals from a 6-card deck with two cards per rank:
            // 2/15 for distinct ranks, 1/15 for a pair.
            let mut outcomes = Vec::with_capacity(9);
            for c0 in 0..NUM_RANKS {
                for c1 in 0..NUM_RANKS {
                    let prob = if c0 == c1 { 1.0 / 15.0 } else { 2.0 / 15.0 };
                    let mut child = state.clone();
                    child.cards = [c0, c1];
                    child.dealt = true;
                    outcomes.push((child, prob));
                }
            }
            return outcomes;
        }

        // Board card, drawn from the 4 cards left in the deck.
        let mut outcomes = Vec::with_capacity(NUM_RANKS as usize);
        for rank in 0..NUM_RANKS {
            let remaining = CARDS_PER_RANK
                - i32::from(state.cards[0] == rank)
                - i32::from(state.cards[1] == rank);
            if remaining > 0 {
                let mut child = state.clone();
                child.board = Some(rank);
                outcomes.push((child, f64::from(remaining) / 4.0));
            }
        }
        outcomes
    }

    fn action_name(&self, action: &Self::Action) -> String {
        format!("{}", action)
    }

    fn state_description(&self, state: &Self::State) -> String {
        format!("{}", state)
    }
}
