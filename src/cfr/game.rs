//! Game trait definition for the CFR-BR solver.
//!
//! Any extensive-form game that implements the `Game` trait can be solved.
//! This provides a clean abstraction between the algorithm and specific games:
//! the solver never materializes the game tree, it only walks it on demand
//! through this interface.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for actions that can be taken in a game.
///
/// Actions must be cloneable, comparable, and hashable for storage in maps.
pub trait Action: Clone + Eq + Hash + Debug {
    /// Convert action to a string representation for display/storage.
    fn to_string(&self) -> String;
}

/// Trait for information states (what a player knows at a decision point).
///
/// An information state represents all the information available to a player
/// when making a decision. Two game states that look identical to the acting
/// player (same private cards, same public history) must produce the same
/// information state; distinguishable states must produce different ones.
/// The solver treats a violation of this contract as fatal.
pub trait InfoState: Clone + Eq + Hash + Debug {
    /// Generate a unique string key for this information state.
    /// This key is used for storing regrets and strategies.
    fn key(&self) -> String;
}

/// Trait for game states.
///
/// A game state contains all information about the current state of the game,
/// including private information that players may not see. States are
/// value-like: cloning one and traversing the clone must not affect any
/// other branch of the walk.
pub trait GameState: Clone + Debug {}

/// The main trait that defines the interface for any extensive-form game.
///
/// Implement this trait to use the CFR-BR solver with your game.
///
/// # Example
/// ```ignore
/// struct MyGame;
///
/// impl Game for MyGame {
///     type State = MyGameState;
///     type Action = MyAction;
///     type InfoState = MyInfoState;
///
///     // ... implement required methods
/// }
/// ```
pub trait Game: Clone {
    /// The type representing a complete game state.
    type State: GameState;

    /// The type representing an action a player can take.
    type Action: Action;

    /// The type representing what a player knows at a decision point.
    type InfoState: InfoState;

    /// Create the initial game state.
    ///
    /// This is called at the start of each traversal to get a fresh root.
    fn initial_state(&self) -> Self::State;

    /// Check if the given state is terminal (game over).
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Get the payoff vector at a terminal state, indexed by player.
    ///
    /// For two-player zero-sum games the two entries must sum to zero.
    ///
    /// # Panics
    /// May panic if called on a non-terminal state.
    fn returns(&self, state: &Self::State) -> Vec<f64>;

    /// Get the index of the player who should act at the current state.
    ///
    /// # Returns
    /// - `Some(player_index)` if a player should act
    /// - `None` if the state is terminal or a chance node
    fn current_player(&self, state: &Self::State) -> Option<usize>;

    /// Get the total number of players in the game.
    fn num_players(&self) -> usize;

    /// Get the ordered list of available actions at the current state.
    ///
    /// Returns an empty vector for terminal and chance states. A non-terminal
    /// decision state with no legal actions is a contract violation and is
    /// surfaced by the solver as an error.
    fn available_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply an action to a state and return the resulting new state.
    ///
    /// This must not modify the input state (immutable transition).
    fn apply_action(&self, state: &Self::State, action: &Self::Action) -> Self::State;

    /// Get the information state for the current player.
    ///
    /// The information state captures everything the acting player knows,
    /// which typically includes their private cards and the public action
    /// history, but not other players' private information.
    fn info_state(&self, state: &Self::State) -> Self::InfoState;

    /// Check if the current state is a chance node.
    ///
    /// Chance nodes represent random events like dealing cards.
    /// Override this if your game has chance nodes.
    fn is_chance(&self, _state: &Self::State) -> bool {
        false
    }

    /// Enumerate the outcomes of a chance node.
    ///
    /// Returns every successor state together with its probability. The
    /// probabilities must sum to 1. The solver weights each branch exactly;
    /// nothing is sampled.
    ///
    /// Override this for games with chance nodes; the default (no outcomes)
    /// is only valid for games where `is_chance` is never true.
    fn chance_outcomes(&self, _state: &Self::State) -> Vec<(Self::State, f64)> {
        Vec::new()
    }

    /// Get a human-readable name for an action.
    ///
    /// Used for debugging and visualization.
    fn action_name(&self, action: &Self::Action) -> String {
        action.to_string()
    }

    /// Get a human-readable description of a state.
    ///
    /// Used for debugging and visualization.
    fn state_description(&self, state: &Self::State) -> String {
        format!("{:?}", state)
    }
}

/// Macro to simplify implementing the Action trait for simple enums.
#[macro_export]
macro_rules! impl_action {
    ($type:ty) => {
        impl $crate::cfr::game::Action for $type {
            fn to_string(&self) -> String {
                format!("{:?}", self)
            }
        }
    };
}

/// Macro to simplify implementing the GameState trait.
#[macro_export]
macro_rules! impl_game_state {
    ($type:ty) => {
        impl $crate::cfr::game::GameState for $type {}
    };
}
