//! # Input Module
//!
//! Keyboard polling and the mapping from raw input to session intents.

use crate::game::session::{GamePhase, GameSession, PlayerIntent};
use crate::game::Direction;
use macroquad::prelude::*;

/// Input handler for processing player commands.
///
/// Polls macroquad key presses into [`PlayerInput`] values and converts
/// those into [`PlayerIntent`]s using the current session phase.
pub struct InputHandler {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use manse::InputHandler;
    ///
    /// let input_handler = InputHandler::new();
    /// assert!(input_handler.vi_keys_enabled);
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Gets the current input if any key is pressed.
    ///
    /// Returns the corresponding player input, or None if no key is pressed.
    pub fn get_input(&self) -> Option<PlayerInput> {
        self.process_macroquad_input()
    }

    /// Processes macroquad input and returns the corresponding player input.
    fn process_macroquad_input(&self) -> Option<PlayerInput> {
        // Movement keys - Arrow keys
        if is_key_pressed(KeyCode::Up) {
            return Some(PlayerInput::Move(Direction::North));
        }
        if is_key_pressed(KeyCode::Down) {
            return Some(PlayerInput::Move(Direction::South));
        }
        if is_key_pressed(KeyCode::Left) {
            return Some(PlayerInput::Move(Direction::West));
        }
        if is_key_pressed(KeyCode::Right) {
            return Some(PlayerInput::Move(Direction::East));
        }

        // Movement keys - WASD
        if is_key_pressed(KeyCode::W) {
            return Some(PlayerInput::Move(Direction::North));
        }
        if is_key_pressed(KeyCode::S) {
            return Some(PlayerInput::Move(Direction::South));
        }
        if is_key_pressed(KeyCode::A) {
            return Some(PlayerInput::Move(Direction::West));
        }
        if is_key_pressed(KeyCode::D) {
            return Some(PlayerInput::Move(Direction::East));
        }

        // Movement keys - Vi style (hjkl) if enabled
        if self.vi_keys_enabled {
            if is_key_pressed(KeyCode::H) {
                return Some(PlayerInput::Move(Direction::West));
            }
            if is_key_pressed(KeyCode::J) {
                return Some(PlayerInput::Move(Direction::South));
            }
            if is_key_pressed(KeyCode::K) {
                return Some(PlayerInput::Move(Direction::North));
            }
            if is_key_pressed(KeyCode::L) {
                return Some(PlayerInput::Move(Direction::East));
            }
        }

        // Enter (confirm selection)
        if is_key_pressed(KeyCode::Enter) {
            return Some(PlayerInput::Confirm);
        }

        // Reroll the draft hand
        if is_key_pressed(KeyCode::Space) {
            return Some(PlayerInput::Reroll);
        }

        // Cancel the current overlay
        if is_key_pressed(KeyCode::Escape) {
            return Some(PlayerInput::Cancel);
        }

        // Open the chest or locker in the current room
        if is_key_pressed(KeyCode::O) {
            return Some(PlayerInput::OpenSpecial);
        }

        // Dig at the current room's dig site
        if is_key_pressed(KeyCode::C) {
            return Some(PlayerInput::Dig);
        }

        // New game (handled at the scene level)
        if is_key_pressed(KeyCode::N) {
            return Some(PlayerInput::NewGame);
        }

        // Quit
        if is_key_pressed(KeyCode::Q) {
            return Some(PlayerInput::Quit);
        }

        // Help
        if is_key_pressed(KeyCode::F1) {
            return Some(PlayerInput::Help);
        }

        None
    }

    /// Converts player input to a session intent.
    ///
    /// This takes the player input and the current session to decide what
    /// the keys mean in the current phase: Escape cancels while a draft or
    /// a shop is up and asks to quit elsewhere, and east/west movement
    /// browses the offer list while shopping.
    pub fn input_to_intent(
        &self,
        input: PlayerInput,
        session: &GameSession,
    ) -> Option<PlayerIntent> {
        match input {
            PlayerInput::Move(direction) => {
                if session.phase == GamePhase::Shopping {
                    match direction {
                        Direction::East => Some(PlayerIntent::ShopNavigate(1)),
                        Direction::West => Some(PlayerIntent::ShopNavigate(-1)),
                        _ => None,
                    }
                } else {
                    Some(PlayerIntent::Move(direction))
                }
            }

            PlayerInput::Confirm => Some(PlayerIntent::Confirm),

            PlayerInput::Cancel => match session.phase {
                GamePhase::Drawing | GamePhase::Shopping => Some(PlayerIntent::Cancel),
                _ => Some(PlayerIntent::Quit),
            },

            PlayerInput::Reroll => Some(PlayerIntent::Reroll),
            PlayerInput::OpenSpecial => Some(PlayerIntent::OpenSpecial),
            PlayerInput::Dig => Some(PlayerIntent::Dig),
            PlayerInput::Quit => Some(PlayerIntent::Quit),

            // Scene-level inputs don't translate to session intents
            PlayerInput::NewGame | PlayerInput::Help => None,
        }
    }
}

/// Player input types that can be processed by the input handler.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerInput {
    /// Move one cell in a cardinal direction
    Move(Direction),
    /// Confirm the current selection
    Confirm,
    /// Cancel the current overlay
    Cancel,
    /// Spend a die to redraw the draft hand
    Reroll,
    /// Open the chest or locker in the current room
    OpenSpecial,
    /// Dig at the current room's dig site
    Dig,
    /// Start a new game (when the run has ended)
    NewGame,
    /// Show help information
    Help,
    /// Quit the game
    Quit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ManorConfig;

    fn exploring_session() -> GameSession {
        GameSession::new(&ManorConfig::new(3)).expect("config is valid")
    }

    fn drawing_session() -> GameSession {
        let mut session = exploring_session();
        session.apply(PlayerIntent::Move(Direction::North));
        assert_eq!(session.phase, GamePhase::Drawing);
        session
    }

    #[test]
    fn test_moves_pass_through_while_exploring() {
        let handler = InputHandler::new();
        let session = exploring_session();

        assert_eq!(
            handler.input_to_intent(PlayerInput::Move(Direction::North), &session),
            Some(PlayerIntent::Move(Direction::North))
        );
        assert_eq!(
            handler.input_to_intent(PlayerInput::Move(Direction::East), &session),
            Some(PlayerIntent::Move(Direction::East))
        );
    }

    #[test]
    fn test_escape_cancels_while_drawing() {
        let handler = InputHandler::new();
        let session = drawing_session();

        assert_eq!(
            handler.input_to_intent(PlayerInput::Cancel, &session),
            Some(PlayerIntent::Cancel)
        );
    }

    #[test]
    fn test_escape_quits_while_exploring() {
        let handler = InputHandler::new();
        let session = exploring_session();

        assert_eq!(
            handler.input_to_intent(PlayerInput::Cancel, &session),
            Some(PlayerIntent::Quit)
        );
    }

    #[test]
    fn test_east_west_browse_the_shop() {
        let handler = InputHandler::new();
        let mut session = exploring_session();
        session.phase = GamePhase::Shopping;

        assert_eq!(
            handler.input_to_intent(PlayerInput::Move(Direction::East), &session),
            Some(PlayerIntent::ShopNavigate(1))
        );
        assert_eq!(
            handler.input_to_intent(PlayerInput::Move(Direction::West), &session),
            Some(PlayerIntent::ShopNavigate(-1))
        );
        assert_eq!(
            handler.input_to_intent(PlayerInput::Move(Direction::North), &session),
            None
        );
    }

    #[test]
    fn test_scene_level_inputs_map_to_no_intent() {
        let handler = InputHandler::new();
        let session = exploring_session();

        assert_eq!(handler.input_to_intent(PlayerInput::Help, &session), None);
        assert_eq!(handler.input_to_intent(PlayerInput::NewGame, &session), None);
    }
}
