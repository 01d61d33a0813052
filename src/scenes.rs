//! # Scene Management System
//!
//! A centralized system for managing the game scenes (playing, ending
//! screens). This keeps the main loop down to polling one scene update
//! per frame.

use crate::{
    GameEvent, GamePhase, GameSession, InputHandler, MacroquadDisplay, ManseResult, PlayerInput,
};
use log::info;
use macroquad::prelude::*;

/// Represents the current scene in the game
#[derive(Debug, Clone, PartialEq)]
pub enum SceneType {
    /// Normal gameplay
    Playing,
    /// The run reached a terminal phase (victory or game over)
    Ended(GamePhase),
}

/// The main scene manager that coordinates all game scenes
pub struct SceneManager {
    current_scene: SceneType,
    session: GameSession,
    display: MacroquadDisplay,
    input_handler: InputHandler,
}

impl SceneManager {
    /// Creates a new scene manager with the given session and input handler
    pub async fn new(session: GameSession, input_handler: InputHandler) -> ManseResult<Self> {
        let mut display = MacroquadDisplay::new().await?;
        display.add_message("Welcome to Manse!".to_string());
        display.add_message("WASD/arrows move, Enter confirms, F1 for help".to_string());

        Ok(Self {
            current_scene: SceneType::Playing,
            session,
            display,
            input_handler,
        })
    }

    /// Runs the main scene loop until the game exits
    pub async fn run(&mut self) -> ManseResult<()> {
        loop {
            match self.current_scene {
                SceneType::Playing => {
                    if self.update_playing_scene().await? {
                        break; // Exit requested
                    }
                }
                SceneType::Ended(_) => {
                    if self.update_ended_scene().await? {
                        break; // Exit requested
                    }
                }
            }
            next_frame().await;
        }
        Ok(())
    }

    /// Updates the playing scene, returns true if exit is requested
    async fn update_playing_scene(&mut self) -> ManseResult<bool> {
        if let Some(input) = self.input_handler.get_input() {
            match input {
                PlayerInput::Help => {
                    self.display.add_message(
                        "Help: WASD/arrows=move, Enter=confirm, Space=reroll, O=open, C=dig, Esc=quit"
                            .to_string(),
                    );
                }

                _ => {
                    self.handle_session_intent(input);
                }
            }
        }

        if self.session.quit_requested {
            return Ok(true);
        }

        // Check for scene transition
        if self.session.is_ended() {
            self.current_scene = SceneType::Ended(self.session.phase);
        }

        // Render the current scene
        self.display.render_game(&self.session).await?;

        Ok(false)
    }

    /// Updates the ended scene, returns true if exit is requested
    async fn update_ended_scene(&mut self) -> ManseResult<bool> {
        if is_key_pressed(KeyCode::N) {
            self.start_new_game()?;
        } else if is_key_pressed(KeyCode::Escape) {
            return Ok(true); // Exit game
        } else if let Some(input) = self.input_handler.get_input() {
            // The game-over replay menu runs through the session.
            self.handle_session_intent(input);
        }

        if self.session.quit_requested {
            return Ok(true);
        }

        // A confirmed replay drops the session back into exploring.
        if !self.session.is_ended() {
            self.current_scene = SceneType::Playing;
        }

        self.display.render_game(&self.session).await?;

        Ok(false)
    }

    /// Maps an input to an intent and feeds it through the session
    fn handle_session_intent(&mut self, input: PlayerInput) {
        if let Some(intent) = self.input_handler.input_to_intent(input, &self.session) {
            let events = self.session.apply(intent);
            self.process_session_events(events);
        }
    }

    /// Forwards message events to the display
    fn process_session_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            if let GameEvent::Message { text, .. } = event {
                self.display.add_message(text);
            }
        }
    }

    /// Starts a new game in a freshly rearranged manor
    fn start_new_game(&mut self) -> ManseResult<()> {
        let new_seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        info!("starting a new manor with seed {}", new_seed);

        let mut manor = self.session.config().clone();
        manor.seed = new_seed;
        self.session = GameSession::new(&manor)?;

        // Reset scene to playing
        self.current_scene = SceneType::Playing;
        self.display.add_message("New game started!".to_string());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::ManorConfig;
    use crate::rendering::UI;

    fn manager_in_ended_scene() -> SceneManager {
        let mut session =
            GameSession::new(&ManorConfig::new(5)).expect("config is valid");
        session.phase = GamePhase::GameOver;
        SceneManager {
            current_scene: SceneType::Ended(GamePhase::GameOver),
            session,
            display: MacroquadDisplay {
                cell_size: 64.0,
                margin: 20.0,
                hud_height: 40.0,
                messages: Vec::new(),
                max_messages: 100,
                ui: UI::new(),
            },
            input_handler: InputHandler::new(),
        }
    }

    #[test]
    fn test_start_new_game_returns_to_playing() {
        let mut manager = manager_in_ended_scene();
        manager.start_new_game().expect("a fresh manor builds");

        assert_eq!(manager.current_scene, SceneType::Playing);
        assert_eq!(manager.session.phase, GamePhase::Exploring);
        assert_eq!(manager.session.turn, 0);
        assert!(manager
            .display
            .messages
            .iter()
            .any(|message| message.contains("New game")));
    }
}
