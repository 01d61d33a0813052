//! # Display Management
//!
//! Screen management and 2D board rendering using macroquad.

use crate::game::{
    Direction, Door, GamePhase, GameSession, LockTier, Position, ResourceKind, RoomColor,
};
use crate::rendering::UI;
use crate::ManseResult;
use macroquad::prelude::*;

const BACKGROUND: Color = Color::new(15.0 / 255.0, 16.0 / 255.0, 20.0 / 255.0, 1.0);
const CELL_EMPTY: Color = Color::new(26.0 / 255.0, 28.0 / 255.0, 35.0 / 255.0, 1.0);
const GRID_LINE: Color = Color::new(55.0 / 255.0, 60.0 / 255.0, 70.0 / 255.0, 1.0);
const PLAYER_COLOR: Color = Color::new(220.0 / 255.0, 220.0 / 255.0, 1.0, 1.0);
const TEXT_COLOR: Color = Color::new(235.0 / 255.0, 235.0 / 255.0, 235.0 / 255.0, 1.0);
const TEXT_DIM: Color = Color::new(140.0 / 255.0, 140.0 / 255.0, 150.0 / 255.0, 1.0);
const DOOR_OPEN: Color = Color::new(90.0 / 255.0, 200.0 / 255.0, 120.0 / 255.0, 1.0);
const DOOR_PLAIN: Color = Color::new(120.0 / 255.0, 120.0 / 255.0, 130.0 / 255.0, 1.0);
const DOOR_BASIC: Color = Color::new(212.0 / 255.0, 175.0 / 255.0, 55.0 / 255.0, 1.0);
const DOOR_HEAVY: Color = Color::new(200.0 / 255.0, 70.0 / 255.0, 60.0 / 255.0, 1.0);
const EXIT_MARK: Color = Color::new(230.0 / 255.0, 200.0 / 255.0, 70.0 / 255.0, 1.0);

/// Fill color for a placed room of the given catalog color.
///
/// Muted values so the player marker and door marks stay readable on top.
pub fn room_fill(color: RoomColor) -> Color {
    match color {
        RoomColor::Yellow => Color::new(120.0 / 255.0, 110.0 / 255.0, 45.0 / 255.0, 1.0),
        RoomColor::Green => Color::new(55.0 / 255.0, 95.0 / 255.0, 60.0 / 255.0, 1.0),
        RoomColor::Purple => Color::new(85.0 / 255.0, 65.0 / 255.0, 110.0 / 255.0, 1.0),
        RoomColor::Orange => Color::new(120.0 / 255.0, 80.0 / 255.0, 40.0 / 255.0, 1.0),
        RoomColor::Red => Color::new(110.0 / 255.0, 50.0 / 255.0, 45.0 / 255.0, 1.0),
        RoomColor::Blue => Color::new(50.0 / 255.0, 70.0 / 255.0, 105.0 / 255.0, 1.0),
    }
}

fn door_color(door: Door) -> Color {
    if door.open {
        return DOOR_OPEN;
    }
    match door.tier {
        LockTier::None => DOOR_PLAIN,
        LockTier::Basic => DOOR_BASIC,
        LockTier::Heavy => DOOR_HEAVY,
    }
}

/// Macroquad display manager for the game.
///
/// Handles all 2D rendering: the manor board with its doors, the HUD
/// readout, the message strip, and the per-phase overlays.
pub struct MacroquadDisplay {
    /// Side length of one board cell in pixels
    pub cell_size: f32,
    /// Outer margin around the board in pixels
    pub margin: f32,
    /// Height of the HUD strip above the board in pixels
    pub hud_height: f32,
    /// Message history
    pub messages: Vec<String>,
    /// Maximum number of messages to keep
    pub max_messages: usize,
    /// Overlay widgets drawn on top of the board
    pub ui: UI,
}

impl MacroquadDisplay {
    /// Creates a new display manager.
    pub async fn new() -> ManseResult<Self> {
        Ok(Self {
            cell_size: 64.0,
            margin: 20.0,
            hud_height: 40.0,
            messages: Vec::new(),
            max_messages: 100,
            ui: UI::new(),
        })
    }

    /// Renders the complete game screen.
    ///
    /// This includes the board, the HUD, the message strip, and whichever
    /// overlay the current phase calls for.
    pub async fn render_game(&mut self, session: &GameSession) -> ManseResult<()> {
        clear_background(BACKGROUND);

        self.render_board(session);
        self.render_hud(session);
        self.render_messages();

        match session.phase {
            GamePhase::Exploring => {}
            GamePhase::Drawing => self.ui.render_draft(session),
            GamePhase::Shopping => self.ui.render_shop(session),
            GamePhase::Victory | GamePhase::GameOver => self.ui.render_ending(session),
        }

        Ok(())
    }

    /// Top-left pixel of the board, horizontally centered on screen.
    fn board_origin(&self, session: &GameSession) -> Vec2 {
        let board_width = session.grid.width as f32 * self.cell_size;
        let x = ((screen_width() - board_width) / 2.0).max(self.margin);
        vec2(x, self.hud_height + self.margin)
    }

    /// Renders the manor board: cells, grid lines, doors, and the player.
    fn render_board(&self, session: &GameSession) {
        let grid = &session.grid;
        let origin = self.board_origin(session);
        let board_width = grid.width as f32 * self.cell_size;
        let board_height = grid.height as f32 * self.cell_size;

        for y in 0..grid.height {
            for x in 0..grid.width {
                let pos = Position::new(x, y);
                let px = origin.x + x as f32 * self.cell_size;
                let py = origin.y + y as f32 * self.cell_size;
                let fill = grid
                    .room_at(pos)
                    .and_then(|room| session.catalog.get(room.template))
                    .map(|template| room_fill(template.color))
                    .unwrap_or(CELL_EMPTY);
                draw_rectangle(px, py, self.cell_size, self.cell_size, fill);
            }
        }

        for x in 0..=grid.width {
            let px = origin.x + x as f32 * self.cell_size;
            draw_line(px, origin.y, px, origin.y + board_height, 1.0, GRID_LINE);
        }
        for y in 0..=grid.height {
            let py = origin.y + y as f32 * self.cell_size;
            draw_line(origin.x, py, origin.x + board_width, py, 1.0, GRID_LINE);
        }

        let exit = session.exit_cell();
        draw_rectangle_lines(
            origin.x + exit.x as f32 * self.cell_size + 2.0,
            origin.y + exit.y as f32 * self.cell_size + 2.0,
            self.cell_size - 4.0,
            self.cell_size - 4.0,
            3.0,
            EXIT_MARK,
        );

        // Every interior boundary is mirrored, so sweeping each cell's
        // north and west slots draws each shared door exactly once. The
        // south and east sweeps below only pick up one-sided sealed doors
        // on the outer edge.
        for y in 0..grid.height {
            for x in 0..grid.width {
                let pos = Position::new(x, y);
                let px = origin.x + x as f32 * self.cell_size;
                let py = origin.y + y as f32 * self.cell_size;
                if let Some(door) = grid.door(pos, Direction::North) {
                    self.draw_door_mark(px, py, Direction::North, door);
                }
                if let Some(door) = grid.door(pos, Direction::West) {
                    self.draw_door_mark(px, py, Direction::West, door);
                }
                if y == grid.height - 1 {
                    if let Some(door) = grid.door(pos, Direction::South) {
                        self.draw_door_mark(px, py, Direction::South, door);
                    }
                }
                if x == grid.width - 1 {
                    if let Some(door) = grid.door(pos, Direction::East) {
                        self.draw_door_mark(px, py, Direction::East, door);
                    }
                }
            }
        }

        let player_x = origin.x + session.player.x as f32 * self.cell_size + self.cell_size / 2.0;
        let player_y = origin.y + session.player.y as f32 * self.cell_size + self.cell_size / 2.0;
        draw_circle(player_x, player_y, self.cell_size * 0.28, PLAYER_COLOR);
    }

    /// Draws one door mark centered on the given edge of a cell whose
    /// top-left pixel is (`px`, `py`).
    fn draw_door_mark(&self, px: f32, py: f32, direction: Direction, door: Door) {
        let half = self.cell_size / 2.0;
        let color = door_color(door);
        match direction {
            Direction::North => draw_rectangle(px + half - 7.0, py - 3.0, 14.0, 6.0, color),
            Direction::South => {
                draw_rectangle(px + half - 7.0, py + self.cell_size - 3.0, 14.0, 6.0, color)
            }
            Direction::West => draw_rectangle(px - 3.0, py + half - 7.0, 6.0, 14.0, color),
            Direction::East => {
                draw_rectangle(px + self.cell_size - 3.0, py + half - 7.0, 6.0, 14.0, color)
            }
        }
    }

    /// Renders the resource readout above the board.
    fn render_hud(&self, session: &GameSession) {
        let inventory = &session.inventory;
        let readouts = [
            (ResourceKind::Steps, inventory.steps),
            (ResourceKind::Gold, inventory.gold),
            (ResourceKind::Gems, inventory.gems),
            (ResourceKind::Keys, inventory.keys),
            (ResourceKind::Dice, inventory.dice),
        ];
        let line = readouts
            .iter()
            .map(|(kind, amount)| format!("{} {}", amount, kind))
            .collect::<Vec<_>>()
            .join("   ");
        draw_text(
            &format!("{}   turn {}", line, session.turn),
            self.margin,
            28.0,
            20.0,
            TEXT_COLOR,
        );

        let seed_text = format!("seed {}", session.rng_seed);
        let seed_width = measure_text(&seed_text, None, 16, 1.0).width;
        draw_text(
            &seed_text,
            screen_width() - seed_width - self.margin,
            28.0,
            16.0,
            TEXT_DIM,
        );
    }

    /// Renders the message area.
    fn render_messages(&self) {
        let message_area_y = screen_height() - 64.0;
        let message_count = 3; // Show last 3 messages
        let line_height = 18.0;

        // Draw background for message area
        draw_rectangle(
            0.0,
            message_area_y - 14.0,
            screen_width(),
            78.0,
            Color::new(0.0, 0.0, 0.0, 0.6),
        );

        // Render messages
        let start_index = if self.messages.len() > message_count {
            self.messages.len() - message_count
        } else {
            0
        };

        for (i, message) in self.messages.iter().skip(start_index).enumerate() {
            let y = message_area_y + i as f32 * line_height;
            draw_text(message, 10.0, y, 16.0, TEXT_COLOR);
        }
    }

    /// Adds a message to the message history.
    pub fn add_message(&mut self, message: String) {
        self.messages.push(message);

        // Keep only the most recent messages
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }
}
