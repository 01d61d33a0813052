//! # User Interface Elements
//!
//! Overlay widgets drawn on top of the board: the draft hand, shop offer
//! lists, and the end-of-run banners.

use crate::game::{EndChoice, GamePhase, GameSession, Price};
use crate::rendering::display::room_fill;
use macroquad::prelude::*;

const BACKDROP: Color = Color::new(0.0, 0.0, 0.0, 0.6);

fn draw_text_centered(text: &str, y: f32, font_size: u16, color: Color) {
    let width = measure_text(text, None, font_size, 1.0).width;
    draw_text(text, (screen_width() - width) / 2.0, y, f32::from(font_size), color);
}

/// Overlay widgets for the draft, shop, and ending screens.
pub struct UI;

impl Default for UI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI {
    /// Creates a new UI instance.
    pub fn new() -> Self {
        Self
    }

    /// Renders the draft hand as a row of cards, selection highlighted.
    pub fn render_draft(&self, session: &GameSession) {
        let Some(draw) = &session.draw else { return };

        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), BACKDROP);

        let card_width = 180.0;
        let card_height = 150.0;
        let gap = 16.0;
        let count = draw.candidates.len().max(1) as f32;
        let total_width = count * card_width + (count - 1.0) * gap;
        let x0 = (screen_width() - total_width) / 2.0;
        let y0 = (screen_height() - card_height) / 2.0 - 40.0;

        draw_text_centered("Choose a blueprint", y0 - 24.0, 22, WHITE);

        for (i, id) in draw.candidates.iter().enumerate() {
            let Some(template) = session.catalog.get(*id) else {
                continue;
            };
            let x = x0 + i as f32 * (card_width + gap);
            draw_rectangle(x, y0, card_width, card_height, room_fill(template.color));
            if i == draw.selected {
                draw_rectangle_lines(
                    x - 3.0,
                    y0 - 3.0,
                    card_width + 6.0,
                    card_height + 6.0,
                    3.0,
                    WHITE,
                );
            } else {
                draw_rectangle_lines(x, y0, card_width, card_height, 1.0, GRAY);
            }

            let line_height = 22.0;
            let mut line_y = y0 + 28.0;
            draw_text(&template.name, x + 10.0, line_y, 16.0, WHITE);
            line_y += line_height;
            draw_text(
                &format!("doors {}", template.shape.exit_letters()),
                x + 10.0,
                line_y,
                16.0,
                LIGHTGRAY,
            );
            line_y += line_height;
            draw_text(
                &format!("rarity {}", template.rarity),
                x + 10.0,
                line_y,
                16.0,
                LIGHTGRAY,
            );
            line_y += line_height;
            let (cost, cost_color) = if template.gem_cost == 0 {
                ("free".to_string(), LIGHTGRAY)
            } else if session.inventory.gems >= template.gem_cost {
                (Price::Gems(template.gem_cost).to_string(), GOLD)
            } else {
                (Price::Gems(template.gem_cost).to_string(), RED)
            };
            draw_text(&cost, x + 10.0, line_y, 16.0, cost_color);
        }

        draw_text_centered(
            "Enter: Build   Space: Reroll (1 die)   Esc: Set aside",
            y0 + card_height + 36.0,
            16,
            LIGHTGRAY,
        );
    }

    /// Renders the open shop's offers, selection highlighted.
    pub fn render_shop(&self, session: &GameSession) {
        let Some(shop) = &session.shop else { return };

        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), BACKDROP);

        let card_width = 132.0;
        let card_height = 96.0;
        let gap = 10.0;
        let count = shop.offers.len().max(1) as f32;
        let total_width = count * card_width + (count - 1.0) * gap;
        let x0 = (screen_width() - total_width) / 2.0;
        let y0 = (screen_height() - card_height) / 2.0 - 30.0;

        draw_text_centered(shop.kind.name(), y0 - 24.0, 22, WHITE);

        if shop.offers.is_empty() {
            draw_text_centered("nothing left on the shelves", y0 + 40.0, 16, LIGHTGRAY);
        }

        for (i, offer) in shop.offers.iter().enumerate() {
            let x = x0 + i as f32 * (card_width + gap);
            draw_rectangle(x, y0, card_width, card_height, DARKGRAY);
            if i == shop.selected {
                draw_rectangle_lines(
                    x - 3.0,
                    y0 - 3.0,
                    card_width + 6.0,
                    card_height + 6.0,
                    3.0,
                    WHITE,
                );
            } else {
                draw_rectangle_lines(x, y0, card_width, card_height, 1.0, GRAY);
            }

            let affordable = match offer.price {
                Price::Gold(n) => session.inventory.gold >= n,
                Price::Gems(n) => session.inventory.gems >= n,
            };
            draw_text(offer.label, x + 8.0, y0 + 28.0, 15.0, WHITE);
            draw_text(
                &offer.price.to_string(),
                x + 8.0,
                y0 + 54.0,
                15.0,
                if affordable { GOLD } else { RED },
            );
        }

        draw_text_centered(
            "Enter: Buy   Left/Right: Browse   Esc: Leave",
            y0 + card_height + 36.0,
            16,
            LIGHTGRAY,
        );
    }

    /// Renders the victory or game-over banner with the run statistics.
    /// Game over additionally offers the replay menu.
    pub fn render_ending(&self, session: &GameSession) {
        let (title, subtitle) = match session.phase {
            GamePhase::Victory => ("Victory", "the far door opens onto daylight"),
            GamePhase::GameOver => ("Game Over", "the manor keeps you"),
            _ => return,
        };

        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), BACKDROP);

        let mut line_y = screen_height() * 0.28;
        draw_text_centered(title, line_y, 40, WHITE);
        line_y += 34.0;
        draw_text_centered(subtitle, line_y, 18, LIGHTGRAY);
        line_y += 44.0;

        let stats = &session.statistics;
        let summary = [
            format!("turns played {}", stats.turns_played),
            format!("steps taken {}", stats.steps_taken),
            format!("rooms placed {}", stats.rooms_placed),
            format!("doors unlocked {}", stats.doors_unlocked),
            format!("gold collected {}", stats.gold_collected),
        ];
        for line in &summary {
            draw_text_centered(line, line_y, 16, LIGHTGRAY);
            line_y += 22.0;
        }
        line_y += 18.0;

        if session.phase == GamePhase::GameOver {
            let options = [(EndChoice::Replay, "Replay"), (EndChoice::Quit, "Quit")];
            let box_width = 120.0;
            let box_height = 36.0;
            let gap = 24.0;
            let total_width = 2.0 * box_width + gap;
            let x0 = (screen_width() - total_width) / 2.0;
            for (i, (choice, label)) in options.iter().enumerate() {
                let x = x0 + i as f32 * (box_width + gap);
                let selected = session.end_selection == *choice;
                draw_rectangle_lines(
                    x,
                    line_y,
                    box_width,
                    box_height,
                    if selected { 3.0 } else { 1.0 },
                    if selected { GOLD } else { GRAY },
                );
                let label_width = measure_text(label, None, 18, 1.0).width;
                draw_text(
                    label,
                    x + (box_width - label_width) / 2.0,
                    line_y + 24.0,
                    18.0,
                    if selected { WHITE } else { LIGHTGRAY },
                );
            }
            line_y += box_height + 30.0;
            draw_text_centered("Enter: Choose   Left/Right: Switch", line_y, 16, LIGHTGRAY);
            line_y += 22.0;
        }

        draw_text_centered("N: New manor   Esc: Quit", line_y, 16, LIGHTGRAY);
    }
}
