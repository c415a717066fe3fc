//! Help tab view

use super::section_header;
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let combat = &app.tables.combat;

    let lines = vec![
        section_header("Navigation"),
        key_line("Tab / Shift+Tab", "Next/previous tab"),
        key_line("↑/k  ↓/j", "Navigate lists / scroll"),
        key_line("w", "Save character"),
        key_line("q / Ctrl+C", "Quit"),
        Line::from(""),
        section_header("Combat"),
        key_line("n", "Fight a new monster at your level"),
        key_line("f", "Try to flee"),
        key_line("1 / 2 / 3", "Aggressive / Balanced / Defensive stance"),
        Line::from(""),
        section_header("Character"),
        key_line("Enter (Stats)", "Spend a stat point"),
        key_line("Enter (Equip)", "Equip the selected item"),
        key_line("s / i (Equip)", "Sell / identify the selected item"),
        key_line("Enter (Skills)", "Spend a skill point"),
        key_line("Space (Skills)", "Equip or unequip a passive"),
        Line::from(""),
        section_header("Rules"),
        Line::from("  Turn order: each side acts round(agility ratio) times per batch."),
        Line::from("  Armor subtracts flat damage from each hit; a hit always deals at least 1."),
        Line::from(format!(
            "  Flee chance: {:.0}%. Chill slows agility by {:.0}% per stack.",
            combat.flee_chance * 100.0,
            (1.0 - combat.chill_agility_factor) * 100.0
        )),
        Line::from("  Equip three passives of one theme for its set bonus."),
        Line::from("  Two active set bonuses can unlock a synergy."),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:20}", key), Style::default().fg(Color::Yellow)),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}
