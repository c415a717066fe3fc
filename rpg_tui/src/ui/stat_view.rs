//! Stats tab view

use super::{section_header, stat_line, stat_line_with_computed};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rpg_core::Attribute;

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    draw_attributes(f, app, chunks[0]);
    draw_derived(f, app, chunks[1]);
}

fn draw_attributes(f: &mut Frame, app: &App, area: Rect) {
    let character = &app.character;
    let stats = &app.stats;
    let xp_needed = character.xp_to_next_level(&app.tables.player);

    let mut lines = vec![
        section_header("Progress"),
        stat_line("Level", character.level as f64),
        Line::from(vec![
            Span::styled(format!("{:20}", "Experience"), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/{}", character.xp, xp_needed),
                Style::default().fg(Color::White),
            ),
        ]),
        stat_line("Stat points", character.stat_points as f64),
        stat_line("Skill points", character.skill_points as f64),
        Line::from(""),
        section_header("Attributes"),
    ];

    for (i, attribute) in Attribute::all().iter().enumerate() {
        let base = character.attributes.get(*attribute);
        let computed = match attribute {
            Attribute::Strength => stats.strength,
            Attribute::Dexterity => stats.dexterity,
            Attribute::Intelligence => stats.intelligence,
            Attribute::Vitality => stats.vitality,
        };
        let marker = if i == app.selected_attribute { "> " } else { "  " };
        let mut line = stat_line_with_computed(&format!("{:?}", attribute), base, computed);
        line.spans.insert(
            0,
            Span::styled(marker, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        );
        lines.push(line);
    }

    if !character.active_effects.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Effects"));
        for effect in &character.active_effects {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} ({:+.0} {}, {} battles)",
                    effect.name,
                    effect.value,
                    effect.stat.label(),
                    effect.battles_remaining
                ),
                Style::default().fg(if effect.value < 0.0 { Color::Red } else { Color::Green }),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Character "));
    f.render_widget(paragraph, area);
}

fn draw_derived(f: &mut Frame, app: &App, area: Rect) {
    let stats = &app.stats;

    let mut lines = vec![
        section_header("Combat"),
        stat_line("Max HP", stats.max_hp),
        stat_line("Damage", stats.damage),
        stat_line("Armor", stats.armor),
        stat_line("Attack speed", stats.attack_speed),
        stat_line("Crit %", stats.crit_chance),
        stat_line("Dodge %", stats.dodge_chance),
        stat_line("Life steal %", stats.life_steal),
        stat_line("Magic find %", stats.magic_find),
    ];

    if !stats.active_set_bonuses.is_empty() || !stats.active_synergies.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Bonuses"));
        for theme in &stats.active_set_bonuses {
            lines.push(Line::from(Span::styled(
                format!("{:?} set", theme),
                Style::default().fg(Color::Green),
            )));
        }
        for synergy in &stats.active_synergies {
            lines.push(Line::from(Span::styled(
                synergy.clone(),
                Style::default().fg(Color::Magenta),
            )));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Derived "));
    f.render_widget(paragraph, area);
}
