//! Equipment tab view

use super::{rarity_color, section_header};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use rpg_core::loot::calculate_item_value;
use rpg_core::{EquipmentSlot, Item};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    // Slots, inventory, preview
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
        ])
        .split(area);

    draw_equipment_slots(f, app, chunks[0]);
    draw_inventory(f, app, chunks[1]);
    draw_preview(f, app, chunks[2]);
}

fn draw_equipment_slots(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = vec![];

    for slot in EquipmentSlot::all() {
        match app.character.equipment.get(slot) {
            Some(item) => lines.push(Line::from(vec![
                Span::styled(format!("{:12}", slot.name()), Style::default().fg(Color::Gray)),
                Span::styled(item.display_name(), Style::default().fg(rarity_color(item.rarity))),
            ])),
            None => lines.push(Line::from(vec![
                Span::styled(format!("{:12}", slot.name()), Style::default().fg(Color::Gray)),
                Span::styled("(empty)", Style::default().fg(Color::DarkGray)),
            ])),
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Equipped "));
    f.render_widget(paragraph, area);
}

fn draw_inventory(f: &mut Frame, app: &App, area: Rect) {
    let inventory = &app.character.inventory;
    let mut lines: Vec<Line> = vec![];

    if inventory.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Nothing yet. Win fights to find loot.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, item) in inventory.iter().enumerate() {
        let (prefix, style) = if i == app.selected_item {
            ("> ", Style::default().add_modifier(Modifier::BOLD))
        } else {
            ("  ", Style::default())
        };
        lines.push(Line::from(vec![
            Span::styled(prefix, Style::default().fg(Color::Yellow)),
            Span::styled(format!("{} ", item.icon), style),
            Span::styled(item.display_name(), style.fg(rarity_color(item.rarity))),
        ]));
    }

    let title = format!(
        " Inventory {}/{} ",
        inventory.len(),
        app.character.inventory_capacity
    );
    let paragraph = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn draw_preview(f: &mut Frame, app: &App, area: Rect) {
    let lines = match app.character.inventory.get(app.selected_item) {
        Some(item) => item_lines(app, item),
        None => vec![Line::from(Span::styled(
            "No item selected",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Preview "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn item_lines<'a>(app: &App, item: &'a Item) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            item.display_name(),
            Style::default()
                .fg(rarity_color(item.rarity))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {} │ ilvl {}", item.rarity, item.slot.name(), item.item_level),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    if item.identified {
        for stat in item.visible_stats() {
            let suffix = if stat.stat.is_percent() { "%" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("+{}{} ", stat.value, suffix), Style::default().fg(Color::Green)),
                Span::styled(stat.stat.label(), Style::default().fg(Color::White)),
            ]));
        }
        if let Some(flavor) = &item.flavor {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                flavor.as_str(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Unidentified. Press [i] to reveal it.",
            Style::default().fg(Color::Magenta),
        )));
    }

    if let Some(current) = app.character.equipment.get(&item.slot) {
        lines.push(Line::from(""));
        lines.push(section_header("Replaces"));
        lines.push(Line::from(Span::styled(
            current.display_name(),
            Style::default().fg(rarity_color(current.rarity)),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Sells for {} gold", calculate_item_value(item, &app.tables.items)),
        Style::default().fg(Color::Yellow),
    )));
    lines
}
