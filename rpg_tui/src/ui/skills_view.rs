//! Skills tab view - passive catalog and loadout

use super::{rarity_color, section_header};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use rpg_core::passive::{set_bonus, CatalogEntry};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    draw_catalog(f, app, chunks[0]);
    draw_details(f, app, chunks[1]);
}

fn draw_catalog(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let offset = app.selected_skill.saturating_sub(height.saturating_sub(1));

    let items: Vec<ListItem> = app
        .catalog
        .entries()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(i, entry)| {
            let owned = app.character.passives.iter().find(|s| s.id == entry.id);
            let equipped = app.character.equipped_skills.contains(&entry.id);

            let marker = if i == app.selected_skill { "> " } else { "  " };
            let slot = if equipped { "◆ " } else { "  " };
            let rank = match owned {
                Some(skill) => format!("{}/{}", skill.rank, skill.max_rank),
                None => "-".to_string(),
            };
            let name_style = if owned.is_some() {
                Style::default().fg(rarity_color(entry.rarity))
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(slot, Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:24}", entry.name), name_style),
                Span::styled(format!("{:12}", format!("{:?}", entry.theme)), Style::default().fg(Color::Gray)),
                Span::styled(rank, Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let title = format!(
        " Passives │ {} points │ {}/{} equipped ",
        app.character.skill_points,
        app.character.equipped_skills.len(),
        app.tables.player.max_equipped_skills
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, area);
}

fn draw_details(f: &mut Frame, app: &App, area: Rect) {
    let lines = match app.catalog.entries().get(app.selected_skill) {
        Some(entry) => entry_lines(app, entry),
        None => vec![Line::from("The catalog is empty")],
    };

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Details "))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn entry_lines<'a>(app: &App, entry: &'a CatalogEntry) -> Vec<Line<'a>> {
    let rank = app
        .character
        .passives
        .iter()
        .find(|s| s.id == entry.id)
        .map_or(0, |s| s.rank);

    let mut lines = vec![
        Line::from(Span::styled(
            entry.name.as_str(),
            Style::default()
                .fg(rarity_color(entry.rarity))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} {:?} │ max rank {}", entry.rarity, entry.theme, entry.max_rank()),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(entry.description.as_str()),
        Line::from(""),
    ];

    if let Some((stat, value)) = entry.value_at(rank.max(1)) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:+.1} ", value), Style::default().fg(Color::Green)),
            Span::styled(stat.label(), Style::default().fg(Color::White)),
        ]));
    }
    if let Some(proc) = entry.proc() {
        lines.push(Line::from(Span::styled(
            format!(
                "{:?}: {:.0}% to {:?}",
                proc.trigger,
                proc.chance_at(rank.max(1)) * 100.0,
                proc.effect
            ),
            Style::default().fg(Color::Magenta),
        )));
        if let Some(cooldown) = proc.cooldown {
            lines.push(Line::from(Span::styled(
                format!("Cooldown: {cooldown} turns"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    if let Some(requires) = &entry.requires {
        lines.push(Line::from(Span::styled(
            format!("Requires: {requires}"),
            Style::default().fg(Color::Red),
        )));
    }

    if let Some(bonus) = set_bonus(entry.theme) {
        let equipped = app
            .character
            .passives
            .iter()
            .filter(|s| s.theme == entry.theme && app.character.equipped_skills.contains(&s.id))
            .count();
        lines.push(Line::from(""));
        lines.push(section_header(bonus.name));
        lines.push(Line::from(Span::styled(
            format!("{}/{} {:?} skills equipped", equipped, bonus.required, entry.theme),
            Style::default().fg(if equipped >= bonus.required {
                Color::Green
            } else {
                Color::DarkGray
            }),
        )));
    }

    lines
}
