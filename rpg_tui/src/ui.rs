//! UI rendering

mod combat_view;
mod equipment_view;
mod help_view;
mod skills_view;
mod stat_view;

use crate::app::{App, Tab};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use rpg_core::{LogCategory, MonsterRarity, Rarity};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Keybindings footer
        ])
        .split(f.area());

    draw_tabs(f, app, chunks[0]);

    match app.current_tab {
        Tab::Stats => stat_view::draw(f, app, chunks[1]),
        Tab::Equipment => equipment_view::draw(f, app, chunks[1]),
        Tab::Combat => combat_view::draw(f, app, chunks[1]),
        Tab::Skills => skills_view::draw(f, app, chunks[1]),
        Tab::Help => help_view::draw(f, app, chunks[1]),
    }

    draw_keybindings(f, app, chunks[2]);
}

fn draw_keybindings(f: &mut Frame, app: &App, area: Rect) {
    let common_keys = [("Tab", "Next tab"), ("w", "Save"), ("q", "Quit")];

    let tab_keys: Vec<(&str, &str)> = match app.current_tab {
        Tab::Stats => vec![("↑/↓", "Select"), ("Enter", "Spend point")],
        Tab::Equipment => vec![
            ("↑/↓", "Select"),
            ("Enter", "Equip"),
            ("s", "Sell"),
            ("i", "Identify"),
        ],
        Tab::Combat => vec![
            ("n", "Fight"),
            ("f", "Flee"),
            ("1/2/3", "Stance"),
            ("↑/↓", "Scroll log"),
        ],
        Tab::Skills => vec![
            ("↑/↓", "Select"),
            ("Enter", "Spend point"),
            ("Space", "Equip/unequip"),
        ],
        Tab::Help => vec![],
    };

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut spans = key_spans(&tab_keys, key_style, Style::default().fg(Color::White));
    if !spans.is_empty() {
        spans.push(divider());
    }
    spans.extend(key_spans(
        &common_keys,
        Style::default().fg(Color::Cyan),
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(" Keys "))
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn divider() -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(Color::DarkGray))
}

fn key_spans(keys: &[(&str, &str)], key_style: Style, desc_style: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(divider());
        }
        spans.push(Span::styled(format!("[{key}]"), key_style));
        spans.push(Span::styled(format!(" {desc}"), desc_style));
    }
    spans
}

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .map(|t| {
            let style = if *t == app.current_tab {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(t.name(), style))
        })
        .collect();

    let title = format!(
        " Level {} │ {} gold │ {}W/{}L ",
        app.character.level, app.character.gold, app.wins, app.losses
    );
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider("|");

    f.render_widget(tabs, area);
}

pub fn progress_bar(current: f64, max: f64, width: u16, filled_color: Color) -> Span<'static> {
    let percent = if max > 0.0 { (current / max).clamp(0.0, 1.0) } else { 0.0 };
    let filled = (percent * width as f64) as usize;
    let empty = (width as usize).saturating_sub(filled);

    Span::styled(
        format!("{}{}", "█".repeat(filled), "░".repeat(empty)),
        Style::default().fg(filled_color),
    )
}

pub fn life_color(current: f64, max: f64) -> Color {
    let percent = if max > 0.0 { current / max * 100.0 } else { 0.0 };
    if percent > 50.0 {
        Color::Green
    } else if percent > 25.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn stat_line(name: &str, value: f64) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:20}", name), Style::default().fg(Color::Gray)),
        Span::styled(format!("{:.1}", value), Style::default().fg(Color::White)),
    ])
}

/// Highlights values that differ from their base
pub fn stat_line_with_computed(name: &str, base: f64, computed: f64) -> Line<'static> {
    if (base - computed).abs() < 0.1 {
        stat_line(name, computed)
    } else {
        Line::from(vec![
            Span::styled(format!("{:20}", name), Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.1}", computed), Style::default().fg(Color::Green)),
            Span::styled(
                format!(" (base: {:.1})", base),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    }
}

pub fn section_header(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("═══ {} ═══", title),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

pub fn rarity_color(rarity: Rarity) -> Color {
    match rarity {
        Rarity::Common => Color::White,
        Rarity::Magic => Color::Blue,
        Rarity::Rare => Color::Yellow,
        Rarity::Unique => Color::Rgb(175, 96, 37),
    }
}

pub fn monster_color(rarity: MonsterRarity) -> Color {
    match rarity {
        MonsterRarity::Common => Color::White,
        MonsterRarity::Uncommon => Color::Green,
        MonsterRarity::Rare => Color::Blue,
        MonsterRarity::Elite => Color::Yellow,
        MonsterRarity::Legendary => Color::Magenta,
        MonsterRarity::Unique => Color::Red,
    }
}

pub fn log_style(category: LogCategory) -> Style {
    match category {
        LogCategory::Combat => Style::default().fg(Color::White),
        LogCategory::System => Style::default().fg(Color::DarkGray),
        LogCategory::Narrative => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::ITALIC),
        LogCategory::Loot => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    }
}
