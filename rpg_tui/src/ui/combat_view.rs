//! Combat tab view

use super::{life_color, log_style, monster_color, progress_bar, section_header};
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};
use rpg_core::{BattleState, Side};

pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(50),    // Main combat area
            Constraint::Length(36), // Enemy panel
        ])
        .split(area);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Status bar
            Constraint::Min(0),    // Combat log
        ])
        .split(chunks[0]);

    draw_status_bar(f, app, main_chunks[0]);
    draw_combat_log(f, app, main_chunks[1]);
    draw_enemy_panel(f, app, chunks[1]);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let battle = app.driver.battle();
    let bar_width = area.width.saturating_sub(24);

    let (player_hp, player_max) = if battle.is_fighting() {
        (battle.player_hp(), battle.player().max_hp)
    } else {
        (app.stats.max_hp, app.stats.max_hp)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{:10}", "You"), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{:>5.0}/{:<5.0} ", player_hp.max(0.0), player_max),
            Style::default()
                .fg(life_color(player_hp, player_max))
                .add_modifier(Modifier::BOLD),
        ),
        progress_bar(player_hp, player_max, bar_width, life_color(player_hp, player_max)),
    ])];

    match battle.monster() {
        Some(monster) => lines.push(Line::from(vec![
            Span::styled(
                format!("{:10}", truncate(&monster.name, 9)),
                Style::default().fg(monster_color(monster.rarity)),
            ),
            Span::styled(
                format!("{:>5.0}/{:<5.0} ", monster.current_hp.max(0.0), monster.max_hp),
                Style::default()
                    .fg(life_color(monster.current_hp, monster.max_hp))
                    .add_modifier(Modifier::BOLD),
            ),
            progress_bar(
                monster.current_hp,
                monster.max_hp,
                bar_width,
                life_color(monster.current_hp, monster.max_hp),
            ),
        ])),
        None => lines.push(Line::from(Span::styled(
            "No enemy",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    let state = match battle.state() {
        BattleState::Idle => "Idle",
        BattleState::Fighting => "Fighting",
        BattleState::Victory => "Victory",
        BattleState::Defeat => "Defeat",
        BattleState::Fled => "Fled",
    };
    lines.push(Line::from(vec![
        Span::styled("State: ", Style::default().fg(Color::Gray)),
        Span::styled(state, Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled("Turn: ", Style::default().fg(Color::Gray)),
        Span::styled(battle.turn().to_string(), Style::default().fg(Color::White)),
        Span::raw("  "),
        Span::styled("Stance: ", Style::default().fg(Color::Gray)),
        Span::styled(format!("{:?}", app.stance), Style::default().fg(Color::Yellow)),
    ]));

    let mut queue = vec![Span::styled("Next: ", Style::default().fg(Color::Gray))];
    for side in battle.queue().iter().take(12) {
        queue.push(match side {
            Side::Player => Span::styled("▲", Style::default().fg(Color::Green)),
            Side::Enemy => Span::styled("▼", Style::default().fg(Color::Red)),
        });
    }
    lines.push(Line::from(queue));

    let mut effects = vec![Span::styled("Effects: ", Style::default().fg(Color::Gray))];
    for effect in battle.effects().iter() {
        let color = match effect.target {
            Side::Player => Color::Cyan,
            Side::Enemy => Color::Magenta,
        };
        effects.push(Span::styled(
            format!("{}×{}({}) ", effect.kind.label(), effect.stacks, effect.duration),
            Style::default().fg(color),
        ));
    }
    lines.push(Line::from(effects));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Combat Status "));

    f.render_widget(paragraph, area);
}

fn draw_combat_log(f: &mut Frame, app: &App, area: Rect) {
    let height = area.height.saturating_sub(2) as usize;
    let end = app.log.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(height);

    let items: Vec<ListItem> = app.log[start..end]
        .iter()
        .map(|line| {
            ListItem::new(Line::from(Span::styled(
                line.message.clone(),
                log_style(line.category),
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Combat Log (↑/↓ to scroll) "),
    );

    f.render_widget(list, area);
}

fn draw_enemy_panel(f: &mut Frame, app: &App, area: Rect) {
    let Some(monster) = app.driver.battle().monster() else {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Press [n] to find a fight",
            Style::default().fg(Color::DarkGray),
        )))
        .block(Block::default().borders(Borders::ALL).title(" Enemy "));
        f.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", monster.icon, monster.name),
            Style::default()
                .fg(monster_color(monster.rarity))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("Level {} {}", monster.level, monster.rarity),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        super::stat_line("Damage", monster.damage),
        super::stat_line("Armor", monster.armor),
        super::stat_line("Crit %", monster.crit_chance),
    ];

    if !monster.maledicts.is_empty() {
        lines.push(Line::from(""));
        lines.push(section_header("Maledicts"));
        for affix in &monster.maledicts {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", affix.name()),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(affix.description(), Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Enemy "))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
