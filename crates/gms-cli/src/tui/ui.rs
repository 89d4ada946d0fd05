//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};

use gms_core::list_view::{BannerKind, ResourceApi};
use gms_db::models::{Garden, Plant};

use super::app::{App, Tab};
use crate::list_cmds::Columns;

/// Render the whole dashboard.
pub fn render<A>(f: &mut Frame, app: &App<A>)
where
    A: ResourceApi<Garden> + ResourceApi<Plant>,
{
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Min(3),    // list
            Constraint::Length(1), // banner
            Constraint::Length(1), // key hints
        ])
        .split(f.area());

    render_tabs(f, app.tab, chunks[0]);

    if app.show_help {
        render_help(f, chunks[1]);
    } else {
        match app.tab {
            Tab::Gardens => render_table(f, app.gardens.items(), app.selected_garden, " Gardens ", chunks[1]),
            Tab::Plants => render_table(f, app.plants.items(), app.selected_plant, " Plants ", chunks[1]),
        }
    }

    render_banner(f, app, chunks[2]);
    render_hints(f, chunks[3]);

    if app.confirming {
        render_confirm(f, &app.confirm_question());
    }
}

fn render_tabs(f: &mut Frame, current: Tab, area: Rect) {
    let selected = match current {
        Tab::Gardens => 0,
        Tab::Plants => 1,
    };
    let tabs = Tabs::new([Tab::Gardens.title(), Tab::Plants.title()])
        .select(selected)
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, area);
}

fn render_table<R: Columns>(f: &mut Frame, items: &[R], selected: usize, title: &str, area: Rect) {
    let header_cells = R::HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = items.iter().enumerate().map(|(i, item)| {
        let style = if i == selected {
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Row::new(item.cells().into_iter().map(Cell::from)).style(style)
    });

    let widths = vec![Constraint::Fill(1); R::HEADERS.len()];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()));

    f.render_widget(table, area);
}

fn render_banner<A>(f: &mut Frame, app: &App<A>, area: Rect)
where
    A: ResourceApi<Garden> + ResourceApi<Plant>,
{
    let line = match app.banner() {
        Some(banner) => {
            let color = match banner.kind {
                BannerKind::Success => Color::Green,
                BannerKind::Error => Color::Red,
            };
            Line::from(Span::styled(format!(" {}", banner.message), Style::default().fg(color)))
        }
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_hints(f: &mut Frame, area: Rect) {
    let bar = Line::from(vec![
        Span::styled(" gms ", Style::default().bg(Color::Blue).fg(Color::White)),
        Span::raw("  q:quit  Tab:switch  j/k:move  d:delete  r:reload  ?:help"),
    ]);
    f.render_widget(Paragraph::new(bar), area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("  Navigation", heading)),
        Line::from("    j/Down    Move down"),
        Line::from("    k/Up      Move up"),
        Line::from("    Tab       Switch Gardens / Plants"),
        Line::from("    Esc/q     Close help / Quit"),
        Line::from(""),
        Line::from(Span::styled("  Actions", heading)),
        Line::from("    d         Delete selected (asks y/n)"),
        Line::from("    r         Reload both lists"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn render_confirm(f: &mut Frame, question: &str) {
    let width = (question.len() as u16 + 6).min(f.area().width);
    let area = centered(f.area(), width, 4);
    let text = vec![
        Line::from(format!(" {question}")),
        Line::from(Span::styled(" y: yes   n: no", Style::default().fg(Color::DarkGray))),
    ];
    let modal = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Confirm ")
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
