use std::collections::VecDeque;

use ratatui::layout::{Constraint, Direction, Layout, Margin};
use ratatui::prelude::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use campaign_runtime::{CharacterTemplate, Field, FieldSelector, Row};
use editor_core::{EditorConfig, EditorSession, SessionStatus};

use crate::keymap::{HitMap, HitTarget};

const ROW_LABEL_WIDTH: u16 = 12;
const MIN_CELL_WIDTH: u16 = 10;
const CHARACTER_CELL_WIDTH: u16 = 22;

pub struct UiState {
    pub logs: VecDeque<String>,
    pub max_logs: usize,
    pub hits: HitMap,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            logs: VecDeque::new(),
            max_logs: 6,
            hits: HitMap::default(),
        }
    }
}

impl UiState {
    pub fn push_log<S: Into<String>>(&mut self, line: S) {
        let mut text: String = line.into();
        while text.ends_with('\n') || text.ends_with('\r') {
            text.pop();
        }
        if text.is_empty() {
            return;
        }
        self.logs.push_front(text);
        while self.logs.len() > self.max_logs {
            self.logs.pop_back();
        }
    }
}

/// Read-only view of the editor the frame is drawn from.
pub struct EditorView<'a> {
    pub session: &'a EditorSession,
    pub status: &'a SessionStatus,
    pub config: &'a EditorConfig,
}

pub fn draw_ui(frame: &mut Frame, state: &mut UiState, view: &EditorView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(Row::ALL.len() as u16 + 2),
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(state.max_logs as u16 + 2),
        ])
        .split(frame.size());

    state.hits.clear();
    draw_header(frame, chunks[0], view);
    draw_fields(frame, chunks[1], view, &mut state.hits);
    draw_characters(frame, chunks[2], view, &mut state.hits);
    draw_commands(frame, chunks[3]);
    draw_logs(frame, chunks[4], state);
}

fn inner(area: Rect) -> Rect {
    area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    })
}

fn draw_header(frame: &mut Frame, area: Rect, view: &EditorView) {
    let title = if view.session.title().is_empty() {
        "Untitled campaign".to_string()
    } else {
        view.session.title().to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let mut spans = vec![Span::raw(format!(
        "{} characters",
        view.session.len()
    ))];
    if let Some(index) = view.session.selection() {
        spans.push(Span::raw(format!(" | editing #{index}")));
    }
    if view.status.unsaved_changes {
        spans.push(Span::styled(
            " | modified",
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(hint) = view.session.cursor().field().and_then(field_hint) {
        spans.push(Span::styled(
            format!(" | {hint}"),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(Span::raw(" | Ctrl+S save, Esc to exit"));
    let text = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true });
    frame.render_widget(block, area);
    frame.render_widget(text, inner(area));
}

fn draw_fields(frame: &mut Frame, area: Rect, view: &EditorView, hits: &mut HitMap) {
    let block = Block::default().borders(Borders::ALL).title("Character");
    frame.render_widget(block, area);
    let area = inner(area);

    let Some(template) = view.session.selected() else {
        let hint = Paragraph::new("No character selected. Insert or Ctrl+N adds one.");
        frame.render_widget(hint, area);
        return;
    };

    let widest = Row::ALL.iter().map(|row| row.column_count()).max().unwrap_or(1) as u16;
    let cell_width = (area.width.saturating_sub(ROW_LABEL_WIDTH) / widest).max(MIN_CELL_WIDTH);
    let focused = view.session.cursor().selector();

    for (line_index, row) in Row::ALL.iter().enumerate() {
        let y = area.y + line_index as u16;
        if y >= area.y + area.height {
            break;
        }
        let mut spans = vec![Span::styled(
            format!("{:<width$}", row_title(*row), width = ROW_LABEL_WIDTH as usize),
            Style::default().fg(Color::Yellow),
        )];
        for (column, field) in row.fields().iter().enumerate() {
            let selector = FieldSelector::new(*row, column);
            let text = format!(
                "{:<width$}",
                field_text(*field, template, view.config),
                width = cell_width as usize
            );
            let style = if selector == focused {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else {
                Style::default()
            };
            spans.push(Span::styled(text, style));

            let x = area.x + ROW_LABEL_WIDTH + column as u16 * cell_width;
            if x < area.x + area.width {
                hits.push(
                    Rect::new(x, y, cell_width.min(area.x + area.width - x), 1),
                    HitTarget::Field(selector),
                );
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect::new(area.x, y, area.width, 1),
        );
    }
}

fn draw_characters(frame: &mut Frame, area: Rect, view: &EditorView, hits: &mut HitMap) {
    let block = Block::default().borders(Borders::ALL).title("Characters");
    frame.render_widget(block, area);
    let area = inner(area);
    if area.width == 0 || area.height == 0 {
        return;
    }

    let per_line = (area.width / CHARACTER_CELL_WIDTH).max(1) as usize;
    let visible_lines = area.height as usize;
    // keep the selected character on screen
    let first_line = view
        .session
        .selection()
        .map(|index| (index / per_line).saturating_sub(visible_lines - 1))
        .unwrap_or(0);

    for (index, template) in view.session.characters().iter().enumerate() {
        let line = index / per_line;
        if line < first_line {
            continue;
        }
        if line >= first_line + visible_lines {
            break;
        }
        let x = area.x + (index % per_line) as u16 * CHARACTER_CELL_WIDTH;
        let y = area.y + (line - first_line) as u16;
        let width = CHARACTER_CELL_WIDTH.min(area.x + area.width - x);
        let cell = Rect::new(x, y, width, 1);

        let selected = view.session.selection() == Some(index);
        let marker = if selected { '>' } else { ' ' };
        let text = format!(
            "{marker}{index:>3} {} {}hp",
            view.config.face_name(template.face),
            template.health
        );
        let style = if selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), cell);
        hits.push(cell, HitTarget::Character(index));
    }
}

fn draw_commands(frame: &mut Frame, area: Rect) {
    let key = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
    let lines = vec![
        Line::from(vec![
            key("arrows"),
            Span::raw(" move  "),
            key("PgUp/PgDn"),
            Span::raw(" change  "),
            key("Home/End"),
            Span::raw(" prev/next  "),
            key("click"),
            Span::raw(" focus and change"),
        ]),
        Line::from(vec![
            key("Ins/Del"),
            Span::raw(" insert/delete  "),
            key("Ctrl+X/C/V"),
            Span::raw(" cut/copy/paste  "),
            key("Ctrl+N"),
            Span::raw(" new"),
        ]),
    ];
    let block = Block::default().borders(Borders::ALL).title("Commands");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner(area));
}

fn draw_logs(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Logs");
    let lines: Vec<Line> = state
        .logs
        .iter()
        .map(|entry| Line::from(Span::raw(entry)))
        .collect();
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner(area));
}

fn row_title(row: Row) -> &'static str {
    match row {
        Row::Appearance => "Looks",
        Row::Attributes => "Attributes",
        Row::FlagsA => "Flags",
        Row::FlagsB => "",
        Row::Weapon => "Weapon",
    }
}

/// Tooltip for the focused field. Only traits carry one.
pub fn field_hint(field: Field) -> Option<&'static str> {
    match field {
        Field::Trait(flag) => flag.description(),
        _ => None,
    }
}

pub fn field_text(field: Field, template: &CharacterTemplate, config: &EditorConfig) -> String {
    let value = match field {
        Field::Face => config.face_name(template.face).to_string(),
        Field::Shade(slot) => config.shade_name(template.shades.get(slot)).to_string(),
        Field::Speed => format!("{}%", template.speed_percent()),
        Field::MoveChance | Field::TrackChance | Field::ShootChance => {
            format!("{}%", field.read(template))
        }
        Field::Health | Field::ActionDelay => field.read(template).to_string(),
        Field::Trait(flag) => match template.has_flag(flag) {
            true => "On".to_string(),
            false => "Off".to_string(),
        },
        Field::Gun => config.gun_name(template.gun).to_string(),
    };
    format!("{}: {}", field.label(), value)
}
