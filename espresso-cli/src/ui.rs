//! Terminal UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use espresso_core::cursor::display_column;
use espresso_core::{App, Field, Focus, LineIndex, Mode};

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const GREEN: Color = Color::Rgb(166, 227, 161);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const PEACH: Color = Color::Rgb(250, 179, 135);

const SIDEBAR_WIDTH: u16 = 30;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    // Draw popups/overlays
    match app.mode {
        Mode::ConfirmDelete => draw_delete_dialog(frame, app),
        Mode::Help => draw_help(frame),
        Mode::Normal => {}
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.store().notes().len();
    let current = app.store().selected_index().map_or(0, |i| i + 1);

    let title_text = format!(" espresso [{}/{}]", current, count);
    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH), // Sidebar
            Constraint::Min(0),                // Editor
        ])
        .split(area);

    draw_sidebar(frame, app, chunks[0]);
    if app.store().selected().is_some() {
        draw_editor(frame, app, chunks[1]);
    } else {
        draw_empty_state(frame, chunks[1]);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    }
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let notes = app.store().notes();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(app.focus == Focus::Sidebar))
        .title(format!("Notes ({})", notes.len()));

    let selected = app.store().selected_index();
    let items: Vec<ListItem> = notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            let active = Some(i) == selected;
            let marker = if active { ">" } else { " " };
            let style = if active {
                Style::default().fg(TEXT).bg(SURFACE1)
            } else if note.title.is_empty() {
                Style::default().fg(SUBTEXT0)
            } else {
                Style::default().fg(TEXT)
            };
            ListItem::new(format!("{} {}", marker, note.display_title())).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title field
            Constraint::Length(1), // Last updated
            Constraint::Min(0),    // Content field
        ])
        .split(area);

    let editing = app.focus == Focus::Editor && app.mode == Mode::Normal;

    // Title
    let title_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(editing && app.field() == Field::Title))
        .title("Title");
    let title_inner = title_block.inner(chunks[0]);
    frame.render_widget(title_block, chunks[0]);

    let title = app.field_text(Field::Title);
    let title_line = if title.is_empty() {
        Line::from(Span::styled("Untitled", Style::default().fg(SUBTEXT0)))
    } else {
        Line::from(Span::styled(title, Style::default().fg(TEXT).add_modifier(Modifier::BOLD)))
    };
    let title_focused = editing && app.field() == Field::Title;
    let caret = caret_cell(app);
    let title_scroll_x = if title_focused {
        scroll_to_fit(caret.1, title_inner.width as usize)
    } else {
        0
    };
    frame.render_widget(
        Paragraph::new(title_line).scroll((0, title_scroll_x as u16)),
        title_inner,
    );

    // Last updated
    let label = app.last_updated_label().unwrap_or_default();
    let date_area = Rect {
        x: chunks[1].x + 1,
        width: chunks[1].width.saturating_sub(1),
        ..chunks[1]
    };
    frame.render_widget(
        Paragraph::new(label).style(Style::default().fg(SUBTEXT0)),
        date_area,
    );

    // Content
    let content_block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_style(editing && app.field() == Field::Content))
        .title("Content");
    let content_inner = content_block.inner(chunks[2]);
    frame.render_widget(content_block, chunks[2]);

    let content = app.field_text(Field::Content);

    // Keep the caret inside the content box
    let (scroll_y, content_scroll_x) = if app.field() == Field::Content {
        (
            scroll_to_fit(caret.0, content_inner.height as usize),
            scroll_to_fit(caret.1, content_inner.width as usize),
        )
    } else {
        (0, 0)
    };

    if content.is_empty() {
        let placeholder =
            Paragraph::new("Type here to begin...").style(Style::default().fg(SUBTEXT0));
        frame.render_widget(placeholder, content_inner);
    } else {
        let lines: Vec<Line> = content
            .split('\n')
            .map(|l| Line::from(Span::styled(l, Style::default().fg(TEXT))))
            .collect();
        let paragraph =
            Paragraph::new(lines).scroll((scroll_y as u16, content_scroll_x as u16));
        frame.render_widget(paragraph, content_inner);
    }

    if !editing {
        return;
    }
    let (row, col) = caret;
    let (target, scroll_y, scroll_x) = match app.field() {
        Field::Title => (title_inner, 0, title_scroll_x),
        Field::Content => (content_inner, scroll_y, content_scroll_x),
    };
    let row = row.saturating_sub(scroll_y) as u16;
    let col = col.saturating_sub(scroll_x) as u16;
    if row < target.height && col < target.width {
        frame.set_cursor_position((target.x + col, target.y + row));
    }
}

/// Offset that keeps `pos` inside a window of `extent` cells
fn scroll_to_fit(pos: usize, extent: usize) -> usize {
    if extent == 0 || pos < extent {
        0
    } else {
        pos - extent + 1
    }
}

/// Row and char column of the caret within the focused field
fn caret_cell(app: &App) -> (usize, usize) {
    let editor = app.editor();
    let index = LineIndex::new(editor.text());
    let (row, col) = index.offset_to_position(editor.cursor_end());
    let line = editor.slice(index.line_range(row));
    (row, display_column(line, col))
}

fn draw_empty_state(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key = |k: &'static str| Span::styled(k, Style::default().fg(PEACH));
    let text = vec![
        Line::from("Start by creating a new note or selecting an existing one."),
        Line::from(""),
        Line::from("You can also use shortcuts to help you speed up your workflow."),
        Line::from(vec![Span::raw("Press "), key("Ctrl + N"), Span::raw(" to create a new note")]),
        Line::from(vec![Span::raw("Press "), key("Ctrl + D"), Span::raw(" to delete a note")]),
        Line::from(vec![Span::raw("Press "), key("F1"), Span::raw(" to see every shortcut")]),
    ];

    frame.render_widget(Paragraph::new(text).style(Style::default().fg(TEXT)), inner);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => match (app.focus, app.field()) {
            (Focus::Sidebar, _) => "NOTES",
            (Focus::Editor, Field::Title) => "TITLE",
            (Focus::Editor, Field::Content) => "CONTENT",
        },
        Mode::ConfirmDelete => "DELETE",
        Mode::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = "^N new | ^D delete | Tab focus | F1 help | ^Q quit";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_delete_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(50, 6, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(RED))
        .title("Delete note");

    let title = app
        .pending_delete()
        .and_then(|id| app.store().get(id))
        .map(|n| n.display_title().to_string())
        .unwrap_or_default();

    let text = vec![
        Line::from("Are you sure you want to delete this note?"),
        Line::from(Span::styled(title, Style::default().fg(MAUVE))),
        Line::from(vec![
            Span::styled("y", Style::default().fg(RED).add_modifier(Modifier::BOLD)),
            Span::raw(" Yup!    "),
            Span::styled("n", Style::default().fg(GREEN).add_modifier(Modifier::BOLD)),
            Span::raw(" Wait, never mind."),
        ]),
    ];

    let paragraph = Paragraph::new(text).block(block).style(Style::default().fg(TEXT));
    frame.render_widget(paragraph, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = |s: &'static str| {
        Line::from(Span::styled(s, Style::default().fg(MAUVE).add_modifier(Modifier::BOLD)))
    };

    let help_text = vec![
        heading("Notes"),
        Line::from("  Ctrl+N       New note"),
        Line::from("  Ctrl+D       Delete selected note"),
        Line::from("  j/k, Up/Dn   Move through the list (sidebar)"),
        Line::from("  Esc          Deselect (sidebar) / back to list"),
        Line::from("  Tab          Toggle list/editor"),
        Line::from(""),
        heading("Editing"),
        Line::from("  Shift+Tab    Switch title/content"),
        Line::from("  Enter        Title: jump to content"),
        Line::from("  * + Space    Start a bullet list"),
        Line::from("  Enter        Continue list; twice to end it"),
        Line::from(""),
        heading("App"),
        Line::from("  F1           This help"),
        Line::from("  Ctrl+Q       Quit"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
