//! Espresso CLI - Terminal note-taking tool

mod io;
mod store;
mod ui;

use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{
        self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use espresso_core::{App, EditKey, Focus, Mode, NoteStore};

use crate::store::JsonFileGateway;

/// How long to wait for input before checking on background writes
const TICK: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let config_dir = io::default_dir()?;
    let config = io::load_config(&config_dir)?;
    let data_dir = io::data_dir(&config_dir, &config)?;
    io::init_logging(&data_dir)?;
    log::info!("Starting espresso in {}", data_dir.display());

    let gateway = Arc::new(JsonFileGateway::new(data_dir.join(io::NOTES_FILE)));
    log::debug!("Notes file: {}", gateway.path().display());
    let store = NoteStore::load(gateway, &config.sync)
        .with_context(|| format!("Failed to load notes from {}", data_dir.display()))?;
    let mut app = App::new(store, &config.sync);

    let res = {
        let _screen = TerminalGuard::enter()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        run_app(&mut terminal, &mut app)
    };

    // An error exit still gets its pending writes out
    if app.running {
        app.quit();
    }

    if let Err(e) = res {
        log::error!("Exited with error: {:#}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("espresso exited");
    Ok(())
}

/// Raw mode, the alternate screen and bracketed paste, held once for the
/// whole session and restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Clear status on any key
                    app.clear_status();
                    handle_key(app, key);
                }
                Event::Paste(text) => {
                    if app.focus == Focus::Editor && app.mode == Mode::Normal {
                        app.insert_text(&text);
                    }
                }
                _ => {}
            }
        }

        app.poll_sync();
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::Help => {
            app.mode = Mode::Normal;
            return;
        }
        Mode::ConfirmDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            return;
        }
        Mode::Normal => {}
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') if ctrl => app.quit(),
        KeyCode::Char('n') if ctrl => app.create_note(),
        KeyCode::Char('d') | KeyCode::Backspace | KeyCode::Delete if ctrl => app.request_delete(),
        KeyCode::F(1) => app.mode = Mode::Help,
        KeyCode::Tab => app.toggle_focus(),
        _ => match app.focus {
            Focus::Sidebar => handle_sidebar(app, key.code),
            Focus::Editor => handle_editor(app, key),
        },
    }
}

fn handle_sidebar(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter | KeyCode::Right => {
            if app.store().selected_id().is_some() {
                app.focus = Focus::Editor;
            }
        }
        KeyCode::Esc => app.clear_selection(),
        _ => {}
    }
}

fn handle_editor(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Sidebar,
        KeyCode::BackTab => app.toggle_field(),
        _ => {
            if let Some(edit) = edit_key(key) {
                app.handle_key(edit);
            }
        }
    }
}

/// Translate a terminal key into a text field keystroke
fn edit_key(key: KeyEvent) -> Option<EditKey> {
    let chord = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    Some(match key.code {
        KeyCode::Char(c) if !chord => EditKey::Char(c),
        KeyCode::Enter => EditKey::Enter,
        KeyCode::Backspace => EditKey::Backspace,
        KeyCode::Delete => EditKey::Delete,
        KeyCode::Left => EditKey::Left,
        KeyCode::Right => EditKey::Right,
        KeyCode::Up => EditKey::Up,
        KeyCode::Down => EditKey::Down,
        KeyCode::Home => EditKey::Home,
        KeyCode::End => EditKey::End,
        _ => return None,
    })
}
