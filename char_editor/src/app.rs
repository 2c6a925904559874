use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use bevy::prelude::App;
use color_eyre::Result;
use crossterm::cursor::Show;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use tracing::{error, info, warn};

use editor_core::{
    run_frame, submit_command, EditorConfigHandle, EditorSession, SessionStatus,
};

use crate::keymap::{map_key, map_pointer, pointer_input, HostAction};
use crate::ui::{draw_ui, EditorView, UiState};

pub struct EditorHost {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ui_state: UiState,
    app: App,
    save_path: PathBuf,
    frame_interval: Duration,
    log_receiver: Receiver<String>,
}

impl EditorHost {
    pub fn new(
        app: App,
        save_path: PathBuf,
        frame_interval: Duration,
        log_receiver: Receiver<String>,
    ) -> Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        let terminal = match setup_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                if let Err(restore_err) = restore_terminal() {
                    warn!(
                        target: "char_editor::host",
                        error = %restore_err,
                        "terminal.restore_failed"
                    );
                }
                return Err(err);
            }
        };
        Ok(Self {
            terminal,
            ui_state: UiState::default(),
            app,
            save_path,
            frame_interval,
            log_receiver,
        })
    }

    /// Run until the user quits, then restore the terminal and hand the app
    /// back for shutdown.
    pub fn run(mut self) -> Result<App> {
        let result = self.event_loop();
        let restored = restore_terminal();
        result?;
        restored?;
        Ok(self.app)
    }

    fn event_loop(&mut self) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            if event::poll(self.frame_interval)? {
                match event::read()? {
                    Event::Key(key) => match map_key(key) {
                        Some(HostAction::Command(command)) => {
                            submit_command(&mut self.app, command)
                        }
                        Some(HostAction::Save) => self.save(),
                        Some(HostAction::Quit) => {
                            if self.app.world.resource::<SessionStatus>().unsaved_changes {
                                warn!(
                                    target: "char_editor::host",
                                    "editor.quit_with_unsaved_changes"
                                );
                            }
                            return Ok(());
                        }
                        None => {}
                    },
                    Event::Mouse(mouse) => {
                        let input = pointer_input(mouse.kind);
                        let target = self.ui_state.hits.hit(mouse.column, mouse.row);
                        if let (Some(input), Some(target)) = (input, target) {
                            let session = self.app.world.resource::<EditorSession>();
                            let commands = map_pointer(
                                input,
                                target,
                                session.cursor().selector(),
                                session.len(),
                            );
                            for command in commands {
                                submit_command(&mut self.app, command);
                            }
                        }
                    }
                    _ => {}
                }
            }

            run_frame(&mut self.app);

            let world = &self.app.world;
            let config = world.resource::<EditorConfigHandle>().get();
            let view = EditorView {
                session: world.resource::<EditorSession>(),
                status: world.resource::<SessionStatus>(),
                config: &config,
            };
            let ui_state = &mut self.ui_state;
            self.terminal.draw(|frame| draw_ui(frame, ui_state, &view))?;

            if let Some(remaining) = self.frame_interval.checked_sub(frame_start.elapsed()) {
                std::thread::sleep(remaining);
            }
        }
    }

    fn save(&mut self) {
        let setting = self.app.world.resource::<EditorSession>().to_setting();
        match setting.save_to_file(&self.save_path) {
            Ok(()) => {
                self.app.world.resource_mut::<SessionStatus>().mark_saved();
                info!(
                    target: "char_editor::host",
                    path = %self.save_path.display(),
                    characters = setting.characters.len(),
                    "campaign.saved"
                );
            }
            Err(err) => {
                error!(
                    target: "char_editor::host",
                    path = %self.save_path.display(),
                    error = %err,
                    "campaign.save_failed"
                );
            }
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    run_all(&mut [
        &mut || crossterm::execute!(stdout, Show),
        &mut || crossterm::execute!(std::io::stdout(), DisableMouseCapture),
        &mut crossterm::terminal::disable_raw_mode,
    ])
}

/// Run every step, then report the first failure.
fn run_all(steps: &mut [&mut dyn FnMut() -> std::io::Result<()>]) -> std::io::Result<()> {
    let mut first_error = None;
    for step in steps.iter_mut() {
        if let Err(err) = step() {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}
