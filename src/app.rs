use std::fs::File;
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;

use crate::config::{Variant, LOG_FILE};
use crate::render;
use crate::simulation::{SimulationState, Speed};

/// Pending events beyond which timer ticks are dropped instead of queued
const EVENT_QUEUE_DEPTH: usize = 64;

/// Messages posted to the frame loop by the timer and input threads
#[derive(Debug)]
pub enum AppEvent {
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
    InputError(io::Error),
}

/// Action bound to a key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Quit,
    Faster,
    Slower,
    AddBall,
    RemoveBall,
}

/// Map a key press to the command it triggers in `variant`, if any
pub fn command_for(variant: Variant, key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Up if variant.speed_control() => Some(Command::Faster),
        KeyCode::Down if variant.speed_control() => Some(Command::Slower),
        KeyCode::Char('+') if variant.multi_ball() => Some(Command::AddBall),
        KeyCode::Char('-') if variant.multi_ball() => Some(Command::RemoveBall),
        _ => None,
    }
}

/// Application state
pub struct App {
    state: SimulationState,
}

impl App {
    pub fn new(state: SimulationState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn speed(&self) -> Arc<Speed> {
        Arc::clone(self.state.speed())
    }

    /// Apply a key press. Returns true when the animation should stop.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let Some(command) = command_for(self.state.variant(), key) else {
            return false;
        };

        match command {
            Command::Quit => {
                log::info!("Quit requested, exiting...");
                return true;
            }
            Command::Faster => {
                let ms = self.state.speed().faster();
                log::info!("Speed: {}ms", ms);
            }
            Command::Slower => {
                let ms = self.state.speed().slower();
                log::info!("Speed: {}ms", ms);
            }
            Command::AddBall => {
                if self.state.add_entity() {
                    log::info!("Balls: {}", self.state.population().active_count());
                } else {
                    log::debug!("Population full, ignoring add");
                }
            }
            Command::RemoveBall => {
                if self.state.remove_entity() {
                    log::info!("Balls: {}", self.state.population().active_count());
                } else {
                    log::debug!("Last ball cannot be removed");
                }
            }
        }

        false
    }

    /// Draw one frame onto `terminal`
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        terminal
            .draw(|frame| render::draw(frame, &mut self.state))
            .context("failed to draw frame")?;
        Ok(())
    }
}

/// Send logs to [`LOG_FILE`] when `RUST_LOG` is set; the terminal is taken
/// over by the animation so nothing may go to stderr.
pub fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    match File::create(LOG_FILE) {
        Ok(file) => {
            let _ = env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(err) => eprintln!("failed to create {}: {}", LOG_FILE, err),
    }
}

/// Run `variant` in the terminal until Escape is pressed
pub fn run(variant: Variant) -> Result<()> {
    log::info!("Starting {} bouncing ball", variant.name());

    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("failed to enter alternate screen");
    }

    let backend = CrosstermBackend::new(stdout);
    let result = Terminal::new(backend)
        .context("failed to build terminal backend")
        .and_then(|mut terminal| {
            terminal.hide_cursor().ok();
            let result = run_event_loop(&mut terminal, App::new(SimulationState::new(variant)));
            terminal.show_cursor().ok();
            result
        });

    if let Err(err) = disable_raw_mode() {
        log::error!("failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen) {
        log::error!("failed to leave alternate screen: {}", err);
    }

    log::info!("Stopped");
    result
}

fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mut app: App) -> Result<()> {
    let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_DEPTH);
    spawn_frame_timer(app.speed(), tx.clone())?;
    spawn_input_reader(tx)?;

    app.draw(terminal)?;
    drive(terminal, &mut app, &rx)
}

/// Consume events until Escape or until every sender is gone
pub fn drive<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &Receiver<AppEvent>,
) -> Result<()> {
    for event in events.iter() {
        match event {
            AppEvent::Tick => app.draw(terminal)?,
            AppEvent::Key(key) => {
                if app.handle_key(key) {
                    break;
                }
            }
            AppEvent::Resize(width, height) => {
                log::debug!("Terminal resized to {}x{}", width, height);
            }
            AppEvent::InputError(err) => {
                return Err(err).context("failed to read terminal event");
            }
        }
    }
    Ok(())
}

/// Post a tick every `speed` milliseconds, re-reading the speed each time.
/// Ticks are dropped while the frame loop is behind.
fn spawn_frame_timer(speed: Arc<Speed>, tx: SyncSender<AppEvent>) -> Result<()> {
    thread::Builder::new()
        .name("frame-timer".into())
        .spawn(move || loop {
            thread::sleep(speed.interval());
            match tx.try_send(AppEvent::Tick) {
                Ok(()) | Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Disconnected(_)) => break,
            }
        })
        .context("failed to spawn frame timer")?;
    Ok(())
}

fn spawn_input_reader(tx: SyncSender<AppEvent>) -> Result<()> {
    thread::Builder::new()
        .name("input".into())
        .spawn(move || loop {
            let event = match event::read() {
                Ok(Event::Key(key)) => AppEvent::Key(key),
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(_) => continue,
                Err(err) => {
                    let _ = tx.send(AppEvent::InputError(err));
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        })
        .context("failed to spawn input reader")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_SPEED_MS, POPULATION_CAPACITY};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(variant: Variant) -> App {
        App::new(SimulationState::with_rng(variant, StdRng::seed_from_u64(3)))
    }

    #[test]
    fn test_key_bindings() {
        let variant = Variant::MultiBall;
        assert_eq!(command_for(variant, press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(command_for(variant, press(KeyCode::Up)), Some(Command::Faster));
        assert_eq!(command_for(variant, press(KeyCode::Down)), Some(Command::Slower));
        assert_eq!(command_for(variant, press(KeyCode::Char('+'))), Some(Command::AddBall));
        assert_eq!(command_for(variant, press(KeyCode::Char('-'))), Some(Command::RemoveBall));
        assert_eq!(command_for(variant, press(KeyCode::Char('x'))), None);
        assert_eq!(
            command_for(variant, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }

    #[test]
    fn test_bindings_follow_variant() {
        assert_eq!(command_for(Variant::Classic, press(KeyCode::Up)), None);
        assert_eq!(command_for(Variant::Tail, press(KeyCode::Char('+'))), None);
        assert_eq!(command_for(Variant::Speed, press(KeyCode::Down)), Some(Command::Slower));
        assert_eq!(command_for(Variant::Classic, press(KeyCode::Esc)), Some(Command::Quit));
    }

    #[test]
    fn test_key_release_ignored() {
        let mut key = press(KeyCode::Esc);
        key.kind = KeyEventKind::Release;
        assert_eq!(command_for(Variant::Speed, key), None);
    }

    #[test]
    fn test_speed_keys_saturate() {
        let mut app = app(Variant::Speed);
        assert_eq!(app.speed().millis(), DEFAULT_SPEED_MS);

        for _ in 0..50 {
            assert!(!app.handle_key(press(KeyCode::Up)));
        }
        assert_eq!(app.speed().millis(), 1);

        for _ in 0..150 {
            app.handle_key(press(KeyCode::Down));
        }
        assert_eq!(app.speed().millis(), 100);
    }

    #[test]
    fn test_ball_keys_saturate() {
        let mut app = app(Variant::MultiBall);

        for _ in 0..15 {
            app.handle_key(press(KeyCode::Char('+')));
        }
        assert_eq!(app.state().population().active_count(), POPULATION_CAPACITY);

        for _ in 0..20 {
            app.handle_key(press(KeyCode::Char('-')));
        }
        assert_eq!(app.state().population().active_count(), 1);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app(Variant::Classic);
        assert!(app.handle_key(press(KeyCode::Esc)));
    }
}
