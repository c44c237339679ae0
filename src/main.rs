//! Terminal runner (default binary).
//!
//! Drives one session with a fixed 16ms timestep, crossterm input and the
//! framebuffer renderer. Settings come from the environment (see
//! `SessionConfig::from_env`); logs go to the file named by `TETRIS_LOG_PATH`
//! because the terminal itself is the game screen. When `TETRIS_SCORES_PATH`
//! is set the ranking is loaded from that JSON file at start and written back
//! on exit.

use std::env;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use log::info;

use falling_blocks::core::{GameSnapshot, HighScores, Session, SessionConfig};
use falling_blocks::input::{handle_key_event, should_quit, InputHandler};
use falling_blocks::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use falling_blocks::types::{GameAction, TICK_MS};

fn main() -> Result<()> {
    init_logging()?;
    let config = SessionConfig::from_env().context("invalid configuration")?;
    info!("starting session with {:?}", config);

    let scores_path = env::var_os("TETRIS_SCORES_PATH").map(PathBuf::from);
    let mut session = Session::new(&config);
    if let Some(path) = &scores_path {
        if let Some(list) = load_high_scores(path)? {
            info!("restored {} high scores from {}", list.len(), path.display());
            session = session.with_high_scores(list);
        }
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;
    info!("keyboard enhancement: {}", term.keyboard_enhanced());

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();

    let saved = match &scores_path {
        Some(path) => save_high_scores(path, session.high_scores()),
        None => Ok(()),
    };
    result.and(saved)
}

fn load_high_scores(path: &Path) -> Result<Option<HighScores>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(e).with_context(|| format!("cannot read high scores {}", path.display()))
        }
    };
    let list = serde_json::from_str(&text)
        .with_context(|| format!("cannot parse high scores {}", path.display()))?;
    Ok(Some(list))
}

fn save_high_scores(path: &Path, list: &HighScores) -> Result<()> {
    let json = serde_json::to_string(list)?;
    fs::write(path, json).with_context(|| format!("cannot write high scores {}", path.display()))
}

fn init_logging() -> Result<()> {
    let Some(path) = env::var_os("TETRIS_LOG_PATH") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("cannot create log file {}", path.to_string_lossy()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    let view = GameView::default();
    let mut input = InputHandler::new();

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(
            &snap,
            session.high_scores().scores(),
            Viewport::new(w, h),
            &mut fb,
        );
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press => {
                        if should_quit(key) {
                            info!("quit requested");
                            return Ok(());
                        }

                        if let Some(action) = input.handle_key_press(key.code) {
                            session.apply_action(action);
                        } else if let Some(action) = handle_key_event(key) {
                            match action {
                                // Held keys repeat through the input handler.
                                GameAction::MoveLeft
                                | GameAction::MoveRight
                                | GameAction::SoftDrop => {}
                                _ => {
                                    session.apply_action(action);
                                }
                            }
                        }
                    }
                    KeyEventKind::Repeat => {
                        // Keeps a held key alive; DAS/ARR produces the repeats.
                        if let Some(action) = input.handle_key_press(key.code) {
                            session.apply_action(action);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(action) = input.handle_key_release(key.code) {
                            session.apply_action(action);
                        }
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for action in input.update(TICK_MS) {
                session.apply_action(action);
            }
            session.tick(TICK_MS);
        }
    }
}
