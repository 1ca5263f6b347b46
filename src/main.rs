//! Terminal gem-matching runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `gem_match::term`.
//! Settings come from `GEM_MATCH_*` environment variables, or from a JSON file
//! given as the first argument.

use std::fs;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};

use gem_match::core::{BoardSnapshot, EngineConfig, RoundPhase, Session};
use gem_match::input::{handle_key_event, should_quit, CursorOutcome, SelectionCursor};
use gem_match::term::{FrameBuffer, GameView, HudView, TerminalRenderer, Viewport};
use gem_match::types::{PlayerAction, Position, Swap, TICK_MS};

fn init_logging() -> Result<()> {
    // The alternate screen owns stdout; keep stderr quiet unless asked.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    if let Ok(path) = std::env::var("GEM_MATCH_LOG_PATH") {
        let file = fs::File::create(&path).with_context(|| format!("opening log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn load_config() -> Result<EngineConfig> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let text =
                fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
            EngineConfig::from_json_str(&text).with_context(|| format!("parsing config {path}"))?
        }
        None => EngineConfig::from_env(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    init_logging()?;
    let config = load_config()?;
    log::info!(
        "starting {}x{} board, {} colors, {}s rounds",
        config.columns,
        config.rows,
        config.colors,
        config.round_seconds
    );

    let mut term = TerminalRenderer::new().with_mouse(true);
    term.enter()?;

    let result = run(&mut term, &config);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, config: &EngineConfig) -> Result<()> {
    let mut session = Session::new(config);
    let mut cursor = SelectionCursor::new(config.columns, config.rows);

    let view = GameView::default();
    let mut snap = BoardSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        session.snapshot_into(&mut snap);
        let hud = HudView {
            phase: session.phase(),
            remaining_seconds: session.remaining_seconds(),
            cursor: Some(cursor.position()),
            picked: cursor.picked(),
        };
        view.render_into(&snap, &hud, viewport, &mut fb);
        term.present(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        apply_action(&mut session, &mut cursor, action);
                    }
                }
                Event::Mouse(mouse) => {
                    let hit = view.hit_test(&snap, viewport, mouse.column, mouse.row);
                    match (mouse.kind, hit) {
                        (MouseEventKind::Down(MouseButton::Left), Some(position)) => {
                            cursor.move_to(position);
                            apply_action(&mut session, &mut cursor, PlayerAction::Select);
                        }
                        (MouseEventKind::Up(MouseButton::Left), Some(position)) => {
                            release_drag(&mut session, &mut cursor, position);
                        }
                        _ => {}
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.update(u32::try_from(elapsed.as_millis()).unwrap_or(u32::MAX));
        }
    }
}

fn apply_action(session: &mut Session, cursor: &mut SelectionCursor, action: PlayerAction) {
    let playing = session.phase() == RoundPhase::Playing;
    match action {
        PlayerAction::StartRound => {
            if session.advance_round() {
                cursor.reset();
            }
        }
        PlayerAction::Select if !playing => {
            if session.advance_round() {
                cursor.reset();
            }
        }
        _ if !playing => {}
        _ => {
            let accepting = session.controller().is_input_enabled();
            if let CursorOutcome::Swap(swap) = cursor.apply_when(action, accepting) {
                forward_swap(session, swap);
            }
        }
    }
}

fn release_drag(session: &mut Session, cursor: &mut SelectionCursor, position: Position) {
    if session.phase() != RoundPhase::Playing || !session.controller().is_input_enabled() {
        return;
    }
    if let Some(swap) = cursor.release_at(position) {
        forward_swap(session, swap);
    }
}

fn forward_swap(session: &mut Session, swap: Swap) {
    if !session.request_swap(swap) {
        log::debug!("swap {swap:?} ignored in state {:?}", session.state());
    }
}
