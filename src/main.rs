//! Terminal Coral Match runner (default binary).
//!
//! Adventure mode opens on the level map; free play and challenge go straight
//! to the board. Configuration comes from `CORAL_*` environment variables, see
//! [`coral_match::config`].

use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use coral_match::adventure::{catalog, LevelMap, MapError, Selection};
use coral_match::config::ShellConfig;
use coral_match::core::{MatchSession, PlayerId, RewardLedger, SessionConfig};
use coral_match::input::{handle_key_event, handle_mouse_event, should_quit, ShellAction};
use coral_match::term::{BoardHud, BoardView, Canvas, MapView, TerminalRenderer, Viewport};
use coral_match::types::{Coord, EngineEvent, GameMode, Outcome, TICK_MS};

fn main() -> Result<()> {
    let config = ShellConfig::from_env();
    setup_logging(&config)?;
    log::info!("starting {:?} with seed {}", config.mode, config.seed);

    let mut app = App::new(config)?;
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut app);

    // Always try to restore terminal state.
    let _ = term.exit();
    app.log_summary();
    result
}

fn setup_logging(config: &ShellConfig) -> Result<()> {
    let Some(path) = &config.log_path else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("creating log file {}", path.display()))?;
    WriteLogger::init(
        config.log_level,
        ConfigBuilder::new()
            .set_target_level(LevelFilter::Error)
            .build(),
        file,
    )?;
    Ok(())
}

fn run(term: &mut TerminalRenderer, app: &mut App) -> Result<()> {
    let mut canvas = Canvas::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        // Render.
        app.viewport = term.viewport()?;
        match &app.session {
            Some(session) => {
                let hud = app.hud();
                app.board_view
                    .render_into(&session.snapshot(), &hud, app.viewport, &mut canvas);
            }
            None => {
                if let Some(map) = &app.map {
                    app.map_view
                        .render_into(map, app.message.as_deref(), app.viewport, &mut canvas);
                }
            }
        }
        term.draw_swap(&mut canvas)?;

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
                        if !app.apply(action)? {
                            return Ok(());
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = handle_mouse_event(mouse) {
                        if !app.apply(action)? {
                            return Ok(());
                        }
                    }
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            app.tick(TICK_MS);
        }
    }
}

struct App {
    config: ShellConfig,
    /// Present in adventure mode
    map: Option<LevelMap>,
    session: Option<MatchSession>,
    /// Adventure level being played
    level_id: Option<u32>,
    cursor: Coord,
    hint: Option<(Coord, Coord)>,
    message: Option<String>,
    ledger: Rc<RefCell<RewardLedger>>,
    games_started: u32,
    board_view: BoardView,
    map_view: MapView,
    /// Terminal size at the last render, for resolving clicks
    viewport: Viewport,
}

impl App {
    fn new(config: ShellConfig) -> Result<Self> {
        let map = match config.mode {
            GameMode::Adventure => Some(load_map(&config)?),
            _ => None,
        };
        let mut app = Self {
            config,
            map,
            session: None,
            level_id: None,
            cursor: Coord::new(0, 0),
            hint: None,
            message: None,
            ledger: Rc::new(RefCell::new(RewardLedger::new())),
            games_started: 0,
            board_view: BoardView::default(),
            map_view: MapView,
            viewport: Viewport::new(0, 0),
        };
        match app.config.mode {
            GameMode::FreePlay(difficulty) => app.start(SessionConfig::free_play(difficulty), None)?,
            GameMode::Challenge => app.start(SessionConfig::challenge(), None)?,
            GameMode::Adventure => {}
        }
        Ok(app)
    }

    fn start(&mut self, session_config: SessionConfig, level_id: Option<u32>) -> Result<()> {
        let seed = self.config.seed.wrapping_add(self.games_started);
        self.games_started += 1;
        let player: PlayerId = self.config.player.clone();
        let session = MatchSession::seeded(session_config, seed)
            .context("starting session")?
            .with_rewards(player, Box::new(self.ledger.clone()));
        log::info!("session started (level {:?}, seed {})", level_id, seed);
        self.session = Some(session);
        self.level_id = level_id;
        self.cursor = Coord::new(0, 0);
        self.hint = None;
        self.message = None;
        Ok(())
    }

    fn title(&self) -> String {
        match (self.level_id, &self.map) {
            (Some(id), Some(map)) => map
                .node_by_id(id)
                .map(|n| n.name.clone())
                .unwrap_or_else(|| format!("Level {}", id)),
            _ => match self.config.mode {
                GameMode::FreePlay(d) => format!("Free play ({})", d.as_str()),
                GameMode::Challenge => "Challenge".to_string(),
                GameMode::Adventure => "Adventure".to_string(),
            },
        }
    }

    fn hud(&self) -> BoardHud {
        BoardHud {
            cursor: self.cursor,
            hint: self.hint,
            title: self.title(),
            message: self.message.clone(),
        }
    }

    /// Returns false when the program should exit
    fn apply(&mut self, action: ShellAction) -> Result<bool> {
        if self.session.is_some() {
            self.apply_board(action)
        } else {
            self.apply_map(action)
        }
    }

    fn apply_map(&mut self, action: ShellAction) -> Result<bool> {
        let Some(map) = self.map.as_mut() else {
            return Ok(false);
        };
        match action {
            ShellAction::Move(dir) => {
                map.move_focus(dir);
                self.message = None;
            }
            ShellAction::Confirm => {
                let selection = map.select_focused();
                self.enter_level(selection)?;
            }
            ShellAction::Click { column, row } => {
                let selection = self
                    .map_view
                    .node_at(map, self.viewport, column, row)
                    .map(|index| map.select(index));
                self.enter_level(selection)?;
            }
            ShellAction::Back => return Ok(false),
            ShellAction::Cancel | ShellAction::Hint | ShellAction::Restart => {}
        }
        Ok(true)
    }

    fn enter_level(&mut self, selection: Option<Result<Selection, MapError>>) -> Result<()> {
        match selection {
            Some(Ok(Selection::Entered(node))) => {
                self.start(node.session_config(), Some(node.id))?;
            }
            Some(Ok(Selection::Locked)) => {
                self.message = Some("That level is still locked.".to_string());
            }
            Some(Err(err)) => self.message = Some(err.to_string()),
            None => {}
        }
        Ok(())
    }

    fn apply_board(&mut self, action: ShellAction) -> Result<bool> {
        let Some(session) = self.session.as_mut() else {
            return Ok(true);
        };
        let size = session.grid().size();
        match action {
            ShellAction::Move(dir) => {
                if let Some(next) = self.cursor.step(dir, size) {
                    self.cursor = next;
                }
            }
            ShellAction::Confirm => {
                session.select_cell(self.cursor)?;
                self.hint = None;
            }
            ShellAction::Click { column, row } => {
                if let Some(at) = self.board_view.cell_at(size, self.viewport, column, row) {
                    self.cursor = at;
                    session.select_cell(at)?;
                    self.hint = None;
                }
            }
            ShellAction::Cancel => {
                if let Some(at) = session.selected() {
                    // Selecting the same cell again drops the selection
                    session.select_cell(at)?;
                }
            }
            ShellAction::Hint => {
                self.hint = session.hint();
                if let Some((a, _)) = self.hint {
                    self.cursor = a;
                }
            }
            ShellAction::Restart => {
                session.restart();
                self.cursor = Coord::new(0, 0);
                self.hint = None;
                self.message = None;
            }
            ShellAction::Back => {
                session.end();
                self.drain_events();
                if self.map.is_none() {
                    return Ok(false);
                }
                self.session = None;
                self.level_id = None;
                return Ok(true);
            }
        }
        self.drain_events();
        Ok(true)
    }

    fn tick(&mut self, elapsed_ms: u32) {
        if let Some(session) = self.session.as_mut() {
            session.tick(elapsed_ms);
        }
        self.drain_events();
    }

    /// Turn engine events into status messages and adventure progress
    fn drain_events(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        for event in session.drain_events() {
            match event {
                EngineEvent::BoardReshuffled => {
                    self.message = Some("No moves left, the reef was reshuffled.".to_string());
                }
                EngineEvent::RewardRequested { item } => {
                    self.message = Some(format!("Reward earned: {}", item));
                }
                EngineEvent::Settled { passes, .. } if passes > 1 => {
                    self.message = Some(format!("Cascade x{}!", passes));
                }
                EngineEvent::GameOver { outcome, score } => {
                    if outcome == Outcome::Won {
                        if let (Some(id), Some(map)) = (self.level_id, self.map.as_mut()) {
                            match map.complete_level(id, score) {
                                Ok(unlocked) if !unlocked.is_empty() => {
                                    self.message =
                                        Some(format!("Level cleared! {} new level(s) open.", unlocked.len()));
                                }
                                Ok(_) => self.message = Some("Level cleared!".to_string()),
                                Err(err) => log::warn!("{}", err),
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn log_summary(&self) {
        if let Some(session) = &self.session {
            match serde_json::to_string(&session.snapshot()) {
                Ok(json) => log::debug!("final snapshot: {}", json),
                Err(err) => log::warn!("could not serialize snapshot: {}", err),
            }
        }
        for grant in self.ledger.borrow().granted() {
            log::info!("granted {} to {}", grant.item, grant.player.as_str());
        }
    }
}

fn load_map(config: &ShellConfig) -> Result<LevelMap> {
    let Some(path) = &config.map_path else {
        return Ok(catalog::default_map());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading map file {}", path.display()))?;
    let map = catalog::from_json(&json).with_context(|| format!("loading map {}", path.display()))?;
    Ok(map)
}
