//! App: terminal init, main loop, key and mouse handling.

use crate::game::{DropOutcome, GameSession};
use crate::highscores;
use crate::input::{Action, key_to_action, mouse_to_action};
use crate::matrix::CellIndex;
use crate::theme::Theme;
use crate::{Args, GameConfig, GameMode};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

/// Frame budget for event polling (~60 FPS).
const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTab {
    Mode,
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub current_tab: MenuTab,
    pub selected_mode: GameMode,
    pub animation_start: Instant,
}

impl MenuState {
    fn new(mode: GameMode) -> Self {
        Self {
            current_tab: MenuTab::Mode,
            selected_mode: mode,
            animation_start: Instant::now(),
        }
    }
}

pub struct App {
    args: Args,
    theme: Theme,
    session: GameSession,
    screen: Screen,
    paused: bool,
    /// Terminal area the session is laid out for.
    area: Rect,
    /// A mouse press picked up the floating piece, so the matching release drops it.
    pointer_drag: bool,
    /// Blocks being faded out after a clear.
    clearing: Vec<CellIndex>,
    /// TachyonFX fade effect for the clear (created on first draw).
    clear_effect: Option<Effect>,
    /// Last time we processed the clear effect (for delta).
    clear_effect_process_time: Option<Instant>,
    menu_state: MenuState,
    quit_selected: QuitOption,
    /// Best score per mode, indexed by `GameMode::index`.
    high_scores: [u32; 3],
    /// This game beat the stored best.
    new_record: bool,
    /// `high_scores` holds a best that is not on disk yet.
    unsaved_best: bool,
    /// Shown on the game over popup or the menu (e.g. the high score could not be saved).
    notice: Option<String>,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let area = Rect::new(0, 0, 80, 24);
        let session = GameSession::new(&config, crate::ui::placement(area, &config));
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Menu
        };
        Ok(Self {
            menu_state: MenuState::new(args.mode),
            args,
            theme,
            session,
            screen,
            paused: false,
            area,
            pointer_drag: false,
            clearing: Vec::new(),
            clear_effect: None,
            clear_effect_process_time: None,
            quit_selected: QuitOption::Resume,
            high_scores: GameMode::ALL.map(highscores::load_high_score),
            new_record: false,
            unsaved_best: false,
            notice: None,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size},
        };

        enable_raw_mode()?;
        // Everything after raw mode goes through `result` so the terminal is always restored.
        let result = (|| -> Result<()> {
            let mut stdout = std::io::stdout();
            execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
            let mut terminal =
                ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

            let (cols, rows) = size()?;
            self.resize(Rect::new(0, 0, cols, rows));

            self.run_loop(&mut terminal)
        })();

        // Restore
        let restored = execute!(std::io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        disable_raw_mode()?;
        result?;
        restored?;
        Ok(())
    }

    /// Lay the session out for a new terminal size.
    fn resize(&mut self, area: Rect) {
        self.area = area;
        self.session
            .relayout(crate::ui::placement(area, &self.session.config));
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.session,
                    &self.theme,
                    self.paused,
                    &self.menu_state,
                    self.quit_selected,
                    &self.high_scores,
                    self.new_record,
                    self.notice.as_deref(),
                    &self.clearing,
                    &mut self.clear_effect,
                    &mut self.clear_effect_process_time,
                    now,
                );
            })?;

            if self.clear_effect.as_ref().is_some_and(Effect::done) {
                self.finish_clear();
            }

            let timeout = FRAME.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let action = match event::read()? {
                        // Ignore key releases and repeats reported by enhanced terminals.
                        Event::Key(key) if key.kind == KeyEventKind::Press => key_to_action(key),
                        Event::Mouse(mouse) => mouse_to_action(mouse),
                        Event::Resize(cols, rows) => {
                            self.resize(Rect::new(0, 0, cols, rows));
                            continue;
                        }
                        _ => continue,
                    };
                    if self.handle(action)?.is_break() {
                        self.record_best();
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle(&mut self, action: Action) -> Result<ControlFlow<()>> {
        match self.screen {
            Screen::Menu => return self.handle_menu(action),
            Screen::Playing => self.handle_playing(action)?,
            Screen::QuitMenu => return self.handle_quit_menu(action),
            Screen::GameOver => match action {
                Action::Quit => return Ok(ControlFlow::Break(())),
                Action::NewGame | Action::Drop => self.restart(),
                Action::Cancel => self.to_menu()?,
                _ => {}
            },
        }
        Ok(ControlFlow::Continue(()))
    }

    fn handle_menu(&mut self, action: Action) -> Result<ControlFlow<()>> {
        let menu = &mut self.menu_state;
        match action {
            Action::Quit => return Ok(ControlFlow::Break(())),
            Action::MoveLeft if menu.current_tab == MenuTab::Mode => {
                menu.selected_mode = menu.selected_mode.prev();
            }
            Action::MoveRight if menu.current_tab == MenuTab::Mode => {
                menu.selected_mode = menu.selected_mode.next();
            }
            Action::MoveUp | Action::MoveDown => {
                menu.current_tab = match menu.current_tab {
                    MenuTab::Mode => MenuTab::Start,
                    MenuTab::Start => MenuTab::Mode,
                };
            }
            Action::PickSlot(i) if i < GameMode::ALL.len() => {
                menu.selected_mode = GameMode::ALL[i];
            }
            Action::Drop => {
                if menu.current_tab == MenuTab::Start {
                    let mode = menu.selected_mode;
                    // Command-line sizes may not suit every mode; stay in the menu.
                    if let Err(e) = self.start(mode) {
                        self.notice = Some(format!("{e:#}"));
                    }
                } else {
                    menu.current_tab = MenuTab::Start;
                }
            }
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    }

    fn handle_playing(&mut self, action: Action) -> Result<()> {
        if self.paused {
            match action {
                Action::Pause => self.paused = false,
                Action::Quit => self.open_quit_menu(),
                _ => {}
            }
            return Ok(());
        }
        match action {
            Action::Pause => self.paused = true,
            Action::Quit => self.open_quit_menu(),
            Action::NewGame => self.restart(),
            Action::PickSlot(i) => {
                // Another number swaps the floating piece for that slot's piece.
                self.session.cancel()?;
                self.pointer_drag = false;
                self.session.pick_slot(i)?;
            }
            Action::MoveLeft => self.session.nudge(0, -1),
            Action::MoveRight => self.session.nudge(0, 1),
            Action::MoveUp => self.session.nudge(-1, 0),
            Action::MoveDown => self.session.nudge(1, 0),
            Action::Drop => {
                let outcome = self.session.release()?;
                self.after_drop(outcome);
            }
            Action::Cancel => {
                self.session.cancel()?;
                self.pointer_drag = false;
            }
            Action::Press(px) => self.pointer_drag = self.session.press(px)?,
            Action::DragTo(px) if self.pointer_drag => self.session.drag_to(px),
            Action::Release(px) if self.pointer_drag => {
                self.pointer_drag = false;
                self.session.drag_to(px);
                let outcome = self.session.release()?;
                self.after_drop(outcome);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_quit_menu(&mut self, action: Action) -> Result<ControlFlow<()>> {
        match action {
            Action::MoveDown | Action::MoveRight => {
                self.quit_selected = match self.quit_selected {
                    QuitOption::Resume => QuitOption::MainMenu,
                    QuitOption::MainMenu => QuitOption::Exit,
                    QuitOption::Exit => QuitOption::Resume,
                };
            }
            Action::MoveUp | Action::MoveLeft => {
                self.quit_selected = match self.quit_selected {
                    QuitOption::Resume => QuitOption::Exit,
                    QuitOption::MainMenu => QuitOption::Resume,
                    QuitOption::Exit => QuitOption::MainMenu,
                };
            }
            Action::Drop => match self.quit_selected {
                QuitOption::Resume => self.screen = Screen::Playing,
                QuitOption::MainMenu => self.to_menu()?,
                QuitOption::Exit => return Ok(ControlFlow::Break(())),
            },
            Action::Pause | Action::Quit | Action::Cancel => self.screen = Screen::Playing,
            _ => {}
        }
        Ok(ControlFlow::Continue(()))
    }

    fn open_quit_menu(&mut self) {
        self.screen = Screen::QuitMenu;
        self.quit_selected = QuitOption::Resume;
    }

    /// Score, high score, clear animation and game over after a release.
    fn after_drop(&mut self, outcome: DropOutcome) {
        let (DropOutcome::Placed { cleared } | DropOutcome::GameOver { cleared }) = outcome else {
            return;
        };
        if cleared > 0 && !self.args.no_animation {
            self.clearing = self.session.last_cleared.clone();
            self.clear_effect = None;
            self.clear_effect_process_time = None;
        }
        let best = &mut self.high_scores[self.session.config.mode.index()];
        if self.session.score > *best {
            *best = self.session.score;
            self.new_record = true;
            self.unsaved_best = true;
        }
        if matches!(outcome, DropOutcome::GameOver { .. }) {
            self.record_best();
            self.screen = Screen::GameOver;
        }
    }

    fn finish_clear(&mut self) {
        self.clearing.clear();
        self.clear_effect = None;
        self.clear_effect_process_time = None;
    }

    /// Persist the best score once per record-setting game.
    fn record_best(&mut self) {
        if !self.unsaved_best {
            return;
        }
        self.unsaved_best = false;
        let mode = self.session.config.mode;
        if let Err(e) = highscores::save_high_score(mode, self.high_scores[mode.index()]) {
            self.notice = Some(format!("best not saved: {e}"));
        }
    }

    fn reset_flags(&mut self) {
        self.paused = false;
        self.pointer_drag = false;
        self.new_record = false;
        self.notice = None;
        self.finish_clear();
    }

    /// New game in the current mode.
    fn restart(&mut self) {
        self.record_best();
        self.session.restart();
        self.reset_flags();
        self.screen = Screen::Playing;
    }

    /// New game in `mode`, with the command-line sizes applied to that mode.
    fn start(&mut self, mode: GameMode) -> Result<()> {
        let config = GameConfig::resolve(mode, &self.args)
            .with_context(|| format!("cannot start a {} game", mode.name()))?;
        self.args.mode = mode;
        self.session = GameSession::new(&config, crate::ui::placement(self.area, &config));
        self.reset_flags();
        self.screen = Screen::Playing;
        Ok(())
    }

    fn to_menu(&mut self) -> Result<()> {
        self.record_best();
        self.session.cancel()?;
        self.reset_flags();
        self.menu_state = MenuState::new(self.session.config.mode);
        self.screen = Screen::Menu;
        Ok(())
    }
}
