//! Layout and drawing: menu, board, home slots, floating piece, sidebar, pause, game over.

use crate::app::{MenuState, MenuTab, QuitOption, Screen};
use crate::area::{Area, BLOCK_CELL_SIZE, Pixel};
use crate::game::{GameSession, Placement};
use crate::home::SLOT_GAP;
use crate::matrix::{BlockColor, CellIndex};
use crate::theme::Theme;
use crate::{GameConfig, GameMode};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashSet;
use std::time::Instant;
use tachyonfx::{
    CellFilter, Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx, ref_count,
};

const SIDEBAR_WIDTH: u16 = 26;

/// Duration of the clear fade (TachyonFX) in ms.
const CLEAR_FADE_MS: u32 = 400;

/// Screen rects of the play screen: board and home pool (with borders) and sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlayLayout {
    board: Rect,
    home: Rect,
    sidebar: Rect,
}

/// Terminal cells to `u16`, saturating at the largest screen size.
fn to_cells(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Board size with border, in terminal cells (width, height).
fn board_outer_size(config: &GameConfig) -> (u16, u16) {
    let w = config.board.cols * BLOCK_CELL_SIZE.cols + 2;
    let h = config.board.rows * BLOCK_CELL_SIZE.rows + 2;
    (to_cells(w), to_cells(h))
}

/// Home pool size with border, in terminal cells (width, height).
fn home_outer_size(config: &GameConfig) -> (u16, u16) {
    let slot_w = config.template.cols * BLOCK_CELL_SIZE.cols;
    let gaps = config.slots.saturating_sub(1) * SLOT_GAP as usize;
    let w = config.slots * slot_w + gaps + 2;
    let h = config.template.rows * BLOCK_CELL_SIZE.rows + 2;
    (to_cells(w), to_cells(h))
}

/// Terminal size (cols, rows) needed to show the whole play screen.
pub fn required_size(config: &GameConfig) -> (u16, u16) {
    let (bw, bh) = board_outer_size(config);
    let (hw, hh) = home_outer_size(config);
    (bw.max(hw).saturating_add(SIDEBAR_WIDTH), bh.saturating_add(hh))
}

fn play_layout(area: Rect, config: &GameConfig) -> PlayLayout {
    let (bw, bh) = board_outer_size(config);
    let (hw, hh) = home_outer_size(config);
    let column_w = bw.max(hw);
    let (total_w, total_h) = required_size(config);

    // Center horizontally
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    // Center vertically
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_h),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let active = vert[1];

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(column_w), Constraint::Length(SIDEBAR_WIDTH)])
        .split(active);
    let column = cols[0];

    PlayLayout {
        board: Rect {
            x: column.x + column_w.saturating_sub(bw) / 2,
            y: column.y,
            width: bw,
            height: bh,
        },
        home: Rect {
            x: column.x + column_w.saturating_sub(hw) / 2,
            y: column.y + bh,
            width: hw,
            height: hh,
        },
        sidebar: cols[1],
    }
}

/// Screen anchors of the board and first home slot for a terminal area.
pub fn placement(area: Rect, config: &GameConfig) -> Placement {
    let layout = play_layout(area, config);
    Placement {
        board: Pixel::new(i32::from(layout.board.y) + 1, i32::from(layout.board.x) + 1),
        home: Pixel::new(i32::from(layout.home.y) + 1, i32::from(layout.home.x) + 1),
    }
}

/// Write one terminal cell at a pixel; off-buffer pixels are skipped.
fn put(buf: &mut Buffer, px: Pixel, symbol: &str, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(px.col), u16::try_from(px.row)) else {
        return;
    };
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_symbol(symbol).set_style(style);
    }
}

/// Paint one logical cell (all its terminal cells) with `symbol`.
fn paint_cell(buf: &mut Buffer, origin: Pixel, symbol: &str, style: Style) {
    for dr in 0..BLOCK_CELL_SIZE.rows as i32 {
        for dc in 0..BLOCK_CELL_SIZE.cols as i32 {
            put(buf, origin.offset(dr, dc), symbol, style);
        }
    }
}

fn block_style(theme: &Theme, color: BlockColor) -> Style {
    let c = theme.block_color(color);
    Style::default().fg(c).bg(theme.bg)
}

/// Coloured cells of `area`, drawn with `area`'s cell (0, 0) at `origin`.
fn draw_blocks(buf: &mut Buffer, area: &Area, origin: Pixel, theme: &Theme, symbol: &str) {
    let size = area.cell_size();
    for (r, c, color) in area.filled_cells() {
        let px = origin.offset((r * size.rows) as i32, (c * size.cols) as i32);
        paint_cell(buf, px, symbol, block_style(theme, color));
    }
}

/// Draw current screen, with pause overlay, quit menu, or game-over popup on top of the game.
/// While `clearing` is non-empty and animation is on, the TachyonFX fade runs over those cells
/// and updates `clear_effect` / `clear_process_time`.
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    session: &GameSession,
    theme: &Theme,
    paused: bool,
    menu_state: &MenuState,
    quit_selected: QuitOption,
    high_scores: &[u32; 3],
    new_record: bool,
    notice: Option<&str>,
    clearing: &[CellIndex],
    clear_effect: &mut Option<Effect>,
    clear_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    if screen == Screen::Menu {
        draw_menu(frame, theme, menu_state, high_scores, notice, area, now);
        return;
    }

    let (need_w, need_h) = required_size(&session.config);
    if area.width < need_w || area.height < need_h {
        draw_too_small(frame, theme, area, need_w, need_h);
        return;
    }

    let best = high_scores[session.config.mode.index()];
    draw_game(frame, session, theme, area, best, clearing);
    if !clearing.is_empty() {
        apply_clear_effect(frame, session, theme, clearing, clear_effect, clear_process_time, now);
    }
    match screen {
        Screen::Playing if paused => draw_pause_overlay(frame, theme, area),
        Screen::QuitMenu => draw_quit_menu(frame, theme, quit_selected),
        Screen::GameOver => draw_game_over(frame, session, theme, area, best, new_record, notice),
        _ => {}
    }
}

fn draw_too_small(frame: &mut Frame, theme: &Theme, area: Rect, need_w: u16, need_h: u16) {
    let lines = vec![
        Line::from(Span::styled(
            " Terminal too small ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("need {}x{}, have {}x{}", need_w, need_h, area.width, area.height),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(Span::styled(
            "Q - Quit",
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    let y = area.y + area.height.saturating_sub(4) / 2;
    let rect = Rect {
        x: area.x,
        y,
        width: area.width,
        height: 4u16.min(area.height),
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(rect, frame.buffer_mut());
}

/// Screen positions covered by the cleared cells.
fn clearing_buffer_positions(board: &Area, cells: &[CellIndex]) -> HashSet<(u16, u16)> {
    let mut set = HashSet::new();
    for &cell in cells {
        let origin = board.cell_origin(cell);
        for dr in 0..BLOCK_CELL_SIZE.rows as i32 {
            for dc in 0..BLOCK_CELL_SIZE.cols as i32 {
                let px = origin.offset(dr, dc);
                if let (Ok(x), Ok(y)) = (u16::try_from(px.col), u16::try_from(px.row)) {
                    set.insert((x, y));
                }
            }
        }
    }
    set
}

fn board_rect(board: &Area) -> Rect {
    let (h, w) = board.pixel_size();
    Rect {
        x: u16::try_from(board.pos.col.max(0)).unwrap_or(u16::MAX),
        y: u16::try_from(board.pos.row.max(0)).unwrap_or(u16::MAX),
        width: u16::try_from(w).unwrap_or(u16::MAX),
        height: u16::try_from(h).unwrap_or(u16::MAX),
    }
}

/// Create or update the clear fade and process it: cleared blocks fade from white to bg.
fn apply_clear_effect(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    clearing: &[CellIndex],
    clear_effect: &mut Option<Effect>,
    clear_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let rect = board_rect(&session.board).intersection(frame.area());
    let delta = clear_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *clear_process_time = Some(now);

    if clear_effect.is_none() {
        let clearing_set = clearing_buffer_positions(&session.board, clearing);
        let filter = CellFilter::PositionFn(ref_count(move |pos: Position| {
            clearing_set.contains(&(pos.x, pos.y))
        }));
        let bg = theme.bg;
        let effect = fx::fade_to(bg, bg, (CLEAR_FADE_MS, Interpolation::Linear))
            .with_filter(filter)
            .with_area(rect);
        *clear_effect = Some(effect);
    }

    if let Some(effect) = clear_effect {
        frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
    }
}

fn mode_title(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Lines => "LINES",
        GameMode::SquaresLines => "SQUARES",
        GameMode::FourColors => "FOUR COLORS",
    }
}

fn mode_blurb(mode: GameMode) -> &'static str {
    match mode {
        GameMode::Lines => "Fill a row or column to clear it",
        GameMode::SquaresLines => "Rows, columns and 3x3 squares clear",
        GameMode::FourColors => "Groups of 4+ same colour clear",
    }
}

fn draw_menu(
    frame: &mut Frame,
    theme: &Theme,
    menu_state: &MenuState,
    high_scores: &[u32; 3],
    notice: Option<&str>,
    area: Rect,
    now: Instant,
) {
    let popup_w = 50u16;
    let popup_h = 20u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };

    let accent = theme.blocks[3];
    let title = Line::from(vec![
        Span::styled(" Block ", Style::default().fg(theme.blocks[0]).bold()),
        Span::styled(" tui ", Style::default().fg(theme.main_fg).bold()),
    ]);
    let swatch: Vec<Span> = theme
        .blocks
        .iter()
        .map(|&c| Span::styled("██ ", Style::default().fg(c)))
        .collect();

    let highlight_style = Style::default().fg(Color::Black).bg(accent).bold();
    let selected_style = Style::default().fg(accent).bold();
    let normal_style = Style::default().fg(theme.main_fg);

    let mut mode_spans = Vec::new();
    for (i, mode) in GameMode::ALL.into_iter().enumerate() {
        if i > 0 {
            mode_spans.push(Span::from("  "));
        }
        let selected = menu_state.selected_mode == mode;
        let style = if selected && menu_state.current_tab == MenuTab::Mode {
            highlight_style
        } else if selected {
            selected_style
        } else {
            normal_style
        };
        mode_spans.push(Span::styled(format!(" {} ", mode_title(mode)), style));
    }

    let start_style = if menu_state.current_tab == MenuTab::Start {
        highlight_style
    } else {
        normal_style
    };
    let mode = menu_state.selected_mode;
    let hint = Style::default().fg(accent);

    let lines = vec![
        Line::from(""),
        title,
        Line::from(swatch),
        Line::from(""),
        Line::from(Span::styled(" ─ MODE ─ ", Style::default().fg(theme.div_line))),
        Line::from(mode_spans),
        Line::from(""),
        Line::from(Span::styled(mode_blurb(mode), Style::default().fg(theme.inactive_fg))),
        Line::from(Span::styled(
            format!("Best: {}", high_scores[mode.index()]),
            Style::default().fg(theme.title),
        )),
        Line::from(""),
        Line::from(Span::styled(" [ START ] ", start_style)),
        Line::from(""),
        // Why the last start failed, e.g. a template that does not fit the board.
        Line::from(Span::styled(notice.unwrap_or_default(), Style::default().fg(theme.blocks[0]))),
        Line::from(vec![
            Span::styled(" ↕ ", hint),
            Span::from("NAVIGATE   "),
            Span::styled(" ↔ ", hint),
            Span::from("CHANGE   "),
            Span::styled(" ENTER ", hint),
            Span::from("PLAY"),
        ]),
        Line::from(""),
        Line::from(Span::styled(" [Q] QUIT ", Style::default().fg(theme.blocks[0]))),
    ];

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );

    // Startup animation: slide in from bottom, ease out cubic
    let elapsed = now.duration_since(menu_state.animation_start).as_millis() as f32;
    let t = (elapsed / 500.0).min(1.0);
    let offset_t = 1.0 - (1.0 - t).powi(3);
    let mut anim_popup = popup;
    anim_popup.y += ((1.0 - offset_t) * 10.0) as u16;
    anim_popup = anim_popup.intersection(area);

    p.render(anim_popup, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup_w = 28u16;
    let popup_h = 5u16;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P - Resume    Q - Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .style(Style::default().bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    area: Rect,
    best: u32,
    new_record: bool,
    notice: Option<&str>,
) {
    let layout = play_layout(area, &session.config);
    let popup_w = 30u16.min(area.width);
    let popup_h = if notice.is_some() { 12 } else { 10 };
    let popup = Rect {
        x: layout.board.x + layout.board.width.saturating_sub(popup_w) / 2,
        y: layout.board.y + layout.board.height.saturating_sub(popup_h) / 2,
        width: popup_w,
        height: popup_h,
    }
    .intersection(area);

    let fg = Style::default().fg(theme.main_fg);
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            " No piece fits ",
            Style::default().fg(Color::White).bg(Color::Red),
        )),
        Line::from(""),
        Line::from(Span::styled(format!(" Score: {} ", session.score), fg)),
        Line::from(Span::styled(format!(" Best: {} ", best), fg)),
        Line::from(Span::styled(format!(" Pieces: {} ", session.placed), fg)),
    ];
    if new_record {
        lines.push(Line::from(Span::styled(
            " New record! ",
            Style::default().fg(Color::Yellow).bold(),
        )));
    }
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(theme.blocks[0]),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" R - Restart    Q - Quit ", fg)));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
            .style(Style::default().bg(theme.bg))
            .title(Span::styled(" Game Over ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Board, home slots, sidebar, then the floating piece on top of everything.
fn draw_game(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    area: Rect,
    best: u32,
    clearing: &[CellIndex],
) {
    let layout = play_layout(area, &session.config);
    draw_board(frame, session, theme, layout.board, clearing);
    draw_home(frame, session, theme, layout.home);
    draw_sidebar(frame, session, theme, layout.sidebar, best);
    draw_floating(frame, session, theme);
}

fn draw_board(
    frame: &mut Frame,
    session: &GameSession,
    theme: &Theme,
    outer: Rect,
    clearing: &[CellIndex],
) {
    let title = format!(" Blocktui · {} ", session.config.mode.name());
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(title, theme.title))
        .render(outer, frame.buffer_mut());

    let board = &session.board;
    let dot = Style::default().fg(theme.div_line).bg(theme.bg);
    let flash = Style::default().fg(Color::White).bg(theme.bg);
    let buf = frame.buffer_mut();
    for (r, c, color) in board.cells() {
        let origin = board.cell_origin(CellIndex::new(r, c));
        if color.is_empty() {
            put(buf, origin, "·", dot);
            put(buf, origin.offset(0, 1), " ", dot);
        } else {
            paint_cell(buf, origin, "█", block_style(theme, color));
        }
    }
    // Cleared blocks flash white until the fade finishes (or a new block lands there).
    for &cell in clearing {
        if board.get(cell.row, cell.col).is_empty() {
            paint_cell(buf, board.cell_origin(cell), "█", flash);
        }
    }
}

fn draw_home(frame: &mut Frame, session: &GameSession, theme: &Theme, outer: Rect) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Pieces ", theme.title))
        .render(outer, frame.buffer_mut());

    let buf = frame.buffer_mut();
    let active = session.pool.active();
    let label_row = i32::from(outer.y + outer.height.saturating_sub(1));
    for (i, slot) in session.pool.slots().iter().enumerate() {
        draw_blocks(buf, &slot.area, slot.area.pos, theme, "█");
        let style = if active == Some(i) {
            Style::default().fg(theme.bg).bg(theme.title)
        } else if slot.dropped {
            Style::default().fg(theme.inactive_fg).bg(theme.bg)
        } else {
            Style::default().fg(theme.title).bg(theme.bg)
        };
        let label = format!(" {} ", i + 1);
        for (k, ch) in label.chars().enumerate() {
            let px = Pixel::new(label_row, slot.area.pos.col + k as i32);
            put(buf, px, &ch.to_string(), style);
        }
    }
}

/// Drop shadow at the snapped board cell, then the piece itself at the pointer.
fn draw_floating(frame: &mut Frame, session: &GameSession, theme: &Theme) {
    let Some(piece) = session.floating() else {
        return;
    };
    let buf = frame.buffer_mut();
    if let Some(at) = session.drop_target() {
        draw_blocks(buf, piece, session.board.cell_origin(at), theme, "░");
    }
    draw_blocks(buf, piece, piece.pos, theme, "█");
}

fn draw_sidebar(frame: &mut Frame, session: &GameSession, theme: &Theme, area: Rect, best: u32) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let border_style = Style::default().fg(theme.div_line).bg(theme.bg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Mode + colours
            Constraint::Length(1), // gap
            Constraint::Length(8), // Stats
            Constraint::Length(1), // gap
            Constraint::Min(0),    // Controls
        ])
        .split(area);

    // --- Mode ---
    let mode_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let mode_inner = mode_block.inner(chunks[0]);
    mode_block.render(chunks[0], frame.buffer_mut());
    let mut swatch = vec![Span::styled(
        format!("{:<12}", mode_title(session.config.mode)),
        title_style,
    )];
    let colours: &[BlockColor] = match session.config.mode {
        GameMode::FourColors => &BlockColor::NORMAL,
        GameMode::Lines | GameMode::SquaresLines => &[],
    };
    for &c in colours {
        swatch.push(Span::styled("██", Style::default().fg(theme.block_color(c))));
    }
    let mode_lines = vec![
        Line::from(swatch),
        Line::from(Span::styled(
            format!(
                "{}x{} board",
                session.config.board.rows, session.config.board.cols
            ),
            Style::default().fg(theme.inactive_fg),
        )),
    ];
    Paragraph::new(mode_lines).render(mode_inner, frame.buffer_mut());

    // --- Stats ---
    let stats_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let stats_lines = vec![
        stat("Score: ", session.score.to_string()),
        stat("Best: ", best.to_string()),
        stat("Pieces: ", session.placed.to_string()),
        stat("On board: ", session.board.filled_count().to_string()),
        stat("Last clear: ", session.last_cleared.len().to_string()),
        stat("Seed: ", session.seed.to_string()),
    ];
    Paragraph::new(stats_lines).render(stats_inner, frame.buffer_mut());

    // --- Controls ---
    let key = Style::default().fg(theme.blocks[3]);
    let dim = Style::default().fg(theme.inactive_fg);
    let help = |k: &'static str, what: &'static str| {
        Line::from(vec![Span::styled(format!("{k:<8}"), key), Span::styled(what, dim)])
    };
    let controls = vec![
        help("Mouse", "drag & drop"),
        help("1..9", "pick piece"),
        help("←↑↓→", "move piece"),
        help("Enter", "drop"),
        help("Esc", "put back"),
        help("P", "pause"),
        help("R", "new game"),
        help("Q", "quit"),
    ];
    Paragraph::new(controls).render(chunks[4], frame.buffer_mut());
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let area = frame.area();
    let qw = 24u16.min(area.width);
    let qh = 8u16.min(area.height);
    let quit_rect = Rect {
        x: area.x + area.width.saturating_sub(qw) / 2,
        y: area.y + area.height.saturating_sub(qh) / 2,
        width: qw,
        height: qh,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .style(Style::default().bg(theme.bg))
        .title(" Quit? ");
    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::MainMenu, " Main Menu "),
        (QuitOption::Exit, " Exit "),
    ];

    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default().fg(theme.bg).bg(theme.title).bold()
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.y + inner.height {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Dim;

    fn config(mode: GameMode) -> GameConfig {
        let (rows, cols) = mode.default_board();
        let t = mode.default_template();
        GameConfig {
            mode,
            board: Dim::new(rows, cols),
            template: Dim::new(t, t),
            slots: 3,
            seed: Some(7),
        }
    }

    #[test]
    fn test_required_size() {
        // Board 10x10: 22x12 with border; home 3 slots of 5x5: 3*10 + 2*2 + 2 = 36 wide, 7 high.
        assert_eq!(required_size(&config(GameMode::Lines)), (36 + SIDEBAR_WIDTH, 12 + 7));
    }

    #[test]
    fn test_required_size_saturates() {
        let mut cfg = config(GameMode::Lines);
        cfg.board = Dim::new(20_000, 32_760);
        assert_eq!(required_size(&cfg), (u16::MAX, u16::MAX));
    }

    #[test]
    fn test_placement_inside_borders() {
        let cfg = config(GameMode::Lines);
        let area = Rect::new(0, 0, 120, 40);
        let layout = play_layout(area, &cfg);
        let p = placement(area, &cfg);
        assert_eq!(p.board, Pixel::new(i32::from(layout.board.y) + 1, i32::from(layout.board.x) + 1));
        assert!(p.home.row > p.board.row + cfg.board.rows as i32);
        // Board sits entirely inside the terminal.
        assert!(layout.board.right() <= area.right());
        assert!(layout.home.bottom() <= area.bottom());
        assert!(layout.sidebar.x >= layout.home.right());
    }

    #[test]
    fn test_placement_matches_session_layout() {
        let cfg = config(GameMode::FourColors);
        let area = Rect::new(0, 0, 100, 30);
        let session = GameSession::new(&cfg, placement(area, &cfg));
        let layout = play_layout(area, &cfg);
        let first = &session.pool.slots()[0].area;
        assert_eq!(first.pos, Pixel::new(i32::from(layout.home.y) + 1, i32::from(layout.home.x) + 1));
        let (h, w) = session.board.pixel_size();
        assert_eq!((w as u16 + 2, h as u16 + 2), (layout.board.width, layout.board.height));
    }

    #[test]
    fn test_put_skips_offscreen() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 2));
        put(&mut buf, Pixel::new(-1, 0), "x", Style::default());
        put(&mut buf, Pixel::new(0, 9), "x", Style::default());
        put(&mut buf, Pixel::new(1, 3), "x", Style::default());
        assert_eq!(buf[(3, 1)].symbol(), "x");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }

    #[test]
    fn test_clearing_positions_cover_both_columns() {
        let board = Area::new(4, 4, Pixel::new(2, 3), BLOCK_CELL_SIZE);
        let set = clearing_buffer_positions(&board, &[CellIndex::new(1, 2)]);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&(7, 3)));
        assert!(set.contains(&(8, 3)));
    }
}
