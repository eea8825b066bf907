//! Blocktui: drag-and-drop block puzzle in the terminal.

mod app;
mod area;
mod game;
mod generator;
mod highscores;
mod home;
mod input;
mod matcher;
mod matrix;
mod theme;
mod ui;

use anyhow::{Result, bail};
use app::App;
use clap::{Parser, ValueEnum};
use generator::PieceGenerator;
use matcher::ClearRule;
use matrix::Dim;

/// Largest board edge (and so template edge) in cells.
pub const MAX_BOARD_EDGE: usize = 200;

/// Resolved game settings: mode plus board, piece template and pool sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub mode: GameMode,
    pub board: Dim,
    pub template: Dim,
    pub slots: usize,
    /// Piece generator seed; random per game when unset.
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Mode defaults, overridden by whatever the command line sets.
    pub fn resolve(mode: GameMode, args: &Args) -> Result<Self> {
        let (rows, cols) = mode.default_board();
        let template = args.template.unwrap_or(mode.default_template());
        let config = Self {
            mode,
            board: Dim::new(args.height.unwrap_or(rows), args.width.unwrap_or(cols)),
            template: Dim::new(template, template),
            slots: args.slots,
            seed: args.seed,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.board.is_empty() {
            bail!("board must be at least 1x1, got {}x{}", self.board.rows, self.board.cols);
        }
        if self.board.rows > MAX_BOARD_EDGE || self.board.cols > MAX_BOARD_EDGE {
            bail!(
                "board can be at most {MAX_BOARD_EDGE}x{MAX_BOARD_EDGE}, got {}x{}",
                self.board.rows,
                self.board.cols
            );
        }
        if self.template.is_empty() {
            bail!("piece template must be at least 1x1");
        }
        if self.template.rows > self.board.rows || self.template.cols > self.board.cols {
            bail!(
                "piece template {}x{} does not fit the {}x{} board",
                self.template.rows,
                self.template.cols,
                self.board.rows,
                self.board.cols
            );
        }
        if !(1..=9).contains(&self.slots) {
            bail!("home slots must be between 1 and 9, got {}", self.slots);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig::resolve(args.mode, &args)?;
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Drag-and-drop block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blocktui",
    version,
    about = "Drag coloured block pieces onto a grid; full lines, squares or colour clusters clear.",
    long_about = "Blocktui is a terminal block puzzle played with the mouse (or keyboard).\n\n\
        Drag a piece from the home slots below the board and drop it on a free spot. \
        Depending on the mode, full rows and columns (lines), full rows, columns and 3x3 \
        squares (squares-lines), or connected groups of four or more same-coloured blocks \
        (four-colors) are removed and scored. New pieces arrive when all slots are used. \
        The game ends when no remaining piece fits.\n\n\
        CONTROLS:\n  Mouse       Drag a piece, release to drop; right click returns it\n  \
        1..9        Pick up a piece    Arrows / hjkl  Move it    Enter/Space  Drop\n  \
        Esc         Return piece       P  Pause       R  New game  Q  Quit"
)]
pub struct Args {
    /// Game mode: lines (rows/columns), squares-lines (rows/columns/3x3 squares), four-colors (colour clusters).
    #[arg(short, long, default_value = "lines")]
    pub mode: GameMode,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Board width in cells (mode default if not set).
    #[arg(long, value_name = "COLS")]
    pub width: Option<usize>,

    /// Board height in cells (mode default if not set).
    #[arg(long, value_name = "ROWS")]
    pub height: Option<usize>,

    /// Edge of the square piece template in cells (mode default if not set).
    #[arg(long, value_name = "N")]
    pub template: Option<usize>,

    /// Number of home slots pieces are picked from.
    #[arg(long, default_value = "3", value_name = "N")]
    pub slots: usize,

    /// Seed for piece generation (same seed, same pieces).
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Disable the clear fade animation.
    #[arg(long)]
    pub no_animation: bool,

    /// Skip main menu and start game immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum GameMode {
    #[default]
    Lines,
    #[value(alias = "squares")]
    SquaresLines,
    #[value(alias = "four-colours", alias = "colors")]
    FourColors,
}

impl GameMode {
    pub const ALL: [Self; 3] = [Self::Lines, Self::SquaresLines, Self::FourColors];

    pub fn rule(self) -> ClearRule {
        match self {
            Self::Lines => ClearRule::Lines,
            Self::SquaresLines => ClearRule::SquaresLines,
            Self::FourColors => ClearRule::FourColors,
        }
    }

    pub fn generator(self) -> PieceGenerator {
        match self {
            Self::Lines | Self::SquaresLines => PieceGenerator::Polyomino {
                min_cells: 1,
                max_cells: 5,
            },
            Self::FourColors => PieceGenerator::Splatter {
                min_cells: 2,
                max_cells: 4,
            },
        }
    }

    /// Default board (rows, cols).
    pub fn default_board(self) -> (usize, usize) {
        match self {
            Self::Lines | Self::FourColors => (10, 10),
            Self::SquaresLines => (9, 9),
        }
    }

    pub fn default_template(self) -> usize {
        match self {
            Self::Lines | Self::SquaresLines => 5,
            Self::FourColors => 3,
        }
    }

    /// Kebab-case name, as on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Lines => "lines",
            Self::SquaresLines => "squares-lines",
            Self::FourColors => "four-colors",
        }
    }

    /// Position in `ALL`.
    pub fn index(self) -> usize {
        match self {
            Self::Lines => 0,
            Self::SquaresLines => 1,
            Self::FourColors => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Lines => Self::SquaresLines,
            Self::SquaresLines => Self::FourColors,
            Self::FourColors => Self::Lines,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Lines => Self::FourColors,
            Self::SquaresLines => Self::Lines,
            Self::FourColors => Self::SquaresLines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("blocktui").chain(extra.iter().copied()))
    }

    #[test]
    fn test_mode_defaults() {
        let config = GameConfig::resolve(GameMode::SquaresLines, &args(&[])).unwrap();
        assert_eq!(config.board, Dim::new(9, 9));
        assert_eq!(config.template, Dim::new(5, 5));
        assert_eq!(config.slots, 3);
        let config = GameConfig::resolve(GameMode::FourColors, &args(&[])).unwrap();
        assert_eq!(config.template, Dim::new(3, 3));
    }

    #[test]
    fn test_overrides() {
        let a = args(&["--mode", "four-colors", "--width", "12", "--height", "8", "--slots", "4", "--seed", "9"]);
        assert_eq!(a.mode, GameMode::FourColors);
        let config = GameConfig::resolve(a.mode, &a).unwrap();
        assert_eq!(config.board, Dim::new(8, 12));
        assert_eq!(config.slots, 4);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_template_larger_than_board_rejected() {
        let a = args(&["--width", "4", "--height", "4"]);
        assert!(GameConfig::resolve(GameMode::Lines, &a).is_err());
        let a = args(&["--width", "4", "--height", "4", "--template", "4"]);
        assert!(GameConfig::resolve(GameMode::Lines, &a).is_ok());
    }

    #[test]
    fn test_bad_sizes_rejected() {
        assert!(GameConfig::resolve(GameMode::Lines, &args(&["--slots", "0"])).is_err());
        assert!(GameConfig::resolve(GameMode::Lines, &args(&["--width", "0"])).is_err());
        assert!(GameConfig::resolve(GameMode::Lines, &args(&["--template", "0"])).is_err());
    }

    #[test]
    fn test_oversized_board_rejected() {
        let err = GameConfig::resolve(GameMode::Lines, &args(&["--width", "32760"])).unwrap_err();
        assert!(err.to_string().contains("at most"), "{err}");
        assert!(GameConfig::resolve(GameMode::Lines, &args(&["--height", "201"])).is_err());
        let a = args(&["--width", "200", "--height", "200"]);
        assert!(GameConfig::resolve(GameMode::Lines, &a).is_ok());
    }

    #[test]
    fn test_mode_cycle() {
        for mode in GameMode::ALL {
            assert_eq!(mode.next().prev(), mode);
            assert_eq!(GameMode::ALL[mode.index()], mode);
            assert_eq!(GameMode::from_str(mode.name(), true), Ok(mode));
        }
    }
}
