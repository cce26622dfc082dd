// Game session state machine
// Wraps one board, tracks the game status and reports transitions to the UI

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::sl_board::{Board, Coord, FlagOutcome, RevealOutcome};
use crate::sl_error::BoardError;

/// Overall game status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::InProgress
    }
}

/// Cells the UI marks when a mine goes off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossReport {
    pub detonated: Coord,
    /// Every mine without a flag on it, the detonated one included
    pub unflagged_mines: Vec<Coord>,
    /// Flags sitting on safe cells
    pub wrong_flags: Vec<Coord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Won,
    Lost(LossReport),
}

/// What a command changed. An empty update means the command was a no-op
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Update {
    /// Cells whose rendering changed
    pub cells: Vec<Coord>,
    /// Set on the single command that ends the game
    pub transition: Option<Transition>,
}

impl Update {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.transition.is_none()
    }
}

/// How a single cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    /// Mine exposed at the end of the game
    Mine,
    /// The mine that ended the game
    Detonated,
    /// Flag on a safe cell, shown after a loss
    WrongFlag,
}

/// One game on one board.
///
/// Every command is a no-op once the game is won or lost; only [`reset`]
/// starts a new game.
///
/// [`reset`]: GameSession::reset
#[derive(Debug)]
pub struct GameSession<R = StdRng> {
    board: Board,
    rng: R,
    status: GameStatus,
    detonated: Option<Coord>,
}

impl GameSession<StdRng> {
    /// Start a game seeded from OS entropy
    pub fn new(size: usize, mines: usize) -> Result<Self, BoardError> {
        GameSession::with_rng(size, mines, StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_rng(size: usize, mines: usize, mut rng: R) -> Result<Self, BoardError> {
        let board = Board::new(size, mines, &mut rng)?;
        info!("Starting new game: {}x{} with {} mines", size, size, mines);
        Ok(GameSession::from_board(board, rng))
    }

    /// Play on a prepared board; `rng` is used for later resets
    pub fn from_board(board: Board, rng: R) -> Self {
        GameSession {
            board,
            rng,
            status: GameStatus::InProgress,
            detonated: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn detonated(&self) -> Option<Coord> {
        self.detonated
    }

    /// Start over on a fresh layout with the same size and mine count
    #[instrument(level = "trace", skip(self))]
    pub fn reset(&mut self) {
        self.board.reset(&mut self.rng);
        self.status = GameStatus::InProgress;
        self.detonated = None;
        info!(
            "Game reset: {}x{} with {} mines",
            self.board.size(),
            self.board.size(),
            self.board.mine_count()
        );
    }

    #[instrument(level = "trace", skip(self))]
    pub fn reveal(&mut self, coord: Coord) -> Result<Update, BoardError> {
        if self.status.is_over() {
            // validate even when frozen so bad input is still reported
            self.board.is_mine(coord)?;
            debug!("Ignoring reveal on finished game at {:?}", coord);
            return Ok(Update::default());
        }

        match self.board.reveal(coord)? {
            RevealOutcome::Ignored => {
                debug!("Ignoring reveal on open or flagged cell {:?}", coord);
                Ok(Update::default())
            }
            RevealOutcome::Exploded => Ok(self.lose(coord)),
            RevealOutcome::Opened(cells) => {
                debug!("Revealed {} cells from {:?}", cells.len(), coord);
                Ok(self.settle(cells))
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn toggle_flag(&mut self, coord: Coord) -> Result<Update, BoardError> {
        if self.status.is_over() {
            self.board.is_mine(coord)?;
            debug!("Ignoring flag on finished game at {:?}", coord);
            return Ok(Update::default());
        }

        match self.board.toggle_flag(coord)? {
            FlagOutcome::Ignored => {
                debug!("Ignoring flag on revealed cell {:?}", coord);
                Ok(Update::default())
            }
            FlagOutcome::Placed | FlagOutcome::Removed => Ok(self.settle(vec![coord])),
        }
    }

    /// Open every hidden, unflagged neighbor of a revealed number whose
    /// flag count already matches it. A misplaced flag makes this lose.
    #[instrument(level = "trace", skip(self))]
    pub fn chord(&mut self, coord: Coord) -> Result<Update, BoardError> {
        let neighbors = self.board.neighbors(coord)?;
        if self.status.is_over() || !self.board.is_revealed(coord)? {
            return Ok(Update::default());
        }

        let adj = self.board.adjacent_mine_count(coord)? as usize;
        let mut flagged = 0;
        let mut targets = Vec::new();
        for &n in &neighbors {
            if self.board.is_flagged(n)? {
                flagged += 1;
            } else if !self.board.is_revealed(n)? {
                targets.push(n);
            }
        }
        if adj == 0 || flagged != adj {
            debug!("Chord at {:?} needs {} flags, found {}", coord, adj, flagged);
            return Ok(Update::default());
        }

        for &n in &targets {
            if self.board.is_mine(n)? {
                return Ok(self.lose(n));
            }
        }
        let mut cells = Vec::new();
        for n in targets {
            if let RevealOutcome::Opened(opened) = self.board.reveal(n)? {
                cells.extend(opened);
            }
        }
        debug!("Chord at {:?} opened {} cells", coord, cells.len());
        Ok(self.settle(cells))
    }

    /// Rendering state of one cell under the current status
    pub fn cell_view(&self, coord: Coord) -> Result<CellView, BoardError> {
        let board = &self.board;
        let mine = board.is_mine(coord)?;
        let flagged = board.is_flagged(coord)?;

        if board.is_revealed(coord)? {
            return Ok(CellView::Open(board.adjacent_mine_count(coord)?));
        }
        let view = match self.status {
            GameStatus::Lost if self.detonated == Some(coord) => CellView::Detonated,
            GameStatus::Lost if flagged && !mine => CellView::WrongFlag,
            GameStatus::Lost | GameStatus::Won if mine && !flagged => CellView::Mine,
            _ if flagged => CellView::Flagged,
            _ => CellView::Hidden,
        };
        Ok(view)
    }

    /// Check the win predicates after cells opened or a flag moved
    fn settle(&mut self, mut cells: Vec<Coord>) -> Update {
        if !(self.board.is_cleared() || self.board.flags_match_mines()) {
            return Update {
                cells,
                transition: None,
            };
        }

        self.status = GameStatus::Won;
        info!(
            "Game won with {} cells revealed and {} flags",
            self.board.revealed_count(),
            self.board.flag_count()
        );
        cells.extend(self.board.unflagged_mines());
        Update {
            cells,
            transition: Some(Transition::Won),
        }
    }

    fn lose(&mut self, detonated: Coord) -> Update {
        self.status = GameStatus::Lost;
        self.detonated = Some(detonated);

        let unflagged_mines: Vec<Coord> = self.board.unflagged_mines().collect();
        let wrong_flags: Vec<Coord> = self.board.misplaced_flags().collect();
        info!(
            "Player hit mine at {:?} - game over, {} mines exposed, {} wrong flags",
            detonated,
            unflagged_mines.len(),
            wrong_flags.len()
        );

        let mut cells = unflagged_mines.clone();
        cells.extend(&wrong_flags);
        Update {
            cells,
            transition: Some(Transition::Lost(LossReport {
                detonated,
                unflagged_mines,
                wrong_flags,
            })),
        }
    }
}
