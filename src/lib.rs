//! Minesweeper (扫雷) board engine with a terminal front end.
//!
//! [`sl_board::Board`] owns the minefield and the cascading reveal;
//! [`sl_session::GameSession`] drives one game through its
//! in-progress/won/lost state machine. Everything else renders or configures.
//!
//! ```
//! use saolei::sl_board::{Board, Coord};
//! use saolei::sl_session::{GameSession, GameStatus};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let board = Board::with_mines(2, [Coord::new(0, 0)]).unwrap();
//! let mut game = GameSession::from_board(board, StdRng::seed_from_u64(0));
//! game.toggle_flag(Coord::new(0, 0)).unwrap();
//! assert_eq!(game.status(), GameStatus::Won);
//! ```

pub mod sl_board;   // Mine placement, adjacency, cascade, win predicates
pub mod sl_color;   // Terminal color adaptation
pub mod sl_config;  // TOML configuration
pub mod sl_error;   // Error types
pub mod sl_lang;    // Localized strings
pub mod sl_log;     // Tracing subscriber setup
pub mod sl_session; // Game state machine
pub mod sl_ui;      // Terminal rendering and input
