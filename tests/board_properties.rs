//! Property-based tests for the board engine and the session state machine
//!
//! Boards are drawn from seeded ChaCha RNGs so every failing case replays.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use saolei::sl_board::{Board, Coord, RevealOutcome};
use saolei::sl_session::{GameSession, GameStatus};

#[derive(Debug, Clone, Copy)]
enum Command {
    Reveal(usize, usize),
    Flag(usize, usize),
    Chord(usize, usize),
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..64, 0usize..64).prop_map(|(r, c)| Command::Reveal(r, c)),
        (0usize..64, 0usize..64).prop_map(|(r, c)| Command::Flag(r, c)),
        (0usize..64, 0usize..64).prop_map(|(r, c)| Command::Chord(r, c)),
    ]
}

/// Board side and a mine count that is always legal for it
fn board_params() -> impl Strategy<Value = (usize, usize)> {
    (2usize..14).prop_flat_map(|size| (Just(size), 1..size * size))
}

fn snapshot(board: &Board) -> (Vec<Coord>, Vec<Coord>) {
    (board.revealed().collect(), board.flags().collect())
}

/// Zero region around `start` plus its numbered border, by breadth-first search
fn expected_closure(board: &Board, start: Coord) -> HashSet<Coord> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        if board.adjacent_mine_count(cell).unwrap() != 0 {
            continue;
        }
        for n in board.neighbors(cell).unwrap() {
            if !board.is_mine(n).unwrap() && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen
}

#[test]
fn prop_placement_is_exact_and_unique() {
    proptest!(|((size, mines) in board_params(), seed in any::<u64>())| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut board = Board::new(size, mines, &mut rng).unwrap();
        for _ in 0..2 {
            let placed: Vec<Coord> = board.mines().collect();
            let unique: HashSet<Coord> = placed.iter().copied().collect();

            // PROPERTY: exactly `mines` distinct in-bounds mines, after new and after reset
            prop_assert_eq!(placed.len(), mines);
            prop_assert_eq!(unique.len(), mines);
            prop_assert!(placed.iter().all(|c| c.row < size && c.col < size));
            board.reset(&mut rng);
        }
    });
}

#[test]
fn prop_adjacency_matches_neighbor_mines() {
    proptest!(|((size, mines) in board_params(), seed in any::<u64>())| {
        let board = Board::new(size, mines, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        for cell in board.coords() {
            let neighbors = board.neighbors(cell).unwrap();
            let expected = neighbors.iter().filter(|&&n| board.is_mine(n).unwrap()).count();
            prop_assert_eq!(board.adjacent_mine_count(cell).unwrap() as usize, expected);
            prop_assert!(neighbors.len() == 3 || neighbors.len() == 5 || neighbors.len() == 8);
        }
    });
}

#[test]
fn prop_cascade_opens_exact_closure() {
    proptest!(|((size, mines) in board_params(), seed in any::<u64>())| {
        let mut board = Board::new(size, mines, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let start = board.coords().find(|&c| !board.is_mine(c).unwrap()).unwrap();
        let expected = expected_closure(&board, start);

        let RevealOutcome::Opened(opened) = board.reveal(start).unwrap() else {
            return Err(TestCaseError::fail("safe cell did not open"));
        };
        let opened_set: HashSet<Coord> = opened.iter().copied().collect();

        // PROPERTY: cascade reveals its closure, nothing more, each cell once
        prop_assert_eq!(opened.len(), opened_set.len());
        prop_assert_eq!(&opened_set, &expected);
        prop_assert_eq!(board.revealed().collect::<HashSet<_>>(), expected);
    });
}

#[test]
fn prop_session_invariants_hold_under_any_commands() {
    proptest!(|(
        (size, mines) in board_params(),
        seed in any::<u64>(),
        commands in prop::collection::vec(command(), 0..80),
    )| {
        let mut game = GameSession::with_rng(size, mines, ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let mut transitions = 0;

        for cmd in commands {
            let before_status = game.status();
            let before = snapshot(game.board());
            let update = match cmd {
                Command::Reveal(r, c) => game.reveal(Coord::new(r % size, c % size)),
                Command::Flag(r, c) => game.toggle_flag(Coord::new(r % size, c % size)),
                Command::Chord(r, c) => game.chord(Coord::new(r % size, c % size)),
            }
            .unwrap();
            if update.transition.is_some() {
                transitions += 1;
            }

            let board = game.board();
            let revealed: HashSet<Coord> = board.revealed().collect();
            let flags: HashSet<Coord> = board.flags().collect();

            // PROPERTY: revealed and flags stay disjoint; no mine is ever revealed
            prop_assert!(revealed.is_disjoint(&flags));
            prop_assert!(revealed.iter().all(|&c| !board.is_mine(c).unwrap()));
            prop_assert_eq!(board.remaining_mines(), mines as isize - flags.len() as isize);

            // PROPERTY: terminal states are frozen
            if before_status.is_over() {
                prop_assert_eq!(game.status(), before_status);
                prop_assert_eq!(snapshot(game.board()), before);
                prop_assert!(update.is_empty());
            }

            // PROPERTY: Won exactly when a win predicate holds
            if game.status() == GameStatus::Won {
                prop_assert!(board.is_cleared() || board.flags_match_mines());
            }
        }
        prop_assert!(transitions <= 1);
    });
}

#[test]
fn prop_double_toggle_and_double_reveal_are_no_ops() {
    proptest!(|(
        (size, mines) in board_params(),
        seed in any::<u64>(),
        row in 0usize..64,
        col in 0usize..64,
    )| {
        let mut board = Board::new(size, mines, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let cell = Coord::new(row % size, col % size);

        let before = snapshot(&board);
        board.toggle_flag(cell).unwrap();
        board.toggle_flag(cell).unwrap();
        prop_assert_eq!(snapshot(&board), before);

        if !board.is_mine(cell).unwrap() {
            board.reveal(cell).unwrap();
            let once = snapshot(&board);
            prop_assert_eq!(board.reveal(cell).unwrap(), RevealOutcome::Ignored);
            prop_assert_eq!(snapshot(&board), once);
        }
    });
}
