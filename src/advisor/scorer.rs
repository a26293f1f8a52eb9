//! Weighted-priority strategy: scores every empty cell of the target
//! and plays the maximum.

use super::{is_dangerous_destination, would_win};
use crate::engine::{Cell, Game, Player, Position, SubBoard, LINES};

/// Completing the target sub-board. Dominates every other combination
/// even after the dangerous-destination penalty.
const WIN: i32 = 100;
/// Deducted from a winning move that hands the opponent a dangerous
/// destination.
const WIN_DANGEROUS_PENALTY: i32 = 30;
/// Denying the opponent's immediate completion.
const BLOCK: i32 = 50;
/// Extending toward a future two-in-a-row while the destination stays
/// safe.
const BUILD: i32 = 10;
/// Floor bonus for any move with a safe destination.
const SAFE: i32 = 5;

/// Positional weight: center over corners over edges.
fn positional(cell: Position) -> i32 {
    if cell == Position::CENTER {
        3
    } else if Position::CORNERS.contains(&cell) {
        2
    } else {
        1
    }
}

/// True if placing `player` at `cell` leaves a line holding two of
/// their marks and one empty cell.
fn builds_toward_win(board: &SubBoard, cell: Position, player: Player) -> bool {
    let mut trial = *board;
    trial.set(cell, Cell::Marked(player));
    let marks = trial.marks();
    LINES.iter().any(|line| {
        let ours = line
            .iter()
            .filter(|p| marks[p.index()] == Some(player))
            .count();
        let empty = line.iter().filter(|p| marks[p.index()].is_none()).count();
        ours == 2 && empty == 1
    })
}

/// Priority of one empty cell.
fn score(game: &Game, target: Position, cell: Position, player: Player) -> i32 {
    let board = game.board().get(target);
    let mut score = positional(cell);
    let dangerous = is_dangerous_destination(game, cell, player);

    if would_win(board, cell, player) {
        score += WIN;
        if dangerous {
            score -= WIN_DANGEROUS_PENALTY;
        }
    }
    if would_win(board, cell, player.opponent()) {
        score += BLOCK;
    }
    if !dangerous {
        score += SAFE;
        if builds_toward_win(board, cell, player) {
            score += BUILD;
        }
    }
    score
}

/// Picks the max-priority empty cell; ties break to the lowest index.
pub(super) fn pick(game: &Game, target: Position, player: Player) -> Option<Position> {
    let board = game.board().get(target);
    let mut best: Option<(Position, i32)> = None;
    for cell in Position::ALL {
        if !board.is_empty(cell) {
            continue;
        }
        let priority = score(game, target, cell, player);
        match best {
            Some((_, top)) if priority <= top => {}
            _ => best = Some((cell, priority)),
        }
    }
    best.map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Move;

    fn p(index: usize) -> Position {
        Position::from_index(index).expect("index in range")
    }

    fn play(game: &mut Game, moves: &[(usize, usize)]) {
        for &(board, cell) in moves {
            let mv = Move::new(p(board), p(cell), game.to_move());
            game.apply_move(mv).expect("scripted move is legal");
        }
    }

    #[test]
    fn test_opening_picks_center() {
        let game = Game::new();
        assert_eq!(pick(&game, p(0), Player::X), Some(Position::CENTER));
    }

    #[test]
    fn test_takes_winning_cell_over_everything() {
        // Sub-board 0 ends with X on {1,2} and O on {3,6}; O to move,
        // forced into board 0. Cell 0 completes O's left column (and
        // happens to deny X's top row at the same time).
        let mut game = Game::new();
        play(
            &mut game,
            &[
                (0, 1),
                (1, 1),
                (1, 0),
                (0, 3),
                (3, 0),
                (0, 6),
                (6, 2),
                (2, 0),
                (0, 2),
                (2, 4),
                (4, 0),
            ],
        );
        assert_eq!(game.to_move(), Player::O);
        let cell = pick(&game, p(0), Player::O).expect("board 0 has empty cells");
        assert_eq!(cell, p(0));
    }

    #[test]
    fn test_build_beats_bare_center() {
        // Sub-board 0 holds X at 1 with O at 7 killing the center
        // column: the center no longer extends any X line, so the
        // corner completing two-in-a-row with cell 1 outranks it.
        let mut game = Game::new();
        play(&mut game, &[(0, 1), (1, 7), (7, 0), (0, 7)]);
        let cell = pick(&game, p(0), Player::X).expect("board 0 has empty cells");
        assert_eq!(cell, p(0));
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        // Fresh board: the four corners tie behind the center; remove
        // the center and the first corner must win the tie.
        let mut game = Game::new();
        play(&mut game, &[(0, 4)]);
        let cell = pick(&game, p(0), Player::O).expect("board 0 has empty cells");
        assert_eq!(cell, p(0));
    }
}
