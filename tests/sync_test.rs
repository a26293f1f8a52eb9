//! Tests for snapshot export, validation, and the wire format.

use ultimate_ttt::{
    ActiveConstraint, Game, GameSnapshot, GameStatus, LastMove, Move, Player, Position,
    SnapshotError,
};

fn pos(index: usize) -> Position {
    Position::from_index(index).expect("index in 0..9")
}

fn play(game: &mut Game, script: &[(usize, usize)]) {
    for &(board, cell) in script {
        let mark = game.to_move();
        game.apply_move(Move::new(pos(board), pos(cell), mark))
            .expect("scripted move is legal");
    }
}

fn mid_game() -> Game {
    let mut game = Game::new();
    play(&mut game, &[(0, 2), (2, 0), (0, 1), (1, 0), (0, 0), (3, 4)]);
    game
}

#[test]
fn test_snapshot_round_trips_through_a_fresh_game() {
    let source = mid_game();
    let snapshot = source.snapshot();

    let mut replica = Game::new();
    replica
        .apply_snapshot(&snapshot)
        .expect("snapshot from a live game is valid");

    assert_eq!(replica.board(), source.board());
    assert_eq!(replica.to_move(), source.to_move());
    assert_eq!(replica.status(), source.status());
    assert_eq!(replica.sub_outcomes(), source.sub_outcomes());
    assert_eq!(replica.active_constraint(), source.active_constraint());
    // The move history stays local; the replica starts its own.
    assert!(replica.history().is_empty());
}

#[test]
fn test_snapshot_serializes_with_camel_case_keys() {
    let snapshot = mid_game().snapshot();
    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");

    assert!(json.get("currentPlayer").is_some());
    assert!(json.get("activeBoard").is_some());
    assert!(json.get("lastMove").is_some());
    assert_eq!(json["activeBoard"], serde_json::json!(4));

    let back: GameSnapshot = serde_json::from_value(json).expect("snapshot deserializes");
    assert_eq!(back, snapshot);
}

#[test]
fn test_tampered_winner_is_rejected() {
    let mut snapshot = mid_game().snapshot();
    snapshot.winner = Some(Player::O);

    let mut game = Game::new();
    let before = game.clone();
    let result = game.apply_snapshot(&snapshot);
    assert_eq!(result, Err(SnapshotError::WinnerMismatch));
    // Rejection leaves local state untouched.
    assert_eq!(game, before);
}

#[test]
fn test_tampered_active_board_is_rejected() {
    let mut snapshot = mid_game().snapshot();
    snapshot.active_board = Some(8);

    let mut game = Game::new();
    let result = game.apply_snapshot(&snapshot);
    assert_eq!(result, Err(SnapshotError::ConstraintMismatch));
}

#[test]
fn test_out_of_range_index_is_rejected() {
    let mut snapshot = mid_game().snapshot();
    snapshot.active_board = Some(9);

    let mut game = Game::new();
    let result = game.apply_snapshot(&snapshot);
    assert_eq!(result, Err(SnapshotError::IndexOutOfRange(9)));
}

#[test]
fn test_last_move_must_match_the_cells() {
    let mut snapshot = mid_game().snapshot();
    snapshot.last_move = Some(LastMove {
        board: 3,
        cell: 4,
        player: Player::X,
    });

    let mut game = Game::new();
    let result = game.apply_snapshot(&snapshot);
    assert_eq!(result, Err(SnapshotError::LastMoveMismatch));
}

#[test]
fn test_snapshot_into_a_decided_board_relaxes_the_constraint() {
    // Board 2 is full and won by O; the last move sent the opponent
    // into it, so the active board must be open.
    let mut board_two = [None; 9];
    for cell in [0, 1, 2, 4, 6] {
        board_two[cell] = Some(Player::O);
    }
    for cell in [3, 5, 7, 8] {
        board_two[cell] = Some(Player::X);
    }
    let mut cells = [[None; 9]; 9];
    cells[2] = board_two;
    cells[5][2] = Some(Player::X);

    let snapshot = GameSnapshot {
        board: cells,
        current_player: Player::O,
        active_board: None,
        winner: None,
        last_move: Some(LastMove {
            board: 5,
            cell: 2,
            player: Player::X,
        }),
    };

    let mut game = Game::new();
    game.apply_snapshot(&snapshot)
        .expect("derived constraint matches the claim");
    assert_eq!(game.active_constraint(), ActiveConstraint::Any);
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.to_move(), Player::O);

    // Claiming the decided board as forced is a mismatch.
    let mut tampered = snapshot;
    tampered.active_board = Some(2);
    let mut game = Game::new();
    assert_eq!(
        game.apply_snapshot(&tampered),
        Err(SnapshotError::ConstraintMismatch)
    );
}
