use blockfall::core::Board;
use blockfall::types::{PieceKind, Point, BOARD_HEIGHT, BOARD_WIDTH};

#[test]
fn range_allows_rows_above_the_field() {
    let board = Board::new();
    assert!(board.in_range(0, -1));
    assert!(board.in_range(5, -3));
    assert!(board.in_range(0, 0));
    assert!(board.in_range(BOARD_WIDTH as i8 - 1, BOARD_HEIGHT as i8 - 1));

    assert!(!board.in_range(-1, 5));
    assert!(!board.in_range(BOARD_WIDTH as i8, 5));
    assert!(!board.in_range(3, BOARD_HEIGHT as i8));
}

#[test]
fn cells_above_the_field_read_empty() {
    let mut board = Board::new();
    assert!(!board.is_occupied(4, -1));
    assert!(board.is_free(4, -1));

    // Writes above the field are dropped, not wrapped into the top row.
    board.set(4, -1, Some(PieceKind::T));
    assert!(!board.is_occupied(4, -1));
    assert!(!board.is_occupied(4, 0));
}

#[test]
fn lock_writes_exactly_four_cells() {
    let mut board = Board::new();
    let cells = [
        Point::new(3, 18),
        Point::new(4, 18),
        Point::new(5, 18),
        Point::new(4, 19),
    ];
    board.lock(&cells, PieceKind::T);

    let occupied = board.cells().iter().filter(|c| c.is_some()).count();
    assert_eq!(occupied, 4);
    for p in cells {
        assert!(board.is_occupied(p.x, p.y));
    }
}

#[test]
fn full_rows_reported_in_ascending_order() {
    let mut board = Board::new();
    for &y in &[19, 15, 17] {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(PieceKind::J));
        }
    }
    let rows = board.full_rows();
    assert_eq!(rows.as_slice(), &[15, 17, 19]);
}

#[test]
fn compact_shifts_everything_above() {
    let mut board = Board::new();
    // A marker two rows above a full bottom row.
    board.set(0, 17, Some(PieceKind::L));
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, 19, Some(PieceKind::J));
    }

    let rows = board.full_rows();
    board.compact(&rows);

    assert!(!board.is_row_full(19));
    assert!(board.is_occupied(0, 18));
    assert!(!board.is_occupied(0, 17));
}

#[test]
fn compact_four_rows_leaves_board_empty() {
    let mut board = Board::new();
    for y in 16..20 {
        for x in 0..BOARD_WIDTH as i8 {
            board.set(x, y, Some(PieceKind::I));
        }
    }
    let rows = board.full_rows();
    assert_eq!(rows.len(), 4);
    board.compact(&rows);
    assert!(board.cells().iter().all(|c| c.is_none()));
}
