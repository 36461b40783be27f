//! Piece catalog - static definitions of the seven tetromino shapes.
//!
//! Each shape is four block offsets plus a pivot, a color tag, a rotation
//! class and the glyph pair the terminal view draws a block with. Rotation
//! is a fixed-pivot 90-degree integer rotation with no wall kicks; the
//! rotation class decides whether (and how) a shape rotates at all.

use blockfall_types::{PieceColor, PieceKind, Point, RotateDir, RotationClass};

/// Immutable catalog entry for one tetromino kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    pub kind: PieceKind,
    /// Opening/closing glyphs a renderer draws one block with.
    pub open: char,
    pub close: char,
    /// Block offsets relative to the piece position.
    pub blocks: [Point; 4],
    /// Rotation pivot, in the same relative frame as `blocks`.
    pub pivot: Point,
    pub color: PieceColor,
    pub class: RotationClass,
}

const SHAPES: [PieceShape; 7] = [
    PieceShape {
        kind: PieceKind::I,
        open: '<',
        close: '>',
        blocks: [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(3, 0),
        ],
        pivot: Point::new(1, 0),
        color: PieceColor::Cyan,
        class: RotationClass::TwoState,
    },
    PieceShape {
        kind: PieceKind::O,
        open: '[',
        close: ']',
        blocks: [
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(1, 1),
            Point::new(2, 1),
        ],
        pivot: Point::new(1, 0),
        color: PieceColor::Yellow,
        class: RotationClass::None,
    },
    PieceShape {
        kind: PieceKind::T,
        open: '(',
        close: ')',
        blocks: [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(1, 1),
        ],
        pivot: Point::new(1, 0),
        color: PieceColor::Magenta,
        class: RotationClass::Normal,
    },
    PieceShape {
        kind: PieceKind::S,
        open: '{',
        close: '}',
        blocks: [
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(0, 1),
            Point::new(1, 1),
        ],
        pivot: Point::new(1, 1),
        color: PieceColor::Green,
        class: RotationClass::TwoState,
    },
    PieceShape {
        kind: PieceKind::Z,
        open: '{',
        close: '}',
        blocks: [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(2, 1),
        ],
        pivot: Point::new(1, 1),
        color: PieceColor::Red,
        class: RotationClass::TwoState,
    },
    PieceShape {
        kind: PieceKind::J,
        open: '[',
        close: ']',
        blocks: [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
        ],
        pivot: Point::new(1, 0),
        color: PieceColor::Blue,
        class: RotationClass::Normal,
    },
    PieceShape {
        kind: PieceKind::L,
        open: '(',
        close: ')',
        blocks: [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(0, 1),
        ],
        pivot: Point::new(1, 0),
        color: PieceColor::White,
        class: RotationClass::Normal,
    },
];

/// Look up the catalog entry for a piece kind.
pub fn shape(kind: PieceKind) -> &'static PieceShape {
    &SHAPES[kind.index()]
}

/// Rotate one block offset 90 degrees about a pivot.
///
/// Clockwise in the local frame: `(x, y) -> (-y, x)`. Screen `y` grows
/// downward, so this turns the piece clockwise on screen.
pub fn rotate_offset(block: Point, pivot: Point, dir: RotateDir) -> Point {
    let lx = block.x - pivot.x;
    let ly = block.y - pivot.y;
    let (rx, ry) = match dir {
        RotateDir::Clockwise => (-ly, lx),
        RotateDir::CounterClockwise => (ly, -lx),
    };
    Point::new(pivot.x + rx, pivot.y + ry)
}

/// Rotate all four block offsets of a shape about its pivot.
pub fn rotate_blocks(blocks: &[Point; 4], pivot: Point, dir: RotateDir) -> [Point; 4] {
    [
        rotate_offset(blocks[0], pivot, dir),
        rotate_offset(blocks[1], pivot, dir),
        rotate_offset(blocks[2], pivot, dir),
        rotate_offset(blocks[3], pivot, dir),
    ]
}
