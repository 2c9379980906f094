use serde::{Deserialize, Serialize};

/// A falling piece with position, rotation, and type.
///
/// Pieces are immutable values: translation and rotation return new `Piece`
/// instances and leave the original untouched.
///
/// # Coordinate System
///
/// - Position is the board cell of the top-left corner of the 4×4 shape matrix
/// - X increases rightward (columns), Y increases downward (rows)
/// - Either coordinate may be negative while parts of the matrix are empty or
///   the piece overhangs the top of the board
///
/// # Example
///
/// ```
/// use blockfall_engine::{Piece, PieceKind, RotationDirection};
///
/// let piece = Piece::spawn(PieceKind::T, 10);
/// let moved = piece.translated(1, 0);
/// let rotated = moved.rotated(RotationDirection::Clockwise);
/// assert_eq!(rotated.position().x(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    kind: PieceKind,
    rotation: PieceRotation,
    position: PiecePosition,
}

impl Piece {
    /// Row at which new pieces appear.
    pub const SPAWN_Y: i16 = 0;

    #[must_use]
    pub const fn new(kind: PieceKind, rotation: PieceRotation, position: PiecePosition) -> Self {
        Self {
            kind,
            rotation,
            position,
        }
    }

    /// Creates a piece at the spawn position of a board with the given width.
    ///
    /// The 4×4 matrix is centered horizontally (`x = (width - 4) / 2`) at row
    /// [`Self::SPAWN_Y`] in its initial rotation.
    #[must_use]
    pub fn spawn(kind: PieceKind, board_width: usize) -> Self {
        let x = i16::try_from(board_width.saturating_sub(SHAPE_SIZE) / 2).unwrap_or(0);
        Self::new(
            kind,
            PieceRotation::default(),
            PiecePosition::new(x, Self::SPAWN_Y),
        )
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub fn shape(&self) -> &'static ShapeMatrix {
        self.kind.shape(self.rotation)
    }

    /// Board coordinates of every occupied cell of the piece.
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    #[must_use]
    pub fn translated(&self, dx: i16, dy: i16) -> Self {
        Self {
            position: PiecePosition::new(self.position.x + dx, self.position.y + dy),
            ..*self
        }
    }

    #[must_use]
    pub fn rotated(&self, direction: RotationDirection) -> Self {
        Self {
            rotation: self.rotation.rotated(direction),
            ..*self
        }
    }
}

/// Board-relative position of a piece's shape matrix origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiecePosition {
    x: i16,
    y: i16,
}

impl PiecePosition {
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i16 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i16 {
        self.y
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
///
/// Indices always wrap modulo 4.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceRotation(u8);

impl PieceRotation {
    /// Normalizes an arbitrary (possibly negative) rotation index.
    #[must_use]
    pub fn new(index: i32) -> Self {
        // rem_euclid(4) is always in 0..4
        #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = index.rem_euclid(4) as u8;
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn rotated(self, direction: RotationDirection) -> Self {
        match direction {
            RotationDirection::Clockwise => Self((self.0 + 1) % 4),
            RotationDirection::CounterClockwise => Self((self.0 + 3) % 4),
        }
    }

    const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Direction of a rotation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// Enum representing the type of piece.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, derive_more::Display,
)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece type, in canonical order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Returns the occupancy matrix of this piece in the given rotation.
    #[must_use]
    pub fn shape(self, rotation: PieceRotation) -> &'static ShapeMatrix {
        &PIECE_SHAPES[self as usize][rotation.as_usize()]
    }

    /// Returns `(dx, dy)` offsets of occupied cells inside the 4×4 matrix.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i16, i16)> {
        let shape = self.shape(rotation);
        (0..SHAPE_SIZE).flat_map(move |dy| {
            (0..SHAPE_SIZE).filter_map(move |dx| {
                #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let offset = (dx as i16, dy as i16);
                shape[dy][dx].then_some(offset)
            })
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use blockfall_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

/// Side length of every shape matrix.
pub const SHAPE_SIZE: usize = 4;

/// Occupancy of a piece within its 4×4 bounding box, indexed `[row][column]`.
pub type ShapeMatrix = [[bool; SHAPE_SIZE]; SHAPE_SIZE];

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
///
/// Only the top-left `size`×`size` square rotates (3 for most pieces, 4 for I,
/// 2 for O), which keeps pieces pivoting around their own center.
const fn shape_rotations(size: usize, shape: ShapeMatrix) -> [ShapeMatrix; 4] {
    let mut rotates = [shape; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_shape = [[false; SHAPE_SIZE]; SHAPE_SIZE];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                new_shape[y][x] = rotates[i - 1][size - 1 - x][y];
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_shape;
        i += 1;
    }
    rotates
}

const PIECE_SHAPES: [[ShapeMatrix; 4]; PieceKind::LEN] = {
    const C: bool = true;
    const E: bool = false;
    const EEEE: [bool; 4] = [E; 4];
    [
        // I-piece
        shape_rotations(4, [EEEE, [C, C, C, C], EEEE, EEEE]),
        // O-piece
        shape_rotations(2, [[C, C, E, E], [C, C, E, E], EEEE, EEEE]),
        // T-piece
        shape_rotations(3, [[E, C, E, E], [C, C, C, E], EEEE, EEEE]),
        // S-piece
        shape_rotations(3, [[E, C, C, E], [C, C, E, E], EEEE, EEEE]),
        // Z-piece
        shape_rotations(3, [[C, C, E, E], [E, C, C, E], EEEE, EEEE]),
        // J-piece
        shape_rotations(3, [[C, E, E, E], [C, C, C, E], EEEE, EEEE]),
        // L-piece
        shape_rotations(3, [[E, E, C, E], [C, C, C, E], EEEE, EEEE]),
    ]
};
