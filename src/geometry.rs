//! Geometric value types and the grid snap used to place landscape tiles.

/// Edge length of a landscape tile in source-world units.
pub const TILE_UNIT: i32 = 64;

/// Integer position on the tile grid, in source-world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when both coordinates are less than or equal to `other`'s.
    pub fn dominates(&self, other: &Point) -> bool {
        self.x <= other.x && self.y <= other.y
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel dimensions of a tile texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Raw location triple as exported by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation triple in degrees. Only `yaw` is used for the canvas correction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotator {
    pub pitch: f64,
    pub yaw: f64,
    pub roll: f64,
}

impl Rotator {
    pub const ZERO: Rotator = Rotator { pitch: 0.0, yaw: 0.0, roll: 0.0 };

    pub const fn new(pitch: f64, yaw: f64, roll: f64) -> Self {
        Self { pitch, yaw, roll }
    }
}

/// Snap `n` to the closest multiple of `unit`.
///
/// Computed as `(n + unit/2) - ((n + unit/2) mod unit)` with a floored modulo,
/// so negative coordinates snap on the same lattice as positive ones.
pub fn closest_multiple(n: f64, unit: i32) -> i32 {
    let unit = unit as f64;
    let shifted = n + unit / 2.0;
    (shifted - shifted.rem_euclid(unit)) as i32
}

/// Snap a raw exported location onto the tile grid.
pub fn snap_to_grid(x: f64, y: f64) -> Point {
    Point::new(closest_multiple(x, TILE_UNIT), closest_multiple(y, TILE_UNIT))
}
