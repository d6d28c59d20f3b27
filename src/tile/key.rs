use std::fmt;

/// Number of resolution levels in the tile hierarchy.
pub const LEVELS: usize = 6;

/// Side length in pixels of a finest-level (level 0) tile.
pub const FINEST_TILE: u32 = 8;

const COORD_BITS: u32 = 14;
const COORD_MASK: u32 = (1 << COORD_BITS) - 1;
const LEVEL_MASK: u32 = 0b111;

const X_SHIFT: u32 = 0;
const Y_SHIFT: u32 = COORD_BITS;
const LEVEL_SHIFT: u32 = 28;

/// Largest tile coordinate a key can hold on either axis.
pub const MAX_TILE_COORD: u32 = COORD_MASK;

/// A resolution level: 0 is the finest (8 px tiles), 5 the coarsest (256 px tiles).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Level(u8);

impl Level {
    pub const FINEST: Self = Self(0);
    pub const COARSEST: Self = Self(LEVELS as u8 - 1);

    /// Returns `None` when `level` is outside `0..LEVELS`.
    #[inline]
    pub fn new(level: u8) -> Option<Self> {
        (usize::from(level) < LEVELS).then_some(Self(level))
    }

    #[inline] pub fn get(self) -> u8 { self.0 }

    #[inline] pub fn index(self) -> usize { usize::from(self.0) }

    /// Side length of a tile at this level, in pixels.
    #[inline] pub fn tile_side(self) -> u32 { FINEST_TILE << self.0 }

    #[inline] pub fn is_finest(self) -> bool { self.0 == 0 }

    /// All levels, coarsest first. This is the order both the classifier and the lookup walk.
    pub fn coarse_to_fine() -> impl Iterator<Item = Level> {
        (0..LEVELS as u8).rev().map(Level)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{} ({}px)", self.0, self.tile_side())
    }
}

/// A packed 32-bit tile identifier.
///
/// ```text
///  31 | 30..28 | 27..14 | 13..0
///   0 | level  |   y    |   x
/// ```
///
/// Keys compare by raw value. Within one level that is the same as comparing
/// `(y, x)` lexicographically, which the per-level tables rely on for binary search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKey(u32);

impl TileKey {
    /// Pack a key. Coordinates wider than 14 bits are truncated by masking.
    #[inline]
    pub fn new(level: Level, x: u32, y: u32) -> Self {
        Self(
            (u32::from(level.0) & LEVEL_MASK) << LEVEL_SHIFT
                | (y & COORD_MASK) << Y_SHIFT
                | (x & COORD_MASK) << X_SHIFT,
        )
    }

    /// Key of the tile at `level` that contains pixel `(px, py)`.
    #[inline]
    pub fn containing(level: Level, px: u32, py: u32) -> Self {
        let side = level.tile_side();
        Self::new(level, px / side, py / side)
    }

    #[inline] pub fn from_raw(raw: u32) -> Self { Self(raw) }

    #[inline] pub fn raw(self) -> u32 { self.0 }

    #[inline] pub fn level(self) -> Level { Level(((self.0 >> LEVEL_SHIFT) & LEVEL_MASK) as u8) }

    #[inline] pub fn x(self) -> u32 { (self.0 >> X_SHIFT) & COORD_MASK }

    #[inline] pub fn y(self) -> u32 { (self.0 >> Y_SHIFT) & COORD_MASK }

    /// Pixel rectangle `(x0, y0, x1, y1)` covered by this tile, end-exclusive.
    pub fn footprint(self) -> (u32, u32, u32, u32) {
        let side = self.level().tile_side();
        let (x0, y0) = (self.x() * side, self.y() * side);
        (x0, y0, x0 + side, y0 + side)
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileKey(L{}, x={}, y={})", self.level().get(), self.x(), self.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(l: u8) -> Level { Level::new(l).unwrap() }

    #[test]
    fn round_trip_extremes() {
        let cases = [
            (0, MAX_TILE_COORD, MAX_TILE_COORD),
            (0, MAX_TILE_COORD, 0),
            (0, 0, MAX_TILE_COORD),
            (0, 0, 0),
            (1, 1, 1),
            (1, 2, 3),
            (2, 3, 1),
            (3, 3, 3),
            (5, 1 << 13 | 7, 1 << 13 | 3),
        ];
        for (l, x, y) in cases {
            let key = TileKey::new(level(l), x, y);
            assert_eq!(key.level(), level(l), "level of {key}");
            assert_eq!(key.x(), x, "x of {key}");
            assert_eq!(key.y(), y, "y of {key}");
        }
    }

    #[test]
    fn round_trip_every_level_sampled_coords() {
        for l in Level::coarse_to_fine() {
            for x in (0..=MAX_TILE_COORD).step_by(997) {
                for y in (0..=MAX_TILE_COORD).step_by(1009) {
                    let key = TileKey::new(l, x, y);
                    assert_eq!((key.level(), key.x(), key.y()), (l, x, y));
                }
            }
        }
    }

    #[test]
    fn fields_do_not_overlap() {
        let x_only = TileKey::new(Level::FINEST, MAX_TILE_COORD, 0).raw();
        let y_only = TileKey::new(Level::FINEST, 0, MAX_TILE_COORD).raw();
        let level_only = TileKey::new(Level::COARSEST, 0, 0).raw();
        assert_eq!(x_only & y_only, 0);
        assert_eq!(x_only & level_only, 0);
        assert_eq!(y_only & level_only, 0);
        assert_eq!(TileKey::new(Level::COARSEST, MAX_TILE_COORD, MAX_TILE_COORD).raw() >> 31, 0);
    }

    #[test]
    fn oversized_coordinates_are_masked() {
        let key = TileKey::new(level(2), (1 << 14) + 5, (1 << 15) + 9);
        assert_eq!(key.x(), 5);
        assert_eq!(key.y(), 9);
        assert_eq!(key.level(), level(2));
    }

    #[test]
    fn ordering_within_level_is_row_major() {
        let l = level(3);
        let coords = [(0, 0), (5, 0), (MAX_TILE_COORD, 0), (0, 1), (3, 1), (0, 200), (9, 200)];
        for pair in coords.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (ka, kb) = (TileKey::new(l, a.0, a.1), TileKey::new(l, b.0, b.1));
            assert_eq!(ka.cmp(&kb), (a.1, a.0).cmp(&(b.1, b.0)));
            assert!(ka < kb);
        }
    }

    #[test]
    fn levels_order_coarse_to_fine() {
        let sides: Vec<u32> = Level::coarse_to_fine().map(Level::tile_side).collect();
        assert_eq!(sides, vec![256, 128, 64, 32, 16, 8]);
        assert!(Level::new(6).is_none());
    }

    #[test]
    fn containing_and_footprint_agree() {
        let key = TileKey::containing(level(2), 100, 70);
        assert_eq!((key.x(), key.y()), (3, 2));
        assert_eq!(key.footprint(), (96, 64, 128, 96));
    }
}
