use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk containing world voxel `(wx, wy, wz)` for chunks of side `size`.
    #[inline]
    pub fn containing(wx: i32, wy: i32, wz: i32, size: usize) -> Self {
        let s = size as i32;
        Self {
            cx: wx.div_euclid(s),
            cy: wy.div_euclid(s),
            cz: wz.div_euclid(s),
        }
    }

    /// Position of `(wx, wy, wz)` inside its owning chunk.
    #[inline]
    pub fn local_of(wx: i32, wy: i32, wz: i32, size: usize) -> (usize, usize, usize) {
        let s = size as i32;
        (
            wx.rem_euclid(s) as usize,
            wy.rem_euclid(s) as usize,
            wz.rem_euclid(s) as usize,
        )
    }

    /// World coordinate of this chunk's minimum corner.
    #[inline]
    pub fn base(self, size: usize) -> (i32, i32, i32) {
        let s = size as i32;
        (self.cx * s, self.cy * s, self.cz * s)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }

    /// Chebyshev (max-axis) distance, split into horizontal and vertical parts.
    #[inline]
    pub fn chebyshev_xz_y(self, other: ChunkCoord) -> (i32, i32) {
        let h = (self.cx - other.cx).abs().max((self.cz - other.cz).abs());
        (h, (self.cy - other.cy).abs())
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
