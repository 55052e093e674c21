use std::f32::consts::FRAC_1_SQRT_2;

use strata_geom::{Quat, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a face index `[0..6)` back into a `Face` value.
    /// Falls back to `PosY` for out-of-range indices.
    #[inline]
    pub fn from_index(i: usize) -> Face {
        match i {
            0 => Face::PosY,
            1 => Face::NegY,
            2 => Face::PosX,
            3 => Face::NegX,
            4 => Face::PosZ,
            5 => Face::NegZ,
            _ => Face::PosY,
        }
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Rotation taking a unit quad facing +Z onto this face.
    #[inline]
    pub fn rotation(self) -> Quat {
        const S: f32 = FRAC_1_SQRT_2;
        match self {
            Face::PosZ => Quat::IDENTITY,
            Face::NegZ => Quat::new(0.0, 1.0, 0.0, 0.0),
            Face::PosX => Quat::new(0.0, S, 0.0, S),
            Face::NegX => Quat::new(0.0, -S, 0.0, S),
            Face::PosY => Quat::new(-S, 0.0, 0.0, S),
            Face::NegY => Quat::new(S, 0.0, 0.0, S),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_maps_forward_onto_normal() {
        for face in Face::ALL {
            let r = face.rotation().rotate(Vec3::FORWARD);
            let n = face.normal();
            assert!((r - n).length() < 1e-5, "{face:?}: {r:?} vs {n:?}");
        }
    }

    #[test]
    fn index_roundtrip() {
        for face in Face::ALL {
            assert_eq!(Face::from_index(face.index()), face);
        }
    }
}
