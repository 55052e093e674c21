use strata_blocks::MaterialId;
use strata_geom::Vec3;
use strata_mesh_cpu::WorldView;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub cell: (i32, i32, i32),
    /// Approximate entry face: opposite the ray's dominant axis.
    pub normal: (i32, i32, i32),
    pub material: MaterialId,
    pub distance: f32,
}

impl RayHit {
    /// The empty cell in front of the hit face, where a placement lands.
    #[inline]
    pub fn adjacent(&self) -> (i32, i32, i32) {
        (
            self.cell.0 + self.normal.0,
            self.cell.1 + self.normal.1,
            self.cell.2 + self.normal.2,
        )
    }
}

/// Normal of the face a ray travelling along `d` most likely entered through.
///
/// Only the largest component counts, so hits near block edges can report
/// the wrong face. Ties resolve x, then y, then z.
fn dominant_axis_normal(d: Vec3) -> (i32, i32, i32) {
    let (ax, ay, az) = (d.x.abs(), d.y.abs(), d.z.abs());
    let sign = |v: f32| if v > 0.0 { -1 } else { 1 };
    if ax >= ay && ax >= az {
        (sign(d.x), 0, 0)
    } else if ay >= az {
        (0, sign(d.y), 0)
    } else {
        (0, 0, sign(d.z))
    }
}

/// Marches from `origin` along `dir` in increments of `step` up to
/// `max_dist`, returning the first non-air cell.
pub fn raycast<V>(origin: Vec3, dir: Vec3, max_dist: f32, step: f32, view: &V) -> Option<RayHit>
where
    V: WorldView + ?Sized,
{
    let len = dir.length();
    if len < 1e-6 || step <= 0.0 || max_dist < 0.0 {
        return None;
    }
    let d = dir / len;
    let mut last: Option<(i32, i32, i32)> = None;
    let steps = (max_dist / step) as u32;
    for i in 0..=steps {
        let t = i as f32 * step;
        let cell = (origin + d * t).floor_cell();
        if last != Some(cell) {
            let material = view.material_at(cell.0, cell.1, cell.2);
            if !material.is_air() {
                return Some(RayHit {
                    cell,
                    normal: dominant_axis_normal(d),
                    material,
                    distance: t,
                });
            }
            last = Some(cell);
        }
    }
    None
}
