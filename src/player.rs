use strata_blocks::MaterialId;
use strata_geom::Vec3;
use strata_mesh_cpu::WorldView;

use crate::config::PlayerConfig;
use crate::manager::ChunkManager;
use crate::policy::{GameMode, PlacementPolicy};
use crate::raycast::{RayHit, raycast};
use crate::scene::SceneSink;

/// One frame of player input. Axes are in `[-1, 1]`; angles in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputFrame {
    pub forward: f32,
    pub strafe: f32,
    pub jump: bool,
    pub yaw: f32,
    pub pitch: f32,
    pub break_block: bool,
    pub place_block: bool,
}

/// Outcome of the interaction part of [`Player::apply`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    pub broken: Option<(i32, i32, i32)>,
    pub placed: Option<(i32, i32, i32)>,
}

#[derive(Debug)]
pub struct Player {
    pub pos: Vec3, // feet position
    pub vel: Vec3,
    pub on_ground: bool,
    pub yaw: f32,
    pub pitch: f32,
    pub eye_height: f32,
    pub speed: f32,
    pub jump_speed: f32,
    pub gravity: f32, // negative
    pub reach: f32,
    pub ray_step: f32,
    pub mode: GameMode,
    pub selected: MaterialId,
}

impl Player {
    pub fn new(cfg: &PlayerConfig) -> Self {
        let [x, y, z] = cfg.spawn;
        Self {
            pos: Vec3::new(x, y, z),
            vel: Vec3::ZERO,
            on_ground: false,
            yaw: 0.0,
            pitch: 0.0,
            eye_height: cfg.eye_height,
            speed: cfg.walk_speed,
            jump_speed: cfg.jump_speed,
            gravity: cfg.gravity,
            reach: cfg.reach,
            ray_step: cfg.ray_step,
            mode: GameMode::default(),
            selected: MaterialId::AIR,
        }
    }

    pub fn eye_position(&self) -> Vec3 {
        Vec3::new(self.pos.x, self.pos.y + self.eye_height, self.pos.z)
    }

    /// Unit view direction; yaw 0 looks along +Z, positive pitch looks up.
    pub fn view_direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Integrates one step of movement.
    ///
    /// Collision is a single point: only the cell directly under the feet is
    /// tested, and only vertically.
    pub fn update<V: WorldView + ?Sized>(&mut self, input: &InputFrame, dt: f32, view: &V) {
        self.yaw = input.yaw;
        self.pitch = input.pitch.clamp(-89.0, 89.0);

        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let forward = Vec3::new(sy, 0.0, cy);
        let right = Vec3::new(-cy, 0.0, sy);
        let mut wish = forward * input.forward + right * input.strafe;
        let len = wish.length();
        if len > 1.0 {
            wish = wish / len;
        }
        self.vel.x = wish.x * self.speed;
        self.vel.z = wish.z * self.speed;

        if input.jump && self.on_ground {
            self.vel.y = self.jump_speed;
            self.on_ground = false;
        }
        self.vel.y += self.gravity * dt;
        self.pos += self.vel * dt;

        let below = Vec3::new(self.pos.x, self.pos.y - 1e-3, self.pos.z).floor_cell();
        let ground = view.material_at(below.0, below.1, below.2);
        if self.vel.y <= 0.0 && !ground.is_air() {
            self.pos.y = (below.1 + 1) as f32;
            self.vel.y = 0.0;
            self.on_ground = true;
        } else {
            self.on_ground = false;
        }
    }

    pub fn target<V: WorldView + ?Sized>(&self, view: &V) -> Option<RayHit> {
        raycast(
            self.eye_position(),
            self.view_direction(),
            self.reach,
            self.ray_step,
            view,
        )
    }

    /// Clears the targeted voxel if the policy allows breaking it.
    pub fn break_target<S, P>(&self, mgr: &mut ChunkManager<S>, policy: &P) -> Option<(i32, i32, i32)>
    where
        S: SceneSink,
        P: PlacementPolicy + ?Sized,
    {
        let hit = self.target(&*mgr)?;
        if !policy.can_break(self.mode, hit.material) {
            return None;
        }
        let (x, y, z) = hit.cell;
        mgr.set_atom(x, y, z, MaterialId::AIR).then_some(hit.cell)
    }

    /// Places the selected material against the targeted face.
    pub fn place_target<S, P>(&self, mgr: &mut ChunkManager<S>, policy: &P) -> Option<(i32, i32, i32)>
    where
        S: SceneSink,
        P: PlacementPolicy + ?Sized,
    {
        if self.selected.is_air() || !policy.can_place(self.mode, self.selected) {
            return None;
        }
        let hit = self.target(&*mgr)?;
        let cell = hit.adjacent();
        let (x, y, z) = cell;
        if !mgr.get_atom(x, y, z).is_air() {
            return None;
        }
        mgr.set_atom(x, y, z, self.selected).then_some(cell)
    }

    /// Movement followed by any break/place the frame asks for.
    pub fn apply<S, P>(
        &mut self,
        input: &InputFrame,
        dt: f32,
        mgr: &mut ChunkManager<S>,
        policy: &P,
    ) -> Interaction
    where
        S: SceneSink,
        P: PlacementPolicy + ?Sized,
    {
        self.update(input, dt, &*mgr);
        let mut out = Interaction::default();
        if input.break_block {
            out.broken = self.break_target(mgr, policy);
        }
        if input.place_block {
            out.placed = self.place_target(mgr, policy);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_at_zero(_x: i32, y: i32, _z: i32) -> MaterialId {
        if y < 0 { MaterialId(1) } else { MaterialId::AIR }
    }

    fn player_at(y: f32) -> Player {
        let cfg = PlayerConfig {
            spawn: [0.5, y, 0.5],
            ..PlayerConfig::default()
        };
        Player::new(&cfg)
    }

    #[test]
    fn falls_and_lands_on_the_floor() {
        let mut p = player_at(3.0);
        let input = InputFrame::default();
        for _ in 0..120 {
            p.update(&input, 1.0 / 60.0, &floor_at_zero);
        }
        assert!(p.on_ground);
        assert_eq!(p.pos.y, 0.0);
        assert_eq!(p.vel.y, 0.0);
    }

    #[test]
    fn jump_only_from_ground() {
        let mut p = player_at(0.0);
        let idle = InputFrame::default();
        p.update(&idle, 1.0 / 60.0, &floor_at_zero);
        assert!(p.on_ground);
        let jump = InputFrame {
            jump: true,
            ..InputFrame::default()
        };
        p.update(&jump, 1.0 / 60.0, &floor_at_zero);
        assert!(!p.on_ground);
        assert!(p.pos.y > 0.0);
        let vy = p.vel.y;
        p.update(&jump, 1.0 / 60.0, &floor_at_zero);
        assert!(p.vel.y < vy);
    }

    #[test]
    fn walks_along_yaw() {
        let mut p = player_at(0.0);
        let input = InputFrame {
            forward: 1.0,
            yaw: 90.0,
            ..InputFrame::default()
        };
        for _ in 0..60 {
            p.update(&input, 1.0 / 60.0, &floor_at_zero);
        }
        assert!((p.pos.x - 5.5).abs() < 1e-3);
        assert!((p.pos.z - 0.5).abs() < 1e-3);
    }

    #[test]
    fn looking_down_targets_the_floor() {
        let mut p = player_at(0.0);
        p.pitch = -89.0;
        let hit = p.target(&floor_at_zero).unwrap();
        assert_eq!(hit.cell, (0, -1, 0));
        assert_eq!(hit.normal, (0, 1, 0));
        assert_eq!(hit.adjacent(), (0, 0, 0));
    }
}
