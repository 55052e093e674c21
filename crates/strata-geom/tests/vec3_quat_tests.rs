use std::f32::consts::FRAC_PI_2;

use strata_geom::{Aabb, Quat, Vec3};

fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_constants() {
    assert!(vec3_approx_eq(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::UP, Vec3::new(0.0, 1.0, 0.0), 1e-6));
    assert!(vec3_approx_eq(Vec3::FORWARD, Vec3::new(0.0, 0.0, 1.0), 1e-6));
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-6));
    assert!(vec3_approx_eq(c - a, b, 1e-6));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-6));
}

#[test]
fn vec3_floor_cell_handles_negatives() {
    assert_eq!(Vec3::new(0.5, -0.5, -1.0).floor_cell(), (0, -1, -1));
    assert_eq!(Vec3::new(15.99, 16.0, -16.01).floor_cell(), (15, 16, -17));
}

#[test]
fn quat_identity_is_noop() {
    let v = Vec3::new(0.3, -2.0, 7.5);
    assert!(vec3_approx_eq(Quat::IDENTITY.rotate(v), v, 1e-6));
}

#[test]
fn quat_quarter_turns() {
    let about_y = Quat::from_axis_angle(Vec3::UP, FRAC_PI_2);
    assert!(vec3_approx_eq(
        about_y.rotate(Vec3::FORWARD),
        Vec3::new(1.0, 0.0, 0.0),
        1e-6
    ));
    let about_x = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 0.0), -FRAC_PI_2);
    assert!(vec3_approx_eq(about_x.rotate(Vec3::FORWARD), Vec3::UP, 1e-6));
}

#[test]
fn chunk_aabb_contains_its_corners() {
    let bb = Aabb::of_chunk(-1, 0, 2, 16);
    assert!(bb.contains(Vec3::new(-16.0, 0.0, 32.0)));
    assert!(bb.contains(Vec3::new(0.0, 16.0, 48.0)));
    assert!(!bb.contains(Vec3::new(0.5, 1.0, 40.0)));
}
