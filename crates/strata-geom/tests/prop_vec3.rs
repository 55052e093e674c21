use proptest::num::f32::NORMAL;
use proptest::prelude::*;
use strata_geom::{Quat, Vec3};

fn approx_abs_rel(a: f32, b: f32, atol: f32, rtol: f32) -> bool {
    let diff = (a - b).abs();
    let scale = a.abs().max(b.abs());
    diff <= atol + rtol * scale
}

fn bounded_f32() -> impl Strategy<Value = f32> {
    NORMAL.prop_filter("bounded", |v| v.is_finite() && v.abs() <= 1e3)
}

fn arb_vec3() -> impl Strategy<Value = Vec3> {
    (bounded_f32(), bounded_f32(), bounded_f32()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Addition commutativity
    #[test]
    fn vec3_add_commutative(a in arb_vec3(), b in arb_vec3()) {
        let l = a + b;
        let r = b + a;
        prop_assert_eq!(l, r);
    }

    // Rotations preserve length
    #[test]
    fn quat_rotation_preserves_length(v in arb_vec3(), angle in -6.3f32..6.3, ax in arb_vec3()) {
        prop_assume!(ax.length() > 1e-3);
        let q = Quat::from_axis_angle(ax, angle);
        let r = q.rotate(v);
        prop_assert!(approx_abs_rel(r.length(), v.length(), 1e-3, 1e-4));
    }

    // floor_cell agrees with per-component floor
    #[test]
    fn floor_cell_matches_floor(v in arb_vec3()) {
        let (x, y, z) = v.floor_cell();
        prop_assert_eq!(x, v.x.floor() as i32);
        prop_assert_eq!(y, v.y.floor() as i32);
        prop_assert_eq!(z, v.z.floor() as i32);
    }
}
