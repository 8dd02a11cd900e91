use ralli_geom::{Aabb, Vec3, angle_between, delta_angle, inverse_lerp, lerp, move_towards, smoothstep01};

fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

fn vec3_approx_eq(a: Vec3, b: Vec3, eps: f64) -> bool {
    approx_eq(a.x, b.x, eps) && approx_eq(a.y, b.y, eps) && approx_eq(a.z, b.z, eps)
}

#[test]
fn vec3_constants() {
    assert!(vec3_approx_eq(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.0), 1e-12));
    assert!(vec3_approx_eq(Vec3::UP, Vec3::new(0.0, 1.0, 0.0), 1e-12));
    assert!(vec3_approx_eq(Vec3::UP.cross(Vec3::FORWARD), Vec3::RIGHT, 1e-12));
}

#[test]
fn vec3_add_sub_neg() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(-4.0, 5.0, -6.0);
    let c = a + b;
    assert!(vec3_approx_eq(c, Vec3::new(-3.0, 7.0, -3.0), 1e-12));
    assert!(vec3_approx_eq(c - a, b, 1e-12));
    assert!(vec3_approx_eq(-a, Vec3::new(-1.0, -2.0, -3.0), 1e-12));
}

#[test]
fn yaw_round_trip_matches_heading_convention() {
    assert!(vec3_approx_eq(Vec3::from_yaw_deg(0.0), Vec3::FORWARD, 1e-12));
    assert!(vec3_approx_eq(Vec3::from_yaw_deg(90.0), Vec3::RIGHT, 1e-12));
    assert!(approx_eq(Vec3::from_yaw_deg(-37.5).yaw_deg(), -37.5, 1e-9));
}

#[test]
fn rotation_about_forward_lifts_right_edge_for_positive_angle() {
    let r = Vec3::RIGHT.rotated_about(Vec3::FORWARD, 90.0);
    assert!(vec3_approx_eq(r, Vec3::UP, 1e-12));
    let r = Vec3::RIGHT.rotated_about(Vec3::FORWARD, -10.0);
    assert!(r.y < 0.0);
}

#[test]
fn delta_angle_wraps_to_half_turn() {
    assert!(approx_eq(delta_angle(0.0, 190.0), -170.0, 1e-9));
    assert!(approx_eq(delta_angle(350.0, 10.0), 20.0, 1e-9));
    assert!(approx_eq(delta_angle(10.0, 350.0), -20.0, 1e-9));
    assert!(approx_eq(delta_angle(0.0, 180.0), 180.0, 1e-9));
}

#[test]
fn angle_between_handles_degenerate_vectors() {
    assert_eq!(angle_between(Vec3::ZERO, Vec3::UP), 0.0);
    assert!(approx_eq(angle_between(Vec3::RIGHT, Vec3::UP), 90.0, 1e-9));
}

#[test]
fn scalar_helpers() {
    assert!(approx_eq(lerp(2.0, 4.0, 0.5), 3.0, 1e-12));
    assert!(approx_eq(lerp(2.0, 4.0, 3.0), 4.0, 1e-12));
    assert!(approx_eq(inverse_lerp(2.0, 4.0, 3.0), 0.5, 1e-12));
    assert_eq!(inverse_lerp(1.0, 1.0, 5.0), 0.0);
    assert!(approx_eq(smoothstep01(0.5), 0.5, 1e-12));
    assert_eq!(move_towards(0.0, 10.0, 1.5), 1.5);
    assert_eq!(move_towards(0.0, -0.5, 1.5), -0.5);
}

#[test]
fn aabb_grow_and_contains() {
    let mut bb = Aabb::EMPTY;
    assert!(bb.is_empty());
    bb.grow(Vec3::new(1.0, -2.0, 3.0));
    bb.grow(Vec3::new(-1.0, 2.0, 0.0));
    assert!(!bb.is_empty());
    assert!(bb.contains(Vec3::new(0.0, 0.0, 1.0)));
    assert!(!bb.contains(Vec3::new(0.0, 3.0, 1.0)));
}
