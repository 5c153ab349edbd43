use approx::assert_relative_eq;
use bevy::math::DVec2;
use rand::prelude::*;

use newton_sandbox::config::PLANETARIUM_RESTITUTION;
use newton_sandbox::physics::collision::{Impactor, cluster_of};
use newton_sandbox::physics::integrator::reflect_off_bounds;
use newton_sandbox::physics::{Body, Bounds, ForceField, ForceSet, Mode, Scene, Vector, resolve_collisions};

fn arena() -> Bounds {
    Bounds::centered(1000.0, 1000.0)
}

#[test]
fn immovable_bodies_never_move() {
    let mut scene = Scene::new(Mode::Standard, arena());
    scene.push(Body::new(50.0, DVec2::new(-100.0, 0.0)).immovable());
    scene.push(
        Body::new(50.0, DVec2::new(100.0, 0.0))
            .with_velocity(Vector::new(30.0, 10.0))
            .immovable(),
    );

    for _ in 0..100 {
        scene.advance_one_tick(0.05);
    }

    assert_eq!(scene.bodies()[0].position, DVec2::new(-100.0, 0.0));
    assert_eq!(scene.bodies()[1].position, DVec2::new(100.0, 0.0));
    assert_eq!(scene.bodies()[1].velocity.delta(), DVec2::new(30.0, 10.0));
}

#[test]
fn head_on_pair_exchanges_velocities() {
    let mut bodies = vec![
        Body::new(20.0, DVec2::ZERO)
            .with_restitution(1.0)
            .with_velocity(Vector::new(1.0, 0.0)),
        Body::new(20.0, DVec2::new(0.5, 0.0))
            .with_restitution(1.0)
            .with_velocity(Vector::new(-1.0, 0.0)),
    ];

    let resolved = resolve_collisions(&mut bodies, &ForceSet::Shared(Vec::new()), 1.0);

    assert_eq!(resolved, 2);
    assert_relative_eq!(bodies[0].velocity.x(), -1.0, epsilon = 1e-9);
    assert_relative_eq!(bodies[0].velocity.y(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(bodies[1].velocity.x(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(bodies[1].velocity.y(), 0.0, epsilon = 1e-9);
    // rolled back to where they were before this tick
    assert_eq!(bodies[0].position, DVec2::ZERO);
    assert_eq!(bodies[1].position, DVec2::new(0.5, 0.0));
}

#[test]
fn head_on_pair_exchanges_velocities_through_a_scene_tick() {
    let mut scene = Scene::new(Mode::Standard, arena())
        .with_field(ForceField::new(DVec2::ZERO, DVec2::ZERO));
    scene.push(
        Body::new(20.0, DVec2::ZERO)
            .with_restitution(1.0)
            .with_velocity(Vector::new(1.0, 0.0)),
    );
    scene.push(
        Body::new(20.0, DVec2::new(0.5, 0.0))
            .with_restitution(1.0)
            .with_velocity(Vector::new(-1.0, 0.0)),
    );

    scene.advance_one_tick(1.0);

    let [a, b] = scene.bodies() else {
        panic!("expected two bodies");
    };
    assert_relative_eq!(a.velocity.x(), -1.0, epsilon = 1e-9);
    assert_relative_eq!(a.velocity.y(), 0.0, epsilon = 1e-9);
    assert_relative_eq!(b.velocity.x(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(b.velocity.y(), 0.0, epsilon = 1e-9);
    // the integration step was undone
    assert_eq!(a.position, a.last_position);
    assert_eq!(b.position, b.last_position);
    assert_eq!(a.position, DVec2::ZERO);
    assert_eq!(b.position, DVec2::new(0.5, 0.0));
}

#[test]
fn planetarium_contact_pushes_an_orbiter_back_out() {
    let mut scene = Scene::new(Mode::Planetarium, arena());
    scene.push(Body::new(200.0, DVec2::ZERO).immovable());
    // 5 units inside the sun's surface, moving sideways
    scene.push(Body::new(20.0, DVec2::new(105.0, 0.0)).with_velocity(Vector::new(0.0, 50.0)));

    scene.advance_one_tick(0.01);

    let sun = &scene.bodies()[0];
    let orbiter = &scene.bodies()[1];
    assert_eq!(sun.position, DVec2::ZERO);
    assert_eq!(orbiter.restitution, PLANETARIUM_RESTITUTION);
    assert!(orbiter.velocity.is_finite());
    // the pull toward the sun was reversed, the sideways motion kept
    assert!(orbiter.velocity.x() > 0.0);
    assert!(orbiter.velocity.y() > 0.0);
    assert_eq!(orbiter.position, orbiter.last_position);
    assert_eq!(orbiter.position, DVec2::new(105.0, 0.0));
}

#[test]
fn falling_body_rebounds_once_off_the_floor() {
    let mut body = Body::new(40.0, DVec2::new(0.0, 100.0))
        .with_velocity(Vector::new(0.0, -50.0))
        .with_restitution(0.5);
    let bounds = Bounds::centered(1000.0, 1000.0);

    let mut ticks = 0;
    while body.velocity.y() <= 0.0 {
        body.update(&[], &bounds, 0.1, true);
        ticks += 1;
        assert!(ticks < 1_000, "body never reached the floor");
    }

    assert_relative_eq!(body.position.y, -480.0);
    assert_relative_eq!(body.velocity.magnitude(), 25.0, epsilon = 1e-9);
    assert_relative_eq!(body.velocity.x(), 0.0, epsilon = 1e-9);

    // heading up and clear of the floor: no second reflection
    assert_eq!(reflect_off_bounds(&mut body, &bounds), 0);
}

#[test]
fn corner_hit_reflects_both_axes() {
    let mut body = Body::new(20.0, DVec2::new(495.0, 495.0))
        .with_velocity(Vector::new(10.0, 10.0))
        .with_restitution(1.0);
    let bounds = arena();

    assert_eq!(reflect_off_bounds(&mut body, &bounds), 2);
    assert_relative_eq!(body.position.x, 490.0);
    assert_relative_eq!(body.position.y, 490.0);
    assert_relative_eq!(body.velocity.x(), -10.0, epsilon = 1e-9);
    assert_relative_eq!(body.velocity.y(), -10.0, epsilon = 1e-9);
}

#[test]
fn touching_chain_collapses_into_one_cluster() {
    let bodies = vec![
        Body::new(20.0, DVec2::new(-100.0, 0.0)),
        Body::new(20.0, DVec2::new(0.0, 0.0)).with_velocity(Vector::new(1.0, 0.0)),
        Body::new(20.0, DVec2::new(19.0, 0.0)).with_velocity(Vector::new(0.0, 2.0)),
        Body::new(20.0, DVec2::new(38.0, 0.0)).with_velocity(Vector::new(3.0, 0.0)),
    ];

    let members = cluster_of(&bodies, 1, 0);
    assert_eq!(members, vec![1, 2, 3]);

    let merged = Impactor::aggregate(&bodies, &members);
    assert_relative_eq!(merged.mass, 60.0);
    assert_relative_eq!(merged.position.x, 19.0);
    assert_relative_eq!(merged.position.y, 0.0);
    assert_eq!(merged.velocity.delta(), DVec2::new(4.0, 2.0));
    assert_relative_eq!(merged.radius(), 30.0);
}

#[test]
fn cluster_never_contains_the_excluded_body() {
    let bodies = vec![
        Body::new(20.0, DVec2::ZERO),
        Body::new(20.0, DVec2::new(19.0, 0.0)),
    ];
    assert_eq!(cluster_of(&bodies, 1, 0), vec![1]);
}

#[test]
fn trail_keeps_the_most_recent_positions_in_order() {
    let mut body = Body::new(10.0, DVec2::ZERO)
        .with_velocity(Vector::new(1.0, 0.0))
        .with_trail(3);

    for _ in 0..5 {
        body.update(&[], &arena(), 1.0, false);
    }

    let xs: Vec<f64> = body.trail.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![2.0, 3.0, 4.0]);
    assert_eq!(body.trail.len(), body.trail.capacity());
}

#[test]
fn planetarium_pull_follows_scaled_inverse_square() {
    let bodies = vec![
        Body::new(200.0, DVec2::ZERO).immovable(),
        Body::new(30.0, DVec2::new(400.0, 0.0)),
    ];
    let dt = 1.0 / 90.0;
    let forces = ForceField::default().forces(Mode::Planetarium, &bodies, dt);

    let on_orbiter = forces.for_body(1);
    assert_eq!(on_orbiter.len(), 2);
    assert_eq!(on_orbiter[0].delta(), DVec2::ZERO);
    let expected = 16666.0 * dt * 200.0 * 200.0 / (400.0 * 400.0);
    assert_relative_eq!(on_orbiter[1].magnitude(), expected, max_relative = 1e-12);
    assert!(on_orbiter[1].x() < 0.0, "pull points toward the sun");

    let on_sun = forces.for_body(0);
    let expected = 16666.0 * dt * 30.0 * 30.0 / (400.0 * 400.0);
    assert_relative_eq!(on_sun[1].magnitude(), expected, max_relative = 1e-12);
}

#[test]
fn planetarium_layout_has_a_fixed_sun() {
    let mut scene = Scene::new(Mode::Standard, Bounds::centered(1280.0, 800.0));
    let mut rng = StdRng::seed_from_u64(3);

    assert_eq!(scene.rebuild(Mode::Planetarium, &mut rng).unwrap(), 4);
    let bodies = scene.bodies();
    assert!(!bodies[0].movable);
    assert_eq!(bodies[0].position, DVec2::ZERO);
    assert!(bodies[1..].iter().all(|b| b.movable));

    for _ in 0..50 {
        scene.advance_one_tick(1.0 / 90.0);
    }
    assert_eq!(scene.bodies()[0].position, DVec2::ZERO);
    assert!(scene.bodies().iter().all(|b| b.position.is_finite()));
}

#[test]
fn same_seed_builds_the_same_scene() {
    let bounds = Bounds::centered(1280.0, 800.0);
    let mut a = Scene::new(Mode::Standard, bounds);
    let mut b = Scene::new(Mode::Standard, bounds);
    a.rebuild(Mode::Standard, &mut StdRng::seed_from_u64(11)).unwrap();
    b.rebuild(Mode::Standard, &mut StdRng::seed_from_u64(11)).unwrap();
    assert_eq!(a.bodies(), b.bodies());
}

#[test]
fn standard_scene_stays_inside_bounds() {
    let bounds = Bounds::centered(1280.0, 800.0);
    let mut scene = Scene::new(Mode::Standard, bounds);
    scene.rebuild(Mode::Standard, &mut StdRng::seed_from_u64(5)).unwrap();

    for _ in 0..500 {
        scene.advance_one_tick(1.0 / 90.0);
    }
    for body in scene.bodies() {
        assert!(body.position.is_finite());
        let r = body.radius();
        assert!(body.position.x - r >= bounds.left - 1.0);
        assert!(body.position.x + r <= bounds.right + 1.0);
        assert!(body.position.y - r >= bounds.bottom - 1.0);
        assert!(body.position.y + r <= bounds.top + 1.0);
    }
}
