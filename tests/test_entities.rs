use std::f64::consts::TAU;

use lava_dash::entities::*;
use lava_dash::error::GameError;
use lava_dash::level::Level;
use lava_dash::parser::LevelParser;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn empty_level() -> Level {
    Level::new(Vec::new(), Vec::new()).unwrap()
}

fn open_level(rows: &[&str]) -> Level {
    LevelParser::default().parse(rows).unwrap()
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// ── Vector ────────────────────────────────────────────────────────────────────

#[test]
fn vector_plus_is_componentwise() {
    let v = Vector::new(1.0, 2.0).plus(Vector::new(3.0, -5.0));
    assert_eq!(v, Vector::new(4.0, -3.0));
}

#[test]
fn vector_times_scales_both_axes() {
    let v = Vector::new(1.5, -2.0).times(2.0);
    assert_eq!(v, Vector::new(3.0, -4.0));
}

#[test]
fn vector_operators_match_methods() {
    let a = Vector::new(1.0, 2.0);
    let b = Vector::new(0.5, 0.5);
    assert_eq!(a + b, a.plus(b));
    assert_eq!(a * 3.0, a.times(3.0));
    // Copy semantics: operands are untouched
    assert_eq!(a, Vector::new(1.0, 2.0));
}

// ── Actor construction ────────────────────────────────────────────────────────

#[test]
fn default_actor_is_unit_box_at_origin() {
    let a = Actor::default();
    assert_eq!(a.pos, Vector::ZERO);
    assert_eq!(a.size, Vector::new(1.0, 1.0));
    assert_eq!(a.speed, Vector::ZERO);
    assert_eq!(a.kind(), ActorKind::Actor);
}

#[test]
fn actor_new_rejects_non_finite_values() {
    let bad = Actor::new(Vector::new(f64::NAN, 0.0), Vector::new(1.0, 1.0), Vector::ZERO);
    assert!(matches!(bad, Err(GameError::InvalidArgument(_))));

    let bad = Actor::new(Vector::ZERO, Vector::new(f64::INFINITY, 1.0), Vector::ZERO);
    assert!(matches!(bad, Err(GameError::InvalidArgument(_))));
}

#[test]
fn actor_edges_follow_pos_and_size() {
    let a = Actor::new(Vector::new(2.0, 3.0), Vector::new(1.5, 0.5), Vector::ZERO).unwrap();
    assert_eq!(a.left(), 2.0);
    assert_eq!(a.top(), 3.0);
    assert_eq!(a.right(), 3.5);
    assert_eq!(a.bottom(), 3.5);
}

#[test]
fn player_is_lifted_half_a_cell() {
    let p = Actor::player(Vector::new(2.0, 3.0));
    assert_eq!(p.pos, Vector::new(2.0, 2.5));
    assert_eq!(p.size, Vector::new(0.8, 1.5));
    assert_eq!(p.kind(), ActorKind::Player);
}

#[test]
fn fireball_variants_have_their_speeds() {
    let at = Vector::new(1.0, 1.0);
    assert_eq!(Actor::horizontal_fireball(at).speed, Vector::new(2.0, 0.0));
    assert_eq!(Actor::vertical_fireball(at).speed, Vector::new(0.0, 2.0));
    assert_eq!(Actor::fire_rain(at).speed, Vector::new(0.0, 3.0));
    for f in [Actor::horizontal_fireball(at), Actor::vertical_fireball(at), Actor::fire_rain(at)] {
        assert_eq!(f.size, Vector::new(1.0, 1.0));
        assert_eq!(f.kind(), ActorKind::Fireball);
    }
}

#[test]
fn coin_is_offset_and_shrunk() {
    let c = Actor::coin_with_phase(Vector::new(1.0, 1.0), 0.0);
    assert_close(c.pos.x, 1.2);
    assert_close(c.pos.y, 1.1);
    assert_eq!(c.size, Vector::new(0.6, 0.6));
    assert_eq!(c.kind(), ActorKind::Coin);
}

#[test]
fn coin_phase_is_drawn_in_full_turn() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        match Actor::coin(Vector::ZERO, &mut rng).behavior {
            Behavior::Coin(spring) => assert!((0.0..TAU).contains(&spring.phase)),
            other => panic!("unexpected behavior {other:?}"),
        }
    }
}

// ── Overlap ───────────────────────────────────────────────────────────────────

fn rect(x: f64, y: f64, w: f64, h: f64) -> Actor {
    Actor::new(Vector::new(x, y), Vector::new(w, h), Vector::ZERO).unwrap()
}

#[test]
fn actor_never_overlaps_itself() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    assert!(!a.overlaps(&a));
}

#[test]
fn identical_copy_does_overlap() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    let b = a.clone();
    assert!(a.overlaps(&b));
}

#[test]
fn touching_edges_do_not_overlap() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    assert!(!a.overlaps(&rect(1.0, 0.0, 1.0, 1.0)));
    assert!(!a.overlaps(&rect(0.0, 1.0, 1.0, 1.0)));
    assert!(!a.overlaps(&rect(-1.0, 0.0, 1.0, 1.0)));
    assert!(!a.overlaps(&rect(1.0, 1.0, 1.0, 1.0)));
}

#[test]
fn disjoint_boxes_do_not_overlap() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    assert!(!a.overlaps(&rect(5.0, 5.0, 1.0, 1.0)));
    assert!(!a.overlaps(&rect(0.0, 3.0, 1.0, 1.0)));
}

#[test]
fn partial_and_nested_boxes_overlap() {
    let a = rect(0.0, 0.0, 2.0, 2.0);
    assert!(a.overlaps(&rect(1.5, 1.5, 1.0, 1.0)));
    assert!(a.overlaps(&rect(0.5, 0.5, 0.5, 0.5)));
    assert!(rect(0.5, 0.5, 0.5, 0.5).overlaps(&a));
    // Thin cross: neither box contains a corner of the other
    assert!(rect(-1.0, 0.5, 4.0, 0.5).overlaps(&rect(0.5, -1.0, 0.5, 4.0)));
}

#[test]
fn overlaps_in_negative_space() {
    let a = rect(-3.0, -3.0, 2.0, 2.0);
    assert!(a.overlaps(&rect(-2.0, -2.0, 2.0, 2.0)));
    assert!(!a.overlaps(&rect(-1.0, -1.0, 2.0, 2.0)));
}

// ── Behaviour ─────────────────────────────────────────────────────────────────

#[test]
fn plain_actor_and_player_do_not_move_by_themselves() {
    let level = empty_level();
    let mut a = Actor::default();
    a.speed = Vector::new(1.0, 1.0);
    a.act(1.0, &level);
    assert_eq!(a.pos, Vector::ZERO);

    let mut p = Actor::player(Vector::new(1.0, 1.0));
    p.speed = Vector::new(1.0, 0.0);
    p.act(1.0, &level);
    assert_eq!(p.pos, Vector::new(1.0, 0.5));
}

#[test]
fn still_fireball_stays_put() {
    let level = open_level(&["     ", "     ", "     ", "     "]);
    let mut f = Actor::fireball(Vector::new(1.0, 1.0), Vector::ZERO);
    for _ in 0..10 {
        f.act(1.0, &level);
    }
    assert_eq!(f.pos, Vector::new(1.0, 1.0));
    assert_eq!(f.next_position(5.0), Vector::new(1.0, 1.0));
}

#[test]
fn next_position_scales_with_time() {
    let f = Actor::fireball(Vector::new(1.0, 1.0), Vector::new(2.0, -1.0));
    assert_eq!(f.next_position(0.5), Vector::new(2.0, 0.5));
}

#[test]
fn horizontal_fireball_bounces_off_wall() {
    let level = open_level(&["xxxxxxxx", "x     xx", "xxxxxxxx"]);
    let mut f = Actor::horizontal_fireball(Vector::new(1.0, 1.0));

    f.act(1.0, &level);
    assert_eq!(f.pos, Vector::new(3.0, 1.0));
    f.act(1.0, &level);
    assert_eq!(f.pos, Vector::new(5.0, 1.0));

    // Next step would leave the grid: reverse instead of moving
    f.act(1.0, &level);
    assert_eq!(f.pos, Vector::new(5.0, 1.0));
    assert_eq!(f.speed, Vector::new(-2.0, 0.0));

    f.act(1.0, &level);
    assert_eq!(f.pos, Vector::new(3.0, 1.0));
}

#[test]
fn vertical_fireball_bounces_off_wall_row() {
    let level = open_level(&["     ", "     ", "     ", "xxxxx", "     "]);
    let mut f = Actor::vertical_fireball(Vector::new(2.0, 0.0));
    f.act(0.5, &level);
    assert_eq!(f.pos, Vector::new(2.0, 1.0));

    f.act(1.0, &level);
    assert_eq!(f.pos, Vector::new(2.0, 1.0));
    assert_eq!(f.speed, Vector::new(0.0, -2.0));
}

#[test]
fn fire_rain_respawns_instead_of_bouncing() {
    let level = open_level(&["     ", "     ", "     ", "     "]);
    let spawn = Vector::new(1.0, 0.0);
    let mut f = Actor::fire_rain(spawn);

    f.act(0.5, &level);
    assert_eq!(f.pos, Vector::new(1.0, 1.5));

    // Reaches the bottom of the grid (lava)
    f.act(0.5, &level);
    assert_eq!(f.pos, spawn);
    assert_eq!(f.speed, Vector::new(0.0, 3.0));
}

#[test]
fn coin_bobs_around_its_anchor() {
    let level = empty_level();
    let mut c = Actor::coin_with_phase(Vector::new(1.0, 1.0), 0.0);

    c.act(0.1, &level);
    assert_close(c.pos.x, 1.2);
    assert_close(c.pos.y, 1.1 + (0.8f64).sin() * 0.07);

    // Phase accumulates on every call
    c.act(0.1, &level);
    assert_close(c.pos.y, 1.1 + (1.6f64).sin() * 0.07);
    match c.behavior {
        Behavior::Coin(spring) => assert_close(spring.phase, 1.6),
        other => panic!("unexpected behavior {other:?}"),
    }
}

#[test]
fn coin_never_strays_beyond_spring_distance() {
    let level = empty_level();
    let mut c = Actor::coin_with_phase(Vector::new(0.0, 0.0), 1.0);
    for _ in 0..200 {
        c.act(0.037, &level);
        assert!((c.pos.y - 0.1).abs() <= Spring::DIST + 1e-12);
        assert_close(c.pos.x, 0.2);
    }
}

// ── Small enums ───────────────────────────────────────────────────────────────

#[test]
fn kind_names_and_touch_conversions() {
    assert_eq!(ActorKind::Fireball.to_string(), "fireball");
    assert_eq!(ActorKind::Coin.to_string(), "coin");
    assert_eq!(Touch::from(Obstacle::Lava), Touch::Obstacle(Obstacle::Lava));
    assert_eq!(Touch::from(ActorKind::Coin), Touch::Actor(ActorKind::Coin));
    assert!(!Status::Running.is_terminal());
    assert!(Status::Won.is_terminal());
    assert!(Status::Lost.is_terminal());
}
