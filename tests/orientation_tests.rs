//! Tests for directions, lattice rotation and the orientation state machine
//!
//! Test categories:
//! - Direction vectors and cross products
//! - Quarter-turn rotation of lattice points
//! - Orientation transitions (inverse pairs, 4-cycles, closure)

use voxtris::{rotate, Direction, Orientation, Position, Rotation};

// ============================================================================
// Direction Tests
// ============================================================================

mod direction {
    use super::*;

    #[test]
    fn vectors_round_trip_through_from_vector() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_vector(d.vector()), Some(d));
        }
    }

    #[test]
    fn non_unit_vectors_have_no_direction() {
        assert_eq!(Direction::from_vector(Position::ZERO), None);
        assert_eq!(Direction::from_vector(Position::new(1, 1, 0)), None);
        assert_eq!(Direction::from_vector(Position::new(0, 2, 0)), None);
    }

    #[test]
    fn opposite_negates_vector() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().vector(), -d.vector());
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn cross_of_forward_and_up_is_left() {
        assert_eq!(Direction::Forward.cross(Direction::Up), Some(Direction::Left));
        assert_eq!(Direction::Up.cross(Direction::Forward), Some(Direction::Right));
        assert_eq!(Direction::Right.cross(Direction::Up), Some(Direction::Forward));
    }

    #[test]
    fn cross_of_parallel_directions_is_none() {
        for d in Direction::ALL {
            assert_eq!(d.cross(d), None);
            assert_eq!(d.cross(d.opposite()), None);
        }
    }
}

// ============================================================================
// Rotation Tests
// ============================================================================

mod lattice_rotation {
    use super::*;

    #[test]
    fn quarter_turn_about_up() {
        assert_eq!(
            rotate(Position::new(1, 0, 0), 90.0, Direction::Up),
            Position::new(0, 0, -1)
        );
        assert_eq!(
            rotate(Position::new(0, 0, 1), -90.0, Direction::Up),
            Position::new(-1, 0, 0)
        );
    }

    #[test]
    fn points_on_the_axis_do_not_move() {
        assert_eq!(
            rotate(Position::new(0, 5, 0), 90.0, Direction::Up),
            Position::new(0, 5, 0)
        );
        assert_eq!(
            rotate(Position::new(0, 0, -3), -90.0, Direction::Back),
            Position::new(0, 0, -3)
        );
    }

    #[test]
    fn four_quarter_turns_are_identity() {
        let start = Position::new(2, -1, 3);
        for axis in Direction::ALL {
            let mut p = start;
            for _ in 0..4 {
                p = rotate(p, 90.0, axis);
            }
            assert_eq!(p, start, "axis {axis:?}");
        }
    }

    #[test]
    fn opposite_turns_cancel() {
        let start = Position::new(-4, 7, 1);
        for axis in Direction::ALL {
            assert_eq!(rotate(rotate(start, 90.0, axis), -90.0, axis), start);
        }
    }

    #[test]
    fn turning_about_opposite_axis_reverses_direction() {
        let p = Position::new(3, 1, -2);
        for axis in Direction::ALL {
            assert_eq!(rotate(p, 90.0, axis), rotate(p, -90.0, axis.opposite()));
        }
    }

    #[test]
    fn rotation_matrix_matches_point_rotation() {
        let points = [
            Position::new(1, 2, 3),
            Position::new(-2, 0, 5),
            Position::new(0, -1, -1),
        ];
        for axis in Direction::ALL {
            for degrees in [90.0, -90.0] {
                let m = Rotation::about(axis, degrees);
                for p in points {
                    assert_eq!(m.apply(p), rotate(p, degrees, axis));
                }
            }
        }
    }

    #[test]
    fn composed_inverse_turns_are_identity() {
        for axis in Direction::ALL {
            let m = Rotation::about(axis, 90.0).then(Rotation::about(axis, -90.0));
            assert_eq!(m, Rotation::IDENTITY);
        }
    }

    #[test]
    fn composition_applies_step_last() {
        let p = Position::new(1, 0, 0);
        let first = Rotation::about(Direction::Up, 90.0);
        let second = Rotation::about(Direction::Right, 90.0);
        let combined = first.then(second);
        assert_eq!(combined.apply(p), second.apply(first.apply(p)));
    }
}

// ============================================================================
// Orientation Tests
// ============================================================================

mod orientation {
    use super::*;

    fn assert_valid(o: Orientation) {
        assert!(o.forward().is_perpendicular(o.up()), "{o:?}");
        assert_eq!(Orientation::new(o.forward(), o.up()), Some(o));
    }

    #[test]
    fn exactly_twenty_four_orientations() {
        let all: Vec<Orientation> = Orientation::all().collect();
        assert_eq!(all.len(), 24);
        for (i, a) in all.iter().enumerate() {
            assert_valid(*a);
            assert!(all[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn parallel_pairs_are_rejected() {
        assert_eq!(Orientation::new(Direction::Forward, Direction::Forward), None);
        assert_eq!(Orientation::new(Direction::Forward, Direction::Back), None);
        assert_eq!(Orientation::new(Direction::Up, Direction::Down), None);
    }

    #[test]
    fn default_faces_forward_and_up() {
        let o = Orientation::default();
        assert_eq!(o.forward(), Direction::Forward);
        assert_eq!(o.up(), Direction::Up);
    }

    #[test]
    fn rotate_forward_left_then_right_is_identity() {
        for o in Orientation::all() {
            assert_eq!(o.rotate_forward(true).rotate_forward(false), o);
            assert_eq!(o.rotate_forward(false).rotate_forward(true), o);
        }
    }

    #[test]
    fn rotate_up_left_then_right_is_identity() {
        for o in Orientation::all() {
            assert_eq!(o.rotate_up(true).rotate_up(false), o);
            assert_eq!(o.rotate_up(false).rotate_up(true), o);
        }
    }

    #[test]
    fn four_turns_return_to_start() {
        for o in Orientation::all() {
            for is_left in [true, false] {
                let mut f = o;
                let mut u = o;
                for _ in 0..4 {
                    f = f.rotate_forward(is_left);
                    u = u.rotate_up(is_left);
                }
                assert_eq!(f, o);
                assert_eq!(u, o);
            }
        }
    }

    #[test]
    fn single_turns_are_never_identity() {
        for o in Orientation::all() {
            for is_left in [true, false] {
                assert_ne!(o.rotate_forward(is_left), o);
                assert_ne!(o.rotate_up(is_left), o);
            }
        }
    }

    #[test]
    fn rotate_forward_keeps_up_and_rotate_up_keeps_forward() {
        for o in Orientation::all() {
            for is_left in [true, false] {
                assert_eq!(o.rotate_forward(is_left).up(), o.up());
                assert_eq!(o.rotate_up(is_left).forward(), o.forward());
            }
        }
    }

    #[test]
    fn long_turn_sequences_stay_valid() {
        let mut o = Orientation::default();
        for i in 0..500u32 {
            o = match i % 7 {
                0 | 3 => o.rotate_forward(true),
                1 => o.rotate_up(false),
                2 | 5 => o.rotate_up(true),
                4 => o.rotate_forward(false),
                _ => o.rotate_up(true).rotate_forward(true),
            };
            assert_valid(o);
        }
    }

    #[test]
    fn every_orientation_is_reachable_from_default() {
        let mut seen = vec![Orientation::default()];
        let mut frontier = seen.clone();
        while let Some(o) = frontier.pop() {
            for next in [
                o.rotate_forward(true),
                o.rotate_forward(false),
                o.rotate_up(true),
                o.rotate_up(false),
            ] {
                if !seen.contains(&next) {
                    seen.push(next);
                    frontier.push(next);
                }
            }
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn known_transitions() {
        let o = Orientation::default();
        assert_eq!(o.rotate_forward(true).forward(), Direction::Left);
        assert_eq!(o.rotate_forward(false).forward(), Direction::Right);
        assert_eq!(o.rotate_up(true).up(), Direction::Left);
        assert_eq!(o.rotate_up(false).up(), Direction::Right);

        let facing_left = Orientation::new(Direction::Left, Direction::Up).unwrap();
        assert_eq!(facing_left.rotate_forward(true).forward(), Direction::Back);

        let lying = Orientation::new(Direction::Left, Direction::Forward).unwrap();
        assert_eq!(lying.rotate_up(true).up(), Direction::Up);
    }

    #[test]
    fn transitions_agree_with_point_rotation() {
        for o in Orientation::all() {
            for is_left in [true, false] {
                let turned = rotate(
                    o.forward().vector(),
                    Orientation::forward_turn_degrees(is_left),
                    o.up(),
                );
                assert_eq!(o.rotate_forward(is_left).forward().vector(), turned);

                let rolled = rotate(
                    o.up().vector(),
                    Orientation::up_turn_degrees(is_left),
                    o.forward(),
                );
                assert_eq!(o.rotate_up(is_left).up().vector(), rolled);
            }
        }
    }
}
