//! Tests for shape templates and oriented shapes
//!
//! Test categories:
//! - Template parsing (size, anchor, padding, errors)
//! - Bounding boxes under rotation
//! - Voxel placement following the accumulated rotation

use std::sync::Arc;

use voxtris::templates::default_templates;
use voxtris::{
    Direction, MassType, Orientation, OrientedShape, Position, ShapeTemplate, TemplateError,
    VoxelShape,
};

fn parse(layers: &[&str]) -> VoxelShape {
    ShapeTemplate::new("test", layers.iter().copied())
        .parse()
        .expect("template should parse")
}

fn oriented(layers: &[&str]) -> OrientedShape {
    OrientedShape::new(Arc::new(parse(layers)))
}

fn sorted(mut v: Vec<Position>) -> Vec<Position> {
    v.sort_by_key(|p| (p.x, p.y, p.z));
    v
}

// ============================================================================
// Parsing Tests
// ============================================================================

mod parsing {
    use super::*;

    #[test]
    fn single_anchor_cell() {
        let shape = parse(&["o"]);
        assert_eq!(shape.size(), Position::new(1, 1, 1));
        assert_eq!(shape.origin(), Position::ZERO);
        assert_eq!(shape.voxel_count(), 1);
        assert_eq!(shape.cell(Position::ZERO), MassType::Mass);
    }

    #[test]
    fn anchor_is_recorded_where_it_appears() {
        let shape = parse(&["#o##"]);
        assert_eq!(shape.size(), Position::new(4, 1, 1));
        assert_eq!(shape.origin(), Position::new(1, 0, 0));
        assert_eq!(shape.voxel_count(), 4);
    }

    #[test]
    fn layers_stack_upwards_and_rows_run_along_z() {
        let shape = parse(&["o.\n.#", "#"]);
        assert_eq!(shape.size(), Position::new(2, 2, 2));
        assert_eq!(shape.cell(Position::new(0, 0, 0)), MassType::Mass);
        assert_eq!(shape.cell(Position::new(1, 0, 1)), MassType::Mass);
        assert_eq!(shape.cell(Position::new(0, 1, 0)), MassType::Mass);
        assert_eq!(shape.cell(Position::new(1, 0, 0)), MassType::Empty);
    }

    #[test]
    fn ragged_rows_and_layers_are_padded() {
        let shape = parse(&["o##\n#", "#"]);
        assert_eq!(shape.size(), Position::new(3, 2, 2));
        assert_eq!(shape.cell(Position::new(2, 0, 1)), MassType::Empty);
        assert_eq!(shape.cell(Position::new(2, 1, 1)), MassType::Empty);
        assert_eq!(shape.voxel_count(), 5);
    }

    #[test]
    fn trailing_newline_adds_no_row() {
        let shape = parse(&["o#\n##\n", "#\n"]);
        assert_eq!(shape.size(), Position::new(2, 2, 2));
        assert_eq!(shape.voxel_count(), 5);
        assert_eq!(parse(&["o\n"]).size(), Position::new(1, 1, 1));
    }

    #[test]
    fn unknown_characters_are_empty() {
        let shape = parse(&["o.x# -"]);
        assert_eq!(shape.size(), Position::new(6, 1, 1));
        assert_eq!(shape.voxel_count(), 2);
    }

    #[test]
    fn voxels_lists_only_mass() {
        let shape = parse(&["#.o"]);
        let voxels: Vec<Position> = shape.voxels().collect();
        assert_eq!(voxels, vec![Position::new(0, 0, 0), Position::new(2, 0, 0)]);
    }

    #[test]
    fn contains_checks_each_axis() {
        let shape = parse(&["o#\n##", "##"]);
        assert!(shape.contains(Position::new(1, 1, 1)));
        assert!(!shape.contains(Position::new(2, 0, 0)));
        assert!(!shape.contains(Position::new(0, 2, 0)));
        assert!(!shape.contains(Position::new(0, 0, -1)));
    }

    #[test]
    fn missing_anchor_is_an_error() {
        let err = ShapeTemplate::new("bad", ["###"]).parse().unwrap_err();
        assert_eq!(err, TemplateError::NoAnchor);
    }

    #[test]
    fn two_anchors_are_an_error() {
        let err = ShapeTemplate::new("bad", ["o#o"]).parse().unwrap_err();
        assert_eq!(err, TemplateError::MultipleAnchors { count: 2 });
    }

    #[test]
    fn anchors_are_counted_across_layers() {
        let err = ShapeTemplate::new("bad", ["o", "#", "o"]).parse().unwrap_err();
        assert_eq!(err, TemplateError::MultipleAnchors { count: 2 });
    }

    #[test]
    fn no_layers_is_an_error() {
        let err = ShapeTemplate::new("bad", Vec::<String>::new())
            .parse()
            .unwrap_err();
        assert_eq!(err, TemplateError::Empty);
    }

    #[test]
    fn stock_templates_all_parse() {
        for template in default_templates() {
            let shape = template.parse().expect("stock template");
            assert_eq!(shape.name(), template.name);
            assert!(shape.voxel_count() > 0);
        }
    }
}

// ============================================================================
// Bounding Box Tests
// ============================================================================

mod bounding_box {
    use super::*;

    #[test]
    fn initial_box_is_relative_to_anchor() {
        let shape = oriented(&["#o##"]);
        assert_eq!(shape.min_pos(), Position::new(-1, 0, 0));
        assert_eq!(shape.max_pos(), Position::new(3, 1, 1));
        assert_eq!(shape.extent(), Position::new(4, 1, 1));
        assert_eq!(shape.orientation(), Orientation::default());
    }

    #[test]
    fn turning_a_bar_about_up_lays_it_along_z() {
        let mut shape = oriented(&["#o##"]);
        shape.rotate_forward(true);

        assert_eq!(shape.orientation().forward(), Direction::Left);
        assert_eq!(shape.min_pos(), Position::new(0, 0, -1));
        assert_eq!(shape.max_pos(), Position::new(1, 1, 3));
        assert_eq!(shape.extent(), Position::new(1, 1, 4));
    }

    #[test]
    fn rolling_a_bar_about_forward_stands_it_up() {
        let mut shape = oriented(&["#o##"]);
        shape.rotate_up(true);

        assert_eq!(shape.extent(), Position::new(1, 4, 1));
        assert_eq!(shape.orientation().up(), Direction::Left);
    }

    #[test]
    fn turn_and_inverse_restore_the_box() {
        let mut shape = oriented(&["o#\n#.", "#"]);
        let (min, max) = (shape.min_pos(), shape.max_pos());

        shape.rotate_up(false);
        shape.rotate_up(true);
        assert_eq!((shape.min_pos(), shape.max_pos()), (min, max));

        shape.rotate_forward(true);
        shape.rotate_forward(false);
        assert_eq!((shape.min_pos(), shape.max_pos()), (min, max));
        assert_eq!(shape.orientation(), Orientation::default());
    }

    #[test]
    fn extent_is_a_permutation_of_size() {
        for template in default_templates() {
            let shape = Arc::new(template.parse().unwrap());
            let size = shape.size();
            let mut oriented = OrientedShape::new(shape);
            for i in 0..12 {
                if i % 3 == 0 {
                    oriented.rotate_up(i % 2 == 0);
                } else {
                    oriented.rotate_forward(i % 4 == 1);
                }
                let mut extent = oriented.extent().to_array();
                let mut expected = size.to_array();
                extent.sort();
                expected.sort();
                assert_eq!(extent, expected, "{}", template.name);
            }
        }
    }
}

// ============================================================================
// Placement Tests
// ============================================================================

// Voxel offsets follow the accumulated rotation, so what is placed in the
// grid always matches the reported orientation and bounding box.
mod placement {
    use super::*;

    #[test]
    fn unrotated_offsets_are_relative_to_anchor() {
        let shape = oriented(&["#o##"]);
        let offsets = sorted(shape.offsets().collect());
        assert_eq!(
            offsets,
            vec![
                Position::new(-1, 0, 0),
                Position::new(0, 0, 0),
                Position::new(1, 0, 0),
                Position::new(2, 0, 0),
            ]
        );
    }

    #[test]
    fn rotation_moves_voxel_placement() {
        let mut shape = oriented(&["#o##"]);
        shape.rotate_forward(true);

        let offsets = sorted(shape.offsets().collect());
        assert_eq!(
            offsets,
            vec![
                Position::new(0, 0, -1),
                Position::new(0, 0, 0),
                Position::new(0, 0, 1),
                Position::new(0, 0, 2),
            ]
        );
    }

    #[test]
    fn offsets_stay_inside_the_box_under_any_turns() {
        for template in default_templates() {
            let mut shape = OrientedShape::new(Arc::new(template.parse().unwrap()));
            for i in 0..16 {
                match i % 4 {
                    0 => shape.rotate_forward(true),
                    1 => shape.rotate_up(true),
                    2 => shape.rotate_up(false),
                    _ => shape.rotate_forward(true),
                }
                let (min, max) = (shape.min_pos(), shape.max_pos());
                for o in shape.offsets() {
                    assert!(
                        o.x >= min.x && o.y >= min.y && o.z >= min.z,
                        "{} offset {o:?} below {min:?}",
                        template.name
                    );
                    assert!(
                        o.x < max.x && o.y < max.y && o.z < max.z,
                        "{} offset {o:?} beyond {max:?}",
                        template.name
                    );
                }
            }
        }
    }

    #[test]
    fn anchor_stays_at_zero_offset() {
        let mut shape = oriented(&["o#\n..", ".#\n.#"]);
        let origin = shape.shape().origin();
        for is_left in [true, false, true] {
            shape.rotate_up(is_left);
            shape.rotate_forward(!is_left);
            assert_eq!(shape.to_world_offset(origin), Position::ZERO);
        }
    }

    #[test]
    fn rotation_carries_the_facing_axes() {
        let mut shape = oriented(&["o#\n#.", "#"]);
        for i in 0..10 {
            if i % 3 == 0 {
                shape.rotate_forward(i % 2 == 0);
            } else {
                shape.rotate_up(i % 2 == 1);
            }
            let o = shape.orientation();
            let r = shape.rotation();
            assert_eq!(r.apply(Direction::Forward.vector()), o.forward().vector());
            assert_eq!(r.apply(Direction::Up.vector()), o.up().vector());
        }
    }

    #[test]
    fn offsets_are_distinct() {
        for template in default_templates() {
            let mut shape = OrientedShape::new(Arc::new(template.parse().unwrap()));
            shape.rotate_up(true);
            shape.rotate_forward(false);
            let offsets = sorted(shape.offsets().collect());
            let mut deduped = offsets.clone();
            deduped.dedup();
            assert_eq!(offsets.len(), deduped.len());
            assert_eq!(offsets.len(), shape.shape().voxel_count());
        }
    }
}
