use crate::shape::ShapeTemplate;

/// The stock piece set. Layers are listed bottom first; `.` marks an empty cell.
pub fn default_templates() -> Vec<ShapeTemplate> {
    vec![
        ShapeTemplate::new("cube", ["o"]),
        ShapeTemplate::new("bar", ["#o##"]),
        ShapeTemplate::new("square", ["o#\n##"]),
        ShapeTemplate::new("ell", ["#.\n#.\no#"]),
        ShapeTemplate::new("tee", ["#o#\n.#."]),
        ShapeTemplate::new("skew", ["#o.\n.##"]),
        ShapeTemplate::new("tower", ["o", "#"]),
        ShapeTemplate::new("corner", ["o#\n#.", "#"]),
        ShapeTemplate::new("twist", ["o#\n..", ".#\n.#"]),
    ]
}
