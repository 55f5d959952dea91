//! Geometry for the box preview: CSS 3D face sizes and an isometric outline
//! for renderers without 3D transforms.

/// Rendering path picked once per session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreviewMode {
    /// Capability probe still pending.
    #[default]
    Pending,
    Css3d,
    Isometric,
}

impl PreviewMode {
    pub fn from_probe(supports_3d: bool) -> Self {
        if supports_3d {
            PreviewMode::Css3d
        } else {
            PreviewMode::Isometric
        }
    }
}

/// Pixel sizes for a CSS cuboid whose longest side is `longest_px`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CuboidFaces {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

pub fn cuboid_faces(length: f64, width: f64, height: f64, longest_px: f64) -> CuboidFaces {
    let [l, w, h] = [length, width, height].map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });
    let longest = l.max(w).max(h);
    if longest <= 0.0 {
        return CuboidFaces {
            width: 0.0,
            height: 0.0,
            depth: 0.0,
        };
    }
    let scale = longest_px / longest;
    // Keep very flat boxes visible.
    let floor = longest_px * 0.04;
    CuboidFaces {
        width: (l * scale).max(floor),
        height: (h * scale).max(floor),
        depth: (w * scale).max(floor),
    }
}

pub type Point = (f64, f64);

/// Three visible faces of an isometric box inside a `view_box` square.
#[derive(Clone, Debug, PartialEq)]
pub struct IsometricOutline {
    pub view_box: f64,
    pub top: [Point; 4],
    pub left: [Point; 4],
    pub right: [Point; 4],
}

const COS_30: f64 = 0.866_025_403_784_438_6;
const SIN_30: f64 = 0.5;

fn project(x: f64, y: f64, z: f64) -> Point {
    ((x - y) * COS_30, (x + y) * SIN_30 - z)
}

/// Projects an L×W×H box isometrically and fits it into `view_box` with
/// `padding` on every side.
pub fn isometric_outline(length: f64, width: f64, height: f64, view_box: f64, padding: f64) -> IsometricOutline {
    let [l, w, h] = [length, width, height].map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 });

    let corners = [
        project(0.0, 0.0, 0.0),
        project(l, 0.0, 0.0),
        project(l, w, 0.0),
        project(0.0, w, 0.0),
        project(0.0, 0.0, h),
        project(l, 0.0, h),
        project(l, w, h),
        project(0.0, w, h),
    ];

    let (min_x, max_x, min_y, max_y) = corners.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(min_x, max_x, min_y, max_y), &(x, y)| (min_x.min(x), max_x.max(x), min_y.min(y), max_y.max(y)),
    );
    let span = (max_x - min_x).max(max_y - min_y);
    let usable = (view_box - 2.0 * padding).max(1.0);
    let scale = if span > 0.0 { usable / span } else { 0.0 };
    let offset_x = padding + (usable - (max_x - min_x) * scale) / 2.0;
    let offset_y = padding + (usable - (max_y - min_y) * scale) / 2.0;

    let fit = |index: usize| -> Point {
        let (x, y) = corners[index];
        ((x - min_x) * scale + offset_x, (y - min_y) * scale + offset_y)
    };

    IsometricOutline {
        view_box,
        top: [fit(4), fit(5), fit(6), fit(7)],
        left: [fit(3), fit(2), fit(6), fit(7)],
        right: [fit(1), fit(2), fit(6), fit(5)],
    }
}

/// Formats polygon vertices for an SVG `points` attribute.
pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.1},{y:.1}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_side_maps_to_requested_pixels() {
        let faces = cuboid_faces(30.0, 22.0, 10.0, 150.0);
        assert_eq!(faces.width, 150.0);
        assert!((faces.depth - 110.0).abs() < 1e-9);
        assert!((faces.height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_box_has_no_faces() {
        let faces = cuboid_faces(0.0, f64::NAN, -3.0, 150.0);
        assert_eq!(faces.width, 0.0);
    }

    #[test]
    fn outline_fits_inside_the_view_box() {
        let outline = isometric_outline(30.0, 22.0, 10.0, 200.0, 10.0);
        for (x, y) in outline.top.iter().chain(&outline.left).chain(&outline.right) {
            assert!(*x >= 10.0 - 1e-9 && *x <= 190.0 + 1e-9, "x {x} out of bounds");
            assert!(*y >= 10.0 - 1e-9 && *y <= 190.0 + 1e-9, "y {y} out of bounds");
        }
    }

    #[test]
    fn svg_points_are_space_separated_pairs() {
        assert_eq!(svg_points(&[(1.0, 2.26), (3.0, 4.0)]), "1.0,2.3 3.0,4.0");
    }

    #[test]
    fn probe_result_selects_render_path() {
        assert_eq!(PreviewMode::from_probe(true), PreviewMode::Css3d);
        assert_eq!(PreviewMode::from_probe(false), PreviewMode::Isometric);
    }
}
