//! Bezier-to-arc detection.
//!
//! Icon editors export circles and rounded corners as cubic bezier
//! approximations. When the control points match the standard construction
//! closely enough, the curves are replaced by native arc commands, which are
//! both shorter and exact.

use super::path::{format_number, PathData, Point, Segment};

/// Allowed deviation from the circle radius, in user units.
const RADIUS_TOLERANCE: f64 = 0.5;

/// Control point distance of the quarter-circle bezier, as a fraction of the radius.
const KAPPA: f64 = 0.552_284_7;

/// Tolerance for two computed values that must be the same number.
const EXACT: f64 = 1e-6;

// ============================================================================
// Circles
// ============================================================================

/// Rewrites a four-curve circle as two half-circle arcs.
///
/// Matches `M x y` followed by exactly four absolute `C` segments and an
/// optional close. The diagonal point is the end of the second curve; the
/// center is halfway between it and the start. Every curve endpoint and
/// every curve midpoint must lie within [`RADIUS_TOLERANCE`] of the radius,
/// and the last curve must end back on the start.
pub fn circle_to_arcs(path: &PathData) -> Option<String> {
    let segments = &path.segments;
    let closed = match segments.len() {
        5 => false,
        6 if segments[5].kind() == 'Z' => true,
        _ => return None,
    };
    if segments[0].command != 'M' || segments[1..5].iter().any(|s| s.command != 'C') {
        return None;
    }

    let start = segments[0].to;
    let curves = &segments[1..5];
    let center = start.midpoint(curves[1].to);
    let radius = center.distance(start);
    if radius <= RADIUS_TOLERANCE {
        return None;
    }

    let on_circle = |point: Point| (center.distance(point) - radius).abs() <= RADIUS_TOLERANCE;
    let all_on_circle = curves
        .iter()
        .all(|curve| on_circle(curve.to) && on_circle(cubic_midpoint(curve)));
    if !all_on_circle || curves[3].to.distance(start) > RADIUS_TOLERANCE {
        return None;
    }

    // Positive cross product is clockwise on screen (y grows downwards).
    let first = curves[0].to;
    let cross = (start.x - center.x) * (first.y - center.y) - (start.y - center.y) * (first.x - center.x);
    let sweep = if cross > 0.0 { 1 } else { 0 };

    let opposite = Point::new(2.0 * center.x - start.x, 2.0 * center.y - start.y);
    let r = format_number(radius);
    let mut out = format!(
        "M{}A{r} {r} 0 1 {sweep}{}a{r} {r} 0 0 {sweep}{}",
        join_pair(&format_number(start.x), &format_number(start.y)),
        with_separator(&join_pair(&format_number(opposite.x), &format_number(opposite.y))),
        with_separator(&join_pair(
            &format_number(start.x - opposite.x),
            &format_number(start.y - opposite.y)
        )),
    );
    if closed {
        out.push('z');
    }
    Some(out)
}

/// Point of a cubic segment at t = 0.5.
fn cubic_midpoint(curve: &Segment) -> Point {
    let (p0, p1, p2, p3) = (curve.from, curve.point(0), curve.point(2), curve.to);
    Point::new(
        (p0.x + 3.0 * p1.x + 3.0 * p2.x + p3.x) / 8.0,
        (p0.y + 3.0 * p1.y + 3.0 * p2.y + p3.y) / 8.0,
    )
}

fn join_pair(x: &str, y: &str) -> String {
    if y.starts_with('-') {
        format!("{x}{y}")
    } else {
        format!("{x} {y}")
    }
}

fn with_separator(text: &str) -> String {
    if text.starts_with('-') {
        text.to_string()
    } else {
        format!(" {text}")
    }
}

// ============================================================================
// Rounded corners
// ============================================================================

/// Replaces quarter-circle corner curves with relative arcs.
///
/// A cubic qualifies when its end is offset by the same distance `r` on both
/// axes and its control points sit where the standard quarter-circle
/// construction puts them, starting either horizontally or vertically. A
/// curve followed by a smooth cubic (`S`/`s`) is kept, since the next
/// segment reflects its second control point.
///
/// Returns the number of corners converted.
pub fn convert_rounded_corners(path: &mut PathData) -> usize {
    let mut converted = 0;
    for index in 0..path.segments.len() {
        let next_is_smooth = path
            .segments
            .get(index + 1)
            .is_some_and(|next| next.kind() == 'S');
        let segment = &path.segments[index];
        if segment.kind() != 'C' || next_is_smooth {
            continue;
        }
        if let Some(arc) = corner_arc(segment) {
            path.segments[index] = arc;
            converted += 1;
        }
    }
    converted
}

fn corner_arc(curve: &Segment) -> Option<Segment> {
    let from = curve.from;
    let (dx, dy) = (curve.to.x - from.x, curve.to.y - from.y);
    let radius = dx.abs();
    if radius < EXACT || (dy.abs() - radius).abs() > EXACT {
        return None;
    }

    // The arc is written with rounded operands; they must land on the same point.
    let (dx_text, dy_text) = (format_number(dx), format_number(dy));
    if !same_number(&dx_text, dx) || !same_number(&dy_text, dy) {
        return None;
    }

    let tolerance = 0.015 * radius + 0.001;
    let close = |point: Point, x: f64, y: f64| {
        (point.x - from.x - x).abs() <= tolerance && (point.y - from.y - y).abs() <= tolerance
    };
    let (cp1, cp2) = (curve.point(0), curve.point(2));

    let sweep = if close(cp1, KAPPA * dx, 0.0) && close(cp2, dx, (1.0 - KAPPA) * dy) {
        dx.signum() * dy > 0.0
    } else if close(cp1, 0.0, KAPPA * dy) && close(cp2, (1.0 - KAPPA) * dx, dy) {
        -dy.signum() * dx > 0.0
    } else {
        return None;
    };

    Some(Segment::derived(
        'a',
        vec![radius, radius, 0.0, 0.0, f64::from(u8::from(sweep)), dx, dy],
        from,
        curve.to,
    ))
}

fn same_number(text: &str, value: f64) -> bool {
    text.parse::<f64>()
        .is_ok_and(|parsed| (parsed - value).abs() < EXACT)
}

// ============================================================================
// Relative lines
// ============================================================================

/// Turns absolute `H`/`V` into `h`/`v` where the relative operand is shorter.
///
/// Returns the number of segments converted.
pub fn convert_relative_lines(path: &mut PathData) -> usize {
    let mut converted = 0;
    for segment in &mut path.segments {
        let delta = match segment.command {
            'H' => segment.to.x - segment.from.x,
            'V' => segment.to.y - segment.from.y,
            _ => continue,
        };
        let text = format_number(delta);
        if text.len() >= segment.arg_len(0) || !same_number(&text, delta) {
            continue;
        }
        *segment = Segment::derived(
            segment.command.to_ascii_lowercase(),
            vec![delta],
            segment.from,
            segment.to,
        );
        converted += 1;
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;

    const CIRCLE: &str = "M16 8C16 12.418 12.418 16 8 16C3.582 16 0 12.418 0 8C0 3.582 3.582 0 8 0C12.418 0 16 3.582 16 8Z";

    #[test]
    fn four_curve_circle_becomes_two_arcs() {
        let path = PathData::parse(CIRCLE).unwrap();
        assert_eq!(
            circle_to_arcs(&path).as_deref(),
            Some("M16 8A8 8 0 1 1 0 8a8 8 0 0 1 16 0z")
        );
    }

    #[test]
    fn open_circle_has_no_close() {
        let path = PathData::parse(CIRCLE.trim_end_matches('Z')).unwrap();
        let arcs = circle_to_arcs(&path).unwrap();
        assert_eq!(arcs, "M16 8A8 8 0 1 1 0 8a8 8 0 0 1 16 0");
    }

    #[test]
    fn counter_clockwise_circle_keeps_direction() {
        let d = "M16 8C16 3.582 12.418 0 8 0C3.582 0 0 3.582 0 8C0 12.418 3.582 16 8 16C12.418 16 16 12.418 16 8Z";
        let path = PathData::parse(d).unwrap();
        assert_eq!(
            circle_to_arcs(&path).as_deref(),
            Some("M16 8A8 8 0 1 0 0 8a8 8 0 0 0 16 0z")
        );
    }

    #[test]
    fn squircle_is_not_a_circle() {
        // Same endpoints as the circle, but the control points pull out to the corners.
        let d = "M16 8C16 16 16 16 8 16C0 16 0 16 0 8C0 0 0 0 8 0C16 0 16 0 16 8Z";
        assert_eq!(circle_to_arcs(&PathData::parse(d).unwrap()), None);
    }

    #[test]
    fn other_shapes_are_not_circles() {
        for d in ["M0 0L10 10", "M0 0C1 1 2 2 3 3Z", "m16 8c0 4.418-3.582 8-8 8"] {
            assert_eq!(circle_to_arcs(&PathData::parse(d).unwrap()), None, "{d}");
        }
    }

    #[test]
    fn relative_corner_becomes_arc() {
        let mut path = PathData::parse("M4 0h10c-1.105 0-2 .895-2 2").unwrap();
        assert_eq!(convert_rounded_corners(&mut path), 1);
        assert_eq!(path.to_string(), "M4 0h10a2 2 0 0 0-2 2");
    }

    #[test]
    fn absolute_corner_becomes_relative_arc() {
        // Start heading down, then turn right: counter-clockwise on screen.
        let mut path = PathData::parse("M0 0V10C0 11.105 .895 12 2 12").unwrap();
        assert_eq!(convert_rounded_corners(&mut path), 1);
        assert_eq!(path.to_string(), "M0 0V10a2 2 0 0 0 2 2");
    }

    #[test]
    fn clockwise_corner_sets_sweep() {
        let mut path = PathData::parse("M0 0c1.105 0 2 .895 2 2").unwrap();
        convert_rounded_corners(&mut path);
        assert_eq!(path.to_string(), "M0 0a2 2 0 0 1 2 2");
    }

    #[test]
    fn corner_before_smooth_curve_is_kept() {
        let mut path = PathData::parse("M0 0c1.105 0 2 .895 2 2s1 1 2 2").unwrap();
        assert_eq!(convert_rounded_corners(&mut path), 0);
    }

    #[test]
    fn non_circular_corner_is_kept() {
        let mut path = PathData::parse("M0 0c2 0 2 0 2 2").unwrap();
        assert_eq!(convert_rounded_corners(&mut path), 0);
    }

    #[test]
    fn absolute_lines_become_relative_when_shorter() {
        let mut path = PathData::parse("M100 100H105V108").unwrap();
        assert_eq!(convert_relative_lines(&mut path), 2);
        assert_eq!(path.to_string(), "M100 100h5v8");
    }

    #[test]
    fn relative_line_longer_than_absolute_is_kept() {
        let mut path = PathData::parse("M10.5 0H2").unwrap();
        assert_eq!(convert_relative_lines(&mut path), 0);
    }
}
