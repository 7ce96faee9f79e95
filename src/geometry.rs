use egui::{Pos2, Rect};

/// Distance from a point to a line segment
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = (point_vec.dot(line_vec) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}

/// Bounding box of a segment, grown by `padding` on every side
pub(crate) fn segment_bounds(from: Pos2, to: Pos2, padding: f32) -> Rect {
    Rect::from_two_pos(from, to).expand(padding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_distance_to_segment() {
        let a = pos2(0.0, 0.0);
        let b = pos2(10.0, 0.0);
        assert_eq!(distance_to_line_segment(pos2(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_line_segment(pos2(-4.0, 3.0), a, b), 5.0);
        assert_eq!(distance_to_line_segment(pos2(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn test_segment_bounds_padding() {
        let rect = segment_bounds(pos2(4.0, 1.0), pos2(0.0, 3.0), 2.0);
        assert_eq!(rect.min, pos2(-2.0, -1.0));
        assert_eq!(rect.max, pos2(6.0, 5.0));
    }
}
