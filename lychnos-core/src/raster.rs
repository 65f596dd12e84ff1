//! Drawing primitives
//!
//! Stateless integer algorithms that write through
//! [`FrameBuffer::set_pixel`]. All coordinates use the 1-indexed caller
//! convention of the framebuffer, so shapes may legally overhang the panel
//! edge - the overhanging pixels are dropped there.

use crate::framebuffer::FrameBuffer;

/// Horizontal span: the `w` pixels at row `y`, columns `[x, x + w)`.
pub fn horizontal_line(fb: &mut FrameBuffer, x: i32, y: i32, w: i32) {
    for i in x..x + w {
        fb.set_pixel(i, y, true);
    }
}

/// Vertical span: the `h` pixels at column `x`, rows `[y, y + h)`.
pub fn vertical_line(fb: &mut FrameBuffer, x: i32, y: i32, h: i32) {
    for i in y..y + h {
        fb.set_pixel(x, i, true);
    }
}

/// Line between two arbitrary points.
///
/// Axis-aligned lines take the exact span fast paths; everything else is a
/// Bresenham walk over the major axis.
pub fn line(fb: &mut FrameBuffer, mut x0: i32, mut y0: i32, mut x1: i32, mut y1: i32) {
    if x0 == x1 {
        if y0 > y1 {
            core::mem::swap(&mut y0, &mut y1);
        }
        vertical_line(fb, x0, y0, y1 - y0 + 1);
        return;
    }
    if y0 == y1 {
        if x0 > x1 {
            core::mem::swap(&mut x0, &mut x1);
        }
        horizontal_line(fb, x0, y0, x1 - x0 + 1);
        return;
    }

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        core::mem::swap(&mut x0, &mut y0);
        core::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        core::mem::swap(&mut x0, &mut x1);
        core::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let mut err = dx / 2;
    let ystep = if y0 < y1 { 1 } else { -1 };

    while x0 <= x1 {
        if steep {
            fb.set_pixel(y0, x0, true);
        } else {
            fb.set_pixel(x0, y0, true);
        }
        err -= dy;
        if err < 0 {
            y0 += ystep;
            err += dx;
        }
        x0 += 1;
    }
}

/// Stroked rectangle with top-left corner at `(x, y)`.
pub fn rectangle(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32) {
    horizontal_line(fb, x, y, w);
    horizontal_line(fb, x, y + h - 1, w);
    vertical_line(fb, x, y, h);
    vertical_line(fb, x + w - 1, y, h);
}

/// Filled rectangle: `w` adjacent vertical spans.
pub fn filled_rectangle(fb: &mut FrameBuffer, x: i32, y: i32, w: i32, h: i32) {
    for i in x..x + w {
        vertical_line(fb, i, y, h);
    }
}

/// Stroked square.
pub fn square(fb: &mut FrameBuffer, x: i32, y: i32, w: i32) {
    rectangle(fb, x, y, w, w);
}

/// Filled square.
pub fn filled_square(fb: &mut FrameBuffer, x: i32, y: i32, w: i32) {
    filled_rectangle(fb, x, y, w, w);
}

/// Stroked circle, midpoint algorithm.
pub fn circle(fb: &mut FrameBuffer, x: i32, y: i32, r: i32) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut xt = 0;
    let mut yt = r;

    fb.set_pixel(x, y + r, true);
    fb.set_pixel(x, y - r, true);
    fb.set_pixel(x + r, y, true);
    fb.set_pixel(x - r, y, true);

    while xt < yt {
        if f >= 0 {
            yt -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        xt += 1;
        ddf_x += 2;
        f += ddf_x;

        fb.set_pixel(x + xt, y + yt, true);
        fb.set_pixel(x - xt, y + yt, true);
        fb.set_pixel(x + xt, y - yt, true);
        fb.set_pixel(x - xt, y - yt, true);
        fb.set_pixel(x + yt, y + xt, true);
        fb.set_pixel(x - yt, y + xt, true);
        fb.set_pixel(x + yt, y - xt, true);
        fb.set_pixel(x - yt, y - xt, true);
    }
}

/// Filled circle: one vertical diameter plus side spans on both halves.
pub fn filled_circle(fb: &mut FrameBuffer, x: i32, y: i32, r: i32) {
    vertical_line(fb, x, y - r, 2 * r + 1);
    fill_circle_sides(fb, x, y, r, 3, 0);
}

/// Vertical span pairs for the left (`corners & 2`) and right
/// (`corners & 1`) halves of a circle, walking the same midpoint steps as
/// the stroked version. Rows already covered by the previous step are
/// skipped so an invert drawing mode would not double-plot.
fn fill_circle_sides(fb: &mut FrameBuffer, x: i32, y: i32, r: i32, corners: u8, delta: i32) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut xt = 0;
    let mut yt = r;
    let mut px = xt;
    let mut py = yt;

    let delta = delta + 1; // avoid some +1's in the loop

    while xt < yt {
        if f >= 0 {
            yt -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        xt += 1;
        ddf_x += 2;
        f += ddf_x;

        if xt < yt + 1 {
            if corners & 1 != 0 {
                vertical_line(fb, x + xt, y - yt, 2 * yt + delta);
            }
            if corners & 2 != 0 {
                vertical_line(fb, x - xt, y - yt, 2 * yt + delta);
            }
        }
        if yt != py {
            if corners & 1 != 0 {
                vertical_line(fb, x + py, y - px, 2 * px + delta);
            }
            if corners & 2 != 0 {
                vertical_line(fb, x - py, y - px, 2 * px + delta);
            }
            py = yt;
        }
        px = xt;
    }
}

/// Stroked triangle through three vertices.
pub fn triangle(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
    line(fb, x0, y0, x1, y1);
    line(fb, x1, y1, x2, y2);
    line(fb, x2, y2, x0, y0);
}

/// Stroked triangle centered on `(cx, cy)`: apex up, base `w` wide,
/// `h` tall.
pub fn triangle_about(fb: &mut FrameBuffer, cx: i32, cy: i32, w: i32, h: i32) {
    let (x0, y0) = (cx, cy - h / 2);
    let (x1, y1) = (cx - w / 2, cy + h / 2);
    let (x2, y2) = (cx + w / 2, cy + h / 2);
    triangle(fb, x0, y0, x1, y1, x2, y2);
}

/// Filled triangle centered on `(cx, cy)`, same vertex derivation as
/// [`triangle_about`].
pub fn filled_triangle_about(fb: &mut FrameBuffer, cx: i32, cy: i32, w: i32, h: i32) {
    let (x0, y0) = (cx, cy - h / 2);
    let (x1, y1) = (cx - w / 2, cy + h / 2);
    let (x2, y2) = (cx + w / 2, cy + h / 2);
    filled_triangle(fb, x0, y0, x1, y1, x2, y2);
}

/// Filled triangle through three vertices, scanline fill with incremental
/// edge interpolation.
pub fn filled_triangle(
    fb: &mut FrameBuffer,
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    mut x2: i32,
    mut y2: i32,
) {
    // Sort vertices by y (y2 >= y1 >= y0)
    if y0 > y1 {
        core::mem::swap(&mut y0, &mut y1);
        core::mem::swap(&mut x0, &mut x1);
    }
    if y1 > y2 {
        core::mem::swap(&mut y2, &mut y1);
        core::mem::swap(&mut x2, &mut x1);
    }
    if y0 > y1 {
        core::mem::swap(&mut y0, &mut y1);
        core::mem::swap(&mut x0, &mut x1);
    }

    if y0 == y2 {
        // All on one scanline: single span over min/max x
        let mut a = x0;
        let mut b = x0;
        if x1 < a {
            a = x1;
        } else if x1 > b {
            b = x1;
        }
        if x2 < a {
            a = x2;
        } else if x2 > b {
            b = x2;
        }
        horizontal_line(fb, a, y0, b - a + 1);
        return;
    }

    let dx01 = x1 - x0;
    let dy01 = y1 - y0;
    let dx02 = x2 - x0;
    let dy02 = y2 - y0;
    let dx12 = x2 - x1;
    let dy12 = y2 - y1;
    let mut sa = 0;
    let mut sb = 0;

    // Upper region: scanline crossings for edges 0-1 and 0-2. Including
    // y1 only for the flat-bottom case keeps both loops clear of zero
    // divisors and avoids drawing scanline y1 twice.
    let last = if y1 == y2 { y1 } else { y1 - 1 };

    let mut y = y0;
    while y <= last {
        let mut a = x0 + sa / dy01;
        let mut b = x0 + sb / dy02;
        sa += dx01;
        sb += dx02;
        if a > b {
            core::mem::swap(&mut a, &mut b);
        }
        horizontal_line(fb, a, y, b - a + 1);
        y += 1;
    }

    // Lower region: edges 1-2 and 0-2. Skipped entirely when y1 == y2.
    sa = dx12 * (y - y1);
    sb = dx02 * (y - y0);
    while y <= y2 {
        let mut a = x1 + sa / dy12;
        let mut b = x0 + sb / dy02;
        sa += dx12;
        sb += dx02;
        if a > b {
            core::mem::swap(&mut a, &mut b);
        }
        horizontal_line(fb, a, y, b - a + 1);
        y += 1;
    }
}

/// Diagnostic pattern: the four panel corners plus the center pixel.
pub fn test_pattern(fb: &mut FrameBuffer) {
    let columns = fb.columns() as i32;
    let rows = fb.rows() as i32;
    fb.set_pixel(1, 1, true);
    fb.set_pixel(columns, 1, true);
    fb.set_pixel(1, rows, true);
    fb.set_pixel(columns, rows, true);
    fb.set_pixel(columns / 2, rows / 2, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lit(fb: &FrameBuffer) -> alloc::vec::Vec<(i32, i32)> {
        let mut out = alloc::vec::Vec::new();
        for y in 1..=fb.rows() as i32 {
            for x in 1..=fb.columns() as i32 {
                if fb.pixel(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn horizontal_line_is_exact() {
        let mut fb = FrameBuffer::new(128, 64);
        horizontal_line(&mut fb, 10, 20, 30);
        let pixels = lit(&fb);
        assert_eq!(pixels.len(), 30);
        assert!(pixels.iter().all(|&(x, y)| y == 20 && (10..40).contains(&x)));
    }

    #[test]
    fn vertical_line_is_exact() {
        let mut fb = FrameBuffer::new(128, 64);
        vertical_line(&mut fb, 5, 3, 12);
        let pixels = lit(&fb);
        assert_eq!(pixels.len(), 12);
        assert!(pixels.iter().all(|&(x, y)| x == 5 && (3..15).contains(&y)));
    }

    #[test]
    fn line_endpoints_always_plotted() {
        for (x0, y0, x1, y1) in [(1, 1, 128, 64), (128, 1, 1, 64), (7, 60, 100, 2), (3, 3, 4, 40)] {
            let mut fb = FrameBuffer::new(128, 64);
            line(&mut fb, x0, y0, x1, y1);
            assert!(fb.pixel(x0, y0), "start of ({x0},{y0})-({x1},{y1})");
            assert!(fb.pixel(x1, y1), "end of ({x0},{y0})-({x1},{y1})");
        }
    }

    #[test]
    fn rectangle_outline_has_expected_pixel_count() {
        let mut fb = FrameBuffer::new(128, 64);
        rectangle(&mut fb, 10, 10, 20, 12);
        // perimeter of a w x h outline
        assert_eq!(lit(&fb).len(), (2 * (20 + 12) - 4) as usize);
        assert!(fb.pixel(10, 10));
        assert!(fb.pixel(29, 21));
        assert!(!fb.pixel(11, 11));
    }

    #[test]
    fn filled_rectangle_covers_exactly_its_area() {
        let mut fb = FrameBuffer::new(128, 64);
        filled_rectangle(&mut fb, 4, 6, 10, 5);
        let pixels = lit(&fb);
        assert_eq!(pixels.len(), 50);
        assert!(pixels
            .iter()
            .all(|&(x, y)| (4..14).contains(&x) && (6..11).contains(&y)));
    }

    #[test]
    fn circle_cardinal_points() {
        // 128x64 panel, circle at center with r=16
        let mut fb = FrameBuffer::new(128, 64);
        circle(&mut fb, 64, 32, 16);
        assert!(fb.pixel(64, 48));
        assert!(fb.pixel(64, 16));
        assert!(fb.pixel(80, 32));
        assert!(fb.pixel(48, 32));
        assert!(!fb.pixel(64, 32));
    }

    #[test]
    fn filled_circle_covers_stroke_and_interior() {
        let mut fb = FrameBuffer::new(128, 64);
        filled_circle(&mut fb, 64, 32, 10);
        let mut outline = FrameBuffer::new(128, 64);
        circle(&mut outline, 64, 32, 10);
        for (x, y) in lit(&outline) {
            assert!(fb.pixel(x, y), "outline pixel ({x},{y}) missing from fill");
        }
        assert!(fb.pixel(64, 32));
        // nothing outside r+1
        for (x, y) in lit(&fb) {
            let (dx, dy) = (x - 64, y - 32);
            assert!(dx * dx + dy * dy <= 11 * 11, "({x},{y}) outside circle");
        }
    }

    #[test]
    fn degenerate_triangle_is_single_span() {
        let mut fb = FrameBuffer::new(128, 64);
        filled_triangle(&mut fb, 3, 10, 9, 10, 5, 10);
        let pixels = lit(&fb);
        assert_eq!(pixels.len(), 7);
        assert!(pixels.iter().all(|&(x, y)| y == 10 && (3..=9).contains(&x)));
    }

    #[test]
    fn filled_triangle_contains_its_vertices() {
        let mut fb = FrameBuffer::new(128, 64);
        filled_triangle(&mut fb, 10, 5, 60, 40, 20, 60);
        assert!(fb.pixel(10, 5));
        assert!(fb.pixel(60, 40));
        assert!(fb.pixel(20, 60));
    }

    /// Signed distance of `p` from edge `a -> b`, in (approximate) pixels,
    /// positive on the left of the edge.
    fn edge_distance(a: (i32, i32), b: (i32, i32), p: (i32, i32)) -> f64 {
        let (ax, ay) = (a.0 as f64, a.1 as f64);
        let (bx, by) = (b.0 as f64, b.1 as f64);
        let (px, py) = (p.0 as f64, p.1 as f64);
        let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
        let len = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        cross / len
    }

    proptest! {
        #[test]
        fn filled_triangle_stays_inside_hull(
            x0 in 1i32..=128, y0 in 1i32..=64,
            x1 in 1i32..=128, y1 in 1i32..=64,
            x2 in 1i32..=128, y2 in 1i32..=64,
        ) {
            // need a real triangle, not three collinear points
            let area2 = (x1 - x0) * (y2 - y0) - (x2 - x0) * (y1 - y0);
            prop_assume!(area2 != 0);

            // orient counter-clockwise so all edge distances are
            // positive inside
            let (x1, y1, x2, y2) = if area2 < 0 {
                (x2, y2, x1, y1)
            } else {
                (x1, y1, x2, y2)
            };
            let (a, b, c) = ((x0, y0), (x1, y1), (x2, y2));

            let mut fb = FrameBuffer::new(128, 64);
            filled_triangle(&mut fb, x0, y0, x1, y1, x2, y2);

            for (x, y) in lit(&fb) {
                let p = (x, y);
                // allow ~1px of rasterization slack at the edges
                prop_assert!(
                    edge_distance(a, b, p) >= -1.5
                        && edge_distance(b, c, p) >= -1.5
                        && edge_distance(c, a, p) >= -1.5,
                    "pixel ({}, {}) escapes triangle {:?} {:?} {:?}",
                    x, y, a, b, c
                );
            }
        }
    }

    #[test]
    fn test_pattern_marks_corners_and_center() {
        let mut fb = FrameBuffer::new(128, 64);
        test_pattern(&mut fb);
        let pixels = lit(&fb);
        assert_eq!(pixels.len(), 5);
        assert!(fb.pixel(1, 1));
        assert!(fb.pixel(128, 1));
        assert!(fb.pixel(1, 64));
        assert!(fb.pixel(128, 64));
        assert!(fb.pixel(64, 32));
    }
}
