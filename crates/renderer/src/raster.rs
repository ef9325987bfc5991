use tray_theme::Color;

/// A square pixel buffer, row-major, origin at the top left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    side:   u32,
    pixels: Vec<Color>,
}

/// A polygon vertex in pixel coordinates.
pub type Point = (i32, i32);

impl RasterImage {
    /// A `side` x `side` image filled with `background`.
    pub fn new(side: u32, background: Color) -> Self {
        Self {
            side,
            pixels: vec![background; (side * side) as usize],
        }
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.side && y < self.side).then(|| self.pixels[(y * self.side + x) as usize])
    }

    /// Set one pixel; out-of-bounds coordinates are ignored.
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        let side = self.side as i32;
        if (0..side).contains(&x) && (0..side).contains(&y) {
            self.pixels[(y * side + x) as usize] = color;
        }
    }

    /// Fill rows `top..bottom` of column `x`, clipped to the image.
    pub fn fill_column(&mut self, x: u32, top: u32, bottom: u32, color: Color) {
        if x >= self.side {
            return;
        }
        for y in top..bottom.min(self.side) {
            self.pixels[(y * self.side + x) as usize] = color;
        }
    }

    /// Fill a closed polygon with the even-odd rule, sampling pixel centres.
    pub fn fill_polygon(&mut self, points: &[Point], color: Color) {
        if points.len() < 3 {
            return;
        }

        let mut crossings = Vec::with_capacity(points.len());
        for row in 0..self.side as i32 {
            let y = row as f32 + 0.5;

            crossings.clear();
            let edges = points.iter().zip(points.iter().cycle().skip(1));
            for (&(x0, y0), &(x1, y1)) in edges {
                // Horizontal edges never cross a scanline.
                if y0 == y1 {
                    continue;
                }
                let (lo, hi) = if y0 < y1 { (y0, y1) } else { (y1, y0) };
                if y < lo as f32 || y >= hi as f32 {
                    continue;
                }
                let t = (y - y0 as f32) / (y1 - y0) as f32;
                crossings.push(x0 as f32 + t * (x1 - x0) as f32);
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                // Pixels whose centre lies inside [start, end).
                let start = (span[0] - 0.5).ceil() as i32;
                let end = (span[1] - 0.5).ceil() as i32;
                for x in start..end {
                    self.put(x, row, color);
                }
            }
        }
    }

    /// Draw connected one-pixel segments through `points`.
    pub fn draw_polyline(&mut self, points: &[Point], color: Color) {
        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }
    }

    /// Bresenham line, both endpoints included.
    pub fn draw_line(&mut self, (mut x0, mut y0): Point, (x1, y1): Point, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Color::WHITE;
    const FG: Color = Color::BLACK;

    fn count(img: &RasterImage, color: Color) -> usize {
        img.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn column_fill_is_clipped() {
        let mut img = RasterImage::new(4, BG);
        img.fill_column(1, 2, 10, FG);
        img.fill_column(9, 0, 4, FG);
        assert_eq!(count(&img, FG), 2);
        assert_eq!(img.get(1, 2), Some(FG));
        assert_eq!(img.get(1, 3), Some(FG));
        assert_eq!(img.get(1, 1), Some(BG));
    }

    #[test]
    fn rectangle_polygon_covers_its_area() {
        let mut img = RasterImage::new(10, BG);
        img.fill_polygon(&[(2, 2), (6, 2), (6, 5), (2, 5)], FG);
        assert_eq!(count(&img, FG), 4 * 3);
        assert_eq!(img.get(2, 2), Some(FG));
        assert_eq!(img.get(5, 4), Some(FG));
        assert_eq!(img.get(6, 4), Some(BG));
        assert_eq!(img.get(5, 5), Some(BG));
    }

    #[test]
    fn polygon_outside_image_is_clipped() {
        let mut img = RasterImage::new(4, BG);
        img.fill_polygon(&[(-5, -5), (20, -5), (20, 20), (-5, 20)], FG);
        assert_eq!(count(&img, FG), 16);
    }

    #[test]
    fn degenerate_polygon_draws_nothing() {
        let mut img = RasterImage::new(4, BG);
        img.fill_polygon(&[(0, 0), (3, 3)], FG);
        assert_eq!(count(&img, FG), 0);
    }

    #[test]
    fn lines_include_both_ends() {
        let mut img = RasterImage::new(8, BG);
        img.draw_line((1, 1), (5, 1), FG);
        assert_eq!(count(&img, FG), 5);

        let mut img = RasterImage::new(8, BG);
        img.draw_line((0, 0), (3, 3), FG);
        assert_eq!(count(&img, FG), 4);
        assert_eq!(img.get(3, 3), Some(FG));
    }

    #[test]
    fn polyline_joins_segments() {
        let mut img = RasterImage::new(8, BG);
        img.draw_polyline(&[(0, 0), (0, 3), (3, 3)], FG);
        assert_eq!(count(&img, FG), 7);
    }

    #[test]
    fn get_is_bounds_checked() {
        let img = RasterImage::new(2, BG);
        assert_eq!(img.get(2, 0), None);
        assert_eq!(img.get(1, 1), Some(BG));
    }
}
