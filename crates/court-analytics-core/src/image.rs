/// Borrowed 8-bit grayscale frame.
#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl GrayImageView<'_> {
    /// True when the buffer length matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.width.checked_mul(self.height) == Some(self.data.len())
    }

    #[inline]
    fn get(&self, x: usize, y: usize) -> i32 {
        self.data[y * self.width + x] as i32
    }

    /// Count interior pixels whose Sobel gradient magnitude (L1) exceeds
    /// `threshold`.
    pub fn sobel_edge_count(&self, threshold: i32) -> usize {
        if !self.is_consistent() || self.width < 3 || self.height < 3 {
            return 0;
        }

        let mut count = 0;
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                // 3x3 neighbourhood, (0, 0) is the top-left neighbour
                let px = |dx: usize, dy: usize| self.get(x + dx - 1, y + dy - 1);
                let gx = px(2, 0) + 2 * px(2, 1) + px(2, 2) - px(0, 0) - 2 * px(0, 1) - px(0, 2);
                let gy = px(0, 2) + 2 * px(1, 2) + px(2, 2) - px(0, 0) - 2 * px(1, 0) - px(2, 0);
                if gx.abs() + gy.abs() > threshold {
                    count += 1;
                }
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_frame_has_no_edges() {
        let data = vec![90u8; 16 * 8];
        let view = GrayImageView {
            width: 16,
            height: 8,
            data: &data,
        };
        assert_eq!(view.sobel_edge_count(50), 0);
    }

    #[test]
    fn vertical_line_produces_edges() {
        let (w, h) = (16usize, 8usize);
        let mut data = vec![0u8; w * h];
        for y in 0..h {
            data[y * w + 8] = 255;
        }
        let view = GrayImageView {
            width: w,
            height: h,
            data: &data,
        };
        // columns 7 and 9 respond on every interior row
        assert_eq!(view.sobel_edge_count(100), 2 * (h - 2));
    }

    #[test]
    fn inconsistent_buffer_is_ignored() {
        let data = vec![0u8; 10];
        let view = GrayImageView {
            width: 4,
            height: 4,
            data: &data,
        };
        assert!(!view.is_consistent());
        assert_eq!(view.sobel_edge_count(0), 0);
    }
}
