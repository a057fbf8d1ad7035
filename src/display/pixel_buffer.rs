// ============================================================================
// Utility Functions
// ============================================================================

/// Alpha blend a single color channel
/// Uses fast approximation: (x + 1 + (x >> 8)) >> 8 instead of x / 255
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: u16) -> u8 {
    let result = src as u16 * alpha + dst as u16 * (255 - alpha);
    ((result + 1 + (result >> 8)) >> 8) as u8
}

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], r: u8, g: u8, b: u8) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// RGBA8888 pixel buffer for software rendering
/// This is the backing store of the software canvas
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reallocate for a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![0; width as usize * height as usize * 4];
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Calculate byte offset for pixel at (x, y)
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Clear to a solid color
    pub fn clear(&mut self, r: u8, g: u8, b: u8) {
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel(chunk, r, g, b);
        }
    }

    /// Set pixel with alpha blending
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, r: u8, g: u8, b: u8, a: u8) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            let alpha = a as u16;
            self.pixels[idx] = 255; // A - always opaque
            self.pixels[idx + 1] = blend_channel(b, self.pixels[idx + 1], alpha);
            self.pixels[idx + 2] = blend_channel(g, self.pixels[idx + 2], alpha);
            self.pixels[idx + 3] = blend_channel(r, self.pixels[idx + 3], alpha);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<(u8, u8, u8)> {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            Some((
                self.pixels[idx + 3],
                self.pixels[idx + 2],
                self.pixels[idx + 1],
            ))
        } else {
            None
        }
    }

    /// Anti-aliased stroke of a segment with round caps.
    ///
    /// Coverage is the distance from each pixel center to the segment (a
    /// capsule test), so both ends come out rounded. Strokes thinner than one
    /// pixel keep a one pixel footprint and lose opacity instead.
    pub fn stroke_capsule(
        &mut self,
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
        width: f32,
        r: u8,
        g: u8,
        b: u8,
        alpha: f32,
    ) {
        if alpha <= 0.0 || width <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }
        let half = (width * 0.5).max(0.5);
        let thin = width.min(1.0);
        let reach = half + 1.0;

        let min_x = (x0.min(x1) - reach).floor().max(0.0);
        let min_y = (y0.min(y1) - reach).floor().max(0.0);
        let max_x = (x0.max(x1) + reach).ceil().min(self.width as f32 - 1.0);
        let max_y = (y0.max(y1) + reach).ceil().min(self.height as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = dx * dx + dy * dy;

        for py in min_y as i32..=max_y as i32 {
            let cy = py as f32 + 0.5;
            for px in min_x as i32..=max_x as i32 {
                let cx = px as f32 + 0.5;
                let t = if len_sq > 0.0 {
                    (((cx - x0) * dx + (cy - y0) * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = (x0 + dx * t - cx).hypot(y0 + dy * t - cy);
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0) * thin;
                if coverage <= 0.0 {
                    continue;
                }
                let a = (alpha * coverage * 255.0).round().clamp(0.0, 255.0) as u8;
                if a > 0 {
                    self.blend_pixel(px, py, r, g, b, a);
                }
            }
        }
    }

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_full_and_none() {
        let mut buf = PixelBuffer::with_size(2, 1);
        buf.clear(200, 100, 50);
        buf.blend_pixel(0, 0, 0, 0, 0, 255);
        buf.blend_pixel(1, 0, 0, 0, 0, 0);
        assert_eq!(buf.get_pixel(0, 0), Some((0, 0, 0)));
        assert_eq!(buf.get_pixel(1, 0), Some((200, 100, 50)));
        assert_eq!(buf.get_pixel(2, 0), None);
    }

    #[test]
    fn test_capsule_darkens_along_segment_only() {
        let mut buf = PixelBuffer::with_size(20, 20);
        buf.clear(255, 255, 255);
        buf.stroke_capsule(2.0, 10.0, 17.0, 10.0, 2.0, 0, 0, 0, 1.0);

        let (on, _, _) = buf.get_pixel(10, 9).unwrap();
        let (off, _, _) = buf.get_pixel(10, 2).unwrap();
        assert!(on < 100, "segment pixel not drawn: {on}");
        assert_eq!(off, 255);
    }

    #[test]
    fn test_capsule_offscreen_is_noop() {
        let mut buf = PixelBuffer::with_size(8, 8);
        buf.clear(255, 255, 255);
        buf.stroke_capsule(-50.0, -50.0, -40.0, -45.0, 3.0, 0, 0, 0, 1.0);
        assert!(buf
            .as_bytes()
            .chunks_exact(4)
            .all(|px| px[1] == 255 && px[2] == 255 && px[3] == 255));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buf = PixelBuffer::with_size(4, 4);
        buf.resize(10, 3);
        assert_eq!(buf.as_bytes().len(), 10 * 3 * 4);
        assert_eq!(buf.width(), 10);
        assert_eq!(buf.height(), 3);
    }
}
