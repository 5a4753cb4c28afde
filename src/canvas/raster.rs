use super::Canvas;

/// In-memory raster of opaque `u32` pixel values, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCanvas {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl RasterCanvas {
    /// Canvas cleared to 0.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Value at `(x, y)`, `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Number of pixels holding `color`.
    pub fn count(&self, color: u32) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }
}

impl Canvas for RasterCanvas {
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    /// Fills whole row slices instead of going pixel by pixel.
    fn filled_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let clamp = |v: i32, len: usize| -> usize {
            usize::try_from(v.max(0)).map_or(0, |v| v.min(len - 1))
        };
        let (left, right) = (x0.min(x1), x0.max(x1));
        let (top, bottom) = (y0.min(y1), y0.max(y1));

        let fully_outside = right < 0
            || bottom < 0
            || usize::try_from(left).is_ok_and(|l| l >= self.width)
            || usize::try_from(top).is_ok_and(|t| t >= self.height);
        if fully_outside {
            return;
        }

        let (left, right) = (clamp(left, self.width), clamp(right, self.width));
        let (top, bottom) = (clamp(top, self.height), clamp(bottom, self.height));
        for row in self.pixels.chunks_mut(self.width).take(bottom + 1).skip(top) {
            row[left..=right].fill(color);
        }
    }
}
