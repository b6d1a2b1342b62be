use nalgebra::Point2;

/// Errors produced when building an edge map from raw parts.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EdgeMapError {
    #[error("invalid edge map dimensions (width={width}, height={height})")]
    InvalidDimensions { width: usize, height: usize },

    #[error("invalid edge map buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("edge pixel ({x}, {y}) outside a {width}x{height} map")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Borrowed binary edge map. Any non-zero byte is an edge pixel.
#[derive(Clone, Copy, Debug)]
pub struct EdgeMapView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

impl EdgeMapView<'_> {
    #[inline]
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.data[y * self.width + x] != 0
    }

    /// Append the coordinates of every edge pixel to `out`, scanning rows
    /// top to bottom.
    pub fn collect_edge_points(&self, out: &mut Vec<Point2<i32>>) {
        if self.width == 0 {
            return;
        }
        for (y, row) in self.data.chunks_exact(self.width).enumerate() {
            for (x, &v) in row.iter().enumerate() {
                if v != 0 {
                    out.push(Point2::new(x as i32, y as i32));
                }
            }
        }
    }

    pub fn edge_points(&self) -> Vec<Point2<i32>> {
        let mut out = Vec::new();
        self.collect_edge_points(&mut out);
        out
    }

    pub fn count_edges(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// Owned binary edge map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl EdgeMap {
    /// Empty (all background) map.
    pub fn new(width: usize, height: usize) -> Result<Self, EdgeMapError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, EdgeMapError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(EdgeMapError::InvalidBuffer {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a map with edges at the given `(x, y)` pixels.
    pub fn from_points(
        width: usize,
        height: usize,
        points: &[(usize, usize)],
    ) -> Result<Self, EdgeMapError> {
        let mut map = Self::new(width, height)?;
        for &(x, y) in points {
            map.set_edge(x, y)?;
        }
        Ok(map)
    }

    pub fn set_edge(&mut self, x: usize, y: usize) -> Result<(), EdgeMapError> {
        if x >= self.width || y >= self.height {
            return Err(EdgeMapError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        self.data[y * self.width + x] = 255;
        Ok(())
    }

    pub fn view(&self) -> EdgeMapView<'_> {
        EdgeMapView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

fn checked_len(width: usize, height: usize) -> Result<usize, EdgeMapError> {
    if width == 0 || height == 0 {
        return Err(EdgeMapError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(EdgeMapError::InvalidDimensions { width, height })
}
