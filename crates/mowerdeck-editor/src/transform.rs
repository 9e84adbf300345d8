//! Coordinate transforms.
//!
//! Three spaces are in play: device pixels (whatever the render surface
//! measures), the [0,10000]² normalized square all editor geometry lives
//! in, and arena metres. Normalized Y increases downward while metre-space
//! Y increases upward, so every metre conversion flips the Y axis.
//!
//! All functions are pure; the calibration matrix maps a raw pointer pixel
//! into metre space through a 3×3 homogeneous transform.

/// Extent of the normalized coordinate space on each axis.
pub const NORMALIZED_EXTENT: f64 = 10000.0;

/// Device pixels → normalized units.
pub fn device_to_normalized(px: f64, py: f64, device_w: f64, device_h: f64) -> (f64, f64) {
    (
        px * NORMALIZED_EXTENT / device_w,
        py * NORMALIZED_EXTENT / device_h,
    )
}

/// Normalized units → device pixels.
pub fn normalized_to_device(x: f64, y: f64, device_w: f64, device_h: f64) -> (f64, f64) {
    (
        x * device_w / NORMALIZED_EXTENT,
        y * device_h / NORMALIZED_EXTENT,
    )
}

/// Normalized units → arena metres, flipping the Y axis.
pub fn normalized_to_metres(x: f64, y: f64, arena_w: f64, arena_l: f64) -> (f64, f64) {
    (
        arena_w * x / NORMALIZED_EXTENT,
        arena_l * (1.0 - y / NORMALIZED_EXTENT),
    )
}

/// Arena metres → normalized units, flipping the Y axis back.
pub fn metres_to_normalized(x_m: f64, y_m: f64, arena_w: f64, arena_l: f64) -> (f64, f64) {
    (
        x_m * NORMALIZED_EXTENT / arena_w,
        (1.0 - y_m / arena_l) * NORMALIZED_EXTENT,
    )
}

/// A 3×3 homogeneous transform, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [[f64; 3]; 3]);

impl Mat3 {
    /// The identity transform.
    pub const IDENTITY: Mat3 = Mat3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Apply the transform to a point: homogeneous multiply followed by
    /// the perspective divide.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.0;
        let hx = m[0][0] * x + m[0][1] * y + m[0][2];
        let hy = m[1][0] * x + m[1][1] * y + m[1][2];
        let hw = m[2][0] * x + m[2][1] * y + m[2][2];
        (hx / hw, hy / hw)
    }

    /// Determinant.
    pub fn det(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Inverse via the adjugate, `None` when singular.
    pub fn inverse(&self) -> Option<Mat3> {
        let det = self.det();
        if det.abs() < f64::EPSILON {
            return None;
        }
        let m = &self.0;
        let adj = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];
        let mut out = [[0.0; 3]; 3];
        for (row, adj_row) in out.iter_mut().zip(adj) {
            for (cell, a) in row.iter_mut().zip(adj_row) {
                *cell = a / det;
            }
        }
        Some(Mat3(out))
    }
}
