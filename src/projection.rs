//! Perspective projection and screen mapping
use crate::{
    constants::PERSPECTIVE_EPSILON,
    math::{from_column_major, multiply_matrix_vector, Matrix4, Vector4},
};

/// Symmetric frustum projection [Matrix4] (classic OpenGL form), column-major:
///
/// ```text
/// [2n/w   0      0          0]
/// [0      2n/h   0          0]
/// [0      0   -(f+n)/(f-n) -1]
/// [0      0  -2nf/(f-n)     0]
/// ```
///
/// Each line above is one column. The camera looks down its -Z axis
/// and the clip `w` equals the depth in front of the camera.
pub fn projection_matrix(width: f64, height: f64, near: f64, far: f64) -> Matrix4 {
    from_column_major(&[
        2.0 * near / width,
        0.0,
        0.0,
        0.0,
        //
        0.0,
        2.0 * near / height,
        0.0,
        0.0,
        //
        0.0,
        0.0,
        -(far + near) / (far - near),
        -1.0,
        //
        0.0,
        0.0,
        -2.0 * near * far / (far - near),
        0.0,
    ])
}

/// Frustum width on the near plane, for this horizontal field of view.
pub fn frustum_width(fov_x_deg: f64, near: f64) -> f64 {
    2.0 * (fov_x_deg.to_radians() / 2.0).tan() * near
}

/// Perspective [Matrix4] from a horizontal field of view (degrees).
/// The field of view must be below 270° and may not be 180°: this is verified
/// at the configuration boundary and asserted here.
pub fn perspective(fov_x_deg: f64, aspect_ratio: f64, near: f64, far: f64) -> Matrix4 {
    assert!(
        fov_x_deg < 270.0 && fov_x_deg != 180.0,
        "invalid horizontal field of view: {}°",
        fov_x_deg
    );
    let width = frustum_width(fov_x_deg, near);
    let height = width / aspect_ratio;
    projection_matrix(width, height, near, far)
}

/// Projects a camera-frame vector into clip space.
/// The perspective divide is not performed, so the clip coordinates remain
/// available to the visibility test.
pub fn project(projection: &Matrix4, vector: &Vector4) -> Vector4 {
    multiply_matrix_vector(projection, vector)
}

/// Perspective divide. Returns normalized device coordinates,
/// collapsing to (0, 0) when `w` vanishes or the result is not finite.
pub fn perspective_divide(clip: &Vector4) -> (f64, f64) {
    if clip.w.is_nan() || clip.w.abs() < PERSPECTIVE_EPSILON {
        return (0.0, 0.0);
    }
    let (x, y) = (clip.x / clip.w, clip.y / clip.w);
    (
        if x.is_finite() { x } else { 0.0 },
        if y.is_finite() { y } else { 0.0 },
    )
}

/// Canvas position in pixels. Origin top left, Y grows downward.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ScreenOffset {
    pub x: f64,
    pub y: f64,
}

impl ScreenOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Canvas center
    pub fn center(canvas_width: f64, canvas_height: f64) -> Self {
        Self::new(canvas_width / 2.0, canvas_height / 2.0)
    }

    /// Distance to another [ScreenOffset], in pixels
    pub fn distance(&self, rhs: &Self) -> f64 {
        ((self.x - rhs.x).powi(2) + (self.y - rhs.y).powi(2)).sqrt()
    }
}

/// Maps normalized device coordinates onto the canvas. NDC Y grows upward
/// while canvas Y grows downward.
pub fn ndc_to_screen(canvas_width: f64, canvas_height: f64, ndc: (f64, f64)) -> ScreenOffset {
    let center = ScreenOffset::center(canvas_width, canvas_height);
    ScreenOffset::new(center.x + ndc.0 * center.x, center.y - ndc.1 * center.y)
}

/// [Projection] of one render frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    matrix: Matrix4,
}

impl Projection {
    /// See [perspective]
    pub fn perspective(fov_x_deg: f64, aspect_ratio: f64, near: f64, far: f64) -> Self {
        Self {
            matrix: perspective(fov_x_deg, aspect_ratio, near, far),
        }
    }

    /// Wraps an existing projection [Matrix4]
    pub fn from_matrix(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// See [project]
    pub fn project(&self, vector: &Vector4) -> Vector4 {
        project(&self.matrix, vector)
    }

    /// Canvas position of this vector. When `already_projected` is false,
    /// the vector is a camera-frame vector and is projected first.
    pub fn to_screen_offset(
        &self,
        canvas_width: f64,
        canvas_height: f64,
        vector: &Vector4,
        already_projected: bool,
    ) -> ScreenOffset {
        let clip = if already_projected {
            *vector
        } else {
            self.project(vector)
        };
        ndc_to_screen(canvas_width, canvas_height, perspective_divide(&clip))
    }
}
