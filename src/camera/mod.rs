use glam::{Mat4, Vec3};

use crate::config::CameraSettings;

/// Orthographic camera whose horizontal bounds follow the viewport aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct OrthoCamera {
    settings: CameraSettings,
    aspect: f32,
}

impl OrthoCamera {
    pub fn new(settings: CameraSettings, width: f64, height: f64) -> Self {
        let mut camera = Self {
            settings,
            aspect: 1.0,
        };
        camera.resize(width, height);
        camera
    }

    /// Ignores degenerate sizes (a minimised window reports zero height).
    pub fn resize(&mut self, width: f64, height: f64) {
        if width > 0.0 && height > 0.0 {
            self.aspect = (width / height) as f32;
        }
    }

    #[cfg(test)]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn left(&self) -> f32 {
        -self.settings.half_width * self.aspect
    }

    pub fn right(&self) -> f32 {
        self.settings.half_width * self.aspect
    }

    pub fn top(&self) -> f32 {
        self.settings.top
    }

    pub fn bottom(&self) -> f32 {
        self.settings.bottom
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(
            self.left(),
            self.right(),
            self.bottom(),
            self.top(),
            self.settings.near,
            self.settings.far,
        )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.settings.eye, self.settings.target, Vec3::Y)
    }
}

/// Canvas size in pixels for a window of `inner_width` x `inner_height`.
pub fn canvas_size(inner_width: f64, inner_height: f64, fraction: f64) -> (u32, u32) {
    let scale = |v: f64| (v.max(0.0) * fraction).floor() as u32;
    (scale(inner_width), scale(inner_height))
}
