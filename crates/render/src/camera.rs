use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};

/// Perspective camera orbiting a target, with damped rotation and dolly.
///
/// Input only accumulates deltas; [`OrbitCamera::update`] applies a
/// `damping` fraction of them once per frame and keeps the rest, so motion
/// eases out after the pointer stops.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, zero looking down -Z from +Z.
    pub theta: f32,
    /// Polar angle from +Y.
    pub phi: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub damping: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    theta_delta: f32,
    phi_delta: f32,
    dolly_delta: f32,
}

impl OrbitCamera {
    const POLAR_EPSILON: f32 = 1e-3;
    /// Radius factor per unit of scroll.
    const ZOOM_SCALE: f32 = 0.95;
    const SETTLE_EPSILON: f32 = 1e-6;

    /// Camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().max(f32::EPSILON);
        let mut cam = Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            ..Self::default()
        };
        cam.radius = cam.radius.clamp(cam.min_radius, cam.max_radius);
        cam
    }

    /// Queue a rotation from a pointer drag of `(dx, dy)` pixels. A drag
    /// across the full viewport height turns the camera once around.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.theta_delta -= TAU * dx / h;
        self.phi_delta -= TAU * dy / h;
    }

    /// Queue a dolly. Positive values move toward the target.
    pub fn dolly(&mut self, scroll: f32) {
        self.dolly_delta += scroll;
    }

    /// Apply one damping step. Returns `true` while the camera still moves.
    pub fn update(&mut self) -> bool {
        let d = self.damping;
        self.theta += self.theta_delta * d;
        self.phi = (self.phi + self.phi_delta * d).clamp(Self::POLAR_EPSILON, PI - Self::POLAR_EPSILON);
        let step = self.dolly_delta * d;
        self.radius = (self.radius * Self::ZOOM_SCALE.powf(step)).clamp(self.min_radius, self.max_radius);

        self.theta_delta *= 1.0 - d;
        self.phi_delta *= 1.0 - d;
        self.dolly_delta -= step;

        let moving = self.theta_delta.abs() > Self::SETTLE_EPSILON
            || self.phi_delta.abs() > Self::SETTLE_EPSILON
            || self.dolly_delta.abs() > Self::SETTLE_EPSILON;
        if !moving {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.dolly_delta = 0.0;
        }
        moving
    }

    pub fn eye(&self) -> Vec3 {
        let s = self.phi.sin();
        self.target + self.radius * Vec3::new(s * self.theta.sin(), self.phi.cos(), s * self.theta.cos())
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for OrbitCamera {
    /// The scene camera: fov 75°, near 0.1, far 100, damping 0.05.
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: 1.0,
            theta: 0.0,
            phi: PI / 2.0,
            fov: 75.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            damping: 0.05,
            min_radius: 0.5,
            max_radius: 50.0,
            theta_delta: 0.0,
            phi_delta: 0.0,
            dolly_delta: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_camera() -> OrbitCamera {
        OrbitCamera::looking_at(Vec3::new(1.0, 1.0, 2.0), Vec3::ZERO)
    }

    #[test]
    fn looking_at_reproduces_eye() {
        let cam = scene_camera();
        assert!((cam.eye() - Vec3::new(1.0, 1.0, 2.0)).length() < 1e-5);
        assert!((cam.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn drag_eases_in_over_frames() {
        let mut cam = scene_camera();
        let start = cam.theta;
        cam.rotate(100.0, 0.0, 800.0);
        let total = -TAU * 100.0 / 800.0;

        assert!(cam.update());
        let first = cam.theta - start;
        assert!((first - total * 0.05).abs() < 1e-6);

        for _ in 0..2000 {
            cam.update();
        }
        assert!((cam.theta - start - total).abs() < 1e-3);
        assert!(!cam.update());
    }

    #[test]
    fn idle_camera_does_not_move() {
        let mut cam = scene_camera();
        let eye = cam.eye();
        assert!(!cam.update());
        assert_eq!(cam.eye(), eye);
    }

    #[test]
    fn polar_angle_and_radius_are_clamped() {
        let mut cam = scene_camera();
        cam.rotate(0.0, 1e6, 100.0);
        cam.dolly(1e4);
        for _ in 0..200 {
            cam.update();
        }
        assert!(cam.phi >= OrbitCamera::POLAR_EPSILON);
        assert!(cam.phi <= PI - OrbitCamera::POLAR_EPSILON);
        assert_eq!(cam.radius, cam.min_radius);

        cam.dolly(-1e5);
        for _ in 0..200 {
            cam.update();
        }
        assert_eq!(cam.radius, cam.max_radius);
    }
}
