//! Free-flying perspective camera driven by yaw and pitch
//!
//! The camera keeps an orthonormal `forward`/`right`/`up` basis derived from
//! its Euler angles and the fixed world up axis, and caches its view and
//! projection matrices. Every mutator recomputes the matrices it affects
//! right away so input applied between frames is visible immediately;
//! [`Camera::update`] is the per-frame refresh that rebuilds everything
//! from the angles.
//!
//! Nothing here can fail. Degenerate inputs (zero height viewports,
//! zero-length vectors, collapsed clip planes, non-finite angles) are
//! clamped or ignored instead.

use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};

use super::camera_utils::{normalize_or, wrap_degrees};

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_FOV: f32 = 45.0;

pub const MIN_PITCH: f32 = -89.0;
pub const MAX_PITCH: f32 = 89.0;
pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 90.0;

/// Smallest aspect ratio the projection will be built with.
pub const MIN_ASPECT: f32 = 1e-4;
/// Closest the near plane may sit to the eye.
pub const MIN_NEAR: f32 = 1e-4;
/// Smallest gap kept between the near and far planes.
pub const MIN_DEPTH_RANGE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    position: Vector3<f32>,
    forward: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,

    /// Degrees. Wrapped into `[0, 360)` by rotation.
    yaw: f32,
    /// Degrees. Clamped to `[MIN_PITCH, MAX_PITCH]`.
    pitch: f32,

    /// Vertical field of view in degrees.
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,

    view: Matrix4<f32>,
    projection: Matrix4<f32>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0, 1.0, 0.1, 100.0)
    }
}

impl Camera {
    /// Creates a camera at the origin looking down -Z.
    pub fn new(viewport_width: f32, viewport_height: f32, near: f32, far: f32) -> Self {
        let (near, far) = sanitize_clip_planes(near, far);
        let mut camera = Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            forward: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            world_up: Vector3::unit_y(),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            fov_y: DEFAULT_FOV,
            aspect: aspect_ratio(viewport_width, viewport_height),
            near,
            far,
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        };
        camera.update_view_matrix();
        camera.update_projection_matrix();
        camera
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.update_view_matrix();
    }

    /// Offsets the position in world space.
    pub fn translate(&mut self, translation: Vector3<f32>) {
        self.position += translation;
        self.update_view_matrix();
    }

    /// Replaces the aspect ratio. Only the projection changes.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection_matrix();
    }

    /// Sets the vertical field of view, clamped to `[MIN_FOV, MAX_FOV]`.
    pub fn set_fov(&mut self, fov: f32) {
        if fov.is_nan() {
            return;
        }
        self.fov_y = fov.clamp(MIN_FOV, MAX_FOV);
        self.update_projection_matrix();
    }

    /// Narrows (negative) or widens (positive) the field of view.
    pub fn zoom(&mut self, delta_fov: f32) {
        self.set_fov(self.fov_y + delta_fov);
    }

    /// Sets absolute angles with the same wrap and clamp rules as
    /// [`rotate`](Self::rotate). A non-finite angle leaves that angle as it
    /// was.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        if yaw.is_finite() {
            self.yaw = wrap_degrees(yaw);
        }
        if pitch.is_finite() {
            // Clamp, never wrap: a wrapped pitch flips the camera upside down.
            self.pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);
        }
        self.update_camera_vectors();
        self.update_view_matrix();
    }

    /// Adds to yaw and pitch, in degrees.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_orientation(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    /// Rotates by `rotation.x` yaw and `rotation.y` pitch.
    ///
    /// Roll (`rotation.z`) is not supported and is dropped.
    pub fn rotate_euler(&mut self, rotation: Vector3<f32>) {
        if rotation.z != 0.0 {
            log::trace!("Ignoring camera roll of {} degrees", rotation.z);
        }
        self.rotate(rotation.x, rotation.y);
    }

    /// Moves along the current forward vector.
    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward * distance;
        self.update_view_matrix();
    }

    /// Moves along the current right vector.
    pub fn move_right(&mut self, distance: f32) {
        self.position += self.right * distance;
        self.update_view_matrix();
    }

    /// Moves along the current up vector.
    pub fn move_up(&mut self, distance: f32) {
        self.position += self.up * distance;
        self.update_view_matrix();
    }

    /// Rebuilds basis, view and projection from the stored state.
    pub fn update(&mut self, _delta_time: f32) {
        self.update_camera_vectors();
        self.update_view_matrix();
        self.update_projection_matrix();
    }

    fn update_camera_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        let forward = Vector3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos);
        self.forward = normalize_or(forward, self.forward);
        self.right = normalize_or(self.forward.cross(self.world_up), self.right);
        self.up = normalize_or(self.right.cross(self.forward), self.up);
    }

    fn update_view_matrix(&mut self) {
        let eye = Point3::from_vec(self.position);
        let target = Point3::from_vec(self.position + self.forward);
        self.view = Matrix4::look_at_rh(eye, target, self.up);
    }

    fn update_projection_matrix(&mut self) {
        self.projection = perspective(Deg(self.fov_y), self.aspect, self.near, self.far);
    }
}

/// `width / height`, guarded against zero or non-finite sizes.
pub fn aspect_ratio(width: f32, height: f32) -> f32 {
    if height <= 0.0 {
        return MIN_ASPECT;
    }
    sanitize_aspect(width / height)
}

/// Keeps `near` positive and `far` at least [`MIN_DEPTH_RANGE`] beyond it.
fn sanitize_clip_planes(near: f32, far: f32) -> (f32, f32) {
    let near = if near.is_finite() { near.max(MIN_NEAR) } else { MIN_NEAR };
    let min_far = near + MIN_DEPTH_RANGE;
    let far = if far.is_finite() { far.max(min_far) } else { min_far };
    (near, far)
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() {
        aspect.max(MIN_ASPECT)
    } else {
        MIN_ASPECT
    }
}
