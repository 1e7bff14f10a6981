// RTS-style orbit camera
//
// Camera model:
//   - A look-at "center" point the camera orbits around
//   - Yaw (horizontal rotation) and pitch (elevation), stored in degrees
//   - Distance from center to eye, clamped to [min_distance, max_distance]
//   - WASD/arrows move the center on XZ relative to camera facing direction,
//     faster when zoomed out (scaled by distance / reference_distance)
//   - Q/E rotate yaw, mouse wheel zooms
//
// The eye position is never stored: it is derived from (center, yaw, pitch,
// distance) on every call so it cannot drift out of sync.

use glam::{Mat4, Vec3};

use super::error::CameraError;
use super::input::{Action, ActionSource};

/// Tunables for `OrbitCamera`. Angles in degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Vertical field of view
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,

    /// Pan speed in world units per second at `reference_distance`
    pub base_speed: f32,
    /// Pan speed multiplier while Sprint is held
    pub sprint_multiplier: f32,
    pub reference_distance: f32,

    /// Degrees per second
    pub rotation_speed: f32,

    /// Distance change per scroll line
    pub zoom_sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            yaw: 45.0,
            pitch: 55.0,
            distance: 30.0,
            min_distance: 5.0,
            max_distance: 150.0,
            fov_y: 60.0,
            near: 0.1,
            far: 500.0,
            base_speed: 8.0,
            sprint_multiplier: 2.0,
            reference_distance: 30.0,
            rotation_speed: 60.0,
            zoom_sensitivity: 2.0,
        }
    }
}

impl CameraSettings {
    fn validate(&self) -> Result<(), CameraError> {
        let named = [
            ("yaw", self.yaw),
            ("pitch", self.pitch),
            ("distance", self.distance),
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
            ("fov_y", self.fov_y),
            ("near", self.near),
            ("far", self.far),
            ("base_speed", self.base_speed),
            ("sprint_multiplier", self.sprint_multiplier),
            ("reference_distance", self.reference_distance),
            ("rotation_speed", self.rotation_speed),
            ("zoom_sensitivity", self.zoom_sensitivity),
        ];
        if let Some(&(name, value)) = named.iter().find(|(_, v)| !v.is_finite()) {
            return Err(CameraError::NonFinite { name, value });
        }
        if self.fov_y <= 0.0 || self.fov_y >= 180.0 {
            return Err(CameraError::FieldOfView(self.fov_y));
        }
        if self.near <= 0.0 || self.far <= self.near {
            return Err(CameraError::ClipPlanes { near: self.near, far: self.far });
        }
        if self.min_distance <= 0.0 || self.max_distance < self.min_distance {
            return Err(CameraError::DistanceLimits {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if self.reference_distance <= 0.0 {
            return Err(CameraError::NonFinite {
                name: "reference_distance",
                value: self.reference_distance,
            });
        }
        validate_pitch(self.pitch)
    }
}

fn validate_pitch(pitch: f32) -> Result<(), CameraError> {
    // At ±90° the look direction is parallel to +Y and look_at degenerates.
    if !pitch.is_finite() || pitch.abs() >= 90.0 {
        return Err(CameraError::Pitch(pitch));
    }
    Ok(())
}

fn is_invertible(m: &Mat4) -> bool {
    let det = m.determinant();
    det.is_finite() && det != 0.0
}

/// Wrap degrees into [0, 360).
fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    /// Private: moved only through update()/focus(). Use center() to read.
    center: Vec3,

    /// Degrees, always in [0, 360).
    yaw: f32,

    /// Degrees, always strictly inside (-90, 90).
    pitch: f32,

    /// Always clamped to [min_distance, max_distance].
    distance: f32,

    settings: CameraSettings,
}

impl OrbitCamera {
    /// Build a camera looking at `center`.
    ///
    /// Misconfiguration (zero fov, inverted clip planes, vertical pitch...)
    /// is rejected here rather than surfacing as a broken ray every frame.
    pub fn new(settings: CameraSettings, center: Vec3) -> Result<Self, CameraError> {
        settings.validate()?;
        if !center.is_finite() {
            return Err(CameraError::NonFinite { name: "center", value: f32::NAN });
        }

        let camera = Self {
            center,
            yaw: wrap_degrees(settings.yaw),
            pitch: settings.pitch,
            distance: settings.distance.clamp(settings.min_distance, settings.max_distance),
            settings,
        };

        if !is_invertible(&camera.view_matrix()) {
            return Err(CameraError::SingularMatrix("view"));
        }
        if !is_invertible(&camera.projection_matrix(1.0)) {
            return Err(CameraError::SingularMatrix("projection"));
        }
        Ok(camera)
    }

    /// Advance the camera by one tick. Call once per frame before rendering.
    ///
    /// `dt` is in seconds; negative or non-finite values are treated as 0.
    pub fn update(&mut self, input: &impl ActionSource, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        // Planar movement directions come from yaw only.
        let forward = self.planar_forward();
        let right = self.planar_right();

        let mut move_dir = Vec3::ZERO;

        if input.is_pressed(Action::MoveForward) { move_dir += forward; }
        if input.is_pressed(Action::MoveBack)    { move_dir -= forward; }
        if input.is_pressed(Action::MoveRight)   { move_dir += right; }
        if input.is_pressed(Action::MoveLeft)    { move_dir -= right; }

        if move_dir != Vec3::ZERO {
            let mut speed = self.settings.base_speed;
            if input.is_pressed(Action::Sprint) {
                speed *= self.settings.sprint_multiplier;
            }
            let step = speed * dt * (self.distance / self.settings.reference_distance);
            self.center += move_dir.normalize() * step;
        }

        let turn = self.settings.rotation_speed * dt;
        if input.is_pressed(Action::RotateLeft)  { self.yaw -= turn; }
        if input.is_pressed(Action::RotateRight) { self.yaw += turn; }
        self.yaw = wrap_degrees(self.yaw);

        // Zoom: scroll up (positive delta) zooms in (decreases distance)
        let scroll = input.scroll_delta();
        if scroll.is_finite() {
            self.distance -= scroll * self.settings.zoom_sensitivity;
        }
        self.distance = self
            .distance
            .clamp(self.settings.min_distance, self.settings.max_distance);
    }

    /// Unit vector on XZ pointing from the eye toward the center.
    pub fn planar_forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(-yaw.cos(), 0.0, -yaw.sin())
    }

    /// Unit vector on XZ pointing to screen-right.
    pub fn planar_right(&self) -> Vec3 {
        self.planar_forward().cross(Vec3::Y)
    }

    /// World-space position of the camera eye.
    pub fn eye_position(&self) -> Vec3 {
        self.center + self.eye_offset()
    }

    /// View matrix: looks from the camera eye toward the center.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.center, Vec3::Y)
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(
            self.settings.fov_y.to_radians(),
            aspect,
            self.settings.near,
            self.settings.far,
        )
    }

    /// Combined view-projection matrix ready to upload to the GPU.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    pub fn center(&self) -> Vec3 { self.center }
    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn distance(&self) -> f32 { self.distance }

    /// No input path changes pitch today; this keeps it adjustable without
    /// giving up the |pitch| < 90 invariant.
    pub fn set_pitch(&mut self, pitch: f32) -> Result<(), CameraError> {
        validate_pitch(pitch)?;
        self.pitch = pitch;
        Ok(())
    }

    /// Jump the orbit center to `point`. Non-finite points are ignored.
    pub fn focus(&mut self, point: Vec3) {
        if point.is_finite() {
            self.center = point;
        }
    }

    /// Zoom fraction in [0, 1]: 1 = fully zoomed in (min_distance), 0 = fully zoomed out.
    pub fn zoom_fraction(&self) -> f32 {
        let range = self.settings.max_distance - self.settings.min_distance;
        if range > 0.0 {
            1.0 - (self.distance - self.settings.min_distance) / range
        } else {
            0.0
        }
    }

    // Spherical-to-Cartesian offset from center to eye.
    fn eye_offset(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            pitch.cos() * yaw.cos(),
            pitch.sin(),
            pitch.cos() * yaw.sin(),
        ) * self.distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct Scripted {
        held: HashSet<Action>,
        scroll: f32,
    }

    impl Scripted {
        fn holding(actions: &[Action]) -> Self {
            Self { held: actions.iter().copied().collect(), scroll: 0.0 }
        }

        fn scrolling(scroll: f32) -> Self {
            Self { held: HashSet::new(), scroll }
        }
    }

    impl ActionSource for Scripted {
        fn is_pressed(&self, action: Action) -> bool {
            self.held.contains(&action)
        }

        fn scroll_delta(&self) -> f32 {
            self.scroll
        }
    }

    fn camera_at_origin(yaw: f32) -> OrbitCamera {
        let settings = CameraSettings { yaw, ..CameraSettings::default() };
        OrbitCamera::new(settings, Vec3::ZERO).unwrap()
    }

    #[test]
    fn yaw_stays_wrapped_under_long_rotation() {
        let mut cam = camera_at_origin(45.0);
        let left = Scripted::holding(&[Action::RotateLeft]);
        let right = Scripted::holding(&[Action::RotateRight]);

        for i in 0..2_000 {
            let dt = 0.001 + (i % 37) as f32 * 0.013;
            let input = if i % 3 == 0 { &right } else { &left };
            cam.update(input, dt);
            assert!((0.0..360.0).contains(&cam.yaw()), "yaw {} at step {i}", cam.yaw());
        }
        for _ in 0..500 {
            cam.update(&right, 0.37);
            assert!((0.0..360.0).contains(&cam.yaw()));
        }
    }

    #[test]
    fn wrap_handles_tiny_negative() {
        assert_eq!(wrap_degrees(-1e-8), 0.0);
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
    }

    #[test]
    fn rotation_rate_is_degrees_per_second() {
        let mut cam = camera_at_origin(10.0);
        cam.update(&Scripted::holding(&[Action::RotateLeft]), 0.5);
        assert!((cam.yaw() - 340.0).abs() < 1e-3, "yaw {}", cam.yaw());
    }

    #[test]
    fn distance_stays_clamped_under_any_zoom() {
        let mut cam = camera_at_origin(0.0);
        for scroll in [1.0, 50.0, -3.0, -400.0, 0.5, 1e9, -1e9, f32::NAN, f32::INFINITY] {
            cam.update(&Scripted::scrolling(scroll), 0.016);
            assert!(
                (5.0..=150.0).contains(&cam.distance()),
                "distance {} after scroll {scroll}",
                cam.distance()
            );
        }
    }

    #[test]
    fn scroll_up_zooms_in() {
        let mut cam = camera_at_origin(0.0);
        cam.update(&Scripted::scrolling(2.0), 0.0);
        assert_eq!(cam.distance(), 26.0);
    }

    #[test]
    fn eye_follows_orbit_formula() {
        let cam = camera_at_origin(0.0);
        let p = 55.0_f32.to_radians();
        let expected = Vec3::new(p.cos(), p.sin(), 0.0) * 30.0;
        assert!(cam.eye_position().abs_diff_eq(expected, 1e-4));

        let cam = camera_at_origin(90.0);
        let expected = Vec3::new(0.0, p.sin(), p.cos()) * 30.0;
        assert!(cam.eye_position().abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn eye_is_recomputed_after_movement() {
        let mut cam = camera_at_origin(0.0);
        let before = cam.eye_position() - cam.center();
        cam.update(&Scripted::holding(&[Action::MoveForward, Action::RotateRight]), 0.25);
        let after = cam.eye_position() - cam.center();
        assert!((after.length() - cam.distance()).abs() < 1e-3);
        assert!(!before.abs_diff_eq(after, 1e-3), "yaw changed so the offset must too");
    }

    #[test]
    fn forward_moves_toward_where_the_camera_looks() {
        let mut cam = camera_at_origin(0.0);
        // yaw 0: eye sits on +X, looking toward -X
        cam.update(&Scripted::holding(&[Action::MoveForward]), 1.0);
        assert!(cam.center().abs_diff_eq(Vec3::new(-8.0, 0.0, 0.0), 1e-4), "{}", cam.center());
    }

    #[test]
    fn right_is_screen_right() {
        let cam = camera_at_origin(30.0);
        let view = cam.view_matrix();
        let right_in_view = view.transform_vector3(cam.planar_right());
        assert!(right_in_view.x > 0.99, "{right_in_view}");
    }

    #[test]
    fn movement_scales_with_distance_and_sprint() {
        let mut near = camera_at_origin(0.0);
        near.update(&Scripted::scrolling(-30.0), 0.0); // 30 + 60 = 90
        assert_eq!(near.distance(), 90.0);
        near.update(&Scripted::holding(&[Action::MoveLeft]), 1.0);
        assert!((near.center().length() - 24.0).abs() < 1e-3);

        let mut sprint = camera_at_origin(0.0);
        sprint.update(&Scripted::holding(&[Action::MoveBack, Action::Sprint]), 1.0);
        assert!((sprint.center().length() - 16.0).abs() < 1e-3);
    }

    #[test]
    fn pitch_does_not_tilt_the_movement_plane() {
        let mut cam = camera_at_origin(120.0);
        cam.update(&Scripted::holding(&[Action::MoveForward, Action::MoveRight]), 2.0);
        assert_eq!(cam.center().y, 0.0);
    }

    #[test]
    fn zero_and_negative_dt_do_not_move() {
        let mut cam = camera_at_origin(0.0);
        let all = Scripted::holding(&Action::ALL);
        cam.update(&all, 0.0);
        cam.update(&all, -5.0);
        cam.update(&all, f32::NAN);
        assert_eq!(cam.center(), Vec3::ZERO);
        assert_eq!(cam.yaw(), 0.0);
    }

    #[test]
    fn opposing_inputs_cancel() {
        let mut cam = camera_at_origin(0.0);
        cam.update(&Scripted::holding(&[Action::MoveForward, Action::MoveBack]), 1.0);
        assert_eq!(cam.center(), Vec3::ZERO);
    }

    #[test]
    fn rejects_degenerate_settings() {
        let bad_fov = CameraSettings { fov_y: 0.0, ..CameraSettings::default() };
        assert_eq!(
            OrbitCamera::new(bad_fov, Vec3::ZERO).err(),
            Some(CameraError::FieldOfView(0.0))
        );

        let bad_clip = CameraSettings { near: 10.0, far: 1.0, ..CameraSettings::default() };
        assert!(matches!(
            OrbitCamera::new(bad_clip, Vec3::ZERO),
            Err(CameraError::ClipPlanes { .. })
        ));

        let vertical = CameraSettings { pitch: 90.0, ..CameraSettings::default() };
        assert_eq!(
            OrbitCamera::new(vertical, Vec3::ZERO).err(),
            Some(CameraError::Pitch(90.0))
        );

        let nan = CameraSettings { base_speed: f32::NAN, ..CameraSettings::default() };
        assert!(matches!(
            OrbitCamera::new(nan, Vec3::ZERO),
            Err(CameraError::NonFinite { name: "base_speed", .. })
        ));
    }

    #[test]
    fn initial_distance_is_clamped() {
        let settings = CameraSettings { distance: 1000.0, ..CameraSettings::default() };
        let cam = OrbitCamera::new(settings, Vec3::ZERO).unwrap();
        assert_eq!(cam.distance(), 150.0);
    }

    #[test]
    fn set_pitch_keeps_invariant() {
        let mut cam = camera_at_origin(0.0);
        assert!(cam.set_pitch(30.0).is_ok());
        assert_eq!(cam.pitch(), 30.0);
        assert!(cam.set_pitch(-95.0).is_err());
        assert_eq!(cam.pitch(), 30.0);
    }

    #[test]
    fn zoom_fraction_spans_limits() {
        let mut cam = camera_at_origin(0.0);
        cam.update(&Scripted::scrolling(1000.0), 0.0);
        assert_eq!(cam.zoom_fraction(), 1.0);
        cam.update(&Scripted::scrolling(-1000.0), 0.0);
        assert_eq!(cam.zoom_fraction(), 0.0);
    }
}
