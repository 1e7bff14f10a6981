// Cursor picking rays.
//
// screen pixel → NDC → clip (far direction) → eye → world direction.
// The ray origin is the camera eye, recovered from the inverse view matrix.

use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};

/// Below this |direction.y| a ray counts as parallel to the ground.
pub const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length, or zero for `Ray::DEGENERATE`.
    pub direction: Vec3,
}

impl Ray {
    /// Returned when no meaningful ray exists. Never hits anything.
    pub const DEGENERATE: Ray = Ray { origin: Vec3::ZERO, direction: Vec3::ZERO };

    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction == Vec3::ZERO
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

fn invert(m: &Mat4) -> Option<Mat4> {
    let det = m.determinant();
    if !det.is_finite() || det == 0.0 {
        return None;
    }
    let inv = m.inverse();
    inv.is_finite().then_some(inv)
}

/// Build the world-space ray under a cursor.
///
/// `cursor` is in framebuffer pixels, origin top-left, Y down.
/// Returns `Ray::DEGENERATE` instead of panicking when a matrix cannot be
/// inverted, the viewport is empty, or the cursor is not a finite position.
pub fn screen_to_world_ray(cursor: Vec2, viewport: UVec2, view: Mat4, proj: Mat4) -> Ray {
    if viewport.x == 0 || viewport.y == 0 || !cursor.is_finite() {
        return Ray::DEGENERATE;
    }
    let (Some(inv_proj), Some(inv_view)) = (invert(&proj), invert(&view)) else {
        return Ray::DEGENERATE;
    };

    // Screen Y grows downward, NDC Y grows upward.
    let ndc = Vec2::new(
        2.0 * cursor.x / viewport.x as f32 - 1.0,
        1.0 - 2.0 * cursor.y / viewport.y as f32,
    );

    let ray_clip = Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
    let ray_eye = inv_proj * ray_clip;
    // Keep only the direction: forward in eye space, w = 0.
    let ray_eye = Vec4::new(ray_eye.x, ray_eye.y, -1.0, 0.0);
    let direction = (inv_view * ray_eye).truncate().normalize_or_zero();

    let origin = inv_view.transform_point3(Vec3::ZERO);
    if direction == Vec3::ZERO || !origin.is_finite() {
        return Ray::DEGENERATE;
    }
    Ray { origin, direction }
}

/// Intersect a ray with the ground plane Y = 0.
///
/// `None` when the ray is parallel to the plane or the plane lies behind the
/// origin. The parallel test runs before the division.
pub fn intersect_ground_plane(ray: Ray) -> Option<Vec3> {
    if ray.direction.y.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t <= 0.0 {
        return None;
    }
    Some(ray.at(t))
}

/// Project a world point to framebuffer pixels (origin top-left, Y down).
///
/// `None` when the point is behind the camera or the viewport is empty.
pub fn world_to_screen(point: Vec3, view_proj: Mat4, viewport: UVec2) -> Option<Vec2> {
    if viewport.x == 0 || viewport.y == 0 {
        return None;
    }
    let clip = view_proj * point.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let screen = Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x as f32,
        (1.0 - ndc.y) * 0.5 * viewport.y as f32,
    );
    screen.is_finite().then_some(screen)
}
