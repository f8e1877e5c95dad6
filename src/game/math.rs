use bevy::prelude::*;

const PARALLEL_EPSILON: f32 = 0.0001;

/// Intersect a ray with the ground plane (y = 0).
///
/// Returns `None` when the ray runs parallel to the ground or points away from it.
pub fn ray_ground_intersection(ray: Ray3d) -> Option<Vec3> {
    let normal = Vec3::Y;
    let denom = ray.direction.dot(normal);

    if denom.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = -ray.origin.y / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray.origin + ray.direction * t)
}

/// Distance along `ray` to the point closest to `center`, if the ray passes
/// within `radius` of it. Points behind the ray origin never match.
pub fn ray_sphere_projection(ray: Ray3d, center: Vec3, radius: f32) -> Option<f32> {
    let vector_to_center = center - ray.origin;
    let projection = vector_to_center.dot(ray.direction.into());
    if projection < 0.0 {
        return None;
    }

    let closest_point = ray.origin + ray.direction * projection;
    if closest_point.distance_squared(center) < radius * radius {
        Some(projection)
    } else {
        None
    }
}

/// Spherical interpolation between two vectors.
///
/// Direction rotates along the great arc while the magnitude is interpolated
/// linearly. `t` is clamped to `[0, 1]`.
pub fn slerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    let t = t.clamp(0.0, 1.0);
    let from_len = from.length();
    let to_len = to.length();

    if from_len <= f32::EPSILON || to_len <= f32::EPSILON {
        return from.lerp(to, t);
    }

    let from_dir = from / from_len;
    let to_dir = to / to_len;
    let dot = from_dir.dot(to_dir).clamp(-1.0, 1.0);
    let length = from_len + (to_len - from_len) * t;

    // Nearly parallel: the arc is indistinguishable from the chord.
    if dot > 0.9995 {
        return from_dir.lerp(to_dir, t).normalize_or_zero() * length;
    }

    let relative = (to_dir - from_dir * dot).normalize_or_zero();
    if relative == Vec3::ZERO {
        // Opposite directions have no unique arc.
        return from.lerp(to, t);
    }

    let theta = dot.acos() * t;
    (from_dir * theta.cos() + relative * theta.sin()) * length
}

/// Screen-space rectangle spanned by two corners, in either drag direction.
pub fn rect_from_corners(a: Vec2, b: Vec2) -> Rect {
    Rect::from_corners(a, b)
}
