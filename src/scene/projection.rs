use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn normalized(self) -> Vec3 {
        let len = self.dot(self).sqrt();
        if len == 0.0 {
            return self;
        }
        Vec3::new(self.x / len, self.y / len, self.z / len)
    }

    /// Rotation about the vertical axis.
    pub fn rotate_y(self, degrees: f64) -> Vec3 {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Vec3::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Perspective camera projecting onto a 2D viewport whose origin is the
/// top-left corner.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    position: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    focal: f64,
    viewport: (f64, f64),
}

impl Camera {
    pub fn looking_at(position: Vec3, target: Vec3, fovy_deg: f64, viewport: (f64, f64)) -> Self {
        let forward = (target - position).normalized();
        let right = forward.cross(Vec3::new(0.0, 1.0, 0.0)).normalized();
        let up = right.cross(forward);
        let focal = 1.0 / (fovy_deg.to_radians() / 2.0).tan();

        Self {
            position,
            right,
            up,
            forward,
            focal,
            viewport,
        }
    }

    /// `None` for points at or behind the near plane.
    pub fn project(&self, point: Vec3) -> Option<(f64, f64)> {
        let relative = point - self.position;
        let depth = relative.dot(self.forward);
        if depth <= 0.1 {
            return None;
        }

        let half_height = self.viewport.1 / 2.0;
        let scale = self.focal / depth * half_height;
        Some((
            self.viewport.0 / 2.0 + relative.dot(self.right) * scale,
            half_height - relative.dot(self.up) * scale,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::looking_at(
            Vec3::new(0.0, 10.0, 20.0),
            Vec3::new(0.0, 0.0, 0.0),
            45.0,
            (800.0, 600.0),
        )
    }

    #[test]
    fn test_target_projects_to_center() {
        let (x, y) = camera().project(Vec3::new(0.0, 0.0, 0.0)).unwrap();
        assert!((x - 400.0).abs() < 1e-9);
        assert!((y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_points_behind_camera_are_culled() {
        assert!(camera().project(Vec3::new(0.0, 10.0, 30.0)).is_none());
    }

    #[test]
    fn test_right_of_target_is_right_on_screen() {
        let (x, _) = camera().project(Vec3::new(2.0, 0.0, 0.0)).unwrap();
        assert!(x > 400.0);
        let (_, y) = camera().project(Vec3::new(0.0, 2.0, 0.0)).unwrap();
        assert!(y < 300.0);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let rotated = Vec3::new(1.0, 0.0, 0.0).rotate_y(90.0);
        assert!(rotated.x.abs() < 1e-9);
        assert!((rotated.z + 1.0).abs() < 1e-9);
    }
}
