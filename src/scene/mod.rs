//! The decorative animated scene behind the overlay. It has no monitoring
//! logic; its only job is to keep the render loop busy in a visible way.

pub mod projection;

use projection::{Camera, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strum::Display;

pub const WORLD_WIDTH: f64 = 800.0;
pub const WORLD_HEIGHT: f64 = 600.0;

const FIXED_CIRCLES: usize = 20;
const MAX_2D_OBJECTS: u64 = 10_000;
const MAX_MIXED_PER_KIND: u64 = 5_000;
const MAX_3D_OBJECTS: u64 = 5_000;
const TRIANGLES_PER_CUBE: u64 = 12;
const VERTICES_PER_CUBE: u64 = 36;

const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RenderMode {
    #[strum(to_string = "2d")]
    Mode2D,
    #[strum(to_string = "3d")]
    Mode3D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Mixed,
}

impl ShapeKind {
    pub fn next(self) -> Self {
        match self {
            ShapeKind::Circle => ShapeKind::Rectangle,
            ShapeKind::Rectangle => ShapeKind::Mixed,
            ShapeKind::Mixed => ShapeKind::Circle,
        }
    }
}

pub type Rgb = (u8, u8, u8);

#[derive(Debug, Clone, Copy)]
pub struct MovingCircle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub speed: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy)]
pub struct MovingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub speed: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy)]
pub struct Cube {
    pub position: Vec3,
    pub size: Vec3,
    pub rotation_deg: f64,
    pub color: Rgb,
}

impl Cube {
    pub fn corners(&self) -> [Vec3; 8] {
        let (hx, hy, hz) = (self.size.x / 2.0, self.size.y / 2.0, self.size.z / 2.0);
        [
            Vec3::new(-hx, -hy, -hz),
            Vec3::new(hx, -hy, -hz),
            Vec3::new(hx, -hy, hz),
            Vec3::new(-hx, -hy, hz),
            Vec3::new(-hx, hy, -hz),
            Vec3::new(hx, hy, -hz),
            Vec3::new(hx, hy, hz),
            Vec3::new(-hx, hy, hz),
        ]
        .map(|corner| corner.rotate_y(self.rotation_deg) + self.position)
    }
}

/// A projected line segment in world (top-left origin) coordinates.
/// Floor grid lines carry no colour of their own.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: Option<Rgb>,
}

pub struct Scene {
    mode: RenderMode,
    shape: ShapeKind,
    scaling: bool,
    base_count: u32,
    power: u32,
    rotation_deg: f64,
    circles: Vec<MovingCircle>,
    rectangles: Vec<MovingRect>,
    cubes: Vec<Cube>,
    camera: Camera,
    rng: StdRng,
}

impl Scene {
    pub fn new(scaling: bool) -> Self {
        Self::with_rng(scaling, StdRng::from_entropy())
    }

    pub fn with_seed(scaling: bool, seed: u64) -> Self {
        Self::with_rng(scaling, StdRng::seed_from_u64(seed))
    }

    fn with_rng(scaling: bool, rng: StdRng) -> Self {
        let mut scene = Self {
            mode: RenderMode::Mode2D,
            shape: ShapeKind::Circle,
            scaling,
            base_count: 100,
            power: 1,
            rotation_deg: 0.0,
            circles: Vec::new(),
            rectangles: Vec::new(),
            cubes: Vec::new(),
            camera: Camera::looking_at(
                Vec3::new(0.0, 10.0, 20.0),
                Vec3::new(0.0, 0.0, 0.0),
                45.0,
                (WORLD_WIDTH, WORLD_HEIGHT),
            ),
            rng,
        };
        scene.rebuild();
        scene
    }

    pub fn update(&mut self, delta_s: f64) {
        self.rotation_deg = (self.rotation_deg + 90.0 * delta_s) % 360.0;

        for circle in &mut self.circles {
            circle.x += circle.speed * delta_s;
            if circle.x > WORLD_WIDTH + circle.radius {
                circle.x = -circle.radius;
            }
        }

        for rect in &mut self.rectangles {
            rect.x += rect.speed * delta_s;
            if rect.x > WORLD_WIDTH + rect.width {
                rect.x = -rect.width;
            }
        }

        for cube in &mut self.cubes {
            cube.rotation_deg = (cube.rotation_deg + 45.0 * delta_s) % 360.0;
        }
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            RenderMode::Mode2D => RenderMode::Mode3D,
            RenderMode::Mode3D => RenderMode::Mode2D,
        };
        self.rebuild();
        tracing::debug!(mode = %self.mode, objects = self.spawned_count(), "render mode switched");
    }

    pub fn cycle_shape(&mut self) {
        self.shape = self.shape.next();
        self.rebuild();
    }

    pub fn adjust_base(&mut self, step: i32) {
        if !self.scaling {
            return;
        }
        self.base_count = (self.base_count as i64 + step as i64).clamp(10, 1000) as u32;
        self.rebuild();
    }

    pub fn adjust_power(&mut self, step: i32) {
        if !self.scaling {
            return;
        }
        self.power = (self.power as i64 + step as i64).clamp(1, 5) as u32;
        self.rebuild();
    }

    /// `base * 10^(power - 1)`, before per-mode caps.
    pub fn object_count(&self) -> u64 {
        if !self.scaling {
            return FIXED_CIRCLES as u64;
        }
        self.base_count as u64 * 10u64.pow(self.power - 1)
    }

    pub fn spawned_count(&self) -> usize {
        self.circles.len() + self.rectangles.len() + self.cubes.len()
    }

    pub fn triangle_count(&self) -> u64 {
        self.cubes.len() as u64 * TRIANGLES_PER_CUBE
    }

    pub fn vertex_count(&self) -> u64 {
        self.cubes.len() as u64 * VERTICES_PER_CUBE
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn shape(&self) -> ShapeKind {
        self.shape
    }

    pub fn base_count(&self) -> u32 {
        self.base_count
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn scaling(&self) -> bool {
        self.scaling
    }

    pub fn circles(&self) -> &[MovingCircle] {
        &self.circles
    }

    pub fn rectangles(&self) -> &[MovingRect] {
        &self.rectangles
    }

    /// Corners of the rotating square drawn at the centre of the 2D scene.
    pub fn spinner(&self) -> [(f64, f64); 4] {
        let (cx, cy, half) = (WORLD_WIDTH / 2.0, WORLD_HEIGHT / 2.0, 50.0);
        [(-half, -half), (half, -half), (half, half), (-half, half)].map(|(dx, dy)| {
            let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
            (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
        })
    }

    /// Floor grid and cube wireframes, projected to the viewport.
    pub fn wireframe(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(42 + self.cubes.len() * CUBE_EDGES.len());
        for i in -10..=10 {
            let offset = i as f64;
            self.push_segment(
                &mut segments,
                Vec3::new(offset, 0.0, -10.0),
                Vec3::new(offset, 0.0, 10.0),
                None,
            );
            self.push_segment(
                &mut segments,
                Vec3::new(-10.0, 0.0, offset),
                Vec3::new(10.0, 0.0, offset),
                None,
            );
        }

        for cube in &self.cubes {
            let corners = cube.corners();
            for (a, b) in CUBE_EDGES {
                self.push_segment(&mut segments, corners[a], corners[b], Some(cube.color));
            }
        }

        segments
    }

    fn push_segment(
        &self,
        segments: &mut Vec<Segment>,
        a: Vec3,
        b: Vec3,
        color: Option<Rgb>,
    ) {
        if let (Some(from), Some(to)) = (self.camera.project(a), self.camera.project(b)) {
            segments.push(Segment { from, to, color });
        }
    }

    fn rebuild(&mut self) {
        self.circles.clear();
        self.rectangles.clear();
        self.cubes.clear();

        if !self.scaling {
            for _ in 0..FIXED_CIRCLES {
                let circle = self.random_circle(300.0..500.0);
                self.circles.push(circle);
            }
            return;
        }

        let count = self.object_count();
        match (self.mode, self.shape) {
            (RenderMode::Mode2D, ShapeKind::Circle) => {
                for _ in 0..count.min(MAX_2D_OBJECTS) {
                    let circle = self.random_circle(100.0..500.0);
                    self.circles.push(circle);
                }
            }
            (RenderMode::Mode2D, ShapeKind::Rectangle) => {
                for _ in 0..count.min(MAX_2D_OBJECTS) {
                    let rect = self.random_rect();
                    self.rectangles.push(rect);
                }
            }
            (RenderMode::Mode2D, ShapeKind::Mixed) => {
                let half = (count / 2).min(MAX_MIXED_PER_KIND);
                for _ in 0..half {
                    let circle = self.random_circle(100.0..500.0);
                    self.circles.push(circle);
                    let rect = self.random_rect();
                    self.rectangles.push(rect);
                }
            }
            (RenderMode::Mode3D, _) => {
                for _ in 0..count.min(MAX_3D_OBJECTS) {
                    let cube = self.random_cube();
                    self.cubes.push(cube);
                }
            }
        }
    }

    fn random_color(&mut self) -> Rgb {
        (self.rng.gen(), self.rng.gen(), self.rng.gen())
    }

    fn random_circle(&mut self, y_range: std::ops::Range<f64>) -> MovingCircle {
        MovingCircle {
            x: self.rng.gen_range(0.0..WORLD_WIDTH),
            y: self.rng.gen_range(y_range),
            radius: self.rng.gen_range(5.0..25.0),
            speed: self.rng.gen_range(50.0..250.0),
            color: self.random_color(),
        }
    }

    fn random_rect(&mut self) -> MovingRect {
        MovingRect {
            x: self.rng.gen_range(0.0..WORLD_WIDTH),
            y: self.rng.gen_range(100.0..500.0),
            width: self.rng.gen_range(10.0..50.0),
            height: self.rng.gen_range(10.0..50.0),
            speed: self.rng.gen_range(30.0..180.0),
            color: self.random_color(),
        }
    }

    fn random_cube(&mut self) -> Cube {
        Cube {
            position: Vec3::new(
                self.rng.gen_range(-10.0..10.0),
                self.rng.gen_range(-5.0..5.0),
                self.rng.gen_range(-10.0..10.0),
            ),
            size: Vec3::new(
                self.rng.gen_range(0.5..2.5),
                self.rng.gen_range(0.5..2.5),
                self.rng.gen_range(0.5..2.5),
            ),
            rotation_deg: self.rng.gen_range(0.0..360.0),
            color: self.random_color(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_count_formula() {
        let mut scene = Scene::with_seed(true, 7);
        assert_eq!(scene.object_count(), 100);

        scene.adjust_power(2);
        assert_eq!(scene.object_count(), 10_000);
        assert_eq!(scene.spawned_count(), 10_000);

        scene.adjust_power(10);
        assert_eq!(scene.power(), 5);
        assert_eq!(scene.object_count(), 1_000_000);
        assert_eq!(scene.spawned_count(), 10_000);
    }

    #[test]
    fn test_base_count_is_clamped() {
        let mut scene = Scene::with_seed(true, 7);
        scene.adjust_base(-1000);
        assert_eq!(scene.base_count(), 10);
        scene.adjust_base(5000);
        assert_eq!(scene.base_count(), 1000);
    }

    #[test]
    fn test_mixed_shapes_split_evenly() {
        let mut scene = Scene::with_seed(true, 7);
        scene.cycle_shape();
        assert_eq!(scene.shape(), ShapeKind::Rectangle);
        scene.cycle_shape();
        assert_eq!(scene.shape(), ShapeKind::Mixed);

        assert_eq!(scene.circles().len(), 50);
        assert_eq!(scene.rectangles().len(), 50);

        scene.cycle_shape();
        assert_eq!(scene.shape(), ShapeKind::Circle);
    }

    #[test]
    fn test_3d_mode_counts_geometry() {
        let mut scene = Scene::with_seed(true, 7);
        scene.toggle_mode();

        assert_eq!(scene.mode(), RenderMode::Mode3D);
        assert_eq!(scene.triangle_count(), 1_200);
        assert_eq!(scene.vertex_count(), 3_600);
        let segments = scene.wireframe();
        assert!(segments.iter().any(|s| s.color.is_none()));
        assert!(segments.iter().any(|s| s.color.is_some()));
        assert_eq!(scene.mode().to_string(), "3d");
    }

    #[test]
    fn test_fixed_scene_ignores_scaling_keys() {
        let mut scene = Scene::with_seed(false, 7);
        assert_eq!(scene.spawned_count(), FIXED_CIRCLES);

        scene.adjust_power(1);
        scene.adjust_base(100);
        assert_eq!(scene.spawned_count(), FIXED_CIRCLES);
        assert!(scene.circles().iter().all(|c| (300.0..500.0).contains(&c.y)));
    }

    #[test]
    fn test_circles_wrap_around() {
        let mut scene = Scene::with_seed(false, 7);
        for _ in 0..600 {
            scene.update(1.0 / 60.0);
        }
        assert!(scene
            .circles()
            .iter()
            .all(|c| c.x >= -c.radius && c.x <= WORLD_WIDTH + c.radius));
    }
}
