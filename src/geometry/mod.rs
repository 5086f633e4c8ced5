/**
 * Card geometry: a rounded-rectangle profile described as path commands,
 * flattened into an outline and extruded (optionally bevelled) into a
 * triangle list of interleaved positions and normals.
 */
use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};

use crate::config::{CardDimensions, ExtrudeSettings};

/// position (3) + normal (3)
pub const FLOATS_PER_VERTEX: usize = 6;

const EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticTo { control: Vec2, to: Vec2 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    commands: Vec<PathCommand>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Vec2::new(x, y)));
        self
    }

    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Vec2::new(x, y)));
        self
    }

    pub fn quadratic_curve_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadraticTo {
            control: Vec2::new(cx, cy),
            to: Vec2::new(x, y),
        });
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Flattens the path into a closed outline without repeated points.
    pub fn outline(&self, curve_segments: u32) -> Vec<Vec2> {
        let segments = curve_segments.max(1);
        let mut points: Vec<Vec2> = Vec::new();
        let mut cursor = Vec2::ZERO;
        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => {
                    push_distinct(&mut points, p);
                    cursor = p;
                }
                PathCommand::QuadraticTo { control, to } => {
                    for s in 1..=segments {
                        let t = s as f32 / segments as f32;
                        let u = 1.0 - t;
                        let p = cursor * (u * u) + control * (2.0 * u * t) + to * (t * t);
                        push_distinct(&mut points, p);
                    }
                    cursor = to;
                }
            }
        }
        if points.len() > 1 && points[0].distance(points[points.len() - 1]) < EPSILON {
            points.pop();
        }
        points
    }
}

fn push_distinct(points: &mut Vec<Vec2>, p: Vec2) {
    match points.last() {
        Some(last) if last.distance(p) < EPSILON => {}
        _ => points.push(p),
    }
}

/// Card profile with the spine on the right (x = width) and the two left
/// corners rounded.
pub fn rounded_card(dimensions: &CardDimensions) -> Shape {
    let CardDimensions {
        width,
        height,
        radius,
    } = *dimensions;
    let half = height / 2.0;
    Shape::new()
        .move_to(0.0, -half + radius)
        .quadratic_curve_to(0.0, -half, radius, -half)
        .line_to(width, -half)
        .line_to(width, half)
        .line_to(radius, half)
        .quadratic_curve_to(0.0, half, 0.0, half - radius)
        .line_to(0.0, -half + radius)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// interleaved, see `FLOATS_PER_VERTEX`
    pub data: Vec<f32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.data.len() / FLOATS_PER_VERTEX
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count() / 3
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
    }

    pub fn normals(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.data
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|v| Vec3::new(v[3], v[4], v[5]))
    }

    fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, normal: Vec3) {
        for p in [a, b, c] {
            self.data.extend_from_slice(&[p.x, p.y, p.z, normal.x, normal.y, normal.z]);
        }
    }
}

/// Extrudes a convex, counter-clockwise outline along +Z.
///
/// Without a bevel the body spans `z` in `[0, depth]`. Bevel rings push the
/// caps out to `-bevel_thickness` and `depth + bevel_thickness` while the
/// walls bulge out by up to `bevel_size`.
pub fn extrude(outline: &[Vec2], settings: &ExtrudeSettings) -> Mesh {
    let mut mesh = Mesh::default();
    let n = outline.len();
    if n < 3 {
        return mesh;
    }

    let centroid = outline.iter().copied().sum::<Vec2>() / n as f32;
    let vertex_normals = outward_vertex_normals(outline);
    let rings = ring_profile(settings);

    let ring_points = |(offset, z): (f32, f32)| -> Vec<Vec3> {
        outline
            .iter()
            .zip(&vertex_normals)
            .map(|(p, normal)| (*p + *normal * offset).extend(z))
            .collect()
    };

    let front = ring_points(rings[0]);
    let back = ring_points(rings[rings.len() - 1]);
    let front_center = centroid.extend(rings[0].1);
    let back_center = centroid.extend(rings[rings.len() - 1].1);
    for i in 0..n {
        let j = (i + 1) % n;
        mesh.push_triangle(front_center, front[j], front[i], Vec3::NEG_Z);
        mesh.push_triangle(back_center, back[i], back[j], Vec3::Z);
    }

    let body_center = centroid.extend(settings.depth / 2.0);
    for pair in rings.windows(2) {
        let near = ring_points(pair[0]);
        let far = ring_points(pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            push_wall(&mut mesh, [near[i], near[j], far[j], far[i]], body_center);
        }
    }
    mesh
}

/// `(outward offset, z)` per ring, front cap first.
fn ring_profile(settings: &ExtrudeSettings) -> Vec<(f32, f32)> {
    let bevelled = settings.bevel_segments > 0
        && (settings.bevel_thickness > 0.0 || settings.bevel_size > 0.0);
    if !bevelled {
        return vec![(0.0, 0.0), (0.0, settings.depth)];
    }
    let segments = settings.bevel_segments;
    let step = |k: u32| {
        let theta = k as f32 / segments as f32 * FRAC_PI_2;
        (
            settings.bevel_size * theta.sin(),
            settings.bevel_thickness * theta.cos(),
        )
    };
    let front = (0..=segments).map(|k| {
        let (offset, dz) = step(k);
        (offset, -dz)
    });
    let back = (0..=segments).rev().map(|k| {
        let (offset, dz) = step(k);
        (offset, settings.depth + dz)
    });
    front.chain(back).collect()
}

/// Mitered so that both adjacent edges move out by exactly the offset.
fn outward_vertex_normals(outline: &[Vec2]) -> Vec<Vec2> {
    let n = outline.len();
    let edge_normal = |i: usize| {
        let d = outline[(i + 1) % n] - outline[i];
        Vec2::new(d.y, -d.x).normalize_or_zero()
    };
    (0..n)
        .map(|i| {
            let next = edge_normal(i);
            let bisector = (edge_normal((i + n - 1) % n) + next).normalize_or_zero();
            bisector / bisector.dot(next).max(0.5)
        })
        .collect()
}

fn push_wall(mesh: &mut Mesh, quad: [Vec3; 4], body_center: Vec3) {
    let [a, b, c, d] = quad;
    let mut normal = (b - a).cross(d - a).normalize_or_zero();
    if normal == Vec3::ZERO {
        normal = (c - b).cross(a - b).normalize_or_zero();
    }
    let midpoint = (a + b + c + d) / 4.0;
    if normal.dot(midpoint - body_center) < 0.0 {
        mesh.push_triangle(a, c, b, -normal);
        mesh.push_triangle(a, d, c, -normal);
    } else {
        mesh.push_triangle(a, b, c, normal);
        mesh.push_triangle(a, c, d, normal);
    }
}

/// Mesh shared by every card of a stack.
pub fn card_mesh(dimensions: &CardDimensions, settings: &ExtrudeSettings) -> Mesh {
    let outline = rounded_card(dimensions).outline(settings.curve_segments);
    extrude(&outline, settings)
}

/// World axes for the debug overlay: X red, Y green, Z blue.
pub fn axes(length: f32) -> [([f32; 3], [f32; 6]); 3] {
    [
        ([1.0, 0.0, 0.0], [0.0, 0.0, 0.0, length, 0.0, 0.0]),
        ([0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 0.0, length, 0.0]),
        ([0.0, 0.0, 1.0], [0.0, 0.0, 0.0, 0.0, 0.0, length]),
    ]
}
