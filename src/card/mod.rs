use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::{BookConfig, Color, InitialPose};

/// Euler rotation (XYZ order, radians) and translation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub rotation: Vec3,
    pub position: Vec3,
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            rotation: Vec3::ZERO,
            position,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_rotation_translation(rotation, self.position)
    }
}

/// Opaque reference to one card of the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardHandle(usize);

impl CardHandle {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    index: usize,
    pub color: Color,
    /// the page group, animated by flips
    pub transform: Transform,
    /// placement of the mesh inside its group, fixed at creation
    pub local: Transform,
}

impl Card {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn handle(&self) -> CardHandle {
        CardHandle(self.index)
    }

    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix() * self.local.matrix()
    }

    /// z of this card while it lies unturned in the stack
    pub fn resting_depth(&self, depth_offset: f32) -> f32 {
        depth_offset * self.index as f32
    }
}

/// Builds one card per configured color, stacked `depth_offset` apart.
pub fn build_stack(config: &BookConfig) -> Vec<Card> {
    let count = config.colors.len();
    let dims = config.dimensions;
    let depth_offset = config.flip.depth_offset;
    let fan_pitch = dims.width + dims.radius;
    let fan_start = -(count as f32 * dims.width + count.saturating_sub(1) as f32 * dims.radius) / 2.0;

    config
        .colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            let is_edge = i == 0 || i + 1 == count;
            let color = match config.edge_color {
                Some(edge) if is_edge => edge,
                _ => *color,
            };
            let z = depth_offset * i as f32;
            let (transform, local) = match config.initial_pose {
                InitialPose::ClosedBook => (
                    Transform::at(Vec3::new(-1.0, 0.0, z)),
                    Transform {
                        rotation: Vec3::new(std::f32::consts::PI, 0.0, 0.0),
                        position: Vec3::new(-dims.width, 0.0, 0.0),
                    },
                ),
                InitialPose::FlatFan => (
                    Transform::at(Vec3::new(fan_start + fan_pitch * i as f32, 0.0, z)),
                    Transform::default(),
                ),
            };
            Card {
                index: i,
                color,
                transform,
                local,
            }
        })
        .collect()
}
