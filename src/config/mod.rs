use glam::Vec3;

use crate::tween::Ease;

pub const CLOSED_BOOK: &str = "closed_book";
pub const FLAT_FAN: &str = "flat_fan";
pub const PRESETS: [&str; 2] = [CLOSED_BOOK, FLAT_FAN];

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Color, String> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(format!("expected a #rrggbb color, got {:?}", hex));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| format!("invalid hex digits in color {:?}", hex))
        };
        Ok(Color {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardDimensions {
    pub width: f32,
    pub height: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    /// zero disables the bevel
    pub bevel_segments: u32,
    /// pieces each quadratic corner is flattened into
    pub curve_segments: u32,
}

/// How the stack is laid out before any page is turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialPose {
    /// cards lie on top of each other, flipped to face the camera, spine at the center
    ClosedBook,
    /// cards lie side by side without rotation
    FlatFan,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Light,
    pub directional: Light,
    /// the light shines from here towards the origin
    pub directional_position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// multiplied by the viewport aspect ratio to get the right bound
    pub half_width: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    pub eye: Vec3,
    pub target: Vec3,
    /// share of the window the canvas covers
    pub viewport_fraction: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlipSettings {
    pub rotation_ms: f64,
    pub rotation_ease: Ease,
    pub settle_ms: f64,
    pub settle_ease: Ease,
    /// z distance between neighbouring cards
    pub depth_offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookConfig {
    pub colors: Vec<Color>,
    pub dimensions: CardDimensions,
    pub extrude: ExtrudeSettings,
    pub initial_pose: InitialPose,
    pub edge_color: Option<Color>,
    pub lighting: Lighting,
    pub camera: CameraSettings,
    pub flip: FlipSettings,
    pub debug_overlay: bool,
}

impl BookConfig {
    pub fn preset(name: &str) -> Result<BookConfig, String> {
        match name {
            CLOSED_BOOK => Ok(Self::closed_book()),
            FLAT_FAN => Ok(Self::flat_fan()),
            other => Err(format!(
                "unknown preset {:?}, expected one of {:?}",
                other, PRESETS
            )),
        }
    }

    pub fn closed_book() -> BookConfig {
        let cover = Color::rgb(0.620, 0.302, 0.078); // #9e4d14
        let paper = Color::rgb(0.980, 0.969, 0.953); // #faf7f3
        BookConfig {
            colors: vec![cover, paper, paper, paper, paper, cover],
            dimensions: CardDimensions {
                width: 3.2,
                height: 3.9,
                radius: 0.2,
            },
            extrude: ExtrudeSettings {
                depth: 0.05,
                bevel_thickness: 0.02,
                bevel_size: 0.02,
                bevel_segments: 3,
                curve_segments: 12,
            },
            initial_pose: InitialPose::ClosedBook,
            edge_color: Some(cover),
            lighting: Lighting {
                ambient: Light {
                    color: Color::WHITE,
                    intensity: 0.5,
                },
                directional: Light {
                    color: Color::WHITE,
                    intensity: 1.0,
                },
                directional_position: Vec3::new(50.0, 50.0, -50.0),
            },
            camera: CameraSettings {
                half_width: 2.0,
                top: 2.5,
                bottom: -2.0,
                near: 0.1,
                far: 1000.0,
                eye: Vec3::new(0.0, 0.0, -10.0),
                target: Vec3::ZERO,
                viewport_fraction: 0.8,
            },
            flip: FlipSettings {
                rotation_ms: 800.0,
                rotation_ease: Ease::Power1InOut,
                settle_ms: 100.0,
                settle_ease: Ease::Power1Out,
                depth_offset: 0.1,
            },
            debug_overlay: false,
        }
    }

    pub fn flat_fan() -> BookConfig {
        let palette = ["#e63946", "#f1faee", "#a8dadc", "#457b9d", "#1d3557"];
        BookConfig {
            colors: palette
                .iter()
                .filter_map(|hex| Color::from_hex(hex).ok())
                .collect(),
            dimensions: CardDimensions {
                width: 1.6,
                height: 2.4,
                radius: 0.15,
            },
            extrude: ExtrudeSettings {
                depth: 0.04,
                bevel_thickness: 0.0,
                bevel_size: 0.0,
                bevel_segments: 0,
                curve_segments: 8,
            },
            initial_pose: InitialPose::FlatFan,
            edge_color: None,
            lighting: Lighting {
                ambient: Light {
                    color: Color::WHITE,
                    intensity: 0.7,
                },
                directional: Light {
                    color: Color::rgb(1.0, 0.96, 0.9),
                    intensity: 0.8,
                },
                directional_position: Vec3::new(5.0, 10.0, -7.5),
            },
            camera: CameraSettings {
                half_width: 5.0,
                top: 5.0,
                bottom: -5.0,
                near: 0.1,
                far: 1000.0,
                eye: Vec3::new(0.0, 0.0, -10.0),
                target: Vec3::ZERO,
                viewport_fraction: 0.8,
            },
            flip: FlipSettings {
                rotation_ms: 600.0,
                rotation_ease: Ease::Power1InOut,
                settle_ms: 100.0,
                settle_ease: Ease::Power1Out,
                depth_offset: 0.1,
            },
            debug_overlay: true,
        }
    }

    pub fn page_count(&self) -> usize {
        self.colors.len()
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self::closed_book()
    }
}
