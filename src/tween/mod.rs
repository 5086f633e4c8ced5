/**
 * Small tweening engine: easing curves, single-property tweens and
 * sequential timelines that animate a card transform frame by frame.
 */
use std::collections::VecDeque;

use crate::card::Transform;

/// Easing curves, named after their GSAP counterparts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ease {
    Linear,
    Power1In,
    Power1Out,
    Power1InOut,
}

impl Ease {
    /// Maps linear progress in `[0, 1]` onto the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One scalar channel of a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Rotation(Axis),
    Position(Axis),
}

impl Property {
    pub fn get(self, transform: &Transform) -> f32 {
        let (v, axis) = match self {
            Property::Rotation(axis) => (transform.rotation, axis),
            Property::Position(axis) => (transform.position, axis),
        };
        match axis {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(self, transform: &mut Transform, value: f32) {
        let (v, axis) = match self {
            Property::Rotation(axis) => (&mut transform.rotation, axis),
            Property::Position(axis) => (&mut transform.position, axis),
        };
        match axis {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub property: Property,
    pub from: f32,
    pub to: f32,
    pub duration_ms: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn sample(&self, elapsed_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return self.to;
        }
        let k = self.ease.apply(elapsed_ms / self.duration_ms) as f32;
        self.from + (self.to - self.from) * k
    }
}

/// A tween whose start value is read from the transform when it begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub property: Property,
    pub to: f32,
    pub duration_ms: f64,
    pub ease: Ease,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Running,
    Finished,
}

#[derive(Debug)]
struct ActiveStage {
    tween: Tween,
    elapsed_ms: f64,
}

/// Stages played back to back.
#[derive(Debug, Default)]
pub struct Timeline {
    pending: VecDeque<Stage>,
    active: Option<ActiveStage>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: Stage) -> Self {
        self.pending.push_back(stage);
        self
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Sum of the durations of the stages not yet completed.
    #[cfg(test)]
    pub fn remaining_ms(&self) -> f64 {
        let active = self
            .active
            .as_ref()
            .map(|a| (a.tween.duration_ms - a.elapsed_ms).max(0.0))
            .unwrap_or(0.0);
        active + self.pending.iter().map(|s| s.duration_ms).sum::<f64>()
    }

    /// Moves the timeline forward by `dt_ms`, writing into `transform`.
    /// Time left over when a stage ends is spent on the next one.
    pub fn advance(&mut self, dt_ms: f64, transform: &mut Transform) -> Progress {
        let mut dt_ms = dt_ms.max(0.0);
        loop {
            if self.active.is_none() {
                let stage = match self.pending.pop_front() {
                    Some(stage) => stage,
                    None => return Progress::Finished,
                };
                self.active = Some(ActiveStage {
                    tween: Tween {
                        property: stage.property,
                        from: stage.property.get(transform),
                        to: stage.to,
                        duration_ms: stage.duration_ms,
                        ease: stage.ease,
                    },
                    elapsed_ms: 0.0,
                });
            }

            if let Some(active) = self.active.as_mut() {
                let remaining = active.tween.duration_ms - active.elapsed_ms;
                if dt_ms < remaining {
                    active.elapsed_ms += dt_ms;
                    let value = active.tween.sample(active.elapsed_ms);
                    active.tween.property.set(transform, value);
                    return Progress::Running;
                }
                dt_ms -= remaining.max(0.0);
                active.tween.property.set(transform, active.tween.to);
            }
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const EASES: [Ease; 4] = [
        Ease::Linear,
        Ease::Power1In,
        Ease::Power1Out,
        Ease::Power1InOut,
    ];

    #[test]
    fn ease_endpoints_are_exact() {
        for ease in EASES {
            assert_eq!(ease.apply(0.0), 0.0, "{:?}", ease);
            assert_eq!(ease.apply(1.0), 1.0, "{:?}", ease);
        }
        assert_eq!(Ease::Power1InOut.apply(0.5), 0.5);
    }

    #[test]
    fn ease_clamps_out_of_range_progress() {
        assert_eq!(Ease::Power1Out.apply(-3.0), 0.0);
        assert_eq!(Ease::Power1In.apply(7.0), 1.0);
    }

    #[test]
    fn in_out_is_slow_at_both_ends() {
        let e = Ease::Power1InOut;
        assert!(e.apply(0.1) < 0.1);
        assert!(e.apply(0.9) > 0.9);
    }

    #[test]
    fn zero_duration_tween_jumps_to_target() {
        let tween = Tween {
            property: Property::Position(Axis::Z),
            from: 1.0,
            to: 4.0,
            duration_ms: 0.0,
            ease: Ease::Linear,
        };
        assert_eq!(tween.sample(0.0), 4.0);
    }

    #[test]
    fn timeline_captures_start_value_from_transform() {
        let mut transform = Transform {
            rotation: Vec3::ZERO,
            position: Vec3::new(0.0, 0.0, 2.0),
        };
        let mut timeline = Timeline::new().then(Stage {
            property: Property::Position(Axis::Z),
            to: 4.0,
            duration_ms: 100.0,
            ease: Ease::Linear,
        });
        assert_eq!(timeline.advance(50.0, &mut transform), Progress::Running);
        assert!((transform.position.z - 3.0).abs() < 1e-6);
        assert_eq!(timeline.advance(50.0, &mut transform), Progress::Finished);
        assert_eq!(transform.position.z, 4.0);
        assert!(timeline.is_finished());
    }

    #[test]
    fn leftover_time_carries_into_next_stage() {
        let mut transform = Transform::default();
        let mut timeline = Timeline::new()
            .then(Stage {
                property: Property::Rotation(Axis::Y),
                to: 1.0,
                duration_ms: 100.0,
                ease: Ease::Linear,
            })
            .then(Stage {
                property: Property::Position(Axis::Z),
                to: 10.0,
                duration_ms: 100.0,
                ease: Ease::Linear,
            });
        assert_eq!(timeline.remaining_ms(), 200.0);

        assert_eq!(timeline.advance(150.0, &mut transform), Progress::Running);
        assert_eq!(transform.rotation.y, 1.0);
        assert!((transform.position.z - 5.0).abs() < 1e-5);
        assert!((timeline.remaining_ms() - 50.0).abs() < 1e-9);

        assert_eq!(timeline.advance(1000.0, &mut transform), Progress::Finished);
        assert_eq!(transform.position.z, 10.0);
    }

    #[test]
    fn empty_timeline_is_finished_immediately() {
        let mut transform = Transform::default();
        assert_eq!(Timeline::new().advance(16.0, &mut transform), Progress::Finished);
    }
}
