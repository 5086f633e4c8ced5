/**
 * Page-turn state machine.
 *
 * The controller only holds the page index and the flipping lock. It decides
 * which card a request targets and hands back a plan; whoever runs the
 * animation reports back through `complete` once the whole chain is done.
 */
use std::f32::consts::PI;

use crate::{
    card::{Card, CardHandle},
    config::FlipSettings,
    tween::{Axis, Property, Stage, Timeline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlipPlan {
    pub card: CardHandle,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub is_flipping: bool,
}

/// Which buttons may be pressed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct FlipController {
    page_count: usize,
    state: PageState,
    in_flight: Option<FlipPlan>,
}

impl FlipController {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            state: PageState::default(),
            in_flight: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn can_turn(&self, direction: Direction) -> bool {
        if self.state.is_flipping {
            return false;
        }
        match direction {
            Direction::Next => self.state.current_page + 1 < self.page_count,
            Direction::Prev => self.state.current_page > 0,
        }
    }

    pub fn controls(&self) -> ControlState {
        ControlState {
            prev_enabled: self.can_turn(Direction::Prev),
            next_enabled: self.can_turn(Direction::Next),
        }
    }

    /// Takes the lock and returns the card to animate, or `None` when the
    /// request is not allowed right now. Rejections are silent.
    pub fn request(&mut self, direction: Direction) -> Option<FlipPlan> {
        if !self.can_turn(direction) {
            return None;
        }
        let page = self.state.current_page;
        let target = match direction {
            Direction::Next => page,
            Direction::Prev => page - 1,
        };
        let plan = FlipPlan {
            card: CardHandle::new(target),
            direction,
        };
        self.state.is_flipping = true;
        self.in_flight = Some(plan);
        Some(plan)
    }

    /// Finishes the flip described by `plan`. Returns false (and changes
    /// nothing) if that plan is not the one in flight.
    pub fn complete(&mut self, plan: FlipPlan) -> bool {
        if self.in_flight != Some(plan) {
            return false;
        }
        self.state.current_page = match plan.direction {
            Direction::Next => self.state.current_page + 1,
            Direction::Prev => self.state.current_page - 1,
        };
        self.state.is_flipping = false;
        self.in_flight = None;
        true
    }

    /// Releases the lock without turning the page, for a flip that was
    /// cancelled before it finished.
    pub fn abandon(&mut self, plan: FlipPlan) -> bool {
        if self.in_flight != Some(plan) {
            return false;
        }
        self.state.is_flipping = false;
        self.in_flight = None;
        true
    }
}

/// Rotation about the spine, then a short move in depth so the turned card
/// settles behind (or back into) the stack.
pub fn flip_timeline(
    plan: FlipPlan,
    card: &Card,
    page_count: usize,
    settings: &FlipSettings,
) -> Timeline {
    let (angle, depth) = match plan.direction {
        Direction::Next => (-PI, settings.depth_offset * (page_count + 1) as f32),
        Direction::Prev => (0.0, card.resting_depth(settings.depth_offset)),
    };
    Timeline::new()
        .then(Stage {
            property: Property::Rotation(Axis::Y),
            to: angle,
            duration_ms: settings.rotation_ms,
            ease: settings.rotation_ease,
        })
        .then(Stage {
            property: Property::Position(Axis::Z),
            to: depth,
            duration_ms: settings.settle_ms,
            ease: settings.settle_ease,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{card::build_stack, config::BookConfig, tween::Progress};

    fn run(plan: FlipPlan, cards: &mut [Card], config: &BookConfig) {
        let card = &mut cards[plan.card.index()];
        let mut timeline = flip_timeline(plan, card, config.page_count(), &config.flip);
        let mut frames = 0;
        while timeline.advance(16.0, &mut card.transform) == Progress::Running {
            frames += 1;
            assert!(frames < 1000);
        }
    }

    #[test]
    fn next_from_first_page_locks_then_advances() {
        let config = BookConfig::closed_book();
        let mut cards = build_stack(&config);
        let mut controller = FlipController::new(cards.len());
        assert_eq!(controller.page_count(), 6);

        let plan = controller.request(Direction::Next).unwrap();
        assert_eq!(plan.card, CardHandle::new(0));
        assert_eq!(
            controller.state(),
            PageState {
                current_page: 0,
                is_flipping: true
            }
        );

        run(plan, &mut cards, &config);
        assert!(controller.complete(plan));
        assert_eq!(
            controller.state(),
            PageState {
                current_page: 1,
                is_flipping: false
            }
        );
        assert!((cards[0].transform.rotation.y + PI).abs() < 1e-6);
        assert!((cards[0].transform.position.z - 0.7).abs() < 1e-6);
    }

    #[test]
    fn requests_while_flipping_are_ignored() {
        let mut controller = FlipController::new(6);
        controller.request(Direction::Next).unwrap();
        let before = controller.state();
        assert_eq!(controller.request(Direction::Next), None);
        assert_eq!(controller.request(Direction::Prev), None);
        assert_eq!(controller.state(), before);
        assert_eq!(
            controller.controls(),
            ControlState {
                prev_enabled: false,
                next_enabled: false
            }
        );
    }

    #[test]
    fn prev_on_first_page_is_a_no_op() {
        let mut controller = FlipController::new(6);
        assert_eq!(controller.request(Direction::Prev), None);
        assert_eq!(controller.state(), PageState::default());
        assert!(!controller.controls().prev_enabled);
    }

    #[test]
    fn next_on_last_page_is_a_no_op() {
        let mut controller = FlipController::new(3);
        for _ in 0..2 {
            let plan = controller.request(Direction::Next).unwrap();
            controller.complete(plan);
        }
        let before = controller.state();
        assert_eq!(before.current_page, 2);
        assert_eq!(controller.request(Direction::Next), None);
        assert_eq!(controller.state(), before);
        assert!(!controller.controls().next_enabled);
        assert!(controller.controls().prev_enabled);
    }

    #[test]
    fn prev_targets_the_card_before_the_current_page() {
        let mut controller = FlipController::new(6);
        let plan = controller.request(Direction::Next).unwrap();
        controller.complete(plan);
        let back = controller.request(Direction::Prev).unwrap();
        assert_eq!(back.card, CardHandle::new(0));
        assert!(controller.complete(back));
        assert_eq!(controller.state().current_page, 0);
    }

    #[test]
    fn next_then_prev_restores_the_card() {
        let config = BookConfig::closed_book();
        let mut cards = build_stack(&config);
        let original = cards.clone();
        let mut controller = FlipController::new(cards.len());

        // move to page 2 first so the round trip starts mid-book
        for _ in 0..2 {
            let plan = controller.request(Direction::Next).unwrap();
            run(plan, &mut cards, &config);
            controller.complete(plan);
        }
        let plan = controller.request(Direction::Next).unwrap();
        assert_eq!(plan.card, CardHandle::new(2));
        run(plan, &mut cards, &config);
        controller.complete(plan);

        let back = controller.request(Direction::Prev).unwrap();
        assert_eq!(back.card, CardHandle::new(2));
        run(back, &mut cards, &config);
        controller.complete(back);

        assert_eq!(controller.state().current_page, 2);
        assert_eq!(cards[2].transform, original[2].transform);
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut controller = FlipController::new(6);
        let plan = controller.request(Direction::Next).unwrap();
        assert!(controller.complete(plan));
        assert!(!controller.complete(plan));
        assert_eq!(controller.state().current_page, 1);
    }

    #[test]
    fn abandoned_flip_keeps_the_page() {
        let mut controller = FlipController::new(6);
        let plan = controller.request(Direction::Next).unwrap();
        assert!(controller.abandon(plan));
        assert_eq!(controller.state(), PageState::default());
        assert!(!controller.complete(plan));
    }

    #[test]
    fn single_card_never_turns() {
        let mut controller = FlipController::new(1);
        assert_eq!(controller.request(Direction::Next), None);
        assert_eq!(controller.request(Direction::Prev), None);
    }

    #[test]
    fn page_index_stays_in_bounds_for_any_click_sequence() {
        let mut seed: u32 = 0x2545_f491;
        for page_count in 1..=8 {
            let mut controller = FlipController::new(page_count);
            let mut pending: Option<FlipPlan> = None;
            for _ in 0..500 {
                seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                match seed >> 30 {
                    0 => {
                        pending = controller.request(Direction::Next).or(pending);
                    }
                    1 => {
                        pending = controller.request(Direction::Prev).or(pending);
                    }
                    _ => {
                        if let Some(plan) = pending.take() {
                            controller.complete(plan);
                        }
                    }
                }
                let state = controller.state();
                assert!(state.current_page < page_count);
                assert_eq!(state.is_flipping, pending.is_some());
            }
        }
    }
}
