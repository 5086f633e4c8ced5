use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use futures::{channel::oneshot, FutureExt};

use crate::{
    card::{Card, CardHandle},
    tween::{Progress, Timeline},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    Completed,
    Cancelled,
}

/// Resolves once the animation started with `Animator::start` ends.
#[derive(Debug)]
pub struct FlipTask {
    receiver: oneshot::Receiver<FlipOutcome>,
}

impl Future for FlipTask {
    type Output = FlipOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<FlipOutcome> {
        // a dropped sender means the animator went away mid-flight
        self.receiver
            .poll_unpin(cx)
            .map(|outcome| outcome.unwrap_or(FlipOutcome::Cancelled))
    }
}

struct Running {
    card: CardHandle,
    timeline: Timeline,
    done: oneshot::Sender<FlipOutcome>,
}

/// Plays at most one timeline at a time against the card stack.
#[derive(Default)]
pub struct Animator {
    running: Option<Running>,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn active_card(&self) -> Option<CardHandle> {
        self.running.as_ref().map(|r| r.card)
    }

    /// Starts `timeline` on `card`. Anything already playing is cancelled.
    pub fn start(&mut self, card: CardHandle, timeline: Timeline) -> FlipTask {
        self.cancel();
        let (done, receiver) = oneshot::channel();
        self.running = Some(Running {
            card,
            timeline,
            done,
        });
        FlipTask { receiver }
    }

    pub fn tick(&mut self, dt_ms: f64, cards: &mut [Card]) {
        let running = match self.running.as_mut() {
            Some(running) => running,
            None => return,
        };
        let index = running.card.index();
        let progress = cards
            .get_mut(index)
            .map(|card| running.timeline.advance(dt_ms, &mut card.transform));
        match progress {
            Some(Progress::Running) => {}
            Some(Progress::Finished) => self.resolve(FlipOutcome::Completed),
            None => {
                crate::warn!("animated card {} is not in the stack", index);
                self.cancel();
            }
        }
    }

    pub fn cancel(&mut self) {
        self.resolve(FlipOutcome::Cancelled);
    }

    fn resolve(&mut self, outcome: FlipOutcome) {
        if let Some(running) = self.running.take() {
            // the task may already have been dropped; nobody is left to tell
            let _ = running.done.send(outcome);
        }
    }
}
