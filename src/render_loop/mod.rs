use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use gloo::render::{request_animation_frame, AnimationFrame};

/// Frame gaps above this are treated as a stall (hidden tab, debugger pause).
const LAG_THRESHOLD_MS: f64 = 500.0;
/// What a stalled frame is allowed to advance animations by.
const LAG_STEP_MS: f64 = 33.0;

/// Milliseconds to advance animations by, given the previous frame timestamp.
pub fn frame_delta(previous: Option<f64>, now: f64) -> f64 {
    match previous {
        None => 0.0,
        Some(prev) => {
            let dt = (now - prev).max(0.0);
            if dt > LAG_THRESHOLD_MS {
                LAG_STEP_MS
            } else {
                dt
            }
        }
    }
}

struct LoopState {
    alive: Cell<bool>,
    frame: RefCell<Option<AnimationFrame>>,
    last_timestamp: Cell<Option<f64>>,
    on_frame: RefCell<Box<dyn FnMut(f64)>>,
}

/// Calls `on_frame` once per display frame until stopped or dropped.
pub struct RenderLoop {
    state: Rc<LoopState>,
}

impl RenderLoop {
    /// `on_frame` receives the time since the previous frame in milliseconds.
    pub fn start(on_frame: impl FnMut(f64) + 'static) -> RenderLoop {
        let state = Rc::new(LoopState {
            alive: Cell::new(true),
            frame: RefCell::new(None),
            last_timestamp: Cell::new(None),
            on_frame: RefCell::new(Box::new(on_frame)),
        });
        schedule(&state);
        RenderLoop { state }
    }

    /// Cancels the pending frame. A callback already queued by the browser
    /// returns without drawing or rescheduling.
    pub fn stop(&self) {
        self.state.alive.set(false);
        // dropping the handle cancels the request and frees its closure
        self.state.frame.borrow_mut().take();
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(state: &Rc<LoopState>) {
    let looped = Rc::clone(state);
    let handle = request_animation_frame(move |timestamp| run_frame(&looped, timestamp));
    *state.frame.borrow_mut() = Some(handle);
}

fn run_frame(state: &Rc<LoopState>, timestamp: f64) {
    state.frame.borrow_mut().take();
    if !state.alive.get() {
        return;
    }
    let dt = frame_delta(state.last_timestamp.replace(Some(timestamp)), timestamp);
    {
        let mut on_frame = state.on_frame.borrow_mut();
        (*on_frame)(dt);
    }
    if state.alive.get() {
        schedule(state);
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use crate::wasm_utils::sleep;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn stopped_loop_never_fires_again() {
        let frames = Rc::new(Cell::new(0u32));
        let counted = Rc::clone(&frames);
        let render_loop = RenderLoop::start(move |_| counted.set(counted.get() + 1));

        sleep(100).await;
        assert!(frames.get() > 0);

        render_loop.stop();
        let at_stop = frames.get();
        sleep(100).await;
        assert_eq!(frames.get(), at_stop);

        // dropping after a stop is harmless
        drop(render_loop);
        sleep(50).await;
        assert_eq!(frames.get(), at_stop);
    }

    #[wasm_bindgen_test]
    async fn dropping_the_loop_stops_it() {
        let frames = Rc::new(Cell::new(0u32));
        let counted = Rc::clone(&frames);
        let render_loop = RenderLoop::start(move |_| counted.set(counted.get() + 1));

        sleep(100).await;
        drop(render_loop);
        let at_drop = frames.get();
        sleep(100).await;
        assert_eq!(frames.get(), at_drop);
    }

    #[wasm_bindgen_test]
    async fn stop_from_inside_a_frame_ends_the_loop() {
        let frames = Rc::new(Cell::new(0u32));
        let slot: Rc<RefCell<Option<RenderLoop>>> = Rc::new(RefCell::new(None));

        let counted = Rc::clone(&frames);
        let own_loop = Rc::clone(&slot);
        let render_loop = RenderLoop::start(move |_| {
            counted.set(counted.get() + 1);
            if let Some(running) = own_loop.borrow().as_ref() {
                running.stop();
            }
        });
        *slot.borrow_mut() = Some(render_loop);

        sleep(100).await;
        assert_eq!(frames.get(), 1);

        // break the closure -> loop cycle
        slot.borrow_mut().take();
        assert_eq!(frames.get(), 1);
    }
}
