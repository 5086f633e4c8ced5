use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use gloo::events::EventListener;
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Window};

use crate::{
    animation::{Animator, FlipOutcome},
    card::{build_stack, Card},
    config::{BookConfig, FlipSettings, CLOSED_BOOK, PRESETS},
    dom::Dom,
    flip::{flip_timeline, Direction, FlipController},
    log,
    render_loop::RenderLoop,
    scene::Scene,
    warn,
};

struct Book {
    cards: Vec<Card>,
    controller: FlipController,
    animator: Animator,
    flip: FlipSettings,
}

/// Everything the event handlers and the frame callback reach into.
struct Shared {
    book: RefCell<Book>,
    scene: RefCell<Scene>,
    dom: Dom,
}

impl Shared {
    fn sync_controls(&self) {
        let controls = self.book.borrow().controller.controls();
        self.dom.sync_controls(controls);
    }

    fn frame(&self, dt_ms: f64) {
        let mut book = self.book.borrow_mut();
        let book = &mut *book;
        book.animator.tick(dt_ms, &mut book.cards);
        self.scene.borrow().draw(&book.cards);
    }
}

/// Live resources of a mounted viewer. Fields drop in order: handlers and
/// the loop let go of `shared` before the scene and DOM are released.
struct Mounted {
    _listeners: Vec<EventListener>,
    render_loop: RenderLoop,
    shared: Rc<Shared>,
}

#[wasm_bindgen]
pub struct BookViewer {
    window: Window,
    mounted: Option<Mounted>,
}

#[wasm_bindgen]
impl BookViewer {
    /// Mounts a book under `host`, using the named preset (`closed_book` when omitted).
    pub fn mount(host: Element, preset: Option<String>) -> Result<BookViewer, JsValue> {
        let config = BookConfig::preset(preset.as_deref().unwrap_or(CLOSED_BOOK))?;
        Self::mount_with_config(&host, config)
    }

    /// Names accepted by `mount`.
    pub fn presets() -> js_sys::Array {
        PRESETS.iter().map(|name| JsValue::from_str(name)).collect()
    }

    pub fn next(&self) {
        if let Some(mounted) = &self.mounted {
            turn(&mounted.shared, Direction::Next);
        }
    }

    pub fn prev(&self) {
        if let Some(mounted) = &self.mounted {
            turn(&mounted.shared, Direction::Prev);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn current_page(&self) -> usize {
        self.mounted
            .as_ref()
            .map(|m| m.shared.book.borrow().controller.state().current_page)
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn is_flipping(&self) -> bool {
        self.mounted
            .as_ref()
            .map(|m| m.shared.book.borrow().controller.state().is_flipping)
            .unwrap_or(false)
    }

    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.mounted
            .as_ref()
            .map(|m| m.shared.book.borrow().controller.page_count())
            .unwrap_or(0)
    }

    #[wasm_bindgen(getter)]
    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Re-reads the window size, as the resize listener does.
    pub fn resize(&self) -> Result<(), JsValue> {
        if let Some(mounted) = &self.mounted {
            let (width, height) = viewport(&self.window)?;
            mounted.shared.scene.borrow_mut().resize(width, height)?;
        }
        Ok(())
    }

    /// Stops the loop, cancels any flip in flight and removes the canvas and
    /// buttons. Calling it twice is harmless.
    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            mounted.render_loop.stop();
            mounted.shared.book.borrow_mut().animator.cancel();
            log!("book viewer unmounted");
        }
    }
}

impl BookViewer {
    pub fn mount_with_config(host: &Element, config: BookConfig) -> Result<BookViewer, JsValue> {
        let window = web_sys::window().ok_or("no global window exists")?;
        let (width, height) = viewport(&window)?;

        // anything created before a failing step is torn down by its Drop
        let dom = Dom::attach(host)?;
        let scene = Scene::new(dom.canvas(), &config, width, height)?;
        let cards = build_stack(&config);
        if cards.is_empty() {
            warn!("book has no pages, nothing will be drawn");
        }

        let shared = Rc::new(Shared {
            book: RefCell::new(Book {
                controller: FlipController::new(cards.len()),
                cards,
                animator: Animator::new(),
                flip: config.flip,
            }),
            scene: RefCell::new(scene),
            dom,
        });
        shared.sync_controls();
        shared.frame(0.0);

        let listeners = vec![
            click_listener(&shared, Direction::Prev),
            click_listener(&shared, Direction::Next),
            resize_listener(&window, &shared),
        ];
        let looped = Rc::clone(&shared);
        let render_loop = RenderLoop::start(move |dt_ms| looped.frame(dt_ms));

        log!(
            "book viewer mounted: {} pages, {:?} pose",
            config.page_count(),
            config.initial_pose
        );
        Ok(BookViewer {
            window,
            mounted: Some(Mounted {
                _listeners: listeners,
                render_loop,
                shared,
            }),
        })
    }
}

impl Drop for BookViewer {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn viewport(window: &Window) -> Result<(f64, f64), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

fn click_listener(shared: &Rc<Shared>, direction: Direction) -> EventListener {
    let button = match direction {
        Direction::Prev => shared.dom.prev_button(),
        Direction::Next => shared.dom.next_button(),
    };
    let clicked = Rc::clone(shared);
    EventListener::new(button, "click", move |_| turn(&clicked, direction))
}

fn resize_listener(window: &Window, shared: &Rc<Shared>) -> EventListener {
    let resized = Rc::clone(shared);
    let target = window.clone();
    EventListener::new(window, "resize", move |_| {
        let applied = viewport(&target)
            .and_then(|(width, height)| resized.scene.borrow_mut().resize(width, height));
        if let Err(e) = applied {
            warn!("could not resize the scene: {:?}", e);
        }
    })
}

/// Validates and starts a flip. The page index only moves once the
/// animation task resolves.
fn turn(shared: &Rc<Shared>, direction: Direction) {
    let (plan, task) = {
        let mut book = shared.book.borrow_mut();
        let book = &mut *book;
        let plan = match book.controller.request(direction) {
            Some(plan) => plan,
            None => return,
        };
        let card = match book.cards.get(plan.card.index()) {
            Some(card) => card,
            None => {
                book.controller.abandon(plan);
                return;
            }
        };
        let timeline = flip_timeline(plan, card, book.cards.len(), &book.flip);
        (plan, book.animator.start(plan.card, timeline))
    };
    log!("flipping card {} ({:?})", plan.card.index(), direction);
    shared.sync_controls();

    let weak: Weak<Shared> = Rc::downgrade(shared);
    spawn_local(async move {
        let outcome = task.await;
        // unmounted while flipping
        let shared = match weak.upgrade() {
            Some(shared) => shared,
            None => return,
        };
        let page = {
            let mut book = shared.book.borrow_mut();
            match outcome {
                FlipOutcome::Completed => book.controller.complete(plan),
                FlipOutcome::Cancelled => book.controller.abandon(plan),
            };
            book.controller.state().current_page
        };
        shared.sync_controls();
        log!("flip {:?}, now on page {}", outcome, page);
    });
}
