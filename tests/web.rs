//! Browser tests, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use wasm_flipbook::BookViewer;
use web_sys::{Element, HtmlButtonElement, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

fn host() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn button(host: &Element, label: &str) -> HtmlButtonElement {
    let first = host
        .query_selector("button")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlButtonElement>()
        .unwrap();
    if first.text_content().as_deref() == Some(label) {
        return first;
    }
    first
        .next_element_sibling()
        .unwrap()
        .dyn_into::<HtmlButtonElement>()
        .unwrap()
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

/// Headless browsers without GPU support may refuse WebGL2; mount must then
/// fail cleanly and leave nothing behind.
fn mount(host: &Element, preset: Option<&str>) -> Option<BookViewer> {
    match BookViewer::mount(host.clone(), preset.map(String::from)) {
        Ok(viewer) => Some(viewer),
        Err(_) => {
            assert_eq!(host.child_element_count(), 0);
            None
        }
    }
}

#[wasm_bindgen_test]
fn unknown_preset_is_rejected_without_touching_the_host() {
    let host = host();
    let err = BookViewer::mount(host.clone(), Some("spiral".into())).err();
    assert!(err.is_some());
    assert_eq!(host.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn presets_are_listed() {
    let names: Vec<JsValue> = BookViewer::presets().iter().collect();
    assert_eq!(names, [JsValue::from_str("closed_book"), JsValue::from_str("flat_fan")]);
}

#[wasm_bindgen_test]
fn mount_builds_canvas_and_controls() {
    let host = host();
    let viewer = match mount(&host, None) {
        Some(viewer) => viewer,
        None => return,
    };
    assert!(host.query_selector("canvas").unwrap().is_some());
    assert_eq!(viewer.page_count(), 6);
    assert_eq!(viewer.current_page(), 0);
    assert!(button(&host, "Previous").disabled());
    assert!(!button(&host, "Next").disabled());
}

#[wasm_bindgen_test]
fn next_locks_both_buttons_until_the_flip_finishes() {
    let host = host();
    let viewer = match mount(&host, None) {
        Some(viewer) => viewer,
        None => return,
    };
    viewer.next();
    assert!(viewer.is_flipping());
    assert_eq!(viewer.current_page(), 0);
    assert!(button(&host, "Previous").disabled());
    assert!(button(&host, "Next").disabled());

    // ignored while the first flip is running
    viewer.next();
    assert_eq!(viewer.current_page(), 0);
}

#[wasm_bindgen_test]
async fn flip_completes_and_unlocks() {
    let host = host();
    let viewer = match mount(&host, Some("flat_fan")) {
        Some(viewer) => viewer,
        None => return,
    };
    viewer.next();
    sleep(1500).await;
    assert!(!viewer.is_flipping());
    assert_eq!(viewer.current_page(), 1);
    assert!(!button(&host, "Previous").disabled());

    viewer.prev();
    sleep(1500).await;
    assert_eq!(viewer.current_page(), 0);
}

#[wasm_bindgen_test]
fn prev_on_first_page_changes_nothing() {
    let host = host();
    let viewer = match mount(&host, None) {
        Some(viewer) => viewer,
        None => return,
    };
    viewer.prev();
    assert!(!viewer.is_flipping());
    assert_eq!(viewer.current_page(), 0);
}

#[wasm_bindgen_test]
fn resize_keeps_page_state() {
    let host = host();
    let viewer = match mount(&host, None) {
        Some(viewer) => viewer,
        None => return,
    };
    viewer.next();
    viewer.resize().unwrap();
    assert!(viewer.is_flipping());
    assert_eq!(viewer.current_page(), 0);

    let canvas = host
        .query_selector("canvas")
        .unwrap()
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    let width = canvas.style().get_property_value("width").unwrap();
    assert_eq!(width, format!("{}px", canvas.width()));
}

#[wasm_bindgen_test]
fn unmount_removes_everything_even_mid_flip() {
    let host = host();
    let mut viewer = match mount(&host, None) {
        Some(viewer) => viewer,
        None => return,
    };
    viewer.next();
    viewer.unmount();
    assert!(!viewer.is_mounted());
    assert_eq!(host.child_element_count(), 0);
    // a second unmount is a no-op
    viewer.unmount();
    viewer.next();
    assert_eq!(viewer.current_page(), 0);
}
