/**
 * builds the widget's DOM under a host element: a container holding the
 * canvas and a fixed "Previous" / "Next" button bar
 */
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement, HtmlCanvasElement, HtmlElement};

use crate::{flip::ControlState, warn};

const CONTAINER_STYLE: &str = "width: 100%; height: 100%; background: pink; display: flex;";
const MOUNT_STYLE: &str = "width: 100%; height: 100%;";
const BUTTON_BAR_STYLE: &str = "position: fixed; bottom: 1rem; left: 0; right: 0; \
     display: flex; justify-content: center; gap: 1rem;";
const BUTTON_STYLE: &str = "padding: 0.75rem 1.5rem; background-color: rgba(255, 255, 255, 0.1); \
     color: white; border: none; border-radius: 9999px; cursor: pointer; \
     backdrop-filter: blur(4px); transition: background-color 0.2s;";

pub const PREV_LABEL: &str = "Previous";
pub const NEXT_LABEL: &str = "Next";

/// Owns the widget's elements. Dropping it detaches them from the host.
pub struct Dom {
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    prev_button: HtmlButtonElement,
    next_button: HtmlButtonElement,
}

impl Dom {
    pub fn attach(host: &Element) -> Result<Dom, JsValue> {
        let document = host
            .owner_document()
            .ok_or("host element is not attached to a document")?;

        let container = create::<HtmlElement>(&document, "div")?;
        container.set_attribute("style", CONTAINER_STYLE)?;

        let mount = create::<HtmlElement>(&document, "div")?;
        mount.set_attribute("style", MOUNT_STYLE)?;
        let canvas = create::<HtmlCanvasElement>(&document, "canvas")?;
        mount.append_child(&canvas)?;
        container.append_child(&mount)?;

        let bar = create::<HtmlElement>(&document, "div")?;
        bar.set_attribute("style", BUTTON_BAR_STYLE)?;
        let prev_button = button(&document, PREV_LABEL)?;
        let next_button = button(&document, NEXT_LABEL)?;
        bar.append_child(&prev_button)?;
        bar.append_child(&next_button)?;
        container.append_child(&bar)?;

        // attach last so a failure above leaves the host untouched
        host.append_child(&container)?;

        Ok(Dom {
            container,
            canvas,
            prev_button,
            next_button,
        })
    }

    pub fn canvas(&self) -> HtmlCanvasElement {
        self.canvas.clone()
    }

    pub fn prev_button(&self) -> &HtmlButtonElement {
        &self.prev_button
    }

    pub fn next_button(&self) -> &HtmlButtonElement {
        &self.next_button
    }

    pub fn sync_controls(&self, controls: ControlState) {
        set_enabled(&self.prev_button, controls.prev_enabled);
        set_enabled(&self.next_button, controls.next_enabled);
    }
}

impl Drop for Dom {
    fn drop(&mut self) {
        self.container.remove();
    }
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(JsValue::from)
}

fn button(document: &Document, label: &str) -> Result<HtmlButtonElement, JsValue> {
    let button = create::<HtmlButtonElement>(document, "button")?;
    button.set_attribute("type", "button")?;
    button.set_attribute("style", BUTTON_STYLE)?;
    button.set_text_content(Some(label));
    Ok(button)
}

fn set_enabled(button: &HtmlButtonElement, enabled: bool) {
    button.set_disabled(!enabled);
    let style = button.style();
    let (opacity, cursor) = if enabled {
        ("1", "pointer")
    } else {
        ("0.5", "not-allowed")
    };
    let styled = style
        .set_property("opacity", opacity)
        .and_then(|_| style.set_property("cursor", cursor));
    if let Err(err) = styled {
        warn!("could not restyle button: {:?}", err);
    }
}
