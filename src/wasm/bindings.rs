//! JavaScript bindings for the browser front-end
//!
//! Exposes three entry points:
//!
//! - `mountAll`: attach a renderer to every neural canvas on the page
//! - `mountReveal`: reveal `.section` elements as they scroll into view
//! - `initBackdrop`: start the third-party net background when it is loaded
//!
//! A page without the expected elements is not an error; the calls simply
//! do nothing.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent, Window,
};

use super::canvas::CanvasBackend;
use crate::config::RendererConfig;
use crate::scene::{FrameClock, PulseRenderer, RenderBackend, Surface};
use crate::site::backdrop::should_initialise;
use crate::site::{BackdropPreset, Intersection, REVEAL_THRESHOLD, RevealTracker, VISIBLE_CLASS};

/// Class marking canvases that get a renderer
pub const CANVAS_CLASS: &str = "neural-canvas";
/// Id used by pages that predate the class
pub const LEGACY_CANVAS_ID: &str = "neural-canvas";
/// Selector of sections revealed on scroll
pub const SECTION_SELECTOR: &str = ".section";

/// One canvas with its renderer
struct Mounted {
    canvas: HtmlCanvasElement,
    backend: CanvasBackend,
    renderer: PulseRenderer,
    clock: FrameClock,
}

type Shared = Rc<RefCell<Mounted>>;

/// Mount a renderer on every neural canvas in the document
///
/// `config_json` is an optional camelCase [`RendererConfig`] object; missing
/// keys fall back to the neon preset. Returns the number of mounted canvases.
#[wasm_bindgen(js_name = mountAll)]
pub fn mount_all(config_json: Option<String>) -> usize {
    super::init_panic_hook();

    let config = match parse_config(config_json.as_deref()) {
        Ok(config) => config,
        Err(message) => {
            warn(&format!("pulsenet: ignoring invalid config: {}", message));
            RendererConfig::default()
        }
    };

    let Some(window) = web_sys::window() else {
        return 0;
    };
    let Some(document) = window.document() else {
        return 0;
    };

    let mounted: Vec<Shared> = find_canvases(&document)
        .into_iter()
        .filter_map(|canvas| mount_canvas(&window, canvas, config.clone()))
        .collect();

    if !mounted.is_empty() {
        watch_resize(&window, mounted.clone());
    }
    mounted.len()
}

/// Parse the mount options; an absent or blank string means defaults
pub fn parse_config(config_json: Option<&str>) -> crate::Result<RendererConfig> {
    match config_json.filter(|t| !t.trim().is_empty()) {
        Some(text) => RendererConfig::from_json(text),
        None => Ok(RendererConfig::default()),
    }
}

fn find_canvases(document: &Document) -> Vec<HtmlCanvasElement> {
    let mut canvases: Vec<HtmlCanvasElement> = Vec::new();

    if let Ok(list) = document.query_selector_all(&format!("canvas.{}", CANVAS_CLASS)) {
        for i in 0..list.length() {
            if let Some(canvas) = list.item(i).and_then(|n| n.dyn_into().ok()) {
                canvases.push(canvas);
            }
        }
    }

    if let Some(canvas) = document
        .get_element_by_id(LEGACY_CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
    {
        if !canvases.contains(&canvas) {
            canvases.push(canvas);
        }
    }

    canvases
}

fn measure(window: &Window, canvas: &HtmlCanvasElement, config: &RendererConfig) -> Surface {
    let rect = canvas.get_bounding_client_rect();
    Surface::from_css_width(rect.width(), window.device_pixel_ratio(), &config.sizing)
}

fn apply_surface(canvas: &HtmlCanvasElement, surface: &Surface) {
    canvas.set_width(surface.width);
    canvas.set_height(surface.height);
}

fn mount_canvas(window: &Window, canvas: HtmlCanvasElement, config: RendererConfig) -> Option<Shared> {
    let ctx = canvas
        .get_context("2d")
        .ok()??
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()?;

    let surface = measure(window, &canvas, &config);
    apply_surface(&canvas, &surface);

    let start = window.performance().map(|p| p.now()).unwrap_or(0.0);
    let clock = FrameClock::new(start, config.max_frame_delta);
    let state = Rc::new(RefCell::new(Mounted {
        canvas: canvas.clone(),
        backend: CanvasBackend::new(ctx),
        renderer: PulseRenderer::from_entropy(config, surface),
        clock,
    }));

    listen(&canvas, "pointermove", {
        let state = state.clone();
        move |event: MouseEvent| {
            let s = &mut *state.borrow_mut();
            let rect = s.canvas.get_bounding_client_rect();
            s.renderer.pointer_move_client(
                event.client_x() as f64,
                event.client_y() as f64,
                rect.left(),
                rect.top(),
            );
        }
    });

    listen(&canvas, "pointerleave", {
        let state = state.clone();
        move |_event: MouseEvent| state.borrow_mut().renderer.pointer_leave()
    });

    listen(&canvas, "click", {
        let state = state.clone();
        move |event: MouseEvent| {
            let s = &mut *state.borrow_mut();
            let rect = s.canvas.get_bounding_client_rect();
            let pos = s.renderer.surface().client_to_surface(
                event.client_x() as f64,
                event.client_y() as f64,
                rect.left(),
                rect.top(),
            );
            s.renderer.excite(pos.x, pos.y);
        }
    });

    start_loop(window.clone(), state.clone());
    Some(state)
}

fn listen<F>(target: &HtmlCanvasElement, event: &str, handler: F)
where
    F: FnMut(MouseEvent) + 'static,
{
    let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
    if target
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        .is_ok()
    {
        // Listeners live as long as the page
        closure.forget();
    }
}

fn watch_resize(window: &Window, mounted: Vec<Shared>) {
    let win = window.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        for state in &mounted {
            let s = &mut *state.borrow_mut();
            let surface = measure(&win, &s.canvas, s.renderer.config());
            apply_surface(&s.canvas, &surface);
            s.renderer.resize(surface);
        }
    });
    if window
        .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
        .is_ok()
    {
        closure.forget();
    }
}

fn start_loop(window: Window, state: Shared) {
    let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = frame.clone();
    let win = window.clone();

    *frame.borrow_mut() = Some(Closure::new(move |now: f64| {
        {
            let s = &mut *state.borrow_mut();
            let dt = s.clock.advance(now);
            let commands = s.renderer.tick(dt);
            s.backend.execute_all(&commands);
        }
        if let Some(callback) = next.borrow().as_ref() {
            let _ = win.request_animation_frame(callback.as_ref().unchecked_ref());
        }
    }));

    if let Some(callback) = frame.borrow().as_ref() {
        let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    }
}

/// Reveal `.section` elements the first time they scroll into view
///
/// Returns the number of observed sections.
#[wasm_bindgen(js_name = mountReveal)]
pub fn mount_reveal() -> usize {
    mount_reveal_inner().unwrap_or(0)
}

fn mount_reveal_inner() -> Option<usize> {
    let document = web_sys::window()?.document()?;
    let list = document.query_selector_all(SECTION_SELECTOR).ok()?;

    let mut sections: Vec<Element> = Vec::new();
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            sections.push(el);
        }
    }
    if sections.is_empty() {
        return Some(0);
    }

    let mut tracker = RevealTracker::new();
    for i in 0..sections.len() {
        tracker.observe(i.to_string());
    }

    let tracker = Rc::new(RefCell::new(tracker));
    let elements = Rc::new(sections);
    let callback = {
        let elements = elements.clone();
        Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, observer: IntersectionObserver| {
                let batch: Vec<Intersection> = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .filter_map(|entry| {
                        let target = entry.target();
                        let index = elements.iter().position(|el| *el == target)?;
                        Some(Intersection::new(index.to_string(), entry.is_intersecting()))
                    })
                    .collect();

                for key in tracker.borrow_mut().process(&batch) {
                    let Some(el) = key.parse::<usize>().ok().and_then(|i| elements.get(i)) else {
                        continue;
                    };
                    let _ = el.class_list().add_1(VISIBLE_CLASS);
                    observer.unobserve(el);
                }
            },
        )
    };

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init).ok()?;
    callback.forget();

    for el in elements.iter() {
        observer.observe(el);
    }
    Some(elements.len())
}

/// Start the net background for `preset` ("hero" or "landing", default hero)
///
/// Returns whether the effect was started. Nothing happens when the library
/// or the host element is missing.
#[wasm_bindgen(js_name = initBackdrop)]
pub fn init_backdrop(preset: Option<String>) -> bool {
    let preset = preset
        .as_deref()
        .and_then(BackdropPreset::parse)
        .unwrap_or_default();
    init_backdrop_inner(preset).unwrap_or(false)
}

fn init_backdrop_inner(preset: BackdropPreset) -> Option<bool> {
    let window = web_sys::window()?;
    let document = window.document()?;
    let options = preset.options();

    let vanta = js_sys::Reflect::get(&window, &JsValue::from_str("VANTA")).ok()?;
    let net = if vanta.is_object() {
        js_sys::Reflect::get(&vanta, &JsValue::from_str("NET"))
            .ok()
            .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
    } else {
        None
    };
    let element_present = options
        .element_id()
        .and_then(|id| document.get_element_by_id(id))
        .is_some();

    if !should_initialise(net.is_some(), element_present) {
        return Some(false);
    }
    let net = net?;

    let json = serde_json::to_string(&options).ok()?;
    let arg = js_sys::JSON::parse(&json).ok()?;
    Some(net.call1(&vanta, &arg).is_ok())
}

fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
