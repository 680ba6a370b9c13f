// Everything that needs a live browser: loading and shrinking images, reading their
// pixels back through an offscreen canvas, and the window's frame timers

use crate::render_loop::FrameScheduler;
use crate::sampler::Bitmap;
use crate::utils;
use js_sys::Promise;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlImageElement, Window};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global `window` exists"))
}

fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

fn create_canvas(width: u32, height: u32) -> Result<HtmlCanvasElement, JsValue> {
    let canvas = document()?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(JsValue::from)?;
    canvas.set_width(width);
    canvas.set_height(height);
    Ok(canvas)
}

// None when the environment can't hand out a 2d context
fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// Resolves once `src` has loaded into a fresh image element, rejects on its `onerror`.
async fn load(src: &str) -> Result<HtmlImageElement, JsValue> {
    let img = HtmlImageElement::new()?;
    img.set_cross_origin(Some("anonymous"));

    let loaded = Promise::new(&mut |resolve, reject| {
        img.set_onload(Some(&resolve));
        img.set_onerror(Some(&reject));
    });
    img.set_src(src);

    let outcome = JsFuture::from(loaded).await;
    img.set_onload(None);
    img.set_onerror(None);
    outcome?;
    Ok(img)
}

/// Loads the image at `url`. Images wider than `max_width` are redrawn at that
/// width, aspect kept, and reloaded from a PNG data URL.
pub async fn load_image(url: &str, max_width: Option<u32>) -> Result<HtmlImageElement, JsValue> {
    let img = load(url).await?;

    let max_width = match max_width {
        Some(max_width) if max_width > 0 && img.width() > max_width => max_width,
        _ => return Ok(img),
    };

    let height = (max_width as f64 / img.width() as f64 * img.height() as f64) as u32;
    let canvas = create_canvas(max_width, height.max(1))?;
    let ctx = match context_2d(&canvas) {
        Some(ctx) => ctx,
        None => {
            utils::log_error("no 2d context to shrink the image with, keeping full size");
            return Ok(img);
        }
    };
    ctx.draw_image_with_html_image_element_and_dw_and_dh(
        &img,
        0.0,
        0.0,
        canvas.width() as f64,
        canvas.height() as f64,
    )?;
    let data_url = canvas.to_data_url_with_type("image/png")?;
    load(&data_url).await
}

/// Reads the RGBA pixels of `img` at its own size. If they can't be read
/// (no 2d context, tainted canvas) the bitmap comes back with no pixels.
pub fn image_bitmap(img: &HtmlImageElement) -> Bitmap {
    let width = img.width();
    let height = img.height();
    match read_pixels(img, width, height) {
        Ok(pixels) => Bitmap::new(width, height, pixels),
        Err(err) => {
            utils::log_error(&format!("could not read image pixels: {:?}", err));
            Bitmap::empty(width, height)
        }
    }
}

fn read_pixels(img: &HtmlImageElement, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    let canvas = create_canvas(width, height)?;
    let ctx = context_2d(&canvas).ok_or_else(|| JsValue::from_str("2d context unavailable"))?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)?;
    let image_data = ctx.get_image_data(0.0, 0.0, width as f64, height as f64)?;
    Ok(image_data.data().0)
}

#[derive(Copy, Clone)]
enum TimerKind {
    Timeout,
    AnimationFrame,
}

type Slot = Closure<dyn FnMut()>;

// JS closures handed to the window, kept until they have fired or been cancelled
#[derive(Default)]
struct Pending {
    timeouts: HashMap<i32, Slot>,
    animation_frames: HashMap<i32, Slot>,
    // fired or cancelled, dropped once none of them can be running
    spent: Vec<Slot>,
    firing: bool,
}

impl Pending {
    fn slots(&mut self, timer: TimerKind) -> &mut HashMap<i32, Slot> {
        match timer {
            TimerKind::Timeout => &mut self.timeouts,
            TimerKind::AnimationFrame => &mut self.animation_frames,
        }
    }

    fn retire(&mut self, timer: TimerKind, handle: i32) {
        if let Some(slot) = self.slots(timer).remove(&handle) {
            self.spent.push(slot);
        }
    }

    fn take_spent(&mut self) -> Vec<Slot> {
        std::mem::take(&mut self.spent)
    }
}

/// `setTimeout` and `requestAnimationFrame` on the global window.
pub struct BrowserScheduler {
    window: Window,
    pending: Rc<RefCell<Pending>>,
}

impl BrowserScheduler {
    pub fn new() -> Result<BrowserScheduler, JsValue> {
        Ok(BrowserScheduler {
            window: window()?,
            pending: Rc::new(RefCell::new(Pending::default())),
        })
    }

    /// JS closures this scheduler still owns, pending or waiting to be freed.
    pub fn held_closures(&self) -> usize {
        let pending = self.pending.borrow();
        pending.timeouts.len() + pending.animation_frames.len() + pending.spent.len()
    }

    fn schedule<F>(&self, timer: TimerKind, callback: Box<dyn FnOnce()>, register: F) -> Result<i32, String>
    where
        F: FnOnce(&js_sys::Function) -> Result<i32, JsValue>,
    {
        let spent = {
            let mut pending = self.pending.borrow_mut();
            if pending.firing {
                Vec::new()
            } else {
                pending.take_spent()
            }
        };
        drop(spent);

        let handle = Rc::new(Cell::new(None));
        let closure = {
            let handle = handle.clone();
            let pending = Rc::downgrade(&self.pending);
            let mut callback = Some(callback);
            Closure::wrap(Box::new(move || {
                let pending = match pending.upgrade() {
                    Some(pending) => pending,
                    None => return,
                };
                let spent = {
                    let mut pending = pending.borrow_mut();
                    pending.firing = true;
                    pending.take_spent()
                };
                drop(spent);

                if let Some(callback) = callback.take() {
                    callback();
                }

                let mut pending = pending.borrow_mut();
                pending.firing = false;
                if let Some(handle) = handle.get() {
                    pending.retire(timer, handle);
                }
            }) as Box<dyn FnMut()>)
        };

        let id = register(closure.as_ref().unchecked_ref()).map_err(describe)?;
        handle.set(Some(id));
        self.pending.borrow_mut().slots(timer).insert(id, closure);
        Ok(id)
    }

    fn cancel(&self, timer: TimerKind, handle: i32) {
        self.pending.borrow_mut().retire(timer, handle);
    }
}

fn describe(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

impl FrameScheduler for BrowserScheduler {
    fn set_timeout(&self, delay_ms: i32, callback: Box<dyn FnOnce()>) -> Result<i32, String> {
        self.schedule(TimerKind::Timeout, callback, |f| {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(f, delay_ms)
        })
    }

    fn clear_timeout(&self, handle: i32) {
        self.window.clear_timeout_with_handle(handle);
        self.cancel(TimerKind::Timeout, handle);
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) -> Result<i32, String> {
        self.schedule(TimerKind::AnimationFrame, callback, |f| {
            self.window.request_animation_frame(f)
        })
    }

    fn cancel_animation_frame(&self, handle: i32) {
        if let Err(err) = self.window.cancel_animation_frame(handle) {
            utils::log_error(&format!("cancelAnimationFrame failed: {}", describe(err)));
        }
        self.cancel(TimerKind::AnimationFrame, handle);
    }
}
