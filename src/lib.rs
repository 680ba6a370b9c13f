pub mod browser;
pub mod color;
pub mod config;
pub mod field;
pub mod particle;
pub mod render_loop;
pub mod sampler;
pub mod surface;
mod utils;

use crate::browser::BrowserScheduler;
use crate::config::{EffectConfig, IdleMode};
use crate::field::ParticleField;
use crate::render_loop::RenderLoop;
use crate::sampler::Bitmap;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use vecmath::Vector2;
use wasm_bindgen::prelude::*;
use web_sys::{console, CanvasRenderingContext2d, HtmlImageElement};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

// Far enough away that no particle is ever in reach of it
const CURSOR_AWAY: Vector2<f64> = [-1.0e9, -1.0e9];

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

/// Loads an image, shrunk down to `max_width` when it is wider. The returned
/// promise rejects if the image (or its shrunk copy) fails to load.
#[wasm_bindgen]
pub async fn load_image(url: String, max_width: Option<u32>) -> Result<HtmlImageElement, JsValue> {
    browser::load_image(&url, max_width).await
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

#[wasm_bindgen]
pub struct ParticleCanvas {
    config: EffectConfig,
    ctx: CanvasRenderingContext2d,
    field: Rc<RefCell<ParticleField>>,
    cursor: Rc<Cell<Vector2<f64>>>,
    profiling: Rc<Cell<bool>>,
    render_loop: RenderLoop<BrowserScheduler>,
}

#[wasm_bindgen]
impl ParticleCanvas {
    #[wasm_bindgen(constructor)]
    pub fn new(ctx: CanvasRenderingContext2d, fps: f64) -> Result<ParticleCanvas, JsValue> {
        let config = EffectConfig {
            fps,
            ..EffectConfig::default()
        };
        let mut rng = rand::thread_rng();
        let field = Rc::new(RefCell::new(ParticleField::new(config.particle, &mut rng)));
        let cursor = Rc::new(Cell::new(CURSOR_AWAY));
        let profiling = Rc::new(Cell::new(false));

        let render_loop = {
            let field = field.clone();
            let cursor = cursor.clone();
            let profiling = profiling.clone();
            let mut surface = ctx.clone();
            RenderLoop::new(BrowserScheduler::new()?, config.fps, move || {
                let _timer = if profiling.get() {
                    Some(Timer::new("ParticleCanvas::frame"))
                } else {
                    None
                };
                field.borrow_mut().frame(&mut surface, cursor.get());
            })
        };

        Ok(ParticleCanvas {
            config,
            ctx,
            field,
            cursor,
            profiling,
            render_loop,
        })
    }

    /// Samples `img` into a fresh set of particles spread over `width` pixels.
    /// Returns how many particles were made.
    pub fn set_image(&mut self, img: &HtmlImageElement, width: f64, color_threshold: f64) -> u32 {
        let _timer = Timer::new("ParticleCanvas::set_image");
        let bitmap = browser::image_bitmap(img);
        self.rebuild(&bitmap, width, color_threshold)
    }

    /// Same as `set_image`, for RGBA pixels the page already has at hand.
    pub fn set_pixels(
        &mut self,
        bitmap_width: u32,
        bitmap_height: u32,
        pixels: Vec<u8>,
        width: f64,
        color_threshold: f64,
    ) -> u32 {
        let bitmap = Bitmap::new(bitmap_width, bitmap_height, pixels);
        self.rebuild(&bitmap, width, color_threshold)
    }

    pub fn set_cursor(&self, x: f64, y: f64) {
        self.cursor.set([x, y]);
    }

    // When the pointer leaves the canvas
    pub fn clear_cursor(&self) {
        self.cursor.set(CURSOR_AWAY);
    }

    pub fn set_idle_drift(&mut self, enabled: bool) {
        self.config.particle.idle = if enabled {
            IdleMode::drift()
        } else {
            IdleMode::Rest
        };
        self.reconfigure();
    }

    pub fn set_breathing(&mut self, enabled: bool) {
        self.config.particle.breathe = enabled;
        self.reconfigure();
    }

    /// Times every frame with `console.time` when enabled.
    pub fn set_profiling(&self, enabled: bool) {
        self.profiling.set(enabled);
    }

    pub fn start(&self) {
        self.render_loop.start();
    }

    pub fn stop(&self) {
        self.render_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn fps(&self) -> f64 {
        self.config.fps
    }

    /// Width the last image was spread over.
    pub fn target_width(&self) -> f64 {
        self.config.target_width
    }

    pub fn color_threshold(&self) -> f64 {
        self.config.color_threshold
    }

    pub fn particle_count(&self) -> u32 {
        self.field.borrow().len() as u32
    }

    /// Runs a single clear, update and draw pass outside of the loop.
    pub fn render_frame(&mut self) {
        self.field.borrow_mut().frame(&mut self.ctx, self.cursor.get());
    }
}

impl ParticleCanvas {
    fn rebuild(&mut self, bitmap: &Bitmap, width: f64, color_threshold: f64) -> u32 {
        self.config.target_width = width;
        self.config.color_threshold = color_threshold;

        let seeds = sampler::sample_seeds(bitmap, width, color_threshold);
        let mut field = self.field.borrow_mut();
        field.rebuild(seeds, &mut rand::thread_rng());
        utils::log(&format!(
            "built {} particles from a {}x{} image",
            field.len(),
            bitmap.width,
            bitmap.height
        ));
        field.len() as u32
    }

    fn reconfigure(&mut self) {
        self.field
            .borrow_mut()
            .reconfigure(self.config.particle, &mut rand::thread_rng());
    }
}
