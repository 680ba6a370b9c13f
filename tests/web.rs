//! Test suite for the Web and headless browsers.

#![cfg(target_arch = "wasm32")]

extern crate wasm_bindgen_test;
use image_particles::browser::{self, BrowserScheduler};
use image_particles::render_loop::FrameScheduler;
use image_particles::ParticleCanvas;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

wasm_bindgen_test_configure!(run_in_browser);

// 2x1 PNG: one white pixel, one black pixel
const TWO_PIXELS: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAIAAAABCAYAAAD0In+KAAAAD0lEQVR4nGP4DwQMDAz/ARruBPywhCTXAAAAAElFTkSuQmCC";

fn context(width: u32, height: u32) -> CanvasRenderingContext2d {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas = document
        .create_element("canvas")
        .unwrap()
        .dyn_into::<HtmlCanvasElement>()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    canvas
        .get_context("2d")
        .unwrap()
        .unwrap()
        .dyn_into::<CanvasRenderingContext2d>()
        .unwrap()
}

#[wasm_bindgen_test]
fn pixels_become_particles() {
    let mut canvas = ParticleCanvas::new(context(100, 100), 40.0).unwrap();
    let pixels = vec![255, 255, 255, 255, 0, 0, 0, 255, 200, 200, 200, 255];
    let count = canvas.set_pixels(3, 1, pixels, 90.0, 50.0);
    assert_eq!(count, 2);
    assert_eq!(canvas.particle_count(), 2);

    canvas.set_cursor(1.0, 1.0);
    canvas.render_frame();
    canvas.clear_cursor();
    canvas.render_frame();
}

#[wasm_bindgen_test]
fn stop_before_and_after_start() {
    let canvas = ParticleCanvas::new(context(10, 10), 40.0).unwrap();
    canvas.stop();
    assert!(!canvas.is_running());
    canvas.start();
    assert!(canvas.is_running());
    canvas.stop();
    canvas.stop();
    assert!(!canvas.is_running());
}

#[wasm_bindgen_test]
async fn loaded_image_is_sampled() {
    let img = browser::load_image(TWO_PIXELS, None).await.unwrap();
    assert_eq!(img.width(), 2);

    let bitmap = browser::image_bitmap(&img);
    assert_eq!(bitmap.pixels.len(), 8);

    let mut canvas = ParticleCanvas::new(context(50, 50), 40.0).unwrap();
    assert_eq!(canvas.set_image(&img, 40.0, 128.0), 1);
}

#[wasm_bindgen_test]
async fn wide_images_are_shrunk() {
    let img = browser::load_image(TWO_PIXELS, Some(1)).await.unwrap();
    assert_eq!(img.width(), 1);
}

#[wasm_bindgen_test]
async fn broken_urls_reject() {
    assert!(browser::load_image("data:image/png;base64,AAAA", None)
        .await
        .is_err());
}

#[wasm_bindgen_test]
fn cancelled_callbacks_are_released() {
    let scheduler = BrowserScheduler::new().unwrap();
    for _ in 0..5 {
        let timeout = scheduler.set_timeout(60_000, Box::new(|| {})).unwrap();
        scheduler.clear_timeout(timeout);
        assert_eq!(scheduler.held_closures(), 1);

        let frame = scheduler.request_animation_frame(Box::new(|| {})).unwrap();
        scheduler.cancel_animation_frame(frame);
        assert_eq!(scheduler.held_closures(), 1);
    }
}
