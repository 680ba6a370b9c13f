// Minimal set of 2d drawing primitives particles are rendered with, implemented
// for the browser's 2d canvas context

use crate::utils;
use std::f64::consts::PI;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub trait Surface {
    /// Wipe the whole drawing area.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    /// Fill a disc centered on the current origin.
    fn fill_disc(&mut self, radius: f64, fill_style: &str);
}

impl Surface for CanvasRenderingContext2d {
    // A context detached from any canvas has nothing to clear
    fn clear(&mut self) {
        if let Some(canvas) = self.canvas() {
            self.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn save(&mut self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&mut self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn translate(&mut self, x: f64, y: f64) {
        if let Err(err) = CanvasRenderingContext2d::translate(self, x, y) {
            utils::log_error(&format!("translate failed: {:?}", err));
        }
    }

    fn fill_disc(&mut self, radius: f64, fill_style: &str) {
        self.begin_path();
        if let Err(err) = self.arc(0.0, 0.0, radius, 0.0, PI * 2.0) {
            utils::log_error(&format!("arc failed: {:?}", err));
            return;
        }
        self.set_fill_style(&JsValue::from_str(fill_style));
        self.fill();
    }
}
