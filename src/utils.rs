use rand::Rng;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// Console logging on wasm, stderr everywhere else so native tests never call into JS
#[cfg(target_arch = "wasm32")]
pub fn log(message: &str) {
    web_sys::console::log_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(message: &str) {
    eprintln!("{}", message);
}

#[cfg(target_arch = "wasm32")]
pub fn log_error(message: &str) {
    web_sys::console::error_1(&message.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log_error(message: &str) {
    eprintln!("error: {}", message);
}

/// Draws a value in `[from, to)`. When the width of the range is a whole
/// number the draw is floored, so `random_in_range(rng, 100.0, 200.0)` only
/// ever yields integers.
pub fn random_in_range<R: Rng + ?Sized>(rng: &mut R, from: f64, to: f64) -> f64 {
    let difference = (to - from).abs();
    let random = rng.gen::<f64>() * difference;
    if difference.floor() == difference {
        from + random.floor()
    } else {
        from + random
    }
}

/// Linearly maps `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn map_range(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}
