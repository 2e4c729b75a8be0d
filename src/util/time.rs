/// Get the current time in milliseconds since the UNIX epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn current_time_millis() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
        * 1000.0
}

/// Get the current time in milliseconds since the UNIX epoch
#[cfg(target_arch = "wasm32")]
pub fn current_time_millis() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|perf| perf.time_origin() + perf.now())
        .unwrap_or(0.0)
}

/// Whole milliseconds since the UNIX epoch, used to stamp exported files
pub fn timestamp_millis() -> u64 {
    current_time_millis() as u64
}
