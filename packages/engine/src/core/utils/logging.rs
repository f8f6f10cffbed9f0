//! Console logging for the browser build.
//!
//! Core code only talks to the `log` facade. In wasm32 builds `install` routes it
//! into the devtools console; native hosts (tests, the CLI) bring their own logger.

#[cfg(target_arch = "wasm32")]
pub(crate) fn install(level: log::Level) {
    wasm_logger::init(wasm_logger::Config::new(level));
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn install(level: log::Level) {
    log::set_max_level(level.to_level_filter());
}

/// Banner printed straight to the console, independent of the log level.
pub(crate) fn banner(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&message.into());
    #[cfg(not(target_arch = "wasm32"))]
    log::info!("{message}");
}
