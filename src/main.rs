// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI).
// Each unsafe block there MUST carry a `// SAFETY:` comment.
#![deny(unsafe_code)]

// Release builds run as a GUI application (no console window).
// Debug builds keep the console so that log output is visible.
#![cfg_attr(all(not(debug_assertions), windows), windows_subsystem = "windows")]

// The OS-independent modules build on every host so that `cargo test` can
// exercise them without a Windows machine; outside Windows nothing calls
// them, hence the dead_code allowance.
#[cfg_attr(not(windows), allow(dead_code))]
mod app;
#[cfg_attr(not(windows), allow(dead_code))]
mod config;
#[cfg_attr(not(windows), allow(dead_code))]
mod error;
#[cfg(windows)]
mod platform;

#[cfg(windows)]
fn main() {
    env_logger::init();

    if let Err(e) = platform::win32::window::run() {
        // Startup failed before or during the message loop.
        // Show a modal error dialog; a GUI process has no console to print to.
        platform::win32::window::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

#[cfg(not(windows))]
fn main() {
    eprintln!("tack is a Win32 application; this host is not Windows.");
    std::process::exit(1);
}
