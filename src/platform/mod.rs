// ── Platform abstraction layer ────────────────────────────────────────────────
//
// Everything that talks to the OS lives under here.  No `unsafe` in this
// file; all Win32 FFI is confined to the `win32` sub-module and never leaks
// outward, so the rest of the crate sees only safe functions and the typed
// events in `app`.

pub mod win32;
