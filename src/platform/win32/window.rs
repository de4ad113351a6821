// ── Main window ───────────────────────────────────────────────────────────────
//
// Responsibilities in this file (unsafe confined here):
//   • Register the main window class.
//   • Create the top-level window and its push-button child.
//   • Run the Win32 message loop.
//   • Decode raw messages into `app::WindowEvent`s and route them.
//   • Implement `app::Shell` with real Win32 calls.
//   • Expose a safe error-dialog helper for use by main().

#![allow(unsafe_code)]

use std::ffi::c_void;

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        Graphics::Gdi::{UpdateWindow, COLOR_WINDOW, HBRUSH},
        System::LibraryLoader::GetModuleHandleW,
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, LoadCursorW,
            LoadIconW, MessageBoxW, PostQuitMessage, RegisterClassExW, ShowWindow,
            TranslateMessage, BN_CLICKED, BS_PUSHBUTTON, CW_USEDEFAULT, HMENU, IDC_ARROW,
            IDI_APPLICATION, MB_ICONERROR, MB_OK, MSG, SW_SHOWDEFAULT, WINDOW_EX_STYLE,
            WINDOW_STYLE, WM_COMMAND, WM_DESTROY, WNDCLASSEXW, WNDCLASS_STYLES, WS_CHILD,
            WS_OVERLAPPEDWINDOW, WS_VISIBLE,
        },
    },
};

use super::dpi;
use crate::{
    app::{self, ControlId, Notification, Outcome, Shell, WindowEvent},
    config::{self, WindowConfig},
    error::{Result, TackError},
};

// ── Window identity ───────────────────────────────────────────────────────────

/// Atom name used to register the main window class.
const CLASS_NAME: PCWSTR = w!("TackMainWindow");

/// System window class of the push-button control.
const BUTTON_CLASS: PCWSTR = w!("BUTTON");

// ── Public API ────────────────────────────────────────────────────────────────

/// Register the window class, create the window and its button, and drive the
/// message loop until the user closes the application.
///
/// Window title and geometry come from `config::load()`; all fixed dimensions
/// are 96-DPI values scaled by the system DPI at creation time.
pub(crate) fn run() -> Result<()> {
    let t0 = std::time::Instant::now();

    dpi::init();
    let config = config::load();
    let system_dpi = dpi::get_system_dpi();
    log::debug!("starting: {}x{} at {system_dpi} dpi", config.width, config.height);

    // SAFETY: GetModuleHandleW(None) returns the .exe's own HMODULE, which is
    // always valid for the process lifetime and never fails in practice.
    let hmodule = unsafe { GetModuleHandleW(None) }.map_err(TackError::from)?;

    // HINSTANCE and HMODULE represent the same underlying value on Windows
    // (guaranteed by the Win32 ABI); the explicit field conversion compiles
    // whether or not the crate keeps them distinct types.
    let hinstance = HINSTANCE(hmodule.0);

    register_class(hinstance)?;
    let hwnd = create_window(hinstance, &config, system_dpi)?;
    create_button(hwnd, hinstance, &config, system_dpi)?;

    // SAFETY: hwnd was just returned by CreateWindowExW and is valid.
    // ShowWindow returns the previous visibility state and UpdateWindow a
    // success BOOL; both are intentionally ignored here.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOWDEFAULT);
        let _ = UpdateWindow(hwnd);
    }

    log::debug!("window visible in {:.1} ms", t0.elapsed().as_secs_f64() * 1000.0);

    message_loop()
}

/// Show a modal error dialog with the given message.
///
/// Safe to call from any context; performs the UTF-16 conversion internally.
/// Used by `main()` when `run()` returns an error.
pub(crate) fn show_error_dialog(message: &str) {
    let msg_wide = wide(message);
    let title_wide = wide("Tack - Fatal Error");

    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // HWND::default() (null) means the dialog has no owner window.
    // Return value (button pressed) is intentionally unused for an error dialog.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// Encode `s` as a null-terminated UTF-16 buffer for PCWSTR parameters.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

// ── Window class registration ─────────────────────────────────────────────────

fn register_class(hinstance: HINSTANCE) -> Result<()> {
    // SAFETY: LoadIconW with IDI_APPLICATION loads the built-in application
    // icon resource, which exists on all Windows versions.
    let icon = unsafe { LoadIconW(None, IDI_APPLICATION) }.map_err(TackError::from)?;

    // SAFETY: LoadCursorW with IDC_ARROW loads the built-in arrow cursor,
    // likewise guaranteed to exist.
    let cursor = unsafe { LoadCursorW(None, IDC_ARROW) }.map_err(TackError::from)?;

    let wndclass = WNDCLASSEXW {
        // WNDCLASSEXW is ~72 bytes; the cast to u32 is always lossless.
        cbSize: std::mem::size_of::<WNDCLASSEXW>() as u32,
        // No repaint styles: nothing in this window redraws on resize.
        style: WNDCLASS_STYLES::default(),
        lpfnWndProc: Some(wnd_proc),
        cbClsExtra: 0,
        cbWndExtra: 0,
        hInstance: hinstance,
        hIcon: icon,
        hCursor: cursor,
        // System window-background color; hbrBackground takes the color
        // index + 1 when it is not a real brush handle.
        hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut c_void),
        lpszMenuName: PCWSTR::null(),
        lpszClassName: CLASS_NAME,
        hIconSm: icon,
    };

    // SAFETY: wndclass is fully initialised with valid handles;
    // CLASS_NAME is a valid null-terminated UTF-16 string literal.
    let atom = unsafe { RegisterClassExW(&wndclass) };
    if atom == 0 {
        return Err(last_error("RegisterClassExW"));
    }

    Ok(())
}

// ── Window creation ───────────────────────────────────────────────────────────

fn create_window(hinstance: HINSTANCE, config: &WindowConfig, system_dpi: u32) -> Result<HWND> {
    let title_wide = wide(&config.title);

    // SAFETY: CLASS_NAME was registered above; hinstance is the exe's module.
    // None parent creates a top-level window; None menu because there is none.
    // title_wide stays allocated for the duration of the call.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            CLASS_NAME,
            PCWSTR(title_wide.as_ptr()),
            WS_OVERLAPPEDWINDOW | WS_VISIBLE,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            dpi::scale(config.width, system_dpi),
            dpi::scale(config.height, system_dpi),
            None,
            None,
            hinstance,
            None,
        )
    }
    .map_err(TackError::from)?;

    Ok(hwnd)
}

// ── Button creation ───────────────────────────────────────────────────────────

fn create_button(
    parent: HWND,
    hinstance: HINSTANCE,
    config: &WindowConfig,
    system_dpi: u32,
) -> Result<HWND> {
    let button = &config.button;
    let label_wide = wide(&button.label);

    // SAFETY: parent was just created; "BUTTON" is a system class that is
    // always registered.  The control id passed through the HMENU parameter
    // is how WM_COMMAND identifies this button later.  label_wide stays
    // allocated for the duration of the call.
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            BUTTON_CLASS,
            PCWSTR(label_wide.as_ptr()),
            WS_CHILD | WS_VISIBLE | WINDOW_STYLE(BS_PUSHBUTTON as u32),
            dpi::scale(button.x, system_dpi),
            dpi::scale(button.y, system_dpi),
            dpi::scale(button.width, system_dpi),
            dpi::scale(button.height, system_dpi),
            parent,
            HMENU(app::BUTTON_ID.0 as usize as *mut c_void),
            hinstance,
            None,
        )
    }
    .map_err(TackError::from)?;

    Ok(hwnd)
}

// ── Message loop ──────────────────────────────────────────────────────────────

fn message_loop() -> Result<()> {
    let mut msg = MSG::default();

    loop {
        // SAFETY: &mut msg is a valid MSG pointer; None retrieves messages for
        // all windows on this thread; the 0,0 filter accepts all messages.
        let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };

        match ret.0 {
            // GetMessageW returns -1 on error.
            -1 => return Err(last_error("GetMessageW")),
            // Returns 0 when WM_QUIT is retrieved; exit the loop cleanly.
            0 => break,
            // Any other value: a normal message to dispatch.
            _ => unsafe {
                // SAFETY: msg was populated by a successful GetMessageW call.
                // TranslateMessage return value (whether it generated WM_CHAR)
                // and DispatchMessageW's LRESULT are intentionally unused.
                let _ = TranslateMessage(&msg);
                let _ = DispatchMessageW(&msg);
            },
        }
    }

    Ok(())
}

// ── Message decoding ──────────────────────────────────────────────────────────

/// Map a raw message to the typed event the router understands.
///
/// `None` means "not ours": the window procedure forwards the message to
/// `DefWindowProcW` untouched.  For WM_COMMAND the low word of `wparam`
/// carries the source control id and the high word the notification code.
fn decode(msg: u32, wparam: WPARAM) -> Option<WindowEvent> {
    match msg {
        WM_COMMAND => {
            let source = ControlId((wparam.0 & 0xFFFF) as u16);
            let code = ((wparam.0 >> 16) & 0xFFFF) as u32;
            let notification = if code == BN_CLICKED {
                Notification::Clicked
            } else {
                Notification::Other(code as u16)
            };
            Some(WindowEvent::Command { source, notification })
        }
        WM_DESTROY => Some(WindowEvent::Destroy),
        _ => None,
    }
}

// ── Shell implementation ──────────────────────────────────────────────────────

/// `app::Shell` backed by real Win32 calls, created fresh for each
/// window-procedure invocation.
struct Win32Shell {
    owner: HWND,
}

impl Shell for Win32Shell {
    fn show_dialog(&mut self, title: &str, body: &str) {
        let body_wide = wide(body);
        let title_wide = wide(title);

        // SAFETY: body_wide and title_wide are valid null-terminated UTF-16
        // strings that remain allocated for the duration of the MessageBoxW
        // call; owner is the window whose procedure we are currently inside.
        // Return value (button pressed) is intentionally unused.
        unsafe {
            let _ = MessageBoxW(
                self.owner,
                PCWSTR(body_wide.as_ptr()),
                PCWSTR(title_wide.as_ptr()),
                MB_OK,
            );
        }
    }

    fn request_quit(&mut self) {
        // SAFETY: PostQuitMessage is always safe to call from a window
        // procedure; it posts WM_QUIT to the thread's message queue.
        unsafe { PostQuitMessage(0) };
    }
}

// ── Window procedure ──────────────────────────────────────────────────────────

// SAFETY: wnd_proc is registered as lpfnWndProc in WNDCLASSEXW.
// Windows guarantees that hwnd, msg, wparam, and lparam are valid for the
// lifetime of this call; we must not store hwnd beyond the message handler.
unsafe extern "system" fn wnd_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match decode(msg, wparam) {
        Some(event) => {
            let mut shell = Win32Shell { owner: hwnd };
            match app::route(event, &mut shell) {
                Outcome::Handled => LRESULT(0),
                // A command that is not ours (wrong source or notification):
                // let the OS default processing have it.
                Outcome::Delegate => DefWindowProcW(hwnd, msg, wparam, lparam),
            }
        }
        // Default processing for all messages the router does not know.
        // SAFETY: hwnd and message parameters are valid, provided by Windows.
        None => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

// ── Error helpers ─────────────────────────────────────────────────────────────

/// Capture the current Win32 last-error code and wrap it in a `TackError`.
///
/// Call immediately after a Win32 function that signals failure; `GetLastError`
/// reads thread-local state that can be overwritten by any subsequent API call.
fn last_error(function: &'static str) -> TackError {
    // SAFETY: GetLastError reads thread-local state set by the last Win32 call.
    // It is always safe to call and never fails.
    let code = unsafe { GetLastError() };
    TackError::Win32 {
        function,
        code: code.0,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn command_wparam(id: u16, code: u16) -> WPARAM {
        WPARAM(((code as usize) << 16) | id as usize)
    }

    #[test]
    fn command_decodes_source_and_notification() {
        let event = decode(WM_COMMAND, command_wparam(1, 0));
        assert_eq!(
            event,
            Some(WindowEvent::Command {
                source: ControlId(1),
                notification: Notification::Clicked,
            })
        );
    }

    #[test]
    fn nonzero_notification_code_is_preserved() {
        let event = decode(WM_COMMAND, command_wparam(1, 6));
        assert_eq!(
            event,
            Some(WindowEvent::Command {
                source: ControlId(1),
                notification: Notification::Other(6),
            })
        );
    }

    #[test]
    fn destroy_decodes_regardless_of_wparam() {
        assert_eq!(decode(WM_DESTROY, WPARAM(0)), Some(WindowEvent::Destroy));
        assert_eq!(decode(WM_DESTROY, WPARAM(77)), Some(WindowEvent::Destroy));
    }

    #[test]
    fn unrelated_messages_are_not_ours() {
        use windows::Win32::UI::WindowsAndMessaging::{WM_PAINT, WM_SIZE};
        // Repeated decodes of the same message stay None (pure delegation).
        for _ in 0..2 {
            assert_eq!(decode(WM_PAINT, WPARAM(0)), None);
            assert_eq!(decode(WM_SIZE, WPARAM(0)), None);
        }
    }

    #[test]
    fn wide_strings_are_null_terminated() {
        let buf = wide("hi");
        assert_eq!(buf, vec![b'h' as u16, b'i' as u16, 0]);
    }
}
