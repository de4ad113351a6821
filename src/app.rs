// ── Event routing core ────────────────────────────────────────────────────────
//
// The decision logic of the application: which decoded window events produce
// which side effects.  Pure Rust, no `windows` imports; the raw-parameter
// translation lives in `platform::win32::window`, and side effects go through
// the injected `Shell` capability.  Everything here runs under `cargo test`
// on any host.

// ── Control identity ──────────────────────────────────────────────────────────

/// Identifier assigned to a child control at creation time and echoed back in
/// the low word of every command message the control sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ControlId(pub(crate) u16);

/// The push button.  The only control this application creates.
pub(crate) const BUTTON_ID: ControlId = ControlId(1);

// ── Decoded events ────────────────────────────────────────────────────────────

/// Notification code carried in the high word of a command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Notification {
    /// The control was activated (`BN_CLICKED` for a button).
    Clicked,
    /// Any other notification code, preserved for inspection but unhandled.
    Other(u16),
}

/// A window message the router knows about, decoded from its raw form.
///
/// Messages outside these two never reach the router; the window procedure
/// hands them straight to the OS default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowEvent {
    /// A command notification from a child control.
    Command {
        source: ControlId,
        notification: Notification,
    },
    /// The main window is being torn down.
    Destroy,
}

/// What the window procedure should report to the OS after routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Event consumed; report success (zero) to the OS.
    Handled,
    /// Not ours; defer to the OS default window procedure.
    Delegate,
}

// ── Shell capability ──────────────────────────────────────────────────────────

/// Side effects the router may request from its host.
///
/// `platform::win32` implements this with real Win32 calls (`MessageBoxW`,
/// `PostQuitMessage`); tests substitute a recording fake so the routing rules
/// can be asserted without a window system.
pub(crate) trait Shell {
    /// Show a modal dialog owned by the main window and wait for dismissal.
    fn show_dialog(&mut self, title: &str, body: &str);
    /// Ask the message loop to stop once the current message is handled.
    fn request_quit(&mut self);
}

// ── Dialog text ───────────────────────────────────────────────────────────────

/// Title of the dialog shown in response to a button click.
pub(crate) const CLICK_DIALOG_TITLE: &str = "Button Clicked";

/// Body of the dialog shown in response to a button click.
pub(crate) const CLICK_DIALOG_BODY: &str = "you clicked button";

// ── Routing ───────────────────────────────────────────────────────────────────

/// Route one decoded event, requesting side effects through `shell`.
///
/// The complete rule set:
///   • a click from the push button shows the click dialog, handled;
///   • any other command is left to the OS default, no side effects;
///   • destroy requests quit exactly once, handled.
///
/// Routing is stateless (the application holds no state beyond OS handles),
/// so routing the same event twice behaves identically both times.
pub(crate) fn route(event: WindowEvent, shell: &mut dyn Shell) -> Outcome {
    match event {
        WindowEvent::Command { source: BUTTON_ID, notification: Notification::Clicked } => {
            shell.show_dialog(CLICK_DIALOG_TITLE, CLICK_DIALOG_BODY);
            Outcome::Handled
        }
        WindowEvent::Command { .. } => Outcome::Delegate,
        WindowEvent::Destroy => {
            shell.request_quit();
            Outcome::Handled
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Recording fake: captures every side effect the router requests.
    struct RecordingShell {
        dialogs: Vec<(String, String)>,
        quit_requests: u32,
    }

    impl RecordingShell {
        fn new() -> Self {
            Self {
                dialogs: Vec::new(),
                quit_requests: 0,
            }
        }
    }

    impl Shell for RecordingShell {
        fn show_dialog(&mut self, title: &str, body: &str) {
            self.dialogs.push((title.to_owned(), body.to_owned()));
        }

        fn request_quit(&mut self) {
            self.quit_requests += 1;
        }
    }

    fn command(source: ControlId, notification: Notification) -> WindowEvent {
        WindowEvent::Command {
            source,
            notification,
        }
    }

    #[test]
    fn button_click_shows_exactly_one_dialog() {
        let mut shell = RecordingShell::new();
        let outcome = route(command(BUTTON_ID, Notification::Clicked), &mut shell);

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(shell.dialogs.len(), 1);
        assert_eq!(shell.dialogs[0].0, "Button Clicked");
        assert_eq!(shell.dialogs[0].1, "you clicked button");
        assert_eq!(shell.quit_requests, 0);
    }

    #[test]
    fn click_from_other_source_is_delegated() {
        let mut shell = RecordingShell::new();
        let outcome = route(command(ControlId(2), Notification::Clicked), &mut shell);

        assert_eq!(outcome, Outcome::Delegate);
        assert!(shell.dialogs.is_empty());
        assert_eq!(shell.quit_requests, 0);
    }

    #[test]
    fn non_click_notification_from_button_is_delegated() {
        // BN_SETFOCUS and friends arrive with the button's id but a
        // nonzero notification code.
        let mut shell = RecordingShell::new();
        let outcome = route(command(BUTTON_ID, Notification::Other(6)), &mut shell);

        assert_eq!(outcome, Outcome::Delegate);
        assert!(shell.dialogs.is_empty());
    }

    #[test]
    fn unrelated_command_is_delegated() {
        let mut shell = RecordingShell::new();
        let outcome = route(command(ControlId(40), Notification::Other(3)), &mut shell);

        assert_eq!(outcome, Outcome::Delegate);
        assert!(shell.dialogs.is_empty());
        assert_eq!(shell.quit_requests, 0);
    }

    #[test]
    fn destroy_requests_quit_exactly_once() {
        let mut shell = RecordingShell::new();
        let outcome = route(WindowEvent::Destroy, &mut shell);

        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(shell.quit_requests, 1);
        assert!(shell.dialogs.is_empty());
    }

    #[test]
    fn delegated_event_routes_identically_every_time() {
        let mut shell = RecordingShell::new();
        let event = command(ControlId(7), Notification::Other(1));
        for _ in 0..3 {
            assert_eq!(route(event, &mut shell), Outcome::Delegate);
        }
        assert!(shell.dialogs.is_empty());
        assert_eq!(shell.quit_requests, 0);
    }

    #[test]
    fn repeated_clicks_show_one_dialog_each() {
        let mut shell = RecordingShell::new();
        for _ in 0..2 {
            route(command(BUTTON_ID, Notification::Clicked), &mut shell);
        }
        assert_eq!(shell.dialogs.len(), 2);
    }
}
