use std::io::Write;
use std::sync::Mutex;

use crate::contract::{CoreEvent, LauncherView, ShellCommand};
use crate::transport::encode_event;

/// The host window: visibility, real input focus, and whatever draws the
/// launcher view. The controller never touches platform windowing itself.
pub trait OverlayShell {
    fn apply(&self, command: ShellCommand);
    fn publish(&self, view: &LauncherView);
}

/// Forwards everything as JSON lines to the host glue on the other end of
/// `writer` (stdout in the runtime).
pub struct JsonLinesShell<W: Write> {
    writer: Mutex<W>,
}

impl<W: Write> JsonLinesShell<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_event(&self, event: CoreEvent) {
        let line = encode_event(event);
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(error) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracing::warn!(%error, "failed to write to host");
        }
    }
}

impl<W: Write> OverlayShell for JsonLinesShell<W> {
    fn apply(&self, command: ShellCommand) {
        self.write_event(CoreEvent::Shell(command));
    }

    fn publish(&self, view: &LauncherView) {
        self.write_event(CoreEvent::View(view.clone()));
    }
}
