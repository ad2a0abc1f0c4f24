use crate::contract::ShellCommand;

/// Window visibility as seen by the core. Hiding never touches the query,
/// results, or navigation; a summoned window comes back exactly as it left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    visible: bool,
}

impl OverlayState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Global hotkey toggle. A visible window that lost focus is brought
    /// back to front rather than hidden.
    pub fn summon(&mut self, has_focus: bool) -> ShellCommand {
        let hide = self.visible && has_focus;
        self.visible = !hide;
        if hide {
            ShellCommand::Hide
        } else {
            ShellCommand::ShowAndFocus
        }
    }

    /// Escape. Nothing to do when already hidden.
    pub fn dismiss(&mut self) -> Option<ShellCommand> {
        std::mem::replace(&mut self.visible, false).then_some(ShellCommand::Hide)
    }

    /// The file went to its handler; the launcher always gets out of the way.
    pub fn hide_after_open(&mut self) -> ShellCommand {
        self.visible = false;
        ShellCommand::Hide
    }
}
