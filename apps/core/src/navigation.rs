use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
}

/// Where keyboard input logically lands: the query field (idle) or a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    InputField,
    ResultRow(usize),
}

/// Side effect the host must apply to the real text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocusEffect {
    /// A row took focus: the field stops receiving keys but keeps its text
    /// and selection range.
    Release,
    /// Back to idle: the field takes focus with its whole text selected.
    FocusAndSelectAll,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub input_focus: Option<InputFocusEffect>,
    pub open: Option<usize>,
    pub selection_changed: bool,
    pub preview_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    focus: FocusTarget,
    preview_visible: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            focus: FocusTarget::InputField,
            preview_visible: false,
        }
    }
}

impl NavigationState {
    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn focused_index(&self) -> Option<usize> {
        match self.focus {
            FocusTarget::InputField => None,
            FocusTarget::ResultRow(index) => Some(index),
        }
    }

    /// Wire form of the focus: `-1` while the input field is focused.
    pub fn focused_index_signed(&self) -> i64 {
        self.focused_index().map_or(-1, |index| index as i64)
    }

    pub fn is_idle(&self) -> bool {
        self.focus == FocusTarget::InputField
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible
    }

    /// Down wraps past the last row; Up from the first row returns to the
    /// input instead of wrapping. Left/Right only act while a row is focused.
    pub fn on_key(&mut self, key: NavKey, len: usize) -> Transition {
        match key {
            NavKey::ArrowDown => {
                if len == 0 {
                    return Transition::default();
                }
                let next = match self.focus {
                    FocusTarget::InputField => 0,
                    FocusTarget::ResultRow(index) => (index + 1) % len,
                };
                self.move_focus(FocusTarget::ResultRow(next))
            }
            NavKey::ArrowUp => {
                if len == 0 {
                    return Transition::default();
                }
                let next = match self.focus {
                    FocusTarget::InputField => FocusTarget::ResultRow(len - 1),
                    FocusTarget::ResultRow(0) => FocusTarget::InputField,
                    FocusTarget::ResultRow(index) => FocusTarget::ResultRow(index - 1),
                };
                self.move_focus(next)
            }
            NavKey::ArrowRight => self.set_preview(true),
            NavKey::ArrowLeft => self.set_preview(false),
            NavKey::Enter => Transition {
                open: self.focused_index().filter(|index| *index < len),
                ..Transition::default()
            },
        }
    }

    /// The user typed into the query field.
    pub fn on_text_input(&mut self) -> Transition {
        let preview_changed = self.preview_visible;
        self.preview_visible = false;
        let selection_changed = !self.is_idle();
        self.focus = FocusTarget::InputField;
        Transition {
            input_focus: None,
            open: None,
            selection_changed,
            preview_changed,
        }
    }

    /// Pointer selection of a row.
    pub fn select(&mut self, index: usize, len: usize) -> Transition {
        if index >= len {
            return Transition::default();
        }
        self.move_focus(FocusTarget::ResultRow(index))
    }

    /// A new result set landed; focus always returns to the input.
    pub fn reset(&mut self) -> Transition {
        self.move_focus(FocusTarget::InputField)
    }

    fn set_preview(&mut self, visible: bool) -> Transition {
        if self.is_idle() || self.preview_visible == visible {
            return Transition::default();
        }
        self.preview_visible = visible;
        Transition {
            preview_changed: true,
            ..Transition::default()
        }
    }

    fn move_focus(&mut self, next: FocusTarget) -> Transition {
        let previous = self.focus;
        if previous == next {
            return Transition::default();
        }
        self.focus = next;

        let input_focus = match (previous, next) {
            (FocusTarget::InputField, FocusTarget::ResultRow(_)) => {
                Some(InputFocusEffect::Release)
            }
            (FocusTarget::ResultRow(_), FocusTarget::InputField) => {
                Some(InputFocusEffect::FocusAndSelectAll)
            }
            _ => None,
        };

        Transition {
            input_focus,
            open: None,
            selection_changed: true,
            preview_changed: false,
        }
    }
}
