//! Enumerations for TUI state management.

/// Which screen or overlay has the keyboard.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    Home,
    EditTask,
    Nav,
    Help,
    Confirm,
}

/// Which pane of the home screen has focus.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Focus {
    Form,
    List,
}
