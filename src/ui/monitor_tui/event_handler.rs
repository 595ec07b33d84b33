use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::system_monitor::Control;

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Quit the application
    Quit,
    /// Pause or resume timed sampling
    TogglePause,
    /// Sample once right now
    Refresh,
    /// Start a bounded logging session
    StartLogging,
    /// No action
    None,
}

impl MonitorEvent {
    pub fn from_key(key: KeyEvent) -> Self {
        if key.kind != KeyEventKind::Press {
            return MonitorEvent::None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                MonitorEvent::Quit
            }
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('p') | KeyCode::Char(' ') => MonitorEvent::TogglePause,
            KeyCode::Char('r') => MonitorEvent::Refresh,
            KeyCode::Char('l') => MonitorEvent::StartLogging,
            _ => MonitorEvent::None,
        }
    }

    /// The scheduler signal this event maps to, if any.
    pub fn control(self) -> Option<Control> {
        match self {
            MonitorEvent::Quit => Some(Control::Shutdown),
            MonitorEvent::TogglePause => Some(Control::TogglePause),
            MonitorEvent::Refresh => Some(Control::Refresh),
            MonitorEvent::StartLogging => Some(Control::StartLogging),
            MonitorEvent::None => None,
        }
    }
}
