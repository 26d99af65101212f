mod bus;

pub use bus::EventBus;

use crate::tools::Mode;

/// Notifications the canvas raises for its host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasEvent {
    /// The dropper sampled a new primary color (`#rrggbb`)
    PrimaryColorChanged(String),
    /// The dropper sampled a new secondary color (`#rrggbb`)
    SecondaryColorChanged(String),
    ModeChanged {
        from: Mode,
        to: Mode,
    },
    /// A selection gesture finished and can be copied
    SelectionLocked {
        mode: Mode,
    },
    /// The text tool drew its buffer onto the canvas
    TextCommitted {
        text: String,
    },
}

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &CanvasEvent);
}
