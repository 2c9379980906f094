use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

#[derive(Debug, Clone, derive_more::IsVariant, derive_more::From)]
pub(super) enum TuiEvent {
    /// Frame update, carrying the time since the previous one.
    Tick(Duration),
    Render,
    #[from]
    Crossterm(CrosstermEvent),
}
