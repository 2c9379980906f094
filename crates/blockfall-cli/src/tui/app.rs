use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use super::Runtime;

/// Application driven by [`Runtime::run`].
pub trait App {
    /// Called once before the first event. Configure tick and render rates here.
    fn init(&mut self, runtime: &mut Runtime);

    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event);

    /// Advances the application by one frame.
    ///
    /// `elapsed` is the real time since the previous frame, which may be
    /// longer than the tick interval when the terminal is slow.
    fn update(&mut self, runtime: &mut Runtime, elapsed: Duration);

    fn draw(&self, frame: &mut Frame);
}
