use std::time::Duration;

use super::{
    App,
    event::TuiEvent,
    event_loop::{EventLoop, RenderMode},
};

/// Runs an [`App`] inside the terminal until it asks to exit.
#[derive(Debug, Default)]
pub struct Runtime {
    events: EventLoop,
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame rate (Hz). `None` disables frame updates.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.events.set_render_mode(mode);
    }

    /// Takes over the terminal and runs `app`.
    ///
    /// The terminal is restored on return, including on error.
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick(elapsed) => app.update(&mut self, elapsed),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, &event),
                }
            }
            Ok(())
        })
    }
}
