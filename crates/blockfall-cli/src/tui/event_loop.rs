use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use super::event::TuiEvent;

/// When the screen is redrawn.
#[derive(Debug, Clone, Copy, Default)]
pub enum RenderMode {
    /// After every tick or terminal event.
    #[default]
    OnDirty,
    /// After changes, at most once per interval.
    Throttled(Duration),
}

impl RenderMode {
    #[must_use]
    pub fn throttled_from_rate(rate: f64) -> Self {
        Self::Throttled(Duration::from_secs_f64(1.0 / rate))
    }
}

/// Produces ticks, render requests, and terminal events in order.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    render_mode: RenderMode,
    last_tick: Instant,
    last_render: Option<Instant>,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl EventLoop {
    fn new(now: Instant) -> Self {
        Self {
            tick_interval: None,
            render_mode: RenderMode::default(),
            last_tick: now,
            last_render: None,
            dirty: true,
        }
    }

    /// Enables or disables ticks. Elapsed time is measured from this call.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
        self.last_tick = Instant::now();
    }

    pub(super) fn set_render_mode(&mut self, render_mode: RenderMode) {
        self.render_mode = render_mode;
    }

    /// Blocks until the next tick, render, or terminal event.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(elapsed) = self.due_tick(now) {
                self.last_tick = now;
                self.dirty = true;
                return Ok(TuiEvent::Tick(elapsed));
            }
            if self.render_due(now) {
                self.last_render = Some(now);
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now)
                && !event::poll(timeout)?
            {
                continue;
            }
            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn due_tick(&self, now: Instant) -> Option<Duration> {
        let interval = self.tick_interval?;
        let elapsed = now.saturating_duration_since(self.last_tick);
        (elapsed >= interval).then_some(elapsed)
    }

    fn render_due(&self, now: Instant) -> bool {
        if !self.dirty {
            return false;
        }
        match (self.render_mode, self.last_render) {
            (RenderMode::OnDirty, _) | (RenderMode::Throttled(_), None) => true,
            (RenderMode::Throttled(interval), Some(last)) => {
                now.saturating_duration_since(last) >= interval
            }
        }
    }

    /// Time to wait for terminal input before the next tick or render is due.
    ///
    /// `None` means wait indefinitely.
    fn compute_timeout(&self, now: Instant) -> Option<Duration> {
        let next_tick_at = self.tick_interval.map(|interval| self.last_tick + interval);
        let next_render_at = match (self.render_mode, self.last_render) {
            _ if !self.dirty => None,
            (RenderMode::OnDirty, _) | (RenderMode::Throttled(_), None) => Some(now),
            (RenderMode::Throttled(interval), Some(last)) => Some(last + interval),
        };
        let next_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_at.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    #[test]
    fn test_no_tick_without_interval() {
        let now = Instant::now();
        let events = EventLoop::new(now);
        assert_eq!(events.due_tick(now + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_tick_reports_real_elapsed_time() {
        let now = Instant::now();
        let mut events = EventLoop::new(now);
        events.tick_interval = Some(FRAME);

        assert_eq!(events.due_tick(now + Duration::from_millis(10)), None);
        // A late frame reports the full gap, not the nominal interval
        let late = Duration::from_millis(250);
        assert_eq!(events.due_tick(now + late), Some(late));
    }

    #[test]
    fn test_throttled_render() {
        let now = Instant::now();
        let mut events = EventLoop::new(now);
        events.render_mode = RenderMode::Throttled(FRAME);
        assert!(events.render_due(now));

        events.last_render = Some(now);
        assert!(!events.render_due(now + Duration::from_millis(5)));
        assert!(events.render_due(now + FRAME));

        events.dirty = false;
        assert!(!events.render_due(now + FRAME));
    }

    #[test]
    fn test_compute_timeout() {
        let now = Instant::now();
        let mut events = EventLoop::new(now);
        events.dirty = false;
        assert_eq!(events.compute_timeout(now), None);

        events.tick_interval = Some(FRAME);
        assert_eq!(events.compute_timeout(now), Some(FRAME));

        events.dirty = true;
        assert_eq!(events.compute_timeout(now), Some(Duration::ZERO));
    }
}
