use std::time::Duration;

use blockfall_engine::{Action, EngineConfig, GameEvent, GameSession};
use crossterm::event::{Event, KeyEventKind};
use log::debug;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
};

use super::input::{self, Command};
use crate::{
    observer::{Announcer, StackWatcher},
    tui::{App, RenderMode, Runtime},
    ui::widgets::{KeyBindingDisplay, SessionDisplay},
};

const MESSAGE_CAPACITY: usize = 32;

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    announcer: Announcer,
    stack: StackWatcher,
    fps: f64,
    show_ghost: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(config: &EngineConfig, fps: f64, show_ghost: bool) -> anyhow::Result<Self> {
        Ok(Self {
            session: GameSession::new(config)?,
            announcer: Announcer::new(MESSAGE_CAPACITY),
            stack: StackWatcher::default(),
            fps,
            show_ghost,
            is_exiting: false,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    fn dispatch(&mut self, action: Action) {
        let events = self.session.dispatch(action);
        self.observe(&events);
    }

    fn observe(&mut self, events: &[GameEvent]) {
        for event in events {
            debug!("event: {event:?}");
            if *event == GameEvent::Restarted {
                self.announcer.clear();
            }
            self.announcer.observe(event);
        }
        self.stack.update(self.session.state());
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(self.fps));
        runtime.set_render_mode(RenderMode::throttled_from_rate(self.fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        if key.kind == KeyEventKind::Release {
            return;
        }
        match input::command_for(key.code, self.session.state().status()) {
            Some(Command::Dispatch(action)) => self.dispatch(action),
            Some(Command::ToggleGhost) => self.show_ghost = !self.show_ghost,
            Some(Command::Quit) => self.is_exiting = true,
            None => {}
        }
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        let events = self.session.advance(elapsed);
        if !events.is_empty() {
            self.observe(&events);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let session_display =
            SessionDisplay::new(&self.session, &self.announcer, self.stack.alert())
                .show_ghost(self.show_ghost);
        let bindings = input::key_bindings(self.session.state().status());
        let help = KeyBindingDisplay::new(bindings);

        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help, help_area);
    }
}
