use std::collections::VecDeque;

use crate::input::{InputGate, Key, KeyAction, KeySource, Modifiers};
use crate::render::{GraphicsContext, SoftwareContext};
use crate::Result;

use super::HostWindow;

#[derive(Debug, Clone, Copy)]
pub(crate) enum ScriptEvent {
    Key(Key, KeyAction, Modifiers),
    Close,
}

/// Headless window whose events come from a script, one batch per
/// `poll_events` call.
#[derive(Debug)]
pub(crate) struct ScriptedWindow {
    gfx: SoftwareContext,
    input: InputGate,
    script: VecDeque<Vec<ScriptEvent>>,
    close_requested: bool,
    pub(crate) frames_presented: usize,
}

impl ScriptedWindow {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            gfx: SoftwareContext::new(width, height),
            input: InputGate::default(),
            script: VecDeque::new(),
            close_requested: false,
            frames_presented: 0,
        }
    }

    /// Queues the events delivered by the next unconsumed poll.
    pub(crate) fn then(&mut self, events: Vec<ScriptEvent>) -> &mut Self {
        self.script.push_back(events);
        self
    }

    pub(crate) fn idle(&mut self, polls: usize) -> &mut Self {
        for _ in 0..polls {
            self.script.push_back(Vec::new());
        }
        self
    }

    pub(crate) fn gfx(&self) -> &SoftwareContext {
        &self.gfx
    }
}

pub(crate) fn press(key: Key) -> ScriptEvent {
    ScriptEvent::Key(key, KeyAction::Press, Modifiers::NONE)
}

pub(crate) fn release(key: Key) -> ScriptEvent {
    ScriptEvent::Key(key, KeyAction::Release, Modifiers::NONE)
}

impl HostWindow for ScriptedWindow {
    fn is_close_requested(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn poll_events(&mut self) {
        let Some(batch) = self.script.pop_front() else {
            return;
        };

        for event in batch {
            match event {
                ScriptEvent::Key(key, action, modifiers) => {
                    self.input.handle_key_event(key, action, modifiers);
                }
                ScriptEvent::Close => self.request_close(),
            }
        }

        if self.input.take_terminate_request() {
            self.request_close();
        }
    }

    fn present_frame(&mut self) -> Result<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.gfx.size()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.input.is_key_pressed(key)
    }

    fn graphics(&mut self) -> &mut dyn GraphicsContext {
        &mut self.gfx
    }
}
