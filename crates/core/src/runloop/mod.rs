//! Top-level state machine: select the enabled visualization, render it frame
//! by frame, drop back to selection when the back key is pressed and stop when
//! the window closes.

use crate::config::AppConfig;
use crate::input::{InputSignals, KeyBindings};
use crate::projection::Camera;
use crate::registry::VisualizationRegistry;
use crate::render::{Color, MatrixMode};
use crate::window::HostWindow;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Selecting,
    Running { index: usize },
    /// Waiting for the back key to be released so the same press is not
    /// consumed again by the next visualization.
    DrainingExitKey { index: usize },
    Terminated,
}

#[derive(Debug)]
pub struct RunLoop {
    registry: VisualizationRegistry,
    camera: Camera,
    keys: KeyBindings,
    clear_color: Color,
    state: RunState,
}

impl RunLoop {
    pub fn new(registry: VisualizationRegistry, config: &AppConfig) -> Self {
        Self {
            registry,
            camera: config.camera,
            keys: config.keys,
            clear_color: config.clear_color,
            state: RunState::Selecting,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs until the window closes or selection fails.
    pub fn run<W: HostWindow + ?Sized>(&mut self, window: &mut W) -> Result<()> {
        while self.state != RunState::Terminated {
            self.step(window)?;
        }
        Ok(())
    }

    /// Advances the state machine by one tick and returns the new state.
    ///
    /// A selection failure moves to [`RunState::Terminated`] and is returned
    /// as the error.
    pub fn step<W: HostWindow + ?Sized>(&mut self, window: &mut W) -> Result<RunState> {
        let next = match self.state {
            RunState::Selecting => {
                if window.is_close_requested() {
                    RunState::Terminated
                } else {
                    match self.registry.select_enabled() {
                        Ok(index) => RunState::Running { index },
                        Err(err) => {
                            self.transition(RunState::Terminated);
                            return Err(err);
                        }
                    }
                }
            }
            RunState::Running { index } => {
                let signals = InputSignals::sample(&*window, &self.keys);
                if signals.should_terminate {
                    RunState::Terminated
                } else if signals.should_exit_visualization {
                    RunState::DrainingExitKey { index }
                } else {
                    self.render_frame(window, index)?;
                    RunState::Running { index }
                }
            }
            RunState::DrainingExitKey { index } => {
                if window.is_close_requested() {
                    RunState::Terminated
                } else if window.is_key_pressed(self.keys.back) {
                    window.poll_events();
                    RunState::DrainingExitKey { index }
                } else {
                    RunState::Selecting
                }
            }
            RunState::Terminated => RunState::Terminated,
        };

        self.transition(next);
        Ok(next)
    }

    fn transition(&mut self, next: RunState) {
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "run loop transition");
        }
        self.state = next;
    }

    fn render_frame<W: HostWindow + ?Sized>(&mut self, window: &mut W, index: usize) -> Result<()> {
        let (width, height) = window.framebuffer_size();
        let gfx = window.graphics();

        gfx.set_viewport(width, height);
        gfx.clear(self.clear_color);

        gfx.set_matrix_mode(MatrixMode::Projection);
        gfx.load_matrix(&self.camera.projection(width, height));

        gfx.set_matrix_mode(MatrixMode::ModelView);
        gfx.load_identity();
        gfx.translate(0.0, 0.0, -self.camera.distance);

        if let Some(descriptor) = self.registry.get_mut(index) {
            descriptor.render_frame(gfx);
        }

        window.present_frame()?;
        window.poll_events();
        Ok(())
    }
}

/// Entry point for the host: drives the run loop over `window` until it
/// terminates.
pub fn run_application<W: HostWindow + ?Sized>(
    window: &mut W,
    registry: VisualizationRegistry,
    config: &AppConfig,
) -> Result<()> {
    let mut run_loop = RunLoop::new(registry, config);
    run_loop.run(window)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::input::{Key, KeyAction, Modifiers};
    use crate::registry::{Visualization, VisualizationDescriptor};
    use crate::render::GraphicsContext;
    use crate::window::scripted::{press, release, ScriptEvent, ScriptedWindow};
    use crate::GraphamaticsError;

    struct Counting(Rc<Cell<usize>>);

    impl Visualization for Counting {
        fn render_frame(&mut self, _gfx: &mut dyn GraphicsContext) {
            self.0.set(self.0.get() + 1);
        }
    }

    /// Registry of a disabled descriptor followed by an enabled one, with a
    /// frame counter for each.
    fn two_entry_loop() -> (RunLoop, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let disabled = Rc::new(Cell::new(0));
        let enabled = Rc::new(Cell::new(0));
        let registry = VisualizationRegistry::new(vec![
            VisualizationDescriptor::named("off", Counting(disabled.clone()), false),
            VisualizationDescriptor::named("on", Counting(enabled.clone()), true),
        ]);
        (
            RunLoop::new(registry, &AppConfig::default()),
            disabled,
            enabled,
        )
    }

    #[test]
    fn window_close_terminates_within_one_tick_without_draining() {
        let (mut run_loop, disabled, enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(64, 48);
        window.then(vec![ScriptEvent::Close]);

        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Running { index: 1 });
        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Running { index: 1 });
        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Terminated);

        assert_eq!(enabled.get(), 1);
        assert_eq!(disabled.get(), 0);
        assert_eq!(window.frames_presented, 1);
    }

    #[test]
    fn back_press_and_release_reenters_the_same_visualization() {
        let (mut run_loop, _disabled, enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(64, 48);
        window.then(vec![press(Key::Escape)]).then(vec![release(Key::Escape)]);

        let mut states = Vec::new();
        for _ in 0..6 {
            states.push(run_loop.step(&mut window).unwrap());
        }

        assert_eq!(
            states,
            vec![
                RunState::Running { index: 1 },
                RunState::Running { index: 1 },
                RunState::DrainingExitKey { index: 1 },
                RunState::DrainingExitKey { index: 1 },
                RunState::Selecting,
                RunState::Running { index: 1 },
            ]
        );
        assert_eq!(enabled.get(), 1);
    }

    #[test]
    fn draining_holds_until_the_back_key_is_released() {
        for held_ticks in [0, 1, 5, 40] {
            let (mut run_loop, _disabled, enabled) = two_entry_loop();
            let mut window = ScriptedWindow::new(32, 32);
            window
                .then(vec![press(Key::Escape)])
                .idle(held_ticks)
                .then(vec![release(Key::Escape)]);

            run_loop.step(&mut window).unwrap();
            run_loop.step(&mut window).unwrap();
            assert_eq!(
                run_loop.step(&mut window).unwrap(),
                RunState::DrainingExitKey { index: 1 }
            );
            let frames = window.frames_presented;

            let mut ticks = 0;
            while run_loop.step(&mut window).unwrap() != RunState::Selecting {
                assert_eq!(run_loop.state(), RunState::DrainingExitKey { index: 1 });
                ticks += 1;
            }

            // One tick per held poll, plus the tick that consumes the release.
            assert_eq!(ticks, held_ticks + 1);
            assert_eq!(window.frames_presented, frames);
            assert_eq!(enabled.get(), 1);

            assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Running { index: 1 });
        }
    }

    #[test]
    fn terminate_combination_closes_the_window() {
        let (mut run_loop, _disabled, _enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(16, 16);
        window.then(vec![ScriptEvent::Key(
            Key::S,
            KeyAction::Press,
            Modifiers::CONTROL,
        )]);

        run_loop.step(&mut window).unwrap();
        run_loop.step(&mut window).unwrap();
        assert!(window.is_close_requested());
        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Terminated);
    }

    #[test]
    fn close_during_drain_terminates() {
        let (mut run_loop, _disabled, _enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(16, 16);
        window
            .then(vec![press(Key::Escape)])
            .then(vec![ScriptEvent::Close]);

        run_loop.step(&mut window).unwrap();
        run_loop.step(&mut window).unwrap();
        run_loop.step(&mut window).unwrap();
        assert_eq!(
            run_loop.step(&mut window).unwrap(),
            RunState::DrainingExitKey { index: 1 }
        );
        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Terminated);
    }

    #[test]
    fn closed_window_stops_before_selection() {
        let (mut run_loop, _disabled, enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(16, 16);
        window.request_close();

        assert_eq!(run_loop.step(&mut window).unwrap(), RunState::Terminated);
        assert_eq!(enabled.get(), 0);
    }

    #[test]
    fn missing_enabled_visualization_is_fatal() {
        let counter = Rc::new(Cell::new(0));
        let registry = VisualizationRegistry::new(vec![VisualizationDescriptor::named(
            "off",
            Counting(counter.clone()),
            false,
        )]);
        let mut window = ScriptedWindow::new(16, 16);

        let err = run_application(&mut window, registry, &AppConfig::default()).unwrap_err();
        assert!(matches!(err, GraphamaticsError::NoEnabledVisualization));
        assert_eq!(counter.get(), 0);
        assert_eq!(window.frames_presented, 0);
    }

    #[test]
    fn frames_use_the_fixed_camera() {
        let (mut run_loop, _disabled, _enabled) = two_entry_loop();
        let mut window = ScriptedWindow::new(80, 40);

        run_loop.step(&mut window).unwrap();
        run_loop.step(&mut window).unwrap();

        let camera = Camera::default();
        assert_eq!(*window.gfx().projection(), camera.projection(80, 40));
        assert_eq!(*window.gfx().model_view(), camera.view());
    }

    #[test]
    fn run_application_returns_once_the_window_closes() {
        let (run_loop, _disabled, enabled) = two_entry_loop();
        let registry = run_loop.registry;
        let mut window = ScriptedWindow::new(16, 16);
        window.idle(2).then(vec![ScriptEvent::Close]);

        run_application(&mut window, registry, &AppConfig::default()).unwrap();
        assert_eq!(enabled.get(), 3);
        assert_eq!(window.frames_presented, 3);
    }
}
