//! Desktop window backed by winit and softbuffer.
//!
//! The run loop polls the window instead of being driven by it, so events are
//! pumped on demand with `pump_app_events` and frames are rasterized on the
//! CPU before being copied into the softbuffer surface.

use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use graphamatics_core::{
    GraphamaticsError, GraphicsContext, HostWindow, InputGate, Key, KeyAction, KeyBindings,
    KeySource, Modifiers, Result, SoftwareContext, WindowConfig,
};
use softbuffer::{Context, Surface};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

/// Event handler state shared with winit while events are pumped.
struct WindowState {
    config: WindowConfig,
    window: Option<Rc<Window>>,
    /// Owns the display connection the surface was created from.
    _context: Option<Context<Rc<Window>>>,
    surface: Option<Surface<Rc<Window>, Rc<Window>>>,
    input: InputGate,
    modifiers: ModifiersState,
    size: PhysicalSize<u32>,
    close_requested: bool,
    error: Option<GraphamaticsError>,
}

impl WindowState {
    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        if self.config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Rc::new(
            event_loop
                .create_window(attributes)
                .map_err(GraphamaticsError::window)?,
        );
        let context = Context::new(Rc::clone(&window)).map_err(GraphamaticsError::window)?;
        let surface = Surface::new(&context, Rc::clone(&window)).map_err(GraphamaticsError::window)?;

        self.size = window.inner_size();
        tracing::info!(
            width = self.size.width,
            height = self.size.height,
            fullscreen = self.config.fullscreen,
            "window created"
        );

        self.window = Some(window);
        self._context = Some(context);
        self.surface = Some(surface);
        Ok(())
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        let action = match (event.state, event.repeat) {
            (ElementState::Pressed, false) => KeyAction::Press,
            (ElementState::Pressed, true) => KeyAction::Repeat,
            (ElementState::Released, _) => KeyAction::Release,
        };

        let key = map_key(event.physical_key);
        self.input
            .handle_key_event(key, action, map_modifiers(self.modifiers));

        if self.input.take_terminate_request() {
            tracing::info!("terminate key combination pressed");
            self.close_requested = true;
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.close_requested = true,
            WindowEvent::Resized(size) => self.size = size,
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            _ => {}
        }
    }
}

fn map_key(key: PhysicalKey) -> Key {
    match key {
        PhysicalKey::Code(KeyCode::Escape) => Key::Escape,
        PhysicalKey::Code(KeyCode::Enter) => Key::Enter,
        PhysicalKey::Code(KeyCode::Space) => Key::Space,
        PhysicalKey::Code(KeyCode::KeyQ) => Key::Q,
        PhysicalKey::Code(KeyCode::KeyS) => Key::S,
        PhysicalKey::Code(KeyCode::KeyW) => Key::W,
        _ => Key::Other,
    }
}

fn map_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        control: state.control_key(),
        shift: state.shift_key(),
        alt: state.alt_key(),
        super_key: state.super_key(),
    }
}

/// Full-screen (or windowed) host window implementing [`HostWindow`].
pub struct DesktopWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
    gfx: SoftwareContext,
    frame_interval: Option<Duration>,
    last_present: Instant,
}

impl DesktopWindow {
    /// Creates the window and its surface. Fails if the platform cannot
    /// provide either.
    pub fn open(config: &WindowConfig, keys: KeyBindings) -> Result<Self> {
        let event_loop = EventLoop::new().map_err(GraphamaticsError::window)?;
        let frame_interval = (config.frame_rate > 0)
            .then(|| Duration::from_secs_f64(1.0 / f64::from(config.frame_rate)));

        let mut desktop = Self {
            event_loop,
            state: WindowState {
                config: config.clone(),
                window: None,
                _context: None,
                surface: None,
                input: InputGate::new(keys),
                modifiers: ModifiersState::empty(),
                size: PhysicalSize::new(0, 0),
                close_requested: false,
                error: None,
            },
            gfx: SoftwareContext::new(0, 0),
            frame_interval,
            last_present: Instant::now(),
        };

        // The window is created from `resumed`, which arrives on the first
        // pumps of the event loop.
        while desktop.state.window.is_none() {
            let status = desktop.pump();
            if let Some(err) = desktop.state.error.take() {
                return Err(err);
            }
            if let PumpStatus::Exit(code) = status {
                return Err(GraphamaticsError::Window(format!(
                    "event loop exited with code {code} before a window was created"
                )));
            }
        }

        let (width, height) = desktop.framebuffer_size();
        desktop.gfx = SoftwareContext::new(width, height);
        Ok(desktop)
    }

    fn pump(&mut self) -> PumpStatus {
        self.event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state)
    }

    /// Sleeps off the remainder of the frame budget. Stands in for vsync,
    /// which a CPU surface does not provide.
    fn pace(&mut self) {
        if let Some(interval) = self.frame_interval {
            let elapsed = self.last_present.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
        self.last_present = Instant::now();
    }
}

impl HostWindow for DesktopWindow {
    fn is_close_requested(&self) -> bool {
        self.state.close_requested
    }

    fn request_close(&mut self) {
        self.state.close_requested = true;
    }

    fn poll_events(&mut self) {
        if let PumpStatus::Exit(_) = self.pump() {
            self.state.close_requested = true;
        }
    }

    fn present_frame(&mut self) -> Result<()> {
        self.pace();

        let (Some(width), Some(height)) = (
            NonZeroU32::new(self.state.size.width),
            NonZeroU32::new(self.state.size.height),
        ) else {
            // Minimized: nothing to show.
            return Ok(());
        };

        let (Some(window), Some(surface)) = (self.state.window.as_ref(), self.state.surface.as_mut())
        else {
            return Err(GraphamaticsError::window("presenting without a window"));
        };

        surface
            .resize(width, height)
            .map_err(GraphamaticsError::window)?;
        let mut buffer = surface.buffer_mut().map_err(GraphamaticsError::window)?;

        let pixels = self.gfx.pixels();
        if pixels.len() == buffer.len() {
            buffer.copy_from_slice(pixels);
        } else {
            // Resized between rendering and presenting; the next frame
            // catches up.
            buffer.fill(0);
        }

        window.pre_present_notify();
        buffer.present().map_err(GraphamaticsError::window)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        (self.state.size.width, self.state.size.height)
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.state.input.is_key_pressed(key)
    }

    fn graphics(&mut self) -> &mut dyn GraphicsContext {
        &mut self.gfx
    }
}

impl Drop for DesktopWindow {
    fn drop(&mut self) {
        tracing::debug!("tearing down window and surface");
        self.state.surface = None;
        self.state._context = None;
        self.state.window = None;
    }
}
