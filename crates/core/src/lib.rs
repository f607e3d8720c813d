//! Core library for the Graphamatics visualization host.
//!
//! The host shows exactly one registered visualization at a time. A
//! [`RunLoop`] selects the enabled entry of a [`VisualizationRegistry`],
//! renders it frame by frame through a fixed perspective camera and returns
//! to selection when the back key is pressed. Windowing is supplied by the
//! caller through the [`HostWindow`] trait; drawing goes through
//! [`GraphicsContext`], implemented on the CPU by [`SoftwareContext`].

pub mod config;
pub mod error;
pub mod input;
pub mod projection;
pub mod registry;
pub mod render;
pub mod runloop;
pub mod visualizations;
pub mod window;

pub use config::{AppConfig, WindowConfig};
pub use error::{GraphamaticsError, Result};
pub use input::{InputGate, InputSignals, Key, KeyAction, KeyBindings, KeySource, Modifier, Modifiers};
pub use projection::{perspective, rotation, Camera, Mat4};
pub use registry::{Visualization, VisualizationDescriptor, VisualizationRegistry};
pub use render::{Color, GraphicsContext, MatrixMode, Primitive, SoftwareContext, Vertex};
pub use runloop::{run_application, RunLoop, RunState};
pub use visualizations::builtin_registry;
pub use window::HostWindow;
