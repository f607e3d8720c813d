use std::collections::BTreeMap;
use std::fmt;

use crate::render::GraphicsContext;
use crate::{GraphamaticsError, Result};

/// Metadata key holding the human readable name.
pub const NAME_KEY: &str = "Name";
/// Metadata key holding a one line description.
pub const DESCRIPTION_KEY: &str = "Description";

/// A drawable that contributes one frame per call.
///
/// Implementations must not block or loop internally and cannot fail: any
/// error has to be dealt with before returning. Animation state belongs to
/// the implementation itself.
pub trait Visualization {
    fn render_frame(&mut self, gfx: &mut dyn GraphicsContext);
}

/// Static metadata, render entry point and enabled flag of one visualization.
pub struct VisualizationDescriptor {
    metadata: BTreeMap<String, String>,
    visualization: Box<dyn Visualization>,
    enabled: bool,
}

impl VisualizationDescriptor {
    pub fn new<V>(metadata: BTreeMap<String, String>, visualization: V, enabled: bool) -> Self
    where
        V: Visualization + 'static,
    {
        Self {
            metadata,
            visualization: Box::new(visualization),
            enabled,
        }
    }

    /// Shorthand for descriptors that only carry a name.
    pub fn named<V>(name: &str, visualization: V, enabled: bool) -> Self
    where
        V: Visualization + 'static,
    {
        Self::new(metadata([(NAME_KEY, name)]), visualization, enabled)
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn name(&self) -> Option<&str> {
        self.metadata.get(NAME_KEY).map(String::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.get(DESCRIPTION_KEY).map(String::as_str)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn render_frame(&mut self, gfx: &mut dyn GraphicsContext) {
        self.visualization.render_frame(gfx);
    }
}

impl fmt::Debug for VisualizationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualizationDescriptor")
            .field("metadata", &self.metadata)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Builds a metadata map from string pairs.
pub fn metadata<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Ordered, fixed collection of visualization descriptors.
#[derive(Debug, Default)]
pub struct VisualizationRegistry {
    descriptors: Vec<VisualizationDescriptor>,
}

impl VisualizationRegistry {
    pub fn new(descriptors: Vec<VisualizationDescriptor>) -> Self {
        Self { descriptors }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn descriptors(&self) -> &[VisualizationDescriptor] {
        &self.descriptors
    }

    pub fn get(&self, index: usize) -> Option<&VisualizationDescriptor> {
        self.descriptors.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut VisualizationDescriptor> {
        self.descriptors.get_mut(index)
    }

    /// Returns the index of the enabled visualization.
    ///
    /// When several descriptors are enabled the last one wins. An empty or
    /// all-disabled registry is a fatal configuration error.
    pub fn select_enabled(&self) -> Result<usize> {
        tracing::info!("finding the enabled visualization");

        let mut selected = None;
        for (index, descriptor) in self.descriptors.iter().enumerate() {
            if descriptor.enabled {
                selected = Some(index);
            }
        }

        let index = selected.ok_or(GraphamaticsError::NoEnabledVisualization)?;
        tracing::info!(
            index,
            name = self.descriptors[index].name().unwrap_or("<unnamed>"),
            "rendering the visualization"
        );
        Ok(index)
    }

    /// Enables exactly the descriptor called `name` and disables the rest.
    /// Intended for startup configuration, before the registry is handed to
    /// the run loop.
    pub fn apply_selection(&mut self, name: &str) -> Result<()> {
        if !self.descriptors.iter().any(|d| d.name() == Some(name)) {
            return Err(GraphamaticsError::UnknownVisualization(name.to_string()));
        }

        for descriptor in &mut self.descriptors {
            descriptor.enabled = descriptor.name() == Some(name);
        }
        Ok(())
    }
}
