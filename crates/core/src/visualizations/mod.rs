//! Visualizations shipped with the host. Add new ones to
//! [`builtin_registry`]; keep exactly one enabled.

mod lissajous;
mod rotating_cube;

pub use lissajous::LissajousCurve;
pub use rotating_cube::RotatingCube;

use crate::registry::{VisualizationDescriptor, VisualizationRegistry};

/// The static registration list, in display order.
pub fn builtin_registry() -> VisualizationRegistry {
    VisualizationRegistry::new(vec![
        VisualizationDescriptor::new(RotatingCube::info(), RotatingCube::default(), true),
        VisualizationDescriptor::new(LissajousCurve::info(), LissajousCurve::default(), false),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_enables_the_cube() {
        let registry = builtin_registry();
        let index = registry.select_enabled().unwrap();

        assert_eq!(registry.get(index).unwrap().name(), Some("Rotating Cube"));
        assert_eq!(registry.descriptors().iter().filter(|d| d.is_enabled()).count(), 1);
    }

    #[test]
    fn builtin_names_are_unique() {
        let registry = builtin_registry();
        let mut names: Vec<_> = registry.descriptors().iter().filter_map(|d| d.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), total);
        assert_eq!(total, registry.len());
    }
}
