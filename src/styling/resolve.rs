use std::sync::Arc;

use super::{ComponentId, ComponentStyle, StyleRecord, BACKGROUND_COLOR};
use crate::branding::BrandingConfig;
use crate::theme::ThemeMode;

pub const INPUT_BACKGROUND_DEFAULT: &str = "#f7f7f7";

fn background_floor(component_id: &str) -> &'static str {
    match ComponentId::parse(component_id) {
        Some(id) if id.is_input_like() => INPUT_BACKGROUND_DEFAULT,
        _ => "",
    }
}

/// Effective light/dark styles for `component_id`.
///
/// Input-like ids get [`INPUT_BACKGROUND_DEFAULT`] whenever their stored
/// background is missing or empty, on every call.
pub fn resolve(config: &BrandingConfig, component_id: &str) -> ComponentStyle {
    let floor = background_floor(component_id);
    let Some(stored) = config.component_styling.get(component_id) else {
        return ComponentStyle::uniform(StyleRecord::new().with(BACKGROUND_COLOR, floor));
    };

    let mut resolved = ComponentStyle::clone(stored);
    if !floor.is_empty() {
        for mode in ThemeMode::ALL {
            let record = resolved.mode_mut(mode);
            if !record.is_set(BACKGROUND_COLOR) {
                record.set(BACKGROUND_COLOR, floor);
            }
        }
    }
    resolved
}

/// Returns a config with one style property changed.
///
/// Values are stored verbatim. Every other component entry is shared with
/// `config`.
pub fn update(
    config: &BrandingConfig,
    component_id: &str,
    mode: ThemeMode,
    field: &str,
    value: &str,
) -> BrandingConfig {
    let mut current = resolve(config, component_id);
    current.mode_mut(mode).set(field, value);

    let mut next = config.clone();
    next.component_styling
        .insert(component_id.to_string(), Arc::new(current));
    tracing::trace!(component_id, %mode, field, "component style updated");
    next
}
