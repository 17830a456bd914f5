use serde_json::Value;
use thiserror::Error;

use super::defaults::default_branding_config;
use super::model::BrandingConfig;

/// How many object levels of each section are merged key by key before the
/// remote value replaces the default wholesale. Unlisted keys are leaves.
const SECTION_DEPTHS: &[(&str, usize)] = &[
    ("lightMode", 1),
    ("darkMode", 1),
    ("loginBackground", 2),
    ("globalStyling", 1),
    // component id -> mode -> property
    ("componentStyling", 3),
    ("drawerOverlay", 1),
];

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("remote branding payload must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },
    #[error("merged branding payload does not decode")]
    Decode(#[from] serde_json::Error),
}

pub type MergeResult<T> = std::result::Result<T, MergeError>;

fn section_depth(key: &str) -> usize {
    SECTION_DEPTHS
        .iter()
        .find(|(section, _)| *section == key)
        .map_or(0, |(_, depth)| *depth)
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Lays `patch` over `base`, recursing `depth` object levels.
///
/// Null patch values are skipped, so they never erase a base value.
pub fn overlay(base: &mut Value, patch: &Value, depth: usize) {
    match (base, patch) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(patch_map)) if depth > 0 => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) => overlay(base_value, patch_value, depth - 1),
                    None if patch_value.is_null() => {}
                    None => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

/// Coerces a merged leaf to the JSON type of its default, or puts the
/// default back when it cannot.
fn coerce_leaf(path: &str, default: &Value, merged: &mut Value) {
    let coerced = match (default, &*merged) {
        (Value::Object(_), Value::Object(_)) | (Value::Null, _) => return,
        (_, Value::Null) => return,
        (Value::String(_), Value::String(_))
        | (Value::Number(_), Value::Number(_))
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Array(_), Value::Array(_)) => return,
        (Value::String(_), Value::Number(n)) => Some(Value::String(n.to_string())),
        (Value::String(_), Value::Bool(b)) => Some(Value::String(b.to_string())),
        (Value::Number(n), Value::String(text)) => number_from_text(n, text.trim()),
        (Value::Bool(_), Value::String(text)) => match text.trim() {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    };
    match coerced {
        Some(value) => {
            tracing::debug!(path, found = json_kind(merged), "coerced branding value");
            *merged = value;
        }
        None => {
            tracing::warn!(
                path,
                expected = json_kind(default),
                found = json_kind(merged),
                "ignoring wrongly typed branding value"
            );
            *merged = default.clone();
        }
    }
}

fn number_from_text(default: &serde_json::Number, text: &str) -> Option<Value> {
    if default.is_f64() {
        text.parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
    } else if default.is_u64() {
        text.parse::<u64>().ok().map(Value::from)
    } else {
        text.parse::<i64>().ok().map(Value::from)
    }
}

/// Walks the keys `merged` shares with `default` and fixes leaf types.
fn reconcile(path: &str, default: &Value, merged: &mut Value) {
    match (default, merged) {
        (Value::Object(default_map), Value::Object(merged_map)) => {
            for (key, merged_value) in merged_map.iter_mut() {
                if let Some(default_value) = default_map.get(key) {
                    reconcile(&format!("{path}.{key}"), default_value, merged_value);
                }
            }
        }
        (default, merged) => coerce_leaf(path, default, merged),
    }
}

/// Merges a remote payload onto `defaults` section by section.
///
/// Leaves of the wrong type are coerced to the default's type or dropped.
/// A section that still does not decode falls back to its default alone.
pub fn merge_onto(defaults: &BrandingConfig, remote: &Value) -> MergeResult<BrandingConfig> {
    let Value::Object(remote_map) = remote else {
        return Err(MergeError::NotAnObject {
            kind: json_kind(remote),
        });
    };

    let default_value = serde_json::to_value(defaults)?;
    let mut merged = default_value.clone();
    if let (Value::Object(merged_map), Value::Object(default_map)) = (&mut merged, &default_value) {
        for (key, value) in remote_map {
            let (Some(slot), Some(default_section)) = (merged_map.get_mut(key), default_map.get(key))
            else {
                tracing::debug!(key, "ignoring unknown branding section");
                continue;
            };
            overlay(slot, value, section_depth(key));
            reconcile(key, default_section, slot);
        }

        if serde_json::from_value::<BrandingConfig>(Value::Object(merged_map.clone())).is_err() {
            for (key, default_section) in default_map {
                let Some(section) = merged_map.get(key) else {
                    continue;
                };
                let mut candidate = default_map.clone();
                candidate.insert(key.clone(), section.clone());
                if serde_json::from_value::<BrandingConfig>(Value::Object(candidate)).is_err() {
                    tracing::warn!(key, "branding section does not decode, using its default");
                    merged_map.insert(key.clone(), default_section.clone());
                }
            }
        }
    }
    Ok(serde_json::from_value(merged)?)
}

/// Merges a remote payload onto the compiled-in defaults.
pub fn load_branding(remote: &Value) -> MergeResult<BrandingConfig> {
    merge_onto(&default_branding_config(), remote)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::branding::BackgroundKind;
    use crate::styling::{resolve, BACKGROUND_COLOR};

    #[test]
    fn merging_the_defaults_onto_themselves_is_identity() {
        let defaults = default_branding_config();
        let remote = serde_json::to_value(&defaults).unwrap();
        assert_eq!(load_branding(&remote).unwrap(), defaults);
        assert_eq!(load_branding(&json!({})).unwrap(), defaults);
    }

    #[test]
    fn partial_dark_palette_keeps_every_other_default() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({"darkMode": {"primaryColor": "#111"}})).unwrap();

        assert_eq!(merged.dark_mode.primary_color, "#111");
        let mut expected_dark = defaults.dark_mode.clone();
        expected_dark.primary_color = "#111".to_string();
        assert_eq!(merged.dark_mode, expected_dark);
        assert_eq!(merged.light_mode, defaults.light_mode);
    }

    #[test]
    fn gaps_keep_defaults_and_specified_fields_win() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "applicationName": "Acme",
            "globalStyling": {"buttonBorderRadius": "0px"},
            "drawerOverlay": {"blur": 12}
        }))
        .unwrap();

        assert_eq!(merged.application_name, "Acme");
        assert_eq!(merged.global_styling.button_border_radius, "0px");
        assert_eq!(
            merged.global_styling.input_border_radius,
            defaults.global_styling.input_border_radius
        );
        assert_eq!(merged.drawer_overlay.blur, 12.0);
        assert_eq!(merged.drawer_overlay.opacity, defaults.drawer_overlay.opacity);
        assert_eq!(merged.login_background, defaults.login_background);
    }

    #[test]
    fn login_gradient_merges_one_level_deeper() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "loginBackground": {"type": "color", "gradient": {"angle": 90}}
        }))
        .unwrap();

        assert_eq!(merged.login_background.kind, BackgroundKind::Color);
        assert_eq!(merged.login_background.gradient.angle, 90.0);
        assert_eq!(
            merged.login_background.gradient.from,
            defaults.login_background.gradient.from
        );
        assert_eq!(merged.login_background.color, defaults.login_background.color);
    }

    #[test]
    fn component_styling_merges_per_component_and_per_mode() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "componentStyling": {
                "platform-sidebar-menu-active": {"dark": {"textColor": "#fff"}},
                "button": {"light": {"borderRadius": "999px"}}
            }
        }))
        .unwrap();

        let default_active = &defaults.component_styling["platform-sidebar-menu-active"];
        let active = &merged.component_styling["platform-sidebar-menu-active"];
        assert_eq!(active.light, default_active.light);
        assert_eq!(active.dark.get("textColor"), Some("#fff"));
        assert_eq!(
            active.dark.get(BACKGROUND_COLOR),
            default_active.dark.get(BACKGROUND_COLOR)
        );
        assert_eq!(
            merged.component_styling["vertical-tab-menu-active"],
            defaults.component_styling["vertical-tab-menu-active"]
        );
        assert_eq!(
            resolve(&merged, "button").light.get("borderRadius"),
            Some("999px")
        );
        assert!(merged.component_styling["button"].dark.is_empty());
    }

    #[test]
    fn nulls_never_erase_defaults() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "applicationName": null,
            "lightMode": {"primaryColor": null},
            "componentStyling": {"vertical-tab-menu-active": {"light": {"textColor": null}}}
        }))
        .unwrap();
        assert_eq!(merged, defaults);
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let err = load_branding(&json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, MergeError::NotAnObject { kind: "array" }));
    }

    #[test]
    fn wrongly_typed_section_falls_back_to_its_default() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({"lightMode": "blue", "applicationName": "Acme"})).unwrap();
        assert_eq!(merged.light_mode, defaults.light_mode);
        assert_eq!(merged.application_name, "Acme");
    }

    #[test]
    fn mistyped_leaves_are_coerced_without_losing_the_rest() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "applicationName": "Acme",
            "globalStyling": {"buttonBorderRadius": 8, "inputBorderRadius": "2px"},
            "drawerOverlay": {"opacity": "0.5", "blur": "thick"}
        }))
        .unwrap();

        assert_eq!(merged.application_name, "Acme");
        assert_eq!(merged.global_styling.button_border_radius, "8");
        assert_eq!(merged.global_styling.input_border_radius, "2px");
        assert_eq!(merged.drawer_overlay.opacity, 0.5);
        assert_eq!(merged.drawer_overlay.blur, defaults.drawer_overlay.blur);
    }

    #[test]
    fn object_in_a_text_leaf_keeps_only_that_default() {
        let defaults = default_branding_config();
        let merged = load_branding(&json!({
            "applicationName": "Acme",
            "applicationLogoIcon": {"name": "Rocket"},
            "darkMode": {"primaryColor": "#111"}
        }))
        .unwrap();

        assert_eq!(merged.application_name, "Acme");
        assert_eq!(merged.application_logo_icon, defaults.application_logo_icon);
        assert_eq!(merged.dark_mode.primary_color, "#111");
    }

    #[test]
    fn overlay_replaces_at_depth_zero() {
        let mut base = json!({"a": {"b": 1, "c": 2}});
        overlay(&mut base, &json!({"a": {"b": 5}}), 1);
        assert_eq!(base, json!({"a": {"b": 5}}));

        let mut base = json!({"a": {"b": 1, "c": 2}});
        overlay(&mut base, &json!({"a": {"b": 5}}), 2);
        assert_eq!(base, json!({"a": {"b": 5, "c": 2}}));
    }
}
