//! Visual settings: the formatting objects the host attaches to a data view.
//!
//! The host keys objects and properties in camelCase (`labels.measuresMarker`), compiled
//! and file-based settings use snake_case. Both spellings are accepted on parse.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::matrix::DataView;

/// How labels of reused rows are written on each pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Drop previous labels before writing the current ones
    #[default]
    Replace,
    /// Keep previous labels and append new ones on every pass
    Append,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Indentation per level, in px
    pub indent_step: u32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { indent_step: 20 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LabelSettings {
    pub mode: LabelMode,
    /// Marker written before the measures of a leaf row
    pub measures_marker: String,
    /// Suffix of every measure label
    pub separator: String,
    pub show_measures: bool,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            mode: LabelMode::Replace,
            measures_marker: "Measures:".into(),
            separator: "|".into(),
            show_measures: true,
        }
    }
}

/// Settings object handed back to the host on enumeration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct VisualSettings {
    pub layout: LayoutSettings,
    pub labels: LabelSettings,
}

/// One enumerated settings object, properties keyed as the host expects them.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisualObjectInstance {
    pub object_name: String,
    pub selector: Option<Value>,
    pub properties: Map<String, Value>,
}

impl VisualSettings {
    /// Overlay the data view's `metadata.objects` onto `base`.
    ///
    /// Never fails: unreadable objects are logged and `base` is returned unchanged.
    pub fn parse(data_view: Option<&DataView>, base: &VisualSettings) -> VisualSettings {
        let Some(view) = data_view else {
            return base.clone();
        };
        if view.metadata.objects.is_empty() {
            return base.clone();
        }
        match Self::overlay(base, &view.metadata.objects) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("invalid settings objects, using defaults: {}", e);
                base.clone()
            }
        }
    }

    fn overlay(base: &VisualSettings, objects: &Map<String, Value>) -> serde_json::Result<Self> {
        let mut merged = serde_json::to_value(base)?;
        for (name, properties) in objects {
            let target = merged
                .get_mut(camel_to_snake(name))
                .and_then(Value::as_object_mut);
            match (target, properties.as_object()) {
                (Some(target), Some(properties)) => {
                    for (key, value) in properties {
                        target.insert(camel_to_snake(key), value.clone());
                    }
                }
                _ => debug!(object = %name, "ignoring unknown settings object"),
            }
        }
        serde_json::from_value(merged)
    }

    /// Properties of `object_name` for the host's property pane; empty if unknown.
    pub fn enumerate_object_instances(&self, object_name: &str) -> Vec<VisualObjectInstance> {
        let Ok(Value::Object(objects)) = serde_json::to_value(self) else {
            return Vec::new();
        };
        objects
            .get(&camel_to_snake(object_name))
            .and_then(Value::as_object)
            .map(|properties| VisualObjectInstance {
                object_name: object_name.to_string(),
                selector: None,
                properties: properties
                    .iter()
                    .map(|(k, v)| (snake_to_camel(k), v.clone()))
                    .collect(),
            })
            .into_iter()
            .collect()
    }
}

fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn view_with_objects(objects: Value) -> DataView {
        let mut view = DataView::default();
        view.metadata.objects = objects.as_object().cloned().unwrap_or_default();
        view
    }

    #[rstest]
    #[case("indentStep", "indent_step")]
    #[case("measuresMarker", "measures_marker")]
    #[case("layout", "layout")]
    #[case("already_snake", "already_snake")]
    fn test_camel_to_snake(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(camel_to_snake(input), expected);
    }

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("show_measures"), "showMeasures");
        assert_eq!(snake_to_camel("mode"), "mode");
    }

    #[test]
    fn given_no_data_view_when_parsing_then_returns_base() {
        let base = VisualSettings::default();
        assert_eq!(VisualSettings::parse(None, &base), base);
    }

    #[test]
    fn given_host_objects_when_parsing_then_overlays_camel_case_properties() {
        let view = view_with_objects(json!({
            "layout": {"indentStep": 30},
            "labels": {"mode": "append", "measuresMarker": "Values:"}
        }));

        let settings = VisualSettings::parse(Some(&view), &VisualSettings::default());

        assert_eq!(settings.layout.indent_step, 30);
        assert_eq!(settings.labels.mode, LabelMode::Append);
        assert_eq!(settings.labels.measures_marker, "Values:");
        assert_eq!(settings.labels.separator, "|");
    }

    #[test]
    fn given_invalid_property_type_when_parsing_then_falls_back_to_base() {
        let view = view_with_objects(json!({"layout": {"indentStep": "wide"}}));
        let mut base = VisualSettings::default();
        base.layout.indent_step = 12;

        let settings = VisualSettings::parse(Some(&view), &base);

        assert_eq!(settings, base);
    }

    #[test]
    fn given_unknown_object_when_parsing_then_ignores_it() {
        let view = view_with_objects(json!({"dataPoint": {"fill": "#333"}}));
        let settings = VisualSettings::parse(Some(&view), &VisualSettings::default());
        assert_eq!(settings, VisualSettings::default());
    }

    #[test]
    fn given_known_object_when_enumerating_then_returns_camel_case_properties() {
        let instances = VisualSettings::default().enumerate_object_instances("labels");

        assert_eq!(instances.len(), 1);
        let instance = &instances[0];
        assert_eq!(instance.object_name, "labels");
        assert_eq!(instance.properties["measuresMarker"], json!("Measures:"));
        assert_eq!(instance.properties["showMeasures"], json!(true));
    }

    #[test]
    fn given_unknown_object_when_enumerating_then_returns_nothing() {
        assert!(VisualSettings::default()
            .enumerate_object_instances("dataPoint")
            .is_empty());
    }
}
