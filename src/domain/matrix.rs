//! Host input model: data views carrying a hierarchical matrix.
//!
//! These types mirror what the host delivers per update. Every field the host may omit
//! is optional so that partial snapshots still deserialize.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A display-able scalar as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum PrimitiveValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Null => Ok(()),
            PrimitiveValue::Bool(b) => write!(f, "{}", b),
            // Integral values print without a fractional part: 5.0 -> "5"
            PrimitiveValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            PrimitiveValue::Number(n) => write!(f, "{}", n),
            PrimitiveValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PrimitiveValue {
    fn from(value: &str) -> Self {
        PrimitiveValue::Text(value.to_string())
    }
}

impl From<f64> for PrimitiveValue {
    fn from(value: f64) -> Self {
        PrimitiveValue::Number(value)
    }
}

/// One measure entry attached to a terminal matrix node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawMatrixValue {
    #[serde(default)]
    pub value: Option<PrimitiveValue>,
    /// Index into `DataViewMatrix::value_sources`
    #[serde(default)]
    pub value_source_index: Option<usize>,
}

impl RawMatrixValue {
    pub fn new(value: impl Into<PrimitiveValue>) -> Self {
        Self {
            value: Some(value.into()),
            value_source_index: None,
        }
    }
}

/// A node in the host's row hierarchy.
///
/// Presence of `children` is what makes a node a category; nodes without it are terminal
/// and carry their measures in `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawMatrixNode {
    #[serde(default)]
    pub value: Option<PrimitiveValue>,
    /// Informational only; the builder derives levels from nesting depth
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Option<Vec<RawMatrixNode>>,
    #[serde(default)]
    pub values: Option<IndexMap<String, RawMatrixValue>>,
}

impl RawMatrixNode {
    pub fn category(value: impl Into<PrimitiveValue>, children: Vec<RawMatrixNode>) -> Self {
        Self {
            value: Some(value.into()),
            level: None,
            children: Some(children),
            values: None,
        }
    }

    pub fn terminal<K, I>(value: impl Into<PrimitiveValue>, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RawMatrixValue)>,
    {
        Self {
            value: Some(value.into()),
            level: None,
            children: None,
            values: Some(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataViewHierarchy {
    #[serde(default)]
    pub root: RawMatrixNode,
}

/// Header entry naming one measure column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ValueSource {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub query_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataViewMatrix {
    #[serde(default)]
    pub rows: DataViewHierarchy,
    #[serde(default)]
    pub value_sources: Vec<ValueSource>,
}

impl DataViewMatrix {
    pub fn from_root(root: RawMatrixNode) -> Self {
        Self {
            rows: DataViewHierarchy { root },
            value_sources: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataViewMetadata {
    /// Settings objects keyed by object name, e.g. `{"layout": {"indentStep": 30}}`
    #[serde(default)]
    pub objects: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataView {
    #[serde(default)]
    pub metadata: DataViewMetadata,
    #[serde(default)]
    pub matrix: Option<DataViewMatrix>,
}

impl DataView {
    pub fn with_matrix(matrix: DataViewMatrix) -> Self {
        Self {
            metadata: DataViewMetadata::default(),
            matrix: Some(matrix),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Everything the host hands over for a single update cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    #[serde(default)]
    pub data_views: Option<Vec<DataView>>,
    #[serde(default)]
    pub viewport: Option<Viewport>,
}

impl UpdateOptions {
    pub fn from_matrix(matrix: DataViewMatrix) -> Self {
        Self {
            data_views: Some(vec![DataView::with_matrix(matrix)]),
            viewport: None,
        }
    }

    /// The data view the visual renders from.
    pub fn primary_data_view(&self) -> Option<&DataView> {
        self.data_views.as_deref().and_then(|views| views.first())
    }
}
