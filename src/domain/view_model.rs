//! View-model builder: normalizes the host matrix into a clean category tree.

use indexmap::IndexMap;
use serde::Serialize;
use termtree::Tree;
use tracing::{debug, instrument, trace};

use crate::domain::matrix::{DataView, PrimitiveValue, RawMatrixNode, ValueSource};

/// One measure value on a terminal row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureViewModel {
    pub value: PrimitiveValue,
    /// Display name of the measure, when the matrix header names it
    pub source: Option<String>,
}

impl MeasureViewModel {
    pub fn new(value: impl Into<PrimitiveValue>) -> Self {
        Self {
            value: value.into(),
            source: None,
        }
    }
}

/// Normalized category node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryViewModel {
    pub value: PrimitiveValue,
    /// Depth below the matrix root; the root's children are level 1
    pub level: u32,
    pub children: Vec<CategoryViewModel>,
    pub values: IndexMap<String, MeasureViewModel>,
}

impl CategoryViewModel {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A terminal row with at least one measure.
    pub fn is_leaf(&self) -> bool {
        !self.has_children() && !self.values.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(CategoryViewModel::leaf_count).sum()
        }
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CategoryViewModel::depth)
            .max()
            .unwrap_or(0)
    }

    fn to_tree_string(&self) -> Tree<String> {
        let mut label = format!("{} [level {}]", self.value, self.level);
        if !self.values.is_empty() {
            let measures: Vec<String> = self
                .values
                .iter()
                .map(|(key, m)| format!("{}={}", m.source.as_deref().unwrap_or(key), m.value))
                .collect();
            label.push_str(&format!(" {{{}}}", measures.join(", ")));
        }
        Tree::new(label).with_leaves(self.children.iter().map(|c| c.to_tree_string()))
    }
}

/// Result of the builder: either a category tree or the "no data" sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub enum VisualViewModel {
    #[default]
    Empty,
    Tree { categories: Vec<CategoryViewModel> },
}

impl VisualViewModel {
    pub fn is_empty(&self) -> bool {
        matches!(self, VisualViewModel::Empty)
    }

    /// Top-level categories; empty for the sentinel.
    pub fn categories(&self) -> &[CategoryViewModel] {
        match self {
            VisualViewModel::Empty => &[],
            VisualViewModel::Tree { categories } => categories,
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.categories().iter().map(CategoryViewModel::leaf_count).sum()
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        match self {
            VisualViewModel::Empty => Tree::new("(no data)".to_string()),
            VisualViewModel::Tree { categories } => Tree::new("root".to_string())
                .with_leaves(categories.iter().map(|c| c.to_tree_string())),
        }
    }
}

/// Build the view model from the host's data views.
///
/// Only the first data view is considered. A missing data view set or matrix yields
/// [`VisualViewModel::Empty`]; malformed nodes are normalized, never rejected.
#[instrument(level = "debug", skip(data_views))]
pub fn visual_transform(data_views: Option<&[DataView]>) -> VisualViewModel {
    let Some(matrix) = data_views
        .and_then(|views| views.first())
        .and_then(|view| view.matrix.as_ref())
    else {
        debug!("no matrix in data views, returning empty view model");
        return VisualViewModel::Empty;
    };

    let sources = &matrix.value_sources;
    let categories = matrix
        .rows
        .root
        .children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|node| build_category(node, 1, sources))
        .collect();

    VisualViewModel::Tree { categories }
}

fn build_category(node: &RawMatrixNode, level: u32, sources: &[ValueSource]) -> CategoryViewModel {
    let value = node.value.clone().unwrap_or_default();

    if let Some(children) = &node.children {
        return CategoryViewModel {
            value,
            level,
            children: children
                .iter()
                .map(|child| build_category(child, level + 1, sources))
                .collect(),
            values: IndexMap::new(),
        };
    }

    let values: IndexMap<String, MeasureViewModel> = node
        .values
        .iter()
        .flatten()
        .map(|(key, raw)| {
            let source = raw
                .value_source_index
                .and_then(|idx| sources.get(idx))
                .map(|s| s.display_name.clone());
            let measure = MeasureViewModel {
                value: raw.value.clone().unwrap_or_default(),
                source,
            };
            (key.clone(), measure)
        })
        .collect();

    if values.is_empty() {
        trace!(%value, level, "terminal node without measures");
    }

    CategoryViewModel {
        value,
        level,
        children: Vec::new(),
        values,
    }
}
