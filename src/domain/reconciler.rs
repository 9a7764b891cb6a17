//! Tree reconciler: keeps the rendered scene in step with the category view model.
//!
//! Each pass walks the view model and the scene in lock-step. Rows are bound to data by
//! sibling position, so existing rows are reused and re-labelled, surplus rows are
//! removed and missing rows are created. Branches recurse, leaves emit their measures.

use std::fmt;

use tracing::{debug, info, instrument, trace};

use crate::domain::error::DomainResult;
use crate::domain::join::DataJoin;
use crate::domain::scene::{NodeId, SceneGraph, Selector};
use crate::domain::settings::{LabelMode, VisualSettings};
use crate::domain::view_model::{CategoryViewModel, VisualViewModel};

pub const ROOT_TAG: &str = "div";
pub const ROOT_CLASS: &str = "root";
pub const ROW_TAG: &str = "div";
/// Structural tag shared by every tree row
pub const ROW_CLASS: &str = "child";
pub const BRANCH_CLASS: &str = "branch";
pub const LEAF_CLASS: &str = "leaf";
pub const LABEL_CLASS: &str = "label";
pub const VALUES_CLASS: &str = "values";
pub const INDENT_PROPERTY: &str = "margin-left";

/// Rendering parameters derived from the visual settings of the current update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub indent_step: u32,
    pub label_mode: LabelMode,
    pub measures_marker: String,
    pub separator: String,
    pub show_measures: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&VisualSettings::default())
    }
}

impl From<&VisualSettings> for RenderOptions {
    fn from(settings: &VisualSettings) -> Self {
        Self {
            indent_step: settings.layout.indent_step,
            label_mode: settings.labels.mode,
            measures_marker: settings.labels.measures_marker.clone(),
            separator: settings.labels.separator.clone(),
            show_measures: settings.labels.show_measures,
        }
    }
}

impl RenderOptions {
    pub fn indent(&self, level: u32) -> String {
        format!("{}px", u64::from(level) * u64::from(self.indent_step))
    }
}

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub reused: usize,
    pub removed: usize,
    pub branch_rows: usize,
    pub leaf_rows: usize,
}

impl fmt::Display for ReconcileStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "created={} reused={} removed={} branches={} leaves={}",
            self.created, self.reused, self.removed, self.branch_rows, self.leaf_rows
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct TreeReconciler {
    options: RenderOptions,
}

impl TreeReconciler {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Make the scene below its container match `view_model`.
    ///
    /// The empty view model clears any previously rendered tree.
    #[instrument(level = "debug", skip_all)]
    pub fn reconcile<S: SceneGraph>(
        &self,
        scene: &mut S,
        view_model: &VisualViewModel,
    ) -> DomainResult<ReconcileStats> {
        let mut stats = ReconcileStats::default();
        let container = scene.container();
        let roots = scene.select_children(container, Selector::element(ROOT_TAG).class(ROOT_CLASS))?;

        let categories = match view_model {
            VisualViewModel::Empty => {
                debug!(roots = roots.len(), "no data, clearing rendered tree");
                for root in roots {
                    scene.remove(root)?;
                    stats.removed += 1;
                }
                return Ok(stats);
            }
            VisualViewModel::Tree { categories } => categories,
        };

        // exactly one root: keep the first, drop strays
        let mut roots = roots.into_iter();
        let root = match roots.next() {
            Some(root) => root,
            None => {
                let root = scene.append_element(container, ROOT_TAG)?;
                scene.set_class(root, ROOT_CLASS, true)?;
                root
            }
        };
        for stray in roots {
            scene.remove(stray)?;
        }

        self.reconcile_children(scene, root, categories, &mut stats)?;
        info!("reconciled: {}", stats);
        Ok(stats)
    }

    /// Bind `data` to the tree rows directly under `parent`, then render each row.
    #[instrument(level = "trace", skip(self, scene, data, stats))]
    pub fn reconcile_children<S: SceneGraph>(
        &self,
        scene: &mut S,
        parent: NodeId,
        data: &[CategoryViewModel],
        stats: &mut ReconcileStats,
    ) -> DomainResult<()> {
        let existing = scene.select_children(parent, Selector::element(ROW_TAG).class(ROW_CLASS))?;
        let join = DataJoin::positional(&existing, data);

        for node in join.exit {
            scene.remove(node)?;
            stats.removed += 1;
        }

        let mut merged = join.update;
        stats.reused += merged.len();
        for datum in join.enter {
            let node = scene.append_element(parent, ROW_TAG)?;
            scene.set_class(node, ROW_CLASS, true)?;
            merged.push((node, datum));
            stats.created += 1;
        }

        for (node, category) in merged {
            self.render_row(scene, node, category, stats)?;
        }
        Ok(())
    }

    fn render_row<S: SceneGraph>(
        &self,
        scene: &mut S,
        node: NodeId,
        category: &CategoryViewModel,
        stats: &mut ReconcileStats,
    ) -> DomainResult<()> {
        let leaf = category.is_leaf();
        scene.set_class(node, BRANCH_CLASS, !leaf)?;
        scene.set_class(node, LEAF_CLASS, leaf)?;
        scene.set_style(node, INDENT_PROPERTY, &self.options.indent(category.level))?;

        let text = category.value.to_string();
        let label = match self.options.label_mode {
            LabelMode::Replace => {
                for label in scene.select_children(node, Selector::text())? {
                    scene.remove(label)?;
                }
                // label stays ahead of nested rows kept from the previous pass
                scene.prepend_text(node, &text)?
            }
            LabelMode::Append => scene.append_text(node, &text)?,
        };
        scene.set_class(label, LABEL_CLASS, true)?;

        if leaf {
            stats.leaf_rows += 1;
            // a row that used to be a branch must lose its nested rows
            self.reconcile_children(scene, node, &[], stats)?;
            if self.options.show_measures {
                self.render_measures(scene, node, category)?;
            }
        } else {
            stats.branch_rows += 1;
            self.reconcile_children(scene, node, &category.children, stats)?;
        }
        Ok(())
    }

    fn render_measures<S: SceneGraph>(
        &self,
        scene: &mut S,
        node: NodeId,
        category: &CategoryViewModel,
    ) -> DomainResult<()> {
        trace!(measures = category.values.len(), "rendering measures");
        let marker = scene.append_text(node, &self.options.measures_marker)?;
        scene.set_class(marker, VALUES_CLASS, true)?;
        for measure in category.values.values() {
            let text = format!("{}{}", measure.value, self.options.separator);
            let label = scene.append_text(node, &text)?;
            scene.set_class(label, VALUES_CLASS, true)?;
        }
        Ok(())
    }
}
