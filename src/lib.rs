//! Render an arbitrarily deep host data matrix as a nested tree and keep the rendered
//! tree reconciled with the data across updates.
//!
//! Layers, innermost first:
//! - [`domain`]: matrix model, view-model builder, scene graph, reconciler
//! - [`application`]: the [`application::Visual`] driven by host updates
//! - [`infrastructure`]: snapshot loading behind I/O traits
//! - [`cli`]: the `matrix-tree` command line

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::Visual;
pub use domain::{
    visual_transform, ArenaScene, CategoryViewModel, ReconcileStats, SceneGraph, TreeReconciler,
    UpdateOptions, VisualViewModel,
};
