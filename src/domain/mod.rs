//! Domain layer: matrix model, view-model builder, scene graph and reconciler
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod join;
pub mod matrix;
pub mod reconciler;
pub mod scene;
pub mod settings;
pub mod view_model;

pub use arena::{ArenaScene, SceneSnapshot};
pub use error::{DomainError, DomainResult};
pub use join::DataJoin;
pub use matrix::*;
pub use reconciler::{ReconcileStats, RenderOptions, TreeReconciler};
pub use scene::{NodeId, NodeKind, SceneGraph, SceneNode, Selector};
pub use settings::{LabelMode, VisualObjectInstance, VisualSettings};
pub use view_model::{visual_transform, CategoryViewModel, MeasureViewModel, VisualViewModel};
