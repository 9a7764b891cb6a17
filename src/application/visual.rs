//! The visual: one long-lived scene updated by successive host snapshots.

use tracing::{debug, instrument};

use crate::application::error::ApplicationResult;
use crate::domain::{
    visual_transform, ArenaScene, ReconcileStats, RenderOptions, SceneGraph, TreeReconciler,
    UpdateOptions, VisualObjectInstance, VisualSettings, VisualViewModel,
};

/// Host-facing visual owning the rendered scene.
///
/// Update cycles are call/return: each `update` runs the builder and a full
/// reconciliation pass before it returns.
#[derive(Debug)]
pub struct Visual<S: SceneGraph = ArenaScene> {
    scene: S,
    defaults: VisualSettings,
    settings: Option<VisualSettings>,
}

impl Default for Visual<ArenaScene> {
    fn default() -> Self {
        Self::new(ArenaScene::new(), VisualSettings::default())
    }
}

impl<S: SceneGraph> Visual<S> {
    /// `defaults` apply whenever the host supplies no settings objects.
    pub fn new(scene: S, defaults: VisualSettings) -> Self {
        Self {
            scene,
            defaults,
            settings: None,
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn update(&mut self, options: &UpdateOptions) -> ApplicationResult<ReconcileStats> {
        let view_model = visual_transform(options.data_views.as_deref());
        self.update_internal(options, &view_model)
    }

    /// Render an already built view model for `options`.
    pub fn update_internal(
        &mut self,
        options: &UpdateOptions,
        view_model: &VisualViewModel,
    ) -> ApplicationResult<ReconcileStats> {
        let settings = VisualSettings::parse(options.primary_data_view(), &self.defaults);
        debug!(?settings, "parsed settings");
        let reconciler = TreeReconciler::new(RenderOptions::from(&settings));
        self.settings = Some(settings);

        Ok(reconciler.reconcile(&mut self.scene, view_model)?)
    }

    /// Settings of the latest update, or the defaults before the first one.
    pub fn settings(&self) -> &VisualSettings {
        self.settings.as_ref().unwrap_or(&self.defaults)
    }

    pub fn enumerate_object_instances(&self, object_name: &str) -> Vec<VisualObjectInstance> {
        self.settings().enumerate_object_instances(object_name)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }
}
