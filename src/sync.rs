//! Build, extract and compare passes over a [`LaunchpadStore`].
//!
//! A build runs resolve → normalize → build for widgets and then apps, and
//! only touches the store once both plans exist. It always starts by
//! deleting every container, so an interrupted build is repaired by running
//! it again.

use tracing::{debug, info, instrument};

use crate::common::collections::BTreeSet;
use crate::error::Result;
use crate::model::{
    APPS_ROOT_ID, ContainerKind, IdentityMap, ItemKind, LaunchpadLayout, Layout, WIDGETS_ROOT_ID,
};
use crate::storage::{LaunchpadStore, create_reserved_roots, with_ordering_suspended};

pub mod build;
pub mod compare;
pub mod extract;
pub mod identity;
pub mod normalize;
pub mod report;

pub use build::{BuildPlan, SequentialTokens, TokenSource, UuidTokens};
pub use compare::{Comparison, Difference, layouts_equal};
pub use report::{Diagnostic, Reporter, TracingReporter};

use report::Recorder;

/// The planned writes for one build pass.
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub widgets: BuildPlan,
    pub apps: BuildPlan,
    pub missing_widgets: BTreeSet<String>,
    pub missing_apps: BTreeSet<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyncPlan {
    pub fn end_id(&self) -> i64 { self.apps.end_id() }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindSummary {
    pub kind: ItemKind,
    pub pages: usize,
    pub containers: usize,
    pub placed: usize,
    pub missing: BTreeSet<String>,
    pub unresolved: Vec<String>,
}

impl KindSummary {
    fn new(plan: &BuildPlan, missing: &BTreeSet<String>) -> Self {
        Self {
            kind: plan.kind,
            pages: plan.pages,
            containers: plan.containers.len(),
            placed: plan.placed_items().count(),
            missing: missing.clone(),
            unresolved: plan.unresolved.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub widgets: KindSummary,
    pub apps: KindSummary,
    pub end_id: i64,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Synchronizer<S, R = TracingReporter> {
    store: S,
    reporter: R,
    tokens: Box<dyn TokenSource>,
}

impl<S: LaunchpadStore> Synchronizer<S, TracingReporter> {
    pub fn new(store: S) -> Self { Self::with_reporter(store, TracingReporter) }
}

impl<S: LaunchpadStore, R: Reporter> Synchronizer<S, R> {
    pub fn with_reporter(store: S, reporter: R) -> Self {
        Self {
            store,
            reporter,
            tokens: Box::new(UuidTokens),
        }
    }

    pub fn with_tokens(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Box::new(tokens);
        self
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn reporter(&self) -> &R { &self.reporter }

    pub fn into_inner(self) -> (S, R) { (self.store, self.reporter) }

    /// Computes the full build without writing anything.
    #[instrument(skip_all)]
    pub fn plan(&mut self, document: &LaunchpadLayout) -> Result<SyncPlan> {
        let mut recorder = Recorder::new(&mut self.reporter);

        let widget_map = identity::resolve(&mut self.store, ItemKind::Widget, &mut recorder)?;
        let app_map = identity::resolve(&mut self.store, ItemKind::Application, &mut recorder)?;
        let start_id = app_map.max_id().max(widget_map.max_id()).max(self.store.max_item_id()?);
        debug!(start_id, "container ids start after");

        let widgets = normalize_kind(ItemKind::Widget, &document.widget_layout, &widget_map, &mut recorder);
        let apps = normalize_kind(ItemKind::Application, &document.app_layout, &app_map, &mut recorder);

        let widget_plan = build::build(
            ItemKind::Widget,
            &widgets.layout,
            &widget_map,
            start_id,
            WIDGETS_ROOT_ID,
            self.tokens.as_mut(),
            &mut recorder,
        );
        let app_plan = build::build(
            ItemKind::Application,
            &apps.layout,
            &app_map,
            widget_plan.end_id(),
            APPS_ROOT_ID,
            self.tokens.as_mut(),
            &mut recorder,
        );

        Ok(SyncPlan {
            widgets: widget_plan,
            apps: app_plan,
            missing_widgets: widgets.missing,
            missing_apps: apps.missing,
            diagnostics: recorder.seen,
        })
    }

    /// Replaces every container in the store with the tree described by
    /// `plan`.
    #[instrument(skip_all)]
    pub fn apply(&mut self, plan: &SyncPlan) -> Result<()> {
        let removed = self.store.delete_all_containers(&ContainerKind::ALL)?;
        info!(removed, "cleared existing containers");

        with_ordering_suspended(&mut self.store, |store| {
            create_reserved_roots(store)?;
            plan.widgets.apply(store)?;
            plan.apps.apply(store)
        })?;
        info!(end_id = plan.end_id(), "rebuilt launchpad hierarchy");
        Ok(())
    }

    pub fn build(&mut self, document: &LaunchpadLayout) -> Result<BuildReport> {
        let plan = self.plan(document)?;
        self.apply(&plan)?;
        Ok(BuildReport {
            widgets: KindSummary::new(&plan.widgets, &plan.missing_widgets),
            apps: KindSummary::new(&plan.apps, &plan.missing_apps),
            end_id: plan.end_id(),
            diagnostics: plan.diagnostics,
        })
    }

    #[instrument(skip_all)]
    pub fn extract(&mut self) -> Result<LaunchpadLayout> {
        let roots = self.store.root_ids()?;
        let children = self.store.children_by_parent()?;
        Ok(LaunchpadLayout {
            app_layout: extract::extract(roots.launchpad, &children),
            widget_layout: extract::extract(roots.dashboard, &children),
        })
    }

    /// Compares `document` against what the store currently holds.
    pub fn compare(&mut self, document: &LaunchpadLayout) -> Result<Comparison> {
        let current = self.extract()?;
        Ok(compare::compare(document, &current))
    }
}

fn normalize_kind(
    kind: ItemKind,
    layout: &Layout,
    map: &IdentityMap,
    reporter: &mut dyn Reporter,
) -> normalize::Normalized {
    let normalized = normalize::normalize(layout, map);
    if !normalized.missing.is_empty() {
        reporter.report(&Diagnostic::MissingItems {
            kind,
            titles: normalized.missing.iter().cloned().collect(),
        });
    }
    normalized
}
