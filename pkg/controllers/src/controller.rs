use pkg_constants::state::DEFAULT_RECONCILE_INTERVAL_SECS;
use pkg_state::client::Client;
use pkg_state::store::ObjectStore;
use pkg_types::labels::MetadataKeys;
use pkg_types::meta::ObjectKey;
use pkg_types::namespace::NamespaceSpec;
use pkg_types::object::Spec;
use pkg_types::project::{Project, ProjectSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::component::Component;
use crate::project::ProjectContext;
use crate::projectns::{ProjectNamespace, Violation};
use crate::sync::{
    LimitRangeSyncer, NamespaceSyncer, QuotaDefaults, ResourceQuotaSyncer, ServiceMonitorSyncer,
};
use crate::syncer::{ObjectSyncer, SyncError, SyncOutcome, sync_object};

/// Result of reconciling one project.
#[derive(Debug, Default)]
pub struct ProjectReport {
    pub project: String,
    /// `(kind, key, outcome)` for every object that synced.
    pub synced: Vec<(&'static str, ObjectKey, SyncOutcome)>,
    /// Namespace metadata problems. Children are skipped while non-empty.
    pub violations: Vec<Violation>,
    pub errors: Vec<SyncError>,
}

impl ProjectReport {
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty() && self.errors.is_empty()
    }
}

/// Counts from one full reconciliation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    pub projects: usize,
    pub reconciled: usize,
    pub invalid: usize,
    pub failed: usize,
}

/// Controller that reconciles Projects into their namespace and child objects.
///
/// Passes run one at a time and handle projects sequentially, so no two
/// syncs for the same object ever overlap. A failing object is logged and
/// retried on the next pass; it never stops the rest of the pass.
pub struct ProjectController<St> {
    client: Client<St>,
    keys: Arc<MetadataKeys>,
    quota_defaults: Arc<QuotaDefaults>,
    check_interval: Duration,
}

impl<St: ObjectStore + 'static> ProjectController<St> {
    pub fn new(
        client: Client<St>,
        keys: Arc<MetadataKeys>,
        quota_defaults: Arc<QuotaDefaults>,
    ) -> Self {
        Self {
            client,
            keys,
            quota_defaults,
            check_interval: Duration::from_secs(DEFAULT_RECONCILE_INTERVAL_SECS),
        }
    }

    pub fn with_interval(mut self, check_interval: Duration) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// Start the controller loop as a background task.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "ProjectController started (interval={}s)",
                self.check_interval.as_secs()
            );
            let mut interval = tokio::time::interval(self.check_interval);
            loop {
                interval.tick().await;
                if let Err(e) = self.reconcile().await {
                    warn!("ProjectController reconcile error: {}", e);
                }
            }
        })
    }

    /// One pass over every project.
    pub async fn reconcile(&self) -> anyhow::Result<PassSummary> {
        let entries = self.client.list_each::<ProjectSpec>(None).await?;
        let mut summary = PassSummary {
            projects: entries.len(),
            ..Default::default()
        };

        for (path, decoded) in entries {
            let project = match decoded {
                Ok(project) => project,
                Err(e) => {
                    warn!("Skipping project at {}: {}", path, e);
                    summary.failed += 1;
                    continue;
                }
            };
            let report = self.reconcile_project(project).await;
            for err in &report.errors {
                if err.is_retryable() {
                    info!("Project {}: {} (will retry)", report.project, err);
                } else {
                    warn!("Project {}: {}", report.project, err);
                }
            }
            if !report.errors.is_empty() {
                summary.failed += 1;
            } else if !report.violations.is_empty() {
                summary.invalid += 1;
            } else {
                summary.reconciled += 1;
            }
        }

        debug!(
            "ProjectController pass: {} projects, {} reconciled, {} invalid, {} failed",
            summary.projects, summary.reconciled, summary.invalid, summary.failed
        );
        Ok(summary)
    }

    /// Sync the namespace, check it, then sync every child object.
    pub async fn reconcile_project(&self, project: Project) -> ProjectReport {
        let project = ProjectContext::new(project, self.keys.clone());
        let mut report = ProjectReport {
            project: project.name().to_string(),
            ..Default::default()
        };

        let namespace = match sync_object(&self.client, &NamespaceSyncer::new(&project)).await {
            Ok(result) => {
                report
                    .synced
                    .push((NamespaceSpec::KIND, result.object.key(), result.outcome));
                ProjectNamespace::new(result.object, self.keys.clone())
            }
            Err(e) => {
                report.errors.push(e);
                return report;
            }
        };

        report.violations = namespace.validate_metadata();
        if !report.violations.is_empty() {
            for violation in &report.violations {
                warn!(
                    "Namespace {}: {}; skipping child objects",
                    namespace.name(),
                    violation
                );
            }
            return report;
        }

        let quota = ResourceQuotaSyncer::new(&namespace, &self.quota_defaults);
        self.run(&quota, &mut report).await;
        self.run(&LimitRangeSyncer::new(&namespace), &mut report).await;
        for component in Component::MONITORED {
            self.run(&ServiceMonitorSyncer::new(&namespace, component), &mut report)
                .await;
        }
        report
    }

    async fn run<Y: ObjectSyncer>(&self, syncer: &Y, report: &mut ProjectReport) {
        match sync_object(&self.client, syncer).await {
            Ok(result) => report.synced.push((
                <Y::Spec as Spec>::KIND,
                result.object.key(),
                result.outcome,
            )),
            Err(e) => report.errors.push(e),
        }
    }
}
