use crate::app::export::PlanExporter;
use crate::core::planner::SemPlanner;
use crate::core::Storage;
use crate::domain::model::{SemInputs, SemPlan};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Outcome of one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub plan: SemPlan,
    pub written: Vec<String>,
}

/// Runs one plan generation and export, logging resource usage per phase.
pub struct BatchRunner<S: Storage> {
    planner: SemPlanner,
    exporter: PlanExporter<S>,
    monitor: SystemMonitor,
}

impl<S: Storage> BatchRunner<S> {
    pub fn new(planner: SemPlanner, exporter: PlanExporter<S>) -> Self {
        Self::new_with_monitoring(planner, exporter, false)
    }

    pub fn new_with_monitoring(
        planner: SemPlanner,
        exporter: PlanExporter<S>,
        monitoring: bool,
    ) -> Self {
        Self {
            planner,
            exporter,
            monitor: SystemMonitor::new(monitoring),
        }
    }

    pub async fn run(&self, inputs: &SemInputs) -> Result<BatchReport> {
        tracing::info!("🚀 Starting SEM plan generation");
        self.monitor.log_stats("Start");

        let plan = self.planner.generate_sem_plan(inputs).await?;
        tracing::info!(
            "📊 Plan ready: {} keywords, {} total volume, avg CPC {:.2}",
            plan.total_keywords,
            plan.total_volume,
            plan.avg_cpc
        );
        self.monitor.log_stats("Planning");

        let written = self.exporter.export(&plan).await?;
        tracing::info!("📁 Exported {} file(s)", written.len());
        self.monitor.log_stats("Export");

        self.monitor.log_final_stats();
        Ok(BatchReport { plan, written })
    }
}
