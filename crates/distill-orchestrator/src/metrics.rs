//! Metrics collected during a pipeline run

use distill_domain::PipelineStage;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counters and timings for one run
///
/// Tracks per-stage durations, item successes and failures, and checkpoint
/// writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Wall time per completed stage, in execution order
    pub stage_durations: Vec<(PipelineStage, Duration)>,

    /// Documents that produced an analysis
    pub documents_analyzed: usize,

    /// Documents dropped in stage 1
    pub documents_failed: usize,

    /// Themes that produced a chapter
    pub chapters_synthesized: usize,

    /// Themes dropped in stage 3
    pub chapters_failed: usize,

    /// Checkpoints written
    pub checkpoints_written: usize,

    /// Checkpoint writes that failed or timed out
    pub checkpoints_failed: usize,
}

impl RunMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed stage
    pub fn record_stage(&mut self, stage: PipelineStage, elapsed: Duration) {
        self.stage_durations.push((stage, elapsed));
    }

    /// Record the outcome of stage 1
    pub fn record_extraction(&mut self, analyzed: usize, failed: usize) {
        self.documents_analyzed += analyzed;
        self.documents_failed += failed;
    }

    /// Record the outcome of stage 3
    pub fn record_synthesis(&mut self, synthesized: usize, failed: usize) {
        self.chapters_synthesized += synthesized;
        self.chapters_failed += failed;
    }

    /// Record a checkpoint write
    pub fn record_checkpoint(&mut self, written: bool) {
        if written {
            self.checkpoints_written += 1;
        } else {
            self.checkpoints_failed += 1;
        }
    }

    /// Duration of `stage`, if it completed
    pub fn stage_duration(&self, stage: PipelineStage) -> Option<Duration> {
        self.stage_durations
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, d)| *d)
    }

    /// Sum of stage durations
    pub fn total_runtime(&self) -> Duration {
        self.stage_durations.iter().map(|(_, d)| *d).sum()
    }

    /// Items dropped across all stages
    pub fn total_failures(&self) -> usize {
        self.documents_failed + self.chapters_failed
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Pipeline Metrics Summary".to_string(),
            "========================".to_string(),
            format!(
                "Documents: {} analyzed, {} failed",
                self.documents_analyzed, self.documents_failed
            ),
            format!(
                "Chapters: {} synthesized, {} failed",
                self.chapters_synthesized, self.chapters_failed
            ),
            format!(
                "Checkpoints: {} written, {} failed",
                self.checkpoints_written, self.checkpoints_failed
            ),
            String::new(),
        ];

        if !self.stage_durations.is_empty() {
            lines.push("Stage durations:".to_string());
            for (stage, elapsed) in &self.stage_durations {
                lines.push(format!("  {}: {:.3}s", stage, elapsed.as_secs_f64()));
            }
            lines.push(format!("  Total: {:.3}s", self.total_runtime().as_secs_f64()));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = RunMetrics::new();
        assert_eq!(metrics.total_failures(), 0);
        assert_eq!(metrics.total_runtime(), Duration::ZERO);
        assert!(metrics.stage_durations.is_empty());
    }

    #[test]
    fn test_record_items() {
        let mut metrics = RunMetrics::new();
        metrics.record_extraction(3, 1);
        metrics.record_synthesis(2, 1);

        assert_eq!(metrics.documents_analyzed, 3);
        assert_eq!(metrics.chapters_failed, 1);
        assert_eq!(metrics.total_failures(), 2);
    }

    #[test]
    fn test_record_checkpoints() {
        let mut metrics = RunMetrics::new();
        metrics.record_checkpoint(true);
        metrics.record_checkpoint(true);
        metrics.record_checkpoint(false);

        assert_eq!(metrics.checkpoints_written, 2);
        assert_eq!(metrics.checkpoints_failed, 1);
    }

    #[test]
    fn test_stage_durations() {
        let mut metrics = RunMetrics::new();
        metrics.record_stage(PipelineStage::Deconstruction, Duration::from_millis(1500));
        metrics.record_stage(PipelineStage::Validation, Duration::from_millis(500));

        assert_eq!(
            metrics.stage_duration(PipelineStage::Deconstruction),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(metrics.stage_duration(PipelineStage::Synthesis), None);
        assert_eq!(metrics.total_runtime(), Duration::from_secs(2));
    }

    #[test]
    fn test_summary() {
        let mut metrics = RunMetrics::new();
        metrics.record_extraction(4, 0);
        metrics.record_checkpoint(false);
        metrics.record_stage(PipelineStage::Deconstruction, Duration::from_millis(250));

        let summary = metrics.summary();
        assert!(summary.contains("Documents: 4 analyzed, 0 failed"));
        assert!(summary.contains("Checkpoints: 0 written, 1 failed"));
        assert!(summary.contains("stage1_deconstruction: 0.250s"));
        assert!(summary.contains("Total: 0.250s"));
    }
}
