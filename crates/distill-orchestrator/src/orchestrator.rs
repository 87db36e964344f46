//! Stage sequencing for one pipeline run

use crate::{
    CancelFlag, CheckpointError, CheckpointStore, PipelineConfig, PipelineError, PipelineRun,
    ReportMetadata, RunMetrics, SynthesisReport,
};
use distill_clusterer::Clusterer;
use distill_domain::{
    AnalyzedDocument, BatchOutcome, Document, ItemFailure, ItemResult, PatternReport,
    PipelineStage, SynthesisChapter, ThemeStructure,
};
use distill_extractor::Extractor;
use distill_patterns::{CooccurrenceMiner, FrequencyMiner};
use distill_synthesizer::Synthesizer;
use distill_validator::Validator;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Runs the five stages in order and assembles the final report
///
/// Each stage consumes the complete output of the one before it. Stage
/// outputs are immutable once produced; checkpointing happens after each
/// stage as a side effect.
///
/// # Examples
///
/// ```
/// use distill_domain::Document;
/// use distill_orchestrator::{Orchestrator, PipelineConfig};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = Orchestrator::new(PipelineConfig::sequential())?;
/// let run = orchestrator
///     .run(vec![Document::new("doc_000", "notes.md", "Always keep a trading journal.")])
///     .await?;
///
/// assert_eq!(run.report.metadata.total_documents, 1);
/// assert_eq!(run.report.metadata.stage, "stage4_complete");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    config: PipelineConfig,
    extractor: Extractor,
    clusterer: Clusterer,
    synthesizer: Synthesizer,
    validator: Validator,
    checkpoints: Option<CheckpointStore>,
    cancel: CancelFlag,
}

impl Orchestrator {
    /// Create an orchestrator, building the extractor backend from `config`
    pub fn new(config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        let extractor = Extractor::from_config(config.extractor.clone())
            .map_err(|e| PipelineError::Config(e.to_string()))?;
        Self::with_extractor(config, extractor)
    }

    /// Create an orchestrator around an already configured extractor
    ///
    /// `config` is validated here as well; the extractor's own settings are
    /// taken as given.
    pub fn with_extractor(config: PipelineConfig, extractor: Extractor) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;

        let checkpoints = config
            .checkpoints
            .enabled
            .then(|| CheckpointStore::new(config.checkpoints.directory.clone()));

        info!(
            "Orchestrator initialized (strategy: {}, workers: {}, checkpoints: {})",
            extractor.strategy_name(),
            config.processing.parallel_workers,
            checkpoints.is_some()
        );

        Ok(Self {
            validator: Validator::new(config.validation.clone()),
            clusterer: Clusterer::new(),
            synthesizer: Synthesizer::new(),
            extractor,
            checkpoints,
            cancel: CancelFlag::new(),
            config,
        })
    }

    /// Get the active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Checkpoint store, if checkpoints are enabled
    pub fn checkpoint_store(&self) -> Option<&CheckpointStore> {
        self.checkpoints.as_ref()
    }

    /// Handle that cancels the run at the next stage boundary
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Run every stage over `documents`
    ///
    /// Item failures are collected in the returned run; a stage failure or a
    /// cancellation aborts the run.
    pub async fn run(&self, documents: Vec<Document>) -> Result<PipelineRun, PipelineError> {
        let run_id = Uuid::now_v7();
        info!(
            "Starting synthesis workflow {} with {} documents",
            run_id,
            documents.len()
        );

        let mut metrics = RunMetrics::new();
        let mut failures = Vec::new();

        match self.run_stages(documents, &mut metrics, &mut failures).await {
            Ok(report) => {
                info!("Synthesis workflow completed successfully");
                info!("{}", metrics.summary());
                Ok(PipelineRun {
                    run_id,
                    report,
                    failures,
                    metrics,
                })
            }
            Err(e) => {
                error!("Synthesis workflow failed: {}", e);
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        documents: Vec<Document>,
        metrics: &mut RunMetrics,
        failures: &mut Vec<ItemFailure>,
    ) -> Result<SynthesisReport, PipelineError> {
        self.check_cancelled(PipelineStage::Deconstruction)?;
        info!("=== STAGE 1: DECONSTRUCTION ===");
        let started = Instant::now();
        let outcome = self.deconstruct(documents).await;
        metrics.record_extraction(outcome.succeeded.len(), outcome.failures.len());
        failures.extend(outcome.failures);
        let analyzed = Arc::new(outcome.succeeded);
        self.save_checkpoint(PipelineStage::Deconstruction, analyzed.as_slice(), metrics)
            .await;
        finish_stage(PipelineStage::Deconstruction, started, metrics);

        self.check_cancelled(PipelineStage::PatternRecognition)?;
        info!("=== PATTERN RECOGNITION ===");
        let started = Instant::now();
        let patterns = Arc::new(self.recognize_patterns(&analyzed).await?);
        self.save_checkpoint(PipelineStage::PatternRecognition, patterns.as_ref(), metrics)
            .await;
        finish_stage(PipelineStage::PatternRecognition, started, metrics);

        self.check_cancelled(PipelineStage::Categorization)?;
        info!("=== STAGE 2: CATEGORIZATION ===");
        let started = Instant::now();
        let structure = self.categorize(&analyzed, &patterns)?;
        self.save_checkpoint(PipelineStage::Categorization, &structure, metrics)
            .await;
        finish_stage(PipelineStage::Categorization, started, metrics);

        self.check_cancelled(PipelineStage::Synthesis)?;
        info!("=== STAGE 3: SYNTHESIS ===");
        let started = Instant::now();
        let outcome = self.synthesize(&structure, &analyzed, &patterns).await;
        metrics.record_synthesis(outcome.succeeded.len(), outcome.failures.len());
        failures.extend(outcome.failures);
        let chapters = outcome.succeeded;
        self.save_checkpoint(PipelineStage::Synthesis, chapters.as_slice(), metrics)
            .await;
        finish_stage(PipelineStage::Synthesis, started, metrics);

        self.check_cancelled(PipelineStage::Validation)?;
        info!("=== STAGE 4: VALIDATION ===");
        let started = Instant::now();
        let validation = self.validator.validate(&chapters, &analyzed, &patterns);
        self.save_checkpoint(PipelineStage::Validation, &validation, metrics)
            .await;
        finish_stage(PipelineStage::Validation, started, metrics);

        info!("Compiling final report");
        Ok(SynthesisReport {
            metadata: ReportMetadata {
                total_documents: analyzed.len(),
                total_themes: structure.themes.len(),
                overall_quality_score: validation.overall_quality_score,
                stage: PipelineStage::Validation.completed_marker().to_string(),
            },
            themes: structure.themes,
            synthesis: chapters,
            validation,
            patterns: Arc::unwrap_or_clone(patterns),
        })
    }

    fn check_cancelled(&self, next: PipelineStage) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            warn!("Cancellation requested, stopping before {}", next);
            return Err(PipelineError::Cancelled { stage: next });
        }
        Ok(())
    }

    async fn deconstruct(&self, documents: Vec<Document>) -> BatchOutcome<AnalyzedDocument> {
        let total = documents.len();
        info!("Processing {} documents", total);

        let jobs: Vec<_> = documents
            .into_iter()
            .map(|doc| {
                let extractor = self.extractor.clone();
                (doc.document_id.clone(), move || extractor.analyze_item(&doc))
            })
            .collect();

        let outcome = self.run_bounded(PipelineStage::Deconstruction, jobs).await;
        info!(
            "Successfully analyzed {}/{} documents",
            outcome.succeeded.len(),
            total
        );
        outcome
    }

    async fn recognize_patterns(
        &self,
        analyzed: &Arc<Vec<AnalyzedDocument>>,
    ) -> Result<PatternReport, PipelineError> {
        let docs = Arc::clone(analyzed);
        let frequency = tokio::task::spawn_blocking(move || FrequencyMiner::new().mine(&docs));
        let docs = Arc::clone(analyzed);
        let cooccurrence =
            tokio::task::spawn_blocking(move || CooccurrenceMiner::new().mine(&docs));

        let (frequency, cooccurrence) = tokio::join!(frequency, cooccurrence);
        let stage_failed = |e: JoinError| PipelineError::Stage {
            stage: PipelineStage::PatternRecognition,
            reason: e.to_string(),
        };

        Ok(PatternReport::new(
            frequency.map_err(stage_failed)?,
            cooccurrence.map_err(stage_failed)?,
        ))
    }

    fn categorize(
        &self,
        analyzed: &[AnalyzedDocument],
        patterns: &PatternReport,
    ) -> Result<ThemeStructure, PipelineError> {
        let structure = self.clusterer.cluster(analyzed, patterns);
        structure
            .check_partition(analyzed.iter().map(|doc| doc.document_id.as_str()))
            .map_err(|reason| PipelineError::Stage {
                stage: PipelineStage::Categorization,
                reason,
            })?;
        Ok(structure)
    }

    async fn synthesize(
        &self,
        structure: &ThemeStructure,
        analyzed: &Arc<Vec<AnalyzedDocument>>,
        patterns: &Arc<PatternReport>,
    ) -> BatchOutcome<SynthesisChapter> {
        let total = structure.themes.len();
        info!("Synthesizing insights for {} themes", total);

        let jobs: Vec<_> = structure
            .themes
            .iter()
            .map(|theme| {
                let theme = theme.clone();
                let docs = Arc::clone(analyzed);
                let patterns = Arc::clone(patterns);
                let synthesizer = self.synthesizer;
                (theme.theme_id.clone(), move || {
                    synthesizer.synthesize_item(&theme, &docs, &patterns)
                })
            })
            .collect();

        let outcome = self.run_bounded(PipelineStage::Synthesis, jobs).await;
        info!(
            "Successfully synthesized {}/{} chapters",
            outcome.succeeded.len(),
            total
        );
        outcome
    }

    /// Run per-item jobs on blocking workers, at most `parallel_workers` at once
    ///
    /// Results are returned in job order regardless of completion order. A
    /// worker that panics becomes a failure for its own item only.
    async fn run_bounded<T, F>(&self, stage: PipelineStage, jobs: Vec<(String, F)>) -> BatchOutcome<T>
    where
        T: Send + 'static,
        F: FnOnce() -> ItemResult<T> + Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.config.processing.parallel_workers));
        let mut handles = Vec::with_capacity(jobs.len());

        for (item_id, job) in jobs {
            // Never closed, so this only waits for a free slot
            let permit = Arc::clone(&semaphore).acquire_owned().await;
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job()
            });
            handles.push((item_id, handle));
        }

        let mut results: Vec<ItemResult<T>> = Vec::with_capacity(handles.len());
        for (item_id, handle) in handles {
            let result = handle.await.unwrap_or_else(|e| {
                warn!("Worker for {} did not complete: {}", item_id, e);
                Err(ItemFailure::new(
                    item_id,
                    stage,
                    format!("worker did not complete: {}", e),
                ))
            });
            results.push(result);
        }

        results.into_iter().collect()
    }

    async fn save_checkpoint<T>(&self, stage: PipelineStage, data: &T, metrics: &mut RunMetrics)
    where
        T: Serialize + Sync + ?Sized,
    {
        let Some(store) = &self.checkpoints else {
            return;
        };

        match self.write_checkpoint(store, stage, data).await {
            Ok(path) => {
                info!("Checkpoint saved: {}", path.display());
                metrics.record_checkpoint(true);
            }
            Err(e) => {
                warn!("Checkpoint for {} not written: {}", stage, e);
                metrics.record_checkpoint(false);
            }
        }
    }

    async fn write_checkpoint<T>(
        &self,
        store: &CheckpointStore,
        stage: PipelineStage,
        data: &T,
    ) -> Result<PathBuf, CheckpointError>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = serde_json::to_value(data)?;
        let store = store.clone();
        let timeout = self.config.checkpoints.write_timeout();
        // A fired timeout does not stop the blocking write; the deadline does
        let deadline = Instant::now() + timeout;
        let write =
            tokio::task::spawn_blocking(move || store.save_within(stage, &value, Some(deadline)));

        match tokio::time::timeout(timeout, write).await {
            Ok(joined) => joined.map_err(|e| CheckpointError::Task(e.to_string()))?,
            Err(_) => Err(CheckpointError::Timeout(
                self.config.checkpoints.write_timeout_secs,
            )),
        }
    }
}

fn finish_stage(stage: PipelineStage, started: Instant, metrics: &mut RunMetrics) {
    metrics.record_stage(stage, started.elapsed());
    debug!("Reached {}", stage.completed_marker());
}
