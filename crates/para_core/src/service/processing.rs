//! Thought-to-resource processing pipeline.
//!
//! # Responsibility
//! - Sequence validation, status transitions, duplicate check,
//!   categorization and resource synthesis for one thought.
//! - Convert every failure into a uniform [`ProcessingResult`].
//! - Run batches sequentially or on a bounded worker pool.
//!
//! # Invariants
//! - `process`, `process_many` and `process_many_parallel` never return an
//!   error and never let a categorizer panic escape.
//! - A failure always attempts `-> Failed` on the most advanced thought; if
//!   that move is illegal, the thought is returned unchanged.
//! - Batch output has one result per input, in input order.
//! - The processor holds no mutable state; calls are independent.

use crate::config::ProcessingConfig;
use crate::logging::panic_message;
use crate::model::categorization::CategorizationResult;
use crate::model::error::{ModelError, ModelResult};
use crate::model::resource::{NewResource, Resource};
use crate::model::status::ProcessingStatus;
use crate::model::tags::ResourceTags;
use crate::model::thought::Thought;
use crate::service::categorizer::{Categorizer, CategorizerError, UserContext};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use regex::Regex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

static SLUG_INVALID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_-]").expect("valid slug regex"));

/// Tag added when a categorization asks for human review.
pub const REQUIRES_REVIEW_TAG: &str = "requires-review";

/// Errors raised inside the pipeline.
///
/// Only [`ProcessingError::InvalidRetryState`] ever reaches callers; every
/// other kind is folded into a failure [`ProcessingResult`].
#[derive(Debug)]
pub enum ProcessingError {
    /// Malformed or out-of-state input.
    Validation(String),
    /// Injected duplicate check rejected the thought.
    Duplication(String),
    Categorization(CategorizerError),
    ResourceCreation(ModelError),
    /// Panic or other failure outside the known kinds.
    Unexpected(String),
    /// `retry` called on a thought that is not `Failed`.
    InvalidRetryState(ProcessingStatus),
}

impl ProcessingError {
    /// Stable kind label for metadata-only logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Duplication(_) => "duplication",
            Self::Categorization(_) => "categorization",
            Self::ResourceCreation(_) => "resource_creation",
            Self::Unexpected(_) => "unexpected",
            Self::InvalidRetryState(_) => "invalid_retry_state",
        }
    }
}

impl Display for ProcessingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(details) => write!(f, "{details}"),
            Self::Duplication(details) => write!(f, "Duplicate thought detected: {details}"),
            Self::Categorization(err) => write!(f, "Categorization failed: {err}"),
            Self::ResourceCreation(err) => write!(f, "Resource creation failed: {err}"),
            Self::Unexpected(details) => {
                write!(f, "Unexpected error during processing: {details}")
            }
            Self::InvalidRetryState(status) => write!(
                f,
                "Cannot retry processing for thought with status: {status}. Only FAILED thoughts can be retried."
            ),
        }
    }
}

impl Error for ProcessingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Categorization(err) => Some(err),
            Self::ResourceCreation(err) => Some(err),
            _ => None,
        }
    }
}

/// Duplicate-detection seam run after a thought enters `Processing`.
///
/// Returning `Some(reason)` fails the thought with
/// [`ProcessingError::Duplication`].
pub trait DuplicateCheck {
    fn find_duplicate(&self, thought: &Thought, context: Option<&UserContext>) -> Option<String>;
}

/// Default check: nothing is ever a duplicate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicateCheck;

impl DuplicateCheck for NoDuplicateCheck {
    fn find_duplicate(&self, _thought: &Thought, _context: Option<&UserContext>) -> Option<String> {
        None
    }
}

impl<F> DuplicateCheck for F
where
    F: Fn(&Thought) -> Option<String>,
{
    fn find_duplicate(&self, thought: &Thought, _context: Option<&UserContext>) -> Option<String> {
        self(thought)
    }
}

/// Outcome of processing one thought.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingResult {
    success: bool,
    thought: Thought,
    resource: Option<Resource>,
    error_message: Option<String>,
    processing_time_ms: u64,
}

impl ProcessingResult {
    pub fn success(thought: Thought, resource: Resource, processing_time_ms: u64) -> Self {
        Self {
            success: true,
            thought,
            resource: Some(resource),
            error_message: None,
            processing_time_ms,
        }
    }

    pub fn failure(
        thought: Thought,
        error_message: impl Into<String>,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            success: false,
            thought,
            resource: None,
            error_message: Some(error_message.into()),
            processing_time_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Thought in its post-processing state.
    pub fn thought(&self) -> &Thought {
        &self.thought
    }

    /// Present iff the result is a success.
    pub fn resource(&self) -> Option<&Resource> {
        self.resource.as_ref()
    }

    /// Present iff the result is a failure.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn processing_time_ms(&self) -> u64 {
        self.processing_time_ms
    }

    pub fn into_parts(self) -> (Thought, Option<Resource>, Option<String>) {
        (self.thought, self.resource, self.error_message)
    }
}

/// Aggregate view over a list of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingStatistics {
    pub total_processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage in `[0, 100]`; `0` for empty input.
    pub success_rate: f64,
    /// `0.0` for empty input.
    pub average_processing_time_ms: f64,
}

impl ProcessingStatistics {
    pub fn from_results(results: &[ProcessingResult]) -> Self {
        let total = results.len();
        if total == 0 {
            return Self {
                total_processed: 0,
                successful: 0,
                failed: 0,
                success_rate: 0.0,
                average_processing_time_ms: 0.0,
            };
        }

        let successful = results.iter().filter(|result| result.success).count();
        let total_time: u64 = results.iter().map(|result| result.processing_time_ms).sum();

        Self {
            total_processed: total,
            successful,
            failed: total - successful,
            success_rate: successful as f64 / total as f64 * 100.0,
            average_processing_time_ms: total_time as f64 / total as f64,
        }
    }
}

/// Workflow engine turning thoughts into resources.
///
/// The worker pool for parallel batches is built once at construction;
/// `None` means it could not be built and batches run sequentially.
pub struct ThoughtProcessor<C: Categorizer, D: DuplicateCheck = NoDuplicateCheck> {
    categorizer: C,
    duplicates: D,
    config: ProcessingConfig,
    pool: Option<ThreadPool>,
}

impl<C: Categorizer> ThoughtProcessor<C> {
    /// Creates a processor with default config and no duplicate detection.
    pub fn new(categorizer: C) -> Self {
        Self::with_config(categorizer, ProcessingConfig::default())
    }

    pub fn with_config(categorizer: C, config: ProcessingConfig) -> Self {
        let pool = build_worker_pool(config.max_parallel_workers);
        Self {
            categorizer,
            duplicates: NoDuplicateCheck,
            config,
            pool,
        }
    }
}

impl<C: Categorizer, D: DuplicateCheck> ThoughtProcessor<C, D> {
    /// Replaces the duplicate-detection seam.
    pub fn with_duplicate_check<D2: DuplicateCheck>(self, duplicates: D2) -> ThoughtProcessor<C, D2> {
        ThoughtProcessor {
            categorizer: self.categorizer,
            duplicates,
            config: self.config,
            pool: self.pool,
        }
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn categorizer(&self) -> &C {
        &self.categorizer
    }

    /// Processes one thought end to end.
    ///
    /// Never fails: every error, including a panicking categorizer, becomes a
    /// failure result carrying the thought moved to `Failed` when legal.
    pub fn process(&self, thought: &Thought, context: Option<&UserContext>) -> ProcessingResult {
        let started = Instant::now();
        let mut in_flight: Option<Thought> = None;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.run_pipeline(thought, context, &mut in_flight)
        }))
        .unwrap_or_else(|payload| Err(ProcessingError::Unexpected(panic_message(payload.as_ref()))));
        let elapsed = elapsed_ms(started);

        match outcome {
            Ok((completed, resource, categorization)) => {
                info!(
                    "event=thought_processed module=processing status=ok thought_id={} resource_id={} category={} confidence={:.2} confident={} requires_review={} auto_categorize={} elapsed_ms={}",
                    completed.id(),
                    resource.id(),
                    resource.category(),
                    categorization.confidence(),
                    categorization.is_confident(self.config.confident_threshold),
                    categorization.requires_review(),
                    categorization.should_auto_categorize(self.config.auto_categorize_threshold),
                    elapsed
                );
                ProcessingResult::success(completed, resource, elapsed)
            }
            Err(err) => {
                let current = in_flight.unwrap_or_else(|| thought.clone());
                let failed = mark_failed_or_keep(&current);
                warn!(
                    "event=thought_processed module=processing status=error thought_id={} kind={} thought_status={} elapsed_ms={}",
                    failed.id(),
                    err.kind(),
                    failed.status(),
                    elapsed
                );
                ProcessingResult::failure(failed, err.to_string(), elapsed)
            }
        }
    }

    /// Processes thoughts one after another, isolating each item.
    pub fn process_many(
        &self,
        thoughts: &[Thought],
        context: Option<&UserContext>,
    ) -> Vec<ProcessingResult> {
        let results: Vec<ProcessingResult> = thoughts
            .iter()
            .map(|thought| self.process_isolated(thought, context))
            .collect();
        log_batch("sequential", &results);
        results
    }

    /// Retries a `Failed` thought from a fresh `Pending` state.
    ///
    /// # Errors
    /// - `InvalidRetryState` when the thought is not `Failed`.
    pub fn retry(
        &self,
        thought: &Thought,
        context: Option<&UserContext>,
    ) -> Result<ProcessingResult, ProcessingError> {
        let rearmed = thought
            .reset_for_retry()
            .map_err(|_| ProcessingError::InvalidRetryState(thought.status()))?;
        debug!(
            "event=thought_retry module=processing status=ok thought_id={}",
            rearmed.id()
        );
        Ok(self.process(&rearmed, context))
    }

    /// Returns whether `process` would accept the thought past validation.
    pub fn can_process(&self, thought: &Thought) -> bool {
        validate_thought(thought).is_ok()
    }

    fn run_pipeline(
        &self,
        thought: &Thought,
        context: Option<&UserContext>,
        in_flight: &mut Option<Thought>,
    ) -> Result<(Thought, Resource, CategorizationResult), ProcessingError> {
        validate_thought(thought)?;

        let processing = thought
            .mark_processing()
            .map_err(|err| ProcessingError::Validation(format!("Cannot start processing: {err}")))?;
        *in_flight = Some(processing.clone());

        if let Some(reason) = self.duplicates.find_duplicate(&processing, context) {
            return Err(ProcessingError::Duplication(reason));
        }

        let categorization = self
            .categorizer
            .classify(&processing, context)
            .map_err(ProcessingError::Categorization)?;

        let resource = synthesize_resource(&processing, &categorization)
            .map_err(ProcessingError::ResourceCreation)?;

        let completed = processing.mark_completed().map_err(|err| {
            ProcessingError::Validation(format!("Cannot complete processing: {err}"))
        })?;

        Ok((completed, resource, categorization))
    }

    fn process_isolated(&self, thought: &Thought, context: Option<&UserContext>) -> ProcessingResult {
        panic::catch_unwind(AssertUnwindSafe(|| self.process(thought, context))).unwrap_or_else(
            |payload| {
                let message = format!("Batch processing error: {}", panic_message(payload.as_ref()));
                warn!(
                    "event=batch_item_crashed module=processing status=error thought_id={}",
                    thought.id()
                );
                ProcessingResult::failure(mark_failed_or_keep(thought), message, 0)
            },
        )
    }
}

impl<C, D> ThoughtProcessor<C, D>
where
    C: Categorizer + Sync,
    D: DuplicateCheck + Sync,
{
    /// Processes thoughts on a pool of at most `max_parallel_workers` threads.
    ///
    /// Output order matches input order. Falls back to sequential processing
    /// if the worker pool could not be built.
    pub fn process_many_parallel(
        &self,
        thoughts: &[Thought],
        context: Option<&UserContext>,
    ) -> Vec<ProcessingResult> {
        if thoughts.is_empty() {
            return Vec::new();
        }
        let Some(pool) = self.pool.as_ref() else {
            return self.process_many(thoughts, context);
        };

        let results: Vec<ProcessingResult> = pool.install(|| {
            thoughts
                .par_iter()
                .map(|thought| self.process_isolated(thought, context))
                .collect()
        });
        log_batch("parallel", &results);
        results
    }
}

fn build_worker_pool(max_parallel_workers: usize) -> Option<ThreadPool> {
    let workers = max_parallel_workers.max(1);
    match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => Some(pool),
        Err(err) => {
            warn!(
                "event=worker_pool_unavailable module=processing status=error workers={} error={}",
                workers, err
            );
            None
        }
    }
}

/// Checks that a thought may enter the pipeline.
fn validate_thought(thought: &Thought) -> Result<(), ProcessingError> {
    if thought.title().trim().is_empty() {
        return Err(ProcessingError::Validation(
            "Thought title cannot be empty".to_string(),
        ));
    }
    if thought.content().is_empty() {
        return Err(ProcessingError::Validation(
            "Thought content cannot be empty".to_string(),
        ));
    }
    if !thought.status().accepts_processing() {
        return Err(ProcessingError::Validation(format!(
            "Thought cannot be processed in status: {}",
            thought.status()
        )));
    }
    Ok(())
}

/// Builds the resource for a categorized thought.
///
/// Deadlines are never inferred here.
fn synthesize_resource(
    thought: &Thought,
    categorization: &CategorizationResult,
) -> ModelResult<Resource> {
    let hints = thought.hints();
    let mut tags: Vec<String> = categorization.suggested_tags().to_vec();
    if let Some(project_tag) = hints.project_tag.as_deref() {
        tags.push(format!("project-{}", slugify(project_tag)));
    }
    if let Some(area_tag) = hints.area_tag.as_deref() {
        tags.push(format!("area-{}", slugify(area_tag)));
    }
    if categorization.requires_review() {
        tags.push(REQUIRES_REVIEW_TAG.to_string());
    }
    tags.push(confidence_tag(categorization.confidence()));

    Resource::create(NewResource {
        title: thought.title().to_string(),
        content: thought.content().clone(),
        category: categorization.category(),
        tags: ResourceTags::create(tags)?,
        source_thought: Some(thought.id()),
        deadline: None,
    })
}

/// Lowercases and replaces every char outside `[a-z0-9_-]` with `-`.
///
/// Surrounding whitespace is not trimmed, so padded hints keep their padding
/// as `-`.
pub fn slugify(value: &str) -> String {
    SLUG_INVALID_RE
        .replace_all(&value.to_lowercase(), "-")
        .into_owned()
}

/// Formats `confidence-NN` with `NN = round(confidence * 100)`.
pub fn confidence_tag(confidence: f64) -> String {
    let percent = (confidence * 100.0).round() as u32;
    format!("confidence-{percent:02}")
}

fn mark_failed_or_keep(thought: &Thought) -> Thought {
    thought
        .mark_failed()
        .unwrap_or_else(|_| thought.clone())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn log_batch(mode: &str, results: &[ProcessingResult]) {
    let stats = ProcessingStatistics::from_results(results);
    debug!(
        "event=batch_processed module=processing status=ok mode={} total={} successful={} failed={}",
        mode, stats.total_processed, stats.successful, stats.failed
    );
}

#[cfg(test)]
mod tests {
    use super::{
        confidence_tag, mark_failed_or_keep, slugify, validate_thought, ThoughtProcessor,
    };
    use crate::config::ProcessingConfig;
    use crate::model::status::ProcessingStatus;
    use crate::model::thought::Thought;
    use crate::service::categorizer::KeywordCategorizer;

    #[test]
    fn slugify_lowercases_and_replaces_invalid_chars() {
        assert_eq!(slugify("Health"), "health");
        assert_eq!(slugify("Q3 Launch!"), "q3-launch-");
        assert_eq!(slugify("deep_work-2"), "deep_work-2");
        assert_eq!(slugify("café"), "caf-");
        assert_eq!(slugify(" health"), "-health");
        assert_eq!(slugify("Health "), "health-");
    }

    #[test]
    fn confidence_tag_rounds_and_pads() {
        assert_eq!(confidence_tag(0.4), "confidence-40");
        assert_eq!(confidence_tag(0.3), "confidence-30");
        assert_eq!(confidence_tag(0.05), "confidence-05");
        assert_eq!(confidence_tag(0.0), "confidence-00");
        assert_eq!(confidence_tag(1.0), "confidence-100");
        assert_eq!(confidence_tag(0.567), "confidence-57");
    }

    #[test]
    fn validate_rejects_terminal_and_in_flight_states() {
        let pending = Thought::new("t", "c").expect("valid thought");
        assert!(validate_thought(&pending).is_ok());

        let processing = pending.mark_processing().expect("pending -> processing");
        let err = validate_thought(&processing).expect_err("processing must be rejected");
        assert!(err.to_string().contains("processing"));

        let completed = processing.mark_completed().expect("processing -> completed");
        validate_thought(&completed).expect_err("completed must be rejected");
    }

    #[test]
    fn mark_failed_or_keep_returns_unchanged_for_illegal_move() {
        let pending = Thought::new("t", "c").expect("valid thought");
        let kept = mark_failed_or_keep(&pending);
        assert_eq!(kept, pending);

        let processing = pending.mark_processing().expect("pending -> processing");
        assert_eq!(
            mark_failed_or_keep(&processing).status(),
            ProcessingStatus::Failed
        );
    }

    #[test]
    fn blank_title_is_rejected_without_failing_the_thought() {
        let thought = Thought::new("draft", "body")
            .expect("valid thought")
            .with_unchecked_title("  ");
        let processor = ThoughtProcessor::new(KeywordCategorizer);

        assert!(!processor.can_process(&thought));
        let result = processor.process(&thought, None);

        assert!(!result.is_success());
        assert!(result.resource().is_none());
        assert_eq!(result.error_message(), Some("Thought title cannot be empty"));
        assert_eq!(result.thought().status(), ProcessingStatus::Pending);
    }

    #[test]
    fn worker_pool_is_built_once_with_configured_size() {
        let config = ProcessingConfig {
            max_parallel_workers: 3,
            ..ProcessingConfig::default()
        };
        let processor = ThoughtProcessor::with_config(KeywordCategorizer, config)
            .with_duplicate_check(|_: &Thought| -> Option<String> { None });

        let threads = processor.pool.as_ref().map(|pool| pool.current_num_threads());
        assert_eq!(threads, Some(3));

        let thoughts = vec![
            Thought::new("Ship v1", "deliver").expect("valid thought"),
            Thought::new("Sleep", "daily routine").expect("valid thought"),
        ];
        for _ in 0..3 {
            let results = processor.process_many_parallel(&thoughts, None);
            assert_eq!(results.len(), 2);
            assert!(results.iter().all(|result| result.is_success()));
        }
    }

    #[test]
    fn zero_workers_still_gets_a_single_thread_pool() {
        let config = ProcessingConfig {
            max_parallel_workers: 0,
            ..ProcessingConfig::default()
        };
        let processor = ThoughtProcessor::with_config(KeywordCategorizer, config);
        let threads = processor.pool.as_ref().map(|pool| pool.current_num_threads());
        assert_eq!(threads, Some(1));
    }
}
