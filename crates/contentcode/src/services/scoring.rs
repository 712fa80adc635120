//! Scoring Run - Drives essays through the pipeline batch by batch
//!
//! build requests -> dispatch batch -> extract scores -> report progress.
//! Batches run one after another; only the members of a batch run
//! concurrently. Per-essay failures are recorded and skipped.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::{Duration, Instant};

use super::batcher::batch;
use super::dispatcher::BatchDispatcher;
use super::progress::{BatchProgress, ProgressTracker};
use super::request_builder::RequestBuilder;
use crate::domain::entities::{Chat, EssayCompletion, EssayRecord, EssayScore};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::EssayType;

const DEFAULT_BATCH_SIZE: usize = 10;

/// Something that happened during a run, in essay order
#[derive(Debug, Clone)]
pub enum RunEvent {
    Scored { count: usize, score: EssayScore },
    Failed { count: usize, pid: i64, reason: String },
    /// The dispatcher returned no entry for the essay
    Missing { count: usize, pid: i64 },
    BatchCompleted(BatchProgress),
}

impl std::fmt::Display for RunEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunEvent::Scored { count, score } => write!(
                f,
                "{}: pid {}: {:.1} {}",
                count, score.pid, score.score, score.millis
            ),
            RunEvent::Failed { count, pid, reason } => {
                write!(f, "{}: pid {}: {}", count, pid, reason)
            }
            RunEvent::Missing { count, pid } => write!(f, "{}: pid {}: no response", count, pid),
            RunEvent::BatchCompleted(progress) => write!(f, "{}", progress),
        }
    }
}

/// An essay left out of the results
#[derive(Debug, Clone, PartialEq)]
pub struct RunFailure {
    /// Position of the essay in the input sequence
    pub index: usize,
    pub pid: i64,
    pub reason: String,
}

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub scores: Vec<EssayScore>,
    pub failures: Vec<RunFailure>,
    pub elapsed: Duration,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "completed {} essays in {:.2?}", self.total, self.elapsed)
    }
}

/// Batch scoring pipeline
#[derive(Clone)]
pub struct ScoringRun {
    builder: RequestBuilder,
    dispatcher: BatchDispatcher,
    batch_size: NonZeroUsize,
    reverse: bool,
}

impl ScoringRun {
    pub fn new(builder: RequestBuilder, dispatcher: BatchDispatcher) -> Self {
        Self {
            builder,
            dispatcher,
            batch_size: NonZeroUsize::new(DEFAULT_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN),
            reverse: false,
        }
    }

    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Scan replies from the end when looking for the score
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Score every essay, reporting each item and batch to `on_event`
    ///
    /// Fails only when a request cannot be built (e.g. unreadable template),
    /// before that batch is dispatched.
    pub async fn run<F>(
        &self,
        essays: &[EssayRecord],
        essay_type: EssayType,
        template: Option<&Path>,
        mut on_event: F,
    ) -> Result<RunSummary, DomainError>
    where
        F: FnMut(&RunEvent),
    {
        let started = Instant::now();
        let mut tracker = ProgressTracker::new(essays.len());
        let mut scores = Vec::with_capacity(essays.len());
        let mut failures = Vec::new();
        let mut count = 0;

        tracing::info!(
            "🚀 Scoring {} {} essays in batches of {}",
            essays.len(),
            essay_type,
            self.batch_size
        );

        for batch in batch(essays, self.batch_size) {
            let batch_started = Instant::now();

            let chats = batch
                .iter()
                .map(|essay| {
                    let request = self.builder.build(essay, essay_type, template)?;
                    Ok(Chat::new(essay.id.to_string(), request))
                })
                .collect::<Result<Vec<_>, DomainError>>()?;

            let results = self.dispatcher.dispatch(chats).await;

            for essay in &batch {
                let index = count;
                count += 1;

                let event = match results.get(&essay.id.to_string()) {
                    None => RunEvent::Missing {
                        count,
                        pid: essay.id,
                    },
                    Some(chat) => match self.score_chat(essay, essay_type, chat) {
                        Ok(score) => RunEvent::Scored { count, score },
                        Err(reason) => RunEvent::Failed {
                            count,
                            pid: essay.id,
                            reason,
                        },
                    },
                };

                match &event {
                    RunEvent::Scored { score, .. } => scores.push(score.clone()),
                    RunEvent::Failed { reason, .. } => {
                        tracing::warn!("⚠️  pid {}: {}", essay.id, reason);
                        failures.push(RunFailure {
                            index,
                            pid: essay.id,
                            reason: reason.clone(),
                        });
                    }
                    RunEvent::Missing { .. } => {
                        tracing::warn!("⚠️  pid {}: no response", essay.id);
                        failures.push(RunFailure {
                            index,
                            pid: essay.id,
                            reason: "no response".to_string(),
                        });
                    }
                    RunEvent::BatchCompleted(_) => {}
                }
                on_event(&event);
            }

            let progress =
                tracker.record_batch(batch.len(), batch_started.elapsed(), started.elapsed());
            on_event(&RunEvent::BatchCompleted(progress));
        }

        let summary = RunSummary {
            total: essays.len(),
            scores,
            failures,
            elapsed: started.elapsed(),
        };
        tracing::info!(
            "✅ Scored {} of {} essays ({} failed)",
            summary.scores.len(),
            summary.total,
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Score a single essay, keeping the request and raw response
    ///
    /// A service failure is returned as an error; a reply without a score is
    /// reported in the completion's `error` field.
    pub async fn score_one(
        &self,
        essay: &EssayRecord,
        essay_type: EssayType,
        template: Option<&Path>,
    ) -> Result<EssayCompletion, DomainError> {
        let request = self.builder.build(essay, essay_type, template)?;

        let started = Instant::now();
        let response = self.dispatcher.service().complete(&request).await?;
        let millis = started.elapsed().as_millis() as u64;

        let (score, error) =
            match EssayScore::from_response(essay, essay_type, &response, self.reverse, millis) {
                Ok(score) => (Some(score), None),
                Err(e) => (None, Some(e.to_string())),
            };

        Ok(EssayCompletion {
            request,
            response,
            score,
            error,
        })
    }

    fn score_chat(
        &self,
        essay: &EssayRecord,
        essay_type: EssayType,
        chat: &Chat,
    ) -> Result<EssayScore, String> {
        if let Some(error) = chat.error() {
            return Err(error.to_string());
        }
        let response = chat
            .response()
            .ok_or_else(|| "no response".to_string())?;
        EssayScore::from_response(essay, essay_type, response, self.reverse, chat.millis)
            .map_err(|e| e.to_string())
    }
}
