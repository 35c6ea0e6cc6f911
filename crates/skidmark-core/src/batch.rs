// Batch coordination: split the league into fixed-size batches, generate
// each batch concurrently, and merge the per-team results.
//
// Every batch prompt sees the full request (all teams, matchups, bracket)
// so cross-batch names resolve, but only lists its own teams as output
// keys. Any batch failure fails the whole request.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, error, info, warn};

use crate::error::RoastError;
use crate::generator::TextGenerator;
use crate::model::{RoastRequest, RoastResult, Team};
use crate::prompt::build_batch_prompt;
use crate::response::{decode_roasts, Coverage};

/// Teams per generation call.
pub const DEFAULT_BATCH_SIZE: usize = 2;

/// Split `teams` into consecutive chunks of `batch_size`, preserving order.
/// The last chunk may be shorter. A batch size of 0 is treated as 1.
pub fn partition(teams: &[Team], batch_size: usize) -> Vec<&[Team]> {
    teams.chunks(batch_size.max(1)).collect()
}

/// A prepared generation call for one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub index: usize,
    pub team_ids: Vec<String>,
    pub prompt: String,
}

/// Build one job per batch. Prompts are assembled up front so nothing
/// borrowed from the request crosses into spawned tasks.
pub fn plan_batches(request: &RoastRequest, batch_size: usize) -> Vec<BatchJob> {
    partition(&request.teams, batch_size)
        .into_iter()
        .enumerate()
        .map(|(index, batch)| BatchJob {
            index,
            team_ids: batch.iter().map(|t| t.id.clone()).collect(),
            prompt: build_batch_prompt(batch, request),
        })
        .collect()
}

/// Drives roast generation for whole requests.
pub struct BatchCoordinator<G: ?Sized> {
    generator: Arc<G>,
    batch_size: usize,
}

impl<G: ?Sized> Clone for BatchCoordinator<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            batch_size: self.batch_size,
        }
    }
}

impl<G> BatchCoordinator<G>
where
    G: TextGenerator + ?Sized + 'static,
{
    pub fn new(generator: Arc<G>, batch_size: usize) -> Self {
        Self {
            generator,
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Generate roasts for every team in the request.
    ///
    /// A single batch runs inline; multiple batches run as one task each and
    /// are merged once all have finished. The merged map is keyed by team id,
    /// so completion order does not matter.
    pub async fn generate_roasts(&self, request: &RoastRequest) -> Result<RoastResult, RoastError> {
        if request.teams.is_empty() {
            return Err(RoastError::InvalidInput("No teams provided".to_string()));
        }

        let jobs = plan_batches(request, self.batch_size);
        info!(
            teams = request.teams.len(),
            batches = jobs.len(),
            phase = request.season_phase.as_str(),
            matchups = request.matchups.len(),
            "generating roasts"
        );

        if jobs.len() == 1 {
            let job = &jobs[0];
            return run_batch(self.generator.as_ref(), job).await;
        }

        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                let generator = Arc::clone(&self.generator);
                tokio::spawn(async move { run_batch(generator.as_ref(), &job).await })
            })
            .collect();

        let mut merged = RoastResult::new();
        let mut first_error = None;
        for joined in join_all(handles).await {
            match joined.map_err(RoastError::from).and_then(|r| r) {
                Ok(roasts) => merge_into(&mut merged, roasts),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(merged),
        }
    }
}

async fn run_batch<G>(generator: &G, job: &BatchJob) -> Result<RoastResult, RoastError>
where
    G: TextGenerator + ?Sized,
{
    debug!(
        batch = job.index,
        teams = ?job.team_ids,
        prompt_len = job.prompt.len(),
        "sending batch"
    );

    let raw = generator.generate(&job.prompt).await.map_err(|e| {
        error!(batch = job.index, "generation failed: {e:#}");
        RoastError::Generation(e)
    })?;

    let roasts = decode_roasts(&raw).map_err(|e| {
        error!(batch = job.index, "undecodable generation response: {e}");
        RoastError::from(e)
    })?;

    let coverage = Coverage::check(&job.team_ids, &roasts);
    if coverage.is_exact() {
        debug!(batch = job.index, roasts = roasts.len(), "batch complete");
        return Ok(roasts);
    }
    if !coverage.missing.is_empty() {
        warn!(batch = job.index, missing = ?coverage.missing, "response is missing requested teams");
    }
    if !coverage.unexpected.is_empty() {
        warn!(batch = job.index, unexpected = ?coverage.unexpected, "response has unrequested teams");
    }

    Ok(roasts)
}

fn merge_into(merged: &mut RoastResult, roasts: RoastResult) {
    for (id, text) in roasts {
        if merged.insert(id.clone(), text).is_some() {
            warn!(team_id = %id, "team roasted by more than one batch; keeping the later result");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
