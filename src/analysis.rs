use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::context;
use crate::errors::*;
use crate::index::SeedIndex;
use crate::progress::ProgressBar;
use crate::risk::{self, RiskClass};
use crate::search::{self, CandidateHit, SearchParams};
use crate::sequence;
use crate::store::TranscriptStore;
use crate::thermo;

fn default_max_seed_mismatches() -> u32 {
    1
}

fn default_energy_threshold() -> f64 {
    -10.0
}

fn default_true() -> bool {
    true
}

fn default_max_candidates() -> usize {
    DEFAULT_MAX_CANDIDATES
}

#[derive(Debug, Clone, Deserialize)]
pub struct SirnaInput {
    pub name: String,
    pub sequence: String,
}

/// Shared analysis parameters; echoed into every result document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    #[serde(default = "default_max_seed_mismatches")]
    pub max_seed_mismatches: u32,
    #[serde(default = "default_energy_threshold")]
    pub energy_threshold: f64,
    #[serde(default = "default_true")]
    pub allow_wobble: bool,
    #[serde(default = "default_true")]
    pub include_structure: bool,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
}

impl Default for Parameters {
    fn default() -> Parameters {
        Parameters {
            max_seed_mismatches: default_max_seed_mismatches(),
            energy_threshold: default_energy_threshold(),
            allow_wobble: true,
            include_structure: true,
            max_candidates: DEFAULT_MAX_CANDIDATES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub sirnas: Vec<SirnaInput>,
    #[serde(flatten)]
    pub parameters: Parameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffTarget {
    pub transcript_id: String,
    pub gene_symbol: String,
    pub position: usize,
    pub delta_g: f64,
    pub risk_score: f64,
    pub risk_class: RiskClass,
    pub seed_matches: u32,
    pub mismatches: u32,
    pub wobbles: u32,
    pub au_content: f64,
    pub structure_accessibility: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub sirna_name: String,
    pub guide: String,
    pub parameters: Parameters,
    pub total_offtargets: usize,
    pub high_risk_count: usize,
    pub moderate_risk_count: usize,
    pub low_risk_count: usize,
    /// Candidates dropped because scoring them failed; the analysis itself
    /// continues.
    pub scoring_errors: usize,
    pub offtargets: Vec<OffTarget>,
}

/// Cooperative cancellation flag shared with the job runner. Observed after
/// seed probing, after scoring, and before the final sort; no partial
/// results are returned.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        Default::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ErrorKind::Cancelled.into())
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
}

/// Terminal record of one analysis job in a batch.
#[derive(Debug, Serialize)]
pub struct JobRecord {
    pub sirna_name: String,
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
}

// Unrounded intermediate used for ranking; rounding happens only when the
// result document is assembled
struct Scored {
    transcript_id: String,
    gene_symbol: String,
    position: usize,
    delta_g: f64,
    risk: f64,
    seed_matches: u32,
    mismatches: u32,
    wobbles: u32,
    au_content: f64,
    accessibility: f64,
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

/// Read-only analysis engine over a committed seed index and its transcript
/// store. Results are a pure function of (guide, parameters, generation).
pub struct Analyzer<'a> {
    store: &'a TranscriptStore,
    index: &'a SeedIndex,
    conservation: HashMap<String, f64>,
}

impl<'a> Analyzer<'a> {
    pub fn new(store: &'a TranscriptStore, index: &'a SeedIndex) -> Analyzer<'a> {
        Analyzer {
            store,
            index,
            conservation: HashMap::new(),
        }
    }

    /// Optional per-transcript conservation scores; absent entries score 0.
    pub fn with_conservation(mut self, scores: HashMap<String, f64>) -> Analyzer<'a> {
        self.conservation = scores;
        self
    }

    /// Runs a batch of analyses with shared parameters. Every guide is
    /// validated before any search starts; cancellation aborts the whole
    /// batch, while other per-guide failures are recorded and the batch
    /// continues.
    pub fn run(
        &self,
        request: &AnalysisRequest,
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<Vec<JobRecord>> {
        if request.sirnas.is_empty() || request.sirnas.len() > MAX_BATCH_SIZE {
            bail!(
                "a request must contain 1..={} siRNAs, got {}",
                MAX_BATCH_SIZE,
                request.sirnas.len()
            );
        }
        if request.parameters.max_seed_mismatches > 2 {
            bail!(
                "max_seed_mismatches must be 0, 1, or 2, got {}",
                request.parameters.max_seed_mismatches
            );
        }

        // Validation errors return before any search starts
        let mut guides = Vec::with_capacity(request.sirnas.len());
        for sirna in &request.sirnas {
            guides.push(sequence::normalize_guide(&sirna.sequence)?);
        }

        let mut records = Vec::with_capacity(request.sirnas.len());
        for (sirna, guide) in request.sirnas.iter().zip(&guides) {
            let mut record = JobRecord {
                sirna_name: sirna.name.clone(),
                state: JobState::Queued,
                error: None,
                result: None,
            };

            record.state = JobState::Running;
            match self.analyze_validated(&sirna.name, guide, &request.parameters, cancel, progress)
            {
                Ok(result) => {
                    record.state = JobState::Completed;
                    record.result = Some(result);
                }
                Err(err) => {
                    if let ErrorKind::Cancelled = err.kind() {
                        return Err(err);
                    }

                    record.state = JobState::Failed;
                    record.error = Some(err.kind().code().to_owned());
                }
            }

            records.push(record);
        }

        Ok(records)
    }

    /// Analyzes a single guide sequence against the index.
    pub fn analyze_guide(
        &self,
        name: &str,
        sequence: &str,
        params: &Parameters,
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<AnalysisResult> {
        let guide = sequence::normalize_guide(sequence)?;

        self.analyze_validated(name, &guide, params, cancel, progress)
    }

    fn analyze_validated(
        &self,
        name: &str,
        guide: &[u8],
        params: &Parameters,
        cancel: &CancelToken,
        progress: &ProgressBar,
    ) -> Result<AnalysisResult> {
        let search_params = SearchParams {
            max_seed_mismatches: params.max_seed_mismatches,
            allow_wobble: params.allow_wobble,
            max_candidates: params.max_candidates,
        };

        let outcome = search::find_candidates(guide, self.index, self.store, &search_params)?;
        cancel.check()?;

        let scored: Vec<Result<Option<Scored>>> = outcome
            .hits
            .par_iter()
            .map(|hit| {
                let result = self.score_candidate(guide, hit, params);
                progress.inc(1);
                result
            })
            .collect();
        cancel.check()?;

        let mut offtargets = Vec::new();
        let mut scoring_errors = outcome.missing_transcripts;
        for item in scored {
            match item {
                Ok(Some(candidate)) => offtargets.push(candidate),
                Ok(None) => {}
                Err(err) => {
                    if let ErrorKind::LengthMismatch(_, _) = err.kind() {
                        return Err(err);
                    }

                    warn!("dropping candidate for {:?}: {}", name, err);
                    scoring_errors += 1;
                }
            }
        }

        cancel.check()?;
        offtargets.sort_by(|a, b| {
            risk::compare_ranked(
                (a.risk, a.delta_g, a.transcript_id.as_str()),
                (b.risk, b.delta_g, b.transcript_id.as_str()),
            )
        });

        let mut high = 0;
        let mut moderate = 0;
        let mut low = 0;
        let offtargets: Vec<OffTarget> = offtargets
            .into_iter()
            .map(|scored| {
                let class = risk::classify(scored.risk);
                match class {
                    RiskClass::High => high += 1,
                    RiskClass::Moderate => moderate += 1,
                    RiskClass::Low => low += 1,
                }

                OffTarget {
                    transcript_id: scored.transcript_id,
                    gene_symbol: scored.gene_symbol,
                    position: scored.position,
                    delta_g: round_to(scored.delta_g, 2),
                    risk_score: round_to(scored.risk, 3),
                    risk_class: class,
                    seed_matches: scored.seed_matches,
                    mismatches: scored.mismatches,
                    wobbles: scored.wobbles,
                    au_content: round_to(scored.au_content, 2),
                    structure_accessibility: round_to(scored.accessibility, 2),
                }
            })
            .collect();

        Ok(AnalysisResult {
            sirna_name: name.to_owned(),
            guide: String::from_utf8_lossy(guide).into_owned(),
            parameters: params.clone(),
            total_offtargets: offtargets.len(),
            high_risk_count: high,
            moderate_risk_count: moderate,
            low_risk_count: low,
            scoring_errors,
            offtargets,
        })
    }

    fn score_candidate(
        &self,
        guide: &[u8],
        hit: &CandidateHit,
        params: &Parameters,
    ) -> Result<Option<Scored>> {
        let transcript = self
            .store
            .get_slot(hit.transcript)
            .ok_or_else(|| Error::from(ErrorKind::TranscriptMissing(format!("slot {}", hit.transcript))))?;

        let len = guide.len();
        let start = hit.site_start as usize;
        let window = &transcript.sequence[start..start + len];

        let delta_g = thermo::duplex_delta_g(guide, window)?;
        if delta_g > params.energy_threshold {
            return Ok(None);
        }

        let site_center = start + len / 2;
        let (_, au_window) =
            self.store
                .window(&transcript.transcript_id, site_center, AU_WINDOW_RADIUS)?;
        let au_content = context::au_content(au_window);

        let accessibility = if params.include_structure {
            let seed_center = hit.seed_pos as usize + SEED_LEN / 2;
            let (_, access_window) =
                self.store
                    .window(&transcript.transcript_id, seed_center, ACCESS_WINDOW_RADIUS)?;
            context::accessibility(access_window)
        } else {
            context::NEUTRAL_ACCESSIBILITY
        };

        let conservation = self
            .conservation
            .get(&transcript.transcript_id)
            .copied()
            .unwrap_or(0.0);
        let risk = risk::risk_score(delta_g, au_content, accessibility, conservation);

        Ok(Some(Scored {
            transcript_id: transcript.transcript_id.clone(),
            gene_symbol: transcript.gene_symbol.clone(),
            position: start,
            delta_g,
            risk,
            seed_matches: SEED_LEN as u32 - hit.mismatches - hit.wobbles,
            mismatches: hit.mismatches,
            wobbles: hit.wobbles,
            au_content,
            accessibility,
        }))
    }
}
