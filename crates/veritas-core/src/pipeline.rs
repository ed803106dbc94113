//! Passage classification pipeline
//!
//! ```text
//! text ─► validate ─► cache? ─► extract claims ─► assess each claim ─► aggregate ─► cache
//! ```
//!
//! Claim assessment calls CPU-bound collaborators, so each claim runs on the
//! blocking pool. The whole request shares one deadline; the first error or
//! timeout aborts it and nothing partial is cached.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::assess::ClaimAssessor;
use crate::cache::{cache_key, ResultCache};
use crate::claim::ClaimExtractor;
use crate::config::{ConfigError, PipelineConfig};
use crate::context::ModelContext;
use crate::entailment::EntailmentScorer;
use crate::error::{AssessError, ClassifyError};
use crate::evidence::EvidenceRetriever;
use crate::validate::InputValidator;
use crate::verdict::{OverallVerdict, VerdictAggregator};

/// Classifies passages against the knowledge base.
///
/// Cheap to share behind an `Arc`; concurrent `classify` calls only contend on
/// the result cache.
pub struct FactChecker {
    context: Arc<ModelContext>,
    cache: Arc<ResultCache>,
    config: PipelineConfig,
    validator: InputValidator,
    extractor: ClaimExtractor,
    aggregator: VerdictAggregator,
}

impl FactChecker {
    pub fn new(
        context: Arc<ModelContext>,
        cache: Arc<ResultCache>,
        config: PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let aggregator = VerdictAggregator::new(config.thresholds()?);
        Ok(Self {
            validator: InputValidator::new(config.validation),
            extractor: ClaimExtractor::new(config.max_claims, config.min_claim_len),
            aggregator,
            context,
            cache,
            config,
        })
    }

    pub fn context(&self) -> &Arc<ModelContext> {
        &self.context
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classify `text` within the configured request timeout.
    pub async fn classify(&self, text: &str) -> Result<OverallVerdict, ClassifyError> {
        self.classify_until(text, Instant::now() + self.config.request_timeout())
            .await
    }

    /// Classify `text`, failing with [`ClassifyError::Timeout`] once `deadline` passes.
    pub async fn classify_until(
        &self,
        text: &str,
        deadline: Instant,
    ) -> Result<OverallVerdict, ClassifyError> {
        let budget = deadline.saturating_duration_since(Instant::now());
        let text = self.validator.validate(text)?;

        let key = cache_key(text);
        if let Some(verdict) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(verdict);
        }

        let assessor = self.assessor()?;
        let claims = self.extractor.extract(text);
        debug!("Extracted {} claims", claims.len());

        let mut verdicts = Vec::with_capacity(claims.len());
        for claim in claims {
            let position = claim.position;
            let assessor = assessor.clone();
            let top_k = self.config.top_k;
            let assess_deadline = deadline.into_std();
            let task = tokio::task::spawn_blocking(move || {
                assessor.assess_until(&claim, top_k, Some(assess_deadline))
            });

            let assessment = match tokio::time::timeout_at(deadline, task).await {
                Ok(Ok(Ok(assessment))) => assessment,
                Ok(Ok(Err(e))) => {
                    warn!("Assessment of claim {} failed: {}", position, e);
                    return Err(classify_error(e, budget));
                }
                Ok(Err(join_err)) => {
                    return Err(ClassifyError::Internal(format!(
                        "assessment task for claim {} failed: {}",
                        position, join_err
                    )));
                }
                Err(_) => {
                    warn!("Classification timed out after {:?} at claim {}", budget, position);
                    return Err(ClassifyError::Timeout(budget));
                }
            };
            verdicts.push(self.aggregator.claim_verdict(assessment));
        }

        let overall = self.aggregator.aggregate(verdicts);
        info!(
            "Classified passage as {} (confidence {:.3}, {} claims)",
            overall.classification,
            overall.confidence,
            overall.claims.len()
        );

        self.cache.put(key, overall.clone());
        Ok(overall)
    }

    /// Snapshot the installed collaborators into an assessor for one request.
    fn assessor(&self) -> Result<ClaimAssessor, ClassifyError> {
        let retriever = EvidenceRetriever::new(
            self.context.embedder()?,
            self.context.index()?,
            self.context.knowledge_base()?,
        );
        let scorer = EntailmentScorer::with_separator(
            self.context.entailment_model()?,
            self.config.entailment_separator.as_str(),
        );
        Ok(ClaimAssessor::new(retriever, scorer))
    }
}

fn classify_error(e: AssessError, budget: Duration) -> ClassifyError {
    match e {
        AssessError::Retrieval(e) => e.into(),
        AssessError::Scoring(e) => e.into(),
        AssessError::DeadlineExceeded => ClassifyError::Timeout(budget),
    }
}
