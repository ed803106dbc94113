//! Startup loading of models and knowledge-base data.
//!
//! Each component is loaded independently. A failure is logged and leaves
//! its slot empty, so requests report the missing component instead of the
//! process refusing to start.

use std::sync::Arc;

use tracing::{error, info, warn};
use veritas::tracing::prefix;
use veritas::{Error, Result};
use veritas_core::{Component, FlatIndex, KnowledgeBase, ModelContext, VectorIndex};

use crate::engine::EmbeddingEngine;
use crate::nli::EntailmentEngine;
use crate::settings::Settings;

/// Load every component named in `settings` into a fresh context.
pub fn load_context(settings: &Settings) -> Arc<ModelContext> {
    let context = Arc::new(ModelContext::new());
    info!("{} Loading models and knowledge base", prefix::LOAD);

    let embedder = Arc::new(EmbeddingEngine::new());
    match embedder.load(settings.embedder.clone()) {
        Ok(()) => context.install_embedder(embedder),
        Err(e) => error!("{} {} failed to load: {}", prefix::LOAD, Component::Embedder, e),
    }

    let nli = Arc::new(EntailmentEngine::new());
    match nli.load(settings.entailment.clone()) {
        Ok(()) => context.install_entailment_model(nli),
        Err(e) => error!("{} {} failed to load: {}", prefix::LOAD, Component::EntailmentModel, e),
    }

    match load_data(settings) {
        Ok((index, knowledge_base)) => {
            context.install_index(index);
            context.install_knowledge_base(knowledge_base);
        }
        Err(e) => error!("{} knowledge base data failed to load: {}", prefix::LOAD, e),
    }

    context
}

/// Load the vector index and snippet store and check that they line up.
pub fn load_data(settings: &Settings) -> Result<(Arc<dyn VectorIndex>, Arc<KnowledgeBase>)> {
    let knowledge_base = KnowledgeBase::load_json(&settings.data.knowledge_base)?;
    let index = FlatIndex::load_fvecs(&settings.data.index)?;

    if index.len() != knowledge_base.len() {
        return Err(Error::Load(format!(
            "index has {} rows but knowledge base has {} records",
            index.len(),
            knowledge_base.len()
        )));
    }
    if knowledge_base.is_empty() {
        warn!("Knowledge base is empty; every claim will lack evidence");
    }

    let index: Arc<dyn VectorIndex> = Arc::new(index);
    Ok((index, Arc::new(knowledge_base)))
}
