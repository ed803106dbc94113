//! Shared model context
//!
//! Holds the collaborators every request needs. Built empty at startup and
//! filled as models and data finish loading; requests arriving before then get
//! [`NotReady`] naming the missing piece.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use crate::collaborator::{Embedder, EntailmentModel, VectorIndex};
use crate::error::{Component, NotReady};
use crate::evidence::KnowledgeBase;

#[derive(Default)]
pub struct ModelContext {
    embedder: RwLock<Option<Arc<dyn Embedder>>>,
    entailment: RwLock<Option<Arc<dyn EntailmentModel>>>,
    index: RwLock<Option<Arc<dyn VectorIndex>>>,
    knowledge_base: RwLock<Option<Arc<KnowledgeBase>>>,
}

/// Health snapshot of a [`ModelContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub ready: bool,
    pub missing: Vec<String>,
    pub kb_size: usize,
}

impl ModelContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn install_embedder(&self, embedder: Arc<dyn Embedder>) {
        *self.embedder.write() = Some(embedder);
        info!("Installed {}", Component::Embedder);
    }

    pub fn install_entailment_model(&self, model: Arc<dyn EntailmentModel>) {
        *self.entailment.write() = Some(model);
        info!("Installed {}", Component::EntailmentModel);
    }

    pub fn install_index(&self, index: Arc<dyn VectorIndex>) {
        let rows = index.len();
        *self.index.write() = Some(index);
        info!("Installed {} ({} rows)", Component::VectorIndex, rows);
    }

    pub fn install_knowledge_base(&self, knowledge_base: Arc<KnowledgeBase>) {
        let records = knowledge_base.len();
        *self.knowledge_base.write() = Some(knowledge_base);
        info!("Installed {} ({} records)", Component::KnowledgeBase, records);
    }

    pub fn embedder(&self) -> Result<Arc<dyn Embedder>, NotReady> {
        self.embedder.read().clone().ok_or(NotReady(Component::Embedder))
    }

    pub fn entailment_model(&self) -> Result<Arc<dyn EntailmentModel>, NotReady> {
        self.entailment
            .read()
            .clone()
            .ok_or(NotReady(Component::EntailmentModel))
    }

    pub fn index(&self) -> Result<Arc<dyn VectorIndex>, NotReady> {
        self.index.read().clone().ok_or(NotReady(Component::VectorIndex))
    }

    pub fn knowledge_base(&self) -> Result<Arc<KnowledgeBase>, NotReady> {
        self.knowledge_base
            .read()
            .clone()
            .ok_or(NotReady(Component::KnowledgeBase))
    }

    pub fn readiness(&self) -> Readiness {
        let mut missing = Vec::new();
        if self.embedder.read().is_none() {
            missing.push(Component::Embedder.to_string());
        }
        if self.entailment.read().is_none() {
            missing.push(Component::EntailmentModel.to_string());
        }
        if self.index.read().is_none() {
            missing.push(Component::VectorIndex.to_string());
        }
        let kb_size = match self.knowledge_base.read().as_ref() {
            Some(kb) => kb.len(),
            None => {
                missing.push(Component::KnowledgeBase.to_string());
                0
            }
        };

        Readiness {
            ready: missing.is_empty(),
            missing,
            kb_size,
        }
    }
}
