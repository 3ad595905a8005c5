//! In-memory session store with CRUD and cascade delete.
//!
//! The notebook owns all records for one session. Nothing is persisted:
//! dropping the notebook loses the state, which is the course tool's
//! reset-on-reload behavior. The interior `RwLock` makes a shared
//! `&Notebook` safe to use from multiple threads even though the analyzer
//! itself is a pure function.

use parking_lot::RwLock;

use crate::analyzer::engine::AnalyzerEngine;
use crate::core::errors::{Result, SlnError};
use crate::store::records::{
    AnalysisResult, Artifact, ArtifactDraft, Attack, AttackDraft, AttackUpdate, Service,
    ServiceDraft, ServiceUpdate,
};

#[derive(Debug, Default)]
struct State {
    services: Vec<Service>,
    attacks: Vec<Attack>,
    artifacts: Vec<Artifact>,
    results: Vec<AnalysisResult>,
}

/// Session-scoped record store.
#[derive(Debug, Default)]
pub struct Notebook {
    inner: RwLock<State>,
}

impl Notebook {
    /// Empty notebook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- services -----------------------------------------------------------

    /// Create a service record and return it.
    pub fn add_service(&self, draft: ServiceDraft) -> Service {
        let now = chrono::Utc::now();
        let service = Service {
            id: crate::store::records::record_id(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            commands: draft.commands,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().services.push(service.clone());
        service
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn update_service(&self, id: &str, update: ServiceUpdate) -> Result<Service> {
        let mut state = self.inner.write();
        let service = state
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| unknown("service", id))?;
        if let Some(kind) = update.kind {
            service.kind = kind;
        }
        if let Some(title) = update.title {
            service.title = title;
        }
        if let Some(description) = update.description {
            service.description = description;
        }
        if let Some(commands) = update.commands {
            service.commands = commands;
        }
        if let Some(notes) = update.notes {
            service.notes = notes;
        }
        service.updated_at = chrono::Utc::now();
        Ok(service.clone())
    }

    /// Remove a service record.
    pub fn delete_service(&self, id: &str) -> Result<()> {
        let mut state = self.inner.write();
        let before = state.services.len();
        state.services.retain(|s| s.id != id);
        if state.services.len() == before {
            return Err(unknown("service", id));
        }
        Ok(())
    }

    /// All service records, insertion order.
    #[must_use]
    pub fn services(&self) -> Vec<Service> {
        self.inner.read().services.clone()
    }

    // -- attacks ------------------------------------------------------------

    /// Create an attack writeup and return it.
    pub fn add_attack(&self, draft: AttackDraft) -> Attack {
        let now = chrono::Utc::now();
        let attack = Attack {
            id: crate::store::records::record_id(),
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            results: draft.results,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().attacks.push(attack.clone());
        attack
    }

    /// Apply a partial update, bumping `updated_at`.
    pub fn update_attack(&self, id: &str, update: AttackUpdate) -> Result<Attack> {
        let mut state = self.inner.write();
        let attack = state
            .attacks
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| unknown("attack", id))?;
        if let Some(kind) = update.kind {
            attack.kind = kind;
        }
        if let Some(title) = update.title {
            attack.title = title;
        }
        if let Some(description) = update.description {
            attack.description = description;
        }
        if let Some(results) = update.results {
            attack.results = results;
        }
        if let Some(notes) = update.notes {
            attack.notes = notes;
        }
        attack.updated_at = chrono::Utc::now();
        Ok(attack.clone())
    }

    /// Remove an attack writeup.
    pub fn delete_attack(&self, id: &str) -> Result<()> {
        let mut state = self.inner.write();
        let before = state.attacks.len();
        state.attacks.retain(|a| a.id != id);
        if state.attacks.len() == before {
            return Err(unknown("attack", id));
        }
        Ok(())
    }

    /// All attack writeups, insertion order.
    #[must_use]
    pub fn attacks(&self) -> Vec<Attack> {
        self.inner.read().attacks.clone()
    }

    // -- artifacts ----------------------------------------------------------

    /// Ingest an artifact, computing id, size, digest, and timestamp.
    pub fn add_artifact(&self, draft: ArtifactDraft) -> Artifact {
        let artifact = Artifact::from_draft(draft);
        self.inner.write().artifacts.push(artifact.clone());
        artifact
    }

    /// Remove an artifact and cascade-delete its analysis results.
    pub fn delete_artifact(&self, id: &str) -> Result<()> {
        let mut state = self.inner.write();
        let before = state.artifacts.len();
        state.artifacts.retain(|a| a.id != id);
        if state.artifacts.len() == before {
            return Err(unknown("artifact", id));
        }
        state.results.retain(|r| r.artifact_id != id);
        Ok(())
    }

    /// Look up one artifact by id.
    pub fn artifact(&self, id: &str) -> Result<Artifact> {
        self.inner
            .read()
            .artifacts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| unknown("artifact", id))
    }

    /// All artifacts, insertion order.
    #[must_use]
    pub fn artifacts(&self) -> Vec<Artifact> {
        self.inner.read().artifacts.clone()
    }

    // -- analysis results ---------------------------------------------------

    /// Append an analysis result produced outside [`Notebook::analyze`].
    pub fn add_result(&self, result: AnalysisResult) -> AnalysisResult {
        self.inner.write().results.push(result.clone());
        result
    }

    /// Run the engine over a stored artifact and append the result.
    ///
    /// Lookup and append happen under one write guard so a concurrent
    /// `delete_artifact` can never slip between them and leave a result
    /// whose owning artifact is gone.
    pub fn analyze(&self, engine: &AnalyzerEngine, artifact_id: &str) -> Result<AnalysisResult> {
        let mut state = self.inner.write();
        let artifact = state
            .artifacts
            .iter()
            .find(|a| a.id == artifact_id)
            .cloned()
            .ok_or_else(|| unknown("artifact", artifact_id))?;
        let outcome = engine.analyze(&artifact);
        let result = AnalysisResult::from_outcome(&artifact, outcome);
        state.results.push(result.clone());
        Ok(result)
    }

    /// All analysis results, insertion order.
    #[must_use]
    pub fn results(&self) -> Vec<AnalysisResult> {
        self.inner.read().results.clone()
    }

    /// Results belonging to one artifact.
    #[must_use]
    pub fn results_for(&self, artifact_id: &str) -> Vec<AnalysisResult> {
        self.inner
            .read()
            .results
            .iter()
            .filter(|r| r.artifact_id == artifact_id)
            .cloned()
            .collect()
    }
}

fn unknown(kind: &'static str, id: &str) -> SlnError {
    SlnError::UnknownRecord {
        kind,
        id: id.to_string(),
    }
}
