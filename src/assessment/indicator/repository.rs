use std::collections::BTreeMap;
use std::sync::Mutex;

use super::domain::{IndicatorDefinition, IndicatorId};

/// Storage abstraction so the service layer can be exercised in isolation
/// and swapped for a database-backed store without touching the engine.
pub trait IndicatorRepository: Send + Sync {
    fn insert(&self, definition: IndicatorDefinition) -> Result<(), RepositoryError>;
    fn update(&self, definition: IndicatorDefinition) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &IndicatorId) -> Result<Option<IndicatorDefinition>, RepositoryError>;
    fn list(&self) -> Result<Vec<IndicatorDefinition>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("indicator already registered")]
    Conflict,
    #[error("indicator not found")]
    NotFound,
    #[error("indicator store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory store used by the serve command and tests. Real persistence
/// attaches behind the same trait.
#[derive(Default)]
pub struct InMemoryIndicatorRepository {
    definitions: Mutex<BTreeMap<IndicatorId, IndicatorDefinition>>,
}

impl InMemoryIndicatorRepository {
    fn definitions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<IndicatorId, IndicatorDefinition>>, RepositoryError>
    {
        self.definitions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("indicator store lock poisoned".to_string()))
    }
}

impl IndicatorRepository for InMemoryIndicatorRepository {
    fn insert(&self, definition: IndicatorDefinition) -> Result<(), RepositoryError> {
        let mut definitions = self.definitions()?;
        if definitions.contains_key(&definition.id) {
            return Err(RepositoryError::Conflict);
        }
        definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    fn update(&self, definition: IndicatorDefinition) -> Result<(), RepositoryError> {
        let mut definitions = self.definitions()?;
        if !definitions.contains_key(&definition.id) {
            return Err(RepositoryError::NotFound);
        }
        definitions.insert(definition.id.clone(), definition);
        Ok(())
    }

    fn fetch(&self, id: &IndicatorId) -> Result<Option<IndicatorDefinition>, RepositoryError> {
        Ok(self.definitions()?.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<IndicatorDefinition>, RepositoryError> {
        Ok(self.definitions()?.values().cloned().collect())
    }
}
