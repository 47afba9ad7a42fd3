//! QuestCatalog port (read-only reference data).
//!
//! The catalog is seeded once at startup and never written by the
//! progression core; the state machine treats it as immutable input.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, QuestId};
use crate::domain::quest::Quest;

/// Read port for the quest catalog.
#[async_trait]
pub trait QuestCatalog: Send + Sync {
    /// Look up a quest definition.
    ///
    /// Returns `None` if the catalog has no such quest.
    async fn get_by_id(&self, id: &QuestId) -> Result<Option<Quest>, DomainError>;

    /// All quest definitions in the catalog.
    async fn list(&self) -> Result<Vec<Quest>, DomainError>;
}
