use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit metadata carried by every persisted entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Uuid,
    pub deleted: bool,
}

impl RecordMeta {
    pub fn new(actor: Uuid) -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            created_by: actor,
            updated_at: now,
            updated_by: actor,
            deleted: false,
        }
    }

    /// Re-stamp the modification fields after a mutation.
    pub fn touch(&mut self, actor: Uuid) {
        self.updated_at = Utc::now();
        self.updated_by = actor;
    }

    /// Soft-delete the record. Trashed records stay in storage but are
    /// invisible to lookups and uniqueness checks.
    pub fn trash(&mut self, actor: Uuid) {
        self.deleted = true;
        self.touch(actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trash_marks_deleted_and_restamps() {
        let creator = Uuid::new_v4();
        let remover = Uuid::new_v4();
        let mut meta = RecordMeta::new(creator);
        assert!(!meta.deleted);

        meta.trash(remover);
        assert!(meta.deleted);
        assert_eq!(meta.updated_by, remover);
        assert_eq!(meta.created_by, creator);
    }
}
