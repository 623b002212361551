use serde::{Deserialize, Serialize};
use storage_core::RecordMeta;
use uuid::Uuid;

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
    Director,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Director => "director",
        }
    }
}

/// A user account as seen by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub full_name: String,
    pub role: Role,
    pub active: bool,
    pub meta: RecordMeta,
}

impl UserAccount {
    pub fn new(full_name: impl Into<String>, role: Role, actor: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            role,
            active: true,
            meta: RecordMeta::new(actor),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_director(&self) -> bool {
        self.role == Role::Director
    }
}
