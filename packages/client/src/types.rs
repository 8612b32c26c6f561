use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File descriptor attached to every instruction.
#[derive(Clone, Debug, Deserialize)]
pub struct FileDescriptor {
    pub public_id: String,
    pub url: String,
}

/// Partial product view the server projects into reads.
#[derive(Clone, Debug, Deserialize)]
pub struct ProductBrief {
    pub id: i32,
    pub product_name: String,
    pub item_code: Option<String>,
}

/// Product reference: the server sends the projected product on reads and
/// the plain id on mutation responses.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Brief(ProductBrief),
    Id(i32),
}

impl ProductRef {
    pub fn id(&self) -> i32 {
        match self {
            Self::Brief(b) => b.id,
            Self::Id(id) => *id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Brief(b) => Some(&b.product_name),
            Self::Id(_) => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Instruction {
    pub id: String,
    pub product: ProductRef,
    pub title: String,
    pub file: FileDescriptor,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Product {
    pub id: i32,
    pub product_name: String,
    pub item_code: Option<String>,
}

/// Create payload. `file` is the inline-encoded PDF.
#[derive(Debug, Serialize)]
pub struct NewInstruction {
    pub product: i32,
    pub title: String,
    pub file: String,
}

/// Metadata patch; absent fields are left untouched by the server.
#[derive(Debug, Default, Serialize)]
pub struct InstructionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<i32>,
}

/// Outcome of a login call.
#[derive(Clone, Debug, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Outcome of a mutation: the server's message plus the touched record.
#[derive(Clone, Debug)]
pub struct Mutation {
    pub message: String,
    pub instruction: Instruction,
}
