use serde::{Deserialize, Serialize};

/// Identifier of a person within the collection. `0` means "not yet assigned".
pub type PersonId = u64;

/// Postal address attached to a person.
///
/// A missing address deserializes to the all-empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub suite: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zipcode: String,
}

/// Company a person works for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub name: String,
}

/// The single record type held in the collection.
///
/// Every field is defaulted on deserialization so that partial records coming
/// from the remote source or from older blobs normalize to empty values
/// instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: PersonId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub company: Company,
}

impl Person {
    /// Create an unassigned person with the two required fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: PersonId) -> Self {
        self.id = id;
        self
    }

    /// Whether an id has been assigned.
    pub fn has_id(&self) -> bool {
        self.id != 0
    }

    /// Copy of this record carrying `id` instead of whatever it had.
    pub fn assigned(&self, id: PersonId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}
