//! Joke aggregate and creation drafts.
//!
//! Lengths are counted in Unicode scalar values. Stored jokes are not
//! re-validated on read; only drafts go through [`JokeDraft::try_from_parts`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Owned, UserId, ValidationFailure};

/// Minimum characters in a joke name.
pub const JOKE_NAME_MIN: usize = 3;
/// Minimum characters in joke content.
pub const JOKE_CONTENT_MIN: usize = 10;

const NAME_FIELD: &str = "name";
const CONTENT_FIELD: &str = "content";

/// Stable joke identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokeId(Uuid);

impl JokeId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for JokeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JokeId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Stored joke owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joke {
    pub id: JokeId,
    pub owner_id: UserId,
    pub name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Joke {
    fn owner_id(&self) -> &UserId {
        &self.owner_id
    }
}

/// List projection: identifier and name only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeSummary {
    pub id: JokeId,
    pub name: String,
}

impl From<&Joke> for JokeSummary {
    fn from(joke: &Joke) -> Self {
        Self {
            id: joke.id,
            name: joke.name.clone(),
        }
    }
}

/// Validated input for creating a joke.
///
/// # Examples
/// ```
/// use jokes::domain::JokeDraft;
///
/// let draft = JokeDraft::try_from_parts("Frisbee", "I was wondering why the frisbee kept getting bigger")
///     .expect("valid draft");
/// assert_eq!(draft.name(), "Frisbee");
///
/// let failure = JokeDraft::try_from_parts("ab", "short").expect_err("both fields fail");
/// assert_eq!(failure.field_errors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JokeDraft {
    name: String,
    content: String,
}

impl JokeDraft {
    /// Validate both fields, collecting every failure rather than stopping at
    /// the first.
    pub fn try_from_parts(name: &str, content: &str) -> Result<Self, ValidationFailure> {
        let mut failure = ValidationFailure::default();
        if name.chars().count() < JOKE_NAME_MIN {
            failure.field_errors.insert(
                NAME_FIELD,
                format!("Joke name must be at least {JOKE_NAME_MIN} characters long"),
            );
        }
        if content.chars().count() < JOKE_CONTENT_MIN {
            failure.field_errors.insert(
                CONTENT_FIELD,
                format!("Joke content must be at least {JOKE_CONTENT_MIN} characters long"),
            );
        }

        if failure.field_errors.is_empty() {
            return Ok(Self {
                name: name.to_owned(),
                content: content.to_owned(),
            });
        }

        failure.fields.insert(NAME_FIELD.to_owned(), name.to_owned());
        failure
            .fields
            .insert(CONTENT_FIELD.to_owned(), content.to_owned());
        Err(failure)
    }

    /// Validated joke name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Validated joke content.
    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// Fields required to persist a new joke.
#[derive(Debug, Clone)]
pub struct NewJoke {
    pub owner_id: UserId,
    pub draft: JokeDraft,
}
