//! Signing secrets for session tokens.

use zeroize::Zeroizing;

/// Errors raised when assembling the secret list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionSecretsError {
    /// No secrets were supplied.
    #[error("at least one session secret is required")]
    Empty,
    /// A supplied secret had no bytes.
    #[error("session secret at position {position} is empty")]
    EmptySecret { position: usize },
}

/// A single signing secret. Wiped from memory on drop.
#[derive(Clone)]
pub struct SessionSecret(Zeroizing<Vec<u8>>);

impl SessionSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Borrow the key material.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the secret has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}

/// Ordered, non-empty list of secrets, newest first.
///
/// The newest secret signs new tokens. Every secret verifies, so a rotated-out
/// secret keeps existing sessions alive until it is removed from the list.
///
/// # Examples
/// ```
/// use jokes::domain::{SessionSecret, SessionSecrets};
///
/// let secrets = SessionSecrets::new(vec![
///     SessionSecret::new("newest"),
///     SessionSecret::new("older"),
/// ])
/// .expect("non-empty list");
/// assert_eq!(secrets.newest().as_bytes(), b"newest");
/// assert!(SessionSecrets::new(Vec::new()).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SessionSecrets {
    newest: SessionSecret,
    older: Vec<SessionSecret>,
}

impl SessionSecrets {
    /// Validate and wrap a newest-first list of secrets.
    pub fn new(secrets: Vec<SessionSecret>) -> Result<Self, SessionSecretsError> {
        if let Some(position) = secrets.iter().position(SessionSecret::is_empty) {
            return Err(SessionSecretsError::EmptySecret { position });
        }
        let mut iter = secrets.into_iter();
        let newest = iter.next().ok_or(SessionSecretsError::Empty)?;
        Ok(Self {
            newest,
            older: iter.collect(),
        })
    }

    /// Secret used to sign new tokens.
    pub fn newest(&self) -> &SessionSecret {
        &self.newest
    }

    /// All secrets in verification order, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &SessionSecret> {
        std::iter::once(&self.newest).chain(self.older.iter())
    }

    /// Number of configured secrets.
    pub fn len(&self) -> usize {
        self.older.len() + 1
    }

    /// Always false; the list is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn keeps_newest_first_order() {
        let secrets = SessionSecrets::new(vec![
            SessionSecret::new("a"),
            SessionSecret::new("b"),
            SessionSecret::new("c"),
        ])
        .expect("valid secrets");
        let order: Vec<&[u8]> = secrets.iter().map(SessionSecret::as_bytes).collect();
        assert_eq!(order, vec![b"a".as_slice(), b"b".as_slice(), b"c".as_slice()]);
        assert_eq!(secrets.len(), 3);
    }

    #[rstest]
    fn rejects_empty_list() {
        assert_eq!(
            SessionSecrets::new(Vec::new()).expect_err("empty list"),
            SessionSecretsError::Empty
        );
    }

    #[rstest]
    fn rejects_blank_secret() {
        let err = SessionSecrets::new(vec![SessionSecret::new("a"), SessionSecret::new("")])
            .expect_err("blank secret");
        assert_eq!(err, SessionSecretsError::EmptySecret { position: 1 });
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let secret = SessionSecret::new("hunter2");
        assert!(!format!("{secret:?}").contains("hunter2"));
    }
}
