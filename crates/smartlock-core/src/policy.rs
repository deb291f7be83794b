use crate::error::InvalidCommand;
use crate::model::{AppIdentifier, Sample};
use std::collections::BTreeSet;

/// Immutable set of blocked applications for one enforcement session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockPolicy {
    blocked: BTreeSet<AppIdentifier>,
}

impl BlockPolicy {
    /// Build a policy from the identifiers passed over the command surface.
    ///
    /// Duplicates collapse. Identifiers are kept verbatim, but a blank one
    /// can never match a real application and is rejected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand::EmptyIdentifier` if any identifier is blank
    pub fn from_apps<I, S>(apps: I) -> Result<Self, InvalidCommand>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut blocked = BTreeSet::new();
        for app in apps {
            let app = app.into();
            if app.trim().is_empty() {
                return Err(InvalidCommand::EmptyIdentifier);
            }
            blocked.insert(AppIdentifier::new(app));
        }
        Ok(Self { blocked })
    }

    #[must_use]
    pub fn is_blocked(&self, app: &AppIdentifier) -> bool {
        self.blocked.contains(app)
    }

    /// `Unknown` samples are never blocked
    #[must_use]
    pub fn blocks(&self, sample: &Sample) -> Option<AppIdentifier> {
        sample
            .app()
            .filter(|app| self.is_blocked(app))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    pub fn apps(&self) -> impl Iterator<Item = &AppIdentifier> {
        self.blocked.iter()
    }
}
