use tracing::warn;

use crate::{
    client::ApiClient,
    error::ApiError,
    model::{AddFactResponse, Fact},
};

/// A transient message for the user; dismissed explicitly or replaced by the next one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Client-side state of the facts view: the last fetched list, the last
/// random pick, and the current notice. Failures never leave stale data behind.
#[derive(Clone, Debug)]
pub struct FactBoard {
    api: ApiClient,
    facts: Vec<Fact>,
    random: Option<Fact>,
    notice: Option<Notice>,
}

impl FactBoard {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            facts: Vec::new(),
            random: None,
            notice: None,
        }
    }

    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    pub fn random(&self) -> Option<&Fact> {
        self.random.as_ref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Re-read the full list. On failure the list is emptied.
    pub async fn refresh(&mut self) -> Result<&[Fact], ApiError> {
        match self.api.list_facts().await {
            Ok(facts) => {
                self.facts = facts;
                Ok(&self.facts)
            }
            Err(err) => {
                warn!(?err, "failed to refresh cat facts");
                self.facts.clear();
                self.notice = Some(Notice::Error(err.user_message()));
                Err(err)
            }
        }
    }

    pub async fn pick_random(&mut self) -> Result<&Fact, ApiError> {
        match self.api.random_fact().await {
            Ok(fact) => Ok(self.random.insert(fact)),
            Err(err) => {
                warn!(?err, "failed to fetch random cat fact");
                self.random = None;
                self.notice = Some(Notice::Error(err.user_message()));
                Err(err)
            }
        }
    }

    /// Submit a new fact, then re-read the whole list when the collaborator
    /// reports success. A failed re-read keeps the add's result but replaces
    /// the notice with the refresh error.
    pub async fn submit(&mut self, text: &str) -> Result<AddFactResponse, ApiError> {
        let created = match self.api.add_fact(text).await {
            Ok(created) => created,
            Err(err) => {
                if !matches!(err, ApiError::Validation(_)) {
                    warn!(?err, "failed to add cat fact");
                }
                self.notice = Some(Notice::Error(err.user_message()));
                return Err(err);
            }
        };

        self.notice = Some(Notice::Success(created.message.clone()));
        if created.is_success() {
            // The error is already recorded on the board.
            let _ = self.refresh().await;
        }

        Ok(created)
    }
}
