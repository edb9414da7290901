/// Who is using the client. A username is only ever present when
/// authenticated, and it is never blank.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated {
        username: String,
        user_id: Option<String>,
    },
}

impl Session {
    /// Returns `None` for a blank username instead of building an invalid session.
    pub fn authenticated(username: &str, user_id: Option<String>) -> Option<Self> {
        let username = username.trim();
        if username.is_empty() {
            return None;
        }

        Some(Self::Authenticated {
            username: username.to_owned(),
            user_id: user_id.filter(|id| !id.trim().is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated { username, .. } => Some(username),
            Self::Anonymous => None,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated { user_id, .. } => user_id.as_deref(),
            Self::Anonymous => None,
        }
    }
}
