use anyhow::Context as _;

use crate::model::session::Session;
use crate::store::SessionStore;

const AUTHENTICATED_KEY: &str = "isAuthenticated";
const USERNAME_KEY: &str = "username";
const USER_ID_KEY: &str = "userId";

pub async fn load_session(store: &SessionStore) -> anyhow::Result<Session> {
    let flag = store
        .get(&store.key(AUTHENTICATED_KEY))
        .await
        .context("failed to read session flag")?;

    if flag.as_deref() != Some("true") {
        return Ok(Session::Anonymous);
    }

    let username = store
        .get(&store.key(USERNAME_KEY))
        .await
        .context("failed to read session username")?
        .unwrap_or_default();
    let user_id = store
        .get(&store.key(USER_ID_KEY))
        .await
        .context("failed to read session user id")?;

    match Session::authenticated(&username, user_id) {
        Some(session) => Ok(session),
        None => {
            tracing::warn!(
                backend = store.backend_name(),
                "stored session is flagged authenticated without a username; treating as signed out"
            );
            Ok(Session::Anonymous)
        }
    }
}

/// Persists `session`. Saving `Anonymous` is the same as [`clear_session`].
pub async fn save_session(store: &SessionStore, session: &Session) -> anyhow::Result<()> {
    let Session::Authenticated { username, user_id } = session else {
        return clear_session(store).await;
    };

    store
        .set(&store.key(USERNAME_KEY), username)
        .await
        .context("failed to store session username")?;

    match user_id {
        Some(id) => store.set(&store.key(USER_ID_KEY), id).await,
        None => store.del(&store.key(USER_ID_KEY)).await,
    }
    .context("failed to store session user id")?;

    // flag last, so a half-written session never loads as authenticated
    store
        .set(&store.key(AUTHENTICATED_KEY), "true")
        .await
        .context("failed to store session flag")?;

    tracing::debug!(username = %username, backend = store.backend_name(), "session saved");
    Ok(())
}

pub async fn clear_session(store: &SessionStore) -> anyhow::Result<()> {
    for suffix in [AUTHENTICATED_KEY, USERNAME_KEY, USER_ID_KEY] {
        store
            .del(&store.key(suffix))
            .await
            .with_context(|| format!("failed to remove session key `{suffix}`"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{clear_session, load_session, save_session};
    use crate::model::session::Session;
    use crate::store::SessionStore;

    #[tokio::test]
    async fn empty_store_is_anonymous() {
        let store = SessionStore::memory("test");
        assert_eq!(load_session(&store).await.unwrap(), Session::Anonymous);
    }

    #[tokio::test]
    async fn saved_sessions_load_back() {
        let store = SessionStore::memory("test");
        let session = Session::authenticated("JAY", Some("42".to_owned())).unwrap();

        save_session(&store, &session).await.unwrap();
        assert_eq!(load_session(&store).await.unwrap(), session);

        clear_session(&store).await.unwrap();
        assert_eq!(load_session(&store).await.unwrap(), Session::Anonymous);
        assert_eq!(store.get(&store.key("username")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn flag_without_username_loads_anonymous() {
        let store = SessionStore::memory("test");
        store.set(&store.key("isAuthenticated"), "true").await.unwrap();
        store.set(&store.key("username"), "  ").await.unwrap();

        assert_eq!(load_session(&store).await.unwrap(), Session::Anonymous);
    }

    #[tokio::test]
    async fn username_without_flag_loads_anonymous() {
        let store = SessionStore::memory("test");
        store.set(&store.key("username"), "JAY").await.unwrap();

        assert_eq!(load_session(&store).await.unwrap(), Session::Anonymous);
    }

    #[tokio::test]
    async fn resaving_without_id_drops_stale_id() {
        let store = SessionStore::memory("test");
        let first = Session::authenticated("kit", Some("7".to_owned())).unwrap();
        save_session(&store, &first).await.unwrap();

        let second = Session::authenticated("JAY", None).unwrap();
        save_session(&store, &second).await.unwrap();

        assert_eq!(load_session(&store).await.unwrap(), second);
    }

    #[tokio::test]
    async fn file_backed_sessions_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let session = Session::authenticated("JAY", None).unwrap();

        save_session(&SessionStore::file(&path, "test"), &session)
            .await
            .unwrap();

        let reopened = SessionStore::file(&path, "test");
        assert_eq!(load_session(&reopened).await.unwrap(), session);
    }
}
