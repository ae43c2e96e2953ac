use tokio::sync::watch;

/// The client-held session: at most one bearer token, set at login and
/// discarded at logout. "Authenticated" is never stored; it is recomputed
/// from the held token, at startup and on every broadcast.
///
/// Dropping the token is the only way a client ends a session — the server
/// keeps no session table, so the token itself stays valid until expiry.
#[derive(Debug)]
pub struct Session {
    token: watch::Sender<Option<String>>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        let (token, _) = watch::channel(None);
        Self { token }
    }

    /// Stores the token handed out by a successful login and fires the
    /// broadcast.
    pub fn set_token(&self, token: String) {
        self.token.send_replace(Some(token));
    }

    /// Discards the held token (logout) and fires the broadcast.
    pub fn clear(&self) {
        self.token.send_replace(None);
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Subscribes one observer (one tab, one screen) to the broadcast.
    /// Observers created at different times may transiently disagree until
    /// they each see the next change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[tokio::test]
    async fn broadcasts_login_and_logout() {
        let session = Session::new();
        let mut observer = session.subscribe();

        session.set_token("token-a".to_string());
        observer.changed().await.expect("sender alive");
        assert!(session.is_authenticated());
        assert_eq!(observer.borrow().as_deref(), Some("token-a"));

        session.clear();
        observer.changed().await.expect("sender alive");
        assert!(!session.is_authenticated());
        assert_eq!(*observer.borrow(), None);
    }

    #[tokio::test]
    async fn late_subscribers_see_the_current_state() {
        let session = Session::new();
        session.set_token("token-a".to_string());

        let observer = session.subscribe();
        assert_eq!(observer.borrow().as_deref(), Some("token-a"));
    }
}
