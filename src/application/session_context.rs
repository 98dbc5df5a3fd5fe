//! SessionContext - the single owner of in-memory session state.
//!
//! Constructed once by the application root and shared by `Arc` with the
//! request pipeline, the handlers and the shell. Every change goes through
//! [`SessionContext::dispatch`], which runs the reducer, mirrors the
//! resulting store effect into [`SessionStorage`], and broadcasts a
//! [`SessionSignal`] for the shell to turn into navigation.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::domain::foundation::{Role, UserId};
use crate::domain::session::{
    reduce, AccessToken, SessionCredentials, SessionError, SessionEvent, SessionState, StoreEffect,
};
use crate::ports::SessionStorage;

const SIGNAL_CAPACITY: usize = 16;

/// Session lifecycle notifications for the application root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    SignedIn { role: Option<Role> },
    Registered,
    SignedOut,
    /// The backend rejected the credential; the session was cleared.
    Invalidated,
}

/// Monotonic counter identifying one credential generation.
///
/// Bumped whenever the user/token pair changes, so in-flight requests can
/// tell whether the session they were sent under still exists.
pub type SessionEpoch = u64;

#[derive(Debug, Default)]
struct Inner {
    state: SessionState,
    epoch: SessionEpoch,
}

/// Credential snapshot taken when a request leaves.
#[derive(Debug, Clone)]
pub struct RequestCredential {
    pub token: Option<AccessToken>,
    pub user_id: Option<UserId>,
    pub epoch: SessionEpoch,
}

pub struct SessionContext {
    inner: RwLock<Inner>,
    storage: Arc<dyn SessionStorage>,
    signals: broadcast::Sender<SessionSignal>,
}

impl SessionContext {
    /// Creates an empty context. Call [`hydrate`](Self::hydrate) to load the
    /// persisted record.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (signals, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self {
            inner: RwLock::new(Inner::default()),
            storage,
            signals,
        }
    }

    /// Creates a context and loads whatever the store holds.
    pub async fn restore(storage: Arc<dyn SessionStorage>) -> Arc<Self> {
        let context = Arc::new(Self::new(storage));
        context.hydrate().await;
        context
    }

    /// Loads the persisted record into memory.
    ///
    /// A store that cannot be read counts as signed out.
    pub async fn hydrate(&self) -> SessionState {
        let credentials = match self.storage.read().await {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "Could not read persisted session, starting signed out");
                SessionCredentials::Empty
            }
        };
        debug!(present = credentials.is_present(), "Session hydrated");

        // Hydration has no store effect and cannot be rejected.
        match self.dispatch(SessionEvent::Hydrated(credentials)).await {
            Ok(state) => state,
            Err(_) => self.snapshot().await,
        }
    }

    /// Applies one event and its store effect.
    ///
    /// The write lock is held across the storage call, so store writes are
    /// applied in the same order as the transitions that caused them.
    pub async fn dispatch(&self, event: SessionEvent) -> Result<SessionState, SessionError> {
        let signal = signal_for(&event);

        let mut inner = self.inner.write().await;
        self.transition(&mut inner, event).await?;
        let state = inner.state.clone();
        drop(inner);

        if let Some(signal) = signal {
            self.emit(signal, &state);
        }
        Ok(state)
    }

    /// Handles a rejected credential.
    ///
    /// Only acts when `epoch` is still current: a second 401 from a request
    /// sent under the same, already invalidated session is a no-op, and a
    /// 401 for an older session never touches a newer one. An already empty
    /// session still emits [`SessionSignal::Invalidated`].
    ///
    /// Returns whether the session was invalidated by this call.
    pub async fn invalidate(&self, epoch: SessionEpoch) -> bool {
        let mut inner = self.inner.write().await;
        if inner.epoch != epoch {
            debug!(request_epoch = epoch, current_epoch = inner.epoch, "Ignoring stale 401");
            return false;
        }
        if let Err(e) = self.transition(&mut inner, SessionEvent::SessionInvalidated).await {
            error!(error = %e, "Session invalidation rejected");
            return false;
        }
        let state = inner.state.clone();
        drop(inner);

        info!("Session invalidated by backend");
        self.emit(SessionSignal::Invalidated, &state);
        true
    }

    pub async fn snapshot(&self) -> SessionState {
        self.inner.read().await.state.clone()
    }

    pub async fn epoch(&self) -> SessionEpoch {
        self.inner.read().await.epoch
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.state.is_authenticated()
    }

    /// Token, user and epoch for an outgoing request, read together.
    pub async fn request_credential(&self) -> RequestCredential {
        let inner = self.inner.read().await;
        RequestCredential {
            token: inner.state.token().cloned(),
            user_id: inner.state.user().map(|user| user.id.clone()),
            epoch: inner.epoch,
        }
    }

    /// Whether a response for a request sent under `sent` must be discarded.
    ///
    /// Once the epoch has moved, only a session that still belongs to the
    /// sending user keeps the response; a token refresh passes, a sign-out
    /// or a different user signing in does not.
    pub async fn is_superseded(&self, sent: &RequestCredential) -> bool {
        let inner = self.inner.read().await;
        if inner.epoch == sent.epoch {
            return false;
        }
        let current = inner.state.user().map(|user| &user.id);
        current.is_none() || current != sent.user_id.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    async fn transition(&self, inner: &mut Inner, event: SessionEvent) -> Result<(), SessionError> {
        let name = event.name();
        let transition = reduce(&inner.state, event)?;

        if let Some(effect) = &transition.effect {
            self.apply_effect(effect).await;
        }
        if transition.state.credentials != inner.state.credentials {
            inner.epoch += 1;
        }
        inner.state = transition.state;

        debug!(
            event = name,
            epoch = inner.epoch,
            authenticated = inner.state.is_authenticated(),
            "Session event applied"
        );
        Ok(())
    }

    fn emit(&self, signal: SessionSignal, state: &SessionState) {
        let signal = match signal {
            SessionSignal::SignedIn { .. } => SessionSignal::SignedIn { role: state.role() },
            other => other,
        };
        // No subscribers is fine.
        let _ = self.signals.send(signal);
    }

    async fn apply_effect(&self, effect: &StoreEffect) {
        let result = match effect {
            StoreEffect::Persist { user, token } => self.storage.write(user, token).await,
            StoreEffect::Clear => self.storage.clear().await,
        };
        // In-memory state stays authoritative for this process.
        if let Err(e) = result {
            error!(error = %e, code = %e.code(), "Failed to update persisted session");
        }
    }
}

fn signal_for(event: &SessionEvent) -> Option<SessionSignal> {
    match event {
        SessionEvent::LoginSuccess { .. } => Some(SessionSignal::SignedIn { role: None }),
        SessionEvent::RegisterSuccess(_) => Some(SessionSignal::Registered),
        SessionEvent::Logout => Some(SessionSignal::SignedOut),
        SessionEvent::SessionInvalidated => Some(SessionSignal::Invalidated),
        _ => None,
    }
}
