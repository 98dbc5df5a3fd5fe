//! Pure session transitions.
//!
//! `reduce` is the only way the in-memory session changes. It never touches
//! storage itself; instead it returns the [`StoreEffect`] the caller must
//! apply to the persisted store so both stay in step.

use super::{AccessToken, SessionCredentials, SessionError, SessionEvent, SessionState, UserSummary};

/// Side effect on the persisted session store requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    /// Replace the whole persisted record.
    Persist {
        user: UserSummary,
        token: AccessToken,
    },
    /// Remove both persisted keys.
    Clear,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<StoreEffect>,
}

impl Transition {
    fn pure(state: SessionState) -> Self {
        Self { state, effect: None }
    }

    fn with_effect(state: SessionState, effect: StoreEffect) -> Self {
        Self {
            state,
            effect: Some(effect),
        }
    }
}

/// Applies `event` to `state`.
///
/// # Errors
///
/// Returns `SessionError::NoActiveSession` for `TokenRefreshed` and
/// `UserRefreshed` on an empty session. The input state is left as it was.
pub fn reduce(state: &SessionState, event: SessionEvent) -> Result<Transition, SessionError> {
    let mut next = state.clone();

    let transition = match event {
        SessionEvent::Hydrated(credentials) => Transition::pure(SessionState::hydrated(credentials)),

        SessionEvent::LoginStart | SessionEvent::RegisterStart => {
            next.loading = true;
            next.error = None;
            Transition::pure(next)
        }

        SessionEvent::LoginSuccess { user, token } => {
            next.loading = false;
            next.error = None;
            next.credentials = SessionCredentials::present(user.clone(), token.clone());
            Transition::with_effect(next, StoreEffect::Persist { user, token })
        }

        // A failed attempt keeps whatever session was already there.
        SessionEvent::LoginFailure(message) | SessionEvent::RegisterFailure(message) => {
            next.loading = false;
            next.error = Some(message);
            Transition::pure(next)
        }

        // Registration needs out-of-band email verification; it never signs in.
        SessionEvent::RegisterSuccess(_) => {
            next.loading = false;
            next.error = None;
            Transition::pure(next)
        }

        SessionEvent::Logout | SessionEvent::SessionInvalidated => {
            Transition::with_effect(SessionState::empty(), StoreEffect::Clear)
        }

        SessionEvent::TokenRefreshed(token) => {
            let user = match &state.credentials {
                SessionCredentials::Present { user, .. } => user.clone(),
                SessionCredentials::Empty => {
                    return Err(SessionError::no_active_session("session.token_refreshed"))
                }
            };
            next.credentials = SessionCredentials::present(user.clone(), token.clone());
            Transition::with_effect(next, StoreEffect::Persist { user, token })
        }

        SessionEvent::UserRefreshed(user) => {
            let token = match &state.credentials {
                SessionCredentials::Present { token, .. } => token.clone(),
                SessionCredentials::Empty => {
                    return Err(SessionError::no_active_session("session.user_refreshed"))
                }
            };
            next.credentials = SessionCredentials::present(user.clone(), token.clone());
            Transition::with_effect(next, StoreEffect::Persist { user, token })
        }

        SessionEvent::ClearError => {
            next.error = None;
            Transition::pure(next)
        }
    };

    Ok(transition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};

    fn user(role: Role) -> UserSummary {
        UserSummary::new(
            UserId::new("1").unwrap(),
            Some("Test".to_string()),
            Some("a@b.com".to_string()),
            Some(role),
        )
    }

    fn token(value: &str) -> AccessToken {
        AccessToken::new(value).unwrap()
    }

    fn signed_in() -> SessionState {
        SessionState::hydrated(SessionCredentials::present(user(Role::Patient), token("tok123")))
    }

    #[test]
    fn login_start_sets_loading_and_clears_error() {
        let state = SessionState {
            error: Some("old".into()),
            ..SessionState::empty()
        };
        let t = reduce(&state, SessionEvent::LoginStart).unwrap();
        assert!(t.state.loading);
        assert!(t.state.error.is_none());
        assert!(t.effect.is_none());
    }

    #[test]
    fn login_success_authenticates_and_persists() {
        let start = reduce(&SessionState::empty(), SessionEvent::LoginStart).unwrap().state;
        let t = reduce(
            &start,
            SessionEvent::LoginSuccess {
                user: user(Role::Patient),
                token: token("tok123"),
            },
        )
        .unwrap();

        assert!(t.state.is_authenticated());
        assert!(!t.state.loading);
        assert_eq!(t.state.role(), Some(Role::Patient));
        assert_eq!(
            t.effect,
            Some(StoreEffect::Persist {
                user: user(Role::Patient),
                token: token("tok123"),
            })
        );
    }

    #[test]
    fn login_failure_keeps_prior_session() {
        let state = reduce(&signed_in(), SessionEvent::LoginStart).unwrap().state;
        let t = reduce(&state, SessionEvent::LoginFailure("Invalid credentials".into())).unwrap();

        assert_eq!(t.state.credentials, signed_in().credentials);
        assert_eq!(t.state.error.as_deref(), Some("Invalid credentials"));
        assert!(!t.state.loading);
        assert!(t.effect.is_none());
    }

    #[test]
    fn register_success_does_not_authenticate() {
        let state = reduce(&SessionState::empty(), SessionEvent::RegisterStart).unwrap().state;
        let t = reduce(&state, SessionEvent::RegisterSuccess(Some(user(Role::Doctor)))).unwrap();

        assert!(!t.state.is_authenticated());
        assert!(t.state.token().is_none());
        assert!(!t.state.loading);
        assert!(t.effect.is_none());
    }

    #[test]
    fn register_failure_records_message() {
        let t = reduce(&SessionState::empty(), SessionEvent::RegisterFailure("taken".into())).unwrap();
        assert_eq!(t.state.error.as_deref(), Some("taken"));
    }

    #[test]
    fn logout_resets_and_clears_store() {
        let t = reduce(&signed_in(), SessionEvent::Logout).unwrap();
        assert_eq!(t.state, SessionState::empty());
        assert_eq!(t.effect, Some(StoreEffect::Clear));
    }

    #[test]
    fn invalidation_resets_and_clears_store() {
        let t = reduce(&signed_in(), SessionEvent::SessionInvalidated).unwrap();
        assert_eq!(t.state, SessionState::empty());
        assert_eq!(t.effect, Some(StoreEffect::Clear));
    }

    #[test]
    fn clear_error_touches_only_error() {
        let state = SessionState {
            error: Some("boom".into()),
            loading: true,
            ..signed_in()
        };
        let t = reduce(&state, SessionEvent::ClearError).unwrap();
        assert!(t.state.error.is_none());
        assert!(t.state.loading);
        assert_eq!(t.state.credentials, state.credentials);
    }

    #[test]
    fn token_refresh_keeps_user_and_persists_whole_record() {
        let t = reduce(&signed_in(), SessionEvent::TokenRefreshed(token("fresh"))).unwrap();
        assert_eq!(t.state.token(), Some(&token("fresh")));
        assert_eq!(t.state.user(), Some(&user(Role::Patient)));
        assert!(matches!(t.effect, Some(StoreEffect::Persist { .. })));
    }

    #[test]
    fn token_refresh_on_empty_session_is_rejected() {
        let err = reduce(&SessionState::empty(), SessionEvent::TokenRefreshed(token("x"))).unwrap_err();
        assert!(matches!(err, SessionError::NoActiveSession { .. }));
    }

    #[test]
    fn user_refresh_keeps_token() {
        let t = reduce(&signed_in(), SessionEvent::UserRefreshed(user(Role::Admin))).unwrap();
        assert_eq!(t.state.role(), Some(Role::Admin));
        assert_eq!(t.state.token(), Some(&token("tok123")));
    }

    #[test]
    fn user_refresh_on_empty_session_is_rejected() {
        assert!(reduce(&SessionState::empty(), SessionEvent::UserRefreshed(user(Role::Admin))).is_err());
    }

    #[test]
    fn hydrate_replaces_state_without_store_effect() {
        let creds = signed_in().credentials;
        let t = reduce(&SessionState::empty(), SessionEvent::Hydrated(creds.clone())).unwrap();
        assert_eq!(t.state.credentials, creds);
        assert!(t.effect.is_none());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_role() -> impl Strategy<Value = Option<Role>> {
            prop_oneof![
                Just(None),
                Just(Some(Role::Patient)),
                Just(Some(Role::Doctor)),
                Just(Some(Role::Admin)),
            ]
        }

        fn arb_user() -> impl Strategy<Value = UserSummary> {
            ("[a-z0-9]{1,8}", arb_role()).prop_map(|(id, role)| {
                UserSummary::new(UserId::new(id).unwrap(), None, None, role)
            })
        }

        fn arb_token() -> impl Strategy<Value = AccessToken> {
            "[A-Za-z0-9]{1,16}".prop_map(|t| AccessToken::new(t).unwrap())
        }

        fn arb_event() -> impl Strategy<Value = SessionEvent> {
            prop_oneof![
                Just(SessionEvent::LoginStart),
                (arb_user(), arb_token())
                    .prop_map(|(user, token)| SessionEvent::LoginSuccess { user, token }),
                "[a-z ]{0,12}".prop_map(SessionEvent::LoginFailure),
                Just(SessionEvent::RegisterStart),
                proptest::option::of(arb_user()).prop_map(SessionEvent::RegisterSuccess),
                "[a-z ]{0,12}".prop_map(SessionEvent::RegisterFailure),
                Just(SessionEvent::Logout),
                Just(SessionEvent::SessionInvalidated),
                arb_token().prop_map(SessionEvent::TokenRefreshed),
                arb_user().prop_map(SessionEvent::UserRefreshed),
                Just(SessionEvent::ClearError),
            ]
        }

        proptest! {
            #[test]
            fn authenticated_iff_token_present(events in prop::collection::vec(arb_event(), 0..40)) {
                let mut state = SessionState::empty();
                for event in events {
                    if let Ok(t) = reduce(&state, event) {
                        state = t.state;
                    }
                    prop_assert_eq!(state.is_authenticated(), state.token().is_some());
                    prop_assert_eq!(state.user().is_some(), state.token().is_some());
                }
            }

            #[test]
            fn failures_never_touch_credentials(
                events in prop::collection::vec(arb_event(), 0..20),
                message in "[a-z]{1,10}",
                register in any::<bool>(),
            ) {
                let mut state = SessionState::empty();
                for event in events {
                    if let Ok(t) = reduce(&state, event) {
                        state = t.state;
                    }
                }
                let event = if register {
                    SessionEvent::RegisterFailure(message)
                } else {
                    SessionEvent::LoginFailure(message)
                };
                let t = reduce(&state, event).unwrap();
                prop_assert_eq!(&t.state.credentials, &state.credentials);
                prop_assert!(t.effect.is_none());
            }

            #[test]
            fn register_success_never_authenticates(user in proptest::option::of(arb_user())) {
                let t = reduce(&SessionState::empty(), SessionEvent::RegisterSuccess(user)).unwrap();
                prop_assert!(!t.state.is_authenticated());
            }

            #[test]
            fn logout_always_clears(events in prop::collection::vec(arb_event(), 0..20)) {
                let mut state = SessionState::empty();
                for event in events {
                    if let Ok(t) = reduce(&state, event) {
                        state = t.state;
                    }
                }
                let t = reduce(&state, SessionEvent::Logout).unwrap();
                prop_assert_eq!(t.state, SessionState::empty());
                prop_assert_eq!(t.effect, Some(StoreEffect::Clear));
            }
        }
    }
}
