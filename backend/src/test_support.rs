//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for `cfg(test)` and the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{
    SessionCodec, SessionDirective, SessionManager, SessionSecret, SessionSecrets, UserId,
};
use crate::inbound::http::session::{SESSION_COOKIE_NAME, SessionCookieConfig};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryJokeRepository, InMemoryUserRepository};
use crate::outbound::security::BcryptPasswordHasher;

/// Lowest cost bcrypt accepts; keeps hashing fast under test.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Clock whose reading only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Secrets list built from literal strings, newest first.
pub fn secrets(values: &[&str]) -> SessionSecrets {
    let secrets = values.iter().map(|value| SessionSecret::new(*value)).collect();
    match SessionSecrets::new(secrets) {
        Ok(secrets) => secrets,
        Err(error) => panic!("test secrets rejected: {error}"),
    }
}

/// Session manager signing with a single fixed secret.
pub fn session_manager(clock: Arc<dyn Clock>) -> SessionManager {
    SessionManager::new(SessionCodec::new(
        secrets(&["test-session-secret-0123456789abcdef"]),
        clock,
    ))
}

/// Driving ports over empty in-memory stores.
pub fn in_memory_ports(clock: Arc<dyn Clock>) -> HttpStatePorts {
    HttpStatePorts::from_repositories(
        Arc::new(InMemoryUserRepository::new(clock.clone())),
        Arc::new(InMemoryJokeRepository::new(clock)),
        Arc::new(BcryptPasswordHasher::new(TEST_BCRYPT_COST)),
    )
}

/// HTTP state around `ports`, issuing non-`Secure` cookies so plain-HTTP
/// test clients send them back.
pub fn state_with_ports(ports: HttpStatePorts, clock: Arc<dyn Clock>) -> HttpState {
    HttpState::new(
        ports,
        Arc::new(session_manager(clock)),
        SessionCookieConfig { secure: false },
    )
}

/// HTTP state over empty in-memory stores.
pub fn in_memory_state(clock: Arc<dyn Clock>) -> HttpState {
    state_with_ports(in_memory_ports(clock.clone()), clock)
}

/// Session cookie set by `res`, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Cookie carrying a freshly issued session for `user_id`.
pub fn session_cookie_for(manager: &SessionManager, user_id: &UserId) -> Cookie<'static> {
    match manager.issue(user_id) {
        Ok(SessionDirective::Persist { token, .. }) => Cookie::new(SESSION_COOKIE_NAME, token),
        Ok(SessionDirective::Discard) => panic!("issue returned a discard directive"),
        Err(error) => panic!("issue failed: {error}"),
    }
}
