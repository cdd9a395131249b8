//! Behaviour tests for rotating session signing secrets.
//!
//! Secrets are loaded the way the server loads them, through
//! `session_settings_from_env` over a mocked environment.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use jokes::domain::{SessionCodec, SessionDirective, SessionManager, SessionSecrets, UserId};
use jokes::inbound::http::session_config::fingerprint::{
    secret_fingerprint, secrets_fingerprints,
};
use jokes::inbound::http::session_config::{
    BuildMode, COOKIE_SECURE_ENV, SECRET_FILE_ENV, SECRETS_ENV, SessionSettings,
    session_settings_from_env,
};
use mockable::{DefaultClock, MockEnv};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::NamedTempFile;

const OLD_SECRET: &str = "old-signing-secret-0123456789abcdef0123";
const NEW_SECRET: &str = "new-signing-secret-fedcba9876543210fedc";

struct RotationWorld {
    vars: RefCell<HashMap<String, String>>,
    secrets_file: RefCell<Option<NamedTempFile>>,
    manager: RefCell<Option<SessionManager>>,
    settings: RefCell<Option<SessionSettings>>,
    user_id: UserId,
    token: RefCell<Option<String>>,
}

impl RotationWorld {
    fn new() -> Self {
        let mut vars = HashMap::new();
        vars.insert(COOKIE_SECURE_ENV.to_owned(), "1".to_owned());
        Self {
            vars: RefCell::new(vars),
            secrets_file: RefCell::new(None),
            manager: RefCell::new(None),
            settings: RefCell::new(None),
            user_id: UserId::random(),
            token: RefCell::new(None),
        }
    }

    fn set_env_var(&self, name: &str, value: &str) {
        self.vars
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    /// Load settings from the mocked environment and switch to a manager
    /// built from them.
    fn load(&self) {
        let vars = self.vars.borrow().clone();
        let mut env = MockEnv::new();
        env.expect_string()
            .times(0..)
            .returning(move |key| vars.get(key).cloned());
        let settings =
            session_settings_from_env(&env, BuildMode::Release).expect("settings should load");
        *self.manager.borrow_mut() = Some(manager_for(settings.secrets.clone()));
        *self.settings.borrow_mut() = Some(settings);
    }

    fn with_manager<T>(&self, f: impl FnOnce(&SessionManager) -> T) -> T {
        f(self.manager.borrow().as_ref().expect("manager configured"))
    }
}

fn manager_for(secrets: SessionSecrets) -> SessionManager {
    SessionManager::new(SessionCodec::new(secrets, Arc::new(DefaultClock)))
}

fn issue_token(manager: &SessionManager, user_id: &UserId) -> String {
    match manager.issue(user_id).expect("issue session") {
        SessionDirective::Persist { token, .. } => token,
        SessionDirective::Discard => panic!("issue returned a discard directive"),
    }
}

#[fixture]
fn world() -> RotationWorld {
    RotationWorld::new()
}

#[given("sessions are signed with the old secret")]
fn sessions_are_signed_with_the_old_secret(world: &RotationWorld) {
    world.set_env_var(SECRETS_ENV, OLD_SECRET);
    world.load();
}

#[given("a session was issued for a user")]
fn a_session_was_issued_for_a_user(world: &RotationWorld) {
    let token = world.with_manager(|manager| issue_token(manager, &world.user_id));
    *world.token.borrow_mut() = Some(token);
}

#[given("a secrets file listing the new secret then the old one")]
fn a_secrets_file_listing_new_then_old(world: &RotationWorld) {
    let mut file = NamedTempFile::new().expect("temporary secrets file");
    writeln!(file, "{NEW_SECRET}\n{OLD_SECRET}").expect("write secrets");
    let path = file.path().to_str().expect("utf-8 temp path").to_owned();
    world.set_env_var(SECRET_FILE_ENV, &path);
    *world.secrets_file.borrow_mut() = Some(file);
}

#[when("the secrets are rotated to the new secret followed by the old one")]
fn the_secrets_are_rotated(world: &RotationWorld) {
    world.set_env_var(SECRETS_ENV, &format!("{NEW_SECRET},{OLD_SECRET}"));
    world.load();
}

#[when("the secrets are replaced by the new secret alone")]
fn the_secrets_are_replaced(world: &RotationWorld) {
    world.set_env_var(SECRETS_ENV, NEW_SECRET);
    world.load();
}

#[when("the session configuration is loaded")]
fn the_session_configuration_is_loaded(world: &RotationWorld) {
    world.load();
}

#[then("the session still identifies the user")]
fn the_session_still_identifies_the_user(world: &RotationWorld) {
    let token = world.token.borrow().clone().expect("token issued");
    let resolved = world.with_manager(|manager| manager.current_user_id(Some(&token)));
    assert_eq!(resolved, Some(world.user_id.clone()));
}

#[then("new sessions verify with the new secret alone")]
fn new_sessions_verify_with_the_new_secret_alone(world: &RotationWorld) {
    let fresh = world.with_manager(|manager| issue_token(manager, &world.user_id));
    let new_only = manager_for(jokes::test_support::secrets(&[NEW_SECRET]));
    assert_eq!(
        new_only.current_user_id(Some(&fresh)),
        Some(world.user_id.clone())
    );
}

#[then("the session is rejected")]
fn the_session_is_rejected(world: &RotationWorld) {
    let token = world.token.borrow().clone().expect("token issued");
    let resolved = world.with_manager(|manager| manager.current_user_id(Some(&token)));
    assert!(resolved.is_none());
}

#[then("two secrets are configured with the new one first")]
fn two_secrets_are_configured_with_the_new_one_first(world: &RotationWorld) {
    let settings = world.settings.borrow();
    let settings = settings.as_ref().expect("settings loaded");
    assert_eq!(settings.secrets.len(), 2);
    assert_eq!(settings.secrets.newest().as_bytes(), NEW_SECRET.as_bytes());
    let fingerprints = secrets_fingerprints(&settings.secrets);
    assert_eq!(
        fingerprints.first(),
        Some(&secret_fingerprint(settings.secrets.newest()))
    );
}

#[scenario(
    path = "tests/features/session_rotation.feature",
    name = "A retired secret still verifies existing sessions"
)]
fn a_retired_secret_still_verifies_existing_sessions(world: RotationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_rotation.feature",
    name = "Dropping a secret ends its sessions"
)]
fn dropping_a_secret_ends_its_sessions(world: RotationWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/session_rotation.feature",
    name = "Secrets are read from a file newest first"
)]
fn secrets_are_read_from_a_file_newest_first(world: RotationWorld) {
    drop(world);
}
