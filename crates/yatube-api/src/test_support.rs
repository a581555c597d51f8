//! Test doubles shared by unit tests and the integration suite.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use uuid::Uuid;
use yatube_common::models::{Group, User};
use yatube_common::snowflake;
use yatube_db::{repository, Database};

use crate::AppState;

/// Secret used to sign tokens in tests.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// A clock that only moves when told to.
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
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
                .single()
                .expect("valid fixture timestamp"),
        )
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

/// An in-memory store, a controllable clock, and application state over both.
pub struct TestApp {
    pub db: Database,
    pub clock: Arc<MutableClock>,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = Database::in_memory().await.expect("in-memory store");
        let clock = Arc::new(MutableClock::default());
        let state = AppState::new(
            db.clone(),
            clock.clone(),
            TEST_JWT_SECRET.to_string(),
            std::time::Duration::from_secs(20),
        );
        Self { db, clock, state }
    }

    pub async fn user(&self, username: &str) -> User {
        repository::users::create_user(
            &self.db.pool,
            snowflake::generate_id(),
            username,
            self.clock.utc(),
        )
        .await
        .expect("create user")
    }

    pub async fn group(&self, slug: &str) -> Group {
        repository::groups::create_group(
            &self.db.pool,
            snowflake::generate_id(),
            "Тестовая группа",
            slug,
            "Тестовое описание",
        )
        .await
        .expect("create group")
    }

    /// A bearer token for `user`.
    pub fn token(&self, user: &User) -> String {
        crate::auth::generate_access_token(user.id, &user.username, TEST_JWT_SECRET, 3600)
            .expect("sign token")
    }

    /// Publish a post as `author`, one second after the previous clock reading.
    pub async fn post(&self, author: Uuid, group: Option<Uuid>, text: &str) -> Uuid {
        self.clock.advance_seconds(1);
        self.state
            .authoring
            .create_post(
                author,
                yatube_common::models::CreatePostRequest {
                    text: text.to_string(),
                    group,
                    image: None,
                },
            )
            .await
            .expect("create post")
            .id
    }
}
