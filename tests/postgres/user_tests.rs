//! Sign-in upsert tests against `PostgreSQL`.

use crate::postgres::helpers::{TestDatabase, database};
use chrono::{Duration, Utc};
use punchlist::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{ExternalIdentity, UserProfile},
    ports::UserRepository,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_sign_in_keeps_identity(#[from(database)] db: TestDatabase) {
    let users = PostgresUserRepository::new(db.pool());
    let profile =
        UserProfile::new("aad-1", "Ada", "ada@example.com").expect("valid profile");
    let first_at = Utc::now() - Duration::hours(1);
    let later_at = Utc::now();

    let first = users
        .upsert_login(&profile, first_at)
        .await
        .expect("first sign-in should succeed");
    let second = users
        .upsert_login(&profile, later_at)
        .await
        .expect("second sign-in should succeed");

    assert_eq!(first.id(), second.id());
    assert_eq!(first.created_at(), second.created_at());
    assert!(second.last_login_at() > second.created_at());

    let external = ExternalIdentity::new("aad-1").expect("valid identity");
    let found = users
        .find_by_external_id(&external)
        .await
        .expect("lookup should succeed")
        .expect("user should exist");
    assert_eq!(found.id(), first.id());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn distinct_identities_get_distinct_ids(#[from(database)] db: TestDatabase) {
    let users = PostgresUserRepository::new(db.pool());
    let ada = UserProfile::new("aad-1", "Ada", "ada@example.com").expect("valid profile");
    let bob = UserProfile::new("aad-2", "Bob", "bob@example.com").expect("valid profile");

    let first = users
        .upsert_login(&ada, Utc::now())
        .await
        .expect("sign-in should succeed");
    let second = users
        .upsert_login(&bob, Utc::now())
        .await
        .expect("sign-in should succeed");

    assert_ne!(first.id(), second.id());
    assert!(
        users
            .find_by_id(second.id())
            .await
            .expect("lookup should succeed")
            .is_some()
    );
}
