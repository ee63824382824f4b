mod support;

use std::sync::Arc;
use std::time::Duration;

use nagari::application::activity::ActivityLogService;
use nagari::application::auth::{AuthService, Principal, RegisterCitizen};
use nagari::application::repos::{ActivityRepo, SessionsRepo, UsersRepo};
use nagari::application::users::{UserAdminError, UserDirectoryService};
use nagari::domain::entities::UserRecord;
use nagari::domain::types::Role;

use support::{InMemoryActivityRepo, InMemorySessionsRepo, InMemoryUsersRepo, PlainHasher};

const RESERVED_ADMIN: &str = "admin@city.test";

struct Harness {
    auth: AuthService,
    directory: UserDirectoryService,
    activity: Arc<InMemoryActivityRepo>,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUsersRepo::default());
    let sessions = Arc::new(InMemorySessionsRepo::default());
    let activity = Arc::new(InMemoryActivityRepo::default());

    let users_repo: Arc<dyn UsersRepo> = users;
    let sessions_repo: Arc<dyn SessionsRepo> = sessions;
    let activity_repo: Arc<dyn ActivityRepo> = activity.clone();

    let auth = AuthService::new(
        users_repo.clone(),
        sessions_repo,
        Arc::new(PlainHasher),
        Duration::from_secs(3600),
    );
    let directory = UserDirectoryService::new(
        users_repo,
        ActivityLogService::new(activity_repo),
        RESERVED_ADMIN.to_string(),
    );

    Harness {
        auth,
        directory,
        activity,
    }
}

fn as_principal(user: &UserRecord) -> Principal {
    Principal {
        user_id: user.id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        role: user.role,
    }
}

async fn seeded_admin(h: &Harness, email: &str) -> UserRecord {
    h.auth
        .provision_user("City Admin", email, "a-strong-passphrase", Role::Admin)
        .await
        .expect("provision admin")
}

async fn seeded_citizen(h: &Harness, email: &str) -> UserRecord {
    h.auth
        .register_citizen(RegisterCitizen {
            full_name: "Ravi Kumar".to_string(),
            email: email.to_string(),
            password: "citizen-password".to_string(),
            address: None,
        })
        .await
        .expect("register citizen")
}

#[tokio::test]
async fn deactivation_is_logged_and_reversible() {
    let h = harness();
    let admin = seeded_admin(&h, "ops@city.test").await;
    let citizen = seeded_citizen(&h, "ravi@example.test").await;

    let deactivated = h
        .directory
        .set_active(&as_principal(&admin), citizen.id, false)
        .await
        .expect("deactivate");
    assert!(!deactivated.is_active);

    let reactivated = h
        .directory
        .set_active(&as_principal(&admin), citizen.id, true)
        .await
        .expect("reactivate");
    assert!(reactivated.is_active);

    let feed = h.activity.all().await;
    assert!(feed.iter().any(|entry| entry.title == "User account deactivated"));
    assert!(feed.iter().any(|entry| entry.title == "User account activated"));
}

#[tokio::test]
async fn admins_cannot_deactivate_themselves() {
    let h = harness();
    let admin = seeded_admin(&h, "ops@city.test").await;

    let err = h
        .directory
        .set_active(&as_principal(&admin), admin.id, false)
        .await
        .expect_err("self-deactivation must fail");
    assert!(matches!(err, UserAdminError::SelfDeactivation));
}

#[tokio::test]
async fn the_reserved_admin_cannot_be_deactivated() {
    let h = harness();
    let reserved = seeded_admin(&h, RESERVED_ADMIN).await;
    let other = seeded_admin(&h, "ops@city.test").await;

    let err = h
        .directory
        .set_active(&as_principal(&other), reserved.id, false)
        .await
        .expect_err("reserved admin must stay active");
    assert!(matches!(err, UserAdminError::ReservedAdmin));

    // Reactivation of the reserved account is never blocked.
    let user = h
        .directory
        .set_active(&as_principal(&other), reserved.id, true)
        .await
        .expect("activate reserved admin");
    assert!(user.is_active);
}

#[tokio::test]
async fn profile_updates_trim_and_validate() {
    let h = harness();
    let citizen = seeded_citizen(&h, "ravi@example.test").await;
    let me = as_principal(&citizen);

    let updated = h
        .directory
        .update_profile(&me, "  Ravi K.  ".to_string(), Some("  ".to_string()))
        .await
        .expect("update profile");
    assert_eq!(updated.full_name, "Ravi K.");
    assert!(updated.address.is_none());

    let err = h
        .directory
        .update_profile(&me, "   ".to_string(), None)
        .await
        .expect_err("blank name must fail");
    assert!(matches!(err, UserAdminError::Validation(_)));
}

#[tokio::test]
async fn directory_lists_every_account() {
    let h = harness();
    seeded_admin(&h, "ops@city.test").await;
    seeded_citizen(&h, "ravi@example.test").await;
    seeded_citizen(&h, "asha@example.test").await;

    let users = h.directory.list().await.expect("list users");
    assert_eq!(users.len(), 3);
}
