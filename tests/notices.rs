mod support;

use std::sync::Arc;

use nagari::application::activity::ActivityLogService;
use nagari::application::notices::{NoticeDraft, NoticeError, NoticeService};
use nagari::application::notifications::NotificationService;
use nagari::application::repos::{ActivityRepo, NoticesRepo, NotificationsRepo};
use nagari::domain::types::{NoticePriority, Role};
use uuid::Uuid;

use support::{InMemoryActivityRepo, InMemoryNoticesRepo, InMemoryNotificationsRepo, principal};

struct Harness {
    service: NoticeService,
    notifications: Arc<InMemoryNotificationsRepo>,
    activity: Arc<InMemoryActivityRepo>,
}

fn harness() -> Harness {
    let notices = Arc::new(InMemoryNoticesRepo::default());
    let notifications = Arc::new(InMemoryNotificationsRepo::default());
    let activity = Arc::new(InMemoryActivityRepo::default());

    let notices_repo: Arc<dyn NoticesRepo> = notices;
    let notifications_repo: Arc<dyn NotificationsRepo> = notifications.clone();
    let activity_repo: Arc<dyn ActivityRepo> = activity.clone();

    let service = NoticeService::new(
        notices_repo,
        NotificationService::new(notifications_repo),
        ActivityLogService::new(activity_repo),
    );

    Harness {
        service,
        notifications,
        activity,
    }
}

fn draft(title: &str) -> NoticeDraft {
    NoticeDraft {
        title: title.to_string(),
        description: "Water supply will be interrupted on Sunday.".to_string(),
        priority: Some("High".to_string()),
    }
}

#[tokio::test]
async fn publishing_broadcasts_to_citizens_and_logs_activity() {
    let h = harness();
    let admin = principal(Role::Admin);

    let notice = h
        .service
        .publish(&admin, draft("Scheduled water outage"))
        .await
        .expect("publish");

    assert_eq!(notice.priority, NoticePriority::High);
    assert_eq!(notice.created_by, Some(admin.user_id));

    let rows = h.notifications.all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].target_role, Some(Role::Citizen));
    assert!(rows[0].message.contains("Scheduled water outage"));

    let feed = h.activity.all().await;
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].title, "Notice published");
    assert!(feed[0].detail.contains(&admin.full_name));
}

#[tokio::test]
async fn officers_publish_with_their_own_attribution() {
    let h = harness();
    let officer = principal(Role::MunicipalOfficer);

    let notice = h
        .service
        .publish(&officer, draft("Ward 3 road closure"))
        .await
        .expect("officer publish");

    assert_eq!(notice.created_by, Some(officer.user_id));
    assert_eq!(notice.created_by_role, Some(Role::MunicipalOfficer));
    assert_eq!(h.notifications.all().await.len(), 1);
}

#[tokio::test]
async fn editing_does_not_renotify() {
    let h = harness();
    let admin = principal(Role::Admin);
    let notice = h
        .service
        .publish(&admin, draft("Scheduled water outage"))
        .await
        .expect("publish");

    let updated = h
        .service
        .edit(notice.id, draft("Outage postponed"))
        .await
        .expect("edit")
        .expect("notice exists");
    assert_eq!(updated.title, "Outage postponed");

    // Still only the original publication broadcast.
    assert_eq!(h.notifications.all().await.len(), 1);
    let feed = h.activity.all().await;
    assert!(feed.iter().any(|entry| entry.title == "Notice updated"));
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let h = harness();
    let admin = principal(Role::Admin);

    let err = h
        .service
        .publish(&admin, draft("   "))
        .await
        .expect_err("blank title must fail");
    let NoticeError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors[0].field, "title");
    assert!(h.notifications.all().await.is_empty());
}

#[tokio::test]
async fn missing_priority_defaults_to_normal() {
    let h = harness();
    let admin = principal(Role::Admin);
    let mut d = draft("Holiday schedule");
    d.priority = None;

    let notice = h.service.publish(&admin, d).await.expect("publish");
    assert_eq!(notice.priority, NoticePriority::Normal);
}

#[tokio::test]
async fn deleting_an_unknown_notice_is_none() {
    let h = harness();
    let missing = h.service.delete(Uuid::new_v4()).await.expect("delete");
    assert!(missing.is_none());
    assert!(h.activity.all().await.is_empty());
}

#[tokio::test]
async fn deletion_is_logged() {
    let h = harness();
    let admin = principal(Role::Admin);
    let notice = h
        .service
        .publish(&admin, draft("Obsolete notice"))
        .await
        .expect("publish");

    let removed = h
        .service
        .delete(notice.id)
        .await
        .expect("delete")
        .expect("notice existed");
    assert_eq!(removed.id, notice.id);
    assert!(h.service.find(notice.id).await.expect("find").is_none());

    let feed = h.activity.all().await;
    assert!(feed.iter().any(|entry| entry.title == "Notice deleted"));
}
