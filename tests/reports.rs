mod support;

use std::sync::Arc;

use nagari::application::repos::{
    ComplaintsRepo, CreateComplaintParams, CreateUserParams, UpdateComplaintStatusParams, UsersRepo,
};
use nagari::application::reports::{ReportRenderer, ReportService};
use nagari::domain::types::{ComplaintPriority, ComplaintStatus, Role};
use nagari::infra::report::TextReportRenderer;
use time::OffsetDateTime;
use uuid::Uuid;

use support::{InMemoryComplaintsRepo, InMemoryUsersRepo};

struct Harness {
    service: ReportService,
    complaints: Arc<InMemoryComplaintsRepo>,
    users: Arc<InMemoryUsersRepo>,
}

fn harness() -> Harness {
    let complaints = Arc::new(InMemoryComplaintsRepo::default());
    let users = Arc::new(InMemoryUsersRepo::default());

    let complaints_repo: Arc<dyn ComplaintsRepo> = complaints.clone();
    let users_repo: Arc<dyn UsersRepo> = users.clone();
    let renderer: Arc<dyn ReportRenderer> = Arc::new(TextReportRenderer);

    Harness {
        service: ReportService::new(complaints_repo, users_repo, renderer),
        complaints,
        users,
    }
}

async fn seed_complaint(repo: &InMemoryComplaintsRepo, category: &str) -> Uuid {
    let id = Uuid::new_v4();
    repo.create_complaint(
        CreateComplaintParams {
            id,
            category: category.to_string(),
            title: "Example".to_string(),
            description: "Example description".to_string(),
            priority: ComplaintPriority::Low,
            ward: 1,
            address: "Somewhere".to_string(),
            citizen_id: Some(Uuid::new_v4()),
            created_at: OffsetDateTime::now_utc(),
        },
        Vec::new(),
    )
    .await
    .expect("seed complaint");
    id
}

async fn seed_user(repo: &InMemoryUsersRepo, email: &str) {
    repo.create_user(CreateUserParams {
        id: Uuid::new_v4(),
        full_name: "Seed User".to_string(),
        email: email.to_string(),
        role: Role::Citizen,
        address: None,
        is_active: true,
        password_hash: "hash".to_string(),
        created_at: OffsetDateTime::now_utc(),
    })
    .await
    .expect("seed user");
}

#[tokio::test]
async fn overview_totals_follow_the_data() {
    let h = harness();
    seed_complaint(&h.complaints, "Water Supply").await;
    let resolved = seed_complaint(&h.complaints, "Water Supply").await;
    seed_user(&h.users, "a@example.test").await;
    seed_user(&h.users, "b@example.test").await;

    let now = OffsetDateTime::now_utc();
    h.complaints
        .update_complaint_status(UpdateComplaintStatusParams {
            id: resolved,
            status: ComplaintStatus::Resolved,
            resolved_at: Some(now),
            updated_at: now,
            expected_revision: None,
        })
        .await
        .expect("resolve one");

    let overview = h.service.overview(30).await.expect("overview");
    assert_eq!(overview.window_days, 30);
    assert_eq!(overview.totals.complaints, 2);
    assert_eq!(overview.totals.pending, 1);
    assert_eq!(overview.totals.resolved, 1);
    assert_eq!(overview.totals.users, 2);

    // Every day in the window appears, today included.
    assert_eq!(overview.trend.len(), 30);
    let submitted_today: u64 = overview.trend.iter().map(|p| p.count).sum();
    assert_eq!(submitted_today, 2);

    assert_eq!(overview.categories.len(), 1);
    assert_eq!(overview.categories[0].category, "Water Supply");
    assert_eq!(overview.categories[0].count, 2);
    assert_eq!(overview.top_categories, overview.categories);
}

#[tokio::test]
async fn wide_category_spreads_keep_the_full_distribution() {
    let h = harness();
    for i in 0..8 {
        // seeded counts: 8, 7, ..., 1 so ordering is unambiguous
        for _ in 0..(8 - i) {
            seed_complaint(&h.complaints, &format!("Category {i}")).await;
        }
    }

    let overview = h.service.overview(30).await.expect("overview");

    // Nothing is folded away; every category stays addressable.
    assert_eq!(overview.categories.len(), 8);
    let counts: Vec<u64> = overview.categories.iter().map(|c| c.count).collect();
    assert_eq!(counts, vec![8, 7, 6, 5, 4, 3, 2, 1]);

    // The chart slice is exactly the head of the same list.
    assert_eq!(overview.top_categories.len(), 6);
    assert_eq!(overview.top_categories[..], overview.categories[..6]);
}

#[tokio::test]
async fn non_positive_window_falls_back_to_thirty_days() {
    let h = harness();
    let overview = h.service.overview(0).await.expect("overview");
    assert_eq!(overview.window_days, 30);
    assert_eq!(overview.trend.len(), 30);
}

#[tokio::test]
async fn export_renders_a_named_text_document() {
    let h = harness();
    seed_complaint(&h.complaints, "Street Lighting").await;

    let rendered = h.service.export(7).await.expect("export");
    assert_eq!(rendered.content_type, "text/plain; charset=utf-8");
    assert!(rendered.file_name.starts_with("system-report-"));
    assert!(rendered.file_name.ends_with(".txt"));

    let body = String::from_utf8(rendered.bytes).expect("utf-8 body");
    assert!(body.contains("Street Lighting"));
}
