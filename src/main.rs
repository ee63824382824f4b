use std::{process, sync::Arc};

use nagari::{
    application::{
        activity::ActivityLogService,
        auth::AuthService,
        complaints::ComplaintService,
        error::AppError,
        notices::NoticeService,
        notifications::NotificationService,
        reminders::ReminderService,
        reports::ReportService,
        repos::{
            ActivityRepo, ComplaintsRepo, NoticesRepo, NotificationsRepo, RemindersRepo,
            SessionsRepo, UsersRepo,
        },
        storage::PhotoStore,
        users::UserDirectoryService,
    },
    config,
    domain::types::Role,
    infra::{
        db::PostgresRepositories,
        error::InfraError,
        http::{self, state::AppState},
        passwords::Argon2PasswordHasher,
        report::TextReportRenderer,
        storage::PhotoStorage,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
        config::Command::Seed(args) => run_seed(settings, *args).await,
    }
}

async fn init_repositories(
    settings: &config::Settings,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresRepositories::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

fn build_app_state(
    repositories: Arc<PostgresRepositories>,
    settings: &config::Settings,
) -> Result<AppState, AppError> {
    let users_repo: Arc<dyn UsersRepo> = repositories.clone();
    let sessions_repo: Arc<dyn SessionsRepo> = repositories.clone();
    let complaints_repo: Arc<dyn ComplaintsRepo> = repositories.clone();
    let notifications_repo: Arc<dyn NotificationsRepo> = repositories.clone();
    let activity_repo: Arc<dyn ActivityRepo> = repositories.clone();
    let notices_repo: Arc<dyn NoticesRepo> = repositories.clone();
    let reminders_repo: Arc<dyn RemindersRepo> = repositories.clone();

    let photo_store: Arc<dyn PhotoStore> = Arc::new(
        PhotoStorage::new(settings.uploads.directory.clone())
            .map_err(|err| AppError::from(InfraError::Io(err)))?,
    );

    let notifications = NotificationService::new(notifications_repo);
    let activity = ActivityLogService::new(activity_repo);

    let auth = Arc::new(AuthService::new(
        users_repo.clone(),
        sessions_repo,
        Arc::new(Argon2PasswordHasher),
        settings.auth.session_ttl,
    ));
    let complaints = Arc::new(ComplaintService::new(
        complaints_repo.clone(),
        notifications.clone(),
        activity.clone(),
        photo_store,
    ));
    let notices = Arc::new(NoticeService::new(
        notices_repo,
        notifications.clone(),
        activity.clone(),
    ));
    let users = Arc::new(UserDirectoryService::new(
        users_repo.clone(),
        activity.clone(),
        settings.auth.reserved_admin_email.clone(),
    ));
    let reminders = Arc::new(ReminderService::new(reminders_repo));
    let reports = Arc::new(ReportService::new(
        complaints_repo,
        users_repo,
        Arc::new(TextReportRenderer),
    ));

    Ok(AppState {
        auth,
        complaints,
        notifications: Arc::new(notifications),
        activity: Arc::new(activity),
        notices,
        users,
        reminders,
        reports,
        db: repositories,
    })
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_app_state(repositories, &settings)?;
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "nagari::server",
        addr = %settings.server.addr,
        "Listening for connections"
    );

    let graceful_shutdown = settings.server.graceful_shutdown;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal(graceful_shutdown))
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal(grace: std::time::Duration) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(
        target = "nagari::server",
        grace_seconds = grace.as_secs(),
        "Shutdown signal received, draining connections"
    );
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings).await?;
    info!(target = "nagari::migrate", "Migrations applied");
    Ok(())
}

async fn run_seed(settings: config::Settings, args: config::SeedArgs) -> Result<(), AppError> {
    let repositories = init_repositories(&settings).await?;
    let state = build_app_state(repositories, &settings)?;

    let admin = state
        .auth
        .provision_user(
            &args.admin_name,
            &args.admin_email,
            &args.admin_password,
            Role::Admin,
        )
        .await
        .map_err(|err| AppError::unexpected(format!("failed to seed admin account: {err}")))?;
    info!(
        target = "nagari::seed",
        email = %admin.email,
        "Administrator account ready"
    );

    if let (Some(email), Some(password)) = (&args.officer_email, &args.officer_password) {
        let officer = state
            .auth
            .provision_user(&args.officer_name, email, password, Role::MunicipalOfficer)
            .await
            .map_err(|err| {
                AppError::unexpected(format!("failed to seed officer account: {err}"))
            })?;
        info!(
            target = "nagari::seed",
            email = %officer.email,
            "Municipal officer account ready"
        );
    }

    Ok(())
}
