use std::sync::Arc;

use crate::application::activity::ActivityLogService;
use crate::application::auth::AuthService;
use crate::application::complaints::ComplaintService;
use crate::application::notices::NoticeService;
use crate::application::notifications::NotificationService;
use crate::application::reminders::ReminderService;
use crate::application::reports::ReportService;
use crate::application::users::UserDirectoryService;
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub complaints: Arc<ComplaintService>,
    pub notifications: Arc<NotificationService>,
    pub activity: Arc<ActivityLogService>,
    pub notices: Arc<NoticeService>,
    pub users: Arc<UserDirectoryService>,
    pub reminders: Arc<ReminderService>,
    pub reports: Arc<ReportService>,
    pub db: Arc<PostgresRepositories>,
}
