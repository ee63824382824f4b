//! Shared domain enumerations aligned with persisted database enums.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Admin,
    MunicipalOfficer,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Citizen => "Citizen",
            Role::Admin => "Admin",
            Role::MunicipalOfficer => "MunicipalOfficer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_status", rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
}

impl ComplaintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintStatus::Pending => "Pending",
            ComplaintStatus::InProgress => "In Progress",
            ComplaintStatus::Resolved => "Resolved",
        }
    }
}

impl TryFrom<&str> for ComplaintStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Pending" => Ok(ComplaintStatus::Pending),
            "In Progress" => Ok(ComplaintStatus::InProgress),
            "Resolved" => Ok(ComplaintStatus::Resolved),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "complaint_priority", rename_all = "snake_case")]
pub enum ComplaintPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ComplaintPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            ComplaintPriority::Low => "Low",
            ComplaintPriority::Medium => "Medium",
            ComplaintPriority::High => "High",
            ComplaintPriority::Critical => "Critical",
        }
    }
}

impl TryFrom<&str> for ComplaintPriority {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Low" => Ok(ComplaintPriority::Low),
            // the submission form historically used both labels
            "Medium" | "Normal" => Ok(ComplaintPriority::Medium),
            "High" => Ok(ComplaintPriority::High),
            "Critical" => Ok(ComplaintPriority::Critical),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notice_priority", rename_all = "snake_case")]
pub enum NoticePriority {
    Low,
    Normal,
    High,
}

impl NoticePriority {
    pub fn as_str(self) -> &'static str {
        match self {
            NoticePriority::Low => "Low",
            NoticePriority::Normal => "Normal",
            NoticePriority::High => "High",
        }
    }
}

impl TryFrom<&str> for NoticePriority {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "Low" => Ok(NoticePriority::Low),
            "Normal" => Ok(NoticePriority::Normal),
            "High" => Ok(NoticePriority::High),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "notification_kind", rename_all = "snake_case")]
pub enum NotificationKind {
    ComplaintUpdate,
    Notice,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "activity_kind", rename_all = "snake_case")]
pub enum ActivityKind {
    User,
    Notice,
    Complaint,
}
