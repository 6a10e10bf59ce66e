//! HTTP API handlers for menon-admin

pub mod health;
pub mod offers;
pub mod preferences;
pub mod products;

pub use health::health_routes;
pub use offers::offer_routes;
pub use preferences::preference_routes;
pub use products::product_routes;

use serde::Serialize;

/// Transient notification shown by a UI after a mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

/// Body of every successful create/update/delete
#[derive(Debug, Clone, Default, Serialize)]
pub struct MutationResponse {
    pub notices: Vec<Notice>,
}

impl MutationResponse {
    pub fn with(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
