use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::Record;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmailStatus {
    #[default]
    Draft,
    Sent,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Email {
    #[serde(rename = "_id")]
    pub id: String,
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
    pub template: Option<String>, // template _id
    pub status: EmailStatus,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Record for Email {
    const RESOURCE: &'static str = "/emails";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.subject.clone()
    }
}
