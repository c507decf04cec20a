use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub file: String, // download URL
    pub size: u64,
    pub mime_type: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl Record for Document {
    const RESOURCE: &'static str = "/documents";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
