use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use crate::Record;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Feeding,
    Vaccination,
    Medication,
    Cleaning,
    EggCollection,
    #[default]
    Other,
}

/// A logged farm operation on one pen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Operation {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub kind: OperationKind,
    pub pen: String,
    pub bird_count: i64,
    pub mortality: i64,
    pub note: String,
    pub performed_by: Option<String>, // staff _id
    pub date: Option<DateTime<Utc>>,
}

impl Record for Operation {
    const RESOURCE: &'static str = "/operations";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} ({})", self.title, self.kind)
    }
}
