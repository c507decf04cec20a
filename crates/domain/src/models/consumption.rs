use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

/// Feed, drugs or supplies consumed by the farm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Consumption {
    #[serde(rename = "_id")]
    pub id: String,
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub cost: f64,
    pub note: String,
    pub date: Option<DateTime<Utc>>,
}

impl Record for Consumption {
    const RESOURCE: &'static str = "/consumptions";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} {} {}", self.quantity, self.unit, self.item)
    }
}
