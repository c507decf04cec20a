use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

/// Training course offered to farmers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub academic_level: Option<String>, // academic level _id
    pub price: f64,
    pub duration_weeks: i64,
}

impl Record for Course {
    const RESOURCE: &'static str = "/courses";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
