use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

/// A service offered by the farm (consultancy, brooding, delivery...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub image: Option<String>,
}

impl Record for Service {
    const RESOURCE: &'static str = "/services";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }
}
