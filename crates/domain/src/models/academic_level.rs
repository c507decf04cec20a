use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicLevel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Record for AcademicLevel {
    const RESOURCE: &'static str = "/academic-levels";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
