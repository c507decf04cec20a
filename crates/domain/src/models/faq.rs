use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl Record for Faq {
    const RESOURCE: &'static str = "/faqs";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.question.clone()
    }
}
