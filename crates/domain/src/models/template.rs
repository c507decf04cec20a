use std::{collections::HashMap, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::Record;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Email/notification template with `{{ key }}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String, // HTML from the rich text editor
}

impl Template {
    /// Substitute placeholders in subject and body. Unknown keys are left as-is.
    pub fn render(&self, vars: &HashMap<String, String>) -> (String, String) {
        (fill(&self.subject, vars), fill(&self.body, vars))
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for text in [&self.subject, &self.body] {
            for caps in PLACEHOLDER.captures_iter(text) {
                let name = caps[1].to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

fn fill(text: &str, vars: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| match vars.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

impl Record for Template {
    const RESOURCE: &'static str = "/templates";

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        Template {
            name: "Order receipt".into(),
            subject: "Receipt for {{reference}}".into(),
            body: "<p>Hello {{ name }}, you paid {{amount}}. {{ missing }}</p>".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_render_substitutes_known_keys() {
        let vars = HashMap::from([
            ("reference".to_string(), "TX-001".to_string()),
            ("name".to_string(), "Ada".to_string()),
            ("amount".to_string(), "4,500.00".to_string()),
        ]);

        let (subject, body) = template().render(&vars);
        assert_eq!(subject, "Receipt for TX-001");
        assert_eq!(body, "<p>Hello Ada, you paid 4,500.00. {{ missing }}</p>");
    }

    #[test]
    fn test_placeholders_in_order() {
        assert_eq!(
            template().placeholders(),
            vec!["reference", "name", "amount", "missing"]
        );
    }
}
