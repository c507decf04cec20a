//! Builds list paths with pagination, ordering, date and search parameters.

use chrono::NaiveDate;
use domain::Record;
use url::form_urlencoded;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    path: String,
    page: Option<u64>,
    page_size: Option<u64>,
    ordering: Option<String>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    search: Option<String>,
    extra: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn for_record<T: Record>() -> Self {
        Self::new(T::RESOURCE)
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn page_size(mut self, page_size: u64) -> Self {
        self.page_size = (page_size > 0).then_some(page_size);
        self
    }

    /// Field name, prefixed with `-` for descending (`-createdAt`).
    pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    pub fn newest_first(self) -> Self {
        self.ordering("-createdAt")
    }

    pub fn date_from(mut self, date: Option<NaiveDate>) -> Self {
        self.date_from = date;
        self
    }

    pub fn date_to(mut self, date: Option<NaiveDate>) -> Self {
        self.date_to = date;
        self
    }

    /// Blank queries are dropped.
    pub fn search(mut self, query: &str) -> Self {
        let query = query.trim();
        self.search = (!query.is_empty()).then(|| query.to_string());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn build(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = self.page {
            params.append_pair("page", &page.to_string());
        }
        if let Some(size) = self.page_size {
            params.append_pair("page_size", &size.to_string());
        }
        if let Some(ordering) = &self.ordering {
            params.append_pair("ordering", ordering);
        }
        if let Some(from) = self.date_from {
            params.append_pair("dateFrom", &from.format(DATE_FORMAT).to_string());
        }
        if let Some(to) = self.date_to {
            params.append_pair("dateTo", &to.format(DATE_FORMAT).to_string());
        }
        if let Some(search) = &self.search {
            params.append_pair("search", search);
        }
        for (key, value) in &self.extra {
            params.append_pair(key, value);
        }

        let query = params.finish();
        if query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, query)
        }
    }
}
