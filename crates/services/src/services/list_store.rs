//! Generic paginated list + form draft store, one per domain type.
//!
//! A store owns one page of records, the UI selection over that page, a single
//! form draft for create/edit, and a debounced search list. Every mutation is
//! reflected back from the server's response: the API embeds the refreshed
//! page in mutation responses, so the store re-syncs without a second request.

use std::{collections::HashSet, time::Duration};

use domain::{
    Record,
    models::{
        academic_level::AcademicLevel, blog::BlogPost, consumption::Consumption, course::Course,
        customer::Customer, document::Document, email::Email, faq::Faq,
        notification::Notification, operation::Operation, product::Product, service::Service,
        staff::Staff, template::Template, transaction::Transaction,
    },
};
use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};
use utils::{
    pagination,
    response::{ApiResponse, Page},
};

use super::{
    api_client::{
        ApiClient, ApiError, ApiRequest, Attachment, GENERIC_ERROR, MultipartBody, RequestBody,
    },
    config::ClientConfig,
    message::StatusReporter,
    query::ListQuery,
    search::{DEFAULT_DEBOUNCE, SearchDebouncer},
    selection::Selection,
    validation::{FieldCheck, validate},
};

pub const SELECT_AT_LEAST_ONE: &str = "Please select at least one item";

pub type ProductStore = ListStore<Product>;
pub type TransactionStore = ListStore<Transaction>;
pub type CustomerStore = ListStore<Customer>;
pub type StaffStore = ListStore<Staff>;
pub type OperationStore = ListStore<Operation>;
pub type ConsumptionStore = ListStore<Consumption>;
pub type ServiceStore = ListStore<Service>;
pub type NotificationStore = ListStore<Notification>;
pub type TemplateStore = ListStore<Template>;
pub type EmailStore = ListStore<Email>;
pub type BlogStore = ListStore<BlogPost>;
pub type FaqStore = ListStore<Faq>;
pub type AcademicLevelStore = ListStore<AcademicLevel>;
pub type CourseStore = ListStore<Course>;
pub type DocumentStore = ListStore<Document>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("no items selected")]
    NothingSelected,
    #[error("unknown form field: {0}")]
    UnknownField(String),
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("response did not include a list")]
    MissingPage,
    #[error("invalid record in response: {0}")]
    InvalidRecord(String),
}

/// Where the store is in its request lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct ListStore<T: Record> {
    client: ApiClient,
    count: u64,
    page_size: u64,
    results: Vec<T>,
    state: LoadState,
    selection: Selection,
    form: T,
    search: SearchDebouncer<T>,
}

impl<T: Record> ListStore<T> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            count: 0,
            page_size: 0,
            results: Vec::new(),
            state: LoadState::Idle,
            selection: Selection::default(),
            form: T::default(),
            search: SearchDebouncer::new(DEFAULT_DEBOUNCE),
        }
    }

    /// A store whose search debounce follows `config`.
    pub fn from_config(client: ApiClient, config: &ClientConfig) -> Self {
        Self::new(client).with_search_debounce(config.search_debounce())
    }

    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.search.set_delay(delay);
        self
    }

    pub fn search_delay(&self) -> Duration {
        self.search.delay()
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        pagination::total_pages(self.count, self.page_size)
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Replace the current page. Selection flags start cleared.
    pub fn apply_page(&mut self, page: Page<T>) {
        self.count = page.count;
        if page.page_size > 0 {
            self.page_size = page.page_size;
        }
        self.results = page.results;
        self.selection.clear();
    }

    /// Insert a record created elsewhere at the top of the list.
    pub fn prepend(&mut self, record: T) {
        self.results.insert(0, record);
        self.count += 1;
    }

    async fn call(
        &mut self,
        request: ApiRequest,
        reporter: &dyn StatusReporter,
    ) -> Result<ApiResponse, StoreError> {
        self.state = LoadState::Loading;
        match self.client.send(request, reporter).await {
            Ok(response) => {
                self.state = LoadState::Loaded;
                Ok(response)
            }
            Err(e) => {
                self.state = LoadState::Failed(e.user_message());
                Err(e.into())
            }
        }
    }

    /// A successful call whose body could not be used: log the detail, show
    /// the generic error and leave the list as it was.
    fn decode_failed(&mut self, e: StoreError, reporter: &dyn StatusReporter) -> StoreError {
        warn!(resource = T::RESOURCE, error = %e, "could not read api response");
        reporter.set_message(GENERIC_ERROR, false);
        self.state = LoadState::Failed(GENERIC_ERROR.to_string());
        e
    }

    /// Decode the page embedded in `response`. Every record must carry a
    /// distinct non-empty id since selection is keyed on it.
    fn read_page(
        &mut self,
        response: &ApiResponse,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<Page<T>>, StoreError> {
        let page = match response.page::<T>() {
            Ok(page) => page,
            Err(e) => return Err(self.decode_failed(e.into(), reporter)),
        };
        if let Some(page) = &page
            && let Err(e) = check_ids(&page.results)
        {
            return Err(self.decode_failed(e, reporter));
        }
        Ok(page)
    }

    /// Re-sync from a page embedded in `response`, if there is one.
    fn resync(
        &mut self,
        response: &ApiResponse,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        if let Some(page) = self.read_page(response, reporter)? {
            self.apply_page(page);
        }
        Ok(())
    }

    /// Issue `request` and re-sync from whatever page the response embeds.
    pub(crate) async fn send_and_resync(
        &mut self,
        request: ApiRequest,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        let response = self.call(request, reporter).await?;
        self.resync(&response, reporter)
    }

    // ---------------------------------------------------------------------
    // Fetching
    // ---------------------------------------------------------------------

    /// Fetch a page and replace the list with it.
    pub async fn get_list(
        &mut self,
        path: &str,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        let response = self.call(ApiRequest::get(path), reporter).await?;
        match self.read_page(&response, reporter)? {
            Some(page) => {
                debug!(
                    resource = T::RESOURCE,
                    count = page.count,
                    returned = page.results.len(),
                    "list loaded"
                );
                self.apply_page(page);
                Ok(())
            }
            None => Err(self.decode_failed(StoreError::MissingPage, reporter)),
        }
    }

    /// Fetch page `page` of the resource, newest first.
    pub async fn get_page(
        &mut self,
        page: u64,
        page_size: u64,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        let path = ListQuery::for_record::<T>()
            .page(page)
            .page_size(page_size)
            .newest_first()
            .build();
        self.get_list(&path, reporter).await
    }

    /// Fetch one record and seed the form draft with it.
    pub async fn get_one(
        &mut self,
        path: &str,
        reporter: &dyn StatusReporter,
    ) -> Result<T, StoreError> {
        let response = self.call(ApiRequest::get(path), reporter).await?;
        match response.record::<T>() {
            Ok(Some(record)) => {
                self.form = record.clone();
                Ok(record)
            }
            Ok(None) => Err(self.decode_failed(StoreError::MissingPage, reporter)),
            Err(e) => Err(self.decode_failed(e.into(), reporter)),
        }
    }

    // ---------------------------------------------------------------------
    // Search
    // ---------------------------------------------------------------------

    /// Debounced fetch of `path` into the search results.
    pub fn search(&mut self, path: impl Into<String>) {
        self.search.schedule(self.client.clone(), path.into());
    }

    /// Debounced search on the resource. A blank query clears the results at once.
    pub fn search_query(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.search.clear();
            return;
        }
        let path = ListQuery::for_record::<T>().search(query).build();
        self.search(path);
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    pub fn searched_results(&self) -> Vec<T> {
        self.search.results()
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_pending()
    }

    /// Wait for the pending search to land.
    pub async fn search_settled(&mut self) {
        self.search.settled().await;
    }

    // ---------------------------------------------------------------------
    // Form draft
    // ---------------------------------------------------------------------

    pub fn form(&self) -> &T {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut T {
        &mut self.form
    }

    /// Set one field of the draft by its serialized name. The draft is left
    /// untouched when the key is unknown or the value does not fit the field.
    pub fn set_form(&mut self, key: &str, value: impl Serialize) -> Result<(), StoreError> {
        let mut draft = serde_json::to_value(&self.form)?;
        let Value::Object(fields) = &mut draft else {
            return Err(StoreError::UnknownField(key.to_string()));
        };
        if !fields.contains_key(key) {
            return Err(StoreError::UnknownField(key.to_string()));
        }
        fields.insert(key.to_string(), serde_json::to_value(value)?);

        self.form = serde_json::from_value(draft).map_err(|e| StoreError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn reset_form(&mut self) {
        self.form = T::default();
    }

    /// Seed the draft from an existing record for editing.
    pub fn load_form(&mut self, record: &T) {
        self.form = record.clone();
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    async fn mutate(
        &mut self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        let mut request = ApiRequest::new(method, path);
        request.body = body;

        let response = self.call(request, reporter).await?;
        self.resync(&response, reporter)?;

        // The write already went through.
        match response.record::<T>() {
            Ok(record) => Ok(record),
            Err(e) => {
                warn!(
                    resource = T::RESOURCE,
                    error = %e,
                    "ignoring unreadable record in response"
                );
                Ok(None)
            }
        }
    }

    /// POST `body` to `path`. Returns the created record when the response carries it.
    pub async fn create(
        &mut self,
        path: &str,
        body: RequestBody,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        self.mutate(Method::POST, path, Some(body), reporter).await
    }

    /// PATCH `body` to `path`.
    pub async fn update(
        &mut self,
        path: &str,
        body: RequestBody,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        self.mutate(Method::PATCH, path, Some(body), reporter).await
    }

    pub async fn delete_one(
        &mut self,
        path: &str,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        self.mutate(Method::DELETE, path, None, reporter).await?;
        Ok(())
    }

    /// PATCH a batch of ids to `path`. With no ids nothing is sent.
    pub async fn mass_delete(
        &mut self,
        path: &str,
        ids: &[String],
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        if ids.is_empty() {
            reporter.set_message(SELECT_AT_LEAST_ONE, false);
            return Err(StoreError::NothingSelected);
        }

        let body = RequestBody::Json(json!({ "ids": ids }));
        self.mutate(Method::PATCH, path, Some(body), reporter).await?;
        self.selection.clear();
        Ok(())
    }

    /// Mass-delete the checked records through `path`, usually
    /// `<resource>/mass-delete`.
    pub async fn mass_delete_selected(
        &mut self,
        path: &str,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        let ids = self.selected_ids();
        self.mass_delete(path, &ids, reporter).await
    }

    /// Validate, then create or update the draft depending on whether it has an
    /// id. The draft is reset after a successful submission.
    pub async fn submit_form(
        &mut self,
        checks: &[FieldCheck],
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        self.submit(checks, Vec::new(), reporter).await
    }

    /// Same as [`submit_form`](Self::submit_form), sent as multipart with `files`.
    pub async fn submit_form_with_files(
        &mut self,
        checks: &[FieldCheck],
        files: Vec<(String, Attachment)>,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        self.submit(checks, files, reporter).await
    }

    async fn submit(
        &mut self,
        checks: &[FieldCheck],
        files: Vec<(String, Attachment)>,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<T>, StoreError> {
        let report = validate(checks);
        if let Some((_, message)) = report.first_error() {
            reporter.set_message(message, false);
            return Err(StoreError::Validation(message.to_string()));
        }

        let is_new = self.form.is_new();
        let mut fields = serde_json::to_value(&self.form)?;
        if is_new && let Value::Object(map) = &mut fields {
            map.remove("_id");
        }

        let body = if files.is_empty() {
            RequestBody::Json(fields)
        } else {
            let mut body = MultipartBody::from_serialize(&fields)?;
            for (name, file) in files {
                body = body.file(name, file);
            }
            RequestBody::Multipart(body)
        };

        let created = if is_new {
            self.create(T::RESOURCE, body, reporter).await?
        } else {
            let path = self.form.path();
            self.update(&path, body, reporter).await?
        };

        self.reset_form();
        Ok(created)
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    fn ids(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(Record::id)
    }

    pub fn is_checked(&self, index: usize) -> bool {
        self.results
            .get(index)
            .is_some_and(|record| self.selection.is_checked(record.id()))
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.results
            .get(index)
            .is_some_and(|record| self.selection.is_active(record.id()))
    }

    /// True when the list is non-empty and every record is checked.
    pub fn is_all_checked(&self) -> bool {
        self.selection.all_checked(self.ids())
    }

    pub fn selected_items(&self) -> Vec<&T> {
        self.results
            .iter()
            .filter(|record| self.selection.is_checked(record.id()))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected_items()
            .into_iter()
            .map(|record| record.id().to_string())
            .collect()
    }

    /// Flip the checked flag of the record at `index`. Out-of-range indexes are ignored.
    pub fn toggle_checked(&mut self, index: usize) {
        if let Some(record) = self.results.get(index) {
            self.selection.toggle_checked(record.id());
        }
    }

    /// Check every record, or uncheck every record when all are already checked.
    pub fn toggle_all_selected(&mut self) {
        let target = !self.is_all_checked();
        let ids: Vec<&str> = self.results.iter().map(Record::id).collect();
        self.selection.set_checked(ids, target);
    }

    /// Open the action menu of the record at `index`, closing every other.
    pub fn toggle_active(&mut self, index: usize) {
        if let Some(record) = self.results.get(index) {
            self.selection.activate(record.id());
        }
    }

    /// Clear every checked and active flag without refetching.
    pub fn reshuffle(&mut self) {
        self.selection.clear();
    }
}

fn check_ids<T: Record>(records: &[T]) -> Result<(), StoreError> {
    let mut seen = HashSet::new();
    for record in records {
        let id = record.id();
        if id.is_empty() {
            return Err(StoreError::InvalidRecord("record without an id".into()));
        }
        if !seen.insert(id) {
            return Err(StoreError::InvalidRecord(format!("duplicate id {id}")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::services::message::MessageLog;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn store_with(n: usize) -> ProductStore {
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let mut store = ProductStore::new(client);
        store.apply_page(Page {
            count: n as u64,
            page_size: 20,
            results: (0..n)
                .map(|i| product(&format!("p{i}"), &format!("Product {i}")))
                .collect(),
        });
        store
    }

    #[test]
    fn test_new_store_is_idle_with_empty_form() {
        let store = store_with(0);
        assert_eq!(store.state(), &LoadState::Idle);
        assert!(store.form().is_new());
        assert!(!store.is_all_checked());
        assert_eq!(store.total_pages(), 0);
    }

    #[test]
    fn test_toggle_checked_derives_selection() {
        let mut store = store_with(3);
        store.toggle_checked(0);
        store.toggle_checked(2);
        assert!(!store.is_all_checked());
        assert_eq!(store.selected_ids(), vec!["p0", "p2"]);

        store.toggle_checked(1);
        assert!(store.is_all_checked());

        store.toggle_checked(1);
        assert!(!store.is_all_checked());
        store.toggle_checked(42);
        assert_eq!(store.selected_items().len(), 2);
    }

    #[test]
    fn test_toggle_all_from_partial_selection_checks_everything() {
        let mut store = store_with(4);
        store.toggle_checked(1);
        store.toggle_all_selected();
        assert!(store.is_all_checked());
        assert_eq!(store.selected_items().len(), 4);

        store.toggle_all_selected();
        assert!(store.selected_items().is_empty());
    }

    #[test]
    fn test_toggle_active_keeps_one_menu_open() {
        let mut store = store_with(3);
        store.toggle_active(0);
        store.toggle_active(2);
        assert!(!store.is_active(0));
        assert!(store.is_active(2));

        store.reshuffle();
        assert!((0..3).all(|i| !store.is_active(i) && !store.is_checked(i)));
    }

    #[test]
    fn test_apply_page_clears_selection_and_keeps_page_size() {
        let mut store = store_with(3);
        store.toggle_checked(0);
        store.toggle_active(1);

        store.apply_page(Page {
            count: 1,
            page_size: 0,
            results: vec![product("p0", "Product 0")],
        });
        assert!(!store.is_checked(0));
        assert!(!store.is_active(0));
        assert_eq!(store.page_size(), 20);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_set_form_round_trips_numbers() {
        let mut store = store_with(0);
        store.set_form("price", 500).unwrap();
        store.set_form("name", "Day-old chicks").unwrap();
        assert_eq!(store.form().price, 500.0);
        assert_eq!(store.form().name, "Day-old chicks");

        let value = serde_json::to_value(store.form()).unwrap();
        assert_eq!(value["price"], json!(500.0));
    }

    #[test]
    fn test_set_form_rejects_unknown_key_and_bad_type() {
        let mut store = store_with(0);
        store.set_form("name", "Broilers").unwrap();

        assert!(matches!(
            store.set_form("colour", "brown"),
            Err(StoreError::UnknownField(_))
        ));
        assert!(matches!(
            store.set_form("price", "lots"),
            Err(StoreError::InvalidValue { .. })
        ));
        assert_eq!(store.form().name, "Broilers");
        assert_eq!(store.form().price, 0.0);
    }

    #[test]
    fn test_load_and_reset_form() {
        let mut store = store_with(2);
        let record = store.results()[1].clone();
        store.load_form(&record);
        assert_eq!(store.form().id, "p1");

        store.reset_form();
        assert_eq!(store.form(), &Product::default());
    }

    #[test]
    fn test_prepend_bumps_count() {
        let mut store = store_with(2);
        store.prepend(product("new", "Fresh eggs"));
        assert_eq!(store.results()[0].id, "new");
        assert_eq!(store.count(), 3);
    }

    #[tokio::test]
    async fn test_mass_delete_without_selection_sends_nothing() {
        let mut store = store_with(3);
        let log = MessageLog::new();

        let result = store.mass_delete_selected("/products/mass-delete", &log).await;

        assert!(matches!(result, Err(StoreError::NothingSelected)));
        assert_eq!(log.last().unwrap().text, SELECT_AT_LEAST_ONE);
        assert!(!log.last().unwrap().is_success);
        // No request means no loading transition either.
        assert!(log.loading_transitions().is_empty());
        assert_eq!(store.state(), &LoadState::Idle);
    }

    #[tokio::test]
    async fn test_submit_form_blocked_by_validation() {
        let mut store = store_with(0);
        let log = MessageLog::new();
        store.set_form("price", 0).unwrap();

        let checks = [
            FieldCheck::new(
                "name",
                "Product name",
                &store.form().name,
                crate::services::validation::Rules::required(),
            ),
            FieldCheck::new(
                "price",
                "Price",
                store.form().price,
                crate::services::validation::Rules::optional(),
            ),
        ];
        let result = store.submit_form(&checks, &log).await;

        assert!(matches!(result, Err(StoreError::Validation(ref m)) if m == "Product name is required"));
        assert!(log.loading_transitions().is_empty());
    }

    #[test]
    fn test_page_with_duplicate_ids_is_rejected_and_reported() {
        let mut store = store_with(2);
        let log = MessageLog::new();
        let response = ApiResponse::new(json!({
            "count": 2,
            "results": [{ "_id": "dup", "name": "Eggs" }, { "_id": "dup", "name": "Feed" }]
        }));

        let result = store.resync(&response, &log);

        assert!(matches!(result, Err(StoreError::InvalidRecord(ref m)) if m.contains("dup")));
        assert_eq!(log.last().unwrap().text, GENERIC_ERROR);
        assert!(!log.last().unwrap().is_success);
        assert_eq!(store.state().error(), Some(GENERIC_ERROR));
        // The previous page stays in place.
        assert_eq!(store.results()[1].id, "p1");
    }

    #[test]
    fn test_check_ids_rejects_blank_id() {
        let records = [product("a", "Eggs"), product("", "Feed")];
        assert!(matches!(check_ids(&records), Err(StoreError::InvalidRecord(_))));
        assert!(check_ids(&records[..1]).is_ok());
    }

    #[test]
    fn test_from_config_uses_configured_debounce() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let config = ClientConfig {
            search_debounce_ms: 250,
            ..Default::default()
        };

        let store = ProductStore::from_config(client.clone(), &config);
        assert_eq!(store.search_delay(), Duration::from_millis(250));
        assert_eq!(ProductStore::new(client).search_delay(), DEFAULT_DEBOUNCE);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Check(usize),
        All,
        Active(usize),
        Reshuffle,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..12).prop_map(Op::Check),
            Just(Op::All),
            (0usize..12).prop_map(Op::Active),
            Just(Op::Reshuffle),
        ]
    }

    proptest! {
        #[test]
        fn prop_selection_invariants_hold(n in 1usize..10, ops in prop::collection::vec(op(), 0..40)) {
            let mut store = store_with(n);
            for op in ops {
                match op {
                    Op::Check(i) => store.toggle_checked(i),
                    Op::All => store.toggle_all_selected(),
                    Op::Active(i) => store.toggle_active(i),
                    Op::Reshuffle => store.reshuffle(),
                }

                let all = (0..n).all(|i| store.is_checked(i));
                prop_assert_eq!(store.is_all_checked(), all);
                prop_assert!((0..n).filter(|i| store.is_active(*i)).count() <= 1);
                prop_assert_eq!(
                    store.selected_items().len(),
                    (0..n).filter(|i| store.is_checked(*i)).count()
                );
            }
        }

        #[test]
        fn prop_even_toggle_all_restores_uniform_selection(
            n in 1usize..10,
            start_checked in any::<bool>(),
            pairs in 0usize..5,
        ) {
            let mut store = store_with(n);
            if start_checked {
                store.toggle_all_selected();
            }
            let before: Vec<bool> = (0..n).map(|i| store.is_checked(i)).collect();

            for _ in 0..pairs * 2 {
                store.toggle_all_selected();
            }

            let after: Vec<bool> = (0..n).map(|i| store.is_checked(i)).collect();
            prop_assert_eq!(before, after);
        }
    }
}
