//! Transaction ledger operations beyond generic CRUD.

use chrono::NaiveDate;
use domain::{Record, models::transaction::Transaction};
use serde_json::json;

use super::{
    api_client::RequestBody,
    list_store::{ListStore, StoreError},
    message::StatusReporter,
    query::ListQuery,
};

impl ListStore<Transaction> {
    /// Record a part payment of `amount` against transaction `id`.
    pub async fn part_payment(
        &mut self,
        id: &str,
        amount: f64,
        reporter: &dyn StatusReporter,
    ) -> Result<Option<Transaction>, StoreError> {
        if amount.is_nan() || amount <= 0.0 {
            let message = "Enter an amount greater than zero";
            reporter.set_message(message, false);
            return Err(StoreError::Validation(message.to_string()));
        }

        let path = format!("{}/part-payment/{}", Transaction::RESOURCE, id);
        self.update(&path, RequestBody::Json(json!({ "amountPaid": amount })), reporter)
            .await
    }

    /// List transactions created between `from` and `to`, newest first.
    pub async fn list_between(
        &mut self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        page: u64,
        reporter: &dyn StatusReporter,
    ) -> Result<(), StoreError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            let message = "Start date must not be after end date";
            reporter.set_message(message, false);
            return Err(StoreError::Validation(message.to_string()));
        }

        let path = ListQuery::for_record::<Transaction>()
            .page(page)
            .page_size(self.page_size())
            .newest_first()
            .date_from(from)
            .date_to(to)
            .build();
        self.get_list(&path, reporter).await
    }

    /// Sum still owed across the loaded page.
    pub fn outstanding_total(&self) -> f64 {
        self.results().iter().map(Transaction::outstanding).sum()
    }
}
