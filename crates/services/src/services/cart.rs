//! Client-side cart and checkout.
//!
//! The cart only collects lines; prices, stock and discounts are settled by the
//! server when the order is posted. A successful checkout fans the created
//! transaction (and any notification the server raised) out into the
//! transactions and notifications stores.

use domain::{
    Record,
    models::{
        notification::Notification,
        product::Product,
        transaction::{PaymentMethod, Transaction, TransactionItem},
    },
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use utils::response::ApiResponse;

use super::{
    api_client::{ApiClient, ApiError, ApiRequest, GENERIC_ERROR, RequestBody},
    list_store::{ListStore, StoreError},
    message::StatusReporter,
};

pub const EMPTY_CART: &str = "Your cart is empty";

#[derive(Debug, Error)]
pub enum CartError {
    #[error("cart is empty")]
    Empty,
    #[error("{0} is out of stock")]
    OutOfStock(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("checkout response did not include the transaction")]
    MissingTransaction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Who is buying and how they pay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutDetails {
    pub customer: Option<String>,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    /// Defaults to the cart subtotal.
    pub amount_paid: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest<'a> {
    customer: Option<&'a str>,
    customer_name: &'a str,
    payment_method: PaymentMethod,
    amount_paid: f64,
    items: Vec<TransactionItem>,
}

#[derive(Debug)]
pub struct Cart {
    client: ApiClient,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |count, line| count.saturating_add(line.quantity))
    }

    /// Display total; the server computes the charged amount.
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::total).sum()
    }

    /// Add `quantity` of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        if !product.in_stock() {
            return Err(CartError::OutOfStock(product.name.clone()));
        }
        if quantity == 0 {
            return Ok(());
        }

        match self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.id())
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id().to_string(),
                name: product.name.clone(),
                unit_price: product.price,
                quantity,
            }),
        }
        Ok(())
    }

    /// Set the quantity of a line; zero removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
        } else if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Post the order. On success the created transaction is prepended to
    /// `transactions`, any returned notification to `notifications`, and the
    /// cart is emptied. On failure the cart is kept for another attempt.
    pub async fn checkout(
        &mut self,
        details: &CheckoutDetails,
        reporter: &dyn StatusReporter,
        transactions: &mut ListStore<Transaction>,
        notifications: &mut ListStore<Notification>,
    ) -> Result<Transaction, CartError> {
        if self.is_empty() {
            reporter.set_message(EMPTY_CART, false);
            return Err(CartError::Empty);
        }

        let order = CheckoutRequest {
            customer: details.customer.as_deref(),
            customer_name: &details.customer_name,
            payment_method: details.payment_method,
            amount_paid: details.amount_paid.unwrap_or_else(|| self.subtotal()),
            items: self
                .lines
                .iter()
                .map(|line| TransactionItem {
                    product: line.product_id.clone(),
                    name: line.name.clone(),
                    quantity: i64::from(line.quantity),
                    price: line.unit_price,
                })
                .collect(),
        };

        let request = ApiRequest::post(Transaction::RESOURCE).body(RequestBody::json(&order)?);
        let response = self.client.send(request, reporter).await?;

        let (transaction, notification) = match read_checkout(&response) {
            Ok(read) => read,
            Err(e) => {
                warn!(error = %e, "could not read checkout response");
                reporter.set_message(GENERIC_ERROR, false);
                return Err(e);
            }
        };

        transactions.prepend(transaction.clone());
        if let Some(notification) = notification {
            notifications.prepend(notification);
        }

        info!(
            transaction_id = %transaction.id,
            items = self.item_count(),
            "checkout complete"
        );
        self.clear();
        Ok(transaction)
    }
}

fn read_checkout(
    response: &ApiResponse,
) -> Result<(Transaction, Option<Notification>), CartError> {
    let transaction = response
        .record::<Transaction>()?
        .ok_or(CartError::MissingTransaction)?;
    let notification = response.field::<Notification>("notification")?;
    Ok((transaction, notification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::message::MessageLog;

    fn product(id: &str, price: f64, stock: i64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            price,
            quantity_in_stock: stock,
            ..Default::default()
        }
    }

    fn cart() -> Cart {
        Cart::new(ApiClient::with_base_url("http://127.0.0.1:9").unwrap())
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = cart();
        let eggs = product("eggs", 4500.0, 10);
        cart.add(&eggs, 2).unwrap();
        cart.add(&eggs, 1).unwrap();
        cart.add(&product("feed", 12000.0, 3), 1).unwrap();

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), 3.0 * 4500.0 + 12000.0);
    }

    #[test]
    fn test_add_caps_quantity_instead_of_wrapping() {
        let mut cart = cart();
        let eggs = product("eggs", 4500.0, 10);
        cart.add(&eggs, 3).unwrap();
        cart.add(&eggs, u32::MAX).unwrap();
        cart.add(&product("feed", 12000.0, 3), u32::MAX).unwrap();

        assert_eq!(cart.lines()[0].quantity, u32::MAX);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_out_of_stock_rejected() {
        let mut cart = cart();
        let err = cart.add(&product("birds", 3000.0, 0), 1).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock(_)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = cart();
        cart.add(&product("eggs", 4500.0, 10), 2).unwrap();
        cart.set_quantity("eggs", 5);
        assert_eq!(cart.item_count(), 5);
        cart.set_quantity("eggs", 0);
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_empty_checkout_sends_nothing() {
        let client = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let mut cart = Cart::new(client.clone());
        let mut transactions = ListStore::<Transaction>::new(client.clone());
        let mut notifications = ListStore::<Notification>::new(client);
        let log = MessageLog::new();

        let result = cart
            .checkout(
                &CheckoutDetails::default(),
                &log,
                &mut transactions,
                &mut notifications,
            )
            .await;

        assert!(matches!(result, Err(CartError::Empty)));
        assert_eq!(log.last().unwrap().text, EMPTY_CART);
        assert!(log.loading_transitions().is_empty());
    }
}
