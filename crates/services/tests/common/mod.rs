//! In-process stand-in for the dashboard API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use services::services::api_client::ApiClient;
use tokio::net::TcpListener;

pub const PAGE_SIZE: u64 = 20;

#[derive(Debug, Default)]
pub struct MockState {
    pub products: Vec<Value>,
    pub transactions: Vec<Value>,
    pub hits: HashMap<String, usize>,
    pub queries: Vec<HashMap<String, String>>,
    pub last_authorization: Option<String>,
    pub next_id: u64,
    /// Bodies served verbatim with 200 under `/canned/{name}`.
    pub canned: HashMap<String, Value>,
}

impl MockState {
    fn hit(&mut self, route: &str, headers: &HeaderMap) {
        *self.hits.entry(route.to_string()).or_default() += 1;
        self.last_authorization = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn product_page(&self) -> Value {
        json!({
            "count": self.products.len(),
            "page_size": PAGE_SIZE,
            "results": self.products,
        })
    }

    fn transaction_page(&self) -> Value {
        json!({
            "count": self.transactions.len(),
            "page_size": PAGE_SIZE,
            "results": self.transactions,
        })
    }
}

pub type Shared = Arc<Mutex<MockState>>;

pub struct MockApi {
    pub state: Shared,
    pub addr: SocketAddr,
}

impl MockApi {
    pub async fn start() -> Self {
        Self::start_with(MockState::default()).await
    }

    pub async fn start_with(state: MockState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = router().with_state(Arc::clone(&state));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { state, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::with_base_url(&self.base_url()).unwrap()
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    pub fn last_query(&self) -> Option<HashMap<String, String>> {
        self.state.lock().unwrap().queries.last().cloned()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().unwrap().last_authorization.clone()
    }
}

pub fn product(id: &str, name: &str, price: f64, stock: i64) -> Value {
    json!({
        "_id": id,
        "name": name,
        "category": "eggs",
        "price": price,
        "quantityInStock": stock,
        "unit": "crate",
        "published": true,
    })
}

fn router() -> Router<Shared> {
    Router::new().nest(
        "/api",
        Router::new()
            .route("/auth/login", post(login))
            .route("/auth/logout", post(logout))
            .route("/products", get(list_products).post(create_product))
            .route("/products/mass-delete", patch(mass_delete_products))
            .route(
                "/products/{id}",
                get(get_product).patch(update_product).delete(delete_product),
            )
            .route("/customers", get(list_customers))
            .route(
                "/transactions",
                get(list_transactions).post(create_transaction),
            )
            .route("/transactions/part-payment/{id}", patch(part_payment))
            .route("/canned/{name}", get(canned).patch(canned)),
    )
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{what} not found") })),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    state.lock().unwrap().hit("login", &headers);
    if body["password"] != "secret" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response();
    }
    Json(json!({
        "message": "Welcome back",
        "token": "tok-abc",
        "user": {
            "_id": "u1",
            "name": "Ada Obi",
            "email": body["email"],
            "role": "manager",
        },
    }))
    .into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Json<Value> {
    state.lock().unwrap().hit("logout", &headers);
    Json(json!({ "message": "Signed out" }))
}

async fn list_products(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.hit("list_products", &headers);
    state.queries.push(query.clone());

    match query.get("search") {
        Some(term) => {
            let term = term.to_lowercase();
            let results: Vec<Value> = state
                .products
                .iter()
                .filter(|p| {
                    p["name"]
                        .as_str()
                        .is_some_and(|name| name.to_lowercase().contains(&term))
                })
                .cloned()
                .collect();
            Json(json!({ "count": results.len(), "page_size": PAGE_SIZE, "results": results }))
        }
        None => Json(state.product_page()),
    }
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("create_product", &headers);
    if body.get("_id").is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "New products must not carry an id" })),
        )
            .into_response();
    }
    body["_id"] = json!(state.next_id("p"));
    state.products.insert(0, body.clone());
    Json(json!({
        "message": "Product created",
        "record": body,
        "result": state.product_page(),
    }))
    .into_response()
}

async fn get_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("get_product", &headers);
    match state.products.iter().find(|p| p["_id"] == id.as_str()) {
        Some(product) => Json(json!({ "record": product })).into_response(),
        None => not_found("Product"),
    }
}

async fn update_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("update_product", &headers);
    let Some(product) = state.products.iter_mut().find(|p| p["_id"] == id.as_str()) else {
        return not_found("Product");
    };
    if let (Value::Object(target), Value::Object(changes)) = (product, body) {
        target.extend(changes);
    }
    let record = state
        .products
        .iter()
        .find(|p| p["_id"] == id.as_str())
        .cloned();
    Json(json!({
        "message": "Product updated",
        "record": record,
        "result": state.product_page(),
    }))
    .into_response()
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("delete_product", &headers);
    let before = state.products.len();
    state.products.retain(|p| p["_id"] != id.as_str());
    if state.products.len() == before {
        return not_found("Product");
    }
    Json(json!({ "message": "Product deleted", "result": state.product_page() })).into_response()
}

async fn mass_delete_products(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.hit("mass_delete_products", &headers);
    let ids: Vec<String> = serde_json::from_value(body["ids"].clone()).unwrap_or_default();
    state
        .products
        .retain(|p| !ids.iter().any(|id| p["_id"] == id.as_str()));
    Json(json!({
        "message": format!("{} products deleted", ids.len()),
        "result": state.product_page(),
    }))
}

async fn list_customers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    state.lock().unwrap().hit("list_customers", &headers);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Database unavailable" })),
    )
        .into_response()
}

async fn list_transactions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.hit("list_transactions", &headers);
    state.queries.push(query);
    Json(json!({ "result": state.transaction_page() }))
}

async fn create_transaction(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.hit("create_transaction", &headers);

    let total: f64 = body["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|i| i["price"].as_f64().unwrap_or(0.0) * i["quantity"].as_f64().unwrap_or(0.0))
                .sum()
        })
        .unwrap_or(0.0);
    let id = state.next_id("t");
    let transaction = json!({
        "_id": id,
        "reference": format!("TRX-{id}"),
        "customerName": body["customerName"],
        "items": body["items"],
        "totalAmount": total,
        "amountPaid": body["amountPaid"],
        "status": if body["amountPaid"].as_f64() == Some(total) { "paid" } else { "part_payment" },
        "paymentMethod": body["paymentMethod"],
    });
    state.transactions.insert(0, transaction.clone());
    let notification_id = state.next_id("n");

    Json(json!({
        "message": "Order placed",
        "record": transaction,
        "notification": {
            "_id": notification_id,
            "title": "New order",
            "message": format!("Order TRX-{id} was placed"),
            "read": false,
        },
    }))
}

async fn part_payment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit("part_payment", &headers);
    let amount = body["amountPaid"].as_f64().unwrap_or(0.0);
    let Some(transaction) = state
        .transactions
        .iter_mut()
        .find(|t| t["_id"] == id.as_str())
    else {
        return not_found("Transaction");
    };
    let paid = transaction["amountPaid"].as_f64().unwrap_or(0.0) + amount;
    let total = transaction["totalAmount"].as_f64().unwrap_or(0.0);
    transaction["amountPaid"] = json!(paid);
    transaction["status"] = json!(if paid >= total { "paid" } else { "part_payment" });
    let record = transaction.clone();

    Json(json!({
        "message": "Payment recorded",
        "record": record,
        "result": state.transaction_page(),
    }))
    .into_response()
}

async fn canned(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.hit(&format!("canned/{name}"), &headers);
    match state.canned.get(&name) {
        Some(body) => Json(body.clone()).into_response(),
        None => not_found("Canned response"),
    }
}
