use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use decofire_storefront::catalog::CatalogData;
use decofire_storefront::domain::aggregates::{CustomizationOption, Product};
use decofire_storefront::{router, AppState, CatalogStore, CheckoutOptions, Customization, MemoryKeyValueStore};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

const PASSWORD: &str = "atelier-2024";

fn option(value: &str, modifier: i64) -> CustomizationOption {
    CustomizationOption { value: value.into(), price_modifier: Decimal::new(modifier, 0) }
}

fn seed() -> CatalogData {
    CatalogData {
        customizations: vec![Customization {
            id: "engraving".into(),
            name: "Gravure".into(),
            options: vec![option("None", 0), option("Texte personnalisé", 50)],
        }],
        products: vec![Product {
            id: "prod-lampe".into(),
            slug: "lampe-boho".into(),
            name: "Lampe Boho".into(),
            description: "Rotin tressé".into(),
            price: Decimal::new(200, 0),
            image_urls: vec![],
            category_id: "luminaires".into(),
            sub_category_id: Some("suspensions".into()),
            stock_level: 4,
            is_featured: true,
            customization_ids: Some(vec!["engraving".into()]),
        }],
        ..Default::default()
    }
}

fn app() -> Router {
    let state = AppState::new(
        CatalogStore::in_memory(seed()),
        Box::new(MemoryKeyValueStore::new()),
        CheckoutOptions::default(),
        PASSWORD,
    );
    router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, admin: bool) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if admin {
        request = request.header("x-admin-password", PASSWORD);
    }
    let request = match body {
        Some(body) => request.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, value)
}

#[tokio::test]
async fn cart_scenario_over_http() {
    let app = app();

    let (status, cart) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"productId": "prod-lampe"})), false).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["total"].as_f64(), Some(200.0));
    let plain_id = cart["items"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(plain_id, "prod-lampe-engraving:None");

    let custom = json!({"productId": "prod-lampe", "options": {"engraving": "Texte personnalisé"}});
    let (_, cart) = send(&app, Method::POST, "/api/v1/cart/items", Some(custom), false).await;
    assert_eq!(cart["itemCount"], 2);
    assert_eq!(cart["total"].as_f64(), Some(450.0));

    let (status, cart) = send(&app, Method::PUT, "/api/v1/cart/items/prod-lampe-engraving:None", Some(json!({"quantity": 3})), false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["total"].as_f64(), Some(850.0));

    let (_, checkout) = send(&app, Method::GET, "/api/v1/cart/checkout", None, false).await;
    let message = checkout["message"].as_str().unwrap();
    assert!(message.contains("*Lampe Boho* (x3)\nSous-total: 600.00 MAD"));
    assert!(message.contains(" - Gravure: Texte personnalisé"));
    assert!(message.ends_with("*Total: 850.00 MAD*"));
    assert_eq!(checkout["total"].as_f64(), Some(850.0));
    assert!(cart_prices_are_numbers(&app).await);

    let (_, cart) = send(&app, Method::DELETE, "/api/v1/cart", None, false).await;
    assert_eq!(cart["state"], "empty");
    assert_eq!(cart["total"].as_f64(), Some(0.0));
}

async fn cart_prices_are_numbers(app: &Router) -> bool {
    let (_, cart) = send(app, Method::GET, "/api/v1/cart", None, false).await;
    cart["items"].as_array().unwrap().iter().all(|item| item["price"].is_number() && item["product"]["price"].is_number())
}

#[tokio::test]
async fn rejects_bad_cart_input() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"productId": "prod-lampe", "quantity": 0})), false).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, Method::POST, "/api/v1/cart/items", Some(json!({"productId": "nope"})), false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, cart) = send(&app, Method::DELETE, "/api/v1/cart/items/nope", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["itemCount"], 0);
}

#[tokio::test]
async fn storefront_reads() {
    let app = app();
    let (_, products) = send(&app, Method::GET, "/api/v1/products?category=luminaires&subCategory=suspensions", None, false).await;
    assert_eq!(products.as_array().unwrap().len(), 1);
    let (_, products) = send(&app, Method::GET, "/api/v1/products?category=textile", None, false).await;
    assert!(products.as_array().unwrap().is_empty());

    let (status, detail) = send(&app, Method::GET, "/api/v1/products/lampe-boho", None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["customizations"][0]["name"], "Gravure");
    let (status, _) = send(&app, Method::GET, "/api/v1/products/inconnu", None, false).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_requires_password() {
    let app = app();
    let body = json!({"name": "Miroir Soleil", "price": 350, "categoryId": "miroirs"});
    let (status, _) = send(&app, Method::POST, "/api/v1/admin/products", Some(body.clone()), false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, product) = send(&app, Method::POST, "/api/v1/admin/products", Some(body), true).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(product["slug"], "miroir-soleil");

    let (status, _) = send(&app, Method::POST, "/api/v1/admin/products", Some(json!({"name": "", "price": 1, "categoryId": "x"})), true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_login_sets_cookie() {
    let app = app();
    let (status, _) = send(&app, Method::POST, "/api/v1/admin/login", Some(json!({"password": "wrong"})), false).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/admin/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"password": PASSWORD}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    let pair = cookie.split(';').next().unwrap().to_string();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/api/v1/admin/customizations/engraving")
        .header(header::COOKIE, pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (_, detail) = send(&app, Method::GET, "/api/v1/products/lampe-boho", None, false).await;
    assert_eq!(detail["product"]["customizationIds"], json!([]));
}
