use chrono::{DateTime, Utc};
use ebeer_backend::{app, state::AppState};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

const SECRET: &str = "workflow-test-secret";

// Full marketplace flows against a real Postgres instance. Each test skips
// itself when DATABASE_URL is unset so the default test run needs no database.
async fn spawn_app() -> Option<(std::net::SocketAddr, PgPool)> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    std::env::set_var("JWT_SECRET", SECRET);
    let db_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("connect test database");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("run migrations");
    let app = app(AppState::new(db_pool.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    Some((addr, db_pool))
}

async fn send_as(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut request = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    if let Some(token) = token {
        request.push_str(&format!("Authorization: Bearer {token}\r\n"));
    }
    match body {
        Some(body) => {
            request.push_str("Content-Type: application/json\r\n");
            request.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
            request.push_str(body);
        }
        None => request.push_str("Content-Length: 0\r\n\r\n"),
    }
    stream
        .write_all(request.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, body.to_string())
}

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("json body")
}

fn error_message(body: &str) -> String {
    json(body)["error"].as_str().expect("error field").to_string()
}

// Accounts are minted per test so runs never see each other's rows.
async fn register_and_login(addr: std::net::SocketAddr, role: &str) -> String {
    let email = format!("{role}-{}@example.com", Uuid::new_v4());
    let body = format!(
        r#"{{"email": "{email}", "password": "secret123", "full_name": "Test {role}", "role": "{role}", "region": "Ashanti"}}"#
    );
    let (status, _) = send_as(addr, "POST", "/api/auth/register", None, Some(&body)).await;
    assert_eq!(status, 201);

    let body = format!(r#"{{"email": "{email}", "password": "secret123"}}"#);
    let (status, body) = send_as(addr, "POST", "/api/auth/login", None, Some(&body)).await;
    assert_eq!(status, 200);
    json(&body)["access_token"]
        .as_str()
        .expect("access token")
        .to_string()
}

async fn create_listing(addr: std::net::SocketAddr, farmer_token: &str) -> String {
    let (status, body) = send_as(
        addr,
        "POST",
        "/api/products",
        Some(farmer_token),
        Some(r#"{"title": "Cocoa beans", "category": "cash-crops", "qty_kg": 100.0, "min_price": 10.0}"#),
    )
    .await;
    assert_eq!(status, 201);
    json(&body)["id"].as_str().expect("product id").to_string()
}

async fn place_bid(
    addr: std::net::SocketAddr,
    buyer_token: &str,
    product_id: &str,
    price: f64,
) -> (u16, String) {
    let body = format!(r#"{{"product_id": "{product_id}", "price": {price}, "qty_kg": 30.0}}"#);
    send_as(addr, "POST", "/api/bids", Some(buyer_token), Some(&body)).await
}

#[tokio::test]
async fn accepting_a_bid_creates_the_order_and_closes_the_listing() {
    let Some((addr, _pool)) = spawn_app().await else { return };

    let farmer = register_and_login(addr, "farmer").await;
    let first_buyer = register_and_login(addr, "buyer").await;
    let second_buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &farmer).await;

    let (status, body) = place_bid(addr, &first_buyer, &product_id, 12.0).await;
    assert_eq!(status, 201);
    let winning_bid = json(&body)["id"].as_str().expect("bid id").to_string();
    let (status, body) = place_bid(addr, &second_buyer, &product_id, 11.0).await;
    assert_eq!(status, 201);
    let losing_bid = json(&body)["id"].as_str().expect("bid id").to_string();

    let respond_path = format!("/api/bids/{winning_bid}/respond");
    let (status, body) = send_as(
        addr,
        "POST",
        &respond_path,
        Some(&farmer),
        Some(r#"{"action": "accept"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let response = json(&body);
    assert_eq!(response["status"], "accepted");
    let order_id = response["order_id"].as_str().expect("order id").to_string();

    // The listing is closed to further bidding
    let (status, body) = send_as(
        addr,
        "GET",
        &format!("/api/products/{product_id}"),
        None,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["status"], "sold");

    // The sibling bid was swept into rejected
    let (status, body) = send_as(
        addr,
        "GET",
        &format!("/api/products/{product_id}/bids"),
        Some(&farmer),
        None,
    )
    .await;
    assert_eq!(status, 200);
    let bids = json(&body);
    let bids = bids.as_array().expect("bid array");
    assert_eq!(bids.len(), 2);
    for bid in bids {
        if bid["id"] == winning_bid.as_str() {
            assert_eq!(bid["status"], "accepted");
        } else {
            assert_eq!(bid["id"], losing_bid.as_str());
            assert_eq!(bid["status"], "rejected");
        }
    }

    // Exactly one order came out of the acceptance
    let (status, body) = send_as(addr, "GET", "/api/orders", Some(&farmer), None).await;
    assert_eq!(status, 200);
    let orders = json(&body);
    let orders = orders.as_array().expect("order array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], order_id.as_str());
    assert_eq!(orders[0]["bid_id"], winning_bid.as_str());
    assert_eq!(orders[0]["product_id"], product_id.as_str());
    assert_eq!(orders[0]["status"], "ordered");
    assert_eq!(orders[0]["total"], 360.0);

    // The decided bid cannot be responded to again
    let (status, _) = send_as(
        addr,
        "POST",
        &respond_path,
        Some(&farmer),
        Some(r#"{"action": "reject"}"#),
    )
    .await;
    assert_eq!(status, 404);

    // The winning buyer heard about the decision
    let (status, body) = send_as(addr, "GET", "/api/notifications", Some(&first_buyer), None).await;
    assert_eq!(status, 200);
    let feed = json(&body);
    let feed = feed.as_array().expect("feed array");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["type"], "bid");
    assert_eq!(feed[0]["payload"]["status"], "accepted");
    assert_eq!(feed[0]["payload"]["bid_id"], winning_bid.as_str());
}

#[tokio::test]
async fn bids_on_paused_listings_are_refused() {
    let Some((addr, _pool)) = spawn_app().await else { return };

    let farmer = register_and_login(addr, "farmer").await;
    let buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &farmer).await;

    let (status, _) = send_as(
        addr,
        "POST",
        &format!("/api/products/{product_id}/status"),
        Some(&farmer),
        Some(r#"{"status": "paused"}"#),
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = place_bid(addr, &buyer, &product_id, 15.0).await;
    assert_eq!(status, 404);
    assert_eq!(error_message(&body), "Product not found or not active");
}

#[tokio::test]
async fn bids_below_the_minimum_are_refused() {
    let Some((addr, _pool)) = spawn_app().await else { return };

    let farmer = register_and_login(addr, "farmer").await;
    let buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &farmer).await;

    let (status, body) = place_bid(addr, &buyer, &product_id, 9.99).await;
    assert_eq!(status, 400);
    assert_eq!(error_message(&body), "Bid price below minimum");

    // A bid exactly at the floor stands
    let (status, _) = place_bid(addr, &buyer, &product_id, 10.0).await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn only_the_listing_owner_responds_to_bids() {
    let Some((addr, _pool)) = spawn_app().await else { return };

    let owner = register_and_login(addr, "farmer").await;
    let other_farmer = register_and_login(addr, "farmer").await;
    let buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &owner).await;

    let (status, body) = place_bid(addr, &buyer, &product_id, 14.0).await;
    assert_eq!(status, 201);
    let bid_id = json(&body)["id"].as_str().expect("bid id").to_string();

    let respond_path = format!("/api/bids/{bid_id}/respond");
    let (status, body) = send_as(
        addr,
        "POST",
        &respond_path,
        Some(&other_farmer),
        Some(r#"{"action": "accept"}"#),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(error_message(&body), "Not authorized to respond to this bid");

    let (status, _) = send_as(
        addr,
        "POST",
        &respond_path,
        Some(&owner),
        Some(r#"{"action": "accept"}"#),
    )
    .await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn mark_read_only_touches_the_callers_rows() {
    let Some((addr, _pool)) = spawn_app().await else { return };

    let farmer = register_and_login(addr, "farmer").await;
    let buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &farmer).await;

    let (status, _) = place_bid(addr, &buyer, &product_id, 16.0).await;
    assert_eq!(status, 201);

    let (status, body) = send_as(addr, "GET", "/api/notifications", Some(&farmer), None).await;
    assert_eq!(status, 200);
    let feed = json(&body);
    let entry = &feed.as_array().expect("feed array")[0];
    assert_eq!(entry["type"], "bid");
    assert_eq!(entry["read"], false);
    let entry_id = entry["id"].as_str().expect("entry id").to_string();

    // Another user naming the farmer's entry updates nothing
    let mark_body = format!(r#"{{"notification_ids": ["{entry_id}"]}}"#);
    let (status, body) = send_as(
        addr,
        "PUT",
        "/api/notifications/read",
        Some(&buyer),
        Some(&mark_body),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["updated"], 0);

    let (status, body) = send_as(
        addr,
        "PUT",
        "/api/notifications/read",
        Some(&farmer),
        Some(&mark_body),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json(&body)["updated"], 1);

    let (status, body) = send_as(addr, "GET", "/api/notifications", Some(&farmer), None).await;
    assert_eq!(status, 200);
    let feed = json(&body);
    assert_eq!(feed.as_array().expect("feed array")[0]["read"], true);
}

#[tokio::test]
async fn concurrent_delivery_updates_cannot_move_status_backwards() {
    let Some((addr, pool)) = spawn_app().await else { return };

    let farmer = register_and_login(addr, "farmer").await;
    let buyer = register_and_login(addr, "buyer").await;
    let product_id = create_listing(addr, &farmer).await;

    let (status, body) = place_bid(addr, &buyer, &product_id, 12.0).await;
    assert_eq!(status, 201);
    let bid_id = json(&body)["id"].as_str().expect("bid id").to_string();

    let (status, body) = send_as(
        addr,
        "POST",
        &format!("/api/bids/{bid_id}/respond"),
        Some(&farmer),
        Some(r#"{"action": "accept"}"#),
    )
    .await;
    assert_eq!(status, 200);
    let order_id: Uuid = json(&body)["order_id"]
        .as_str()
        .expect("order id")
        .parse()
        .expect("order uuid");

    // Hold the row lock so both requests validate against 'ordered' and
    // queue their writes behind it
    let mut tx = pool.begin().await.expect("begin");
    let held = sqlx::query_scalar::<_, String>("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await
        .expect("lock order row");
    assert_eq!(held, "ordered");

    let status_path = format!("/api/orders/{order_id}/status");
    let deliver = tokio::spawn({
        let token = farmer.clone();
        let path = status_path.clone();
        async move {
            send_as(addr, "POST", &path, Some(&token), Some(r#"{"status": "delivered"}"#)).await
        }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let pick_up = tokio::spawn({
        let token = farmer.clone();
        let path = status_path.clone();
        async move {
            send_as(addr, "POST", &path, Some(&token), Some(r#"{"status": "picked-up"}"#)).await
        }
    });
    tokio::time::sleep(Duration::from_millis(300)).await;
    tx.commit().await.expect("release lock");

    let (deliver_status, _) = deliver.await.expect("join deliver");
    let (pick_up_status, _) = pick_up.await.expect("join pick-up");

    assert!(
        deliver_status == 200 || deliver_status == 409,
        "deliver got {deliver_status}"
    );
    assert!(
        pick_up_status == 200 || pick_up_status == 409,
        "pick-up got {pick_up_status}"
    );
    assert!(deliver_status == 200 || pick_up_status == 200);

    let (final_status, delivered_at): (String, Option<DateTime<Utc>>) =
        sqlx::query_as("SELECT status, delivered_at FROM orders WHERE id = $1")
            .bind(order_id)
            .fetch_one(&pool)
            .await
            .expect("final order row");

    // Whichever write lost the race must not have landed
    if deliver_status == 200 {
        assert_eq!(final_status, "delivered");
        assert!(delivered_at.is_some());
    } else {
        assert_eq!(final_status, "picked-up");
        assert!(delivered_at.is_none());
    }
}
