//! API integration tests

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{add_book, delete, get, get_auth_token, post, register_member, spawn_app};

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/api/v1/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_login() {
    let app = spawn_app().await;

    let (status, body) = post(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "username": "admin", "password": "admin-password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["librarian"]["username"], "admin");
    assert!(body["librarian"].get("password_hash").is_none());

    let (status, body) = post(
        &app,
        "/api/v1/auth/login",
        None,
        json!({ "username": "admin", "password": "wrong" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "NotAuthorized");
}

#[tokio::test]
async fn test_me_and_create_librarian() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;

    let (status, body) = get(&app, "/api/v1/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "Head Librarian");

    let librarian = json!({
        "username": "clerk",
        "password": "clerk-password",
        "full_name": "Desk Clerk"
    });
    let (status, _) = post(&app, "/api/v1/librarians", Some(&token), librarian.clone()).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(&app, "/api/v1/librarians", Some(&token), librarian).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate");
}

#[tokio::test]
async fn test_librarian_routes_require_token() {
    let app = spawn_app().await;

    let book = json!({ "title": "Dune", "isbn": "X", "count": 1 });
    let (status, _) = post(&app, "/api/v1/books", None, book.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = post(&app, "/api/v1/books", Some("garbage"), book).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    for uri in [
        "/api/v1/reports/overdue",
        "/api/v1/reports/rentals",
        "/api/v1/auth/me",
        "/api/v1/rentals/1",
    ] {
        let (status, _) = get(&app, uri, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    let (status, _) = delete(&app, "/api/v1/books/isbn/X", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_catalog_add_search_and_delete() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;

    let (status, body) = add_book(
        &app,
        &token,
        json!({
            "title": "Dune",
            "author": "Frank Herbert",
            "year": 1965,
            "genre": "SciFi",
            "isbn": "X",
            "count": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["merged"], false);
    let id = body["book"]["id"].as_i64().unwrap();

    let more = json!({ "title": "Dune", "isbn": " X ", "count": 2 });
    let (status, body) = add_book(&app, &token, more).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["merged"], true);
    assert_eq!(body["book"]["id"].as_i64().unwrap(), id);
    assert_eq!(body["book"]["count"], 5);

    add_book(
        &app,
        &token,
        json!({
            "title": "Foundation",
            "author": "Isaac Asimov",
            "year": 1951,
            "genre": "SciFi",
            "isbn": "Y"
        }),
    )
    .await;

    let (status, body) = add_book(&app, &token, json!({ "title": "No ISBN", "isbn": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (_, body) = get(&app, "/api/v1/books?search=herbert", None).await;
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["isbn"], "X");

    let (_, body) = get(&app, "/api/v1/books", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, body) = get(&app, &format!("/api/v1/books/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Dune");

    let (status, _) = get(&app, "/api/v1/books/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = delete(&app, "/api/v1/books/isbn/X?count=2", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["copies_removed"], 2);
    assert_eq!(body["rows_deleted"], 0);

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["isbn"], "X");
    assert_eq!(body["copies"], 3);

    let (status, body) = delete(&app, "/api/v1/books/year/1960", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rows_deleted"], 1);

    let (_, body) = get(&app, "/api/v1/books/isbn/Y/copies", None).await;
    assert_eq!(body["copies"], 0);
}

#[tokio::test]
async fn test_member_registration_and_lookup() {
    let app = spawn_app().await;
    let card = register_member(&app, "User One").await;

    let (status, body) = get(&app, &format!("/api/v1/members/{card}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["full_name"], "User One");
    assert_eq!(body["valid_until"], "2025-05-01");

    let (status, body) = get(&app, &format!("/api/v1/members/{card}/status"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_overdue"], false);
    assert_eq!(body["card_valid"], true);

    let (status, body) = get(&app, "/api/v1/members/unknown-card", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");

    let (status, _) = post(&app, "/api/v1/members", None, json!({ "full_name": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rent_and_return_scenario() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;
    let card = register_member(&app, "User One").await;
    let dune = json!({ "title": "Dune", "genre": "SciFi", "isbn": "X", "count": 5 });
    add_book(&app, &token, dune).await;

    let (status, body) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "X", "quantity": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["return_date"], "2024-06-01");
    let rental_uri = format!("/api/v1/rentals/{}", body["id"].as_i64().unwrap());

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["copies"], 2);

    let (status, body) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "X", "quantity": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "InsufficientStock");

    let (status, body) = post(
        &app,
        "/api/v1/rentals/return",
        None,
        json!({ "card_number": card, "isbn": "X", "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned"], 2);
    assert_eq!(body["unfulfilled"], 0);
    assert_eq!(body["rentals"][0]["quantity"], 1);

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["copies"], 4);

    let (_, body) = get(&app, &format!("/api/v1/members/{card}/rentals"), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["title"], "Dune");

    // Over-return: one copy outstanding, five requested
    let (status, body) = post(
        &app,
        "/api/v1/rentals/return",
        None,
        json!({ "card_number": card, "isbn": "X", "quantity": 5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned"], 1);
    assert_eq!(body["unfulfilled"], 4);
    assert_eq!(body["rentals"][0]["returned"], true);

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["copies"], 5);

    let (status, body) = post(
        &app,
        "/api/v1/rentals/return",
        None,
        json!({ "card_number": card, "isbn": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoActiveRental");

    // The ledger keeps the closed rental
    let (status, body) = get(&app, &rental_uri, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned"], true);
    assert_eq!(body["quantity"], 0);
    assert_eq!(body["isbn"], "X");

    let (status, body) = get(&app, "/api/v1/rentals/999", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchData");
}

#[tokio::test]
async fn test_rent_and_return_ignore_isbn_whitespace() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;
    let card = register_member(&app, "User One").await;
    add_book(&app, &token, json!({ "title": "Dune", "isbn": "X", "count": 2 })).await;

    let (status, body) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "  X", "quantity": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["isbn"], "X");

    let (status, body) = post(
        &app,
        "/api/v1/rentals/return",
        None,
        json!({ "card_number": card, "isbn": "X  " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["returned"], 2);

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["copies"], 2);
}

#[tokio::test]
async fn test_overdue_blocks_rent_and_shows_in_reports() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;
    let card = register_member(&app, "Late Reader").await;
    let dune = json!({ "title": "Dune", "genre": "SciFi", "isbn": "X", "count": 2 });
    let emma = json!({ "title": "Emma", "genre": "Classic", "isbn": "Y", "count": 2 });
    add_book(&app, &token, dune).await;
    add_book(&app, &token, emma).await;

    // Due date already in the past
    let (status, _) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "X", "due_date": "2024-04-01" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "Y" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "OverdueBlock");

    let (_, body) = get(&app, &format!("/api/v1/members/{card}/status"), None).await;
    assert_eq!(body["has_overdue"], true);

    let (status, body) = get(&app, "/api/v1/reports/overdue", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_quantity"], 1);
    assert_eq!(body["rentals"][0]["card_number"], card.as_str());

    let (_, body) = get(&app, "/api/v1/reports/overdue?as_of=2024-03-01", Some(&token)).await;
    assert_eq!(body["total_quantity"], 0);

    let (status, body) = get(&app, "/api/v1/reports/rentals", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = get(&app, "/api/v1/reports/genres", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["by_rented"][0]["genre"], "SciFi");
    assert_eq!(body["by_rented"][0]["total"], 1);
    assert_eq!(body["by_copies"][0]["genre"], "Classic");
    assert_eq!(body["by_copies"][0]["total"], 2);
}

#[tokio::test]
async fn test_rent_rejects_unknown_card_and_zero_quantity() {
    let app = spawn_app().await;
    let token = get_auth_token(&app).await;
    let card = register_member(&app, "User One").await;
    add_book(&app, &token, json!({ "title": "Dune", "isbn": "X", "count": 2 })).await;

    let (status, _) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": "no-such-card", "isbn": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = post(
        &app,
        "/api/v1/rentals",
        None,
        json!({ "card_number": card, "isbn": "X", "quantity": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");

    let (_, body) = get(&app, "/api/v1/books/isbn/X/copies", None).await;
    assert_eq!(body["copies"], 2);
}
