mod common;

use common::{legit_job, spawn_app};
use rocket::http::{Header, Status};
use serde_json::json;

#[rocket::async_test]
async fn test_health_reports_ok() {
    let app = spawn_app().await;
    let (status, body) = app.get("/health", None).await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["type"], "data");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["ai_enabled"], false);
    assert_eq!(body["data"]["translation_enabled"], false);
}

#[rocket::async_test]
async fn test_register_login_and_me() {
    let app = spawn_app().await;
    let (token, user_id) = app.register("Seeker@Example.com", "job_seeker").await;

    let (status, body) = app.get("/auth/me", Some(&token)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["id"], user_id.as_str());
    assert_eq!(body["data"]["email"], "seeker@example.com");
    assert!(body["data"].get("password_hash").is_none());

    let login_token = app.login("seeker@example.com").await;
    assert!(!login_token.is_empty());
}

#[rocket::async_test]
async fn test_duplicate_registration_conflicts() {
    let app = spawn_app().await;
    app.register("dup@example.com", "job_seeker").await;

    let (status, body) = app
        .post(
            "/auth/register",
            json!({
                "email": "dup@example.com",
                "password": common::PASSWORD,
                "full_name": "Again",
            }),
            None,
        )
        .await;
    assert_eq!(status, Status::Conflict);
    assert_eq!(body["error_code"], "CONFLICT");
    assert_eq!(body["success"], false);
}

#[rocket::async_test]
async fn test_admin_self_registration_is_rejected() {
    let app = spawn_app().await;
    let (status, body) = app
        .post(
            "/auth/register",
            json!({
                "email": "boss@example.com",
                "password": common::PASSWORD,
                "full_name": "Boss",
                "role": "admin",
            }),
            None,
        )
        .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[rocket::async_test]
async fn test_wrong_password_is_unauthorized() {
    let app = spawn_app().await;
    app.register("ada@example.com", "job_seeker").await;

    let (status, body) = app
        .post(
            "/auth/login",
            json!({ "email": "ada@example.com", "password": "not-the-password" }),
            None,
        )
        .await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error"], "Invalid email or password");
}

#[rocket::async_test]
async fn test_missing_and_invalid_tokens_use_error_envelope() {
    let app = spawn_app().await;

    let (status, body) = app.get("/auth/me", None).await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["type"], "error");
    assert_eq!(body["error"], "Authorization token required");

    let (status, body) = app.get("/auth/me", Some("not-a-jwt")).await;
    assert_eq!(status, Status::Unauthorized);
    assert_eq!(body["error"], "Invalid or expired authorization token");
}

#[rocket::async_test]
async fn test_unknown_route_returns_not_found_envelope() {
    let app = spawn_app().await;
    let (status, body) = app.get("/nope", None).await;
    assert_eq!(status, Status::NotFound);
    assert_eq!(body["error_code"], "NOT_FOUND");
}

#[rocket::async_test]
async fn test_job_crud_and_ownership() {
    let app = spawn_app().await;
    let (employer, _) = app.register("hr@acme.test", "employer").await;
    let (other, _) = app.register("hr@other.test", "employer").await;
    let (seeker, _) = app.register("seeker@example.com", "job_seeker").await;

    let (status, _) = app.post("/jobs", legit_job(), Some(&seeker)).await;
    assert_eq!(status, Status::Forbidden);

    let job_id = app.create_job(&employer, legit_job()).await;

    let (status, body) = app.get(&format!("/jobs/{}", job_id), None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["title"], "Backend Engineer");
    assert_eq!(body["data"]["source"], "manual");

    let (status, _) = app
        .put(
            &format!("/jobs/{}", job_id),
            json!({ "title": "Hijacked" }),
            Some(&other),
        )
        .await;
    assert_eq!(status, Status::Forbidden);

    let (status, body) = app
        .put(
            &format!("/jobs/{}", job_id),
            json!({ "title": "Senior Backend Engineer", "salary_max": 95000.0 }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["title"], "Senior Backend Engineer");
    assert_eq!(body["data"]["salary_max"], 95000.0);

    let (status, _) = app
        .put(
            &format!("/jobs/{}", job_id),
            json!({ "is_active": false }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::Ok);

    let (status, _) = app.get(&format!("/jobs/{}", job_id), None).await;
    assert_eq!(status, Status::NotFound);
    let (status, _) = app.get(&format!("/jobs/{}", job_id), Some(&other)).await;
    assert_eq!(status, Status::NotFound);
    let (status, body) = app.get(&format!("/jobs/{}", job_id), Some(&employer)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["is_active"], false);

    let (status, body) = app.delete(&format!("/jobs/{}", job_id), Some(&employer)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["type"], "action");
    assert_eq!(body["next_actions"], json!(["list_jobs", "create_job"]));

    let (status, _) = app.get(&format!("/jobs/{}", job_id), None).await;
    assert_eq!(status, Status::NotFound);
}

#[rocket::async_test]
async fn test_job_listing_filters_and_paginates() {
    let app = spawn_app().await;
    let (employer, _) = app.register("hr@acme.test", "employer").await;

    for (title, location) in [
        ("Rust Engineer", "Berlin"),
        ("Go Engineer", "Paris"),
        ("Data Analyst", "Berlin"),
    ] {
        let mut job = legit_job();
        job["title"] = json!(title);
        job["location"] = json!(location);
        app.create_job(&employer, job).await;
    }

    let (status, body) = app.get("/jobs?location=Berlin", None).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["total"], 2);

    let (_, body) = app.get("/jobs?q=analyst", None).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Data Analyst");

    let (_, body) = app.get("/jobs?limit=1&page=2", None).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["page"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);

    let (status, body) = app.get("/jobs?job_type=freelance", None).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error_code"], "VALIDATION_ERROR");
}

#[rocket::async_test]
async fn test_job_company_is_resolved() {
    let app = spawn_app().await;
    let (employer, _) = app.register("hr@acme.test", "employer").await;

    let (status, body) = app
        .post(
            "/companies",
            json!({ "name": "Acme Robotics", "website": "https://acme.test" }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::Created);
    let company_id = body["data"]["id"].as_str().unwrap().to_string();

    let mut job = legit_job();
    job["company_id"] = json!(company_id);
    job["company_name"] = serde_json::Value::Null;
    let job_id = app.create_job(&employer, job).await;

    let (_, body) = app.get(&format!("/jobs/{}", job_id), None).await;
    assert_eq!(body["data"]["company_name"], "Acme Robotics");

    let (_, body) = app
        .get(&format!("/jobs?company_id={}", company_id), None)
        .await;
    assert_eq!(body["data"]["total"], 1);

    let mut job = legit_job();
    job["company_id"] = json!("missing-company");
    let (status, body) = app.post("/jobs", job, Some(&employer)).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"], "Unknown company: missing-company");
}

#[rocket::async_test]
async fn test_job_update_checks_company() {
    let app = spawn_app().await;
    let (employer, _) = app.register("hr@acme.test", "employer").await;
    let job_id = app.create_job(&employer, legit_job()).await;

    let (status, body) = app
        .put(
            &format!("/jobs/{}", job_id),
            json!({ "company_id": "no-such-company" }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["error"], "Unknown company: no-such-company");

    let (_, body) = app.get(&format!("/jobs/{}", job_id), None).await;
    assert_eq!(body["data"]["company_id"], serde_json::Value::Null);

    let (_, body) = app
        .post("/companies", json!({ "name": "Globex" }), Some(&employer))
        .await;
    let company_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .put(
            &format!("/jobs/{}", job_id),
            json!({ "company_id": company_id }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["company_id"], json!(company_id));
    assert_eq!(body["data"]["company_name"], "Globex");
}

#[rocket::async_test]
async fn test_company_writes_require_auth_and_ownership() {
    let app = spawn_app().await;
    let (owner, _) = app.register("owner@acme.test", "employer").await;
    let (stranger, _) = app.register("stranger@example.com", "job_seeker").await;

    let (status, _) = app
        .post("/companies", json!({ "name": "Anonymous Inc" }), None)
        .await;
    assert_eq!(status, Status::Unauthorized);

    let (_, body) = app
        .post("/companies", json!({ "name": "Acme" }), Some(&owner))
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .put(
            &format!("/companies/{}", id),
            json!({ "industry": "Spam" }),
            Some(&stranger),
        )
        .await;
    assert_eq!(status, Status::Forbidden);

    let (status, body) = app
        .put(
            &format!("/companies/{}", id),
            json!({ "industry": "Robotics" }),
            Some(&owner),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["industry"], "Robotics");

    let (_, body) = app.get("/companies", None).await;
    assert_eq!(body["data"]["total"], 1);

    let (status, _) = app.delete(&format!("/companies/{}", id), Some(&owner)).await;
    assert_eq!(status, Status::Ok);
}

#[rocket::async_test]
async fn test_application_flow() {
    let app = spawn_app().await;
    let (employer, _) = app.register("hr@acme.test", "employer").await;
    let (seeker, seeker_id) = app.register("seeker@example.com", "job_seeker").await;
    let job_id = app.create_job(&employer, legit_job()).await;

    let (status, body) = app
        .post(
            "/applications",
            json!({ "job_id": job_id, "cover_letter": "Hello" }),
            Some(&seeker),
        )
        .await;
    assert_eq!(status, Status::Created);
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["user_id"], seeker_id.as_str());
    let application_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post("/applications", json!({ "job_id": job_id }), Some(&seeker))
        .await;
    assert_eq!(status, Status::Conflict);

    let (status, _) = app
        .post("/applications", json!({ "job_id": "missing" }), Some(&seeker))
        .await;
    assert_eq!(status, Status::NotFound);

    let (_, body) = app.get("/applications/me", Some(&seeker)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .get(&format!("/jobs/{}/applications", job_id), Some(&seeker))
        .await;
    assert_eq!(status, Status::Forbidden);

    let (status, body) = app
        .get(&format!("/jobs/{}/applications", job_id), Some(&employer))
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = app
        .put(
            &format!("/applications/{}/status", application_id),
            json!({ "status": "accepted" }),
            Some(&seeker),
        )
        .await;
    assert_eq!(status, Status::Forbidden);

    let (status, body) = app
        .put(
            &format!("/applications/{}/status", application_id),
            json!({ "status": "accepted" }),
            Some(&employer),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["status"], "accepted");
}

#[rocket::async_test]
async fn test_user_management_permissions() {
    let app = spawn_app().await;
    let (seeker, seeker_id) = app.register("seeker@example.com", "job_seeker").await;
    let (_, other_id) = app.register("other@example.com", "job_seeker").await;
    let admin = app.admin_token().await;

    let (status, body) = app.get("/users", Some(&seeker)).await;
    assert_eq!(status, Status::Forbidden);
    assert_eq!(body["error"], "Administrator access required");

    let (status, body) = app.get("/users", Some(&admin)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["total"], 3);

    let (status, _) = app.get(&format!("/users/{}", other_id), Some(&seeker)).await;
    assert_eq!(status, Status::Forbidden);

    let (status, _) = app
        .put(
            &format!("/users/{}", seeker_id),
            json!({ "role": "admin" }),
            Some(&seeker),
        )
        .await;
    assert_eq!(status, Status::Forbidden);

    let (status, body) = app
        .put(
            &format!("/users/{}", seeker_id),
            json!({ "skills": ["Rust", "SQL"] }),
            Some(&seeker),
        )
        .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["skills"], json!(["Rust", "SQL"]));

    let (status, _) = app
        .put(
            &format!("/users/{}", other_id),
            json!({ "is_active": false }),
            Some(&admin),
        )
        .await;
    assert_eq!(status, Status::Ok);

    let (status, body) = app
        .post(
            "/auth/login",
            json!({ "email": "other@example.com", "password": common::PASSWORD }),
            None,
        )
        .await;
    assert_eq!(status, Status::Forbidden);
    assert_eq!(body["error_code"], "FORBIDDEN");
}

#[rocket::async_test]
async fn test_activity_logs_and_admin_endpoints() {
    let app = spawn_app().await;
    let (seeker, seeker_id) = app.register("seeker@example.com", "job_seeker").await;
    let admin = app.admin_token().await;

    app.get("/jobs", Some(&seeker)).await;
    app.get("/health", None).await;

    let (status, body) = app
        .get(&format!("/admin/logs?user_id={}", seeker_id), Some(&admin))
        .await;
    assert_eq!(status, Status::Ok);
    let entries = body["data"]["items"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["method"], "GET");
    assert_eq!(entries[0]["path"], "/jobs");
    assert_eq!(entries[0]["status_code"], 200);

    let (_, body) = app.get("/admin/logs?path_prefix=/health", Some(&admin)).await;
    assert_eq!(body["data"]["total"], 0);

    let (_, body) = app.get("/admin/logs?path_prefix=/jobs", Some(&admin)).await;
    assert_eq!(body["data"]["total"], 1);
    let (_, body) = app.get("/admin/logs?path_prefix=/j_bs", Some(&admin)).await;
    assert_eq!(body["data"]["total"], 0);

    let (status, body) = app.get("/admin/stats", Some(&admin)).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["data"]["users"], 2);

    let response = app
        .client
        .get("/admin/dashboard")
        .header(common::bearer(&admin))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let html = response.into_string().await.unwrap();
    assert!(html.contains("Job Board Admin"));

    let (status, _) = app.get("/admin/stats", Some(&seeker)).await;
    assert_eq!(status, Status::Forbidden);
}

#[rocket::async_test]
async fn test_cors_headers_and_preflight() {
    let app = spawn_app().await;
    let response = app
        .client
        .options("/jobs")
        .header(Header::new("Origin", "https://example.com"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );
}
