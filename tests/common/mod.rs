#![allow(dead_code)]

use job_board::admin_cli::create_admin;
use job_board::{build_rocket, AppConfig, Database};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub client: Client,
    pub database: Database,
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Fresh temp-file database per app; `configure` tweaks the config before launch
pub async fn spawn_app_with(configure: impl FnOnce(&mut AppConfig)) -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let mut config = AppConfig {
        database_path: dir.path().join("test.db"),
        jwt_secret: "integration-test-secret".to_string(),
        ..AppConfig::default()
    };
    configure(&mut config);

    let database = Database::new(&config.database_path).await.expect("database");
    database.migrate().await.expect("migrations");

    let rocket = build_rocket(&config, database.clone()).expect("rocket");
    let client = Client::tracked(rocket).await.expect("valid rocket instance");

    TestApp {
        client,
        database,
        _dir: dir,
    }
}

pub fn bearer(token: &str) -> Header<'static> {
    Header::new("Authorization", format!("Bearer {}", token))
}

impl TestApp {
    pub async fn get(&self, uri: &str, token: Option<&str>) -> (Status, Value) {
        let mut request = self.client.get(uri.to_string());
        if let Some(token) = token {
            request = request.header(bearer(token));
        }
        let response = request.dispatch().await;
        let status = response.status();
        let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        body: Value,
        token: Option<&str>,
    ) -> (Status, Value) {
        let uri = uri.to_string();
        let mut request = match method {
            "POST" => self.client.post(uri),
            "PUT" => self.client.put(uri),
            "DELETE" => self.client.delete(uri),
            other => panic!("unsupported method {}", other),
        }
        .header(ContentType::JSON)
        .body(body.to_string());
        if let Some(token) = token {
            request = request.header(bearer(token));
        }
        let response = request.dispatch().await;
        let status = response.status();
        let body = response.into_json::<Value>().await.unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (Status, Value) {
        self.send_json("POST", uri, body, token).await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> (Status, Value) {
        self.send_json("PUT", uri, body, token).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (Status, Value) {
        self.send_json("DELETE", uri, json!({}), token).await
    }

    /// Registers a user and returns `(token, user_id)`
    pub async fn register(&self, email: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .post(
                "/auth/register",
                json!({
                    "email": email,
                    "password": PASSWORD,
                    "full_name": "Test User",
                    "role": role,
                }),
                None,
            )
            .await;
        assert_eq!(status, Status::Created, "register failed: {}", body);
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/auth/login",
                json!({ "email": email, "password": PASSWORD }),
                None,
            )
            .await;
        assert_eq!(status, Status::Ok, "login failed: {}", body);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        create_admin(&self.database, "admin@example.com", "Admin", PASSWORD)
            .await
            .expect("admin");
        self.login("admin@example.com").await
    }

    /// Creates a job as `token` and returns its id
    pub async fn create_job(&self, token: &str, body: Value) -> String {
        let (status, body) = self.post("/jobs", body, Some(token)).await;
        assert_eq!(status, Status::Created, "create job failed: {}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

pub fn legit_job() -> Value {
    json!({
        "title": "Backend Engineer",
        "company_name": "Acme Robotics",
        "description": "Acme Robotics is looking for a backend engineer to design, build and operate the services that power our warehouse automation platform.",
        "requirements": ["Rust", "PostgreSQL"],
        "location": "Berlin",
        "job_type": "full_time",
        "salary_min": 60000.0,
        "salary_max": 80000.0,
        "contact_email": "careers@acme-robotics.test"
    })
}

pub fn scam_job() -> Value {
    json!({
        "title": "URGENT HIRING!!! Work from home",
        "description": "Urgent hiring, no experience needed. Pay a small registration fee and message us on WhatsApp.",
        "contact_email": "recruiter.jobs@gmail.com"
    })
}
