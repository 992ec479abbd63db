// src/web/activity.rs
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Method;
use rocket::{Data, Request, Response};
use std::time::Instant;
use tracing::{debug, warn};

use crate::auth::{bearer_token, AuthConfig};
use crate::database::{ActivityLogRepository, Database};
use crate::models::NewActivityLog;

/// Paths that are never written to the activity log
const SKIPPED_PATHS: &[&str] = &["/health"];

#[derive(Clone, Copy)]
struct RequestTimer(Option<Instant>);

/// Records every API request in the `activity_logs` table
pub struct ActivityLogger;

impl ActivityLogger {
    fn should_record(req: &Request<'_>) -> bool {
        req.method() != Method::Options && !SKIPPED_PATHS.contains(&req.uri().path().as_str())
    }

    fn user_id(req: &Request<'_>) -> Option<String> {
        let auth_config = req.rocket().state::<AuthConfig>()?;
        let token = bearer_token(req)?;
        auth_config.verify_token(token).ok().map(|claims| claims.sub)
    }
}

#[rocket::async_trait]
impl Fairing for ActivityLogger {
    fn info(&self) -> Info {
        Info {
            name: "Activity logger",
            kind: Kind::Request | Kind::Response,
        }
    }

    async fn on_request(&self, req: &mut Request<'_>, _: &mut Data<'_>) {
        req.local_cache(|| RequestTimer(Some(Instant::now())));
    }

    async fn on_response<'r>(&self, req: &'r Request<'_>, res: &mut Response<'r>) {
        if !Self::should_record(req) {
            return;
        }
        let Some(database) = req.rocket().state::<Database>() else {
            return;
        };

        let duration_ms = req
            .local_cache(|| RequestTimer(None))
            .0
            .map(|started| started.elapsed().as_millis() as u64)
            .unwrap_or_default();

        let entry = NewActivityLog {
            user_id: Self::user_id(req),
            method: req.method().as_str().to_string(),
            path: req.uri().to_string(),
            status_code: res.status().code,
            duration_ms,
            ip: req.client_ip().map(|ip| ip.to_string()),
            user_agent: req.headers().get_one("User-Agent").map(str::to_string),
            action: req
                .route()
                .and_then(|route| route.name.as_deref())
                .map(str::to_string),
        };

        debug!(
            "{} {} -> {} ({} ms)",
            entry.method, entry.path, entry.status_code, entry.duration_ms
        );

        if let Err(e) = ActivityLogRepository::new(database.pool()).insert(entry).await {
            warn!("Failed to record activity log: {:#}", e);
        }
    }
}
