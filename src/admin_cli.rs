// src/admin_cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::io::Read;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::auth::hash_password;
use crate::config::AppConfig;
use crate::database::{Database, JobRepository, UserRepository};
use crate::fake_job::{self, FakeJobService};
use crate::models::user::{normalize_email, validate_password};
use crate::models::{
    CreateJobRequest, Job, JobSource, JobType, Pagination, User, UserRole, MAX_PAGE_SIZE,
};

#[derive(Parser)]
#[command(name = "jobboard-admin")]
#[command(about = "Operator tasks for the job board database")]
pub struct AdminCli {
    #[command(subcommand)]
    pub command: AdminCommand,

    /// Overrides the database path from config.yaml
    #[arg(long)]
    pub database_path: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Create the database schema
    Init,
    /// Create an administrator account
    CreateAdmin {
        email: String,
        name: String,
        password: String,
    },
    /// List registered users
    ListUsers,
    /// Import jobs from a CSV file
    ImportJobs { csv_file: PathBuf },
    /// Run rule-based fake job analysis over unanalyzed jobs
    AnalyzeJobs {
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Print document counts
    Stats,
}

/// One CSV row: title, company_name, location, job_type, description, salary_min, salary_max, contact_email
#[derive(Debug, Deserialize)]
struct JobCsvRow {
    title: String,
    company_name: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    description: String,
    salary_min: Option<f64>,
    salary_max: Option<f64>,
    contact_email: Option<String>,
}

impl TryFrom<JobCsvRow> for CreateJobRequest {
    type Error = String;

    fn try_from(row: JobCsvRow) -> Result<Self, Self::Error> {
        let job_type = match row.job_type.as_deref().map(str::trim) {
            None | Some("") => JobType::default(),
            Some(value) => value.parse()?,
        };

        let request = CreateJobRequest {
            title: row.title.trim().to_string(),
            company_name: non_empty(row.company_name),
            description: row.description,
            location: non_empty(row.location),
            job_type,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            contact_email: non_empty(row.contact_email),
            ..Default::default()
        };
        request.validate()?;
        Ok(request)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse job rows; each entry is either a request or the reason its row was rejected
pub fn parse_jobs_csv<R: Read>(input: R) -> Vec<Result<CreateJobRequest, String>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(input);
    reader
        .deserialize::<JobCsvRow>()
        .enumerate()
        .map(|(index, row)| {
            // header is line 1
            let line = index + 2;
            row.map_err(|e| format!("line {}: {}", line, e))
                .and_then(|row| {
                    CreateJobRequest::try_from(row).map_err(|e| format!("line {}: {}", line, e))
                })
        })
        .collect()
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CsvImportSummary {
    pub imported: usize,
    pub errors: usize,
}

pub async fn import_jobs<R: Read>(database: &Database, input: R) -> Result<CsvImportSummary> {
    let repo = JobRepository::new(database.pool());
    let mut summary = CsvImportSummary::default();

    for row in parse_jobs_csv(input) {
        match row {
            Ok(request) => {
                let job = Job::new(request, JobSource::Import, None);
                repo.insert(&job).await?;
                info!("Added: {}", job.title);
                summary.imported += 1;
            }
            Err(e) => {
                warn!("Skipping row, {}", e);
                summary.errors += 1;
            }
        }
    }

    Ok(summary)
}

pub async fn create_admin(
    database: &Database,
    email: &str,
    name: &str,
    password: &str,
) -> Result<User> {
    validate_password(password).map_err(|e| anyhow::anyhow!(e))?;

    let repo = UserRepository::new(database.pool());
    if repo.find_by_email(&normalize_email(email)).await?.is_some() {
        anyhow::bail!("A user with email '{}' already exists", email);
    }

    let user = User::new(email, name, hash_password(password)?, UserRole::Admin);
    repo.insert(&user).await?;
    Ok(user)
}

/// Every user, fetched page by page in creation order
pub async fn list_all_users(database: &Database) -> Result<Vec<User>> {
    let repo = UserRepository::new(database.pool());
    let mut users = Vec::new();
    let mut page = 1;

    loop {
        let batch = repo
            .list(Pagination::new(Some(page), Some(MAX_PAGE_SIZE)))
            .await?;
        let fetched = batch.items.len();
        users.extend(batch.items);
        if fetched == 0 || users.len() as i64 >= batch.total {
            break;
        }
        page += 1;
    }

    Ok(users)
}

pub async fn handle_admin_command(cli: AdminCli) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.database_path {
        config.database_path = path;
    }
    config.ensure_directories().await?;

    let database = Database::new(&config.database_path).await?;
    database.migrate().await?;

    match cli.command {
        AdminCommand::Init => {
            info!(
                "Database initialized at: {}",
                config.database_path.display()
            );
            info!("Tables: jobs, users, companies, applications, activity_logs, fake_job_analyses");
        }

        AdminCommand::CreateAdmin {
            email,
            name,
            password,
        } => match create_admin(&database, &email, &name, &password).await {
            Ok(user) => {
                info!("Administrator created:");
                info!("   Email: {}", user.email);
                info!("   ID: {}", user.id);
            }
            Err(e) => error!("Failed to create administrator: {:#}", e),
        },

        AdminCommand::ListUsers => {
            let users = list_all_users(&database).await?;
            if users.is_empty() {
                info!("No users found.");
            } else {
                info!(
                    "{:<38} {:<30} {:<12} {:<8} {:<20}",
                    "ID", "Email", "Role", "Active", "Created"
                );
                info!("{}", "-".repeat(110));
                for user in &users {
                    info!(
                        "{:<38} {:<30} {:<12} {:<8} {:<20}",
                        user.id,
                        user.email,
                        user.role,
                        user.is_active,
                        user.created_at.format("%Y-%m-%d %H:%M")
                    );
                }
                info!("{} users", users.len());
            }
        }

        AdminCommand::ImportJobs { csv_file } => {
            let file = std::fs::File::open(&csv_file)
                .with_context(|| format!("CSV file not found: {}", csv_file.display()))?;
            let summary = import_jobs(&database, file).await?;

            info!("Import completed:");
            info!("  Imported: {}", summary.imported);
            info!("  Errors:   {}", summary.errors);
        }

        AdminCommand::AnalyzeJobs { limit } => {
            let detector = fake_job::build_detector(&config)?;
            let service = FakeJobService::new(detector, database.clone());
            let summary = service.batch_analyze(limit, false).await?;

            info!("Analysis completed:");
            info!("  Analyzed:   {}", summary.analyzed);
            info!("  Suspicious: {}", summary.suspicious);
            info!("  Failed:     {}", summary.failed);
        }

        AdminCommand::Stats => {
            let stats = database.stats().await?;
            info!("Jobs:         {} ({} active)", stats.jobs, stats.active_jobs);
            info!("Users:        {}", stats.users);
            info!("Companies:    {}", stats.companies);
            info!("Applications: {}", stats.applications);
            info!(
                "Analyses:     {} ({} suspicious)",
                stats.analyses, stats.suspicious_analyses
            );
        }
    }

    Ok(())
}
