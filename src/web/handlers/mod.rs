pub mod admin_handlers;
pub mod application_handlers;
pub mod auth_handlers;
pub mod company_handlers;
pub mod crawler_handlers;
pub mod cv_handlers;
pub mod fake_job_handlers;
pub mod job_handlers;
pub mod system_handlers;
pub mod translation_handlers;
pub mod user_handlers;

pub use admin_handlers::*;
pub use application_handlers::*;
pub use auth_handlers::*;
pub use company_handlers::*;
pub use crawler_handlers::*;
pub use cv_handlers::*;
pub use fake_job_handlers::*;
pub use job_handlers::*;
pub use system_handlers::*;
pub use translation_handlers::*;
pub use user_handlers::*;
