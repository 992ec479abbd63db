// src/models/mod.rs
//! Documents persisted by the job board, one table per collection

pub mod activity_log;
pub mod analysis;
pub mod application;
pub mod company;
pub mod job;
pub mod user;

pub use activity_log::{ActivityLog, LogFilter, NewActivityLog};
pub use analysis::{AnalysisStatistics, FakeJobAnalysis, RiskLevelCount};
pub use application::{
    Application, ApplicationStatus, CreateApplicationRequest, UpdateApplicationStatusRequest,
};
pub use company::{Company, CreateCompanyRequest, UpdateCompanyRequest};
pub use job::{CreateJobRequest, Job, JobFilter, JobSource, JobType, UpdateJobRequest};
pub use user::{PublicUser, RegisterRequest, UpdateUserRequest, User, UserRole};

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page/limit pair, already clamped to valid bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.limit as i64
    }

    pub fn limit(&self) -> i64 {
        self.limit as i64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, pagination: Pagination) -> Self {
        Self {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::new(None, None);
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(pagination.offset(), 0);
    }

    #[test]
    fn test_pagination_clamps_bounds() {
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, limit: 1 });
        assert_eq!(Pagination::new(Some(3), Some(500)).limit, MAX_PAGE_SIZE);
        assert_eq!(Pagination::new(Some(3), Some(10)).offset(), 20);
    }
}
