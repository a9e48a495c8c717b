//! Bulk employee import.
//!
//! An [`ImportSource`] yields unvalidated [`Candidate`]s. [`import_employees`]
//! turns each one into an add on the HR registry with a generated salary, so a
//! candidate breaking a registry rule is rejected exactly like manual input.

mod randomuser;
mod salary;

use async_trait::async_trait;
use products_hr::{Employee, HrModule, NewEmployee};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

pub use randomuser::{DEFAULT_BASE_URL, DEFAULT_NATIONALITY, RandomUserClient};
pub use salary::SalaryPolicy;

/// Upper bound accepted by the randomuser.me API for one request.
pub const MAX_IMPORT_COUNT: i64 = 5000;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ImportError {
    #[error("count must be between 1 and {max}, got {0}", max = MAX_IMPORT_COUNT)]
    InvalidCount(i64),
    #[error("import source failed: {0}")]
    Source(String),
}

impl ImportError {
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Source(reason.into())
    }
}

pub fn check_count(count: i64) -> Result<(), ImportError> {
    if !(1..=MAX_IMPORT_COUNT).contains(&count) {
        return Err(ImportError::InvalidCount(count));
    }
    Ok(())
}

/// Raw personal data supplied by an import source.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub source_id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: i32,
    pub email: String,
    pub phone: String,
    pub photo_url: String,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn into_new_employee(self, salary: f64) -> NewEmployee {
        NewEmployee::new(self.full_name(), self.age, salary)
            .with_email(self.email)
            .with_phone(self.phone)
            .with_photo_url(self.photo_url)
    }
}

#[async_trait]
pub trait ImportSource: Send + Sync {
    /// Returns at most `count` candidates. Counts outside
    /// `1..=MAX_IMPORT_COUNT` fail with [`ImportError::InvalidCount`].
    async fn fetch(&self, count: i64) -> Result<Vec<Candidate>, ImportError>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedCandidate {
    /// Identifier the import source gave the candidate.
    pub source_id: String,
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ImportReport {
    pub imported: Vec<Employee>,
    pub rejected: Vec<RejectedCandidate>,
}

/// Fetches `count` candidates and adds each one to `hr`.
///
/// The registry lock is taken per candidate, after the fetch completes.
#[instrument(name = "hr.import", skip(source, hr, salaries))]
pub async fn import_employees(
    source: &dyn ImportSource,
    hr: &HrModule,
    salaries: &SalaryPolicy,
    count: i64,
) -> Result<ImportReport, ImportError> {
    check_count(count)?;
    let candidates = source.fetch(count).await?;
    let mut report = ImportReport::default();
    for candidate in candidates {
        let name = candidate.full_name();
        let source_id = candidate.source_id.clone();
        match hr.add(candidate.into_new_employee(salaries.random_salary())) {
            Ok(employee) => {
                debug!(%source_id, employee_id = %employee.id(), "candidate imported");
                report.imported.push(employee);
            }
            Err(err) => {
                warn!(%source_id, %name, reason = %err, "import candidate rejected");
                report.rejected.push(RejectedCandidate {
                    source_id,
                    name,
                    reason: err.to_string(),
                });
            }
        }
    }
    info!(
        imported = report.imported.len(),
        rejected = report.rejected.len(),
        "import finished"
    );
    Ok(report)
}
