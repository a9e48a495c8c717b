//! HR module: the in-memory employee registry.
//!
//! [`EmployeeRegistry`] owns the records and enforces the validation rules.
//! [`HrModule`] is the handle transports share: one lock around one registry,
//! returning owned snapshots so no caller keeps a reference into the
//! collection.
//!
//! Name-based lookups and deletes match on case-insensitive substrings.
//! `delete_by_name("carlos")` removes every employee whose name contains
//! "carlos", so surfaces should warn before calling it.

mod employee;
mod error;
mod registry;

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, instrument};

pub use employee::{Employee, EmployeePatch, MAX_AGE, MIN_AGE, NewEmployee};
pub use error::{HrError, HrResult};
pub use registry::EmployeeRegistry;

#[derive(Clone, Debug, Default)]
pub struct HrModule {
    registry: Arc<Mutex<EmployeeRegistry>>,
}

impl HrModule {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(name = "hr.registry.add", skip_all)]
    pub fn add(&self, new: NewEmployee) -> HrResult<Employee> {
        let employee = self.registry.lock().add(new)?.clone();
        info!(employee_id = %employee.id(), "employee added");
        Ok(employee)
    }

    #[instrument(name = "hr.registry.list", skip_all)]
    pub fn list(&self) -> Vec<Employee> {
        self.registry.lock().list().to_vec()
    }

    #[instrument(name = "hr.registry.find_by_id", skip(self))]
    pub fn find_by_id(&self, id: &str) -> Option<Employee> {
        self.registry.lock().find_by_id(id).cloned()
    }

    #[instrument(name = "hr.registry.find_by_name", skip(self))]
    pub fn find_by_name(&self, query: &str) -> HrResult<Vec<Employee>> {
        let found: Vec<Employee> = self
            .registry
            .lock()
            .find_by_name(query)?
            .into_iter()
            .cloned()
            .collect();
        debug!(matches = found.len(), "name search finished");
        Ok(found)
    }

    #[instrument(name = "hr.registry.update_by_id", skip(self, patch))]
    pub fn update_by_id(&self, id: &str, patch: EmployeePatch) -> HrResult<Employee> {
        let employee = self.registry.lock().update_by_id(id, patch)?.clone();
        info!(employee_id = %employee.id(), "employee updated");
        Ok(employee)
    }

    #[instrument(name = "hr.registry.delete_by_id", skip(self))]
    pub fn delete_by_id(&self, id: &str) -> bool {
        let removed = self.registry.lock().delete_by_id(id);
        if removed {
            info!("employee deleted");
        }
        removed
    }

    #[instrument(name = "hr.registry.delete_by_name", skip(self))]
    pub fn delete_by_name(&self, query: &str) -> HrResult<bool> {
        let mut registry = self.registry.lock();
        let before = registry.len();
        let removed = registry.delete_by_name(query)?;
        info!(removed = before - registry.len(), "bulk delete by name");
        Ok(removed)
    }

    #[instrument(name = "hr.registry.len", skip_all)]
    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    #[instrument(name = "hr.registry.is_empty", skip_all)]
    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }
}
