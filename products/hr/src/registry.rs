use crate::employee::{Employee, EmployeePatch, NewEmployee, search_term};
use crate::error::{HrError, HrResult};

/// Ordered, in-memory employee collection.
///
/// Not synchronized. Share it through [`crate::HrModule`].
#[derive(Debug, Default)]
pub struct EmployeeRegistry {
    employees: Vec<Employee>,
}

impl EmployeeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a new record with a freshly generated id.
    pub fn add(&mut self, new: NewEmployee) -> HrResult<&Employee> {
        let employee = Employee::create(new)?;
        self.employees.push(employee);
        Ok(&self.employees[self.employees.len() - 1])
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Employee] {
        &self.employees
    }

    /// Ids match exactly. Other spellings of the same UUID are unknown ids.
    pub fn find_by_id(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|employee| employee.has_id(id))
    }

    /// Case-insensitive substring search over names, in insertion order.
    pub fn find_by_name(&self, query: &str) -> HrResult<Vec<&Employee>> {
        let needle = search_term(query)?;
        Ok(self
            .employees
            .iter()
            .filter(|employee| employee.name_contains(&needle))
            .collect())
    }

    /// Applies `patch` in place. See [`EmployeePatch`] for field order; a
    /// validation failure leaves earlier fields of the same patch applied.
    pub fn update_by_id(&mut self, id: &str, patch: EmployeePatch) -> HrResult<&Employee> {
        let employee = self
            .employees
            .iter_mut()
            .find(|employee| employee.has_id(id))
            .ok_or_else(|| HrError::not_found(id))?;
        employee.apply(patch)?;
        Ok(employee)
    }

    pub fn delete_by_id(&mut self, id: &str) -> bool {
        let before = self.employees.len();
        self.employees.retain(|employee| !employee.has_id(id));
        self.employees.len() < before
    }

    /// Removes every record whose name contains `query`, ignoring case.
    pub fn delete_by_name(&mut self, query: &str) -> HrResult<bool> {
        let needle = search_term(query)?;
        let before = self.employees.len();
        self.employees
            .retain(|employee| !employee.name_contains(&needle));
        Ok(self.employees.len() < before)
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}
