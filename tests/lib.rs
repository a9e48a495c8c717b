//! Shared fixtures for suite integration tests.

use products_hr::{Employee, HrModule, NewEmployee};

/// Registry seeded with one employee per name, in order.
pub fn seeded(names: &[&str]) -> (HrModule, Vec<Employee>) {
    let hr = HrModule::new();
    let added = names
        .iter()
        .map(|name| {
            hr.add(NewEmployee::new(*name, 35, 2000.0))
                .unwrap_or_else(|err| panic!("fixture {name:?} rejected: {err}"))
        })
        .collect();
    (hr, added)
}

pub fn names(employees: &[Employee]) -> Vec<String> {
    employees.iter().map(|e| e.name().to_string()).collect()
}
