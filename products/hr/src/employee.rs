use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{HrError, HrResult};

pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 120;

/// A stored employee record.
///
/// Fields are private: records are created by [`crate::EmployeeRegistry::add`]
/// and only change through [`crate::EmployeeRegistry::update_by_id`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    id: Uuid,
    name: String,
    age: i32,
    salary: f64,
    email: String,
    phone: String,
    photo_url: String,
}

impl Employee {
    pub(crate) fn create(new: NewEmployee) -> HrResult<Self> {
        validate_name(&new.name)?;
        validate_age(new.age)?;
        validate_salary(new.salary)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name: new.name,
            age: new.age,
            salary: new.salary,
            email: new.email,
            phone: new.phone,
            photo_url: new.photo_url,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn salary(&self) -> f64 {
        self.salary
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn photo_url(&self) -> &str {
        &self.photo_url
    }

    /// Exact match against the canonical lowercase hyphenated form.
    pub(crate) fn has_id(&self, raw: &str) -> bool {
        let mut buf = Uuid::encode_buffer();
        &*self.id.hyphenated().encode_lower(&mut buf) == raw
    }

    /// `needle` must already be lowercased.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
    }

    /// Applies the patch field by field in declaration order.
    ///
    /// Not atomic: when a field fails validation, the fields applied before it
    /// keep their new values.
    pub(crate) fn apply(&mut self, patch: EmployeePatch) -> HrResult<()> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(age) = patch.age {
            validate_age(age)?;
            self.age = age;
        }
        if let Some(salary) = patch.salary {
            validate_salary(salary)?;
            self.salary = salary;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(photo_url) = patch.photo_url {
            self.photo_url = photo_url;
        }
        Ok(())
    }
}

/// Input for adding an employee. Contact fields default to empty strings.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmployee {
    pub name: String,
    pub age: i32,
    pub salary: f64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo_url: String,
}

impl NewEmployee {
    pub fn new(name: impl Into<String>, age: i32, salary: f64) -> Self {
        Self {
            name: name.into(),
            age,
            salary,
            ..Self::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = photo_url.into();
        self
    }
}

/// Partial update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub salary: Option<f64>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub photo_url: Option<String>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn validate_name(name: &str) -> HrResult<()> {
    if name.trim().is_empty() {
        return Err(HrError::validation("name required"));
    }
    Ok(())
}

fn validate_age(age: i32) -> HrResult<()> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(HrError::validation("age out of range"));
    }
    Ok(())
}

fn validate_salary(salary: f64) -> HrResult<()> {
    if salary.is_nan() || salary < 0.0 {
        return Err(HrError::validation("negative salary"));
    }
    Ok(())
}

/// Trims and lowercases a name search term, rejecting blank input.
pub(crate) fn search_term(query: &str) -> HrResult<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation("empty search term"));
    }
    Ok(trimmed.to_lowercase())
}
