//! Interactive console menu over async stdin/stdout.

use std::{str::FromStr, sync::Arc};

use anyhow::Result;
use comfy_table::{Table, presets::UTF8_FULL};
use platform_import::{ImportSource, SalaryPolicy, import_employees};
use products_hr::{Employee, EmployeePatch, HrModule, NewEmployee};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const MENU: &str = "\
==================== EMPLOYEE REGISTRY ====================
 1. Add employee
 2. List employees
 3. Search employees by name
 4. Update employee
 5. Delete employee by id
 6. Delete employees by name
 7. Import employees from external service
 0. Exit
===========================================================";

pub struct Console<R, W> {
    hr: HrModule,
    importer: Arc<dyn ImportSource>,
    salaries: SalaryPolicy,
    default_import_count: i64,
    input: R,
    output: W,
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        hr: HrModule,
        importer: Arc<dyn ImportSource>,
        default_import_count: i64,
        input: R,
        output: W,
    ) -> Self {
        Self {
            hr,
            importer,
            salaries: SalaryPolicy::default(),
            default_import_count,
            input,
            output,
        }
    }

    /// Runs until the user picks exit or input reaches EOF.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.say(MENU).await?;
            let Some(choice) = self.prompt("Select an option: ").await? else {
                break;
            };
            let keep_going = match choice.trim() {
                "1" => self.add_employee().await?,
                "2" => self.list_employees().await?,
                "3" => self.search_employees().await?,
                "4" => self.update_employee().await?,
                "5" => self.delete_by_id().await?,
                "6" => self.delete_by_name().await?,
                "7" => self.import().await?,
                "0" => {
                    self.say("Goodbye!").await?;
                    false
                }
                _ => {
                    self.say("Invalid option. Try again.").await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }
        self.output.flush().await?;
        Ok(())
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    // Each action returns `Ok(false)` when input hit EOF mid-dialog.

    async fn add_employee(&mut self) -> Result<bool> {
        self.say("=== ADD EMPLOYEE ===").await?;
        let Some(name) = self.prompt("Full name: ").await? else {
            return Ok(false);
        };
        let Some(age) = self.prompt_number::<i32>("Age: ").await? else {
            return Ok(false);
        };
        let Some(salary) = self.prompt_number::<f64>("Salary: ").await? else {
            return Ok(false);
        };
        let Some(email) = self.prompt("Email (optional): ").await? else {
            return Ok(false);
        };
        let Some(phone) = self.prompt("Phone (optional): ").await? else {
            return Ok(false);
        };
        let Some(photo_url) = self.prompt("Photo URL (optional): ").await? else {
            return Ok(false);
        };

        let new = NewEmployee::new(name.trim(), age, salary)
            .with_email(email.trim())
            .with_phone(phone.trim())
            .with_photo_url(photo_url.trim());
        match self.hr.add(new) {
            Ok(employee) => {
                self.say("Employee added:").await?;
                self.show(std::slice::from_ref(&employee)).await?;
            }
            Err(err) => self.say(&format!("Error: {err}")).await?,
        }
        Ok(true)
    }

    async fn list_employees(&mut self) -> Result<bool> {
        self.say("=== EMPLOYEES ===").await?;
        let employees = self.hr.list();
        if employees.is_empty() {
            self.say("No employees registered.").await?;
        } else {
            self.show(&employees).await?;
            self.say(&format!("Total: {}", employees.len())).await?;
        }
        Ok(true)
    }

    async fn search_employees(&mut self) -> Result<bool> {
        self.say("=== SEARCH BY NAME ===").await?;
        let Some(query) = self.prompt("Name to search: ").await? else {
            return Ok(false);
        };
        match self.hr.find_by_name(&query) {
            Ok(found) if found.is_empty() => {
                self.say("No employees matched that name.").await?
            }
            Ok(found) => self.show(&found).await?,
            Err(err) => self.say(&format!("Error: {err}")).await?,
        }
        Ok(true)
    }

    async fn update_employee(&mut self) -> Result<bool> {
        self.say("=== UPDATE EMPLOYEE ===").await?;
        let Some(id) = self.prompt("Employee id: ").await? else {
            return Ok(false);
        };
        let Some(current) = self.hr.find_by_id(&id) else {
            self.say(&format!("No employee found with id {id}")).await?;
            return Ok(true);
        };
        self.show(std::slice::from_ref(&current)).await?;
        self.say("Leave a field blank to keep its current value.")
            .await?;

        let mut patch = EmployeePatch::default();
        let Some(name) = self.prompt("New name: ").await? else {
            return Ok(false);
        };
        patch.name = non_blank(&name);
        let Some(age) = self.prompt_optional_number::<i32>("New age: ").await? else {
            return Ok(false);
        };
        patch.age = age;
        let Some(salary) = self
            .prompt_optional_number::<f64>("New salary: ")
            .await?
        else {
            return Ok(false);
        };
        patch.salary = salary;
        let Some(email) = self.prompt("New email: ").await? else {
            return Ok(false);
        };
        patch.email = non_blank(&email);
        let Some(phone) = self.prompt("New phone: ").await? else {
            return Ok(false);
        };
        patch.phone = non_blank(&phone);
        let Some(photo_url) = self.prompt("New photo URL: ").await? else {
            return Ok(false);
        };
        patch.photo_url = non_blank(&photo_url);

        if patch.is_empty() {
            self.say("Nothing to update.").await?;
            return Ok(true);
        }
        match self.hr.update_by_id(current.id().to_string().as_str(), patch) {
            Ok(employee) => {
                self.say("Employee updated:").await?;
                self.show(std::slice::from_ref(&employee)).await?;
            }
            Err(err) => self.say(&format!("Error: {err}")).await?,
        }
        Ok(true)
    }

    async fn delete_by_id(&mut self) -> Result<bool> {
        self.say("=== DELETE BY ID ===").await?;
        let Some(id) = self.prompt("Employee id: ").await? else {
            return Ok(false);
        };
        if self.hr.delete_by_id(&id) {
            self.say("Employee deleted.").await?;
        } else {
            self.say(&format!("No employee found with id {id}")).await?;
        }
        Ok(true)
    }

    async fn delete_by_name(&mut self) -> Result<bool> {
        self.say("=== DELETE BY NAME ===").await?;
        let Some(query) = self.prompt("Name to delete: ").await? else {
            return Ok(false);
        };
        let matches = match self.hr.find_by_name(&query) {
            Ok(found) => found,
            Err(err) => {
                self.say(&format!("Error: {err}")).await?;
                return Ok(true);
            }
        };
        if matches.is_empty() {
            self.say("No employees matched that name.").await?;
            return Ok(true);
        }
        self.show(&matches).await?;
        let warning = format!(
            "Warning: this deletes ALL {} employee(s) whose name contains {:?}. Continue? (y/N): ",
            matches.len(),
            query.trim()
        );
        let Some(answer) = self.prompt(&warning).await? else {
            return Ok(false);
        };
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            self.say("Deletion cancelled.").await?;
            return Ok(true);
        }
        match self.hr.delete_by_name(&query) {
            Ok(true) => self.say("Employees deleted.").await?,
            Ok(false) => self.say("No employees matched that name.").await?,
            Err(err) => self.say(&format!("Error: {err}")).await?,
        }
        Ok(true)
    }

    async fn import(&mut self) -> Result<bool> {
        self.say("=== IMPORT FROM EXTERNAL SERVICE ===").await?;
        let label = format!("How many employees? [{}]: ", self.default_import_count);
        let Some(count) = self.prompt_optional_number::<i64>(&label).await? else {
            return Ok(false);
        };
        let count = count.unwrap_or(self.default_import_count);

        self.say("Fetching data from the import source...").await?;
        let result =
            import_employees(self.importer.as_ref(), &self.hr, &self.salaries, count).await;
        let report = match result {
            Ok(report) => report,
            Err(err) => {
                self.say(&format!("Error: {err}")).await?;
                return Ok(true);
            }
        };

        self.say(&format!("{} employees imported.", report.imported.len()))
            .await?;
        if !report.imported.is_empty() {
            self.show(&report.imported).await?;
        }
        for rejected in &report.rejected {
            self.say(&format!("Skipped {}: {}", rejected.name, rejected.reason))
                .await?;
        }
        Ok(true)
    }

    async fn show(&mut self, employees: &[Employee]) -> Result<()> {
        let table = employee_table(employees).to_string();
        self.say(&table).await
    }

    async fn say(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        Ok(())
    }

    /// `None` on EOF.
    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        self.output.write_all(label.as_bytes()).await?;
        self.output.flush().await?;
        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    async fn prompt_number<T: FromStr>(&mut self, label: &str) -> Result<Option<T>> {
        loop {
            let Some(raw) = self.prompt(label).await? else {
                return Ok(None);
            };
            match raw.trim().parse() {
                Ok(value) => return Ok(Some(value)),
                Err(_) => self.say("Please enter a valid number.").await?,
            }
        }
    }

    /// Like `prompt_number`, but a blank answer yields `Some(None)`.
    async fn prompt_optional_number<T: FromStr>(
        &mut self,
        label: &str,
    ) -> Result<Option<Option<T>>> {
        loop {
            let Some(raw) = self.prompt(label).await? else {
                return Ok(None);
            };
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(Some(None));
            }
            match raw.parse() {
                Ok(value) => return Ok(Some(Some(value))),
                Err(_) => self.say("Please enter a valid number.").await?,
            }
        }
    }
}

/// Trimmed input, or `None` when the answer was blank.
fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn employee_table(employees: &[Employee]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Age", "Salary", "Email", "Phone", "Photo"]);
    for employee in employees {
        table.add_row(vec![
            employee.id().to_string(),
            employee.name().to_string(),
            employee.age().to_string(),
            format!("{:.2}", employee.salary()),
            employee.email().to_string(),
            employee.phone().to_string(),
            employee.photo_url().to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use platform_import::{Candidate, ImportError, check_count};

    struct StubSource(Vec<Candidate>);

    #[async_trait]
    impl ImportSource for StubSource {
        async fn fetch(&self, count: i64) -> Result<Vec<Candidate>, ImportError> {
            check_count(count)?;
            Ok(self.0.iter().take(count as usize).cloned().collect())
        }
    }

    async fn run_script(hr: &HrModule, script: &str) -> String {
        run_with_source(hr, StubSource(Vec::new()), script).await
    }

    async fn run_with_source(hr: &HrModule, source: StubSource, script: &str) -> String {
        let mut console = Console::new(
            hr.clone(),
            Arc::new(source),
            3,
            script.as_bytes(),
            Vec::new(),
        );
        console.run().await.unwrap();
        String::from_utf8(console.into_output()).unwrap()
    }

    #[tokio::test]
    async fn adds_and_lists_employees() {
        let hr = HrModule::new();
        let output = run_script(
            &hr,
            "1\nAna García\n34\n2500\nana@example.com\n\n\n2\n0\n",
        )
        .await;
        assert!(output.contains("Employee added:"));
        assert!(output.contains("Ana García"));
        assert!(output.contains("Total: 1"));
        assert!(output.contains("Goodbye!"));
        let stored = hr.list();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email(), "ana@example.com");
        assert_eq!(stored[0].phone(), "");
    }

    #[tokio::test]
    async fn typed_fields_are_trimmed_consistently() {
        let hr = HrModule::new();
        run_script(&hr, "1\n  Ana García  \n34\n2500\n ana@example.com \n\n\n0\n").await;
        let ana = hr.list().remove(0);
        assert_eq!(ana.name(), "Ana García");
        assert_eq!(ana.email(), "ana@example.com");

        let script = format!("4\n{}\n  Ana María \n\n\n\n 600 \n\n0\n", ana.id());
        run_script(&hr, &script).await;
        let updated = hr.find_by_id(&ana.id().to_string()).unwrap();
        assert_eq!(updated.name(), "Ana María");
        assert_eq!(updated.phone(), "600");
    }

    #[tokio::test]
    async fn ids_must_be_typed_exactly() {
        let hr = HrModule::new();
        let ana = hr.add(NewEmployee::new("Ana", 30, 1500.0)).unwrap();
        let upper = ana.id().to_string().to_uppercase();
        let output = run_script(&hr, &format!("5\n{upper}\n0\n")).await;
        assert!(output.contains(&format!("No employee found with id {upper}")));
        assert_eq!(hr.len(), 1);
    }

    #[tokio::test]
    async fn reprompts_for_invalid_numbers_and_reports_validation() {
        let hr = HrModule::new();
        let output = run_script(&hr, "1\nLuis\nabc\n200\n1000\n\n\n\n0\n").await;
        assert!(output.contains("Please enter a valid number."));
        assert!(output.contains("Error: age out of range"));
        assert!(hr.is_empty());
    }

    #[tokio::test]
    async fn unknown_option_and_eof_end_cleanly() {
        let hr = HrModule::new();
        let output = run_script(&hr, "9\n").await;
        assert!(output.contains("Invalid option. Try again."));
        assert!(!output.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn search_prints_matches() {
        let hr = HrModule::new();
        hr.add(NewEmployee::new("Mariana López", 29, 1800.0)).unwrap();
        hr.add(NewEmployee::new("Juan", 50, 1800.0)).unwrap();
        let output = run_script(&hr, "3\nana\n3\n \n0\n").await;
        assert!(output.contains("Mariana López"));
        assert!(!output.contains("Juan"));
        assert!(output.contains("Error: empty search term"));
    }

    #[tokio::test]
    async fn update_keeps_blank_fields() {
        let hr = HrModule::new();
        let ana = hr.add(NewEmployee::new("Ana", 30, 1500.0)).unwrap();
        let script = format!("4\n{}\n\n\n3000\n\n\n\n0\n", ana.id());
        let output = run_script(&hr, &script).await;
        assert!(output.contains("Employee updated:"));
        let updated = hr.find_by_id(&ana.id().to_string()).unwrap();
        assert_eq!(updated.salary(), 3000.0);
        assert_eq!(updated.name(), "Ana");
        assert_eq!(updated.age(), 30);
    }

    #[tokio::test]
    async fn delete_by_name_requires_confirmation() {
        let hr = HrModule::new();
        hr.add(NewEmployee::new("Carlos Ruiz", 30, 1500.0)).unwrap();
        hr.add(NewEmployee::new("Carlos Paz", 41, 1500.0)).unwrap();

        let output = run_script(&hr, "6\ncarlos\nn\n0\n").await;
        assert!(output.contains("ALL 2 employee(s)"));
        assert!(output.contains("Deletion cancelled."));
        assert_eq!(hr.len(), 2);

        let output = run_script(&hr, "6\ncarlos\ny\n0\n").await;
        assert!(output.contains("Employees deleted."));
        assert!(hr.is_empty());
    }

    #[tokio::test]
    async fn delete_by_id_reports_missing() {
        let hr = HrModule::new();
        let output = run_script(&hr, "5\nx\n0\n").await;
        assert!(output.contains("No employee found with id x"));
    }

    #[tokio::test]
    async fn import_uses_default_count() {
        let hr = HrModule::new();
        let candidates = ["Lucía", "Eva", "Marta", "Rosa"]
            .iter()
            .map(|first| Candidate {
                source_id: first.to_string(),
                first_name: first.to_string(),
                last_name: "Sanz".into(),
                age: 30,
                email: String::new(),
                phone: String::new(),
                photo_url: String::new(),
            })
            .collect();
        let output = run_with_source(&hr, StubSource(candidates), "7\n\n0\n").await;
        assert!(output.contains("3 employees imported."));
        assert_eq!(hr.len(), 3);
    }
}
