use anyhow::{Context, Result};
use products_hr::{EmployeePatch, HrError, HrModule, NewEmployee};
use suite_tests::{names, seeded};

#[test]
fn empty_registry_answers_every_query() -> Result<()> {
    let hr = HrModule::new();
    assert!(hr.list().is_empty());
    assert!(hr.find_by_id("anything").is_none());
    assert!(hr.find_by_name("ana")?.is_empty());
    assert!(!hr.delete_by_id("anything"));
    assert!(!hr.delete_by_name("ana")?);
    assert!(matches!(
        hr.update_by_id("anything", EmployeePatch::default()),
        Err(HrError::NotFound(_))
    ));
    Ok(())
}

#[test]
fn ids_are_unique_and_listing_keeps_insertion_order() -> Result<()> {
    let (hr, added) = seeded(&["Ana", "Bruno", "Carla", "Ana"]);
    let listed = hr.list();
    assert_eq!(names(&listed), ["Ana", "Bruno", "Carla", "Ana"]);

    let mut ids: Vec<_> = listed.iter().map(|e| e.id()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), added.len());

    for employee in &added {
        let found = hr
            .find_by_id(&employee.id().to_string())
            .context("added employee must be findable")?;
        assert_eq!(&found, employee);
    }
    Ok(())
}

#[test]
fn rejected_adds_leave_the_registry_untouched() {
    let (hr, _) = seeded(&["Ana"]);
    let cases = [
        (NewEmployee::new("   ", 30, 10.0), "name required"),
        (NewEmployee::new("Bea", 0, 10.0), "age out of range"),
        (NewEmployee::new("Bea", 121, 10.0), "age out of range"),
        (NewEmployee::new("Bea", 30, -0.5), "negative salary"),
    ];
    for (input, reason) in cases {
        let err = hr.add(input).unwrap_err();
        assert_eq!(err, HrError::validation(reason));
    }
    assert_eq!(hr.len(), 1);
}

#[test]
fn serialized_employee_can_be_re_added() -> Result<()> {
    let hr = HrModule::new();
    let original = hr.add(
        NewEmployee::new("Lucía Gómez", 41, 3150.5)
            .with_email("lucia@example.com")
            .with_phone("600-000-000")
            .with_photo_url("https://randomuser.me/api/portraits/med/women/12.jpg"),
    )?;

    let json = serde_json::to_value(&original)?;
    let input: NewEmployee = serde_json::from_value(json)?;
    let copy = hr.add(input)?;

    assert_ne!(copy.id(), original.id());
    assert_eq!(copy.name(), original.name());
    assert_eq!(copy.age(), original.age());
    assert_eq!(copy.salary(), original.salary());
    assert_eq!(copy.email(), original.email());
    assert_eq!(copy.phone(), original.phone());
    assert_eq!(copy.photo_url(), original.photo_url());
    Ok(())
}

#[test]
fn name_search_is_case_insensitive_substring() -> Result<()> {
    let (hr, _) = seeded(&["Ana Pérez", "Mariana Ruiz", "Juan Soto"]);
    assert_eq!(names(&hr.find_by_name("ANA")?), ["Ana Pérez", "Mariana Ruiz"]);
    assert_eq!(names(&hr.find_by_name("  soto ")?), ["Juan Soto"]);
    assert_eq!(
        hr.find_by_name(" ").unwrap_err(),
        HrError::validation("empty search term")
    );
    Ok(())
}

#[test]
fn delete_by_name_removes_every_match() -> Result<()> {
    let (hr, _) = seeded(&["Ana Pérez", "Mariana Ruiz", "Juan Soto"]);
    assert!(hr.delete_by_name("ana")?);
    assert_eq!(names(&hr.list()), ["Juan Soto"]);
    assert!(!hr.delete_by_name("ana")?);
    Ok(())
}

#[test]
fn delete_by_id_is_idempotent() {
    let (hr, added) = seeded(&["Ana", "Bruno"]);
    let id = added[0].id().to_string();
    assert!(hr.delete_by_id(&id));
    assert!(!hr.delete_by_id(&id));
    assert!(hr.find_by_id(&id).is_none());
    assert_eq!(names(&hr.list()), ["Bruno"]);
}

#[test]
fn failed_update_keeps_fields_applied_before_the_failure() -> Result<()> {
    let (hr, added) = seeded(&["Ana"]);
    let id = added[0].id().to_string();
    let patch = EmployeePatch {
        name: Some("Ana María".into()),
        age: Some(200),
        salary: Some(9999.0),
        ..EmployeePatch::default()
    };

    assert_eq!(
        hr.update_by_id(&id, patch).unwrap_err(),
        HrError::validation("age out of range")
    );
    let stored = hr.find_by_id(&id).context("employee still present")?;
    assert_eq!(stored.name(), "Ana María");
    assert_eq!(stored.age(), 35);
    assert_eq!(stored.salary(), 2000.0);
    Ok(())
}

#[test]
fn update_keeps_id_and_position() -> Result<()> {
    let (hr, added) = seeded(&["Ana", "Bruno", "Carla"]);
    let id = added[1].id().to_string();
    let updated = hr.update_by_id(
        &id,
        EmployeePatch {
            salary: Some(4200.0),
            email: Some("bruno@example.com".into()),
            ..EmployeePatch::default()
        },
    )?;
    assert_eq!(updated.id(), added[1].id());
    assert_eq!(updated.salary(), 4200.0);
    assert_eq!(updated.email(), "bruno@example.com");
    assert_eq!(names(&hr.list()), ["Ana", "Bruno", "Carla"]);
    Ok(())
}
