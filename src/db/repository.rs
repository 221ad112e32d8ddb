use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{Account, Doctor, Patient};

// ═══════════════════════════════════════════
// Account Repository
// ═══════════════════════════════════════════

pub fn insert_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO accounts (id, username, password_hash, email, image_path, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account.id.to_string(),
            account.username,
            account.password_hash,
            account.email,
            account.image_path,
            account.created_at.to_string(),
            account.updated_at.to_string(),
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            DatabaseError::ConstraintViolation(format!(
                "username '{}' already taken",
                account.username
            ))
        }
        other => other.into(),
    })?;
    Ok(())
}

pub fn get_account(conn: &Connection, id: &Uuid) -> Result<Option<Account>, DatabaseError> {
    account_query(
        conn,
        "SELECT id, username, password_hash, email, image_path, created_at, updated_at
         FROM accounts WHERE id = ?1",
        &id.to_string(),
    )
}

pub fn get_account_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Account>, DatabaseError> {
    account_query(
        conn,
        "SELECT id, username, password_hash, email, image_path, created_at, updated_at
         FROM accounts WHERE username = ?1",
        username,
    )
}

fn account_query(
    conn: &Connection,
    sql: &str,
    key: &str,
) -> Result<Option<Account>, DatabaseError> {
    let mut stmt = conn.prepare(sql)?;

    let result = stmt.query_row(params![key], |row| {
        Ok(AccountRow {
            id: row.get::<_, String>(0)?,
            username: row.get(1)?,
            password_hash: row.get(2)?,
            email: row.get(3)?,
            image_path: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(account_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Update the mutable account fields (username, email, picture).
/// The password hash is not touched here.
pub fn update_account(conn: &Connection, account: &Account) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE accounts SET username = ?2, email = ?3, image_path = ?4,
         updated_at = datetime('now')
         WHERE id = ?1",
        params![
            account.id.to_string(),
            account.username,
            account.email,
            account.image_path,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "account".into(),
            id: account.id.to_string(),
        });
    }
    Ok(())
}

// Internal row type for Account mapping
struct AccountRow {
    id: String,
    username: String,
    password_hash: String,
    email: Option<String>,
    image_path: Option<String>,
    created_at: String,
    updated_at: String,
}

fn account_from_row(row: AccountRow) -> Result<Account, DatabaseError> {
    Ok(Account {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username: row.username,
        password_hash: row.password_hash,
        email: row.email,
        image_path: row.image_path,
        created_at: parse_datetime(&row.created_at),
        updated_at: parse_datetime(&row.updated_at),
    })
}

fn parse_datetime(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .unwrap_or_default()
}

/// Resolve the owning account for a submitted entity username.
/// Entities stay unlinked when no such account exists.
pub fn account_id_for_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<Uuid>, DatabaseError> {
    Ok(get_account_by_username(conn, username)?.map(|a| a.id))
}

// ═══════════════════════════════════════════
// Patient Repository
// ═══════════════════════════════════════════

pub fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, first_name, last_name, phone_number, email, username, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.phone_number,
            patient.email,
            patient.username,
            patient.account_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone_number, email, username, account_id
         FROM patients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], person_row);

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_patient_by_phone(
    conn: &Connection,
    phone_number: &str,
) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone_number, email, username, account_id
         FROM patients WHERE phone_number = ?1 LIMIT 1",
    )?;

    let result = stmt.query_row(params![phone_number], person_row);

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List all patients in storage-default order (no explicit sort).
pub fn list_patients(conn: &Connection) -> Result<Vec<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone_number, email, username, account_id
         FROM patients",
    )?;

    let rows = stmt.query_map([], person_row)?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(patient_from_row(row?)?);
    }
    Ok(patients)
}

pub fn update_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET first_name = ?2, last_name = ?3, phone_number = ?4,
         email = ?5, username = ?6, account_id = ?7
         WHERE id = ?1",
        params![
            patient.id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.phone_number,
            patient.email,
            patient.username,
            patient.account_id.map(|id| id.to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_patient(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM patients WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// ═══════════════════════════════════════════
// Doctor Repository
// ═══════════════════════════════════════════

pub fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, first_name, last_name, phone_number, email, username, account_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            doctor.id.to_string(),
            doctor.first_name,
            doctor.last_name,
            doctor.phone_number,
            doctor.email,
            doctor.username,
            doctor.account_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone_number, email, username, account_id
         FROM doctors WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], person_row);

    match result {
        Ok(row) => Ok(Some(doctor_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// List all doctors in storage-default order (no explicit sort).
pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone_number, email, username, account_id
         FROM doctors",
    )?;

    let rows = stmt.query_map([], person_row)?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(doctor_from_row(row?)?);
    }
    Ok(doctors)
}

pub fn update_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET first_name = ?2, last_name = ?3, phone_number = ?4,
         email = ?5, username = ?6, account_id = ?7
         WHERE id = ?1",
        params![
            doctor.id.to_string(),
            doctor.first_name,
            doctor.last_name,
            doctor.phone_number,
            doctor.email,
            doctor.username,
            doctor.account_id.map(|id| id.to_string()),
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: doctor.id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_doctor(conn: &Connection, id: &Uuid) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

// ═══════════════════════════════════════════
// Shared row mapping (patients and doctors have the same shape)
// ═══════════════════════════════════════════

struct PersonRow {
    id: String,
    first_name: String,
    last_name: String,
    phone_number: String,
    email: String,
    username: String,
    account_id: Option<String>,
}

fn person_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PersonRow> {
    Ok(PersonRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone_number: row.get(3)?,
        email: row.get(4)?,
        username: row.get(5)?,
        account_id: row.get(6)?,
    })
}

fn patient_from_row(row: PersonRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        first_name: row.first_name,
        last_name: row.last_name,
        phone_number: row.phone_number,
        email: row.email,
        username: row.username,
        account_id: row.account_id.and_then(|s| Uuid::parse_str(&s).ok()),
    })
}

fn doctor_from_row(row: PersonRow) -> Result<Doctor, DatabaseError> {
    Ok(Doctor {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        first_name: row.first_name,
        last_name: row.last_name,
        phone_number: row.phone_number,
        email: row.email,
        username: row.username,
        account_id: row.account_id.and_then(|s| Uuid::parse_str(&s).ok()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_account(conn: &Connection, username: &str) -> Account {
        let now = chrono::Local::now().naive_local();
        let account = Account {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: "pbkdf2_sha256$600000$c2FsdA$aGFzaA".into(),
            email: Some(format!("{username}@example.com")),
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        insert_account(conn, &account).unwrap();
        account
    }

    fn make_patient(conn: &Connection, first: &str, last: &str) -> Patient {
        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: first.into(),
            last_name: last.into(),
            phone_number: "0712345678".into(),
            email: format!("{}@example.com", first.to_lowercase()),
            username: first.to_lowercase(),
            account_id: None,
        };
        insert_patient(conn, &patient).unwrap();
        patient
    }

    #[test]
    fn account_insert_and_retrieve() {
        let conn = test_db();
        let account = make_account(&conn, "amina");

        let fetched = get_account(&conn, &account.id).unwrap().unwrap();
        assert_eq!(fetched.username, "amina");
        assert_eq!(fetched.email.as_deref(), Some("amina@example.com"));
        assert!(fetched.image_path.is_none());
    }

    #[test]
    fn account_lookup_by_username() {
        let conn = test_db();
        let account = make_account(&conn, "amina");

        let fetched = get_account_by_username(&conn, "amina").unwrap().unwrap();
        assert_eq!(fetched.id, account.id);

        assert!(get_account_by_username(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_constraint_violation() {
        let conn = test_db();
        make_account(&conn, "amina");

        let now = chrono::Local::now().naive_local();
        let dup = Account {
            id: Uuid::new_v4(),
            username: "amina".into(),
            password_hash: "x".into(),
            email: None,
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        let err = insert_account(&conn, &dup).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn account_update_changes_fields() {
        let conn = test_db();
        let mut account = make_account(&conn, "amina");

        account.email = Some("new@example.com".into());
        account.image_path = Some("abc.png".into());
        update_account(&conn, &account).unwrap();

        let fetched = get_account(&conn, &account.id).unwrap().unwrap();
        assert_eq!(fetched.email.as_deref(), Some("new@example.com"));
        assert_eq!(fetched.image_path.as_deref(), Some("abc.png"));
    }

    #[test]
    fn account_update_missing_is_not_found() {
        let conn = test_db();
        let now = chrono::Local::now().naive_local();
        let ghost = Account {
            id: Uuid::new_v4(),
            username: "ghost".into(),
            password_hash: "x".into(),
            email: None,
            image_path: None,
            created_at: now,
            updated_at: now,
        };
        let err = update_account(&conn, &ghost).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn patient_insert_and_retrieve() {
        let conn = test_db();
        let patient = make_patient(&conn, "Jane", "Doe");

        let fetched = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(fetched.full_name(), "Jane Doe");
        assert_eq!(fetched.phone_number, "0712345678");
        assert!(fetched.account_id.is_none());
    }

    #[test]
    fn patient_list_returns_all() {
        let conn = test_db();
        make_patient(&conn, "Jane", "Doe");
        make_patient(&conn, "John", "Mwangi");

        let patients = list_patients(&conn).unwrap();
        assert_eq!(patients.len(), 2);
    }

    #[test]
    fn patient_update_persists() {
        let conn = test_db();
        let mut patient = make_patient(&conn, "Jane", "Doe");

        patient.phone_number = "0799999999".into();
        update_patient(&conn, &patient).unwrap();

        let fetched = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert_eq!(fetched.phone_number, "0799999999");
    }

    #[test]
    fn patient_update_missing_is_not_found() {
        let conn = test_db();
        let ghost = Patient {
            id: Uuid::new_v4(),
            first_name: "No".into(),
            last_name: "One".into(),
            phone_number: "0".into(),
            email: "no@example.com".into(),
            username: "noone".into(),
            account_id: None,
        };
        let err = update_patient(&conn, &ghost).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn patient_delete_removes_row() {
        let conn = test_db();
        let patient = make_patient(&conn, "Jane", "Doe");

        delete_patient(&conn, &patient.id).unwrap();
        assert!(get_patient(&conn, &patient.id).unwrap().is_none());

        // Second delete is a not-found condition
        let err = delete_patient(&conn, &patient.id).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn patient_lookup_by_phone() {
        let conn = test_db();
        make_patient(&conn, "Jane", "Doe");

        let found = get_patient_by_phone(&conn, "0712345678").unwrap();
        assert!(found.is_some());
        assert!(get_patient_by_phone(&conn, "0000").unwrap().is_none());
    }

    #[test]
    fn account_link_resolves_by_username() {
        let conn = test_db();
        let account = make_account(&conn, "janedoe");

        let linked = account_id_for_username(&conn, "janedoe").unwrap();
        assert_eq!(linked, Some(account.id));
        assert_eq!(account_id_for_username(&conn, "other").unwrap(), None);
    }

    #[test]
    fn deleting_account_unlinks_patient() {
        let conn = test_db();
        let account = make_account(&conn, "janedoe");

        let patient = Patient {
            id: Uuid::new_v4(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            phone_number: "0712345678".into(),
            email: "jane@example.com".into(),
            username: "janedoe".into(),
            account_id: Some(account.id),
        };
        insert_patient(&conn, &patient).unwrap();

        conn.execute(
            "DELETE FROM accounts WHERE id = ?1",
            params![account.id.to_string()],
        )
        .unwrap();

        // ON DELETE SET NULL keeps the patient row, unlinked
        let fetched = get_patient(&conn, &patient.id).unwrap().unwrap();
        assert!(fetched.account_id.is_none());
    }

    #[test]
    fn doctor_crud_roundtrip() {
        let conn = test_db();
        let mut doctor = Doctor {
            id: Uuid::new_v4(),
            first_name: "Asha".into(),
            last_name: "Kamau".into(),
            phone_number: "0711000000".into(),
            email: "asha@example.com".into(),
            username: "ashak".into(),
            account_id: None,
        };
        insert_doctor(&conn, &doctor).unwrap();

        let fetched = get_doctor(&conn, &doctor.id).unwrap().unwrap();
        assert_eq!(fetched.full_name(), "Asha Kamau");

        doctor.email = "asha.k@example.com".into();
        update_doctor(&conn, &doctor).unwrap();
        let fetched = get_doctor(&conn, &doctor.id).unwrap().unwrap();
        assert_eq!(fetched.email, "asha.k@example.com");

        assert_eq!(list_doctors(&conn).unwrap().len(), 1);

        delete_doctor(&conn, &doctor.id).unwrap();
        assert!(list_doctors(&conn).unwrap().is_empty());
    }
}
