use std::io::Write;

use backend_lib::storage::{CredentialStore, DepartmentStore, EmployeeStore, RoleStore};
use employee_common::Kind;
use serde_json::json;

use crate::test_utils::fast_storage;

#[tokio::test]
async fn test_load_seed_file() {
    let admin_id = uuid::Uuid::new_v4();
    let seed = json!({
        "users": [
            {"id": admin_id, "user_name": "root", "password": "S33d!Password", "kind": "administrator"},
            {"user_name": "temp", "password": "S33d!Password"}
        ],
        "admins": [{"id": 1, "user_id": admin_id, "active": true}],
        "departments": [{"department_name": "Operations"}],
        "employees": [{
            "user_id": admin_id,
            "first_name": "Root",
            "last_name": "User",
            "email": "root@example.com",
            "dob": "1970-01-01",
            "department_id": 1,
            "position": "Operator"
        }]
    });
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(seed.to_string().as_bytes()).unwrap();

    let storage = fast_storage();
    storage.load_seed_file(file.path()).unwrap();

    let root = storage.authenticate("root", "S33d!Password").await.unwrap();
    assert_eq!(root.id, admin_id);
    assert_eq!(root.kind, Kind::Administrator);
    assert_ne!(root.password, "S33d!Password");

    let temp = storage.authenticate("temp", "S33d!Password").await.unwrap();
    assert_eq!(temp.kind, Kind::Unknown);

    assert!(storage.get_admin_by_user_id(admin_id).await.unwrap().active);
    assert_eq!(storage.get_all_departments().await.unwrap().len(), 1);
    let employee = storage.get_employee_by_user_id(admin_id).await.unwrap();
    assert_eq!(employee.department_id, 1);
}

#[tokio::test]
async fn test_seed_file_must_be_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"users = []").unwrap();

    assert!(fast_storage().load_seed_file(file.path()).is_err());
}
