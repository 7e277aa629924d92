// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage abstraction.
//!
//! The relational store of the deployed system sits behind these traits;
//! [`MemoryStorage`] is the in-process implementation used by the binary
//! and the tests.
use async_trait::async_trait;
use employee_common::pagination::{Page, Paginated};
use employee_common::{
    Admin, Agent, AgentPartner, Department, Employee, EmployeeUpdate, NewDepartment,
    NewEmployee, Partner, User, UserId,
};
use thiserror::Error;

mod memory;

pub use memory::{MemoryStorage, Seed, SeedUser};

/// Storage failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("record not found")]
    RecordNotFound,
    #[error("record failed to insert")]
    RecordCreatingFailed,
    #[error("record update failed")]
    RecordUpdateFailed,
    #[error("failed to delete record")]
    DeleteFailed,
    #[error("password is incorrect")]
    PasswordIncorrect,
    #[error("the result is empty")]
    EmptyResult,
    #[error("record already exist, duplicate record")]
    DuplicateRecord,
    #[error("you have no access to perform this task")]
    UnauthorizedAccess,
}

/// User accounts and credential checks
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Create a user, hashing `plain_password` into it
    async fn register(&self, user: User, plain_password: &str) -> Result<User, StorageError>;

    async fn get_user_by_id(&self, id: UserId) -> Result<User, StorageError>;

    /// Look up `username` and check `password` against its hash
    async fn authenticate(&self, username: &str, password: &str) -> Result<User, StorageError>;
}

/// Role-specific sub-records
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get_admin_by_user_id(&self, user_id: UserId) -> Result<Admin, StorageError>;
    async fn get_agent_by_user_id(&self, user_id: UserId) -> Result<Agent, StorageError>;
    async fn get_agent_partners_by_agent_id(
        &self,
        agent_id: i64,
    ) -> Result<Vec<AgentPartner>, StorageError>;
    async fn get_partner_by_id(&self, id: i64) -> Result<Partner, StorageError>;
}

/// Employee records
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn add_employee(&self, employee: NewEmployee) -> Result<Employee, StorageError>;
    async fn get_employee_by_id(&self, id: i64) -> Result<Employee, StorageError>;
    /// The employee record belonging to a user account
    async fn get_employee_by_user_id(&self, user_id: UserId) -> Result<Employee, StorageError>;
    async fn get_all_employees(&self, page: &Page) -> Result<Paginated<Employee>, StorageError>;
    async fn update_employee_by_id(
        &self,
        id: i64,
        update: EmployeeUpdate,
    ) -> Result<Employee, StorageError>;
    /// Removes the record completely
    async fn delete_employee_by_id(&self, id: i64) -> Result<(), StorageError>;
}

/// Department records
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn add_department(&self, department: NewDepartment) -> Result<Department, StorageError>;
    async fn get_department_by_id(&self, id: i64) -> Result<Department, StorageError>;
    async fn get_all_departments(&self) -> Result<Vec<Department>, StorageError>;
}

/// Everything the HTTP layer needs from a backend
pub trait Storage:
    CredentialStore + RoleStore + EmployeeStore + DepartmentStore + Clone + 'static
{
}

impl<T> Storage for T where
    T: CredentialStore + RoleStore + EmployeeStore + DepartmentStore + Clone + 'static
{
}
