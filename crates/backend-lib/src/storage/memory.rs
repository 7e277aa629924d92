// ============================
// crates/backend-lib/src/storage/memory.rs
// ============================
//! In-memory implementation of the storage traits.
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::Utc;
use employee_common::pagination::{
    Page, PageInfo, Paginated, SORT_BY_ID, SORT_BY_NAME, SORT_BY_UPDATED_AT,
};
use employee_common::{
    Admin, Agent, AgentPartner, Department, Employee, EmployeeUpdate, Kind, NewDepartment,
    NewEmployee, Partner, User, UserId,
};
use parking_lot::RwLock;
use scrypt::Params;
use serde::Deserialize;
use uuid::Uuid;

use super::{CredentialStore, DepartmentStore, EmployeeStore, RoleStore, StorageError};
use crate::auth::password::{hash_password_with, verify_password};
use crate::error::AppError;

/// Initial data loaded at startup
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub admins: Vec<Admin>,
    pub agents: Vec<Agent>,
    pub agent_partners: Vec<AgentPartner>,
    pub partners: Vec<Partner>,
    /// Assigned ids 1, 2, ... in file order
    pub departments: Vec<NewDepartment>,
    pub employees: Vec<NewEmployee>,
}

/// A user in the seed file, with a plaintext password
#[derive(Debug, Deserialize)]
pub struct SeedUser {
    pub id: Option<UserId>,
    pub user_name: String,
    pub password: String,
    #[serde(default)]
    pub kind: Kind,
}

#[derive(Default)]
struct Tables {
    users: HashMap<UserId, User>,
    admins: HashMap<UserId, Admin>,
    agents: HashMap<UserId, Agent>,
    agent_partners: Vec<AgentPartner>,
    partners: HashMap<i64, Partner>,
    employees: BTreeMap<i64, Employee>,
    departments: BTreeMap<i64, Department>,
    next_employee_id: i64,
    next_department_id: i64,
}

struct Inner {
    tables: RwLock<Tables>,
    params: Params,
    /// Hash compared against when the username is unknown
    dummy_hash: OnceLock<String>,
}

/// Process-local storage backend
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<Inner>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::with_scrypt_params(Params::recommended())
    }

    /// Storage hashing new passwords with the given scrypt cost
    pub fn with_scrypt_params(params: Params) -> Self {
        Self {
            inner: Arc::new(Inner {
                tables: RwLock::new(Tables {
                    next_employee_id: 1,
                    next_department_id: 1,
                    ..Tables::default()
                }),
                params,
                dummy_hash: OnceLock::new(),
            }),
        }
    }

    /// Load a JSON seed file into the store
    pub fn load_seed_file<P: AsRef<Path>>(&self, path: P) -> Result<(), AppError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let seed: Seed = serde_json::from_str(&content)?;
        self.apply_seed(seed)
    }

    pub fn apply_seed(&self, seed: Seed) -> Result<(), AppError> {
        let Seed {
            users,
            admins,
            agents,
            agent_partners,
            partners,
            departments,
            employees,
        } = seed;

        let user_count = users.len();
        for seed_user in users {
            let now = Utc::now();
            let user = User {
                id: seed_user.id.unwrap_or_else(Uuid::new_v4),
                user_name: seed_user.user_name,
                password: String::new(),
                kind: seed_user.kind,
                created_at: now,
                updated_at: now,
            };
            self.insert_user(user, &seed_user.password)?;
        }
        for admin in admins {
            self.insert_admin(admin);
        }
        for agent in agents {
            self.insert_agent(agent);
        }
        for partner in partners {
            self.insert_partner(partner);
        }
        for link in agent_partners {
            self.link_agent_partner(link);
        }
        for department in departments {
            self.insert_department(department);
        }
        for employee in employees {
            self.insert_employee(employee)?;
        }
        tracing::info!(users = user_count, "seed data loaded");
        Ok(())
    }

    pub fn insert_admin(&self, admin: Admin) {
        self.inner.tables.write().admins.insert(admin.user_id, admin);
    }

    pub fn insert_agent(&self, agent: Agent) {
        self.inner.tables.write().agents.insert(agent.user_id, agent);
    }

    pub fn insert_partner(&self, partner: Partner) {
        self.inner.tables.write().partners.insert(partner.id, partner);
    }

    pub fn link_agent_partner(&self, link: AgentPartner) {
        self.inner.tables.write().agent_partners.push(link);
    }

    fn insert_user(&self, mut user: User, plain_password: &str) -> Result<User, StorageError> {
        if self
            .inner
            .tables
            .read()
            .users
            .values()
            .any(|u| u.user_name == user.user_name)
        {
            return Err(StorageError::DuplicateRecord);
        }

        user.password = hash_password_with(plain_password, self.inner.params).map_err(|e| {
            tracing::error!(error = %e, "User::Register hashing failed");
            StorageError::RecordCreatingFailed
        })?;

        let mut tables = self.inner.tables.write();
        // re-check under the write lock
        if tables.users.values().any(|u| u.user_name == user.user_name)
            || tables.users.contains_key(&user.id)
        {
            return Err(StorageError::DuplicateRecord);
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn insert_department(&self, department: NewDepartment) -> Department {
        let mut tables = self.inner.tables.write();
        let now = Utc::now();
        let record = Department {
            id: tables.next_department_id,
            department_name: department.department_name,
            created_at: now,
            updated_at: now,
        };
        tables.next_department_id += 1;
        tables.departments.insert(record.id, record.clone());
        record
    }

    fn insert_employee(&self, employee: NewEmployee) -> Result<Employee, StorageError> {
        let mut tables = self.inner.tables.write();
        if !tables.departments.contains_key(&employee.department_id) {
            tracing::error!(
                department_id = employee.department_id,
                "Employee::AddEmployee unknown department"
            );
            return Err(StorageError::RecordCreatingFailed);
        }
        if tables
            .employees
            .values()
            .any(|e| e.user_id == employee.user_id)
        {
            return Err(StorageError::DuplicateRecord);
        }

        let now = Utc::now();
        let record = Employee {
            id: tables.next_employee_id,
            user_id: employee.user_id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            dob: employee.dob,
            department_id: employee.department_id,
            position: employee.position,
            created_at: now,
            updated_at: now,
        };
        tables.next_employee_id += 1;
        tables.employees.insert(record.id, record.clone());
        Ok(record)
    }

    fn dummy_hash(&self) -> &str {
        self.inner
            .dummy_hash
            .get_or_init(|| hash_password_with("dummy-password", self.inner.params).unwrap_or_default())
    }
}

#[async_trait]
impl CredentialStore for MemoryStorage {
    async fn register(&self, user: User, plain_password: &str) -> Result<User, StorageError> {
        self.insert_user(user, plain_password)
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<User, StorageError> {
        self.inner
            .tables
            .read()
            .users
            .get(&id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn authenticate(&self, username: &str, password: &str) -> Result<User, StorageError> {
        let user = self
            .inner
            .tables
            .read()
            .users
            .values()
            .find(|u| u.user_name == username)
            .cloned();

        // unknown users are compared against a dummy hash for the same hashing work
        let hash = match &user {
            Some(user) => user.password.clone(),
            None => self.dummy_hash().to_string(),
        };
        let candidate = password.to_string();
        let matches = tokio::task::spawn_blocking(move || verify_password(&hash, &candidate))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "password verification task failed");
                StorageError::PasswordIncorrect
            })?;

        match user {
            Some(user) if matches => Ok(user),
            Some(_) => Err(StorageError::PasswordIncorrect),
            None => Err(StorageError::RecordNotFound),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryStorage {
    async fn get_admin_by_user_id(&self, user_id: UserId) -> Result<Admin, StorageError> {
        self.inner
            .tables
            .read()
            .admins
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn get_agent_by_user_id(&self, user_id: UserId) -> Result<Agent, StorageError> {
        self.inner
            .tables
            .read()
            .agents
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn get_agent_partners_by_agent_id(
        &self,
        agent_id: i64,
    ) -> Result<Vec<AgentPartner>, StorageError> {
        Ok(self
            .inner
            .tables
            .read()
            .agent_partners
            .iter()
            .filter(|link| link.agent_id == agent_id)
            .cloned()
            .collect())
    }

    async fn get_partner_by_id(&self, id: i64) -> Result<Partner, StorageError> {
        self.inner
            .tables
            .read()
            .partners
            .get(&id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }
}

#[async_trait]
impl EmployeeStore for MemoryStorage {
    async fn add_employee(&self, employee: NewEmployee) -> Result<Employee, StorageError> {
        self.insert_employee(employee)
    }

    async fn get_employee_by_id(&self, id: i64) -> Result<Employee, StorageError> {
        self.inner
            .tables
            .read()
            .employees
            .get(&id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn get_employee_by_user_id(&self, user_id: UserId) -> Result<Employee, StorageError> {
        self.inner
            .tables
            .read()
            .employees
            .values()
            .find(|e| e.user_id == user_id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn get_all_employees(&self, page: &Page) -> Result<Paginated<Employee>, StorageError> {
        let mut employees: Vec<Employee> =
            self.inner.tables.read().employees.values().cloned().collect();

        match page.sort_by() {
            SORT_BY_ID => employees.sort_by_key(|e| e.id),
            SORT_BY_UPDATED_AT => employees.sort_by_key(|e| (e.updated_at, e.id)),
            SORT_BY_NAME => employees.sort_by(|a, b| {
                (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
            }),
            _ => employees.sort_by_key(|e| (e.created_at, e.id)),
        }
        if page.sort_direction_desc() {
            employees.reverse();
        }

        let total_count = employees.len() as u64;
        let items = employees
            .into_iter()
            .skip((page.number() - 1).saturating_mul(page.size()))
            .take(page.size())
            .collect();

        Ok(Paginated {
            items,
            page_info: PageInfo::new(page, total_count),
        })
    }

    async fn update_employee_by_id(
        &self,
        id: i64,
        update: EmployeeUpdate,
    ) -> Result<Employee, StorageError> {
        let mut tables = self.inner.tables.write();
        if !tables.departments.contains_key(&update.department_id) {
            tracing::error!(
                department_id = update.department_id,
                "Employee::UpdateByID unknown department"
            );
            return Err(StorageError::RecordUpdateFailed);
        }
        let employee = tables
            .employees
            .get_mut(&id)
            .ok_or(StorageError::RecordNotFound)?;

        employee.first_name = update.first_name;
        employee.last_name = update.last_name;
        employee.dob = update.dob;
        employee.department_id = update.department_id;
        employee.position = update.position;
        employee.updated_at = Utc::now();
        Ok(employee.clone())
    }

    async fn delete_employee_by_id(&self, id: i64) -> Result<(), StorageError> {
        self.inner
            .tables
            .write()
            .employees
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::RecordNotFound)
    }
}

#[async_trait]
impl DepartmentStore for MemoryStorage {
    async fn add_department(&self, department: NewDepartment) -> Result<Department, StorageError> {
        let exists = self
            .inner
            .tables
            .read()
            .departments
            .values()
            .any(|d| d.department_name == department.department_name);
        if exists {
            return Err(StorageError::DuplicateRecord);
        }
        Ok(self.insert_department(department))
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Department, StorageError> {
        self.inner
            .tables
            .read()
            .departments
            .get(&id)
            .cloned()
            .ok_or(StorageError::RecordNotFound)
    }

    async fn get_all_departments(&self) -> Result<Vec<Department>, StorageError> {
        Ok(self.inner.tables.read().departments.values().cloned().collect())
    }
}
