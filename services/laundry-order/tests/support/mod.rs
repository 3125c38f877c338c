//! 内存存储：实现全部仓储接口与 Unit of Work
//!
//! `begin` 复制一份工作副本，`commit` 整体替换，`rollback` 直接丢弃。
//! 每次仓储调用都会记入 `calls`，便于断言是否访问过存储。

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use laundry_common::{PageQuery, PagedResult};
use laundry_errors::{AppError, AppResult};
use laundry_order::application::MasterData;
use laundry_order::domain::entities::*;
use laundry_order::domain::enums::*;
use laundry_order::domain::repositories::*;
use laundry_order::domain::unit_of_work::*;
use laundry_order::domain::value_objects::*;
use rust_decimal::Decimal;

/// 可注入故障的写入步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    Header,
    Detail,
    Payment,
    History,
}

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub branches: Vec<Branch>,
    pub outlets: Vec<Outlet>,
    pub employees: Vec<Employee>,
    pub customers: Vec<Customer>,
    pub packages: Vec<ServicePackage>,
    pub payment_methods: Vec<PaymentMethod>,
    pub accounts: Vec<UserAccount>,
    pub transactions: Vec<Transaction>,
    pub details: Vec<TransactionDetail>,
    pub payments: Vec<Payment>,
    pub history: Vec<StatusHistory>,
    next_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_on: Option<WriteStep>,
    /// 该步骤写入时违反表约束
    constraint_on: Option<WriteStep>,
    /// 接下来多少次表头插入返回发票号冲突
    invoice_conflicts: u32,
}

#[derive(Debug, Default)]
pub struct Counters {
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub header_attempts: usize,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    faults: Arc<Mutex<Faults>>,
    counters: Arc<Mutex<Counters>>,
    calls: Arc<Mutex<Vec<String>>>,
    serial: Arc<Mutex<i64>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn master_data(&self) -> MasterData {
        let store = Arc::new(self.clone());
        MasterData {
            branches: store.clone(),
            outlets: store.clone(),
            employees: store.clone(),
            customers: store.clone(),
            service_packages: store.clone(),
            payment_methods: store.clone(),
            user_accounts: store,
        }
    }

    pub fn tables(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }

    pub fn with_tables(&self, f: impl FnOnce(&mut Tables)) {
        f(&mut self.tables.lock().unwrap());
    }

    pub fn fail_on(&self, step: WriteStep) {
        self.faults.lock().unwrap().fail_on = Some(step);
    }

    pub fn violate_constraint_on(&self, step: WriteStep) {
        self.faults.lock().unwrap().constraint_on = Some(step);
    }

    pub fn force_invoice_conflicts(&self, times: u32) {
        self.faults.lock().unwrap().invoice_conflicts = times;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn counters(&self) -> std::sync::MutexGuard<'_, Counters> {
        self.counters.lock().unwrap()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }
}

// =============================================================================
// 种子数据
// =============================================================================

impl MemoryStore {
    pub fn add_branch(&self, id: i64) -> BranchId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.branches.push(Branch {
                id: BranchId(id),
                brand_id: Some(1),
                name: format!("Cabang {id}"),
                address: None,
                city: Some("Bandung".into()),
                phone: None,
                email: None,
                created_at: now,
                updated_at: now,
            })
        });
        BranchId(id)
    }

    pub fn add_outlet(&self, id: i64, branch: i64) -> OutletId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.outlets.push(Outlet {
                id: OutletId(id),
                branch_id: BranchId(branch),
                name: format!("Outlet {id}"),
                address: None,
                city: None,
                phone: None,
                email: None,
                created_at: now,
                updated_at: now,
            })
        });
        OutletId(id)
    }

    pub fn add_employee(&self, id: i64, outlet: i64) -> EmployeeId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.employees.push(Employee {
                id: EmployeeId(id),
                outlet_id: OutletId(outlet),
                nik: format!("NIK{id}"),
                full_name: format!("Pegawai {id}"),
                phone: None,
                email: None,
                position: Some("kasir".into()),
                is_active: true,
                created_at: now,
                updated_at: now,
            })
        });
        EmployeeId(id)
    }

    pub fn add_customer(&self, id: i64) -> CustomerId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.customers.push(Customer {
                id: CustomerId(id),
                full_name: format!("Pelanggan {id}"),
                phone: Some("0812".into()),
                email: None,
                address: None,
                created_at: now,
                updated_at: now,
            })
        });
        CustomerId(id)
    }

    pub fn add_package(&self, id: i64, unit_price: Decimal) -> ServicePackageId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.packages.push(ServicePackage {
                id: ServicePackageId(id),
                brand_id: Some(1),
                category_id: None,
                name: "Cuci Kering".into(),
                description: None,
                unit_price,
                unit: "kg".into(),
                estimated_hours: Some(24),
                created_at: now,
                updated_at: now,
            })
        });
        ServicePackageId(id)
    }

    pub fn add_payment_method(&self, id: i64, name: &str) -> PaymentMethodId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.payment_methods.push(PaymentMethod {
                id: PaymentMethodId(id),
                name: name.into(),
                url: None,
                merchant_fee: Decimal::ZERO,
                admin_fee: Decimal::ZERO,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
        });
        PaymentMethodId(id)
    }

    pub fn add_account(&self, id: i64, level: &str, reference_id: i64) -> UserAccountId {
        let now = Utc::now();
        self.with_tables(|t| {
            t.accounts.push(UserAccount {
                id: UserAccountId(id),
                username: format!("user{id}"),
                password_hash: "hash".into(),
                role: "admin".into(),
                is_active: true,
                last_login: None,
                reference_level: level.into(),
                reference_id,
                created_at: now,
                updated_at: now,
            })
        });
        UserAccountId(id)
    }
}

pub const BRANCH: i64 = 1;
pub const OTHER_BRANCH: i64 = 2;
pub const OUTLET: i64 = 10;
pub const OTHER_OUTLET: i64 = 20;
pub const EMPLOYEE: i64 = 100;
pub const PACKAGE: i64 = 300;
pub const CASH: i64 = 400;
pub const CUSTOMER: i64 = 500;

pub const OUTLET_USER: i64 = 1;
pub const EMPLOYEE_USER: i64 = 2;
pub const BRANCH_USER: i64 = 3;

/// 两个分店、各一个门店，一名员工，三种层级的账号
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.add_branch(BRANCH);
    store.add_branch(OTHER_BRANCH);
    store.add_outlet(OUTLET, BRANCH);
    store.add_outlet(OTHER_OUTLET, OTHER_BRANCH);
    store.add_employee(EMPLOYEE, OUTLET);
    store.add_package(PACKAGE, Decimal::from(15_000));
    store.add_payment_method(CASH, "Tunai");
    store.add_customer(CUSTOMER);
    store.add_account(OUTLET_USER, "outlet", OUTLET);
    store.add_account(EMPLOYEE_USER, "employee", EMPLOYEE);
    store.add_account(BRANCH_USER, "branch", BRANCH);
    store
}

pub fn actor(user_id: i64) -> Actor {
    Actor::new(UserAccountId(user_id), format!("user{user_id}"), "admin")
}

// =============================================================================
// 通用 CRUD 辅助
// =============================================================================

trait Keyed {
    fn key(&self) -> i64;
    fn set_key(&mut self, key: i64);
}

macro_rules! keyed {
    ($($entity:ty),*) => {
        $(impl Keyed for $entity {
            fn key(&self) -> i64 {
                self.id.0
            }
            fn set_key(&mut self, key: i64) {
                self.id.0 = key;
            }
        })*
    };
}

keyed!(Branch, Outlet, Employee, Customer, ServicePackage, PaymentMethod, UserAccount);

fn create_in<T: Keyed + Clone>(rows: &mut Vec<T>, id: i64, item: &T) -> T {
    let mut item = item.clone();
    item.set_key(id);
    rows.push(item.clone());
    item
}

fn find_in<T: Keyed + Clone>(rows: &[T], id: i64) -> Option<T> {
    rows.iter().find(|r| r.key() == id).cloned()
}

fn page_of<T: Clone>(rows: &[T], query: &PageQuery) -> PagedResult<T> {
    let items = rows
        .iter()
        .skip(query.offset as usize)
        .take(query.limit as usize)
        .cloned()
        .collect();
    PagedResult::new(items, rows.len() as u64, rows.len() as u64)
}

fn update_in<T: Keyed + Clone>(rows: &mut [T], item: &T) -> AppResult<()> {
    let row = rows
        .iter_mut()
        .find(|r| r.key() == item.key())
        .ok_or_else(|| AppError::not_found("not found"))?;
    *row = item.clone();
    Ok(())
}

fn delete_in<T: Keyed>(rows: &mut Vec<T>, id: i64) -> AppResult<()> {
    let before = rows.len();
    rows.retain(|r| r.key() != id);
    if rows.len() == before {
        return Err(AppError::not_found("not found"));
    }
    Ok(())
}

// =============================================================================
// 主数据仓储
// =============================================================================

#[async_trait]
impl BranchRepository for MemoryStore {
    async fn create(&self, branch: &Branch) -> AppResult<Branch> {
        self.record("branches.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.branches, id, branch))
    }

    async fn find_by_id(&self, id: BranchId) -> AppResult<Option<Branch>> {
        self.record("branches.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().branches, id.0))
    }

    async fn find_all(&self, filter: &BranchFilter) -> AppResult<Vec<Branch>> {
        self.record("branches.find_all");
        let t = self.tables.lock().unwrap();
        Ok(t.branches
            .iter()
            .filter(|b| filter.brand_id.is_none_or(|brand| b.brand_id == Some(brand)))
            .cloned()
            .collect())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Branch>> {
        self.record("branches.find_page");
        Ok(page_of(&self.tables.lock().unwrap().branches, query))
    }

    async fn update(&self, branch: &Branch) -> AppResult<()> {
        self.record("branches.update");
        update_in(&mut self.tables.lock().unwrap().branches, branch)
    }

    async fn delete(&self, id: BranchId) -> AppResult<()> {
        self.record("branches.delete");
        delete_in(&mut self.tables.lock().unwrap().branches, id.0)
    }
}

#[async_trait]
impl OutletRepository for MemoryStore {
    async fn create(&self, outlet: &Outlet) -> AppResult<Outlet> {
        self.record("outlets.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.outlets, id, outlet))
    }

    async fn find_by_id(&self, id: OutletId) -> AppResult<Option<Outlet>> {
        self.record("outlets.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().outlets, id.0))
    }

    async fn find_all(&self, filter: &OutletFilter) -> AppResult<Vec<Outlet>> {
        self.record("outlets.find_all");
        let t = self.tables.lock().unwrap();
        Ok(t.outlets.iter().filter(|o| filter.matches(o)).cloned().collect())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Outlet>> {
        self.record("outlets.find_page");
        Ok(page_of(&self.tables.lock().unwrap().outlets, query))
    }

    async fn update(&self, outlet: &Outlet) -> AppResult<()> {
        self.record("outlets.update");
        update_in(&mut self.tables.lock().unwrap().outlets, outlet)
    }

    async fn delete(&self, id: OutletId) -> AppResult<()> {
        self.record("outlets.delete");
        delete_in(&mut self.tables.lock().unwrap().outlets, id.0)
    }
}

#[async_trait]
impl EmployeeRepository for MemoryStore {
    async fn create(&self, employee: &Employee) -> AppResult<Employee> {
        self.record("employees.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.employees, id, employee))
    }

    async fn find_by_id(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        self.record("employees.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().employees, id.0))
    }

    async fn find_all(&self, filter: &EmployeeFilter) -> AppResult<Vec<Employee>> {
        self.record("employees.find_all");
        let t = self.tables.lock().unwrap();
        Ok(t.employees
            .iter()
            .filter(|e| filter.outlet_id.is_none_or(|o| e.outlet_id == o))
            .cloned()
            .collect())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Employee>> {
        self.record("employees.find_page");
        Ok(page_of(&self.tables.lock().unwrap().employees, query))
    }

    async fn update(&self, employee: &Employee) -> AppResult<()> {
        self.record("employees.update");
        update_in(&mut self.tables.lock().unwrap().employees, employee)
    }

    async fn delete(&self, id: EmployeeId) -> AppResult<()> {
        self.record("employees.delete");
        delete_in(&mut self.tables.lock().unwrap().employees, id.0)
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn create(&self, customer: &Customer) -> AppResult<Customer> {
        self.record("customers.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.customers, id, customer))
    }

    async fn find_by_id(&self, id: CustomerId) -> AppResult<Option<Customer>> {
        self.record("customers.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().customers, id.0))
    }

    async fn exists(&self, id: CustomerId) -> AppResult<bool> {
        self.record("customers.exists");
        Ok(find_in(&self.tables.lock().unwrap().customers, id.0).is_some())
    }

    async fn find_all(&self) -> AppResult<Vec<Customer>> {
        self.record("customers.find_all");
        Ok(self.tables.lock().unwrap().customers.clone())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Customer>> {
        self.record("customers.find_page");
        Ok(page_of(&self.tables.lock().unwrap().customers, query))
    }

    async fn update(&self, customer: &Customer) -> AppResult<()> {
        self.record("customers.update");
        update_in(&mut self.tables.lock().unwrap().customers, customer)
    }

    async fn delete(&self, id: CustomerId) -> AppResult<()> {
        self.record("customers.delete");
        delete_in(&mut self.tables.lock().unwrap().customers, id.0)
    }
}

#[async_trait]
impl ServicePackageRepository for MemoryStore {
    async fn create(&self, package: &ServicePackage) -> AppResult<ServicePackage> {
        self.record("service_packages.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.packages, id, package))
    }

    async fn find_by_id(&self, id: ServicePackageId) -> AppResult<Option<ServicePackage>> {
        self.record("service_packages.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().packages, id.0))
    }

    async fn find_all(&self, filter: &ServicePackageFilter) -> AppResult<Vec<ServicePackage>> {
        self.record("service_packages.find_all");
        let t = self.tables.lock().unwrap();
        Ok(t.packages
            .iter()
            .filter(|p| filter.brand_id.is_none_or(|b| p.brand_id == Some(b)))
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == Some(c)))
            .cloned()
            .collect())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<ServicePackage>> {
        self.record("service_packages.find_page");
        Ok(page_of(&self.tables.lock().unwrap().packages, query))
    }

    async fn update(&self, package: &ServicePackage) -> AppResult<()> {
        self.record("service_packages.update");
        update_in(&mut self.tables.lock().unwrap().packages, package)
    }

    async fn delete(&self, id: ServicePackageId) -> AppResult<()> {
        self.record("service_packages.delete");
        delete_in(&mut self.tables.lock().unwrap().packages, id.0)
    }
}

#[async_trait]
impl PaymentMethodRepository for MemoryStore {
    async fn create(&self, method: &PaymentMethod) -> AppResult<PaymentMethod> {
        self.record("payment_methods.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.payment_methods, id, method))
    }

    async fn find_by_id(&self, id: PaymentMethodId) -> AppResult<Option<PaymentMethod>> {
        self.record("payment_methods.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().payment_methods, id.0))
    }

    async fn find_all(&self) -> AppResult<Vec<PaymentMethod>> {
        self.record("payment_methods.find_all");
        Ok(self.tables.lock().unwrap().payment_methods.clone())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<PaymentMethod>> {
        self.record("payment_methods.find_page");
        Ok(page_of(&self.tables.lock().unwrap().payment_methods, query))
    }

    async fn update(&self, method: &PaymentMethod) -> AppResult<()> {
        self.record("payment_methods.update");
        update_in(&mut self.tables.lock().unwrap().payment_methods, method)
    }

    async fn delete(&self, id: PaymentMethodId) -> AppResult<()> {
        self.record("payment_methods.delete");
        delete_in(&mut self.tables.lock().unwrap().payment_methods, id.0)
    }
}

#[async_trait]
impl UserAccountRepository for MemoryStore {
    async fn create(&self, account: &UserAccount) -> AppResult<UserAccount> {
        self.record("user_accounts.create");
        let mut t = self.tables.lock().unwrap();
        let id = t.next_id();
        Ok(create_in(&mut t.accounts, id, account))
    }

    async fn find_by_id(&self, id: UserAccountId) -> AppResult<Option<UserAccount>> {
        self.record("user_accounts.find_by_id");
        Ok(find_in(&self.tables.lock().unwrap().accounts, id.0))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        self.record("user_accounts.find_by_username");
        let t = self.tables.lock().unwrap();
        Ok(t.accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<UserAccount>> {
        self.record("user_accounts.find_all");
        Ok(self.tables.lock().unwrap().accounts.clone())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<UserAccount>> {
        self.record("user_accounts.find_page");
        Ok(page_of(&self.tables.lock().unwrap().accounts, query))
    }

    async fn update(&self, account: &UserAccount) -> AppResult<()> {
        self.record("user_accounts.update");
        update_in(&mut self.tables.lock().unwrap().accounts, account)
    }

    async fn delete(&self, id: UserAccountId) -> AppResult<()> {
        self.record("user_accounts.delete");
        delete_in(&mut self.tables.lock().unwrap().accounts, id.0)
    }
}

// =============================================================================
// 交易读仓储
// =============================================================================

#[async_trait]
impl TransactionRepository for MemoryStore {
    async fn find_by_id(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        self.record("transactions.find_by_id");
        let t = self.tables.lock().unwrap();
        Ok(t.transactions.iter().find(|tx| tx.id == id).cloned())
    }

    async fn find_page(&self, query: &PageQuery) -> AppResult<PagedResult<Transaction>> {
        self.record("transactions.find_page");
        let t = self.tables.lock().unwrap();
        let matching: Vec<Transaction> = t
            .transactions
            .iter()
            .filter(|tx| {
                query.search.as_deref().is_none_or(|s| {
                    tx.invoice_number.to_lowercase().contains(&s.to_lowercase())
                })
            })
            .cloned()
            .collect();
        let items = matching
            .iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(PagedResult::new(items, t.transactions.len() as u64, matching.len() as u64))
    }

    async fn find_by_outlet(&self, outlet_id: OutletId) -> AppResult<Vec<Transaction>> {
        self.record("transactions.find_by_outlet");
        let t = self.tables.lock().unwrap();
        Ok(t.transactions.iter().filter(|tx| tx.outlet_id == outlet_id).cloned().collect())
    }

    async fn find_details(&self, id: TransactionId) -> AppResult<Vec<TransactionDetail>> {
        self.record("transactions.find_details");
        let t = self.tables.lock().unwrap();
        Ok(t.details.iter().filter(|d| d.transaction_id == id).cloned().collect())
    }

    async fn find_payment(&self, id: TransactionId) -> AppResult<Option<Payment>> {
        self.record("transactions.find_payment");
        let t = self.tables.lock().unwrap();
        Ok(t.payments.iter().find(|p| p.transaction_id == id).cloned())
    }

    async fn find_history(&self, id: TransactionId) -> AppResult<Vec<StatusHistory>> {
        self.record("transactions.find_history");
        let t = self.tables.lock().unwrap();
        Ok(t.history.iter().filter(|h| h.transaction_id == id).cloned().collect())
    }
}

// =============================================================================
// Unit of Work
// =============================================================================

#[async_trait]
impl UnitOfWorkFactory for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        self.record("uow.begin");
        self.counters().begins += 1;
        let working = self.tables();
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            working: Mutex::new(working),
        }))
    }
}

pub struct MemoryUnitOfWork {
    store: MemoryStore,
    working: Mutex<Tables>,
}

impl MemoryUnitOfWork {
    fn fault(&self, step: WriteStep) -> AppResult<()> {
        let faults = self.store.faults.lock().unwrap();
        if faults.fail_on == Some(step) {
            return Err(AppError::database(format!("injected failure at {:?}", step)));
        }
        // 与 PostgreSQL 写入映射的结果一致
        if faults.constraint_on == Some(step) {
            return Err(AppError::database(format!(
                "Constraint violation chk_{:?} (23514): new row violates check constraint",
                step
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionWriter for MemoryUnitOfWork {
    async fn next_invoice_serial(&self) -> AppResult<i64> {
        let mut serial = self.store.serial.lock().unwrap();
        *serial += 1;
        Ok(*serial)
    }

    async fn insert(&self, new: &NewTransaction) -> AppResult<Transaction> {
        self.store.counters().header_attempts += 1;
        self.fault(WriteStep::Header)?;
        {
            let mut faults = self.store.faults.lock().unwrap();
            if faults.invoice_conflicts > 0 {
                faults.invoice_conflicts -= 1;
                return Err(AppError::conflict("invoice number already exists"));
            }
        }

        let mut t = self.working.lock().unwrap();
        if t.transactions.iter().any(|tx| tx.invoice_number == new.invoice_number) {
            return Err(AppError::conflict("invoice number already exists"));
        }
        let transaction = Transaction {
            id: TransactionId(t.next_id()),
            customer_id: new.customer_id,
            outlet_id: new.outlet_id,
            employee_id: new.employee_id,
            user_id: new.user_id,
            invoice_number: new.invoice_number.clone(),
            entry_date: new.entry_date,
            completion_date: None,
            pickup_date: None,
            total_price: new.total_price,
            paid_amount: Decimal::ZERO,
            change_amount: Decimal::ZERO,
            status: new.status,
            payment_status: new.payment_status,
            payment_method: new.payment_method.clone(),
            note: new.note.clone(),
            gateway_status_code: None,
            gateway_status_message: None,
            payment_reference: None,
            created_at: new.entry_date,
            updated_at: new.entry_date,
            created_by: Some(new.created_by.clone()),
            updated_by: Some(new.created_by.clone()),
        };
        t.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn find_for_update(&self, id: TransactionId) -> AppResult<Option<Transaction>> {
        let t = self.working.lock().unwrap();
        Ok(t.transactions.iter().find(|tx| tx.id == id).cloned())
    }

    async fn update(&self, transaction: &Transaction) -> AppResult<()> {
        let mut t = self.working.lock().unwrap();
        let row = t
            .transactions
            .iter_mut()
            .find(|tx| tx.id == transaction.id)
            .ok_or_else(|| AppError::not_found("transaction not found"))?;
        *row = transaction.clone();
        Ok(())
    }
}

#[async_trait]
impl TransactionDetailWriter for MemoryUnitOfWork {
    async fn insert(&self, new: &NewTransactionDetail) -> AppResult<TransactionDetail> {
        self.fault(WriteStep::Detail)?;
        let mut t = self.working.lock().unwrap();
        let detail = TransactionDetail {
            id: TransactionDetailId(t.next_id()),
            transaction_id: new.transaction_id,
            service_id: new.service_id,
            quantity: new.quantity,
            unit_price: new.unit_price,
            subtotal: new.subtotal,
            work_status: None,
            created_at: new.created_at,
            updated_at: new.created_at,
            created_by: Some(new.created_by.clone()),
            updated_by: Some(new.created_by.clone()),
        };
        t.details.push(detail.clone());
        Ok(detail)
    }
}

#[async_trait]
impl PaymentWriter for MemoryUnitOfWork {
    async fn insert(&self, new: &NewPayment) -> AppResult<Payment> {
        self.fault(WriteStep::Payment)?;
        let mut t = self.working.lock().unwrap();
        let payment = Payment {
            id: PaymentId(t.next_id()),
            transaction_id: new.transaction_id,
            payment_method_id: new.payment_method_id,
            payment_date: new.payment_date,
            amount: new.amount,
            method: new.method.clone(),
            payment_status: PaymentStatus::Unpaid,
            reference_number: None,
            status_code: None,
            status_message: None,
            created_at: new.payment_date,
            updated_at: new.payment_date,
        };
        t.payments.push(payment.clone());
        Ok(payment)
    }

    async fn find_by_transaction(&self, id: TransactionId) -> AppResult<Option<Payment>> {
        let t = self.working.lock().unwrap();
        Ok(t.payments.iter().find(|p| p.transaction_id == id).cloned())
    }

    async fn update(&self, payment: &Payment) -> AppResult<()> {
        let mut t = self.working.lock().unwrap();
        let row = t
            .payments
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or_else(|| AppError::not_found("payment not found"))?;
        *row = payment.clone();
        Ok(())
    }
}

#[async_trait]
impl StatusHistoryWriter for MemoryUnitOfWork {
    async fn append(&self, new: &NewStatusHistory) -> AppResult<StatusHistory> {
        self.fault(WriteStep::History)?;
        let mut t = self.working.lock().unwrap();
        let entry = StatusHistory {
            id: StatusHistoryId(t.next_id()),
            transaction_id: new.transaction_id,
            old_status: new.old_status,
            new_status: new.new_status,
            changed_at: new.changed_at,
            description: new.description.clone(),
            created_at: new.changed_at,
        };
        t.history.push(entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn transactions(&self) -> &dyn TransactionWriter {
        self
    }

    fn details(&self) -> &dyn TransactionDetailWriter {
        self
    }

    fn payments(&self) -> &dyn PaymentWriter {
        self
    }

    fn status_history(&self) -> &dyn StatusHistoryWriter {
        self
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.store.record("uow.commit");
        self.store.counters().commits += 1;
        let working = self.working.into_inner().unwrap();
        *self.store.tables.lock().unwrap() = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.store.record("uow.rollback");
        self.store.counters().rollbacks += 1;
        Ok(())
    }
}
