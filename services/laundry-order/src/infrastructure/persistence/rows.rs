//! 数据库行结构与领域实体之间的转换

use chrono::{DateTime, Utc};
use laundry_errors::{AppError, AppResult};
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::domain::entities::{
    Branch, Customer, Employee, Outlet, Payment, PaymentMethod, ServicePackage, StatusHistory,
    Transaction, TransactionDetail, UserAccount,
};
use crate::domain::enums::{PaymentStatus, TransactionStatus};
use crate::domain::value_objects::{
    BranchId, CustomerId, EmployeeId, OutletId, PaymentId, PaymentMethodId, ServicePackageId,
    StatusHistoryId, TransactionDetailId, TransactionId, UserAccountId,
};

/// 存储中出现无法识别的枚举值属于数据错误
fn stored<T: std::str::FromStr<Err = AppError>>(value: &str, column: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|e: AppError| AppError::database(format!("corrupt {} value: {}", column, e.message())))
}

#[derive(Debug, FromRow)]
pub struct BranchRow {
    pub id_cabang: i64,
    pub id_brand: Option<i64>,
    pub nama_cabang: String,
    pub alamat: Option<String>,
    pub kota: Option<String>,
    pub telepon: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BranchRow> for Branch {
    fn from(row: BranchRow) -> Self {
        Self {
            id: BranchId(row.id_cabang),
            brand_id: row.id_brand,
            name: row.nama_cabang,
            address: row.alamat,
            city: row.kota,
            phone: row.telepon,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct OutletRow {
    pub id_outlet: i64,
    pub id_cabang: i64,
    pub nama_outlet: String,
    pub alamat: Option<String>,
    pub kota: Option<String>,
    pub telepon: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OutletRow> for Outlet {
    fn from(row: OutletRow) -> Self {
        Self {
            id: OutletId(row.id_outlet),
            branch_id: BranchId(row.id_cabang),
            name: row.nama_outlet,
            address: row.alamat,
            city: row.kota,
            phone: row.telepon,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct EmployeeRow {
    pub id_pegawai: i64,
    pub id_outlet: i64,
    pub nik: String,
    pub nama_lengkap: String,
    pub telepon: Option<String>,
    pub email: Option<String>,
    pub posisi: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId(row.id_pegawai),
            outlet_id: OutletId(row.id_outlet),
            nik: row.nik,
            full_name: row.nama_lengkap,
            phone: row.telepon,
            email: row.email,
            position: row.posisi,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct CustomerRow {
    pub id_pelanggan: i64,
    pub nama_lengkap: String,
    pub telepon: Option<String>,
    pub email: Option<String>,
    pub alamat: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: CustomerId(row.id_pelanggan),
            full_name: row.nama_lengkap,
            phone: row.telepon,
            email: row.email,
            address: row.alamat,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct ServicePackageRow {
    pub id_layanan: i64,
    pub id_brand: Option<i64>,
    pub id_kategori: Option<i64>,
    pub nama_layanan: String,
    pub deskripsi: Option<String>,
    pub harga: Decimal,
    pub satuan: String,
    pub durasi_pengerjaan: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ServicePackageRow> for ServicePackage {
    fn from(row: ServicePackageRow) -> Self {
        Self {
            id: ServicePackageId(row.id_layanan),
            brand_id: row.id_brand,
            category_id: row.id_kategori,
            name: row.nama_layanan,
            description: row.deskripsi,
            unit_price: row.harga,
            unit: row.satuan,
            estimated_hours: row.durasi_pengerjaan,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PaymentMethodRow {
    pub id_metode_pembayaran: i64,
    pub nama_metode: String,
    pub url: Option<String>,
    pub merchant_fee: Decimal,
    pub admin_fee: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentMethodRow> for PaymentMethod {
    fn from(row: PaymentMethodRow) -> Self {
        Self {
            id: PaymentMethodId(row.id_metode_pembayaran),
            name: row.nama_metode,
            url: row.url,
            merchant_fee: row.merchant_fee,
            admin_fee: row.admin_fee,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct UserAccountRow {
    pub id_user_access: i64,
    pub username: String,
    pub password: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub reference_level: String,
    pub reference_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        Self {
            id: UserAccountId(row.id_user_access),
            username: row.username,
            password_hash: row.password,
            role: row.role,
            is_active: row.is_active,
            last_login: row.last_login,
            reference_level: row.reference_level,
            reference_id: row.reference_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub const TRANSACTION_COLUMNS: &str = "id_transaksi, id_pelanggan, id_outlet, id_pegawai, id_user_access, \
    nomor_invoice, tanggal_masuk, tanggal_selesai, tanggal_diambil, total_harga, uang_bayar, \
    uang_kembalian, status_transaksi, status_pembayaran, metode_pembayaran, catatan, status_kode, \
    status_pesan, nomor_referensi_pembayaran, created_at, updated_at, created_by, updated_by";

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    pub id_transaksi: i64,
    pub id_pelanggan: i64,
    pub id_outlet: i64,
    pub id_pegawai: Option<i64>,
    pub id_user_access: Option<i64>,
    pub nomor_invoice: String,
    pub tanggal_masuk: DateTime<Utc>,
    pub tanggal_selesai: Option<DateTime<Utc>>,
    pub tanggal_diambil: Option<DateTime<Utc>>,
    pub total_harga: Decimal,
    pub uang_bayar: Decimal,
    pub uang_kembalian: Decimal,
    pub status_transaksi: String,
    pub status_pembayaran: String,
    pub metode_pembayaran: Option<String>,
    pub catatan: Option<String>,
    pub status_kode: Option<String>,
    pub status_pesan: Option<String>,
    pub nomor_referensi_pembayaran: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl TransactionRow {
    pub fn into_transaction(self) -> AppResult<Transaction> {
        Ok(Transaction {
            id: TransactionId(self.id_transaksi),
            customer_id: CustomerId(self.id_pelanggan),
            outlet_id: OutletId(self.id_outlet),
            employee_id: self.id_pegawai.map(EmployeeId),
            user_id: self.id_user_access.map(UserAccountId),
            invoice_number: self.nomor_invoice,
            entry_date: self.tanggal_masuk,
            completion_date: self.tanggal_selesai,
            pickup_date: self.tanggal_diambil,
            total_price: self.total_harga,
            paid_amount: self.uang_bayar,
            change_amount: self.uang_kembalian,
            status: stored::<TransactionStatus>(&self.status_transaksi, "status_transaksi")?,
            payment_status: stored::<PaymentStatus>(&self.status_pembayaran, "status_pembayaran")?,
            payment_method: self.metode_pembayaran,
            note: self.catatan,
            gateway_status_code: self.status_kode,
            gateway_status_message: self.status_pesan,
            payment_reference: self.nomor_referensi_pembayaran,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
            updated_by: self.updated_by,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionDetailRow {
    pub id_detail: i64,
    pub id_transaksi: i64,
    pub id_layanan: i64,
    pub kuantitas: Decimal,
    pub harga_satuan: Decimal,
    pub subtotal: Decimal,
    pub status_pengerjaan: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl From<TransactionDetailRow> for TransactionDetail {
    fn from(row: TransactionDetailRow) -> Self {
        Self {
            id: TransactionDetailId(row.id_detail),
            transaction_id: TransactionId(row.id_transaksi),
            service_id: ServicePackageId(row.id_layanan),
            quantity: row.kuantitas,
            unit_price: row.harga_satuan,
            subtotal: row.subtotal,
            work_status: row.status_pengerjaan,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct PaymentRow {
    pub id_pembayaran: i64,
    pub id_transaksi: i64,
    pub id_metode_pembayaran: i64,
    pub tanggal_bayar: DateTime<Utc>,
    pub jumlah_bayar: Decimal,
    pub metode_bayar: String,
    pub status_pembayaran: String,
    pub nomor_referensi_partner: Option<String>,
    pub status_code_partner: Option<String>,
    pub status_message_partner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentRow {
    pub fn into_payment(self) -> AppResult<Payment> {
        Ok(Payment {
            id: PaymentId(self.id_pembayaran),
            transaction_id: TransactionId(self.id_transaksi),
            payment_method_id: PaymentMethodId(self.id_metode_pembayaran),
            payment_date: self.tanggal_bayar,
            amount: self.jumlah_bayar,
            method: self.metode_bayar,
            payment_status: stored::<PaymentStatus>(&self.status_pembayaran, "status_pembayaran")?,
            reference_number: self.nomor_referensi_partner,
            status_code: self.status_code_partner,
            status_message: self.status_message_partner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct StatusHistoryRow {
    pub id_history: i64,
    pub id_transaksi: i64,
    pub status_lama: String,
    pub status_baru: String,
    pub waktu_perubahan: DateTime<Utc>,
    pub keterangan: String,
    pub created_at: DateTime<Utc>,
}

impl StatusHistoryRow {
    pub fn into_history(self) -> AppResult<StatusHistory> {
        Ok(StatusHistory {
            id: StatusHistoryId(self.id_history),
            transaction_id: TransactionId(self.id_transaksi),
            old_status: stored::<TransactionStatus>(&self.status_lama, "status_lama")?,
            new_status: stored::<TransactionStatus>(&self.status_baru, "status_baru")?,
            changed_at: self.waktu_perubahan,
            description: self.keterangan,
            created_at: self.created_at,
        })
    }
}
