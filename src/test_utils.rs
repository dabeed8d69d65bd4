//! Shared test utilities for `TourOps`.
//!
//! This module provides helpers for setting up stores over in-memory backing
//! and for building drafts with sensible defaults.

use crate::{
    core::store::DataStore,
    errors::{Error, Result},
    models::{
        BookingStatus, InvoiceStatus, NewBooking, NewClient, NewExpense, NewInvoice, NewTask,
        TaskCategory, TaskStatus,
    },
    storage::{BackingStore, MemoryStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

/// Initializes tracing output for tests. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tourops=trace")
        .with_test_writer()
        .try_init();
}

/// Creates a loaded store over a fresh [`MemoryStore`].
/// This is the standard setup for store and derivation tests.
pub async fn setup_test_store() -> Result<DataStore> {
    let (store, _) = setup_store_with_backing().await?;
    Ok(store)
}

/// Like [`setup_test_store`], but also hands back the backing so tests can
/// inspect what was persisted or reopen it.
pub async fn setup_store_with_backing() -> Result<(DataStore, Arc<MemoryStore>)> {
    let backing = Arc::new(MemoryStore::new());
    let store = DataStore::new(backing.clone());
    store.reload().await?;
    Ok((store, backing))
}

/// A client draft with only a name.
pub fn new_client(name: &str) -> NewClient {
    NewClient {
        name: name.to_string(),
        ..Default::default()
    }
}

/// A booking draft with sensible defaults.
///
/// # Defaults
/// * `destination`: "Lisbon"
/// * `end_date`: seven days after `start_date`
/// * `pax`: 2
/// * `status`: pending, nothing paid
/// * `total_amount`: 1000
pub fn new_booking(client_id: &str, trip_name: &str, start_date: DateTime<Utc>) -> NewBooking {
    NewBooking {
        client_id: client_id.to_string(),
        trip_name: trip_name.to_string(),
        destination: "Lisbon".to_string(),
        start_date,
        end_date: start_date + Duration::days(7),
        pax: 2,
        status: BookingStatus::Pending,
        total_amount: Decimal::from(1000),
        paid_amount: Decimal::ZERO,
        requirements: String::new(),
    }
}

/// An unpaid invoice draft.
pub fn new_invoice(
    booking_id: &str,
    client_id: &str,
    amount: Decimal,
    due_date: DateTime<Utc>,
) -> NewInvoice {
    NewInvoice {
        booking_id: booking_id.to_string(),
        client_id: client_id.to_string(),
        amount,
        status: InvoiceStatus::Unpaid,
        due_date,
    }
}

/// A task draft in the given column, not linked to a booking.
pub fn new_task(title: &str, status: TaskStatus, due_date: DateTime<Utc>) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        assignee: String::new(),
        status,
        category: TaskCategory::Other,
        booking_id: None,
        due_date,
    }
}

/// An expense draft linked to `booking_id`.
pub fn new_expense(booking_id: &str, amount: Decimal) -> NewExpense {
    NewExpense {
        booking_id: Some(booking_id.to_string()),
        category: "misc".to_string(),
        description: String::new(),
        amount,
        date: Utc::now(),
    }
}

/// Backing store whose reads and writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    failing_key: Mutex<Option<String>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fails writes to `key` only; `None` clears it.
    pub fn fail_writes_to(&self, key: Option<&str>) {
        if let Ok(mut failing) = self.failing_key.lock() {
            *failing = key.map(str::to_string);
        }
    }

    fn write_fails(&self, key: &str) -> bool {
        self.fail_writes.load(Ordering::SeqCst)
            || self
                .failing_key
                .lock()
                .is_ok_and(|failing| failing.as_deref() == Some(key))
    }
}

#[async_trait]
impl BackingStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::Database(DbErr::Custom(format!(
                "simulated read failure for '{key}'"
            ))));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        if self.write_fails(key) {
            return Err(Error::Database(DbErr::Custom(format!(
                "simulated write failure for '{key}'"
            ))));
        }
        self.inner.set(key, value).await
    }
}
