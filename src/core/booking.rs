//! Booking business logic.
//!
//! This module covers creating a booking together with its first invoice,
//! changing booking status, and the joined overview shown for one booking.
//! Cancelling a booking never touches its invoices, tasks or itineraries.

use crate::{
    core::{search::client_name, store::DataStore, store::Snapshot},
    errors::{Error, Result},
    models::{
        Booking, BookingStatus, EntityKind, Expense, Invoice, InvoiceStatus, Itinerary,
        NewBooking, NewInvoice, Task,
    },
};
use chrono::Duration;
use rust_decimal::Decimal;
use tracing::{error, info};

/// Result of [`create_booking`].
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBooking {
    /// The new booking
    pub booking: Booking,
    /// Invoice for the full amount, absent for zero-value bookings
    pub invoice: Option<Invoice>,
}

/// Everything linked to one booking.
#[derive(Debug, Clone)]
pub struct BookingOverview {
    /// The booking itself
    pub booking: Booking,
    /// Client name, or a placeholder if the client was deleted
    pub client_name: String,
    /// Expenses recorded against the booking
    pub expenses: Vec<Expense>,
    /// Invoices issued against the booking
    pub invoices: Vec<Invoice>,
    /// Tasks linked to the booking
    pub tasks: Vec<Task>,
    /// Itineraries linked to the booking
    pub itineraries: Vec<Itinerary>,
    /// Sum of linked expense amounts
    pub total_expenses: Decimal,
    /// `total_amount - paid_amount`
    pub balance_due: Decimal,
}

/// Creates a new booking and, when it has a value, an unpaid invoice for the
/// full amount.
///
/// The booking always starts `pending` with nothing paid, whatever the draft
/// says. The invoice is due `invoice_net_days` (from the store's settings)
/// after creation. Both records are written under one writer lock; if the
/// invoice cannot be stored the booking is removed again and the error is
/// returned.
pub async fn create_booking(store: &DataStore, draft: NewBooking) -> Result<CreatedBooking> {
    let terms = net_terms(store.config().invoice_net_days)?;
    let guard = store.lock_writer().await?;

    let booking = store
        .add_locked(
            &guard,
            NewBooking {
                status: BookingStatus::Pending,
                paid_amount: Decimal::ZERO,
                ..draft
            },
        )
        .await?;

    if booking.total_amount <= Decimal::ZERO {
        info!("Created booking '{}' without invoice", booking.trip_name);
        return Ok(CreatedBooking {
            booking,
            invoice: None,
        });
    }

    let invoice = NewInvoice {
        booking_id: booking.id.clone(),
        client_id: booking.client_id.clone(),
        amount: booking.total_amount,
        status: InvoiceStatus::Unpaid,
        due_date: booking.created_at + terms,
    };
    match store.add_locked(&guard, invoice).await {
        Ok(invoice) => {
            info!(
                "Created booking '{}' with invoice {} for {}",
                booking.trip_name,
                invoice.reference(),
                invoice.amount
            );
            Ok(CreatedBooking {
                booking,
                invoice: Some(invoice),
            })
        }
        Err(e) => {
            error!(
                "Failed to create invoice for booking '{}', removing booking: {}",
                booking.id, e
            );
            if let Err(rollback) = store.remove_locked::<Booking>(&guard, &booking.id).await {
                error!("Failed to remove booking '{}': {}", booking.id, rollback);
            }
            Err(e)
        }
    }
}

fn net_terms(days: i64) -> Result<Duration> {
    Duration::try_days(days).ok_or_else(|| Error::Config {
        message: format!("invoice_net_days out of range: {days}"),
    })
}

/// Changes a booking's status.
pub async fn set_booking_status(
    store: &DataStore,
    booking_id: &str,
    status: BookingStatus,
) -> Result<Booking> {
    let booking = store
        .modify::<Booking, _>(booking_id, |b| Ok(Booking { status, ..b.clone() }))
        .await?;
    info!("Booking '{}' is now {}", booking.trip_name, status);
    Ok(booking)
}

/// Bookings that are not cancelled.
pub fn active_bookings(snapshot: &Snapshot) -> impl Iterator<Item = &Booking> {
    snapshot.bookings.iter().filter(|b| b.status.is_active())
}

/// Builds the overview for `booking_id`.
pub fn booking_overview(snapshot: &Snapshot, booking_id: &str) -> Result<BookingOverview> {
    let booking = snapshot
        .booking(booking_id)
        .cloned()
        .ok_or_else(|| Error::not_found(EntityKind::Booking, booking_id))?;

    let linked = |id: Option<&String>| id.is_some_and(|id| id == booking_id);
    let expenses: Vec<Expense> = snapshot
        .expenses
        .iter()
        .filter(|e| linked(e.booking_id.as_ref()))
        .cloned()
        .collect();
    let invoices = snapshot
        .invoices
        .iter()
        .filter(|i| i.booking_id == booking_id)
        .cloned()
        .collect();
    let tasks = snapshot
        .tasks
        .iter()
        .filter(|t| linked(t.booking_id.as_ref()))
        .cloned()
        .collect();
    let itineraries = snapshot
        .itineraries
        .iter()
        .filter(|i| linked(i.booking_id.as_ref()))
        .cloned()
        .collect();

    let total_expenses = expenses.iter().map(|e| e.amount).sum();
    Ok(BookingOverview {
        client_name: client_name(snapshot, &booking.client_id).to_string(),
        balance_due: booking.balance_due(),
        booking,
        expenses,
        invoices,
        tasks,
        itineraries,
        total_expenses,
    })
}
