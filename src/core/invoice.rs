//! Invoice business logic.
//!
//! Changing an invoice between paid and unpaid is the one operation that must
//! keep two collections in step: the linked booking's `paid_amount` moves by
//! the invoice amount in the same direction.

use crate::{
    core::store::{DataStore, Snapshot},
    errors::{Error, Result},
    models::{Booking, EntityKind, Invoice, InvoiceStatus},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, warn};

/// An invoice is overdue when it is unpaid and its due date has passed.
#[must_use]
pub fn is_overdue(invoice: &Invoice, now: DateTime<Utc>) -> bool {
    invoice.status == InvoiceStatus::Unpaid && invoice.due_date < now
}

/// Every overdue invoice, in stored order.
pub fn overdue_invoices(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<&Invoice> {
    snapshot
        .invoices
        .iter()
        .filter(|i| is_overdue(i, now))
        .collect()
}

/// Invoices still awaiting payment, overdue or not.
pub fn pending_invoices(snapshot: &Snapshot) -> Vec<&Invoice> {
    snapshot
        .invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Unpaid)
        .collect()
}

/// Invoices issued against `booking_id`.
pub fn invoices_for_booking<'a>(snapshot: &'a Snapshot, booking_id: &str) -> Vec<&'a Invoice> {
    snapshot
        .invoices
        .iter()
        .filter(|i| i.booking_id == booking_id)
        .collect()
}

/// Marks an invoice paid or unpaid and adjusts the linked booking.
///
/// Paying adds the invoice amount to the booking's `paid_amount`; reverting to
/// unpaid subtracts it again, never going below zero. Setting the status the
/// invoice already has changes nothing. A booking that no longer exists is
/// skipped with a warning.
///
/// Both writes happen under the store's writer lock. If the booking write
/// fails the invoice is put back to its previous status before the error is
/// returned.
///
/// # Returns
/// The invoice as stored after the change
pub async fn set_invoice_status(
    store: &DataStore,
    invoice_id: &str,
    status: InvoiceStatus,
) -> Result<Invoice> {
    let guard = store.lock_writer().await?;

    let (invoice, booking) = {
        let snapshot = store.read().await;
        let invoice = snapshot
            .find::<Invoice>(invoice_id)
            .cloned()
            .ok_or_else(|| Error::not_found(EntityKind::Invoice, invoice_id))?;
        let booking = snapshot.booking(&invoice.booking_id).cloned();
        (invoice, booking)
    };

    if invoice.status == status {
        return Ok(invoice);
    }

    let previous = invoice.clone();
    let updated = Invoice { status, ..invoice };
    store.update_locked(&guard, updated.clone()).await?;

    let Some(booking) = booking else {
        warn!(
            "Invoice '{}' references missing booking '{}', paid amount not adjusted",
            updated.id, updated.booking_id
        );
        return Ok(updated);
    };

    let booking = Booking {
        paid_amount: adjusted_paid_amount(booking.paid_amount, updated.amount, status),
        ..booking
    };
    if let Err(e) = store.update_locked(&guard, booking).await {
        error!(
            "Failed to update booking '{}' for invoice '{}', reverting invoice: {}",
            updated.booking_id, updated.id, e
        );
        if let Err(revert) = store.update_locked(&guard, previous).await {
            error!("Failed to revert invoice '{}': {}", updated.id, revert);
        }
        return Err(e);
    }

    info!(
        "Invoice {} marked {} ({})",
        updated.reference(),
        status,
        updated.amount
    );
    Ok(updated)
}

/// Marks an invoice paid. See [`set_invoice_status`].
pub async fn mark_paid(store: &DataStore, invoice_id: &str) -> Result<Invoice> {
    set_invoice_status(store, invoice_id, InvoiceStatus::Paid).await
}

/// Reverts an invoice to unpaid. See [`set_invoice_status`].
pub async fn mark_unpaid(store: &DataStore, invoice_id: &str) -> Result<Invoice> {
    set_invoice_status(store, invoice_id, InvoiceStatus::Unpaid).await
}

fn adjusted_paid_amount(paid: Decimal, amount: Decimal, status: InvoiceStatus) -> Decimal {
    match status {
        InvoiceStatus::Paid => paid + amount,
        InvoiceStatus::Unpaid => (paid - amount).max(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    async fn booking_with_invoice(store: &DataStore, amount: Decimal) -> Result<(Booking, Invoice)> {
        let client = store.add(new_client("Ana")).await?;
        let booking = store
            .add(new_booking(&client.id, "Marrakech", Utc::now()))
            .await?;
        let invoice = store
            .add(new_invoice(
                &booking.id,
                &client.id,
                amount,
                Utc::now() + Duration::days(14),
            ))
            .await?;
        Ok((booking, invoice))
    }

    #[test]
    fn test_unpaid_past_due_is_overdue() {
        let now = Utc::now();
        let mut invoice = Invoice {
            id: "i1".to_string(),
            booking_id: "b1".to_string(),
            client_id: "c1".to_string(),
            amount: dec!(100),
            status: InvoiceStatus::Unpaid,
            due_date: now - Duration::days(1),
            created_at: now - Duration::days(15),
        };
        assert!(is_overdue(&invoice, now));

        invoice.status = InvoiceStatus::Paid;
        assert!(!is_overdue(&invoice, now));

        invoice.status = InvoiceStatus::Unpaid;
        invoice.due_date = now + Duration::days(1);
        assert!(!is_overdue(&invoice, now));
    }

    #[tokio::test]
    async fn test_paying_invoice_increases_booking_paid_amount() -> Result<()> {
        let store = setup_test_store().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(500)).await?;

        let paid = mark_paid(&store, &invoice.id).await?;
        assert_eq!(paid.status, InvoiceStatus::Paid);

        let booking = store.get::<Booking>(&booking.id).await.unwrap();
        assert_eq!(booking.paid_amount, dec!(500));
        assert_eq!(booking.balance_due(), dec!(500));
        Ok(())
    }

    #[tokio::test]
    async fn test_unpaying_invoice_reverts_booking_paid_amount() -> Result<()> {
        let store = setup_test_store().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(500)).await?;

        mark_paid(&store, &invoice.id).await?;
        mark_unpaid(&store, &invoice.id).await?;

        let booking = store.get::<Booking>(&booking.id).await.unwrap();
        assert_eq!(booking.paid_amount, dec!(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_repeating_status_does_not_double_count() -> Result<()> {
        let store = setup_test_store().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(250)).await?;

        mark_paid(&store, &invoice.id).await?;
        mark_paid(&store, &invoice.id).await?;

        let booking = store.get::<Booking>(&booking.id).await.unwrap();
        assert_eq!(booking.paid_amount, dec!(250));
        Ok(())
    }

    #[tokio::test]
    async fn test_unpay_never_goes_negative() -> Result<()> {
        let store = setup_test_store().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(300)).await?;
        mark_paid(&store, &invoice.id).await?;

        // Someone corrected the paid amount by hand in between
        let mut edited = store.get::<Booking>(&booking.id).await.unwrap();
        edited.paid_amount = dec!(100);
        store.update(edited).await?;

        mark_unpaid(&store, &invoice.id).await?;
        let booking = store.get::<Booking>(&booking.id).await.unwrap();
        assert_eq!(booking.paid_amount, dec!(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_paying_invoice_of_deleted_booking() -> Result<()> {
        let store = setup_test_store().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(500)).await?;
        store.remove::<Booking>(&booking.id).await?;

        let paid = mark_paid(&store, &invoice.id).await?;
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert!(store.all::<Booking>().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_invoice_is_not_found() -> Result<()> {
        let store = setup_test_store().await?;
        let result = mark_paid(&store, "nope").await;
        assert!(matches!(
            result,
            Err(Error::NotFound {
                kind: EntityKind::Invoice,
                ..
            })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_write_leaves_invoice_and_booking_unchanged() -> Result<()> {
        let backing = Arc::new(FlakyStore::new());
        let store = DataStore::new(backing.clone());
        store.reload().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(500)).await?;

        backing.fail_writes(true);
        assert!(mark_paid(&store, &invoice.id).await.is_err());

        let snapshot = store.snapshot().await;
        assert_eq!(
            snapshot.find::<Invoice>(&invoice.id).unwrap().status,
            InvoiceStatus::Unpaid
        );
        assert_eq!(snapshot.booking(&booking.id).unwrap().paid_amount, dec!(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_booking_write_reverts_invoice() -> Result<()> {
        let backing = Arc::new(FlakyStore::new());
        let store = DataStore::new(backing.clone());
        store.reload().await?;
        let (booking, invoice) = booking_with_invoice(&store, dec!(500)).await?;

        backing.fail_writes_to(Some(EntityKind::Booking.storage_key()));
        let result = mark_paid(&store, &invoice.id).await;
        assert!(matches!(result, Err(Error::StorageWrite { .. })));

        backing.fail_writes_to(None);
        store.reload().await?;
        let snapshot = store.snapshot().await;
        assert_eq!(
            snapshot.find::<Invoice>(&invoice.id).unwrap().status,
            InvoiceStatus::Unpaid
        );
        assert_eq!(snapshot.booking(&booking.id).unwrap().paid_amount, dec!(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_overdue_and_pending_lists() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();
        let late = store
            .add(new_invoice("b1", "c1", dec!(10), now - Duration::days(2)))
            .await?;
        store
            .add(new_invoice("b1", "c1", dec!(20), now + Duration::days(2)))
            .await?;

        let snapshot = store.snapshot().await;
        let overdue = overdue_invoices(&snapshot, now);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, late.id);
        assert_eq!(pending_invoices(&snapshot).len(), 2);
        assert_eq!(invoices_for_booking(&snapshot, "b1").len(), 2);
        Ok(())
    }
}
