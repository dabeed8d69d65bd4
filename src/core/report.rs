//! Dashboard and finance reporting.
//!
//! Everything here is computed from a [`Snapshot`] and an explicit `now`, so
//! the results are recomputed on each read and never cached. Overdue status in
//! particular depends on `now` and is never stored. Calendar boundaries
//! ("today", "this month") are taken in UTC.

use crate::{
    config::DashboardConfig,
    core::{
        booking::active_bookings,
        invoice::{self, overdue_invoices},
        store::Snapshot,
        task::{self, open_task_count},
    },
    models::{Booking, BookingStatus, InvoiceStatus},
};
use chrono::{DateTime, Datelike, Months, TimeDelta, Utc};
use rust_decimal::Decimal;
use std::fmt::{self, Write};

/// First and last instant of the calendar month containing `now`.
#[must_use]
pub fn month_bounds(now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = now.date_naive().with_day(1)?;
    let next = first.checked_add_months(Months::new(1))?;
    let start = first.and_hms_opt(0, 0, 0)?.and_utc();
    let end = next.and_hms_opt(0, 0, 0)?.and_utc() - TimeDelta::nanoseconds(1);
    Some((start, end))
}

/// Sum of paid invoices created within the current calendar month.
#[must_use]
pub fn monthly_revenue(snapshot: &Snapshot, now: DateTime<Utc>) -> Decimal {
    let Some((start, end)) = month_bounds(now) else {
        return Decimal::ZERO;
    };

    snapshot
        .invoices
        .iter()
        .filter(|i| i.status == InvoiceStatus::Paid)
        .filter(|i| i.created_at >= start && i.created_at <= end)
        .map(|i| i.amount)
        .sum()
}

/// Whole calendar days from `now` until `date`; negative in the past.
#[must_use]
pub fn days_from_now(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (date.date_naive() - now.date_naive()).num_days()
}

/// Active bookings starting within `window_days` (today included), soonest
/// first, at most `limit`.
#[must_use]
pub fn upcoming_trips(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    window_days: i64,
    limit: usize,
) -> Vec<&Booking> {
    let mut trips: Vec<&Booking> = active_bookings(snapshot)
        .filter(|b| (0..=window_days).contains(&days_from_now(b.start_date, now)))
        .collect();
    trips.sort_by_key(|b| b.start_date);
    trips.truncate(limit);
    trips
}

/// Active bookings starting today.
#[must_use]
pub fn trips_today(snapshot: &Snapshot, now: DateTime<Utc>) -> usize {
    active_bookings(snapshot)
        .filter(|b| days_from_now(b.start_date, now) == 0)
        .count()
}

/// What an alert points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// An overdue invoice
    Invoice,
    /// An overdue task
    Task,
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Invoice => "invoice",
            Self::Task => "task",
        })
    }
}

/// One entry of the urgent list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrgentAlert {
    /// Invoice or task
    pub kind: AlertKind,
    /// Id of the invoice or task
    pub id: String,
    /// Display text
    pub label: String,
    /// When it was due
    pub due_date: DateTime<Utc>,
}

/// Overdue invoices and tasks, most overdue first, at most `limit`.
#[must_use]
pub fn urgent_alerts(snapshot: &Snapshot, now: DateTime<Utc>, limit: usize) -> Vec<UrgentAlert> {
    let invoices = overdue_invoices(snapshot, now).into_iter().map(|i| {
        let prefix: String = i.id.chars().take(6).collect();
        UrgentAlert {
            kind: AlertKind::Invoice,
            id: i.id.clone(),
            label: format!("Invoice #{prefix} overdue"),
            due_date: i.due_date,
        }
    });
    let tasks = snapshot
        .tasks
        .iter()
        .filter(|t| task::is_overdue(t, now))
        .map(|t| UrgentAlert {
            kind: AlertKind::Task,
            id: t.id.clone(),
            label: format!("{} overdue", t.title),
            due_date: t.due_date,
        });

    let mut alerts: Vec<UrgentAlert> = invoices.chain(tasks).collect();
    alerts.sort_by_key(|a| a.due_date);
    alerts.truncate(limit);
    alerts
}

/// Figures for the dashboard screen.
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    /// When the summary was computed
    pub generated_at: DateTime<Utc>,
    /// Active bookings starting today
    pub trips_today: usize,
    /// Unpaid invoices
    pub pending_invoices: usize,
    /// Unpaid invoices past their due date
    pub overdue_invoices: usize,
    /// Paid invoices created this month
    pub monthly_revenue: Decimal,
    /// Confirmed bookings
    pub confirmed_bookings: usize,
    /// Tasks not yet done
    pub open_tasks: usize,
    /// Sum of all expenses
    pub total_expenses: Decimal,
    /// Trips starting soon
    pub upcoming_trips: Vec<Booking>,
    /// Overdue invoices and tasks
    pub urgent_alerts: Vec<UrgentAlert>,
}

/// Computes the dashboard figures.
#[must_use]
pub fn dashboard_summary(
    snapshot: &Snapshot,
    now: DateTime<Utc>,
    settings: &DashboardConfig,
) -> DashboardSummary {
    DashboardSummary {
        generated_at: now,
        trips_today: trips_today(snapshot, now),
        pending_invoices: invoice::pending_invoices(snapshot).len(),
        overdue_invoices: overdue_invoices(snapshot, now).len(),
        monthly_revenue: monthly_revenue(snapshot, now),
        confirmed_bookings: snapshot
            .bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count(),
        open_tasks: open_task_count(snapshot),
        total_expenses: snapshot.expenses.iter().map(|e| e.amount).sum(),
        upcoming_trips: upcoming_trips(
            snapshot,
            now,
            settings.upcoming_window_days,
            settings.list_limit,
        )
        .into_iter()
        .cloned()
        .collect(),
        urgent_alerts: urgent_alerts(snapshot, now, settings.list_limit),
    }
}

/// Totals for the finance screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinanceSummary {
    /// Sum of paid invoices
    pub total_revenue: Decimal,
    /// Sum of all expenses
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`
    pub net_profit: Decimal,
    /// Sum of unpaid invoices
    pub total_pending: Decimal,
    /// Unpaid invoices past their due date
    pub overdue_count: usize,
    /// Sum of those overdue invoices
    pub overdue_total: Decimal,
}

/// Computes the finance totals.
#[must_use]
pub fn finance_summary(snapshot: &Snapshot, now: DateTime<Utc>) -> FinanceSummary {
    let sum_where = |status: InvoiceStatus| -> Decimal {
        snapshot
            .invoices
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.amount)
            .sum()
    };
    let total_revenue = sum_where(InvoiceStatus::Paid);
    let total_expenses: Decimal = snapshot.expenses.iter().map(|e| e.amount).sum();
    let overdue = overdue_invoices(snapshot, now);

    FinanceSummary {
        total_revenue,
        total_expenses,
        net_profit: total_revenue - total_expenses,
        total_pending: sum_where(InvoiceStatus::Unpaid),
        overdue_count: overdue.len(),
        overdue_total: overdue.iter().map(|i| i.amount).sum(),
    }
}

/// Formats a dashboard summary as a short multi-line report.
#[must_use]
pub fn format_dashboard_summary(summary: &DashboardSummary) -> String {
    let mut report = format!(
        "Dashboard - {} - {} trips today, {} pending invoices ({} overdue)\n",
        summary.generated_at.format("%d %B %Y"),
        summary.trips_today,
        summary.pending_invoices,
        summary.overdue_invoices
    );

    // Writing to a String cannot fail
    let _ = writeln!(
        report,
        "  Revenue this month: {} | Expenses: {} | Confirmed bookings: {} | Open tasks: {}",
        summary.monthly_revenue.round_dp(2),
        summary.total_expenses.round_dp(2),
        summary.confirmed_bookings,
        summary.open_tasks
    );

    for trip in &summary.upcoming_trips {
        let _ = writeln!(
            report,
            "  Upcoming: {} to {} on {}",
            trip.trip_name,
            trip.destination,
            trip.start_date.format("%d %b")
        );
    }
    for alert in &summary.urgent_alerts {
        let _ = writeln!(
            report,
            "  Urgent ({}): {} since {}",
            alert.kind,
            alert.label,
            alert.due_date.format("%d %b")
        );
    }

    report
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::invoice::mark_paid;
    use crate::errors::Result;
    use crate::models::{Invoice, TaskStatus};
    use crate::test_utils::*;
    use chrono::{Duration, NaiveDate, TimeZone};
    use rust_decimal_macros::dec;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn paid_invoice(id: &str, amount: Decimal, created_at: DateTime<Utc>) -> Invoice {
        Invoice {
            id: id.to_string(),
            booking_id: "b".to_string(),
            client_id: "c".to_string(),
            amount,
            status: InvoiceStatus::Paid,
            due_date: created_at,
            created_at,
        }
    }

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(at(2024, 2, 15, 10)).unwrap();
        assert_eq!(start, at(2024, 2, 1, 0));
        assert_eq!(end, at(2024, 3, 1, 0) - TimeDelta::nanoseconds(1));

        let (start, end) = month_bounds(at(2024, 12, 31, 23)).unwrap();
        assert_eq!(start, at(2024, 12, 1, 0));
        assert_eq!(end.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_monthly_revenue_uses_inclusive_bounds() {
        let now = at(2024, 5, 20, 12);
        let (start, end) = month_bounds(now).unwrap();
        let snapshot = Snapshot {
            invoices: vec![
                paid_invoice("first", dec!(100), start),
                paid_invoice("last", dec!(50), end),
                paid_invoice("before", dec!(1000), start - TimeDelta::nanoseconds(1)),
                paid_invoice("after", dec!(1000), end + TimeDelta::nanoseconds(1)),
                Invoice {
                    status: InvoiceStatus::Unpaid,
                    ..paid_invoice("unpaid", dec!(1000), now)
                },
            ],
            ..Snapshot::default()
        };

        assert_eq!(monthly_revenue(&snapshot, now), dec!(150));
    }

    #[test]
    fn test_days_from_now_counts_calendar_days() {
        let now = at(2024, 5, 20, 23);
        assert_eq!(days_from_now(at(2024, 5, 21, 1), now), 1);
        assert_eq!(days_from_now(at(2024, 5, 20, 0), now), 0);
        assert_eq!(days_from_now(at(2024, 5, 19, 23), now), -1);
    }

    #[tokio::test]
    async fn test_upcoming_trips_window_order_and_cap() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();
        for days in [6, 0, 3, 8, -1, 1, 2, 5] {
            store
                .add(new_booking("c", &format!("In {days}"), now + Duration::days(days)))
                .await?;
        }
        let mut cancelled = new_booking("c", "Cancelled", now + Duration::days(1));
        cancelled.status = BookingStatus::Cancelled;
        store.add(cancelled).await?;

        let snapshot = store.snapshot().await;
        let names: Vec<&str> = upcoming_trips(&snapshot, now, 7, 5)
            .iter()
            .map(|b| b.trip_name.as_str())
            .collect();
        assert_eq!(names, vec!["In 0", "In 1", "In 2", "In 3", "In 5"]);
        assert_eq!(trips_today(&snapshot, now), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_urgent_alerts_merge_and_sort() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();

        let invoice = store
            .add(new_invoice("b", "c", dec!(10), now - Duration::days(3)))
            .await?;
        store
            .add(new_task("Collect passports", TaskStatus::InProgress, now - Duration::days(5)))
            .await?;
        store
            .add(new_task("Done already", TaskStatus::Done, now - Duration::days(9)))
            .await?;
        store
            .add(new_task("Not yet due", TaskStatus::Todo, now + Duration::days(1)))
            .await?;

        let alerts = urgent_alerts(&store.snapshot().await, now, 5);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::Task);
        assert_eq!(alerts[0].label, "Collect passports overdue");
        assert_eq!(alerts[1].kind, AlertKind::Invoice);
        assert_eq!(alerts[1].id, invoice.id);
        assert_eq!(
            alerts[1].label,
            format!("Invoice #{} overdue", &invoice.id[..6])
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_urgent_alerts_capped() -> Result<()> {
        let store = setup_test_store().await?;
        let now = Utc::now();
        for i in 1..=7 {
            store
                .add(new_task(&format!("Late {i}"), TaskStatus::Todo, now - Duration::days(i)))
                .await?;
        }

        let alerts = urgent_alerts(&store.snapshot().await, now, 5);
        assert_eq!(alerts.len(), 5);
        assert_eq!(alerts[0].label, "Late 7 overdue");
        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_and_finance_summaries() -> Result<()> {
        init_test_tracing();
        let store = setup_test_store().await?;
        let now = Utc::now();
        let client = store.add(new_client("Ana")).await?;
        let booking = store.add(new_booking(&client.id, "Madeira", now)).await?;

        let paid = store
            .add(new_invoice(&booking.id, &client.id, dec!(400), now + Duration::days(10)))
            .await?;
        store
            .add(new_invoice(&booking.id, &client.id, dec!(600), now - Duration::days(1)))
            .await?;
        mark_paid(&store, &paid.id).await?;
        store.add(new_expense(&booking.id, dec!(150))).await?;
        store
            .add(new_task("Call hotel", TaskStatus::Todo, now + Duration::days(2)))
            .await?;

        let snapshot = store.snapshot().await;
        let dashboard = dashboard_summary(&snapshot, now, &DashboardConfig::default());
        assert_eq!(dashboard.trips_today, 1);
        assert_eq!(dashboard.pending_invoices, 1);
        assert_eq!(dashboard.overdue_invoices, 1);
        assert_eq!(dashboard.monthly_revenue, dec!(400));
        assert_eq!(dashboard.open_tasks, 1);
        assert_eq!(dashboard.confirmed_bookings, 0);
        assert_eq!(dashboard.total_expenses, dec!(150));
        assert_eq!(dashboard.upcoming_trips.len(), 1);
        assert_eq!(dashboard.urgent_alerts.len(), 1);

        let report = format_dashboard_summary(&dashboard);
        assert!(report.contains("1 trips today"));
        assert!(report.contains("Upcoming: Madeira"));

        let finance = finance_summary(&snapshot, now);
        assert_eq!(
            finance,
            FinanceSummary {
                total_revenue: dec!(400),
                total_expenses: dec!(150),
                net_profit: dec!(250),
                total_pending: dec!(600),
                overdue_count: 1,
                overdue_total: dec!(600),
            }
        );
        Ok(())
    }
}
