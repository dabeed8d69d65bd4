//! Budget variance per booking.
//!
//! Planned amounts come from budget items; actual spending is always the sum
//! of the booking's expenses, not the budget items' own `actual_amount`.

use crate::{
    core::{booking::active_bookings, store::Snapshot},
    models::Booking,
};
use rust_decimal::Decimal;

/// Planned against actual spending for one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetVariance {
    /// Booking id
    pub booking_id: String,
    /// Trip name, for display
    pub trip_name: String,
    /// Sum of budget item amounts
    pub total_budget: Decimal,
    /// Sum of expense amounts
    pub total_actual: Decimal,
    /// Actual as a percentage of budget
    pub used_percent: Decimal,
    /// `total_budget - total_actual`
    pub remaining: Decimal,
}

impl BudgetVariance {
    /// Spending exceeds the budget.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.used_percent > Decimal::ONE_HUNDRED
    }
}

/// Percentage of `budget` used by `actual`; zero when there is no budget.
#[must_use]
pub fn calculate_budget_used(budget: Decimal, actual: Decimal) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }

    actual / budget * Decimal::ONE_HUNDRED
}

/// Budget variance for one booking.
#[must_use]
pub fn budget_variance(snapshot: &Snapshot, booking: &Booking) -> BudgetVariance {
    let total_budget: Decimal = snapshot
        .budget_items
        .iter()
        .filter(|b| b.booking_id == booking.id)
        .map(|b| b.budget_amount)
        .sum();
    let total_actual: Decimal = snapshot
        .expenses
        .iter()
        .filter(|e| e.booking_id.as_deref() == Some(booking.id.as_str()))
        .map(|e| e.amount)
        .sum();

    BudgetVariance {
        booking_id: booking.id.clone(),
        trip_name: booking.trip_name.clone(),
        total_budget,
        total_actual,
        used_percent: calculate_budget_used(total_budget, total_actual),
        remaining: total_budget - total_actual,
    }
}

/// Budget variance for every booking that is not cancelled, in stored order.
#[must_use]
pub fn budget_overview(snapshot: &Snapshot) -> Vec<BudgetVariance> {
    active_bookings(snapshot)
        .map(|b| budget_variance(snapshot, b))
        .collect()
}
