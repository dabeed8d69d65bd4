//! Pricing worksheet calculations and cost item edits.

use crate::{
    core::store::{DataStore, Snapshot},
    errors::Result,
    models::{CostItem, NewCostItem, PricingWorksheet, new_id},
};
use rust_decimal::Decimal;

/// Derived figures for one worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingSummary {
    /// Sum of all cost lines
    pub total_cost: Decimal,
    /// `total_cost / pax`, zero when pax is zero
    pub cost_per_pax: Decimal,
    /// Cost per pax with the markup applied
    pub price_per_pax: Decimal,
    /// `price_per_pax * pax`
    pub total_revenue: Decimal,
    /// `total_revenue - total_cost`
    pub profit: Decimal,
    /// Profit as a percentage of revenue, zero when there is no revenue
    pub margin_percent: Decimal,
}

/// Calculates cost, price and margin for a worksheet.
///
/// A worksheet with zero pax has no per-person figures; every derived value
/// except `total_cost` is then zero, and profit is negative by the full cost.
#[must_use]
pub fn calculate_pricing(worksheet: &PricingWorksheet) -> PricingSummary {
    let total_cost: Decimal = worksheet.cost_items.iter().map(CostItem::line_total).sum();
    let pax = Decimal::from(worksheet.pax);

    let cost_per_pax = if pax.is_zero() {
        Decimal::ZERO
    } else {
        total_cost / pax
    };
    let price_per_pax =
        cost_per_pax * (Decimal::ONE + worksheet.markup_percent / Decimal::ONE_HUNDRED);
    let total_revenue = price_per_pax * pax;
    let profit = total_revenue - total_cost;
    let margin_percent = if total_revenue.is_zero() {
        Decimal::ZERO
    } else {
        profit / total_revenue * Decimal::ONE_HUNDRED
    };

    PricingSummary {
        total_cost,
        cost_per_pax,
        price_per_pax,
        total_revenue,
        profit,
        margin_percent,
    }
}

/// Appends a cost line.
#[must_use]
pub fn with_cost_item_added(worksheet: &PricingWorksheet, item: NewCostItem) -> PricingWorksheet {
    let mut next = worksheet.clone();
    next.cost_items.push(CostItem {
        id: new_id(),
        category: item.category,
        description: item.description,
        unit_cost: item.unit_cost,
        quantity: item.quantity,
    });
    next
}

/// Replaces the cost line with the same id.
#[must_use]
pub fn with_cost_item_updated(worksheet: &PricingWorksheet, item: CostItem) -> PricingWorksheet {
    let mut next = worksheet.clone();
    if let Some(slot) = next.cost_items.iter_mut().find(|c| c.id == item.id) {
        *slot = item;
    }
    next
}

/// Removes a cost line.
#[must_use]
pub fn with_cost_item_removed(worksheet: &PricingWorksheet, item_id: &str) -> PricingWorksheet {
    let mut next = worksheet.clone();
    next.cost_items.retain(|c| c.id != item_id);
    next
}

/// Worksheets, newest first.
pub fn worksheets_newest_first(snapshot: &Snapshot) -> Vec<&PricingWorksheet> {
    let mut worksheets: Vec<&PricingWorksheet> = snapshot.pricing_worksheets.iter().collect();
    worksheets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    worksheets
}

/// Applies `edit` to the stored worksheet and persists the result.
pub async fn edit_worksheet<F>(
    store: &DataStore,
    worksheet_id: &str,
    edit: F,
) -> Result<PricingWorksheet>
where
    F: FnOnce(&PricingWorksheet) -> PricingWorksheet + Send,
{
    store
        .modify::<PricingWorksheet, _>(worksheet_id, |current| Ok(edit(current)))
        .await
}
