//! Plan definitions and the price → plan catalog.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Longest duration a plan may have.
pub const MAX_PLAN_DURATION_SECS: u64 = 10 * 365 * DAY as u64;

/// Identifier of a hotspot access plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    HalfHour,
    TwoHours,
    FourHours,
    SevenHours,
    OneDay,
    ThreeDays,
    OneWeek,
    OneMonth,
}

impl PlanId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanId::HalfHour => "half_hour",
            PlanId::TwoHours => "two_hours",
            PlanId::FourHours => "four_hours",
            PlanId::SevenHours => "seven_hours",
            PlanId::OneDay => "one_day",
            PlanId::ThreeDays => "three_days",
            PlanId::OneWeek => "one_week",
            PlanId::OneMonth => "one_month",
        }
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in plan table: (id, price, duration in seconds).
pub const DEFAULT_PLANS: [(PlanId, u32, i64); 8] = [
    (PlanId::HalfHour, 5, 30 * MINUTE),
    (PlanId::TwoHours, 10, 2 * HOUR),
    (PlanId::FourHours, 20, 4 * HOUR),
    (PlanId::SevenHours, 30, 7 * HOUR),
    (PlanId::OneDay, 75, DAY),
    (PlanId::ThreeDays, 130, 3 * DAY),
    (PlanId::OneWeek, 375, 7 * DAY),
    (PlanId::OneMonth, 950, 30 * DAY),
];

/// A purchasable access plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Plan identifier.
    pub id: PlanId,
    /// Price in whole currency units.
    pub price: u32,
    /// Length of the access window bought by one payment.
    pub duration: TimeDelta,
}

impl Plan {
    /// Build a plan from a duration expressed in seconds.
    pub fn from_secs(id: PlanId, price: u32, duration_secs: u64) -> Result<Self, CatalogError> {
        if duration_secs == 0 {
            return Err(CatalogError::NonPositiveDuration(id));
        }
        if duration_secs > MAX_PLAN_DURATION_SECS {
            return Err(CatalogError::DurationOutOfRange(id));
        }
        let duration = i64::try_from(duration_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or(CatalogError::DurationOutOfRange(id))?;

        Ok(Self { id, price, duration })
    }

    /// Duration in milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.num_milliseconds()).unwrap_or(0)
    }
}

/// Serializable view of a plan for API listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanListing {
    pub id: PlanId,
    pub price: u32,
    pub duration_ms: u64,
}

impl From<&Plan> for PlanListing {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id,
            price: plan.price,
            duration_ms: plan.duration_ms(),
        }
    }
}

/// Errors raised while building a catalog.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("plan {0} is defined more than once")]
    DuplicatePlan(PlanId),

    #[error("{first} and {second} share price {price}")]
    DuplicatePrice {
        price: u32,
        first: PlanId,
        second: PlanId,
    },

    #[error("plan {0} has a zero price")]
    ZeroPrice(PlanId),

    #[error("plan {0} has a non-positive duration")]
    NonPositiveDuration(PlanId),

    #[error("plan {0} duration must not exceed 10 years")]
    DurationOutOfRange(PlanId),
}

/// Immutable mapping from plan price to plan.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    /// Plans ordered by ascending price.
    plans: Vec<Plan>,
    by_price: HashMap<u32, usize>,
}

impl PlanCatalog {
    /// Build a catalog, rejecting ambiguous or degenerate plans.
    pub fn new(plans: impl IntoIterator<Item = Plan>) -> Result<Self, CatalogError> {
        let mut plans: Vec<Plan> = plans.into_iter().collect();
        plans.sort_by_key(|p| (p.price, p.id));

        if let Some(err) = Self::problems(&plans).into_iter().next() {
            return Err(err);
        }

        let by_price = plans
            .iter()
            .enumerate()
            .map(|(i, p)| (p.price, i))
            .collect();
        Ok(Self { plans, by_price })
    }

    /// Every reason `plans` cannot form a catalog, in price order.
    pub fn problems(plans: &[Plan]) -> Vec<CatalogError> {
        let mut sorted: Vec<&Plan> = plans.iter().collect();
        sorted.sort_by_key(|p| (p.price, p.id));

        let mut errors = Vec::new();
        let mut seen_ids: HashSet<PlanId> = HashSet::new();
        let mut by_price: HashMap<u32, PlanId> = HashMap::with_capacity(sorted.len());

        for plan in sorted {
            if plan.price == 0 {
                errors.push(CatalogError::ZeroPrice(plan.id));
            }
            if plan.duration <= TimeDelta::zero() {
                errors.push(CatalogError::NonPositiveDuration(plan.id));
            }
            if !seen_ids.insert(plan.id) {
                errors.push(CatalogError::DuplicatePlan(plan.id));
            }
            match by_price.get(&plan.price) {
                Some(&first) => errors.push(CatalogError::DuplicatePrice {
                    price: plan.price,
                    first,
                    second: plan.id,
                }),
                None => {
                    by_price.insert(plan.price, plan.id);
                }
            }
        }
        errors
    }

    /// Resolve the plan bought by a payment of `amount`.
    pub fn plan_for_amount(&self, amount: u32) -> Option<&Plan> {
        self.by_price.get(&amount).map(|&i| &self.plans[i])
    }

    /// Look a plan up by identifier.
    pub fn get(&self, id: PlanId) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == id)
    }

    /// All plans, cheapest first.
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn listings(&self) -> Vec<PlanListing> {
        self.plans.iter().map(PlanListing::from).collect()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        let plans: Vec<Plan> = DEFAULT_PLANS
            .iter()
            .map(|&(id, price, secs)| Plan {
                id,
                price,
                duration: TimeDelta::seconds(secs),
            })
            .collect();
        let by_price = plans
            .iter()
            .enumerate()
            .map(|(i, p)| (p.price, i))
            .collect();

        Self { plans, by_price }
    }
}
