use crate::{Amount, Result, SubscriptionError};
use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recurring subscription tracked by the user
///
/// Field names serialize in camelCase (`billingCycle`, `nextPayment`,
/// `createdAt`) to match the persisted slot layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub name: String,
    /// Price per billing period, not normalized.
    pub price: Amount,
    pub billing_cycle: BillingCycle,
    pub category: Category,
    pub next_payment: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    /// Build a subscription created at `now`.
    ///
    /// The id is a random UUID; `next_payment` is one billing period after
    /// the calendar date of `now`.
    pub fn create(input: NewSubscription, now: DateTime<Utc>) -> Result<Self> {
        input.validate()?;
        let next_payment = input.billing_cycle.next_date(now.date_naive())?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name.trim().to_string(),
            price: input.price,
            billing_cycle: input.billing_cycle,
            category: input.category,
            next_payment,
            created_at: now,
        })
    }

    /// Price normalized to one month.
    pub fn monthly_price(&self) -> Amount {
        self.billing_cycle.monthly_equivalent(&self.price)
    }
}

/// User input for a new subscription
///
/// `id`, `created_at` and `next_payment` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub name: String,
    pub price: Amount,
    pub billing_cycle: BillingCycle,
    pub category: Category,
}

impl NewSubscription {
    pub fn new(
        name: impl Into<String>,
        price: Amount,
        billing_cycle: BillingCycle,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            billing_cycle,
            category,
        }
    }

    /// Build from raw form fields.
    ///
    /// Missing name or price yields the form's generic message; a malformed
    /// cycle or price is reported individually.
    ///
    /// ```rust
    /// use subtrack_core::{BillingCycle, Category, NewSubscription};
    ///
    /// let input = NewSubscription::parse("Netflix", "15.99", "monthly", "streaming").unwrap();
    /// assert_eq!(input.billing_cycle, BillingCycle::Monthly);
    /// assert_eq!(input.category, Category::Streaming);
    ///
    /// assert!(NewSubscription::parse("", "15.99", "monthly", "streaming").is_err());
    /// ```
    pub fn parse(name: &str, price: &str, billing_cycle: &str, category: &str) -> Result<Self> {
        if name.trim().is_empty() || price.trim().is_empty() {
            return Err(SubscriptionError::InvalidArgument(
                "Please fill in all required fields".to_string(),
            )
            .into());
        }

        let price = Amount::from_str_checked(price).map_err(SubscriptionError::InvalidArgument)?;
        let billing_cycle = billing_cycle.parse::<BillingCycle>()?;
        let category = Category::from(category.trim().to_ascii_lowercase());

        let input = Self::new(name.trim(), price, billing_cycle, category);
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(
                SubscriptionError::InvalidArgument("Name cannot be empty".to_string()).into(),
            );
        }
        if !self.price.is_positive() {
            return Err(
                SubscriptionError::InvalidArgument("Price must be positive".to_string()).into(),
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
    Quarterly,
}

impl BillingCycle {
    /// Calendar months in one billing period.
    pub fn months(&self) -> u32 {
        match self {
            BillingCycle::Monthly => 1,
            BillingCycle::Yearly => 12,
            BillingCycle::Quarterly => 3,
        }
    }

    /// Date one billing period after `from`.
    ///
    /// Days past the end of the target month clamp to its last day, so
    /// Jan 31 + 1 month lands on Feb 28 or 29.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use subtrack_core::BillingCycle;
    ///
    /// let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    /// assert_eq!(
    ///     BillingCycle::Monthly.next_date(jan31).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    /// );
    /// ```
    pub fn next_date(&self, from: NaiveDate) -> Result<NaiveDate> {
        from.checked_add_months(Months::new(self.months()))
            .ok_or_else(|| SubscriptionError::Overflow.into())
    }

    /// `price` expressed per month.
    pub fn monthly_equivalent(&self, price: &Amount) -> Amount {
        // Dividing by a small positive constant cannot overflow
        Amount::new(price.as_decimal() / Decimal::from(self.months()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BillingCycle::Monthly => "monthly",
            BillingCycle::Yearly => "yearly",
            BillingCycle::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingCycle {
    type Err = SubscriptionError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(BillingCycle::Monthly),
            "yearly" => Ok(BillingCycle::Yearly),
            "quarterly" => Ok(BillingCycle::Quarterly),
            other => Err(SubscriptionError::InvalidArgument(format!(
                "Unknown billing cycle '{}' (expected monthly, yearly or quarterly)",
                other
            ))),
        }
    }
}

/// Spending category
///
/// The four named variants are the ones offered when adding a subscription.
/// Labels written by other clients that match none of them are kept verbatim
/// in [`Category::Unrecognized`] so a load/save round-trip never rewrites
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Streaming,
    Music,
    Cloud,
    Other,
    Unrecognized(String),
}

impl Category {
    /// Chart color for this category.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Streaming => "#007AFF",
            Category::Music => "#34C759",
            Category::Cloud => "#FF9500",
            Category::Other => "#FF3B30",
            Category::Unrecognized(_) => "#8E8E93",
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Streaming => "streaming",
            Category::Music => "music",
            Category::Cloud => "cloud",
            Category::Other => "other",
            Category::Unrecognized(label) => label,
        }
    }

    /// Capitalized label for list rows (`Streaming`).
    pub fn title(&self) -> String {
        let label = self.as_str();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "streaming" => Category::Streaming,
            "music" => Category::Music,
            "cloud" => Category::Cloud,
            "other" => Category::Other,
            _ => Category::Unrecognized(label),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Unrecognized(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
