//! Payment reminders
//!
//! Reminders are derived on demand from each subscription's `next_payment`;
//! nothing is scheduled or delivered. Because `next_payment` never rolls
//! forward, a date in the past shows up as overdue rather than as a future
//! reminder.

use crate::{Amount, ReminderSettings, Subscription};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub subscription_id: String,
    pub name: String,
    pub price: Amount,
    pub due_on: NaiveDate,
    /// Days from today until `due_on`; negative when overdue.
    pub days_until: i64,
}

impl Reminder {
    fn new(subscription: &Subscription, today: NaiveDate) -> Self {
        Self {
            subscription_id: subscription.id.clone(),
            name: subscription.name.clone(),
            price: subscription.price,
            due_on: subscription.next_payment,
            days_until: (subscription.next_payment - today).num_days(),
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.days_until < 0
    }

    /// Notification text, e.g. `Netflix payment of 15.99 is due in 2 days`.
    pub fn message(&self) -> String {
        let price = self.price.to_display_string();
        match self.days_until {
            0 => format!("{} payment of {} is due today", self.name, price),
            1 => format!("{} payment of {} is due tomorrow", self.name, price),
            d if d > 1 => format!("{} payment of {} is due in {} days", self.name, price, d),
            -1 => format!("{} payment of {} was due yesterday", self.name, price),
            d => format!("{} payment of {} was due {} days ago", self.name, price, -d),
        }
    }
}

/// Reminders split into upcoming and overdue, each sorted by due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub upcoming: Vec<Reminder>,
    pub overdue: Vec<Reminder>,
}

impl ReminderReport {
    pub fn is_empty(&self) -> bool {
        self.upcoming.is_empty() && self.overdue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.upcoming.len() + self.overdue.len()
    }
}

/// Payments due between `today` and `today + window_days` (inclusive), plus
/// every payment whose date has already passed.
pub fn upcoming_reminders(
    subscriptions: &[Subscription],
    today: NaiveDate,
    window_days: u32,
) -> ReminderReport {
    let mut report = ReminderReport::default();

    for sub in subscriptions {
        let reminder = Reminder::new(sub, today);
        if reminder.is_overdue() {
            report.overdue.push(reminder);
        } else if reminder.days_until <= i64::from(window_days) {
            report.upcoming.push(reminder);
        }
    }

    report.upcoming.sort_by_key(|r| r.due_on);
    report.overdue.sort_by_key(|r| r.due_on);
    report
}

/// Reminders as configured by `settings`.
///
/// With payment reminders switched off the report is empty, unless the
/// caller asks for an explicit look-ahead with `window_override`, which
/// always reports.
pub fn reminders_for(
    subscriptions: &[Subscription],
    today: NaiveDate,
    settings: &ReminderSettings,
    window_override: Option<u32>,
) -> ReminderReport {
    match window_override {
        Some(days) => upcoming_reminders(subscriptions, today, days),
        None if settings.payment_reminders => {
            upcoming_reminders(subscriptions, today, settings.window_days)
        }
        None => ReminderReport::default(),
    }
}
