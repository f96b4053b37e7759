//! Quick-add catalogue of popular services

use crate::{Amount, BillingCycle, Category, NewSubscription};
use rust_decimal_macros::dec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePreset {
    pub name: &'static str,
    /// Monthly list price.
    pub price: Amount,
    pub category: Category,
    pub icon: &'static str,
}

impl ServicePreset {
    /// Input for a monthly subscription to this service.
    pub fn to_new_subscription(&self) -> NewSubscription {
        NewSubscription::new(self.name, self.price, BillingCycle::Monthly, self.category.clone())
    }
}

pub fn popular_services() -> Vec<ServicePreset> {
    vec![
        ServicePreset {
            name: "Netflix",
            price: Amount::new(dec!(15.99)),
            category: Category::Streaming,
            icon: "📺",
        },
        ServicePreset {
            name: "Spotify",
            price: Amount::new(dec!(9.99)),
            category: Category::Music,
            icon: "🎵",
        },
        ServicePreset {
            name: "Disney+",
            price: Amount::new(dec!(7.99)),
            category: Category::Streaming,
            icon: "🎬",
        },
        ServicePreset {
            name: "Apple TV+",
            price: Amount::new(dec!(6.99)),
            category: Category::Streaming,
            icon: "🍎",
        },
    ]
}

/// Case-insensitive lookup by service name.
pub fn find_preset(name: &str) -> Option<ServicePreset> {
    let needle = name.trim();
    popular_services()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(needle))
}
