//! Dataset size profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Named dataset size used by the seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedProfile {
    /// A handful of records per collection; suited to smoke tests.
    Minimal,
    /// A realistic demo marketplace.
    #[default]
    Standard,
    /// A larger dataset for load-shaped demos.
    Extensive,
}

/// Record counts derived from a [`SeedProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileVolumes {
    /// Administrator accounts.
    pub admins: usize,
    /// Partner kitchens, each with its own user account.
    pub partners: usize,
    /// Customer accounts.
    pub customers: usize,
    /// Categories created by each partner.
    pub categories_per_partner: usize,
    /// Menus owned by each partner.
    pub menus_per_partner: usize,
    /// Items placed on each menu.
    pub items_per_menu: usize,
    /// Subscription plans on offer.
    pub plans: usize,
    /// Subscriptions held by each customer.
    pub subscriptions_per_customer: usize,
    /// Orders placed by each customer.
    pub orders_per_customer: usize,
    /// Support or order conversations.
    pub conversations: usize,
    /// Messages in each conversation.
    pub messages_per_conversation: usize,
    /// Feedback entries.
    pub feedback: usize,
}

impl SeedProfile {
    /// All profiles in ascending size.
    pub const ALL: [Self; 3] = [Self::Minimal, Self::Standard, Self::Extensive];

    /// Lowercase profile name as used in configuration and JSON.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Extensive => "extensive",
        }
    }

    /// Record counts generated for this profile.
    #[must_use]
    pub const fn volumes(self) -> ProfileVolumes {
        match self {
            Self::Minimal => ProfileVolumes {
                admins: 1,
                partners: 2,
                customers: 5,
                categories_per_partner: 2,
                menus_per_partner: 1,
                items_per_menu: 3,
                plans: 2,
                subscriptions_per_customer: 1,
                orders_per_customer: 1,
                conversations: 2,
                messages_per_conversation: 2,
                feedback: 3,
            },
            Self::Standard => ProfileVolumes {
                admins: 1,
                partners: 5,
                customers: 20,
                categories_per_partner: 3,
                menus_per_partner: 2,
                items_per_menu: 5,
                plans: 3,
                subscriptions_per_customer: 1,
                orders_per_customer: 2,
                conversations: 5,
                messages_per_conversation: 4,
                feedback: 10,
            },
            Self::Extensive => ProfileVolumes {
                admins: 2,
                partners: 15,
                customers: 100,
                categories_per_partner: 4,
                menus_per_partner: 3,
                items_per_menu: 8,
                plans: 4,
                subscriptions_per_customer: 2,
                orders_per_customer: 4,
                conversations: 20,
                messages_per_conversation: 6,
                feedback: 40,
            },
        }
    }
}

impl fmt::Display for SeedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a profile name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown seed profile '{0}'; expected minimal, standard, or extensive")]
pub struct UnknownProfile(pub String);

impl FromStr for SeedProfile {
    type Err = UnknownProfile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "standard" => Ok(Self::Standard),
            "extensive" => Ok(Self::Extensive),
            _ => Err(UnknownProfile(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("minimal", SeedProfile::Minimal)]
    #[case(" Standard ", SeedProfile::Standard)]
    #[case("EXTENSIVE", SeedProfile::Extensive)]
    fn parses_profile_names(#[case] raw: &str, #[case] expected: SeedProfile) {
        assert_eq!(raw.parse::<SeedProfile>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_profile() {
        let err = "huge".parse::<SeedProfile>().expect_err("unknown profile");
        assert_eq!(err, UnknownProfile("huge".to_owned()));
    }

    #[test]
    fn profiles_grow_monotonically() {
        let counts: Vec<usize> = SeedProfile::ALL
            .iter()
            .map(|profile| profile.volumes().customers)
            .collect();
        assert!(counts.windows(2).all(|pair| pair.first() < pair.get(1)));
    }

    #[test]
    fn display_matches_serde_name() {
        let json = serde_json::to_string(&SeedProfile::Extensive).expect("serialise");
        assert_eq!(json, format!("\"{}\"", SeedProfile::Extensive));
    }
}
