//! Foreign-key relationships between the marketplace collections.

use super::RelationshipRule;

/// Every declared relationship, grouped by parent.
///
/// `businessPartner` fields hold the partner's *user* id, so those rules hang
/// off `users`. Payments reference either an order or a subscription through
/// `referenceId`; `referenceType` says which.
pub(super) const STANDARD_RULES: &[RelationshipRule] = &[
    RelationshipRule::declared("users", "partners", "user", true),
    RelationshipRule::declared("users", "customerprofiles", "user", true),
    RelationshipRule::declared("users", "orders", "customer", true),
    RelationshipRule::declared("users", "orders", "businessPartner", true),
    RelationshipRule::declared("users", "subscriptions", "customer", true),
    RelationshipRule::declared("users", "payments", "customerId", true),
    RelationshipRule::declared("users", "paymentmethods", "customerId", true),
    RelationshipRule::declared("users", "feedback", "user", true),
    RelationshipRule::declared("users", "testimonials", "user", false),
    RelationshipRule::declared("users", "referrals", "referrer", true),
    RelationshipRule::declared("users", "conversations", "participants.userId", true),
    RelationshipRule::declared("users", "chatmessages", "senderId", true),
    RelationshipRule::declared("users", "categories", "businessPartner", true),
    RelationshipRule::declared("users", "menuitems", "businessPartner", true),
    RelationshipRule::declared("users", "meals", "businessPartner", true),
    RelationshipRule::declared("partners", "menus", "restaurant", true),
    RelationshipRule::declared("categories", "menuitems", "category", true),
    RelationshipRule::declared("menus", "menuitems", "menu", true),
    RelationshipRule::declared("subscriptionplans", "subscriptions", "plan", true),
    RelationshipRule::declared_when(
        "orders",
        "payments",
        "referenceId",
        false,
        ("referenceType", "order"),
    ),
    RelationshipRule::declared_when(
        "subscriptions",
        "payments",
        "referenceId",
        false,
        ("referenceType", "subscription"),
    ),
    RelationshipRule::declared("subscriptions", "meals", "subscription", false),
    RelationshipRule::declared("conversations", "chatmessages", "conversationId", true),
    RelationshipRule::declared("conversations", "typingindicators", "conversationId", true),
];
