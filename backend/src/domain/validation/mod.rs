//! Declarative data-quality checks over stored collections.
//!
//! [`DataValidator`] applies per-collection [`DataValidationRule`]s to a
//! sample of each collection, then a fixed set of cross-collection business
//! checks. Findings accumulate in a [`ValidationReport`]; a store failure
//! ends the run early but is itself reported rather than raised.

mod report;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::ports::{CollectionStore, CollectionStoreError};
use crate::domain::{CollectionName, Document, Filter, is_truthy};

pub use self::report::ValidationReport;

/// Documents sampled per collection when applying rules.
pub const RULE_SAMPLE_LIMIT: usize = 100;
/// Orders inspected by the total-amount check.
pub const ORDER_SAMPLE_LIMIT: usize = 50;
/// Largest tolerated gap between an order total and the sum of its lines.
pub const ORDER_TOTAL_TOLERANCE: f64 = 0.01;
/// Sample string fields longer than this are shortened.
pub const SAMPLE_STRING_LIMIT: usize = 100;

const SENSITIVE_FIELDS: [&str; 2] = ["password", "__v"];

/// What a [`DataValidationRule`] checks.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleKind {
    /// The field must be truthy.
    Required,
    /// No two documents may share a non-null value.
    Unique,
    /// Numeric values must lie within the bounds that are set.
    Range { min: Option<f64>, max: Option<f64> },
    /// The field must hold a reference into `collection`.
    Reference { collection: CollectionName },
    /// Reserved for field syntax checks; currently accepts everything.
    Format,
}

/// One declarative check on a collection field.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidationRule {
    /// Collection the rule samples.
    pub collection: CollectionName,
    /// Top-level field under check.
    pub field: &'static str,
    pub kind: RuleKind,
    /// Human-readable description of the rule.
    pub message: &'static str,
}

impl DataValidationRule {
    const fn new(
        collection: &'static str,
        field: &'static str,
        kind: RuleKind,
        message: &'static str,
    ) -> Self {
        Self {
            collection: CollectionName::from_static(collection),
            field,
            kind,
            message,
        }
    }

    const fn required(
        collection: &'static str,
        field: &'static str,
        message: &'static str,
    ) -> Self {
        Self::new(collection, field, RuleKind::Required, message)
    }

    const fn minimum(collection: &'static str, field: &'static str, message: &'static str) -> Self {
        Self::new(
            collection,
            field,
            RuleKind::Range {
                min: Some(0.0),
                max: None,
            },
            message,
        )
    }

    const fn reference(
        collection: &'static str,
        field: &'static str,
        target: &'static str,
        message: &'static str,
    ) -> Self {
        Self::new(
            collection,
            field,
            RuleKind::Reference {
                collection: CollectionName::from_static(target),
            },
            message,
        )
    }
}

/// Rules applied by [`DataValidator::standard`], grouped by collection.
pub fn standard_rules() -> Vec<DataValidationRule> {
    vec![
        DataValidationRule::required("users", "email", "Email is required"),
        DataValidationRule::new("users", "email", RuleKind::Unique, "Email must be unique"),
        DataValidationRule::required("users", "role", "Role is required"),
        DataValidationRule::required("partners", "businessName", "Business name is required"),
        DataValidationRule::reference("partners", "user", "users", "Partner must reference valid user"),
        DataValidationRule::minimum("orders", "totalAmount", "Total amount must be positive"),
        DataValidationRule::reference("orders", "customer", "users", "Order must reference valid customer"),
        DataValidationRule::reference(
            "orders",
            "businessPartner",
            "users",
            "Order must reference valid business partner",
        ),
        DataValidationRule::minimum("menuitems", "price", "Price must be positive"),
        DataValidationRule::reference(
            "menuitems",
            "businessPartner",
            "users",
            "Menu item must reference valid business partner",
        ),
        DataValidationRule::reference(
            "menuitems",
            "category",
            "categories",
            "Menu item must reference valid category",
        ),
        DataValidationRule::minimum("payments", "amount", "Payment amount must be positive"),
        DataValidationRule::reference("payments", "customerId", "users", "Payment must reference valid customer"),
        DataValidationRule::reference(
            "subscriptions",
            "customer",
            "users",
            "Subscription must reference valid customer",
        ),
        DataValidationRule::reference(
            "subscriptions",
            "plan",
            "subscriptionplans",
            "Subscription must reference valid plan",
        ),
        DataValidationRule::required("conversations", "type", "Conversation type is required"),
        DataValidationRule::reference(
            "chatmessages",
            "conversationId",
            "conversations",
            "Message must reference valid conversation",
        ),
        DataValidationRule::reference("chatmessages", "senderId", "users", "Message must reference valid sender"),
    ]
}

/// Health summary for one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub collection: CollectionName,
    /// Document count, or `-1` when the collection could not be read.
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_record: Option<Document>,
    pub issues: Vec<String>,
}

/// Applies [`DataValidationRule`]s and business checks to a store.
#[derive(Debug, Clone, PartialEq)]
pub struct DataValidator {
    rules: Vec<DataValidationRule>,
}

impl Default for DataValidator {
    fn default() -> Self {
        Self::standard()
    }
}

impl DataValidator {
    /// Validator over an explicit rule list.
    pub fn new(rules: Vec<DataValidationRule>) -> Self {
        Self { rules }
    }

    /// Validator over the marketplace rules.
    pub fn standard() -> Self {
        Self::new(standard_rules())
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[DataValidationRule] {
        &self.rules
    }

    /// Run every rule and business check, logging the outcome.
    pub async fn validate_all_collections(&self, store: &dyn CollectionStore) -> ValidationReport {
        info!("starting data validation");
        let mut report = ValidationReport::default();
        if let Err(err) = self.run(store, &mut report).await {
            report.fail(format!("Validation process failed: {err}"));
        }
        report.log("Data validation");
        report
    }

    async fn run(
        &self,
        store: &dyn CollectionStore,
        report: &mut ValidationReport,
    ) -> Result<(), CollectionStoreError> {
        for (collection, rules) in self.grouped() {
            if !store.has_collection(collection).await? {
                report.warn(format!("Model not found for collection: {collection}"));
                continue;
            }
            validate_collection(store, collection, &rules, report).await?;
        }
        check_order_totals(store, report).await?;
        check_subscription_dates(store, report).await?;
        Ok(())
    }

    /// Rules grouped by collection, groups ordered by first appearance.
    fn grouped(&self) -> Vec<(&CollectionName, Vec<&DataValidationRule>)> {
        let mut groups: Vec<(&CollectionName, Vec<&DataValidationRule>)> = Vec::new();
        for rule in &self.rules {
            match groups.iter_mut().find(|(name, _)| **name == rule.collection) {
                Some((_, rules)) => rules.push(rule),
                None => groups.push((&rule.collection, vec![rule])),
            }
        }
        groups
    }

    /// Count, sample, and basic issues for every collection in the store,
    /// largest first.
    pub async fn collection_stats(
        &self,
        store: &dyn CollectionStore,
    ) -> Result<Vec<CollectionStats>, CollectionStoreError> {
        let mut stats = Vec::new();
        for collection in store.collections().await? {
            stats.push(stats_for(store, collection).await);
        }
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(stats)
    }
}

async fn validate_collection(
    store: &dyn CollectionStore,
    collection: &CollectionName,
    rules: &[&DataValidationRule],
    report: &mut ValidationReport,
) -> Result<(), CollectionStoreError> {
    debug!(%collection, "validating collection");
    let total = store.count(collection, &Filter::All).await?;
    if total == 0 {
        report.warn(format!("Collection {collection} is empty"));
        return Ok(());
    }
    let sample = store
        .find(collection, &Filter::All, Some(RULE_SAMPLE_LIMIT))
        .await?;

    for rule in rules {
        let field = rule.field;
        match &rule.kind {
            RuleKind::Required => {
                let missing = count_where(&sample, |doc| !is_truthy(doc.get(field)));
                if missing > 0 {
                    report.fail(format!(
                        "{collection}: {missing} records missing required field '{field}'"
                    ));
                }
            }
            RuleKind::Unique => {
                let groups = store.duplicate_groups(collection, field).await?;
                if groups > 0 {
                    report.fail(format!(
                        "{collection}: {groups} duplicate values found in field '{field}'"
                    ));
                }
            }
            RuleKind::Range { min, max } => {
                let outside = count_where(&sample, |doc| {
                    doc.get(field)
                        .and_then(Value::as_f64)
                        .is_some_and(|value| out_of_range(value, *min, *max))
                });
                if outside > 0 {
                    report.warn(format!(
                        "{collection}: {outside} records with '{field}' out of range"
                    ));
                }
            }
            RuleKind::Reference { .. } => {
                let missing = count_where(&sample, |doc| !is_truthy(doc.get(field)));
                if missing > 0 {
                    report.fail(format!(
                        "{collection}: {missing} records with missing reference '{field}'"
                    ));
                }
            }
            RuleKind::Format => {}
        }
    }
    Ok(())
}

fn count_where(sample: &[Document], predicate: impl Fn(&Document) -> bool) -> usize {
    sample.iter().filter(|doc| predicate(doc)).count()
}

fn out_of_range(value: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_some_and(|min| value < min) || max.is_some_and(|max| value > max)
}

const ORDERS: CollectionName = CollectionName::from_static("orders");
const SUBSCRIPTIONS: CollectionName = CollectionName::from_static("subscriptions");

async fn check_order_totals(
    store: &dyn CollectionStore,
    report: &mut ValidationReport,
) -> Result<(), CollectionStoreError> {
    if !store.has_collection(&ORDERS).await? {
        return Ok(());
    }
    let orders = store
        .find(&ORDERS, &Filter::All, Some(ORDER_SAMPLE_LIMIT))
        .await?;
    let mismatched = count_where(&orders, total_mismatch);
    if mismatched > 0 {
        report.warn(format!(
            "Orders: {mismatched} orders with total amount mismatch"
        ));
    }
    Ok(())
}

/// An order whose line prices do not add up to its `totalAmount`.
///
/// Orders without an `items` array or a numeric `totalAmount` are not
/// checked.
fn total_mismatch(order: &Document) -> bool {
    let Some(Value::Array(items)) = order.get("items") else {
        return false;
    };
    let calculated: f64 = items
        .iter()
        .map(|item| item.get("price").and_then(Value::as_f64).unwrap_or(0.0))
        .sum();
    order
        .get("totalAmount")
        .and_then(Value::as_f64)
        .is_some_and(|total| (calculated - total).abs() > ORDER_TOTAL_TOLERANCE)
}

async fn check_subscription_dates(
    store: &dyn CollectionStore,
    report: &mut ValidationReport,
) -> Result<(), CollectionStoreError> {
    if !store.has_collection(&SUBSCRIPTIONS).await? {
        return Ok(());
    }
    let filter = Filter::FieldGteField("startDate".to_owned(), "endDate".to_owned());
    let invalid = store.count(&SUBSCRIPTIONS, &filter).await?;
    if invalid > 0 {
        report.warn(format!(
            "Subscriptions: {invalid} subscriptions with invalid date ranges"
        ));
    }
    Ok(())
}

async fn stats_for(store: &dyn CollectionStore, collection: CollectionName) -> CollectionStats {
    let read = async {
        let count = store.count(&collection, &Filter::All).await?;
        let sample = if count > 0 {
            store.find(&collection, &Filter::All, Some(1)).await?.into_iter().next()
        } else {
            None
        };
        Ok::<_, CollectionStoreError>((count, sample))
    };
    match read.await {
        Ok((count, sample)) => CollectionStats {
            count: i64::try_from(count).unwrap_or(i64::MAX),
            sample_record: sample.map(sanitize),
            issues: if count == 0 {
                vec!["Collection is empty".to_owned()]
            } else {
                Vec::new()
            },
            collection,
        },
        Err(err) => CollectionStats {
            collection,
            count: -1,
            sample_record: None,
            issues: vec![format!("Error accessing collection: {err}")],
        },
    }
}

/// Strip credentials and bookkeeping fields and shorten long strings.
pub fn sanitize(mut record: Document) -> Document {
    for field in SENSITIVE_FIELDS {
        record.remove(field);
    }
    for value in record.values_mut() {
        let Value::String(text) = value else {
            continue;
        };
        if text.chars().count() > SAMPLE_STRING_LIMIT {
            let mut shortened: String = text.chars().take(SAMPLE_STRING_LIMIT).collect();
            shortened.push_str("...");
            *text = shortened;
        }
    }
    record
}
