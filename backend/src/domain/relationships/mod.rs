//! Parent/child relationships between collections.
//!
//! The [`RelationshipManager`] owns an immutable rule table and answers three
//! kinds of question about it:
//!
//! - graph queries (children, parents, cascade targets);
//! - a dependency-respecting processing order for a set of collections,
//!   failing with [`CycleDetected`] when the rules loop;
//! - data checks against a [`CollectionStore`]: orphaned references and
//!   whether a record can be deleted without stranding required children.
//!
//! Data problems are reported, never raised. Only a cycle in the rules is
//! fatal.

mod rules;

use std::borrow::Cow;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::ports::{CollectionStore, CollectionStoreError};
use crate::domain::{CollectionName, DocumentId, Filter, ID_FIELD, ValidationReport, referenced_ids};

/// Child documents inspected per rule when looking for orphans.
pub const ORPHAN_SAMPLE_LIMIT: usize = 100;

/// A foreign key from `child` documents to `parent` documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRule {
    parent: CollectionName,
    child: CollectionName,
    foreign_key: Cow<'static, str>,
    required: bool,
    condition: Option<(&'static str, &'static str)>,
}

impl RelationshipRule {
    /// Declare a rule from literals.
    pub const fn declared(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        required: bool,
    ) -> Self {
        Self {
            parent: CollectionName::from_static(parent),
            child: CollectionName::from_static(child),
            foreign_key: Cow::Borrowed(foreign_key),
            required,
            condition: None,
        }
    }

    /// Declare a rule that only applies to children whose `condition.0`
    /// field equals `condition.1`.
    pub const fn declared_when(
        parent: &'static str,
        child: &'static str,
        foreign_key: &'static str,
        required: bool,
        condition: (&'static str, &'static str),
    ) -> Self {
        Self {
            parent: CollectionName::from_static(parent),
            child: CollectionName::from_static(child),
            foreign_key: Cow::Borrowed(foreign_key),
            required,
            condition: Some(condition),
        }
    }

    /// Build a rule at runtime.
    pub fn new(
        parent: CollectionName,
        child: CollectionName,
        foreign_key: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            parent,
            child,
            foreign_key: Cow::Owned(foreign_key.into()),
            required,
            condition: None,
        }
    }

    /// Referenced collection.
    pub fn parent(&self) -> &CollectionName {
        &self.parent
    }

    /// Referencing collection.
    pub fn child(&self) -> &CollectionName {
        &self.child
    }

    /// Dotted path of the reference inside child documents.
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }

    /// Whether a dangling reference is an error rather than a warning.
    pub fn is_required(&self) -> bool {
        self.required
    }

    fn scoped(&self, filter: Filter) -> Filter {
        match self.condition {
            Some((field, value)) => Filter::And(vec![filter, Filter::eq(field, value)]),
            None => filter,
        }
    }
}

/// The rules form a loop through the named collection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Circular dependency detected involving {collection}")]
pub struct CycleDetected {
    /// Collection revisited while its own dependencies were being resolved.
    pub collection: CollectionName,
}

/// Outcome of [`RelationshipManager::can_delete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionCheck {
    /// True when nothing blocks the deletion.
    pub can_delete: bool,
    /// One message per blocking child collection.
    pub blockers: Vec<String>,
}

/// Rule table with graph queries and data checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipManager {
    rules: Vec<RelationshipRule>,
}

impl Default for RelationshipManager {
    fn default() -> Self {
        Self::standard()
    }
}

impl RelationshipManager {
    /// Manager over an explicit rule list.
    pub fn new(rules: Vec<RelationshipRule>) -> Self {
        Self { rules }
    }

    /// Manager over the marketplace rule table.
    pub fn standard() -> Self {
        Self::new(rules::STANDARD_RULES.to_vec())
    }

    /// Every rule in declaration order.
    pub fn rules(&self) -> &[RelationshipRule] {
        &self.rules
    }

    fn rules_from<'a>(
        &'a self,
        parent: &'a CollectionName,
    ) -> impl Iterator<Item = &'a RelationshipRule> + 'a {
        self.rules.iter().filter(move |rule| rule.parent == *parent)
    }

    /// Collections referencing `parent`, each once, in declaration order.
    pub fn child_collections(&self, parent: &CollectionName) -> Vec<CollectionName> {
        unique(self.rules_from(parent).map(|rule| &rule.child))
    }

    /// Collections `child` references, each once, in declaration order.
    pub fn parent_collections(&self, child: &CollectionName) -> Vec<CollectionName> {
        unique(
            self.rules
                .iter()
                .filter(|rule| rule.child == *child)
                .map(|rule| &rule.parent),
        )
    }

    /// Collections affected when a `parent` record goes away.
    pub fn cascade_collections(&self, parent: &CollectionName) -> Vec<CollectionName> {
        self.child_collections(parent)
    }

    /// Order `collections` so every collection follows its parents.
    ///
    /// Parents outside the input are ignored. Duplicates in the input are
    /// emitted once. Unrelated collections keep their input order.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{CollectionName, RelationshipManager};
    ///
    /// let names = ["menuitems", "menus", "users", "partners"]
    ///     .map(|n| CollectionName::new(n).expect("valid"));
    /// let order = RelationshipManager::standard()
    ///     .seeding_order(&names)
    ///     .expect("standard rules are acyclic");
    /// let position = |n: &str| order.iter().position(|c| c == n).expect("present");
    /// assert!(position("users") < position("partners"));
    /// assert!(position("partners") < position("menus"));
    /// assert!(position("menus") < position("menuitems"));
    /// ```
    pub fn seeding_order(
        &self,
        collections: &[CollectionName],
    ) -> Result<Vec<CollectionName>, CycleDetected> {
        let mut walk = OrderWalk {
            manager: self,
            requested: collections.iter().collect(),
            visiting: HashSet::new(),
            visited: HashSet::new(),
            order: Vec::with_capacity(collections.len()),
        };
        for collection in collections {
            walk.visit(collection)?;
        }
        Ok(walk.order)
    }

    /// Look for child documents whose references point nowhere.
    ///
    /// For every rule whose collections both exist, up to
    /// [`ORPHAN_SAMPLE_LIMIT`] children with the key set are checked.
    pub async fn validate_relationships(&self, store: &dyn CollectionStore) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            if let Err(err) = check_rule(store, rule, &mut report).await {
                report.warn(format!(
                    "Could not validate relationship {} -> {}: {err}",
                    rule.parent, rule.child
                ));
            }
        }
        report
    }

    /// Whether a record (or, without an id, any record) of `collection` can
    /// be deleted without stranding documents in required child collections.
    ///
    /// When several rules link the same pair of collections, the first one
    /// declared decides.
    pub async fn can_delete(
        &self,
        collection: &CollectionName,
        store: &dyn CollectionStore,
        record_id: Option<&DocumentId>,
    ) -> Result<DeletionCheck, CollectionStoreError> {
        let mut blockers = Vec::new();
        for child in self.child_collections(collection) {
            if !store.has_collection(&child).await? {
                continue;
            }
            let Some(rule) = self.rules_from(collection).find(|rule| rule.child == child) else {
                continue;
            };
            if !rule.required {
                continue;
            }
            let filter = match record_id {
                Some(id) => rule.scoped(Filter::eq(rule.foreign_key(), id.clone())),
                None => rule.scoped(Filter::All),
            };
            let dependants = store.count(&child, &filter).await?;
            if dependants > 0 {
                blockers.push(format!(
                    "{dependants} {child} records depend on this {collection}"
                ));
            }
        }
        Ok(DeletionCheck {
            can_delete: blockers.is_empty(),
            blockers,
        })
    }
}

async fn check_rule(
    store: &dyn CollectionStore,
    rule: &RelationshipRule,
    report: &mut ValidationReport,
) -> Result<(), CollectionStoreError> {
    if !store.has_collection(&rule.parent).await? || !store.has_collection(&rule.child).await? {
        debug!(
            parent = %rule.parent,
            child = %rule.child,
            "relationship skipped; collection missing"
        );
        return Ok(());
    }
    let filter = rule.scoped(Filter::exists(rule.foreign_key()));
    let children = store
        .find(&rule.child, &filter, Some(ORPHAN_SAMPLE_LIMIT))
        .await?;
    let references: Vec<DocumentId> = children
        .iter()
        .flat_map(|child| referenced_ids(child, rule.foreign_key()))
        .collect();
    if references.is_empty() {
        return Ok(());
    }

    let wanted: Vec<Value> = unique_ids(&references).into_iter().map(Value::from).collect();
    let found: HashSet<DocumentId> = store
        .find(&rule.parent, &Filter::AnyOf(ID_FIELD.to_owned(), wanted), None)
        .await?
        .iter()
        .filter_map(DocumentId::of)
        .collect();

    for id in references.iter().filter(|id| !found.contains(*id)) {
        let message = format!(
            "Orphaned {} record with {}: {id}",
            rule.child,
            rule.foreign_key()
        );
        if rule.required {
            report.fail(message);
        } else {
            report.warn(message);
        }
    }
    Ok(())
}

struct OrderWalk<'a> {
    manager: &'a RelationshipManager,
    requested: HashSet<&'a CollectionName>,
    visiting: HashSet<CollectionName>,
    visited: HashSet<CollectionName>,
    order: Vec<CollectionName>,
}

impl OrderWalk<'_> {
    fn visit(&mut self, collection: &CollectionName) -> Result<(), CycleDetected> {
        if self.visiting.contains(collection) {
            return Err(CycleDetected {
                collection: collection.clone(),
            });
        }
        if self.visited.contains(collection) {
            return Ok(());
        }
        self.visiting.insert(collection.clone());
        for parent in self.manager.parent_collections(collection) {
            if self.requested.contains(&parent) {
                self.visit(&parent)?;
            }
        }
        self.visiting.remove(collection);
        self.visited.insert(collection.clone());
        self.order.push(collection.clone());
        Ok(())
    }
}

fn unique<'a>(names: impl Iterator<Item = &'a CollectionName>) -> Vec<CollectionName> {
    let mut seen = HashSet::new();
    names
        .filter(|name| seen.insert(*name))
        .cloned()
        .collect()
}

fn unique_ids(ids: &[DocumentId]) -> Vec<DocumentId> {
    let mut seen = HashSet::new();
    ids.iter().filter(|id| seen.insert(*id)).cloned().collect()
}
