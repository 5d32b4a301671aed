//! Exclusion rules and their per-type resolution
//!
//! A type or property stays out of history capture if either the static
//! markers or the runtime configuration say so (union semantics). The merged
//! rule for a type is computed once and memoized; types do not change shape
//! at runtime, and configuration is frozen after setup, so the cache never
//! needs invalidation. Changing configuration after first use is
//! unspecified.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::config::CaptureSettings;
use crate::entry::{PropertySnapshot, TrackedEntry};

/// Merged exclusion decision for one entity type
#[derive(Debug, Clone, Default)]
pub struct ExclusionRule {
    /// The whole type is excluded; no record is ever produced for it
    pub exclude_type: bool,
    /// Property names kept out of captured change-sets
    pub excluded_properties: HashSet<String>,
}

impl ExclusionRule {
    /// Whether a property of this type participates in capture
    pub fn allows(&self, property: &str) -> bool {
        !self.exclude_type && !self.excluded_properties.contains(property)
    }
}

/// Resolves and memoizes exclusion rules per entity type
///
/// The cache is shared across sessions in the process; reads and inserts
/// are safe concurrently, and two callers racing to compute the same rule
/// simply do the same pure work twice.
pub struct ExclusionResolver {
    settings: Arc<CaptureSettings>,
    rules: DashMap<String, Arc<ExclusionRule>>,
}

impl ExclusionResolver {
    pub fn new(settings: Arc<CaptureSettings>) -> Self {
        Self {
            settings,
            rules: DashMap::new(),
        }
    }

    /// The merged rule for this entry's type, computed on first sight
    pub fn rule_for<E: TrackedEntry>(&self, entry: &E) -> Arc<ExclusionRule> {
        if let Some(rule) = self.rules.get(entry.entity_type()) {
            return Arc::clone(rule.value());
        }

        let computed = Arc::new(self.compute(entry));
        trace!(entity_type = entry.entity_type(), "resolved exclusion rule");
        let guard = self
            .rules
            .entry(entry.entity_type().to_string())
            .or_insert(computed);
        Arc::clone(guard.value())
    }

    /// Whether this entry's type is excluded from capture entirely
    pub fn is_excluded<E: TrackedEntry>(&self, entry: &E) -> bool {
        self.rule_for(entry).exclude_type
    }

    /// The entry's properties minus the excluded ones
    pub fn eligible<'e, E: TrackedEntry>(&self, entry: &'e E) -> Vec<&'e PropertySnapshot> {
        let rule = self.rule_for(entry);
        if rule.exclude_type {
            return Vec::new();
        }
        entry
            .properties()
            .iter()
            .filter(|p| rule.allows(&p.name))
            .collect()
    }

    fn compute<E: TrackedEntry>(&self, entry: &E) -> ExclusionRule {
        let entity_type = entry.entity_type();

        let exclude_type = self.settings.has_excluded_type(entity_type)
            || self.settings.type_marked(entity_type);
        if exclude_type {
            // Type-level exclusion short-circuits property collection
            return ExclusionRule {
                exclude_type: true,
                excluded_properties: HashSet::new(),
            };
        }

        let mut excluded_properties = self
            .settings
            .excluded_properties_for(entity_type)
            .cloned()
            .unwrap_or_default();
        for property in entry.properties() {
            if self.settings.property_marked(entity_type, &property.name) {
                excluded_properties.insert(property.name.clone());
            }
        }

        ExclusionRule {
            exclude_type: false,
            excluded_properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{EntityState, RecordedEntry};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn blog_entry() -> RecordedEntry {
        RecordedEntry::new("Blog", EntityState::Updated)
            .with_unchanged("id", json!(1))
            .with_unchanged("title", json!("Hello"))
            .with_unchanged("secret", json!("s3cr3t"))
    }

    fn resolver(settings: CaptureSettings) -> ExclusionResolver {
        ExclusionResolver::new(Arc::new(settings))
    }

    #[test]
    fn test_nothing_excluded_by_default() {
        let resolver = resolver(CaptureSettings::new("app"));
        let entry = blog_entry();

        assert!(!resolver.is_excluded(&entry));
        let eligible = resolver.eligible(&entry);
        assert_eq!(eligible.len(), 3);
    }

    #[test]
    fn test_type_exclusion_from_configuration() {
        let resolver = resolver(CaptureSettings::new("app").exclude_type("Blog"));
        let entry = blog_entry();

        assert!(resolver.is_excluded(&entry));
        assert!(resolver.eligible(&entry).is_empty());
    }

    #[test]
    fn test_type_exclusion_from_marker() {
        let resolver =
            resolver(CaptureSettings::new("app").with_type_marker(|ty| ty == "Blog"));
        assert!(resolver.is_excluded(&blog_entry()));
    }

    #[test]
    fn test_property_exclusion_union_of_both_sources() {
        let settings = CaptureSettings::new("app")
            .exclude_property("Blog", "secret")
            .with_property_marker(|_, prop| prop == "id");
        let resolver = resolver(settings);
        let entry = blog_entry();

        let rule = resolver.rule_for(&entry);
        assert!(!rule.exclude_type);
        assert!(!rule.allows("secret"));
        assert!(!rule.allows("id"));
        assert!(rule.allows("title"));

        let eligible = resolver.eligible(&entry);
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].name, "title");
    }

    #[test]
    fn test_type_exclusion_short_circuits_property_marker() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let settings = CaptureSettings::new("app")
            .exclude_type("Blog")
            .with_property_marker(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
                false
            });
        let resolver = resolver(settings);

        assert!(resolver.is_excluded(&blog_entry()));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rule_memoized_per_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let settings = CaptureSettings::new("app").with_type_marker(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });
        let resolver = resolver(settings);
        let entry = blog_entry();

        resolver.rule_for(&entry);
        resolver.rule_for(&entry);
        resolver.eligible(&entry);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A different type computes its own rule
        let other = RecordedEntry::new("Post", EntityState::Updated);
        resolver.rule_for(&other);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
