//! Capture settings
//!
//! One configuration object covers the whole subsystem: which types and
//! properties are excluded, which property groups related history rows,
//! the application name stamped on records, and the timestamp source.
//!
//! Settings are assembled once during initialization and consumed by value
//! when the engine is constructed; there is no mutation API after that
//! point. Static "excluded from history" markers are supplied as predicate
//! closures rather than read through runtime reflection.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

/// Static type-level exclusion marker: `true` means the type never
/// participates in history capture
pub type TypeMarker = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// Static property-level exclusion marker over (entity type, property name)
pub type PropertyMarker = Box<dyn Fn(&str, &str) -> bool + Send + Sync>;

/// Timestamp source for record creation times
pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Process-wide capture configuration, frozen after setup
pub struct CaptureSettings {
    application: String,
    group_ids_enabled: bool,
    excluded_types: HashSet<String>,
    excluded_properties: HashMap<String, HashSet<String>>,
    group_properties: HashMap<String, String>,
    type_marker: Option<TypeMarker>,
    property_marker: Option<PropertyMarker>,
    clock: Clock,
}

impl CaptureSettings {
    /// Create settings for an application name with everything else default:
    /// no exclusions, group ids disabled, wall-clock timestamps
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            group_ids_enabled: false,
            excluded_types: HashSet::new(),
            excluded_properties: HashMap::new(),
            group_properties: HashMap::new(),
            type_marker: None,
            property_marker: None,
            clock: Box::new(Utc::now),
        }
    }

    /// Exclude an entity type entirely; no instance of it ever produces a
    /// history record
    pub fn exclude_type(mut self, entity_type: impl Into<String>) -> Self {
        self.excluded_types.insert(entity_type.into());
        self
    }

    /// Exclude one property of an entity type from captured change-sets
    pub fn exclude_property(
        mut self,
        entity_type: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        self.excluded_properties
            .entry(entity_type.into())
            .or_default()
            .insert(property.into());
        self
    }

    /// Tag history rows of an entity type with the value of the named
    /// property as their group id (requires [`enable_group_ids`](Self::enable_group_ids))
    pub fn group_by(
        mut self,
        entity_type: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        self.group_properties
            .insert(entity_type.into(), property.into());
        self
    }

    /// Turn on the global group-id switch
    pub fn enable_group_ids(mut self) -> Self {
        self.group_ids_enabled = true;
        self
    }

    /// Supply the static type-level exclusion marker
    pub fn with_type_marker(
        mut self,
        marker: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.type_marker = Some(Box::new(marker));
        self
    }

    /// Supply the static property-level exclusion marker
    pub fn with_property_marker(
        mut self,
        marker: impl Fn(&str, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.property_marker = Some(Box::new(marker));
        self
    }

    /// Replace the timestamp source (useful for deterministic tests)
    pub fn with_clock(
        mut self,
        clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Application name stamped on every record
    pub fn application(&self) -> &str {
        &self.application
    }

    /// Whether the global group-id switch is on
    pub fn group_ids_enabled(&self) -> bool {
        self.group_ids_enabled
    }

    /// Whether runtime configuration excludes this entity type
    pub fn has_excluded_type(&self, entity_type: &str) -> bool {
        self.excluded_types.contains(entity_type)
    }

    /// Runtime-configured excluded properties for an entity type, if any
    pub fn excluded_properties_for(&self, entity_type: &str) -> Option<&HashSet<String>> {
        self.excluded_properties.get(entity_type)
    }

    /// Group property configured for an entity type, if any
    pub fn group_property_for(&self, entity_type: &str) -> Option<&str> {
        self.group_properties.get(entity_type).map(String::as_str)
    }

    /// Whether the static marker excludes this entity type
    pub fn type_marked(&self, entity_type: &str) -> bool {
        match &self.type_marker {
            Some(marker) => marker(entity_type),
            None => false,
        }
    }

    /// Whether the static marker excludes this property
    pub fn property_marked(&self, entity_type: &str, property: &str) -> bool {
        match &self.property_marker {
            Some(marker) => marker(entity_type, property),
            None => false,
        }
    }

    /// Current timestamp from the configured source
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults() {
        let settings = CaptureSettings::new("billing-api");
        assert_eq!(settings.application(), "billing-api");
        assert!(!settings.group_ids_enabled());
        assert!(!settings.has_excluded_type("Blog"));
        assert!(settings.excluded_properties_for("Blog").is_none());
        assert!(settings.group_property_for("Blog").is_none());
        assert!(!settings.type_marked("Blog"));
        assert!(!settings.property_marked("Blog", "title"));
    }

    #[test]
    fn test_exclusion_tables() {
        let settings = CaptureSettings::new("billing-api")
            .exclude_type("AuditSnapshot")
            .exclude_property("Blog", "secret")
            .exclude_property("Blog", "etag");

        assert!(settings.has_excluded_type("AuditSnapshot"));
        let props = settings.excluded_properties_for("Blog").unwrap();
        assert!(props.contains("secret"));
        assert!(props.contains("etag"));
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_group_configuration() {
        let settings = CaptureSettings::new("billing-api")
            .enable_group_ids()
            .group_by("Order", "order_number");

        assert!(settings.group_ids_enabled());
        assert_eq!(settings.group_property_for("Order"), Some("order_number"));
        assert_eq!(settings.group_property_for("Invoice"), None);
    }

    #[test]
    fn test_markers() {
        let settings = CaptureSettings::new("billing-api")
            .with_type_marker(|ty| ty == "Ephemeral")
            .with_property_marker(|_, prop| prop.starts_with('_'));

        assert!(settings.type_marked("Ephemeral"));
        assert!(!settings.type_marked("Blog"));
        assert!(settings.property_marked("Blog", "_row_version"));
        assert!(!settings.property_marked("Blog", "title"));
    }

    #[test]
    fn test_injected_clock() {
        let fixed = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        let settings = CaptureSettings::new("billing-api").with_clock(move || fixed);
        assert_eq!(settings.now(), fixed);
        assert_eq!(settings.now(), fixed);
    }
}
