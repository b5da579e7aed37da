//! Host contexts: what the global object of a fresh realm contains.
//!
//! The runner never reaches for ambient global state; it asks its [`HostContext`] to populate each new realm.
//! [`ConformantHost`] installs the standard library with ES5 attributes. [`OverrideHost`] wraps another host and
//! patches the result, which is how tests model a non-conformant engine.

use crate::runtime::builtins::install_standard_globals;
use crate::runtime::{PropertyDescriptor, Realm, Value};

/// Populates the global object of each realm the runner creates.
///
/// Hosts are plain configuration shared across runs (and across the runner's worker thread), so they must be
/// `Send + Sync` and must not keep realm values between calls.
pub trait HostContext: Send + Sync {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Install globals into a freshly created realm.
    fn install_globals(&self, realm: &mut Realm);
}

/// The standard library as a conforming ES5 engine exposes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConformantHost;

impl HostContext for ConformantHost {
    fn name(&self) -> &str {
        "conformant"
    }

    fn install_globals(&self, realm: &mut Realm) {
        install_standard_globals(realm);
    }
}

impl<H: HostContext + ?Sized> HostContext for &H {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn install_globals(&self, realm: &mut Realm) {
        (**self).install_globals(realm);
    }
}

/// A primitive value a host can place on the global object.
#[derive(Debug, Clone, PartialEq)]
pub enum HostValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<&HostValue> for Value {
    fn from(value: &HostValue) -> Self {
        match value {
            HostValue::Undefined => Value::Undefined,
            HostValue::Null => Value::Null,
            HostValue::Bool(b) => Value::Bool(*b),
            HostValue::Number(n) => Value::Number(*n),
            HostValue::String(s) => Value::string(s.as_str()),
        }
    }
}

/// Attribute changes for an existing global; `None` keeps the installed flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttributeOverride {
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
enum GlobalOverride {
    Attributes { name: String, attributes: AttributeOverride },
    Remove { name: String },
    Define { name: String, value: HostValue },
}

/// A host that installs `base`, then rewrites selected globals.
///
/// ## Examples
/// ```rust
/// use t262::host::{AttributeOverride, ConformantHost, HostContext, OverrideHost};
///
/// let host = OverrideHost::new(ConformantHost).with_global_attributes(
///     "escape",
///     AttributeOverride { enumerable: Some(true), ..Default::default() },
/// );
/// assert_eq!(host.name(), "conformant+overrides");
/// ```
#[derive(Debug, Clone)]
pub struct OverrideHost<H> {
    base: H,
    name: String,
    overrides: Vec<GlobalOverride>,
}

impl<H: HostContext> OverrideHost<H> {
    pub fn new(base: H) -> Self {
        let name = format!("{}+overrides", base.name());
        Self {
            base,
            name,
            overrides: Vec::new(),
        }
    }

    /// Change the flags of global `name` after the base host installed it. Missing globals are left alone.
    pub fn with_global_attributes(mut self, name: impl Into<String>, attributes: AttributeOverride) -> Self {
        self.overrides.push(GlobalOverride::Attributes {
            name: name.into(),
            attributes,
        });
        self
    }

    /// Remove global `name` regardless of its attributes.
    pub fn without_global(mut self, name: impl Into<String>) -> Self {
        self.overrides.push(GlobalOverride::Remove { name: name.into() });
        self
    }

    /// Install (or replace) global `name` as a writable, non-enumerable, configurable value.
    pub fn with_global_value(mut self, name: impl Into<String>, value: HostValue) -> Self {
        self.overrides.push(GlobalOverride::Define {
            name: name.into(),
            value,
        });
        self
    }
}

impl<H: HostContext> HostContext for OverrideHost<H> {
    fn name(&self) -> &str {
        &self.name
    }

    fn install_globals(&self, realm: &mut Realm) {
        self.base.install_globals(realm);
        let global = realm.global();
        for change in &self.overrides {
            match change {
                GlobalOverride::Attributes { name, attributes } => {
                    let Some(desc) = realm.object_mut(global).properties.get_mut(name) else {
                        tracing::warn!(global = %name, "attribute override for missing global");
                        continue;
                    };
                    if let Some(writable) = attributes.writable {
                        desc.writable = writable;
                    }
                    if let Some(enumerable) = attributes.enumerable {
                        desc.enumerable = enumerable;
                    }
                    if let Some(configurable) = attributes.configurable {
                        desc.configurable = configurable;
                    }
                }
                GlobalOverride::Remove { name } => {
                    realm.object_mut(global).properties.remove(name);
                }
                GlobalOverride::Define { name, value } => {
                    realm.insert_property(global, name, PropertyDescriptor::hidden(value.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::DescriptorSource;

    fn realm_for(host: &impl HostContext) -> Realm {
        let mut realm = Realm::new();
        host.install_globals(&mut realm);
        realm
    }

    #[test]
    fn test_conformant_escape_attributes() {
        let realm = realm_for(&ConformantHost);
        let desc = realm.own_property_descriptor(realm.global(), "escape").unwrap();
        assert!(desc.writable && !desc.enumerable && desc.configurable);
        assert!(realm.is_callable(&desc.value));
    }

    #[test]
    fn test_override_changes_only_named_flags() {
        let host = OverrideHost::new(ConformantHost).with_global_attributes(
            "escape",
            AttributeOverride {
                enumerable: Some(true),
                ..Default::default()
            },
        );
        let realm = realm_for(&host);
        let desc = realm.own_property_descriptor(realm.global(), "escape").unwrap();
        assert!(desc.writable && desc.enumerable && desc.configurable);

        let untouched = realm.own_property_descriptor(realm.global(), "unescape").unwrap();
        assert!(!untouched.enumerable);
    }

    #[test]
    fn test_override_remove_and_define() {
        let host = OverrideHost::new(ConformantHost)
            .without_global("escape")
            .with_global_value("hostName", HostValue::String("test".into()));
        let realm = realm_for(&host);
        assert!(realm.own_property_descriptor(realm.global(), "escape").is_none());
        assert_eq!(realm.get(realm.global(), "hostName"), Value::string("test"));
    }
}
