//! Configuration contribution merging.
//!
//! An application's configuration is assembled from independent
//! contributions: a tenant bundle, institution-specific record types,
//! field overrides, and so on. Each contribution may declare further
//! nested contributions (its `plugins`) that are folded in before the
//! contribution's own keys are applied, so later layers always win.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::warn;

/// Key under which a contribution declares its nested contributions.
///
/// The key is transient: it is consumed during merging and never appears
/// in a merged configuration.
pub const PLUGINS_KEY: &str = "plugins";

/// Shared context handed to dynamic configuration contributions.
#[derive(Debug, Clone, Default)]
pub struct PluginContext {
    /// Name of the tenant the application is being configured for.
    pub tenant: Option<String>,
    /// Arbitrary host-supplied values exposed to contributions.
    pub env: Map<String, Value>,
}

/// A single entry in a contribution's plugin list.
#[derive(Clone)]
pub enum Plugin {
    /// A ready-made partial configuration.
    Static(Value),
    /// A partial configuration computed from the shared context.
    Dynamic(Arc<dyn Fn(&PluginContext) -> Value + Send + Sync>),
}

impl Plugin {
    /// Wraps a closure as a dynamic plugin contribution.
    pub fn dynamic(build: impl Fn(&PluginContext) -> Value + Send + Sync + 'static) -> Self {
        Plugin::Dynamic(Arc::new(build))
    }

    fn resolve(&self, context: &PluginContext) -> Value {
        match self {
            Plugin::Static(value) => value.clone(),
            Plugin::Dynamic(build) => build(context),
        }
    }
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plugin::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Plugin::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A partial configuration plus the nested contributions to fold in first.
#[derive(Debug, Clone)]
pub struct Contribution {
    /// Contributions merged (in order) before `config`'s own keys.
    pub plugins: Vec<Plugin>,
    /// The contribution's own keys, deep-merged over all plugins.
    pub config: Value,
}

impl Contribution {
    /// Builds a contribution from a configuration value.
    ///
    /// A `plugins` array embedded in the value is extracted into the typed
    /// plugin list; entries that are not maps degrade to nothing with a
    /// warning, as does a `plugins` key that is not an array.
    pub fn new(config: Value) -> Self {
        match config {
            Value::Object(map) => Self::from_map(map),
            other => Contribution {
                plugins: Vec::new(),
                config: other,
            },
        }
    }

    /// Builds a contribution with an explicit plugin list.
    pub fn with_plugins(plugins: Vec<Plugin>, config: Value) -> Self {
        let mut contribution = Contribution::new(config);
        let mut all = plugins;
        all.append(&mut contribution.plugins);
        contribution.plugins = all;
        contribution
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        let plugins = match map.shift_remove(PLUGINS_KEY) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .into_iter()
                .filter_map(|entry| match entry {
                    Value::Object(_) => Some(Plugin::Static(entry)),
                    _ => {
                        warn!("ignoring plugin contribution that is not a map");
                        None
                    }
                })
                .collect(),
            Some(_) => {
                warn!("ignoring plugins declaration that is not a list");
                Vec::new()
            }
        };

        Contribution {
            plugins,
            config: Value::Object(map),
        }
    }
}

/// Merges one configuration at application startup.
///
/// Equivalent to [`merge_config`] with an empty target.
pub fn init_config(contribution: &Contribution, context: &PluginContext) -> Value {
    merge_config(Value::Object(Map::new()), contribution, context)
}

/// Folds a contribution into `target`.
///
/// The contribution's plugins are resolved (dynamic plugins are called
/// with `context`) and merged left-to-right first, each through a
/// recursive call to this function; the contribution's own keys are then
/// deep-merged over the accumulated result, so they win over every
/// plugin. Malformed plugin payloads degrade to an empty contribution
/// plus an advisory warning; the merge itself never fails.
///
/// Plugin graphs are assumed acyclic. A contribution that (transitively)
/// contributes itself recurses without bound.
pub fn merge_config(target: Value, contribution: &Contribution, context: &PluginContext) -> Value {
    let mut merged = target;

    for plugin in &contribution.plugins {
        merged = apply_plugin(merged, plugin, context);
    }

    let mut result = deep_merge(merged, &contribution.config);

    if let Value::Object(map) = &mut result {
        map.shift_remove(PLUGINS_KEY);
    }

    result
}

fn apply_plugin(target: Value, plugin: &Plugin, context: &PluginContext) -> Value {
    match plugin.resolve(context) {
        resolved @ Value::Object(_) => {
            merge_config(target, &Contribution::new(resolved), context)
        }
        _ => {
            warn!("ignoring plugin contribution that is not a map");
            target
        }
    }
}

/// Deep merge: maps merge key-by-key recursively; arrays and scalars are
/// replaced wholesale. Keys already present in the target keep their
/// position; new keys are appended.
fn deep_merge(target: Value, source: &Value) -> Value {
    match (target, source) {
        (Value::Object(mut merged), Value::Object(overlay)) => {
            for (key, overlay_child) in overlay {
                let child = match merged.get_mut(key) {
                    Some(existing) => deep_merge(std::mem::take(existing), overlay_child),
                    None => overlay_child.clone(),
                };
                merged.insert(key.clone(), child);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}
