//! The extension registry.
//!
//! A [`PluginRegistry`] maps type tags to [`FieldRenderer`] implementations.
//! Built-in kinds are registered under `"boolean"`, `"number"` and `"string"`;
//! custom fields resolve through their custom type tag. Plugins bundle several
//! renderers under a name and are registered in order: for each tag the most
//! recent registration wins, which is how a plugin overrides a built-in kind.
//!
//! The registry is an explicit object passed by reference into each render
//! session; there is no process-wide instance. Registration takes `&mut self`,
//! so a registry shared across threads needs the caller's own lock.
//!
//! ```
//! use fibr_forms::{BoundField, FnRenderer, Plugin, PluginRegistry};
//!
//! let italic = FnRenderer::new(|field: &BoundField<'_>| Ok(format!("<i>{}</i>", field.key)));
//! let mut registry = PluginRegistry::with_builtins();
//! registry.register_plugin(Plugin::new("demo").renderer("string", italic));
//! assert_eq!(registry.origin("string"), Some("demo"));
//! assert!(registry.resolve("sample_type").is_err());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fibr_core::{FibrError, FibrResult};

use crate::bound_field::BoundField;
use crate::fields::FieldDescriptor;
use crate::widgets::{BooleanRenderer, NumberRenderer, StringRenderer};

/// Name under which directly registered renderers are recorded.
const DIRECT_ORIGIN: &str = "direct";

/// Renders one field to markup.
///
/// Renderers must be `Send + Sync` so a registry can be shared between
/// sessions on different threads.
pub trait FieldRenderer: Send + Sync + fmt::Debug {
    /// Renders `field`.
    fn render(&self, field: &BoundField<'_>) -> FibrResult<String>;
}

/// Adapts a closure into a [`FieldRenderer`].
pub struct FnRenderer<F> {
    func: F,
}

impl<F> FnRenderer<F>
where
    F: Fn(&BoundField<'_>) -> FibrResult<String> + Send + Sync,
{
    /// Wraps `func`.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> fmt::Debug for FnRenderer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnRenderer").finish_non_exhaustive()
    }
}

impl<F> FieldRenderer for FnRenderer<F>
where
    F: Fn(&BoundField<'_>) -> FibrResult<String> + Send + Sync,
{
    fn render(&self, field: &BoundField<'_>) -> FibrResult<String> {
        (self.func)(field)
    }
}

/// A named bundle of renderers.
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    renderers: Vec<(String, Arc<dyn FieldRenderer>)>,
}

impl Plugin {
    /// Creates an empty plugin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            renderers: Vec::new(),
        }
    }

    /// Adds a renderer for `tag`.
    #[must_use]
    pub fn renderer(self, tag: impl Into<String>, renderer: impl FieldRenderer + 'static) -> Self {
        self.renderer_arc(tag, Arc::new(renderer))
    }

    /// Adds a shared renderer for `tag`.
    #[must_use]
    pub fn renderer_arc(mut self, tag: impl Into<String>, renderer: Arc<dyn FieldRenderer>) -> Self {
        self.renderers.push((tag.into(), renderer));
        self
    }

    /// The plugin name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tags this plugin provides, in insertion order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.renderers.iter().map(|(tag, _)| tag.as_str())
    }

    /// The plugin providing the built-in renderers.
    pub fn builtin() -> Self {
        Self::new("builtin")
            .renderer("boolean", BooleanRenderer)
            .renderer("number", NumberRenderer)
            .renderer("string", StringRenderer)
    }
}

struct Registration {
    renderer: Arc<dyn FieldRenderer>,
    origin: String,
}

/// Maps type tags to renderers.
#[derive(Default)]
pub struct PluginRegistry {
    renderers: HashMap<String, Registration>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in renderers registered.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_plugin(Plugin::builtin());
        registry
    }

    /// Registers a single renderer. Replaces any earlier renderer for `tag`.
    pub fn register(&mut self, tag: impl Into<String>, renderer: Arc<dyn FieldRenderer>) {
        self.insert(tag.into(), renderer, DIRECT_ORIGIN);
    }

    /// Registers every renderer of `plugin`, in order.
    pub fn register_plugin(&mut self, plugin: Plugin) {
        let Plugin { name, renderers } = plugin;
        tracing::debug!(plugin = %name, renderers = renderers.len(), "registering plugin");
        for (tag, renderer) in renderers {
            self.insert(tag, renderer, &name);
        }
    }

    /// Registers several plugins; later plugins override earlier ones.
    pub fn register_plugins(&mut self, plugins: impl IntoIterator<Item = Plugin>) {
        for plugin in plugins {
            self.register_plugin(plugin);
        }
    }

    fn insert(&mut self, tag: String, renderer: Arc<dyn FieldRenderer>, origin: &str) {
        let registration = Registration {
            renderer,
            origin: origin.to_string(),
        };
        if let Some(previous) = self.renderers.insert(tag.clone(), registration) {
            tracing::debug!(
                tag = %tag,
                previous = %previous.origin,
                current = origin,
                "renderer overridden"
            );
        }
    }

    /// Resolves the renderer registered for `tag`.
    pub fn resolve(&self, tag: &str) -> FibrResult<Arc<dyn FieldRenderer>> {
        self.renderers
            .get(tag)
            .map(|registration| Arc::clone(&registration.renderer))
            .ok_or_else(|| FibrError::UnregisteredFieldType(tag.to_string()))
    }

    /// Resolves the renderer for a field through its registry tag.
    pub fn resolve_field(&self, field: &FieldDescriptor) -> FibrResult<Arc<dyn FieldRenderer>> {
        self.resolve(field.registry_tag())
    }

    /// Returns `true` if a renderer is registered for `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.renderers.contains_key(tag)
    }

    /// The name of the plugin that registered `tag` (`"direct"` for
    /// [`register`](Self::register)).
    pub fn origin(&self, tag: &str) -> Option<&str> {
        self.renderers
            .get(tag)
            .map(|registration| registration.origin.as_str())
    }

    /// All registered tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.renderers.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Returns the number of registered tags.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
