//! Named renderers and their change subscriptions.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use canvas_grid_core::ConnectionId;
use canvas_grid_core::logging::targets;

use crate::cells::CellRenderer;

type Listener = Arc<dyn Fn() + Send + Sync>;

/// Renderers keyed by name, plus the fallbacks for body cells and headers.
///
/// Cloning is cheap: the name table is shared until one of the clones is
/// modified, so a viewport can take a snapshot for every paint.
#[derive(Clone)]
pub struct RendererSet {
    named: Arc<HashMap<String, Arc<dyn CellRenderer>>>,
    default: Arc<dyn CellRenderer>,
    header: Arc<dyn CellRenderer>,
}

impl RendererSet {
    pub fn new(default: Arc<dyn CellRenderer>, header: Arc<dyn CellRenderer>) -> Self {
        Self {
            named: Arc::new(HashMap::new()),
            default,
            header,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn CellRenderer>> {
        self.named.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    /// The renderer for a body cell naming `name`.
    pub fn resolve(&self, name: Option<&str>) -> &Arc<dyn CellRenderer> {
        self.resolve_or(name, &self.default)
    }

    /// The renderer for a header section naming `name`.
    pub fn resolve_header(&self, name: Option<&str>) -> &Arc<dyn CellRenderer> {
        self.resolve_or(name, &self.header)
    }

    fn resolve_or<'a>(
        &'a self,
        name: Option<&str>,
        fallback: &'a Arc<dyn CellRenderer>,
    ) -> &'a Arc<dyn CellRenderer> {
        let Some(name) = name else {
            return fallback;
        };
        self.named.get(name).unwrap_or_else(|| {
            tracing::trace!(target: targets::RENDERER, name, "unregistered renderer, using fallback");
            fallback
        })
    }

    pub fn default_renderer(&self) -> &Arc<dyn CellRenderer> {
        &self.default
    }

    pub fn header_renderer(&self) -> &Arc<dyn CellRenderer> {
        &self.header
    }

    /// Every distinct renderer held, by identity.
    fn distinct(&self) -> Vec<Arc<dyn CellRenderer>> {
        let mut distinct: Vec<Arc<dyn CellRenderer>> = Vec::new();
        let all = [&self.default, &self.header]
            .into_iter()
            .chain(self.named.values());
        for renderer in all {
            if !distinct.iter().any(|r| Arc::ptr_eq(r, renderer)) {
                distinct.push(renderer.clone());
            }
        }
        distinct
    }
}

impl fmt::Debug for RendererSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("RendererSet")
            .field("names", &names)
            .finish_non_exhaustive()
    }
}

/// A live connection to one renderer's `changed` signal.
///
/// Dropping it disconnects.
struct Subscription {
    renderer: Arc<dyn CellRenderer>,
    id: ConnectionId,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.renderer.changed().disconnect(self.id);
    }
}

/// A [`RendererSet`] that tracks renderer changes.
///
/// With a listener installed, the registry keeps exactly one subscription to
/// the `changed` signal of every distinct renderer it holds, however many
/// names or roles share it. Subscriptions are released when a renderer leaves
/// the registry and when the registry is dropped.
pub struct RendererRegistry {
    set: RendererSet,
    listener: Option<Listener>,
    subscriptions: Vec<Subscription>,
}

impl RendererRegistry {
    pub fn new(default: Arc<dyn CellRenderer>, header: Arc<dyn CellRenderer>) -> Self {
        Self {
            set: RendererSet::new(default, header),
            listener: None,
            subscriptions: Vec::new(),
        }
    }

    /// The current renderers.
    pub fn renderers(&self) -> &RendererSet {
        &self.set
    }

    /// A snapshot that stays valid while the registry changes.
    pub fn snapshot(&self) -> RendererSet {
        self.set.clone()
    }

    /// Call `listener` whenever any held renderer reports a change.
    pub fn set_listener(&mut self, listener: impl Fn() + Send + Sync + 'static) {
        self.subscriptions.clear();
        self.listener = Some(Arc::new(listener));
        self.resubscribe();
    }

    /// Register `renderer` under `name`, returning the renderer it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        renderer: Arc<dyn CellRenderer>,
    ) -> Option<Arc<dyn CellRenderer>> {
        let name = name.into();
        tracing::debug!(target: targets::RENDERER, %name, "renderer registered");
        let previous = Arc::make_mut(&mut self.set.named).insert(name, renderer);
        self.resubscribe();
        previous
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn CellRenderer>> {
        if !self.set.contains(name) {
            return None;
        }
        let removed = Arc::make_mut(&mut self.set.named).remove(name);
        self.resubscribe();
        removed
    }

    pub fn set_default_renderer(&mut self, renderer: Arc<dyn CellRenderer>) {
        self.set.default = renderer;
        self.resubscribe();
    }

    pub fn set_header_renderer(&mut self, renderer: Arc<dyn CellRenderer>) {
        self.set.header = renderer;
        self.resubscribe();
    }

    /// Number of renderer `changed` signals currently subscribed to.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Drop subscriptions to renderers no longer held and add ones for new renderers.
    fn resubscribe(&mut self) {
        let Some(listener) = self.listener.clone() else {
            return;
        };
        let distinct = self.set.distinct();

        self.subscriptions
            .retain(|s| distinct.iter().any(|r| Arc::ptr_eq(r, &s.renderer)));

        for renderer in distinct {
            if self
                .subscriptions
                .iter()
                .any(|s| Arc::ptr_eq(&s.renderer, &renderer))
            {
                continue;
            }
            let listener = listener.clone();
            let id = renderer.changed().connect(move |_| listener());
            self.subscriptions.push(Subscription { renderer, id });
        }
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("set", &self.set)
            .field("subscriptions", &self.subscriptions.len())
            .finish_non_exhaustive()
    }
}
