use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::future::{self, FutureExt, LocalBoxFuture};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::backend::ChartRegistry;
use crate::error::{BindingError, BindingResult};

use super::plugins::SharedPlugin;

/// Category of a chart library component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentKind {
    Controller,
    Element,
    Scale,
    Other,
}

/// Static registration record for a controller, element or scale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub id: String,
    pub kind: ComponentKind,
}

impl ComponentDescriptor {
    #[must_use]
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    #[must_use]
    pub fn controller(id: impl Into<String>) -> Self {
        Self::new(id, ComponentKind::Controller)
    }

    #[must_use]
    pub fn element(id: impl Into<String>) -> Self {
        Self::new(id, ComponentKind::Element)
    }

    #[must_use]
    pub fn scale(id: impl Into<String>) -> Self {
        Self::new(id, ComponentKind::Scale)
    }
}

/// Anything the chart library's global registry accepts.
#[derive(Clone)]
pub enum Registrable {
    Component(ComponentDescriptor),
    Plugin(SharedPlugin),
}

impl Registrable {
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Self::Component(descriptor) => descriptor.id.clone(),
            Self::Plugin(plugin) => plugin.borrow().id().to_owned(),
        }
    }

    #[must_use]
    pub fn as_plugin(&self) -> Option<&SharedPlugin> {
        match self {
            Self::Plugin(plugin) => Some(plugin),
            Self::Component(_) => None,
        }
    }
}

impl From<ComponentDescriptor> for Registrable {
    fn from(descriptor: ComponentDescriptor) -> Self {
        Self::Component(descriptor)
    }
}

impl From<SharedPlugin> for Registrable {
    fn from(plugin: SharedPlugin) -> Self {
        Self::Plugin(plugin)
    }
}

impl fmt::Debug for Registrable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component(descriptor) => f.debug_tuple("Component").field(descriptor).finish(),
            Self::Plugin(_) => f.debug_tuple("Plugin").field(&self.id()).finish(),
        }
    }
}

/// Resolved value of a deferred module: its default export.
#[derive(Debug, Clone)]
pub struct ModuleExport {
    pub default: Registrable,
}

impl ModuleExport {
    pub fn new(default: impl Into<Registrable>) -> Self {
        Self {
            default: default.into(),
        }
    }
}

pub type ModuleFuture = LocalBoxFuture<'static, BindingResult<ModuleExport>>;

/// Zero-argument loader producing a module export asynchronously.
pub struct DeferredModule {
    name: String,
    loader: Box<dyn FnOnce() -> ModuleFuture>,
}

impl DeferredModule {
    pub fn new<F, Fut>(name: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = BindingResult<ModuleExport>> + 'static,
    {
        Self {
            name: name.into(),
            loader: Box::new(move || loader().boxed_local()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn start(self) -> LocalBoxFuture<'static, BindingResult<ModuleExport>> {
        let name = self.name;
        let load = (self.loader)();
        async move {
            load.await.map_err(|err| match err {
                BindingError::ModuleLoad { .. } => err,
                other => BindingError::ModuleLoad {
                    module: name,
                    reason: other.to_string(),
                },
            })
        }
        .boxed_local()
    }
}

impl fmt::Debug for DeferredModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredModule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Module list entry: registered right away, or loaded first.
#[derive(Debug)]
pub enum ModuleSource {
    Immediate(Registrable),
    Deferred(DeferredModule),
}

impl ModuleSource {
    pub fn immediate(registrable: impl Into<Registrable>) -> Self {
        Self::Immediate(registrable.into())
    }

    pub fn deferred<F, Fut>(name: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = BindingResult<ModuleExport>> + 'static,
    {
        Self::Deferred(DeferredModule::new(name, loader))
    }
}

impl From<Registrable> for ModuleSource {
    fn from(registrable: Registrable) -> Self {
        Self::Immediate(registrable)
    }
}

impl From<DeferredModule> for ModuleSource {
    fn from(module: DeferredModule) -> Self {
        Self::Deferred(module)
    }
}

/// Completion of deferred module registration.
///
/// Resolves to the number of deferred descriptors registered. The host
/// drives it on its local executor; nothing deferred is registered until it
/// is polled to completion.
#[must_use = "deferred modules register only when the future is polled"]
pub struct PendingModules {
    inner: LocalBoxFuture<'static, BindingResult<usize>>,
}

impl PendingModules {
    pub(crate) fn new(inner: LocalBoxFuture<'static, BindingResult<usize>>) -> Self {
        Self { inner }
    }

    pub fn ready(result: BindingResult<usize>) -> Self {
        Self::new(future::ready(result).boxed_local())
    }

    /// Runs `then` with the outcome once registration settles.
    pub fn inspect_result(self, then: impl FnOnce(&BindingResult<usize>) + 'static) -> Self {
        Self::new(
            self.inner
                .map(move |result| {
                    then(&result);
                    result
                })
                .boxed_local(),
        )
    }
}

impl Future for PendingModules {
    type Output = BindingResult<usize>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl fmt::Debug for PendingModules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingModules").finish_non_exhaustive()
    }
}

/// Registers `sources` with `registry`.
///
/// Immediate entries are registered before this returns, in one call.
/// Deferred loaders are started together; once all resolve, their default
/// exports are registered in list order. A single rejection fails the whole
/// deferred set and none of it is registered.
pub fn register_modules(
    registry: Rc<dyn ChartRegistry>,
    sources: Vec<ModuleSource>,
) -> PendingModules {
    let mut immediate = Vec::new();
    let mut deferred = Vec::new();
    for source in sources {
        match source {
            ModuleSource::Immediate(registrable) => immediate.push(registrable),
            ModuleSource::Deferred(module) => deferred.push(module),
        }
    }

    if !immediate.is_empty() {
        debug!(count = immediate.len(), "registering immediate modules");
        registry.register(immediate);
    }
    if deferred.is_empty() {
        return PendingModules::ready(Ok(0));
    }

    let loads: Vec<_> = deferred.into_iter().map(DeferredModule::start).collect();
    PendingModules::new(
        async move {
            let exports = future::try_join_all(loads).await.inspect_err(|err| {
                warn!(error = %err, "deferred module registration aborted");
            })?;
            let count = exports.len();
            registry.register(exports.into_iter().map(|export| export.default).collect());
            debug!(count, "registered deferred modules");
            Ok(count)
        }
        .boxed_local(),
    )
}
