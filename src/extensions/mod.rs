//! Chart library extension points: plugins and registrable modules.

mod modules;
mod plugins;

pub use modules::{
    ComponentDescriptor, ComponentKind, DeferredModule, ModuleExport, ModuleFuture,
    ModuleSource, PendingModules, Registrable, register_modules,
};
pub use plugins::{
    ChartPlugin, EventRecorder, PluginContext, PluginEvent, SharedPlugin, shared_plugin,
};
