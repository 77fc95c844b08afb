use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::{debug, warn};

use crate::error::BindingResult;

use super::runtime::Runtime;

type MountHook = Box<dyn FnOnce() -> BindingResult<()>>;
type UnmountHook = Box<dyn FnOnce()>;

/// Mount/unmount hooks of one host component.
///
/// The host calls [`Lifecycle::mount`] after its element refs are bound and
/// [`Lifecycle::unmount`] on teardown.
pub struct Lifecycle {
    runtime: Runtime,
    mounted: Cell<bool>,
    on_mounted: RefCell<Vec<MountHook>>,
    on_unmounted: RefCell<Vec<UnmountHook>>,
}

impl Lifecycle {
    #[must_use]
    pub fn new(runtime: &Runtime) -> Self {
        Self {
            runtime: runtime.clone(),
            mounted: Cell::new(false),
            on_mounted: RefCell::new(Vec::new()),
            on_unmounted: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn on_mounted(&self, hook: impl FnOnce() -> BindingResult<()> + 'static) {
        self.on_mounted.borrow_mut().push(Box::new(hook));
    }

    pub fn on_unmounted(&self, hook: impl FnOnce() + 'static) {
        self.on_unmounted.borrow_mut().push(Box::new(hook));
    }

    /// Runs `hook` now when already mounted, otherwise defers it to mount.
    pub fn try_on_mounted(
        &self,
        hook: impl FnOnce() -> BindingResult<()> + 'static,
    ) -> BindingResult<()> {
        if self.is_mounted() {
            return hook();
        }
        self.on_mounted(hook);
        Ok(())
    }

    /// Marks the component mounted and runs pending mount hooks in order.
    ///
    /// Every hook runs; the first failure is returned.
    pub fn mount(&self) -> BindingResult<()> {
        if self.mounted.replace(true) {
            return Ok(());
        }
        let hooks = std::mem::take(&mut *self.on_mounted.borrow_mut());
        debug!(hooks = hooks.len(), "mounting component");
        let mut first_error = None;
        for hook in hooks {
            if let Err(err) = hook() {
                warn!(error = %err, "mount hook failed");
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn unmount(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        let hooks = std::mem::take(&mut *self.on_unmounted.borrow_mut());
        debug!(hooks = hooks.len(), "unmounting component");
        for hook in hooks.into_iter().rev() {
            hook();
        }
    }
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("mounted", &self.mounted.get())
            .field("pending_mount_hooks", &self.on_mounted.borrow().len())
            .finish()
    }
}
