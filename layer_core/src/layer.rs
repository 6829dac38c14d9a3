use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use openxr::sys::{self as xr, pfn};

use crate::config::LayerConfig;
use crate::graphics::Platform;
use crate::next_table::NextCallTable;
use crate::registry::BindingRegistry;

/// How far the loader has taken the layer. `InstanceBootstrapped` is only
/// entered once the next call table is fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    Unregistered,
    Negotiated,
    InstanceBootstrapped,
}

/// What the most recent `xrCreateInstance` looked like. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSnapshot {
    pub handle: xr::Instance,
    pub application_name: String,
    pub application_version: u32,
    pub engine_name: String,
    pub engine_version: u32,
    pub api_version: xr::Version,
    pub enabled_extensions: Vec<String>,
    pub opengl_enable: bool,
}

/// All state of the layer. The loader facing entry points share one process
/// wide instance, see [`crate::layer`].
pub struct Layer {
    pub(crate) config: LayerConfig,
    pub(crate) platform: Platform,
    state: RwLock<LayerState>,
    next_get_instance_proc_addr: RwLock<Option<pfn::GetInstanceProcAddr>>,
    next: RwLock<Option<NextCallTable>>,
    bindings: BindingRegistry,
    snapshot: RwLock<Option<InstanceSnapshot>>,
}

impl Layer {
    pub fn new(config: LayerConfig, platform: Platform) -> Self {
        Self {
            config,
            platform,
            state: RwLock::new(LayerState::Unregistered),
            next_get_instance_proc_addr: RwLock::new(None),
            next: RwLock::new(None),
            bindings: BindingRegistry::new(),
            snapshot: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    pub fn state(&self) -> LayerState {
        *read(&self.state)
    }

    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    pub fn instance_snapshot(&self) -> Option<InstanceSnapshot> {
        read(&self.snapshot).clone()
    }

    pub(crate) fn set_state(&self, state: LayerState) {
        *write(&self.state) = state;
    }

    pub(crate) fn next_table(&self) -> Option<NextCallTable> {
        *read(&self.next)
    }

    pub(crate) fn set_next_table(&self, table: Option<NextCallTable>) {
        *write(&self.next) = table;
    }

    pub(crate) fn next_get_instance_proc_addr(&self) -> Option<pfn::GetInstanceProcAddr> {
        *read(&self.next_get_instance_proc_addr)
    }

    pub(crate) fn set_next_get_instance_proc_addr(&self, f: pfn::GetInstanceProcAddr) {
        *write(&self.next_get_instance_proc_addr) = Some(f);
    }

    pub(crate) fn set_instance_snapshot(&self, snapshot: InstanceSnapshot) {
        *write(&self.snapshot) = Some(snapshot);
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
