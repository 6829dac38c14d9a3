pub mod config;
mod entry;
pub mod graphics;
pub mod interceptors;
mod layer;
#[allow(dead_code)]
pub mod loader_interfaces;
mod negotiate;
pub mod next_table;
pub mod registry;

#[cfg(test)]
mod testing;

use std::panic::AssertUnwindSafe;

use lazy_static::lazy_static;
use log::error;
use openxr::sys as xr;

pub use config::LayerConfig;
pub use layer::{InstanceSnapshot, Layer, LayerState};

use graphics::Platform;

pub const LAYER_NAME: &str = "XR_APILAYER_gl_context_fix";

/// Extension whose presence marks an instance as rendering through OpenGL.
pub const OPENGL_ENABLE_EXTENSION_NAME: &str = "XR_KHR_opengl_enable";

lazy_static! {
    static ref LAYER: Layer = Layer::new(LayerConfig::from_env(), Platform::native());
}

/// The layer instance the loader talks to.
pub fn layer() -> &'static Layer {
    &LAYER
}

/// The two functions handed to the loader during negotiation.
pub fn static_initialize() -> (
    xr::pfn::GetInstanceProcAddr,
    loader_interfaces::FnCreateApiLayerInstance,
) {
    (
        interceptors::get_instance_proc_addr,
        entry::create_api_layer_instance,
    )
}

/// Runs the body of an `extern "system"` entry point. Panics must not unwind
/// into the loader, so they are reported as a runtime failure.
pub(crate) fn catch_ffi<F>(name: &str, f: F) -> xr::Result
where
    F: FnOnce() -> openxr::Result<xr::Result>,
{
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_or_else(
        |_| {
            error!("Panic in {}", name);
            xr::Result::ERROR_RUNTIME_FAILURE
        },
        |res| match res {
            Ok(res) => res,
            Err(res) => res,
        },
    )
}

pub trait ToResult {
    fn result(self) -> Result<Self, Self>
    where
        Self: Sized + Copy,
    {
        ToResult::result2(self, self)
    }

    fn result2<T>(self, ok: T) -> Result<T, Self>
    where
        Self: Sized + Copy;
}

impl ToResult for xr::Result {
    fn result2<T>(self, ok: T) -> Result<T, Self> {
        if self.into_raw() >= 0 {
            Ok(ok)
        } else {
            Err(self)
        }
    }
}
