use std::ffi::CStr;
use std::os::raw::c_char;

use log::{debug, error, info, warn};
use openxr::sys as xr;
use openxr::Result;

use crate::loader_interfaces::*;
use crate::negotiate::version_string;
use crate::next_table::NextCallTable;
use crate::{
    InstanceSnapshot, Layer, LayerState, ToResult, LAYER_NAME, OPENGL_ENABLE_EXTENSION_NAME,
};

pub(crate) unsafe extern "system" fn create_api_layer_instance(
    instance_info: *const xr::InstanceCreateInfo,
    layer_info: *const ApiLayerCreateInfo,
    instance: *mut xr::Instance,
) -> xr::Result {
    crate::layer().create_api_layer_instance(instance_info, layer_info, instance)
}

impl Layer {
    /// Handles `xrCreateApiLayerInstance`: creates the instance through the rest
    /// of the chain, then resolves the next implementation of every fixed-up
    /// operation. Any failure is returned to the loader as is.
    ///
    /// # Safety
    /// The pointers must be those the loader passes to `xrCreateApiLayerInstance`.
    pub unsafe fn create_api_layer_instance(
        &self,
        instance_info: *const xr::InstanceCreateInfo,
        layer_info: *const ApiLayerCreateInfo,
        instance: *mut xr::Instance,
    ) -> xr::Result {
        crate::catch_ffi("xrCreateApiLayerInstance", || {
            match (instance_info.as_ref(), layer_info.as_ref(), instance.as_mut()) {
                (Some(instance_info), Some(layer_info), Some(instance)) => {
                    self.create_instance(instance_info, layer_info, instance)
                }
                _ => Err(xr::Result::ERROR_VALIDATION_FAILURE),
            }
        })
    }

    unsafe fn create_instance(
        &self,
        instance_info: &xr::InstanceCreateInfo,
        layer_info: &ApiLayerCreateInfo,
        instance: &mut xr::Instance,
    ) -> Result<xr::Result> {
        let next_info = layer_info.next_info.as_ref().ok_or_else(|| {
            error!("Create instance failed: no next layer info");
            xr::Result::ERROR_INITIALIZATION_FAILED
        })?;

        let next_name = fixed_str(&next_info.layer_name);
        if next_name != LAYER_NAME {
            if self.config.strict_version_check {
                error!("Create instance failed: Incorrect layer_name `{}`", next_name);
                return Err(xr::Result::ERROR_VALIDATION_FAILURE);
            }
            warn!("Chain entry is named `{}`, expected `{}`", next_name, LAYER_NAME);
        }

        // Nothing resolved for an earlier instance may be used for this one.
        self.set_next_table(None);
        self.set_next_get_instance_proc_addr(next_info.next_get_instance_proc_addr);

        debug!("Creating instance through next layer");

        let mut layer_info2 = *layer_info;
        layer_info2.next_info = next_info.next;

        let result =
            (next_info.next_create_api_layer_instance)(instance_info, &layer_info2, instance)
                .result()
                .map_err(|err| {
                    error!("Next layer failed to create instance: {}", err);
                    err
                })?;

        let enabled_extensions = enabled_extensions(instance_info);
        let opengl_enable = enabled_extensions
            .iter()
            .any(|ext| ext == OPENGL_ENABLE_EXTENSION_NAME);
        if opengl_enable {
            info!("Graphics binding: {}", OPENGL_ENABLE_EXTENSION_NAME);
        }

        let table = NextCallTable::load(next_info.next_get_instance_proc_addr, *instance)?;
        self.set_next_table(Some(table));

        let application_info = &instance_info.application_info;
        let snapshot = InstanceSnapshot {
            handle: *instance,
            application_name: fixed_str(&application_info.application_name),
            application_version: application_info.application_version,
            engine_name: fixed_str(&application_info.engine_name),
            engine_version: application_info.engine_version,
            api_version: application_info.api_version,
            enabled_extensions,
            opengl_enable,
        };

        info!(
            "Created api layer instance {:?} for app `{}` (API {})",
            snapshot.handle,
            snapshot.application_name,
            version_string(snapshot.api_version)
        );

        self.set_instance_snapshot(snapshot);
        self.set_state(LayerState::InstanceBootstrapped);

        Ok(result)
    }
}

unsafe fn enabled_extensions(instance_info: &xr::InstanceCreateInfo) -> Vec<String> {
    if instance_info.enabled_extension_names.is_null() {
        return Vec::new();
    }
    std::slice::from_raw_parts(
        instance_info.enabled_extension_names,
        instance_info.enabled_extension_count as usize,
    )
    .iter()
    .filter(|ext| !ext.is_null())
    .map(|&ext| CStr::from_ptr(ext).to_string_lossy().into_owned())
    .collect()
}

/// Reads a NUL terminated string out of a fixed size OpenXR char array.
fn fixed_str(chars: &[c_char]) -> String {
    let bytes = chars
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect::<Vec<_>>();
    String::from_utf8_lossy(&bytes).into_owned()
}
