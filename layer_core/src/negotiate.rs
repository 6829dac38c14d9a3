use std::ffi::CStr;
use std::os::raw::c_char;

use log::{debug, error, info, warn};
use openxr::sys as xr;
use openxr::Result;

use crate::loader_interfaces::*;
use crate::{Layer, LayerState, LAYER_NAME};

pub(crate) fn version_string(version: xr::Version) -> String {
    format!(
        "{}.{}.{}",
        version.major(),
        version.minor(),
        version.patch()
    )
}

impl Layer {
    /// Answers `xrNegotiateLoaderApiLayerInterface`.
    ///
    /// Unless strict version checking is configured the layer accepts whatever
    /// the loader offers and reports the loader's maximum versions back.
    ///
    /// # Safety
    /// The pointers must be null or point to the structures the loader passes.
    pub unsafe fn negotiate(
        &self,
        loader_info: *const XrNegotiateLoaderInfo,
        layer_name: *const c_char,
        layer_request: *mut XrNegotiateApiLayerRequest,
    ) -> xr::Result {
        crate::catch_ffi("xrNegotiateLoaderApiLayerInterface", || {
            self.negotiate_inner(
                loader_info.as_ref(),
                layer_name.as_ref().map(|name| CStr::from_ptr(name)),
                layer_request.as_mut(),
            )
        })
    }

    fn negotiate_inner(
        &self,
        loader_info: Option<&XrNegotiateLoaderInfo>,
        layer_name: Option<&CStr>,
        layer_request: Option<&mut XrNegotiateApiLayerRequest>,
    ) -> Result<xr::Result> {
        let (loader_info, layer_name, layer_request) =
            match (loader_info, layer_name, layer_request) {
                (Some(info), Some(name), Some(request)) => (info, name, request),
                _ => {
                    error!("Layer negotiation failed: null argument");
                    return Err(xr::Result::ERROR_INITIALIZATION_FAILED);
                }
            };

        if loader_info.ty != LoaderInterfaceStruct::LOADER_INFO
            || layer_request.ty != LoaderInterfaceStruct::API_LAYER_REQUEST
        {
            if self.config.strict_version_check {
                error!(
                    "Layer negotiation failed: unexpected structure types {:?} / {:?}",
                    loader_info.ty, layer_request.ty
                );
                return Err(xr::Result::ERROR_INITIALIZATION_FAILED);
            }
            warn!(
                "Unexpected negotiation structure types {:?} / {:?}",
                loader_info.ty, layer_request.ty
            );
        }

        let layer_name = layer_name.to_string_lossy();
        info!("Using API layer: {}", layer_name);
        info!(
            "Loader API version min: {} max: {}",
            version_string(loader_info.min_api_version),
            version_string(loader_info.max_api_version)
        );
        info!(
            "Loader interface version min: {} max: {}",
            loader_info.min_interface_version, loader_info.max_interface_version
        );

        if layer_name != LAYER_NAME {
            if self.config.strict_version_check {
                error!(
                    "Layer negotiation failed: Incorrect layer_name `{}`",
                    layer_name
                );
                return Err(xr::Result::ERROR_INITIALIZATION_FAILED);
            }
            warn!("Negotiating as `{}`, expected `{}`", layer_name, LAYER_NAME);
        }

        let (interface_version, api_version) = if self.config.strict_version_check {
            if loader_info.min_interface_version > XR_CURRENT_LOADER_API_LAYER_VERSION
                || loader_info.max_interface_version < XR_CURRENT_LOADER_API_LAYER_VERSION
                || loader_info.min_api_version > xr::CURRENT_API_VERSION
                || loader_info.max_api_version < xr::CURRENT_API_VERSION
            {
                error!(
                    "Layer negotiation failed: Incompatible negotiate info {:#?}",
                    loader_info
                );
                return Err(xr::Result::ERROR_INITIALIZATION_FAILED);
            }
            (XR_CURRENT_LOADER_API_LAYER_VERSION, xr::CURRENT_API_VERSION)
        } else {
            (
                loader_info.max_interface_version,
                loader_info.max_api_version,
            )
        };

        let (get_instance_proc_addr, create_api_layer_instance) = crate::static_initialize();

        layer_request.layer_interface_version = interface_version;
        layer_request.layer_api_version = api_version;
        layer_request.get_instance_proc_addr = Some(get_instance_proc_addr);
        layer_request.create_api_layer_instance = Some(create_api_layer_instance);

        if self.state() == LayerState::Unregistered {
            self.set_state(LayerState::Negotiated);
        }

        debug!(
            "Negotiation complete: interface version {}, API version {}",
            interface_version,
            version_string(api_version)
        );

        Ok(xr::Result::SUCCESS)
    }
}
