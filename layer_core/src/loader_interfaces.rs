//! Structures exchanged with the OpenXR loader while an API layer is negotiated
//! and while instances are created through the layer chain. These mirror
//! `loader_interfaces.h` and must stay layout compatible with it.

use std::os::raw::c_char;

use openxr::sys::*;

pub const XR_CURRENT_LOADER_API_LAYER_VERSION: u32 = 1;

pub const XR_LOADER_INTERFACE_STRUCT_LOADER_INFO: u32 = 1;
pub const XR_LOADER_INTERFACE_STRUCT_API_LAYER_REQUEST: u32 = 2;
pub const XR_LOADER_INTERFACE_STRUCT_API_LAYER_CREATE_INFO: u32 = 4;
pub const XR_LOADER_INTERFACE_STRUCT_API_LAYER_NEXT_INFO: u32 = 5;

pub const XR_API_LAYER_INFO_STRUCT_VERSION: u32 = 1;
pub const XR_API_LAYER_NEXT_INFO_STRUCT_VERSION: u32 = 1;
pub const XR_API_LAYER_CREATE_INFO_STRUCT_VERSION: u32 = 1;
pub const XR_API_LAYER_MAX_SETTINGS_PATH_SIZE: usize = 512;

/// `XrLoaderInterfaceStructs`, the discriminator of every loader structure.
#[repr(transparent)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LoaderInterfaceStruct(pub u32);

impl LoaderInterfaceStruct {
    pub const UNINTIALIZED: Self = Self(0);
    pub const LOADER_INFO: Self = Self(XR_LOADER_INTERFACE_STRUCT_LOADER_INFO);
    pub const API_LAYER_REQUEST: Self = Self(XR_LOADER_INTERFACE_STRUCT_API_LAYER_REQUEST);
    pub const API_LAYER_CREATE_INFO: Self = Self(XR_LOADER_INTERFACE_STRUCT_API_LAYER_CREATE_INFO);
    pub const API_LAYER_NEXT_INFO: Self = Self(XR_LOADER_INTERFACE_STRUCT_API_LAYER_NEXT_INFO);
}

pub type FnCreateApiLayerInstance = unsafe extern "system" fn(
    info: *const InstanceCreateInfo,
    api_layer_info: *const ApiLayerCreateInfo,
    instance: *mut Instance,
) -> Result;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct XrNegotiateLoaderInfo {
    pub ty: LoaderInterfaceStruct,
    pub struct_version: u32,
    pub struct_size: usize,
    pub min_interface_version: u32,
    pub max_interface_version: u32,
    pub min_api_version: Version,
    pub max_api_version: Version,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct XrNegotiateApiLayerRequest {
    pub ty: LoaderInterfaceStruct,
    pub struct_version: u32,
    pub struct_size: usize,
    pub layer_interface_version: u32,
    pub layer_api_version: Version,
    pub get_instance_proc_addr: Option<pfn::GetInstanceProcAddr>,
    pub create_api_layer_instance: Option<FnCreateApiLayerInstance>,
}

pub type FnNegotiateLoaderApiLayerInterface = unsafe extern "system" fn(
    loader_info: *const XrNegotiateLoaderInfo,
    api_layer_name: *const c_char,
    api_layer_request: *mut XrNegotiateApiLayerRequest,
) -> Result;

/// One link of the chain handed to `xrCreateApiLayerInstance`; `next` points at
/// the entry of the layer below the one described here.
#[repr(C)]
#[derive(Copy, Clone)]
pub struct XrApiLayerNextInfo {
    pub ty: LoaderInterfaceStruct,
    pub struct_version: u32,
    pub struct_size: usize,
    pub layer_name: [c_char; MAX_API_LAYER_NAME_SIZE],
    pub next_get_instance_proc_addr: pfn::GetInstanceProcAddr,
    pub next_create_api_layer_instance: FnCreateApiLayerInstance,
    pub next: *mut XrApiLayerNextInfo,
}

#[repr(C)]
#[derive(Copy, Clone)]
pub struct ApiLayerCreateInfo {
    pub ty: LoaderInterfaceStruct,
    pub struct_version: u32,
    pub struct_size: usize,
    pub loader_instance: *const (),
    pub settings_file_location: [c_char; XR_API_LAYER_MAX_SETTINGS_PATH_SIZE],
    pub next_info: *mut XrApiLayerNextInfo,
}
