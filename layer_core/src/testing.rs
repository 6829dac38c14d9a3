//! Fakes for the layer below us and for GLX. Everything records into
//! thread-local state; the test harness gives every test its own thread.

use std::cell::{Cell, RefCell};
use std::ffi::{c_void, CStr, CString};
use std::mem::transmute;
use std::os::raw::c_char;
use std::sync::Arc;

use openxr::sys::{self as xr, pfn};

use crate::config::LayerConfig;
use crate::graphics::glx::GlxContextSwitch;
use crate::graphics::Platform;
use crate::loader_interfaces::*;
use crate::{Layer, LAYER_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Forwarded(&'static str),
    MakeCurrent {
        display: usize,
        drawable: u64,
        context: usize,
    },
}

/// Makes the fake resolver hand back no function for one name, reporting
/// `result` (which may be `SUCCESS`).
#[derive(Debug, Clone, Copy)]
pub struct FailingResolve {
    pub name: &'static str,
    pub result: xr::Result,
}

pub const NEXT_NEXT_INFO: usize = 0x4242;

thread_local! {
    static EVENTS: RefCell<Vec<Event>> = RefCell::new(Vec::new());
    static RESOLVED: RefCell<Vec<String>> = RefCell::new(Vec::new());
    static FAILING_RESOLVE: Cell<Option<FailingResolve>> = Cell::new(None);
    static NEXT_RESULT: Cell<xr::Result> = Cell::new(xr::Result::SUCCESS);
    static CREATE_INSTANCE_RESULT: Cell<xr::Result> = Cell::new(xr::Result::SUCCESS);
    static SEEN_NEXT_INFO: Cell<usize> = Cell::new(0);
}

pub fn events() -> Vec<Event> {
    EVENTS.with(|events| events.borrow().clone())
}

pub fn reset_events() {
    EVENTS.with(|events| events.borrow_mut().clear());
}

fn record(event: Event) {
    EVENTS.with(|events| events.borrow_mut().push(event));
}

pub fn resolved_names() -> Vec<String> {
    RESOLVED.with(|names| names.borrow().clone())
}

pub fn clear_resolved_names() {
    RESOLVED.with(|names| names.borrow_mut().clear());
}

pub fn set_failing_resolve(failing: Option<FailingResolve>) {
    FAILING_RESOLVE.with(|cell| cell.set(failing));
}

pub fn set_next_result(result: xr::Result) {
    NEXT_RESULT.with(|cell| cell.set(result));
}

pub fn set_create_instance_result(result: xr::Result) {
    CREATE_INSTANCE_RESULT.with(|cell| cell.set(result));
}

pub fn seen_next_info() -> usize {
    SEEN_NEXT_INFO.with(|cell| cell.get())
}

pub struct RecordingGlx;

impl GlxContextSwitch for RecordingGlx {
    unsafe fn make_current(&self, display: usize, drawable: u64, context: usize) {
        record(Event::MakeCurrent {
            display,
            drawable,
            context,
        });
    }
}

pub fn platform() -> Platform {
    Platform {
        glx: Arc::new(RecordingGlx),
    }
}

pub fn layer() -> Layer {
    Layer::new(LayerConfig::default(), platform())
}

pub fn strict_layer() -> Layer {
    Layer::new(
        LayerConfig {
            strict_version_check: true,
            ..LayerConfig::default()
        },
        platform(),
    )
}

pub fn instance() -> xr::Instance {
    xr::Instance::from_raw(0x1234)
}

pub fn session() -> xr::Session {
    xr::Session::from_raw(0x5e55)
}

pub fn xlib_binding(
    display: usize,
    drawable: u64,
    context: usize,
) -> xr::GraphicsBindingOpenGLXlibKHR {
    let mut binding: xr::GraphicsBindingOpenGLXlibKHR = unsafe { std::mem::zeroed() };
    binding.ty = xr::GraphicsBindingOpenGLXlibKHR::TYPE;
    binding.x_display = display as _;
    binding.visualid = 33;
    binding.glx_drawable = drawable as _;
    binding.glx_context = context as _;
    binding
}

fn write_fixed(dst: &mut [c_char], src: &str) {
    for (dst, src) in dst.iter_mut().zip(src.bytes()) {
        *dst = src as c_char;
    }
}

/// Runs `xrCreateApiLayerInstance` against the fake next layer.
pub fn bootstrap(layer: &Layer, extensions: &[&str]) -> xr::Result {
    let names = extensions
        .iter()
        .map(|ext| CString::new(*ext).unwrap())
        .collect::<Vec<_>>();
    let name_ptrs = names.iter().map(|name| name.as_ptr()).collect::<Vec<_>>();

    let mut instance_info: xr::InstanceCreateInfo = unsafe { std::mem::zeroed() };
    instance_info.ty = xr::InstanceCreateInfo::TYPE;
    write_fixed(
        &mut instance_info.application_info.application_name,
        "context test",
    );
    instance_info.application_info.api_version = xr::CURRENT_API_VERSION;
    instance_info.enabled_extension_count = name_ptrs.len() as u32;
    instance_info.enabled_extension_names = name_ptrs.as_ptr();

    let mut layer_name = [0 as c_char; xr::MAX_API_LAYER_NAME_SIZE];
    write_fixed(&mut layer_name, LAYER_NAME);

    let mut next_info = XrApiLayerNextInfo {
        ty: LoaderInterfaceStruct::API_LAYER_NEXT_INFO,
        struct_version: XR_API_LAYER_NEXT_INFO_STRUCT_VERSION,
        struct_size: std::mem::size_of::<XrApiLayerNextInfo>(),
        layer_name,
        next_get_instance_proc_addr,
        next_create_api_layer_instance,
        next: NEXT_NEXT_INFO as *mut XrApiLayerNextInfo,
    };

    let mut layer_info: ApiLayerCreateInfo = unsafe { std::mem::zeroed() };
    layer_info.ty = LoaderInterfaceStruct::API_LAYER_CREATE_INFO;
    layer_info.struct_version = XR_API_LAYER_CREATE_INFO_STRUCT_VERSION;
    layer_info.struct_size = std::mem::size_of::<ApiLayerCreateInfo>();
    layer_info.next_info = &mut next_info;

    let mut instance = xr::Instance::from_raw(0);
    unsafe { layer.create_api_layer_instance(&instance_info, &layer_info, &mut instance) }
}

/// Calls the layer's `xrCreateSession` with `next` as the create info chain.
pub fn create_session(layer: &Layer, next: *const c_void) -> (xr::Result, xr::Session) {
    let mut create_info: xr::SessionCreateInfo = unsafe { std::mem::zeroed() };
    create_info.ty = xr::SessionCreateInfo::TYPE;
    create_info.next = next;

    let mut session = xr::Session::from_raw(0);
    let result = crate::catch_ffi("test", || unsafe {
        layer.create_session(instance(), &create_info, &mut session)
    });
    (result, session)
}

pub unsafe extern "system" fn next_get_instance_proc_addr(
    _instance: xr::Instance,
    name: *const c_char,
    function: *mut Option<pfn::VoidFunction>,
) -> xr::Result {
    let name = CStr::from_ptr(name).to_string_lossy().into_owned();
    RESOLVED.with(|names| names.borrow_mut().push(name.clone()));

    if let Some(failing) = FAILING_RESOLVE.with(|cell| cell.get()) {
        if failing.name == name {
            *function = None;
            return failing.result;
        }
    }

    *function = match name.as_str() {
        "xrCreateSession" => Some(transmute(next_create_session as pfn::CreateSession)),
        "xrEndFrame" => Some(transmute(next_end_frame as pfn::EndFrame)),
        "xrCreateSwapchain" => Some(transmute(next_create_swapchain as pfn::CreateSwapchain)),
        "xrAcquireSwapchainImage" => Some(transmute(
            next_acquire_swapchain_image as pfn::AcquireSwapchainImage,
        )),
        "xrWaitSwapchainImage" => Some(transmute(
            next_wait_swapchain_image as pfn::WaitSwapchainImage,
        )),
        "xrReleaseSwapchainImage" => Some(transmute(
            next_release_swapchain_image as pfn::ReleaseSwapchainImage,
        )),
        "xrPollEvent" => Some(transmute(next_poll_event as pfn::PollEvent)),
        _ => None,
    };

    if (*function).is_some() {
        xr::Result::SUCCESS
    } else {
        xr::Result::ERROR_FUNCTION_UNSUPPORTED
    }
}

pub unsafe extern "system" fn next_create_api_layer_instance(
    _info: *const xr::InstanceCreateInfo,
    layer_info: *const ApiLayerCreateInfo,
    instance: *mut xr::Instance,
) -> xr::Result {
    SEEN_NEXT_INFO.with(|cell| cell.set((*layer_info).next_info as usize));
    let result = CREATE_INSTANCE_RESULT.with(|cell| cell.get());
    if result == xr::Result::SUCCESS {
        *instance = self::instance();
    }
    result
}

fn forwarded(name: &'static str) -> xr::Result {
    record(Event::Forwarded(name));
    NEXT_RESULT.with(|cell| cell.get())
}

unsafe extern "system" fn next_create_session(
    _instance: xr::Instance,
    _create_info: *const xr::SessionCreateInfo,
    session: *mut xr::Session,
) -> xr::Result {
    *session = self::session();
    forwarded("xrCreateSession")
}

unsafe extern "system" fn next_end_frame(
    _session: xr::Session,
    _frame_end_info: *const xr::FrameEndInfo,
) -> xr::Result {
    forwarded("xrEndFrame")
}

unsafe extern "system" fn next_create_swapchain(
    _session: xr::Session,
    _create_info: *const xr::SwapchainCreateInfo,
    swapchain: *mut xr::Swapchain,
) -> xr::Result {
    *swapchain = xr::Swapchain::from_raw(0x5c);
    forwarded("xrCreateSwapchain")
}

unsafe extern "system" fn next_acquire_swapchain_image(
    _swapchain: xr::Swapchain,
    _acquire_info: *const xr::SwapchainImageAcquireInfo,
    index: *mut u32,
) -> xr::Result {
    *index = 2;
    forwarded("xrAcquireSwapchainImage")
}

unsafe extern "system" fn next_wait_swapchain_image(
    _swapchain: xr::Swapchain,
    _wait_info: *const xr::SwapchainImageWaitInfo,
) -> xr::Result {
    forwarded("xrWaitSwapchainImage")
}

unsafe extern "system" fn next_release_swapchain_image(
    _swapchain: xr::Swapchain,
    _release_info: *const xr::SwapchainImageReleaseInfo,
) -> xr::Result {
    forwarded("xrReleaseSwapchainImage")
}

pub unsafe extern "system" fn next_poll_event(
    _instance: xr::Instance,
    _event_data: *mut xr::EventDataBuffer,
) -> xr::Result {
    xr::Result::EVENT_UNAVAILABLE
}
