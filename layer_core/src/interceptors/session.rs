use openxr::sys::{self as xr, pfn};
use openxr::Result;

use crate::next_table::FixedUpOp;
use crate::Layer;

pub(super) fn get_session_interceptors(op: FixedUpOp) -> Option<pfn::VoidFunction> {
    use std::mem::transmute;
    use xr::pfn::*;
    unsafe {
        Some(match op {
            FixedUpOp::EndFrame => transmute(xr_end_frame as EndFrame),
            FixedUpOp::CreateSwapchain => transmute(xr_create_swapchain as CreateSwapchain),
            _ => return None,
        })
    }
}

unsafe extern "system" fn xr_end_frame(
    session: xr::Session,
    frame_end_info: *const xr::FrameEndInfo,
) -> xr::Result {
    crate::catch_ffi("xrEndFrame", || {
        crate::layer().end_frame(session, frame_end_info)
    })
}

unsafe extern "system" fn xr_create_swapchain(
    session: xr::Session,
    create_info: *const xr::SwapchainCreateInfo,
    swapchain: *mut xr::Swapchain,
) -> xr::Result {
    crate::catch_ffi("xrCreateSwapchain", || {
        crate::layer().create_swapchain(session, create_info, swapchain)
    })
}

impl Layer {
    /// # Safety
    /// Arguments as for `xrEndFrame`.
    pub unsafe fn end_frame(
        &self,
        session: xr::Session,
        frame_end_info: *const xr::FrameEndInfo,
    ) -> Result<xr::Result> {
        self.fix_up(FixedUpOp::EndFrame, |next| {
            (next.end_frame)(session, frame_end_info)
        })
    }

    /// # Safety
    /// Arguments as for `xrCreateSwapchain`.
    pub unsafe fn create_swapchain(
        &self,
        session: xr::Session,
        create_info: *const xr::SwapchainCreateInfo,
        swapchain: *mut xr::Swapchain,
    ) -> Result<xr::Result> {
        self.fix_up(FixedUpOp::CreateSwapchain, |next| {
            (next.create_swapchain)(session, create_info, swapchain)
        })
    }
}
