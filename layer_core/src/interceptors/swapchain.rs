use openxr::sys::{self as xr, pfn};
use openxr::Result;

use crate::next_table::FixedUpOp;
use crate::Layer;

pub(super) fn get_swapchain_interceptors(op: FixedUpOp) -> Option<pfn::VoidFunction> {
    use std::mem::transmute;
    use xr::pfn::*;
    unsafe {
        Some(match op {
            FixedUpOp::AcquireSwapchainImage => {
                transmute(xr_acquire_swapchain_image as AcquireSwapchainImage)
            }
            FixedUpOp::WaitSwapchainImage => {
                transmute(xr_wait_swapchain_image as WaitSwapchainImage)
            }
            FixedUpOp::ReleaseSwapchainImage => {
                transmute(xr_release_swapchain_image as ReleaseSwapchainImage)
            }
            _ => return None,
        })
    }
}

unsafe extern "system" fn xr_acquire_swapchain_image(
    swapchain: xr::Swapchain,
    acquire_info: *const xr::SwapchainImageAcquireInfo,
    index: *mut u32,
) -> xr::Result {
    crate::catch_ffi("xrAcquireSwapchainImage", || {
        crate::layer().acquire_swapchain_image(swapchain, acquire_info, index)
    })
}

unsafe extern "system" fn xr_wait_swapchain_image(
    swapchain: xr::Swapchain,
    wait_info: *const xr::SwapchainImageWaitInfo,
) -> xr::Result {
    crate::catch_ffi("xrWaitSwapchainImage", || {
        crate::layer().wait_swapchain_image(swapchain, wait_info)
    })
}

unsafe extern "system" fn xr_release_swapchain_image(
    swapchain: xr::Swapchain,
    release_info: *const xr::SwapchainImageReleaseInfo,
) -> xr::Result {
    crate::catch_ffi("xrReleaseSwapchainImage", || {
        crate::layer().release_swapchain_image(swapchain, release_info)
    })
}

impl Layer {
    /// # Safety
    /// Arguments as for `xrAcquireSwapchainImage`.
    pub unsafe fn acquire_swapchain_image(
        &self,
        swapchain: xr::Swapchain,
        acquire_info: *const xr::SwapchainImageAcquireInfo,
        index: *mut u32,
    ) -> Result<xr::Result> {
        self.fix_up(FixedUpOp::AcquireSwapchainImage, |next| {
            (next.acquire_swapchain_image)(swapchain, acquire_info, index)
        })
    }

    /// # Safety
    /// Arguments as for `xrWaitSwapchainImage`.
    pub unsafe fn wait_swapchain_image(
        &self,
        swapchain: xr::Swapchain,
        wait_info: *const xr::SwapchainImageWaitInfo,
    ) -> Result<xr::Result> {
        self.fix_up(FixedUpOp::WaitSwapchainImage, |next| {
            (next.wait_swapchain_image)(swapchain, wait_info)
        })
    }

    /// # Safety
    /// Arguments as for `xrReleaseSwapchainImage`.
    pub unsafe fn release_swapchain_image(
        &self,
        swapchain: xr::Swapchain,
        release_info: *const xr::SwapchainImageReleaseInfo,
    ) -> Result<xr::Result> {
        self.fix_up(FixedUpOp::ReleaseSwapchainImage, |next| {
            (next.release_swapchain_image)(swapchain, release_info)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, events, reset_events, Event};

    /// Drives a full acquire/wait/release cycle through the layer's swapchain
    /// methods.
    #[test]
    fn image_cycle_restores_after_every_call() {
        let layer = testing::layer();
        testing::bootstrap(&layer, &[]);
        let binding = testing::xlib_binding(0x10, 0x20, 0x30);
        testing::create_session(&layer, &binding as *const _ as _);
        reset_events();

        let swapchain = xr::Swapchain::from_raw(0x5c);
        let acquire_info: xr::SwapchainImageAcquireInfo = unsafe { std::mem::zeroed() };
        let wait_info: xr::SwapchainImageWaitInfo = unsafe { std::mem::zeroed() };
        let release_info: xr::SwapchainImageReleaseInfo = unsafe { std::mem::zeroed() };
        let mut index = u32::MAX;

        let results = crate::catch_ffi("test", || unsafe {
            layer.acquire_swapchain_image(swapchain, &acquire_info, &mut index)?;
            layer.wait_swapchain_image(swapchain, &wait_info)?;
            layer.release_swapchain_image(swapchain, &release_info)
        });

        assert_eq!(results, xr::Result::SUCCESS);
        assert_eq!(index, 2);

        let mut expected = Vec::new();
        for name in [
            "xrAcquireSwapchainImage",
            "xrWaitSwapchainImage",
            "xrReleaseSwapchainImage",
        ] {
            expected.push(Event::Forwarded(name));
            expected.push(Event::MakeCurrent {
                display: 0x10,
                drawable: 0,
                context: 0,
            });
            expected.push(Event::MakeCurrent {
                display: 0x10,
                drawable: 0x20,
                context: 0x30,
            });
        }
        assert_eq!(events(), expected);
    }

    #[test]
    fn wait_timeout_is_passed_through() {
        let layer = testing::layer();
        testing::bootstrap(&layer, &[]);
        testing::set_next_result(xr::Result::TIMEOUT_EXPIRED);

        let wait_info: xr::SwapchainImageWaitInfo = unsafe { std::mem::zeroed() };
        let result = crate::catch_ffi("test", || unsafe {
            layer.wait_swapchain_image(xr::Swapchain::from_raw(1), &wait_info)
        });

        assert_eq!(result, xr::Result::TIMEOUT_EXPIRED);
    }

    #[test]
    fn interceptors_are_installed_for_every_swapchain_call() {
        for op in [
            FixedUpOp::AcquireSwapchainImage,
            FixedUpOp::WaitSwapchainImage,
            FixedUpOp::ReleaseSwapchainImage,
        ] {
            assert!(get_swapchain_interceptors(op).is_some());
        }
        assert!(get_swapchain_interceptors(FixedUpOp::EndFrame).is_none());
    }
}
