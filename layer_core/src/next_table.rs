use std::ffi::CStr;
use std::fmt;
use std::mem::transmute;

use log::{debug, error};
use openxr::sys::{self as xr, pfn};
use openxr::Result;

use crate::ToResult;

/// The operations whose implementation is wrapped by the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedUpOp {
    CreateSession,
    EndFrame,
    CreateSwapchain,
    AcquireSwapchainImage,
    WaitSwapchainImage,
    ReleaseSwapchainImage,
}

impl FixedUpOp {
    pub const ALL: [FixedUpOp; 6] = [
        FixedUpOp::CreateSession,
        FixedUpOp::EndFrame,
        FixedUpOp::CreateSwapchain,
        FixedUpOp::AcquireSwapchainImage,
        FixedUpOp::WaitSwapchainImage,
        FixedUpOp::ReleaseSwapchainImage,
    ];

    pub fn c_name(self) -> &'static CStr {
        match self {
            FixedUpOp::CreateSession => c"xrCreateSession",
            FixedUpOp::EndFrame => c"xrEndFrame",
            FixedUpOp::CreateSwapchain => c"xrCreateSwapchain",
            FixedUpOp::AcquireSwapchainImage => c"xrAcquireSwapchainImage",
            FixedUpOp::WaitSwapchainImage => c"xrWaitSwapchainImage",
            FixedUpOp::ReleaseSwapchainImage => c"xrReleaseSwapchainImage",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FixedUpOp::CreateSession => "xrCreateSession",
            FixedUpOp::EndFrame => "xrEndFrame",
            FixedUpOp::CreateSwapchain => "xrCreateSwapchain",
            FixedUpOp::AcquireSwapchainImage => "xrAcquireSwapchainImage",
            FixedUpOp::WaitSwapchainImage => "xrWaitSwapchainImage",
            FixedUpOp::ReleaseSwapchainImage => "xrReleaseSwapchainImage",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for FixedUpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The next layer's (or the runtime's) implementation of every fixed-up
/// operation, resolved once the underlying instance exists.
#[derive(Clone, Copy)]
pub struct NextCallTable {
    pub get_instance_proc_addr: pfn::GetInstanceProcAddr,
    pub create_session: pfn::CreateSession,
    pub end_frame: pfn::EndFrame,
    pub create_swapchain: pfn::CreateSwapchain,
    pub acquire_swapchain_image: pfn::AcquireSwapchainImage,
    pub wait_swapchain_image: pfn::WaitSwapchainImage,
    pub release_swapchain_image: pfn::ReleaseSwapchainImage,
}

impl NextCallTable {
    /// Resolves every fixed-up operation through `get_instance_proc_addr`.
    /// The first operation that cannot be resolved aborts loading.
    ///
    /// # Safety
    /// `get_instance_proc_addr` must be the next resolver in the chain and
    /// `instance` an instance it created.
    pub unsafe fn load(
        get_instance_proc_addr: pfn::GetInstanceProcAddr,
        instance: xr::Instance,
    ) -> Result<Self> {
        let next = |op| resolve(get_instance_proc_addr, instance, op);

        Ok(Self {
            get_instance_proc_addr,
            create_session: transmute::<pfn::VoidFunction, pfn::CreateSession>(next(
                FixedUpOp::CreateSession,
            )?),
            end_frame: transmute::<pfn::VoidFunction, pfn::EndFrame>(next(
                FixedUpOp::EndFrame,
            )?),
            create_swapchain: transmute::<pfn::VoidFunction, pfn::CreateSwapchain>(next(
                FixedUpOp::CreateSwapchain,
            )?),
            acquire_swapchain_image: transmute::<pfn::VoidFunction, pfn::AcquireSwapchainImage>(
                next(FixedUpOp::AcquireSwapchainImage)?,
            ),
            wait_swapchain_image: transmute::<pfn::VoidFunction, pfn::WaitSwapchainImage>(
                next(FixedUpOp::WaitSwapchainImage)?,
            ),
            release_swapchain_image: transmute::<pfn::VoidFunction, pfn::ReleaseSwapchainImage>(
                next(FixedUpOp::ReleaseSwapchainImage)?,
            ),
        })
    }
}

unsafe fn resolve(
    get_instance_proc_addr: pfn::GetInstanceProcAddr,
    instance: xr::Instance,
    op: FixedUpOp,
) -> Result<pfn::VoidFunction> {
    let mut function = None;
    get_instance_proc_addr(instance, op.c_name().as_ptr(), &mut function)
        .result()
        .map_err(|err| {
            error!("Failed to load {}: {}", op, err);
            err
        })?;

    function
        .map(|function| {
            debug!("Loaded next {}", op);
            function
        })
        .ok_or_else(|| {
            error!("Failed to load {}: resolver returned null", op);
            xr::Result::ERROR_FUNCTION_UNSUPPORTED
        })
}
