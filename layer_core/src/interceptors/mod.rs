mod instance;
mod session;
mod swapchain;

use std::ffi::CStr;
use std::os::raw::c_char;

use log::{error, trace, warn};
use openxr::sys::{self as xr, pfn};
use openxr::Result;

use crate::next_table::{FixedUpOp, NextCallTable};
use crate::{Layer, ToResult};

pub(crate) unsafe extern "system" fn get_instance_proc_addr(
    instance: xr::Instance,
    name: *const c_char,
    function: *mut Option<pfn::VoidFunction>,
) -> xr::Result {
    crate::catch_ffi("xrGetInstanceProcAddr", || {
        crate::layer().get_instance_proc_addr(instance, name, function)
    })
}

const INTERCEPTORS: [fn(FixedUpOp) -> Option<pfn::VoidFunction>; 3] = [
    instance::get_instance_interceptors,
    session::get_session_interceptors,
    swapchain::get_swapchain_interceptors,
];

/// The function the layer installs in place of `op`.
pub fn interceptor(op: FixedUpOp) -> Option<pfn::VoidFunction> {
    INTERCEPTORS.iter().find_map(|f| f(op))
}

impl Layer {
    /// Returns the layer's own function for the fixed-up operations and lets the
    /// next layer resolve everything else, passing its answer through untouched.
    ///
    /// # Safety
    /// `name` must be a NUL terminated string and `function` writable.
    pub unsafe fn get_instance_proc_addr(
        &self,
        instance: xr::Instance,
        name: *const c_char,
        function: *mut Option<pfn::VoidFunction>,
    ) -> Result<xr::Result> {
        if name.is_null() || function.is_null() {
            return Err(xr::Result::ERROR_VALIDATION_FAILURE);
        }

        match CStr::from_ptr(name).to_str() {
            Ok(name_str) => {
                trace!("get_instance_proc_addr({})", name_str);
                if let Some(interceptor) = FixedUpOp::from_name(name_str).and_then(interceptor) {
                    *function = Some(interceptor);
                    return Ok(xr::Result::SUCCESS);
                }
            }
            Err(err) => {
                //We can't parse the function name so just let the next layer deal with it
                warn!(
                    "get_instance_proc_addr passed bad name ({}): `{}`",
                    CStr::from_ptr(name).to_string_lossy(),
                    err,
                );
            }
        }

        match self.next_get_instance_proc_addr() {
            Some(next) => next(instance, name, function).result(),
            None => {
                warn!(
                    "get_instance_proc_addr({}) called before instance creation",
                    CStr::from_ptr(name).to_string_lossy()
                );
                *function = None;
                Err(xr::Result::ERROR_FUNCTION_UNSUPPORTED)
            }
        }
    }

    /// Forwards one fixed-up call and then puts the application's GL context
    /// back, whatever the call returned.
    fn fix_up<F>(&self, op: FixedUpOp, forward: F) -> Result<xr::Result>
    where
        F: FnOnce(&NextCallTable) -> xr::Result,
    {
        let next = self.next_table().ok_or_else(|| {
            error!("{} called without a loaded next call table", op);
            xr::Result::ERROR_RUNTIME_FAILURE
        })?;

        trace!("{}", op);

        let result = forward(&next);
        self.bindings().restore_if_present();
        Ok(result)
    }
}
