use log::{debug, error, trace};
use openxr::sys::{self as xr, pfn};
use openxr::Result;

use crate::graphics::GraphicsBinding;
use crate::next_table::FixedUpOp;
use crate::Layer;

pub(super) fn get_instance_interceptors(op: FixedUpOp) -> Option<pfn::VoidFunction> {
    use std::mem::transmute;
    use xr::pfn::*;
    unsafe {
        Some(match op {
            FixedUpOp::CreateSession => transmute(xr_create_session as CreateSession),
            _ => return None,
        })
    }
}

unsafe extern "system" fn xr_create_session(
    instance: xr::Instance,
    create_info: *const xr::SessionCreateInfo,
    session: *mut xr::Session,
) -> xr::Result {
    crate::catch_ffi("xrCreateSession", || {
        crate::layer().create_session(instance, create_info, session)
    })
}

impl Layer {
    /// Remembers the application's GL binding, if the session has one, before
    /// the session is created. Nothing is restored here: the runtime has not
    /// touched the context yet.
    ///
    /// # Safety
    /// Arguments as for `xrCreateSession`.
    pub unsafe fn create_session(
        &self,
        instance: xr::Instance,
        create_info: *const xr::SessionCreateInfo,
        session: *mut xr::Session,
    ) -> Result<xr::Result> {
        let next = self.next_table().ok_or_else(|| {
            error!("{} called without a loaded next call table", FixedUpOp::CreateSession);
            xr::Result::ERROR_RUNTIME_FAILURE
        })?;

        trace!("{}", FixedUpOp::CreateSession);

        if let Some(create_info) = create_info.as_ref() {
            match GraphicsBinding::find_in_chain(create_info.next, &self.platform) {
                Some(binding) => self.bindings().set(binding),
                None => debug!("Session has no OpenGL Xlib graphics binding"),
            }
        }

        Ok((next.create_session)(instance, create_info, session))
    }
}
