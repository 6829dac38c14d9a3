use std::fmt;
use std::sync::Arc;

use log::info;
use openxr::sys as xr;

/// `glXMakeCurrent`, the only GLX entry point the layer needs.
///
/// Handles are passed as plain integers so bindings can be stored in
/// process-wide state; the implementation casts them back to GLX types.
pub trait GlxContextSwitch: Send + Sync {
    /// # Safety
    /// `display` must be a live X display connection, and `drawable`/`context`
    /// either both zero or a drawable/context pair created on that display.
    unsafe fn make_current(&self, display: usize, drawable: u64, context: usize);
}

/// The handles of an `XrGraphicsBindingOpenGLXlibKHR`, copied out of the
/// application's structure since it may be freed once `xrCreateSession` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XlibHandles {
    pub x_display: usize,
    pub visualid: u32,
    pub glx_fb_config: usize,
    pub glx_drawable: u64,
    pub glx_context: usize,
}

impl XlibHandles {
    pub fn copy_from(binding: &xr::GraphicsBindingOpenGLXlibKHR) -> Self {
        Self {
            x_display: binding.x_display as usize,
            visualid: binding.visualid,
            glx_fb_config: binding.glx_fb_config as usize,
            glx_drawable: binding.glx_drawable as u64,
            glx_context: binding.glx_context as usize,
        }
    }
}

pub struct XlibBinding {
    handles: XlibHandles,
    glx: Arc<dyn GlxContextSwitch>,
}

impl XlibBinding {
    pub fn new(handles: XlibHandles, glx: Arc<dyn GlxContextSwitch>) -> Self {
        info!(
            "GLX graphics binding: display {:#x}, drawable {:#x}, context {:#x}",
            handles.x_display, handles.glx_drawable, handles.glx_context
        );
        Self { handles, glx }
    }

    pub fn handles(&self) -> &XlibHandles {
        &self.handles
    }

    /// Releases whatever is current on the display, then binds the application's
    /// drawable and context again. The result of either call is not inspected.
    pub fn make_current(&self) {
        let XlibHandles {
            x_display,
            glx_drawable,
            glx_context,
            ..
        } = self.handles;
        unsafe {
            self.glx.make_current(x_display, 0, 0);
            self.glx.make_current(x_display, glx_drawable, glx_context);
        }
    }
}

impl fmt::Debug for XlibBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XlibBinding")
            .field("handles", &self.handles)
            .finish_non_exhaustive()
    }
}

#[cfg(target_os = "linux")]
pub use self::libgl::LibGlx;

/// Stand-in on systems without GLX; bindings are never captured there.
#[cfg(not(target_os = "linux"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGlx;

#[cfg(not(target_os = "linux"))]
impl GlxContextSwitch for NoGlx {
    unsafe fn make_current(&self, _: usize, _: u64, _: usize) {}
}

#[cfg(target_os = "linux")]
mod libgl {
    use std::ffi::CString;

    use glutin_glx_sys::glx as glx_sys;
    use lazy_static::lazy_static;
    use log::error;

    use super::GlxContextSwitch;

    struct Glx {
        inner: glx_sys::Glx,
        _lib: libloading::Library,
    }

    impl std::ops::Deref for Glx {
        type Target = glx_sys::Glx;

        fn deref(&self) -> &Self::Target {
            &self.inner
        }
    }

    unsafe impl Sync for Glx {}
    unsafe impl Send for Glx {}

    lazy_static! {
        static ref GLX: Option<Glx> = {
            let glx = ["libGL.so.1", "libGL.so"]
                .iter()
                .find_map(|path| unsafe { libloading::Library::new(path).ok() })
                .map(|lib| {
                    let glx = glx_sys::Glx::load_with(|name| unsafe {
                        CString::new(name.as_bytes())
                            .ok()
                            .and_then(|symbol| {
                                lib.get::<*const std::ffi::c_void>(symbol.as_bytes_with_nul())
                                    .ok()
                                    .map(|ptr| *ptr)
                            })
                            .unwrap_or(std::ptr::null())
                    });
                    Glx {
                        inner: glx,
                        _lib: lib,
                    }
                });
            if glx.is_none() {
                error!("Could not load libGL, GL contexts will not be restored");
            }
            glx
        };
    }

    /// GLX resolved from the `libGL` already mapped into the application.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct LibGlx;

    impl GlxContextSwitch for LibGlx {
        unsafe fn make_current(&self, display: usize, drawable: u64, context: usize) {
            if let Some(glx) = GLX.as_ref() {
                glx.MakeCurrent(display as _, drawable as _, context as _);
            }
        }
    }
}
