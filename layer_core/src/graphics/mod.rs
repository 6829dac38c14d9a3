pub mod glx;

use std::ffi::c_void;
use std::sync::Arc;

use openxr::sys as xr;

use self::glx::{GlxContextSwitch, XlibBinding, XlibHandles};

/// The context-switch primitives of every windowing system the layer understands.
#[derive(Clone)]
pub struct Platform {
    pub glx: Arc<dyn GlxContextSwitch>,
}

impl Platform {
    #[cfg(target_os = "linux")]
    pub fn native() -> Self {
        Self {
            glx: Arc::new(glx::LibGlx),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn native() -> Self {
        Self {
            glx: Arc::new(glx::NoGlx),
        }
    }
}

/// A rendering context bound to a drawable, captured from the graphics binding
/// an application passes to `xrCreateSession`.
#[derive(Debug)]
pub enum GraphicsBinding {
    Xlib(XlibBinding),
}

impl GraphicsBinding {
    /// Walks a whole `next` chain and captures the graphics binding the layer
    /// knows how to restore. If the chain carries more than one, the last wins.
    /// Structures of any other type are skipped.
    ///
    /// # Safety
    /// `next` must be null or point to a valid chain of OpenXR input structures.
    pub unsafe fn find_in_chain(next: *const c_void, platform: &Platform) -> Option<Self> {
        let mut found = None;
        let mut header = next as *const xr::BaseInStructure;
        while let Some(structure) = header.as_ref() {
            if let Some(binding) = Self::from_structure(structure, platform) {
                found = Some(binding);
            }
            header = structure.next;
        }
        found
    }

    /// # Safety
    /// `structure` must be the header of a complete structure of the type it names.
    pub unsafe fn from_structure(
        structure: &xr::BaseInStructure,
        platform: &Platform,
    ) -> Option<Self> {
        match structure.ty {
            xr::StructureType::GRAPHICS_BINDING_OPENGL_XLIB_KHR => {
                let binding = &*(structure as *const xr::BaseInStructure
                    as *const xr::GraphicsBindingOpenGLXlibKHR);
                Some(GraphicsBinding::Xlib(XlibBinding::new(
                    XlibHandles::copy_from(binding),
                    platform.glx.clone(),
                )))
            }
            _ => None,
        }
    }

    /// Makes the captured context current on the calling thread again.
    pub fn restore_current(&self) {
        match self {
            GraphicsBinding::Xlib(xlib) => xlib.make_current(),
        }
    }
}
