// eglport/src/platform/generic/egl/ffi.rs
//
//! FFI-related functionality common to the various EGL backends.

use crate::egl::types::{EGLDisplay, EGLenum, EGLint};

use std::os::raw::c_void;

#[cfg_attr(not(kms), allow(dead_code))]
pub const EGL_PLATFORM_GBM_KHR: EGLenum = 0x31d7;

#[allow(non_camel_case_types)]
pub(crate) type PFNEGLGETPLATFORMDISPLAYEXTPROC =
    unsafe extern "C" fn(platform: EGLenum,
                         native_display: *mut c_void,
                         attrib_list: *const EGLint)
                         -> EGLDisplay;
