// eglport/src/platform/dispmanx/ffi.rs
//
//! Bindings to the VideoCore host library.

#![allow(non_camel_case_types)]

use std::os::raw::{c_int, c_void};

pub(crate) type DISPMANX_DISPLAY_HANDLE_T = u32;
pub(crate) type DISPMANX_UPDATE_HANDLE_T = u32;
pub(crate) type DISPMANX_ELEMENT_HANDLE_T = u32;
pub(crate) type DISPMANX_RESOURCE_HANDLE_T = u32;
pub(crate) type DISPMANX_PROTECTION_T = u32;
pub(crate) type DISPMANX_TRANSFORM_T = u32;

pub(crate) const DISPMANX_PROTECTION_NONE: DISPMANX_PROTECTION_T = 0;
pub(crate) const DISPMANX_NO_ROTATE: DISPMANX_TRANSFORM_T = 0;
pub(crate) const DISPMANX_NO_HANDLE: u32 = 0;

/// The LCD, the display every element is placed on.
pub(crate) const DISPMANX_ID_MAIN_LCD: u16 = 0;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct VC_RECT_T {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
}

/// The native window the Broadcom EGL driver expects.
#[repr(C)]
#[derive(Debug)]
pub(crate) struct EGL_DISPMANX_WINDOW_T {
    pub(crate) element: DISPMANX_ELEMENT_HANDLE_T,
    pub(crate) width: c_int,
    pub(crate) height: c_int,
}

#[link(name = "bcm_host")]
extern "C" {
    pub(crate) fn bcm_host_init();
    pub(crate) fn graphics_get_display_size(display_number: u16,
                                            width: *mut u32,
                                            height: *mut u32)
                                            -> i32;
    pub(crate) fn vc_dispmanx_display_open(device: u32) -> DISPMANX_DISPLAY_HANDLE_T;
    pub(crate) fn vc_dispmanx_display_close(display: DISPMANX_DISPLAY_HANDLE_T) -> c_int;
    pub(crate) fn vc_dispmanx_update_start(priority: i32) -> DISPMANX_UPDATE_HANDLE_T;
    pub(crate) fn vc_dispmanx_element_add(update: DISPMANX_UPDATE_HANDLE_T,
                                          display: DISPMANX_DISPLAY_HANDLE_T,
                                          layer: i32,
                                          dest_rect: *const VC_RECT_T,
                                          src: DISPMANX_RESOURCE_HANDLE_T,
                                          src_rect: *const VC_RECT_T,
                                          protection: DISPMANX_PROTECTION_T,
                                          alpha: *mut c_void,
                                          clamp: *mut c_void,
                                          transform: DISPMANX_TRANSFORM_T)
                                          -> DISPMANX_ELEMENT_HANDLE_T;
    pub(crate) fn vc_dispmanx_element_remove(update: DISPMANX_UPDATE_HANDLE_T,
                                             element: DISPMANX_ELEMENT_HANDLE_T)
                                             -> c_int;
    pub(crate) fn vc_dispmanx_update_submit_sync(update: DISPMANX_UPDATE_HANDLE_T) -> c_int;
}
