// eglport/src/platform/dispmanx/mod.rs
//
//! VideoCore dispmanx elements on the Raspberry Pi.

use self::ffi::{bcm_host_init, graphics_get_display_size, vc_dispmanx_display_close};
use self::ffi::{vc_dispmanx_display_open, vc_dispmanx_element_add, vc_dispmanx_element_remove};
use self::ffi::{vc_dispmanx_update_start, vc_dispmanx_update_submit_sync};
use self::ffi::{DISPMANX_DISPLAY_HANDLE_T, DISPMANX_ELEMENT_HANDLE_T, DISPMANX_ID_MAIN_LCD};
use self::ffi::{DISPMANX_NO_HANDLE, DISPMANX_NO_ROTATE, DISPMANX_PROTECTION_NONE};
use self::ffi::{EGL_DISPMANX_WINDOW_T, VC_RECT_T};
use super::NativePlatform;
use crate::egl::types::EGLNativeWindowType;
use crate::{Error, Settings};

use euclid::default::Size2D;
use std::ptr;

mod ffi;

/// A full-screen dispmanx element on the LCD, scaling the rendered size up to the screen.
pub struct Dispmanx {
    display: DISPMANX_DISPLAY_HANDLE_T,
    window: Option<Box<EGL_DISPMANX_WINDOW_T>>,
}

impl Dispmanx {
    #[inline]
    pub fn new() -> Dispmanx {
        Dispmanx { display: DISPMANX_NO_HANDLE, window: None }
    }
}

impl Default for Dispmanx {
    fn default() -> Dispmanx {
        Dispmanx::new()
    }
}

// The element samples the rendered size, in 16.16 fixed point.
fn source_rect(size: Size2D<i32>) -> VC_RECT_T {
    VC_RECT_T { x: 0, y: 0, width: size.width << 16, height: size.height << 16 }
}

impl NativePlatform for Dispmanx {
    fn open(&mut self, _: &Settings) -> Result<(), Error> {
        unsafe { bcm_host_init() };
        Ok(())
    }

    fn native_window(&mut self, size: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        unsafe {
            let (mut screen_width, mut screen_height) = (0, 0);
            if graphics_get_display_size(DISPMANX_ID_MAIN_LCD,
                                         &mut screen_width,
                                         &mut screen_height) < 0 {
                error!("graphics_get_display_size failed");
                return Err(Error::NativeWindowUnavailable);
            }
            debug!("VideoCore display is {}x{}", screen_width, screen_height);

            let dest_rect = VC_RECT_T {
                x: 0,
                y: 0,
                width: screen_width as i32,
                height: screen_height as i32,
            };
            let src_rect = source_rect(size);

            self.display = vc_dispmanx_display_open(DISPMANX_ID_MAIN_LCD as u32);
            let update = vc_dispmanx_update_start(0);
            let element = vc_dispmanx_element_add(update,
                                                  self.display,
                                                  0,
                                                  &dest_rect,
                                                  DISPMANX_NO_HANDLE,
                                                  &src_rect,
                                                  DISPMANX_PROTECTION_NONE,
                                                  ptr::null_mut(),
                                                  ptr::null_mut(),
                                                  DISPMANX_NO_ROTATE);
            vc_dispmanx_update_submit_sync(update);

            let window = self.window.insert(Box::new(EGL_DISPMANX_WINDOW_T {
                element,
                width: screen_width as i32,
                height: screen_height as i32,
            }));
            Ok(&**window as *const EGL_DISPMANX_WINDOW_T as EGLNativeWindowType)
        }
    }

    fn free_window(&mut self) {
        unsafe {
            if let Some(window) = self.window.take() {
                remove_element(window.element);
            }
            if self.display != DISPMANX_NO_HANDLE {
                vc_dispmanx_display_close(self.display);
                self.display = DISPMANX_NO_HANDLE;
            }
        }
    }
}

unsafe fn remove_element(element: DISPMANX_ELEMENT_HANDLE_T) {
    let update = vc_dispmanx_update_start(0);
    vc_dispmanx_element_remove(update, element);
    vc_dispmanx_update_submit_sync(update);
}
