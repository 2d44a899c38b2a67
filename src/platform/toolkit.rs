// eglport/src/platform/toolkit.rs
//
//! X11 windows created by a desktop windowing toolkit.

use super::NativePlatform;
use crate::egl::types::{EGLNativeDisplayType, EGLNativeWindowType};
use crate::{Error, Settings};

use euclid::default::Size2D;
use rwh_06::{HasDisplayHandle, HasWindowHandle, RawDisplayHandle, RawWindowHandle};
use std::os::raw::{c_ulong, c_void};
use std::ptr::NonNull;

/// The Xlib display and window of a toolkit window, borrowed for the life of a session.
///
/// The toolkit keeps ownership: nothing is freed when the session closes.
#[derive(Clone, Copy, Debug)]
pub struct ToolkitWindow {
    display: NonNull<c_void>,
    window: c_ulong,
}

impl ToolkitWindow {
    /// Takes the X11 display and window from a toolkit window.
    ///
    /// The window must outlive every session opened on it.
    pub fn new<W>(window: &W) -> Result<ToolkitWindow, Error>
                  where W: HasDisplayHandle + HasWindowHandle {
        let display_handle = window.display_handle().map_err(|err| {
            error!("Unable to get the toolkit's display handle: {}", err);
            Error::NativeDisplayUnavailable
        })?;
        let window_handle = window.window_handle().map_err(|err| {
            error!("Unable to get the toolkit's window handle: {}", err);
            Error::NativeWindowUnavailable
        })?;
        unsafe { ToolkitWindow::from_raw_handles(display_handle.as_raw(), window_handle.as_raw()) }
    }

    /// Takes the X11 display and window from raw handles.
    ///
    /// # Safety
    ///
    /// The handles must stay valid for the life of every session opened on this window.
    pub unsafe fn from_raw_handles(display_handle: RawDisplayHandle,
                                   window_handle: RawWindowHandle)
                                   -> Result<ToolkitWindow, Error> {
        let display = match display_handle {
            RawDisplayHandle::Xlib(handle) => match handle.display {
                Some(display) => display,
                None => {
                    error!("Couldn't get the X11 display from the toolkit");
                    return Err(Error::NativeDisplayUnavailable);
                }
            },
            other => {
                error!("Unsupported toolkit display handle: {:?}", other);
                return Err(Error::IncompatibleNativeWidget);
            }
        };
        let window = match window_handle {
            RawWindowHandle::Xlib(handle) if handle.window != 0 => handle.window,
            RawWindowHandle::Xlib(_) => {
                error!("Couldn't get the X11 window from the toolkit");
                return Err(Error::NativeWindowUnavailable);
            }
            other => {
                error!("Unsupported toolkit window handle: {:?}", other);
                return Err(Error::IncompatibleNativeWidget);
            }
        };
        Ok(ToolkitWindow { display, window })
    }
}

impl NativePlatform for ToolkitWindow {
    fn native_display(&mut self, _: &Settings) -> Result<EGLNativeDisplayType, Error> {
        Ok(self.display.as_ptr() as EGLNativeDisplayType)
    }

    fn native_window(&mut self, _: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        Ok(self.window as EGLNativeWindowType)
    }
}
