// eglport/src/platform/mod.rs
//
//! Native display providers: where the EGL display and window come from on each target.

use crate::config::DEFAULT_MAX_CONFIGS;
use crate::egl;
use crate::egl::types::{EGLDisplay, EGLNativeDisplayType, EGLNativeWindowType, EGLSurface};
use crate::egl::types::EGLint;
use crate::{EglBackend, Error, RenderMode, Settings};

use euclid::default::Size2D;

pub mod generic;

pub mod framebuffer;
pub mod heap_window;

#[cfg(toolkit)]
pub mod toolkit;

#[cfg(dispmanx)]
pub mod dispmanx;

#[cfg(kms)]
pub mod kms;

use self::framebuffer::Framebuffer;
#[cfg(toolkit)]
use self::toolkit::ToolkitWindow;

/// Supplies the native display and window a session creates its EGL surface on, and takes part
/// in presenting frames.
///
/// A session calls `open`, `egl_display`, `native_window` and `finish_open` in that order while
/// opening, and `free_window`, `free_display` and `close` in that order while closing or rolling
/// back a failed open.
pub trait NativePlatform {
    /// Platform-wide setup, run before anything else with the settings the session just loaded.
    fn open(&mut self, _: &Settings) -> Result<(), Error> {
        Ok(())
    }

    /// The native display handed to `eglGetDisplay`.
    fn native_display(&mut self, _: &Settings) -> Result<EGLNativeDisplayType, Error> {
        Ok(egl::DEFAULT_DISPLAY as EGLNativeDisplayType)
    }

    /// Obtains the EGL display for this platform.
    fn egl_display(&mut self, egl: &dyn EglBackend, settings: &Settings)
                   -> Result<EGLDisplay, Error> {
        let native_display = self.native_display(settings)?;
        egl.get_display(native_display)
    }

    /// The native window the window surface is created on.
    fn native_window(&mut self, size: Size2D<i32>, settings: &Settings)
                     -> Result<EGLNativeWindowType, Error>;

    /// How many configs to ask EGL for.
    fn max_configs(&self) -> usize {
        DEFAULT_MAX_CONFIGS
    }

    /// The `EGL_NATIVE_VISUAL_ID` the chosen config should carry, if the platform needs one.
    fn native_visual_id(&self) -> Option<EGLint> {
        None
    }

    /// Runs once the context is current on the new surface.
    fn finish_open(&mut self, _: &dyn EglBackend, _: EGLDisplay, _: EGLSurface)
                   -> Result<(), Error> {
        Ok(())
    }

    /// Blocks until the next vertical blank, where the platform can wait for one.
    fn wait_for_vsync(&mut self) {}

    /// Runs after `eglSwapBuffers`.
    fn present(&mut self, _: &dyn EglBackend) -> Result<(), Error> {
        Ok(())
    }

    fn free_window(&mut self) {}

    fn free_display(&mut self) {}

    /// Releases whatever `open` acquired.
    fn close(&mut self) {}

    /// Discovers the display pipeline and returns the native mode size.
    fn init_drm(&mut self) -> Result<Size2D<i32>, Error> {
        Err(Error::UnsupportedOnThisPlatform)
    }
}

impl<P> NativePlatform for Box<P> where P: NativePlatform + ?Sized {
    fn open(&mut self, settings: &Settings) -> Result<(), Error> {
        (**self).open(settings)
    }

    fn native_display(&mut self, settings: &Settings) -> Result<EGLNativeDisplayType, Error> {
        (**self).native_display(settings)
    }

    fn egl_display(&mut self, egl: &dyn EglBackend, settings: &Settings)
                   -> Result<EGLDisplay, Error> {
        (**self).egl_display(egl, settings)
    }

    fn native_window(&mut self, size: Size2D<i32>, settings: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        (**self).native_window(size, settings)
    }

    fn max_configs(&self) -> usize {
        (**self).max_configs()
    }

    fn native_visual_id(&self) -> Option<EGLint> {
        (**self).native_visual_id()
    }

    fn finish_open(&mut self,
                   egl: &dyn EglBackend,
                   egl_display: EGLDisplay,
                   egl_surface: EGLSurface)
                   -> Result<(), Error> {
        (**self).finish_open(egl, egl_display, egl_surface)
    }

    fn wait_for_vsync(&mut self) {
        (**self).wait_for_vsync()
    }

    fn present(&mut self, egl: &dyn EglBackend) -> Result<(), Error> {
        (**self).present(egl)
    }

    fn free_window(&mut self) {
        (**self).free_window()
    }

    fn free_display(&mut self) {
        (**self).free_display()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn init_drm(&mut self) -> Result<Size2D<i32>, Error> {
        (**self).init_drm()
    }
}

/// Picks the platform for the render mode `settings` select.
///
/// Raw mode renders to the framebuffer, which waits on `/dev/fb0` for vsync in sessions that set
/// `use_vsync`.
/// Toolkit mode needs the toolkit's window.
#[cfg(toolkit)]
pub fn select(settings: &Settings, toolkit_window: Option<ToolkitWindow>)
              -> Result<Box<dyn NativePlatform>, Error> {
    match settings.render_mode()? {
        RenderMode::Raw => Ok(Box::new(Framebuffer::new())),
        RenderMode::Toolkit => match toolkit_window {
            Some(toolkit_window) => Ok(Box::new(toolkit_window)),
            None => {
                error!("Toolkit render mode selected but no window was supplied");
                Err(Error::NoWidgetAttached)
            }
        },
    }
}

/// Picks the platform for the render mode `settings` select.
///
/// Only raw mode is available without toolkit window support.
#[cfg(not(toolkit))]
pub fn select(settings: &Settings) -> Result<Box<dyn NativePlatform>, Error> {
    match settings.render_mode()? {
        RenderMode::Raw => Ok(Box::new(Framebuffer::new())),
        RenderMode::Toolkit => Err(Error::UnsupportedOnThisPlatform),
    }
}
