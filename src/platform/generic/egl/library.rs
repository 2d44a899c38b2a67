// eglport/src/platform/generic/egl/library.rs
//
//! Loading the system EGL library, and the EGL entry points a session uses.

use super::error::ToWindowingApiError;
use super::ffi::PFNEGLGETPLATFORMDISPLAYEXTPROC;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLNativeDisplayType};
use crate::egl::types::{EGLNativeWindowType, EGLSurface, EGLenum, EGLint};
use crate::egl::{self, Egl};
use crate::{Error, WindowingApiError};

use libc::{dlopen, dlsym, RTLD_LAZY};
use std::ffi::{CStr, CString};
use std::mem;
use std::os::raw::{c_char, c_void};
use std::ptr;

static EGL_LIBRARY_NAMES: [&[u8]; 2] = [b"libEGL.so.1\0", b"libEGL.so\0"];

/// The EGL calls a session makes.
///
/// Every fallible call reports the EGL error that `eglGetError` returned after it, wrapped in the
/// `Error` variant naming the step that failed.
pub trait EglBackend {
    fn get_display(&self, native_display: EGLNativeDisplayType) -> Result<EGLDisplay, Error>;

    /// Obtains a display through `eglGetPlatformDisplayEXT`.
    fn get_platform_display(&self, platform: EGLenum, native_display: *mut c_void)
                            -> Result<EGLDisplay, Error>;

    /// Initializes the display, returning the EGL major and minor version.
    fn initialize(&self, egl_display: EGLDisplay) -> Result<(EGLint, EGLint), Error>;

    fn query_string(&self, egl_display: EGLDisplay, name: EGLint) -> Option<String>;

    /// Returns at most `max_configs` configs matching the `EGL_NONE`-terminated `attributes`.
    fn choose_configs(&self, egl_display: EGLDisplay, attributes: &[EGLint], max_configs: usize)
                      -> Result<Vec<EGLConfig>, Error>;

    fn config_attrib(&self, egl_display: EGLDisplay, egl_config: EGLConfig, attribute: EGLint)
                     -> Option<EGLint>;

    fn bind_api(&self, api: EGLenum) -> Result<(), Error>;

    fn create_context(&self, egl_display: EGLDisplay, egl_config: EGLConfig, attributes: &[EGLint])
                      -> Result<EGLContext, Error>;

    fn create_window_surface(&self,
                             egl_display: EGLDisplay,
                             egl_config: EGLConfig,
                             native_window: EGLNativeWindowType)
                             -> Result<EGLSurface, Error>;

    fn make_current(&self,
                    egl_display: EGLDisplay,
                    egl_surface: EGLSurface,
                    egl_context: EGLContext)
                    -> Result<(), Error>;

    fn make_no_context_current(&self, egl_display: EGLDisplay) -> Result<(), Error>;

    fn swap_buffers(&self, egl_display: EGLDisplay, egl_surface: EGLSurface) -> Result<(), Error>;

    fn swap_interval(&self, egl_display: EGLDisplay, interval: EGLint) -> Result<(), Error>;

    fn destroy_context(&self, egl_display: EGLDisplay, egl_context: EGLContext)
                       -> Result<(), Error>;

    fn destroy_surface(&self, egl_display: EGLDisplay, egl_surface: EGLSurface)
                       -> Result<(), Error>;

    fn terminate(&self, egl_display: EGLDisplay) -> Result<(), Error>;

    /// Returns and clears the pending EGL error, if any.
    fn take_error(&self) -> Option<WindowingApiError>;

    fn get_proc_address(&self, symbol_name: &str) -> *const c_void;
}

/// The system EGL library, opened with `dlopen`.
pub struct EglLibrary {
    egl: Egl,
}

impl EglLibrary {
    /// Opens `libEGL.so.1`, or `libEGL.so` if that is missing.
    pub fn load() -> Result<EglLibrary, Error> {
        for name in EGL_LIBRARY_NAMES.iter() {
            let library = unsafe { dlopen(name.as_ptr() as *const c_char, RTLD_LAZY) };
            if !library.is_null() {
                return Ok(EglLibrary::from_handle(library));
            }
        }
        error!("Unable to open the EGL library");
        Err(Error::NoGLLibraryFound)
    }

    /// Opens the EGL library with the given file name, for vendor libraries such as
    /// `libbrcmEGL.so`.
    pub fn load_from(name: &str) -> Result<EglLibrary, Error> {
        let name = CString::new(name).map_err(|_| Error::NoGLLibraryFound)?;
        let library = unsafe { dlopen(name.as_ptr(), RTLD_LAZY) };
        if library.is_null() {
            error!("Unable to open the EGL library {:?}", name);
            return Err(Error::NoGLLibraryFound);
        }
        Ok(EglLibrary::from_handle(library))
    }

    fn from_handle(library: *mut c_void) -> EglLibrary {
        // The library stays loaded for the life of the process.
        let egl = Egl::load_with(|symbol_name| get_proc_address(library, symbol_name));
        EglLibrary { egl }
    }

    fn error(&self) -> WindowingApiError {
        unsafe { self.egl.GetError().to_windowing_api_error() }
    }
}

impl EglBackend for EglLibrary {
    fn get_display(&self, native_display: EGLNativeDisplayType) -> Result<EGLDisplay, Error> {
        unsafe {
            let egl_display = self.egl.GetDisplay(native_display);
            if egl_display == egl::NO_DISPLAY {
                return Err(Error::DisplayCreationFailed(self.error()));
            }
            Ok(egl_display)
        }
    }

    fn get_platform_display(&self, platform: EGLenum, native_display: *mut c_void)
                            -> Result<EGLDisplay, Error> {
        let function = self.get_proc_address("eglGetPlatformDisplayEXT");
        if function.is_null() {
            error!("eglGetPlatformDisplayEXT is unavailable");
            return Err(Error::RequiredExtensionUnavailable);
        }
        unsafe {
            let get_platform_display: PFNEGLGETPLATFORMDISPLAYEXTPROC = mem::transmute(function);
            let egl_display = get_platform_display(platform, native_display, ptr::null());
            if egl_display == egl::NO_DISPLAY {
                return Err(Error::DisplayCreationFailed(self.error()));
            }
            Ok(egl_display)
        }
    }

    fn initialize(&self, egl_display: EGLDisplay) -> Result<(EGLint, EGLint), Error> {
        unsafe {
            let (mut major, mut minor) = (0, 0);
            let result = self.egl.Initialize(egl_display, &mut major, &mut minor);
            if result != egl::TRUE {
                return Err(Error::DisplayInitializationFailed(self.error()));
            }
            Ok((major, minor))
        }
    }

    fn query_string(&self, egl_display: EGLDisplay, name: EGLint) -> Option<String> {
        unsafe {
            let string = self.egl.QueryString(egl_display, name);
            if string.is_null() {
                return None;
            }
            Some(CStr::from_ptr(string).to_string_lossy().into_owned())
        }
    }

    fn choose_configs(&self, egl_display: EGLDisplay, attributes: &[EGLint], max_configs: usize)
                      -> Result<Vec<EGLConfig>, Error> {
        debug_assert_eq!(attributes.last(), Some(&(egl::NONE as EGLint)));
        unsafe {
            let mut configs = vec![ptr::null(); max_configs];
            let mut config_count = 0;
            let result = self.egl.ChooseConfig(egl_display,
                                               attributes.as_ptr(),
                                               configs.as_mut_ptr(),
                                               max_configs as EGLint,
                                               &mut config_count);
            if result == egl::FALSE {
                return Err(Error::PixelFormatSelectionFailed(self.error()));
            }
            configs.truncate(config_count.max(0) as usize);
            Ok(configs)
        }
    }

    fn config_attrib(&self, egl_display: EGLDisplay, egl_config: EGLConfig, attribute: EGLint)
                     -> Option<EGLint> {
        unsafe {
            let mut value = 0;
            let result = self.egl.GetConfigAttrib(egl_display, egl_config, attribute, &mut value);
            if result == egl::FALSE {
                return None;
            }
            Some(value)
        }
    }

    fn bind_api(&self, api: EGLenum) -> Result<(), Error> {
        unsafe {
            if self.egl.BindAPI(api) == egl::FALSE {
                return Err(Error::ApiBindingFailed(self.error()));
            }
            Ok(())
        }
    }

    fn create_context(&self, egl_display: EGLDisplay, egl_config: EGLConfig, attributes: &[EGLint])
                      -> Result<EGLContext, Error> {
        unsafe {
            let egl_context = self.egl.CreateContext(egl_display,
                                                     egl_config,
                                                     egl::NO_CONTEXT,
                                                     attributes.as_ptr());
            if egl_context == egl::NO_CONTEXT {
                return Err(Error::ContextCreationFailed(self.error()));
            }
            Ok(egl_context)
        }
    }

    fn create_window_surface(&self,
                             egl_display: EGLDisplay,
                             egl_config: EGLConfig,
                             native_window: EGLNativeWindowType)
                             -> Result<EGLSurface, Error> {
        unsafe {
            let egl_surface = self.egl.CreateWindowSurface(egl_display,
                                                           egl_config,
                                                           native_window,
                                                           ptr::null());
            if egl_surface == egl::NO_SURFACE {
                return Err(Error::SurfaceCreationFailed(self.error()));
            }
            Ok(egl_surface)
        }
    }

    fn make_current(&self,
                    egl_display: EGLDisplay,
                    egl_surface: EGLSurface,
                    egl_context: EGLContext)
                    -> Result<(), Error> {
        unsafe {
            let result = self.egl.MakeCurrent(egl_display, egl_surface, egl_surface, egl_context);
            if result != egl::TRUE {
                return Err(Error::MakeCurrentFailed(self.error()));
            }
            Ok(())
        }
    }

    fn make_no_context_current(&self, egl_display: EGLDisplay) -> Result<(), Error> {
        unsafe {
            let result = self.egl.MakeCurrent(egl_display,
                                              egl::NO_SURFACE,
                                              egl::NO_SURFACE,
                                              egl::NO_CONTEXT);
            if result == egl::FALSE {
                return Err(Error::MakeCurrentFailed(self.error()));
            }
            Ok(())
        }
    }

    fn swap_buffers(&self, egl_display: EGLDisplay, egl_surface: EGLSurface) -> Result<(), Error> {
        unsafe {
            if self.egl.SwapBuffers(egl_display, egl_surface) == egl::FALSE {
                return Err(Error::PresentFailed(self.error()));
            }
            Ok(())
        }
    }

    fn swap_interval(&self, egl_display: EGLDisplay, interval: EGLint) -> Result<(), Error> {
        unsafe {
            if self.egl.SwapInterval(egl_display, interval) == egl::FALSE {
                return Err(Error::PresentFailed(self.error()));
            }
            Ok(())
        }
    }

    fn destroy_context(&self, egl_display: EGLDisplay, egl_context: EGLContext)
                       -> Result<(), Error> {
        unsafe {
            if self.egl.DestroyContext(egl_display, egl_context) == egl::FALSE {
                return Err(Error::ContextDestructionFailed(self.error()));
            }
            Ok(())
        }
    }

    fn destroy_surface(&self, egl_display: EGLDisplay, egl_surface: EGLSurface)
                       -> Result<(), Error> {
        unsafe {
            if self.egl.DestroySurface(egl_display, egl_surface) == egl::FALSE {
                return Err(Error::SurfaceDestructionFailed(self.error()));
            }
            Ok(())
        }
    }

    fn terminate(&self, egl_display: EGLDisplay) -> Result<(), Error> {
        unsafe {
            if self.egl.Terminate(egl_display) == egl::FALSE {
                return Err(Error::DisplayTerminationFailed(self.error()));
            }
            Ok(())
        }
    }

    fn take_error(&self) -> Option<WindowingApiError> {
        unsafe {
            match self.egl.GetError() {
                error if error == egl::SUCCESS as EGLint => None,
                error => Some(error.to_windowing_api_error()),
            }
        }
    }

    fn get_proc_address(&self, symbol_name: &str) -> *const c_void {
        let symbol_name = match CString::new(symbol_name) {
            Ok(symbol_name) => symbol_name,
            Err(_) => return ptr::null(),
        };
        unsafe { self.egl.GetProcAddress(symbol_name.as_ptr()) as *const c_void }
    }
}

fn get_proc_address(library: *mut c_void, symbol_name: &str) -> *const c_void {
    let symbol_name = match CString::new(symbol_name) {
        Ok(symbol_name) => symbol_name,
        Err(_) => return ptr::null(),
    };
    unsafe { dlsym(library, symbol_name.as_ptr()) as *const c_void }
}
