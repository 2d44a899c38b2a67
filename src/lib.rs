// eglport/src/lib.rs
//
//! EGL display, surface and presentation setup for embedded OpenGL ES renderers.
//!
//! This crate stands up exactly one rendering surface and GL context for a game renderer on a
//! range of embedded Linux display stacks: the raw framebuffer, heap-block windows, VideoCore
//! dispmanx, DRM/KMS with GBM, and X11 windows created by a desktop windowing toolkit. It does
//! not manage windows or the event loop; the renderer owns a [`Session`] and drives it through
//! `open`, `swap_buffers` and `close`.

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate log;

pub mod platform;
pub use crate::platform::framebuffer::Framebuffer;
pub use crate::platform::heap_window::HeapWindow;
pub use crate::platform::NativePlatform;
#[cfg(toolkit)]
pub use crate::platform::toolkit::ToolkitWindow;
#[cfg(dispmanx)]
pub use crate::platform::dispmanx::Dispmanx;
#[cfg(kms)]
pub use crate::platform::kms::Kms;
pub use crate::platform::generic::egl::library::{EglBackend, EglLibrary};

pub mod error;
pub use crate::error::{Error, WindowingApiError};

pub mod settings;
pub use crate::settings::{RenderMode, Settings, DEFAULT_SETTINGS_FILE};

pub mod config;
pub use crate::config::{ConfigAttributes, RenderableType};

pub mod buffer_format;
pub use crate::buffer_format::{BufferDepths, BufferFormat, FormatLadder};

pub mod modes;
pub use crate::modes::ModeRequest;

mod frame_counter;
pub use crate::frame_counter::FrameCounter;

mod gl_info;
pub use crate::gl_info::{has_extension, GLInfo};

mod info;
pub use crate::info::GLVersion;

mod session;
pub use crate::session::{Session, SessionState};

#[allow(non_camel_case_types)]
pub mod egl {
    use std::os::raw::{c_long, c_void};
    pub type khronos_utime_nanoseconds_t = khronos_uint64_t;
    pub type khronos_uint64_t = u64;
    pub type khronos_ssize_t = c_long;
    pub type EGLint = i32;
    pub type EGLNativeDisplayType = *const c_void;
    pub type EGLNativePixmapType = *const c_void;
    pub type EGLNativeWindowType = *const c_void;
    pub type NativeDisplayType = EGLNativeDisplayType;
    pub type NativePixmapType = EGLNativePixmapType;
    pub type NativeWindowType = EGLNativeWindowType;
    include!(concat!(env!("OUT_DIR"), "/egl_bindings.rs"));
}

#[cfg(test)]
mod tests;
