// eglport/src/info.rs
//
//! OpenGL ES version information.

use crate::config::RenderableType;

/// Describes the OpenGL ES version that is requested when a context is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GLVersion {
    pub major: u8,
    pub minor: u8,
}

impl GLVersion {
    #[inline]
    pub fn new(major: u8, minor: u8) -> GLVersion {
        GLVersion { major, minor }
    }

    /// The `EGL_RENDERABLE_TYPE` bit a config must carry to host a context of this version.
    pub fn renderable_type(&self) -> RenderableType {
        match self.major {
            0 | 1 => RenderableType::OPENGL_ES,
            2 => RenderableType::OPENGL_ES2,
            _ => RenderableType::OPENGL_ES3,
        }
    }
}

impl Default for GLVersion {
    // The engine's fixed-function renderer targets OpenGL ES 1.x.
    #[inline]
    fn default() -> GLVersion {
        GLVersion::new(1, 1)
    }
}
