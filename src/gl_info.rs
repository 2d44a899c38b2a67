// eglport/src/gl_info.rs
//
//! OpenGL ES implementation strings.

use glow::HasContext;

/// Strings describing the OpenGL ES implementation behind a session's context.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GLInfo {
    pub vendor: String,
    pub renderer: String,
    pub version: String,
    pub extensions: String,
}

impl GLInfo {
    /// Queries the implementation strings. The context must be current.
    pub(crate) unsafe fn query(gl: &glow::Context) -> GLInfo {
        let mut renderer = gl.get_parameter_string(glow::RENDERER);
        if renderer.ends_with('\n') {
            renderer.pop();
        }
        GLInfo {
            vendor: gl.get_parameter_string(glow::VENDOR),
            renderer,
            version: gl.get_parameter_string(glow::VERSION),
            extensions: gl.get_parameter_string(glow::EXTENSIONS),
        }
    }

    #[inline]
    pub fn has_extension(&self, name: &str) -> bool {
        has_extension(&self.extensions, name)
    }
}

/// Returns true if `name` appears as a whole token in the space-separated `extensions` list.
pub fn has_extension(extensions: &str, name: &str) -> bool {
    !name.is_empty() && extensions.split_ascii_whitespace().any(|extension| extension == name)
}
