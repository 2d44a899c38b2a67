// eglport/src/config.rs
//
//! Building EGL attribute lists and choosing a config from them.

use crate::egl;
use crate::egl::types::{EGLConfig, EGLDisplay, EGLint};
use crate::{EglBackend, Error, GLVersion, Settings};

/// Number of configs requested from EGL on most platforms.
pub const DEFAULT_MAX_CONFIGS: usize = 5;

/// Slots in a config attribute list, including the terminating `EGL_NONE`.
pub const CONFIG_ATTRIBUTE_CAPACITY: usize = 23;

bitflags! {
    /// Values of `EGL_RENDERABLE_TYPE`.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct RenderableType: EGLint {
        const OPENGL_ES  = 0x0001;
        const OPENVG     = 0x0002;
        const OPENGL_ES2 = 0x0004;
        const OPENGL     = 0x0008;
        const OPENGL_ES3 = 0x0040;
    }
}

/// A fixed-capacity EGL attribute list that is always terminated by `EGL_NONE`.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigAttributes {
    slots: [EGLint; CONFIG_ATTRIBUTE_CAPACITY],
    len: usize,
}

impl ConfigAttributes {
    /// Returns an empty list, holding only the terminator.
    pub fn new() -> ConfigAttributes {
        ConfigAttributes { slots: [egl::NONE as EGLint; CONFIG_ATTRIBUTE_CAPACITY], len: 0 }
    }

    /// Builds the attributes that request a window-capable config matching `settings`.
    pub fn from_settings(settings: &Settings, version: GLVersion)
                         -> Result<ConfigAttributes, Error> {
        let mut attributes = ConfigAttributes::new();
        attributes.push(egl::RED_SIZE as EGLint,        settings.red_size)?;
        attributes.push(egl::GREEN_SIZE as EGLint,      settings.green_size)?;
        attributes.push(egl::BLUE_SIZE as EGLint,       settings.blue_size)?;
        attributes.push(egl::ALPHA_SIZE as EGLint,      settings.alpha_size)?;
        attributes.push(egl::DEPTH_SIZE as EGLint,      settings.depth_size)?;
        attributes.push(egl::BUFFER_SIZE as EGLint,     settings.buffer_size)?;
        attributes.push(egl::STENCIL_SIZE as EGLint,    settings.stencil_size)?;
        attributes.push(egl::SURFACE_TYPE as EGLint,    egl::WINDOW_BIT as EGLint)?;
        attributes.push(egl::RENDERABLE_TYPE as EGLint, version.renderable_type().bits())?;
        attributes.push(egl::SAMPLE_BUFFERS as EGLint,  if settings.fsaa > 0 { 1 } else { 0 })?;
        attributes.push(egl::SAMPLES as EGLint,         settings.fsaa)?;
        Ok(attributes)
    }

    /// Appends an attribute/value pair. Fails if the pair and the terminator wouldn't fit.
    pub fn push(&mut self, attribute: EGLint, value: EGLint) -> Result<(), Error> {
        if self.len + 2 >= CONFIG_ATTRIBUTE_CAPACITY {
            error!("Config attribute list is full; dropping attribute {:#x}", attribute);
            return Err(Error::Failed);
        }
        self.slots[self.len] = attribute;
        self.slots[self.len + 1] = value;
        self.len += 2;
        self.slots[self.len] = egl::NONE as EGLint;
        Ok(())
    }

    /// Returns the value requested for `attribute`, if present.
    pub fn get(&self, attribute: EGLint) -> Option<EGLint> {
        self.slots[..self.len].chunks(2).find(|pair| pair[0] == attribute).map(|pair| pair[1])
    }

    /// The attribute list including the terminating `EGL_NONE`.
    #[inline]
    pub fn as_slice(&self) -> &[EGLint] {
        &self.slots[..self.len + 1]
    }

    /// Number of attribute/value pairs.
    #[inline]
    pub fn pair_count(&self) -> usize {
        self.len / 2
    }
}

impl Default for ConfigAttributes {
    fn default() -> ConfigAttributes {
        ConfigAttributes::new()
    }
}

/// Builds the context attribute list for `version`.
///
/// OpenGL ES 1.x contexts take no client version attribute.
pub fn context_attributes(version: GLVersion) -> Vec<EGLint> {
    let mut attributes = vec![];
    if version.major >= 2 {
        attributes.extend_from_slice(&[
            egl::CONTEXT_CLIENT_VERSION as EGLint, version.major as EGLint,
        ]);
    }
    attributes.push(egl::NONE as EGLint);
    attributes
}

/// Asks EGL for up to `max_configs` configs matching `attributes` and picks one.
///
/// The first match wins, except that when `native_visual_id` is given the first config with that
/// `EGL_NATIVE_VISUAL_ID` is promoted ahead of it.
pub fn choose_config<E>(egl: &E,
                        egl_display: EGLDisplay,
                        attributes: &ConfigAttributes,
                        max_configs: usize,
                        native_visual_id: Option<EGLint>)
                        -> Result<EGLConfig, Error>
                        where E: EglBackend + ?Sized {
    let configs = egl.choose_configs(egl_display, attributes.as_slice(), max_configs)?;
    if configs.is_empty() {
        error!("Unable to query for available configs, found 0.");
        return Err(Error::NoPixelFormatFound);
    }
    info!("Found {} available configs", configs.len());

    if let Some(visual_id) = native_visual_id {
        let matching = configs.iter().position(|&config| {
            egl.config_attrib(egl_display, config, egl::NATIVE_VISUAL_ID as EGLint) ==
                Some(visual_id)
        });
        match matching {
            Some(index) => {
                debug!("Config {} matches native visual {:#x}", index, visual_id);
                return Ok(configs[index]);
            }
            None => warn!("No config matches native visual {:#x}; using the first", visual_id),
        }
    }

    Ok(configs[0])
}
