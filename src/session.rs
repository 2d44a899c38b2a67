// eglport/src/session.rs
//
//! A session: one EGL display, context and window surface, opened and closed together.

use crate::config::{self, ConfigAttributes};
use crate::egl;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLSurface, EGLenum, EGLint};
use crate::platform::generic::egl::error::check_errors;
use crate::settings::DEFAULT_SETTINGS_FILE;
use crate::{BufferDepths, EglBackend, Error, FrameCounter, GLInfo, GLVersion};
use crate::{NativePlatform, Settings};

use euclid::default::Size2D;
use std::path::PathBuf;
use std::time::Instant;

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SessionState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// The EGL objects of an open session. A session holds all of them or none.
#[derive(Clone, Copy, Debug)]
struct SessionHandles {
    display: EGLDisplay,
    config: EGLConfig,
    context: EGLContext,
    surface: EGLSurface,
}

#[derive(Clone, Debug)]
enum SettingsSource {
    File(PathBuf),
    Pinned(Settings),
}

// What a partially completed open has acquired so far, and so what a rollback must release.
#[derive(Default)]
struct Acquired {
    platform: bool,
    native_display: bool,
    display: Option<EGLDisplay>,
    context: Option<EGLContext>,
    native_window: bool,
    surface: Option<EGLSurface>,
    current: bool,
}

impl Acquired {
    fn everything(handles: &SessionHandles) -> Acquired {
        Acquired {
            platform: true,
            native_display: true,
            display: Some(handles.display),
            context: Some(handles.context),
            native_window: true,
            surface: Some(handles.surface),
            current: true,
        }
    }
}

/// Stands up a single OpenGL ES context and window surface on a native platform, and presents
/// frames to it.
///
/// Settings are reloaded from the settings file on every `open`. Dropping an open session closes
/// it.
pub struct Session<P, E> where P: NativePlatform, E: EglBackend {
    egl: E,
    platform: P,
    settings_source: SettingsSource,
    settings: Settings,
    gl_version: GLVersion,
    state: SessionState,
    handles: Option<SessionHandles>,
    buffer_depths: BufferDepths,
    egl_version: Option<(EGLint, EGLint)>,
    frame_counter: FrameCounter,
}

impl<P, E> Session<P, E> where P: NativePlatform, E: EglBackend {
    /// Creates a closed session that reads `eglport.cfg` from the working directory.
    pub fn new(egl: E, platform: P) -> Session<P, E> {
        Session {
            egl,
            platform,
            settings_source: SettingsSource::File(PathBuf::from(DEFAULT_SETTINGS_FILE)),
            settings: Settings::default(),
            gl_version: GLVersion::default(),
            state: SessionState::Closed,
            handles: None,
            buffer_depths: BufferDepths::default(),
            egl_version: None,
            frame_counter: FrameCounter::new(),
        }
    }

    /// Reads settings from `path` instead of `eglport.cfg`.
    pub fn with_settings_file<Q>(mut self, path: Q) -> Session<P, E> where Q: Into<PathBuf> {
        self.settings_source = SettingsSource::File(path.into());
        self
    }

    /// Uses `settings` on every open instead of reading a settings file.
    pub fn with_settings(mut self, settings: Settings) -> Session<P, E> {
        self.settings_source = SettingsSource::Pinned(settings);
        self.settings = settings;
        self
    }

    /// Requests a context of the given OpenGL ES version. The default is 1.1.
    pub fn with_gl_version(mut self, gl_version: GLVersion) -> Session<P, E> {
        self.gl_version = gl_version;
        self
    }

    /// Opens the display, chooses a config and makes a new context current on a window surface
    /// of the requested size.
    ///
    /// Fails with `AlreadyOpen`, without touching anything, unless the session is closed. If any
    /// later step fails, everything acquired so far is released and the session is closed again.
    pub fn open(&mut self, size: Size2D<i32>) -> Result<(), Error> {
        if self.state != SessionState::Closed {
            error!("EGL session is already open");
            return Err(Error::AlreadyOpen);
        }

        self.state = SessionState::Opening;
        self.settings = match self.settings_source {
            SettingsSource::File(ref path) => Settings::load(path),
            SettingsSource::Pinned(settings) => settings,
        };

        let mut acquired = Acquired::default();
        match self.acquire(size, &mut acquired) {
            Ok(handles) => {
                self.handles = Some(handles);
                self.state = SessionState::Open;
                info!("EGL session open");
                Ok(())
            }
            Err(err) => {
                error!("Unable to open EGL session: {:?}", err);
                check_errors(&self.egl, "open");
                self.state = SessionState::Closing;
                self.release(acquired);
                self.state = SessionState::Closed;
                Err(err)
            }
        }
    }

    fn acquire(&mut self, size: Size2D<i32>, acquired: &mut Acquired)
               -> Result<SessionHandles, Error> {
        self.platform.open(&self.settings)?;
        acquired.platform = true;

        debug!("Opening EGL display");
        acquired.native_display = true;
        let display = self.platform.egl_display(&self.egl, &self.settings)?;
        acquired.display = Some(display);

        debug!("Initializing EGL");
        let (major, minor) = self.egl.initialize(display)?;
        self.egl_version = Some((major, minor));
        info!("EGL version {}.{}", major, minor);
        for &(label, name) in [
            ("Vendor", egl::VENDOR),
            ("Version", egl::VERSION),
            ("Extensions", egl::EXTENSIONS),
        ].iter() {
            let value = self.egl.query_string(display, name as EGLint);
            info!("EGL {}: {}", label, value.as_deref().unwrap_or("(unknown)"));
        }

        debug!("Choosing EGL config");
        let attributes = ConfigAttributes::from_settings(&self.settings, self.gl_version)?;
        let config = config::choose_config(&self.egl,
                                           display,
                                           &attributes,
                                           self.platform.max_configs(),
                                           self.platform.native_visual_id())?;

        debug!("Binding API");
        self.egl.bind_api(egl::OPENGL_ES_API)?;

        debug!("Creating context");
        let context = self.egl.create_context(display,
                                              config,
                                              &config::context_attributes(self.gl_version))?;
        acquired.context = Some(context);

        debug!("Creating window surface");
        acquired.native_window = true;
        let native_window = self.platform.native_window(size, &self.settings)?;
        let surface = self.egl.create_window_surface(display, config, native_window)?;
        acquired.surface = Some(surface);

        debug!("Making context current");
        self.egl.make_current(display, surface, context)?;
        acquired.current = true;

        let config_attrib = |attribute: EGLenum| {
            self.egl.config_attrib(display, config, attribute as EGLint).unwrap_or(0)
        };
        self.buffer_depths = BufferDepths::from_config(config_attrib(egl::BUFFER_SIZE),
                                                       config_attrib(egl::DEPTH_SIZE),
                                                       config_attrib(egl::STENCIL_SIZE));

        self.platform.finish_open(&self.egl, display, surface)?;

        debug!("Setting swap interval");
        let interval = if self.settings.vsync > 0 { 1 } else { 0 };
        if let Err(err) = self.egl.swap_interval(display, interval) {
            warn!("Unable to set swap interval {}: {:?}", interval, err);
        }

        check_errors(&self.egl, "open");
        Ok(SessionHandles { display, config, context, surface })
    }

    /// Releases the context, surface, display and platform resources. Does nothing if the
    /// session is closed.
    pub fn close(&mut self) {
        let handles = match self.handles.take() {
            None => return,
            Some(handles) => handles,
        };

        self.state = SessionState::Closing;
        info!("Closing EGL session");
        self.release(Acquired::everything(&handles));
        self.state = SessionState::Closed;
    }

    // Release failures are logged and otherwise ignored so that everything else still goes.
    fn release(&mut self, acquired: Acquired) {
        if let Some(display) = acquired.display {
            if acquired.current {
                if let Err(err) = self.egl.make_no_context_current(display) {
                    warn!("Unable to release the current context: {:?}", err);
                }
            }
            if let Some(context) = acquired.context {
                if let Err(err) = self.egl.destroy_context(display, context) {
                    warn!("{:?}", err);
                }
            }
            if let Some(surface) = acquired.surface {
                if let Err(err) = self.egl.destroy_surface(display, surface) {
                    warn!("{:?}", err);
                }
            }
            if let Err(err) = self.egl.terminate(display) {
                warn!("{:?}", err);
            }
        }

        self.buffer_depths = BufferDepths::default();
        self.egl_version = None;

        if acquired.native_window {
            self.platform.free_window();
        }
        if acquired.native_display {
            self.platform.free_display();
        }
        if acquired.platform {
            self.platform.close();
        }
    }

    /// Presents the back buffer: waits for vsync if enabled, swaps, lets the platform present,
    /// then counts the frame if fps reporting is on.
    pub fn swap_buffers(&mut self) -> Result<(), Error> {
        let handles = self.open_handles()?;

        if self.settings.vsync != 0 {
            self.platform.wait_for_vsync();
        }
        self.egl.swap_buffers(handles.display, handles.surface)?;
        self.platform.present(&self.egl)?;

        if self.settings.fps != 0 {
            self.frame_counter.frame(Instant::now());
        }
        Ok(())
    }

    /// Sets up DRM mode setting and returns the native mode size. Only the KMS platform supports
    /// this; calling it again returns the size found the first time.
    pub fn init_drm(&mut self) -> Result<Size2D<i32>, Error> {
        self.platform.init_drm()
    }

    /// Queries the OpenGL ES implementation strings of the current context.
    pub fn gl_info(&self) -> Result<GLInfo, Error> {
        self.open_handles()?;
        unsafe {
            let gl = glow::Context::from_loader_function(|symbol_name| {
                self.egl.get_proc_address(symbol_name)
            });
            Ok(GLInfo::query(&gl))
        }
    }

    fn open_handles(&self) -> Result<SessionHandles, Error> {
        match self.handles {
            Some(handles) if self.state == SessionState::Open => Ok(handles),
            _ => Err(Error::NotOpen),
        }
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open
    }

    /// The settings in effect: those loaded by the last `open`.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The color, depth and stencil depths of the open surface, or zeroes when closed.
    #[inline]
    pub fn buffer_depths(&self) -> BufferDepths {
        self.buffer_depths
    }

    /// The EGL major and minor version reported when the display was initialized.
    #[inline]
    pub fn egl_version(&self) -> Option<(EGLint, EGLint)> {
        self.egl_version
    }

    /// The config the open surface was created with.
    #[inline]
    pub fn egl_config(&self) -> Option<EGLConfig> {
        self.handles.map(|handles| handles.config)
    }

    #[inline]
    pub fn egl(&self) -> &E {
        &self.egl
    }

    #[inline]
    pub fn platform(&self) -> &P {
        &self.platform
    }

    #[inline]
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}

impl<P, E> Drop for Session<P, E> where P: NativePlatform, E: EglBackend {
    fn drop(&mut self) {
        self.close();
    }
}
