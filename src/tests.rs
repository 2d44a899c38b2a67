// eglport/src/tests.rs
//
//! Unit tests.

use crate::buffer_format::{channel_bits, FORMAT_LADDER_STEPS};
use crate::config::{self, CONFIG_ATTRIBUTE_CAPACITY, DEFAULT_MAX_CONFIGS};
use crate::egl;
use crate::egl::types::{EGLConfig, EGLContext, EGLDisplay, EGLNativeDisplayType};
use crate::egl::types::{EGLNativeWindowType, EGLSurface, EGLenum, EGLint};
use crate::gl_info::has_extension;
use crate::modes::{self, ModeRequest};
use crate::platform::generic::egl::error::{check_errors, ToWindowingApiError};
use crate::platform::{self, NativePlatform};
use crate::{BufferDepths, BufferFormat, ConfigAttributes, EglBackend, Error, FormatLadder};
use crate::{Framebuffer, FrameCounter, GLVersion, HeapWindow, RenderMode, RenderableType};
use crate::{Session, SessionState, Settings, WindowingApiError};

use euclid::default::Size2D;
use serial_test::serial;
use std::cell::{Cell, RefCell};
use std::env;
use std::fs;
use std::os::raw::c_void;
use std::process;
use std::ptr;
use std::rc::Rc;
use std::time::{Duration, Instant};

type Journal = Rc<RefCell<Vec<String>>>;

const FIRST_CONFIG: usize = 0x100;

fn handle(value: usize) -> *const c_void {
    value as *const c_void
}

// A scripted EGL that records every call and fails the one named in `fail`.
struct FakeEgl {
    journal: Journal,
    fail: Option<&'static str>,
    visual_ids: Vec<EGLint>,
    buffer_size: EGLint,
    depth_size: EGLint,
    stencil_size: EGLint,
    max_configs_requested: Cell<usize>,
    pending_error: Cell<Option<WindowingApiError>>,
}

impl FakeEgl {
    fn new(journal: &Journal) -> FakeEgl {
        FakeEgl {
            journal: journal.clone(),
            fail: None,
            visual_ids: vec![1, 2, 3],
            buffer_size: 16,
            depth_size: 16,
            stencil_size: 0,
            max_configs_requested: Cell::new(0),
            pending_error: Cell::new(None),
        }
    }

    fn failing(journal: &Journal, step: &'static str) -> FakeEgl {
        FakeEgl { fail: Some(step), ..FakeEgl::new(journal) }
    }

    fn call(&self, step: &str, error: Error) -> Result<(), Error> {
        self.journal.borrow_mut().push(step.to_owned());
        if self.fail == Some(step) {
            return Err(error);
        }
        Ok(())
    }
}

impl EglBackend for FakeEgl {
    fn get_display(&self, _: EGLNativeDisplayType) -> Result<EGLDisplay, Error> {
        self.call("get_display", Error::DisplayCreationFailed(WindowingApiError::BadDisplay))?;
        Ok(handle(1))
    }

    fn get_platform_display(&self, _: EGLenum, _: *mut c_void) -> Result<EGLDisplay, Error> {
        self.call("get_platform_display", Error::RequiredExtensionUnavailable)?;
        Ok(handle(1))
    }

    fn initialize(&self, _: EGLDisplay) -> Result<(EGLint, EGLint), Error> {
        self.call("initialize",
                  Error::DisplayInitializationFailed(WindowingApiError::NotInitialized))?;
        Ok((1, 4))
    }

    fn query_string(&self, _: EGLDisplay, _: EGLint) -> Option<String> {
        Some("fake".to_owned())
    }

    fn choose_configs(&self, _: EGLDisplay, attributes: &[EGLint], max_configs: usize)
                      -> Result<Vec<EGLConfig>, Error> {
        assert_eq!(attributes.last(), Some(&(egl::NONE as EGLint)));
        self.max_configs_requested.set(max_configs);
        self.call("choose_configs",
                  Error::PixelFormatSelectionFailed(WindowingApiError::BadAttribute))?;
        let count = self.visual_ids.len().min(max_configs);
        Ok((0..count).map(|index| handle(FIRST_CONFIG + index)).collect())
    }

    fn config_attrib(&self, _: EGLDisplay, egl_config: EGLConfig, attribute: EGLint)
                     -> Option<EGLint> {
        match attribute as EGLenum {
            egl::NATIVE_VISUAL_ID => {
                self.visual_ids.get(egl_config as usize - FIRST_CONFIG).cloned()
            }
            egl::BUFFER_SIZE => Some(self.buffer_size),
            egl::DEPTH_SIZE => Some(self.depth_size),
            egl::STENCIL_SIZE => Some(self.stencil_size),
            _ => None,
        }
    }

    fn bind_api(&self, _: EGLenum) -> Result<(), Error> {
        self.call("bind_api", Error::ApiBindingFailed(WindowingApiError::BadParameter))
    }

    fn create_context(&self, _: EGLDisplay, _: EGLConfig, attributes: &[EGLint])
                      -> Result<EGLContext, Error> {
        assert_eq!(attributes.last(), Some(&(egl::NONE as EGLint)));
        self.call("create_context", Error::ContextCreationFailed(WindowingApiError::BadConfig))?;
        Ok(handle(2))
    }

    fn create_window_surface(&self, _: EGLDisplay, _: EGLConfig, _: EGLNativeWindowType)
                             -> Result<EGLSurface, Error> {
        self.call("create_window_surface",
                  Error::SurfaceCreationFailed(WindowingApiError::BadNativeWindow))?;
        Ok(handle(3))
    }

    fn make_current(&self, _: EGLDisplay, _: EGLSurface, _: EGLContext) -> Result<(), Error> {
        self.call("make_current", Error::MakeCurrentFailed(WindowingApiError::BadMatch))
    }

    fn make_no_context_current(&self, _: EGLDisplay) -> Result<(), Error> {
        self.call("make_no_context_current", Error::MakeCurrentFailed(WindowingApiError::BadMatch))
    }

    fn swap_buffers(&self, _: EGLDisplay, _: EGLSurface) -> Result<(), Error> {
        self.call("swap_buffers", Error::PresentFailed(WindowingApiError::BadSurface))
    }

    fn swap_interval(&self, _: EGLDisplay, interval: EGLint) -> Result<(), Error> {
        self.call(&format!("swap_interval {}", interval),
                  Error::PresentFailed(WindowingApiError::BadParameter))
    }

    fn destroy_context(&self, _: EGLDisplay, _: EGLContext) -> Result<(), Error> {
        self.call("destroy_context",
                  Error::ContextDestructionFailed(WindowingApiError::BadContext))
    }

    fn destroy_surface(&self, _: EGLDisplay, _: EGLSurface) -> Result<(), Error> {
        self.call("destroy_surface",
                  Error::SurfaceDestructionFailed(WindowingApiError::BadSurface))
    }

    fn terminate(&self, _: EGLDisplay) -> Result<(), Error> {
        self.call("terminate", Error::DisplayTerminationFailed(WindowingApiError::BadDisplay))
    }

    fn take_error(&self) -> Option<WindowingApiError> {
        self.pending_error.take()
    }

    fn get_proc_address(&self, _: &str) -> *const c_void {
        ptr::null()
    }
}

// A platform that records its hooks into the same journal as the EGL calls.
struct FakePlatform {
    journal: Journal,
    fail: Option<&'static str>,
    max_configs: usize,
    native_visual_id: Option<EGLint>,
}

impl FakePlatform {
    fn new(journal: &Journal) -> FakePlatform {
        FakePlatform {
            journal: journal.clone(),
            fail: None,
            max_configs: DEFAULT_MAX_CONFIGS,
            native_visual_id: None,
        }
    }

    fn failing(journal: &Journal, step: &'static str) -> FakePlatform {
        FakePlatform { fail: Some(step), ..FakePlatform::new(journal) }
    }

    fn record(&self, step: &str) {
        self.journal.borrow_mut().push(step.to_owned());
    }

    fn call(&self, step: &str, error: Error) -> Result<(), Error> {
        self.record(step);
        if self.fail == Some(step) {
            return Err(error);
        }
        Ok(())
    }
}

impl NativePlatform for FakePlatform {
    fn open(&mut self, _: &Settings) -> Result<(), Error> {
        self.call("platform.open", Error::Failed)
    }

    fn native_display(&mut self, _: &Settings) -> Result<EGLNativeDisplayType, Error> {
        self.call("platform.native_display", Error::NativeDisplayUnavailable)?;
        Ok(handle(0x10))
    }

    fn native_window(&mut self, _: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        self.call("platform.native_window", Error::NativeWindowUnavailable)?;
        Ok(handle(0x20))
    }

    fn max_configs(&self) -> usize {
        self.max_configs
    }

    fn native_visual_id(&self) -> Option<EGLint> {
        self.native_visual_id
    }

    fn finish_open(&mut self, _: &dyn EglBackend, _: EGLDisplay, _: EGLSurface)
                   -> Result<(), Error> {
        self.call("platform.finish_open", Error::ModeSetFailed)
    }

    fn wait_for_vsync(&mut self) {
        self.record("platform.wait_for_vsync");
    }

    fn present(&mut self, _: &dyn EglBackend) -> Result<(), Error> {
        self.call("platform.present", Error::PageFlipFailed)
    }

    fn free_window(&mut self) {
        self.record("platform.free_window");
    }

    fn free_display(&mut self) {
        self.record("platform.free_display");
    }

    fn close(&mut self) {
        self.record("platform.close");
    }
}

fn new_journal() -> Journal {
    Rc::new(RefCell::new(vec![]))
}

fn journal_entries(journal: &Journal) -> Vec<String> {
    journal.borrow().clone()
}

fn session(egl: FakeEgl, platform: FakePlatform, settings: Settings)
           -> Session<FakePlatform, FakeEgl> {
    Session::new(egl, platform).with_settings(settings)
}

fn size() -> Size2D<i32> {
    Size2D::new(640, 480)
}

static OPEN_STEPS: [&str; 12] = [
    "platform.open",
    "platform.native_display",
    "get_display",
    "initialize",
    "choose_configs",
    "bind_api",
    "create_context",
    "platform.native_window",
    "create_window_surface",
    "make_current",
    "platform.finish_open",
    "swap_interval 0",
];

static CLOSE_STEPS: [&str; 7] = [
    "make_no_context_current",
    "destroy_context",
    "destroy_surface",
    "terminate",
    "platform.free_window",
    "platform.free_display",
    "platform.close",
];

#[test]
fn test_open_and_close_order() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    assert_eq!(session.state(), SessionState::Closed);

    session.open(size()).unwrap();
    assert!(session.is_open());
    assert_eq!(journal_entries(&journal), OPEN_STEPS);
    assert_eq!(session.egl_version(), Some((1, 4)));
    assert_eq!(session.egl_config(), Some(handle(FIRST_CONFIG)));
    assert_eq!(session.buffer_depths(),
               BufferDepths { color_bits: 5, depth_bits: 16, stencil_bits: 0 });

    journal.borrow_mut().clear();
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(journal_entries(&journal), CLOSE_STEPS);
    assert_eq!(session.buffer_depths(), BufferDepths::default());
    assert_eq!(session.egl_version(), None);
    assert_eq!(session.egl_config(), None);
}

#[test]
fn test_open_twice_fails_without_side_effects() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    session.open(size()).unwrap();
    let entries = journal_entries(&journal);

    assert_eq!(session.open(size()), Err(Error::AlreadyOpen));
    assert_eq!(journal_entries(&journal), entries);
    assert!(session.is_open());
}

#[test]
fn test_close_when_closed_does_nothing() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    session.close();
    session.close();
    assert_eq!(session.state(), SessionState::Closed);
    assert!(journal.borrow().is_empty());

    session.open(size()).unwrap();
    session.close();
    journal.borrow_mut().clear();
    session.close();
    assert!(journal.borrow().is_empty());
}

#[test]
fn test_session_can_reopen() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    session.open(size()).unwrap();
    session.close();
    journal.borrow_mut().clear();
    session.open(size()).unwrap();
    assert!(session.is_open());
    assert_eq!(journal_entries(&journal), OPEN_STEPS);
}

#[test]
fn test_dropping_open_session_closes_it() {
    let journal = new_journal();
    {
        let mut session = session(FakeEgl::new(&journal),
                                  FakePlatform::new(&journal),
                                  Settings::default());
        session.open(size()).unwrap();
        journal.borrow_mut().clear();
    }
    assert_eq!(journal_entries(&journal), CLOSE_STEPS);
}

// Runs an open that fails at `step` and returns the calls made after the failing one.
fn rollback_after(egl: FakeEgl, platform: FakePlatform, journal: &Journal, step: &str)
                  -> (Error, Vec<String>) {
    let mut session = session(egl, platform, Settings::default());
    let error = session.open(size()).unwrap_err();
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(session.buffer_depths(), BufferDepths::default());

    let entries = journal_entries(journal);
    let failed_at = entries.iter().position(|entry| entry == step).unwrap();
    let rollback = entries[failed_at + 1..].to_vec();

    // Closing after a failed open must not release anything twice.
    journal.borrow_mut().clear();
    drop(session);
    assert!(journal.borrow().is_empty());

    (error, rollback)
}

#[test]
fn test_failed_surface_creation_rolls_back() {
    let journal = new_journal();
    let (error, rollback) = rollback_after(FakeEgl::failing(&journal, "create_window_surface"),
                                           FakePlatform::new(&journal),
                                           &journal,
                                           "create_window_surface");
    assert_eq!(error, Error::SurfaceCreationFailed(WindowingApiError::BadNativeWindow));
    assert_eq!(rollback, [
        "destroy_context",
        "terminate",
        "platform.free_window",
        "platform.free_display",
        "platform.close",
    ]);
}

#[test]
fn test_failed_display_creation_rolls_back() {
    let journal = new_journal();
    let (error, rollback) = rollback_after(FakeEgl::failing(&journal, "get_display"),
                                           FakePlatform::new(&journal),
                                           &journal,
                                           "get_display");
    assert_eq!(error, Error::DisplayCreationFailed(WindowingApiError::BadDisplay));
    assert_eq!(rollback, ["platform.free_display", "platform.close"]);
}

#[test]
fn test_failed_config_choice_terminates_display() {
    let journal = new_journal();
    let mut egl = FakeEgl::new(&journal);
    egl.visual_ids.clear();
    let (error, rollback) = rollback_after(egl,
                                           FakePlatform::new(&journal),
                                           &journal,
                                           "choose_configs");
    assert_eq!(error, Error::NoPixelFormatFound);
    assert_eq!(rollback, ["terminate", "platform.free_display", "platform.close"]);
}

#[test]
fn test_failed_platform_finish_releases_everything() {
    let journal = new_journal();
    let (error, rollback) = rollback_after(FakeEgl::new(&journal),
                                           FakePlatform::failing(&journal, "platform.finish_open"),
                                           &journal,
                                           "platform.finish_open");
    assert_eq!(error, Error::ModeSetFailed);
    assert_eq!(rollback, CLOSE_STEPS);
}

#[test]
fn test_failed_platform_open_releases_nothing() {
    let journal = new_journal();
    let (error, rollback) = rollback_after(FakeEgl::new(&journal),
                                           FakePlatform::failing(&journal, "platform.open"),
                                           &journal,
                                           "platform.open");
    assert_eq!(error, Error::Failed);
    assert!(rollback.is_empty());
}

#[test]
fn test_swap_interval_follows_vsync_setting() {
    let journal = new_journal();
    let settings = Settings { vsync: 1, ..Settings::default() };
    let mut session = session(FakeEgl::new(&journal), FakePlatform::new(&journal), settings);
    session.open(size()).unwrap();
    assert_eq!(journal.borrow().last().map(String::as_str), Some("swap_interval 1"));
}

#[test]
fn test_failed_swap_interval_is_not_fatal() {
    let journal = new_journal();
    let mut session = session(FakeEgl::failing(&journal, "swap_interval 0"),
                              FakePlatform::new(&journal),
                              Settings::default());
    session.open(size()).unwrap();
    assert!(session.is_open());
}

#[test]
fn test_swap_buffers_requires_open_session() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    assert_eq!(session.swap_buffers(), Err(Error::NotOpen));
    assert!(journal.borrow().is_empty());
    assert_eq!(session.gl_info().err(), Some(Error::NotOpen));
}

#[test]
fn test_swap_buffers_without_vsync() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    session.open(size()).unwrap();
    journal.borrow_mut().clear();

    session.swap_buffers().unwrap();
    assert_eq!(journal_entries(&journal), ["swap_buffers", "platform.present"]);
}

#[test]
fn test_swap_buffers_waits_for_vsync() {
    let journal = new_journal();
    let settings = Settings { vsync: 1, fps: 1, ..Settings::default() };
    let mut session = session(FakeEgl::new(&journal), FakePlatform::new(&journal), settings);
    session.open(size()).unwrap();
    journal.borrow_mut().clear();

    session.swap_buffers().unwrap();
    session.swap_buffers().unwrap();
    assert_eq!(journal_entries(&journal), [
        "platform.wait_for_vsync",
        "swap_buffers",
        "platform.present",
        "platform.wait_for_vsync",
        "swap_buffers",
        "platform.present",
    ]);
}

#[test]
fn test_failed_present_keeps_session_open() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::failing(&journal, "platform.present"),
                              Settings::default());
    session.open(size()).unwrap();
    assert_eq!(session.swap_buffers(), Err(Error::PageFlipFailed));
    assert!(session.is_open());
}

#[test]
fn test_init_drm_unsupported_by_default() {
    let journal = new_journal();
    let mut session = session(FakeEgl::new(&journal),
                              FakePlatform::new(&journal),
                              Settings::default());
    assert_eq!(session.init_drm(), Err(Error::UnsupportedOnThisPlatform));
}

#[test]
fn test_session_asks_for_platform_config_count() {
    let journal = new_journal();
    let mut platform = FakePlatform::new(&journal);
    platform.max_configs = 10;
    platform.native_visual_id = Some(3);
    let mut session = session(FakeEgl::new(&journal), platform, Settings::default());
    session.open(size()).unwrap();
    assert_eq!(session.egl().max_configs_requested.get(), 10);
    assert_eq!(session.egl_config(), Some(handle(FIRST_CONFIG + 2)));
}

#[test]
fn test_boxed_platform_session() {
    let journal = new_journal();
    let platform: Box<dyn NativePlatform> = Box::new(FakePlatform::new(&journal));
    let mut session = Session::new(FakeEgl::new(&journal), platform)
        .with_settings(Settings::default());
    session.open(size()).unwrap();
    session.close();
    assert_eq!(journal.borrow().last().map(String::as_str), Some("platform.close"));
}

#[test]
fn test_choose_config_first_match() {
    let journal = new_journal();
    let egl = FakeEgl::new(&journal);
    let attributes = ConfigAttributes::from_settings(&Settings::default(), GLVersion::default())
        .unwrap();
    let config = config::choose_config(&egl, handle(1), &attributes, 5, None).unwrap();
    assert_eq!(config, handle(FIRST_CONFIG));
    assert_eq!(egl.max_configs_requested.get(), 5);
}

#[test]
fn test_choose_config_promotes_native_visual() {
    let journal = new_journal();
    let egl = FakeEgl::new(&journal);
    let attributes = ConfigAttributes::new();
    let config = config::choose_config(&egl, handle(1), &attributes, 10, Some(2)).unwrap();
    assert_eq!(config, handle(FIRST_CONFIG + 1));

    // Without a match the first config is kept.
    let config = config::choose_config(&egl, handle(1), &attributes, 10, Some(99)).unwrap();
    assert_eq!(config, handle(FIRST_CONFIG));
}

#[test]
fn test_choose_config_without_matches() {
    let journal = new_journal();
    let mut egl = FakeEgl::new(&journal);
    egl.visual_ids.clear();
    let attributes = ConfigAttributes::new();
    assert_eq!(config::choose_config(&egl, handle(1), &attributes, 5, None),
               Err(Error::NoPixelFormatFound));
}

#[test]
fn test_config_attributes_from_settings() {
    let attributes = ConfigAttributes::from_settings(&Settings::default(), GLVersion::default())
        .unwrap();
    let slice = attributes.as_slice();
    assert_eq!(slice.len(), CONFIG_ATTRIBUTE_CAPACITY);
    assert_eq!(slice.last(), Some(&(egl::NONE as EGLint)));
    assert_eq!(attributes.pair_count(), 11);

    let get = |attribute: EGLenum| attributes.get(attribute as EGLint);
    assert_eq!(get(egl::RED_SIZE), Some(5));
    assert_eq!(get(egl::GREEN_SIZE), Some(6));
    assert_eq!(get(egl::BLUE_SIZE), Some(5));
    assert_eq!(get(egl::ALPHA_SIZE), Some(0));
    assert_eq!(get(egl::DEPTH_SIZE), Some(16));
    assert_eq!(get(egl::BUFFER_SIZE), Some(16));
    assert_eq!(get(egl::STENCIL_SIZE), Some(0));
    assert_eq!(get(egl::SURFACE_TYPE), Some(egl::WINDOW_BIT as EGLint));
    assert_eq!(get(egl::RENDERABLE_TYPE), Some(RenderableType::OPENGL_ES.bits()));
    assert_eq!(get(egl::SAMPLE_BUFFERS), Some(0));
    assert_eq!(get(egl::SAMPLES), Some(0));
    assert_eq!(get(egl::NATIVE_VISUAL_ID), None);
}

#[test]
fn test_config_attributes_request_multisampling() {
    let settings = Settings { fsaa: 4, ..Settings::default() };
    let attributes = ConfigAttributes::from_settings(&settings, GLVersion::new(2, 0)).unwrap();
    assert_eq!(attributes.get(egl::SAMPLE_BUFFERS as EGLint), Some(1));
    assert_eq!(attributes.get(egl::SAMPLES as EGLint), Some(4));
    assert_eq!(attributes.get(egl::RENDERABLE_TYPE as EGLint),
               Some(RenderableType::OPENGL_ES2.bits()));
}

#[test]
fn test_config_attributes_capacity() {
    let mut attributes = ConfigAttributes::new();
    assert_eq!(attributes.as_slice(), [egl::NONE as EGLint]);
    for index in 0..11 {
        attributes.push(egl::RED_SIZE as EGLint, index).unwrap();
    }
    assert_eq!(attributes.push(egl::GREEN_SIZE as EGLint, 8), Err(Error::Failed));
    assert_eq!(attributes.pair_count(), 11);
    assert_eq!(attributes.as_slice().len(), CONFIG_ATTRIBUTE_CAPACITY);
    assert_eq!(attributes.as_slice().last(), Some(&(egl::NONE as EGLint)));
}

#[test]
fn test_context_attributes() {
    assert_eq!(config::context_attributes(GLVersion::new(1, 1)), [egl::NONE as EGLint]);
    assert_eq!(config::context_attributes(GLVersion::new(2, 0)),
               [egl::CONTEXT_CLIENT_VERSION as EGLint, 2, egl::NONE as EGLint]);
    assert_eq!(config::context_attributes(GLVersion::new(3, 1)),
               [egl::CONTEXT_CLIENT_VERSION as EGLint, 3, egl::NONE as EGLint]);
}

#[test]
fn test_renderable_type_for_version() {
    assert_eq!(GLVersion::new(1, 0).renderable_type(), RenderableType::OPENGL_ES);
    assert_eq!(GLVersion::new(2, 0).renderable_type(), RenderableType::OPENGL_ES2);
    assert_eq!(GLVersion::new(3, 2).renderable_type(), RenderableType::OPENGL_ES3);
    assert_eq!(GLVersion::default(), GLVersion::new(1, 1));
}

#[test]
fn test_settings_defaults() {
    let settings = Settings::default();
    assert_eq!((settings.mode, settings.vsync, settings.fsaa, settings.fps), (0, 0, 0, 0));
    assert_eq!((settings.red_size, settings.green_size, settings.blue_size), (5, 6, 5));
    assert_eq!(settings.alpha_size, 0);
    assert_eq!(settings.depth_size, 16);
    assert_eq!(settings.buffer_size, 16);
    assert_eq!(settings.stencil_size, 0);
    assert_eq!(Settings::parse(""), settings);
}

#[test]
fn test_settings_parse_vsync() {
    let settings = Settings::parse("use_vsync=1\n");
    assert_eq!(settings.vsync, 1);
    assert_eq!(settings, Settings { vsync: 1, ..Settings::default() });
}

#[test]
fn test_settings_parse_all_keys() {
    let text = "egl_mode=1\nuse_vsync=1\nuse_fsaa=4\nshow_fps=1\nsize_red=8\nsize_green=8\n\
                size_blue=8\nsize_alpha=8\nsize_depth=24\nsize_buffer=32\nsize_stencil=8\n";
    let settings = Settings::parse(text);
    assert_eq!(settings, Settings {
        mode: 1,
        vsync: 1,
        fsaa: 4,
        fps: 1,
        red_size: 8,
        green_size: 8,
        blue_size: 8,
        alpha_size: 8,
        depth_size: 24,
        buffer_size: 32,
        stencil_size: 8,
    });

    // Order doesn't matter.
    let reversed: Vec<&str> = text.lines().rev().collect();
    assert_eq!(Settings::parse(&reversed.join("\n")), settings);
}

#[test]
fn test_settings_parse_malformed() {
    let settings = Settings::parse("use_vsync=yes\nsize_depth=\nnonsense\n=1\n");
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_parse_edge_cases() {
    let settings = Settings::parse("size_depth=24\nsize_depth=8\n");
    assert_eq!(settings.depth_size, 8);

    let settings = Settings::parse("  # size_red=8 bits\nsize_green= 7\nuse_fsaa=-2\n");
    assert_eq!((settings.red_size, settings.green_size, settings.fsaa), (8, 7, -2));

    // The first key in table order wins on a line with several.
    let settings = Settings::parse("use_vsync=1 egl_mode=1\n");
    assert_eq!((settings.mode, settings.vsync), (1, 0));

    let mut settings = Settings::default();
    assert!(settings.apply_line("show_fps=1"));
    assert!(!settings.apply_line("show_fps=on"));
    assert!(!settings.apply_line("unknown=3"));
    assert_eq!(settings.fps, 1);
}

#[test]
fn test_render_mode() {
    assert_eq!(RenderMode::from_setting(0), Ok(RenderMode::Raw));
    assert_eq!(RenderMode::from_setting(1), Ok(RenderMode::Toolkit));
    assert_eq!(RenderMode::from_setting(2), Err(Error::UnknownRenderMode(2)));
}

#[test]
fn test_settings_load_missing_file() {
    let path = env::temp_dir().join(format!("eglport-missing-{}.cfg", process::id()));
    assert_eq!(Settings::load(&path), Settings::default());
}

#[test]
fn test_session_reloads_settings_file_on_open() {
    let path = env::temp_dir().join(format!("eglport-reload-{}.cfg", process::id()));
    fs::write(&path, "use_vsync=1\n").unwrap();

    let journal = new_journal();
    let mut session = Session::new(FakeEgl::new(&journal), FakePlatform::new(&journal))
        .with_settings_file(&path);
    session.open(size()).unwrap();
    assert_eq!(session.settings().vsync, 1);
    session.close();

    fs::write(&path, "show_fps=1\n").unwrap();
    session.open(size()).unwrap();
    assert_eq!(session.settings().vsync, 0);
    assert_eq!(session.settings().fps, 1);
    session.close();

    fs::remove_file(&path).unwrap();
}

#[test]
#[serial]
fn test_session_reads_default_settings_file() {
    let directory = env::temp_dir().join(format!("eglport-cwd-{}", process::id()));
    fs::create_dir_all(&directory).unwrap();
    fs::write(directory.join("eglport.cfg"), "size_stencil=8\n").unwrap();

    let previous_directory = env::current_dir().unwrap();
    env::set_current_dir(&directory).unwrap();

    let journal = new_journal();
    let mut session = Session::new(FakeEgl::new(&journal), FakePlatform::new(&journal));
    let result = session.open(size());
    let stencil_size = session.settings().stencil_size;
    drop(session);

    env::set_current_dir(previous_directory).unwrap();
    fs::remove_dir_all(&directory).unwrap();

    result.unwrap();
    assert_eq!(stencil_size, 8);
}

#[test]
fn test_select_platform() {
    #[cfg(toolkit)]
    let select = |settings: &Settings| platform::select(settings, None);
    #[cfg(not(toolkit))]
    let select = |settings: &Settings| platform::select(settings);

    assert!(select(&Settings::default()).is_ok());
    assert_eq!(select(&Settings { mode: 7, ..Settings::default() }).err(),
               Some(Error::UnknownRenderMode(7)));

    #[cfg(toolkit)]
    assert_eq!(select(&Settings { mode: 1, ..Settings::default() }).err(),
               Some(Error::NoWidgetAttached));
}

#[test]
fn test_framebuffer_without_vsync_device() {
    let mut framebuffer = Framebuffer::with_vsync_device("/nonexistent/eglport/fb0");
    framebuffer.open(&Settings { vsync: 1, ..Settings::default() }).unwrap();
    assert!(!framebuffer.waits_for_vsync());
    framebuffer.wait_for_vsync();
    assert!(framebuffer.native_window(size(), &Settings::default()).unwrap().is_null());
    assert_eq!(framebuffer.native_display(&Settings::default()).unwrap(),
               egl::DEFAULT_DISPLAY as EGLNativeDisplayType);
    framebuffer.close();
}

#[test]
fn test_framebuffer_vsync_follows_session_settings() {
    let device_path = env::temp_dir().join(format!("eglport-fb-{}", process::id()));
    let settings_path = env::temp_dir().join(format!("eglport-fb-{}.cfg", process::id()));
    fs::write(&device_path, "").unwrap();
    fs::write(&settings_path, "use_vsync=1\n").unwrap();

    let journal = new_journal();
    let mut session = Session::new(FakeEgl::new(&journal),
                                   Framebuffer::with_vsync_device(&device_path))
        .with_settings_file(&settings_path);
    assert!(!session.platform().waits_for_vsync());

    session.open(size()).unwrap();
    assert!(session.platform().waits_for_vsync());
    session.swap_buffers().unwrap();
    session.close();
    assert!(!session.platform().waits_for_vsync());

    fs::write(&settings_path, "use_vsync=0\n").unwrap();
    session.open(size()).unwrap();
    assert!(!session.platform().waits_for_vsync());
    session.close();

    fs::remove_file(&settings_path).unwrap();
    fs::remove_file(&device_path).unwrap();
}

#[test]
fn test_framebuffer_skips_vsync_device_without_vsync() {
    let mut framebuffer = Framebuffer::new();
    framebuffer.open(&Settings::default()).unwrap();
    assert!(!framebuffer.waits_for_vsync());
    framebuffer.close();
}

#[test]
fn test_heap_window() {
    let mut window = HeapWindow::new();
    let settings = Settings::default();
    let first = window.native_window(size(), &settings).unwrap();
    assert!(!first.is_null());
    assert_eq!(window.native_window(size(), &settings).unwrap(), first);
    window.free_window();
    window.free_window();
    assert!(!window.native_window(size(), &settings).unwrap().is_null());
}

#[cfg(toolkit)]
mod toolkit {
    use crate::platform::NativePlatform;
    use crate::{Error, Settings, ToolkitWindow};

    use euclid::default::Size2D;
    use rwh_06::{RawDisplayHandle, RawWindowHandle, WaylandWindowHandle, XlibDisplayHandle};
    use rwh_06::XlibWindowHandle;
    use std::ptr::NonNull;

    fn display_handle(display: Option<NonNull<std::os::raw::c_void>>) -> RawDisplayHandle {
        RawDisplayHandle::Xlib(XlibDisplayHandle::new(display, 0))
    }

    #[test]
    fn test_toolkit_window_from_xlib_handles() {
        let display = NonNull::dangling();
        let mut window = unsafe {
            ToolkitWindow::from_raw_handles(display_handle(Some(display)),
                                            RawWindowHandle::Xlib(XlibWindowHandle::new(42)))
        }.unwrap();
        let settings = Settings::default();
        assert_eq!(window.native_display(&settings).unwrap(),
                   display.as_ptr() as *const std::os::raw::c_void);
        assert_eq!(window.native_window(Size2D::new(1, 1), &settings).unwrap() as usize, 42);
    }

    #[test]
    fn test_toolkit_window_rejects_bad_handles() {
        let xlib_window = RawWindowHandle::Xlib(XlibWindowHandle::new(42));
        let result = unsafe { ToolkitWindow::from_raw_handles(display_handle(None), xlib_window) };
        assert_eq!(result.err(), Some(Error::NativeDisplayUnavailable));

        let display = display_handle(Some(NonNull::dangling()));
        let null_window = RawWindowHandle::Xlib(XlibWindowHandle::new(0));
        let result = unsafe { ToolkitWindow::from_raw_handles(display, null_window) };
        assert_eq!(result.err(), Some(Error::NativeWindowUnavailable));

        let wayland_window = WaylandWindowHandle::new(NonNull::dangling());
        let result = unsafe {
            ToolkitWindow::from_raw_handles(display, RawWindowHandle::Wayland(wayland_window))
        };
        assert_eq!(result.err(), Some(Error::IncompatibleNativeWidget));
    }
}

#[test]
fn test_buffer_depths_from_config() {
    assert_eq!(BufferDepths::from_config(16, 16, 0),
               BufferDepths { color_bits: 5, depth_bits: 16, stencil_bits: 0 });
    assert_eq!(BufferDepths::from_config(32, 24, 8),
               BufferDepths { color_bits: 8, depth_bits: 24, stencil_bits: 8 });
    assert_eq!(BufferDepths::default(),
               BufferDepths { color_bits: 0, depth_bits: 0, stencil_bits: 0 });
}

#[test]
fn test_buffer_format_normalization() {
    let format = BufferFormat::requested(0, 0, 8, 4);
    assert_eq!((format.color_bits, format.depth_bits, format.stencil_bits), (24, 24, 8));
    assert_eq!(format.samples, 4);
    assert_eq!(BufferFormat::requested(32, 16, 0, 0).color_bits, 24);
    assert_eq!(BufferFormat::requested(16, 16, 0, 0).color_bits, 16);
    assert_eq!(format.channel_bits(), 8);
    assert_eq!(channel_bits(16), 4);
}

#[test]
fn test_format_ladder() {
    let ladder = FormatLadder::new(BufferFormat::requested(24, 24, 8, 0));
    assert_eq!(ladder.len(), FORMAT_LADDER_STEPS);

    let steps: Vec<(i32, i32, i32)> = ladder.map(|format| {
        (format.color_bits, format.depth_bits, format.stencil_bits)
    }).collect();
    assert_eq!(steps.len(), 16);
    assert_eq!(&steps[..8], &[
        (24, 24, 8),
        (24, 24, 0),
        (24, 16, 8),
        (16, 24, 8),
        (24, 16, 8),
        (24, 16, 0),
        (24, 8, 8),
        (16, 16, 8),
    ]);
    assert_eq!(steps[8], (16, 16, 8));
    assert_eq!(steps[15], (16, 16, 8));
}

#[test]
fn test_format_ladder_lowers_stencil_with_depth() {
    let steps: Vec<BufferFormat> = FormatLadder::new(BufferFormat::requested(24, 24, 24, 0))
        .collect();
    assert_eq!(steps[1].stencil_bits, 16);
    assert_eq!((steps[4].depth_bits, steps[4].stencil_bits), (16, 16));
    assert_eq!(steps[5].stencil_bits, 8);
    assert_eq!((steps[12].depth_bits, steps[12].stencil_bits), (16, 8));
    assert_eq!(steps[13].stencil_bits, 0);
}

#[test]
fn test_display_aspect() {
    assert_eq!(modes::display_aspect(Size2D::new(800, 400)), Some(2.0));
    assert_eq!(modes::display_aspect(Size2D::new(800, 0)), None);
}

#[test]
fn test_sort_modes() {
    let mut list = vec![
        Size2D::new(1280, 720),
        Size2D::new(800, 600),
        Size2D::new(1920, 1080),
        Size2D::new(640, 480),
        Size2D::new(1366, 768),
    ];
    modes::sort_modes(&mut list, 16.0 / 9.0);
    let sorted: Vec<(i32, i32)> = list.iter().map(|mode| (mode.width, mode.height)).collect();
    assert_eq!(sorted, [(1280, 720), (1366, 768), (1920, 1080), (640, 480), (800, 600)]);
}

#[test]
fn test_sort_modes_with_near_equal_aspects() {
    let mut list = Vec::new();
    for height in (400..800).step_by(3) {
        for extra in 0..3 {
            list.push(Size2D::new(height + extra, height));
        }
    }
    // Scramble deterministically so the input isn't already ordered.
    let count = list.len();
    let mut scrambled: Vec<Size2D<i32>> = (0..count).map(|i| list[(i * 37) % count]).collect();
    modes::sort_modes(&mut scrambled, 1.0);

    assert_eq!(scrambled.len(), count);
    let aspect_diff = |mode: &Size2D<i32>| (mode.width as f32 / mode.height as f32 - 1.0).abs();
    for pair in scrambled.windows(2) {
        assert!(aspect_diff(&pair[0]) - aspect_diff(&pair[1]) < 0.001);
    }
    assert_eq!(scrambled[0], Size2D::new(400, 400));
}

#[test]
fn test_available_modes() {
    let list = [Size2D::new(640, 480), Size2D::new(800, 600), Size2D::new(1024, 768)];
    assert_eq!(modes::available_modes(&list, 1024), "640x480 800x600 1024x768");
    assert_eq!(modes::available_modes(&list, 17), "640x480 800x600");
    assert_eq!(modes::available_modes(&list, 16), "640x480");
    assert_eq!(modes::available_modes(&list, 9), "640x480");
    assert_eq!(modes::available_modes(&list, 8), "");
    assert_eq!(modes::available_modes(&[], 16), "");
}

#[test]
fn test_preferred_or_largest_mode() {
    let candidates = vec![
        (Size2D::new(640, 480), false),
        (Size2D::new(1920, 1080), false),
        (Size2D::new(1280, 720), true),
    ];
    assert_eq!(modes::preferred_or_largest(candidates.clone()), Some(2));
    assert_eq!(modes::preferred_or_largest(candidates[..2].iter().cloned()), Some(1));
    assert_eq!(modes::preferred_or_largest(vec![(Size2D::new(0, 0), false)]), None);
    assert_eq!(modes::preferred_or_largest(Vec::new()), None);
}

#[test]
fn test_mode_fallback() {
    let request = ModeRequest { mode: 5, fullscreen: true, noborder: true };
    let mut attempts = vec![];
    let result: Result<(), Error> = modes::start_with_fallback(request, 3, |step| {
        attempts.push(step);
        Err(Error::Failed)
    });
    assert_eq!(result, Err(Error::NoUsableMode));
    assert_eq!(attempts, [
        request,
        ModeRequest { mode: 5, fullscreen: true, noborder: false },
        ModeRequest { mode: 3, fullscreen: false, noborder: false },
    ]);

    // The fallback isn't retried when it is the mode that failed.
    let request = ModeRequest { mode: 3, fullscreen: false, noborder: false };
    let mut count = 0;
    let result: Result<(), Error> = modes::start_with_fallback(request, 3, |_| {
        count += 1;
        Err(Error::Failed)
    });
    assert_eq!(result, Err(Error::NoUsableMode));
    assert_eq!(count, 2);

    let result = modes::start_with_fallback(request, 3, |step| Ok(step.mode));
    assert_eq!(result, Ok(3));
}

#[test]
fn test_frame_counter() {
    let start = Instant::now();
    let mut counter = FrameCounter::starting_at(start);
    assert_eq!(counter.frame(start + Duration::from_millis(100)), None);
    assert_eq!(counter.frame(start + Duration::from_millis(500)), None);
    assert_eq!(counter.frame(start + Duration::from_millis(1000)), Some(3));
    assert_eq!(counter.frame(start + Duration::from_millis(1500)), None);
    assert_eq!(counter.frame(start + Duration::from_millis(2100)), Some(2));
}

#[test]
fn test_has_extension() {
    let extensions = "GL_OES_depth24 GL_OES_depth24_stencil8  GL_EXT_texture";
    assert!(has_extension(extensions, "GL_OES_depth24"));
    assert!(has_extension(extensions, "GL_EXT_texture"));
    assert!(!has_extension(extensions, "GL_OES_depth"));
    assert!(!has_extension(extensions, ""));
    assert!(!has_extension("", "GL_OES_depth24"));
}

#[test]
fn test_egl_error_translation() {
    assert_eq!((egl::BAD_MATCH as EGLint).to_windowing_api_error(), WindowingApiError::BadMatch);
    assert_eq!((egl::CONTEXT_LOST as EGLint).to_windowing_api_error(),
               WindowingApiError::ContextLost);
    assert_eq!((0x1234 as EGLint).to_windowing_api_error(), WindowingApiError::Failed);
    assert_eq!(WindowingApiError::BadNativeWindow.name(), "EGL_BAD_NATIVE_WINDOW");
    assert!(!WindowingApiError::BadAlloc.description().is_empty());
}

#[test]
fn test_check_errors() {
    let journal = new_journal();
    let egl = FakeEgl::new(&journal);
    assert!(!check_errors(&egl, "test"));
    egl.pending_error.set(Some(WindowingApiError::BadConfig));
    assert!(check_errors(&egl, "test"));
    assert!(!check_errors(&egl, "test"));
}
