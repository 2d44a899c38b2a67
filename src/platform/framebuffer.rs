// eglport/src/platform/framebuffer.rs
//
//! Rendering straight to the framebuffer through the default EGL display.

use super::NativePlatform;
use crate::egl::types::EGLNativeWindowType;
use crate::{Error, Settings};

use euclid::default::Size2D;
use std::fs::File;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::ptr;

/// The framebuffer device waited on for vertical sync.
pub const DEFAULT_VSYNC_DEVICE: &str = "/dev/fb0";

// _IOW('F', 0x20, __u32)
const FBIO_WAITFORVSYNC: u32 = 0x4004_4620;

/// The raw framebuffer: the default EGL display and no native window.
///
/// When the session's settings ask for vsync, the vsync device is opened on `open` and waited
/// on before every swap. A device that can't be opened only disables the wait.
#[derive(Debug)]
pub struct Framebuffer {
    vsync_device_path: PathBuf,
    vsync_device: Option<File>,
}

impl Framebuffer {
    /// A framebuffer that waits on `/dev/fb0` for vertical sync.
    #[inline]
    pub fn new() -> Framebuffer {
        Framebuffer::with_vsync_device(DEFAULT_VSYNC_DEVICE)
    }

    /// A framebuffer that waits for vertical sync on the given framebuffer device.
    pub fn with_vsync_device<P>(path: P) -> Framebuffer where P: AsRef<Path> {
        Framebuffer { vsync_device_path: path.as_ref().to_owned(), vsync_device: None }
    }

    /// Whether the vsync device is open.
    #[inline]
    pub fn waits_for_vsync(&self) -> bool {
        self.vsync_device.is_some()
    }
}

impl Default for Framebuffer {
    fn default() -> Framebuffer {
        Framebuffer::new()
    }
}

impl NativePlatform for Framebuffer {
    fn open(&mut self, settings: &Settings) -> Result<(), Error> {
        self.vsync_device = None;
        if settings.vsync == 0 {
            return Ok(());
        }
        match File::open(&self.vsync_device_path) {
            Ok(device) => self.vsync_device = Some(device),
            Err(err) => {
                warn!("Unable to open {} for vsync ({})", self.vsync_device_path.display(), err)
            }
        }
        Ok(())
    }

    fn native_window(&mut self, _: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        Ok(ptr::null())
    }

    fn wait_for_vsync(&mut self) {
        if let Some(ref device) = self.vsync_device {
            let mut arg: u32 = 0;
            unsafe {
                let result = libc::ioctl(device.as_raw_fd(),
                                         FBIO_WAITFORVSYNC as _,
                                         &mut arg as *mut u32);
                if result < 0 {
                    debug!("FBIO_WAITFORVSYNC failed: {}", std::io::Error::last_os_error());
                }
            }
        }
    }

    fn close(&mut self) {
        self.vsync_device = None;
    }
}
