// eglport/src/platform/kms/mod.rs
//
//! Scanout through kernel mode setting, rendering into a GBM surface.

use self::device::{Card, Pipeline};
use self::framebuffer::DrmFramebuffer;
use super::generic::egl::ffi::EGL_PLATFORM_GBM_KHR;
use super::NativePlatform;
use crate::egl::types::{EGLDisplay, EGLNativeWindowType, EGLSurface, EGLint};
use crate::{EglBackend, Error, Settings};

use drm::control::{Device as ControlDevice, Event, PageFlipFlags};
use drm::Device as BasicDevice;
use euclid::default::Size2D;
use gbm::{AsRaw, BufferObject, BufferObjectFlags, Format, Modifier, Surface};
use std::iter;
use std::os::raw::c_void;

mod device;
mod framebuffer;

/// Number of configs requested from EGL when looking for one matching the GBM format.
pub const KMS_MAX_CONFIGS: usize = 10;

/// Pixel format of the scanout surface.
pub const SCANOUT_FORMAT: Format = Format::Rgb565;

/// A DRM/KMS display driven through a GBM surface.
///
/// The device, connector, mode and CRTC are found on the first call to `init_drm`, or lazily when
/// a session opens. The GBM surface is created for each session and released when its window is
/// freed.
pub struct Kms {
    // Declared so that buffers drop before the surface, and the surface before the device.
    front_buffer: Option<BufferObject<DrmFramebuffer>>,
    surface: Option<Surface<DrmFramebuffer>>,
    gbm: Option<gbm::Device<Card>>,
    card: Option<Card>,
    pipeline: Option<Pipeline>,
    master: bool,
}

impl Kms {
    #[inline]
    pub fn new() -> Kms {
        Kms {
            front_buffer: None,
            surface: None,
            gbm: None,
            card: None,
            pipeline: None,
            master: false,
        }
    }

    fn ensure_drm(&mut self) -> Result<Pipeline, Error> {
        if let Some(pipeline) = self.pipeline {
            return Ok(pipeline);
        }

        let (card, resources) = device::open_card()?;
        let pipeline = device::find_pipeline(&card, &resources)?;
        let gbm = match gbm::Device::new(card.clone()) {
            Ok(gbm) => gbm,
            Err(err) => {
                error!("Failed to create GBM device: {}", err);
                return Err(Error::DeviceOpenFailed);
            }
        };

        self.gbm = Some(gbm);
        self.card = Some(card);
        self.pipeline = Some(pipeline);
        Ok(pipeline)
    }

    fn ensure_surface(&mut self, pipeline: &Pipeline) -> Result<&Surface<DrmFramebuffer>, Error> {
        let gbm = self.gbm.as_ref().ok_or(Error::DeviceOpenFailed)?;
        if self.surface.is_none() {
            self.surface = Some(create_surface(gbm, pipeline.size())?);
        }
        self.surface.as_ref().ok_or(Error::BufferAllocationFailed)
    }

    fn lock_front_buffer(&self) -> Result<BufferObject<DrmFramebuffer>, Error> {
        let surface = self.surface.as_ref().ok_or(Error::NotOpen)?;
        // Called once after every eglSwapBuffers.
        unsafe {
            surface.lock_front_buffer().map_err(|err| {
                error!("Failed to lock the GBM front buffer: {}", err);
                Error::BufferAllocationFailed
            })
        }
    }

    fn card(&self) -> Result<&Card, Error> {
        self.card.as_ref().ok_or(Error::NotOpen)
    }
}

impl Default for Kms {
    fn default() -> Kms {
        Kms::new()
    }
}

// Modifier-aware creation is tried first; drivers without modifier support only take the
// linear layout through the plain call.
fn create_surface(gbm: &gbm::Device<Card>, size: Size2D<i32>)
                  -> Result<Surface<DrmFramebuffer>, Error> {
    let (width, height) = (size.width as u32, size.height as u32);
    match gbm.create_surface_with_modifiers::<DrmFramebuffer>(width,
                                                              height,
                                                              SCANOUT_FORMAT,
                                                              iter::once(Modifier::Linear)) {
        Ok(surface) => return Ok(surface),
        Err(err) => debug!("GBM surface with modifiers unavailable ({}); retrying", err),
    }
    gbm.create_surface::<DrmFramebuffer>(width,
                                         height,
                                         SCANOUT_FORMAT,
                                         BufferObjectFlags::SCANOUT | BufferObjectFlags::RENDERING)
       .map_err(|err| {
           error!("Failed to create GBM surface: {}", err);
           Error::BufferAllocationFailed
       })
}

impl NativePlatform for Kms {
    fn egl_display(&mut self, egl: &dyn EglBackend, _: &Settings) -> Result<EGLDisplay, Error> {
        self.ensure_drm()?;
        let gbm = self.gbm.as_ref().ok_or(Error::DeviceOpenFailed)?;
        egl.get_platform_display(EGL_PLATFORM_GBM_KHR, gbm.as_raw() as *mut c_void)
    }

    fn native_window(&mut self, _: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        let pipeline = self.ensure_drm()?;
        let surface = self.ensure_surface(&pipeline)?;
        Ok(surface.as_raw() as EGLNativeWindowType)
    }

    fn max_configs(&self) -> usize {
        KMS_MAX_CONFIGS
    }

    fn native_visual_id(&self) -> Option<EGLint> {
        Some(SCANOUT_FORMAT as u32 as EGLint)
    }

    fn finish_open(&mut self,
                   egl: &dyn EglBackend,
                   egl_display: EGLDisplay,
                   egl_surface: EGLSurface)
                   -> Result<(), Error> {
        let pipeline = self.pipeline.ok_or(Error::NotOpen)?;

        egl.swap_buffers(egl_display, egl_surface)?;
        let mut buffer_object = self.lock_front_buffer()?;
        let card = self.card()?.clone();
        let framebuffer = framebuffer::framebuffer_for(&card, &mut buffer_object)?;

        match card.acquire_master_lock() {
            Ok(()) => self.master = true,
            Err(err) => warn!("Unable to become DRM master: {}", err),
        }
        if let Err(err) = card.set_crtc(pipeline.crtc,
                                        Some(framebuffer),
                                        (0, 0),
                                        &[pipeline.connector],
                                        Some(pipeline.mode)) {
            error!("Failed to set mode: {}", err);
            return Err(Error::ModeSetFailed);
        }

        self.front_buffer = Some(buffer_object);
        Ok(())
    }

    fn present(&mut self, _: &dyn EglBackend) -> Result<(), Error> {
        let pipeline = self.pipeline.ok_or(Error::NotOpen)?;

        let mut next_buffer_object = self.lock_front_buffer()?;
        let card = self.card()?;
        let framebuffer = framebuffer::framebuffer_for(card, &mut next_buffer_object)?;

        if let Err(err) = card.page_flip(pipeline.crtc, framebuffer, PageFlipFlags::EVENT, None) {
            error!("Failed to queue page flip: {}", err);
            return Err(Error::PageFlipFailed);
        }
        wait_for_page_flip(card, &pipeline)?;

        // Hands the previously displayed buffer back to the surface.
        self.front_buffer = Some(next_buffer_object);
        Ok(())
    }

    fn free_window(&mut self) {
        self.front_buffer = None;
        self.surface = None;
    }

    fn close(&mut self) {
        if !self.master {
            return;
        }
        if let Some(ref card) = self.card {
            if let Err(err) = card.release_master_lock() {
                warn!("Unable to drop DRM master: {}", err);
            }
        }
        self.master = false;
    }

    fn init_drm(&mut self) -> Result<Size2D<i32>, Error> {
        if let Some(pipeline) = self.pipeline {
            info!("DRM already initialized");
            return Ok(pipeline.size());
        }
        let pipeline = self.ensure_drm()?;
        self.ensure_surface(&pipeline)?;
        Ok(pipeline.size())
    }
}

fn wait_for_page_flip(card: &Card, pipeline: &Pipeline) -> Result<(), Error> {
    loop {
        let events = card.receive_events().map_err(|err| {
            error!("Failed to read DRM events: {}", err);
            Error::PageFlipFailed
        })?;
        for event in events {
            if let Event::PageFlip(event) = event {
                if event.crtc == pipeline.crtc {
                    return Ok(());
                }
            }
        }
    }
}
