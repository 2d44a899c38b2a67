// eglport/src/platform/kms/framebuffer.rs
//
//! DRM framebuffers cached on the GBM buffer objects they scan out.

use super::device::Card;
use crate::Error;

use drm::control::{framebuffer, Device as ControlDevice, FbCmd2Flags};
use gbm::{BufferObject, Modifier};

/// A DRM framebuffer wrapping a buffer object. Stored as the buffer object's user data, so it is
/// removed when GBM destroys the buffer object.
pub(crate) struct DrmFramebuffer {
    handle: framebuffer::Handle,
    card: Card,
}

impl Drop for DrmFramebuffer {
    fn drop(&mut self) {
        if let Err(err) = self.card.destroy_framebuffer(self.handle) {
            warn!("Unable to remove DRM framebuffer {:?}: {}", self.handle, err);
        }
    }
}

/// Returns the framebuffer for `buffer_object`, creating and caching one on first use.
pub(crate) fn framebuffer_for(card: &Card, buffer_object: &mut BufferObject<DrmFramebuffer>)
                              -> Result<framebuffer::Handle, Error> {
    if let Some(framebuffer) = buffer_object.userdata() {
        return Ok(framebuffer.handle);
    }

    let flags = if buffer_object.modifier() != Modifier::Invalid {
        FbCmd2Flags::MODIFIERS
    } else {
        FbCmd2Flags::empty()
    };
    let handle = match card.add_planar_framebuffer(&*buffer_object, flags) {
        Ok(handle) => handle,
        Err(err) => {
            error!("Failed to create DRM framebuffer: {}", err);
            return Err(Error::FramebufferCreationFailed);
        }
    };

    buffer_object.set_userdata(DrmFramebuffer { handle, card: card.clone() });
    Ok(handle)
}
