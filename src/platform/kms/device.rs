// eglport/src/platform/kms/device.rs
//
//! Finding a DRM device and a connector, mode and CRTC to drive it with.

use crate::modes;
use crate::Error;

use drm::control::{connector, crtc, Device as ControlDevice, Mode, ModeTypeFlags};
use drm::control::ResourceHandles;
use euclid::default::Size2D;
use std::fs::{self, File, OpenOptions};
use std::os::unix::io::{AsFd, BorrowedFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DRI_DIRECTORY: &str = "/dev/dri";

/// An open DRM primary node.
///
/// Clones share the file, so framebuffers cached on buffer objects can outlive the device that
/// created them.
#[derive(Clone, Debug)]
pub(crate) struct Card(Arc<File>);

impl AsFd for Card {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.0.as_fd()
    }
}

impl drm::Device for Card {}
impl ControlDevice for Card {}

impl Card {
    fn open(path: &Path) -> Option<Card> {
        match OpenOptions::new().read(true).write(true).open(path) {
            Ok(file) => Some(Card(Arc::new(file))),
            Err(err) => {
                debug!("Unable to open {}: {}", path.display(), err);
                None
            }
        }
    }
}

/// The connector, mode and CRTC a session scans out through.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pipeline {
    pub(crate) connector: connector::Handle,
    pub(crate) crtc: crtc::Handle,
    pub(crate) mode: Mode,
}

impl Pipeline {
    pub(crate) fn size(&self) -> Size2D<i32> {
        let (width, height) = self.mode.size();
        Size2D::new(width as i32, height as i32)
    }
}

/// Opens the first DRM primary node that has mode setting resources.
pub(crate) fn open_card() -> Result<(Card, ResourceHandles), Error> {
    let mut paths: Vec<PathBuf> = match fs::read_dir(DRI_DIRECTORY) {
        Ok(entries) => entries.filter_map(|entry| entry.ok())
                              .map(|entry| entry.path())
                              .filter(|path| is_primary_node(path))
                              .collect(),
        Err(err) => {
            error!("Unable to list {}: {}", DRI_DIRECTORY, err);
            return Err(Error::DeviceOpenFailed);
        }
    };
    paths.sort();

    for path in paths {
        let card = match Card::open(&path) {
            None => continue,
            Some(card) => card,
        };
        // Render-only devices have no mode setting resources.
        match card.resource_handles() {
            Ok(resources) => {
                info!("Using DRM device {}", path.display());
                return Ok((card, resources));
            }
            Err(err) => debug!("{} has no mode setting resources: {}", path.display(), err),
        }
    }

    error!("No DRM device found");
    Err(Error::DeviceOpenFailed)
}

fn is_primary_node(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.starts_with("card"))
}

/// Picks the first connected connector, its preferred or largest mode, and a CRTC for it.
pub(crate) fn find_pipeline(card: &Card, resources: &ResourceHandles)
                            -> Result<Pipeline, Error> {
    let connector = resources.connectors()
                             .iter()
                             .filter_map(|&handle| card.get_connector(handle, true).ok())
                             .find(|info| info.state() == connector::State::Connected);
    let connector = match connector {
        Some(connector) => connector,
        None => {
            error!("No connected connector");
            return Err(Error::NoConnectedConnector);
        }
    };

    let modes = connector.modes();
    let candidates = modes.iter().map(|mode| {
        let (width, height) = mode.size();
        (Size2D::new(width as i32, height as i32),
         mode.mode_type().contains(ModeTypeFlags::PREFERRED))
    });
    let mode = match modes::preferred_or_largest(candidates) {
        Some(index) => modes[index],
        None => {
            error!("Could not find a mode for connector {:?}", connector.handle());
            return Err(Error::NoDisplayModeFound);
        }
    };

    let crtc = match find_crtc(card, resources, &connector) {
        Some(crtc) => crtc,
        None => {
            error!("No CRTC found for connector {:?}", connector.handle());
            return Err(Error::NoCrtcFound);
        }
    };

    let (width, height) = mode.size();
    info!("DRM mode {}x{} on connector {:?}, CRTC {:?}",
          width,
          height,
          connector.handle(),
          crtc);
    Ok(Pipeline { connector: connector.handle(), crtc, mode })
}

// The CRTC already driving the connector's encoder, or else the first CRTC any of its encoders
// can drive.
fn find_crtc(card: &Card, resources: &ResourceHandles, connector: &connector::Info)
             -> Option<crtc::Handle> {
    let current_crtc = connector.current_encoder()
                                .and_then(|handle| card.get_encoder(handle).ok())
                                .and_then(|encoder| encoder.crtc());
    if current_crtc.is_some() {
        return current_crtc;
    }

    connector.encoders().iter().filter_map(|&handle| card.get_encoder(handle).ok()).find_map(
        |encoder| resources.filter_crtcs(encoder.possible_crtcs()).first().copied())
}
