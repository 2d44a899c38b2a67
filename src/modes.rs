// eglport/src/modes.rs
//
//! Video mode ordering, listing, and the mode fallback ladder.

use crate::Error;

use euclid::default::Size2D;

/// The mode fallen back on when the requested mode can't be set (640×480).
pub const DEFAULT_FALLBACK_MODE: i32 = 3;
/// The fallback mode on the Pandora handheld (800×480).
pub const PANDORA_FALLBACK_MODE: i32 = 11;
/// The fallback mode on the GCW Zero handheld (320×240).
pub const GCW0_FALLBACK_MODE: i32 = 0;

/// Capacity of the available modes string handed to the engine.
pub const AVAILABLE_MODES_CAPACITY: usize = 1024;

const ASPECT_EPSILON: f32 = 0.001;

/// A mode-setting attempt.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeRequest {
    pub mode: i32,
    pub fullscreen: bool,
    pub noborder: bool,
}

/// Guesses the display aspect ratio from the desktop resolution.
pub fn display_aspect(desktop: Size2D<i32>) -> Option<f32> {
    if desktop.height <= 0 {
        return None;
    }
    Some(desktop.width as f32 / desktop.height as f32)
}

/// Orders modes by how close their aspect ratio is to `display_aspect`, then by area.
///
/// Aspect differences are compared in steps of `ASPECT_EPSILON`, so modes whose aspect ratios
/// are within rounding of each other are ordered by area.
pub fn sort_modes(modes: &mut [Size2D<i32>], display_aspect: f32) {
    modes.sort_by_key(|mode| (aspect_bucket(mode, display_aspect), mode.area()));
}

fn aspect_bucket(mode: &Size2D<i32>, display_aspect: f32) -> i64 {
    let aspect_diff = (mode.width as f32 / mode.height as f32 - display_aspect).abs();
    (aspect_diff / ASPECT_EPSILON) as i64
}

/// Formats modes as `"WxH WxH ..."`, skipping modes that no longer fit in `capacity` bytes.
///
/// Every entry is measured with its separating space and the list must leave room for a
/// terminator, as in the engine's fixed-size buffer.
pub fn available_modes(modes: &[Size2D<i32>], capacity: usize) -> String {
    let mut list = String::new();
    for mode in modes {
        let entry = format!("{}x{}", mode.width, mode.height);
        let used = if list.is_empty() { 0 } else { list.len() + 1 };
        if used + entry.len() + 1 >= capacity {
            warn!("Skipping mode {}, buffer too small", entry);
            continue;
        }
        if !list.is_empty() {
            list.push(' ');
        }
        list.push_str(&entry);
    }
    list
}

/// Picks the connector mode to drive: the first mode flagged as preferred, or else the first mode
/// with the largest area. Modes with no area are never picked.
pub fn preferred_or_largest<I>(modes: I) -> Option<usize>
                               where I: IntoIterator<Item = (Size2D<i32>, bool)> {
    let (mut picked, mut largest_area) = (None, 0);
    for (index, (size, preferred)) in modes.into_iter().enumerate() {
        if preferred {
            return Some(index);
        }
        if size.area() > largest_area {
            picked = Some(index);
            largest_area = size.area();
        }
    }
    picked
}

/// Tries `request`, then the same mode without a borderless window, then `fallback_mode` in a
/// window. Returns the result of the first attempt that succeeds.
pub fn start_with_fallback<T, F>(request: ModeRequest, fallback_mode: i32, mut attempt: F)
                                 -> Result<T, Error>
                                 where F: FnMut(ModeRequest) -> Result<T, Error> {
    let mut ladder = vec![request, ModeRequest { noborder: false, ..request }];
    if request.mode != fallback_mode {
        ladder.push(ModeRequest { mode: fallback_mode, fullscreen: false, noborder: false });
    }

    for (index, step) in ladder.into_iter().enumerate() {
        if index == 2 {
            info!("Setting mode {} failed, falling back on mode {}", request.mode, fallback_mode);
        }
        match attempt(step) {
            Ok(value) => return Ok(value),
            Err(err) => warn!("Could not set mode {} ({:?})", step.mode, err),
        }
    }

    error!("Could not load the OpenGL ES subsystem");
    Err(Error::NoUsableMode)
}
