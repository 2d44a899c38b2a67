// eglport/src/settings.rs
//
//! The settings table loaded from the optional `key=value` settings file.

use crate::Error;

use std::fs;
use std::path::Path;

/// The file a session reads its settings from unless told otherwise.
pub const DEFAULT_SETTINGS_FILE: &str = "eglport.cfg";

/// How the native display and window are obtained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderMode {
    /// Render straight to the framebuffer through the default EGL display.
    Raw,
    /// Render into a window created by a desktop windowing toolkit.
    Toolkit,
}

impl RenderMode {
    pub fn from_setting(mode: i32) -> Result<RenderMode, Error> {
        match mode {
            0 => Ok(RenderMode::Raw),
            1 => Ok(RenderMode::Toolkit),
            _ => Err(Error::UnknownRenderMode(mode)),
        }
    }
}

/// The settings that control how the display is negotiated.
///
/// Every value is a small integer, exactly as it appears in the settings file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Render mode: 0 is raw framebuffer, 1 is toolkit window.
    pub mode: i32,
    /// Nonzero waits for vertical sync and sets a swap interval of 1.
    pub vsync: i32,
    /// Number of samples for full screen antialiasing; 0 is off.
    pub fsaa: i32,
    /// Nonzero reports frames per second once a second.
    pub fps: i32,
    pub red_size: i32,
    pub green_size: i32,
    pub blue_size: i32,
    pub alpha_size: i32,
    pub depth_size: i32,
    /// Total color component bits in the color buffer.
    pub buffer_size: i32,
    pub stencil_size: i32,
}

#[derive(Clone, Copy)]
enum Key {
    Mode,
    Vsync,
    Fsaa,
    Fps,
    RedSize,
    GreenSize,
    BlueSize,
    AlphaSize,
    DepthSize,
    BufferSize,
    StencilSize,
}

// Matched in this order; the first key found on a line wins.
static KEYS: [(&str, Key); 11] = [
    ("egl_mode=",       Key::Mode),
    ("use_vsync=",      Key::Vsync),
    ("use_fsaa=",       Key::Fsaa),
    ("show_fps=",       Key::Fps),
    ("size_red=",       Key::RedSize),
    ("size_green=",     Key::GreenSize),
    ("size_blue=",      Key::BlueSize),
    ("size_alpha=",     Key::AlphaSize),
    ("size_depth=",     Key::DepthSize),
    ("size_buffer=",    Key::BufferSize),
    ("size_stencil=",   Key::StencilSize),
];

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            mode: 0,
            vsync: 0,
            fsaa: 0,
            fps: 0,
            red_size: 5,
            green_size: 6,
            blue_size: 5,
            alpha_size: 0,
            depth_size: 16,
            buffer_size: 16,
            stencil_size: 0,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, falling back to the defaults for anything the file doesn't
    /// set. A missing or unreadable file yields the defaults.
    pub fn load<P>(path: P) -> Settings where P: AsRef<Path> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Settings::parse(&text),
            Err(err) => {
                info!("Unable to read settings from '{}' ({}); using defaults",
                      path.display(),
                      err);
                Settings::default()
            }
        }
    }

    /// Parses the contents of a settings file on top of the defaults.
    pub fn parse(text: &str) -> Settings {
        let mut settings = Settings::default();
        for line in text.lines() {
            settings.apply_line(line);
        }
        settings
    }

    /// Applies a single `key=value` line. Returns true if the line set a value.
    pub fn apply_line(&mut self, line: &str) -> bool {
        for &(name, key) in KEYS.iter() {
            let start = match line.find(name) {
                None => continue,
                Some(start) => start,
            };
            let value = match parse_leading_integer(&line[start + name.len()..]) {
                None => {
                    warn!("Ignoring '{}' with no integer value", line.trim());
                    return false;
                }
                Some(value) => value,
            };
            *self.slot(key) = value;
            info!("{} set to {}.", name, value);
            return true;
        }
        false
    }

    /// The render mode these settings select.
    #[inline]
    pub fn render_mode(&self) -> Result<RenderMode, Error> {
        RenderMode::from_setting(self.mode)
    }

    fn slot(&mut self, key: Key) -> &mut i32 {
        match key {
            Key::Mode => &mut self.mode,
            Key::Vsync => &mut self.vsync,
            Key::Fsaa => &mut self.fsaa,
            Key::Fps => &mut self.fps,
            Key::RedSize => &mut self.red_size,
            Key::GreenSize => &mut self.green_size,
            Key::BlueSize => &mut self.blue_size,
            Key::AlphaSize => &mut self.alpha_size,
            Key::DepthSize => &mut self.depth_size,
            Key::BufferSize => &mut self.buffer_size,
            Key::StencilSize => &mut self.stencil_size,
        }
    }
}

// Leading whitespace and a sign are accepted; anything after the digits is ignored.
fn parse_leading_integer(text: &str) -> Option<i32> {
    let text = text.trim_start();
    let sign_len = if text.starts_with('-') || text.starts_with('+') { 1 } else { 0 };
    let digit_len = text[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }
    text[..sign_len + digit_len].parse().ok()
}
