// eglport/src/buffer_format.rs
//
//! Buffer bit depths and the ladder of progressively reduced formats tried during mode setting.

/// Number of formats a `FormatLadder` yields.
pub const FORMAT_LADDER_STEPS: usize = 16;

/// The color, depth and stencil bit depths of a negotiated surface.
///
/// These are published by an open session for the engine's own mode-setting logic. A closed
/// session reports zeroes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BufferDepths {
    /// Bits per color channel.
    pub color_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,
}

impl BufferDepths {
    /// Derives the published depths from the config's `EGL_BUFFER_SIZE`, `EGL_DEPTH_SIZE` and
    /// `EGL_STENCIL_SIZE`. A 16-bit buffer is reported as 5 bits per channel, anything else as 8.
    pub fn from_config(buffer_size: i32, depth_size: i32, stencil_size: i32) -> BufferDepths {
        BufferDepths {
            color_bits: if buffer_size == 16 { 5 } else { 8 },
            depth_bits: depth_size,
            stencil_bits: stencil_size,
        }
    }
}

/// A requested framebuffer format.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BufferFormat {
    /// Total color bits: 16 or 24.
    pub color_bits: i32,
    pub depth_bits: i32,
    pub stencil_bits: i32,
    /// Multisample count; 0 disables multisampling.
    pub samples: i32,
}

impl BufferFormat {
    /// Normalizes a requested format: 0 or 32+ color bits become 24, 0 depth bits become 24.
    pub fn requested(color_bits: i32, depth_bits: i32, stencil_bits: i32, samples: i32)
                     -> BufferFormat {
        BufferFormat {
            color_bits: if color_bits == 0 || color_bits >= 32 { 24 } else { color_bits },
            depth_bits: if depth_bits == 0 { 24 } else { depth_bits },
            stencil_bits,
            samples,
        }
    }

    /// Bits requested per color channel for this format.
    #[inline]
    pub fn channel_bits(&self) -> i32 {
        channel_bits(self.color_bits)
    }
}

/// Bits per color channel for a total color depth: 8 for 24-bit color, 4 otherwise.
#[inline]
pub fn channel_bits(color_bits: i32) -> i32 {
    if color_bits == 24 { 8 } else { 4 }
}

/// Yields the sixteen formats tried in turn until one succeeds.
///
/// Every fourth step permanently lowers the base format; the steps in between each try the base
/// with one component lowered: stencil, then depth, then color.
#[derive(Clone, Debug)]
pub struct FormatLadder {
    base: BufferFormat,
    step: usize,
}

impl FormatLadder {
    pub fn new(requested: BufferFormat) -> FormatLadder {
        FormatLadder { base: requested, step: 0 }
    }
}

impl Iterator for FormatLadder {
    type Item = BufferFormat;

    fn next(&mut self) -> Option<BufferFormat> {
        if self.step >= FORMAT_LADDER_STEPS {
            return None;
        }
        let step = self.step;
        self.step += 1;

        if step % 4 == 0 && step != 0 {
            match step / 4 {
                1 => {
                    // Lowering depth also lowers stencil for the rest of the ladder.
                    self.base.depth_bits = lower_bits(self.base.depth_bits);
                    self.base.stencil_bits = lower_bits(self.base.stencil_bits);
                }
                2 => self.base.color_bits = lower_color(self.base.color_bits),
                3 => self.base.stencil_bits = lower_bits(self.base.stencil_bits),
                _ => {}
            }
        }

        let mut format = self.base;
        match step % 4 {
            1 => {
                format.stencil_bits = match format.stencil_bits {
                    24 => 16,
                    16 => 8,
                    _ => 0,
                }
            }
            2 => format.depth_bits = lower_bits(format.depth_bits),
            3 => format.color_bits = lower_color(format.color_bits),
            _ => {}
        }
        Some(format)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = FORMAT_LADDER_STEPS - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FormatLadder {}

fn lower_color(bits: i32) -> i32 {
    if bits == 24 { 16 } else { bits }
}

// Depth and stencil step down the same way.
fn lower_bits(bits: i32) -> i32 {
    match bits {
        24 => 16,
        16 => 8,
        _ => bits,
    }
}
