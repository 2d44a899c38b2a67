// eglport/src/platform/heap_window.rs
//
//! A zeroed heap block used as the native window by GPH Wiz and Caanoo style drivers.

use super::NativePlatform;
use crate::egl::types::EGLNativeWindowType;
use crate::{Error, Settings};

use euclid::default::Size2D;

/// Size of the block the driver treats as its window.
pub const HEAP_WINDOW_SIZE: usize = 16 * 1024;

#[derive(Debug, Default)]
pub struct HeapWindow {
    block: Option<Vec<u8>>,
}

impl HeapWindow {
    #[inline]
    pub fn new() -> HeapWindow {
        HeapWindow::default()
    }
}

impl NativePlatform for HeapWindow {
    fn native_window(&mut self, _: Size2D<i32>, _: &Settings)
                     -> Result<EGLNativeWindowType, Error> {
        let block = self.block.get_or_insert_with(|| vec![0; HEAP_WINDOW_SIZE]);
        Ok(block.as_ptr() as EGLNativeWindowType)
    }

    fn free_window(&mut self) {
        self.block = None;
    }
}
