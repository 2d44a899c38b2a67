// eglport/src/platform/generic/egl/mod.rs
//
//! Functionality common to every EGL-based display provider.

pub(crate) mod error;
pub(crate) mod ffi;
pub mod library;
