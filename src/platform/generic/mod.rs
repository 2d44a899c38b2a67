// eglport/src/platform/generic/mod.rs
//
//! Backend-agnostic functionality.

pub mod egl;
