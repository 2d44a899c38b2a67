// eglport/src/error.rs
//
//! Various errors that methods can produce.

/// Various errors that methods can produce.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// The method failed for a miscellaneous reason.
    Failed,
    /// The platform doesn't support this method.
    UnsupportedOnThisPlatform,
    /// The system EGL library couldn't be located.
    NoGLLibraryFound,
    /// An extension necessary for this method isn't supported.
    RequiredExtensionUnavailable,
    /// `open` was called on a session that is not closed.
    AlreadyOpen,
    /// The session must be open for this method.
    NotOpen,
    /// The settings name a render mode that no platform provides.
    UnknownRenderMode(i32),
    /// The native display couldn't be obtained.
    NativeDisplayUnavailable,
    /// The native window couldn't be obtained.
    NativeWindowUnavailable,
    /// A toolkit window handle was required but none was supplied.
    NoWidgetAttached,
    /// The toolkit window handle is not an X11 handle.
    IncompatibleNativeWidget,
    /// The system couldn't create an EGL display.
    DisplayCreationFailed(WindowingApiError),
    /// The system couldn't initialize the EGL display.
    DisplayInitializationFailed(WindowingApiError),
    /// Choosing an EGL config failed.
    PixelFormatSelectionFailed(WindowingApiError),
    /// The system couldn't find an EGL config matching the settings.
    NoPixelFormatFound,
    /// The system couldn't bind the OpenGL ES API.
    ApiBindingFailed(WindowingApiError),
    /// The system couldn't create an OpenGL ES context.
    ContextCreationFailed(WindowingApiError),
    /// The system couldn't create a window surface.
    SurfaceCreationFailed(WindowingApiError),
    /// The system couldn't make the OpenGL ES context current or not current.
    MakeCurrentFailed(WindowingApiError),
    /// The system couldn't present the window surface.
    PresentFailed(WindowingApiError),
    /// The system couldn't destroy the OpenGL ES context.
    ContextDestructionFailed(WindowingApiError),
    /// The system couldn't destroy the window surface.
    SurfaceDestructionFailed(WindowingApiError),
    /// The system couldn't terminate the EGL display.
    DisplayTerminationFailed(WindowingApiError),
    /// No DRM device with mode-setting resources could be opened.
    DeviceOpenFailed,
    /// The DRM device has no connected connector.
    NoConnectedConnector,
    /// The connected connector reports no usable display mode.
    NoDisplayModeFound,
    /// No CRTC can drive the connected connector.
    NoCrtcFound,
    /// GBM couldn't allocate the scanout surface or lock a buffer from it.
    BufferAllocationFailed,
    /// A DRM framebuffer couldn't be created for a buffer object.
    FramebufferCreationFailed,
    /// Setting the display mode on the CRTC failed.
    ModeSetFailed,
    /// Queueing or waiting for a page flip failed.
    PageFlipFailed,
    /// Every entry of the mode fallback ladder failed.
    NoUsableMode,
}

/// Abstraction of the errors that EGL returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowingApiError {
    /// Miscellaneous error.
    Failed,
    /// EGL is not initialized, or could not be initialized, for the specified EGL display
    /// connection.
    NotInitialized,
    /// EGL cannot access a requested resource (for example a context is bound in another
    /// thread).
    BadAccess,
    /// EGL failed to allocate resources for the requested operation.
    BadAlloc,
    /// An unrecognized attribute or attribute value was passed in the attribute list.
    BadAttribute,
    /// An EGLConfig argument does not name a valid EGL frame buffer configuration.
    BadConfig,
    /// An EGLContext argument does not name a valid EGL rendering context.
    BadContext,
    /// The current surface of the calling thread is a window, pixel buffer or pixmap that is no
    /// longer valid.
    BadCurrentSurface,
    /// An EGLDisplay argument does not name a valid EGL display connection.
    BadDisplay,
    /// Arguments are inconsistent (for example, a valid context requires buffers not supplied by
    /// a valid surface).
    BadMatch,
    /// A NativePixmapType argument does not refer to a valid native pixmap.
    BadNativePixmap,
    /// A NativeWindowType argument does not refer to a valid native window.
    BadNativeWindow,
    /// One or more argument values are invalid.
    BadParameter,
    /// An EGLSurface argument does not name a valid surface configured for GL rendering.
    BadSurface,
    /// A power management event has occurred. The application must destroy all contexts and
    /// reinitialise OpenGL ES state and objects to continue rendering.
    ContextLost,
}

impl WindowingApiError {
    /// The EGL name of this error.
    pub fn name(self) -> &'static str {
        match self {
            WindowingApiError::Failed => "Unknown EGL Error",
            WindowingApiError::NotInitialized => "EGL_NOT_INITIALIZED",
            WindowingApiError::BadAccess => "EGL_BAD_ACCESS",
            WindowingApiError::BadAlloc => "EGL_BAD_ALLOC",
            WindowingApiError::BadAttribute => "EGL_BAD_ATTRIBUTE",
            WindowingApiError::BadConfig => "EGL_BAD_CONFIG",
            WindowingApiError::BadContext => "EGL_BAD_CONTEXT",
            WindowingApiError::BadCurrentSurface => "EGL_BAD_CURRENT_SURFACE",
            WindowingApiError::BadDisplay => "EGL_BAD_DISPLAY",
            WindowingApiError::BadMatch => "EGL_BAD_MATCH",
            WindowingApiError::BadNativePixmap => "EGL_BAD_NATIVE_PIXMAP",
            WindowingApiError::BadNativeWindow => "EGL_BAD_NATIVE_WINDOW",
            WindowingApiError::BadParameter => "EGL_BAD_PARAMETER",
            WindowingApiError::BadSurface => "EGL_BAD_SURFACE",
            WindowingApiError::ContextLost => "EGL_CONTEXT_LOST",
        }
    }

    /// A human-readable description of this error.
    pub fn description(self) -> &'static str {
        match self {
            WindowingApiError::Failed => "",
            WindowingApiError::NotInitialized => {
                "EGL is not or could not be initialized, for the specified display."
            }
            WindowingApiError::BadAccess => {
                "EGL cannot access a requested resource (for example, a context is bound in \
                 another thread)."
            }
            WindowingApiError::BadAlloc => {
                "EGL failed to allocate resources for the requested operation."
            }
            WindowingApiError::BadAttribute => {
                "An unrecognized attribute or attribute value was passed in an attribute list."
            }
            WindowingApiError::BadConfig => {
                "An EGLConfig argument does not name a valid EGLConfig."
            }
            WindowingApiError::BadContext => {
                "An EGLContext argument does not name a valid EGLContext."
            }
            WindowingApiError::BadCurrentSurface => {
                "The current surface of the calling thread is a window, pbuffer, or pixmap that \
                 is no longer valid."
            }
            WindowingApiError::BadDisplay => {
                "An EGLDisplay argument does not name a valid EGLDisplay."
            }
            WindowingApiError::BadMatch => {
                "Arguments are inconsistent; for example, an otherwise valid context requires \
                 buffers (e.g. depth or stencil) not allocated by an otherwise valid surface."
            }
            WindowingApiError::BadNativePixmap => {
                "An EGLNativePixmapType argument does not refer to a valid native pixmap."
            }
            WindowingApiError::BadNativeWindow => {
                "An EGLNativeWindowType argument does not refer to a valid native window."
            }
            WindowingApiError::BadParameter => "One or more argument values are invalid.",
            WindowingApiError::BadSurface => {
                "An EGLSurface argument does not name a valid surface (window, pbuffer, or \
                 pixmap) configured for rendering."
            }
            WindowingApiError::ContextLost => {
                "A power management event has occurred. The application must destroy all \
                 contexts and reinitialise client API state and objects to continue rendering."
            }
        }
    }
}
