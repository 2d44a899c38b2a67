// eglport/demos/clear.rs
//
//! Opens a session and cycles the clear color, on the framebuffer, in a window, or over KMS.

use clap::{App, Arg};
use euclid::default::Size2D;
use eglport::platform::{self, NativePlatform};
use eglport::{EglBackend, EglLibrary, Session, Settings, DEFAULT_SETTINGS_FILE};
use glow::HasContext;
use std::time::Instant;

#[cfg(feature = "raw-window-handle-06")]
use eglport::ToolkitWindow;
#[cfg(feature = "raw-window-handle-06")]
use winit::dpi::PhysicalSize;
#[cfg(feature = "raw-window-handle-06")]
use winit::event::{Event, WindowEvent};
#[cfg(feature = "raw-window-handle-06")]
use winit::event_loop::EventLoop;
#[cfg(feature = "raw-window-handle-06")]
use winit::window::WindowBuilder;

static APP_NAME: &'static str = "eglport clear example";

const WINDOW_WIDTH: i32 = 640;
const WINDOW_HEIGHT: i32 = 480;

fn main() {
    let matches = App::new(APP_NAME)
        .arg(
            Arg::with_name("target")
                .long("target")
                .takes_value(true)
                .possible_values(&["settings", "window", "kms"])
                .default_value("settings")
                .help("Where to render: as the settings file says, a toolkit window, or KMS"),
        )
        .arg(
            Arg::with_name("settings")
                .long("settings")
                .takes_value(true)
                .default_value(DEFAULT_SETTINGS_FILE)
                .help("Settings file"),
        )
        .arg(
            Arg::with_name("frames")
                .long("frames")
                .takes_value(true)
                .default_value("300")
                .help("Number of frames to draw before exiting"),
        )
        .get_matches();

    let settings_path = matches.value_of("settings").unwrap().to_owned();
    let frames: u32 = matches.value_of("frames").unwrap().parse().unwrap();
    let egl = EglLibrary::load().unwrap();

    match matches.value_of("target").unwrap() {
        "window" => run_in_window(egl, settings_path, frames),
        "kms" => run_on_kms(egl, settings_path, frames),
        _ => {
            let settings = Settings::load(&settings_path);
            #[cfg(feature = "raw-window-handle-06")]
            let platform = platform::select(&settings, None).unwrap();
            #[cfg(not(feature = "raw-window-handle-06"))]
            let platform = platform::select(&settings).unwrap();
            let mut session = Session::new(egl, platform).with_settings_file(settings_path);
            session.open(Size2D::new(WINDOW_WIDTH, WINDOW_HEIGHT)).unwrap();
            run_frames(&mut session, frames);
        }
    }
}

fn run_frames<P, E>(session: &mut Session<P, E>, frames: u32) where P: NativePlatform,
                                                                   E: EglBackend {
    let gl = load_gl(session);
    print_info(session);
    let start = Instant::now();
    for _ in 0..frames {
        draw(&gl, start);
        session.swap_buffers().unwrap();
    }
    session.close();
}

fn load_gl<P, E>(session: &Session<P, E>) -> glow::Context where P: NativePlatform,
                                                                E: EglBackend {
    unsafe {
        glow::Context::from_loader_function(|symbol_name| {
            session.egl().get_proc_address(symbol_name)
        })
    }
}

fn print_info<P, E>(session: &Session<P, E>) where P: NativePlatform, E: EglBackend {
    let info = session.gl_info().unwrap();
    println!("GL_VENDOR: {}", info.vendor);
    println!("GL_RENDERER: {}", info.renderer);
    println!("GL_VERSION: {}", info.version);
    println!("Buffer depths: {:?}", session.buffer_depths());
}

fn draw(gl: &glow::Context, start: Instant) {
    let t = start.elapsed().as_secs_f32();
    unsafe {
        gl.clear_color(t.sin() * 0.5 + 0.5, (t * 0.7).cos() * 0.5 + 0.5, 0.5, 1.0);
        gl.clear(glow::COLOR_BUFFER_BIT);
    }
}

#[cfg(feature = "raw-window-handle-06")]
fn run_in_window(egl: EglLibrary, settings_path: String, frames: u32) {
    let event_loop = EventLoop::new().unwrap();
    let window = WindowBuilder::new()
        .with_title(APP_NAME)
        .with_inner_size(PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT))
        .build(&event_loop)
        .unwrap();

    let toolkit_window = ToolkitWindow::new(&window).unwrap();
    let settings = Settings { mode: 1, ..Settings::load(&settings_path) };
    let mut session = Session::new(egl, toolkit_window).with_settings(settings);
    let window_size = window.inner_size();
    session.open(Size2D::new(window_size.width as i32, window_size.height as i32)).unwrap();

    let gl = load_gl(&session);
    print_info(&session);
    let start = Instant::now();
    let mut frame = 0;

    event_loop.run(move |event, target| {
        match event {
            Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => target.exit(),
            Event::AboutToWait => {
                draw(&gl, start);
                session.swap_buffers().unwrap();
                frame += 1;
                if frame >= frames {
                    session.close();
                    target.exit();
                }
            }
            _ => {}
        }
    }).unwrap();
}

#[cfg(not(feature = "raw-window-handle-06"))]
fn run_in_window(_: EglLibrary, _: String, _: u32) {
    println!("Window rendering needs the `raw-window-handle-06` feature.");
}

#[cfg(all(target_os = "linux", feature = "kms"))]
fn run_on_kms(egl: EglLibrary, settings_path: String, frames: u32) {
    let mut session = Session::new(egl, eglport::Kms::new()).with_settings_file(settings_path);
    let size = session.init_drm().unwrap();
    println!("Display mode: {}x{}", size.width, size.height);
    session.open(size).unwrap();
    run_frames(&mut session, frames);
}

#[cfg(not(all(target_os = "linux", feature = "kms")))]
fn run_on_kms(_: EglLibrary, _: String, _: u32) {
    println!("KMS rendering needs the `kms` feature.");
}
