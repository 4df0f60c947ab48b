use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, SwapInterval, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;

use log::{debug, error, info, warn};

use winit::dpi::{PhysicalSize, Size};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::GlContext;

use spincube::input::WindowDragInput;
use spincube::{
    DragInputSource, FrameOutcome, FrameRenderer, RenderSession, SetupError, StopHandle,
    ViewerConfig,
};

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    gl: GlContext,
    session: RenderSession,
    frame: FrameRenderer,
    input: WindowDragInput,
    vsync: bool,
}

fn unavailable(e: impl std::fmt::Display) -> SetupError {
    SetupError::CapabilityUnavailable(e.to_string())
}

impl App {
    /// Opens the window, creates the GL context and builds the render session.
    /// Any failure here is final.
    pub fn new(config: &ViewerConfig, stop: StopHandle) -> Result<Self, SetupError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(config.width, config.height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title(&config.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, pick_config)
            .map_err(unavailable)?;

        let window = window.ok_or_else(|| unavailable("no window was created"))?;
        debug!(
            "picked GL config with depth {} and {} samples",
            gl_config.depth_size(),
            gl_config.num_samples()
        );

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr) }
            .map_err(unavailable)?
            .make_current(&gl_window.surface)
            .map_err(unavailable)?;

        if config.vsync {
            let interval = SwapInterval::Wait(NonZeroU32::MIN);
            if let Err(e) = gl_window.surface.set_swap_interval(&gl_context, interval) {
                warn!("could not enable vsync: {e}");
            }
        }

        let mut gl = GlContext::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });
        info!("OpenGL {}", gl.version());

        let (width, height): (u32, u32) = gl_window.window.inner_size().into();
        let session = RenderSession::new(&mut gl, config, width, height)?;

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            gl,
            session,
            frame: FrameRenderer::new(stop),
            input: WindowDragInput::default(),
            vsync: config.vsync,
        })
    }

    /// Redraws on every display refresh until the window closes or the stop
    /// handle fires.
    pub fn run(mut self) -> ! {
        let stop = self.frame.stop_handle();

        if !self.vsync {
            warn!("vsync disabled, frames are not paced by the display");
        }

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Wait;
                match event {
                    Event::MainEventsCleared => {
                        self.gl_window.window.request_redraw();
                    }
                    Event::RedrawRequested(_) => {
                        match self.frame.tick(&mut self.gl, &mut self.session) {
                            FrameOutcome::Continue => {
                                let surface = &self.gl_window.surface;
                                if let Err(e) = surface.swap_buffers(&self.gl_context) {
                                    error!("swap failed: {e}");
                                }
                            }
                            FrameOutcome::Stopped => control_flow.set_exit(),
                        }
                    }
                    Event::WindowEvent { event, .. } => {
                        if let Some(drag) = self.input.translate(&event) {
                            self.session.handle_drag(drag);
                        }

                        match event {
                            WindowEvent::Resized(size) => {
                                if let (Some(w), Some(h)) =
                                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                                {
                                    self.gl_window.surface.resize(&self.gl_context, w, h);
                                    self.session.resize(&mut self.gl, size.width, size.height);
                                }
                            }
                            WindowEvent::KeyboardInput {
                                input:
                                    KeyboardInput {
                                        state: ElementState::Pressed,
                                        virtual_keycode: Some(VirtualKeyCode::Escape),
                                        ..
                                    },
                                ..
                            } => stop.stop(),
                            WindowEvent::CloseRequested => {
                                stop.stop();
                                control_flow.set_exit();
                            }
                            _ => (),
                        }
                    }
                    Event::LoopDestroyed => {
                        info!("closed after {} frames", self.frame.frames());
                    }
                    _ => (),
                }
            })
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, c| {
            if c.num_samples() > best.num_samples() {
                c
            } else {
                best
            }
        })
        .expect("display builder yields at least one config")
}

pub struct GlWindow {
    // the surface must be dropped before the window
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, SetupError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN),
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs) }
            .map_err(unavailable)?;

        Ok(Self { window, surface })
    }
}
