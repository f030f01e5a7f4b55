use std::ffi::CStr;

use gl::types::GLenum;
use glutin::{
    dpi::PhysicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
    Api, ContextBuilder, ContextWrapper, GlProfile, GlRequest, PossiblyCurrent,
};
use log::{debug, error, info};

use crate::engine::config::{Config, GlVersion};
use crate::engine::geometry::{GLMesh, TRIANGLE};
use crate::engine::input::{is_close_key, viewport_for};
use crate::engine::shader::{fragment_source, vertex_source, ShaderProgram};

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("failed to create a window with an OpenGL {version} core context")]
    CreateContext {
        version: GlVersion,
        #[source]
        source: glutin::CreationError,
    },

    #[error("failed to make the OpenGL context current")]
    MakeCurrent(#[source] glutin::ContextError),

    #[error("failed to load OpenGL function pointers")]
    LoadGl,
}

/// `Renderer` owns the window, its OpenGL context and the event loop that
/// drives them.
///
/// The context is made current and the GL function pointers are loaded in
/// [`Renderer::new`], so GL objects may be created as soon as it returns.
///
/// # Example Usage
///
/// ```no_run
/// let config = Config::parse();
/// let mut renderer = Renderer::new(&config)?;
/// renderer.set_clear_color(0.2, 0.3, 0.3, 1.0);
/// renderer.run();
/// ```
pub struct Renderer {
    /// The event loop responsible for driving window events and rendering
    event_loop: EventLoop<()>,

    /// The OpenGL context tied to the window, current on this thread.
    windowed_context: ContextWrapper<PossiblyCurrent, Window>,

    /// The color used to clear the framebuffer each frame, stored as RGBA floats.
    clear_color: [f32; 4],

    /// Context version, also used for the GLSL `#version` header.
    gl_version: GlVersion,
}

impl Renderer {
    /// Creates the window and a core-profile context as described by `config`.
    ///
    /// 1. Initializes the event loop needed for window events and input.
    /// 2. Configures a window builder with title and size.
    /// 3. Requests a core-profile context of the configured version, with vsync
    ///    unless disabled.
    /// 4. Makes the context current on this thread.
    /// 5. Loads all OpenGL function pointers through the context.
    pub fn new(config: &Config) -> Result<Self, RendererError> {
        let event_loop = EventLoop::new();

        let wb = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height));

        let version = config.gl_version;
        let windowed_context = ContextBuilder::new()
            .with_gl(GlRequest::Specific(Api::OpenGl, (version.major, version.minor)))
            .with_gl_profile(GlProfile::Core)
            .with_vsync(config.vsync())
            .build_windowed(wb, &event_loop)
            .map_err(|source| RendererError::CreateContext { version, source })?;

        let windowed_context = unsafe {
            windowed_context
                .make_current()
                .map_err(|(_, err)| RendererError::MakeCurrent(err))?
        };

        gl::load_with(|symbol| windowed_context.get_proc_address(symbol) as *const _);
        if !gl::Clear::is_loaded() {
            return Err(RendererError::LoadGl);
        }

        info!(
            "OpenGL {} on {} ({})",
            gl_string(gl::VERSION),
            gl_string(gl::RENDERER),
            gl_string(gl::VENDOR)
        );

        // Dark blue until the caller picks a colour.
        let clear_color = [0.1, 0.2, 0.3, 1.0];
        unsafe {
            gl::ClearColor(clear_color[0], clear_color[1], clear_color[2], clear_color[3]);
        }

        if let Some((width, height)) = viewport_for(windowed_context.window().inner_size()) {
            unsafe {
                gl::Viewport(0, 0, width, height);
            }
        }

        Ok(Self {
            event_loop,
            windowed_context,
            clear_color,
            gl_version: version,
        })
    }

    /// Updates the colour used by every subsequent clear.
    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.clear_color = [r, g, b, a];
        unsafe {
            gl::ClearColor(r, g, b, a);
        }
    }

    /// Uploads the triangle, builds the shader program and runs the event
    /// loop until the window is closed or Escape is pressed. Never returns.
    ///
    /// - `CloseRequested` or a pressed Escape exits.
    /// - `Resized` resizes the context surface and the viewport.
    /// - `RedrawRequested` clears, draws the triangle and swaps buffers.
    /// - `LoopDestroyed` frees the GL objects while the context is still current.
    pub fn run(self) -> ! {
        let Renderer {
            event_loop,
            windowed_context: context,
            clear_color,
            gl_version,
        } = self;

        debug!("clear color {:?}", clear_color);

        let mut triangle = Some(Triangle::build(gl_version));
        let mut frames: u64 = 0;

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                    WindowEvent::KeyboardInput { input, .. } if is_close_key(&input) => {
                        info!("escape pressed, closing window");
                        *control_flow = ControlFlow::Exit;
                    }

                    WindowEvent::Resized(size) => {
                        context.resize(size);
                        if let Some((width, height)) = viewport_for(size) {
                            debug!("viewport resized to {}x{}", width, height);
                            unsafe {
                                gl::Viewport(0, 0, width, height);
                            }
                        }
                    }

                    _ => {}
                },

                Event::MainEventsCleared => context.window().request_redraw(),

                Event::RedrawRequested(_) => {
                    unsafe {
                        gl::Clear(gl::COLOR_BUFFER_BIT);
                    }

                    if let Some(triangle) = &triangle {
                        triangle.draw();
                    }

                    if let Err(err) = context.swap_buffers() {
                        error!("failed to swap buffers: {}", err);
                        *control_flow = ControlFlow::Exit;
                        return;
                    }
                    frames += 1;
                }

                Event::LoopDestroyed => {
                    drop(triangle.take());
                    info!("window closed after {} frames", frames);
                }

                _ => {}
            }
        })
    }
}

/// GL objects drawn every frame.
struct Triangle {
    mesh: GLMesh,
    /// `None` when the shaders failed to build; frames then only show the clear colour.
    program: Option<ShaderProgram>,
}

impl Triangle {
    fn build(version: GlVersion) -> Self {
        let mesh = GLMesh::upload(&TRIANGLE);

        let program = match ShaderProgram::from_sources(&vertex_source(version), &fragment_source(version)) {
            Ok(program) => {
                info!("linked shader program {}", program.id());
                Some(program)
            }
            Err(err) => {
                error!("{}", err);
                None
            }
        };

        Self { mesh, program }
    }

    fn draw(&self) {
        if let Some(program) = &self.program {
            program.bind();
            self.mesh.draw();
        }
    }
}

fn gl_string(name: GLenum) -> String {
    unsafe {
        let ptr = gl::GetString(name);
        if ptr.is_null() {
            return "unknown".to_string();
        }
        CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned()
    }
}
