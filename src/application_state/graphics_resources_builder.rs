//! # Graphics Resources Builder
//!
//! Creates the window, the WebGPU context and the start-up assets, then hands them to the
//! event loop as a user event.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::{future::Future, path::Path, sync::Arc};

use image::RgbaImage;
use log::{error, info};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    dpi::PhysicalSize,
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::engine_state::{
    error::EngineError,
    settings::{GameSettings, SETTINGS_PATH},
};

/// Location of the block shader.
const SHADER_PATH: &str = "assets/shaders/block_shader.wgsl";
/// Location of the block atlas.
const ATLAS_PATH: &str = "assets/textures/blocks.png";

/// Contains all graphics-related resources required by the application.
pub struct Graphics {
    pub window: Arc<Window>,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub device: Device,
    pub queue: Queue,
    pub settings: GameSettings,
    pub shader_source: String,
    pub atlas: RgbaImage,
}

/// The user event sent back to the event loop once initialization finishes.
pub type GraphicsResult = Result<Graphics, EngineError>;

/// Asynchronously creates and initializes all required graphics resources.
///
/// The window and surface are created immediately because they need the event loop.
/// Adapter and device requests run in the returned future.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
///
/// # Returns
/// A `Future` that resolves to the initialized `Graphics`, or the first start-up error
fn create_graphics(event_loop: &ActiveEventLoop) -> impl Future<Output = GraphicsResult> + 'static {
    let prepared = create_window_and_surface(event_loop);

    async move {
        let (settings, window, instance, surface) = prepared?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let size = window.inner_size();
        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(EngineError::UnsupportedSurface)?;
        let surface_caps = surface.get_capabilities(&adapter);
        if let Some(format) = surface_caps.formats.iter().find(|f| f.is_srgb()) {
            surface_config.format = *format;
        }
        surface.configure(&device, &surface_config);

        let shader_source = std::fs::read_to_string(Path::new(SHADER_PATH))
            .map_err(|e| EngineError::io(SHADER_PATH, e))?;
        let atlas = image::open(ATLAS_PATH)?.to_rgba8();

        Ok(Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            settings,
            shader_source,
            atlas,
        })
    }
}

/// Loads the settings, opens the window and creates its surface.
fn create_window_and_surface(
    event_loop: &ActiveEventLoop,
) -> Result<(GameSettings, Arc<Window>, wgpu::Instance, Surface<'static>), EngineError> {
    let settings = GameSettings::load(SETTINGS_PATH)?;

    let window_attrs = Window::default_attributes()
        .with_title("Voxel World")
        .with_inner_size(PhysicalSize::new(settings.window_width, settings.window_height));
    let window = Arc::new(event_loop.create_window(window_attrs)?);

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    Ok((settings, window, instance, surface))
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// Waiting for the first `resumed` to start initialization
    Builder(GraphicsBuilder),

    /// State after graphics resources have been moved into the engine
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Runs graphics initialization to completion and sends the result to the event loop.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the graphics context
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx = pollster::block_on(create_graphics(event_loop));
        if event_loop_proxy.send_event(gfx).is_err() {
            error!("Event loop closed before graphics initialization finished");
        }
    }
}
