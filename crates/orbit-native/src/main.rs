use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::WindowBuilder,
};

use orbit_core::{
    ActivityEngine, ActivityIngress, EngineConfig, FrameClock, OscReceiver, Preset, View,
    DOT_BASE_SIZE, OSC_ADDRESS, OSC_PORT,
};

mod render;
mod scene;

use render::GpuState;
use scene::Trail;

#[derive(Parser, Debug)]
#[command(name = "speaker-orbit", about = "Visualize who is talking as a moving spread ellipse")]
struct Args {
    /// Built-in deployment: dots, ball, ellipse or transform
    #[arg(long, default_value = "dots")]
    preset: Preset,

    /// TOML engine configuration; overrides --preset
    #[arg(long)]
    config: Option<PathBuf>,

    /// UDP port to listen on for OSC talk events
    #[arg(long, default_value_t = OSC_PORT)]
    port: u16,

    /// OSC address carrying the talk flags
    #[arg(long, default_value = OSC_ADDRESS)]
    address: String,
}

/// Everything the frame loop owns. Only touched from the event-loop thread.
struct App {
    engine: ActivityEngine,
    ingress: ActivityIngress,
    receiver: OscReceiver,
    clock: FrameClock,
    trail: Trail,
    /// Plane distance from the origin that must stay on screen.
    extent: f32,
}

impl App {
    fn frame(&mut self, gpu: &mut GpuState<'_>) -> Result<(), wgpu::SurfaceError> {
        let dt = self.clock.tick();
        self.receiver
            .drain_into(&self.ingress, self.engine.talking_mut());
        self.engine.tick(dt);

        let snapshot = self.engine.snapshot();
        self.trail.push(snapshot.point);
        let view = View::fit(gpu.width as f32, gpu.height as f32, self.extent);
        let instances = scene::build_instances(&snapshot, &self.trail, &view);
        gpu.render(&instances)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::preset(args.preset),
    };
    let engine = ActivityEngine::new(config).context("invalid engine configuration")?;
    let ingress = ActivityIngress::new(args.address.clone(), engine.config.speakers);
    let receiver = OscReceiver::bind(SocketAddr::from(([0, 0, 0, 0], args.port)))
        .with_context(|| format!("binding OSC port {}", args.port))?;

    log::info!(
        "accepting {} talk flags at {}",
        ingress.speakers(),
        ingress.address()
    );
    let extent = engine
        .positions()
        .iter()
        .map(|p| p.length())
        .fold(0.0, f32::max)
        + DOT_BASE_SIZE;

    let mut app = App {
        engine,
        ingress,
        receiver,
        clock: FrameClock::new(),
        trail: Trail::default(),
        extent,
    };

    let event_loop = EventLoop::new().context("creating event loop")?;
    let window = WindowBuilder::new()
        .with_title("speaker-orbit")
        .with_inner_size(LogicalSize::new(1024.0, 768.0))
        .build(&event_loop)
        .context("creating window")?;

    let mut gpu = pollster::block_on(GpuState::new(&window)).context("initializing GPU")?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => gpu.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event:
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key: Key::Named(NamedKey::Escape),
                            state: ElementState::Pressed,
                            ..
                        },
                    ..
                },
            ..
        } => elwt.exit(),
        Event::AboutToWait => match app.frame(&mut gpu) {
            Ok(_) => gpu.window.request_redraw(),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.resize(gpu.window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                elwt.exit()
            }
            Err(e) => log::warn!("render error: {e:?}"),
        },
        _ => {}
    })?;
    Ok(())
}
