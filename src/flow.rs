//! Application event loop.
//!
//! Mounts the scene, forwards resizes to the composer and drives the frame clock.
//!
//! # Lifecycle
//!
//! 1. `resumed` checks the mount point and creates the window (the canvas on the web)
//! 2. the GPU context and every atlas of the manifest are loaded concurrently
//! 3. the composer builds all nodes and lays them out for the current size
//! 4. every `Resized` recomputes scale and layout from scratch
//! 5. every `RedrawRequested` ticks all nodes with the elapsed time and draws a frame
//!
//! A failure in steps 1 to 3 is fatal: it is logged and the event loop exits without
//! ever drawing a partial scene.

use std::{fmt::Debug, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::Window,
};

use crate::{
    composer::SceneComposer, config::SceneConfig, context::Context, error::SceneError,
    render::SceneRenderer, resources,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Everything that exists once the scene is mounted.
#[derive(Debug)]
pub struct SceneState {
    ctx: Context,
    composer: SceneComposer,
    renderer: SceneRenderer,
}

impl SceneState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        // nodes are only built once every atlas is there
        let (ctx, atlases) = futures::try_join!(
            Context::new(window, config.clear_colour),
            resources::load_all(&config.manifest, &config.asset_root),
        )?;
        log::info!("loaded {} atlases: {:?}", atlases.len(), atlases.aliases());

        let mut composer = SceneComposer::new(&atlases, &config.nodes);
        let renderer = SceneRenderer::new(&ctx, &atlases)?;
        composer.resize(ctx.config.width, ctx.config.height);

        Ok(Self {
            ctx,
            composer,
            renderer,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.ctx.resize(width, height) {
            self.renderer.resize(&self.ctx, width, height);
            self.composer.resize(width, height);
        }
    }

    fn frame(&mut self, dt: Duration) -> Result<(), wgpu::SurfaceError> {
        self.composer.frame_tick(dt);
        self.renderer.render(&self.ctx, &self.composer)
    }
}

/// Sent back to the event loop once the asynchronous mount finished (web only).
pub enum FlowEvent {
    Initialized(Box<SceneState>),
    Failed(anyhow::Error),
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Failed(e) => f.debug_tuple("Failed").field(e).finish(),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: EventLoopProxy<FlowEvent>,
    // Taken on the first `resumed`.
    config: Option<SceneConfig>,
    state: Option<SceneState>,
    last_time: Instant,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            proxy: event_loop.create_proxy(),
            config: Some(config),
            state: None,
            last_time: Instant::now(),
        })
    }

    fn mounted(&mut self, state: SceneState) {
        log::info!("hero scene mounted");
        state.ctx.window.request_redraw();
        self.state = Some(state);
        self.last_time = Instant::now();
    }

    fn abort(event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("hero scene failed to start: {err:#}");
        event_loop.exit();
    }
}

/// Canvas style that makes it follow its container. winit observes the canvas, so
/// container and browser resizes reach the composer as `Resized`.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const FILL_CONTAINER: [(&str, &str); 3] = [
    ("display", "block"),
    ("width", "100%"),
    ("height", "100%"),
];

/// Resolves the mount element through `lookup`, failing with
/// [`SceneError::MissingMount`] if it does not exist.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn find_mount<E>(mount_id: &str, lookup: impl FnOnce(&str) -> Option<E>) -> anyhow::Result<E> {
    lookup(mount_id).ok_or_else(|| SceneError::MissingMount(mount_id.to_string()).into())
}

/// Applies [`FILL_CONTAINER`], stopping at the first property that is rejected.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn fill_container(mut set_property: impl FnMut(&str, &str) -> bool) -> bool {
    FILL_CONTAINER
        .iter()
        .all(|(name, value)| set_property(name, value))
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("hero scene");

        #[cfg(target_arch = "wasm32")]
        let mount = match find_mount(&config.mount_id, |id| {
            web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(id))
        }) {
            Ok(mount) => {
                use winit::platform::web::WindowAttributesExtWebSys;

                let rect = mount.get_bounding_client_rect();
                window_attributes = window_attributes
                    .with_append(false)
                    .with_inner_size(winit::dpi::LogicalSize::new(rect.width(), rect.height()));
                mount
            }
            Err(err) => return Self::abort(event_loop, err),
        };

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                return Self::abort(event_loop, anyhow::anyhow!("creating the window: {err}"));
            }
        };

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowExtWebSys;

            let attached = window
                .canvas()
                .map(|canvas| {
                    let style = canvas.style();
                    fill_container(|name, value| style.set_property(name, value).is_ok())
                        && mount.append_child(&canvas).is_ok()
                })
                .unwrap_or(false);
            if !attached {
                return Self::abort(
                    event_loop,
                    anyhow::anyhow!("could not attach the canvas to #{}", config.mount_id),
                );
            }
        }

        let init_future = SceneState::new(window, config);

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok(state) => self.mounted(state),
            Err(err) => Self::abort(event_loop, err),
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(state) => FlowEvent::Initialized(Box::new(state)),
                    Err(err) => FlowEvent::Failed(err),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("event loop closed before the scene was mounted");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => {
                let mut state = *state;
                // the canvas may have been resized while the atlases were loading
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                self.mounted(state);
            }
            FlowEvent::Failed(err) => Self::abort(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.frame(dt) {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("out of GPU memory, stopping the scene");
                        event_loop.exit();
                        return;
                    }
                    Err(e) => log::error!("Unable to render {}", e),
                }
                state.ctx.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Mounts the scene described by `config` and runs it until the window closes.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
