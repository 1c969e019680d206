use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

/// Upper bound on pumps spent waiting for the platform to let us create
/// the window.
const OPEN_ATTEMPTS: u32 = 200;
const OPEN_POLL: Duration = Duration::from_millis(5);

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Drawable size in physical pixels.
    pub size: PhysicalSize<u32>,
    pub resizable: bool,
    /// Allow the event loop off the main thread where the platform permits
    /// it (X11, Wayland, Windows). Mostly useful for test harnesses.
    pub any_thread: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "pixelbuf".to_string(),
            size: PhysicalSize::new(800, 600),
            resizable: false,
            any_thread: false,
        }
    }
}

/// What one pump of the event loop reported.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Pumped {
    /// Latest drawable size, if it changed.
    pub resized: Option<PhysicalSize<u32>>,
}

/// One window and the event loop that feeds it, driven by the caller.
///
/// There is no callback-owned run loop: every [`pump`](Self::pump) drains
/// pending events without blocking and returns. Must stay on the thread
/// that opened it.
pub struct WindowHost {
    events: WindowEvents,
    window: Arc<Window>,
    // Dropped last; the window must go first.
    event_loop: EventLoop<()>,
}

impl WindowHost {
    /// Creates the event loop and opens the window.
    ///
    /// Fails if the platform has no display, if an event loop already
    /// exists in this process, or if the window cannot be created.
    pub fn open(config: WindowConfig) -> Result<Self> {
        let mut event_loop = build_event_loop(config.any_thread)?;
        let mut events = WindowEvents::new(config);

        for _ in 0..OPEN_ATTEMPTS {
            let status = event_loop.pump_app_events(Some(OPEN_POLL), &mut events);

            if let Some(err) = events.create_error.take() {
                return Err(err);
            }
            if let Some(window) = events.window.clone() {
                log::debug!("window {:?} opened at {:?}", window.id(), window.inner_size());
                return Ok(Self {
                    events,
                    window,
                    event_loop,
                });
            }
            if let PumpStatus::Exit(code) = status {
                anyhow::bail!("event loop exited with code {code} before the window opened");
            }
        }

        anyhow::bail!("timed out waiting for the window to open")
    }

    /// Drains pending window events without blocking.
    pub fn pump(&mut self) -> Pumped {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.events);

        if let PumpStatus::Exit(code) = status {
            log::debug!("event loop exited with code {code}");
            self.events.close_requested = true;
        }

        Pumped {
            resized: self.events.resized.take(),
        }
    }

    /// Whether the user asked to close the window.
    #[inline]
    pub fn close_requested(&self) -> bool {
        self.events.close_requested
    }

    #[inline]
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

fn build_event_loop(any_thread: bool) -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();

    #[cfg(all(
        unix,
        not(any(target_os = "macos", target_os = "ios", target_os = "android"))
    ))]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_any_thread(any_thread);
    }

    #[cfg(target_os = "windows")]
    {
        use winit::platform::windows::EventLoopBuilderExtWindows;
        builder.with_any_thread(any_thread);
    }

    #[cfg(not(any(
        all(
            unix,
            not(any(target_os = "macos", target_os = "ios", target_os = "android"))
        ),
        target_os = "windows"
    )))]
    let _ = any_thread;

    builder.build().context("failed to create winit EventLoop")
}

/// Event handler state shared across pumps.
struct WindowEvents {
    config: WindowConfig,
    window: Option<Arc<Window>>,
    create_error: Option<anyhow::Error>,
    close_requested: bool,
    resized: Option<PhysicalSize<u32>>,
}

impl WindowEvents {
    fn new(config: WindowConfig) -> Self {
        Self {
            config,
            window: None,
            create_error: None,
            close_requested: false,
            resized: None,
        }
    }
}

impl ApplicationHandler for WindowEvents {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(self.config.resizable);

        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                self.create_error = Some(anyhow::Error::new(e).context("failed to create window"))
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(window) = &self.window else {
            return;
        };
        if window.id() != window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::debug!("close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => self.resized = Some(size),
            WindowEvent::ScaleFactorChanged { .. } => self.resized = Some(window.inner_size()),
            _ => {}
        }
    }
}
