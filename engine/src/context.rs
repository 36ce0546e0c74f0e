use std::time::Instant;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::WindowId,
};

use crate::audio::Mixer;
use crate::config::Config;
use crate::error::{Result, ShellError};
use crate::lifecycle::{InitStage, Ledger, Lifecycle, Phase, Resource, Tracked};
use crate::shell::{self, Shell};

enum State {
    /// Headless subsystems are up; waiting for the platform to allow a window.
    Init(Option<Tracked<Mixer>>),
    Ready(Box<Shell>),
    Failed,
    Done,
}

struct App {
    config: Config,
    state: State,
    lifecycle: Lifecycle,
    ledger: Ledger,
    failure: Option<ShellError>,
}

impl App {
    fn new(config: Config, mixer: Tracked<Mixer>, lifecycle: Lifecycle, ledger: Ledger) -> Self {
        Self {
            config,
            state: State::Init(Some(mixer)),
            lifecycle,
            ledger,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: ShellError) {
        self.state = State::Failed;
        if let Err(phase_err) = self.lifecycle.advance(Phase::InitFailed) {
            error!("{phase_err}");
        }
        self.failure = Some(err);
        event_loop.exit();
    }

    fn shut_down(&mut self) {
        if let State::Ready(shell) = std::mem::replace(&mut self.state, State::Done) {
            if let Err(err) = self.lifecycle.advance(Phase::ShuttingDown) {
                error!("{err}");
            }
            info!("Releasing resources");
            drop(shell);
            if let Err(err) = self.lifecycle.advance(Phase::Terminated) {
                error!("{err}");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let State::Init(mixer) = &mut self.state else {
            return;
        };
        let Some(mixer) = mixer.take() else {
            return;
        };

        match Shell::launch(event_loop, self.config.clone(), mixer, &self.ledger) {
            Ok(shell) => {
                self.state = State::Ready(Box::new(shell));
                if let Err(err) = self.lifecycle.advance(Phase::Running) {
                    self.fail(event_loop, err);
                }
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let State::Ready(shell) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => shell.resized(size),
            WindowEvent::RedrawRequested => shell.render(),
            ref other => {
                if let Some(command) = shell.config().keys.translate(other) {
                    if !shell.handle(command) {
                        info!("Quit requested");
                        event_loop.exit();
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let State::Ready(shell) = &self.state else {
            return;
        };
        if !shell.controller().is_running() {
            return;
        }
        if Instant::now() >= shell.next_frame() {
            shell.window().request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(shell.next_frame()));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shut_down();
    }
}

/// Owns the event loop and the app driven by it.
pub struct ShellContext {
    event_loop: EventLoop<()>,
    app: App,
}

impl ShellContext {
    /// Bring up video, image, audio and font support, in that order.
    pub fn new(config: Config) -> Result<Self> {
        let ledger = Ledger::default();
        let mut lifecycle = Lifecycle::default();
        lifecycle.advance(Phase::Initializing)?;

        let brought_up = Self::bring_up(&config, &ledger);
        let (event_loop, mixer) = match brought_up {
            Ok(parts) => parts,
            Err(err) => {
                lifecycle.advance(Phase::InitFailed)?;
                return Err(err);
            }
        };

        let app = App::new(config, mixer, lifecycle, ledger);
        Ok(Self { event_loop, app })
    }

    fn bring_up(config: &Config, ledger: &Ledger) -> Result<(EventLoop<()>, Tracked<Mixer>)> {
        let event_loop = EventLoop::new().map_err(|e| ShellError::init(InitStage::Video, e))?;
        shell::check_image_support(config)?;
        let mixer = ledger.track(Resource::AudioDevice, Mixer::open()?);
        shell::check_font_support(config)?;
        Ok((event_loop, mixer))
    }

    /// Run until the window closes. Fails if the window, surface or any
    /// asset could not be set up.
    pub fn run(self) -> Result<()> {
        let Self {
            event_loop,
            mut app,
        } = self;

        event_loop
            .run_app(&mut app)
            .map_err(|e| ShellError::init(InitStage::Video, e))?;

        match app.failure.take() {
            Some(err) => Err(err),
            None => {
                info!("Terminated cleanly");
                Ok(())
            }
        }
    }
}
