//! Application state machine and the terminal loop

use crate::{
    error::{AppError, Result},
    events::{self, Action},
    inspector::ExchangeStore,
    logging::Logger,
    navigation::Navigator,
    probe::RequestDispatcher,
    state::ScreenState,
    types::FocusTarget,
    ui::{self, ScreenLayout, ScreenView, Theme},
};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::watch;

/// Everything the screen loop owns
pub struct App {
    pub running: bool,
    pub focus: FocusTarget,
    pub show_inspector: bool,
    receiver: watch::Receiver<ScreenState>,
    screen: ScreenState,
    dispatcher: RequestDispatcher,
    navigator: Navigator,
    store: Option<ExchangeStore>,
    layout: ScreenLayout,
    theme: Theme,
    logger: Logger,
}

impl App {
    pub fn new(
        dispatcher: RequestDispatcher,
        navigator: Navigator,
        store: Option<ExchangeStore>,
        theme: Theme,
        logger: Logger,
    ) -> Self {
        let receiver = dispatcher.state().subscribe();
        let screen = receiver.borrow().clone();
        Self {
            running: true,
            focus: FocusTarget::default(),
            show_inspector: false,
            receiver,
            screen,
            dispatcher,
            navigator,
            store,
            layout: ScreenLayout::default(),
            theme,
            logger,
        }
    }

    /// State as of the last refresh
    pub fn screen(&self) -> &ScreenState {
        &self.screen
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn inspector_available(&self) -> bool {
        self.store.is_some()
    }

    /// Pull the newest published state; returns whether anything changed
    pub fn refresh(&mut self) -> bool {
        match self.receiver.has_changed() {
            Ok(true) => {
                self.screen = self.receiver.borrow_and_update().clone();
                true
            }
            _ => false,
        }
    }

    /// Start a measurement without waiting for it
    pub fn press_request(&mut self) {
        self.focus = FocusTarget::RequestButton;
        self.dispatcher.dispatch();
    }

    /// Hand the channel URL to the platform
    pub fn press_channel(&mut self) {
        self.focus = FocusTarget::ChannelButton;
        if let Err(e) = self.navigator.open_channel() {
            self.log_failure(&e);
            self.dispatcher.state().report_error(e.short_message());
        }
    }

    pub fn activate_focused(&mut self) {
        match self.focus {
            FocusTarget::RequestButton => self.press_request(),
            FocusTarget::ChannelButton => self.press_channel(),
        }
    }

    pub fn toggle_inspector(&mut self) {
        if self.inspector_available() {
            self.show_inspector = !self.show_inspector;
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Request => self.press_request(),
            Action::OpenChannel => self.press_channel(),
            Action::ActivateFocused => self.activate_focused(),
            Action::CycleFocus => self.focus = self.focus.toggle(),
            Action::Press(FocusTarget::RequestButton) => self.press_request(),
            Action::Press(FocusTarget::ChannelButton) => self.press_channel(),
            Action::ToggleInspector => self.toggle_inspector(),
            Action::Quit => self.quit(),
        }
    }

    /// Draw one frame and remember where the buttons landed
    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let records = match (&self.store, self.show_inspector) {
            (Some(store), true) => Some(store.recent()),
            _ => None,
        };

        let view = ScreenView {
            state: &self.screen,
            focus: self.focus,
            theme: self.theme,
            inspector_available: self.inspector_available(),
            inspector_records: records.as_deref(),
        };

        let mut layout = self.layout;
        terminal
            .draw(|frame| layout = ui::render(frame, &view))
            .map_err(|e| AppError::terminal(format!("Failed to draw: {}", e)))?;
        self.layout = layout;
        Ok(())
    }

    fn log_failure(&self, error: &AppError) {
        let logger = self.logger.clone();
        let message = format!("Failed to open {}: {}", self.navigator.channel_url(), error);
        let category = error.category();
        self.dispatcher.runtime().spawn(async move {
            logger.warn(&message).field("error_category", category).log().await;
        });
    }
}

/// Put the terminal into raw, alternate-screen mode and run until quit
pub fn run_tui(mut app: App, tick: Duration) -> Result<()> {
    let terminal_error = |e: io::Error| AppError::terminal(e.to_string());

    enable_raw_mode().map_err(terminal_error)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(terminal_error)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).map_err(terminal_error)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = restore_terminal();
        original_hook(panic);
    }));

    let result = run_loop(&mut terminal, &mut app, tick);

    restore_terminal().map_err(terminal_error)?;
    terminal.show_cursor().map_err(terminal_error)?;

    result
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}

fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick: Duration) -> Result<()> {
    while app.running {
        app.refresh();
        app.draw(terminal)?;

        // The tick bounds how stale a published measurement can look
        if let Some(event) = events::poll_event(tick)? {
            if let Some(action) = events::map_event(&event, app.layout()) {
                app.apply(action);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        client::{HttpClient, HttpRequest, HttpResponse},
        logging::{LogSink, LoggerFactory},
        models::{Config, Latency},
        navigation::{tests::RecordingOpener, UrlOpener},
        probe::LatencyProbe,
        state::LatencyState,
    };
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::runtime::Handle;

    struct SlowClient(Duration);

    #[async_trait]
    impl HttpClient for SlowClient {
        async fn execute_request(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.get(&request.url).await
        }

        async fn get(&self, url: &str) -> Result<HttpResponse> {
            tokio::time::sleep(self.0).await;
            Ok(HttpResponse {
                status_code: 200,
                headers: Vec::new(),
                body: b"{}".to_vec(),
                elapsed: self.0,
                final_url: url.to_string(),
            })
        }
    }

    struct BrokenOpener;

    impl UrlOpener for BrokenOpener {
        fn open(&self, _url: &str) -> Result<()> {
            Err(AppError::navigation("no handler"))
        }
    }

    fn app_with(opener: Arc<dyn UrlOpener>, delay: Duration) -> App {
        let loggers = LoggerFactory::new(Config::default(), LogSink::Discard);
        let probe = LatencyProbe::new(Arc::new(SlowClient(delay)), crate::defaults::TARGET_URL);
        let dispatcher = RequestDispatcher::new(probe, LatencyState::new(), Handle::current(), &loggers);
        let navigator = Navigator::new(opener, crate::defaults::CHANNEL_URL);
        App::new(dispatcher, navigator, None, Theme::new(false), loggers.create_logger("APP"))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_request_press_does_not_block() {
        let mut app = app_with(Arc::new(RecordingOpener::default()), Duration::from_millis(300));

        let started = Instant::now();
        app.apply(Action::Request);
        assert!(started.elapsed() < Duration::from_millis(100));

        assert!(app.refresh());
        assert!(app.screen().is_busy());
        assert!(app.screen().latency.is_none());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(app.refresh());
        assert!(app.screen().latency.unwrap().as_millis() >= 300);
        assert!(!app.screen().is_busy());
    }

    #[tokio::test]
    async fn test_channel_button_opens_exact_url() {
        let opener = Arc::new(RecordingOpener::default());
        let mut app = app_with(opener.clone(), Duration::ZERO);

        app.apply(Action::Press(FocusTarget::ChannelButton));

        assert_eq!(app.focus, FocusTarget::ChannelButton);
        assert_eq!(
            opener.opened.lock().unwrap().as_slice(),
            ["https://www.youtube.com/@Nerdy.Things"]
        );
        // Navigation does not touch the measurement state
        app.refresh();
        assert_eq!(app.screen(), &ScreenState::default());
    }

    #[tokio::test]
    async fn test_navigation_failure_is_shown() {
        let mut app = app_with(Arc::new(BrokenOpener), Duration::ZERO);

        app.apply(Action::OpenChannel);

        assert!(app.refresh());
        assert_eq!(app.screen().last_error.as_deref(), Some("navigation failed: no handler"));
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_focus_cycle_and_activate() {
        let opener = Arc::new(RecordingOpener::default());
        let mut app = app_with(opener.clone(), Duration::ZERO);

        assert_eq!(app.focus, FocusTarget::RequestButton);
        app.apply(Action::CycleFocus);
        assert_eq!(app.focus, FocusTarget::ChannelButton);
        app.apply(Action::ActivateFocused);
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_inspector_toggle_requires_profiler() {
        let mut app = app_with(Arc::new(RecordingOpener::default()), Duration::ZERO);
        app.apply(Action::ToggleInspector);
        assert!(!app.show_inspector);

        app.store = Some(ExchangeStore::new(4));
        app.apply(Action::ToggleInspector);
        assert!(app.show_inspector);
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app_with(Arc::new(RecordingOpener::default()), Duration::ZERO);
        app.apply(Action::Quit);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_draw_records_layout_and_shows_latency() {
        let mut app = app_with(Arc::new(RecordingOpener::default()), Duration::ZERO);
        app.dispatcher.state().publish(Latency::from_millis(123));
        app.refresh();

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        app.draw(&mut terminal).unwrap();

        assert!(app.layout().request_button.width > 0);
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("The latest request took 123 ms"));
    }
}
