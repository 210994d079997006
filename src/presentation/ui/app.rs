//! Main application orchestrator.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::{Stream, StreamExt};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, error, info};

use super::effects::EffectRunner;
use super::screen;
use super::state::UiState;
use crate::application::services::{DEFAULT_BRIDGE_CAPACITY, NotificationBridge};
use crate::domain::notification::Notification;
use crate::domain::ports::{MessengerPort, NotificationFeedPort, NotificationPort, NotificationSink};
use crate::infrastructure::config::AppConfig;
use crate::presentation::events::AppEvent;

/// Drives typing expiry and redraws while idle.
const TICK_RATE: Duration = Duration::from_secs(1);

pub struct App {
    state: UiState,
    runner: EffectRunner,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    bridge: NotificationBridge,
    notifications_rx: mpsc::Receiver<Notification>,
    feed: Arc<dyn NotificationFeedPort>,
    feed_task: Option<JoinHandle<()>>,
}

impl App {
    #[must_use]
    pub fn new(
        config: &AppConfig,
        messenger: Arc<dyn MessengerPort>,
        feed: Arc<dyn NotificationFeedPort>,
        notifier: Arc<dyn NotificationPort>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (bridge, notifications_rx) = NotificationBridge::new(DEFAULT_BRIDGE_CAPACITY);

        Self {
            state: UiState::from_config(config),
            runner: EffectRunner::new(messenger, notifier, events_tx),
            events_rx,
            bridge,
            notifications_rx,
            feed,
            feed_task: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &UiState {
        &self.state
    }

    /// # Errors
    /// Returns error if drawing to the terminal or reading its events fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut ticks = interval(TICK_RATE);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        self.start();
        terminal.draw(|frame| self.render(frame))?;

        while !self.state.should_quit {
            let Some(event) = self.next_event(&mut terminal_events, &mut ticks).await? else {
                info!("Terminal event stream closed");
                break;
            };
            self.dispatch(event);
            terminal.draw(|frame| self.render(frame))?;
        }

        self.shutdown();
        info!(dropped = self.bridge.dropped(), "Application exiting normally");
        Ok(())
    }

    /// Connects the notification feed and requests the first conversation list.
    fn start(&mut self) {
        let feed = Arc::clone(&self.feed);
        let bridge = self.bridge.clone();
        self.feed_task = Some(tokio::spawn(async move {
            let sink: Arc<dyn NotificationSink> = Arc::new(bridge.clone());
            match feed.run(sink).await {
                Ok(()) => info!("Notification feed closed"),
                Err(e) => {
                    error!(error = %e, "Notification feed failed");
                    bridge.push(Notification::Error {
                        message: format!("Live updates stopped: {e}"),
                    });
                }
            }
        }));

        let effects = self.state.bootstrap();
        self.runner.run_all(effects);
    }

    fn shutdown(&mut self) {
        if let Some(task) = self.feed_task.take() {
            task.abort();
        }
    }

    /// Waits for the next event; notifications and backend results win ties.
    async fn next_event<S>(&mut self, terminal_events: &mut S, ticks: &mut Interval) -> io::Result<Option<AppEvent>>
    where
        S: Stream<Item = io::Result<Event>> + Unpin,
    {
        loop {
            let event = tokio::select! {
                biased;

                Some(notification) = self.notifications_rx.recv() => Some(AppEvent::from(notification)),

                Some(event) = self.events_rx.recv() => Some(event),

                terminal_event = terminal_events.next() => match terminal_event {
                    Some(Ok(event)) => AppEvent::from_terminal(event),
                    Some(Err(e)) => return Err(e),
                    None => return Ok(None),
                },

                _ = ticks.tick() => Some(AppEvent::Tick),
            };
            if let Some(event) = event {
                return Ok(Some(event));
            }
        }
    }

    fn dispatch(&mut self, event: AppEvent) {
        let effects = self.state.update(event);
        if !effects.is_empty() {
            debug!(count = effects.len(), "Running effects");
        }
        self.runner.run_all(effects);
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        screen::render(&mut self.state, area, frame.buffer_mut());
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.shutdown();
    }
}
