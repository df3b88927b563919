//! Action executor binding the state machine to a host.
//!
//! [`Runtime`] owns a [`DiscoveryState`], a [`Host`] and a [`Scheduler`]. It
//! feeds events to [`handle_event`] and executes the returned actions in
//! order: requests and notifications go to the host, timers go to the
//! scheduler, and a replaced query is written to the host's URL and fed back
//! as a `RouteChanged` event within the same dispatch.
//!
//! ```rust
//! use campus_discovery::api::{ApiRequest, RequestId, Route};
//! use campus_discovery::app::{DiscoveryState, Notification};
//! use campus_discovery::infrastructure::VirtualScheduler;
//! use campus_discovery::runtime::{Host, Runtime};
//! use campus_discovery::{initialize, Config, SessionContext};
//!
//! #[derive(Default)]
//! struct Log(Vec<String>);
//!
//! impl Host for Log {
//!     fn send(&mut self, _id: RequestId, _request: &ApiRequest, route: Route) {
//!         self.0.push(route.url());
//!     }
//!     fn notify(&mut self, notification: &Notification) {
//!         self.0.push(notification.message.clone());
//!     }
//!     fn replace_query(&mut self, query: &str) {
//!         self.0.push(format!("?{query}"));
//!     }
//!     fn render(&mut self, _state: &DiscoveryState) {}
//! }
//!
//! let state = initialize(&Config::default(), SessionContext::anonymous());
//! let mut runtime = Runtime::new(state, Log::default(), VirtualScheduler::new());
//! runtime.start("search=hackathon");
//!
//! assert_eq!(runtime.host().0, vec!["/api/events?page=1&page_size=12&search=hackathon&sort=time"]);
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use crate::api::{ApiRequest, ApiResponse, RequestId, Route};
use crate::app::{handle_event, Action, DiscoveryState, Event, Notification};
use crate::domain::ApiFailure;
use crate::infrastructure::{Scheduler, TimerToken, VirtualScheduler};

/// The embedding application: transport, router, notifications and view.
pub trait Host {
    /// Starts a backend request. Its completion must be reported through
    /// [`Runtime::complete`] with the same `id`.
    fn send(&mut self, id: RequestId, request: &ApiRequest, route: Route);

    /// Shows a transient message.
    fn notify(&mut self, notification: &Notification);

    /// Replaces the URL query string without adding a history entry.
    fn replace_query(&mut self, query: &str);

    /// Redraws the view from `state`.
    fn render(&mut self, state: &DiscoveryState);
}

/// Drives a [`DiscoveryState`] against a host and a scheduler.
#[derive(Debug)]
pub struct Runtime<H, S> {
    state: DiscoveryState,
    host: H,
    scheduler: S,
}

impl<H: Host, S: Scheduler> Runtime<H, S> {
    pub const fn new(state: DiscoveryState, host: H, scheduler: S) -> Self {
        Self {
            state,
            host,
            scheduler,
        }
    }

    /// Loads the view for the initial URL query.
    pub fn start(&mut self, query: &str) -> bool {
        self.dispatch(Event::RouteChanged {
            query: query.to_string(),
        })
    }

    /// Handles `event` and everything it feeds back, then renders once if
    /// anything visible changed. Returns whether a render happened.
    pub fn dispatch(&mut self, event: Event) -> bool {
        let mut queue = VecDeque::from([event]);
        let mut render = false;

        while let Some(event) = queue.pop_front() {
            match handle_event(&mut self.state, &event) {
                Ok((should_render, actions)) => {
                    tracing::debug!(
                        event = event.name(),
                        action_count = actions.len(),
                        should_render,
                        "event handled"
                    );
                    render |= should_render;
                    for action in actions {
                        if let Some(follow_up) = self.execute_action(action) {
                            queue.push_back(follow_up);
                        }
                    }
                }
                Err(e) => tracing::debug!(event = event.name(), error = %e, "error handling event"),
            }
        }

        if render {
            self.host.render(&self.state);
        }
        render
    }

    /// Reports the completion of a request started through [`Host::send`].
    pub fn complete(&mut self, id: RequestId, outcome: Result<ApiResponse, ApiFailure>) -> bool {
        self.dispatch(Event::Response { id, outcome })
    }

    /// Delivers expired timers in order.
    pub fn fire(&mut self, tokens: Vec<TimerToken>) -> bool {
        tokens
            .into_iter()
            .fold(false, |render, token| self.dispatch(Event::TimerFired { token }) | render)
    }

    fn execute_action(&mut self, action: Action) -> Option<Event> {
        match action {
            Action::Send { id, request } => {
                let route = request.route(&self.state.config.api_base);
                tracing::debug!(request = id.0, kind = request.name(), url = %route.url(), "sending request");
                self.host.send(id, &request, route);
                None
            }
            Action::ReplaceQuery { query } => {
                self.host.replace_query(&query);
                Some(Event::RouteChanged { query })
            }
            Action::Schedule { token, delay } => {
                self.scheduler.schedule(delay, token);
                None
            }
            Action::Cancel { token } => {
                self.scheduler.cancel(token);
                None
            }
            Action::Notify(notification) => {
                self.host.notify(&notification);
                None
            }
        }
    }

    pub const fn state(&self) -> &DiscoveryState {
        &self.state
    }

    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn into_parts(self) -> (DiscoveryState, H, S) {
        (self.state, self.host, self.scheduler)
    }
}

impl<H: Host> Runtime<H, VirtualScheduler> {
    /// Advances virtual time and delivers every timer that expired.
    pub fn advance(&mut self, by: Duration) -> bool {
        let due = self.scheduler.advance(by);
        self.fire(due)
    }
}
