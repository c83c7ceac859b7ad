// Application state management
//
// This module contains the dashboard controller: the user list, search and
// limit fields, request bookkeeping for IP-history fetches, and the renderer
// and presenter that display the selected user's details.

pub mod config;
pub mod event;
pub mod fetch;

pub use config::{DashboardConfig, LimitInput, TABLE_PAGE_ROWS};
pub use fetch::{FetchOutcome, Fetcher, HttpFetcher, RequestTicket};

use crate::sighting::User;
use crate::ui::map::MapEngine;
use crate::ui::presenter::TerminalPresenter;
use crate::view::Renderer;
use ratatui::widgets::ListState;
use tracing::{debug, info, warn};

/// Loading state of the user list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsersStatus {
    Loading,
    Loaded,
    Failed(String),
}

/// Which field keyboard input goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the user search filter
    Search,
    /// Editing the history limit
    Limit,
}

/// Main application state
pub struct AppState {
    /// Whether the application is running
    pub running: bool,

    /// All users returned by the backend
    pub users: Vec<User>,

    pub users_status: UsersStatus,

    /// Raw search filter as typed
    pub search: String,

    /// Selection within the filtered user list
    pub user_list_state: ListState,

    pub limit_input: LimitInput,

    pub input_mode: InputMode,

    /// Field text to restore when an edit is cancelled
    edit_backup: Option<String>,

    pub renderer: Renderer,

    pub presenter: TerminalPresenter,

    fetcher: Box<dyn Fetcher>,

    /// Sequence number of the next IP-history request
    next_seq: u64,

    /// The only request whose response may still be displayed
    latest_ticket: Option<RequestTicket>,
}

impl AppState {
    /// Create the dashboard and start loading the user list
    pub fn new(config: &DashboardConfig, mut fetcher: Box<dyn Fetcher>) -> Self {
        fetcher.request_users();
        Self {
            running: true,
            users: Vec::new(),
            users_status: UsersStatus::Loading,
            search: String::new(),
            user_list_state: ListState::default(),
            limit_input: LimitInput::new(config.default_limit),
            input_mode: InputMode::Normal,
            edit_backup: None,
            renderer: Renderer::new(),
            presenter: TerminalPresenter::new(MapEngine::new(config.map_enabled)),
            fetcher,
            next_seq: 0,
            latest_ticket: None,
        }
    }

    /// Drain completed requests (called every tick)
    pub fn on_tick(&mut self) {
        for outcome in self.fetcher.poll() {
            self.handle_outcome(outcome);
        }
    }

    /// Apply one completed request
    pub fn handle_outcome(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Users(Ok(users)) => {
                info!(count = users.len(), "Loaded users");
                self.users = users;
                self.users_status = UsersStatus::Loaded;
                self.clamp_selection();
            }
            FetchOutcome::Users(Err(e)) => {
                warn!(error = %e, "Failed to load users");
                self.users_status = UsersStatus::Failed(e.to_string());
            }
            FetchOutcome::UserIps {
                ticket,
                user,
                result,
            } => {
                if self.latest_ticket != Some(ticket) {
                    debug!(
                        seq = ticket.seq,
                        user_id = ticket.user_id,
                        "Discarding stale IP history response"
                    );
                    return;
                }
                match result {
                    Ok(records) => {
                        info!(user_id = user.user_id, records = records.len(), "Loaded IP history");
                        self.renderer.accept(user, records, &mut self.presenter);
                    }
                    Err(e) => {
                        warn!(user_id = user.user_id, error = %e, "Failed to load IP history");
                        self.renderer.fail(&user, e.to_string(), &mut self.presenter);
                    }
                }
            }
        }
    }

    /// Users matching the search filter, in backend order
    pub fn filtered_users(&self) -> Vec<&User> {
        let filter = self.search.trim().to_lowercase();
        self.users.iter().filter(|u| u.matches(&filter)).collect()
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_users().len();
        match self.user_list_state.selected() {
            _ if len == 0 => self.user_list_state.select(None),
            Some(idx) if idx >= len => self.user_list_state.select(Some(len - 1)),
            None => self.user_list_state.select(Some(0)),
            Some(_) => {}
        }
    }

    /// Move the highlight up in the filtered list
    pub fn select_previous_user(&mut self) {
        let len = self.filtered_users().len();
        if len == 0 {
            self.user_list_state.select(None);
            return;
        }
        let idx = match self.user_list_state.selected() {
            None => len - 1,
            Some(idx) => idx.saturating_sub(1),
        };
        self.user_list_state.select(Some(idx));
    }

    /// Move the highlight down in the filtered list
    pub fn select_next_user(&mut self) {
        let len = self.filtered_users().len();
        if len == 0 {
            self.user_list_state.select(None);
            return;
        }
        let idx = match self.user_list_state.selected() {
            None => 0,
            Some(idx) => (idx + 1).min(len - 1),
        };
        self.user_list_state.select(Some(idx));
    }

    /// Load the details of the highlighted user
    pub fn select_highlighted(&mut self) {
        let user = self
            .user_list_state
            .selected()
            .and_then(|idx| self.filtered_users().get(idx).map(|u| (*u).clone()));
        if let Some(user) = user {
            self.load_user_ips(user);
        }
    }

    /// Load the details of the user with `user_id`
    pub fn select_user(&mut self, user_id: u64) {
        let user = self
            .users
            .iter()
            .find(|u| u.user_id == user_id)
            .cloned()
            .unwrap_or_else(|| User::new(user_id));
        self.load_user_ips(user);
    }

    /// Start a history fetch for `user`, superseding any fetch in flight
    pub fn load_user_ips(&mut self, user: User) {
        let limit = self.limit_input.effective();
        self.next_seq += 1;
        let ticket = RequestTicket {
            seq: self.next_seq,
            user_id: user.user_id,
        };
        self.latest_ticket = Some(ticket);

        info!(user_id = user.user_id, limit, seq = ticket.seq, "Loading IP history");
        if self.renderer.state().active_user_id != Some(user.user_id) {
            self.presenter.reset_scroll();
        }
        self.renderer.begin_fetch(&user, &mut self.presenter);
        self.fetcher.request_user_ips(ticket, user, limit);
    }

    /// Re-fetch what the dashboard shows
    ///
    /// Retries the user list when it failed or no user is active yet, then
    /// re-fetches the active user's history.
    pub fn reload(&mut self) {
        let no_active_user = self.renderer.state().active_user_id.is_none();
        let users_failed = matches!(self.users_status, UsersStatus::Failed(_));
        if users_failed || (no_active_user && self.users_status != UsersStatus::Loading) {
            self.reload_users();
        }
        self.reload_user_ips();
    }

    /// Start a fresh user-list fetch
    pub fn reload_users(&mut self) {
        info!("Loading users");
        self.users_status = UsersStatus::Loading;
        self.fetcher.request_users();
    }

    /// Re-fetch the active user's history; no-op before a user was selected
    pub fn reload_user_ips(&mut self) {
        let Some(user_id) = self.renderer.state().active_user_id else {
            return;
        };
        let user = self
            .renderer
            .state()
            .current_user
            .clone()
            .filter(|u| u.user_id == user_id);
        match user {
            Some(user) => self.load_user_ips(user),
            None => self.select_user(user_id),
        }
    }

    pub fn toggle_color(&mut self) {
        self.renderer.toggle_color(&mut self.presenter);
    }

    pub fn toggle_view(&mut self) {
        self.renderer.toggle_view(&mut self.presenter);
    }

    /// Scroll the details table by `delta` rows
    pub fn scroll_details(&mut self, delta: isize) {
        self.presenter.scroll_by(delta);
        // A different row is under the pointer now
        self.renderer.tooltip_mut().hide();
    }

    // ========================================================================
    // Edit modes
    // ========================================================================

    pub fn begin_search(&mut self) {
        self.edit_backup = Some(self.search.clone());
        self.input_mode = InputMode::Search;
    }

    pub fn begin_limit_edit(&mut self) {
        self.edit_backup = Some(self.limit_input.text().to_string());
        self.input_mode = InputMode::Limit;
    }

    /// Typed character in the active field
    pub fn input_char(&mut self, ch: char) {
        match self.input_mode {
            InputMode::Search => {
                self.search.push(ch);
                self.clamp_selection();
            }
            InputMode::Limit => self.limit_input.push(ch),
            InputMode::Normal => {}
        }
    }

    pub fn input_backspace(&mut self) {
        match self.input_mode {
            InputMode::Search => {
                self.search.pop();
                self.clamp_selection();
            }
            InputMode::Limit => self.limit_input.pop(),
            InputMode::Normal => {}
        }
    }

    /// Finish editing; a committed limit reloads the active user
    pub fn commit_input(&mut self) {
        let mode = std::mem::take(&mut self.input_mode);
        self.edit_backup = None;
        if mode == InputMode::Limit {
            let limit = self.limit_input.effective();
            debug!(limit, "Limit committed");
            self.reload_user_ips();
        }
    }

    /// Abandon editing and restore the field
    pub fn cancel_input(&mut self) {
        let mode = std::mem::take(&mut self.input_mode);
        if let Some(previous) = self.edit_backup.take() {
            match mode {
                InputMode::Search => {
                    self.search = previous;
                    self.clamp_selection();
                }
                InputMode::Limit => self.limit_input.set_text(previous),
                InputMode::Normal => {}
            }
        }
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    /// Pointer moved to a terminal cell
    pub fn pointer_moved(&mut self, column: u16, row: u16) {
        match self.presenter.ip_cell_at(column, row) {
            Some((cell, attrs)) => {
                let attrs = attrs.clone();
                self.renderer
                    .tooltip_mut()
                    .show(cell, &attrs, i32::from(column), i32::from(row));
            }
            None => self.renderer.tooltip_mut().hide(),
        }
        if let Some(surface) = self.presenter.surface_mut() {
            surface.pointer(column, row, false);
        }
    }

    /// Left click on a terminal cell
    pub fn pointer_clicked(&mut self, column: u16, row: u16) {
        if let Some(surface) = self.presenter.surface_mut() {
            surface.pointer(column, row, true);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::sighting::fixtures::external;
    use crate::view::{CellRef, DetailsBody, IpCellAttrs};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Requests recorded by a ScriptedFetcher
    #[derive(Debug, Default)]
    pub(crate) struct Requests {
        pub users: usize,
        pub user_ips: Vec<(RequestTicket, u32)>,
    }

    /// Fetcher that records requests and replays queued outcomes
    #[derive(Default)]
    pub(crate) struct ScriptedFetcher {
        pub requests: Rc<RefCell<Requests>>,
        pub queued: Rc<RefCell<Vec<FetchOutcome>>>,
    }

    impl Fetcher for ScriptedFetcher {
        fn request_users(&mut self) {
            self.requests.borrow_mut().users += 1;
        }

        fn request_user_ips(&mut self, ticket: RequestTicket, _user: User, limit: u32) {
            self.requests.borrow_mut().user_ips.push((ticket, limit));
        }

        fn poll(&mut self) -> Vec<FetchOutcome> {
            std::mem::take(&mut *self.queued.borrow_mut())
        }
    }

    pub(crate) fn user(id: u64, name: &str) -> User {
        User {
            username: Some(name.to_string()),
            ..User::new(id)
        }
    }

    pub(crate) fn test_app() -> (AppState, Rc<RefCell<Requests>>, Rc<RefCell<Vec<FetchOutcome>>>) {
        let fetcher = ScriptedFetcher::default();
        let requests = fetcher.requests.clone();
        let queued = fetcher.queued.clone();
        let mut app = AppState::new(&DashboardConfig::default(), Box::new(fetcher));
        app.handle_outcome(FetchOutcome::Users(Ok(vec![
            user(1, "anna"),
            user(2, "bob"),
            User {
                friendly_name: Some("Carla Admin".to_string()),
                ..user(3, "carla")
            },
        ])));
        (app, requests, queued)
    }

    fn mounted_body(app: &AppState) -> DetailsBody {
        app.presenter.mounted().unwrap().body.clone()
    }

    #[test]
    fn test_users_requested_at_startup() {
        let (app, requests, _) = test_app();
        assert_eq!(requests.borrow().users, 1);
        assert_eq!(app.users_status, UsersStatus::Loaded);
        assert_eq!(app.user_list_state.selected(), Some(0));
    }

    #[test]
    fn test_user_list_failure() {
        let fetcher = ScriptedFetcher::default();
        let mut app = AppState::new(&DashboardConfig::default(), Box::new(fetcher));
        assert_eq!(app.users_status, UsersStatus::Loading);

        app.handle_outcome(FetchOutcome::Users(Err(ApiError::Status {
            status: 503,
            body: "down".to_string(),
        })));
        assert_eq!(app.users_status, UsersStatus::Failed("HTTP 503: down".to_string()));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let (mut app, requests, queued) = test_app();

        app.select_user(1);
        app.select_user(2);
        let (first, _) = requests.borrow().user_ips[0];
        let (second, _) = requests.borrow().user_ips[1];
        assert!(second.seq > first.seq);

        // The superseded response arrives last
        queued.borrow_mut().push(FetchOutcome::UserIps {
            ticket: second,
            user: user(2, "bob"),
            result: Ok(vec![external("2.2.2.2", "Paris", "FR", 1)]),
        });
        queued.borrow_mut().push(FetchOutcome::UserIps {
            ticket: first,
            user: user(1, "anna"),
            result: Ok(vec![external("1.1.1.1", "Berlin", "DE", 1)]),
        });
        app.on_tick();

        let state = app.renderer.state();
        assert_eq!(state.active_user_id, Some(2));
        assert_eq!(
            state.current_records[0].ip_address.as_deref(),
            Some("2.2.2.2")
        );
    }

    #[test]
    fn test_failed_fetch_shows_error() {
        let (mut app, requests, _) = test_app();
        app.select_user(1);
        let (ticket, _) = requests.borrow().user_ips[0];

        app.handle_outcome(FetchOutcome::UserIps {
            ticket,
            user: user(1, "anna"),
            result: Err(ApiError::Decode("expected value".to_string())),
        });
        assert!(matches!(mounted_body(&app), DetailsBody::Failed { .. }));
    }

    #[test]
    fn test_loading_shown_while_in_flight() {
        let (mut app, _, _) = test_app();
        app.select_user(1);
        assert_eq!(mounted_body(&app), DetailsBody::Loading);
    }

    #[test]
    fn test_reload_without_active_user_refreshes_users() {
        let (mut app, requests, _) = test_app();
        app.reload();
        assert_eq!(requests.borrow().users, 2);
        assert_eq!(app.users_status, UsersStatus::Loading);
        assert!(requests.borrow().user_ips.is_empty());
        assert!(app.presenter.mounted().is_none());
    }

    #[test]
    fn test_reload_retries_failed_user_list() {
        let fetcher = ScriptedFetcher::default();
        let requests = fetcher.requests.clone();
        let mut app = AppState::new(&DashboardConfig::default(), Box::new(fetcher));
        app.handle_outcome(FetchOutcome::Users(Err(ApiError::Status {
            status: 503,
            body: "down".to_string(),
        })));

        app.reload();
        assert_eq!(requests.borrow().users, 2);
        assert_eq!(app.users_status, UsersStatus::Loading);

        app.handle_outcome(FetchOutcome::Users(Ok(vec![user(1, "anna")])));
        assert_eq!(app.users_status, UsersStatus::Loaded);
        assert_eq!(app.users.len(), 1);
    }

    #[test]
    fn test_reload_with_active_user_keeps_user_list() {
        let (mut app, requests, _) = test_app();
        app.select_user(2);
        app.reload();

        assert_eq!(requests.borrow().users, 1);
        assert_eq!(requests.borrow().user_ips.len(), 2);
        assert_eq!(requests.borrow().user_ips[1].0.user_id, 2);
    }

    #[test]
    fn test_reload_while_users_loading_does_not_duplicate() {
        let fetcher = ScriptedFetcher::default();
        let requests = fetcher.requests.clone();
        let mut app = AppState::new(&DashboardConfig::default(), Box::new(fetcher));
        app.reload();
        assert_eq!(requests.borrow().users, 1);
    }

    #[test]
    fn test_committed_limit_without_active_user_fetches_nothing() {
        let (mut app, requests, _) = test_app();
        app.begin_limit_edit();
        app.input_char('0');
        app.commit_input();

        assert_eq!(requests.borrow().users, 1);
        assert!(requests.borrow().user_ips.is_empty());
    }

    #[test]
    fn test_scrolling_hides_tooltip() {
        let (mut app, requests, _) = test_app();
        app.select_user(1);
        let (ticket, _) = requests.borrow().user_ips[0];
        app.handle_outcome(FetchOutcome::UserIps {
            ticket,
            user: user(1, "anna"),
            result: Ok(vec![external("1.1.1.1", "Berlin", "DE", 1)]),
        });

        let cell = CellRef { cycle: 1, row: 0 };
        let attrs = IpCellAttrs {
            ip: "1.1.1.1".to_string(),
            ..Default::default()
        };
        app.renderer.tooltip_mut().show(cell, &attrs, 10, 4);
        assert!(app.renderer.tooltip().visible().is_some());

        app.scroll_details(TABLE_PAGE_ROWS as isize);
        assert!(app.renderer.tooltip().visible().is_none());
    }

    #[test]
    fn test_invalid_limit_normalized_on_reload() {
        let (mut app, requests, _) = test_app();
        app.select_user(1);
        app.limit_input.set_text("-5");
        app.reload();

        let (ticket, limit) = requests.borrow().user_ips[1];
        assert_eq!(limit, 50);
        assert_eq!(ticket.user_id, 1);
        assert_eq!(app.limit_input.text(), "50");
    }

    #[test]
    fn test_toggles_do_not_refetch() {
        let (mut app, requests, _) = test_app();
        app.select_user(1);
        let (ticket, _) = requests.borrow().user_ips[0];
        app.handle_outcome(FetchOutcome::UserIps {
            ticket,
            user: user(1, "anna"),
            result: Ok(vec![external("1.1.1.1", "Berlin", "DE", 1)]),
        });

        app.toggle_color();
        app.toggle_view();
        app.toggle_view();

        assert_eq!(requests.borrow().user_ips.len(), 1);
        assert!(!app.renderer.state().color_mode);
        assert!(matches!(mounted_body(&app), DetailsBody::Ready { .. }));
    }

    #[test]
    fn test_search_filters_case_insensitively() {
        let (mut app, _, _) = test_app();
        app.begin_search();
        for ch in "ADMIN".chars() {
            app.input_char(ch);
        }
        let names: Vec<u64> = app.filtered_users().iter().map(|u| u.user_id).collect();
        assert_eq!(names, vec![3]);
        assert_eq!(app.user_list_state.selected(), Some(0));

        app.input_char('x');
        assert!(app.filtered_users().is_empty());
        assert_eq!(app.user_list_state.selected(), None);
    }

    #[test]
    fn test_cancelled_search_restores_filter() {
        let (mut app, _, _) = test_app();
        app.begin_search();
        app.input_char('b');
        app.commit_input();
        assert_eq!(app.search, "b");

        app.begin_search();
        app.input_char('x');
        app.cancel_input();
        assert_eq!(app.search, "b");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_committed_limit_reloads_active_user() {
        let (mut app, requests, _) = test_app();
        app.select_user(2);
        app.begin_limit_edit();
        app.input_backspace();
        app.input_backspace();
        app.input_char('7');
        app.commit_input();

        let (ticket, limit) = requests.borrow().user_ips[1];
        assert_eq!(limit, 7);
        assert_eq!(ticket.user_id, 2);
    }

    #[test]
    fn test_select_highlighted_uses_filtered_list() {
        let (mut app, requests, _) = test_app();
        app.search = "bob".to_string();
        app.user_list_state.select(Some(0));
        app.select_highlighted();

        assert_eq!(requests.borrow().user_ips[0].0.user_id, 2);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let (mut app, _, _) = test_app();
        app.select_previous_user();
        assert_eq!(app.user_list_state.selected(), Some(0));
        for _ in 0..5 {
            app.select_next_user();
        }
        assert_eq!(app.user_list_state.selected(), Some(2));
    }
}
