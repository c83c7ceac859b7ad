// Details panel renderer
//
// Owns the ViewState and drives render cycles. Every cycle builds a fresh
// DetailsView, tears the presenter's previous output down and mounts the new
// one, in that order. Presenters are swappable: the terminal UI and the HTML
// exporter both implement Presenter.

use crate::sighting::{SightingRecord, User};
use tracing::debug;

use super::details::{self, DetailsBody, DetailsView};
use super::state::ViewState;
use super::tooltip::Tooltip;

/// Display surface for rendered details
pub trait Presenter {
    /// Whether a map engine is available to this presenter
    fn map_available(&self) -> bool;

    /// Dispose everything mounted by the previous cycle (map surface,
    /// marker layer, hover targets)
    fn teardown(&mut self);

    /// Construct the display for `view`
    fn mount(&mut self, view: &DetailsView);
}

/// Transient panel state shown instead of cached records
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Loading(User),
    Failed(User, String),
}

#[derive(Debug, Default)]
pub struct Renderer {
    state: ViewState,
    pending: Option<Pending>,
    cycle: u64,
    tooltip: Tooltip,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn tooltip_mut(&mut self) -> &mut Tooltip {
        &mut self.tooltip
    }

    /// Mark `user` as active and show the loading state
    pub fn begin_fetch<P: Presenter>(&mut self, user: &User, presenter: &mut P) {
        self.state.active_user_id = Some(user.user_id);
        self.pending = Some(Pending::Loading(user.clone()));
        self.render(presenter);
    }

    /// Replace the cached dataset with a completed fetch and render it
    pub fn accept<P: Presenter>(
        &mut self,
        user: User,
        records: Vec<SightingRecord>,
        presenter: &mut P,
    ) {
        debug!(user_id = user.user_id, records = records.len(), "Accepted IP history");
        self.state.active_user_id = Some(user.user_id);
        self.state.current_user = Some(user);
        self.state.current_records = records;
        self.pending = None;
        self.render(presenter);
    }

    /// Show a fetch failure for `user` in place of the details
    pub fn fail<P: Presenter>(&mut self, user: &User, message: String, presenter: &mut P) {
        self.pending = Some(Pending::Failed(user.clone(), message));
        self.render(presenter);
    }

    /// Flip color mode and re-render from cache
    pub fn toggle_color<P: Presenter>(&mut self, presenter: &mut P) {
        self.state.color_mode = !self.state.color_mode;
        self.render(presenter);
    }

    /// Flip between table and map and re-render from cache
    pub fn toggle_view<P: Presenter>(&mut self, presenter: &mut P) {
        self.state.map_mode = !self.state.map_mode;
        self.render(presenter);
    }

    /// Run one render cycle from the current state
    ///
    /// Does nothing until a user has been selected.
    pub fn render<P: Presenter>(&mut self, presenter: &mut P) {
        let next_cycle = self.cycle + 1;
        let Some(view) = self.build(next_cycle, presenter.map_available()) else {
            return;
        };
        self.cycle = next_cycle;

        // The overlay belongs to cells of the previous cycle
        self.tooltip.hide();
        presenter.teardown();
        presenter.mount(&view);
    }

    fn build(&self, cycle: u64, map_available: bool) -> Option<DetailsView> {
        let notice = |user: &User, body: DetailsBody| DetailsView {
            cycle,
            title: details::plain_title(user),
            color_mode: self.state.color_mode,
            map_mode: self.state.map_mode,
            body,
        };

        match &self.pending {
            Some(Pending::Loading(user)) => Some(notice(user, DetailsBody::Loading)),
            Some(Pending::Failed(user, message)) => Some(notice(
                user,
                DetailsBody::Failed {
                    message: message.clone(),
                },
            )),
            None => details::build_details(&self.state, cycle, map_available),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::sighting::fixtures::{external, located};
    use crate::view::details::MapView;
    use crate::view::tooltip::CellRef;

    /// Presenter that records the call sequence and keeps the last view
    #[derive(Debug, Default)]
    pub(crate) struct RecordingPresenter {
        pub map_missing: bool,
        pub calls: Vec<&'static str>,
        pub mounted: Option<DetailsView>,
    }

    impl Presenter for RecordingPresenter {
        fn map_available(&self) -> bool {
            !self.map_missing
        }

        fn teardown(&mut self) {
            self.calls.push("teardown");
            self.mounted = None;
        }

        fn mount(&mut self, view: &DetailsView) {
            self.calls.push("mount");
            self.mounted = Some(view.clone());
        }
    }

    fn anna() -> User {
        User {
            friendly_name: Some("Anna".to_string()),
            ..User::new(1)
        }
    }

    #[test]
    fn test_nothing_rendered_before_selection() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();

        renderer.toggle_color(&mut presenter);
        renderer.toggle_view(&mut presenter);

        assert!(presenter.calls.is_empty());
        assert!(!renderer.state().color_mode);
        assert!(renderer.state().map_mode);
    }

    #[test]
    fn test_teardown_precedes_every_mount() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();

        renderer.begin_fetch(&anna(), &mut presenter);
        renderer.accept(anna(), vec![external("1.1.1.1", "Berlin", "DE", 1)], &mut presenter);
        renderer.toggle_view(&mut presenter);
        renderer.toggle_color(&mut presenter);

        assert_eq!(
            presenter.calls,
            vec!["teardown", "mount", "teardown", "mount", "teardown", "mount", "teardown", "mount"]
        );
        assert_eq!(presenter.mounted.as_ref().unwrap().cycle, 4);
    }

    #[test]
    fn test_loading_then_records() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();

        renderer.begin_fetch(&anna(), &mut presenter);
        let view = presenter.mounted.clone().unwrap();
        assert_eq!(view.body, DetailsBody::Loading);
        assert_eq!(view.title, "Details – Anna");
        assert_eq!(renderer.state().active_user_id, Some(1));

        renderer.accept(anna(), vec![external("1.1.1.1", "Berlin", "DE", 1)], &mut presenter);
        let view = presenter.mounted.clone().unwrap();
        assert!(view.table().is_some());
        assert_eq!(renderer.state().current_records.len(), 1);
    }

    #[test]
    fn test_failure_is_shown_and_survives_toggles() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();

        renderer.accept(anna(), vec![external("1.1.1.1", "Berlin", "DE", 1)], &mut presenter);
        let bob = User {
            username: Some("bob".to_string()),
            ..User::new(2)
        };
        renderer.begin_fetch(&bob, &mut presenter);
        renderer.fail(&bob, "HTTP 500: boom".to_string(), &mut presenter);
        renderer.toggle_color(&mut presenter);

        let view = presenter.mounted.clone().unwrap();
        assert_eq!(
            view.body,
            DetailsBody::Failed {
                message: "HTTP 500: boom".to_string()
            }
        );
        assert_eq!(view.title, "Details – bob");
    }

    #[test]
    fn test_toggles_rerender_from_cache() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();
        renderer.accept(anna(), vec![located("1.1.1.1", 52.5, 13.4)], &mut presenter);

        renderer.toggle_view(&mut presenter);
        let view = presenter.mounted.clone().unwrap();
        assert!(view.map_mode);
        assert!(matches!(view.map(), Some(MapView::Ready { .. })));

        renderer.toggle_color(&mut presenter);
        let view = presenter.mounted.clone().unwrap();
        assert!(!view.color_mode);
        assert!(view.table().unwrap().rows.iter().all(|row| row.ip.tint.is_none()));
    }

    #[test]
    fn test_missing_map_engine_degrades_map_only() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter {
            map_missing: true,
            ..Default::default()
        };
        renderer.accept(anna(), vec![located("1.1.1.1", 52.5, 13.4)], &mut presenter);
        renderer.toggle_view(&mut presenter);

        let view = presenter.mounted.clone().unwrap();
        assert!(matches!(view.map(), Some(MapView::Unavailable { .. })));
        assert_eq!(view.table().unwrap().rows.len(), 1);

        // Color toggling keeps working
        renderer.toggle_color(&mut presenter);
        let view = presenter.mounted.clone().unwrap();
        assert!(!view.color_mode);
    }

    #[test]
    fn test_render_hides_tooltip() {
        let mut renderer = Renderer::new();
        let mut presenter = RecordingPresenter::default();
        renderer.accept(anna(), vec![external("1.1.1.1", "Berlin", "DE", 1)], &mut presenter);

        let view = presenter.mounted.as_ref().unwrap();
        let attrs = view.table().unwrap().rows[0].ip_attrs.clone();
        let cycle = view.cycle;
        renderer
            .tooltip_mut()
            .show(CellRef { cycle, row: 0 }, &attrs, 3, 3);
        assert!(renderer.tooltip().visible().is_some());

        renderer.toggle_color(&mut presenter);
        assert!(renderer.tooltip().visible().is_none());
    }
}
