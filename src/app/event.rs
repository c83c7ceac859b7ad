// Keyboard and mouse event handling
//
// This module contains the input handlers that process user input and
// update the dashboard state accordingly.

use super::{AppState, InputMode, TABLE_PAGE_ROWS};
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

/// Handle keyboard events and update application state
///
/// Returns `true` if the application should continue running,
/// `false` if it should exit.
///
/// # Key Bindings (normal mode)
/// - `q`, `Q`, `Esc` - Quit the application
/// - `Up` / `Down` - Move through the user list
/// - `Enter` - Load the highlighted user's IP history
/// - `r`, `R` - Reload the active user
/// - `c`, `C` - Toggle colors
/// - `m`, `M` - Toggle table/map view
/// - `/` - Edit the search filter
/// - `l`, `L` - Edit the history limit
/// - `PageUp` / `PageDown` - Scroll the details table
///
/// While editing, characters go to the field, `Enter` commits and `Esc`
/// cancels.
pub fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    if app.input_mode != InputMode::Normal {
        handle_edit_key(app, key);
        return true;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
            app.running = false;
            false
        }
        KeyCode::Up => {
            app.select_previous_user();
            true
        }
        KeyCode::Down => {
            app.select_next_user();
            true
        }
        KeyCode::Enter => {
            app.select_highlighted();
            true
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.reload();
            true
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            app.toggle_color();
            true
        }
        KeyCode::Char('m') | KeyCode::Char('M') => {
            app.toggle_view();
            true
        }
        KeyCode::Char('/') => {
            app.begin_search();
            true
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            app.begin_limit_edit();
            true
        }
        KeyCode::PageUp => {
            app.scroll_details(-(TABLE_PAGE_ROWS as isize));
            true
        }
        KeyCode::PageDown => {
            app.scroll_details(TABLE_PAGE_ROWS as isize);
            true
        }
        _ => true,
    }
}

fn handle_edit_key(app: &mut AppState, key: KeyCode) {
    match key {
        KeyCode::Enter => app.commit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        // Limit field only takes digits
        KeyCode::Char(ch) if app.input_mode == InputMode::Limit && !ch.is_ascii_digit() => {}
        KeyCode::Char(ch) => app.input_char(ch),
        _ => {}
    }
}

/// Handle mouse events: hover drives the IP tooltip and map popups,
/// left click pins a marker popup
pub fn handle_mouse_event(app: &mut AppState, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.pointer_moved(mouse.column, mouse.row);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            app.pointer_clicked(mouse.column, mouse.row);
        }
        MouseEventKind::ScrollUp => app.scroll_details(-1),
        MouseEventKind::ScrollDown => app.scroll_details(1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use crate::app::FetchOutcome;
    use crate::sighting::fixtures::external;
    use crate::ui::presenter::IpHitbox;
    use crossterm::event::KeyModifiers;
    use ratatui::layout::Rect;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _, _) = test_app();

        // Test 'q' key
        assert!(app.running);
        let result = handle_key_event(&mut app, KeyCode::Char('q'));
        assert!(!result);
        assert!(!app.running);

        // Reset and test 'Q' key
        app.running = true;
        let result = handle_key_event(&mut app, KeyCode::Char('Q'));
        assert!(!result);
        assert!(!app.running);

        // Reset and test Esc key
        app.running = true;
        let result = handle_key_event(&mut app, KeyCode::Esc);
        assert!(!result);
        assert!(!app.running);
    }

    #[test]
    fn test_toggle_colors() {
        let (mut app, _, _) = test_app();

        // Default: colors on
        assert!(app.renderer.state().color_mode);

        handle_key_event(&mut app, KeyCode::Char('c'));
        assert!(!app.renderer.state().color_mode);

        handle_key_event(&mut app, KeyCode::Char('C'));
        assert!(app.renderer.state().color_mode);
    }

    #[test]
    fn test_toggle_view() {
        let (mut app, _, _) = test_app();

        // Default: table view
        assert!(!app.renderer.state().map_mode);

        handle_key_event(&mut app, KeyCode::Char('m'));
        assert!(app.renderer.state().map_mode);
    }

    #[test]
    fn test_enter_loads_highlighted_user() {
        let (mut app, requests, _) = test_app();
        handle_key_event(&mut app, KeyCode::Down);
        handle_key_event(&mut app, KeyCode::Enter);

        assert_eq!(requests.borrow().user_ips[0].0.user_id, 2);
    }

    #[test]
    fn test_search_mode_captures_quit_key() {
        let (mut app, _, _) = test_app();
        handle_key_event(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);

        // 'q' is text while searching
        assert!(handle_key_event(&mut app, KeyCode::Char('q')));
        assert!(app.running);
        assert_eq!(app.search, "q");

        // Esc cancels the edit instead of quitting
        assert!(handle_key_event(&mut app, KeyCode::Esc));
        assert!(app.running);
        assert_eq!(app.search, "");
    }

    #[test]
    fn test_limit_mode_accepts_digits_only() {
        let (mut app, _, _) = test_app();
        handle_key_event(&mut app, KeyCode::Char('l'));
        handle_key_event(&mut app, KeyCode::Backspace);
        handle_key_event(&mut app, KeyCode::Backspace);
        handle_key_event(&mut app, KeyCode::Char('2'));
        handle_key_event(&mut app, KeyCode::Char('x'));
        handle_key_event(&mut app, KeyCode::Char('5'));
        assert_eq!(app.limit_input.text(), "25");

        handle_key_event(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.limit_input.text(), "25");
    }

    #[test]
    fn test_hover_shows_and_hides_tooltip() {
        let (mut app, requests, _) = test_app();
        app.select_user(1);
        let (ticket, _) = requests.borrow().user_ips[0];
        app.handle_outcome(FetchOutcome::UserIps {
            ticket,
            user: crate::app::tests::user(1, "anna"),
            result: Ok(vec![external("1.1.1.1", "Berlin", "DE", 1)]),
        });
        app.presenter.set_hitboxes(vec![IpHitbox {
            area: Rect::new(20, 4, 10, 1),
            row: 0,
        }]);

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, 22, 4));
        let overlay = app.renderer.tooltip().visible().unwrap();
        assert_eq!(overlay.content.ip, "1.1.1.1");

        handle_mouse_event(&mut app, mouse(MouseEventKind::Moved, 2, 4));
        assert!(app.renderer.tooltip().visible().is_none());
        assert_eq!(app.renderer.tooltip().created(), 1);
    }
}
