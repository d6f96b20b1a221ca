use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gtk4 as gtk;
use gtk4::glib;
use gtk4::prelude::*;
use tracing::debug;

use super::app::fail;
use super::hud::{set_header_game, set_header_menu, set_header_result};
use super::state::AppState;

/// How long the end banner stays over the board before the chart replaces it.
pub const WINNER_BANNER_HOLD: Duration = Duration::from_secs(3);

fn switch_view(state: &Rc<RefCell<AppState>>, name: &str, transition: gtk::StackTransitionType) {
    let st = state.borrow();
    if let Some(stack) = &st.view_stack {
        stack.set_transition_type(transition);
        stack.set_visible_child_name(name);
    }
}

pub(super) fn start_game(state: &Rc<RefCell<AppState>>) {
    let started = state.borrow_mut().reset_game();
    if let Err(err) = started {
        fail(state, err);
        return;
    }
    set_header_game(state);
    switch_view(state, "game", gtk::StackTransitionType::SlideLeft);
    if let Some(area) = &state.borrow().board_area {
        area.queue_draw();
    }
}

pub(super) fn schedule_result(state: &Rc<RefCell<AppState>>, game_id: u64) {
    let state = state.clone();
    glib::timeout_add_local_once(WINNER_BANNER_HOLD, move || {
        if state.borrow().game_id != game_id {
            debug!(game_id, "result view skipped for a replaced game");
            return;
        }
        show_result(&state);
    });
}

pub(super) fn show_result(state: &Rc<RefCell<AppState>>) {
    {
        let st = state.borrow();
        let Some(outcome) = st.outcome else {
            return;
        };
        if let Some(label) = &st.result_banner_label {
            label.set_text(&outcome.banner());
        }
        if let Some(label) = &st.result_summary_label {
            label.set_text(&outcome.summary());
        }
        if let Some(chart) = &st.chart_area {
            chart.queue_draw();
        }
    }
    set_header_result(state);
    switch_view(state, "result", gtk::StackTransitionType::SlideLeft);
}

pub(super) fn show_menu(state: &Rc<RefCell<AppState>>) {
    set_header_menu(state);
    switch_view(state, "menu", gtk::StackTransitionType::SlideRight);
}
