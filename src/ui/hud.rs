use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gtk4::prelude::*;

use super::state::AppState;
use crate::game::turn::{GamePhase, Side};

pub(super) fn set_header_menu(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_menu) {
        header.set_title_widget(Some(title));
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

pub(super) fn set_header_game(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title_box)) = (&st.header, &st.title_game) {
        update_subtitle(&st);
        header.set_title_widget(Some(title_box));
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(true);
    }
}

pub(super) fn set_header_result(state: &Rc<RefCell<AppState>>) {
    let st = state.borrow();
    if let (Some(header), Some(title)) = (&st.header, &st.title_result) {
        header.set_title_widget(Some(title));
    }
    if let Some(restart) = &st.restart_button {
        restart.set_visible(false);
    }
}

fn subtitle_text(st: &AppState) -> Option<String> {
    let game = st.game.as_ref()?;
    let now = Instant::now();
    let text = match (game.phase(), game.turn()) {
        (GamePhase::Finished, _) => game.outcome()?.summary(),
        (GamePhase::InProgress, Side::Player) => {
            format!("Your turn | {:.2} s", game.player_elapsed(now).as_secs_f64())
        }
        (GamePhase::InProgress, Side::Ai) => {
            format!("AI turn | AI {:.2} s", game.ai_elapsed(now).as_secs_f64())
        }
    };
    Some(text)
}

pub(super) fn update_subtitle(st: &AppState) {
    if let Some(subtitle) = &st.title_game_subtitle {
        match subtitle_text(st) {
            Some(text) => subtitle.set_text(&text),
            None => subtitle.set_text(""),
        }
    }
}
