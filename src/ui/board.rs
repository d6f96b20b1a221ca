use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Instant;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::glib;
use gtk4::prelude::*;
use tracing::debug;

use super::app::fail;
use super::hud::update_subtitle;
use super::paint::{self, Rgb};
use super::scene::schedule_result;
use super::state::{AppState, FACE_SIZE};
use crate::error::GameError;
use crate::game::assets::ImageId;
use crate::game::board::{BOARD_PIXELS, TILE_MARGIN, TILE_SIZE};
use crate::game::turn::{GamePhase, Side, Snapshot, TileFace, Winner};

const TIMER_FONT_PX: f64 = 24.0;
const ACK_FONT_PX: f64 = 44.0;
const BANNER_FONT_PX: f64 = 40.0;
const SUMMARY_FONT_PX: f64 = 20.0;

fn winner_color(winner: Winner) -> Rgb {
    match winner {
        Winner::Player => paint::WIN_GREEN,
        Winner::Ai => paint::AI_RED,
        Winner::Tie => paint::PLAYER_BLUE,
    }
}

fn draw_tiles(
    cr: &cairo::Context,
    snapshot: &Snapshot,
    faces: &HashMap<ImageId, Pixbuf>,
) -> Result<(), cairo::Error> {
    let face = FACE_SIZE as f64;
    for tile in &snapshot.tiles {
        let x = (tile.col as u32 * TILE_SIZE + TILE_MARGIN) as f64;
        let y = (tile.row as u32 * TILE_SIZE + TILE_MARGIN) as f64;
        match tile.face {
            TileFace::Removed => continue,
            TileFace::Revealed => match faces.get(&tile.identity) {
                Some(pixbuf) => cr.set_source_pixbuf(pixbuf, x, y),
                None => paint::set_rgb(cr, paint::TILE_BACK),
            },
            TileFace::Hidden => paint::set_rgb(cr, paint::TILE_BACK),
        }
        cr.rectangle(x, y, face, face);
        cr.fill()?;
    }
    Ok(())
}

fn draw_overlay_text(
    cr: &cairo::Context,
    lines: &[(&str, f64, bool, Rgb)],
) -> Result<(), cairo::Error> {
    let center = BOARD_PIXELS as f64 / 2.0;
    let mut sizes = Vec::with_capacity(lines.len());
    for &(text, size, bold, _) in lines {
        let (width, height) = paint::text_layout(cr, text, size, bold).pixel_size();
        sizes.push((width as f64, height as f64));
    }
    let card_width = sizes.iter().map(|(w, _)| *w).fold(0.0, f64::max) + 48.0;
    let total_height: f64 = sizes.iter().map(|(_, h)| *h).sum();
    let card_height = total_height + 32.0;
    paint::fill_card(
        cr,
        center - card_width / 2.0,
        center - card_height / 2.0,
        card_width,
        card_height,
        0.92,
    )?;

    let mut y = center - total_height / 2.0;
    for (&(text, size, bold, color), (_, height)) in lines.iter().zip(sizes) {
        paint::show_text_centered(cr, text, size, bold, color, center, y + height / 2.0);
        y += height;
    }
    Ok(())
}

pub fn draw_board(
    cr: &cairo::Context,
    snapshot: &Snapshot,
    faces: &HashMap<ImageId, Pixbuf>,
) -> Result<(), cairo::Error> {
    cr.set_antialias(cairo::Antialias::Best);
    paint::set_rgb(cr, paint::WHITE);
    cr.paint()?;

    draw_tiles(cr, snapshot, faces)?;

    if snapshot.phase == GamePhase::InProgress && snapshot.turn == Side::Player {
        let readout = format!("Time: {:.2} s", snapshot.player_elapsed.as_secs_f64());
        paint::show_text_at(cr, &readout, TIMER_FONT_PX, paint::BLACK, 10.0, 10.0);
    }

    if snapshot.matched_ack {
        draw_overlay_text(cr, &[("Matched!", ACK_FONT_PX, true, paint::WIN_GREEN)])?;
    }

    if let Some(outcome) = snapshot.outcome {
        let banner = outcome.banner();
        let summary = outcome.summary();
        draw_overlay_text(
            cr,
            &[
                (banner.as_str(), BANNER_FONT_PX, true, winner_color(outcome.winner())),
                (summary.as_str(), SUMMARY_FONT_PX, false, paint::BLACK),
            ],
        )?;
    }
    Ok(())
}

fn handle_board_press(state: &Rc<RefCell<AppState>>, x: f64, y: f64) {
    let mut st = state.borrow_mut();
    let Some(game) = st.game.as_mut() else {
        return;
    };
    let Some(cell) = game.board().cell_at(x, y, TILE_SIZE) else {
        return;
    };
    let outcome = game.click(cell.index, Instant::now());
    debug!(index = cell.index, row = cell.row, col = cell.col, ?outcome, "board press");
    if let Some(area) = &st.board_area {
        area.queue_draw();
    }
}

/// Advances the game once per frame and hands over to the result view when it ends.
fn on_frame(state: &Rc<RefCell<AppState>>, area: &gtk::DrawingArea) {
    let finished_game = {
        let mut st = state.borrow_mut();
        let game_id = st.game_id;
        let outcome = {
            let Some(game) = st.game.as_mut() else {
                return;
            };
            game.tick(Instant::now());
            game.outcome()
        };
        let newly_finished = outcome.is_some() && st.outcome.is_none();
        if newly_finished {
            st.outcome = outcome;
        }
        update_subtitle(&st);
        newly_finished.then_some(game_id)
    };
    area.queue_draw();
    if let Some(game_id) = finished_game {
        schedule_result(state, game_id);
    }
}

pub fn build_board_area(state: &Rc<RefCell<AppState>>) -> gtk::DrawingArea {
    let area = gtk::DrawingArea::builder()
        .content_width(BOARD_PIXELS as i32)
        .content_height(BOARD_PIXELS as i32)
        .halign(gtk::Align::Center)
        .valign(gtk::Align::Center)
        .build();
    area.add_css_class("duel-board");

    let state_draw = state.clone();
    area.set_draw_func(move |_, cr, _, _| {
        let result = {
            let st = state_draw.borrow();
            let Some(game) = &st.game else {
                return;
            };
            draw_board(cr, &game.snapshot(Instant::now()), &st.faces)
        };
        if let Err(err) = result {
            // Not from inside the draw handler.
            let state_fail = state_draw.clone();
            glib::idle_add_local_once(move || fail(&state_fail, GameError::Render(err)));
        }
    });

    let click = gtk::GestureClick::new();
    click.set_button(gdk::BUTTON_PRIMARY);
    click.connect_pressed({
        let state = state.clone();
        move |_, _, x, y| {
            handle_board_press(&state, x, y);
        }
    });
    area.add_controller(click);

    area.add_tick_callback({
        let state = state.clone();
        move |area, _| {
            on_frame(&state, area);
            glib::ControlFlow::Continue
        }
    });

    area
}
