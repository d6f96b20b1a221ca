use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Once;

use gtk4 as gtk;
use gtk4::gdk;
use gtk4::glib;
use gtk4::prelude::*;
use libadwaita as adw;
use adw::prelude::*;
use gio::SimpleAction;
use tracing::{error, info, warn};

use super::board::build_board_area;
use super::chart::build_chart_area;
use super::dialogs::{show_about_dialog, show_instructions_dialog};
use super::scene::{show_menu, start_game};
use super::state::AppState;
use crate::config::{APP_ID, GameConfig, resource_path};
use crate::error::GameError;
use crate::game::assets::AssetCatalog;

const APP_NAME: &str = "Memory Duel";
const CONTENT_MARGIN: i32 = 12;

/// Single exit point for failures once the window is up.
pub(super) fn fail(state: &Rc<RefCell<AppState>>, err: GameError) {
    let app = {
        let mut st = state.borrow_mut();
        if st.fatal.is_some() {
            return;
        }
        error!(%err, game_id = st.game_id, "game aborted");
        eprintln!("An error occurred: {err}");
        st.game = None;
        st.fatal = Some(err);
        st.app.clone()
    };
    if let Some(app) = app {
        app.quit();
    }
}

fn quit(state: &Rc<RefCell<AppState>>) {
    let app = state.borrow().app.clone();
    if let Some(app) = app {
        info!("quit requested");
        app.quit();
    }
}

pub fn run(config: GameConfig, catalog: AssetCatalog) -> ExitCode {
    glib::set_prgname(Some(APP_ID));
    let app = adw::Application::builder().application_id(APP_ID).build();

    info!(images = catalog.len(), dir = %config.asset_dir.display(), "assets ready");
    let state = Rc::new(RefCell::new(AppState::new(config, catalog)));
    state.borrow_mut().app = Some(app.clone());

    app.connect_activate({
        let state = state.clone();
        move |app| {
            if let Some(win) = app.active_window() {
                win.present();
                return;
            }
            build_window(app, &state);
        }
    });

    let status = app.run_with_args::<&str>(&[]);

    let st = state.borrow();
    if st.fatal.is_some() || status != glib::ExitCode::SUCCESS {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn install_actions(app: &adw::Application, state: &Rc<RefCell<AppState>>) {
    let instructions_action = SimpleAction::new("instructions", None);
    instructions_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_instructions_dialog(&app);
        }
    });
    app.add_action(&instructions_action);

    let about_action = SimpleAction::new("about", None);
    about_action.connect_activate({
        let app = app.clone();
        move |_, _| {
            show_about_dialog(&app);
        }
    });
    app.add_action(&about_action);

    let quit_action = SimpleAction::new("quit", None);
    quit_action.connect_activate({
        let state = state.clone();
        move |_, _| quit(&state)
    });
    app.add_action(&quit_action);
    app.set_accels_for_action("app.quit", &["<primary>q"]);
}

struct HeaderParts {
    bar: adw::HeaderBar,
    restart: gtk::Button,
    menu_title: gtk::Label,
    game_title: gtk::Widget,
    game_subtitle: gtk::Label,
    result_title: gtk::Label,
}

fn bold_title(text: &str) -> gtk::Label {
    let label = gtk::Label::new(None);
    label.set_markup(&format!("<b>{}</b>", glib::markup_escape_text(text)));
    label
}

/// App name over a live subtitle, shown while a game runs.
fn game_title() -> (gtk::Widget, gtk::Label) {
    let subtitle = gtk::Label::builder()
        .css_classes(vec!["game-title-subtitle", "caption"])
        .build();
    let column = gtk::Box::builder()
        .orientation(gtk::Orientation::Vertical)
        .valign(gtk::Align::Center)
        .hexpand(true)
        .build();
    column.append(
        &gtk::Label::builder()
            .label(APP_NAME)
            .css_classes(vec!["game-title-main"])
            .build(),
    );
    column.append(&subtitle);
    (column.upcast(), subtitle)
}

fn app_menu_button() -> gtk::MenuButton {
    let menu = gio::Menu::new();
    for (label, action) in [
        ("Instructions", "app.instructions"),
        ("About Memory Duel", "app.about"),
        ("Quit", "app.quit"),
    ] {
        menu.append(Some(label), Some(action));
    }
    gtk::MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .menu_model(&menu)
        .build()
}

fn build_header(state: &Rc<RefCell<AppState>>) -> HeaderParts {
    let menu_title = bold_title(APP_NAME);
    let (game_title, game_subtitle) = game_title();
    let result_title = bold_title("Results");

    let restart = gtk::Button::builder()
        .icon_name("view-refresh-symbolic")
        .tooltip_text("New Game")
        .build();
    restart.connect_clicked({
        let state = state.clone();
        move |_| start_game(&state)
    });

    let bar = adw::HeaderBar::builder()
        .title_widget(&menu_title)
        .css_classes(vec!["app-header", "flat"])
        .build();
    bar.pack_end(&app_menu_button());
    bar.pack_end(&restart);

    HeaderParts {
        bar,
        restart,
        menu_title,
        game_title,
        game_subtitle,
        result_title,
    }
}

fn build_view_stack(state: &Rc<RefCell<AppState>>) -> gtk::Stack {
    let stack = gtk::Stack::builder()
        .hexpand(true)
        .vexpand(true)
        .hhomogeneous(false)
        .vhomogeneous(false)
        .transition_duration(300)
        .build();
    stack.add_named(&build_menu_view(state), Some("menu"));
    stack.add_named(&build_game_view(state), Some("game"));
    stack.add_named(&build_result_view(state), Some("result"));
    stack.set_visible_child_name("menu");
    stack
}

fn build_window(app: &adw::Application, state: &Rc<RefCell<AppState>>) {
    load_css();
    install_actions(app, state);

    let header = build_header(state);
    let view_stack = build_view_stack(state);

    let content = adw::ToolbarView::builder().content(&view_stack).build();
    content.add_top_bar(&header.bar);

    let win = adw::ApplicationWindow::builder()
        .application(app)
        .title(APP_NAME)
        .default_width(640)
        .default_height(700)
        .content(&content)
        .css_classes(vec!["app-window"])
        .build();

    {
        let mut st = state.borrow_mut();
        st.view_stack = Some(view_stack);
        st.header = Some(header.bar);
        st.restart_button = Some(header.restart);
        st.title_menu = Some(header.menu_title);
        st.title_game = Some(header.game_title);
        st.title_game_subtitle = Some(header.game_subtitle);
        st.title_result = Some(header.result_title);
    }

    let global_key = gtk::EventControllerKey::new();
    global_key.set_propagation_phase(gtk::PropagationPhase::Capture);
    global_key.connect_key_pressed({
        let state = state.clone();
        move |_, key, _, _| {
            if key == gdk::Key::Escape {
                quit(&state);
                return glib::Propagation::Stop;
            }
            if key == gdk::Key::_1 || key == gdk::Key::KP_1 {
                let on_menu = state
                    .borrow()
                    .view_stack
                    .as_ref()
                    .and_then(|stack| stack.visible_child_name())
                    .as_deref()
                    == Some("menu");
                if on_menu {
                    start_game(&state);
                    return glib::Propagation::Stop;
                }
            }
            glib::Propagation::Proceed
        }
    });
    win.add_controller(global_key);

    show_menu(state);
    win.present();
}

fn load_css() {
    static RESOURCES_INIT: Once = Once::new();
    RESOURCES_INIT.call_once(|| {
        if let Err(err) = gio::resources_register_include!("memory-duel.gresource") {
            warn!(%err, "embedded resources unavailable");
        }
    });

    let Some(display) = gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_resource(&resource_path("style.css"));
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

fn build_menu_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("main-menu-root");

    let center = gtk::CenterBox::new();
    center.set_hexpand(true);
    center.set_vexpand(true);

    let content = gtk::Box::new(gtk::Orientation::Vertical, 6);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.add_css_class("main-menu-content");

    let title = gtk::Label::new(Some(APP_NAME));
    title.add_css_class("main-menu-title");
    title.add_css_class("title-1");

    let subtitle = gtk::Label::new(Some("Select Level"));
    subtitle.add_css_class("title-4");
    subtitle.add_css_class("dim-label");

    let buttons_box = gtk::Box::new(gtk::Orientation::Vertical, 13);
    buttons_box.set_halign(gtk::Align::Center);
    buttons_box.set_margin_top(12);

    let level_button = gtk::Button::with_label("Level 1 (4×4)");
    level_button.add_css_class("main-menu-button");
    level_button.add_css_class("suggested-action");
    level_button.set_size_request(164, 40);
    level_button.set_tooltip_text(Some("Press 1"));
    level_button.connect_clicked({
        let state = state.clone();
        move |_| start_game(&state)
    });

    content.append(&title);
    content.append(&subtitle);
    buttons_box.append(&level_button);
    content.append(&buttons_box);

    center.set_center_widget(Some(&content));
    root.append(&center);
    root
}

fn build_game_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("game-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 12);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_halign(gtk::Align::Center);
    content.set_valign(gtk::Align::Center);
    content.set_margin_top(CONTENT_MARGIN);
    content.set_margin_bottom(CONTENT_MARGIN);
    content.set_margin_start(CONTENT_MARGIN);
    content.set_margin_end(CONTENT_MARGIN);

    let board_area = build_board_area(state);
    content.append(&board_area);
    root.append(&content);

    state.borrow_mut().board_area = Some(board_area);
    root
}

fn build_result_view(state: &Rc<RefCell<AppState>>) -> gtk::Box {
    let root = gtk::Box::new(gtk::Orientation::Vertical, 0);
    root.set_hexpand(true);
    root.set_vexpand(true);
    root.add_css_class("result-root");

    let content = gtk::Box::new(gtk::Orientation::Vertical, 14);
    content.set_hexpand(true);
    content.set_vexpand(true);
    content.set_margin_top(24);
    content.set_margin_bottom(24);
    content.set_margin_start(24);
    content.set_margin_end(24);

    let banner = gtk::Label::new(None);
    banner.add_css_class("result-banner");
    banner.add_css_class("title-1");

    let summary = gtk::Label::new(None);
    summary.add_css_class("result-summary");
    summary.add_css_class("body");

    let chart = build_chart_area(state);

    let buttons = gtk::Box::new(gtk::Orientation::Horizontal, 12);
    buttons.set_halign(gtk::Align::Center);
    buttons.set_margin_top(6);

    let again_btn = gtk::Button::with_label("Play Again");
    again_btn.add_css_class("suggested-action");
    again_btn.connect_clicked({
        let state = state.clone();
        move |_| start_game(&state)
    });
    let quit_btn = gtk::Button::with_label("Quit");
    quit_btn.connect_clicked({
        let state = state.clone();
        move |_| quit(&state)
    });

    buttons.append(&again_btn);
    buttons.append(&quit_btn);

    content.append(&banner);
    content.append(&summary);
    content.append(&chart);
    content.append(&buttons);
    root.append(&content);

    {
        let mut st = state.borrow_mut();
        st.result_banner_label = Some(banner);
        st.result_summary_label = Some(summary);
        st.chart_area = Some(chart);
    }

    root
}
