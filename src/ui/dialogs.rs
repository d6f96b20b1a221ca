use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;

pub fn show_instructions_dialog(app: &adw::Application) -> adw::AlertDialog {
    let dialog = adw::AlertDialog::new(
        Some("Instructions"),
        Some(
            "Click two tiles to reveal them. A matching pair is removed from the board.\n\
Your clock stops while a missed pair stays on screen.\n\
After each pair you reveal, the AI takes a turn on its own clock.\n\
Clear the board: whoever spent less time wins.",
        ),
    );
    dialog.add_response("ok", "Got it");
    dialog.set_default_response(Some("ok"));
    dialog.set_close_response("ok");
    dialog.present(app.active_window().as_ref());
    dialog
}

pub fn show_about_dialog(app: &adw::Application) -> adw::AboutDialog {
    let dialog = adw::AboutDialog::builder()
        .application_name("Memory Duel")
        .version(env!("CARGO_PKG_VERSION"))
        .comments("A timed memory match against the computer.")
        .license_type(gtk::License::MitX11)
        .build();
    dialog.present(app.active_window().as_ref());
    dialog
}
