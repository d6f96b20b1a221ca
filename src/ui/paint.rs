use gtk4::pango;

pub type Rgb = (f64, f64, f64);

pub const BLACK: Rgb = (0.0, 0.0, 0.0);
pub const WHITE: Rgb = (1.0, 1.0, 1.0);
pub const TILE_BACK: Rgb = (200.0 / 255.0, 200.0 / 255.0, 200.0 / 255.0);
pub const PLAYER_BLUE: Rgb = (0.0, 0.0, 1.0);
pub const AI_RED: Rgb = (1.0, 0.0, 0.0);
pub const WIN_GREEN: Rgb = (0.0, 0.6, 0.0);

const FONT_FAMILY: &str = "Cantarell, Noto Sans, sans";

pub fn set_rgb(cr: &cairo::Context, (r, g, b): Rgb) {
    cr.set_source_rgb(r, g, b);
}

pub fn text_layout(cr: &cairo::Context, text: &str, size_px: f64, bold: bool) -> pango::Layout {
    let layout = pangocairo::functions::create_layout(cr);
    let mut font_desc = pango::FontDescription::new();
    font_desc.set_family(FONT_FAMILY);
    if bold {
        font_desc.set_weight(pango::Weight::Bold);
    }
    font_desc.set_absolute_size(size_px * pango::SCALE as f64);
    layout.set_font_description(Some(&font_desc));
    layout.set_text(text);
    layout
}

/// Draws `text` with its top-left corner at (x, y).
pub fn show_text_at(cr: &cairo::Context, text: &str, size_px: f64, color: Rgb, x: f64, y: f64) {
    let layout = text_layout(cr, text, size_px, false);
    set_rgb(cr, color);
    cr.move_to(x, y);
    pangocairo::functions::show_layout(cr, &layout);
}

/// Draws `text` centred on (cx, cy).
pub fn show_text_centered(
    cr: &cairo::Context,
    text: &str,
    size_px: f64,
    bold: bool,
    color: Rgb,
    cx: f64,
    cy: f64,
) {
    let layout = text_layout(cr, text, size_px, bold);
    let (width, height) = layout.pixel_size();
    let (width, height) = (width as f64, height as f64);
    set_rgb(cr, color);
    cr.move_to(cx - width / 2.0, cy - height / 2.0);
    pangocairo::functions::show_layout(cr, &layout);
}

/// Rounded card behind overlay text.
pub fn fill_card(
    cr: &cairo::Context,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    alpha: f64,
) -> Result<(), cairo::Error> {
    let radius = (height / 4.0).min(16.0);
    cr.new_sub_path();
    cr.arc(x + width - radius, y + radius, radius, -90f64.to_radians(), 0.0);
    cr.arc(x + width - radius, y + height - radius, radius, 0.0, 90f64.to_radians());
    cr.arc(x + radius, y + height - radius, radius, 90f64.to_radians(), 180f64.to_radians());
    cr.arc(x + radius, y + radius, radius, 180f64.to_radians(), 270f64.to_radians());
    cr.close_path();
    cr.set_source_rgba(1.0, 1.0, 1.0, alpha);
    cr.fill()
}
