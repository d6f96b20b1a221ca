use std::collections::HashMap;
use std::time::Instant;

use gtk4 as gtk;
use gtk4::gdk_pixbuf::Pixbuf;
use libadwaita as adw;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::assets::{AssetCatalog, ImageId};
use crate::game::board::{Board, GRID_SIDE, TILE_MARGIN, TILE_SIZE};
use crate::game::turn::{Outcome, TurnController};

/// Edge of a face image once scaled into its cell.
pub const FACE_SIZE: i32 = (TILE_SIZE - 2 * TILE_MARGIN) as i32;

pub struct AppState {
    pub config: GameConfig,
    pub catalog: AssetCatalog,
    pub app: Option<adw::Application>,
    pub view_stack: Option<gtk::Stack>,
    pub header: Option<adw::HeaderBar>,
    pub restart_button: Option<gtk::Button>,
    pub title_menu: Option<gtk::Label>,
    pub title_game: Option<gtk::Widget>,
    pub title_game_subtitle: Option<gtk::Label>,
    pub title_result: Option<gtk::Label>,
    pub board_area: Option<gtk::DrawingArea>,
    pub chart_area: Option<gtk::DrawingArea>,
    pub result_banner_label: Option<gtk::Label>,
    pub result_summary_label: Option<gtk::Label>,

    // Game state
    pub game: Option<TurnController<StdRng>>,
    pub game_id: u64,
    pub faces: HashMap<ImageId, Pixbuf>,
    pub outcome: Option<Outcome>,
    pub fatal: Option<GameError>,
}

impl AppState {
    pub fn new(config: GameConfig, catalog: AssetCatalog) -> Self {
        AppState {
            config,
            catalog,
            app: None,
            view_stack: None,
            header: None,
            restart_button: None,
            title_menu: None,
            title_game: None,
            title_game_subtitle: None,
            title_result: None,
            board_area: None,
            chart_area: None,
            result_banner_label: None,
            result_summary_label: None,
            game: None,
            game_id: 0,
            faces: HashMap::new(),
            outcome: None,
            fatal: None,
        }
    }

    fn game_rng(&self) -> StdRng {
        match self.config.seed {
            // Each new game in a seeded session gets its own, still reproducible, stream.
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.game_id.wrapping_sub(1))),
            None => StdRng::from_os_rng(),
        }
    }

    fn load_faces(&mut self, board: &Board) -> Result<(), GameError> {
        for tile in board.tiles() {
            if self.faces.contains_key(&tile.identity) {
                continue;
            }
            let path = self.catalog.path_of(&tile.identity);
            let pixbuf = Pixbuf::from_file_at_scale(&path, FACE_SIZE, FACE_SIZE, false)
                .map_err(|source| GameError::ImageLoad {
                    path: path.clone(),
                    source,
                })?;
            debug!(image = %tile.identity, "face loaded");
            self.faces.insert(tile.identity.clone(), pixbuf);
        }
        Ok(())
    }

    pub fn reset_game(&mut self) -> Result<(), GameError> {
        self.game_id = self.game_id.wrapping_add(1);
        self.game = None;
        self.outcome = None;

        let mut rng = self.game_rng();
        let board = Board::build(GRID_SIDE, &self.catalog, &mut rng)?;
        self.load_faces(&board)?;
        // The player's clock starts once the faces are ready.
        self.game = Some(TurnController::new(board, rng, Instant::now()));
        info!(game_id = self.game_id, "new game started");
        Ok(())
    }
}
