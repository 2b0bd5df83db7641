//! The Stickler kinematics playground.
//!
//! Usage: `Stickler [config.rsn]`

use std::path::PathBuf;

use cushy::{
    value::Dynamic,
    widget::MakeWidget,
    window::{MakeWindow, PendingWindow},
    Run,
};
use stickler::{cushy::stickler_canvas::SticklerCanvas, MenuOption, Session, SticklerConfig};

const INITIAL_WIDTH: u32 = 640;
const INITIAL_HEIGHT: u32 = 480;

fn main() -> cushy::Result {
    env_logger::init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => SticklerConfig::read_from(&path).unwrap_or_else(|err| {
            log::error!("error reading {}: {err}", path.display());
            SticklerConfig::default()
        }),
        None => SticklerConfig::default(),
    };
    let session = Dynamic::new(Session::new(&config, INITIAL_WIDTH, INITIAL_HEIGHT));

    let window = PendingWindow::default();
    let handle = window.handle();
    let canvas = SticklerCanvas::new(session.clone()).on_exit(move |()| {
        handle.request_close();
    });

    let menu = "Switch to 2D"
        .into_button()
        .on_click({
            let session = session.clone();
            move |_| session.lock().select_menu(MenuOption::SwitchToPlanar)
        })
        .and("Switch to 3D".into_button().on_click({
            let session = session.clone();
            move |_| session.lock().select_menu(MenuOption::SwitchToSpatial)
        }))
        .and("Right-click to add a vertex (2D only)")
        .into_columns();

    window
        .with_root(menu.and(canvas.expand()).into_rows())
        .run()
}
