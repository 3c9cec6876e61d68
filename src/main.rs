mod app;
mod core;
mod level;
mod view;

use crate::core::errors::AppError;
use crate::core::service::ProcessBoardService;

use actix::System;
use clap::{App, Arg};
use log::info;

fn main() -> Result<(), AppError> {
    let matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("debug-file")
                .short("d")
                .long("debug-file")
                .value_name("Debug file")
                .help("Output debug to a file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("SEED")
                .help("Seed of the first generated board")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("v")
                .short("v")
                .multiple(true)
                .help("Sets the level of verbosity"),
        )
        .get_matches();

    core::logger::init_logger(
        matches.value_of("debug-file"),
        core::logger::get_logger_level_by_verbosity(matches.occurrences_of("v")),
    )?;

    let app_config = core::config::get_app_config(matches.value_of("config"))?;

    let initial_seed = match matches.value_of("seed") {
        Some(text) => text.parse::<u32>().map_err(|e| AppError {
            message: format!("invalid seed '{}': {}", text, e),
        })?,
        None => app_config.general.initial_seed,
    };

    let service = ProcessBoardService::new(&app_config.service.bin, &app_config.service.args);

    info!(
        "using board service '{}', first seed {}",
        &app_config.service.bin, initial_seed
    );

    System::new().block_on(view::renderer::render_app(
        Box::new(service),
        initial_seed,
        app_config.general.tick_rate(),
    ))
}
