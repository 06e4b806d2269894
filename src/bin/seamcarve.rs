// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use clap::{App, Arg, ArgMatches};
use failure::format_err;
use seamgraph::{Axis, CarveConfig, CarveError, CarvingEngine, ColorMode};
use std::process;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn number<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<Option<T>, failure::Error> {
    match matches.value_of(name) {
        None => Ok(None),
        Some(text) => text
            .parse()
            .map(Some)
            .map_err(|_| format_err!("--{} expects a non-negative number, got {:?}", name, text)),
    }
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let input = matches.value_of("input").unwrap_or_default();
    let output = matches.value_of("output").unwrap_or_default();

    let mut config = CarveConfig::default();
    if let Some(seed) = number(matches, "seed")? {
        config = config.with_seed(seed);
    }
    if matches.is_present("verify") {
        config = config.with_verify(true);
    }

    info!(input, "loading");
    let image = image::open(input).map_err(CarveError::from)?;
    let mut engine = CarvingEngine::from_image(&image, config);
    let (width, height) = engine.dimensions();

    let vertical: u32 = number(matches, "vertical")?.unwrap_or(0);
    let horizontal: u32 = number(matches, "horizontal")?.unwrap_or(0);
    if vertical > 0 {
        let removed = engine.carve(Axis::Vertical, vertical)?;
        info!(removed, "removed vertical seams");
    }
    if horizontal > 0 {
        let removed = engine.carve(Axis::Horizontal, horizontal)?;
        info!(removed, "removed horizontal seams");
    }

    let target_width: Option<u32> = number(matches, "width")?;
    let target_height: Option<u32> = number(matches, "height")?;
    if target_width.is_some() || target_height.is_some() {
        let (current_width, current_height) = engine.dimensions();
        let target = (
            target_width.unwrap_or(current_width),
            target_height.unwrap_or(current_height),
        );
        engine.resize_to_target(target.0, target.1)?;
    }

    let mode = if matches.is_present("energy") {
        ColorMode::Energy
    } else {
        ColorMode::Natural
    };
    let carved = engine.render_image(mode);
    info!(
        from = ?(width, height),
        to = ?engine.dimensions(),
        output,
        "saving"
    );
    carved.save(output).map_err(CarveError::from)?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("seamcarve")
        .version("0.1.0")
        .about("Content-aware image resizing by seam carving")
        .arg(
            Arg::with_name("input")
                .help("The image to carve")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("output")
                .help("Where to write the result; the format follows the extension")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("width")
                .long("width")
                .takes_value(true)
                .help("Carve down to this width"),
        )
        .arg(
            Arg::with_name("height")
                .long("height")
                .takes_value(true)
                .help("Carve down to this height"),
        )
        .arg(
            Arg::with_name("vertical")
                .long("vertical")
                .takes_value(true)
                .help("Remove this many vertical seams first"),
        )
        .arg(
            Arg::with_name("horizontal")
                .long("horizontal")
                .takes_value(true)
                .help("Remove this many horizontal seams"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for choosing between axes"),
        )
        .arg(
            Arg::with_name("energy")
                .long("energy")
                .help("Write the energy map instead of the image"),
        )
        .arg(
            Arg::with_name("verify")
                .long("verify")
                .help("Check the pixel graph after every seam"),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("seamcarve: {}", err);
        process::exit(1);
    }
}
