// dimmer/utils/dimmer/src/main.rs
//
// Copyright © 2026 The Dimmer Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Command-line driver: writes tables and dims gamescope displays.

#[macro_use]
extern crate log;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use dimmer_lut::concurrent::rayon::RayonExecutor;
use dimmer_lut::serialization::TableSerialize;
use dimmer_lut::{Brightness, Lut1D, Lut3D};
use dimmer_session::concurrent::session_proxy::SessionProxy;
use dimmer_session::discovery::{DisplaySource, StaticDisplays, SteamDisplaySource};
use dimmer_session::property::{DryRunPublisher, PropertyPublisher};
use dimmer_session::xprop::XpropPublisher;
use dimmer_session::{DisplaySession, SessionOptions};
use rayon::ThreadPoolBuilder;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::time::Duration;

type CommandResult = Result<(), Box<dyn Error>>;

fn main() {
    pretty_env_logger::init();

    let matches = App::new("dimmer")
        .version("0.1")
        .author("The Dimmer Project Developers")
        .about("Dims gamescope displays below their minimum backlight level")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(Arg::with_name("runtime-dir")
                 .long("runtime-dir")
                 .value_name("DIR")
                 .takes_value(true)
                 .global(true)
                 .help("Directory that receives the lookup tables"))
        .arg(Arg::with_name("timeout")
                 .long("timeout")
                 .value_name("MILLISECONDS")
                 .takes_value(true)
                 .global(true)
                 .help("Deadline for each xprop invocation"))
        .arg(Arg::with_name("display")
                 .short("d")
                 .long("display")
                 .value_name("DISPLAY")
                 .takes_value(true)
                 .multiple(true)
                 .number_of_values(1)
                 .global(true)
                 .help("Target this display instead of the ones steam uses"))
        .arg(Arg::with_name("proc-root")
                 .long("proc-root")
                 .value_name("DIR")
                 .takes_value(true)
                 .global(true)
                 .help("Where to look for steam processes (default /proc)"))
        .arg(Arg::with_name("dry-run")
                 .short("n")
                 .long("dry-run")
                 .global(true)
                 .help("Log property operations instead of running xprop"))
        .subcommand(SubCommand::with_name("generate")
                        .about("Writes a single lookup table")
                        .arg(Arg::with_name("jobs")
                                 .short("j")
                                 .long("jobs")
                                 .value_name("THREADS")
                                 .takes_value(true)
                                 .help("Number of threads to use"))
                        .arg(Arg::with_name("KIND")
                                 .possible_values(&["lut1d", "lut3d"])
                                 .required(true)
                                 .index(1))
                        .arg(Arg::with_name("BRIGHTNESS")
                                 .help("Brightness between 0 and 1")
                                 .required(true)
                                 .index(2))
                        .arg(Arg::with_name("OUTPUT")
                                 .help("The table file to produce")
                                 .required(true)
                                 .index(3)))
        .subcommand(SubCommand::with_name("apply")
                        .about("Dims every display and leaves it dimmed")
                        .arg(Arg::with_name("BRIGHTNESS")
                                 .help("Brightness between 0 and 1")
                                 .required(true)
                                 .index(1)))
        .subcommand(SubCommand::with_name("reset")
                        .about("Removes the dimming properties from every display"))
        .subcommand(SubCommand::with_name("serve")
                        .about("Reads lifecycle commands from standard input, one per line"))
        .get_matches();

    if let Err(error) = run(&matches) {
        eprintln!("error: {}", error);
        process::exit(1)
    }
}

fn run(matches: &ArgMatches) -> CommandResult {
    if let ("generate", Some(generate_matches)) = matches.subcommand() {
        return generate(generate_matches);
    }

    let mut options = SessionOptions::default();
    if let Some(runtime_dir) = matches.value_of("runtime-dir") {
        options = options.with_runtime_dir(runtime_dir);
    }
    if let Some(timeout) = matches.value_of("timeout") {
        options.timeout = Duration::from_millis(timeout.parse()?);
    }

    if matches.is_present("dry-run") {
        run_session(DryRunPublisher, options, matches)
    } else {
        let publisher = XpropPublisher::new(&options);
        run_session(publisher, options, matches)
    }
}

fn generate(matches: &ArgMatches) -> CommandResult {
    let mut thread_pool_builder = ThreadPoolBuilder::new();
    if let Some(jobs) = matches.value_of("jobs") {
        thread_pool_builder = thread_pool_builder.num_threads(jobs.parse()?);
    }
    thread_pool_builder.build_global()?;

    let brightness = Brightness::new(parse_brightness(matches)?)?;
    let output = Path::new(matches.value_of("OUTPUT").unwrap_or_default());
    match matches.value_of("KIND") {
        Some("lut3d") => Lut3D::build(brightness, &RayonExecutor).write_to(output)?,
        _ => Lut1D::build(brightness, &RayonExecutor).write_to(output)?,
    }
    info!("Wrote {}", output.display());
    Ok(())
}

fn run_session<P>(publisher: P, options: SessionOptions, matches: &ArgMatches) -> CommandResult
                  where P: PropertyPublisher + Send + 'static {
    let source: Box<dyn DisplaySource + Send> = match matches.values_of("display") {
        Some(displays) => Box::new(StaticDisplays(displays.map(str::to_owned).collect())),
        None => {
            let proc_root = matches.value_of("proc-root").unwrap_or("/proc");
            Box::new(SteamDisplaySource::new(proc_root))
        }
    };

    let proxy = SessionProxy::new(DisplaySession::new(publisher, options));
    let displays = proxy.activate(source)?;
    if displays.is_empty() {
        warn!("No displays found");
    }

    match matches.subcommand() {
        ("apply", Some(apply_matches)) => {
            proxy.set_brightness(parse_brightness(apply_matches)?)?;
            // Leave the displays dimmed on exit.
            drop(proxy);
            Ok(())
        }
        ("reset", _) => {
            proxy.clear()?;
            Ok(proxy.shutdown()?)
        }
        _ => serve(proxy),
    }
}

fn parse_brightness(matches: &ArgMatches) -> Result<f64, Box<dyn Error>> {
    parse_number(matches.value_of("BRIGHTNESS").unwrap_or_default())
}

fn parse_number(value: &str) -> Result<f64, Box<dyn Error>> {
    match value.parse::<f64>() {
        Ok(number) => Ok(number),
        Err(error) => Err(format!("invalid number {:?}: {}", value, error).into()),
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Flow {
    Continue,
    Stop,
}

// One command per line; each is answered with `ok` or `error: ...`.
fn serve(proxy: SessionProxy) -> CommandResult {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match serve_command(&proxy, &line) {
            Ok(flow) => {
                writeln!(stdout, "ok")?;
                stdout.flush()?;
                if flow == Flow::Stop {
                    break;
                }
            }
            Err(error) => {
                error!("{}", error);
                writeln!(stdout, "error: {}", error)?;
                stdout.flush()?;
            }
        }
    }

    Ok(proxy.shutdown()?)
}

fn serve_command(proxy: &SessionProxy, line: &str) -> Result<Flow, Box<dyn Error>> {
    let words: Vec<_> = line.split_whitespace().collect();
    match words[..] {
        ["set", value] => proxy.set_brightness(parse_number(value)?)?,
        ["level", value] => proxy.set_level(parse_number(value)?)?,
        ["up"] => {
            let level = proxy.brighten()?;
            info!("Dimmer level is now {}", level);
        }
        ["down"] => {
            let level = proxy.darken()?;
            info!("Dimmer level is now {}", level);
        }
        ["reset"] => proxy.reset()?,
        ["uninstall"] => {
            proxy.uninstall()?;
            return Ok(Flow::Stop);
        }
        ["quit"] => return Ok(Flow::Stop),
        _ => return Err(format!("unknown command {:?}", line).into()),
    }
    Ok(Flow::Continue)
}
