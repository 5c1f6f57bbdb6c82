#[macro_use]
extern crate log;
extern crate clap;

use clap::{Arg, App, AppSettings, ArgMatches};
use rappor_regtest::*;

/// Prints `<h> ln(<inner>) = <epsilon>` for the given parameters.
fn run(matches: &ArgMatches) -> Result<(), Error> {
    let bound = bound_from_args(
        matches.value_of("f"),
        matches.value_of("p"),
        matches.value_of("q"),
        matches.value_of("h"),
        matches.is_present("allow-degenerate"),
    )?;
    info!("p* = {} q* = {}", bound.p_star, bound.q_star);
    println!("{}", bound);
    Ok(())
}

fn main() {
    env_logger::builder().format_timestamp(None).init();
    let matches = App::new("Calculate Epsilon")
        .about("Differential privacy bound of the two-stage randomized response")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(Arg::with_name("f")
            .help("Probability of the permanent randomization stage.")
            .required(true)
            .index(1))
        .arg(Arg::with_name("p")
            .help("Probability of reporting 1 when the permanent bit is 0.")
            .required(true)
            .index(2))
        .arg(Arg::with_name("q")
            .help("Probability of reporting 1 when the permanent bit is 1.")
            .required(true)
            .index(3))
        .arg(Arg::with_name("h")
            .help("Number of hash functions.")
            .required(true)
            .index(4))
        .arg(Arg::with_name("allow-degenerate")
            .help("Print the raw result instead of failing on a degenerate bound.")
            .long("allow-degenerate"))
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}
