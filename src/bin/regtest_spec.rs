//! Prints the regression test matrix on stdout, one test case per line.
//! The test runner reads these lines and runs parallel processes.
#[macro_use]
extern crate log;
extern crate clap;

use std::io;

use clap::{Arg, App, ArgMatches};
use rappor_regtest::*;

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let catalog = match matches.value_of("catalog") {
        Some(path) => {
            info!("loading catalog from {}", path);
            Catalog::from_json_file(path)?
        },
        None => Catalog::production(),
    };
    if matches.is_present("dump-catalog") {
        catalog.validate()?;
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    // Nothing is written unless the whole matrix was built.
    let matrix = generate(&catalog)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let count = matrix.write_to(&mut out, !matches.is_present("no-demo"))?;
    debug!("wrote {} lines", count);
    Ok(())
}

fn main() {
    env_logger::builder().format_timestamp(None).init();
    let matches = App::new("Regtest Spec")
        .about("Prints one line of parameters per regression test case")
        .arg(Arg::with_name("catalog")
            .help("JSON catalog to use instead of the built-in one.")
            .long("catalog")
            .takes_value(true))
        .arg(Arg::with_name("dump-catalog")
            .help("Print the catalog as JSON and exit.")
            .long("dump-catalog"))
        .arg(Arg::with_name("no-demo")
            .help("Omit the demo rows.")
            .long("no-demo"))
        .get_matches();

    if let Err(e) = run(&matches) {
        eprintln!("FATAL: {}", e);
        std::process::exit(1);
    }
}
