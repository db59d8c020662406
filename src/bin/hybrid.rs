//! The two-level variant: the same row protocol as the flat binary,
//! but every worker fans its rows out across a local thread pool.  On
//! one machine this mirrors a process-per-node, threads-per-process
//! deployment, which is the shape worth benchmarking before paying
//! for the real thing.

extern crate clap;
extern crate env_logger;
extern crate newtonbrot;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use std::str::FromStr;

use newtonbrot::{output, KernelParams, Region};

fn validate_positive(s: &str, isnotanumber_err: &str, isnotpositive_err: &str) -> Result<(), String> {
    match usize::from_str(s) {
        Ok(i) => {
            if i >= 1 {
                Ok(())
            } else {
                Err(isnotpositive_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const MULTIPLIER: &str = "multiplier";
const THREADS: &str = "threads";
const WORKERS: &str = "workers";
const OUTPUT: &str = "output";
const IMAGE: &str = "image";

fn args<'a>() -> ArgMatches<'a> {
    App::new("hybrid")
        .version("0.1.0")
        .about("Newton-Raphson convergence map with a thread pool inside every row worker")
        .arg(
            Arg::with_name(MULTIPLIER)
                .required(true)
                .index(1)
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse the work multiplier",
                        "The work multiplier must be greater than zero",
                    )
                })
                .help("Work-size multiplier; widens the grid for weak-scaling runs"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(true)
                .index(2)
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse the thread count",
                        "The thread count must be greater than zero",
                    )
                })
                .help("Threads in each worker's column pool"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("w")
                .takes_value(true)
                .validator(|s| {
                    validate_positive(
                        &s,
                        "Could not parse the worker count",
                        "The worker count must be greater than zero",
                    )
                })
                .help("Number of row workers (defaults to one per logical CPU)"),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output map file (defaults to a name built from the run shape)"),
        )
        .arg(
            Arg::with_name(IMAGE)
                .required(false)
                .long(IMAGE)
                .takes_value(true)
                .help("Also render the finished map as a binary graymap (PNM)"),
        )
        .get_matches()
}

fn main() {
    env_logger::init();

    let matches = args();
    let multiplier = usize::from_str(matches.value_of(MULTIPLIER).unwrap())
        .expect("Could not parse the work multiplier.");
    let threads = usize::from_str(matches.value_of(THREADS).unwrap())
        .expect("Could not parse the thread count.");
    let workers = match matches.value_of(WORKERS) {
        Some(count) => usize::from_str(count).expect("Could not parse the worker count."),
        None => num_cpus::get(),
    };

    let region = match Region::base(multiplier) {
        Ok(region) => region,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let params = KernelParams::default();

    println!(
        "newton map: {} x {} over {} workers x {} threads ({} compute threads in all, multiplier {})",
        region.width,
        region.height,
        workers,
        threads,
        workers * threads,
        multiplier
    );

    match newtonbrot::render(&region, &params, workers, threads) {
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
        Ok((matrix, elapsed)) => {
            let seconds = elapsed.as_secs() as f64 + f64::from(elapsed.subsec_nanos()) * 1e-9;
            let outfile = match matches.value_of(OUTPUT) {
                Some(name) => name.to_string(),
                None => format!(
                    "newton_{}workers_{}threads_mult{}_output.dat",
                    workers, threads, multiplier
                ),
            };
            if let Err(e) = output::save_matrix(&outfile, &matrix, &region, seconds) {
                eprintln!("Could not save the map: {}", e);
                std::process::exit(1);
            }
            if let Some(imagefile) = matches.value_of(IMAGE) {
                if let Err(e) = output::write_image(imagefile, &matrix) {
                    eprintln!("Could not write the image: {}", e);
                    std::process::exit(1);
                }
            }
            println!("computed in {:.4} seconds", seconds);
            println!("saved to {}", outfile);
        }
    }
}
