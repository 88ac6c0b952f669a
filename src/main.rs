use std::fs::File;

use clap::{arg, command, value_parser};
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use meetmatch::pairup::{pair_up, SearchConfig};
use meetmatch::solver::{solve, ProblemStatement};
use meetmatch::{io, seed};

fn main() {
    env_logger::init();

    let args = command!()
        .about("Match people into discussion groups of two to four")
        .arg(arg!(<INPUT> "CSV file with the people to match"))
        .arg(
            arg!(-s --seed <SEED> "Seed for the random number generator. Supported are 'week', an integer, or a date")
                .default_value("week"),
        )
        .arg(
            arg!(--"max-trials" <N> "Maximum number of matching trials")
                .value_parser(value_parser!(usize))
                .default_value("1000"),
        )
        .arg(
            arg!(--"stable-trials" <N> "Stop after this many trials without improvement")
                .value_parser(value_parser!(usize))
                .default_value("100"),
        )
        .arg(arg!(--"matching-stats" <FILE> "Export statistics from the matching process as JSON"))
        .get_matches();

    let seed = match seed::seed_from_option(args.get_one::<String>("seed").unwrap()) {
        Ok(seed) => seed,
        Err(msg) => {
            error!("{}", msg);
            std::process::exit(exitcode::USAGE);
        }
    };
    info!("Seed is {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let input = args.get_one::<String>("INPUT").unwrap();
    let file = match File::open(input) {
        Ok(file) => file,
        Err(e) => {
            error!("Could not open {}: {}", input, e);
            std::process::exit(exitcode::NOINPUT);
        }
    };
    let (people, availabilities, slot_names) = match io::people::read(file) {
        Ok(data) => data,
        Err(msg) => {
            error!("Could not read {}: {}", input, msg);
            std::process::exit(exitcode::DATAERR);
        }
    };
    meetmatch::assert_data_consistency(&people);

    let problem = ProblemStatement::new(
        people.len(),
        people.iter().filter(|p| p.no_two).count(),
    );
    let solution = match solve(problem) {
        Ok(solution) => solution,
        Err(e) => {
            error!("No solution could be found: {}", e);
            std::process::exit(exitcode::DATAERR);
        }
    };
    info!("Solution: {:?}", solution);

    let no_two = ndarray::Array1::from(people.iter().map(|p| p.no_two).collect::<Vec<bool>>());
    let config = SearchConfig {
        max_trials: *args.get_one::<usize>("max-trials").unwrap(),
        stable_trial_limit: *args.get_one::<usize>("stable-trials").unwrap(),
        ..SearchConfig::default()
    };
    let (result, statistics) = match pair_up(
        &solution,
        &no_two,
        availabilities.as_ref(),
        &config,
        &mut rng,
    ) {
        Ok(data) => data,
        Err(e) => {
            error!("{}", e);
            std::process::exit(exitcode::UNAVAILABLE);
        }
    };
    info!("Best cost function: {:?}", statistics.best);

    if let Some(path) = args.get_one::<String>("matching-stats") {
        let write_result = File::create(path)
            .map_err(|e| e.to_string())
            .and_then(|f| serde_json::to_writer(f, &statistics).map_err(|e| e.to_string()));
        match write_result {
            Ok(()) => info!("Wrote matching statistics to {}", path),
            Err(msg) => {
                error!("Could not write matching statistics to {}: {}", path, msg);
                std::process::exit(exitcode::IOERR);
            }
        }
    }

    print!("{}", io::format_groups(&result, &people, &slot_names));
}
