use std::{env, error::Error, time::Instant};

use voting_sim::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let start = Instant::now();

    let mut format = Format::PrettyPrint;
    let mut seed = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => format = Format::CSV,
            "--seed" => {
                let value = args.next().ok_or("--seed expects a value")?;
                seed = Some(value.parse::<u64>()?);
            }
            other => {
                return Err(format!("unrecognized argument: {}", other).into())
            }
        }
    }

    let mut builder = SimulationBuilder::new()
        .power_values((10..=40).step_by(10).percent())
        .trials(100_000)
        .blocks(200);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }

    let results = builder.build()?.run_all()?.format(format).build()?;

    println!("{}", results);
    println!("Elapsed time: {:.4} secs", start.elapsed().as_secs_f64());

    Ok(())
}
