use std::{env, error::Error};

use voting_sim::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
    let logs: Vec<String> = env::args().skip(1).collect();
    if logs.is_empty() {
        return Err("usage: measure_latency <logfile>...".into());
    }

    let summary = LatencySummary::from_logs(&logs)?;

    println!("Total confirmed transactions: {}", summary.confirmed);
    println!(
        "Total confirmed transactions in all {} clients: {}",
        summary.nodes, summary.fully_confirmed
    );
    println!("Average {:.2}", summary.mean);
    println!("Standard deviation {:.2}", summary.std_dev);

    Ok(())
}
