use crate::cli::StatisArgs;
use crate::error::{CliError, Result};
use dltraj::core::io::statis::label_step;
use dltraj::workflows::statis::read_statistics;
use tracing::info;

pub fn run(args: StatisArgs) -> Result<()> {
    info!("Reading {} from {:?}", args.file, args.dir);
    let (metadata, steps) = read_statistics(&args.file, &args.dir, args.chunk_size)?;

    println!("System:          {}", metadata.system_name);
    println!("Energy units:    {}", metadata.units);
    println!("Points per step: {}", metadata.n_points);
    println!("Steps:           {}", metadata.n_steps);

    if let Some(step_number) = args.step {
        let step = step_number
            .checked_sub(1)
            .and_then(|index| steps.get(index))
            .ok_or_else(|| {
                CliError::Argument(format!(
                    "step {} is out of range (file has {} steps)",
                    step_number, metadata.n_steps
                ))
            })?;

        println!();
        println!("Step {}:", step_number);
        for (label, value) in label_step(step) {
            println!("  {:<40} {:>16.6}", label, value);
        }
        for (offset, value) in step.iter().enumerate().skip(27) {
            println!("  {:<40} {:>16.6}", format!("column {}", offset + 1), value);
        }
    }

    Ok(())
}
