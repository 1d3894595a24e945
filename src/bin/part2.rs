use anyhow::{Context, Result};
use chronospatial::{CLIArgs, Inverter};
use clap::Parser;

fn main() -> Result<()> {
    chronospatial::init_logger();
    let args = CLIArgs::parse();
    let info = chronospatial::read_debug_info(&args.input_path)?;

    let mut inverter = Inverter::new(&info.program)
        .with_step_limit(args.step_limit)
        .with_growth_check(!args.unchecked);
    let seed = inverter.find_seed().with_context(|| {
        format!(
            "Failed to search register A for program in given file({}).",
            args.input_path.display()
        )
    })?;

    if let Some(register_a) = seed {
        println!(
            "The least value of register A that makes the program output itself is {}.",
            register_a
        );
    } else {
        eprintln!(
            "There's no value of register A that makes the program output itself, after {} runs.",
            inverter.stats().runs
        );
    }

    Ok(())
}
