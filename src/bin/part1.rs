use anyhow::{Context, Result};
use chronospatial::{CLIArgs, Machine};
use clap::Parser;

fn main() -> Result<()> {
    chronospatial::init_logger();
    let args = CLIArgs::parse();
    let info = chronospatial::read_debug_info(&args.input_path)?;

    let mut machine = Machine::new(&info.program, info.registers).with_step_limit(args.step_limit);
    machine.run().with_context(|| {
        format!(
            "Failed to run program in given file({}).",
            args.input_path.display()
        )
    })?;
    println!(
        "After running given program, the computer outputs {}.",
        chronospatial::format_output(machine.output())
    );

    Ok(())
}
