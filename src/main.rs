use agestamp::args::{Cli, Config};
use agestamp::processor::{confirm, Processor};
use clap::Parser;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let config = Config::from_cli(Cli::parse())?;

    println!("Input directory:  {}", config.input_dir.display());
    println!(
        "Output directory: {} (this will be cleared)",
        config.output_dir.display()
    );
    println!("Reference date:   {}", config.reference_date);

    let filter = confirm(&format!(
        "Filter directories starting with {:?}?",
        config.keyword
    ))?;

    if !confirm("Are you sure you want to continue?")? {
        println!("cancelled");
        return Ok(());
    }

    let mut processor = Processor::new(config, filter);
    processor.clear_output()?;
    processor.process()?;
    processor.append_run_log()?;
    processor.print_summary();

    Ok(())
}
