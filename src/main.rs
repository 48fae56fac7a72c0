use bsprof_reader::{DecodeOptions, ProfilerFile};
use std::env;
use std::path::Path;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <path-to-bsprof-file>", args[0]);
        std::process::exit(1);
    }

    let path = Path::new(&args[1]);
    if !path.is_file() {
        eprintln!("ERROR: You need to provide a valid filepath: {}", path.display());
        std::process::exit(1);
    }

    println!("Reading bsprof capture: {}", path.display());
    println!("{}", "=".repeat(60));

    let file = ProfilerFile::from_path(path, &DecodeOptions::default());
    if !file.is_ok() {
        eprintln!("\nERROR: Failed to decode capture ({})", file.error);
        if let Some(detail) = &file.error_detail {
            eprintln!("  {}", detail);
        }
        eprintln!("\nHeader as decoded:\n{}", file.header);
        std::process::exit(1);
    }

    println!("done!");
    println!("\nHeader:");
    println!("{}", file.header);

    println!("\nStatistics:");
    println!("  Strings: {}", file.body.string_table.len());
    println!("  Executable modules: {}", file.body.executable_modules.len());
    println!("  Path elements: {}", file.body.path_elements.len());
    println!("  Root path elements: {}", file.roots().count());
    println!("  CPU measurements: {}", file.cpu_measurement_count());
    println!("  Memory operations: {}", file.memory_operation_count());
    println!("  Run end timestamp: {}", file.footer.target_run_end_timestamp);
}
