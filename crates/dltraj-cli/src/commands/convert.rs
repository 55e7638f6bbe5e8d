use crate::cli::ConvertArgs;
use crate::config::PartialConvertConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dltraj::engine::progress::ProgressReporter;
use dltraj::workflows;
use tracing::info;

pub fn run(args: ConvertArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialConvertConfig::load_optional(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let resolved = partial_config.merge_with_cli(&args)?;

    let reporter = if show_progress {
        let progress_handler = CliProgressHandler::new();
        ProgressReporter::with_callback(progress_handler.get_callback())
    } else {
        ProgressReporter::new()
    };

    if args.samepath {
        let (_, output) =
            workflows::convert::resolve_paths(&args.input, &args.output, args.samepath);
        println!("Writing to {}", output.display());
    }

    let outcome = workflows::convert::run(
        &args.input,
        &args.output,
        args.samepath,
        &resolved.species,
        &resolved.config,
        &reporter,
    )?;

    println!(
        "✓ Converted {} frame(s) ({} atom records, {} lines) from {} to {}",
        outcome.summary.frames,
        outcome.summary.atoms,
        outcome.summary.lines_written,
        outcome.input.display(),
        outcome.output.display()
    );

    Ok(())
}
