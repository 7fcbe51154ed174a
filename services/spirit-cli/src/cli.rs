use crate::commands::{
    run_link_images, run_link_models, run_match, run_rename_exports, LinkImagesArgs,
    LinkModelsArgs, MatchArgs, RenameExportsArgs,
};
use clap::{Parser, Subcommand};
use spirit_match::config::AppConfig;
use spirit_match::error::AppError;
use spirit_match::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "spirit-assets",
    about = "Match spirit records to model and texture files",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show which catalog files a display name resolves to
    Match(MatchArgs),
    /// Fill in model references for a JSON record list
    LinkModels(LinkModelsArgs),
    /// Fill in image references for a JSON record list
    LinkImages(LinkImagesArgs),
    /// Rename raw Retopo exports to catalog file names
    RenameExports(RenameExportsArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Match(args) => run_match(&config, args),
        Command::LinkModels(args) => run_link_models(&config, args),
        Command::LinkImages(args) => run_link_images(&config, args),
        Command::RenameExports(args) => run_rename_exports(args),
    }
}
