mod assets;
mod cli;
mod commands;

use spirit_match::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
