mod cli;
mod commands;

use trip_reimbursement::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
