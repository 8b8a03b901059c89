//! Seed the store with the sample customers.

use std::io::Write;

use tracing::info;

use salon_crm_admin::AppState;
use salon_crm_admin::seed::seed_customers;

use crate::CliError;

/// Insert the five sample customers and print their ids.
///
/// # Errors
///
/// Returns an error if a customer cannot be created or output fails.
pub async fn customers(state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    let ids = seed_customers(&state.customers())
        .await
        .map_err(salon_crm_admin::AppError::from)?;

    info!(count = ids.len(), "Sample customers created");
    for id in &ids {
        writeln!(out, "{id}")?;
    }
    Ok(())
}
