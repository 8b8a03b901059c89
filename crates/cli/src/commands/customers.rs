//! Customer commands.

use std::io::Write;

use tracing::info;

use salon_crm_admin::{AppError, AppState};
use salon_crm_core::{Customer, CustomerId, PaginationParams, Plan, Status};

use crate::CliError;

/// Filter and page selection for `customers list`.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub search: Option<String>,
    pub plan: Option<Plan>,
    pub status: Option<Status>,
    pub page: usize,
    pub limit: usize,
}

/// List customers through the list view-model.
///
/// # Errors
///
/// Returns an error if the store cannot be read or output fails.
pub async fn list(
    state: &AppState,
    query: ListQuery,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut view = state.customer_list();
    view.refresh().await?;

    if let Some(term) = query.search {
        view.set_search(term);
    }
    view.set_plan(query.plan);
    view.set_status(query.status);

    let page = view.page(PaginationParams::new(query.page, query.limit));
    info!(
        total = page.total,
        filtered = view.has_active_filters(),
        "Customers listed"
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &page)?;
        writeln!(out)?;
        return Ok(());
    }

    for customer in &page.items {
        write_row(out, customer)?;
    }
    writeln!(
        out,
        "-- page {} ({} of {} customers)",
        page.page,
        page.items.len(),
        page.total
    )?;
    Ok(())
}

fn write_row(out: &mut impl Write, c: &Customer) -> std::io::Result<()> {
    writeln!(
        out,
        "{}\t{}\t{} [{}]\t{} [{}]\t{}\t{}\tsessions={}\tnext={}",
        c.id,
        c.name,
        c.plan,
        c.plan.category().as_str(),
        c.status,
        c.status.category().as_str(),
        c.email.as_ref().map_or("-", |e| e.as_str()),
        c.phone.as_deref().unwrap_or("-"),
        c.total_sessions(),
        c.next_date.as_deref().unwrap_or("-"),
    )
}

/// Show one customer.
///
/// # Errors
///
/// Returns `AppError::NotFound` if there is no such customer.
pub async fn show(state: &AppState, id: &str, json: bool, out: &mut impl Write) -> Result<(), CliError> {
    let id = CustomerId::new(id);
    let customer = state
        .customers()
        .get(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &customer)?;
        writeln!(out)?;
        return Ok(());
    }

    let optional = |value: Option<&str>| value.unwrap_or("-").to_string();
    let lines = [
        ("id", customer.id.to_string()),
        ("name", customer.name.clone()),
        ("email", optional(customer.email.as_ref().map(|e| e.as_str()))),
        ("phone", optional(customer.phone.as_deref())),
        ("plan", customer.plan.to_string()),
        ("status", customer.status.to_string()),
        ("contractDate", optional(customer.contract_date.as_deref())),
        ("makeupCount", customer.makeup_count.to_string()),
        ("hairCount", customer.hair_count.to_string()),
        ("fashionCount", customer.fashion_count.to_string()),
        ("nextDate", optional(customer.next_date.as_deref())),
        ("nextContent", optional(customer.next_content.as_deref())),
        ("createdAt", customer.created_at.to_rfc3339()),
        ("updatedAt", customer.updated_at.to_rfc3339()),
    ];
    for (label, value) in lines {
        writeln!(out, "{label:<13}{value}")?;
    }
    Ok(())
}

/// Delete a customer. Deleting a missing customer succeeds.
///
/// # Errors
///
/// Returns an error if the store rejects the delete.
pub async fn delete(state: &AppState, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    let id = CustomerId::new(id);
    state.customers().delete(&id).await.map_err(AppError::from)?;
    info!(customer_id = %id, "Customer deleted");
    writeln!(out, "deleted {id}")?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use salon_crm_admin::seed::seed_customers;

    use super::*;

    fn query() -> ListQuery {
        ListQuery {
            search: None,
            plan: None,
            status: None,
            page: 1,
            limit: 20,
        }
    }

    async fn seeded() -> AppState {
        let state = AppState::in_memory();
        seed_customers(&state.customers()).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_list_filters_by_plan() {
        let state = seeded().await;
        let mut out = Vec::new();
        let q = ListQuery {
            plan: Some(Plan::Premium),
            ..query()
        };
        list(&state, q, false, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("田中花子"));
        assert!(text.contains("山田麻衣"));
        assert!(!text.contains("佐藤美咲"));
        assert!(text.contains("プレミアム [warning]"));
    }

    #[tokio::test]
    async fn test_list_json_page() {
        let state = seeded().await;
        let mut out = Vec::new();
        let q = ListQuery {
            limit: 2,
            ..query()
        };
        list(&state, q, true, &mut out).await.unwrap();

        let page: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(page["total"], 5);
        assert_eq!(page["items"].as_array().unwrap().len(), 2);
        assert_eq!(page["hasNext"], true);
    }

    #[tokio::test]
    async fn test_show_missing_is_not_found() {
        let state = seeded().await;
        let err = show(&state, "nope", false, &mut Vec::new()).await.unwrap_err();
        assert!(matches!(err, CliError::App(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_show() {
        let state = seeded().await;
        let id = state.customers().list().await.unwrap()[0].id.to_string();

        delete(&state, &id, &mut Vec::new()).await.unwrap();
        assert!(show(&state, &id, true, &mut Vec::new()).await.is_err());
    }
}
