//! Sample customers for demos and a fresh emulator database.

use tracing::info;

use salon_crm_core::{CustomerId, Email, NewCustomer, Plan, Status};

use crate::db::{CustomerRepository, RepositoryError};

struct Sample {
    name: &'static str,
    email: Option<&'static str>,
    phone: Option<&'static str>,
    plan: Plan,
    status: Status,
    contract_date: &'static str,
    counts: [u32; 3],
    next: Option<(&'static str, &'static str)>,
}

const SAMPLES: [Sample; 5] = [
    Sample {
        name: "田中花子",
        email: Some("hanako@example.com"),
        phone: Some("090-1234-5678"),
        plan: Plan::Premium,
        status: Status::FirstCounselingDone,
        contract_date: "2024-01-15",
        counts: [3, 2, 1],
        next: Some(("2024-02-20", "メイクレッスン")),
    },
    Sample {
        name: "佐藤美咲",
        email: Some("misaki@example.com"),
        phone: Some("080-9876-5432"),
        plan: Plan::Standard,
        status: Status::PreLearningCompleted,
        contract_date: "2024-01-10",
        counts: [2, 1, 2],
        next: Some(("2024-02-18", "ヘアスタイリング")),
    },
    Sample {
        name: "鈴木愛",
        email: Some("ai@example.com"),
        phone: Some("070-5555-1111"),
        plan: Plan::Basic,
        status: Status::PaymentReceived,
        contract_date: "2024-01-20",
        counts: [1, 0, 1],
        next: None,
    },
    Sample {
        name: "高橋由美",
        email: None,
        phone: Some("090-7777-8888"),
        plan: Plan::Standard,
        status: Status::ContractSigned,
        contract_date: "2024-01-25",
        counts: [0, 0, 0],
        next: Some(("2024-02-15", "初回カウンセリング")),
    },
    Sample {
        name: "山田麻衣",
        email: Some("mai@example.com"),
        phone: None,
        plan: Plan::Premium,
        status: Status::FirstCounselingDone,
        contract_date: "2024-01-05",
        counts: [4, 3, 3],
        next: Some(("2024-02-22", "ファッション相談")),
    },
];

/// The five sample customers, in display order.
#[must_use]
pub fn sample_customers() -> Vec<NewCustomer> {
    SAMPLES
        .iter()
        .map(|s| {
            let [makeup_count, hair_count, fashion_count] = s.counts;
            NewCustomer {
                name: s.name.to_string(),
                email: s.email.and_then(|e| Email::parse(e).ok()),
                phone: s.phone.map(str::to_string),
                plan: s.plan,
                status: s.status,
                contract_date: Some(s.contract_date.to_string()),
                makeup_count,
                hair_count,
                fashion_count,
                next_date: s.next.map(|(date, _)| date.to_string()),
                next_content: s.next.map(|(_, content)| content.to_string()),
            }
        })
        .collect()
}

/// Insert the sample customers.
///
/// They are created last-to-first so a newest-first listing shows them in
/// display order. Returns the ids in display order.
///
/// # Errors
///
/// Returns the first repository failure. Customers created before it stay.
pub async fn seed_customers(repo: &CustomerRepository) -> Result<Vec<CustomerId>, RepositoryError> {
    let mut ids = Vec::with_capacity(SAMPLES.len());
    for customer in sample_customers().into_iter().rev() {
        let name = customer.name.clone();
        let id = repo.create(customer).await?;
        info!(customer_id = %id, name = %name, "Seeded customer");
        ids.push(id);
    }
    ids.reverse();
    Ok(ids)
}
