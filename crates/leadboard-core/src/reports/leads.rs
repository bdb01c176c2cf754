//! Client directory and qualified-lead listing.

use super::rows::{ClientSummary, QualifiedLead};
use super::ClientQuery;
use crate::rpc::{call_typed, select_typed, ParamStyle, RpcBackend, RpcError};

pub const CLIENT_COLUMNS: [&str; 2] = ["cr_client_id", "cr_company_name"];

pub async fn clients(backend: &dyn RpcBackend, table: &str) -> Result<Vec<ClientSummary>, RpcError> {
    select_typed(backend, table, &CLIENT_COLUMNS).await
}

pub async fn qualified_leads(
    backend: &dyn RpcBackend,
    query: &ClientQuery,
) -> Result<Vec<QualifiedLead>, RpcError> {
    call_typed(backend, "get_qualified_leads", &query.params(ParamStyle::Prefixed)).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reports::testing::client;
    use crate::rpc::memory::MemoryRpcBackend;

    #[tokio::test]
    async fn lists_clients_from_table() {
        let backend = MemoryRpcBackend::new().with_table(
            "clients_ffs",
            json!([
                { "cr_client_id": 1, "cr_company_name": "Acme Pest" },
                { "cr_client_id": 2, "cr_company_name": null }
            ]),
        );
        let rows = clients(&backend, "clients_ffs").await.expect("clients");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cr_client_id, json!(1));
        assert_eq!(rows[1].cr_company_name, None);
    }

    #[tokio::test]
    async fn qualified_leads_use_prefixed_params() {
        let backend = MemoryRpcBackend::new().with_rows(
            "get_qualified_leads",
            json!([{ "customer_name": "Lee", "first_source": "LSA", "lead_score_max": "7" }]),
        );
        let leads = qualified_leads(&backend, &client(8, "2025-06-01", "2025-06-30"))
            .await
            .expect("leads");
        assert_eq!(leads[0].lead_score_max, 7.0);
        assert_eq!(leads[0].first_source.as_deref(), Some("LSA"));

        let call = &backend.calls_to("get_qualified_leads")[0];
        assert_eq!(call.params.get("p_end_date"), Some(&json!("2025-06-30")));
    }
}
