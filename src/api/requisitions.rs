use crate::error::Result;
use crate::http_client::BankDataClient;
use crate::models::{Requisition, RequisitionRequest};

impl BankDataClient {
    /// Start a bank-linking flow; the returned `link` is shown to the end user
    pub async fn create_requisition(&self, request: &RequisitionRequest) -> Result<Requisition> {
        tracing::info!(
            institution_id = %request.institution_id,
            reference = %request.reference,
            "Creating requisition"
        );

        let builder = self
            .authorized()
            .await?
            .post("/requisitions/")
            .json(request);

        self.send_json(builder).await
    }

    pub async fn get_requisition(&self, id: &str) -> Result<Requisition> {
        let request = self
            .authorized()
            .await?
            .get(&format!("/requisitions/{}/", id));

        self.send_json(request).await
    }
}
