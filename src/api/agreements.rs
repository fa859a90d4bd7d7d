use crate::error::Result;
use crate::http_client::BankDataClient;
use crate::models::{Agreement, AgreementRequest};

impl BankDataClient {
    /// Create an end-user agreement for an institution
    pub async fn create_agreement(&self, request: &AgreementRequest) -> Result<Agreement> {
        tracing::info!(
            institution_id = %request.institution_id,
            max_historical_days = request.max_historical_days,
            access_valid_for_days = request.access_valid_for_days,
            "Creating end-user agreement"
        );

        let builder = self
            .authorized()
            .await?
            .post("/agreements/enduser/")
            .json(request);

        self.send_json(builder).await
    }
}
