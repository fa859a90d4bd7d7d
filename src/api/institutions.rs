use crate::error::Result;
use crate::http_client::BankDataClient;
use crate::models::Institution;

impl BankDataClient {
    /// Institutions available in a country (ISO 3166 alpha-2, e.g. `gb`)
    pub async fn list_institutions(&self, country: &str) -> Result<Vec<Institution>> {
        let request = self
            .authorized()
            .await?
            .get("/institutions/")
            .query(&[("country", country)]);

        self.send_json(request).await
    }
}
