use crate::error::Result;
use crate::http_client::BankDataClient;
use crate::models::{AccountBalance, AccountData, BalanceData};

impl BankDataClient {
    /// All balances reported for an account
    pub async fn get_account_balances(&self, account_id: &str) -> Result<BalanceData> {
        let request = self
            .authorized()
            .await?
            .get(&format!("/accounts/{}/balances/", account_id));

        self.send_json(request).await
    }

    /// Balance of one type (e.g. `interimAvailable`) with its currency symbol
    pub async fn get_account_balance(
        &self,
        account_id: &str,
        balance_type: &str,
    ) -> Result<AccountBalance> {
        let data = self.get_account_balances(account_id).await?;
        let balance = AccountBalance::from_balances(&data, balance_type);

        if balance.currency.is_empty() {
            tracing::warn!(
                account_id = account_id,
                balance_type = balance_type,
                "Balance type not reported for account"
            );
        }

        Ok(balance)
    }

    /// Holder name, IBAN and product information of an account
    pub async fn get_account_details(&self, account_id: &str) -> Result<AccountData> {
        let request = self
            .authorized()
            .await?
            .get(&format!("/accounts/{}/details/", account_id));

        self.send_json(request).await
    }
}
