//! Resource identifiers built from alias, plan name, account, and region.

/// Builds ARNs for one account and region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnBuilder {
    region: String,
    account_id: String,
}

impl ArnBuilder {
    /// Creates a builder for the given region and account.
    pub fn new(region: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self { region: region.into(), account_id: account_id.into() }
    }

    /// The region ARNs are built for.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The account ARNs are built for.
    #[must_use]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// `arn:aws:ssm-contacts:<region>:<account>:contact/<alias>`
    #[must_use]
    pub fn contact(&self, alias: &str) -> String {
        format!("arn:aws:ssm-contacts:{}:{}:contact/{alias}", self.region, self.account_id)
    }

    /// `arn:aws:ssm-incidents::<account>:response-plan/<name>`
    ///
    /// Response plan ARNs carry no region.
    #[must_use]
    pub fn response_plan(&self, name: &str) -> String {
        format!("arn:aws:ssm-incidents::{}:response-plan/{name}", self.account_id)
    }
}
