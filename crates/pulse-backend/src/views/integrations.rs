use super::{Slot, invalid, settle};
use crate::Backend;
use crate::error::BackendResult;
use crate::models::SocialAccount;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegrationsState {
    pub accounts: Slot<Vec<SocialAccount>>,
    /// Authorization URL from the latest connect call; the user finishes OAuth in a browser.
    pub pending_authorization: Option<String>,
}

impl IntegrationsState {
    pub fn accounts_for(&self, platform: &str) -> Vec<&SocialAccount> {
        self.accounts
            .ready()
            .map(|accounts| {
                accounts
                    .iter()
                    .filter(|account| account.platform == platform)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn remove_account(&mut self, platform: &str, account_id: &str) {
        if let Some(accounts) = self.accounts.ready_mut() {
            accounts.retain(|account| {
                !(account.platform == platform && account.account_id == account_id)
            });
        }
    }
}

pub struct IntegrationsController<B> {
    backend: B,
    state: IntegrationsState,
}

impl<B: Backend> IntegrationsController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: IntegrationsState::default(),
        }
    }

    pub fn state(&self) -> &IntegrationsState {
        &self.state
    }

    pub async fn load(&mut self) -> BackendResult<Vec<SocialAccount>> {
        self.state.accounts = Slot::Loading;
        let (slot, result) = settle(self.backend.social_accounts().await);
        self.state.accounts = slot;
        result
    }

    /// Starts the OAuth connect flow and returns the URL to open.
    pub async fn connect(&mut self, platform: &str) -> BackendResult<String> {
        let platform = platform.trim();
        if platform.is_empty() {
            return Err(invalid("platform is required"));
        }
        let response = self.backend.connect_account(platform).await?;
        if response.authorization_url.trim().is_empty() {
            return Err(invalid(format!(
                "backend returned no authorization url for {platform}"
            )));
        }
        info!(platform, "Connect flow started");
        self.state.pending_authorization = Some(response.authorization_url.clone());
        Ok(response.authorization_url)
    }

    pub async fn disconnect(&mut self, platform: &str, account_id: &str) -> BackendResult<()> {
        if platform.trim().is_empty() || account_id.trim().is_empty() {
            return Err(invalid("platform and account id are required"));
        }
        self.backend.disconnect_account(platform, account_id).await?;
        self.state.remove_account(platform, account_id);
        info!(platform, account_id, "Account disconnected");
        Ok(())
    }
}
