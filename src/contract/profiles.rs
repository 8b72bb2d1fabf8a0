//! Profile write path: building contract calls and dispatching them
//! through the connected wallet.

use super::{ClarityValue, ContractConfig, ContractError, ErrorCategory};
use crate::profile::{validate_form, DeveloperProfile, ProfileForm};
use crate::store::{DraftMode, DraftStore, ProfileCache};
use crate::wallet::{ConnectManager, WalletError};
use std::sync::Arc;

/// A contract call handed to a wallet for signing and broadcast.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub contract_address: String,
    pub contract_name: String,
    pub function_name: String,
    pub args: Vec<ClarityValue>,
}

/// High-level profile mutations. Every path runs the same gauntlet:
/// validate the input, confirm the session still points at a usable
/// wallet, take the signing lease, then hand the call to the provider.
pub struct ProfileContract {
    config: ContractConfig,
    manager: Arc<ConnectManager>,
    cache: ProfileCache,
    drafts: DraftStore,
}

impl ProfileContract {
    pub fn new(
        config: ContractConfig,
        manager: Arc<ConnectManager>,
        cache: ProfileCache,
        drafts: DraftStore,
    ) -> Self {
        Self {
            config,
            manager,
            cache,
            drafts,
        }
    }

    /// Submit a `create-profile` transaction. Returns the txid.
    pub async fn create_profile(&self, form: &ProfileForm) -> Result<String, ContractError> {
        self.submit_profile(form, "create-profile", DraftMode::Create)
            .await
    }

    /// Submit an `update-profile` transaction. Returns the txid.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<String, ContractError> {
        self.submit_profile(form, "update-profile", DraftMode::Edit)
            .await
    }

    async fn submit_profile(
        &self,
        form: &ProfileForm,
        function: &str,
        mode: DraftMode,
    ) -> Result<String, ContractError> {
        validate_form(form).map_err(ContractError::Validation)?;

        let address = self.manager.address()?;
        let call = self.call(function, build_profile_args(form)?);
        let txid = self.dispatch(call).await?;

        // Optimistic local state until the chain confirms
        self.cache.mark_created(&address).map_err(WalletError::Store)?;
        self.cache
            .set_profile(&address, &DeveloperProfile::from_form(&address, form))
            .map_err(WalletError::Store)?;
        if let Err(e) = self.drafts.clear(&address, mode) {
            tracing::warn!(address, error = %e, "Failed to clear submitted draft");
        }

        tracing::info!(address, function, txid, "Profile transaction submitted");
        Ok(txid)
    }

    /// Submit a `delete-profile` transaction and purge all local data
    /// for the address.
    pub async fn delete_profile(&self) -> Result<String, ContractError> {
        let address = self.manager.address()?;
        let call = self.call("delete-profile", Vec::new());
        let txid = self.dispatch(call).await?;

        self.cache.delete_all(&address).map_err(WalletError::Store)?;
        tracing::info!(address, txid, "Profile deletion submitted, local data purged");
        Ok(txid)
    }

    fn call(&self, function: &str, args: Vec<ClarityValue>) -> ContractCall {
        ContractCall {
            contract_address: self.config.contract_address.clone(),
            contract_name: self.config.contract_name.clone(),
            function_name: function.to_string(),
            args,
        }
    }

    async fn dispatch(&self, call: ContractCall) -> Result<String, ContractError> {
        let resolver = self.manager.resolver();
        let kind = resolver.ensure_consistency()?;
        let provider = resolver.registry().get(kind)?;

        // Held for the whole signing flow; released on every exit path
        let _lease = resolver.registry().try_lease()?;

        match provider.request_contract_call(&call).await {
            Ok(txid) => Ok(txid),
            Err(WalletError::Provider(message)) => {
                let category = ErrorCategory::from_message(&message);
                tracing::warn!(
                    function = %call.function_name,
                    ?category,
                    message,
                    "Wallet rejected contract call"
                );
                // Raw provider text goes to the log above; callers get
                // the category's stable user-facing message
                match category {
                    ErrorCategory::Cancelled => Err(WalletError::UserCancelled.into()),
                    _ => Err(
                        WalletError::Provider(category.user_message().to_string()).into(),
                    ),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Argument list for `create-profile` / `update-profile`, in the order
/// the contract declares them.
fn build_profile_args(form: &ProfileForm) -> Result<Vec<ClarityValue>, ContractError> {
    let form = form.trimmed();
    let string_list = |entries: &[String]| -> Result<ClarityValue, ContractError> {
        let items = entries
            .iter()
            .map(|s| ClarityValue::string_ascii(s.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ClarityValue::List(items))
    };

    Ok(vec![
        ClarityValue::string_ascii(form.display_name)?,
        ClarityValue::string_ascii(form.bio)?,
        ClarityValue::string_ascii(form.location)?,
        ClarityValue::string_ascii(form.website)?,
        ClarityValue::string_ascii(form.github_username)?,
        ClarityValue::string_ascii(form.twitter_username)?,
        ClarityValue::string_ascii(form.linkedin_username)?,
        string_list(&form.skills)?,
        string_list(&form.specialties)?,
    ])
}
