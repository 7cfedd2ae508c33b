use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;

use super::{functions, require_id};
use crate::client::BaasClient;
use crate::error::ApiError;
use crate::models::Contract;
use crate::session::Session;

/// Title given to uploads when the caller does not supply one.
pub const DEFAULT_CONTRACT_TITLE: &str = "Contrato de Revenda";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SellerIdRequest<'a> {
    seller_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadContractRequest<'a> {
    seller_id: &'a str,
    title: &'a str,
    file: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateContractRequest<'a> {
    contract_id: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractIdRequest<'a> {
    contract_id: &'a str,
}

impl BaasClient {
    /// `get-seller-contracts`.
    pub async fn seller_contracts(
        &self,
        session: &Session,
        seller_id: &str,
    ) -> Result<Vec<Contract>, ApiError> {
        require_id("seller", seller_id)?;
        self.call(
            session,
            functions::GET_SELLER_CONTRACTS,
            &SellerIdRequest { seller_id },
        )
        .await
    }

    /// `upload-seller-contract`. The file travels base64-encoded.
    pub async fn upload_contract(
        &self,
        session: &Session,
        seller_id: &str,
        title: Option<&str>,
        file: &[u8],
    ) -> Result<(), ApiError> {
        require_id("seller", seller_id)?;
        if file.is_empty() {
            return Err(ApiError::invalid("select a file to upload"));
        }
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONTRACT_TITLE);
        let body = UploadContractRequest {
            seller_id,
            title,
            file: STANDARD.encode(file),
        };
        let _: serde_json::Value = self
            .call(session, functions::UPLOAD_SELLER_CONTRACT, &body)
            .await?;
        Ok(())
    }

    /// `update-seller-contract`: retitle a contract.
    pub async fn rename_contract(
        &self,
        session: &Session,
        contract_id: &str,
        title: &str,
    ) -> Result<(), ApiError> {
        require_id("contract", contract_id)?;
        require_id("title", title)?;
        let body = UpdateContractRequest {
            contract_id,
            title: title.trim(),
        };
        let _: serde_json::Value = self
            .call(session, functions::UPDATE_SELLER_CONTRACT, &body)
            .await?;
        Ok(())
    }

    /// `delete-seller-contract`.
    pub async fn delete_contract(&self, session: &Session, contract_id: &str) -> Result<(), ApiError> {
        require_id("contract", contract_id)?;
        let _: serde_json::Value = self
            .call(
                session,
                functions::DELETE_SELLER_CONTRACT,
                &ContractIdRequest { contract_id },
            )
            .await?;
        Ok(())
    }
}
