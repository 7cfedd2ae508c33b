use serde::Serialize;

use super::{functions, require_id};
use crate::client::{BaasClient, NoParams};
use crate::error::ApiError;
use crate::models::{Reseller, ResellerDraft, SellerDetails};
use crate::session::Session;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserIdRequest<'a> {
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserRequest<'a> {
    user_id: &'a str,
    fullname: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SellerIdRequest<'a> {
    seller_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateSellerDetailsRequest<'a> {
    seller_id: &'a str,
    contact: &'a str,
    address: &'a str,
}

fn validate_draft(draft: &ResellerDraft, require_password: bool) -> Result<(), ApiError> {
    if draft.fullname.trim().is_empty() || draft.email.trim().is_empty() {
        return Err(ApiError::invalid("name and email are required"));
    }
    if require_password && draft.password.is_empty() {
        return Err(ApiError::invalid("password is required"));
    }
    Ok(())
}

impl BaasClient {
    /// `list-resellers`.
    pub async fn resellers(&self, session: &Session) -> Result<Vec<Reseller>, ApiError> {
        self.call(session, functions::LIST_RESELLERS, &NoParams {})
            .await
    }

    /// `list-resellers`, dropping soft-deleted accounts.
    pub async fn active_resellers(&self, session: &Session) -> Result<Vec<Reseller>, ApiError> {
        let mut resellers = self.resellers(session).await?;
        resellers.retain(|r| !r.is_deleted);
        Ok(resellers)
    }

    /// `get-resellers-summarys`.
    pub async fn resellers_summary(&self, session: &Session) -> Result<Vec<Reseller>, ApiError> {
        self.call(session, functions::RESELLERS_SUMMARY, &NoParams {})
            .await
    }

    /// `signup`. Runs without a session.
    pub async fn signup(&self, draft: &ResellerDraft) -> Result<(), ApiError> {
        validate_draft(draft, true)?;
        let _: serde_json::Value = self.call_anonymous(functions::SIGNUP, draft).await?;
        Ok(())
    }

    /// `update-user`. An empty password leaves it unchanged server-side.
    pub async fn update_user(
        &self,
        session: &Session,
        user_id: &str,
        draft: &ResellerDraft,
    ) -> Result<(), ApiError> {
        require_id("user", user_id)?;
        validate_draft(draft, false)?;
        let body = UpdateUserRequest {
            user_id,
            fullname: draft.fullname.trim(),
            email: draft.email.trim(),
            password: &draft.password,
        };
        let _: serde_json::Value = self.call(session, functions::UPDATE_USER, &body).await?;
        Ok(())
    }

    /// `soft-delete-user`.
    pub async fn soft_delete_user(&self, session: &Session, user_id: &str) -> Result<(), ApiError> {
        require_id("user", user_id)?;
        let _: serde_json::Value = self
            .call(session, functions::SOFT_DELETE_USER, &UserIdRequest { user_id })
            .await?;
        Ok(())
    }

    /// `restore-user`.
    pub async fn restore_user(&self, session: &Session, user_id: &str) -> Result<(), ApiError> {
        require_id("user", user_id)?;
        let _: serde_json::Value = self
            .call(session, functions::RESTORE_USER, &UserIdRequest { user_id })
            .await?;
        Ok(())
    }

    /// `get-seller-details`.
    pub async fn seller_details(
        &self,
        session: &Session,
        seller_id: &str,
    ) -> Result<SellerDetails, ApiError> {
        require_id("seller", seller_id)?;
        self.call(
            session,
            functions::GET_SELLER_DETAILS,
            &SellerIdRequest { seller_id },
        )
        .await
    }

    /// `update-seller-details`.
    pub async fn update_seller_details(
        &self,
        session: &Session,
        seller_id: &str,
        contact: &str,
        address: &str,
    ) -> Result<(), ApiError> {
        require_id("seller", seller_id)?;
        let body = UpdateSellerDetailsRequest {
            seller_id,
            contact: contact.trim(),
            address: address.trim(),
        };
        let _: serde_json::Value = self
            .call(session, functions::UPDATE_SELLER_DETAILS, &body)
            .await?;
        Ok(())
    }
}
