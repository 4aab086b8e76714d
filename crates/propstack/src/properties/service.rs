use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::directory::{CityStore, DirectoryError};

use super::domain::{
    Actor, ApprovalStatus, CityId, ListingAttributes, NewProperty, Property, PropertyId,
    PropertyPatch, UserId,
};
use super::filter::{listing_filter, FilterExpr, ListingQuery};
use super::media::MediaGateway;
use super::policy::{self, TransitionDenied};
use super::repository::{LocalitySummary, Page, PageRequest, PropertyStore, StoreError};

/// Service composing the policy rules, property store, city directory, and
/// media gateway.
pub struct ListingService<S, C, M> {
    store: Arc<S>,
    cities: Arc<C>,
    media: Arc<M>,
}

/// A property as responses carry it: the stored record plus resolved image
/// URLs, so clients never see raw media handles alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub image_urls: Vec<String>,
}

/// Outcome of a review decision, echoed back to the reviewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalReceipt {
    pub property_id: PropertyId,
    pub created_by: UserId,
    pub approved_by: Option<UserId>,
    pub approval_status: ApprovalStatus,
}

impl<S, C, M> ListingService<S, C, M>
where
    S: PropertyStore + 'static,
    C: CityStore + 'static,
    M: MediaGateway + 'static,
{
    pub fn new(store: Arc<S>, cities: Arc<C>, media: Arc<M>) -> Self {
        Self {
            store,
            cities,
            media,
        }
    }

    /// Create a listing. The creator's role fixes the initial review state:
    /// super admin submissions go live immediately, everything else waits in
    /// the review queue.
    pub fn create(
        &self,
        actor: &Actor,
        draft: ListingAttributes,
    ) -> Result<PropertyView, ServiceError> {
        if !policy::can_create(actor) {
            return Err(ServiceError::Forbidden("buyers cannot create listings"));
        }
        if draft.images.is_empty() {
            return Err(ServiceError::Validation(
                "at least one property image is required".to_string(),
            ));
        }

        let stamp = policy::initial_review(actor);
        let now = Utc::now();
        let stored = self.store.insert(NewProperty {
            listing: draft,
            created_by: actor.id.clone(),
            created_by_role: actor.role,
            approval_status: stamp.status,
            approved_by: stamp.approved_by,
            posted_at: now,
            created_at: now,
            updated_at: now,
        })?;

        Ok(self.view(stored))
    }

    /// Patch a listing's payload. Editing re-runs the review rule: a super
    /// admin's edit self-approves, while content changes by others send the
    /// record back to pending unless their own approval still covers it.
    pub fn update(
        &self,
        actor: &Actor,
        id: &PropertyId,
        patch: PropertyPatch,
    ) -> Result<PropertyView, ServiceError> {
        let mut property = self.store.get(id)?.ok_or(ServiceError::NotFound)?;
        if !policy::can_edit(actor, &property) {
            return Err(ServiceError::Forbidden(
                "only the creator or staff may edit a listing",
            ));
        }

        let images = patch.merged_images();
        if let Some(images) = &images {
            if images.is_empty() {
                return Err(ServiceError::Validation(
                    "a listing must keep at least one image".to_string(),
                ));
            }
        }

        let stamp = policy::review_after_edit(actor, &property);
        patch.apply(&mut property.listing);
        if let Some(images) = images {
            property.listing.images = images;
        }
        property.approval_status = stamp.status;
        property.approved_by = stamp.approved_by;
        property.updated_at = Utc::now();

        let stored = self.store.update(property)?;
        Ok(self.view(stored))
    }

    /// Apply a review decision. `Pending` is not a decision; re-approving an
    /// already approved record re-stamps the acting reviewer, and rejecting
    /// keeps the last approver on record.
    pub fn set_approval(
        &self,
        actor: &Actor,
        id: &PropertyId,
        decision: ApprovalStatus,
    ) -> Result<ApprovalReceipt, ServiceError> {
        if decision == ApprovalStatus::Pending {
            return Err(ServiceError::InvalidTransition);
        }

        let mut property = self.store.get(id)?.ok_or(ServiceError::NotFound)?;
        policy::authorize_transition(actor, &property)?;

        property.approval_status = decision;
        if decision == ApprovalStatus::Approved {
            property.approved_by = Some(actor.id.clone());
        }
        property.updated_at = Utc::now();

        let stored = self.store.update(property)?;
        Ok(ApprovalReceipt {
            property_id: stored.id,
            created_by: stored.created_by,
            approved_by: stored.approved_by,
            approval_status: stored.approval_status,
        })
    }

    /// Page through listings the viewer may see, narrowed by the caller's
    /// attribute filters. Filtering happens in the store, before skip/limit,
    /// so the page totals describe the filtered set.
    pub fn list(
        &self,
        viewer: Option<&Actor>,
        query: &ListingQuery,
    ) -> Result<Page<PropertyView>, ServiceError> {
        let filter = listing_filter(viewer, query);
        let page = PageRequest::new(query.page, query.limit);

        let records = self.store.find(&filter, page)?;
        let total = self.store.count(&filter)?;

        Ok(Page::assemble(records, total, page).map(|property| self.view(property)))
    }

    /// Fetch one listing, honoring the same visibility rule as `list`.
    pub fn get(
        &self,
        viewer: Option<&Actor>,
        id: &PropertyId,
    ) -> Result<PropertyView, ServiceError> {
        let property = self.store.get(id)?.ok_or(ServiceError::NotFound)?;
        if !policy::can_view(viewer, &property) {
            return Err(ServiceError::Forbidden(
                "this listing is not visible to your account",
            ));
        }
        Ok(self.view(property))
    }

    /// Remove a listing and release its images. Media failures are logged and
    /// skipped; the record is removed regardless.
    pub fn delete(&self, actor: &Actor, id: &PropertyId) -> Result<(), ServiceError> {
        if !policy::can_delete(actor) {
            return Err(ServiceError::Forbidden(
                "only a super admin may remove listings",
            ));
        }
        let property = self.store.get(id)?.ok_or(ServiceError::NotFound)?;

        for image in &property.listing.images {
            if let Err(err) = self.media.delete(image) {
                tracing::warn!(
                    property = %property.id.0,
                    image = %image.0,
                    error = %err,
                    "failed to release listing image"
                );
            }
        }

        self.store.delete(id)?;
        Ok(())
    }

    /// Localities in a city with at least one approved listing, name
    /// ascending. Pending and rejected records never surface here.
    pub fn localities_in_city(
        &self,
        city_id: &CityId,
    ) -> Result<Vec<LocalitySummary>, ServiceError> {
        self.cities.get(city_id)?.ok_or(ServiceError::NotFound)?;

        let filter = FilterExpr::InCity(city_id.clone())
            .and(FilterExpr::Status(ApprovalStatus::Approved));
        Ok(self.store.group_localities(&filter)?)
    }

    fn view(&self, property: Property) -> PropertyView {
        let image_urls = property
            .listing
            .images
            .iter()
            .map(|image| self.media.public_url(image))
            .collect();
        PropertyView {
            property,
            image_urls,
        }
    }
}

/// Error raised by the listing service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("listing not found")]
    NotFound,
    #[error("{0}")]
    Forbidden(&'static str),
    #[error(transparent)]
    Denied(#[from] TransitionDenied),
    #[error("approval decisions must be approved or rejected")]
    InvalidTransition,
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
