//! Declarative query filters handed to the storage collaborator.
//!
//! Listing endpoints must filter in the store, before skip/limit, or
//! pagination totals drift. `FilterExpr` is the storage-agnostic predicate
//! the store executes; `FilterExpr::matches` defines the reference semantics
//! any native translation has to agree with.

use serde::{Deserialize, Serialize};

use super::domain::{
    Actor, ApprovalStatus, CityId, ListingType, Property, PropertyType, Role, UserId,
};

/// Boolean predicate over the fields a listing query may constrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterExpr {
    /// Matches every record.
    All,
    Status(ApprovalStatus),
    CreatedBy(UserId),
    CreatorRole(Role),
    InCity(CityId),
    /// Case-insensitive substring match on the locality name.
    LocalityContains(String),
    PropertyKind(PropertyType),
    ListingKind(ListingType),
    PriceAtLeast(u64),
    PriceAtMost(u64),
    AllOf(Vec<FilterExpr>),
    AnyOf(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Conjoin two filters, keeping the tree shallow.
    pub fn and(self, other: FilterExpr) -> FilterExpr {
        match (self, other) {
            (FilterExpr::All, rhs) => rhs,
            (lhs, FilterExpr::All) => lhs,
            (FilterExpr::AllOf(mut clauses), rhs) => {
                clauses.push(rhs);
                FilterExpr::AllOf(clauses)
            }
            (lhs, rhs) => FilterExpr::AllOf(vec![lhs, rhs]),
        }
    }

    /// Reference evaluation. A store translating this expression into its
    /// native query language must admit exactly the records `matches` admits.
    pub fn matches(&self, property: &Property) -> bool {
        match self {
            FilterExpr::All => true,
            FilterExpr::Status(status) => property.approval_status == *status,
            FilterExpr::CreatedBy(user) => property.created_by == *user,
            FilterExpr::CreatorRole(role) => property.created_by_role == *role,
            FilterExpr::InCity(city) => property.listing.location.city_id == *city,
            FilterExpr::LocalityContains(needle) => property
                .listing
                .location
                .locality
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            FilterExpr::PropertyKind(kind) => property.listing.property_type == *kind,
            FilterExpr::ListingKind(kind) => property.listing.listing_type == *kind,
            FilterExpr::PriceAtLeast(floor) => {
                property.listing.price.map(|p| p >= *floor).unwrap_or(false)
            }
            FilterExpr::PriceAtMost(ceiling) => property
                .listing
                .price
                .map(|p| p <= *ceiling)
                .unwrap_or(false),
            FilterExpr::AllOf(clauses) => clauses.iter().all(|clause| clause.matches(property)),
            FilterExpr::AnyOf(clauses) => clauses.iter().any(|clause| clause.matches(property)),
        }
    }
}

/// The visibility rule as a storage filter. Must stay in lockstep with
/// `policy::can_view`; the parity tests enumerate every role against both.
pub fn visibility_filter(viewer: Option<&Actor>) -> FilterExpr {
    let Some(actor) = viewer else {
        return FilterExpr::Status(ApprovalStatus::Approved);
    };

    match actor.role {
        Role::Buyer => FilterExpr::Status(ApprovalStatus::Approved),
        Role::Seller => FilterExpr::CreatedBy(actor.id.clone()),
        Role::Admin => FilterExpr::AnyOf(vec![
            FilterExpr::CreatedBy(actor.id.clone()),
            FilterExpr::AllOf(vec![
                FilterExpr::CreatorRole(Role::Seller),
                FilterExpr::Status(ApprovalStatus::Pending),
            ]),
        ]),
        Role::SuperAdmin => FilterExpr::All,
    }
}

/// Caller-supplied attribute constraints for the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    pub city_id: Option<CityId>,
    pub locality: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            city_id: None,
            locality: None,
            property_type: None,
            listing_type: None,
            min_price: None,
            max_price: None,
        }
    }
}

impl ListingQuery {
    /// The attribute constraints alone, without any visibility scoping.
    pub fn attribute_filter(&self) -> FilterExpr {
        let mut clauses = Vec::new();

        if let Some(floor) = self.min_price {
            clauses.push(FilterExpr::PriceAtLeast(floor));
        }
        if let Some(ceiling) = self.max_price {
            clauses.push(FilterExpr::PriceAtMost(ceiling));
        }
        if let Some(city) = &self.city_id {
            clauses.push(FilterExpr::InCity(city.clone()));
        }
        if let Some(locality) = &self.locality {
            if !locality.trim().is_empty() {
                clauses.push(FilterExpr::LocalityContains(locality.clone()));
            }
        }
        if let Some(kind) = self.property_type {
            clauses.push(FilterExpr::PropertyKind(kind));
        }
        if let Some(kind) = self.listing_type {
            clauses.push(FilterExpr::ListingKind(kind));
        }

        match clauses.len() {
            0 => FilterExpr::All,
            1 => clauses.remove(0),
            _ => FilterExpr::AllOf(clauses),
        }
    }
}

/// Complete listing filter: visibility scope AND caller attributes.
pub fn listing_filter(viewer: Option<&Actor>, query: &ListingQuery) -> FilterExpr {
    visibility_filter(viewer).and(query.attribute_filter())
}
