use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for user accounts, issued by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Identifier wrapper for stored properties, assigned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Identifier wrapper for reference cities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityId(pub String);

/// Opaque handle to an uploaded image held by the media collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

/// Closed set of account roles. Unrecognized wire values never reach this
/// enum; `Role::parse` returns `None` and callers fall back to the anonymous
/// (approved-only) view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
    SuperAdmin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
            Role::SuperAdmin => "superAdmin",
        }
    }

    /// Parse a role claim from the authentication collaborator.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "buyer" => Some(Role::Buyer),
            "seller" => Some(Role::Seller),
            "admin" => Some(Role::Admin),
            "superAdmin" => Some(Role::SuperAdmin),
            _ => None,
        }
    }
}

/// The authenticated caller of an operation. Supplied per request; never
/// persisted by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId(id.into()),
            role,
        }
    }
}

/// Tri-state review flag on a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingType {
    Sale,
    Rent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Apartment,
    House,
    Villa,
    #[serde(rename = "Farm House")]
    FarmHouse,
    Commercial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Plot,
    Duplex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VillaTheme {
    Magenta,
    Green,
    Gray,
    Orange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlooringType {
    Tiles,
    Marble,
    Concrete,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegalStatus {
    #[default]
    Clear,
    #[serde(rename = "Under Dispute")]
    UnderDispute,
    Encumbrances,
}

/// Marketing/status flag kept separate from the review workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Available,
    Sold,
    Rented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Amenity {
    Restrooms,
    Storage,
    LoadingFacility,
    FireSafety,
    AirConditioning,
}

/// Structured detail block; every field optional since relevance depends on
/// the property type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetails {
    pub which_type: Option<PlotKind>,
    pub villa_type: Option<VillaTheme>,
    pub plot_size: Option<String>,
    pub plot_number: Option<u32>,
    pub total_area: Option<f64>,
    pub built_up_area: Option<f64>,
    pub carpet_area: Option<f64>,
    pub price_per_sq_ft: Option<f64>,
    pub workspaces: Option<u32>,
    pub meeting_rooms: Option<u32>,
    pub floors: Option<u32>,
}

/// Locality within a city; coordinates are carried as the free-form strings
/// the upstream data entry produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub name: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyLocation {
    pub city_id: CityId,
    pub locality: Locality,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadAccess {
    pub available: bool,
    pub width_ft: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFeatures {
    pub parking: bool,
    pub power_backup: bool,
    pub lift: bool,
    #[serde(rename = "securityCCTV")]
    pub security_cctv: bool,
    pub flooring_type: Option<FlooringType>,
    #[serde(default)]
    pub road_access: RoadAccess,
    #[serde(default)]
    pub legal_status: LegalStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerContact {
    pub name: Option<String>,
}

/// The pass-through listing payload: everything the creator owns outright and
/// the visibility core never inspects (except `location` and `price`, which
/// attribute filters read).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingAttributes {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub listing_type: ListingType,
    pub property_type: PropertyType,
    #[serde(default)]
    pub details: PropertyDetails,
    pub location: PropertyLocation,
    pub sale_out_date: Option<NaiveDate>,
    #[serde(rename = "propertyImages")]
    pub images: Vec<ImageRef>,
    pub category: String,
    /// Human-facing listing code, distinct from the storage-assigned id.
    #[serde(rename = "propertyId")]
    pub listing_code: String,
    #[serde(default)]
    pub features: PropertyFeatures,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    pub owner: Option<OwnerContact>,
    #[serde(rename = "status", default)]
    pub availability: Availability,
}

/// A stored property record: listing payload plus the governance fields the
/// visibility and approval policy operates on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    #[serde(flatten)]
    pub listing: ListingAttributes,
    pub created_by: UserId,
    /// Creator's role at creation time, denormalized so listing filters need
    /// no join. Not re-synced if the account's role later changes.
    pub created_by_role: Role,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<UserId>,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A property awaiting its storage-assigned id.
#[derive(Debug, Clone)]
pub struct NewProperty {
    pub listing: ListingAttributes,
    pub created_by: UserId,
    pub created_by_role: Role,
    pub approval_status: ApprovalStatus,
    pub approved_by: Option<UserId>,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewProperty {
    pub fn into_property(self, id: PropertyId) -> Property {
        Property {
            id,
            listing: self.listing,
            created_by: self.created_by,
            created_by_role: self.created_by_role,
            approval_status: self.approval_status,
            approved_by: self.approved_by,
            posted_at: self.posted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial update to the listing payload. `Some` replaces, `None` keeps.
/// Image handling follows the upload flow: `kept_images` lists identifiers to
/// retain, `new_images` the freshly uploaded ones; when neither is supplied
/// the current set is untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub listing_type: Option<ListingType>,
    pub property_type: Option<PropertyType>,
    pub details: Option<PropertyDetails>,
    pub location: Option<PropertyLocation>,
    pub sale_out_date: Option<NaiveDate>,
    pub category: Option<String>,
    #[serde(rename = "propertyId")]
    pub listing_code: Option<String>,
    pub features: Option<PropertyFeatures>,
    pub amenities: Option<Vec<Amenity>>,
    pub owner: Option<OwnerContact>,
    #[serde(rename = "status")]
    pub availability: Option<Availability>,
    #[serde(rename = "existingImages")]
    pub kept_images: Option<Vec<ImageRef>>,
    pub new_images: Vec<ImageRef>,
}

impl PropertyPatch {
    /// Resolve the image set the patched record should carry, or `None` when
    /// the patch does not touch images.
    pub fn merged_images(&self) -> Option<Vec<ImageRef>> {
        if self.kept_images.is_none() && self.new_images.is_empty() {
            return None;
        }
        let mut images = self.kept_images.clone().unwrap_or_default();
        images.extend(self.new_images.iter().cloned());
        Some(images)
    }

    /// Fold the patch into an existing listing payload. Images are handled
    /// separately by the service so the non-empty invariant can be checked.
    pub fn apply(self, listing: &mut ListingAttributes) {
        if let Some(title) = self.title {
            listing.title = title;
        }
        if let Some(description) = self.description {
            listing.description = Some(description);
        }
        if let Some(price) = self.price {
            listing.price = Some(price);
        }
        if let Some(listing_type) = self.listing_type {
            listing.listing_type = listing_type;
        }
        if let Some(property_type) = self.property_type {
            listing.property_type = property_type;
        }
        if let Some(details) = self.details {
            listing.details = details;
        }
        if let Some(location) = self.location {
            listing.location = location;
        }
        if let Some(sale_out_date) = self.sale_out_date {
            listing.sale_out_date = Some(sale_out_date);
        }
        if let Some(category) = self.category {
            listing.category = category;
        }
        if let Some(listing_code) = self.listing_code {
            listing.listing_code = listing_code;
        }
        if let Some(features) = self.features {
            listing.features = features;
        }
        if let Some(amenities) = self.amenities {
            listing.amenities = amenities;
        }
        if let Some(owner) = self.owner {
            listing.owner = Some(owner);
        }
        if let Some(availability) = self.availability {
            listing.availability = availability;
        }
    }
}
