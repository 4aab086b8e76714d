use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for enquiry records, assigned by the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnquiryId(pub String);

/// A sales enquiry from the public contact form. Enquiries are read-only
/// once stored; staff follow up out of band and eventually delete them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enquiry {
    pub id: EnquiryId,
    pub fullname: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Enquiry draft ahead of id assignment.
#[derive(Debug, Clone)]
pub struct NewEnquiry {
    pub fullname: String,
    pub email: String,
    pub mobile: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl NewEnquiry {
    pub fn into_enquiry(self, id: EnquiryId) -> Enquiry {
        Enquiry {
            id,
            fullname: self.fullname,
            email: self.email,
            mobile: self.mobile,
            message: self.message,
            created_at: self.created_at,
        }
    }
}
