//! Vendor record - suppliers such as hotels, transport companies and guides.

use super::{Draft, EntityKind, Record};
use crate::core::store::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a vendor supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    /// Accommodation
    Hotel,
    /// Transfers, coaches, flights
    Transport,
    /// Local guides
    Guide,
    /// Anything else
    Other,
}

/// A supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    /// Unique identifier
    pub id: String,
    /// Company name
    pub name: String,
    /// What the vendor supplies
    #[serde(rename = "type")]
    pub vendor_type: VendorType,
    /// Contact person
    #[serde(default)]
    pub contact: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
    /// City or region
    #[serde(default)]
    pub location: String,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
}

/// Input for adding a vendor.
#[derive(Debug, Clone)]
pub struct NewVendor {
    /// Company name
    pub name: String,
    /// What the vendor supplies
    pub vendor_type: VendorType,
    /// Contact person
    pub contact: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// City or region
    pub location: String,
    /// Free-form notes
    pub notes: String,
}

impl Record for Vendor {
    const KIND: EntityKind = EntityKind::Vendor;

    fn id(&self) -> &str {
        &self.id
    }

    fn collection(snapshot: &Snapshot) -> &Vec<Self> {
        &snapshot.vendors
    }

    fn collection_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
        &mut snapshot.vendors
    }
}

impl Draft for NewVendor {
    type Output = Vendor;

    fn into_record(self, id: String, _now: DateTime<Utc>) -> Vendor {
        Vendor {
            id,
            name: self.name,
            vendor_type: self.vendor_type,
            contact: self.contact,
            email: self.email,
            phone: self.phone,
            location: self.location,
            notes: self.notes,
        }
    }
}
