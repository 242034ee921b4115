//! Data models for catalog records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of certificate a record represents
///
/// The kind decides which entitlements and device identifiers end up in the
/// generated provisioning profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertificateType {
    Distribution,
    Development,
    #[serde(rename = "Push Notification", alias = "PushNotification")]
    PushNotification,
    AdHoc,
}

impl CertificateType {
    /// All kinds, in declaration order
    pub const ALL: [CertificateType; 4] = [
        CertificateType::Distribution,
        CertificateType::Development,
        CertificateType::PushNotification,
        CertificateType::AdHoc,
    ];

    /// Human-readable name, as shown to clients and written into documents
    pub fn display_name(self) -> &'static str {
        match self {
            CertificateType::Distribution => "Distribution",
            CertificateType::Development => "Development",
            CertificateType::PushNotification => "Push Notification",
            CertificateType::AdHoc => "AdHoc",
        }
    }

    /// Whether profiles of this kind allow a debugger to attach
    pub fn allows_debugging(self) -> bool {
        matches!(self, CertificateType::Development | CertificateType::AdHoc)
    }

    /// Whether profiles of this kind carry a provisioned device list
    pub fn provisions_devices(self) -> bool {
        self.allows_debugging()
    }

    /// Whether profiles of this kind carry the push environment entitlement
    pub fn uses_push(self) -> bool {
        self == CertificateType::PushNotification
    }

    /// Whether profiles of this kind enable beta reporting
    pub fn reports_beta(self) -> bool {
        matches!(self, CertificateType::Distribution | CertificateType::AdHoc)
    }
}

impl fmt::Display for CertificateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A catalog entry describing one downloadable certificate bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Unique, immutable identifier
    pub id: u32,

    /// Display name, also used to derive the archive filename
    pub name: String,

    /// Developer team identifier
    pub team_id: String,

    /// Application bundle identifier
    pub bundle_id: String,

    /// Last day the certificate is valid
    pub expiry_date: NaiveDate,

    /// Free-form status label (e.g. "Active")
    pub status: String,

    #[serde(rename = "type")]
    pub cert_type: CertificateType,

    /// Revoked records are hidden from every read path
    #[serde(default)]
    pub is_revoked: bool,

    /// Archive entry name for the credential payload
    #[serde(alias = "p12File")]
    pub credential_file_name: String,

    /// Archive entry name for the profile payload
    #[serde(alias = "provisionFile")]
    pub profile_file_name: String,

    /// Plaintext password written into the instructions document
    pub password: String,
}

impl CertificateRecord {
    pub fn is_active(&self) -> bool {
        !self.is_revoked
    }
}

/// Public view of a record returned by listing endpoints
///
/// Omits the password and the archive entry names.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    pub id: u32,
    pub name: String,
    pub team_id: String,
    pub bundle_id: String,
    pub expiry_date: NaiveDate,
    pub status: String,
    #[serde(rename = "type")]
    pub cert_type: CertificateType,
}

impl From<&CertificateRecord> for CertificateSummary {
    fn from(record: &CertificateRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            team_id: record.team_id.clone(),
            bundle_id: record.bundle_id.clone(),
            expiry_date: record.expiry_date,
            status: record.status.clone(),
            cert_type: record.cert_type,
        }
    }
}
