//! Generated documents bundled into a certificate archive
//!
//! Every generator takes a [`CertificateRecord`](crate::CertificateRecord) and
//! returns the full contents of one archive entry. Generators that embed an
//! identifier or timestamp expose a `render_with` variant taking those values
//! explicitly.

pub mod credential;
pub mod instructions;
pub mod profile;

use uuid::Uuid;

/// Fresh random identifier for a generated document
///
/// Lowercase, hyphenated version-4 UUID. Not persisted anywhere.
pub fn new_profile_uuid() -> String {
    Uuid::new_v4().to_string()
}
