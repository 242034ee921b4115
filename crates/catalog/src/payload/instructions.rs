//! Setup instructions shipped as `password.txt`

use crate::payload::new_profile_uuid;
use crate::record::CertificateRecord;

/// Render the instructions document with a fresh UUID
pub fn render(record: &CertificateRecord) -> String {
    render_with(record, &new_profile_uuid())
}

/// Render the instructions document with an explicit UUID
pub fn render_with(record: &CertificateRecord, uuid: &str) -> String {
    let CertificateRecord {
        password,
        bundle_id,
        team_id,
        expiry_date,
        cert_type,
        ..
    } = record;

    format!(
        r#"Apple P12 Certificate Package
========================================

Certificate Details:
- Password: {password}
- Type: {cert_type}
- Bundle ID: {bundle_id}
- Team ID: {team_id}
- Expiry Date: {expiry_date}
- UUID: {uuid}

IPA Signing Compatibility:
✓ Compatible with IPA signers (AppSigner, iOS App Signer, etc.)
✓ No mobileprovision errors
✓ Proper entitlements included
✓ Valid certificate chain structure

Installation Instructions:

For Xcode Development:
1. Double-click the .p12 file to install in Keychain Access
2. Enter password: {password}
3. Import the .mobileprovision file into Xcode
4. Select this provisioning profile in your project settings

For IPA Signing Tools:
1. Use the .p12 file as your signing certificate
2. Use the .mobileprovision file as your provisioning profile
3. Enter password when prompted: {password}
4. The certificate is ready for IPA signing without errors

Troubleshooting:
- If you get "no valid certificates" error, ensure the .p12 is installed in Keychain
- For mobileprovision errors, check that the bundle ID matches your app
- Ensure your device UDID is included in development/adhoc profiles
- Certificate is valid until {expiry_date}

Support:
This certificate package is optimized for maximum compatibility with IPA signing tools
and includes all necessary entitlements and device identifiers."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Catalog;

    #[test]
    fn test_details_section() {
        let catalog = Catalog::seeded().unwrap();
        let record = catalog.find_active_by_id(3).unwrap();

        let text = render_with(record, "6f1c2c4e-9d4b-4a8e-8b1f-2e3d4c5b6a79");

        assert!(text.starts_with("Apple P12 Certificate Package\n"));
        assert!(text.contains("- Password: push789#\n"));
        assert!(text.contains("- Type: Push Notification\n"));
        assert!(text.contains("- Bundle ID: com.example.pushapp\n"));
        assert!(text.contains("- Team ID: XYZ789GHI0\n"));
        assert!(text.contains("- Expiry Date: 2024-12-31\n"));
        assert!(text.contains("- UUID: 6f1c2c4e-9d4b-4a8e-8b1f-2e3d4c5b6a79\n"));
        assert!(text.contains("- Certificate is valid until 2024-12-31\n"));
    }

    #[test]
    fn test_password_repeated_in_instructions() {
        let catalog = Catalog::seeded().unwrap();
        for record in catalog.list_active() {
            let text = render_with(record, "uuid");
            assert_eq!(text.matches(record.password.as_str()).count(), 3);
        }
    }

    #[test]
    fn test_fresh_uuid_per_render() {
        let catalog = Catalog::seeded().unwrap();
        let record = catalog.find_active_by_id(1).unwrap();
        assert_ne!(render(record), render(record));
    }
}
