//! Provisioning profile generator
//!
//! Renders an XML property list shaped like a `.mobileprovision` payload. The
//! entitlements and device list depend on the record's [`CertificateType`].

use crate::payload::new_profile_uuid;
use crate::record::{CertificateRecord, CertificateType};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};

/// Devices listed in every development and ad hoc profile
pub const PROVISIONED_DEVICES: [&str; 4] = [
    "00008030-001814A82E13002E",
    "00008101-000255021E99001E",
    "00008030-001A14A82E13002F",
    "00008101-000A55021E99001F",
];

pub const TEAM_NAME: &str = "Apple Development Team";

/// Days a profile claims to stay valid
pub const TIME_TO_LIVE_DAYS: u32 = 365;

/// Render a profile issued now with a fresh UUID
pub fn render(record: &CertificateRecord) -> String {
    render_with(record, Utc::now(), &new_profile_uuid())
}

/// Render a profile with an explicit issue time and UUID
pub fn render_with(record: &CertificateRecord, issued_at: DateTime<Utc>, uuid: &str) -> String {
    let name = escape_xml(&record.name);
    let team_id = escape_xml(&record.team_id);
    let app_id = escape_xml(&format!("{}.{}", record.team_id, record.bundle_id));
    let creation_date = issued_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let expiration_date = expiration_timestamp(record);
    let certificate_marker =
        STANDARD.encode(format!("{}{}", record.team_id, record.cert_type.display_name()));
    let debuggable = plist_bool(record.cert_type.allows_debugging());
    let entitlements = type_entitlements(record.cert_type, &app_id);
    let devices = device_entries(record.cert_type);
    let profile_file = escape_xml(&record.profile_file_name);
    let uuid = escape_xml(uuid);

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>AppIDName</key>
  <string>{name}</string>
  <key>ApplicationIdentifierPrefix</key>
  <array>
    <string>{team_id}</string>
  </array>
  <key>CreationDate</key>
  <date>{creation_date}</date>
  <key>Platform</key>
  <array>
    <string>iOS</string>
  </array>
  <key>IsXcodeManaged</key>
  <false/>
  <key>ExpirationDate</key>
  <date>{expiration_date}</date>
  <key>Name</key>
  <string>{name}</string>
  <key>TeamIdentifier</key>
  <array>
    <string>{team_id}</string>
  </array>
  <key>TeamName</key>
  <string>{TEAM_NAME}</string>
  <key>TimeToLive</key>
  <integer>{TIME_TO_LIVE_DAYS}</integer>
  <key>UUID</key>
  <string>{uuid}</string>
  <key>Version</key>
  <integer>1</integer>
  <key>DeveloperCertificates</key>
  <array>
    <data>
    MIIFmTCCBIGgAwIBAgIIBy7fHwuHMJkwDQYJKoZIhvcNAQELBQAwdTEUMBIGA1UE
    AwwLQXBwbGUgV1dEUiBDQTELMAkGA1UECwwCRzMxEzARBgNVBAoMCkFwcGxlIElu
    Yy4xCzAJBgNVBAYTAlVTMRAwDgYDVQQHDAdDdXBlcnRpbm8xHDAaBgNVBAgME0Nh
    bGlmb3JuaWExCzAJBgNVBAYTAlVTMB4XDTE4MDUwNDEyNTk1OFoXDTI1MDUwNDEy
    NTk1OFowgYExGzAZBgoJkiaJk/IsZAEZFgtjb20uZXhhbXBsZTE+MDwGA1UEAww1
    {certificate_marker}
    </data>
  </array>
  <key>Entitlements</key>
  <dict>
    <key>application-identifier</key>
    <string>{app_id}</string>
    <key>com.apple.developer.team-identifier</key>
    <string>{team_id}</string>
    <key>get-task-allow</key>
    {debuggable}
    <key>keychain-access-groups</key>
    <array>
      <string>{team_id}.*</string>
    </array>
{entitlements}
  </dict>
  <key>ProvisionedDevices</key>
  <array>
{devices}  </array>
  <key>LocalProvision</key>
  <false/>
  <key>ProvisioningProfileFile</key>
  <string>{profile_file}</string>
</dict>
</plist>"#
    )
}

/// Last second of the expiry day, in UTC
fn expiration_timestamp(record: &CertificateRecord) -> String {
    record
        .expiry_date
        .and_hms_opt(23, 59, 59)
        .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| format!("{}T23:59:59.000Z", record.expiry_date))
}

fn plist_bool(value: bool) -> &'static str {
    if value {
        "<true/>"
    } else {
        "<false/>"
    }
}

fn type_entitlements(cert_type: CertificateType, app_id: &str) -> String {
    let mut out = String::new();

    if cert_type.uses_push() {
        out.push_str("    <key>aps-environment</key>\n    <string>production</string>\n");
    }

    if cert_type.reports_beta() {
        out.push_str("    <key>beta-reports-active</key>\n    <true/>\n");
    }

    out.push_str(&format!(
        "    <key>com.apple.application-identifier</key>\n    <string>{app_id}</string>\n    <key>com.apple.developer.default-data-protection</key>\n    <string>NSFileProtectionComplete</string>"
    ));

    out
}

fn device_entries(cert_type: CertificateType) -> String {
    if !cert_type.provisions_devices() {
        return String::new();
    }

    PROVISIONED_DEVICES
        .iter()
        .map(|udid| format!("    <string>{udid}</string>\n"))
        .collect()
}

fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
