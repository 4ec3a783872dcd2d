//! Normalization of raw dimension values into report categories.
//!
//! Events store whatever the client sent. These functions are the only place
//! raw device, browser and country values are interpreted; both the raw-event
//! and the precomputed report paths go through them.

/// Category for empty or unrecognized values.
pub const UNKNOWN: &str = "Unknown";

pub const DEVICE_MOBILE: &str = "mobile";
pub const DEVICE_DESKTOP: &str = "desktop";
pub const DEVICE_TABLET: &str = "tablet";

/// Device categories always present in a device breakdown.
pub const DEVICE_CATEGORIES: &[&str] = &[DEVICE_MOBILE, DEVICE_DESKTOP, DEVICE_TABLET];

/// Maps a raw device type or user agent to `mobile`, `desktop`, `tablet` or
/// [`UNKNOWN`].
///
/// ```
/// use linkfolio::domain::analytics::classify::classify_device;
///
/// assert_eq!(classify_device(Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)")), "mobile");
/// assert_eq!(classify_device(Some("iPad")), "tablet");
/// assert_eq!(classify_device(None), "Unknown");
/// ```
pub fn classify_device(raw: Option<&str>) -> &'static str {
    let Some(value) = non_empty_lowercase(raw) else {
        return UNKNOWN;
    };

    // Tablets first: iPad and Android tablet agents also mention mobile OSes.
    if contains_any(&value, &["tablet", "ipad", "kindle", "silk", "playbook"]) {
        DEVICE_TABLET
    } else if contains_any(
        &value,
        &["mobile", "android", "iphone", "ipod", "phone", "blackberry", "opera mini"],
    ) {
        DEVICE_MOBILE
    } else if contains_any(
        &value,
        &["desktop", "windows", "macintosh", "mac os", "x11", "linux", "cros", "laptop"],
    ) {
        DEVICE_DESKTOP
    } else {
        UNKNOWN
    }
}

/// Maps a raw browser name or user agent to a browser family.
///
/// Order matters: Edge and Opera agents contain `Chrome`, and Chrome agents
/// contain `Safari`.
pub fn classify_browser(raw: Option<&str>) -> &'static str {
    let Some(value) = non_empty_lowercase(raw) else {
        return UNKNOWN;
    };

    if contains_any(&value, &["edg"]) {
        "Edge"
    } else if contains_any(&value, &["opr/", "opera"]) {
        "Opera"
    } else if contains_any(&value, &["samsungbrowser", "samsung"]) {
        "Samsung Internet"
    } else if contains_any(&value, &["firefox", "fxios"]) {
        "Firefox"
    } else if contains_any(&value, &["chrome", "crios", "chromium"]) {
        "Chrome"
    } else if value.contains("safari") {
        "Safari"
    } else {
        "Other"
    }
}

/// Normalizes a raw country value to an uppercase ISO 3166-1 alpha-2 code,
/// or [`UNKNOWN`] if it is not one.
pub fn classify_country(raw: Option<&str>) -> String {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return UNKNOWN.to_string();
    };

    let code = value.to_ascii_uppercase();
    if code.len() == 2 && ISO_3166_ALPHA2.contains(&code.as_str()) {
        code
    } else {
        UNKNOWN.to_string()
    }
}

fn non_empty_lowercase(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_lowercase)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

const ISO_3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX",
    "AZ", "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ",
    "BR", "BS", "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK",
    "CL", "CM", "CN", "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM",
    "DO", "DZ", "EC", "EE", "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR",
    "GA", "GB", "GD", "GE", "GF", "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS",
    "GT", "GU", "GW", "GY", "HK", "HM", "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN",
    "IO", "IQ", "IR", "IS", "IT", "JE", "JM", "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN",
    "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC", "LI", "LK", "LR", "LS", "LT", "LU", "LV",
    "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK", "ML", "MM", "MN", "MO", "MP", "MQ",
    "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA", "NC", "NE", "NF", "NG", "NI",
    "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG", "PH", "PK", "PL", "PM",
    "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW", "SA", "SB", "SC",
    "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS", "ST", "SV",
    "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO", "TR",
    "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];
