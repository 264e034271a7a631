//! Coarse user-agent classification for signature metadata.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref TABLET_RE: Regex = Regex::new(r"(?i)ipad|tablet|kindle|silk/|playbook").unwrap();
    static ref MOBILE_RE: Regex =
        Regex::new(r"(?i)mobi|iphone|ipod|android|blackberry|iemobile|opera mini|windows phone")
            .unwrap();
    static ref ANDROID_RE: Regex = Regex::new(r"(?i)android").unwrap();
    static ref ANDROID_PHONE_RE: Regex = Regex::new(r"(?i)mobile").unwrap();
}

/// Device class derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    /// Phone-sized touch device
    Mobile,
    /// Tablet
    Tablet,
    /// Desktop or laptop browser
    Desktop,
    /// No user agent supplied
    Unknown,
}

impl DeviceClass {
    /// Classify a user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.trim();
        if ua.is_empty() {
            return DeviceClass::Unknown;
        }

        // Android tablets omit "Mobile"
        if TABLET_RE.is_match(ua) || (ANDROID_RE.is_match(ua) && !ANDROID_PHONE_RE.is_match(ua)) {
            DeviceClass::Tablet
        } else if MOBILE_RE.is_match(ua) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Whether signatures from this class were likely drawn by touch.
    pub fn is_touch(&self) -> bool {
        matches!(self, DeviceClass::Mobile | DeviceClass::Tablet)
    }
}

/// Browser family derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    /// Microsoft Edge (Chromium)
    Edge,
    /// Opera
    Opera,
    /// Samsung Internet
    Samsung,
    /// Google Chrome / Chromium
    Chrome,
    /// Mozilla Firefox
    Firefox,
    /// Apple Safari
    Safari,
    /// Anything else
    Other,
}

impl BrowserFamily {
    /// Classify a user-agent string.
    ///
    /// Chromium derivatives also advertise "Chrome" and "Safari", so the more
    /// specific markers are checked first.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent;
        if ua.contains("Edg/") || ua.contains("EdgA/") || ua.contains("EdgiOS/") {
            BrowserFamily::Edge
        } else if ua.contains("OPR/") || ua.contains("Opera") {
            BrowserFamily::Opera
        } else if ua.contains("SamsungBrowser/") {
            BrowserFamily::Samsung
        } else if ua.contains("Chrome/") || ua.contains("CriOS/") || ua.contains("Chromium/") {
            BrowserFamily::Chrome
        } else if ua.contains("Firefox/") || ua.contains("FxiOS/") {
            BrowserFamily::Firefox
        } else if ua.contains("Safari/") {
            BrowserFamily::Safari
        } else {
            BrowserFamily::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IPHONE_SAFARI: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const ANDROID_CHROME: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const WINDOWS_EDGE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.2210.91";
    const LINUX_FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";

    #[test]
    fn test_device_class() {
        assert_eq!(DeviceClass::from_user_agent(IPHONE_SAFARI), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(ANDROID_CHROME), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(ANDROID_TABLET), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_user_agent(IPAD), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_user_agent(WINDOWS_EDGE), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_user_agent(LINUX_FIREFOX), DeviceClass::Desktop);
        assert_eq!(DeviceClass::from_user_agent("  "), DeviceClass::Unknown);
    }

    #[test]
    fn test_browser_family() {
        assert_eq!(BrowserFamily::from_user_agent(IPHONE_SAFARI), BrowserFamily::Safari);
        assert_eq!(BrowserFamily::from_user_agent(ANDROID_CHROME), BrowserFamily::Chrome);
        assert_eq!(BrowserFamily::from_user_agent(WINDOWS_EDGE), BrowserFamily::Edge);
        assert_eq!(BrowserFamily::from_user_agent(LINUX_FIREFOX), BrowserFamily::Firefox);
        assert_eq!(BrowserFamily::from_user_agent("curl/8.4.0"), BrowserFamily::Other);
    }

    #[test]
    fn test_touch_classes() {
        assert!(DeviceClass::Mobile.is_touch());
        assert!(DeviceClass::Tablet.is_touch());
        assert!(!DeviceClass::Desktop.is_touch());
    }
}
