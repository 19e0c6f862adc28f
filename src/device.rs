// Device detection: phones and tablets get a thinner brush.

use regex::Regex;
use std::sync::LazyLock;

static MOBILE_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini")
        .expect("static regex")
});

/// True if the user-agent string names a mobile device.
pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_AGENT.is_match(user_agent)
}

/// A user-agent-like description of the host we were built for.
pub fn host_user_agent() -> String {
    format!("{}/{} ({})", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), platform_name())
}

fn platform_name() -> &'static str {
    match std::env::consts::OS {
        "android" => "Android",
        "ios" => "iPhone",
        "macos" => "Macintosh",
        "windows" => "Windows NT",
        "linux" => "X11; Linux",
        other => other,
    }
}

pub fn is_mobile_device() -> bool {
    is_mobile_user_agent(&host_user_agent())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_phones() {
        assert!(is_mobile_user_agent(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15"
        ));
        assert!(is_mobile_user_agent("Mozilla/5.0 (Linux; android 14; Pixel 8)"));
        assert!(is_mobile_user_agent("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
    }

    #[test]
    fn desktop_is_not_mobile() {
        assert!(!is_mobile_user_agent(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
        ));
        assert!(!is_mobile_user_agent(""));
    }

    #[test]
    fn host_agent_matches_target() {
        let mobile = matches!(std::env::consts::OS, "android" | "ios");
        assert_eq!(is_mobile_device(), mobile);
    }
}
