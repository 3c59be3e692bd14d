use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Top,
    Jungle,
    Mid,
    #[serde(rename = "ADC")]
    Adc,
    Support,
}

impl Role {
    /// Draft order used when picks only come as `pick1..pick5`.
    pub const CANONICAL: [Role; 5] = [Role::Top, Role::Jungle, Role::Mid, Role::Adc, Role::Support];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Top => "Top",
            Role::Jungle => "Jungle",
            Role::Mid => "Mid",
            Role::Adc => "ADC",
            Role::Support => "Support",
        }
    }

    /// Recognized spellings only; `None` for anything else.
    pub fn parse(raw: &str) -> Option<Role> {
        let normalized = raw.trim().to_lowercase();
        let role = match normalized.as_str() {
            "top" | "t" | "1" | "toplane" | "top lane" => Role::Top,
            "jungle" | "jng" | "jg" | "jgl" | "j" | "2" => Role::Jungle,
            "mid" | "middle" | "m" | "3" | "midlane" | "mid lane" => Role::Mid,
            "adc" | "bot" | "bottom" | "ad carry" | "ad" | "carry" | "marksman" | "a" | "b"
            | "4" => Role::Adc,
            "support" | "sup" | "supp" | "utility" | "s" | "5" => Role::Support,
            _ => return None,
        };
        Some(role)
    }

    /// Total version of [`Role::parse`]: unrecognized input maps to Mid.
    /// The flag tells the caller whether the fallback was taken.
    pub fn normalize(raw: &str) -> (Role, bool) {
        match Role::parse(raw) {
            Some(role) => (role, false),
            None => (Role::Mid, true),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_spellings() {
        for raw in ["top", "TOP", "t", "1"] {
            assert_eq!(Role::normalize(raw), (Role::Top, false), "{raw}");
        }
    }

    #[test]
    fn adc_spellings() {
        for raw in ["adc", "bot", "ad carry", "4"] {
            assert_eq!(Role::normalize(raw), (Role::Adc, false), "{raw}");
        }
    }

    #[test]
    fn unknown_falls_back_to_mid() {
        assert_eq!(Role::normalize("coach"), (Role::Mid, true));
        assert_eq!(Role::normalize(""), (Role::Mid, true));
    }

    #[test]
    fn serializes_as_display_name() {
        assert_eq!(serde_json::to_string(&Role::Adc).ok().as_deref(), Some("\"ADC\""));
        assert_eq!(Role::Support.to_string(), "Support");
    }
}
