use serde::{Deserialize, Serialize};

/// Which engagement report to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Top,
    Ranked,
    Users,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Top, ReportKind::Ranked, ReportKind::Users];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Top => "top",
            ReportKind::Ranked => "ranked",
            ReportKind::Users => "users",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "top" => Some(ReportKind::Top),
            "ranked" | "rank" => Some(ReportKind::Ranked),
            "users" | "user" => Some(ReportKind::Users),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Top => "Top engagement",
            ReportKind::Ranked => "Ranked engagement score",
            ReportKind::Users => "Per-user engagement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_kind_round_trip() {
        for kind in ReportKind::ALL {
            assert_eq!(ReportKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ReportKind::parse(" Ranked "), Some(ReportKind::Ranked));
        assert_eq!(ReportKind::parse("weekly"), None);
    }
}
