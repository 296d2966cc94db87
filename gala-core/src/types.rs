use serde::{Deserialize, Serialize};

/// One registered attendee. The QR code printed on the badge is the
/// unique key; the remote registration service owns the authoritative
/// record, we only hold snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub qr_code: String,
    pub name: String,
    pub surname: String,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub donation: f64,
}

impl Participant {
    pub fn new(
        qr_code: impl Into<String>,
        name: impl Into<String>,
        surname: impl Into<String>,
    ) -> Self {
        Self {
            qr_code: qr_code.into(),
            name: name.into(),
            surname: surname.into(),
            visited: false,
            donation: 0.0,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

/// Staff role. Admin unlocks roster management, export/import and the
/// lottery; hostess devices only scan and record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Hostess,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Hostess => "hostess",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "hostess" => Some(Role::Hostess),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregates shown on the statistics panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub total: usize,
    pub present: usize,
    pub total_donations: f64,
    pub big_donors: usize,
}

impl RosterStats {
    /// Compute stats over a roster snapshot. `minimum_donation` is the
    /// lottery eligibility threshold used for the big-donor count.
    pub fn compute(roster: &[Participant], minimum_donation: f64) -> Self {
        Self {
            total: roster.len(),
            present: roster.iter().filter(|p| p.visited).count(),
            total_donations: roster.iter().map(|p| p.donation).sum(),
            big_donors: roster
                .iter()
                .filter(|p| p.donation >= minimum_donation)
                .count(),
        }
    }
}
