//! Profile data model.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// The on-chain record representing a developer's public portfolio data.
///
/// The wallet-derived address is the primary key; everything else is
/// user-supplied content subject to the contract's length limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperProfile {
    pub address: String,
    pub display_name: String,
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub twitter_username: String,
    #[serde(default)]
    pub linkedin_username: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub reputation: ReputationScore,
    #[serde(default)]
    pub is_verified: bool,
    /// Unix seconds
    pub joined_at: i64,
    /// Unix seconds
    pub last_active: i64,
}

impl DeveloperProfile {
    pub fn new(
        address: impl Into<String>,
        display_name: impl Into<String>,
        bio: impl Into<String>,
    ) -> Self {
        let now = Utc::now().timestamp();
        Self {
            address: address.into(),
            display_name: display_name.into(),
            bio: bio.into(),
            location: String::new(),
            website: String::new(),
            github_username: String::new(),
            twitter_username: String::new(),
            linkedin_username: String::new(),
            skills: Vec::new(),
            specialties: Vec::new(),
            reputation: ReputationScore::default(),
            is_verified: false,
            joined_at: now,
            last_active: now,
        }
    }

    /// Optimistic local view of a submitted form, shown while the chain
    /// has not yet confirmed the transaction.
    pub fn from_form(address: &str, form: &ProfileForm) -> Self {
        let form = form.trimmed();
        Self {
            address: address.to_string(),
            display_name: form.display_name,
            bio: form.bio,
            location: form.location,
            website: form.website,
            github_username: form.github_username,
            twitter_username: form.twitter_username,
            linkedin_username: form.linkedin_username,
            skills: form.skills,
            specialties: form.specialties,
            ..Self::new(address, "", "")
        }
    }
}

/// Reputation counters. There is no write path for these in the current
/// contract; they exist for forward compatibility with the stats surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReputationScore {
    pub overall: u32,
    pub contract_contributions: u32,
    pub community_endorsements: u32,
    pub project_completions: u32,
    pub mentorship_hours: u32,
    pub github_contributions: u32,
    pub stacks_transactions: u32,
    pub last_updated: i64,
}

/// Aggregate stats from the contract's `get-profile-stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    pub reputation_score: u64,
    pub endorsements_received: u64,
    pub projects_count: u64,
    pub contributions_count: u64,
}

/// Client-side shadow of the profile create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub github_username: String,
    #[serde(default)]
    pub twitter_username: String,
    #[serde(default)]
    pub linkedin_username: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
}

impl ProfileForm {
    /// Copy with all string fields trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            display_name: self.display_name.trim().to_string(),
            bio: self.bio.trim().to_string(),
            location: self.location.trim().to_string(),
            website: self.website.trim().to_string(),
            github_username: self.github_username.trim().to_string(),
            twitter_username: self.twitter_username.trim().to_string(),
            linkedin_username: self.linkedin_username.trim().to_string(),
            skills: self.skills.clone(),
            specialties: self.specialties.clone(),
        }
    }

    /// Whether the form holds anything worth persisting as a draft.
    pub fn has_content(&self) -> bool {
        !self.display_name.trim().is_empty()
            || !self.bio.trim().is_empty()
            || !self.location.trim().is_empty()
            || !self.website.trim().is_empty()
            || !self.github_username.trim().is_empty()
            || !self.twitter_username.trim().is_empty()
            || !self.linkedin_username.trim().is_empty()
            || !self.skills.is_empty()
            || !self.specialties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_has_no_content() {
        assert!(!ProfileForm::default().has_content());
    }

    #[test]
    fn test_skills_alone_count_as_content() {
        let form = ProfileForm {
            skills: vec!["DevOps".to_string()],
            ..Default::default()
        };
        assert!(form.has_content());
    }

    #[test]
    fn test_from_form_carries_fields() {
        let form = ProfileForm {
            display_name: "  Alice  ".to_string(),
            bio: "Clarity dev".to_string(),
            skills: vec!["Clarity Smart Contracts".to_string()],
            ..Default::default()
        };
        let profile = DeveloperProfile::from_form("ST1ABC", &form);
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.skills.len(), 1);
        assert!(!profile.is_verified);
    }
}
