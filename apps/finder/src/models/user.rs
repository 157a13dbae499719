#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// The authenticated account as returned by `GET /api/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub is_verified: bool,
    pub profile: Option<Profile>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

/// Body of `PUT /api/profile`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
}

impl ProfileUpdate {
    /// Adds a skill unless it is blank or already listed. Returns whether it was added.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s == skill) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }
}

impl From<Profile> for ProfileUpdate {
    fn from(p: Profile) -> Self {
        Self {
            full_name: p.full_name,
            role: p.role,
            experience: p.experience,
            skills: p.skills,
            bio: p.bio,
            image_url: p.image_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i64,
    pub user_id: i64,
    pub filename: String,
    pub description: String,
    pub url: String,
}
