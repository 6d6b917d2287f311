//! Editable projection of a [`Profile`].
//!
//! The form renames two lists (`professionalExperiences` is edited as
//! `experiences`, `academicAchievements` as `achievements`) and turns the
//! social-link map into ordered rows so a half-typed row can exist while
//! editing. [`ProfileForm::to_profile`] maps everything back and drops social
//! rows missing a platform or url.

#[cfg(test)]
#[path = "profile_form_test.rs"]
mod profile_form_test;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::Profile;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

/// A repeatable form section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListField {
    Skills,
    Experiences,
    Achievements,
    Interests,
    SocialLinks,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub profile_photo: String,
    pub cover_photo: String,
    pub skills: Vec<String>,
    pub experiences: Vec<String>,
    pub achievements: Vec<String>,
    pub interests: Vec<String>,
    pub social_links: Vec<SocialLink>,
    /// Scalar fields this form does not model (major, bio, cgpa, ...).
    pub extra: Map<String, Value>,
}

impl ProfileForm {
    #[must_use]
    pub fn from_profile(profile: Profile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            profile_photo: profile.profile_photo,
            cover_photo: profile.cover_photo,
            skills: profile.skills,
            experiences: profile.professional_experiences,
            achievements: profile.academic_achievements,
            interests: profile.interests,
            social_links: profile
                .social_links
                .into_iter()
                .map(|(platform, url)| SocialLink { platform, url })
                .collect(),
            extra: profile.extra,
        }
    }

    #[must_use]
    pub fn to_profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            profile_photo: self.profile_photo.clone(),
            cover_photo: self.cover_photo.clone(),
            skills: self.skills.clone(),
            professional_experiences: self.experiences.clone(),
            academic_achievements: self.achievements.clone(),
            interests: self.interests.clone(),
            social_links: self
                .social_links
                .iter()
                .filter(|l| !l.platform.is_empty() && !l.url.is_empty())
                .map(|l| (l.platform.clone(), l.url.clone()))
                .collect(),
            extra: self.extra.clone(),
        }
    }

    /// First name, last name and email must be non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingRequiredFields`] otherwise.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [&self.first_name, &self.last_name, &self.email];
        if required.iter().any(|v| v.trim().is_empty()) {
            return Err(ValidationError::MissingRequiredFields);
        }
        Ok(())
    }

    /// Set a scalar field by its backend name. Names without a dedicated
    /// field land in `extra`.
    pub fn set_field(&mut self, name: &str, value: &str) {
        let slot = match name {
            "firstName" => &mut self.first_name,
            "lastName" => &mut self.last_name,
            "email" => &mut self.email,
            "profilePhoto" => &mut self.profile_photo,
            "coverPhoto" => &mut self.cover_photo,
            _ => {
                self.extra.insert(name.to_owned(), Value::String(value.to_owned()));
                return;
            }
        };
        value.clone_into(slot);
    }

    /// Append a blank entry to a list section.
    pub fn add_entry(&mut self, field: ListField) {
        match self.list_mut(field) {
            Some(list) => list.push(String::new()),
            None => self.social_links.push(SocialLink::default()),
        }
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn delete_entry(&mut self, field: ListField, index: usize) {
        let len = self.len(field);
        if index >= len {
            return;
        }
        match self.list_mut(field) {
            Some(list) => {
                list.remove(index);
            }
            None => {
                self.social_links.remove(index);
            }
        }
    }

    /// Overwrite a string entry; returns false if out of range or the field
    /// is `SocialLinks`.
    pub fn set_entry(&mut self, field: ListField, index: usize, value: &str) -> bool {
        let Some(slot) = self.list_mut(field).and_then(|l| l.get_mut(index)) else {
            return false;
        };
        value.clone_into(slot);
        true
    }

    pub fn set_social_link(&mut self, index: usize, platform: &str, url: &str) -> bool {
        let Some(link) = self.social_links.get_mut(index) else {
            return false;
        };
        platform.clone_into(&mut link.platform);
        url.clone_into(&mut link.url);
        true
    }

    #[must_use]
    pub fn len(&self, field: ListField) -> usize {
        match field {
            ListField::Skills => self.skills.len(),
            ListField::Experiences => self.experiences.len(),
            ListField::Achievements => self.achievements.len(),
            ListField::Interests => self.interests.len(),
            ListField::SocialLinks => self.social_links.len(),
        }
    }

    fn list_mut(&mut self, field: ListField) -> Option<&mut Vec<String>> {
        match field {
            ListField::Skills => Some(&mut self.skills),
            ListField::Experiences => Some(&mut self.experiences),
            ListField::Achievements => Some(&mut self.achievements),
            ListField::Interests => Some(&mut self.interests),
            ListField::SocialLinks => None,
        }
    }
}
