//! Profile wire format

use serde::{Deserialize, Serialize};

use super::{UserOut, nullable};
use crate::{
    error::FieldErrors,
    models::{NewProfile, Profile, UpdateProfile, User},
    storage::media_url,
    validation::validate_max_len,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOut {
    pub id: i64,
    pub user: UserOut,
    pub full_name: String,
    pub avatar: Option<String>,
    pub bio: String,
    pub parser: Option<String>,
    pub be: Option<String>,
}

impl ProfileOut {
    pub fn new(profile: &Profile, user: &User) -> Self {
        Self {
            id: profile.id,
            user: UserOut::from(user),
            full_name: profile.full_name.clone(),
            avatar: profile.avatar.as_deref().map(media_url),
            bio: profile.bio.clone(),
            parser: profile.parser.clone(),
            be: profile.be.clone(),
        }
    }
}

/// Profile body; any `user` key is ignored since the owner is the caller
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub parser: Option<Option<String>>,
    #[serde(deserialize_with = "nullable")]
    pub be: Option<Option<String>>,
}

impl ProfileInput {
    fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if let Some(full_name) = &self.full_name {
            errors.check("full_name", validate_max_len(full_name, Some(100)));
        }
        for (field, value) in [("parser", &self.parser), ("be", &self.be)] {
            if let Some(Some(value)) = value {
                errors.check(field, validate_max_len(value, Some(100)));
            }
        }
        errors
    }

    pub fn into_new(self, user_id: i64) -> Result<NewProfile, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewProfile {
            user_id,
            full_name: self.full_name.unwrap_or_default(),
            avatar: None,
            bio: self.bio.unwrap_or_default(),
            parser: self.parser.flatten(),
            be: self.be.flatten(),
        })
    }

    /// Every profile field is optional, so PUT and PATCH validate alike
    pub fn into_update(self) -> Result<UpdateProfile, FieldErrors> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(UpdateProfile {
            full_name: self.full_name,
            bio: self.bio,
            parser: self.parser,
            be: self.be,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_avatar_renders_as_media_url() {
        let user = User {
            id: 1,
            username: "ann".to_string(),
            email: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: String::new(),
            is_staff: false,
            date_joined: Utc::now(),
        };
        let mut profile = Profile {
            id: 3,
            user_id: 1,
            full_name: "Ann A".to_string(),
            avatar: Some("avatars/1a2b3c4d_me.png".to_string()),
            bio: String::new(),
            parser: None,
            be: None,
        };

        let json = serde_json::to_value(ProfileOut::new(&profile, &user)).unwrap();
        assert_eq!(json["avatar"], "/media/avatars/1a2b3c4d_me.png");
        assert_eq!(json["user"]["username"], "ann");

        profile.avatar = None;
        let json = serde_json::to_value(ProfileOut::new(&profile, &user)).unwrap();
        assert!(json["avatar"].is_null());
    }

    #[test]
    fn test_null_clears_optional_columns() {
        let input: ProfileInput =
            serde_json::from_str(r#"{"parser": null, "bio": "hi"}"#).unwrap();
        let update = input.into_update().unwrap();
        assert_eq!(update.parser, Some(None));
        assert_eq!(update.be, None);
        assert_eq!(update.bio.as_deref(), Some("hi"));
    }

    #[test]
    fn test_long_full_name_rejected() {
        let input = ProfileInput {
            full_name: Some("x".repeat(101)),
            ..Default::default()
        };
        assert!(input.into_new(1).unwrap_err().contains("full_name"));
    }
}
