use serde::Deserialize;

pub const TRANSLATORS_GROUP: &str = "translators";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub superuser: bool,
    pub staff: bool,
    pub groups: Vec<String>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Self::default()
        }
    }

    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|name| name == group)
    }
}

pub trait AccessPolicy {
    fn can_translate(&self, user: &User) -> bool;

    fn can_translate_language(&self, user: &User, language_code: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupAccessPolicy {
    pub requires_auth: bool,
    pub language_groups: bool,
}

impl Default for GroupAccessPolicy {
    fn default() -> Self {
        Self {
            requires_auth: true,
            language_groups: false,
        }
    }
}

impl AccessPolicy for GroupAccessPolicy {
    fn can_translate(&self, user: &User) -> bool {
        if !self.requires_auth {
            return true;
        }
        user.superuser || user.staff || user.in_group(TRANSLATORS_GROUP)
    }

    fn can_translate_language(&self, user: &User, language_code: &str) -> bool {
        if !self.requires_auth {
            return true;
        }
        if !self.language_groups {
            return self.can_translate(user);
        }
        user.superuser || user.in_group(&format!("{TRANSLATORS_GROUP}-{language_code}"))
    }
}
