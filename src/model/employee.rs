use serde::{Deserialize, Serialize};

/// A complete employee record.
///
/// `id` is supplied by the caller and is the lookup key for every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub profession: String,
    pub level: String,
}

/// Partial view of an employee used by updates.
///
/// Absent fields and explicit `null`s both deserialize to `None` and are
/// left untouched when merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

impl EmployeeUpdate {
    /// Start an update for `id` with no fields set
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn profession(mut self, profession: impl Into<String>) -> Self {
        self.profession = Some(profession.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    /// Shallow-merge the present fields into `employee`.
    ///
    /// Returns true if any stored value changed. `id` is never rewritten.
    pub fn apply_to(&self, employee: &mut Employee) -> bool {
        let mut changed = false;
        for (target, value) in [
            (&mut employee.name, &self.name),
            (&mut employee.email, &self.email),
            (&mut employee.profession, &self.profession),
            (&mut employee.level, &self.level),
        ] {
            if let Some(value) = value {
                if *target != *value {
                    *target = value.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}
