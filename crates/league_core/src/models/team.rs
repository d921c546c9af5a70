use serde::{Deserialize, Serialize};

use crate::error::{LeagueError, Result};

pub type TeamId = u32;

pub const MIN_STRENGTH: i32 = 1;
pub const MAX_STRENGTH: i32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Base rating, 1..=100
    pub strength: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, strength: i32) -> Result<Self> {
        Ok(Self { id, name: name.into(), strength: checked_strength(strength)?, is_active: true })
    }

    /// Snapshots are deserialized without going through `new`.
    pub fn validate(&self) -> Result<()> {
        checked_strength(self.strength as i32).map(|_| ())
    }

    /// Administrative edit; leaves the team untouched on error.
    pub fn set_strength(&mut self, strength: i32) -> Result<()> {
        self.strength = checked_strength(strength)?;
        Ok(())
    }

    pub fn strength_description(&self) -> &'static str {
        match self.strength {
            90..=u8::MAX => "World Class",
            80..=89 => "Excellent",
            70..=79 => "Good",
            60..=69 => "Average",
            50..=59 => "Below Average",
            _ => "Poor",
        }
    }
}

fn checked_strength(strength: i32) -> Result<u8> {
    if (MIN_STRENGTH..=MAX_STRENGTH).contains(&strength) {
        Ok(strength as u8)
    } else {
        Err(LeagueError::InvalidStrength { strength })
    }
}

/// Active teams in roster order.
pub fn active_roster(teams: &[Team]) -> Vec<&Team> {
    teams.iter().filter(|t| t.is_active).collect()
}
