//! Player attributes fed by quest XP, and the character classes that seed
//! profile defaults.
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use std::collections::BTreeMap;

use crate::constants::MAX_ATTRIBUTES_PER_QUEST;

/// Attribute links carried by a single quest.
pub type AttributeLinks = SmallVec<[AttributeId; MAX_ATTRIBUTES_PER_QUEST]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeId {
    Str,
    Int,
    Cha,
    Foc,
    Vit,
    Cre,
}

impl AttributeId {
    pub const ALL: [Self; 6] = [
        Self::Str,
        Self::Int,
        Self::Cha,
        Self::Foc,
        Self::Vit,
        Self::Cre,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Int => "Intellect",
            Self::Cha => "Charisma",
            Self::Foc => "Focus",
            Self::Vit => "Vitality",
            Self::Cre => "Creativity",
        }
    }
}

/// Accumulated XP per attribute for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeTotals(BTreeMap<AttributeId, u64>);

impl AttributeTotals {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: AttributeId) -> u64 {
        self.0.get(&id).copied().unwrap_or(0)
    }

    /// Add XP to one attribute, returning the new total.
    pub fn add(&mut self, id: AttributeId, xp: u32) -> u64 {
        let entry = self.0.entry(id).or_insert(0);
        *entry = entry.saturating_add(u64::from(xp));
        *entry
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, u64)> + '_ {
        self.0.iter().map(|(id, xp)| (*id, *xp))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassId {
    Founder,
    Scholar,
    Athlete,
    Monk,
    Creator,
    Custom,
}

/// Archetype chosen at onboarding; supplies the profile's default day bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterClass {
    pub id: ClassId,
    pub name: &'static str,
    pub default_wake_time: NaiveTime,
    pub default_bedtime: NaiveTime,
    pub primary_attributes: AttributeLinks,
}

impl ClassId {
    pub const ALL: [Self; 6] = [
        Self::Founder,
        Self::Scholar,
        Self::Athlete,
        Self::Monk,
        Self::Creator,
        Self::Custom,
    ];

    #[must_use]
    pub fn class(self) -> CharacterClass {
        let (name, wake, bed, primary): (_, _, _, AttributeLinks) = match self {
            Self::Founder => (
                "The Founder",
                (7, 0),
                (22, 0),
                smallvec![AttributeId::Int, AttributeId::Cha],
            ),
            Self::Scholar => (
                "The Scholar",
                (7, 0),
                (22, 0),
                smallvec![AttributeId::Int, AttributeId::Foc],
            ),
            Self::Athlete => (
                "The Athlete",
                (6, 0),
                (21, 0),
                smallvec![AttributeId::Str, AttributeId::Vit],
            ),
            Self::Monk => (
                "The Monk",
                (5, 30),
                (21, 30),
                smallvec![AttributeId::Foc, AttributeId::Vit],
            ),
            Self::Creator => (
                "The Creator",
                (8, 0),
                (23, 0),
                smallvec![AttributeId::Cre, AttributeId::Int],
            ),
            Self::Custom => ("Custom", (7, 0), (22, 0), SmallVec::new()),
        };
        CharacterClass {
            id: self,
            name,
            default_wake_time: clock_time(wake),
            default_bedtime: clock_time(bed),
            primary_attributes: primary,
        }
    }
}

fn clock_time((hour, minute): (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
