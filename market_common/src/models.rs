//! Catalog namespaces: locales, entity classes and snapshot slots

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Deduplicated, ordinally sorted set of entity names
pub type NameSet = BTreeSet<String>;

/// Returned when a string does not name a known enum variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Language variant under which item and mod names are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    En,
    Ru,
}

impl Locale {
    /// Every locale handled by a sync cycle, in processing order
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Ru];

    /// Language code sent to the market API and used in slot names
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            _ => Err(ParseEnumError {
                kind: "locale",
                value: s.to_string(),
                expected: "en, ru",
            }),
        }
    }
}

/// What a snapshot slot's names refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityClass {
    /// Generic tradable items from the market listing
    Items,
    /// Every mod crawled from the wiki
    Mods,
    /// Mods that are also tradable market items
    TradableMods,
}

impl EntityClass {
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityClass::Items => "items",
            EntityClass::Mods => "mods",
            EntityClass::TradableMods => "tradable_mods",
        }
    }
}

/// Named durable location holding one entity name set, e.g. `items_en`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub class: EntityClass,
    pub locale: Locale,
}

impl Slot {
    pub fn new(class: EntityClass, locale: Locale) -> Self {
        Self { class, locale }
    }

    pub fn items(locale: Locale) -> Self {
        Self::new(EntityClass::Items, locale)
    }

    pub fn mods(locale: Locale) -> Self {
        Self::new(EntityClass::Mods, locale)
    }

    pub fn tradable_mods(locale: Locale) -> Self {
        Self::new(EntityClass::TradableMods, locale)
    }

    /// Slot name, also used as the on-disk file name
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.class.prefix(), self.locale.code())
    }
}

impl FromStr for Slot {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseEnumError {
            kind: "slot",
            value: s.to_string(),
            expected: "items_<locale>, mods_<locale>, tradable_mods_<locale>",
        };

        let (prefix, code) = s.trim().rsplit_once('_').ok_or_else(invalid)?;
        let class = match prefix {
            "items" => EntityClass::Items,
            "mods" => EntityClass::Mods,
            "tradable_mods" => EntityClass::TradableMods,
            _ => return Err(invalid()),
        };
        let locale = code.parse::<Locale>().map_err(|_| invalid())?;

        Ok(Slot::new(class, locale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_names() {
        assert_eq!(Slot::items(Locale::En).name(), "items_en");
        assert_eq!(Slot::mods(Locale::Ru).name(), "mods_ru");
        assert_eq!(Slot::tradable_mods(Locale::En).to_string(), "tradable_mods_en");
    }

    #[test]
    fn test_slot_from_str_round_trips_every_slot() {
        for locale in Locale::ALL {
            for class in [EntityClass::Items, EntityClass::Mods, EntityClass::TradableMods] {
                let slot = Slot::new(class, locale);
                assert_eq!(slot.name().parse::<Slot>().unwrap(), slot);
            }
        }
    }

    #[test]
    fn test_slot_from_str_rejects_unknown() {
        assert!("weapons_en".parse::<Slot>().is_err());
        assert!("items_de".parse::<Slot>().is_err());
        assert!("items".parse::<Slot>().is_err());
    }

    #[test]
    fn test_locale_from_str_is_case_insensitive() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        let err = "fr".parse::<Locale>().unwrap_err();
        assert_eq!(err.kind, "locale");
    }
}
