//! The user's outfit/background selection.

use crate::catalog::{self, Background, Gender, OutfitOption};
use crate::error::HeadshotError;

/// Current generation settings.
///
/// The selected outfit is held by reference into the static catalog and is
/// always wearable by the selected gender. Every mutator either keeps that
/// true or leaves the config untouched.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    gender: Gender,
    outfit: &'static OutfitOption,
    background: Background,
    custom_instruction: String,
}

impl GenerationConfig {
    /// Settings for `gender` with its first outfit and an off-white background.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the catalog has no outfit for `gender`.
    pub fn new(gender: Gender) -> Result<Self, HeadshotError> {
        Ok(Self {
            gender,
            outfit: catalog::first_outfit(gender)?,
            background: Background::OffWhite,
            custom_instruction: String::new(),
        })
    }

    /// Selected gender.
    #[must_use]
    pub const fn gender(&self) -> Gender {
        self.gender
    }

    /// Selected outfit.
    #[must_use]
    pub const fn outfit(&self) -> &'static OutfitOption {
        self.outfit
    }

    /// Selected background.
    #[must_use]
    pub const fn background(&self) -> Background {
        self.background
    }

    /// Free-text instruction, possibly empty.
    #[must_use]
    pub fn custom_instruction(&self) -> &str {
        &self.custom_instruction
    }

    /// Switch gender, moving the outfit to the first one wearable by the new gender.
    ///
    /// Selecting the current gender again keeps the current outfit.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the catalog has no outfit for `gender`.
    pub fn set_gender(&mut self, gender: Gender) -> Result<(), HeadshotError> {
        if gender == self.gender {
            return Ok(());
        }
        self.outfit = catalog::first_outfit(gender)?;
        self.gender = gender;
        Ok(())
    }

    /// Select an outfit by id.
    ///
    /// # Errors
    ///
    /// Returns [`HeadshotError::InvalidArgument`] if the id is unknown or the
    /// outfit does not fit the selected gender.
    pub fn select_outfit(&mut self, id: &str) -> Result<(), HeadshotError> {
        let outfit = catalog::find_outfit(id)
            .ok_or_else(|| HeadshotError::InvalidArgument(format!("Unknown outfit '{id}'")))?;
        if !outfit.gender.fits(self.gender) {
            return Err(HeadshotError::InvalidArgument(format!(
                "Outfit '{id}' is not available for {}",
                self.gender
            )));
        }
        self.outfit = outfit;
        Ok(())
    }

    /// Select a background.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Replace the free-text instruction.
    pub fn set_custom_instruction(&mut self, instruction: impl Into<String>) {
        self.custom_instruction = instruction.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::list_outfits;

    #[test]
    fn new_config_uses_first_outfit() {
        let config = GenerationConfig::new(Gender::Male).unwrap();
        assert_eq!(config.outfit().id, "m-corp-suit");
        assert_eq!(config.background(), Background::OffWhite);
        assert!(config.custom_instruction().is_empty());
    }

    #[test]
    fn gender_switch_always_lands_on_compatible_outfit() {
        let mut config = GenerationConfig::new(Gender::Male).unwrap();
        config.select_outfit("m-kurta").unwrap();

        for gender in [Gender::Female, Gender::Male, Gender::Female] {
            config.set_gender(gender).unwrap();
            assert_eq!(config.gender(), gender);
            assert!(list_outfits(gender).any(|o| o.id == config.outfit().id));
            assert_eq!(config.outfit().id, list_outfits(gender).next().unwrap().id);
        }
    }

    #[test]
    fn same_gender_keeps_outfit() {
        let mut config = GenerationConfig::new(Gender::Female).unwrap();
        config.select_outfit("f-saree").unwrap();
        config.set_gender(Gender::Female).unwrap();
        assert_eq!(config.outfit().id, "f-saree");
    }

    #[test]
    fn select_outfit_rejects_other_gender() {
        let mut config = GenerationConfig::new(Gender::Male).unwrap();
        assert!(config.select_outfit("f-saree").is_err());
        assert_eq!(config.outfit().id, "m-corp-suit");
    }

    #[test]
    fn select_outfit_rejects_unknown() {
        let mut config = GenerationConfig::new(Gender::Male).unwrap();
        assert!(matches!(
            config.select_outfit("m-spacesuit"),
            Err(HeadshotError::InvalidArgument(_))
        ));
    }
}
