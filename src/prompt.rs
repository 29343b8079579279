//! Instruction payload assembly.

use std::fmt;

use crate::catalog::{Background, OutfitOption, GLOBAL_NEGATIVE_PROMPT};

/// Text sent to the image service alongside the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPayload(String);

impl InstructionPayload {
    /// The payload text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstructionPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<InstructionPayload> for String {
    fn from(payload: InstructionPayload) -> Self {
        payload.0
    }
}

const PREAMBLE: &str = "Act as a professional photo editor.\n\
    Edit this image to create a high-quality professional headshot suitable for a passport, \
    ID card, or official profile.";

const IDENTITY_DIRECTIVE: &str =
    "Keep the person's face and identity exactly the same. Do not change facial features.";

const LIGHTING_DIRECTIVE: &str =
    "Ensure the lighting is professional studio lighting (soft, even, flattering).";

const ASPECT_DIRECTIVE: &str = "Aspect ratio should be strictly maintained or cropped to a 3:4 \
    portrait ratio if possible within the square frame.";

const CLOSING: &str = "Output a high-quality, photorealistic image.";

/// Build the instruction payload for one generation.
///
/// Sections appear in a fixed order: identity, outfit, background, lighting
/// and aspect, negative constraints, then `custom_instruction` verbatim when
/// it is non-empty. The output depends only on the arguments.
#[must_use]
pub fn assemble(
    outfit: &OutfitOption,
    background: Background,
    custom_instruction: &str,
) -> InstructionPayload {
    let mut text = format!(
        "{PREAMBLE}\n\n\
         Instructions:\n\
         1. {IDENTITY_DIRECTIVE}\n\
         2. Change the person's outfit: {}. Ensure the fit looks natural and tailored.\n\
         3. Change the background to: {}.\n\
         4. {LIGHTING_DIRECTIVE}\n\
         5. {ASPECT_DIRECTIVE}\n\n\
         CRITICAL NEGATIVE CONSTRAINTS (Avoid these):\n\
         {GLOBAL_NEGATIVE_PROMPT}\n",
        outfit.prompt_fragment,
        background.prompt_fragment(),
    );

    if !custom_instruction.is_empty() {
        text.push_str("\nAdditional Request: ");
        text.push_str(custom_instruction);
        text.push('\n');
    }

    text.push('\n');
    text.push_str(CLOSING);
    InstructionPayload(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_outfit;

    fn suit() -> &'static OutfitOption {
        find_outfit("m-corp-suit").unwrap()
    }

    #[test]
    fn identical_inputs_identical_payload() {
        let a = assemble(suit(), Background::Blue, "");
        let b = assemble(suit(), Background::Blue, "");
        assert_eq!(a, b);
    }

    #[test]
    fn custom_instruction_is_included_verbatim() {
        let plain = assemble(suit(), Background::Grey, "");
        let custom = assemble(suit(), Background::Grey, "Make it look *vintage*, 1970s");
        assert_ne!(plain, custom);
        assert!(custom.as_str().contains("Make it look *vintage*, 1970s"));
        assert!(!plain.as_str().contains("Additional Request"));
    }

    #[test]
    fn sections_in_fixed_order() {
        let text = String::from(assemble(suit(), Background::BlurredOffice, "extra"));
        let positions: Vec<usize> = [
            IDENTITY_DIRECTIVE,
            suit().prompt_fragment,
            Background::BlurredOffice.prompt_fragment(),
            LIGHTING_DIRECTIVE,
            GLOBAL_NEGATIVE_PROMPT,
            "extra",
        ]
        .iter()
        .map(|needle| text.find(needle).unwrap())
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "out of order: {positions:?}");
    }

    #[test]
    fn background_changes_payload() {
        assert_ne!(assemble(suit(), Background::Blue, ""), assemble(suit(), Background::Grey, ""));
    }
}
