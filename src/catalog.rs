//! Static outfit and background catalog.
//!
//! Outfits are declared once, in display order. Lookups never allocate and
//! never mutate; the tables are the single source of truth for what a
//! [`GenerationConfig`](crate::selection::GenerationConfig) may select.

use std::fmt;
use std::str::FromStr;

use crate::error::HeadshotError;

/// Subject gender chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Male subject.
    Male,
    /// Female subject.
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "Male",
            Self::Female => "Female",
        })
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(format!("Unsupported gender '{s}'. Valid: male, female")),
        }
    }
}

/// Which genders an outfit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutfitGender {
    /// Male subjects only.
    Male,
    /// Female subjects only.
    Female,
    /// Any subject.
    All,
}

impl OutfitGender {
    /// Whether an outfit with this tag may be worn by `gender`.
    #[must_use]
    pub const fn fits(self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (Self::All, _) | (Self::Male, Gender::Male) | (Self::Female, Gender::Female)
        )
    }
}

/// A selectable outfit.
#[derive(Debug, PartialEq, Eq)]
pub struct OutfitOption {
    /// Unique identifier.
    pub id: &'static str,
    /// Short display label.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Genders this outfit applies to.
    pub gender: OutfitGender,
    /// Constraint block inserted into the instruction payload.
    pub prompt_fragment: &'static str,
}

/// Background presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Plain off-white studio backdrop.
    OffWhite,
    /// Passport-style flat blue.
    Blue,
    /// Neutral grey backdrop.
    Grey,
    /// Blurred office with bokeh.
    BlurredOffice,
}

impl Background {
    /// Every preset, in display order.
    pub const ALL: [Self; 4] = [Self::OffWhite, Self::Blue, Self::Grey, Self::BlurredOffice];

    /// Tag used on the command line and in config files.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::OffWhite => "off-white",
            Self::Blue => "blue",
            Self::Grey => "grey",
            Self::BlurredOffice => "blurred-office",
        }
    }

    /// Constraint block describing this background.
    #[must_use]
    pub const fn prompt_fragment(self) -> &'static str {
        match self {
            Self::OffWhite => {
                "a solid plain off-white background (hex #F5F5F5), professional studio lighting, \
                 no shadows, matte finish"
            }
            Self::Blue => {
                "a solid plain blue background (hex color #2E9AFF), flat color, no gradients, \
                 passport photo style"
            }
            Self::Grey => "a neutral grey professional photography backdrop",
            Self::BlurredOffice => {
                "a blurred modern office background with bokeh effect, depth of field"
            }
        }
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Background {
    type Err = HeadshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|bg| bg.tag() == s).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|bg| bg.tag()).collect();
            HeadshotError::Configuration(format!(
                "Unknown background '{s}'. Valid: {}",
                valid.join(", ")
            ))
        })
    }
}

/// Look up the prompt fragment for a background tag.
///
/// # Errors
///
/// Returns [`HeadshotError::Configuration`] if the tag names no preset.
pub fn background_prompt(tag: &str) -> Result<&'static str, HeadshotError> {
    tag.parse::<Background>().map(Background::prompt_fragment)
}

/// Disallowed attributes appended to every instruction payload.
pub const GLOBAL_NEGATIVE_PROMPT: &str = "no hats (unless religious), no sunglasses, \
     no heavy makeup, no teeth-showing smile, no large logos, no busy backgrounds, no props, \
     no shadows across face, no accessories covering face, no reflective glasses, \
     no uniform of government/military/police.";

/// All outfits in declaration order.
pub const OUTFITS: &[OutfitOption] = &[
    // Male
    OutfitOption {
        id: "m-corp-suit",
        label: "Formal Corporate (Suit)",
        description: "Dark suit, white shirt, plain tie.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, memakai suit gelap (navy atau charcoal), kemeja putih \
            berlengan panjang, leher kemeja terurus, dasi polos (gelap), tiada jaket berlapisan \
            berlebihan, kain wool/cotton, tanpa aksesori besar, ekspresi neutral. Exclude: tiada \
            corak loud, tiada simbol/logo, tiada topi, tiada cermin mata gelap.",
    },
    OutfitOption {
        id: "m-baju-melayu",
        label: "Baju Melayu",
        description: "Traditional Malay attire, Cekak Musang.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, memakai baju melayu plain lengan panjang (warna solid \
            seperti dark green atau maroon), tanpa sampin untuk gambar rasmi, kolar cekak, kain \
            matte, rambut kemas, ekspresi neutral. Exclude: tiada corak loud, tiada aksesori besar.",
    },
    OutfitOption {
        id: "m-batik",
        label: "Official Batik",
        description: "Formal batik shirt with subtle motifs.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, baju batik formal warna gelap dengan motif kecil sahaja, \
            kolar kemas (baju lengan panjang), bahan cotton/silk blend, tiada aksesori besar, \
            ekspresi neutral. Exclude: tiada motif terlalu kontras, tiada logo.",
    },
    OutfitOption {
        id: "m-kurta",
        label: "Traditional Kurta",
        description: "Solid color kurta, minimal design.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, kurta polos, warna solid atau motif kecil, tanpa \
            perhiasan berat, rambut kemas, ekspresi neutral. Exclude: tiada aksesori mengaburi \
            muka, tiada corak loud.",
    },
    OutfitOption {
        id: "m-smart-casual",
        label: "Smart Casual",
        description: "Polo shirt or smart plain top.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, polo shirt polos (gelap atau neutral), kolar rapi, tiada \
            corak/branding, lengan pendek atau panjang kemas, tanpa aksesori besar, ekspresi \
            neutral. Exclude: tiada logo besar, tiada corak garis menonjol.",
    },
    OutfitOption {
        id: "m-scrubs",
        label: "Healthcare / Scrubs",
        description: "Solid color medical scrubs.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, memakai scrubs hospital plain (solid color), kolar v \
            sederhana, tiada lencana/reflection, rambut disimpan kemas, ekspresi neutral. \
            Exclude: tiada alat perubatan di leher, tiada badge besar yang memantul.",
    },
    OutfitOption {
        id: "m-company",
        label: "Company Uniform",
        description: "Standard private sector uniform.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, memakai uniform syarikat polos (non-government), kolar \
            rapi, warna solid, tiada logo berlebih, nama tag minimal atau tiada, ekspresi neutral. \
            Exclude: tiada logo besar/berkilat, tiada topi.",
    },
    OutfitOption {
        id: "m-school",
        label: "School Uniform",
        description: "Standard student uniform (Kemeja + Tie).",
        gender: OutfitGender::Male,
        prompt_fragment: "Remaja, memakai uniform sekolah rapi (kemeja putih + tie), rambut kemas, \
            tiada aksesori, ekspresi neutral, latar belakang plain. Exclude: tiada lencana besar \
            yang memantulkan cahaya, tiada topi.",
    },
    OutfitOption {
        id: "m-id-basic",
        label: "No-frills ID Look",
        description: "Safe, plain contrast top for official ID.",
        gender: OutfitGender::Male,
        prompt_fragment: "Lelaki dewasa, pakaian polos warna gelap/kontras (contoh: navy atas \
            untuk latar putih), kolar rapi, tiada aksesori, rambut kemas, ekspresi neutral.",
    },
    OutfitOption {
        id: "m-senior",
        label: "Senior Formal",
        description: "Conservative formal wear for seniors.",
        gender: OutfitGender::Male,
        prompt_fragment: "Warga emas, pakaian formal sederhana (kemeja polos), kolar rapi, warna \
            lembut gelap, rambut kemas, ekspresi neutral, tanpa aksesori berlebihan.",
    },
    // Female
    OutfitOption {
        id: "f-corp-blazer",
        label: "Formal Corporate (Blazer)",
        description: "Dark blazer & blouse.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, blouse putih leher sederhana + blazer gelap, lengan \
            panjang rapi, warna blouse polos, fabric cotton/silk blend, aksesori minimal (stud \
            earrings sahaja), rambut rapi atau tudung kemas, ekspresi neutral. Exclude: tiada \
            corak besar, tiada rantai tebal, tiada logo, tiada ekspresi tersenyum berlebihan.",
    },
    OutfitOption {
        id: "f-baju-kurung",
        label: "Baju Kurung",
        description: "Modern Baju Kurung, solid color.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, memakai baju kurung moden lengan panjang, warna solid \
            (contoh: emerald, maroon, navy), kain matte (kain cotton atau rayon), tudung selendang \
            padanan warna atau neutral (tudung labuh menutup dada), tiada perhiasan berlebihan, \
            ekspresi neutral. Exclude: tiada corak corak besar/berkilat, tiada aksesori yang \
            menutup muka.",
    },
    OutfitOption {
        id: "f-tudung",
        label: "Formal Hijab",
        description: "Neat, neutral color hijab.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita muslimah, tudung labuh kemas menutup leher, warna neutral (beige, \
            navy, hitam), tiada corak, tudung terikat rapi tanpa lapisan mengaburi muka, pakaian \
            atas polos, ekspresi neutral. Exclude: tiada brooch besar di muka, tiada corak yang \
            mengganggu.",
    },
    OutfitOption {
        id: "f-batik",
        label: "Official Batik",
        description: "Formal batik wear.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, baju batik formal warna gelap dengan motif kecil sahaja, \
            kolar kemas, bahan cotton/silk blend, tiada aksesori besar, ekspresi neutral. \
            Exclude: tiada motif terlalu kontras, tiada logo.",
    },
    OutfitOption {
        id: "f-cheongsam",
        label: "Cheongsam",
        description: "Modern Cheongsam, solid/subtle motif.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, cheongsam moden leher tinggi kecil, warna solid atau \
            motif kecil, lengan pendek/panjang kemas, kain matte atau satin lembut, rambut kemas, \
            ekspresi neutral. Exclude: tiada perhiasan besar, tiada motif mencolok.",
    },
    OutfitOption {
        id: "f-saree",
        label: "Saree",
        description: "Simple saree with neat blouse.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, saree sederhana (blouse rapi), warna solid atau motif \
            kecil, tanpa perhiasan berat yang menutupi muka, rambut kemas, ekspresi neutral. \
            Exclude: tiada aksesori mengaburi muka, tiada corak loud.",
    },
    OutfitOption {
        id: "f-smart-casual",
        label: "Smart Casual",
        description: "Polo or smart plain top.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, polo shirt polos (gelap atau neutral), kolar rapi, tiada \
            corak/branding, lengan pendek atau panjang kemas, tanpa aksesori besar, ekspresi \
            neutral. Exclude: tiada logo besar, tiada corak garis menonjol.",
    },
    OutfitOption {
        id: "f-scrubs",
        label: "Healthcare / Scrubs",
        description: "Solid color medical scrubs.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, memakai scrubs hospital plain (solid color), kolar v \
            sederhana, tiada lencana/reflection, rambut disimpan kemas atau tudung yang sesuai, \
            ekspresi neutral. Exclude: tiada alat perubatan di leher, tiada badge besar yang \
            memantul.",
    },
    OutfitOption {
        id: "f-company",
        label: "Company Uniform",
        description: "Standard private sector uniform.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, memakai uniform syarikat polos (non-government), kolar \
            rapi, warna solid, tiada logo berlebih, nama tag minimal atau tiada, ekspresi neutral. \
            Exclude: tiada logo besar/berkilat, tiada topi.",
    },
    OutfitOption {
        id: "f-school",
        label: "School Uniform",
        description: "Standard student uniform.",
        gender: OutfitGender::Female,
        prompt_fragment: "Remaja, memakai uniform sekolah rapi (baju sekolah wanita), rambut \
            kemas, tiada aksesori, ekspresi neutral, latar belakang plain. Exclude: tiada lencana \
            besar yang memantulkan cahaya, tiada topi.",
    },
    OutfitOption {
        id: "f-id-basic",
        label: "No-frills ID Look",
        description: "Safe, plain contrast top.",
        gender: OutfitGender::Female,
        prompt_fragment: "Wanita dewasa, pakaian polos warna gelap/kontras (contoh: navy atas \
            untuk latar putih), kolar rapi, tiada aksesori, rambut kemas atau tudung kemas, \
            ekspresi neutral.",
    },
    OutfitOption {
        id: "f-senior",
        label: "Senior Formal",
        description: "Conservative formal wear.",
        gender: OutfitGender::Female,
        prompt_fragment: "Warga emas wanita, pakaian formal sederhana (blouse polos), kolar rapi, \
            warna lembut gelap, rambut kemas, ekspresi neutral, tanpa aksesori berlebihan.",
    },
];

/// Outfits wearable by `gender`, in declaration order.
pub fn list_outfits(gender: Gender) -> impl Iterator<Item = &'static OutfitOption> {
    OUTFITS.iter().filter(move |o| o.gender.fits(gender))
}

/// Find an outfit by id.
#[must_use]
pub fn find_outfit(id: &str) -> Option<&'static OutfitOption> {
    OUTFITS.iter().find(|o| o.id == id)
}

/// First outfit wearable by `gender`.
///
/// # Errors
///
/// Returns [`HeadshotError::Configuration`] if the catalog has no outfit for `gender`.
pub fn first_outfit(gender: Gender) -> Result<&'static OutfitOption, HeadshotError> {
    list_outfits(gender).next().ok_or_else(|| {
        HeadshotError::Configuration(format!("No outfits declared for gender {gender}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outfit_ids_are_unique() {
        let mut ids: Vec<&str> = OUTFITS.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), OUTFITS.len());
    }

    #[test]
    fn list_outfits_keeps_declaration_order() {
        let male: Vec<&str> = list_outfits(Gender::Male).map(|o| o.id).collect();
        assert_eq!(male.first(), Some(&"m-corp-suit"));
        assert_eq!(male.last(), Some(&"m-senior"));
        assert_eq!(male.len(), 10);

        let female: Vec<&str> = list_outfits(Gender::Female).map(|o| o.id).collect();
        assert_eq!(female.first(), Some(&"f-corp-blazer"));
        assert_eq!(female.len(), 12);
    }

    #[test]
    fn list_outfits_never_crosses_genders() {
        assert!(list_outfits(Gender::Male).all(|o| o.gender != OutfitGender::Female));
        assert!(list_outfits(Gender::Female).all(|o| o.gender != OutfitGender::Male));
    }

    #[test]
    fn unisex_outfit_fits_everyone() {
        assert!(OutfitGender::All.fits(Gender::Male));
        assert!(OutfitGender::All.fits(Gender::Female));
        assert!(!OutfitGender::Male.fits(Gender::Female));
    }

    #[test]
    fn background_prompt_known_tags() {
        assert!(background_prompt("off-white").unwrap().contains("#F5F5F5"));
        assert!(background_prompt("blue").unwrap().contains("#2E9AFF"));
        assert!(background_prompt("grey").unwrap().contains("grey"));
        assert!(background_prompt("blurred-office").unwrap().contains("bokeh"));
    }

    #[test]
    fn background_prompt_unknown_tag() {
        let err = background_prompt("purple").unwrap_err();
        assert!(matches!(err, HeadshotError::Configuration(_)));
    }

    #[test]
    fn gender_parsing() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("unisex".parse::<Gender>().is_err());
    }

    #[test]
    fn find_outfit_by_id() {
        assert_eq!(find_outfit("f-saree").map(|o| o.label), Some("Saree"));
        assert!(find_outfit("nope").is_none());
    }
}
