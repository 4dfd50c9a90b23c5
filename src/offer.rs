use crate::color::DEFAULT_PRIMARY_COLOR;

pub const TITLE_PLACEHOLDER: &str = "Your Deal Headline";
pub const DESCRIPTION_PLACEHOLDER: &str =
    "Compelling description of the offer goes here. Explain the value proposition concisely.";
pub const CTA_PLACEHOLDER: &str = "Buy Now";

/// The offer being designed.
///
/// Every field is always present; an empty string means "unset". Display code
/// substitutes placeholder text through the `display_*` accessors and never
/// writes it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferData {
    pub title: String,
    pub description: String,
    pub cta_text: String,
    pub niche: String,
    pub primary_color: String,
}

impl Default for OfferData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            cta_text: String::new(),
            niche: String::new(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
        }
    }
}

/// Names one field of [`OfferData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OfferField {
    Title,
    Description,
    CtaText,
    Niche,
    PrimaryColor,
}

impl OfferField {
    pub const ALL: [OfferField; 5] = [
        OfferField::Title,
        OfferField::Description,
        OfferField::CtaText,
        OfferField::Niche,
        OfferField::PrimaryColor,
    ];

    /// Input length cap so the text fits the flyer layout.
    pub fn max_chars(self) -> Option<usize> {
        match self {
            OfferField::Title => Some(40),
            OfferField::Description => Some(120),
            OfferField::CtaText => Some(20),
            OfferField::Niche | OfferField::PrimaryColor => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OfferField::Title => "Headline",
            OfferField::Description => "Description",
            OfferField::CtaText => "Call To Action",
            OfferField::Niche => "Niche / Industry",
            OfferField::PrimaryColor => "Brand Color",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            OfferField::Title => "e.g. 50% OFF All Items",
            OfferField::Description => "Brief details about the offer...",
            OfferField::CtaText => "e.g. Shop Now",
            OfferField::Niche => "e.g. Yoga Studio, Cyber Monday Electronics, Burger Joint",
            OfferField::PrimaryColor => DEFAULT_PRIMARY_COLOR,
        }
    }
}

impl OfferData {
    /// Demo values the app starts with.
    pub fn seed() -> Self {
        Self {
            title: "Summer Sale".to_owned(),
            description: "Get 50% off on all premium running gear. Limited time offer only.".to_owned(),
            cta_text: "Shop Now".to_owned(),
            niche: "Running Shoes".to_owned(),
            primary_color: DEFAULT_PRIMARY_COLOR.to_owned(),
        }
    }

    pub fn get(&self, field: OfferField) -> &str {
        match field {
            OfferField::Title => &self.title,
            OfferField::Description => &self.description,
            OfferField::CtaText => &self.cta_text,
            OfferField::Niche => &self.niche,
            OfferField::PrimaryColor => &self.primary_color,
        }
    }

    pub(crate) fn set(&mut self, field: OfferField, value: String) {
        let slot = match field {
            OfferField::Title => &mut self.title,
            OfferField::Description => &mut self.description,
            OfferField::CtaText => &mut self.cta_text,
            OfferField::Niche => &mut self.niche,
            OfferField::PrimaryColor => &mut self.primary_color,
        };
        *slot = value;
    }

    /// Generation needs a niche; whitespace alone does not count.
    pub fn can_generate(&self) -> bool {
        !self.niche.trim().is_empty()
    }

    /// There is something worth exporting.
    pub fn has_content(&self) -> bool {
        !self.title.is_empty() || !self.description.is_empty() || !self.niche.is_empty()
    }

    pub fn display_title(&self) -> &str {
        or_placeholder(&self.title, TITLE_PLACEHOLDER)
    }

    pub fn display_description(&self) -> &str {
        or_placeholder(&self.description, DESCRIPTION_PLACEHOLDER)
    }

    pub fn display_cta(&self) -> &str {
        or_placeholder(&self.cta_text, CTA_PLACEHOLDER)
    }
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}
