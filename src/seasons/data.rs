//! Static season entries.

use super::{Characteristics, ColorSwatch, SeasonEntry, SeasonId, SwatchCategory};

use SwatchCategory::{Accent, Base, Neutral};

const fn swatch(name: &'static str, hex: &'static str, category: SwatchCategory) -> ColorSwatch {
    ColorSwatch {
        name,
        hex,
        category,
    }
}

const fn traits(
    undertone: &'static str,
    contrast: &'static str,
    chroma: &'static str,
) -> Characteristics {
    Characteristics {
        undertone,
        contrast,
        chroma,
    }
}

// ---------------------------------------------------------------------------
// Winter
// ---------------------------------------------------------------------------

pub(super) static TRUE_WINTER: SeasonEntry = SeasonEntry {
    id: SeasonId::TrueWinter,
    display_name: "Invierno Verdadero",
    description: "La estación fría por excelencia. Colores puros, helados y de alto contraste.",
    characteristics: traits("Cool", "High", "Bright"),
    palette: &[
        swatch("Fuchsia", "#BD4C90", Accent),
        swatch("Emerald Green", "#0B9456", Accent),
        swatch("Royal Blue", "#3144A2", Base),
        swatch("Icy Yellow", "#F1ED6D", Accent),
        swatch("Black", "#000000", Neutral),
        swatch("Pure White", "#FFFFFF", Neutral),
    ],
};

pub(super) static DARK_WINTER: SeasonEntry = SeasonEntry {
    id: SeasonId::DarkWinter,
    display_name: "Invierno Profundo",
    description:
        "Dominado por la oscuridad, fluye hacia el otoño permitiendo cierta calidez profunda.",
    characteristics: traits("Cool-Neutral", "High", "Deep"),
    palette: &[
        swatch("Black Cherry", "#461111", Base),
        swatch("Pine Green", "#01796F", Base),
        swatch("Charcoal", "#36454F", Neutral),
        swatch("Deep Plum", "#3F0854", Accent),
    ],
};

pub(super) static BRIGHT_WINTER: SeasonEntry = SeasonEntry {
    id: SeasonId::BrightWinter,
    display_name: "Invierno Brillante",
    description: "Contraste extremo y colores neón. Fluye hacia la primavera.",
    characteristics: traits("Cool-Neutral", "Very High", "Bright"),
    palette: &[
        swatch("Hot Pink", "#FF69B4", Accent),
        swatch("Electric Blue", "#7DF9FF", Accent),
        swatch("Lemon", "#FFF700", Accent),
    ],
};

// ---------------------------------------------------------------------------
// Summer
// ---------------------------------------------------------------------------

pub(super) static TRUE_SUMMER: SeasonEntry = SeasonEntry {
    id: SeasonId::TrueSummer,
    display_name: "Verano Verdadero",
    description: "Fresco, suave y delicado. Colores con base azulada y ahumada.",
    characteristics: traits("Cool", "Medium", "Soft"),
    palette: &[
        swatch("Slate Blue", "#6A5ACD", Base),
        swatch("Mauve", "#E0B0FF", Accent),
        swatch("Soft Grey", "#D3D3D3", Neutral),
    ],
};

pub(super) static LIGHT_SUMMER: SeasonEntry = SeasonEntry {
    id: SeasonId::LightSummer,
    display_name: "Verano Claro",
    description: "Luminoso y fresco. Fluye hacia la primavera con pasteles fríos.",
    characteristics: traits("Cool-Neutral", "Low-Medium", "Light"),
    palette: &[
        swatch("Sky Blue", "#87CEEB", Base),
        swatch("Powder Pink", "#FFB2D0", Accent),
        swatch("Lavender", "#E6E6FA", Accent),
    ],
};

pub(super) static SOFT_SUMMER: SeasonEntry = SeasonEntry {
    id: SeasonId::SoftSummer,
    display_name: "Verano Suave",
    description: "Misterioso y desaturado. Fluye hacia el otoño.",
    characteristics: traits("Cool-Neutral", "Low", "Muted"),
    palette: &[
        swatch("Sage", "#BCB88A", Base),
        swatch("Dusty Rose", "#DCAE96", Accent),
        swatch("Grey Blue", "#8C92AC", Neutral),
    ],
};

// ---------------------------------------------------------------------------
// Autumn
// ---------------------------------------------------------------------------

pub(super) static TRUE_AUTUMN: SeasonEntry = SeasonEntry {
    id: SeasonId::TrueAutumn,
    display_name: "Otoño Verdadero",
    description: "Cálido, rico y dorado. La esencia de las hojas caídas.",
    characteristics: traits("Warm", "Medium", "Muted"),
    palette: &[
        swatch("Rust", "#B7410E", Accent),
        swatch("Mustard", "#FFDB58", Accent),
        swatch("Olive", "#808000", Base),
    ],
};

pub(super) static DARK_AUTUMN: SeasonEntry = SeasonEntry {
    id: SeasonId::DarkAutumn,
    display_name: "Otoño Profundo",
    description:
        "Cálido y profundo. Fluye hacia el invierno permitiendo colores saturados oscuros.",
    characteristics: traits("Warm-Neutral", "High", "Deep"),
    palette: &[
        swatch("Rust Red", "#A6432C", Accent),
        swatch("Deep Mustard", "#D9A91A", Accent),
        swatch("Dark Olive", "#404C24", Base),
        swatch("Chocolate", "#7B3F00", Neutral),
    ],
};

pub(super) static SOFT_AUTUMN: SeasonEntry = SeasonEntry {
    id: SeasonId::SoftAutumn,
    display_name: "Otoño Suave",
    description:
        "Cálido pero difuso. Fluye hacia el verano, compartiendo la cualidad polvorienta.",
    characteristics: traits("Warm-Neutral", "Low", "Muted"),
    palette: &[
        swatch("Khaki", "#F0E68C", Neutral),
        swatch("Salmon", "#FA8072", Accent),
        swatch("Moss", "#8A9A5B", Base),
    ],
};

// ---------------------------------------------------------------------------
// Spring
// ---------------------------------------------------------------------------

pub(super) static TRUE_SPRING: SeasonEntry = SeasonEntry {
    id: SeasonId::TrueSpring,
    display_name: "Primavera Verdadera",
    description: "Cálida, clara y vibrante. Colores frescos como brotes nuevos.",
    characteristics: traits("Warm", "Medium-High", "Clear"),
    palette: &[
        swatch("Coral", "#FF7F50", Accent),
        swatch("Golden Yellow", "#FFDF00", Accent),
        swatch("Warm Green", "#AFE313", Base),
    ],
};

pub(super) static LIGHT_SPRING: SeasonEntry = SeasonEntry {
    id: SeasonId::LightSpring,
    display_name: "Primavera Clara",
    description: "Luminosa y cálida. Fluye hacia el verano con pasteles brillantes.",
    characteristics: traits("Warm-Neutral", "Low", "Light"),
    palette: &[
        swatch("Pale Spring Bud", "#E0F1BB", Base),
        swatch("Coral Pink", "#F6B7C8", Accent),
        swatch("Light Aqua", "#9DEDEC", Accent),
        swatch("Cream", "#FFFCD1", Neutral),
    ],
};

pub(super) static BRIGHT_SPRING: SeasonEntry = SeasonEntry {
    id: SeasonId::BrightSpring,
    display_name: "Primavera Brillante",
    description: "Saturación extrema con calidez. Fluye hacia el invierno.",
    characteristics: traits("Warm-Neutral", "Very High", "Bright"),
    palette: &[
        swatch("Bright Coral", "#FF6F61", Accent),
        swatch("Turquoise", "#40E0D0", Accent),
        swatch("Lime", "#BFFF00", Accent),
    ],
};
