use once_cell::sync::Lazy;

/// A single entry in the style catalog: fixed display data plus the authored
/// prompt template sent to the image model. Catalog entries are data, not
/// behavior — adding a style means adding one entry here.
#[derive(Debug, Clone)]
pub struct StyleDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub prompt_template: &'static str,
}

static STYLES: Lazy<Vec<StyleDefinition>> = Lazy::new(|| {
    vec![
        StyleDefinition {
            id: "wif",
            label: "🐕 $WIF (Dogwifhat)",
            description: "Pink beanie hat, cozy vibes, dog energy",
            prompt_template: "Transform this person into Dogwifhat style with a pink beanie hat. Keep their facial features exactly the same.",
        },
        StyleDefinition {
            id: "bonk",
            label: "🥜 $BONK (Bonk)",
            description: "OG Solana memecoin energy, community vibes",
            prompt_template: "Using the provided profile picture, transform this person into the BONK ($BONK) memecoin aesthetic while ensuring their facial features, expression, and bone structure remain completely unchanged.\n\nAdd subtle Solana-themed elements: incorporate purple and orange color accents in the background or clothing. The person should have an energetic, optimistic expression (while keeping their natural facial features). Add soft purple/orange lighting that enhances the scene without changing the person's appearance.\n\nInclude small BONK-style elements like playful sparkles or subtle geometric patterns in the background. The overall mood should be enthusiastic and community-focused, representing the OG Solana memecoin spirit. Preserve all original lighting and composition.",
        },
        StyleDefinition {
            id: "popcat",
            label: "🐱 $POPCAT",
            description: "Viral cat meme energy, expressive vibes",
            prompt_template: "Using the provided profile picture, transform this person into the POPCAT ($POPCAT) aesthetic while preserving their exact facial features and bone structure completely unchanged.\n\nEnhance the image with vibrant, slightly anime-inspired lighting and colors. Add large, expressive eyes effect (while keeping their natural eye color and shape). The background should feature bright, cheerful colors with subtle cat-themed elements or patterns.\n\nThe overall style should be energetic and viral-ready, capturing the playful spirit of the POPCAT meme. Use dynamic lighting that makes the image pop with color and energy, while ensuring the person's actual face remains unchanged.",
        },
        StyleDefinition {
            id: "pengu",
            label: "🐧 $PENGU (Pudgy Penguins)",
            description: "Cute penguin vibes, wholesome energy",
            prompt_template: "Using the provided profile picture, transform this person into the Pudgy Penguins ($PENGU) aesthetic while keeping their facial features, expression, and bone structure exactly the same.\n\nAdd subtle penguin-inspired elements: a cozy winter background with soft blues and whites. The person could be wearing a cute winter accessory like a scarf or hat in penguin colors (black, white, orange accents). The overall mood should be wholesome, cute, and family-friendly.\n\nCreate a warm, inviting atmosphere with soft lighting that enhances the adorable, community-focused vibe of Pudgy Penguins. Ensure all facial details remain completely preserved from the original image.",
        },
        StyleDefinition {
            id: "pnut",
            label: "🥜 $PNUT (Peanut)",
            description: "Squirrel mascot energy, viral story vibes",
            prompt_template: "Using the provided profile picture, transform this person into the Peanut the Squirrel ($PNUT) aesthetic while ensuring their facial features and expression remain completely unchanged.\n\nAdd elements inspired by the viral squirrel story: natural, outdoor-inspired background with warm brown and golden tones. Include subtle woodland or nature elements. The person should have a determined, resilient expression (while maintaining their natural features).\n\nThe lighting should be warm and golden, representing strength and community support. Add small acorn or nut elements in the background as subtle nods to the PNUT theme. Preserve all original facial characteristics while enhancing the inspirational, story-driven mood.",
        },
        StyleDefinition {
            id: "moodeng",
            label: "🦛 $MOODENG",
            description: "Baby hippo cuteness, Thailand zoo vibes",
            prompt_template: "Using the provided profile picture, transform this person into the Moo Deng ($MOODENG) aesthetic while preserving their exact facial features, bone structure, and expression unchanged.\n\nCreate a cute, playful atmosphere inspired by the viral baby hippo. Use soft, rounded elements and gentle pastel colors. The background should evoke a peaceful, zoo-like or natural water environment with soft blues and greens.\n\nAdd adorable, rounded design elements that echo the baby hippo's charm while maintaining a photorealistic quality. The lighting should be soft and natural, creating an atmosphere of pure cuteness and innocence. Ensure the person's face remains exactly as in the original.",
        },
        StyleDefinition {
            id: "chillguy",
            label: "😎 $CHILLGUY",
            description: "Laid-back vibes, sunglasses energy",
            prompt_template: "Using the provided profile picture, transform this person into the Chill Guy ($CHILLGUY) aesthetic while keeping their facial features and bone structure completely unchanged.\n\nAdd stylish sunglasses that fit naturally on their face. Create a relaxed, tropical or beach-inspired background with soft, warm colors. The overall mood should be laid-back, confident, and effortlessly cool.\n\nUse golden hour lighting that creates a chill, vacation-like atmosphere. Add subtle elements like palm trees or beach elements in the soft-focus background. The person should embody the \"just chilling\" energy while maintaining their natural facial characteristics and expression.",
        },
        StyleDefinition {
            id: "trump",
            label: "🚀 $TRUMP",
            description: "Presidential memecoin, political energy",
            prompt_template: "Using the provided profile picture, transform this person into the Official Trump ($TRUMP) memecoin aesthetic while ensuring their facial features and expression remain exactly the same.\n\nAdd patriotic elements: American flag colors in the background, presidential or official styling. The lighting should be professional and confident, like a formal portrait. Use red, white, and blue color accents throughout the scene.\n\nCreate a powerful, presidential atmosphere with clean, professional composition. The background can include subtle stars or stripes patterns. Maintain the dignity and formality appropriate for a political-themed memecoin while preserving all original facial features.",
        },
        StyleDefinition {
            id: "fartcoin",
            label: "💨 $FARTCOIN",
            description: "Absurd AI-created chaos energy",
            prompt_template: "Using the provided profile picture, transform this person into the FARTCOIN ($FARTCOIN) aesthetic while keeping their facial features completely unchanged.\n\nCreate a chaotic, absurd, and humorous atmosphere with wild colors and unexpected elements. Use neon colors, glitch effects, or surreal background elements that capture the AI-generated randomness of FARTCOIN.\n\nThe overall mood should be deliberately absurd and meme-heavy, embracing the chaos of the most ridiculous memecoin. Add colorful, explosive visual effects while ensuring the person's actual face and features remain exactly as in the original image. Make it wonderfully weird and viral-ready.",
        },
    ]
});

/// All styles in declaration order. The order is stable and is what selection
/// UIs should present.
pub fn all() -> &'static [StyleDefinition] {
    &STYLES
}

pub fn get(id: &str) -> Option<&'static StyleDefinition> {
    STYLES.iter().find(|style| style.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_style_resolves_with_a_prompt() {
        for style in all() {
            let found = get(style.id).expect("listed style must resolve by id");
            assert_eq!(found.id, style.id);
            assert!(!found.prompt_template.trim().is_empty());
            assert!(!found.label.trim().is_empty());
            assert!(!found.description.trim().is_empty());
        }
    }

    #[test]
    fn style_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for style in all() {
            assert!(seen.insert(style.id), "duplicate style id {}", style.id);
        }
    }

    #[test]
    fn catalog_order_is_declaration_order() {
        let ids: Vec<&str> = all().iter().map(|style| style.id).collect();
        assert_eq!(
            ids,
            [
                "wif", "bonk", "popcat", "pengu", "pnut", "moodeng", "chillguy", "trump",
                "fartcoin"
            ]
        );
    }

    #[test]
    fn unknown_id_is_absent() {
        assert!(get("doge").is_none());
        assert!(get("").is_none());
    }
}
