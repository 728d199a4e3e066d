// src/prompts/illustration.rs
use super::{aspect_ratio_clause, with_user_direction};
use crate::models::{Quality, RenderSettings, SketchStyle};

const BLACK_WHITE_SKETCH: &str = "You are an architectural illustrator. Transform the provided architectural image into a single, professional, and artistic hand-drawn architectural sketch in black and white.
CRITICAL INSTRUCTIONS:
1. **Preserve Architecture:** The fundamental architectural form and proportions of the building in the input image must be accurately maintained.
2. **Artistic Style:** Interpret the 3D model and convert it into a convincing hand-drawn style with the character of a sketch made with fine-liners and markers.
3. **Line Quality:** Use clean, confident lines with varying weights to create depth and emphasis. Avoid a \"computer-generated\" look.
4. **Shading & Texture:** Apply subtle shading and hatching to suggest form, material, and shadow.
5. **Output:** A beautiful black and white architectural sketch, suitable for a design presentation. It must not look like a simple \"sketch\" filter.";

const WATERCOLOR: &str = "You are an architectural illustrator. Transform the provided architectural image into a beautiful and artistic architectural watercolor painting.
CRITICAL INSTRUCTIONS:
1. **Preserve Architecture:** The underlying architectural form must remain accurate to the input image.
2. **Watercolor Aesthetics:** Vibrant but soft, with characteristic watercolor techniques like wet-on-wet bleeds for the sky, soft gradients, and subtle color variations.
3. **Line Work:** Underlying sketch lines are visible but soft and integrated into the painting, not harsh black outlines.
4. **Paper Texture:** The result subtly evokes the texture of real watercolor paper.
5. **Output:** A professional, artistic piece that feels hand-painted, not like a digital filter.";

const LINELESS: &str = "You are an architectural illustrator. Transform the provided architectural image into a lineless, painterly architectural illustration.
CRITICAL INSTRUCTIONS:
1. **Preserve Architecture:** The building's form, shape, and proportions must be accurately represented from the input image.
2. **NO LINE ART:** Completely remove all black outlines and line art. This is the most important rule.
3. **Form Through Color:** The shape and volume of the building are defined entirely by blocks of color, light, and shadow.
4. **Style:** A clean, modern, almost minimalist illustration with a soft, artistic, and slightly dreamy quality.
5. **Output:** A professional digital illustration, not a photorealistic render or a sketch.";

fn template(style: SketchStyle) -> &'static str {
    match style {
        SketchStyle::BlackWhiteSketch => BLACK_WHITE_SKETCH,
        SketchStyle::Watercolor => WATERCOLOR,
        SketchStyle::Lineless => LINELESS,
    }
}

/// Illustrations skip the photography manifesto; the global clauses use art wording.
pub fn compose(settings: &RenderSettings) -> String {
    let options = &settings.options;
    let mut prompt = with_user_direction(template(options.sketch_style).to_string(), &settings.prompt);
    prompt.push('\n');
    prompt.push_str(&aspect_ratio_clause(options.aspect_ratio));
    if options.quality == Quality::High {
        prompt.push_str(" High detail, professional art, sharp focus.");
    }
    if options.enhance4k {
        prompt.push_str(" 4K resolution, hyper-detailed, intricate details.");
    }
    if options.ai_materials {
        prompt.push_str(" Depict high-end, architecturally appropriate materials chosen by an expert.");
    }
    if options.effects.lights_on {
        prompt.push_str(" Show warm interior lights turned on, creating a cozy glow from the windows and exterior accent lighting.");
    }
    prompt
}
