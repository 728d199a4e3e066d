// src/prompts/mod.rs
//! Instruction text for every generation mode.
//!
//! Everything in here is pure: the same `RenderSettings` always produce the
//! same strings. Each mode gets its own builder module; the shared pieces
//! (aspect ratio, photography manifesto, realism suffix, user direction) live
//! in this file.

pub mod editing;
pub mod exterior;
pub mod floor_plan;
pub mod illustration;
pub mod interior;
pub mod planning;

use crate::errors::StudioError;
use crate::models::{AspectRatio, EditingOptions, Mode, Quality, RenderSettings};

const PHOTOGRAPHER_MANIFESTO: &str = "Your primary goal is to function as a professional architectural photographer. The final output must be a photograph, not a render. It must be indistinguishable from a high-end shot taken with a professional DSLR camera and prime lens. To achieve this, meticulously apply the following principles:
- **Lighting:** Master the complex interplay of natural light and shadow. Emulate how light from the sun or sky diffuses, reflects off surfaces, and creates soft-edged, realistic shadows. For interiors, capture light streaming through windows, creating subtle color temperature shifts. Avoid flat, uniform, or artificial-looking lighting.
- **Materials & Textures:** Every surface must possess a tangible, hyper-realistic texture with subtle imperfections. Wood grain must be non-repeating with natural knots. Fabrics must show individual threads, subtle creases, and realistic folds. Metal should have microscopic scratches and faint smudges. Glass must display clear, slightly distorted reflections. Critically, nothing should be perfectly clean or flawless; these imperfections are key to realism. The textures of tropical Vietnamese trees and plants must be rendered with extreme detail, down to the individual leaves and bark patterns.
- **Camera & Optics:** Simulate the properties of a high-end camera (e.g., Sony A7R IV with a 50mm f/1.4 lens). Create a natural and shallow depth of field (bokeh) to draw focus to the subject. Introduce subtle, physically accurate optical phenomena like faint lens flare when near light sources and minor chromatic aberration on high-contrast edges. The main subject must be tack sharp.
- **Atmosphere & Depth:** Infuse the scene with a palpable atmosphere. This could be a light morning mist in outdoor shots, steam rising from a coffee cup indoors, or the subtle haze of a humid day. These details create depth and separate a photograph from a sterile render.
- **Color Grading:** Apply a professional, non-destructive color grade similar to high-end architectural photography. The color palette must be harmonious and natural. Ensure perfect white balance, retain detail in shadows (no crushed blacks), and preserve information in highlights (no blown-out whites). Avoid any unrealistic oversaturation.";

/// Soft aspect-ratio constraint carried by every instruction.
pub fn aspect_ratio_clause(ratio: AspectRatio) -> String {
    format!(
        "The final image must have an aspect ratio of {}, please adhere to this as closely as possible.",
        ratio.as_str()
    )
}

/// Quality, 4K, material and lights-on clauses driven by the global options.
pub fn realism_suffix(options: &EditingOptions, include_lights: bool) -> String {
    let mut suffix = String::new();
    if options.quality == Quality::High {
        suffix.push_str(", ultra realistic, 8k, photorealistic, professional photography, sharp focus");
    }
    if options.enhance4k {
        suffix.push_str(", 4K resolution, hyper-detailed, intricate details");
    }
    if options.ai_materials {
        suffix.push_str(", using high-end, architecturally appropriate materials chosen by an expert");
    }
    if include_lights && options.effects.lights_on {
        suffix.push_str(
            ", with warm interior lights turned on, creating a cozy glow from the windows and exterior accent lighting.",
        );
    }
    suffix
}

/// Body, then aspect ratio, photography manifesto and realism suffix.
pub fn photographic(body: &str, options: &EditingOptions, include_lights: bool) -> String {
    format!(
        "{} {} {}{}",
        body.trim_end(),
        aspect_ratio_clause(options.aspect_ratio),
        PHOTOGRAPHER_MANIFESTO,
        realism_suffix(options, include_lights)
    )
}

/// Appends the user's free-text direction, if any.
pub fn with_user_direction(body: String, prompt: &str) -> String {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        return body;
    }
    format!(
        "{}\nAdditional direction from the user: \"{}\"",
        body.trim_end(),
        prompt
    )
}

/// Every instruction the mode sends, in call order.
pub fn compose(mode: Mode, settings: &RenderSettings) -> Result<Vec<String>, StudioError> {
    let prompts = match mode {
        Mode::Exterior => exterior::compose(settings).into_vec(),
        Mode::Interior => vec![interior::compose(settings)],
        Mode::Planning => vec![planning::compose(settings)],
        Mode::SketchColorize => vec![illustration::compose(settings)],
        Mode::PlanTo3d => vec![floor_plan::compose_3d(settings)],
        Mode::PlanToPerspective => vec![floor_plan::compose_perspective(settings)?],
    };
    Ok(prompts)
}
