// src/prompts/interior.rs
use super::{photographic, with_user_direction};
use crate::models::{EditingOptions, InteriorLighting, InteriorRenderType, RenderSettings};

const ENHANCE_TASK: &str = "**--- YOUR TASK (ENHANCE & RENDER) ---**
The user's input image is a raw, untextured 3D model (e.g. from SketchUp). As an architectural visualization expert, turn this scene into a photorealistic final render.
**CRITICAL COMMANDS:**
1. **PRESERVE GEOMETRY:** You MUST strictly preserve all existing geometry: the architectural shell (walls, windows, doors) AND all furniture and objects shown in the scene. **DO NOT** add, remove, reshape, or move any object. Your only job is to apply materials and lighting.
2. **APPLY HYPER-REALISTIC MATERIALS:** Analyze each object in the scene (sofa, table, floor, walls, etc.) and apply high-end, physically accurate materials to it. The materials should form a cohesive, modern, and beautiful interior design. Pay extreme attention to wood grain, fabric weaves, metal reflections, and glass transparency.
3. **MASTERFUL LIGHTING:** Create a realistic and atmospheric lighting setup. This is the most important part of making it look like a real photo.
**SUMMARY:** The output must be that exact same model, rendered as a photorealistic photograph with expert-level materials and lighting.";

const REFERENCE_DRIVEN_GOAL: &str = "Your goal is a TOTAL TRANSFORMATION. The provided reference image is the absolute source of truth for the new style. You must meticulously extract and replicate its **lighting, atmosphere, materials, color palette, furniture types, and decor style.** The final result should look as if the room from the original image was completely renovated in the style of the reference image.";

const OPEN_GOAL: &str = "Your goal is a TOTAL TRANSFORMATION into a new, beautiful, and coherent interior design. Do not retain any visual elements from the original photo except for the architecture. The new design should be in a clean, appealing, modern style.";

const SUNNY: &str = "- **Lighting Scenario (Sunny Day):** The primary light source is bright, clear, natural light from a sunny day outside. The atmosphere must be crisp and clear, completely free of any fog, haze, or mist. The scene must be well-exposed, bright, and airy. Shadows should be soft-edged and add depth.
- **CRITICAL REALISM RULE (CURTAINS):** If the window has curtains (especially sheer/voile curtains), you MUST NOT render harsh, direct sunbeams entering the room. The curtains act as a natural diffuser, filling the space with soft, bright, ambient light. The entire room should feel illuminated, not just have patches of sun on the floor.
- **GLOBAL ILLUMINATION:** The room must be filled with abundant bounced light, so shadow areas are never black voids but softly illuminated and full of detail. The mood is bright and positive. The view outside the windows is a clear, sunny day.";

const FOGGY: &str = "- **Lighting Scenario (Foggy/Misty Morning):** The scene is enveloped in a soft, bright, diffused light from an overcast or foggy day. Light coming through the windows must be very gentle with extremely soft, subtle shadows. CRITICAL: Soft light does not mean a dark image. The scene must be well-lit and feel calm, moody, and serene. The view outside the windows shows a thick fog or mist, creating a sense of privacy and coziness.";

const NIGHT: &str = "- **Lighting Scenario (Night):** The scene is lit by artificial interior lights. Create a well-lit, sophisticated, and cozy atmosphere. You MUST use a multi-layered lighting strategy: ambient light (ceiling fixtures), task light (lamps), and accent lights. The lighting must be warm, inviting, and properly expose the scene, never dark or gloomy. The view outside the windows is a dark night scene, perhaps with city lights twinkling in the distance. Reflections on the windows must be prominent and realistic.";

const MANIFESTO_HEAD: &str = "**INTERIOR PHOTOREALISM MANIFESTO:**
Embody a world-class architectural visualization artist from a top-tier studio. The output must be an **ultra-photorealistic photograph**, not a render, indistinguishable from a professionally shot and edited image in a luxury design magazine.

- **1. LIGHTING IS THE SOUL (ABSOLUTE PRIORITY):**";

const MANIFESTO_BODY: &str = "- **LAYERED LIGHTING (MANDATORY):** Implement a sophisticated, multi-layered lighting strategy.
    - **Natural Light:** For daytime scenes, light from windows is soft and diffused, as if filtered through high-quality sheer curtains.
    - **Intelligent Accent Lighting (CRITICAL):** Place concealed LED strips behind headboards, under floating shelves, TV consoles and kitchen cabinets, inside glass display cabinets and bookcases, and along vertical architectural grooves or wall panels.
    - **CRITICAL WARM TONE:** All artificial light sources **MUST** emit a warm glow (2700K - 3000K). AVOID cold, blue, or sterile white light.
- **PERFECT EXPOSURE & DYNAMIC RANGE:** Shadows are soft and filled with bounced light, never crushed blacks. Windows and fixtures retain detail, never blown-out highlights.

- **2. MATERIALS MUST BE TANGIBLE & LUXURIOUS:** Every surface has a hyper-realistic, high-end texture with believable imperfections. NO plastic-looking surfaces. NO visibly repeating patterns.
    - **Wood:** natural light oak or dark walnut, often with fluted or slatted paneling, matte or satin finish.
    - **Stone:** large, seamless marble slabs (e.g. Calacatta, Travertine) with non-repetitive veining.
    - **Metals:** subtle accents of brushed bronze, brass, or matte black metal. Avoid cheap-looking chrome.
    - **Walls:** textured plaster, lime wash, or upholstered wall panels rather than plain paint.
    - **Fabrics:** Bouclé, high-quality linen or low-pile velvet on upholstery; curtains heavy and draping realistically in two layers; rugs with visible pile.

- **3. PROFESSIONAL COMPOSITION & POST-PROCESSING:**
    - **Camera Simulation:** a full-frame camera with a 35mm or 50mm f/1.8 prime lens, subtle natural depth of field, tack-sharp focal point.
    - **Color Grading:** a harmonious grade built on neutral tones with warm accents and perfect white balance.";

fn task_block(options: &EditingOptions) -> String {
    match options.interior_render_type {
        InteriorRenderType::Enhance => ENHANCE_TASK.to_string(),
        InteriorRenderType::Redesign => {
            let goal = if options.style_image.is_some() && options.style_extract_design {
                REFERENCE_DRIVEN_GOAL
            } else {
                OPEN_GOAL
            };
            format!(
                "**--- YOUR TASK (REDESIGN) ---**
You are a renovation expert executing a complete redesign. The input is an image of an interior space (a 3D render, a sketch, or a real photo).
**CRITICAL COMMAND:** Preserve the core architectural shell (walls, windows, doors, and overall room structure). However, completely **STRIP OUT and REPLACE ALL** existing furniture, decor, materials (flooring, wall finishes, etc.), and fixtures.
{}
**COLOR PALETTE INSPIRATION:** Analyze the original input image to understand its general color palette and let the new design be inspired by it. If the original has warm wood tones and beige, lean towards a similar warm, neutral palette, even with different furniture.
Failure to completely replace the old elements is a failure of the task.",
                goal
            )
        }
    }
}

fn lighting_block(lighting: InteriorLighting) -> &'static str {
    match lighting {
        InteriorLighting::Sunny => SUNNY,
        InteriorLighting::Foggy => FOGGY,
        InteriorLighting::Night => NIGHT,
    }
}

/// Present only when a style reference image is attached.
fn reference_block(options: &EditingOptions) -> Option<String> {
    options.style_image.as_ref()?;

    let mut copy = Vec::new();
    let mut forbid = vec![
        "- **ABSOLUTE RULE: DO NOT COPY THE ASPECT RATIO OR CROP.** The final image's dimensions and composition MUST strictly match the user's original input image, not the reference image.",
        "- **DO NOT COPY THE ROOM'S ARCHITECTURE/LAYOUT.** The reference is for style, not structure.",
    ];

    if options.style_extract_lighting {
        copy.push("- **Lighting, Atmosphere & Color Palette:** Meticulously replicate the lighting conditions (color temperature, quality of light, shadow direction) and the overall color scheme.");
    }
    if options.interior_render_type == InteriorRenderType::Redesign && options.style_extract_design {
        copy.push("- **Furniture & Decor Style:** Extract and replicate the types of furniture, materials, and decor style.");
    } else {
        forbid.push("- **CRITICAL: DO NOT COPY FURNITURE, DECOR, OR MATERIAL TYPES (e.g., wood, marble) from the reference image.** The reference is exclusively for the **lighting and atmosphere**. Apply new, appropriate, high-quality materials to the original geometry, inspired by the new mood, but never copied from the reference.");
    }
    copy.push("- **Environment:** If a view is visible through the windows, replicate that type of environment (e.g., urban city, forest, beach).");

    Some(format!(
        "**REFERENCE IMAGE INSTRUCTIONS (STYLE TRANSFER):**
A style reference image has been provided. Act as a style analyst.
**WHAT TO COPY FROM THE REFERENCE:**
{}

**WHAT NOT TO COPY (ABSOLUTE RULES):**
{}",
        copy.join("\n"),
        forbid.join("\n")
    ))
}

pub fn compose(settings: &RenderSettings) -> String {
    let options = &settings.options;
    let mut sections = vec![
        MANIFESTO_HEAD.to_string(),
        lighting_block(options.interior_lighting).to_string(),
        MANIFESTO_BODY.to_string(),
    ];
    if let Some(reference) = reference_block(options) {
        sections.push(reference);
    }
    sections.push(task_block(options));

    let mut body = with_user_direction(sections.join("\n\n"), &settings.prompt);
    if options.interior_render_type == InteriorRenderType::Redesign {
        body.push_str(&format!(
            "\nUse variation seed {} to ensure a unique result.",
            options.interior_variation_seed
        ));
    }
    photographic(&body, options, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageValue;

    fn redesign(seed: u64) -> RenderSettings {
        let mut settings = RenderSettings::default();
        settings.options.interior_render_type = InteriorRenderType::Redesign;
        settings.options.interior_variation_seed = seed;
        settings
    }

    fn with_style(mut settings: RenderSettings, lighting: bool, design: bool) -> RenderSettings {
        settings.options.style_image = Some(ImageValue::new("S", "image/png", "ref.png"));
        settings.options.style_extract_lighting = lighting;
        settings.options.style_extract_design = design;
        settings
    }

    #[test]
    fn redesign_embeds_seed_and_varies_with_it() {
        let first = compose(&redesign(41));
        let second = compose(&redesign(42));
        assert!(first.contains("variation seed 41"));
        assert!(second.contains("variation seed 42"));
        assert_ne!(first, second);
    }

    #[test]
    fn enhance_ignores_seed_and_preserves_geometry() {
        let mut settings = redesign(7);
        settings.options.interior_render_type = InteriorRenderType::Enhance;
        let prompt = compose(&settings);
        assert!(!prompt.contains("variation seed"));
        assert!(prompt.contains("PRESERVE GEOMETRY"));
        assert!(!prompt.contains("STRIP OUT"));
    }

    #[test]
    fn lighting_scenarios_carry_their_guard_rails() {
        let mut settings = redesign(1);
        settings.options.interior_lighting = InteriorLighting::Sunny;
        assert!(compose(&settings).contains("MUST NOT render harsh, direct sunbeams"));
        settings.options.interior_lighting = InteriorLighting::Foggy;
        assert!(compose(&settings).contains("Soft light does not mean a dark image"));
        settings.options.interior_lighting = InteriorLighting::Night;
        assert!(compose(&settings).contains("multi-layered lighting strategy: ambient light"));
    }

    #[test]
    fn redesign_without_reference_uses_open_goal() {
        let prompt = compose(&redesign(1));
        assert!(prompt.contains(OPEN_GOAL));
        assert!(prompt.contains("COLOR PALETTE INSPIRATION"));
        assert!(!prompt.contains("REFERENCE IMAGE INSTRUCTIONS"));
    }

    #[test]
    fn design_extraction_drives_redesign_from_reference() {
        let prompt = compose(&with_style(redesign(1), true, true));
        assert!(prompt.contains(REFERENCE_DRIVEN_GOAL));
        assert!(prompt.contains("Furniture & Decor Style"));
        assert!(!prompt.contains("DO NOT COPY FURNITURE"));
        assert!(prompt.contains("DO NOT COPY THE ASPECT RATIO OR CROP"));
        assert!(prompt.contains("DO NOT COPY THE ROOM'S ARCHITECTURE"));
    }

    #[test]
    fn without_design_extraction_furniture_copy_is_forbidden() {
        let prompt = compose(&with_style(redesign(1), true, false));
        assert!(prompt.contains(OPEN_GOAL));
        assert!(prompt.contains("DO NOT COPY FURNITURE"));
        assert!(prompt.contains("Lighting, Atmosphere & Color Palette"));
    }

    #[test]
    fn enhance_never_copies_furniture_even_with_design_flag() {
        let mut settings = with_style(redesign(1), false, true);
        settings.options.interior_render_type = InteriorRenderType::Enhance;
        let prompt = compose(&settings);
        assert!(prompt.contains("DO NOT COPY FURNITURE"));
        assert!(!prompt.contains("Furniture & Decor Style"));
        assert!(prompt.contains("DO NOT COPY THE ASPECT RATIO OR CROP"));
    }
}
