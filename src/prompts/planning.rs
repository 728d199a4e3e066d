// src/prompts/planning.rs
use super::{photographic, with_user_direction};
use crate::models::RenderSettings;

const MASTER_PLAN: &str = "Based on the provided building, create an ultra-realistic, high-altitude aerial photograph of a large, master-planned urban development. The final image must look like a professional shot from a drone or helicopter, NOT a simple 3D render, in the style of high-end architectural visualization portfolios.
Key requirements for realism:
1. **Organic Layout:** Design a complex and believable urban fabric with a main arterial road, smaller connecting streets, and varied block sizes. Avoid unnatural repetition.
2. **Architectural Diversity:** Expand upon the style of the single building to create a cohesive neighborhood, with subtle variations in building height, form, and facade for a natural, non-uniform appearance. Include residential areas, a small commercial hub, and public buildings.
3. **Lush Greenery:** Integrate extensive, realistic green spaces: a central park, smaller pocket parks, tree-lined boulevards, and waterfront areas with lakes or rivers.
4. **Human Scale:** Add subtle details that bring the scene to life, such as cars moving on the roads, people in public spaces where visible from the altitude, and realistic landscaping.";

const NIGHT: &str = "The scene is set during a beautiful, clear night. It is vividly illuminated by a network of glowing streetlights casting realistic pools of light, warm light from the windows of buildings, and light trails from moving vehicles on the main roads. The atmosphere is vibrant and alive.";

const DAY: &str = "The scene is set during a bright, clear daytime with strong, realistic sunlight casting soft shadows, creating a sense of depth and form.";

const FOG: &str = "There is light atmospheric fog in the distance.";

const LIGHTS_ON: &str = "The lights are on in all the buildings.";

pub fn compose(settings: &RenderSettings) -> String {
    let effects = &settings.options.effects;
    let mut body = MASTER_PLAN.to_string();

    if effects.nighttime {
        body.push('\n');
        body.push_str(NIGHT);
    } else if effects.daytime {
        body.push('\n');
        body.push_str(DAY);
    }
    if effects.fog {
        body.push(' ');
        body.push_str(FOG);
    }
    // Night already lights every building.
    if effects.lights_on && !effects.nighttime {
        body.push(' ');
        body.push_str(LIGHTS_ON);
    }

    let body = with_user_direction(body, &settings.prompt);
    photographic(&body, &settings.options, false)
}
