// src/prompts/floor_plan.rs
use super::{photographic, with_user_direction};
use crate::errors::StudioError;
use crate::models::{PlanView, RenderSettings};

pub const MISSING_MOODBOARD: &str = "Vui lòng tải lên ảnh phong cách (moodboard) để tiếp tục.";

const BLUEPRINT_RULES: &str = "**PRIMARY DIRECTIVE: 2D PLAN TO 3D CONVERSION**

**INPUTS:**
1. **IMAGE 1 (THE BLUEPRINT):** A 2D architectural floor plan.
2. **IMAGE 2 (THE MOODBOARD):** A style reference image.

**NON-NEGOTIABLE RULES:**
1. **THE BLUEPRINT IS LAW:** You MUST construct the 3D model as an EXACT replica of the 2D floor plan (IMAGE 1). Every wall, window, door, and structural element must be identical in position and proportion. Analyze the plan for furniture symbols (e.g., bed, toilet, wardrobe) and place the 3D furniture in those precise locations. ANY deviation from the blueprint's layout is a critical failure.
2. **THE MOODBOARD IS STYLE:** You MUST use the moodboard (IMAGE 2) ONLY for aesthetic guidance. Extract the interior design style, color palette, material choices (e.g., wood type, fabric texture), lighting atmosphere, and furniture types from it. DO NOT copy the room shape or layout from the moodboard.

**YOUR TASK:**
- Create a 3D model that is structurally identical to the 2D blueprint.
- Furnish and style this model using the aesthetics from the moodboard.
- Render the final result as a photorealistic image.
- Render a single, eye-level, photorealistic perspective shot of the final space from the most visually appealing main angle.";

fn view_description(view: PlanView) -> &'static str {
    match view {
        PlanView::Perspective => "a photorealistic eye-level perspective shot from an attractive angle that showcases the space.",
        PlanView::TopDown => "a photorealistic top-down axonometric (3D) view.",
        PlanView::HighAngle => "a photorealistic high-angle perspective shot, looking down into the room from a corner to give a sense of the overall layout and space.",
        PlanView::WideAngle => "a photorealistic wide-angle perspective shot that captures as much of the room as possible, emphasizing the sense of space and openness.",
        PlanView::Detail => "a photorealistic close-up or detail shot focusing on a specific, beautifully arranged area of the room, such as a decorated coffee table, a stylish bookshelf, or a cozy reading nook, highlighting textures and materials.",
        PlanView::Angle45 => "a photorealistic 45-degree axonometric view, also known as an \"exploded floor plan\" (\"phối cảnh nội thất bóc mái\"). Show the entire layout from an elevated 45-degree angle without a ceiling, giving a clear look at the furniture arrangement and spatial flow, with walls at full height.",
    }
}

pub fn compose_3d(settings: &RenderSettings) -> String {
    let body = format!(
        "You are an architectural visualization expert. The input is a 2D floor plan (a hand-drawn sketch or a CAD file). Transform it into a single, ultra-realistic, fully furnished 3D interior photograph.
1. **Analyze the Plan:** Interpret the layout of walls, doors, and windows from the 2D plan to determine the room type(s) (e.g., living room, kitchen, bedroom).
2. **Furnish the Space:** Populate the space with hyper-realistic furniture and decor in a universally appealing, clean, and modern style. Furniture placement must strictly follow the plan where specified; otherwise arrange it logically for the detected room type.
3. **Set Camera View:** The final image must be {}
4. **Realism:** The final image must be indistinguishable from a real photograph. Apply master-level lighting and texturing.",
        view_description(settings.options.plan_view)
    );
    photographic(&with_user_direction(body, &settings.prompt), &settings.options, true)
}

/// Fails before composing when no moodboard is attached.
pub fn compose_perspective(settings: &RenderSettings) -> Result<String, StudioError> {
    if settings.options.moodboard_image.is_none() {
        return Err(StudioError::ComposerPrecondition(MISSING_MOODBOARD.to_string()));
    }
    let body = with_user_direction(BLUEPRINT_RULES.to_string(), &settings.prompt);
    Ok(photographic(&body, &settings.options, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageValue;

    #[test]
    fn plan_view_selects_camera_clause() {
        let mut settings = RenderSettings::default();
        settings.options.plan_view = PlanView::Angle45;
        assert!(compose_3d(&settings).contains("exploded floor plan"));
        settings.options.plan_view = PlanView::Detail;
        assert!(compose_3d(&settings).contains("cozy reading nook"));
        settings.options.plan_view = PlanView::TopDown;
        assert!(compose_3d(&settings).contains("top-down axonometric"));
    }

    #[test]
    fn perspective_requires_moodboard() {
        let err = compose_perspective(&RenderSettings::default()).unwrap_err();
        assert!(matches!(err, StudioError::ComposerPrecondition(_)));
        assert_eq!(err.to_string(), MISSING_MOODBOARD);
    }

    #[test]
    fn perspective_separates_structure_from_style() {
        let mut settings = RenderSettings::default();
        settings.options.moodboard_image = Some(ImageValue::new("M", "image/png", "mood.png"));
        let prompt = compose_perspective(&settings).unwrap();
        assert!(prompt.contains("THE BLUEPRINT IS LAW"));
        assert!(prompt.contains("THE MOODBOARD IS STYLE"));
        assert!(prompt.contains("DO NOT copy the room shape or layout from the moodboard"));
    }
}
