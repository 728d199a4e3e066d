// src/prompts/editing.rs
//! Text for follow-up edits of an existing image.

const PHOTOREAL_EDIT: &str = "CRITICAL: The final result must be \"chân thực như ảnh chụp\" (photorealistic). It must look like a real photograph, not a render.";

pub fn refine(instruction: &str) -> String {
    format!(
        "Refine this image with the following instruction: \"{}\". {} Ensure the refined area has realistic lighting, textures with subtle imperfections, and blends seamlessly with the rest of the image. Only apply this change, keeping everything else identical.",
        instruction.trim(),
        PHOTOREAL_EDIT
    )
}

/// Attachments are expected in the order source, mask, reference.
pub fn inpaint(instruction: &str, has_reference: bool) -> String {
    let mut text = format!(
        "The first image is the photograph to edit and the second image is its mask. Apply the following change ONLY to the white masked area: \"{}\".",
        instruction.trim()
    );
    if has_reference {
        text.push_str(" Use the third image as a reference for the style, materials, and textures in the masked area. Do NOT copy the objects from the reference, only the aesthetic qualities.");
    }
    text.push(' ');
    text.push_str(PHOTOREAL_EDIT);
    text.push_str(" Inside the masked area, ensure realistic lighting, textures with subtle imperfections, and a seamless blend with the original photograph. Everything outside the mask stays untouched.");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refine_quotes_the_instruction() {
        let text = refine("  make the roof red ");
        assert!(text.contains("\"make the roof red\""));
        assert!(text.contains("keeping everything else identical"));
    }

    #[test]
    fn inpaint_reference_caveat_only_with_reference() {
        assert!(!inpaint("add a tree", false).contains("Do NOT copy the objects"));
        let with_reference = inpaint("add a tree", true);
        assert!(with_reference.contains("Do NOT copy the objects"));
        assert!(with_reference.contains("ONLY to the white masked area"));
    }
}
