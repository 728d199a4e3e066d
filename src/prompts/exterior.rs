// src/prompts/exterior.rs
use super::{photographic, with_user_direction};
use crate::models::{
    EditingOptions, Environment, FacadeType, ImageValue, RenderSettings, Sky, StreetActivity,
};

/// Appended to every view rendered from the front-view anchor.
pub const ANCHOR_DIRECTIVE: &str = "CRITICAL: Use the provided image as a strict visual reference for the building's architecture, materials, and appearance. Treat it as ground truth. Only change the camera angle.";

const HYPER_DETAIL: &str = "CRITICAL GOAL: \"Biến ảnh thành ảnh chụp thực tế\" (Transform the input into a hyper-realistic photograph), referencing the style of high-end architectural photography. The final image MUST NOT look like a 3D render.
- **Lighting & Atmosphere:** Recreate the lighting of a bright but soft daytime, with a clear blue sky and gentle shadows, resembling a high-end architectural photo. For all scenes, \"bật đèn cho công trình trong và ngoài nhà\" (turn on all interior and exterior lights) to create a warm, inviting glow that complements the ambient light.
- **Greenery (EXTREMELY IMPORTANT):** \"Cây cối trước công trình giống tự nhiên nhất\" (All plants and trees must be hyper-realistic and perfectly integrated). Render specific Vietnamese tropical species like Delonix regia (Phượng vĩ) or Terminalia catappa (Bàng) with complex, non-repeating bark textures and naturally translucent leaves. \"Ở khu vực ban công và hàng rào thêm cây xanh\" (Add lush, tropical greenery like Plumeria or Bougainvillea that looks completely natural to the balconies and fences).
- **Architecture Details:** \"Nếu nhà không có cổng tự tạo cổng mới\" (If the original building does not have a gate, design and add a modern one that fits the architecture perfectly). If a gate already exists, enhance it but do not replace it.
- **Context:** Create a believable Vietnamese streetscape with authentic details. The specific people and vehicles are controlled by the street activity setting.";

const PRESERVE_EXISTING: &str = "This is a hyper-realistic photograph of the building provided in the input image, strictly preserving its original architectural design, form, and details. The primary goal is to enhance its realism to the level of a professional photograph and place it within a suitable, authentic Vietnamese context. Do not add, remove, or alter any architectural elements. Focus solely on applying realistic lighting, materials, and atmosphere.";

const NO_CORNER_FRONTAL: &str = "CRITICAL: The scene must not show any street corners, intersections, or side alleys. The view is directly from the front";

const CAFE_VIEW: &str = "A wider, more distant photorealistic view of the same building, seen from across a bustling street. In the foreground, a young Vietnamese woman is sitting inside a modern cafe on this side of the road, looking out the window towards the building on the other side. CRITICAL: For variety, the woman's appearance, hairstyle, and stylish modern outfit must be randomized with each generation. The shot must be zoomed out to capture more of the streetscape. IMPORTANT: Use depth of field to keep the main building in sharp focus while the woman and cafe interior in the foreground are slightly and naturally blurred, drawing the viewer's eye to the architecture.";

const GARDEN_VIEW: &str = "A detailed, artistic close-up shot of the beautiful garden and landscaping next to the same building.";

const ANGLE_VIEW: &str = "A photorealistic, 45-degree angle view of the same building.";

const TOP_VIEW: &str = "A photorealistic, top-down bird's-eye view of the same building, showing roof details.";

const DENSE_BACKDROP: &str = "The area directly behind the house must be a dense residential area with other rooftops, small alleys, and backyards, typical of a Vietnamese city block.";

/// The front view plus the views that are rendered from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExteriorPrompts {
    pub front: String,
    pub dependents: Vec<String>,
}

impl ExteriorPrompts {
    pub fn into_vec(self) -> Vec<String> {
        let mut all = Vec::with_capacity(1 + self.dependents.len());
        all.push(self.front);
        all.extend(self.dependents);
        all
    }
}

fn facade_description(facade: FacadeType) -> String {
    match facade {
        FacadeType::StreetFront => format!(
            "a modern Vietnamese townhouse (\"nhà phố\") with a vertical design, located on a straight road, built closely between two other houses in a continuous row. {}",
            NO_CORNER_FRONTAL
        ),
        FacadeType::CornerLot => format!(
            "a modern house on a bustling Vietnamese street corner (\"nhà ngã 3\") with two prominent, visible facades. {}",
            NO_CORNER_FRONTAL
        ),
        FacadeType::Villa => "a luxurious and spacious modern villa (\"biệt thự\") with elegant, meticulously maintained landscaping and a grand entrance".to_string(),
        FacadeType::Bungalow => "a charming, single-story modern bungalow (\"nhà cấp 4\") nestled within a lush, natural garden setting".to_string(),
        FacadeType::KoiPond => "a modern house featuring a serene, professionally designed Koi fish pond as a central element of its garden".to_string(),
        FacadeType::Random => "the building provided in the input image".to_string(),
        FacadeType::Restaurant => format!(
            "a modern, upscale restaurant located on a straight Vietnamese city street, similar to a \"nhà phố\". The facade is inviting, with large glass windows showing a warm interior, elegant signage, and possibly some outdoor seating on the sidewalk. It is situated closely between two other buildings. {}",
            NO_CORNER_FRONTAL
        ),
        FacadeType::Resort => "a luxurious and modern resort building in a tranquil Vietnamese natural setting, such as a coastal area with palm trees or a serene mountain landscape. The architecture features open spaces, large balconies with scenic views, natural materials, and lush tropical landscaping, possibly including a glimpse of a swimming pool or water feature".to_string(),
    }
}

fn sky_description(sky: Sky) -> &'static str {
    match sky {
        Sky::Sunny => "with bright yet soft daylight, a clear blue sky, and gentle shadows, resembling a clean, high-end architectural photograph taken on a beautiful day and avoiding harsh, overexposed sunlight",
        Sky::Cloudy => "with soft, scattered white clouds in a blue sky, creating gentle, diffused light",
        Sky::Overcast => "on an overcast day with a flat, gray, diffused sky and very soft, minimal shadows",
        Sky::Sunset => "during a beautiful, warm sunset with a dramatic sky filled with orange, pink, and purple hues",
        Sky::Dusk => "at dusk, during the \"blue hour\" just after sunset, with deep blue and orange colors in the sky and a tranquil mood",
    }
}

fn environment_description(environment: Environment) -> &'static str {
    match environment {
        Environment::Urban => "a bustling, modern Vietnamese city street setting, with diverse building facades and vibrant street life",
        Environment::Forest => "a serene, dense pine forest with tall trees and dappled sunlight, similar to the highlands of Da Lat, Vietnam",
        Environment::EmptyLot => "an underdeveloped residential plot with new road and sidewalk infrastructure but low building density, like a new development project that is just beginning, with only a few houses scattered around",
        Environment::Garden => "a large, private, beautifully landscaped garden (\"sân vườn\") with a spacious lawn, a driveway, and ample space for parking cars, creating a peaceful and secluded atmosphere; the garden must look ultra-realistic, not like a CGI render",
    }
}

fn street_activity_description(activity: StreetActivity) -> &'static str {
    match activity {
        StreetActivity::None => "The scene must be completely serene and empty of any people, cars, motorbikes, or any form of traffic. The street should be quiet and deserted.",
        StreetActivity::FewCars => "The scene should include exactly one or two modern cars parked realistically on the side of the street or driving slowly. They should not be the main focus.",
        StreetActivity::FewPedestrians => "The scene should include one or two people walking casually and naturally on the sidewalk, dressed in modern, everyday clothing and not the main focus.",
        StreetActivity::Pedestrians => "The scene must feature a single, stylishly dressed young Vietnamese woman riding a classic Vespa scooter, integrated naturally into the street scene, perhaps driving past the building. She is the only person visible.",
    }
}

fn front_view(facade: FacadeType) -> String {
    if facade == FacadeType::Random {
        return format!(
            "A photorealistic, full front view of {}. {}",
            facade_description(facade),
            PRESERVE_EXISTING
        );
    }
    let mut view = format!("A photorealistic, full front view of {}.", facade_description(facade));
    if matches!(
        facade,
        FacadeType::Villa | FacadeType::Restaurant | FacadeType::StreetFront
    ) {
        view.push(' ');
        view.push_str(HYPER_DETAIL);
    }
    view
}

fn top_view(facade: FacadeType) -> String {
    if facade == FacadeType::StreetFront {
        format!("{} {}", TOP_VIEW, DENSE_BACKDROP)
    } else {
        TOP_VIEW.to_string()
    }
}

fn closing_view(facade: FacadeType) -> &'static str {
    match facade {
        FacadeType::Bungalow | FacadeType::KoiPond => GARDEN_VIEW,
        _ => CAFE_VIEW,
    }
}

/// Sky, environment, street activity and effects, shared by all views.
fn scene_clause(options: &EditingOptions) -> String {
    let mut clause = format!(
        "The architectural style, materials, and lighting must be identical across all images. The scene is set {}. The surrounding environment is {}. {}",
        sky_description(options.sky),
        environment_description(options.environment),
        street_activity_description(options.street_activity)
    );
    let effects = options.effects.active_names();
    if !effects.is_empty() {
        clause.push_str(&format!(" Effects: {}.", effects.join(", ")));
    }
    clause
}

pub fn compose(settings: &RenderSettings) -> ExteriorPrompts {
    let options = &settings.options;
    let facade = options.facade_type;
    let scene = scene_clause(options);
    let finish = |view: String| {
        let body = with_user_direction(view, &settings.prompt);
        format!("{} {}", photographic(&body, options, true), scene)
    };

    ExteriorPrompts {
        front: finish(front_view(facade)),
        dependents: vec![
            finish(ANGLE_VIEW.to_string()),
            finish(top_view(facade)),
            finish(closing_view(facade).to_string()),
        ],
    }
}

/// Reference images attached to the front-view call, with the clauses that explain them.
#[derive(Debug, Default)]
pub struct FrontReferences<'a> {
    pub images: Vec<&'a ImageValue>,
    pub clauses: Vec<String>,
}

/// The source image is always IMAGE 1; references are numbered after it.
pub fn front_references(options: &EditingOptions) -> FrontReferences<'_> {
    let mut refs = FrontReferences::default();

    if let Some(style) = options.style_image.as_ref() {
        let mut copy = Vec::new();
        if options.style_extract_lighting {
            copy.push("Apply the lighting, color palette, and overall atmosphere from this reference image to the original building.");
        }
        if options.style_extract_context {
            copy.push("Also, place the building in a similar surrounding environment and context (e.g. trees, street, background buildings) from the reference image.");
        }
        if !copy.is_empty() {
            refs.images.push(style);
            refs.clauses.push(format!(
                "IMAGE {} is a reference image for style provided by the user. {} CRITICAL INSTRUCTION: You MUST NOT alter the architectural shape, structure, or lines of the original building (IMAGE 1). The goal is to re-render the original architecture with the visual style of the reference image.",
                refs.images.len() + 1,
                copy.join(" ")
            ));
        }
    }

    if options.blend_architecture {
        if let Some(architecture) = options.architecture_image.as_ref() {
            refs.images.push(architecture);
            refs.clauses.push(format!(
                "IMAGE {} is an architecture reference image. Blend the architecture of the original building (IMAGE 1) with the architecture from this reference image. The blend ratio should be {}%.",
                refs.images.len() + 1,
                options.blend_percent()
            ));
        }
    }

    refs
}
