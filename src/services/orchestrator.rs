// src/services/orchestrator.rs
use crate::errors::StudioError;
use crate::models::{GenerationResult, ImageValue, Mode, RenderSettings};
use crate::prompts::{self, exterior};
use crate::services::backend::{GenerateContentRequest, ImageBackend};
use crate::services::response_normalizer;
use futures_util::future::try_join_all;
use log::{debug, info};
use std::sync::Arc;

/// Anchor-then-vary: the anchor request runs alone, then every dependent
/// instruction is rendered concurrently with the anchor's result attached.
struct AnchoredPlan {
    anchor: GenerateContentRequest,
    dependents: Vec<String>,
}

impl AnchoredPlan {
    fn dependent_requests(&self, anchor: &ImageValue) -> Vec<GenerateContentRequest> {
        self.dependents
            .iter()
            .map(|instruction| {
                GenerateContentRequest::image_generation(
                    &[anchor],
                    format!("{} {}", instruction, exterior::ANCHOR_DIRECTIVE),
                )
            })
            .collect()
    }
}

pub struct GenerationOrchestrator {
    backend: Arc<dyn ImageBackend>,
    image_model: String,
}

impl GenerationOrchestrator {
    pub fn new(backend: Arc<dyn ImageBackend>, image_model: impl Into<String>) -> Self {
        Self {
            backend,
            image_model: image_model.into(),
        }
    }

    pub async fn generate(
        &self,
        mode: Mode,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        info!("Starting {} generation for {}", mode, source.name);
        let result = match mode {
            Mode::Exterior => self.generate_exterior(source, settings).await,
            Mode::Interior => self.generate_interior(source, settings).await,
            Mode::Planning => self.generate_planning(source, settings).await,
            Mode::SketchColorize => self.generate_sketch_colorize(source, settings).await,
            Mode::PlanTo3d => self.generate_plan_to_3d(source, settings).await,
            Mode::PlanToPerspective => self.generate_plan_to_perspective(source, settings).await,
        }?;
        info!("{} generation produced {} image(s)", mode, result.len());
        Ok(result)
    }

    pub async fn generate_exterior(
        &self,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        let prompts = exterior::compose(settings);
        let references = exterior::front_references(&settings.options);

        let mut attachments = vec![source];
        attachments.extend(references.images.iter().copied());
        let mut front = prompts.front;
        for clause in &references.clauses {
            front.push(' ');
            front.push_str(clause);
        }

        let plan = AnchoredPlan {
            anchor: GenerateContentRequest::image_generation(&attachments, front),
            dependents: prompts.dependents,
        };
        self.run_anchored(plan).await
    }

    pub async fn generate_interior(
        &self,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        let mut attachments = vec![source];
        if let Some(style) = settings.options.style_image.as_ref() {
            attachments.push(style);
        }
        self.run_single(&attachments, prompts::interior::compose(settings))
            .await
    }

    pub async fn generate_planning(
        &self,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        self.run_single(&[source], prompts::planning::compose(settings))
            .await
    }

    pub async fn generate_sketch_colorize(
        &self,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        self.run_single(&[source], prompts::illustration::compose(settings))
            .await
    }

    pub async fn generate_plan_to_3d(
        &self,
        source: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        self.run_single(&[source], prompts::floor_plan::compose_3d(settings))
            .await
    }

    pub async fn generate_plan_to_perspective(
        &self,
        plan: &ImageValue,
        settings: &RenderSettings,
    ) -> Result<GenerationResult, StudioError> {
        let instruction = prompts::floor_plan::compose_perspective(settings)?;
        let moodboard = settings.options.moodboard_image.as_ref().ok_or_else(|| {
            StudioError::ComposerPrecondition(prompts::floor_plan::MISSING_MOODBOARD.to_string())
        })?;
        self.run_single(&[plan, moodboard], instruction).await
    }

    /// Text-only edit of an existing image.
    pub async fn refine(
        &self,
        image: &ImageValue,
        instruction: &str,
    ) -> Result<ImageValue, StudioError> {
        require_instruction(instruction)?;
        let request =
            GenerateContentRequest::image_generation(&[image], prompts::editing::refine(instruction));
        self.call_single(&request).await
    }

    /// Edit restricted to the white area of `mask`.
    pub async fn inpaint(
        &self,
        image: &ImageValue,
        mask: &ImageValue,
        instruction: &str,
        reference: Option<&ImageValue>,
    ) -> Result<ImageValue, StudioError> {
        require_instruction(instruction)?;
        let mut attachments = vec![image, mask];
        attachments.extend(reference);
        let request = GenerateContentRequest::image_generation(
            &attachments,
            prompts::editing::inpaint(instruction, reference.is_some()),
        );
        self.call_single(&request).await
    }

    async fn run_anchored(&self, plan: AnchoredPlan) -> Result<GenerationResult, StudioError> {
        let anchor = self.call_single(&plan.anchor).await?;

        let requests = plan.dependent_requests(&anchor);
        debug!("Anchor ready, rendering {} dependent view(s)", requests.len());
        let views = try_join_all(requests.iter().map(|request| self.call_single(request))).await?;

        let mut result = Vec::with_capacity(1 + views.len());
        result.push(anchor);
        result.extend(views);
        Ok(result)
    }

    async fn run_single(
        &self,
        attachments: &[&ImageValue],
        instruction: String,
    ) -> Result<GenerationResult, StudioError> {
        let request = GenerateContentRequest::image_generation(attachments, instruction);
        Ok(vec![self.call_single(&request).await?])
    }

    async fn call_single(&self, request: &GenerateContentRequest) -> Result<ImageValue, StudioError> {
        debug!(
            "Calling {} with {} attachment(s), {} instruction chars",
            self.image_model,
            request.attachments().len(),
            request.instruction().map(str::len).unwrap_or(0)
        );
        let response = self
            .backend
            .generate_content(&self.image_model, request)
            .await?;
        response_normalizer::normalize_single(&response)
    }
}

fn require_instruction(instruction: &str) -> Result<(), StudioError> {
    if instruction.trim().is_empty() {
        return Err(StudioError::Validation(
            "Instruction must not be empty".to_string(),
        ));
    }
    Ok(())
}
