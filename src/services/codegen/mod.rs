//! React project generation from a PRD's epics.
//!
//! The templated path is deterministic: the same title and epics always
//! produce byte-identical files. The model-assisted path renders the same
//! project and then asks the model to rewrite each page body.

mod naming;
mod templates;

use chrono::Utc;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};
use tracing::{debug, info};

use crate::models::{Epic, GeneratedApp, GeneratedFile, GenerationMode, Priority, StoryStatus};
use crate::services::llm::{GenerationError, PromptSpec, StructuredGenerator, strip_code_fence};
use crate::services::prompts::create_handlebars;
use crate::services::prompts::pages::{PageContext, PageStory, page_template};

pub use naming::{pascal_case, slugify};
use naming::{PagePlan, plan_pages};
use templates::FileTemplate;

/// Temperature for model-written page bodies.
const PAGE_TEMPERATURE: f32 = 0.1;
const PAGE_MAX_TOKENS: u32 = 4000;

/// Renders a complete frontend project from epics.
pub struct CodeGenerator {
    handlebars: Handlebars<'static>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AppContext<'a> {
    app_name: &'a str,
    html_title: String,
    first_route: String,
    epics: Vec<EpicView<'a>>,
    epic_count: usize,
    story_count: usize,
    total_points: u32,
    manifest: &'a JsonValue,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EpicView<'a> {
    component_name: String,
    route: String,
    storage_key: String,
    title: &'a str,
    description: &'a str,
    goals: &'a [String],
    stories: Vec<StoryView<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryView<'a> {
    id: &'a str,
    title: &'a str,
    description: &'a str,
    priority: Priority,
    status: StoryStatus,
    points: u32,
    acceptance_criteria: &'a [String],
}

impl CodeGenerator {
    pub fn new() -> Result<Self, GenerationError> {
        let mut handlebars = create_handlebars();

        let file_templates = [templates::APP, templates::PAGE]
            .into_iter()
            .chain(templates::SHARED_FILES)
            .chain(templates::HOOK_FILES)
            .chain(templates::UTIL_FILES)
            .chain(templates::CONFIG_FILES);
        for template in file_templates {
            register(&mut handlebars, template.name, template.source)?;
        }
        register(&mut handlebars, "readme", templates::README)?;
        register(&mut handlebars, "deploy_notes", templates::DEPLOY_NOTES)?;

        Ok(Self { handlebars })
    }

    /// Render the project without calling the model.
    pub fn generate(&self, title: &str, epics: &[Epic]) -> Result<GeneratedApp, GenerationError> {
        let app_name = display_name(title);
        let package_name = package_name(title);
        let plans = plan_pages(epics);
        let manifest = package_manifest(&package_name);
        let context = app_context(&app_name, &package_name, epics, &plans, &manifest);

        let components = std::iter::once(templates::APP)
            .chain(templates::SHARED_FILES)
            .map(|t| self.render_file(&t, &context))
            .collect::<Result<Vec<_>, _>>()?;

        let pages = context
            .epics
            .iter()
            .map(|view| {
                let content = self.render(templates::PAGE.name, view)?;
                Ok(GeneratedFile::new(
                    format!("{}/{}.tsx", templates::PAGE.path, view.component_name),
                    content,
                    format!("{} for the \"{}\" epic", templates::PAGE.description, view.title),
                ))
            })
            .collect::<Result<Vec<_>, GenerationError>>()?;

        let hooks = templates::HOOK_FILES
            .iter()
            .map(|t| self.render_file(t, &context))
            .collect::<Result<Vec<_>, _>>()?;
        let utils = templates::UTIL_FILES
            .iter()
            .map(|t| self.render_file(t, &context))
            .collect::<Result<Vec<_>, _>>()?;
        let config = templates::CONFIG_FILES
            .iter()
            .map(|t| self.render_file(t, &context))
            .collect::<Result<Vec<_>, _>>()?;

        let readme_text = self.render("readme", &context)?;
        let deploy_notes = self.render("deploy_notes", &context)?;

        info!(
            "Rendered app '{}' with {} pages and {} files",
            app_name,
            pages.len(),
            components.len() + pages.len() + hooks.len() + utils.len() + config.len()
        );

        Ok(GeneratedApp {
            app_name: app_name.clone(),
            components,
            pages,
            hooks,
            utils,
            config,
            package_manifest: manifest.clone(),
            readme_text,
            deploy_notes,
            generation_mode: GenerationMode::Templated,
            generated_at: Utc::now(),
        })
    }

    /// Render the project, then replace each page body with model output.
    pub async fn generate_with_model(
        &self,
        generator: &StructuredGenerator,
        title: &str,
        epics: &[Epic],
    ) -> Result<GeneratedApp, GenerationError> {
        let mut app = self.generate(title, epics)?;
        let plans = plan_pages(epics);

        for ((page, epic), plan) in app.pages.iter_mut().zip(epics).zip(&plans) {
            let context = PageContext {
                app_name: &app.app_name,
                component_name: &plan.component_name,
                epic_title: &epic.title,
                epic_description: &epic.description,
                goals: &epic.goals,
                stories: epic
                    .user_stories
                    .iter()
                    .map(|s| PageStory {
                        title: &s.title,
                        description: &s.description,
                        acceptance_criteria: &s.acceptance_criteria,
                    })
                    .collect(),
            };
            let (system, user) = page_template().render(&context)?;
            let spec = PromptSpec::text("generate-page", system, user, PAGE_TEMPERATURE)
                .with_max_tokens(PAGE_MAX_TOKENS);
            let body = generator.generate_text(&spec).await?;
            page.content = format!("{}\n", strip_code_fence(&body));
            debug!("Model wrote {} ({} bytes)", page.path, page.content.len());
        }

        app.generation_mode = GenerationMode::ModelAssisted;
        Ok(app)
    }

    fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<String, GenerationError> {
        self.handlebars
            .render(name, context)
            .map_err(|e| GenerationError::Template(format!("Failed to render {name}: {e}")))
    }

    fn render_file(
        &self,
        template: &FileTemplate,
        context: &AppContext<'_>,
    ) -> Result<GeneratedFile, GenerationError> {
        let content = self.render(template.name, context)?;
        Ok(GeneratedFile::new(template.path, content, template.description))
    }
}

fn register(
    handlebars: &mut Handlebars<'static>,
    name: &str,
    source: &str,
) -> Result<(), GenerationError> {
    handlebars
        .register_template_string(name, source)
        .map_err(|e| GenerationError::Template(format!("Invalid {name} template: {e}")))
}

fn display_name(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        "Generated App".to_string()
    } else {
        trimmed.to_string()
    }
}

fn package_name(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        "generated-app".to_string()
    } else {
        slug
    }
}

fn app_context<'a>(
    app_name: &'a str,
    package_name: &str,
    epics: &'a [Epic],
    plans: &[PagePlan],
    manifest: &'a JsonValue,
) -> AppContext<'a> {
    let views: Vec<EpicView<'a>> = epics
        .iter()
        .zip(plans)
        .map(|(epic, plan)| EpicView {
            component_name: plan.component_name.clone(),
            route: format!("/{}", plan.slug),
            storage_key: format!("{package_name}.{}", plan.slug),
            title: &epic.title,
            description: &epic.description,
            goals: &epic.goals,
            stories: epic
                .user_stories
                .iter()
                .map(|s| StoryView {
                    id: &s.id,
                    title: &s.title,
                    description: &s.description,
                    priority: s.priority,
                    status: s.status,
                    points: s.estimated_story_points,
                    acceptance_criteria: &s.acceptance_criteria,
                })
                .collect(),
        })
        .collect();

    AppContext {
        app_name,
        html_title: handlebars::html_escape(app_name),
        first_route: views.first().map_or_else(|| "/".to_string(), |v| v.route.clone()),
        epic_count: views.len(),
        story_count: views.iter().map(|v| v.stories.len()).sum(),
        total_points: views
            .iter()
            .flat_map(|v| &v.stories)
            .map(|s| s.points)
            .sum(),
        epics: views,
        manifest,
    }
}

/// package.json for the generated project.
fn package_manifest(package_name: &str) -> JsonValue {
    json!({
        "name": package_name,
        "private": true,
        "version": "0.1.0",
        "type": "module",
        "scripts": {
            "dev": "vite",
            "build": "tsc && vite build",
            "preview": "vite preview",
            "lint": "eslint . --ext ts,tsx"
        },
        "dependencies": {
            "react": "^18.3.1",
            "react-dom": "^18.3.1",
            "wouter": "^3.3.5"
        },
        "devDependencies": {
            "@types/react": "^18.3.3",
            "@types/react-dom": "^18.3.0",
            "@typescript-eslint/eslint-plugin": "^7.18.0",
            "@typescript-eslint/parser": "^7.18.0",
            "@vitejs/plugin-react": "^4.3.1",
            "autoprefixer": "^10.4.20",
            "eslint": "^8.57.0",
            "eslint-plugin-react-hooks": "^4.6.2",
            "postcss": "^8.4.41",
            "tailwindcss": "^3.4.10",
            "typescript": "^5.5.4",
            "vite": "^5.4.0"
        }
    })
}
