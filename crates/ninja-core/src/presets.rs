use crate::profile::{AutoActivate, ProfileDefinition};

// ---------------------------------------------------------------------------
// Built-in presets
// ---------------------------------------------------------------------------

pub const FRONTEND_DEVELOPMENT: &str = "frontend-development";
pub const BACKEND_API: &str = "backend-api";
pub const TECHNICAL_ANALYSIS: &str = "technical-analysis";
pub const FULLSTACK_DEVELOPMENT: &str = "fullstack-development";
pub const TEST_AUTOMATION: &str = "test-automation";
pub const TEAM_COLLABORATION: &str = "team-collaboration";
pub const TDD_WORKFLOW: &str = "tdd-workflow";

struct Preset {
    name: &'static str,
    description: &'static str,
    skills: &'static [&'static str],
    agent_templates: &'static [&'static str],
    coding_standards: &'static [&'static str],
    file_patterns: &'static [&'static str],
    dependencies: &'static [&'static str],
    keywords: &'static [&'static str],
}

const PRESETS: &[Preset] = &[
    Preset {
        name: FRONTEND_DEVELOPMENT,
        description: "Frontend development with React/Vue/Angular best practices",
        skills: &[
            "test-driven-development",
            "systematic-debugging",
            "verification-before-completion",
        ],
        agent_templates: &["react-reviewer", "accessibility-checker", "performance-optimizer"],
        coding_standards: &["frontend-conventions.md", "component-guidelines.md"],
        file_patterns: &["*.tsx", "*.jsx", "*.vue", "*.component.ts"],
        dependencies: &["react", "vue", "angular", "@angular/core"],
        keywords: &["component", "frontend", "ui", "interface"],
    },
    Preset {
        name: BACKEND_API,
        description: "Backend API development with best practices",
        skills: &[
            "test-driven-development",
            "systematic-debugging",
            "using-superpowers",
        ],
        agent_templates: &["api-reviewer", "security-checker", "performance-analyzer"],
        coding_standards: &["api-conventions.md", "security-guidelines.md"],
        file_patterns: &[
            "*.controller.ts",
            "*.service.ts",
            "*.route.ts",
            "**/routes/**/*.js",
        ],
        dependencies: &["express", "fastify", "koa", "nestjs"],
        keywords: &["api", "endpoint", "controller", "service", "backend"],
    },
    Preset {
        name: TECHNICAL_ANALYSIS,
        description: "Comprehensive requirement analysis workflow",
        skills: &[
            "brainstorming",
            "writing-plans",
            "verification-before-completion",
        ],
        agent_templates: &["business-analyst", "software-architect", "technical-analyzer"],
        coding_standards: &["analysis-template.md", "requirements-format.md"],
        file_patterns: &["requirements*.md", "specs/**/*.md", "docs/architecture/**"],
        dependencies: &[],
        keywords: &[
            "requirement",
            "analysis",
            "planning",
            "specification",
            "architecture",
        ],
    },
    Preset {
        name: FULLSTACK_DEVELOPMENT,
        description: "Full-stack development combining frontend and backend best practices",
        skills: &[
            "test-driven-development",
            "systematic-debugging",
            "dispatching-parallel-agents",
        ],
        agent_templates: &["fullstack-reviewer", "integration-tester", "deployment-specialist"],
        coding_standards: &["fullstack-conventions.md", "integration-guidelines.md"],
        file_patterns: &["*.ts", "*.js", "*.tsx", "*.jsx"],
        dependencies: &["react", "express", "next", "nuxt"],
        keywords: &["fullstack", "integration", "deployment", "monorepo"],
    },
    Preset {
        name: TEST_AUTOMATION,
        description: "Test automation and quality assurance focused workflow",
        skills: &[
            "test-driven-development",
            "systematic-debugging",
            "verification-before-completion",
        ],
        agent_templates: &["test-architect", "qa-specialist", "automation-engineer"],
        coding_standards: &["testing-conventions.md", "test-patterns.md"],
        file_patterns: &["*.test.ts", "*.spec.ts", "*.e2e.ts", "**/tests/**/*.ts"],
        dependencies: &["jest", "mocha", "cypress", "playwright", "vitest"],
        keywords: &["test", "testing", "automation", "quality", "spec"],
    },
    Preset {
        name: TEAM_COLLABORATION,
        description: "Team collaboration and code review focused workflow",
        skills: &[
            "requesting-code-review",
            "receiving-code-review",
            "subagent-driven-development",
        ],
        agent_templates: &["code-reviewer", "team-lead", "documentation-specialist"],
        coding_standards: &["team-conventions.md", "review-guidelines.md"],
        file_patterns: &["*.md", "PULL_REQUEST_TEMPLATE.md", "CONTRIBUTING.md"],
        dependencies: &[],
        keywords: &["review", "collaboration", "team", "documentation", "guidelines"],
    },
    Preset {
        name: TDD_WORKFLOW,
        description: "Test-driven development loop: red, green, refactor",
        skills: &[
            "test-driven-development",
            "verification-before-completion",
            "systematic-debugging",
        ],
        agent_templates: &["test-architect", "code-reviewer"],
        coding_standards: &["testing-conventions.md"],
        file_patterns: &["*.test.*", "*.spec.*"],
        dependencies: &["jest", "vitest", "mocha"],
        keywords: &["tdd", "red", "green", "refactor"],
    },
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Preset {
    fn to_profile(&self) -> ProfileDefinition {
        ProfileDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            skills: owned(self.skills),
            agent_templates: owned(self.agent_templates),
            coding_standards: owned(self.coding_standards),
            auto_activate: AutoActivate {
                file_patterns: owned(self.file_patterns),
                dependencies: owned(self.dependencies),
                keywords: owned(self.keywords),
            },
        }
    }
}

/// Every built-in preset, in catalog order.
pub fn builtin_presets() -> Vec<ProfileDefinition> {
    PRESETS.iter().map(Preset::to_profile).collect()
}

pub fn find_preset(name: &str) -> Option<ProfileDefinition> {
    PRESETS.iter().find(|p| p.name == name).map(Preset::to_profile)
}

pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
