//! Known link platforms.
//!
//! One static table drives category detection, link extraction and the
//! heuristic descriptions. Adding a platform is one entry in [`PLATFORMS`].

use url::Url;

use crate::text::humanize;
use crate::types::ContentCategory;

/// How a platform's title and description are produced.
#[derive(Debug, Clone, Copy)]
pub enum Blurb {
    Fixed {
        title: &'static str,
        description: &'static str,
    },
    /// `/{owner}/{repo}` code hosting
    Repository,
}

/// A hostname rule.
#[derive(Debug, Clone, Copy)]
pub struct PlatformRule {
    /// Hostname fragments; any match selects the rule
    pub hosts: &'static [&'static str],
    pub category: ContentCategory,
    pub platform: &'static str,
    pub blurb: Blurb,
}

pub static PLATFORMS: &[PlatformRule] = &[
    PlatformRule {
        hosts: &["github.com"],
        category: ContentCategory::Github,
        platform: "GitHub",
        blurb: Blurb::Repository,
    },
    PlatformRule {
        hosts: &["figma.com"],
        category: ContentCategory::Figma,
        platform: "Figma",
        blurb: Blurb::Fixed {
            title: "Figma Design Project",
            description: "Interactive design project created in Figma. Features collaborative design work, prototypes, and professional UI/UX design systems.",
        },
    },
    PlatformRule {
        hosts: &["behance.net"],
        category: ContentCategory::Behance,
        platform: "Behance",
        blurb: Blurb::Fixed {
            title: "Behance Portfolio Project",
            description: "Creative portfolio project showcased on Adobe Behance. Professional creative work demonstrating design skills and artistic expertise.",
        },
    },
    PlatformRule {
        hosts: &["dribbble.com"],
        category: ContentCategory::Dribbble,
        platform: "Dribbble",
        blurb: Blurb::Fixed {
            title: "Dribbble Design Shot",
            description: "Creative design work shared on Dribbble. Professional design showcase demonstrating visual design skills and creative thinking.",
        },
    },
    PlatformRule {
        hosts: &["codepen.io"],
        category: ContentCategory::GenericLink,
        platform: "CodePen",
        blurb: Blurb::Fixed {
            title: "CodePen Demo",
            description: "Interactive code demonstration on CodePen. Features frontend development skills, creative coding, and web technology expertise.",
        },
    },
    PlatformRule {
        hosts: &["codesandbox.io"],
        category: ContentCategory::GenericLink,
        platform: "CodeSandbox",
        blurb: Blurb::Fixed {
            title: "CodeSandbox Project",
            description: "Interactive development project on CodeSandbox. Demonstrates modern web development skills and JavaScript expertise.",
        },
    },
    PlatformRule {
        hosts: &["vercel.app", "netlify.app", "herokuapp.com"],
        category: ContentCategory::GenericLink,
        platform: "Deployed App",
        blurb: Blurb::Fixed {
            title: "Live Web Application",
            description: "Deployed web application demonstrating full-stack development skills, modern frameworks, and production-ready code.",
        },
    },
    PlatformRule {
        hosts: &["youtube.com", "youtu.be"],
        category: ContentCategory::GenericLink,
        platform: "YouTube",
        blurb: Blurb::Fixed {
            title: "Video Content",
            description: "Video content showcasing work, tutorials, or project demonstrations. Creative or educational content delivery.",
        },
    },
    PlatformRule {
        hosts: &["vimeo.com"],
        category: ContentCategory::GenericLink,
        platform: "Vimeo",
        blurb: Blurb::Fixed {
            title: "Professional Video Content",
            description: "High-quality video content on Vimeo. Professional video production, creative storytelling, or project documentation.",
        },
    },
    PlatformRule {
        hosts: &["loom.com"],
        category: ContentCategory::GenericLink,
        platform: "Loom",
        blurb: Blurb::Fixed {
            title: "Screen Recording",
            description: "Screen recording or video walkthrough created with Loom. Demonstrates product features, tutorials, or project presentations.",
        },
    },
];

/// Title and description derived from a URL alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformMatch {
    pub platform: String,
    pub category: ContentCategory,
    pub title: String,
    pub description: String,
}

/// First rule whose host fragment occurs in `host`.
pub fn rule_for_host(host: &str) -> Option<&'static PlatformRule> {
    let host = host.to_ascii_lowercase();
    PLATFORMS
        .iter()
        .find(|rule| rule.hosts.iter().any(|h| host.contains(h)))
}

/// Category of a URL string, or `None` when it is not an `http(s)` link.
pub fn category_for_url(raw: &str) -> Option<ContentCategory> {
    let raw = raw.trim();
    if !raw.to_ascii_lowercase().starts_with("http") {
        return None;
    }
    let category = Url::parse(raw)
        .ok()
        .and_then(|url| url.host_str().and_then(rule_for_host))
        .map(|rule| rule.category)
        .unwrap_or(ContentCategory::GenericLink);
    Some(category)
}

/// Describe a link from its hostname and path.
pub fn describe_url(raw: &str) -> PlatformMatch {
    let Ok(url) = Url::parse(raw.trim()) else {
        return PlatformMatch {
            platform: "Website".into(),
            category: ContentCategory::GenericLink,
            title: "Web Project".into(),
            description:
                "Professional web-based project demonstrating digital expertise and technical skills."
                    .into(),
        };
    };

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match rule_for_host(&host) {
        Some(rule) => {
            let (title, description) = match rule.blurb {
                Blurb::Fixed { title, description } => (title.to_string(), description.to_string()),
                Blurb::Repository => describe_repository(rule.platform, &segments),
            };
            PlatformMatch {
                platform: rule.platform.into(),
                category: rule.category,
                title,
                description,
            }
        }
        None => {
            let title = match segments.last() {
                Some(last) => non_empty(humanize(last)).unwrap_or_else(|| "Web Project".into()),
                None => non_empty(humanize(host.trim_start_matches("www.")))
                    .unwrap_or_else(|| "Website Project".into()),
            };
            PlatformMatch {
                platform: "Website".into(),
                category: ContentCategory::GenericLink,
                title,
                description: format!(
                    "Professional web project at {host}. Demonstrates web development skills, design expertise, and digital project execution."
                ),
            }
        }
    }
}

fn describe_repository(platform: &str, segments: &[&str]) -> (String, String) {
    let owner = segments.first();
    let title = segments
        .get(1)
        .and_then(|repo| non_empty(humanize(repo)))
        .unwrap_or_else(|| format!("{platform} Repository"));
    let created_by = owner
        .map(|o| format!(" Created by {o}."))
        .unwrap_or_default();
    let description = format!(
        "Open source code repository on {platform}.{created_by} Features source code, documentation, and collaborative development work."
    );
    (title, description)
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
