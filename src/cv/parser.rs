// src/cv/parser.rs
use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const SKILL_CATALOG: &[&str] = &[
    "Rust",
    "Python",
    "Java",
    "JavaScript",
    "TypeScript",
    "Golang",
    "C++",
    "C#",
    "PHP",
    "Ruby",
    "Kotlin",
    "Swift",
    "SQL",
    "PostgreSQL",
    "MySQL",
    "MongoDB",
    "Redis",
    "Docker",
    "Kubernetes",
    "Terraform",
    "AWS",
    "Azure",
    "GCP",
    "Linux",
    "Git",
    "React",
    "Angular",
    "Vue",
    "Node.js",
    "Django",
    "Flask",
    "Spring",
    "GraphQL",
    "REST API",
    "HTML",
    "CSS",
    "Machine Learning",
    "Data Analysis",
    "Excel",
    "Project Management",
    "Agile",
    "Scrum",
    "Leadership",
    "Communication",
];

const NAME_SKIP_WORDS: &[&str] = &["curriculum vitae", "resume", "résumé", "cv"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedCv {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub skills: Vec<String>,
    pub years_of_experience: Option<u32>,
    pub education: Vec<String>,
    pub summary: Option<String>,
}

pub struct CvParser {
    email: Regex,
    phone: Regex,
    linkedin: Regex,
    github: Regex,
    years: Regex,
    education: Regex,
    summary_heading: Regex,
    skills: Vec<(&'static str, Regex)>,
}

fn case_insensitive(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("Invalid CV pattern: {}", pattern))
}

impl CvParser {
    pub fn new() -> Result<Self> {
        let skills = SKILL_CATALOG
            .iter()
            .map(|skill| {
                let pattern = format!(r"(?:^|[^\w+#]){}(?:[^\w+#]|$)", regex::escape(skill));
                case_insensitive(&pattern).map(|re| (*skill, re))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            email: case_insensitive(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}")?,
            phone: case_insensitive(r"\+?\d[\d\s().-]{7,}\d")?,
            linkedin: case_insensitive(
                r"(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[a-z0-9_-]+/?",
            )?,
            github: case_insensitive(r"(?:https?://)?(?:www\.)?github\.com/[a-z0-9_-]+")?,
            years: case_insensitive(r"\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b")?,
            education: case_insensitive(
                r"\b(?:bachelor|master|ph\.?d|doctorate|b\.?sc|m\.?sc|mba|diploma|degree|university|college)\b",
            )?,
            summary_heading: case_insensitive(
                r"^\s*(?:professional\s+)?(?:summary|profile|about\s+me|objective)\s*(?::\s*(.*))?$",
            )?,
            skills,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedCv {
        ParsedCv {
            name: extract_name(text),
            email: self.email.find(text).map(|m| m.as_str().to_lowercase()),
            phone: self.extract_phone(text),
            linkedin: self.linkedin.find(text).map(|m| m.as_str().to_string()),
            github: self.github.find(text).map(|m| m.as_str().to_string()),
            skills: self.extract_skills(text),
            years_of_experience: self.extract_years(text),
            education: self.extract_education(text),
            summary: self.extract_summary(text),
        }
    }

    /// First candidate with 9 to 15 digits
    fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone
            .find_iter(text)
            .map(|m| m.as_str().trim())
            .find(|candidate| {
                let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
                (9..=15).contains(&digits)
            })
            .map(str::to_string)
    }

    /// Catalog order
    fn extract_skills(&self, text: &str) -> Vec<String> {
        self.skills
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(skill, _)| skill.to_string())
            .collect()
    }

    fn extract_years(&self, text: &str) -> Option<u32> {
        self.years
            .captures_iter(text)
            .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
            .max()
    }

    fn extract_education(&self, text: &str) -> Vec<String> {
        let mut entries: Vec<String> = Vec::new();
        for line in text.lines().map(str::trim) {
            if self.education.is_match(line) && !entries.iter().any(|e| e == line) {
                entries.push(line.to_string());
            }
        }
        entries
    }

    /// First paragraph after a summary/profile heading
    fn extract_summary(&self, text: &str) -> Option<String> {
        let mut lines = text.lines();
        let mut paragraph: Vec<&str> = Vec::new();

        for line in lines.by_ref() {
            if let Some(caps) = self.summary_heading.captures(line) {
                if let Some(inline) = caps.get(1).map(|m| m.as_str().trim()) {
                    if !inline.is_empty() {
                        paragraph.push(inline);
                    }
                }
                break;
            }
        }

        for line in lines {
            let line = line.trim();
            if line.is_empty() {
                if paragraph.is_empty() {
                    continue;
                }
                break;
            }
            paragraph.push(line);
        }

        if paragraph.is_empty() {
            None
        } else {
            Some(paragraph.join(" "))
        }
    }
}

fn extract_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(5)
        .find(|line| looks_like_name(line))
        .map(str::to_string)
}

fn looks_like_name(line: &str) -> bool {
    if line.len() > 60 || NAME_SKIP_WORDS.contains(&line.to_lowercase().as_str()) {
        return false;
    }
    if !line
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'' || c == '.')
    {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words
            .iter()
            .all(|w| w.chars().next().is_some_and(char::is_uppercase))
}
